use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity recorded on a finding: 1 is the most severe, 5 means no issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Priority(u8);

impl Priority {
    pub const MOST_SEVERE: Self = Self(1);
    pub const NO_ISSUE: Self = Self(5);

    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Priority {
    type Error = ScaleError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        check_scale(i64::from(value)).map(Self)
    }
}

impl From<Priority> for u8 {
    fn from(value: Priority) -> Self {
        value.0
    }
}

/// Section-level score derived from finding priorities, on the same 1-5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ConditionRating(u8);

impl ConditionRating {
    pub const fn value(self) -> u8 {
        self.0
    }

    pub const fn label(self) -> &'static str {
        match self.0 {
            1 => "Critical",
            2 => "Poor",
            3 => "Fair",
            4 => "Satisfactory",
            _ => "Good",
        }
    }

    pub(crate) const fn clamped(value: i64) -> Self {
        let bounded = if value < 1 {
            1
        } else if value > 5 {
            5
        } else {
            value
        };
        Self(bounded as u8)
    }
}

impl TryFrom<u8> for ConditionRating {
    type Error = ScaleError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        check_scale(i64::from(value)).map(Self)
    }
}

impl From<ConditionRating> for u8 {
    fn from(value: ConditionRating) -> Self {
        value.0
    }
}

impl fmt::Display for ConditionRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0, self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{value} is outside the 1-5 condition scale")]
pub struct ScaleError {
    pub value: i64,
}

fn check_scale(value: i64) -> Result<u8, ScaleError> {
    if (1..=5).contains(&value) {
        Ok(value as u8)
    } else {
        Err(ScaleError { value })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SectionId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FindingId(pub String);

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for FindingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Defect or observation recorded against a report section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub id: FindingId,
    pub section_id: SectionId,
    pub title: String,
    pub priority: Option<Priority>,
}

/// Report section owning a set of findings. `condition_rating` is derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    pub name: String,
    pub condition_rating: Option<ConditionRating>,
}

impl Section {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: SectionId(id.into()),
            name: name.into(),
            condition_rating: None,
        }
    }
}
