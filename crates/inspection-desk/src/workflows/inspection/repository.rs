use serde::Serialize;

use super::domain::{ConditionRating, Finding, FindingId, Section, SectionId};

/// Finding storage. Priorities are also exposed as raw stored integers so the
/// rating recompute sees exactly what was persisted.
pub trait FindingRepository: Send + Sync {
    fn insert(&self, finding: Finding) -> Result<Finding, RepositoryError>;
    fn update(&self, finding: Finding) -> Result<(), RepositoryError>;
    fn delete(&self, id: &FindingId) -> Result<Finding, RepositoryError>;
    fn fetch(&self, id: &FindingId) -> Result<Option<Finding>, RepositoryError>;
    fn list_for_section(&self, section_id: &SectionId) -> Result<Vec<Finding>, RepositoryError>;
    fn priorities_for_section(
        &self,
        section_id: &SectionId,
    ) -> Result<Vec<Option<i64>>, RepositoryError>;
}

pub trait SectionRepository: Send + Sync {
    fn fetch(&self, id: &SectionId) -> Result<Option<Section>, RepositoryError>;
    fn set_condition_rating(
        &self,
        id: &SectionId,
        rating: Option<ConditionRating>,
    ) -> Result<(), RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Section with its findings, as returned to report views.
#[derive(Debug, Clone, Serialize)]
pub struct SectionReport {
    pub section: Section,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition_label: Option<&'static str>,
    pub findings: Vec<Finding>,
}

impl SectionReport {
    pub fn new(section: Section, findings: Vec<Finding>) -> Self {
        let condition_label = section.condition_rating.map(ConditionRating::label);
        Self {
            section,
            condition_label,
            findings,
        }
    }
}
