//! Section condition rating derived from the priorities of its findings.
//!
//! A finding without a priority counts as 5 ("no issue"). The mean score is
//! rounded half up using exact integer arithmetic, so 2.5 becomes 3 and 3.5
//! becomes 4, then clamped into the 1-5 scale.

use super::domain::{ConditionRating, Priority};

/// Score a finding contributes when no priority has been assigned.
pub const UNPRIORITIZED_SCORE: u8 = Priority::NO_ISSUE.value();

/// Recomputes a section rating from the post-mutation list of finding priorities.
///
/// Returns `None` when the section has no findings.
pub fn recompute_condition_rating(priorities: &[Option<Priority>]) -> Option<ConditionRating> {
    let scores = priorities
        .iter()
        .copied()
        .map(|priority| i64::from(priority.map_or(UNPRIORITIZED_SCORE, Priority::value)));
    rating_from_scores(scores, priorities.len())
}

/// Same rule for untyped rows, e.g. priorities read back from storage.
pub fn recompute_from_raw(
    priorities: &[Option<i64>],
) -> Result<Option<ConditionRating>, AggregationError> {
    let mut scores = Vec::with_capacity(priorities.len());
    for (index, priority) in priorities.iter().enumerate() {
        let score = match *priority {
            None => i64::from(UNPRIORITIZED_SCORE),
            Some(value) if (1..=5).contains(&value) => value,
            Some(value) => return Err(AggregationError::PriorityOutOfRange { index, value }),
        };
        scores.push(score);
    }
    Ok(rating_from_scores(scores.into_iter(), priorities.len()))
}

fn rating_from_scores(scores: impl Iterator<Item = i64>, count: usize) -> Option<ConditionRating> {
    if count == 0 {
        return None;
    }

    let count = count as i64;
    let total: i64 = scores.sum();
    // floor(total / count + 1/2) without leaving integers
    let rounded = (2 * total + count).div_euclid(2 * count);
    Some(ConditionRating::clamped(rounded))
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AggregationError {
    #[error("finding #{index} has priority {value}, expected 1-5 or none")]
    PriorityOutOfRange { index: usize, value: i64 },
}
