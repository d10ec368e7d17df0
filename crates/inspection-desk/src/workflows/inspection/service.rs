use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::condition::{recompute_from_raw, AggregationError};
use super::domain::{ConditionRating, Finding, FindingId, Priority, SectionId};
use super::repository::{FindingRepository, RepositoryError, SectionReport, SectionRepository};

static FINDING_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_finding_id() -> FindingId {
    let id = FINDING_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    FindingId(format!("fnd-{id:06}"))
}

/// Payload for recording a new finding against a section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewFinding {
    pub title: String,
    #[serde(default)]
    pub priority: Option<Priority>,
}

/// What happened to the owning section's rating after a finding mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RatingRefresh {
    Updated {
        condition_rating: Option<ConditionRating>,
    },
    Unchanged {
        reason: String,
    },
}

/// Result of a finding create, update, or delete.
#[derive(Debug, Clone, Serialize)]
pub struct FindingMutation {
    pub finding: Finding,
    pub condition: RatingRefresh,
}

#[derive(Debug, thiserror::Error)]
enum RefreshError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Aggregation(#[from] AggregationError),
}

/// Finding mutations with the section condition rating kept in step.
pub struct InspectionService<F, S> {
    findings: Arc<F>,
    sections: Arc<S>,
}

impl<F, S> InspectionService<F, S>
where
    F: FindingRepository + 'static,
    S: SectionRepository + 'static,
{
    pub fn new(findings: Arc<F>, sections: Arc<S>) -> Self {
        Self { findings, sections }
    }

    pub fn create_finding(
        &self,
        section_id: &SectionId,
        request: NewFinding,
    ) -> Result<FindingMutation, InspectionServiceError> {
        self.sections
            .fetch(section_id)?
            .ok_or(RepositoryError::NotFound)?;

        let finding = self.findings.insert(Finding {
            id: next_finding_id(),
            section_id: section_id.clone(),
            title: request.title,
            priority: request.priority,
        })?;

        let condition = self.refresh_condition(section_id);
        Ok(FindingMutation { finding, condition })
    }

    pub fn update_priority(
        &self,
        finding_id: &FindingId,
        priority: Option<Priority>,
    ) -> Result<FindingMutation, InspectionServiceError> {
        let mut finding = self
            .findings
            .fetch(finding_id)?
            .ok_or(RepositoryError::NotFound)?;

        finding.priority = priority;
        self.findings.update(finding.clone())?;

        let condition = self.refresh_condition(&finding.section_id);
        Ok(FindingMutation { finding, condition })
    }

    pub fn delete_finding(
        &self,
        finding_id: &FindingId,
    ) -> Result<FindingMutation, InspectionServiceError> {
        let finding = self.findings.delete(finding_id)?;
        let condition = self.refresh_condition(&finding.section_id);
        Ok(FindingMutation { finding, condition })
    }

    pub fn section(&self, section_id: &SectionId) -> Result<SectionReport, InspectionServiceError> {
        let section = self
            .sections
            .fetch(section_id)?
            .ok_or(RepositoryError::NotFound)?;
        let findings = self.findings.list_for_section(section_id)?;
        Ok(SectionReport::new(section, findings))
    }

    /// Recomputes and stores the section rating after a committed finding change.
    ///
    /// Never fails the caller: on error the stored rating is left as it was.
    fn refresh_condition(&self, section_id: &SectionId) -> RatingRefresh {
        match self.try_refresh(section_id) {
            Ok(condition_rating) => {
                debug!(
                    %section_id,
                    rating = condition_rating.map(ConditionRating::value),
                    "section condition rating refreshed"
                );
                RatingRefresh::Updated { condition_rating }
            }
            Err(error) => {
                warn!(%section_id, %error, "condition rating left unchanged");
                RatingRefresh::Unchanged {
                    reason: error.to_string(),
                }
            }
        }
    }

    fn try_refresh(&self, section_id: &SectionId) -> Result<Option<ConditionRating>, RefreshError> {
        let priorities = self.findings.priorities_for_section(section_id)?;
        let rating = recompute_from_raw(&priorities)?;
        self.sections.set_condition_rating(section_id, rating)?;
        Ok(rating)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InspectionServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
