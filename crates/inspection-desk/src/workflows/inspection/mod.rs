//! Inspection findings and the section condition ratings derived from them.

pub mod condition;
pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use condition::{
    recompute_condition_rating, recompute_from_raw, AggregationError, UNPRIORITIZED_SCORE,
};
pub use domain::{ConditionRating, Finding, FindingId, Priority, ScaleError, Section, SectionId};
pub use repository::{FindingRepository, RepositoryError, SectionReport, SectionRepository};
pub use router::inspection_router;
pub use service::{
    FindingMutation, InspectionService, InspectionServiceError, NewFinding, RatingRefresh,
};
