use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::workflows::inspection::domain::{
    ConditionRating, Finding, FindingId, Priority, Section, SectionId,
};
use crate::workflows::inspection::repository::{
    FindingRepository, RepositoryError, SectionRepository,
};
use crate::workflows::inspection::{inspection_router, InspectionService};

#[derive(Default, Clone)]
pub(super) struct MemoryFindings {
    records: Arc<Mutex<BTreeMap<FindingId, Finding>>>,
    raw_overrides: Arc<Mutex<BTreeMap<FindingId, i64>>>,
}

impl MemoryFindings {
    /// Simulates a row whose stored priority no longer fits the 1-5 scale.
    pub(super) fn corrupt_priority(&self, id: &FindingId, value: i64) {
        self.raw_overrides
            .lock()
            .expect("findings mutex poisoned")
            .insert(id.clone(), value);
    }
}

impl FindingRepository for MemoryFindings {
    fn insert(&self, finding: Finding) -> Result<Finding, RepositoryError> {
        let mut guard = self.records.lock().expect("findings mutex poisoned");
        if guard.contains_key(&finding.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(finding.id.clone(), finding.clone());
        Ok(finding)
    }

    fn update(&self, finding: Finding) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("findings mutex poisoned");
        guard.insert(finding.id.clone(), finding);
        Ok(())
    }

    fn delete(&self, id: &FindingId) -> Result<Finding, RepositoryError> {
        let mut guard = self.records.lock().expect("findings mutex poisoned");
        guard.remove(id).ok_or(RepositoryError::NotFound)
    }

    fn fetch(&self, id: &FindingId) -> Result<Option<Finding>, RepositoryError> {
        let guard = self.records.lock().expect("findings mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list_for_section(&self, section_id: &SectionId) -> Result<Vec<Finding>, RepositoryError> {
        let guard = self.records.lock().expect("findings mutex poisoned");
        Ok(guard
            .values()
            .filter(|finding| finding.section_id == *section_id)
            .cloned()
            .collect())
    }

    fn priorities_for_section(
        &self,
        section_id: &SectionId,
    ) -> Result<Vec<Option<i64>>, RepositoryError> {
        let overrides = self
            .raw_overrides
            .lock()
            .expect("findings mutex poisoned")
            .clone();
        Ok(self
            .list_for_section(section_id)?
            .into_iter()
            .map(|finding| match overrides.get(&finding.id) {
                Some(raw) => Some(*raw),
                None => finding.priority.map(|priority| i64::from(priority.value())),
            })
            .collect())
    }
}

/// Finding writes succeed; priority reads for the recompute fail.
#[derive(Default, Clone)]
pub(super) struct FlakyFindings {
    inner: MemoryFindings,
}

impl FindingRepository for FlakyFindings {
    fn insert(&self, finding: Finding) -> Result<Finding, RepositoryError> {
        self.inner.insert(finding)
    }

    fn update(&self, finding: Finding) -> Result<(), RepositoryError> {
        self.inner.update(finding)
    }

    fn delete(&self, id: &FindingId) -> Result<Finding, RepositoryError> {
        self.inner.delete(id)
    }

    fn fetch(&self, id: &FindingId) -> Result<Option<Finding>, RepositoryError> {
        self.inner.fetch(id)
    }

    fn list_for_section(&self, section_id: &SectionId) -> Result<Vec<Finding>, RepositoryError> {
        self.inner.list_for_section(section_id)
    }

    fn priorities_for_section(
        &self,
        _section_id: &SectionId,
    ) -> Result<Vec<Option<i64>>, RepositoryError> {
        Err(RepositoryError::Unavailable("replica lagging".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemorySections {
    records: Arc<Mutex<BTreeMap<SectionId, Section>>>,
}

impl MemorySections {
    pub(super) fn seeded(sections: impl IntoIterator<Item = Section>) -> Self {
        let repository = Self::default();
        {
            let mut guard = repository.records.lock().expect("sections mutex poisoned");
            for section in sections {
                guard.insert(section.id.clone(), section);
            }
        }
        repository
    }

    pub(super) fn rating_of(&self, id: &str) -> Option<u8> {
        self.records
            .lock()
            .expect("sections mutex poisoned")
            .get(&SectionId(id.to_string()))
            .and_then(|section| section.condition_rating)
            .map(ConditionRating::value)
    }
}

impl SectionRepository for MemorySections {
    fn fetch(&self, id: &SectionId) -> Result<Option<Section>, RepositoryError> {
        let guard = self.records.lock().expect("sections mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn set_condition_rating(
        &self,
        id: &SectionId,
        rating: Option<ConditionRating>,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("sections mutex poisoned");
        let section = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        section.condition_rating = rating;
        Ok(())
    }
}

pub(super) fn priority(value: u8) -> Option<Priority> {
    Some(Priority::try_from(value).expect("fixture priority"))
}

pub(super) fn section_id(raw: &str) -> SectionId {
    SectionId(raw.to_string())
}

pub(super) fn roof_section() -> Section {
    Section::new("roof", "Roof & Attic")
}

pub(super) fn build_service() -> (
    InspectionService<MemoryFindings, MemorySections>,
    Arc<MemoryFindings>,
    Arc<MemorySections>,
) {
    let findings = Arc::new(MemoryFindings::default());
    let sections = Arc::new(MemorySections::seeded([
        roof_section(),
        Section::new("plumbing", "Plumbing"),
    ]));
    let service = InspectionService::new(findings.clone(), sections.clone());
    (service, findings, sections)
}

pub(super) fn router_with_service(
    service: InspectionService<MemoryFindings, MemorySections>,
) -> axum::Router {
    inspection_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 8192)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
