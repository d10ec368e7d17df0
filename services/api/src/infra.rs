use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

use inspection_desk::workflows::inspection::{
    ConditionRating, Finding, FindingId, FindingRepository,
    RepositoryError as InspectionRepositoryError, Section, SectionId, SectionRepository,
};
use inspection_desk::workflows::vendor::{
    AuditEntry, AuditError, AuditLog, EntityId, EntityKind, EstimateStatus, InvoiceStatus,
    RepositoryError as StatusRepositoryError, StatusRecord, StatusRepository, WorkOrderStatus,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Option<Arc<PrometheusHandle>>,
}

fn lock<'a, T>(mutex: &'a Mutex<T>, store: &str) -> Result<MutexGuard<'a, T>, String> {
    mutex
        .lock()
        .map_err(|_| format!("{store} store lock poisoned"))
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryStatusRepository {
    records: Arc<Mutex<HashMap<(EntityKind, EntityId), StatusRecord>>>,
}

impl InMemoryStatusRepository {
    pub(crate) fn with_records(records: impl IntoIterator<Item = StatusRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|record| ((record.kind, record.id.clone()), record))
            .collect();
        Self {
            records: Arc::new(Mutex::new(records)),
        }
    }
}

impl StatusRepository for InMemoryStatusRepository {
    fn insert(&self, record: StatusRecord) -> Result<StatusRecord, StatusRepositoryError> {
        let mut guard =
            lock(&self.records, "status").map_err(StatusRepositoryError::Unavailable)?;
        let key = (record.kind, record.id.clone());
        if guard.contains_key(&key) {
            return Err(StatusRepositoryError::Conflict);
        }
        guard.insert(key, record.clone());
        Ok(record)
    }

    fn update(&self, record: StatusRecord) -> Result<(), StatusRepositoryError> {
        let mut guard =
            lock(&self.records, "status").map_err(StatusRepositoryError::Unavailable)?;
        let key = (record.kind, record.id.clone());
        if guard.contains_key(&key) {
            guard.insert(key, record);
            Ok(())
        } else {
            Err(StatusRepositoryError::NotFound)
        }
    }

    fn fetch(
        &self,
        kind: EntityKind,
        id: &EntityId,
    ) -> Result<Option<StatusRecord>, StatusRepositoryError> {
        let guard = lock(&self.records, "status").map_err(StatusRepositoryError::Unavailable)?;
        Ok(guard.get(&(kind, id.clone())).cloned())
    }
}

/// Audit sink that emits each entry as a structured log line and keeps it in memory.
#[derive(Default, Clone)]
pub(crate) struct TracingAuditLog {
    entries: Arc<Mutex<Vec<AuditEntry>>>,
}

impl AuditLog for TracingAuditLog {
    fn record(&self, entry: AuditEntry) -> Result<(), AuditError> {
        info!(
            entity = %entry.entity_id,
            kind = %entry.kind,
            from = %entry.from,
            to = %entry.to,
            role = %entry.actor_role,
            "status change audited"
        );
        let mut guard = lock(&self.entries, "audit").map_err(AuditError::Transport)?;
        guard.push(entry);
        Ok(())
    }
}

#[cfg(test)]
impl TracingAuditLog {
    pub(crate) fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().expect("audit mutex poisoned").clone()
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryFindingRepository {
    findings: Arc<Mutex<BTreeMap<FindingId, Finding>>>,
}

impl InMemoryFindingRepository {
    fn guard(&self) -> Result<MutexGuard<'_, BTreeMap<FindingId, Finding>>, InspectionRepositoryError> {
        lock(&self.findings, "finding").map_err(InspectionRepositoryError::Unavailable)
    }
}

impl FindingRepository for InMemoryFindingRepository {
    fn insert(&self, finding: Finding) -> Result<Finding, InspectionRepositoryError> {
        let mut guard = self.guard()?;
        if guard.contains_key(&finding.id) {
            return Err(InspectionRepositoryError::Conflict);
        }
        guard.insert(finding.id.clone(), finding.clone());
        Ok(finding)
    }

    fn update(&self, finding: Finding) -> Result<(), InspectionRepositoryError> {
        let mut guard = self.guard()?;
        match guard.get_mut(&finding.id) {
            Some(existing) => {
                *existing = finding;
                Ok(())
            }
            None => Err(InspectionRepositoryError::NotFound),
        }
    }

    fn delete(&self, id: &FindingId) -> Result<Finding, InspectionRepositoryError> {
        self.guard()?
            .remove(id)
            .ok_or(InspectionRepositoryError::NotFound)
    }

    fn fetch(&self, id: &FindingId) -> Result<Option<Finding>, InspectionRepositoryError> {
        Ok(self.guard()?.get(id).cloned())
    }

    fn list_for_section(
        &self,
        section_id: &SectionId,
    ) -> Result<Vec<Finding>, InspectionRepositoryError> {
        Ok(self
            .guard()?
            .values()
            .filter(|finding| &finding.section_id == section_id)
            .cloned()
            .collect())
    }

    fn priorities_for_section(
        &self,
        section_id: &SectionId,
    ) -> Result<Vec<Option<i64>>, InspectionRepositoryError> {
        Ok(self
            .guard()?
            .values()
            .filter(|finding| &finding.section_id == section_id)
            .map(|finding| finding.priority.map(|priority| i64::from(priority.value())))
            .collect())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySectionRepository {
    sections: Arc<Mutex<HashMap<SectionId, Section>>>,
}

impl InMemorySectionRepository {
    pub(crate) fn with_sections(sections: impl IntoIterator<Item = Section>) -> Self {
        let sections = sections
            .into_iter()
            .map(|section| (section.id.clone(), section))
            .collect();
        Self {
            sections: Arc::new(Mutex::new(sections)),
        }
    }
}

impl SectionRepository for InMemorySectionRepository {
    fn fetch(&self, id: &SectionId) -> Result<Option<Section>, InspectionRepositoryError> {
        let guard =
            lock(&self.sections, "section").map_err(InspectionRepositoryError::Unavailable)?;
        Ok(guard.get(id).cloned())
    }

    fn set_condition_rating(
        &self,
        id: &SectionId,
        rating: Option<ConditionRating>,
    ) -> Result<(), InspectionRepositoryError> {
        let mut guard =
            lock(&self.sections, "section").map_err(InspectionRepositoryError::Unavailable)?;
        let section = guard
            .get_mut(id)
            .ok_or(InspectionRepositoryError::NotFound)?;
        section.condition_rating = rating;
        Ok(())
    }
}

/// Records loaded into the in-memory status store at startup.
pub(crate) fn demo_status_records() -> Vec<StatusRecord> {
    vec![
        StatusRecord::new("wo-1001", WorkOrderStatus::Assigned.into()),
        StatusRecord::new("wo-1002", WorkOrderStatus::InProgress.into()),
        StatusRecord::new("est-2001", EstimateStatus::Submitted.into()),
        StatusRecord::new("inv-3001", InvoiceStatus::Submitted.into()),
    ]
}

/// Report sections available at startup; findings are added through the API.
pub(crate) fn demo_sections() -> Vec<Section> {
    vec![
        Section::new("roof", "Roof & Attic"),
        Section::new("plumbing", "Plumbing"),
        Section::new("electrical", "Electrical"),
        Section::new("hvac", "Heating & Cooling"),
    ]
}
