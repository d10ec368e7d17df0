use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Router,
};
use serde::{Deserialize, Deserializer};
use serde_json::json;

use super::domain::{FindingId, Priority, SectionId};
use super::repository::{FindingRepository, RepositoryError, SectionRepository};
use super::service::{InspectionService, InspectionServiceError, NewFinding};

/// `priority` must be present: `null` clears it, a missing field is rejected.
#[derive(Debug, Deserialize)]
pub struct PriorityUpdate {
    #[serde(default, deserialize_with = "present")]
    pub priority: Option<Option<Priority>>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Option<Priority>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Priority>::deserialize(deserializer).map(Some)
}

/// Router exposing finding mutations and section condition reads.
pub fn inspection_router<F, S>(service: Arc<InspectionService<F, S>>) -> Router
where
    F: FindingRepository + 'static,
    S: SectionRepository + 'static,
{
    Router::new()
        .route("/api/v1/sections/:section_id", get(section_handler::<F, S>))
        .route(
            "/api/v1/sections/:section_id/findings",
            post(create_finding_handler::<F, S>),
        )
        .route(
            "/api/v1/findings/:finding_id",
            patch(update_priority_handler::<F, S>).delete(delete_finding_handler::<F, S>),
        )
        .with_state(service)
}

pub(crate) async fn create_finding_handler<F, S>(
    State(service): State<Arc<InspectionService<F, S>>>,
    Path(section_id): Path<String>,
    axum::Json(request): axum::Json<NewFinding>,
) -> Response
where
    F: FindingRepository + 'static,
    S: SectionRepository + 'static,
{
    match service.create_finding(&SectionId(section_id), request) {
        Ok(mutation) => (StatusCode::CREATED, axum::Json(mutation)).into_response(),
        Err(error) => service_error(error),
    }
}

pub(crate) async fn update_priority_handler<F, S>(
    State(service): State<Arc<InspectionService<F, S>>>,
    Path(finding_id): Path<String>,
    axum::Json(update): axum::Json<PriorityUpdate>,
) -> Response
where
    F: FindingRepository + 'static,
    S: SectionRepository + 'static,
{
    let Some(priority) = update.priority else {
        let payload = json!({
            "error": "priority is required; send null to clear it",
            "code": "missing_priority",
        });
        return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
    };

    match service.update_priority(&FindingId(finding_id), priority) {
        Ok(mutation) => (StatusCode::OK, axum::Json(mutation)).into_response(),
        Err(error) => service_error(error),
    }
}

pub(crate) async fn delete_finding_handler<F, S>(
    State(service): State<Arc<InspectionService<F, S>>>,
    Path(finding_id): Path<String>,
) -> Response
where
    F: FindingRepository + 'static,
    S: SectionRepository + 'static,
{
    match service.delete_finding(&FindingId(finding_id)) {
        Ok(mutation) => (StatusCode::OK, axum::Json(mutation)).into_response(),
        Err(error) => service_error(error),
    }
}

pub(crate) async fn section_handler<F, S>(
    State(service): State<Arc<InspectionService<F, S>>>,
    Path(section_id): Path<String>,
) -> Response
where
    F: FindingRepository + 'static,
    S: SectionRepository + 'static,
{
    match service.section(&SectionId(section_id)) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => service_error(error),
    }
}

fn service_error(error: InspectionServiceError) -> Response {
    match error {
        InspectionServiceError::Repository(RepositoryError::NotFound) => {
            let payload = json!({ "error": "record not found" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        InspectionServiceError::Repository(RepositoryError::Conflict) => {
            let payload = json!({ "error": "finding already exists" });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        other => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
