use crate::infra::AppState;
use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

use inspection_desk::workflows::inspection::{
    inspection_router, FindingRepository, InspectionService, SectionRepository,
};
use inspection_desk::workflows::vendor::{
    lifecycle_router, transition_table, AuditLog, EntityKind, StatusRepository,
    TransitionEdgeView, VendorLifecycleService,
};

#[derive(Debug, Serialize)]
pub(crate) struct TransitionTableResponse {
    pub(crate) kind: EntityKind,
    pub(crate) transitions: Vec<TransitionEdgeView>,
}

pub(crate) fn app_router<R, A, F, S>(
    lifecycle: Arc<VendorLifecycleService<R, A>>,
    inspection: Arc<InspectionService<F, S>>,
) -> Router
where
    R: StatusRepository + 'static,
    A: AuditLog + 'static,
    F: FindingRepository + 'static,
    S: SectionRepository + 'static,
{
    lifecycle_router(lifecycle)
        .merge(inspection_router(inspection))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/transitions/:kind", get(transition_table_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Acquire);
    if ready {
        (StatusCode::OK, Json(json!({ "status": "ready" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "initializing" })),
        )
    }
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> Response {
    match state.metrics {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "metrics disabled", "code": "metrics_disabled" })),
        )
            .into_response(),
    }
}

pub(crate) async fn transition_table_endpoint(Path(raw_kind): Path<String>) -> Response {
    match EntityKind::parse(&raw_kind) {
        Some(kind) => Json(TransitionTableResponse {
            kind,
            transitions: transition_table(kind),
        })
        .into_response(),
        None => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": format!("unknown entity kind '{raw_kind}'"),
                "code": "invalid_entity_kind",
            })),
        )
            .into_response(),
    }
}
