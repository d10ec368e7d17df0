use crate::cli::ServeArgs;
use crate::infra::{
    demo_sections, demo_status_records, AppState, InMemoryFindingRepository,
    InMemorySectionRepository, InMemoryStatusRepository, TracingAuditLog,
};
use crate::routes::app_router;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

use inspection_desk::config::AppConfig;
use inspection_desk::error::AppError;
use inspection_desk::telemetry;
use inspection_desk::workflows::inspection::InspectionService;
use inspection_desk::workflows::vendor::VendorLifecycleService;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let lifecycle_service = Arc::new(VendorLifecycleService::new(
        Arc::new(InMemoryStatusRepository::with_records(demo_status_records())),
        Arc::new(TracingAuditLog::default()),
    ));
    let inspection_service = Arc::new(InspectionService::new(
        Arc::new(InMemoryFindingRepository::default()),
        Arc::new(InMemorySectionRepository::with_sections(demo_sections())),
    ));

    let readiness_flag = Arc::new(AtomicBool::new(false));
    let mut app = app_router(lifecycle_service, inspection_service);

    let metrics = if config.telemetry.metrics_enabled {
        let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
        app = app.layer(prometheus_layer);
        Some(Arc::new(prometheus_handle))
    } else {
        None
    };

    let app = app.layer(Extension(AppState {
        readiness: readiness_flag.clone(),
        metrics,
    }));

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        metrics = config.telemetry.metrics_enabled,
        "inspection desk ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
