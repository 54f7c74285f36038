use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use tracing::info;

use pkl_core::clock::SystemClock;
use pkl_core::config::AppConfig;
use pkl_core::error::AppError;
use pkl_core::telemetry;
use pkl_core::workflows::internship::{InternshipService, WorkflowError};

use crate::cli::ServeArgs;
use crate::infra::{
    seed_demo_data, workflow_config, AppState, InMemoryAuditTrail, InMemoryInternshipRepository,
};
use crate::routes::with_internship_routes;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryInternshipRepository::default());
    let audit = Arc::new(InMemoryAuditTrail::default());
    if args.seed_demo_data {
        seed_demo_data(&repository).map_err(WorkflowError::from)?;
        info!("seeded demo position, application, and documents");
    }

    let service = Arc::new(InternshipService::new(
        repository,
        audit,
        SystemClock,
        workflow_config(&config.workflow),
    ));

    let app = with_internship_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "internship workflow service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
