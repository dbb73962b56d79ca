use crate::cli::ServeArgs;
use crate::infra::{AllocationContext, AppState};
use crate::routes::allocation_router;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use faculty_allocation::config::AppConfig;
use faculty_allocation::error::AppError;
use faculty_allocation::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

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
    let allocation = AllocationContext::new(config.allocation.default_capacity);

    let app = allocation_router()
        .layer(Extension(allocation))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        default_capacity = ?config.allocation.default_capacity,
        "faculty allocation service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
