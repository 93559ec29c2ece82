use crate::cli::ServeArgs;
use crate::infra::{AppState, SnapshotBackend};
use crate::routes::with_errand_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use permit_view::config::AppConfig;
use permit_view::errands::ErrandService;
use permit_view::error::AppError;
use permit_view::telemetry;
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
    if let Some(snapshot) = args.snapshot.take() {
        config.backend.snapshot_path = Some(snapshot);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let backend = Arc::new(SnapshotBackend::from_config(&config.backend)?);
    let errand_service = Arc::new(ErrandService::new(
        backend,
        config.filter.clone(),
        &config.caches,
    ));

    let app = with_errand_routes(errand_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "permit register projector ready");

    axum::serve(listener, app).await?;
    Ok(())
}
