use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryMetricSource, SystemClock};
use crate::routes::with_analytics_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use ehs_core::analytics::SafetyAnalyticsService;
use ehs_core::config::AppConfig;
use ehs_core::error::AppError;
use ehs_core::telemetry;
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
    config.data = args.data.resolve(config.data);

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let source = Arc::new(InMemoryMetricSource::from_csv(&config.data)?);
    let analytics_service = Arc::new(SafetyAnalyticsService::new(source, Arc::new(SystemClock)));

    let app = with_analytics_routes(analytics_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "EHS safety analytics portal ready");

    axum::serve(listener, app).await?;
    Ok(())
}
