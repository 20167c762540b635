use crate::cli::ServeArgs;
use crate::infra::{build_engine, AppState};
use crate::routes::with_bundle_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use bundle_configurator::config::AppConfig;
use bundle_configurator::error::AppError;
use bundle_configurator::telemetry;
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

    let engine = Arc::new(build_engine(&config)?);
    info!(
        products = engine.catalog().len(),
        tier_basis = ?config.catalog.tier_basis,
        "pricing engine loaded"
    );

    let app = with_bundle_routes(engine)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "bundle configurator ready");

    axum::serve(listener, app).await?;
    Ok(())
}
