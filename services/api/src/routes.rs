use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use bundle_configurator::workflows::bundle::{bundle_router, PricingEngine};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_bundle_routes(engine: Arc<PricingEngine>) -> axum::Router {
    bundle_router(engine)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api", axum::routing::get(api_index))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn api_index() -> Json<serde_json::Value> {
    Json(json!({
        "service": "bundle-configurator",
        "endpoints": [
            { "method": "GET", "path": "/api/v1/catalog" },
            { "method": "POST", "path": "/api/v1/bundle/quote" },
            { "method": "POST", "path": "/api/v1/bundle/toggle" },
            { "method": "GET", "path": "/health" },
            { "method": "GET", "path": "/ready" },
            { "method": "GET", "path": "/metrics" },
        ],
    }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
