use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use super::catalog::{Product, ProductId};
use super::pricing::{EligibilityView, PricingEngine};
use super::selection::{SelectionError, SelectionState};

/// Stateless pricing endpoints. The caller sends the whole selection on every
/// request; nothing is kept between calls.
pub fn bundle_router(engine: Arc<PricingEngine>) -> Router {
    Router::new()
        .route("/api/v1/catalog", get(catalog_handler))
        .route("/api/v1/bundle/quote", post(quote_handler))
        .route("/api/v1/bundle/toggle", post(toggle_handler))
        .with_state(engine)
}

#[derive(Debug, Serialize)]
pub(crate) struct CatalogResponse<'a> {
    pub(crate) products: &'a [Product],
    pub(crate) primary_product: ProductId,
    pub(crate) excluded_when_primary: Vec<ProductId>,
    pub(crate) special_bundle: Vec<ProductId>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QuoteRequest {
    #[serde(default)]
    pub selected: Vec<ProductId>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ToggleRequest {
    #[serde(default)]
    pub selected: Vec<ProductId>,
    pub product_id: ProductId,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToggleResponse {
    pub selected: SelectionState,
    pub view: EligibilityView,
}

pub(crate) async fn catalog_handler(State(engine): State<Arc<PricingEngine>>) -> Response {
    let rule = engine.exclusivity();
    let payload = CatalogResponse {
        products: engine.catalog().products(),
        primary_product: rule.primary,
        excluded_when_primary: rule.excluded.iter().copied().collect(),
        special_bundle: engine.special_offer().products.iter().copied().collect(),
    };
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn quote_handler(
    State(engine): State<Arc<PricingEngine>>,
    axum::Json(request): axum::Json<QuoteRequest>,
) -> Response {
    match engine.selection_from_ids(request.selected) {
        Ok(selection) => {
            let view = engine.quote(&selection);
            debug!(total_products = view.total_products, "quoted selection");
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => selection_error_response(error),
    }
}

pub(crate) async fn toggle_handler(
    State(engine): State<Arc<PricingEngine>>,
    axum::Json(request): axum::Json<ToggleRequest>,
) -> Response {
    let toggled = engine
        .selection_from_ids(request.selected)
        .and_then(|selection| engine.toggle(&selection, request.product_id));

    match toggled {
        Ok(selected) => {
            let view = engine.quote(&selected);
            (StatusCode::OK, axum::Json(ToggleResponse { selected, view })).into_response()
        }
        Err(error) => selection_error_response(error),
    }
}

fn selection_error_response(error: SelectionError) -> Response {
    let kind = match &error {
        SelectionError::UnknownProduct(_) => "unknown_product",
        SelectionError::InvalidSelection { .. } => "invalid_selection",
        SelectionError::Duplicate(_) => "duplicate_product",
    };
    let payload = json!({
        "error": error.to_string(),
        "kind": kind,
    });
    (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
}
