use bundle_configurator::config::{AppConfig, CatalogConfig, GatewayConfig, GatewayMode};
use bundle_configurator::error::AppError;
use bundle_configurator::workflows::bundle::{
    Catalog, CatalogImporter, DiscountTable, ExclusivityRule, FulfillmentGateway, MockGateway,
    PricingEngine, ProductId, SpecialBundleOffer, TierBasis, WebhookGateway,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Catalog from the configured CSV (or the built-in one) plus the storefront rules.
pub(crate) fn build_engine(config: &AppConfig) -> Result<PricingEngine, AppError> {
    let catalog = load_catalog(&config.catalog)?;
    let special =
        SpecialBundleOffer::reference().with_checkout_url(config.gateway.checkout_url.clone());

    Ok(PricingEngine::new(
        catalog,
        ExclusivityRule::reference(),
        special,
        DiscountTable::reference(config.catalog.tier_basis),
    ))
}

fn load_catalog(config: &CatalogConfig) -> Result<Catalog, AppError> {
    match &config.csv_path {
        Some(path) => {
            let catalog = CatalogImporter::from_path(path)?;
            info!(path = %path.display(), products = catalog.len(), "catalog imported");
            Ok(catalog)
        }
        None => Ok(Catalog::reference()),
    }
}

pub(crate) fn build_gateway(config: &GatewayConfig) -> Arc<dyn FulfillmentGateway> {
    match config.mode {
        GatewayMode::Webhook => Arc::new(WebhookGateway::new(config.webhook_url.clone())),
        GatewayMode::Mock => Arc::new(MockGateway::new()),
    }
}

/// Product ids given on the command line, in the order given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ProductList(pub(crate) Vec<ProductId>);

pub(crate) fn parse_product_list(raw: &str) -> Result<ProductList, String> {
    parse_product_ids(raw).map(ProductList)
}

pub(crate) fn parse_tier_basis(raw: &str) -> Result<TierBasis, String> {
    TierBasis::parse(raw).ok_or_else(|| format!("'{raw}' is not a tier basis (use count or amount)"))
}

/// Parses `1,2,3` into product ids, keeping the given order.
pub(crate) fn parse_product_ids(raw: &str) -> Result<Vec<ProductId>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<u32>()
                .map(ProductId)
                .map_err(|err| format!("'{part}' is not a product id ({err})"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn catalog_config(csv_path: Option<PathBuf>) -> CatalogConfig {
        CatalogConfig {
            csv_path,
            tier_basis: TierBasis::SubtotalAmount,
        }
    }

    #[test]
    fn parses_comma_separated_ids_in_order() {
        assert_eq!(
            parse_product_ids(" 3, 1,2 ,"),
            Ok(vec![ProductId(3), ProductId(1), ProductId(2)])
        );
        assert!(parse_product_ids("1,two").is_err());
        assert_eq!(parse_product_ids(""), Ok(Vec::new()));
    }

    #[test]
    fn parses_tier_basis_names() {
        assert_eq!(parse_tier_basis("amount"), Ok(TierBasis::SubtotalAmount));
        assert_eq!(parse_tier_basis("count"), Ok(TierBasis::SelectionCount));
        assert!(parse_tier_basis("weight").is_err());
    }

    #[test]
    fn falls_back_to_the_built_in_catalog() {
        let catalog = load_catalog(&catalog_config(None)).expect("built-in catalog");
        assert_eq!(catalog.len(), 36);
    }

    #[test]
    fn missing_catalog_file_is_reported() {
        let err = load_catalog(&catalog_config(Some(PathBuf::from(
            "/definitely/not/here/catalog.csv",
        ))))
        .expect_err("missing file");
        assert!(matches!(err, AppError::Catalog(_)));
    }
}
