use std::collections::BTreeSet;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::workflows::bundle::catalog::{reference, ProductId};

/// Fixed-price package with a pre-provisioned checkout link. Applies only
/// when the selection is exactly `products`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpecialBundleOffer {
    pub products: BTreeSet<ProductId>,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub final_amount: Decimal,
    pub checkout_url: String,
}

impl SpecialBundleOffer {
    pub fn reference() -> Self {
        Self {
            products: reference::special_bundle_products().into_iter().collect(),
            subtotal: dec!(184),
            discount_amount: dec!(35),
            final_amount: dec!(149),
            checkout_url: reference::SPECIAL_BUNDLE_CHECKOUT_URL.to_string(),
        }
    }

    pub fn with_checkout_url(mut self, checkout_url: impl Into<String>) -> Self {
        self.checkout_url = checkout_url.into();
        self
    }

    /// Exact set equality; order and supersets do not qualify.
    pub fn matches(&self, selected: &[ProductId]) -> bool {
        if selected.len() != self.products.len() {
            return false;
        }
        let selected: BTreeSet<ProductId> = selected.iter().copied().collect();
        selected == self.products
    }
}
