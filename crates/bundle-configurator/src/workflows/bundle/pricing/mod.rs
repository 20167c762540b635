//! Pure pricing and eligibility derived from a selection.

mod special;
mod tiers;

pub use special::SpecialBundleOffer;
pub use tiers::{DiscountTable, DiscountTier, TierBasis, TierTableError};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use super::catalog::{Catalog, Product, ProductId};
use super::selection::{available_products, ExclusivityRule, SelectionError, SelectionState};

/// Display/wire precision for currency amounts.
const CURRENCY_SCALE: u32 = 2;

pub(crate) fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Everything the storefront shows next to the product grid, recomputed on
/// every selection change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EligibilityView {
    pub available_ids: Vec<ProductId>,
    pub is_special_bundle: bool,
    pub total_products: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    /// Zero for the special bundle, whose saving is a fixed amount.
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_percentage: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub final_amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_link: Option<String>,
}

/// Catalog plus the rules that price it.
#[derive(Debug, Clone)]
pub struct PricingEngine {
    catalog: Catalog,
    exclusivity: ExclusivityRule,
    special: SpecialBundleOffer,
    tiers: DiscountTable,
}

impl PricingEngine {
    pub fn new(
        catalog: Catalog,
        exclusivity: ExclusivityRule,
        special: SpecialBundleOffer,
        tiers: DiscountTable,
    ) -> Self {
        Self {
            catalog,
            exclusivity,
            special,
            tiers,
        }
    }

    /// Storefront catalog and rules with count-based tiers.
    pub fn reference() -> Self {
        Self::new(
            Catalog::reference(),
            ExclusivityRule::reference(),
            SpecialBundleOffer::reference(),
            DiscountTable::reference(TierBasis::SelectionCount),
        )
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn exclusivity(&self) -> &ExclusivityRule {
        &self.exclusivity
    }

    pub fn special_offer(&self) -> &SpecialBundleOffer {
        &self.special
    }

    pub fn discount_table(&self) -> &DiscountTable {
        &self.tiers
    }

    pub fn available_products(&self, selected: &[ProductId]) -> Vec<&Product> {
        available_products(&self.catalog, &self.exclusivity, selected)
    }

    pub fn is_special_bundle(&self, selected: &[ProductId]) -> bool {
        self.special.matches(selected)
    }

    pub fn toggle(
        &self,
        selection: &SelectionState,
        id: ProductId,
    ) -> Result<SelectionState, SelectionError> {
        selection.toggled(id, &self.catalog, &self.exclusivity)
    }

    pub fn selection_from_ids(
        &self,
        ids: impl IntoIterator<Item = ProductId>,
    ) -> Result<SelectionState, SelectionError> {
        SelectionState::from_ids(ids, &self.catalog, &self.exclusivity)
    }

    /// Prices an arbitrary id list. Ids missing from the catalog add nothing
    /// to the subtotal but still count as selected items.
    pub fn evaluate(&self, selected: &[ProductId]) -> EligibilityView {
        let available_ids = self
            .available_products(selected)
            .into_iter()
            .map(|product| product.id)
            .collect();

        if self.is_special_bundle(selected) {
            return EligibilityView {
                available_ids,
                is_special_bundle: true,
                total_products: selected.len(),
                subtotal: self.special.subtotal,
                discount_percentage: Decimal::ZERO,
                discount_amount: self.special.discount_amount,
                final_amount: self.special.final_amount,
                payment_link: Some(self.special.checkout_url.clone()),
            };
        }

        let subtotal: Decimal = selected
            .iter()
            .map(|&id| {
                self.catalog
                    .get(id)
                    .map(|product| product.price)
                    .unwrap_or(Decimal::ZERO)
            })
            .sum();

        let discount_percentage = self.tiers.percentage_for(selected.len(), subtotal);
        let discount_amount = round_currency(subtotal * discount_percentage / Decimal::ONE_HUNDRED);
        let subtotal = round_currency(subtotal);

        EligibilityView {
            available_ids,
            is_special_bundle: false,
            total_products: selected.len(),
            subtotal,
            discount_percentage,
            discount_amount,
            final_amount: subtotal - discount_amount,
            payment_link: None,
        }
    }

    pub fn quote(&self, selection: &SelectionState) -> EligibilityView {
        self.evaluate(selection.ids())
    }
}
