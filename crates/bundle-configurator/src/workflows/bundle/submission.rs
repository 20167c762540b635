use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

use super::catalog::{Catalog, ProductId};
use super::flow::{SessionId, VerificationSession};
use super::pricing::EligibilityView;
use super::selection::SelectionState;

/// One ordered row of a bundle order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub sequence_number: u32,
    pub price_id: String,
    pub product_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: u32,
}

/// Maps the selection, in selection order, onto 1-based line items.
pub fn project_line_items(
    selection: &SelectionState,
    catalog: &Catalog,
) -> Result<Vec<LineItem>, SubmissionError> {
    selection
        .ids()
        .iter()
        .enumerate()
        .map(|(index, &id)| {
            let product = catalog.get(id).ok_or(SubmissionError::UnknownProduct(id))?;
            Ok(LineItem {
                sequence_number: index as u32 + 1,
                price_id: product.price_id.clone(),
                product_name: product.name.clone(),
                price: product.price,
                quantity: 1,
            })
        })
        .collect()
}

/// Snapshot sent once to the gateway when the customer confirms a bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleSubmission {
    pub session_id: SessionId,
    pub customer_name: String,
    pub customer_email: String,
    pub verification_code: String,
    pub products: Vec<LineItem>,
    pub total_products: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_percentage: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub final_amount: Decimal,
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl BundleSubmission {
    pub fn build(
        session: &VerificationSession,
        selection: &SelectionState,
        catalog: &Catalog,
        pricing: &EligibilityView,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, SubmissionError> {
        if selection.is_empty() {
            return Err(SubmissionError::EmptySelection);
        }
        let verification_code = session
            .code
            .clone()
            .filter(|_| session.verified)
            .ok_or(SubmissionError::Unverified)?;

        Ok(Self {
            session_id: session.session_id.clone(),
            customer_name: session.name.clone(),
            customer_email: session.email.clone(),
            verification_code,
            products: project_line_items(selection, catalog)?,
            total_products: selection.len(),
            total_amount: pricing.subtotal,
            discount_percentage: pricing.discount_percentage,
            discount_amount: pricing.discount_amount,
            final_amount: pricing.final_amount,
            timestamp,
        })
    }
}

fn serialize_timestamp<S: Serializer>(
    timestamp: &DateTime<Utc>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&timestamp.to_rfc3339_opts(SecondsFormat::Millis, true))
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("select at least one product")]
    EmptySelection,
    #[error("email has not been verified")]
    Unverified,
    #[error("product {0} is not in the catalog")]
    UnknownProduct(ProductId),
}
