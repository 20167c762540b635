//! Product-bundle configurator: catalog, selection rules, pricing, the
//! fulfillment webhook, and the four-step checkout flow that ties them
//! together.
//!
//! Pricing and eligibility are pure functions of the selection and are shared
//! by the flow and the stateless HTTP router. Everything that talks to the
//! outside world goes through [`FulfillmentGateway`].

pub mod catalog;
pub mod flow;
pub mod gateway;
pub mod pricing;
pub mod router;
pub mod selection;
pub mod submission;

#[cfg(test)]
mod tests;

pub use catalog::{
    Catalog, CatalogError, CatalogImportError, CatalogImporter, Product, ProductCategory,
    ProductId,
};
pub use flow::{
    suggest_email_domains, BundleConfirmation, ConfiguratorFlow, ContactDetails, FlowError,
    FlowProgress, FlowStep, SessionId, SubmissionOutcome, ValidationError, VerificationError,
    VerificationSession,
};
pub use gateway::{
    spawn_verification, BundleReceipt, DetachedTask, DetachedTaskError, FulfillmentGateway,
    GatewayCall, GatewayFailure, MockGateway, VerificationRequest, WebhookGateway, INVALID_CODE,
    MOCK_VERIFICATION_CODE, NETWORK_ERROR,
};
pub use pricing::{
    DiscountTable, DiscountTier, EligibilityView, PricingEngine, SpecialBundleOffer, TierBasis,
    TierTableError,
};
pub use router::{bundle_router, QuoteRequest, ToggleRequest, ToggleResponse};
pub use selection::{available_products, ExclusivityRule, SelectionError, SelectionState};
pub use submission::{project_line_items, BundleSubmission, LineItem, SubmissionError};
