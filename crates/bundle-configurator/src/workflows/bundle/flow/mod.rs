//! Four-step checkout flow: contact → code → products → confirmation.
//!
//! [`ConfiguratorFlow`] is owned by whoever drives the storefront. Every
//! mutating operation takes `&mut self`, so a flow can never have two
//! verifications or submissions in flight at once.

mod contact;
mod session;

pub use contact::{suggest_email_domains, ContactDetails};
pub use session::{SessionId, VerificationSession};

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::catalog::{Product, ProductId};
use super::gateway::{
    spawn_verification, BundleReceipt, DetachedTask, DetachedTaskError, FulfillmentGateway,
    GatewayFailure, VerificationRequest,
};
use super::pricing::{EligibilityView, PricingEngine};
use super::selection::{SelectionError, SelectionState};
use super::submission::{BundleSubmission, LineItem, SubmissionError};

/// Position in the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowStep {
    EnteringContact,
    AwaitingCode,
    SelectingProducts,
    Confirmed,
}

impl FlowStep {
    pub const COUNT: u8 = 4;

    /// 1-based position shown as "Step n of 4".
    pub fn number(self) -> u8 {
        match self {
            FlowStep::EnteringContact => 1,
            FlowStep::AwaitingCode => 2,
            FlowStep::SelectingProducts => 3,
            FlowStep::Confirmed => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FlowStep::EnteringContact => "Get Started",
            FlowStep::AwaitingCode => "Verify Email",
            FlowStep::SelectingProducts => "Select Products",
            FlowStep::Confirmed => "Bundle Created",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FlowProgress {
    pub step: u8,
    pub total: u8,
    pub percent: u8,
}

/// Input problems caught before anything is sent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please fill in all fields")]
    MissingContactFields,
    #[error("Please enter a valid email address")]
    MalformedEmail(String),
    #[error("Please enter the verification code")]
    MissingCode,
    #[error("Please select at least one product")]
    EmptySelection,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerificationError {
    /// Wrong or expired code; the customer can correct it.
    #[error("Invalid or expired code. Please try again.")]
    InvalidCode,
    #[error("{0}")]
    Unknown(String),
}

#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Verification(#[from] VerificationError),
    #[error("{}", .0.message.as_deref().unwrap_or("Failed to create bundle"))]
    Gateway(GatewayFailure),
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error(transparent)]
    Submission(SubmissionError),
    #[error("cannot {action} while at step '{}'", .step.label())]
    InvalidTransition {
        step: FlowStep,
        action: &'static str,
    },
    #[error(transparent)]
    Background(#[from] DetachedTaskError),
}

impl From<SubmissionError> for FlowError {
    fn from(err: SubmissionError) -> Self {
        match err {
            SubmissionError::EmptySelection => Self::Validation(ValidationError::EmptySelection),
            other => Self::Submission(other),
        }
    }
}

impl FlowError {
    /// Whether the customer can fix this by editing the form.
    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            FlowError::Validation(_)
                | FlowError::Verification(VerificationError::InvalidCode)
                | FlowError::Selection(_)
        )
    }
}

/// Result of confirming the product step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The selection is the special bundle, which has its own checkout.
    ExternalCheckout { payment_link: String },
    Confirmed(BundleConfirmation),
}

/// What the confirmation step displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BundleConfirmation {
    pub receipt: BundleReceipt,
    pub pricing: EligibilityView,
    pub line_items: Vec<LineItem>,
}

/// Caller-owned state machine for one customer attempt.
#[derive(Debug)]
pub struct ConfiguratorFlow {
    engine: Arc<PricingEngine>,
    gateway: Arc<dyn FulfillmentGateway>,
    step: FlowStep,
    session: Option<VerificationSession>,
    entered_code: String,
    selection: SelectionState,
    confirmation: Option<BundleConfirmation>,
    last_error: Option<String>,
}

impl ConfiguratorFlow {
    pub fn new(engine: Arc<PricingEngine>, gateway: Arc<dyn FulfillmentGateway>) -> Self {
        Self {
            engine,
            gateway,
            step: FlowStep::EnteringContact,
            session: None,
            entered_code: String::new(),
            selection: SelectionState::new(),
            confirmation: None,
            last_error: None,
        }
    }

    pub fn step(&self) -> FlowStep {
        self.step
    }

    pub fn progress(&self) -> FlowProgress {
        let step = self.step.number();
        FlowProgress {
            step,
            total: FlowStep::COUNT,
            percent: ((u16::from(step) * 100) / u16::from(FlowStep::COUNT)) as u8,
        }
    }

    pub fn engine(&self) -> &PricingEngine {
        &self.engine
    }

    pub fn session(&self) -> Option<&VerificationSession> {
        self.session.as_ref()
    }

    /// The code as last typed, kept across failed attempts.
    pub fn entered_code(&self) -> &str {
        &self.entered_code
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn confirmation(&self) -> Option<&BundleConfirmation> {
        self.confirmation.as_ref()
    }

    /// Message to show inline, cleared by the next successful action.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn quote(&self) -> EligibilityView {
        self.engine.quote(&self.selection)
    }

    pub fn available_products(&self) -> Vec<&Product> {
        self.engine.available_products(self.selection.ids())
    }

    /// Step 1. Starts the verification e-mail in the background and moves on
    /// without waiting for it.
    pub fn submit_contact(&mut self, email: &str, name: &str) -> Result<DetachedTask, FlowError> {
        self.expect_step(FlowStep::EnteringContact, "submit contact details")?;

        let contact = ContactDetails::parse(email, name).map_err(|err| self.fail(err.into()))?;
        let session_id = SessionId::generate();
        let request = VerificationRequest {
            customer_email: contact.email.clone(),
            customer_name: contact.name.clone(),
            session_id: session_id.clone(),
        };

        let task = spawn_verification(self.gateway.clone(), request)?;

        info!(%session_id, "contact submitted, awaiting verification code");
        self.session = Some(VerificationSession::new(
            session_id,
            contact.email,
            contact.name,
        ));
        self.entered_code.clear();
        self.last_error = None;
        self.step = FlowStep::AwaitingCode;
        Ok(task)
    }

    /// Step 2. A rejected code leaves the flow where it is with the code kept
    /// for editing.
    pub async fn verify_code(&mut self, code: &str) -> Result<(), FlowError> {
        self.expect_step(FlowStep::AwaitingCode, "verify a code")?;
        self.entered_code = code.to_string();

        let code = code.trim();
        if code.is_empty() {
            return Err(self.fail(ValidationError::MissingCode.into()));
        }

        let session_id = match &self.session {
            Some(session) => session.session_id.clone(),
            None => {
                return Err(FlowError::InvalidTransition {
                    step: self.step,
                    action: "verify a code without a session",
                })
            }
        };

        match self.gateway.verify_code(&session_id, code).await {
            Ok(()) => {
                if let Some(session) = self.session.as_mut() {
                    session.mark_verified(code.to_string());
                }
                info!(%session_id, "email verified");
                self.last_error = None;
                self.step = FlowStep::SelectingProducts;
                Ok(())
            }
            Err(failure) => {
                warn!(%session_id, error = %failure, "verification rejected");
                let err = if failure.is_invalid_code() {
                    VerificationError::InvalidCode
                } else {
                    VerificationError::Unknown(
                        failure
                            .message
                            .unwrap_or_else(|| "Verification failed".to_string()),
                    )
                };
                Err(self.fail(err.into()))
            }
        }
    }

    /// Step 3. Adds or removes a product and returns the refreshed pricing.
    pub fn toggle_product(&mut self, id: ProductId) -> Result<EligibilityView, FlowError> {
        self.expect_step(FlowStep::SelectingProducts, "change the selection")?;
        let next = self
            .engine
            .toggle(&self.selection, id)
            .map_err(|err| self.fail(err.into()))?;
        self.selection = next;
        self.last_error = None;
        Ok(self.quote())
    }

    pub async fn submit_bundle(&mut self) -> Result<SubmissionOutcome, FlowError> {
        self.submit_bundle_at(Utc::now()).await
    }

    /// Step 3 → 4. The special bundle short-circuits to its own checkout link;
    /// anything else is recorded through the gateway. On failure the selection
    /// is left untouched for another attempt.
    pub async fn submit_bundle_at(
        &mut self,
        timestamp: DateTime<Utc>,
    ) -> Result<SubmissionOutcome, FlowError> {
        self.expect_step(FlowStep::SelectingProducts, "submit a bundle")?;

        if self.selection.is_empty() {
            return Err(self.fail(ValidationError::EmptySelection.into()));
        }

        let pricing = self.quote();
        if pricing.is_special_bundle {
            let payment_link = self.engine.special_offer().checkout_url.clone();
            info!(%payment_link, "special bundle selected, handing off to checkout");
            self.last_error = None;
            return Ok(SubmissionOutcome::ExternalCheckout { payment_link });
        }

        let built = match &self.session {
            Some(session) => BundleSubmission::build(
                session,
                &self.selection,
                self.engine.catalog(),
                &pricing,
                timestamp,
            ),
            None => Err(SubmissionError::Unverified),
        };
        let submission = built.map_err(|err| self.fail(err.into()))?;

        match self.gateway.create_bundle(&submission).await {
            Ok(receipt) => {
                info!(
                    session_id = %submission.session_id,
                    bundle_id = receipt.bundle_id.as_deref().unwrap_or("-"),
                    total_products = submission.total_products,
                    "bundle created"
                );
                let confirmation = BundleConfirmation {
                    receipt,
                    pricing,
                    line_items: submission.products,
                };
                self.confirmation = Some(confirmation.clone());
                self.last_error = None;
                self.step = FlowStep::Confirmed;
                Ok(SubmissionOutcome::Confirmed(confirmation))
            }
            Err(failure) => {
                warn!(session_id = %submission.session_id, error = %failure, "bundle creation failed");
                Err(self.fail(FlowError::Gateway(failure)))
            }
        }
    }

    /// Back to step 1 with everything cleared.
    pub fn reset(&mut self) {
        self.step = FlowStep::EnteringContact;
        self.session = None;
        self.entered_code.clear();
        self.selection.clear();
        self.confirmation = None;
        self.last_error = None;
    }

    fn expect_step(&self, expected: FlowStep, action: &'static str) -> Result<(), FlowError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(FlowError::InvalidTransition {
                step: self.step,
                action,
            })
        }
    }

    fn fail(&mut self, err: FlowError) -> FlowError {
        self.last_error = Some(err.to_string());
        err
    }
}
