//! Outbound contract with the automation webhook that delivers verification
//! codes, checks them, and records bundles.
//!
//! Every operation resolves to `Ok` or a [`GatewayFailure`]; transport
//! problems are folded into the failure shape with [`NETWORK_ERROR`] instead
//! of surfacing as a distinct error type.

mod detached;
mod mock;
mod webhook;
pub(crate) mod wire;

pub use detached::{spawn_verification, DetachedTask, DetachedTaskError};
pub use mock::{GatewayCall, MockGateway, MOCK_VERIFICATION_CODE};
pub use webhook::WebhookGateway;

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::flow::SessionId;
use super::submission::BundleSubmission;

/// Wrong or expired verification code.
pub const INVALID_CODE: &str = "INVALID_CODE";
/// Synthetic code for requests that never produced a readable response.
pub const NETWORK_ERROR: &str = "NETWORK_ERROR";

/// Non-success outcome reported by (or on behalf of) the webhook.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", self.describe())]
pub struct GatewayFailure {
    pub code: Option<String>,
    pub message: Option<String>,
}

impl GatewayFailure {
    pub fn new(code: Option<String>, message: Option<String>) -> Self {
        Self { code, message }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self {
            code: Some(NETWORK_ERROR.to_string()),
            message: Some(message.into()),
        }
    }

    pub fn is_invalid_code(&self) -> bool {
        self.code.as_deref() == Some(INVALID_CODE)
    }

    pub fn is_network(&self) -> bool {
        self.code.as_deref() == Some(NETWORK_ERROR)
    }

    pub fn describe(&self) -> String {
        match (&self.code, &self.message) {
            (_, Some(message)) => message.clone(),
            (Some(code), None) => format!("gateway rejected the request ({code})"),
            (None, None) => "gateway rejected the request".to_string(),
        }
    }
}

/// Payload asking the webhook to e-mail a one-time code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRequest {
    pub customer_email: String,
    pub customer_name: String,
    pub session_id: SessionId,
}

/// What the webhook hands back for a recorded bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleReceipt {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl BundleReceipt {
    /// Where the customer should be sent to pay, if anywhere.
    pub fn payment_target(&self) -> Option<&str> {
        self.invoice_url
            .as_deref()
            .or(self.redirect_url.as_deref())
    }
}

/// The three webhook actions.
#[async_trait]
pub trait FulfillmentGateway: Send + Sync + Debug {
    async fn send_verification_code(
        &self,
        request: &VerificationRequest,
    ) -> Result<(), GatewayFailure>;

    async fn verify_code(&self, session_id: &SessionId, code: &str)
        -> Result<(), GatewayFailure>;

    async fn create_bundle(
        &self,
        submission: &BundleSubmission,
    ) -> Result<BundleReceipt, GatewayFailure>;
}
