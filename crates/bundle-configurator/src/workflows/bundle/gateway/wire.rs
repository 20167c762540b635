use serde::{Deserialize, Serialize};

use super::{BundleReceipt, GatewayFailure, VerificationRequest};
use crate::workflows::bundle::flow::SessionId;
use crate::workflows::bundle::submission::BundleSubmission;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CodeCheck<'a> {
    pub(crate) session_id: &'a SessionId,
    pub(crate) verification_code: &'a str,
}

/// Request body; `action` selects the automation branch.
#[derive(Debug, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub(crate) enum WebhookRequest<'a> {
    SendVerificationCode(&'a VerificationRequest),
    VerifyCode(CodeCheck<'a>),
    CreateBundle(&'a BundleSubmission),
}

impl WebhookRequest<'_> {
    pub(crate) fn action(&self) -> &'static str {
        match self {
            WebhookRequest::SendVerificationCode(_) => "send_verification_code",
            WebhookRequest::VerifyCode(_) => "verify_code",
            WebhookRequest::CreateBundle(_) => "create_bundle",
        }
    }

    /// Message reported when the call never yields a readable response.
    pub(crate) fn network_failure_message(&self) -> &'static str {
        match self {
            WebhookRequest::SendVerificationCode(_) => "Failed to send verification code",
            WebhookRequest::VerifyCode(_) => "Failed to verify code",
            WebhookRequest::CreateBundle(_) => "Failed to create bundle",
        }
    }
}

/// Response body shared by every action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WebhookResponse {
    #[serde(default)]
    pub(crate) success: bool,
    #[serde(default)]
    pub(crate) error: Option<String>,
    #[serde(default)]
    pub(crate) message: Option<String>,
    #[serde(default)]
    pub(crate) bundle_id: Option<String>,
    #[serde(default)]
    pub(crate) invoice_url: Option<String>,
    #[serde(default)]
    pub(crate) redirect_url: Option<String>,
}

impl WebhookResponse {
    pub(crate) fn into_receipt(self) -> Result<BundleReceipt, GatewayFailure> {
        if !self.success {
            return Err(GatewayFailure::new(self.error, self.message));
        }
        Ok(BundleReceipt {
            bundle_id: self.bundle_id,
            invoice_url: self.invoice_url,
            redirect_url: self.redirect_url,
            message: self.message,
        })
    }
}
