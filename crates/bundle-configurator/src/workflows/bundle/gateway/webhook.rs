use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use super::wire::{CodeCheck, WebhookRequest, WebhookResponse};
use super::{BundleReceipt, FulfillmentGateway, GatewayFailure, VerificationRequest};
use crate::workflows::bundle::flow::SessionId;
use crate::workflows::bundle::submission::BundleSubmission;

/// `reqwest`-backed client for the automation webhook. No timeout is set
/// beyond the transport default.
#[derive(Debug, Clone)]
pub struct WebhookGateway {
    client: Client,
    url: String,
}

impl WebhookGateway {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), url)
    }

    pub fn with_client(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn post(&self, request: WebhookRequest<'_>) -> Result<WebhookResponse, GatewayFailure> {
        let action = request.action();

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|err| {
                warn!(action, error = %err, "webhook request failed");
                GatewayFailure::network(request.network_failure_message())
            })?;

        let status = response.status();
        debug!(action, %status, "webhook responded");

        response.json::<WebhookResponse>().await.map_err(|err| {
            warn!(action, %status, error = %err, "webhook response was not readable");
            GatewayFailure::network(request.network_failure_message())
        })
    }
}

#[async_trait]
impl FulfillmentGateway for WebhookGateway {
    async fn send_verification_code(
        &self,
        request: &VerificationRequest,
    ) -> Result<(), GatewayFailure> {
        self.post(WebhookRequest::SendVerificationCode(request))
            .await?
            .into_receipt()
            .map(|_| ())
    }

    async fn verify_code(
        &self,
        session_id: &SessionId,
        code: &str,
    ) -> Result<(), GatewayFailure> {
        self.post(WebhookRequest::VerifyCode(CodeCheck {
            session_id,
            verification_code: code,
        }))
        .await?
        .into_receipt()
        .map(|_| ())
    }

    async fn create_bundle(
        &self,
        submission: &BundleSubmission,
    ) -> Result<BundleReceipt, GatewayFailure> {
        self.post(WebhookRequest::CreateBundle(submission))
            .await?
            .into_receipt()
    }
}
