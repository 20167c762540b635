use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use super::{
    BundleReceipt, FulfillmentGateway, GatewayFailure, VerificationRequest, INVALID_CODE,
};
use crate::workflows::bundle::flow::SessionId;
use crate::workflows::bundle::submission::BundleSubmission;

/// Code accepted by [`MockGateway`] for the session it last registered.
pub const MOCK_VERIFICATION_CODE: &str = "1234";

/// Recorded interaction with the mock gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    SendVerificationCode(VerificationRequest),
    VerifyCode { session_id: SessionId, code: String },
    CreateBundle(BundleSubmission),
}

/// Offline stand-in for the webhook. It remembers only the most recent
/// session and accepts [`MOCK_VERIFICATION_CODE`] for it.
#[derive(Debug, Default)]
pub struct MockGateway {
    latency: Option<Duration>,
    current_session: Mutex<Option<SessionId>>,
    calls: Mutex<Vec<GatewayCall>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays every call, which makes the detached verification observable.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().expect("mock call log poisoned").clone()
    }

    fn record(&self, call: GatewayCall) {
        self.calls.lock().expect("mock call log poisoned").push(call);
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl FulfillmentGateway for MockGateway {
    async fn send_verification_code(
        &self,
        request: &VerificationRequest,
    ) -> Result<(), GatewayFailure> {
        self.simulate_latency().await;
        *self.current_session.lock().expect("mock session poisoned") =
            Some(request.session_id.clone());
        info!(
            session_id = %request.session_id,
            code = MOCK_VERIFICATION_CODE,
            "mock verification code issued"
        );
        self.record(GatewayCall::SendVerificationCode(request.clone()));
        Ok(())
    }

    async fn verify_code(
        &self,
        session_id: &SessionId,
        code: &str,
    ) -> Result<(), GatewayFailure> {
        self.simulate_latency().await;
        self.record(GatewayCall::VerifyCode {
            session_id: session_id.clone(),
            code: code.to_string(),
        });

        let known_session = self
            .current_session
            .lock()
            .expect("mock session poisoned")
            .as_ref()
            == Some(session_id);

        if known_session && code == MOCK_VERIFICATION_CODE {
            Ok(())
        } else {
            Err(GatewayFailure::new(
                Some(INVALID_CODE.to_string()),
                Some("Invalid verification code".to_string()),
            ))
        }
    }

    async fn create_bundle(
        &self,
        submission: &BundleSubmission,
    ) -> Result<BundleReceipt, GatewayFailure> {
        self.simulate_latency().await;
        self.record(GatewayCall::CreateBundle(submission.clone()));
        Ok(BundleReceipt {
            bundle_id: Some(format!("bundle_{}", Utc::now().timestamp_millis())),
            invoice_url: None,
            redirect_url: None,
            message: Some("Bundle created successfully!".to_string()),
        })
    }
}
