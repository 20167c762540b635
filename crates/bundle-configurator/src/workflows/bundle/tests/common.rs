use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::bundle::{
    BundleReceipt, BundleSubmission, ConfiguratorFlow, FlowStep, FulfillmentGateway,
    GatewayFailure, MockGateway, PricingEngine, ProductId, SelectionState, SessionId,
    VerificationRequest, MOCK_VERIFICATION_CODE,
};

pub(super) fn engine() -> Arc<PricingEngine> {
    Arc::new(PricingEngine::reference())
}

pub(super) fn ids(raw: &[u32]) -> Vec<ProductId> {
    raw.iter().copied().map(ProductId).collect()
}

pub(super) fn selection(engine: &PricingEngine, raw: &[u32]) -> SelectionState {
    engine
        .selection_from_ids(ids(raw))
        .expect("fixture selection is valid")
}

pub(super) fn submitted_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0)
        .single()
        .expect("valid instant")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

/// Drives a flow backed by the mock gateway through contact and code entry.
pub(super) async fn verified_flow(gateway: Arc<MockGateway>) -> ConfiguratorFlow {
    let mut flow = ConfiguratorFlow::new(engine(), gateway);
    flow.submit_contact("ada@example.com", "Ada Lovelace")
        .expect("contact accepted")
        .join()
        .await
        .expect("verification dispatched");
    flow.verify_code(MOCK_VERIFICATION_CODE)
        .await
        .expect("code accepted");
    assert_eq!(flow.step(), FlowStep::SelectingProducts);
    flow
}

/// Gateway whose answers are queued up front. An empty queue means success.
#[derive(Debug, Default)]
pub(super) struct ScriptedGateway {
    dispatch: Mutex<VecDeque<Result<(), GatewayFailure>>>,
    verify: Mutex<VecDeque<Result<(), GatewayFailure>>>,
    create: Mutex<VecDeque<Result<BundleReceipt, GatewayFailure>>>,
    submissions: Mutex<Vec<BundleSubmission>>,
}

impl ScriptedGateway {
    pub(super) fn fail_dispatch(&self, failure: GatewayFailure) {
        self.dispatch.lock().unwrap().push_back(Err(failure));
    }

    pub(super) fn fail_verify(&self, failure: GatewayFailure) {
        self.verify.lock().unwrap().push_back(Err(failure));
    }

    pub(super) fn fail_create(&self, failure: GatewayFailure) {
        self.create.lock().unwrap().push_back(Err(failure));
    }

    pub(super) fn submissions(&self) -> Vec<BundleSubmission> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait]
impl FulfillmentGateway for ScriptedGateway {
    async fn send_verification_code(
        &self,
        _request: &VerificationRequest,
    ) -> Result<(), GatewayFailure> {
        self.dispatch.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }

    async fn verify_code(&self, _session_id: &SessionId, _code: &str) -> Result<(), GatewayFailure> {
        self.verify.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }

    async fn create_bundle(
        &self,
        submission: &BundleSubmission,
    ) -> Result<BundleReceipt, GatewayFailure> {
        self.submissions.lock().unwrap().push(submission.clone());
        self.create.lock().unwrap().pop_front().unwrap_or_else(|| {
            Ok(BundleReceipt {
                bundle_id: Some("bundle_test".to_string()),
                invoice_url: Some("https://invoice.example/inv_1".to_string()),
                redirect_url: None,
                message: Some("Bundle created".to_string()),
            })
        })
    }
}
