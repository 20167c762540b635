use std::sync::Arc;

use rust_decimal_macros::dec;
use serde_json::json;

use super::common::*;

use crate::workflows::bundle::catalog::reference;
use crate::workflows::bundle::{
    ConfiguratorFlow, FlowError, FlowStep, GatewayCall, GatewayFailure, MockGateway, ProductId,
    SubmissionOutcome, ValidationError, VerificationError, INVALID_CODE,
};

#[tokio::test]
async fn happy_path_reaches_confirmation() {
    let gateway = Arc::new(MockGateway::new());
    let mut flow = verified_flow(gateway.clone()).await;
    assert_eq!(flow.progress().step, 3);

    flow.toggle_product(ProductId(2)).expect("select course");
    let view = flow.toggle_product(ProductId(5)).expect("select motions");
    assert_eq!(view.subtotal, dec!(55));

    let outcome = flow
        .submit_bundle_at(submitted_at())
        .await
        .expect("bundle created");
    let confirmation = match outcome {
        SubmissionOutcome::Confirmed(confirmation) => confirmation,
        other => panic!("expected confirmation, got {other:?}"),
    };

    assert_eq!(flow.step(), FlowStep::Confirmed);
    assert_eq!(flow.progress().percent, 100);
    assert_eq!(
        confirmation.receipt.message.as_deref(),
        Some("Bundle created successfully!")
    );
    assert_eq!(confirmation.line_items.len(), 2);
    assert_eq!(confirmation.line_items[0].sequence_number, 1);
    assert_eq!(confirmation.line_items[0].product_name, "Advanced 3d Product Animation Course");
    assert_eq!(confirmation.line_items[1].sequence_number, 2);
    assert_eq!(flow.confirmation(), Some(&confirmation));

    let calls = gateway.calls();
    assert_eq!(calls.len(), 3);
    assert!(matches!(calls[0], GatewayCall::SendVerificationCode(_)));
    assert!(matches!(calls[1], GatewayCall::VerifyCode { .. }));
    assert!(matches!(calls[2], GatewayCall::CreateBundle(_)));
}

#[tokio::test]
async fn submission_payload_snapshots_selection_and_pricing() {
    let gateway = Arc::new(MockGateway::new());
    let mut flow = verified_flow(gateway.clone()).await;
    flow.toggle_product(ProductId(3)).expect("select");
    flow.toggle_product(ProductId(2)).expect("select");
    flow.submit_bundle_at(submitted_at()).await.expect("created");

    let submission = gateway
        .calls()
        .into_iter()
        .find_map(|call| match call {
            GatewayCall::CreateBundle(submission) => Some(submission),
            _ => None,
        })
        .expect("bundle submitted");

    let body = serde_json::to_value(&submission).expect("serializes");
    assert_eq!(body["customerName"], json!("Ada Lovelace"));
    assert_eq!(body["customerEmail"], json!("ada@example.com"));
    assert_eq!(body["verificationCode"], json!("1234"));
    assert_eq!(body["totalProducts"], json!(2));
    assert_eq!(body["totalAmount"], json!(65.0));
    assert_eq!(body["discountPercentage"], json!(0.0));
    assert_eq!(body["finalAmount"], json!(65.0));
    assert_eq!(body["timestamp"], json!("2025-06-01T12:00:00.000Z"));
    assert_eq!(
        body["products"][0],
        json!({
            "sequenceNumber": 1,
            "priceId": "price_1PmGneFXBh2FfiM2n4WQUuj4",
            "productName": "Textify: Callouts & Titles",
            "price": 25.0,
            "quantity": 1,
        })
    );
    assert_eq!(
        body["sessionId"],
        json!(flow.session().expect("session").session_id.as_str())
    );
}

#[tokio::test]
async fn incomplete_contact_details_stay_on_first_step() {
    let mut flow = ConfiguratorFlow::new(engine(), Arc::new(MockGateway::new()));

    let err = flow.submit_contact("  ", "Ada").expect_err("missing email");
    assert!(matches!(
        err,
        FlowError::Validation(ValidationError::MissingContactFields)
    ));
    assert_eq!(flow.step(), FlowStep::EnteringContact);
    assert_eq!(flow.last_error(), Some("Please fill in all fields"));
    assert!(flow.session().is_none());

    let err = flow.submit_contact("not-an-email", "Ada").expect_err("malformed");
    assert!(matches!(
        err,
        FlowError::Validation(ValidationError::MalformedEmail(_))
    ));
}

#[tokio::test]
async fn contact_step_does_not_wait_for_the_code_email() {
    let gateway = Arc::new(MockGateway::with_latency(std::time::Duration::from_millis(200)));
    let mut flow = ConfiguratorFlow::new(engine(), gateway.clone());

    let task = flow
        .submit_contact("ada@example.com", "Ada")
        .expect("contact accepted");
    assert_eq!(flow.step(), FlowStep::AwaitingCode);
    assert!(!task.is_finished());
    assert!(gateway.calls().is_empty());

    task.join().await.expect("dispatch completes");
    assert_eq!(gateway.calls().len(), 1);
}

#[tokio::test]
async fn failed_code_dispatch_is_not_reported_to_the_customer() {
    let gateway = Arc::new(ScriptedGateway::default());
    gateway.fail_dispatch(GatewayFailure::network("Failed to send verification code"));
    let mut flow = ConfiguratorFlow::new(engine(), gateway);

    let task = flow
        .submit_contact("ada@example.com", "Ada")
        .expect("contact accepted");
    task.join().await.expect("task ran to completion");

    assert_eq!(flow.step(), FlowStep::AwaitingCode);
    assert!(flow.last_error().is_none());
}

#[tokio::test]
async fn wrong_code_keeps_the_customer_on_the_code_step() {
    let gateway = Arc::new(MockGateway::new());
    let mut flow = ConfiguratorFlow::new(engine(), gateway);
    flow.submit_contact("ada@example.com", "Ada")
        .expect("contact accepted")
        .join()
        .await
        .expect("dispatched");

    let err = flow.verify_code("9999").await.expect_err("wrong code");
    assert!(matches!(
        err,
        FlowError::Verification(VerificationError::InvalidCode)
    ));
    assert_eq!(flow.step(), FlowStep::AwaitingCode);
    assert_eq!(flow.entered_code(), "9999");
    assert_eq!(
        flow.last_error(),
        Some("Invalid or expired code. Please try again.")
    );
    assert!(!flow.session().expect("session").verified);

    flow.verify_code(" 1234 ").await.expect("corrected code");
    assert_eq!(flow.step(), FlowStep::SelectingProducts);
    assert!(flow.last_error().is_none());
    let session = flow.session().expect("session");
    assert!(session.verified);
    assert_eq!(session.code.as_deref(), Some("1234"));
}

#[tokio::test]
async fn blank_code_is_rejected_before_calling_the_gateway() {
    let gateway = Arc::new(MockGateway::new());
    let mut flow = ConfiguratorFlow::new(engine(), gateway.clone());
    flow.submit_contact("ada@example.com", "Ada")
        .expect("contact accepted")
        .join()
        .await
        .expect("dispatched");

    let err = flow.verify_code("   ").await.expect_err("blank");
    assert!(matches!(
        err,
        FlowError::Validation(ValidationError::MissingCode)
    ));
    assert_eq!(gateway.calls().len(), 1);
}

#[tokio::test]
async fn other_verification_failures_surface_the_gateway_message() {
    let gateway = Arc::new(ScriptedGateway::default());
    gateway.fail_verify(GatewayFailure::new(
        Some("SESSION_EXPIRED".to_string()),
        Some("Session expired".to_string()),
    ));
    gateway.fail_verify(GatewayFailure::new(None, None));
    gateway.fail_verify(GatewayFailure::new(Some(INVALID_CODE.to_string()), None));
    let mut flow = ConfiguratorFlow::new(engine(), gateway);
    flow.submit_contact("ada@example.com", "Ada")
        .expect("contact accepted")
        .join()
        .await
        .expect("dispatched");

    let err = flow.verify_code("1234").await.expect_err("expired");
    assert!(matches!(
        err,
        FlowError::Verification(VerificationError::Unknown(ref message)) if message == "Session expired"
    ));

    let err = flow.verify_code("1234").await.expect_err("unexplained");
    assert_eq!(err.to_string(), "Verification failed");

    let err = flow.verify_code("1234").await.expect_err("invalid");
    assert!(err.is_user_correctable());
    assert_eq!(flow.step(), FlowStep::AwaitingCode);
}

#[tokio::test]
async fn steps_cannot_be_skipped() {
    let mut flow = ConfiguratorFlow::new(engine(), Arc::new(MockGateway::new()));

    let err = flow.toggle_product(ProductId(2)).expect_err("not verified");
    assert!(matches!(
        err,
        FlowError::InvalidTransition {
            step: FlowStep::EnteringContact,
            ..
        }
    ));
    let err = flow.verify_code("1234").await.expect_err("no contact yet");
    assert!(matches!(err, FlowError::InvalidTransition { .. }));
    let err = flow.submit_bundle().await.expect_err("no selection step yet");
    assert!(matches!(err, FlowError::InvalidTransition { .. }));
    assert!(flow.last_error().is_none());
}

#[tokio::test]
async fn special_bundle_hands_off_to_external_checkout() {
    let gateway = Arc::new(MockGateway::new());
    let mut flow = verified_flow(gateway.clone()).await;

    for id in [2, 1, 3] {
        flow.toggle_product(ProductId(id)).expect("select");
    }
    let quote = flow.quote();
    assert!(quote.is_special_bundle);
    assert_eq!(quote.final_amount, dec!(149));

    let outcome = flow.submit_bundle().await.expect("handoff");
    assert_eq!(
        outcome,
        SubmissionOutcome::ExternalCheckout {
            payment_link: reference::SPECIAL_BUNDLE_CHECKOUT_URL.to_string(),
        }
    );
    assert_eq!(flow.step(), FlowStep::SelectingProducts);
    assert!(!gateway
        .calls()
        .iter()
        .any(|call| matches!(call, GatewayCall::CreateBundle(_))));
}

#[tokio::test]
async fn empty_selection_cannot_be_submitted() {
    let mut flow = verified_flow(Arc::new(MockGateway::new())).await;

    let err = flow.submit_bundle().await.expect_err("nothing selected");
    assert!(matches!(
        err,
        FlowError::Validation(ValidationError::EmptySelection)
    ));
    assert_eq!(flow.last_error(), Some("Please select at least one product"));
    assert_eq!(flow.step(), FlowStep::SelectingProducts);
}

#[tokio::test]
async fn excluded_toggle_reports_an_error_and_keeps_selection() {
    let mut flow = verified_flow(Arc::new(MockGateway::new())).await;
    flow.toggle_product(ProductId(2)).expect("select");
    flow.toggle_product(ProductId(5)).expect("select");

    flow.toggle_product(ProductId(1)).expect("primary");
    assert_eq!(flow.selection().ids(), ids(&[1, 2]).as_slice());
    assert_eq!(flow.available_products().len(), 3);

    let err = flow.toggle_product(ProductId(5)).expect_err("excluded");
    assert!(matches!(err, FlowError::Selection(_)));
    assert!(flow.last_error().is_some());
    assert_eq!(flow.selection().ids(), ids(&[1, 2]).as_slice());
}

#[tokio::test]
async fn failed_bundle_submission_can_be_retried() {
    let gateway = Arc::new(ScriptedGateway::default());
    gateway.fail_create(GatewayFailure::network("Failed to create bundle"));
    let mut flow = ConfiguratorFlow::new(engine(), gateway.clone());
    flow.submit_contact("ada@example.com", "Ada")
        .expect("contact")
        .join()
        .await
        .expect("dispatched");
    flow.verify_code("4321").await.expect("scripted gateway accepts");
    flow.toggle_product(ProductId(4)).expect("select");

    let err = flow.submit_bundle().await.expect_err("network failure");
    assert!(matches!(err, FlowError::Gateway(ref failure) if failure.is_network()));
    assert_eq!(flow.step(), FlowStep::SelectingProducts);
    assert_eq!(flow.selection().ids(), ids(&[4]).as_slice());
    assert_eq!(flow.last_error(), Some("Failed to create bundle"));

    let outcome = flow.submit_bundle().await.expect("retry succeeds");
    match outcome {
        SubmissionOutcome::Confirmed(confirmation) => {
            assert_eq!(
                confirmation.receipt.payment_target(),
                Some("https://invoice.example/inv_1")
            );
        }
        other => panic!("expected confirmation, got {other:?}"),
    }
    assert_eq!(flow.step(), FlowStep::Confirmed);
    assert!(flow.last_error().is_none());

    let submissions = gateway.submissions();
    assert_eq!(submissions.len(), 2);
    assert_eq!(submissions[0].session_id, submissions[1].session_id);
}

#[tokio::test]
async fn reset_returns_to_a_blank_first_step() {
    let mut flow = verified_flow(Arc::new(MockGateway::new())).await;
    flow.toggle_product(ProductId(6)).expect("select");
    flow.submit_bundle().await.expect("created");
    assert_eq!(flow.step(), FlowStep::Confirmed);

    let err = flow.toggle_product(ProductId(7)).expect_err("confirmed is terminal");
    assert!(matches!(err, FlowError::InvalidTransition { .. }));

    flow.reset();
    assert_eq!(flow.step(), FlowStep::EnteringContact);
    assert_eq!(flow.progress().step, 1);
    assert!(flow.session().is_none());
    assert!(flow.selection().is_empty());
    assert!(flow.confirmation().is_none());
    assert_eq!(flow.entered_code(), "");

    let task = flow
        .submit_contact("grace@example.com", "Grace")
        .expect("fresh attempt");
    task.join().await.expect("dispatched");
    assert_eq!(flow.step(), FlowStep::AwaitingCode);
}
