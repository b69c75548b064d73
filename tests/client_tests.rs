mod common;

use common::sample_request;
use qrpay::application::client::{PaymentClient, RequestOutcome};
use qrpay::domain::provider::ProviderKey;
use qrpay::infrastructure::simulated::SimulatedGateway;
use std::sync::Arc;

#[tokio::test]
async fn test_accepted_request_yields_unified_transaction() {
    let gateway = Arc::new(SimulatedGateway::new(ProviderKey::Qris));
    let client = PaymentClient::new(gateway.clone());

    let request = sample_request(50_000, "ORDER-1");
    let outcome = client.create_payment(&request).await.unwrap();

    match outcome {
        RequestOutcome::Accepted(transaction) => {
            assert_eq!(transaction.order_id, "ORDER-1");
            assert_eq!(transaction.amount.value(), 50_000);
            assert_eq!(transaction.transaction_id, "qris-ORDER-1");
            assert!(transaction.qr_asset.is_some());
            assert_eq!(
                transaction.metadata.get("expires_in_minutes").map(String::as_str),
                Some("30")
            );
        }
        RequestOutcome::Rejected { .. } => panic!("expected acceptance"),
    }
    assert_eq!(gateway.create_count(), 1);
}

#[tokio::test]
async fn test_rejected_request_carries_displayable_reason() {
    let gateway = Arc::new(SimulatedGateway::rejecting(
        ProviderKey::Qris,
        "amount below provider minimum",
    ));
    let client = PaymentClient::new(gateway.clone());

    let request = sample_request(50_000, "ORDER-1");
    let outcome = client.create_payment(&request).await.unwrap();

    match outcome {
        RequestOutcome::Rejected { reason } => {
            assert_eq!(reason, "amount below provider minimum");
        }
        RequestOutcome::Accepted(_) => panic!("expected rejection"),
    }
    // Rejection is a result, not an error, and is never retried.
    assert_eq!(gateway.create_count(), 1);
}

#[tokio::test]
async fn test_outcome_is_exactly_one_of_accepted_or_rejected() {
    for gateway in [
        Arc::new(SimulatedGateway::new(ProviderKey::Qris)),
        Arc::new(SimulatedGateway::rejecting(ProviderKey::Qris, "declined")),
    ] {
        let client = PaymentClient::new(gateway);
        let outcome = client
            .create_payment(&sample_request(50_000, "ORDER-1"))
            .await
            .unwrap();

        match outcome {
            RequestOutcome::Accepted(transaction) => {
                assert!(!transaction.transaction_id.is_empty());
            }
            RequestOutcome::Rejected { reason } => {
                assert!(!reason.trim().is_empty());
            }
        }
    }
}
