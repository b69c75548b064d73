mod common;

use common::sample_request;
use qrpay::domain::payment::PaymentState;
use qrpay::domain::ports::{CreateOutcome, ProviderGatewayArc};
use qrpay::domain::provider::ProviderKey;
use qrpay::infrastructure::simulated::SimulatedGateway;
use std::sync::Arc;

#[tokio::test]
async fn test_gateway_as_trait_object_across_tasks() {
    let gateway: ProviderGatewayArc = Arc::new(SimulatedGateway::new(ProviderKey::Qris));

    // Verify Send + Sync by using the shared handle from spawned tasks.
    let create_gateway = gateway.clone();
    let create = tokio::spawn(async move {
        create_gateway
            .create_request(&sample_request(50_000, "ORDER-1"))
            .await
            .unwrap()
    });

    let status_gateway = gateway.clone();
    let status = tokio::spawn(async move {
        status_gateway.query_status("qris-ORDER-1").await.unwrap()
    });

    match create.await.unwrap() {
        CreateOutcome::Accepted(receipt) => assert_eq!(receipt.qr_id, "qris-ORDER-1"),
        CreateOutcome::Rejected { .. } => panic!("expected acceptance"),
    }
    assert_eq!(status.await.unwrap(), PaymentState::Pending);
    assert_eq!(gateway.key(), ProviderKey::Qris);
}
