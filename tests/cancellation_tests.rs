mod common;

use common::{recorder, status_log};
use qrpay::application::poller::{PollConfig, PollOutcome, StatusPoller};
use qrpay::domain::provider::ProviderKey;
use qrpay::infrastructure::simulated::SimulatedGateway;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

#[tokio::test]
async fn test_cancel_stops_future_ticks() {
    // PENDING forever; only cancellation can end this run.
    let gateway = Arc::new(SimulatedGateway::new(ProviderKey::Qris));
    let poller = StatusPoller::new(gateway.clone());
    let handle = poller.handle();

    let log = status_log();
    let on_status = recorder(&log);
    let config = PollConfig::new(100, Duration::from_millis(20)).unwrap();
    let run = tokio::spawn(async move { poller.run("qris-ORDER-1", config, on_status).await });

    // Let a few observations land, then cancel.
    sleep(Duration::from_millis(70)).await;
    handle.cancel();

    let outcome = run.await.unwrap().unwrap();
    assert_eq!(outcome, PollOutcome::Cancelled);

    let seen = log.lock().unwrap().len();
    assert!(seen >= 1);

    // Nothing arrives after cancellation, ever.
    sleep(Duration::from_millis(100)).await;
    assert_eq!(log.lock().unwrap().len(), seen);
    assert!(handle.is_cancelled());
}

#[tokio::test]
async fn test_cancel_suppresses_in_flight_response() {
    // Responses take far longer than the interval, so the cancel lands
    // while a query is in flight.
    let gateway = Arc::new(
        SimulatedGateway::new(ProviderKey::Qris).with_latency(Duration::from_millis(150)),
    );
    let poller = StatusPoller::new(gateway.clone());
    let handle = poller.handle();

    let log = status_log();
    let on_status = recorder(&log);
    let config = PollConfig::new(100, Duration::from_millis(10)).unwrap();
    let run = tokio::spawn(async move { poller.run("qris-ORDER-1", config, on_status).await });

    // First tick fires at ~10ms; its query resolves at ~160ms.
    sleep(Duration::from_millis(50)).await;
    handle.cancel();

    let outcome = run.await.unwrap().unwrap();
    assert_eq!(outcome, PollOutcome::Cancelled);
    assert_eq!(gateway.query_count(), 1);

    // The in-flight response resolves after this sleep; it must not
    // reach the callback.
    sleep(Duration::from_millis(200)).await;
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_cancel_is_idempotent() {
    let gateway = Arc::new(SimulatedGateway::new(ProviderKey::Qris));
    let poller = StatusPoller::new(gateway);
    let handle = poller.handle();

    handle.cancel();
    handle.cancel();
    handle.clone().cancel();

    let config = PollConfig::new(5, Duration::from_millis(10)).unwrap();
    let outcome = poller.run("qris-ORDER-1", config, |_| {}).await.unwrap();
    assert_eq!(outcome, PollOutcome::Cancelled);
}

#[tokio::test]
async fn test_separate_pollers_do_not_share_cancellation() {
    let gateway = Arc::new(SimulatedGateway::new(ProviderKey::Qris));
    let cancelled = StatusPoller::new(gateway.clone());
    let running = StatusPoller::new(gateway);

    cancelled.handle().cancel();
    assert!(!running.handle().is_cancelled());
}
