use qrpay::domain::payment::{Amount, OrderId, PaymentRequest, PaymentState, PaymentStatus};
use qrpay::infrastructure::simulated::ScriptedStatus;
use std::sync::{Arc, Mutex};

/// Shared observation log for callbacks that outlive the test's stack
/// frame (e.g. pollers running in a spawned task).
pub type StatusLog = Arc<Mutex<Vec<PaymentStatus>>>;

pub fn status_log() -> StatusLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn recorder(log: &StatusLog) -> impl FnMut(PaymentStatus) + Send + 'static {
    let log = Arc::clone(log);
    move |status| log.lock().unwrap().push(status)
}

pub fn sample_request(amount: i64, order_id: &str) -> PaymentRequest {
    PaymentRequest::new(
        Amount::new(amount).unwrap(),
        OrderId::new(order_id).unwrap(),
        "consultation booking",
        None,
    )
    .unwrap()
}

/// `n` PENDING ticks followed by one terminal state.
pub fn pending_then(n: usize, terminal: PaymentState) -> Vec<ScriptedStatus> {
    let mut script = vec![ScriptedStatus::Report(PaymentState::Pending); n];
    script.push(ScriptedStatus::Report(terminal));
    script
}
