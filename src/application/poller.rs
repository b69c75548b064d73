use crate::domain::payment::{PaymentState, PaymentStatus};
use crate::domain::ports::ProviderGatewayArc;
use crate::error::{PaymentError, Result};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{Instant, sleep};
use tracing::{debug, warn};

/// Polling budget for one transaction.
#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl PollConfig {
    pub fn new(max_attempts: u32, interval: Duration) -> Result<Self> {
        if max_attempts == 0 {
            return Err(PaymentError::Validation(
                "max_attempts must be positive".to_string(),
            ));
        }
        if interval.is_zero() {
            return Err(PaymentError::Validation(
                "interval must be positive".to_string(),
            ));
        }
        Ok(Self {
            max_attempts,
            interval,
        })
    }

    /// Wall-clock bound on one poll run.
    pub fn wall_budget(&self) -> Duration {
        self.interval * self.max_attempts
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: 60,
            interval: Duration::from_secs(5),
        }
    }
}

/// How a poll run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// The final status delivered to the callback: a provider-reported
    /// terminal state, or the synthesized `TIMEOUT`.
    Finished(PaymentStatus),
    /// The run was cancelled before any terminal status; nothing more
    /// was or will be delivered.
    Cancelled,
}

/// Cancels the poller it was taken from. Cheap to clone, safe to call
/// any number of times.
#[derive(Clone)]
pub struct PollHandle {
    cancel: Arc<watch::Sender<bool>>,
}

impl PollHandle {
    pub fn cancel(&self) {
        self.cancel.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancel.borrow()
    }
}

/// Observes settlement progress for one transaction until a terminal
/// state, the polling budget, or cancellation ends the run.
///
/// Each poller owns its own cancellation channel, so concurrent payment
/// attempts never share mutable state. The poller only observes; it
/// never issues create calls and never restarts itself.
pub struct StatusPoller {
    gateway: ProviderGatewayArc,
    cancel: Arc<watch::Sender<bool>>,
}

impl StatusPoller {
    pub fn new(gateway: ProviderGatewayArc) -> Self {
        let (cancel, _) = watch::channel(false);
        Self {
            gateway,
            cancel: Arc::new(cancel),
        }
    }

    pub fn handle(&self) -> PollHandle {
        PollHandle {
            cancel: self.cancel.clone(),
        }
    }

    /// Runs the poll loop, invoking `on_status` with every observation.
    ///
    /// One status query per tick, and the loop awaits each response
    /// before the next tick can start, so at most one query is ever in
    /// flight. Observations are delivered in increasing attempt order
    /// and never after a terminal one.
    ///
    /// A transport error on a tick is "no information": it is logged,
    /// consumes no attempt, and the query is retried on the next tick
    /// until the wall-clock budget runs out. When the budget is
    /// exhausted while the payment is still pending, the poller
    /// synthesizes a single `TIMEOUT` status; that is the only state it
    /// manufactures rather than receives.
    pub async fn run<F>(
        &self,
        transaction_id: &str,
        config: PollConfig,
        mut on_status: F,
    ) -> Result<PollOutcome>
    where
        F: FnMut(PaymentStatus),
    {
        let mut cancelled = self.cancel.subscribe();
        if *cancelled.borrow_and_update() {
            return Ok(PollOutcome::Cancelled);
        }

        let deadline = Instant::now() + config.wall_budget();
        let mut attempt: u32 = 0;

        loop {
            tokio::select! {
                _ = sleep(config.interval) => {}
                _ = cancelled.changed() => {}
            }
            if *cancelled.borrow() {
                debug!(transaction_id, "polling cancelled");
                return Ok(PollOutcome::Cancelled);
            }

            let observed = tokio::select! {
                observed = self.gateway.query_status(transaction_id) => observed,
                _ = cancelled.changed() => {
                    debug!(transaction_id, "polling cancelled with query in flight");
                    return Ok(PollOutcome::Cancelled);
                }
            };
            // A response that raced the cancel must not reach the callback.
            if *cancelled.borrow() {
                return Ok(PollOutcome::Cancelled);
            }

            match observed {
                Ok(state) => {
                    attempt += 1;
                    let status = PaymentStatus {
                        transaction_id: transaction_id.to_string(),
                        state,
                        attempt,
                        observed_at: Utc::now(),
                    };
                    debug!(transaction_id, attempt, %state, "status observed");
                    on_status(status.clone());

                    if state.is_terminal() {
                        return Ok(PollOutcome::Finished(status));
                    }
                    if attempt >= config.max_attempts {
                        return Ok(self.give_up(transaction_id, attempt, &mut on_status));
                    }
                }
                Err(err) => {
                    warn!(transaction_id, error = %err, "status query failed, retrying next tick");
                    if Instant::now() >= deadline {
                        return Ok(self.give_up(transaction_id, attempt, &mut on_status));
                    }
                }
            }
        }
    }

    fn give_up<F>(&self, transaction_id: &str, attempt: u32, on_status: &mut F) -> PollOutcome
    where
        F: FnMut(PaymentStatus),
    {
        let status = PaymentStatus {
            transaction_id: transaction_id.to_string(),
            state: PaymentState::Timeout,
            attempt,
            observed_at: Utc::now(),
        };
        debug!(transaction_id, attempt, "polling budget exhausted");
        on_status(status.clone());
        PollOutcome::Finished(status)
    }
}
