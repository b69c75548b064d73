use crate::domain::payment::{PaymentRequest, PaymentState, ProviderReceipt};
use crate::domain::ports::{CreateOutcome, ProviderGateway};
use crate::domain::provider::ProviderKey;
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

/// One scripted reply for a status query tick.
#[derive(Debug, Clone)]
pub enum ScriptedStatus {
    Report(PaymentState),
    /// The query fails at the transport level for this tick.
    TransportError,
}

/// In-process gateway with a scripted status sequence.
///
/// The demo binary and the integration tests drive the whole
/// request-and-poll cycle against this adapter instead of a live
/// provider. Call counters make "no further query was issued" style
/// assertions possible.
#[derive(Clone)]
pub struct SimulatedGateway {
    key: ProviderKey,
    reject_reason: Option<String>,
    fail_create: bool,
    script: Arc<Mutex<VecDeque<ScriptedStatus>>>,
    creates: Arc<AtomicUsize>,
    queries: Arc<AtomicUsize>,
    latency: Duration,
}

impl SimulatedGateway {
    /// Gateway that accepts every create call and reports `PENDING`
    /// forever.
    pub fn new(key: ProviderKey) -> Self {
        Self::with_script(key, Vec::new())
    }

    /// Gateway whose status queries replay `script` in order, then stay
    /// `PENDING`.
    pub fn with_script(key: ProviderKey, script: Vec<ScriptedStatus>) -> Self {
        Self {
            key,
            reject_reason: None,
            fail_create: false,
            script: Arc::new(Mutex::new(script.into())),
            creates: Arc::new(AtomicUsize::new(0)),
            queries: Arc::new(AtomicUsize::new(0)),
            latency: Duration::ZERO,
        }
    }

    /// Gateway that declines every create call with `reason`.
    pub fn rejecting(key: ProviderKey, reason: impl Into<String>) -> Self {
        let mut gateway = Self::new(key);
        gateway.reject_reason = Some(reason.into());
        gateway
    }

    /// Gateway whose create calls fail at the transport level.
    pub fn unreachable(key: ProviderKey) -> Self {
        let mut gateway = Self::new(key);
        gateway.fail_create = true;
        gateway
    }

    /// Adds a fixed delay to every call, simulating network latency.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Number of create calls issued so far.
    pub fn create_count(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    /// Number of status queries issued so far.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProviderGateway for SimulatedGateway {
    fn key(&self) -> ProviderKey {
        self.key
    }

    async fn create_request(&self, request: &PaymentRequest) -> Result<CreateOutcome> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.fail_create {
            return Err(PaymentError::Transport(
                "simulated connection refused".to_string(),
            ));
        }
        if let Some(reason) = &self.reject_reason {
            return Ok(CreateOutcome::Rejected {
                reason: reason.clone(),
            });
        }
        Ok(CreateOutcome::Accepted(ProviderReceipt {
            qr_id: format!("{}-{}", self.key, request.order_id),
            order_id: request.order_id.to_string(),
            amount: request.amount,
            qr_image_url: Some(format!("https://pay.example/qr/{}.png", request.order_id)),
            expires_in_minutes: Some(30),
            extra: BTreeMap::new(),
        }))
    }

    async fn query_status(&self, _transaction_id: &str) -> Result<PaymentState> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let mut script = self.script.lock().await;
        match script.pop_front() {
            Some(ScriptedStatus::Report(state)) => Ok(state),
            Some(ScriptedStatus::TransportError) => Err(PaymentError::Transport(
                "simulated provider outage".to_string(),
            )),
            // Script exhausted: the customer still has not paid.
            None => Ok(PaymentState::Pending),
        }
    }
}
