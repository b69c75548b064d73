use crate::application::client::{PaymentClient, RequestOutcome};
use crate::domain::payment::PaymentRequest;
use crate::domain::ports::ProviderGatewayArc;
use crate::domain::provider::{
    Availability, ProviderDescriptor, ProviderHealth, ProviderKey, rank_providers,
};
use crate::error::{PaymentError, Result};
use std::time::Duration;
use tracing::{debug, info};

struct ProviderEntry {
    descriptor: ProviderDescriptor,
    gateway: ProviderGatewayArc,
    health: ProviderHealth,
}

/// Registry of the payment rails the product can route requests to.
///
/// Dispatch fails fast on unknown or not-yet-live providers; there is no
/// silent fallback to another rail.
#[derive(Default)]
pub struct ProviderDirectory {
    entries: Vec<ProviderEntry>,
}

impl ProviderDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a provider. Re-registering a key replaces the previous
    /// entry and resets its health history.
    pub fn register(&mut self, descriptor: ProviderDescriptor, gateway: ProviderGatewayArc) {
        self.entries.retain(|e| e.descriptor.key != descriptor.key);
        self.entries.push(ProviderEntry {
            descriptor,
            gateway,
            health: ProviderHealth::default(),
        });
    }

    /// Capability listing: every registered provider, live or not.
    pub fn providers(&self) -> Vec<ProviderDescriptor> {
        self.entries.iter().map(|e| e.descriptor.clone()).collect()
    }

    /// Gateway for an active provider. Fails before any network call
    /// when the key is unregistered or not yet live.
    pub fn gateway(&self, key: ProviderKey) -> Result<ProviderGatewayArc> {
        let entry = self
            .entries
            .iter()
            .find(|e| e.descriptor.key == key)
            .ok_or_else(|| PaymentError::ProviderUnavailable(key.to_string()))?;
        if entry.descriptor.availability != Availability::Active {
            return Err(PaymentError::ProviderUnavailable(key.to_string()));
        }
        Ok(entry.gateway.clone())
    }

    /// Deterministic auto-selection over the active providers, ranked by
    /// recorded health.
    pub fn select(&self) -> Result<ProviderKey> {
        let candidates: Vec<_> = self
            .entries
            .iter()
            .filter(|e| e.descriptor.availability == Availability::Active)
            .map(|e| (e.descriptor.key, e.health))
            .collect();
        rank_providers(&candidates)
            .ok_or_else(|| PaymentError::ProviderUnavailable("no active provider".to_string()))
    }

    /// Routes a payment request to `key`, or to the best-ranked active
    /// provider when no explicit choice was made.
    pub async fn dispatch(
        &self,
        key: Option<ProviderKey>,
        request: &PaymentRequest,
    ) -> Result<RequestOutcome> {
        let key = match key {
            Some(key) => key,
            None => self.select()?,
        };
        let gateway = self.gateway(key)?;
        info!(provider = %key, order_id = %request.order_id, "dispatching payment request");
        PaymentClient::new(gateway).create_payment(request).await
    }

    /// Feeds the health history behind auto-selection.
    pub fn record_outcome(&mut self, key: ProviderKey, latency: Duration, success: bool) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.descriptor.key == key) {
            entry.health.record(latency, success);
            debug!(
                provider = %key,
                success_rate = entry.health.success_rate(),
                avg_latency_ms = entry.health.avg_latency_ms(),
                "provider health updated"
            );
        }
    }
}
