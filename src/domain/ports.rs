use super::payment::{PaymentRequest, PaymentState, ProviderReceipt};
use super::provider::ProviderKey;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Outcome of a create call: the provider either accepts with a receipt
/// or rejects with a displayable reason.
///
/// Transport failures are the only `Err` a gateway method may return;
/// provider-side rejection is a value, not an error.
#[derive(Debug, Clone)]
pub enum CreateOutcome {
    Accepted(ProviderReceipt),
    Rejected { reason: String },
}

#[async_trait]
pub trait ProviderGateway: Send + Sync {
    fn key(&self) -> ProviderKey;

    /// Issues exactly one "create payment request" call.
    async fn create_request(&self, request: &PaymentRequest) -> Result<CreateOutcome>;

    /// Queries settlement state for a previously created transaction.
    async fn query_status(&self, transaction_id: &str) -> Result<PaymentState>;
}

/// Shared gateway handle; the client, poller and directory all observe
/// the same provider through it.
pub type ProviderGatewayArc = Arc<dyn ProviderGateway>;
