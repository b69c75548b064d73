use crate::domain::payment::{PaymentRequest, UnifiedTransaction};
use crate::domain::ports::{CreateOutcome, ProviderGatewayArc};
use crate::error::Result;
use chrono::Utc;
use tracing::{info, warn};

/// Outcome of a payment request as seen by the caller.
#[derive(Debug, Clone)]
pub enum RequestOutcome {
    Accepted(UnifiedTransaction),
    /// Provider declined. `reason` is always non-empty and displayable.
    Rejected { reason: String },
}

/// Issues "create payment request" calls against one provider gateway
/// and normalizes accepted receipts into [`UnifiedTransaction`]s.
///
/// Exactly one outbound call per `create_payment`, no internal retries;
/// retry policy belongs to the caller.
pub struct PaymentClient {
    gateway: ProviderGatewayArc,
}

impl PaymentClient {
    pub fn new(gateway: ProviderGatewayArc) -> Self {
        Self { gateway }
    }

    /// Submits the request and returns either a normalized transaction
    /// or the provider's rejection reason. `Err` means the call itself
    /// failed at the transport level.
    pub async fn create_payment(&self, request: &PaymentRequest) -> Result<RequestOutcome> {
        info!(
            provider = %self.gateway.key(),
            order_id = %request.order_id,
            amount = request.amount.value(),
            "creating payment request"
        );

        match self.gateway.create_request(request).await? {
            CreateOutcome::Accepted(receipt) => {
                let transaction = UnifiedTransaction::normalize(request, receipt, Utc::now());
                info!(
                    transaction_id = %transaction.transaction_id,
                    "payment request accepted"
                );
                Ok(RequestOutcome::Accepted(transaction))
            }
            CreateOutcome::Rejected { reason } => {
                let reason = if reason.trim().is_empty() {
                    "provider rejected the payment request".to_string()
                } else {
                    reason
                };
                warn!(provider = %self.gateway.key(), %reason, "payment request rejected");
                Ok(RequestOutcome::Rejected { reason })
            }
        }
    }
}
