use crate::error::{PaymentError, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Fallback validity window when neither the request nor the provider
/// names one.
pub const DEFAULT_EXPIRY_MINUTES: u32 = 15;

/// A positive monetary amount in the smallest currency unit.
///
/// Amounts stay integral end to end; scaling for display happens only at
/// the presentation boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Amount(i64);

impl Amount {
    pub fn new(value: i64) -> Result<Self> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(PaymentError::Validation(
                "amount must be positive".to_string(),
            ))
        }
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for Amount {
    type Error = PaymentError;

    fn try_from(value: i64) -> Result<Self> {
        Self::new(value)
    }
}

/// Caller-supplied order identifier, unique per payment attempt.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(String);

impl OrderId {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(PaymentError::Validation(
                "order id must not be empty".to_string(),
            ));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Input to initiate a payment. Immutable once submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub amount: Amount,
    pub order_id: OrderId,
    pub description: String,
    /// Validity window override in minutes. `None` lets the provider
    /// decide.
    pub expiry_minutes: Option<u32>,
}

impl PaymentRequest {
    pub fn new(
        amount: Amount,
        order_id: OrderId,
        description: impl Into<String>,
        expiry_minutes: Option<u32>,
    ) -> Result<Self> {
        if expiry_minutes == Some(0) {
            return Err(PaymentError::Validation(
                "expiry_minutes must be positive".to_string(),
            ));
        }
        Ok(Self {
            amount,
            order_id,
            description: description.into(),
            expiry_minutes,
        })
    }
}

/// Raw payload a gateway returns for an accepted create call, before
/// normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderReceipt {
    /// Provider-assigned tracking identifier for status queries.
    pub qr_id: String,
    pub order_id: String,
    pub amount: Amount,
    #[serde(default)]
    pub qr_image_url: Option<String>,
    #[serde(default)]
    pub expires_in_minutes: Option<u32>,
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

/// Provider-agnostic representation of one payment attempt.
///
/// Created once per accepted request and never mutated; settlement
/// progress arrives as separate [`PaymentStatus`] values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedTransaction {
    pub order_id: String,
    pub amount: Amount,
    pub transaction_id: String,
    /// Displayable QR asset, when the provider returns one.
    pub qr_asset: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub metadata: BTreeMap<String, String>,
}

impl UnifiedTransaction {
    /// Maps a provider receipt into the unified shape.
    ///
    /// Pure and total over every field a gateway can produce: an absent
    /// QR asset stays `None`, and the expiry resolves request override,
    /// then provider default, then [`DEFAULT_EXPIRY_MINUTES`].
    pub fn normalize(
        request: &PaymentRequest,
        receipt: ProviderReceipt,
        issued_at: DateTime<Utc>,
    ) -> Self {
        let minutes = request
            .expiry_minutes
            .or(receipt.expires_in_minutes)
            .unwrap_or(DEFAULT_EXPIRY_MINUTES);

        let mut metadata = receipt.extra;
        metadata.insert("expires_in_minutes".to_string(), minutes.to_string());

        Self {
            order_id: receipt.order_id,
            amount: receipt.amount,
            transaction_id: receipt.qr_id,
            qr_asset: receipt.qr_image_url,
            expires_at: issued_at + Duration::minutes(i64::from(minutes)),
            metadata,
        }
    }
}

/// Settlement state reported for a transaction.
///
/// `Timeout` never comes from a provider; the poller synthesizes it when
/// the polling budget runs out while the payment is still pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentState {
    Pending,
    Success,
    Failed,
    Expired,
    Timeout,
}

impl PaymentState {
    /// Terminal states admit no further transition; polling stops on the
    /// first one observed.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for PaymentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "PENDING",
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
            Self::Expired => "EXPIRED",
            Self::Timeout => "TIMEOUT",
        };
        f.write_str(name)
    }
}

/// One snapshot of settlement state observed for a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentStatus {
    pub transaction_id: String,
    pub state: PaymentState,
    /// 1-based index of the status query that produced this snapshot.
    pub attempt: u32,
    pub observed_at: DateTime<Utc>,
}
