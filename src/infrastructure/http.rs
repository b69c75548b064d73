use crate::domain::payment::{Amount, PaymentRequest, PaymentState, ProviderReceipt};
use crate::domain::ports::{CreateOutcome, ProviderGateway};
use crate::domain::provider::{ProviderDescriptor, ProviderKey};
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// JSON-over-HTTP gateway for providers speaking the generic wire
/// contract: `POST {base}/payments` to create, `GET
/// {base}/payments/{id}/status` to query, `GET {base}/providers` for the
/// capability listing.
pub struct HttpGateway {
    key: ProviderKey,
    base_url: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct CreateRequestBody<'a> {
    amount: i64,
    order_id: &'a str,
    description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    expiry_minutes: Option<u32>,
}

#[derive(Deserialize)]
struct CreateResponseBody {
    success: bool,
    #[serde(default)]
    qr_id: Option<String>,
    #[serde(default)]
    qr_image_url: Option<String>,
    #[serde(default)]
    amount: Option<i64>,
    #[serde(default)]
    order_id: Option<String>,
    #[serde(default)]
    expires_in_minutes: Option<u32>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    extra: BTreeMap<String, String>,
}

#[derive(Deserialize)]
struct StatusResponseBody {
    status: PaymentState,
}

impl HttpGateway {
    pub fn new(key: ProviderKey, base_url: impl Into<String>) -> Self {
        Self {
            key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ProviderGateway for HttpGateway {
    fn key(&self) -> ProviderKey {
        self.key
    }

    async fn create_request(&self, request: &PaymentRequest) -> Result<CreateOutcome> {
        let url = format!("{}/payments", self.base_url);
        let body = CreateRequestBody {
            amount: request.amount.value(),
            order_id: request.order_id.as_str(),
            description: &request.description,
            expiry_minutes: request.expiry_minutes,
        };

        let response: CreateResponseBody = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await?
            .json()
            .await?;

        if !response.success {
            let reason = response
                .error
                .unwrap_or_else(|| "provider rejected the payment request".to_string());
            return Ok(CreateOutcome::Rejected { reason });
        }

        let qr_id = response.qr_id.ok_or_else(|| {
            PaymentError::Transport("create response missing qr_id".to_string())
        })?;
        let amount = match response.amount {
            Some(value) => Amount::new(value)?,
            None => request.amount,
        };

        Ok(CreateOutcome::Accepted(ProviderReceipt {
            qr_id,
            order_id: response
                .order_id
                .unwrap_or_else(|| request.order_id.to_string()),
            amount,
            qr_image_url: response.qr_image_url,
            expires_in_minutes: response.expires_in_minutes,
            extra: response.extra,
        }))
    }

    async fn query_status(&self, transaction_id: &str) -> Result<PaymentState> {
        let url = format!("{}/payments/{}/status", self.base_url, transaction_id);
        let response: StatusResponseBody = self.client.get(&url).send().await?.json().await?;

        // TIMEOUT is client-declared only; a provider reporting it is
        // breaking the contract.
        if response.status == PaymentState::Timeout {
            return Err(PaymentError::Transport(
                "provider reported TIMEOUT, which is not a provider state".to_string(),
            ));
        }
        Ok(response.status)
    }
}

/// Fetches the remote capability listing.
pub async fn fetch_listing(client: &reqwest::Client, base_url: &str) -> Result<Vec<ProviderDescriptor>> {
    let url = format!("{}/providers", base_url.trim_end_matches('/'));
    let listing = client.get(&url).send().await?.json().await?;
    Ok(listing)
}
