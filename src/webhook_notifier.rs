//! Webhook notifier for sending rendered trap alerts
//!
//! Posts `{"text": <alert>}` to a chat-style webhook. Exactly one attempt is
//! made per alert; failures are reported back as a `DeliveryOutcome` and
//! never propagated as errors.

use crate::error::DeliveryError;
use crate::formatter::AlertMessage;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    text: &'a str,
}

/// Result of a single delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryOutcome {
    pub success: bool,
    /// HTTP status line on success, error description on failure.
    pub detail: String,
    pub status_code: Option<u16>,
}

impl DeliveryOutcome {
    fn delivered(status: StatusCode) -> Self {
        Self {
            success: true,
            detail: status.to_string(),
            status_code: Some(status.as_u16()),
        }
    }

    fn failed(error: &DeliveryError) -> Self {
        let status_code = match error {
            DeliveryError::UnexpectedStatus { status } => Some(status.as_u16()),
            DeliveryError::Transport(e) => e.status().map(|s| s.as_u16()),
            DeliveryError::Serialization(_) => None,
        };

        Self {
            success: false,
            detail: error.to_string(),
            status_code,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: Client,
}

impl WebhookNotifier {
    /// Build a notifier using the transport's default timeouts
    pub fn new() -> Result<Self, DeliveryError> {
        let client = Client::builder()
            .user_agent(concat!("snmpx/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }

    /// Use a preconfigured client, e.g. one with a request timeout
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Post an alert to a webhook endpoint
    pub async fn deliver(&self, endpoint: &str, message: &AlertMessage) -> DeliveryOutcome {
        match self.post(endpoint, message).await {
            Ok(status) => DeliveryOutcome::delivered(status),
            Err(e) => DeliveryOutcome::failed(&e),
        }
    }

    async fn post(&self, endpoint: &str, message: &str) -> Result<StatusCode, DeliveryError> {
        let body = serde_json::to_vec(&WebhookPayload { text: message })?;

        debug!("Posting {} byte payload to {}", body.len(), endpoint);

        let response = self
            .client
            .post(endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::OK || status == StatusCode::NO_CONTENT {
            Ok(status)
        } else {
            Err(DeliveryError::UnexpectedStatus { status })
        }
    }
}
