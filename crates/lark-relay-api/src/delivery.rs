//! Outbound delivery of cards to a Feishu custom bot.
//!
//! A single attempt is made per card. Feishu answers `200 OK` even when it
//! refuses a message, so the JSON body's `code` (or the older `StatusCode`)
//! decides success.

use crate::config::FeishuConfig;
use crate::errors::DeliveryError;
use async_trait::async_trait;
use lark_relay_core::{Card, FeishuMessage, FeishuSigner};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

/// Longest response body kept in an error message
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Destination for formatted cards
#[async_trait]
pub trait CardDelivery: Send + Sync {
    /// Post one card, reporting whether the receiver accepted it.
    async fn deliver(&self, card: Card) -> Result<(), DeliveryError>;
}

/// Reply body of the custom bot webhook
///
/// Current deployments answer with `code`/`msg`; older ones with
/// `StatusCode`/`StatusMessage`. Some send both.
#[derive(Debug, Default, Deserialize)]
struct FeishuReply {
    code: Option<i64>,
    msg: Option<String>,

    #[serde(rename = "StatusCode")]
    status_code: Option<i64>,

    #[serde(rename = "StatusMessage")]
    status_message: Option<String>,
}

impl FeishuReply {
    fn rejection(&self) -> Option<DeliveryError> {
        let code = self
            .code
            .filter(|c| *c != 0)
            .or(self.status_code.filter(|c| *c != 0))?;

        let message = self
            .msg
            .clone()
            .or_else(|| self.status_message.clone())
            .unwrap_or_default();

        Some(DeliveryError::Rejected { code, message })
    }
}

/// Posts cards to a Feishu custom bot webhook URL
pub struct FeishuWebhookClient {
    http_client: reqwest::Client,
    webhook_url: String,
    signer: Option<FeishuSigner>,
}

impl FeishuWebhookClient {
    pub fn new(
        webhook_url: impl Into<String>,
        signer: Option<FeishuSigner>,
        timeout: Duration,
    ) -> Result<Self, DeliveryError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("lark-relay/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DeliveryError::ClientSetup {
                message: e.without_url().to_string(),
            })?;

        Ok(Self {
            http_client,
            webhook_url: webhook_url.into(),
            signer,
        })
    }

    /// Build a client from configuration, or `None` when no URL is set.
    pub fn from_config(config: &FeishuConfig) -> Result<Option<Self>, DeliveryError> {
        let Some(url) = config.webhook_url.as_deref() else {
            return Ok(None);
        };

        let signer = FeishuSigner::from_optional(config.secret.as_deref());
        let timeout = Duration::from_secs(config.timeout_seconds);

        Self::new(url, signer, timeout).map(Some)
    }

    /// Whether messages carry a `timestamp`/`sign` pair
    pub fn is_signing(&self) -> bool {
        self.signer.is_some()
    }

    /// Wrap a card for posting, signing it for `timestamp` when a secret is set.
    pub fn build_message(&self, card: Card, timestamp: i64) -> FeishuMessage {
        let message = FeishuMessage::interactive(card);
        match &self.signer {
            Some(signer) => message.signed(signer, timestamp),
            None => message,
        }
    }
}

impl std::fmt::Debug for FeishuWebhookClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeishuWebhookClient")
            .field("webhook_url", &"<REDACTED>")
            .field("signing", &self.is_signing())
            .finish()
    }
}

#[async_trait]
impl CardDelivery for FeishuWebhookClient {
    #[instrument(skip_all, fields(title = %card.title(), signed = self.is_signing()))]
    async fn deliver(&self, card: Card) -> Result<(), DeliveryError> {
        let message = self.build_message(card, chrono::Utc::now().timestamp());

        let response = self
            .http_client
            .post(&self.webhook_url)
            .json(&message)
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.without_url()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DeliveryError::Transport(e.without_url()))?;

        if !status.is_success() {
            return Err(DeliveryError::HttpStatus {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        match serde_json::from_str::<FeishuReply>(&body) {
            Ok(reply) => match reply.rejection() {
                Some(rejection) => Err(rejection),
                None => Ok(()),
            },
            Err(e) => {
                debug!(error = %e, "Feishu reply was not JSON; treating 2xx as accepted");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
#[path = "delivery_tests.rs"]
mod tests;
