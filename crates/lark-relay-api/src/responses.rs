//! Response types for the API.

use lark_relay_core::EventKind;
use serde::Serialize;

// ============================================================================
// Webhook Responses
// ============================================================================

/// Outcome of a webhook delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookStatus {
    /// A card was built and handed to Feishu
    Delivered,
    /// A card was built but Feishu did not accept it
    DeliveryFailed,
    /// GitHub's `ping` after the hook was created
    Pong,
    /// Event type the relay has no formatter for
    Ignored,
    /// Known event type whose action produces no card
    Skipped,
}

/// Webhook processing response
///
/// Always returned with `200 OK`; GitHub treats anything else as a failed
/// delivery and the outcome is for humans reading the delivery log.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub status: WebhookStatus,
    pub message: String,
    pub event_type: String,
}

impl WebhookResponse {
    pub fn delivered(kind: &EventKind) -> Self {
        Self::new(WebhookStatus::Delivered, "OK", kind)
    }

    pub fn delivery_failed(kind: &EventKind) -> Self {
        Self::new(
            WebhookStatus::DeliveryFailed,
            "Card could not be delivered to Feishu",
            kind,
        )
    }

    pub fn pong() -> Self {
        Self::new(WebhookStatus::Pong, "Webhook configured", &EventKind::Ping)
    }

    pub fn ignored(kind: &EventKind) -> Self {
        Self::new(
            WebhookStatus::Ignored,
            format!("Unhandled event type: {}", kind),
            kind,
        )
    }

    pub fn skipped(kind: &EventKind, action: &str) -> Self {
        Self::new(
            WebhookStatus::Skipped,
            format!("No card for {} action '{}'", kind, action),
            kind,
        )
    }

    fn new(status: WebhookStatus, message: impl Into<String>, kind: &EventKind) -> Self {
        Self {
            status,
            message: message.into(),
            event_type: kind.to_string(),
        }
    }
}

// ============================================================================
// Health Responses
// ============================================================================

/// Whether a setting has a value; the value itself is never exposed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingStatus {
    Configured,
    Missing,
}

impl SettingStatus {
    pub fn of<T>(value: &Option<T>) -> Self {
        if value.is_some() {
            Self::Configured
        } else {
            Self::Missing
        }
    }
}

/// Presence of each setting the relay depends on
#[derive(Debug, Clone, Serialize)]
pub struct ConfigStatus {
    #[serde(rename = "FEISHU_WEBHOOK_URL")]
    pub feishu_webhook_url: SettingStatus,

    #[serde(rename = "GITHUB_SECRET")]
    pub github_secret: SettingStatus,

    #[serde(rename = "FEISHU_SECRET")]
    pub feishu_secret: SettingStatus,
}

/// Health check response
///
/// `status` is `error` only when there is nowhere to deliver cards; the
/// secrets are optional.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub config: ConfigStatus,
    pub timestamp: String,
    pub version: String,
}

impl HealthResponse {
    pub fn from_status(config: ConfigStatus) -> Self {
        let ready = config.feishu_webhook_url == SettingStatus::Configured;

        Self {
            status: if ready { "ok" } else { "error" }.to_string(),
            message: if ready {
                "GitHub to Feishu relay is running".to_string()
            } else {
                "FEISHU_WEBHOOK_URL is not configured".to_string()
            },
            config,
            timestamp: chrono::Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
