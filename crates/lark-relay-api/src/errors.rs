//! Error types for the HTTP service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use lark_relay_core::WebhookError;
use tracing::{error, warn};

/// Webhook handler errors with HTTP status code mapping
///
/// - `401 Unauthorized`: the delivery's signature does not check out
/// - `400 Bad Request`: the body is not JSON or lacks required fields
/// - `500 Internal Server Error`: the relay has nowhere to deliver to
///
/// Error messages returned to clients never include secrets or the Feishu
/// webhook URL.
#[derive(Debug, thiserror::Error)]
pub enum WebhookHandlerError {
    /// Signature validation or payload parsing failed
    ///
    /// Maps to `401` for signature failures and `400` otherwise.
    #[error("Processing failed: {0}")]
    ProcessingFailed(#[from] WebhookError),

    /// A required setting is absent
    ///
    /// Maps to: `500 Internal Server Error`
    #[error("Service is not configured: {key} is not set")]
    NotConfigured { key: String },
}

impl WebhookHandlerError {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ProcessingFailed(e) if e.is_security_failure() => StatusCode::UNAUTHORIZED,
            Self::ProcessingFailed(_) => StatusCode::BAD_REQUEST,
            Self::NotConfigured { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebhookHandlerError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            Self::ProcessingFailed(e) if e.is_security_failure() => {
                warn!(error = %e, "Rejected webhook with invalid signature");
            }
            Self::ProcessingFailed(e) => {
                warn!(error = %e, "Rejected malformed webhook payload");
            }
            Self::NotConfigured { key } => {
                error!(key = %key, "Webhook received but service is not configured");
            }
        }

        let body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });

        (status, Json(body)).into_response()
    }
}

/// Service-level errors
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Failed to bind to address {address}: {message}")]
    BindFailed { address: String, message: String },

    #[error("Server failed: {message}")]
    ServerFailed { message: String },

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Configuration loading failed: {0}")]
    Load(#[from] config::ConfigError),
}

/// Outbound delivery errors
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("Failed to build HTTP client: {message}")]
    ClientSetup { message: String },

    /// Always constructed with the URL stripped, since it embeds the bot token.
    #[error("Request to Feishu failed: {0}")]
    Transport(reqwest::Error),

    #[error("Feishu returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Feishu rejected the message (code {code}): {message}")]
    Rejected { code: i64, message: String },
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;
