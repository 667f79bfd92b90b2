//! # Webhook Processing Module
//!
//! Validates inbound GitHub deliveries and routes them to the card
//! formatters based on the `X-GitHub-Event` header.

use crate::{card::Card, format};
use serde::de::DeserializeOwned;
use std::fmt;
use tracing::{debug, info, instrument};

pub mod events;
pub mod signature;

pub use signature::{GithubSignatureValidator, SignatureError, SIGNATURE_HEADER};

/// Name of the header carrying the GitHub event type.
pub const EVENT_HEADER: &str = "x-github-event";

/// Name of the header carrying the GitHub delivery GUID.
pub const DELIVERY_HEADER: &str = "x-github-delivery";

// ============================================================================
// Core Types
// ============================================================================

/// GitHub event types the relay distinguishes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    Push,
    Issues,
    PullRequest,
    Release,
    Ping,
    /// An event type with no formatter
    Other(String),
    /// The request carried no `X-GitHub-Event` header
    Missing,
}

impl EventKind {
    /// Classify the raw `X-GitHub-Event` header value.
    pub fn from_header(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => Self::Missing,
            Some("push") => Self::Push,
            Some("issues") => Self::Issues,
            Some("pull_request") => Self::PullRequest,
            Some("release") => Self::Release,
            Some("ping") => Self::Ping,
            Some(other) => Self::Other(other.to_string()),
        }
    }

    /// Header value for this event type
    pub fn as_str(&self) -> &str {
        match self {
            Self::Push => "push",
            Self::Issues => "issues",
            Self::PullRequest => "pull_request",
            Self::Release => "release",
            Self::Ping => "ping",
            Self::Other(name) => name,
            Self::Missing => "<missing>",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the relay should do with a delivery
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    /// Forward this card to Feishu
    Card(Card),

    /// GitHub's webhook setup handshake
    Pong,

    /// Valid delivery for an event type the relay does not format
    Ignored { event_type: String },

    /// Supported event type, but the action is not announced
    Skipped { event_type: String, action: String },
}

/// Errors raised while handling a webhook delivery
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("Signature validation failed: {0}")]
    InvalidSignature(#[from] SignatureError),

    #[error("Malformed {event_type} payload: {message}")]
    MalformedPayload { event_type: String, message: String },
}

impl WebhookError {
    /// Security failures are reported separately from bad input
    pub fn is_security_failure(&self) -> bool {
        matches!(self, Self::InvalidSignature(_))
    }
}

// ============================================================================
// Dispatch
// ============================================================================

/// Route a delivery body to the formatter for its event type.
///
/// The body must be a JSON object for every event type, including ones the
/// relay ignores.
///
/// # Errors
///
/// Returns [`WebhookError::MalformedPayload`] when the body is not JSON or
/// lacks a field required by the event's formatter.
#[instrument(skip(body), fields(body_len = body.len()))]
pub fn dispatch(event_type: Option<&str>, body: &[u8]) -> Result<Dispatch, WebhookError> {
    let kind = EventKind::from_header(event_type);

    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|e| WebhookError::MalformedPayload {
            event_type: kind.to_string(),
            message: format!("body is not valid JSON: {}", e),
        })?;

    if !value.is_object() {
        return Err(WebhookError::MalformedPayload {
            event_type: kind.to_string(),
            message: "body is not a JSON object".to_string(),
        });
    }

    let outcome = match &kind {
        EventKind::Ping => Dispatch::Pong,
        EventKind::Other(_) | EventKind::Missing => Dispatch::Ignored {
            event_type: kind.to_string(),
        },
        EventKind::Push => Dispatch::Card(format::push_card(&parse(&kind, value)?)),
        EventKind::Issues => Dispatch::Card(format::issues_card(&parse(&kind, value)?)),
        EventKind::PullRequest => {
            Dispatch::Card(format::pull_request_card(&parse(&kind, value)?))
        }
        EventKind::Release => {
            let event: events::ReleaseEvent = parse(&kind, value)?;
            match format::release_card(&event) {
                Some(card) => Dispatch::Card(card),
                None => Dispatch::Skipped {
                    event_type: kind.to_string(),
                    action: event.action,
                },
            }
        }
    };

    match &outcome {
        Dispatch::Card(_) => info!(event_type = %kind, "Built card for event"),
        other => debug!(event_type = %kind, outcome = ?other, "No card for event"),
    }

    Ok(outcome)
}

fn parse<T: DeserializeOwned>(kind: &EventKind, value: serde_json::Value) -> Result<T, WebhookError> {
    serde_json::from_value(value).map_err(|e| WebhookError::MalformedPayload {
        event_type: kind.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
