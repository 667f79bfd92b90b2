//! # Lark-Relay Core
//!
//! Core logic for relaying GitHub webhooks to a Feishu (Lark) group bot.
//!
//! This crate owns everything that does not need a network socket:
//! - HMAC-SHA256 validation of inbound GitHub deliveries
//! - The Feishu message card model and the outbound request signature
//! - Typed GitHub event payloads and their mapping onto cards
//! - Event dispatch keyed by the `X-GitHub-Event` header
//!
//! ## Usage
//!
//! ```rust
//! use lark_relay_core::webhook::{dispatch, Dispatch};
//!
//! let outcome = dispatch(Some("ping"), br#"{"zen":"Keep it simple."}"#).unwrap();
//! assert!(matches!(outcome, Dispatch::Pong));
//! ```

/// Feishu interactive card model and outbound signing
pub mod card;

/// GitHub event to card formatters
pub mod format;

/// Inbound webhook validation, payload types and dispatch
pub mod webhook;

// Re-export key types for convenience
pub use card::{Card, FeishuMessage, FeishuSigner};
pub use webhook::{
    dispatch, Dispatch, EventKind, GithubSignatureValidator, SignatureError, WebhookError,
};

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
