//! Feishu custom-bot request signing.
//!
//! When "signature verification" is enabled on a Feishu custom bot, every
//! message must carry `timestamp` and `sign`. The signature is the Base64 of
//! an HMAC-SHA256 whose key is `"{timestamp}\n{secret}"` and whose message is
//! empty.

use base64::{engine::general_purpose::STANDARD, Engine};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Signs outbound Feishu messages with the bot's secret
#[derive(Clone)]
pub struct FeishuSigner {
    secret: String,
}

impl FeishuSigner {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Build a signer only when a non-empty secret is configured
    pub fn from_optional(secret: Option<&str>) -> Option<Self> {
        secret.filter(|s| !s.is_empty()).map(Self::new)
    }

    /// Signature for a Unix timestamp in seconds.
    pub fn sign(&self, timestamp: i64) -> String {
        let string_to_sign = format!("{}\n{}", timestamp, self.secret);

        let mac = HmacSha256::new_from_slice(string_to_sign.as_bytes())
            .expect("HMAC-SHA256 accepts keys of any length");

        STANDARD.encode(mac.finalize().into_bytes())
    }
}

impl std::fmt::Debug for FeishuSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeishuSigner")
            .field("secret", &"<REDACTED>")
            .finish()
    }
}

#[cfg(test)]
#[path = "sign_tests.rs"]
mod tests;
