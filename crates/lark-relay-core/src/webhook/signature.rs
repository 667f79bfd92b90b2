//! GitHub webhook signature validation.
//!
//! GitHub signs each delivery with HMAC-SHA256 over the raw request body,
//! keyed by the webhook secret, and sends the digest in the
//! `X-Hub-Signature-256` header as `sha256=<hex>`.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::{debug, instrument};

type HmacSha256 = Hmac<Sha256>;

/// Name of the header carrying the HMAC-SHA256 digest.
pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";

/// Reasons an inbound delivery is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    #[error("Signature header is missing")]
    Missing,

    #[error("Signature header is malformed: {message}")]
    Malformed { message: String },

    #[error("Unsupported signature algorithm: {algorithm}")]
    UnsupportedAlgorithm { algorithm: String },

    #[error("HMAC-SHA256 digest does not match")]
    Mismatch,
}

/// Validates `X-Hub-Signature-256` headers against a shared secret.
///
/// A validator without a secret accepts every delivery. This mirrors how
/// GitHub behaves when no secret is configured on the webhook: it sends no
/// signature at all.
///
/// # Examples
///
/// ```rust
/// use lark_relay_core::GithubSignatureValidator;
///
/// let validator = GithubSignatureValidator::new(None);
/// assert!(validator.validate(b"{}", None).is_ok());
/// ```
#[derive(Clone, Default)]
pub struct GithubSignatureValidator {
    secret: Option<String>,
}

impl GithubSignatureValidator {
    /// Create a validator. Empty secrets are treated as absent.
    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()),
        }
    }

    /// Returns `true` when deliveries are actually checked.
    pub fn is_enforcing(&self) -> bool {
        self.secret.is_some()
    }

    /// Validate the raw body against the header value.
    ///
    /// The comparison runs in constant time via [`Mac::verify_slice`].
    ///
    /// # Errors
    ///
    /// Returns a [`SignatureError`] describing why the delivery was rejected.
    #[instrument(skip_all, fields(enforcing = self.secret.is_some(), payload_len = payload.len()))]
    pub fn validate(&self, payload: &[u8], header: Option<&str>) -> Result<(), SignatureError> {
        let Some(secret) = self.secret.as_deref() else {
            debug!("No GitHub secret configured; skipping signature check");
            return Ok(());
        };

        let header = header.ok_or(SignatureError::Missing)?;
        let expected = parse_signature_header(header)?;

        let mut mac =
            HmacSha256::new_from_slice(secret.as_bytes()).map_err(|e| SignatureError::Malformed {
                message: format!("secret cannot be used as HMAC key: {}", e),
            })?;
        mac.update(payload);

        mac.verify_slice(&expected)
            .map_err(|_| SignatureError::Mismatch)
    }
}

impl std::fmt::Debug for GithubSignatureValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubSignatureValidator")
            .field("secret", &self.secret.as_ref().map(|_| "<REDACTED>"))
            .finish()
    }
}

/// Split `sha256=<hex>` and decode the digest.
///
/// GitHub always sends 64 lowercase hex digits with no padding, so anything
/// else is malformed.
fn parse_signature_header(header: &str) -> Result<Vec<u8>, SignatureError> {
    let (algorithm, digest) = header
        .split_once('=')
        .ok_or_else(|| SignatureError::Malformed {
            message: "expected '<algorithm>=<hex digest>'".to_string(),
        })?;

    if algorithm != "sha256" {
        return Err(SignatureError::UnsupportedAlgorithm {
            algorithm: algorithm.chars().take(16).collect(),
        });
    }

    if digest.len() != 64 || !digest.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
        return Err(SignatureError::Malformed {
            message: "digest must be 64 lowercase hex digits".to_string(),
        });
    }

    hex::decode(digest).map_err(|e| SignatureError::Malformed {
        message: format!("digest is not valid hex: {}", e),
    })
}

#[cfg(test)]
#[path = "signature_tests.rs"]
mod tests;
