//! Tests for [`GithubSignatureValidator`].

use super::*;

// ============================================================================
// Helpers
// ============================================================================

/// Compute `sha256=<hex>` for `payload` keyed by `secret`, as GitHub does.
fn compute_sha256_signature(secret: &str, payload: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(payload);
    format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
}

// ============================================================================
// Without a secret
// ============================================================================

#[test]
fn test_no_secret_accepts_missing_header() {
    let validator = GithubSignatureValidator::new(None);

    assert!(!validator.is_enforcing());
    assert!(validator.validate(b"payload", None).is_ok());
}

#[test]
fn test_no_secret_accepts_garbage_header() {
    let validator = GithubSignatureValidator::new(None);

    assert!(validator.validate(b"payload", Some("nonsense")).is_ok());
}

#[test]
fn test_empty_secret_is_treated_as_absent() {
    let validator = GithubSignatureValidator::new(Some(String::new()));

    assert!(!validator.is_enforcing());
    assert!(validator.validate(b"payload", None).is_ok());
}

// ============================================================================
// With a secret
// ============================================================================

#[test]
fn test_valid_signature_accepted() {
    let secret = "It's a Secret to Everybody";
    let payload = b"Hello, World!";
    let validator = GithubSignatureValidator::new(Some(secret.to_string()));

    // Reference vector from GitHub's webhook documentation.
    let header = "sha256=757107ea0eb2509fc211221cce984b8a37570b6d7586c22c46f4379c8b043e17";

    assert_eq!(compute_sha256_signature(secret, payload), header);
    assert!(validator.validate(payload, Some(header)).is_ok());
}

#[test]
fn test_missing_header_rejected() {
    let validator = GithubSignatureValidator::new(Some("secret".to_string()));

    assert_eq!(
        validator.validate(b"payload", None),
        Err(SignatureError::Missing)
    );
}

#[test]
fn test_wrong_secret_rejected() {
    let payload = b"{\"zen\":\"Design for failure.\"}";
    let header = compute_sha256_signature("correct-secret", payload);
    let validator = GithubSignatureValidator::new(Some("wrong-secret".to_string()));

    assert_eq!(
        validator.validate(payload, Some(&header)),
        Err(SignatureError::Mismatch)
    );
}

#[test]
fn test_tampered_payload_rejected() {
    let secret = "secret";
    let header = compute_sha256_signature(secret, b"original");
    let validator = GithubSignatureValidator::new(Some(secret.to_string()));

    assert_eq!(
        validator.validate(b"tampered", Some(&header)),
        Err(SignatureError::Mismatch)
    );
}

#[test]
fn test_sha1_header_rejected_as_unsupported() {
    let validator = GithubSignatureValidator::new(Some("secret".to_string()));
    let result = validator.validate(b"payload", Some("sha1=0123456789abcdef"));

    assert!(
        matches!(result, Err(SignatureError::UnsupportedAlgorithm { ref algorithm }) if algorithm == "sha1"),
        "expected UnsupportedAlgorithm, got {:?}",
        result
    );
}

#[test]
fn test_header_without_separator_is_malformed() {
    let validator = GithubSignatureValidator::new(Some("secret".to_string()));
    let result = validator.validate(b"payload", Some("deadbeef"));

    assert!(matches!(result, Err(SignatureError::Malformed { .. })));
}

#[test]
fn test_non_hex_digest_is_malformed() {
    let validator = GithubSignatureValidator::new(Some("secret".to_string()));
    let result = validator.validate(b"payload", Some("sha256=not-valid-hex!!"));

    assert!(matches!(result, Err(SignatureError::Malformed { .. })));
}

#[test]
fn test_truncated_digest_rejected() {
    let secret = "secret";
    let payload = b"payload";
    let header = compute_sha256_signature(secret, payload);
    let truncated = &header[..header.len() - 2];
    let validator = GithubSignatureValidator::new(Some(secret.to_string()));

    assert!(matches!(
        validator.validate(payload, Some(truncated)),
        Err(SignatureError::Malformed { .. })
    ));
}

#[test]
fn test_uppercase_digest_is_malformed() {
    let secret = "secret";
    let payload = b"payload";
    let header = compute_sha256_signature(secret, payload);
    let digest = header.trim_start_matches("sha256=").to_uppercase();
    let validator = GithubSignatureValidator::new(Some(secret.to_string()));

    assert!(matches!(
        validator.validate(payload, Some(&format!("sha256={}", digest))),
        Err(SignatureError::Malformed { .. })
    ));
}

#[test]
fn test_padded_header_is_malformed() {
    let secret = "secret";
    let payload = b"payload";
    let header = compute_sha256_signature(secret, payload);
    let validator = GithubSignatureValidator::new(Some(secret.to_string()));

    assert!(validator.validate(payload, Some(&header)).is_ok());
    assert!(matches!(
        validator.validate(payload, Some(&format!(" {} ", header))),
        Err(SignatureError::Malformed { .. })
    ));
}

#[test]
fn test_empty_payload_validates() {
    let secret = "empty-payload-secret";
    let header = compute_sha256_signature(secret, b"");
    let validator = GithubSignatureValidator::new(Some(secret.to_string()));

    assert!(validator.validate(b"", Some(&header)).is_ok());
}

#[test]
fn test_debug_output_redacts_secret() {
    let validator = GithubSignatureValidator::new(Some("super-secret-value".to_string()));
    let debug = format!("{:?}", validator);

    assert!(!debug.contains("super-secret-value"));
    assert!(debug.contains("<REDACTED>"));
}
