//! GitHub webhook signature verification.
//!
//! GitHub signs each webhook delivery with HMAC-SHA256 over the raw
//! request body and sends the result as `sha256=<hex>` in the
//! `X-Hub-Signature-256` header. Verification uses the hmac crate's
//! constant-time `verify_slice` to resist timing attacks.

use hmac::{Hmac, Mac};
use sha2::Sha256;

// Type alias for HMAC-SHA256
type HmacSha256 = Hmac<Sha256>;

/// Verify a webhook request against the configured shared secret.
///
/// - No secret configured: verification is disabled; every payload is
///   accepted and a warning is emitted.
/// - Secret configured but no signature header: rejected.
/// - Otherwise the header must equal `sha256=` + lowercase hex of
///   HMAC-SHA256(secret, payload). A header without the `sha256=` prefix
///   or with malformed hex is rejected.
pub fn verify_signature(
    secret: Option<&str>,
    payload: &[u8],
    signature_header: Option<&str>,
) -> bool {
    let Some(secret) = secret else {
        tracing::warn!("webhook secret not configured - skipping verification");
        return true;
    };

    let Some(header) = signature_header else {
        tracing::warn!("no signature header found");
        return false;
    };

    let Some(signature_hex) = header.strip_prefix("sha256=") else {
        return false;
    };

    verify_hmac_sha256(secret.as_bytes(), payload, signature_hex)
}

/// Verify an HMAC-SHA256 signature against a request body.
///
/// Uses constant-time comparison (via the hmac crate's `verify_slice`).
/// Malformed hex fails verification rather than erroring.
pub fn verify_hmac_sha256(secret: &[u8], body: &[u8], signature_hex: &str) -> bool {
    let Ok(expected) = hex_decode(signature_hex) else {
        return false;
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(secret) else {
        return false;
    };
    mac.update(body);

    mac.verify_slice(&expected).is_ok()
}

/// Compute the hex-encoded HMAC-SHA256 signature for a body.
///
/// Useful for generating webhook signatures and test vectors.
pub fn compute_signature_hex(secret: &[u8], body: &[u8]) -> String {
    // HMAC accepts keys of any length, so construction cannot fail.
    let mut mac =
        HmacSha256::new_from_slice(secret).expect("HMAC-SHA256 accepts keys of any length");
    mac.update(body);
    hex_encode(&mac.finalize().into_bytes())
}

/// Constant-time byte comparison (XOR-based).
///
/// Returns true if and only if `a == b`. Time taken is independent of
/// how many bytes match.
pub(crate) fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result: u8 = 0;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

/// Decode a hex string to bytes.
fn hex_decode(hex: &str) -> Result<Vec<u8>, ()> {
    if hex.len() % 2 != 0 {
        return Err(());
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| ()))
        .collect()
}

/// Encode bytes to a lowercase hex string.
fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
