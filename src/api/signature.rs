//! Webhook signature verification

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Verify a hex-encoded HMAC-SHA256 signature over the raw request
/// body. An optional `sha256=` prefix on the header value is accepted.
/// The comparison is constant-time via the Mac verifier.
pub fn verify_signature(secret: &str, body: &[u8], header_value: &str) -> bool {
    let encoded = header_value.strip_prefix("sha256=").unwrap_or(header_value);

    let Ok(expected) = hex::decode(encoded.trim()) else {
        return false;
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}

/// Compute the hex signature for a body; used by tests and tooling.
pub fn sign(secret: &str, body: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}
