//! GitHub `x-hub-signature-256` verification.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Outcome of checking a delivery's signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureCheck {
    /// The signature matches the body.
    Verified,
    /// No secret is configured or the delivery carried no signature.
    Skipped,
    /// The signature is malformed or does not match.
    Mismatch,
}

/// Checks `header` (`sha256=<hex>`) against the HMAC-SHA256 of `body`.
///
/// Verification only happens when both a secret and a signature are
/// present. A delivery missing either is accepted unverified.
#[must_use]
pub fn check_github_signature(
    secret: Option<&str>,
    header: Option<&str>,
    body: &[u8],
) -> SignatureCheck {
    let (Some(secret), Some(header)) = (
        secret.filter(|s| !s.is_empty()),
        header.filter(|h| !h.is_empty()),
    ) else {
        return SignatureCheck::Skipped;
    };

    let Some(expected) = header
        .strip_prefix("sha256=")
        .and_then(|hex_digest| hex::decode(hex_digest).ok())
    else {
        return SignatureCheck::Mismatch;
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return SignatureCheck::Mismatch;
    };
    mac.update(body);

    match mac.verify_slice(&expected) {
        Ok(()) => SignatureCheck::Verified,
        Err(_) => SignatureCheck::Mismatch,
    }
}
