use sha2::{Digest, Sha256};

use crate::token::SigningKey;

/// Number of hex characters kept from the full SHA-256 digest.
pub const SIGNATURE_LEN: usize = 16;

/// Compute the truncated signature over the canonical payload.
///
/// The payload is `event_id|location_id|issued_at|secret_key`, hashed as
/// UTF-8 bytes with SHA-256; the signature is the first 16 hex characters
/// of the digest. Implementations sharing a key must reproduce this
/// bit-for-bit or cross-verification silently fails.
pub(crate) fn compute_signature(
    key: &SigningKey,
    event_id: &str,
    location_id: &str,
    issued_at: i64,
) -> String {
    let payload = format!("{event_id}|{location_id}|{issued_at}|{}", key.expose());
    let digest = Sha256::digest(payload.as_bytes());
    let mut signature = hex::encode(digest);
    signature.truncate(SIGNATURE_LEN);
    signature
}
