use subtle::ConstantTimeEq;

use crate::error::TokenError;
use crate::sign::compute_signature;
use crate::token::{parse_token, SigningKey, TokenRecord};

/// Default validity window applied at verification time, in seconds.
pub const DEFAULT_VALIDITY_WINDOW_SECS: i64 = 300;

/// Verify a presented token, surfacing which check failed.
///
/// This is the full verification state machine behind
/// [`TokenCodec::verify`](crate::TokenCodec::verify); the codec collapses
/// the error to a bare `false` so the public surface gives probing callers
/// no oracle, while this function keeps the failure reasons
/// distinguishable for diagnostics and tests.
///
/// Checks run in order and fail closed:
/// 1. structural parse; all four fields present and non-empty;
/// 2. embedded location equals `claimed_location_id` (case-sensitive);
/// 3. signature recomputed from the embedded fields and the secret key
///    matches the embedded one (constant-time comparison);
/// 4. freshness: `current_time` must not exceed `issued_at + window`.
///
/// The freshness check is one-sided: a verifier clock behind the issuer
/// clock (current_time < issued_at) still passes. That skew tolerance is
/// part of the contract.
pub fn verify_token_local(
    key: &SigningKey,
    token_text: &str,
    claimed_location_id: &str,
    current_time: i64,
    validity_window_seconds: i64,
) -> Result<(), TokenError> {
    let record = parse_token(token_text)?;

    if record.event_id.is_empty() || record.location_id.is_empty() || record.signature.is_empty() {
        return Err(TokenError::malformed("empty required field"));
    }

    check_location(&record, claimed_location_id)?;
    check_signature(key, &record)?;
    check_freshness(&record, current_time, validity_window_seconds)?;

    Ok(())
}

fn check_location(record: &TokenRecord, claimed_location_id: &str) -> Result<(), TokenError> {
    if record.location_id != claimed_location_id {
        return Err(TokenError::location_mismatch(format!(
            "token bound to {:?}, presented at {:?}",
            record.location_id, claimed_location_id
        )));
    }
    Ok(())
}

fn check_signature(key: &SigningKey, record: &TokenRecord) -> Result<(), TokenError> {
    let expected = compute_signature(key, &record.event_id, &record.location_id, record.issued_at);
    // ct_eq on slices of unequal length yields false without comparing.
    if !bool::from(expected.as_bytes().ct_eq(record.signature.as_bytes())) {
        return Err(TokenError::SignatureMismatch);
    }
    Ok(())
}

fn check_freshness(
    record: &TokenRecord,
    current_time: i64,
    validity_window_seconds: i64,
) -> Result<(), TokenError> {
    let deadline = record.issued_at.saturating_add(validity_window_seconds);
    if current_time > deadline {
        return Err(TokenError::expired(format!(
            "issued at {}, window closed at {}, presented at {}",
            record.issued_at, deadline, current_time
        )));
    }
    Ok(())
}
