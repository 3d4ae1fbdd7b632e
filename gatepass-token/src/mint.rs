use chrono::Utc;
use tracing::info;

use crate::sign::compute_signature;
use crate::token::{SigningKey, TokenRecord};

/// Default validity duration attached to a freshly issued token, in seconds.
pub const DEFAULT_TOKEN_DURATION_SECS: i64 = 60;

/// TokenTimeConfig allows control over token issuance times and durations.
#[derive(Debug, Clone, Copy)]
pub struct TokenTimeConfig {
    /// Optional custom issuance time (now time override).
    pub start_time: Option<i64>,
    /// Duration in seconds (default: 60 seconds).
    pub duration: i64,
}

impl Default for TokenTimeConfig {
    fn default() -> Self {
        Self {
            start_time: None,
            duration: DEFAULT_TOKEN_DURATION_SECS,
        }
    }
}

impl TokenTimeConfig {
    /// Issue "now" with a custom duration.
    pub fn with_duration(duration: i64) -> Self {
        Self {
            start_time: None,
            duration,
        }
    }
}

/// A freshly issued token: the wire text plus its advisory expiry.
///
/// The expiry is `issued_at + duration` and exists for the issuer's own
/// bookkeeping (display, rotation). It is not embedded in the token text
/// and verification never reads it; freshness is always recomputed at
/// presentation time from the embedded timestamp and the verifier's
/// window. Minting the same inputs a second later yields a different
/// `issued_at`, signature, and expiry, with no cross-check between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintedToken {
    pub token: String,
    pub expires_at: i64,
}

/// Mint a signed token for `event_id` at `location_id`.
///
/// Captures the issuance time (or the override from `time_config`), signs
/// the canonical payload with the secret key, and serializes the four
/// fields to the wire format. Reads the clock once; no other side effects.
pub fn mint_token(
    key: &SigningKey,
    event_id: &str,
    location_id: &str,
    time_config: TokenTimeConfig,
) -> MintedToken {
    let issued_at = time_config
        .start_time
        .unwrap_or_else(|| Utc::now().timestamp());
    let expires_at = issued_at + time_config.duration;

    let signature = compute_signature(key, event_id, location_id, issued_at);
    let record = TokenRecord {
        event_id: event_id.to_string(),
        location_id: location_id.to_string(),
        issued_at,
        signature,
    };
    let token = record.to_wire();

    info!(event_id, location_id, issued_at, expires_at, "token issued");

    MintedToken { token, expires_at }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::parse_token;
    use crate::verify::verify_token_local;

    const KEY: &str = "orchard-secret";

    #[test]
    fn test_mint_and_verify_roundtrip() {
        let key = SigningKey::new(KEY);
        let minted = mint_token(&key, "summit-42", "gate-7", TokenTimeConfig::default());

        let record = parse_token(&minted.token).unwrap();
        assert_eq!(record.event_id, "summit-42");
        assert_eq!(record.location_id, "gate-7");
        assert_eq!(record.signature.len(), 16);
        assert_eq!(minted.expires_at, record.issued_at + DEFAULT_TOKEN_DURATION_SECS);

        let res = verify_token_local(&key, &minted.token, "gate-7", record.issued_at, 300);
        assert!(res.is_ok());
    }

    #[test]
    fn test_mint_with_fixed_start_time() {
        let key = SigningKey::new(KEY);
        let time_config = TokenTimeConfig {
            start_time: Some(1_700_000_000),
            duration: 120,
        };
        let minted = mint_token(&key, "summit-42", "gate-7", time_config);

        assert_eq!(minted.expires_at, 1_700_000_120);
        assert_eq!(
            minted.token,
            "E:summit-42|LID:gate-7|TS:1700000000|S:567b7a58ba664bdf"
        );
    }

    #[test]
    fn test_same_inputs_different_times_differ() {
        let key = SigningKey::new(KEY);
        let first = mint_token(
            &key,
            "summit-42",
            "gate-7",
            TokenTimeConfig {
                start_time: Some(1_700_000_000),
                duration: 60,
            },
        );
        let second = mint_token(
            &key,
            "summit-42",
            "gate-7",
            TokenTimeConfig {
                start_time: Some(1_700_000_001),
                duration: 60,
            },
        );

        assert_ne!(first.token, second.token);
        assert_ne!(first.expires_at, second.expires_at);

        // Both still verify under their own issuance time.
        assert!(verify_token_local(&key, &first.token, "gate-7", 1_700_000_000, 300).is_ok());
        assert!(verify_token_local(&key, &second.token, "gate-7", 1_700_000_001, 300).is_ok());
    }

    #[test]
    fn test_expiry_is_advisory_only() {
        let key = SigningKey::new(KEY);
        // One second duration, so the advisory expiry is long past...
        let minted = mint_token(
            &key,
            "summit-42",
            "gate-7",
            TokenTimeConfig {
                start_time: Some(1_700_000_000),
                duration: 1,
            },
        );
        // ...yet the verifier's own window is what decides freshness.
        let res = verify_token_local(&key, &minted.token, "gate-7", 1_700_000_200, 300);
        assert!(res.is_ok());
    }
}
