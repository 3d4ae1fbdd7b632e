//! # Gatepass Token
//!
//! Core codec for short-lived, location-bound proof tokens.
//!
//! This crate issues and verifies compact text credentials that encode an
//! event identifier, an issuance location, an issuance timestamp, and a
//! truncated signature, intended to be rendered as a scannable code and
//! checked at an access point. It has no networking dependencies and holds
//! no state beyond the secret signing key.
//!
//! ## Features
//!
//! - Token issuance: sign and serialize a token bound to an event, a
//!   location, and the issuance instant
//! - Structural parsing: decode untrusted token text without touching the
//!   signature
//! - Verification: location match, signature integrity, and freshness
//!   window folded into a single pass/fail answer
//!
//! ## Usage
//!
//! ```
//! use gatepass_token::{TokenCodec, TokenError};
//!
//! fn main() -> Result<(), TokenError> {
//!     let codec = TokenCodec::new("my-secret-key");
//!
//!     let minted = codec.generate("concert-2024", "main-gate");
//!     let record = codec.parse(&minted.token)?;
//!
//!     assert!(codec.verify(&minted.token, "main-gate", record.issued_at));
//!     assert!(!codec.verify(&minted.token, "side-gate", record.issued_at));
//!     Ok(())
//! }
//! ```

mod error;
mod mint;
mod sign;
mod token;
mod verify;

pub use error::TokenError;
pub use mint::{mint_token, MintedToken, TokenTimeConfig, DEFAULT_TOKEN_DURATION_SECS};
pub use sign::SIGNATURE_LEN;
pub use token::{
    parse_token, SigningKey, TokenCodec, TokenRecord, FIELD_DELIMITER, FIELD_EVENT,
    FIELD_LOCATION, FIELD_SIGNATURE, FIELD_TIMESTAMP, ITEM_DELIMITER,
};
pub use verify::{verify_token_local, DEFAULT_VALIDITY_WINDOW_SECS};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::fs;

    #[test]
    fn test_generate_parse_roundtrip() {
        let codec = TokenCodec::new("roundtrip-secret");
        let minted = codec.generate("harvest-fair", "north-entrance");

        let record = codec.parse(&minted.token).unwrap();
        assert_eq!(record.event_id, "harvest-fair");
        assert_eq!(record.location_id, "north-entrance");
        assert_eq!(record.signature.len(), SIGNATURE_LEN);
        assert!(record
            .signature
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(minted.expires_at, record.issued_at + DEFAULT_TOKEN_DURATION_SECS);
    }

    #[test]
    fn test_parse_accepts_any_field_order() {
        let record =
            parse_token("S:567b7a58ba664bdf|TS:1700000000|E:summit-42|LID:gate-7").unwrap();
        assert_eq!(record.event_id, "summit-42");
        assert_eq!(record.location_id, "gate-7");
        assert_eq!(record.issued_at, 1_700_000_000);
        assert_eq!(record.signature, "567b7a58ba664bdf");
    }

    #[test]
    fn test_parse_last_duplicate_wins() {
        let record =
            parse_token("E:decoy|E:summit-42|LID:gate-7|TS:1700000000|S:567b7a58ba664bdf")
                .unwrap();
        assert_eq!(record.event_id, "summit-42");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for text in [
            "",
            "no-colon-here",
            "E:a|LID:b|TS:1000",
            "E:a|LID:b|S:c",
            "E:a|TS:1000|S:c",
            "LID:b|TS:1000|S:c",
            "E:a|LID:b|TS:soon|S:c",
            "E:a|LID:b|TS:1000|S:c|trailing-junk",
        ] {
            assert!(parse_token(text).is_err(), "input {text:?}");
        }
    }

    #[test]
    fn test_verify_collapses_all_failures_to_false() {
        let codec = TokenCodec::new("collapse-secret");
        // Malformed, tampered, and mislocated inputs are indistinguishable
        // through the boolean surface.
        assert!(!codec.verify("", "gate-7", 1_700_000_000));
        assert!(!codec.verify("no-colon-here", "gate-7", 1_700_000_000));
        let minted = codec.generate_with_time(
            "summit-42",
            "gate-7",
            TokenTimeConfig {
                start_time: Some(1_700_000_000),
                duration: 60,
            },
        );
        assert!(!codec.verify(&minted.token, "gate-8", 1_700_000_000));
        assert!(codec.verify(&minted.token, "gate-7", 1_700_000_000));
    }

    #[test]
    fn test_codecs_with_different_keys_reject_each_other() {
        let issuer = TokenCodec::new("issuer-secret");
        let stranger = TokenCodec::new("stranger-secret");
        let minted = issuer.generate_with_time(
            "summit-42",
            "gate-7",
            TokenTimeConfig {
                start_time: Some(1_700_000_000),
                duration: 60,
            },
        );
        assert!(issuer.verify(&minted.token, "gate-7", 1_700_000_000));
        assert!(!stranger.verify(&minted.token, "gate-7", 1_700_000_000));
    }

    #[test]
    fn test_single_character_tampering_detected() {
        let codec = TokenCodec::new("tamper-secret");
        let minted = codec.generate_with_time(
            "summit-42",
            "gate-7",
            TokenTimeConfig {
                start_time: Some(1_700_000_000),
                duration: 60,
            },
        );
        assert!(codec.verify(&minted.token, "gate-7", 1_700_000_000));

        let record = codec.parse(&minted.token).unwrap();
        // Flip one character of the signature.
        let flipped: char = if record.signature.ends_with('0') { '1' } else { '0' };
        let mut sig = record.signature.clone();
        sig.pop();
        sig.push(flipped);
        let tampered = minted.token.replace(&record.signature, &sig);
        assert!(!codec.verify(&tampered, "gate-7", 1_700_000_000));

        // Flip one character of the event id.
        let tampered = minted.token.replace("summit-42", "summit-43");
        assert!(!codec.verify(&tampered, "gate-7", 1_700_000_000));
    }

    #[test]
    fn test_fixed_vector_from_shared_derivation() {
        // Signature = first 16 hex chars of SHA-256("E1|L1|1000|k").
        let codec = TokenCodec::new("k");
        let token = "E:E1|LID:L1|TS:1000|S:7857f7d1969cd2ba";

        assert!(codec.verify_with_window(token, "L1", 1300, 300));
        assert!(!codec.verify_with_window(token, "L1", 1301, 300));
        assert!(!codec.verify_with_window(token, "L2", 1300, 300));
    }

    #[test]
    fn test_debug_output_never_leaks_key() {
        let key = SigningKey::new("extremely-secret-value");
        let codec = TokenCodec::new(key.clone());
        let rendered = format!("{key:?} {codec:?}");
        assert!(!rendered.contains("extremely-secret-value"));
    }

    #[test]
    fn test_token_verification_from_json() {
        let json_data =
            fs::read_to_string("tests/test_tokens.json").expect("Failed to read test_tokens.json");
        let vectors: Value =
            serde_json::from_str(&json_data).expect("Failed to parse test_tokens.json");

        let codec = TokenCodec::new(vectors["secret_key"].as_str().unwrap());

        for token_value in vectors["tokens"].as_array().unwrap() {
            let name = token_value["name"].as_str().unwrap();
            let token = token_value["token"].as_str().unwrap();
            let metadata = &token_value["metadata"];

            let location = metadata["location"].as_str().unwrap();
            let current_time = metadata["current_time"].as_i64().unwrap();
            let window = metadata["validity_window"].as_i64().unwrap();
            let expected_result = metadata["expected_result"].as_bool().unwrap();
            let description = metadata["description"].as_str().unwrap_or("No description");

            let result = codec.verify_with_window(token, location, current_time, window);
            assert_eq!(
                result, expected_result,
                "Token '{}' verification resulted in {}, expected: {} - {}",
                name, result, expected_result, description
            );
        }
    }
}
