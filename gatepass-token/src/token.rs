use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::TokenError;
use crate::mint::{mint_token, MintedToken, TokenTimeConfig};
use crate::verify::{verify_token_local, DEFAULT_VALIDITY_WINDOW_SECS};

/// Field tag for the event identifier.
pub const FIELD_EVENT: &str = "E";
/// Field tag for the issuance location identifier.
pub const FIELD_LOCATION: &str = "LID";
/// Field tag for the issuance timestamp.
pub const FIELD_TIMESTAMP: &str = "TS";
/// Field tag for the truncated signature.
pub const FIELD_SIGNATURE: &str = "S";

/// Separator between `key:value` items in the wire format.
pub const ITEM_DELIMITER: char = '|';
/// Separator between a field tag and its value.
pub const FIELD_DELIMITER: char = ':';

/// The secret signing key held by a [`TokenCodec`].
///
/// The key is the sole trust root for every signature the codec produces
/// or checks. It is never embedded in serialized output, its `Debug`
/// rendering is redacted, and the backing memory is zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SigningKey(String);

impl SigningKey {
    pub fn new(secret: impl Into<String>) -> Self {
        SigningKey(secret.into())
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SigningKey {
    fn from(secret: &str) -> Self {
        SigningKey::new(secret)
    }
}

impl From<String> for SigningKey {
    fn from(secret: String) -> Self {
        SigningKey(secret)
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey(<redacted>)")
    }
}

/// The parsed, in-memory form of a token.
///
/// A `TokenRecord` is a pure value: it has no identity beyond its four
/// fields and is never mutated after construction. Records built by the
/// codec's own serialize path always carry a 16-character lowercase hex
/// signature; a record decoded from untrusted text carries whatever raw
/// strings the text held, validated only structurally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub event_id: String,
    pub location_id: String,
    /// Seconds since the Unix epoch at the moment of generation.
    pub issued_at: i64,
    pub signature: String,
}

impl TokenRecord {
    /// Serialize to the wire format, four `key:value` fields in fixed order:
    ///
    /// ```text
    /// E:<event_id>|LID:<location_id>|TS:<issued_at>|S:<signature>
    /// ```
    ///
    /// Field values must not contain `|` or `:`; the codec does not escape
    /// them. That is a format constraint on callers.
    pub fn to_wire(&self) -> String {
        format!(
            "{FIELD_EVENT}{FIELD_DELIMITER}{}{ITEM_DELIMITER}\
             {FIELD_LOCATION}{FIELD_DELIMITER}{}{ITEM_DELIMITER}\
             {FIELD_TIMESTAMP}{FIELD_DELIMITER}{}{ITEM_DELIMITER}\
             {FIELD_SIGNATURE}{FIELD_DELIMITER}{}",
            self.event_id, self.location_id, self.issued_at, self.signature
        )
    }
}

/// Parse token text into a [`TokenRecord`] without checking the signature.
///
/// This is a pure structural decode: it accepts the four required fields in
/// any order, tolerates unknown well-formed `key:value` items, and lets the
/// last occurrence win when a key repeats. Any item lacking a `:` aborts
/// the whole parse, as does a missing required field or a non-integer
/// timestamp.
pub fn parse_token(token_text: &str) -> Result<TokenRecord, TokenError> {
    let mut event_id: Option<&str> = None;
    let mut location_id: Option<&str> = None;
    let mut timestamp: Option<&str> = None;
    let mut signature: Option<&str> = None;

    for item in token_text.split(ITEM_DELIMITER) {
        let (key, value) = item
            .split_once(FIELD_DELIMITER)
            .ok_or_else(|| TokenError::malformed("item without field delimiter"))?;
        match key {
            FIELD_EVENT => event_id = Some(value),
            FIELD_LOCATION => location_id = Some(value),
            FIELD_TIMESTAMP => timestamp = Some(value),
            FIELD_SIGNATURE => signature = Some(value),
            // Unknown but well-formed items are tolerated.
            _ => {}
        }
    }

    let event_id = event_id.ok_or_else(|| TokenError::malformed("missing event field"))?;
    let location_id = location_id.ok_or_else(|| TokenError::malformed("missing location field"))?;
    let timestamp = timestamp.ok_or_else(|| TokenError::malformed("missing timestamp field"))?;
    let signature = signature.ok_or_else(|| TokenError::malformed("missing signature field"))?;

    let issued_at: i64 = timestamp
        .parse()
        .map_err(|_| TokenError::malformed("timestamp is not an integer"))?;

    Ok(TokenRecord {
        event_id: event_id.to_string(),
        location_id: location_id.to_string(),
        issued_at,
        signature: signature.to_string(),
    })
}

/// Issues and verifies location-bound proof tokens.
///
/// The codec owns the secret signing key for its entire lifetime and holds
/// no other state, so a single instance may be shared freely across
/// threads; every operation is a pure synchronous transform using its own
/// local hash context. Two codecs constructed with different keys cannot
/// validate each other's tokens.
#[derive(Debug, Clone)]
pub struct TokenCodec {
    key: SigningKey,
}

impl TokenCodec {
    pub fn new(key: impl Into<SigningKey>) -> Self {
        TokenCodec { key: key.into() }
    }

    /// Generate a token for `event_id` at `location_id`, issued now.
    ///
    /// Returns the token text together with an advisory expiry timestamp
    /// (`issued_at + duration`). The expiry is informational for the
    /// issuer only: it is not embedded in the token and is never consulted
    /// by [`verify`](Self::verify), which derives freshness independently
    /// from the embedded timestamp and the verifier's window.
    pub fn generate(&self, event_id: &str, location_id: &str) -> MintedToken {
        mint_token(&self.key, event_id, location_id, TokenTimeConfig::default())
    }

    /// Generate with explicit time settings (custom duration or a fixed
    /// issuance time for reproducible output).
    pub fn generate_with_time(
        &self,
        event_id: &str,
        location_id: &str,
        time_config: TokenTimeConfig,
    ) -> MintedToken {
        mint_token(&self.key, event_id, location_id, time_config)
    }

    /// Structurally decode token text without checking the signature.
    pub fn parse(&self, token_text: &str) -> Result<TokenRecord, TokenError> {
        parse_token(token_text)
    }

    /// Verify a presented token against a claimed location and the current
    /// time, with the default 300 second validity window.
    ///
    /// Every failure mode collapses to `false`: callers cannot distinguish
    /// a malformed token from a location mismatch, a bad signature, or an
    /// expired token. The check order and semantics are documented on
    /// [`verify_token_local`].
    pub fn verify(&self, token_text: &str, claimed_location_id: &str, current_time: i64) -> bool {
        self.verify_with_window(
            token_text,
            claimed_location_id,
            current_time,
            DEFAULT_VALIDITY_WINDOW_SECS,
        )
    }

    /// Verify with an explicit validity window in seconds.
    pub fn verify_with_window(
        &self,
        token_text: &str,
        claimed_location_id: &str,
        current_time: i64,
        validity_window_seconds: i64,
    ) -> bool {
        match verify_token_local(
            &self.key,
            token_text,
            claimed_location_id,
            current_time,
            validity_window_seconds,
        ) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!("token verification failed: {e}");
                false
            }
        }
    }
}
