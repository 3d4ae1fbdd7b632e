//! # Gatepass SDK
//!
//! Unified entry point for the Gatepass toolkit: issuing short-lived,
//! location-bound proof tokens, verifying presentations at an access
//! point, and recording awards for verified attendees.
//!
//! This crate combines functionality from:
//! - `gatepass-token`: the token codec and verification state machine
//! - `gatepass-config`: configuration management
//! - `gatepass-awards`: award and mint ledger bookkeeping
//!
//! and adds two host-side collaborators: a periodic [`Scheduler`] for
//! background work and an [`IdentityVerifier`] seam for gating
//! presentations on a verified person.
//!
//! ## Usage
//!
//! ```
//! use gatepass_sdk::{Gatepass, GatepassConfig, MintLedger, MintOutcome};
//!
//! fn main() -> Result<(), gatepass_sdk::SdkError> {
//!     let config = GatepassConfig::new("signing-secret", None, None);
//!     let gatepass = Gatepass::from_config(&config)?;
//!
//!     let minted = gatepass.issue("concert-2024", "main-gate");
//!     let record = gatepass.codec().parse(&minted.token)?;
//!
//!     let mut ledger = MintLedger::new();
//!     let outcome = gatepass.redeem(
//!         &minted.token,
//!         "main-gate",
//!         record.issued_at,
//!         "attendee-1",
//!         &mut ledger,
//!     );
//!     assert!(matches!(outcome, MintOutcome::Minted { .. }));
//!     Ok(())
//! }
//! ```

mod identity;
mod scheduler;

use thiserror::Error;

pub use gatepass_token::{
    mint_token, parse_token, verify_token_local, MintedToken, SigningKey, TokenCodec, TokenError,
    TokenRecord, TokenTimeConfig, DEFAULT_TOKEN_DURATION_SECS, DEFAULT_VALIDITY_WINDOW_SECS,
    SIGNATURE_LEN,
};

pub use gatepass_config::{
    get_default_config, set_default_config, try_load_default_config, ConfigError, GatepassConfig,
    GatepassConfigBuilder,
};

pub use gatepass_awards::{
    process_verification, AwardCollection, AwardError, AwardMetadata, AwardRecord, MintLedger,
    MintOutcome,
};

pub use identity::{IdentityVerifier, StubIdentityVerifier};
pub use scheduler::{Scheduler, SchedulerHandle};

/// Errors that can occur in the Gatepass SDK.
#[derive(Error, Debug)]
pub enum SdkError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Token error
    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    /// Award bookkeeping error
    #[error("Award error: {0}")]
    Award(#[from] AwardError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Generic(String),
}

/// Unified handle over a configured token codec.
///
/// Issues tokens with the configured duration, verifies presentations
/// with the configured window, and chains verification into the award
/// ledger. The handle is immutable after construction and can be shared
/// across threads.
#[derive(Debug, Clone)]
pub struct Gatepass {
    codec: TokenCodec,
    token_duration_secs: i64,
    validity_window_secs: i64,
}

impl Gatepass {
    /// Build from a validated configuration.
    pub fn from_config(config: &GatepassConfig) -> Result<Self, SdkError> {
        config.validate()?;
        Ok(Gatepass {
            codec: TokenCodec::new(config.secret_key.as_str()),
            token_duration_secs: config.token_duration_secs,
            validity_window_secs: config.validity_window_secs,
        })
    }

    /// Access the underlying codec.
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Issue a token for `event_id` at `location_id` with the configured
    /// duration.
    pub fn issue(&self, event_id: &str, location_id: &str) -> MintedToken {
        self.codec.generate_with_time(
            event_id,
            location_id,
            TokenTimeConfig::with_duration(self.token_duration_secs),
        )
    }

    /// Verify a presented token at `claimed_location_id` with the
    /// configured validity window. All failure modes collapse to `false`.
    pub fn verify_presentation(
        &self,
        token_text: &str,
        claimed_location_id: &str,
        current_time: i64,
    ) -> bool {
        self.codec.verify_with_window(
            token_text,
            claimed_location_id,
            current_time,
            self.validity_window_secs,
        )
    }

    /// Verify a presentation and, when it passes, record an award for
    /// `user_id` in the ledger.
    pub fn redeem(
        &self,
        token_text: &str,
        claimed_location_id: &str,
        current_time: i64,
        user_id: &str,
        ledger: &mut MintLedger,
    ) -> MintOutcome {
        if !self.verify_presentation(token_text, claimed_location_id, current_time) {
            return MintOutcome::Rejected {
                reason: "Invalid verification".to_string(),
            };
        }

        // A token that verified necessarily parses.
        match self.codec.parse(token_text) {
            Ok(record) => process_verification(
                true,
                &record.event_id,
                &record.location_id,
                user_id,
                ledger,
            ),
            Err(_) => MintOutcome::Rejected {
                reason: "Invalid verification".to_string(),
            },
        }
    }
}
