//! # Gatepass Awards
//!
//! Local bookkeeping for awards handed out after a successful token
//! presentation: a collection of numbered award records bound to a
//! contract, a ledger of who already received one, and the decision
//! that turns a verification outcome into a mint result.
//!
//! This crate performs no blockchain or asset-issuance protocol work;
//! it only records decisions so a host application can act on them.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Errors produced by award bookkeeping.
#[derive(Error, Debug)]
pub enum AwardError {
    #[error("A valid contract address must be set before creating awards")]
    MissingContract,
}

/// A single numbered award bound to its collection contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwardRecord {
    pub id: u64,
    pub contract: String,
}

/// Manages the creation of award records for one event collection.
#[derive(Debug, Clone, Default)]
pub struct AwardCollection {
    contract_address: String,
    awards: Vec<AwardRecord>,
}

impl AwardCollection {
    pub fn new(contract_address: impl Into<String>) -> Self {
        AwardCollection {
            contract_address: contract_address.into(),
            awards: Vec::new(),
        }
    }

    /// Create `total_supply` sequentially numbered awards, appending to
    /// any previously created ones.
    pub fn create_awards(&mut self, total_supply: u64) -> Result<&[AwardRecord], AwardError> {
        if self.contract_address.is_empty() {
            return Err(AwardError::MissingContract);
        }

        let start = self.awards.len() as u64;
        for i in 0..total_supply {
            self.awards.push(AwardRecord {
                id: start + i + 1,
                contract: self.contract_address.clone(),
            });
        }

        info!(
            contract = %self.contract_address,
            total = self.awards.len(),
            "award records created"
        );

        Ok(&self.awards)
    }

    pub fn awards(&self) -> &[AwardRecord] {
        &self.awards
    }

    pub fn contract_address(&self) -> &str {
        &self.contract_address
    }
}

/// Metadata describing what a minted award commemorates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwardMetadata {
    pub event_id: String,
    pub location_id: String,
}

/// The outcome of processing one verification for minting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MintOutcome {
    /// A new award was recorded for this user and event.
    Minted { metadata: AwardMetadata },
    /// This user already received an award for this event.
    Duplicate,
    /// The presentation did not verify; nothing was recorded.
    Rejected { reason: String },
}

/// Tracks which `(user, event)` pairs have already been awarded.
#[derive(Debug, Clone, Default)]
pub struct MintLedger {
    minted: HashSet<(String, String)>,
}

impl MintLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, user_id: &str, event_id: &str) -> bool {
        self.minted
            .contains(&(user_id.to_string(), event_id.to_string()))
    }

    pub fn record(&mut self, user_id: &str, event_id: &str) -> bool {
        self.minted
            .insert((user_id.to_string(), event_id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.minted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.minted.is_empty()
    }
}

/// Decide whether a verified presentation should mint an award.
///
/// A failed verification is rejected outright; a `(user, event)` pair that
/// already minted is reported as a duplicate; otherwise the pair is
/// recorded in the ledger and the award metadata is returned.
pub fn process_verification(
    verified: bool,
    event_id: &str,
    location_id: &str,
    user_id: &str,
    ledger: &mut MintLedger,
) -> MintOutcome {
    if !verified {
        return MintOutcome::Rejected {
            reason: "Invalid verification".to_string(),
        };
    }

    if ledger.contains(user_id, event_id) {
        return MintOutcome::Duplicate;
    }

    ledger.record(user_id, event_id);
    info!(user_id, event_id, location_id, "award minted");

    MintOutcome::Minted {
        metadata: AwardMetadata {
            event_id: event_id.to_string(),
            location_id: location_id.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_awards() {
        let mut collection = AwardCollection::new("0xabc123");
        let awards = collection.create_awards(3).unwrap();
        assert_eq!(awards.len(), 3);
        assert_eq!(awards[0].id, 1);
        assert_eq!(awards[2].id, 3);
        assert!(awards.iter().all(|a| a.contract == "0xabc123"));
    }

    #[test]
    fn test_create_awards_appends() {
        let mut collection = AwardCollection::new("0xabc123");
        collection.create_awards(2).unwrap();
        collection.create_awards(2).unwrap();
        let ids: Vec<u64> = collection.awards().iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_create_awards_requires_contract() {
        let mut collection = AwardCollection::new("");
        let result = collection.create_awards(1);
        assert!(matches!(result, Err(AwardError::MissingContract)));
    }

    #[test]
    fn test_process_rejects_failed_verification() {
        let mut ledger = MintLedger::new();
        let outcome = process_verification(false, "summit-42", "gate-7", "user-1", &mut ledger);
        assert!(matches!(outcome, MintOutcome::Rejected { .. }));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_process_mints_then_suppresses_duplicate() {
        let mut ledger = MintLedger::new();

        let outcome = process_verification(true, "summit-42", "gate-7", "user-1", &mut ledger);
        match outcome {
            MintOutcome::Minted { metadata } => {
                assert_eq!(metadata.event_id, "summit-42");
                assert_eq!(metadata.location_id, "gate-7");
            }
            other => panic!("expected mint, got {other:?}"),
        }

        let outcome = process_verification(true, "summit-42", "gate-7", "user-1", &mut ledger);
        assert_eq!(outcome, MintOutcome::Duplicate);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_distinct_users_and_events_mint_independently() {
        let mut ledger = MintLedger::new();
        assert!(matches!(
            process_verification(true, "summit-42", "gate-7", "user-1", &mut ledger),
            MintOutcome::Minted { .. }
        ));
        assert!(matches!(
            process_verification(true, "summit-42", "gate-7", "user-2", &mut ledger),
            MintOutcome::Minted { .. }
        ));
        assert!(matches!(
            process_verification(true, "open-day", "door-3", "user-1", &mut ledger),
            MintOutcome::Minted { .. }
        ));
        assert_eq!(ledger.len(), 3);
    }
}
