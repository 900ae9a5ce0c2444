//! Event types for external watchers.
//!
//! Every public state mutation produces one [`Event`] carrying the
//! acting principal, the operation timestamp and a JSON payload with the
//! operation's key amounts. Events are broadcast by the core's event bus
//! and consumed by auditors and UIs.

use serde::{Deserialize, Serialize};

use crate::AccountId;

/// Envelope for all protocol events.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Event {
    /// Monotonic sequence number assigned by the bus.
    pub seq: u64,
    pub event_type: EventType,
    /// The principal whose call produced the mutation.
    #[serde(with = "crate::hexid")]
    pub actor: AccountId,
    pub timestamp: u64,
    pub payload: serde_json::Value,
}

/// All event types.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    // Oracle & risk events
    PriceSubmitted,
    BaselinesUpdated,
    CurrentValuesUpdated,
    RiskFactorsUpdated,
    RiskParametersChanged,
    MintPolicyChanged,
    StabilizationToggled,

    // Vault & token events
    CollateralSupportChanged,
    VaultCreated,
    DebtRepaid,
    TokensMinted,
    TokensBurned,
    TokensTransferred,

    // Staking events
    Staked,
    Withdrawn,
    RewardClaimed,
    RewardRateChanged,

    // Governance events
    ProposalCreated,
    VoteCast,
    ProposalExecuted,
    GovernanceTransferred,

    // System events
    SystemPaused,
    SystemResumed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_serializes_snake_case() {
        let json = serde_json::to_string(&EventType::PriceSubmitted).expect("serialize");
        assert_eq!(json, "\"price_submitted\"");
        let json = serde_json::to_string(&EventType::RewardClaimed).expect("serialize");
        assert_eq!(json, "\"reward_claimed\"");
    }

    #[test]
    fn test_actor_round_trips_as_hex() {
        let event = Event {
            seq: 7,
            event_type: EventType::VaultCreated,
            actor: [0xAB; 32],
            timestamp: 1_700_000_000,
            payload: serde_json::json!({ "debt": "50" }),
        };
        let json = serde_json::to_string(&event).expect("serialize");
        assert!(json.contains(&hex::encode([0xAB; 32])));
        let back: Event = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.actor, [0xAB; 32]);
        assert_eq!(back.seq, 7);
        assert_eq!(back.event_type, EventType::VaultCreated);
    }
}
