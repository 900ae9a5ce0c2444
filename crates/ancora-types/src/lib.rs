//! # ancora-types
//!
//! Shared domain types used across the Ancora workspace.

pub mod events;
pub mod status;

/// Common type aliases.
pub type AccountId = [u8; 32];
pub type AssetId = [u8; 32];
pub type Timestamp = u64;

/// Seconds per day, the unit of the staking reward rate and the
/// governance voting schedule.
pub const SECS_PER_DAY: u64 = 86400;

/// Build a 32-byte module principal from a short label, zero-padded.
const fn module_id(label: &[u8]) -> AccountId {
    let mut id = [0u8; 32];
    let mut i = 0;
    while i < label.len() && i < 32 {
        id[i] = label[i];
        i += 1;
    }
    id
}

/// Principal under which the vault mints and burns stablecoins.
pub const VAULT_MODULE: AccountId = module_id(b"ancora/vault");

/// Principal under which the gated direct mint path issues stablecoins.
pub const STABILIZER_MODULE: AccountId = module_id(b"ancora/stabilizer");

/// Principal holding staked stablecoins and the reward pool.
pub const STAKING_MODULE: AccountId = module_id(b"ancora/staking");

/// Principal collecting proposal fees.
pub const GOVERNANCE_TREASURY: AccountId = module_id(b"ancora/governance");

/// Short hex form of an account or asset id for logs and error text.
pub fn short_id(id: &[u8; 32]) -> String {
    hex::encode(&id[..4])
}

/// Hex-string serde for 32-byte identifiers, for `#[serde(with = ...)]`.
pub mod hexid {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(id: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(id))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[u8; 32], D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
        bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("expected 32 bytes"))
    }
}
