//! # ancora-core
//!
//! The assembled protocol: one state object wiring the price oracle,
//! risk engine, stabilization gate, vault book, token ledgers, staking
//! pool and parameter governance behind a single set of authorized
//! entry points.
//!
//! The core owns all component state and enforces the two cross-cutting
//! rules the components cannot see on their own: the emergency pause,
//! which rejects every state-changing call while leaving views readable,
//! and the governance principal, which alone may change parameters.
//! Every mutation that goes through is announced on the event bus.
//!
//! ## Modules
//!
//! - [`config`] — deployment configuration loaded from TOML
//! - [`events`] — broadcast bus for protocol events
//! - [`system`] — the [`StabilityCore`] state machine

pub mod config;
pub mod events;
pub mod system;

pub use config::ProtocolConfig;
pub use events::EventBus;
pub use system::StabilityCore;

use ancora_mint::BlockReason;

/// Error types for core operations.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The system is paused; state-changing calls are rejected.
    #[error("system is paused")]
    Paused,

    /// The caller is not the governance account.
    #[error("account {actor} is not authorized for governance operations")]
    Unauthorized {
        /// Short id of the rejected caller.
        actor: String,
    },

    /// The stabilization gate refused an issuance request.
    #[error("stabilization blocked: {reason}")]
    StabilizationBlocked {
        /// Why the gate refused.
        reason: BlockReason,
    },

    /// Error from the price oracle.
    #[error("oracle error: {0}")]
    Oracle(#[from] ancora_oracle::OracleError),

    /// Error from the risk engine.
    #[error("risk error: {0}")]
    Risk(#[from] ancora_risk::RiskError),

    /// Error from mint policy validation.
    #[error("mint policy error: {0}")]
    Mint(#[from] ancora_mint::MintError),

    /// Error from the vault book.
    #[error("vault error: {0}")]
    Vault(#[from] ancora_vault::VaultError),

    /// Error from a token ledger.
    #[error("token error: {0}")]
    Token(#[from] ancora_token::TokenError),

    /// Error from the staking pool.
    #[error("staking error: {0}")]
    Staking(#[from] ancora_staking::StakingError),

    /// Error from proposal governance.
    #[error("governance error: {0}")]
    Governance(#[from] ancora_governance::GovernanceError),

    /// Fixed-point arithmetic failed.
    #[error("arithmetic failed: {0}")]
    Math(#[from] ancora_fixed::FixedError),

    /// Configuration file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed.
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

/// Convenience result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
