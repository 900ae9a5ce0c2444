//! # ancora-staking
//!
//! Stablecoin staking with proportional governance-token rewards.
//!
//! A [`StakePool`] distributes a fixed emission of governance tokens per
//! day across all stakers in proportion to their stake over time, using
//! a global reward-per-token accumulator settled lazily on every
//! interaction. The pool only does the accounting: token custody (moving
//! staked coins in, paying rewards out) belongs to the assembly layer.

pub mod pool;

pub use pool::{StakePool, DEFAULT_REWARD_RATE};

use ancora_fixed::{Fixed, FixedError};

/// Error types for staking operations.
#[derive(Debug, thiserror::Error)]
pub enum StakingError {
    /// Stake amount was zero.
    #[error("cannot stake zero")]
    ZeroStake,

    /// Withdrawal exceeds the staked amount.
    #[error("withdrawal {requested} exceeds staked {staked}")]
    InsufficientStake {
        /// The withdrawal requested.
        requested: Fixed,
        /// The amount actually staked.
        staked: Fixed,
    },

    /// Nothing pending to claim.
    #[error("no rewards to claim")]
    NoRewards,

    /// Reward arithmetic failed.
    #[error("reward arithmetic failed: {0}")]
    Math(#[from] FixedError),
}

/// Convenience result type for staking operations.
pub type Result<T> = std::result::Result<T, StakingError>;
