//! # ancora-governance
//!
//! Token-weighted governance over the risk parameters.
//!
//! Holders of the governance token propose new risk weights, vote with
//! their balance as weight, and execute passed proposals once the voting
//! window closes. The [`ProposalBook`] runs the lifecycle bookkeeping;
//! charging the proposal fee, reading voter balances and applying the
//! winning weights to the risk engine are assembly-layer concerns.

pub mod proposals;

pub use proposals::{Proposal, ProposalBook};

use ancora_fixed::{Fixed, FixedError};

/// Error types for governance operations.
#[derive(Debug, thiserror::Error)]
pub enum GovernanceError {
    /// A proposed parameter lies outside its admissible range.
    #[error("parameter out of range: {name} = {value}, admissible [{min}, {max}]")]
    ParameterOutOfRange {
        /// Name of the offending parameter.
        name: &'static str,
        /// The rejected value.
        value: Fixed,
        /// Lower bound of the admissible range.
        min: Fixed,
        /// Upper bound of the admissible range.
        max: Fixed,
    },

    /// The voting schedule is inconsistent.
    #[error("invalid voting schedule: {0}")]
    InvalidSchedule(String),

    /// No proposal exists under this id.
    #[error("unknown proposal {id}")]
    UnknownProposal {
        /// The id that was looked up.
        id: u64,
    },

    /// The action fell outside the proposal's voting window.
    #[error("voting is not active for proposal {id}")]
    VotingClosed {
        /// The proposal voted on.
        id: u64,
    },

    /// The account already voted on this proposal.
    #[error("already voted on proposal {id}")]
    AlreadyVoted {
        /// The proposal voted on.
        id: u64,
    },

    /// Quorum or majority was not reached.
    #[error("proposal {id} did not succeed")]
    ProposalNotSucceeded {
        /// The proposal being executed.
        id: u64,
    },

    /// The execution window has passed.
    #[error("proposal {id} expired")]
    ProposalExpired {
        /// The proposal being executed.
        id: u64,
    },

    /// The proposal was already executed.
    #[error("proposal {id} already executed")]
    AlreadyExecuted {
        /// The proposal being executed.
        id: u64,
    },

    /// Vote tallying arithmetic failed.
    #[error("vote arithmetic failed: {0}")]
    Math(#[from] FixedError),
}

/// Convenience result type for governance operations.
pub type Result<T> = std::result::Result<T, GovernanceError>;
