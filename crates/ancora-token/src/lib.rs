//! # ancora-token
//!
//! Balance and supply ledger for the protocol tokens.
//!
//! A [`TokenLedger`] tracks per-account balances and the total supply for
//! one token. Supply changes (mint and burn) are restricted to registered
//! module principals; transfers are open to any holder. The ledger holds
//! no policy of its own: the stabilization decision that gates stablecoin
//! issuance lives upstream in the assembly.

pub mod ledger;

pub use ledger::TokenLedger;

use ancora_fixed::Fixed;

/// Error types for ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Caller is not a registered module principal.
    #[error("account {account} is not authorized to change supply")]
    Unauthorized {
        /// Abbreviated account identifier.
        account: String,
    },

    /// Insufficient balance for the operation.
    #[error("insufficient balance: have {available}, need {required}")]
    InsufficientBalance {
        /// Available balance.
        available: Fixed,
        /// Required amount.
        required: Fixed,
    },

    /// Arithmetic overflow while adjusting supply.
    #[error("token supply overflow")]
    Overflow,
}

/// Convenience result type for ledger operations.
pub type Result<T> = std::result::Result<T, TokenError>;
