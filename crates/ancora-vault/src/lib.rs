//! # ancora-vault
//!
//! Collateralized debt positions (CDP ledger).
//!
//! Each account holds at most one [`VaultPosition`] pairing locked
//! collateral with outstanding stablecoin debt, subject to a minimum
//! collateralization ratio. Valuations always use the price supplied by
//! the caller at the instant of the call; the book never caches one.
//!
//! The book only moves numbers. Custody of collateral tokens, minting
//! and burning of the debt token, and the stabilization gate all live
//! in the assembly layer, which sequences them around the book's
//! mutations.

pub mod book;
pub mod position;

pub use book::{max_debt, VaultBook, DEFAULT_MIN_COLLATERAL_RATIO};
pub use position::VaultPosition;

use ancora_fixed::{Fixed, FixedError};

/// Error types for vault operations.
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    /// Collateral asset is not on the allow-list.
    #[error("collateral asset {asset} is not supported")]
    UnsupportedCollateral {
        /// Abbreviated asset identifier.
        asset: String,
    },

    /// The position already holds a different collateral asset.
    #[error("position holds collateral {held}, cannot mix with {offered}")]
    CollateralMismatch {
        /// Abbreviated identifier of the held asset.
        held: String,
        /// Abbreviated identifier of the offered asset.
        offered: String,
    },

    /// Collateral cannot support the requested debt or withdrawal.
    #[error("insufficient collateral: requested {requested}, maximum allowed {max_allowed}")]
    InsufficientCollateral {
        /// The amount sought (resulting debt, or collateral to withdraw).
        requested: Fixed,
        /// The maximum the position supports.
        max_allowed: Fixed,
    },

    /// Repay amount exceeds the outstanding debt.
    #[error("repay {requested} exceeds outstanding debt {outstanding}")]
    InsufficientDebt {
        /// The repayment requested.
        requested: Fixed,
        /// The debt actually outstanding.
        outstanding: Fixed,
    },

    /// A governance-set parameter lies outside its admissible range.
    #[error("{name} = {value} outside admissible range [{min}, {max}]")]
    ParameterOutOfRange {
        /// The offending parameter.
        name: &'static str,
        /// The rejected value.
        value: Fixed,
        /// Lower bound of the admissible range.
        min: Fixed,
        /// Upper bound of the admissible range.
        max: Fixed,
    },

    /// Fixed-point arithmetic failed during valuation.
    #[error("valuation arithmetic failed: {0}")]
    Math(#[from] FixedError),
}

/// Convenience result type for vault operations.
pub type Result<T> = std::result::Result<T, VaultError>;
