//! # ancora-mint
//!
//! Stabilization gate for stablecoin issuance.
//!
//! Minting is allowed only while the market looks healthy on two
//! independent axes: the composite risk score must sit below the
//! governed threshold, and the oracle price must sit within the wall
//! band around the peg. The score captures slower-moving signal stress;
//! the wall catches an immediate price dislocation. Either alone is not
//! enough, so the gate requires both.
//!
//! ## Modules
//!
//! - [`gate`] — the mint policy and the pure `can_mint` decision

pub mod gate;

pub use gate::{can_mint, is_within_cushion, BlockReason, GateVerdict, MintPolicy};

use ancora_fixed::Fixed;

/// Error types for mint policy configuration.
#[derive(Debug, thiserror::Error)]
pub enum MintError {
    /// A policy value lies outside its admissible range.
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
}

/// Convenience result type for mint policy operations.
pub type Result<T> = std::result::Result<T, MintError>;
