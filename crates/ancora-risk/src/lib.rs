//! # ancora-risk
//!
//! Risk-based stabilization engine for the Ancora protocol.
//!
//! The engine tracks a baseline and a current snapshot of three market
//! signals (sentiment, volatility, order-book imbalance), caches the
//! per-signal deviation ratios, and reduces them to a single weighted
//! risk score in `[0, 1]`. The score feeds the stabilization gate that
//! decides whether new stablecoins may be minted.
//!
//! ## Modules
//!
//! - [`signals`] — market signal snapshots and deviation ratios
//! - [`params`] — governed risk parameters and their admissible ranges
//! - [`engine`] — the stage machine and score computation

pub mod engine;
pub mod params;
pub mod signals;

pub use engine::{RiskEngine, RiskStage};
pub use params::RiskParameters;
pub use signals::{DeviationRatios, MarketSignals};

use ancora_fixed::Fixed;

/// Error types for risk engine operations.
#[derive(Debug, thiserror::Error)]
pub enum RiskError {
    /// A governed parameter lies outside its admissible range.
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

    /// A baseline signal was zero in a recalibration.
    #[error("baseline {signal} must be positive")]
    NonPositiveBaseline {
        /// Name of the offending signal.
        signal: &'static str,
    },

    /// A deviation ratio was requested against a zero baseline.
    #[error("division by zero baseline: {signal}")]
    ZeroBaseline {
        /// Name of the offending signal.
        signal: &'static str,
    },

    /// Current-values update attempted before the interval elapsed.
    #[error("cooldown active: {elapsed}s elapsed of {required}s required")]
    CooldownActive {
        /// Seconds since the last accepted current-values update.
        elapsed: u64,
        /// Minimum seconds between updates.
        required: u64,
    },

    /// Operation not valid in the engine's current stage.
    #[error("invalid state: expected {expected}, currently {actual}")]
    InvalidState {
        /// The stage the operation requires.
        expected: &'static str,
        /// The stage the engine is in.
        actual: &'static str,
    },
}

/// Convenience result type for risk engine operations.
pub type Result<T> = std::result::Result<T, RiskError>;
