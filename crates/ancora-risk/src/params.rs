//! Governed risk parameters and their admissible ranges.
//!
//! The weights shape the composite risk score:
//!
//! ```text
//! score = alpha * d_sentiment
//!       + beta  * d_volatility
//!       + gamma * d_order_book_imbalance
//! ```
//!
//! clamped to `[0, 1]`. The cushion and wall are peg-deviation bands:
//! the wall bounds the mint gate, the cushion is a narrower band
//! reserved for auxiliary stabilization policy and is never part of the
//! mint decision.

use ancora_fixed::Fixed;
use serde::{Deserialize, Serialize};

use crate::{Result, RiskError};

/// Default sentiment weight (0.5).
pub const DEFAULT_ALPHA: Fixed = Fixed::from_raw(500_000_000_000_000_000);

/// Default volatility weight (0.5).
pub const DEFAULT_BETA: Fixed = Fixed::from_raw(500_000_000_000_000_000);

/// Default order-book-imbalance weight (0.1).
pub const DEFAULT_GAMMA: Fixed = Fixed::from_raw(100_000_000_000_000_000);

/// Default cushion band (1%).
pub const DEFAULT_CUSHION: Fixed = Fixed::from_raw(10_000_000_000_000_000);

/// Default wall band (2%).
pub const DEFAULT_WALL: Fixed = Fixed::from_raw(20_000_000_000_000_000);

/// Admissible range for alpha and beta: [0.1, 1.0].
pub const WEIGHT_MIN: Fixed = Fixed::from_raw(100_000_000_000_000_000);
pub const WEIGHT_MAX: Fixed = Fixed::ONE;

/// Admissible range for gamma: [0.05, 0.5].
pub const GAMMA_MIN: Fixed = Fixed::from_raw(50_000_000_000_000_000);
pub const GAMMA_MAX: Fixed = Fixed::from_raw(500_000_000_000_000_000);

/// Admissible range for the cushion: [0.001, 0.1].
pub const CUSHION_MIN: Fixed = Fixed::from_raw(1_000_000_000_000_000);
pub const CUSHION_MAX: Fixed = Fixed::from_raw(100_000_000_000_000_000);

/// Admissible range for the wall: [0.005, 0.2].
pub const WALL_MIN: Fixed = Fixed::from_raw(5_000_000_000_000_000);
pub const WALL_MAX: Fixed = Fixed::from_raw(200_000_000_000_000_000);

/// The governance-owned risk parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskParameters {
    /// Sentiment deviation weight.
    pub alpha: Fixed,
    /// Volatility deviation weight.
    pub beta: Fixed,
    /// Order-book-imbalance deviation weight.
    pub gamma: Fixed,
    /// Inner peg band reserved for auxiliary stabilization policy.
    pub cushion: Fixed,
    /// Maximum tolerated fractional deviation from peg before minting
    /// is blocked.
    pub wall: Fixed,
}

impl Default for RiskParameters {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            beta: DEFAULT_BETA,
            gamma: DEFAULT_GAMMA,
            cushion: DEFAULT_CUSHION,
            wall: DEFAULT_WALL,
        }
    }
}

impl RiskParameters {
    /// Validate every field against its admissible range.
    ///
    /// # Errors
    ///
    /// [`RiskError::ParameterOutOfRange`] naming the first offending
    /// field; a failed validation implies no field was applied.
    pub fn validate(&self) -> Result<()> {
        validate_range("alpha", self.alpha, WEIGHT_MIN, WEIGHT_MAX)?;
        validate_range("beta", self.beta, WEIGHT_MIN, WEIGHT_MAX)?;
        validate_range("gamma", self.gamma, GAMMA_MIN, GAMMA_MAX)?;
        validate_range("cushion", self.cushion, CUSHION_MIN, CUSHION_MAX)?;
        validate_range("wall", self.wall, WALL_MIN, WALL_MAX)?;
        Ok(())
    }

    /// Copy of `self` with the three weights replaced, bands retained.
    ///
    /// Governance proposals carry only the weights; the bands keep their
    /// previously governed values.
    pub fn with_weights(&self, alpha: Fixed, beta: Fixed, gamma: Fixed) -> Self {
        Self {
            alpha,
            beta,
            gamma,
            cushion: self.cushion,
            wall: self.wall,
        }
    }
}

/// Validate that a value is in `[min, max]`.
fn validate_range(name: &'static str, value: Fixed, min: Fixed, max: Fixed) -> Result<()> {
    if value < min || value > max {
        return Err(RiskError::ParameterOutOfRange {
            name,
            value,
            min,
            max,
        });
    }
    Ok(())
}
