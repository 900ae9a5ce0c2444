//! The mint policy and the stabilization decision.
//!
//! [`can_mint`] is a pure function of the risk score, the fresh oracle
//! price and the governed configuration. It holds no state of its own;
//! callers evaluate it at the instant of each mint attempt.

use std::fmt;

use ancora_fixed::Fixed;
use ancora_risk::RiskParameters;
use serde::{Deserialize, Serialize};

use crate::{MintError, Result};

/// Default risk-score threshold (0.5).
pub const DEFAULT_RISK_THRESHOLD: Fixed = Fixed::from_raw(500_000_000_000_000_000);

/// Admissible range for the risk threshold: [0.05, 1.0].
pub const RISK_THRESHOLD_MIN: Fixed = Fixed::from_raw(50_000_000_000_000_000);
pub const RISK_THRESHOLD_MAX: Fixed = Fixed::ONE;

/// Admissible range for the peg: [0.1, 10.0].
pub const PEG_MIN: Fixed = Fixed::from_raw(100_000_000_000_000_000);
pub const PEG_MAX: Fixed = Fixed::from_raw(10_000_000_000_000_000_000);

/// Governed mint-gate configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintPolicy {
    /// Target reference price the stablecoin tracks.
    pub peg: Fixed,
    /// Scores at or above this threshold block minting.
    pub risk_threshold: Fixed,
    /// Whether the gate is enforced; while disabled every decision is
    /// approved (authorization and pause still apply upstream).
    pub enabled: bool,
}

impl Default for MintPolicy {
    fn default() -> Self {
        Self {
            peg: Fixed::ONE,
            risk_threshold: DEFAULT_RISK_THRESHOLD,
            enabled: true,
        }
    }
}

impl MintPolicy {
    /// Validate the policy against its admissible ranges.
    ///
    /// # Errors
    ///
    /// [`MintError::ParameterOutOfRange`] naming the offending field.
    pub fn validate(&self) -> Result<()> {
        if self.peg < PEG_MIN || self.peg > PEG_MAX {
            return Err(MintError::ParameterOutOfRange {
                name: "peg",
                value: self.peg,
                min: PEG_MIN,
                max: PEG_MAX,
            });
        }
        if self.risk_threshold < RISK_THRESHOLD_MIN || self.risk_threshold > RISK_THRESHOLD_MAX {
            return Err(MintError::ParameterOutOfRange {
                name: "risk_threshold",
                value: self.risk_threshold,
                min: RISK_THRESHOLD_MIN,
                max: RISK_THRESHOLD_MAX,
            });
        }
        Ok(())
    }
}

/// Why a mint decision was blocked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason")]
pub enum BlockReason {
    /// The risk score reached the governed threshold.
    RiskAboveThreshold {
        /// The score at decision time.
        score: Fixed,
        /// The governed threshold.
        threshold: Fixed,
    },
    /// The price left the wall band around the peg.
    PegDeviationExceeded {
        /// Fractional deviation from peg at decision time.
        deviation: Fixed,
        /// The governed wall band.
        wall: Fixed,
    },
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockReason::RiskAboveThreshold { score, threshold } => {
                write!(f, "risk score {score} at or above threshold {threshold}")
            }
            BlockReason::PegDeviationExceeded { deviation, wall } => {
                write!(f, "peg deviation {deviation} exceeds wall {wall}")
            }
        }
    }
}

/// Outcome of a mint decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateVerdict {
    /// Minting may proceed.
    Approved,
    /// Minting is blocked for the given reason.
    Blocked(BlockReason),
}

impl GateVerdict {
    /// Whether the decision approved minting.
    pub fn is_approved(self) -> bool {
        matches!(self, GateVerdict::Approved)
    }
}

/// Decide whether minting may proceed.
///
/// The legs are checked in order: the risk threshold first, then the
/// wall band. Both must hold for approval. A disabled policy approves
/// unconditionally.
///
/// # Arguments
///
/// * `risk_score` - The engine's composite score at decision time.
/// * `price` - The fresh oracle price at decision time.
/// * `params` - Governed risk parameters (supplies the wall).
/// * `policy` - Governed mint policy (peg, threshold, enabled).
pub fn can_mint(
    risk_score: Fixed,
    price: Fixed,
    params: &RiskParameters,
    policy: &MintPolicy,
) -> GateVerdict {
    if !policy.enabled {
        return GateVerdict::Approved;
    }
    if risk_score >= policy.risk_threshold {
        return GateVerdict::Blocked(BlockReason::RiskAboveThreshold {
            score: risk_score,
            threshold: policy.risk_threshold,
        });
    }
    let deviation = peg_deviation(price, policy.peg);
    if deviation > params.wall {
        return GateVerdict::Blocked(BlockReason::PegDeviationExceeded {
            deviation,
            wall: params.wall,
        });
    }
    GateVerdict::Approved
}

/// Fractional deviation of `price` from `peg`, `|price - peg| / peg`.
///
/// The peg is validated positive by [`MintPolicy::validate`]. A
/// deviation too large for 128 bits pins to the maximum, which every
/// band comparison treats as out of band.
pub fn peg_deviation(price: Fixed, peg: Fixed) -> Fixed {
    price
        .abs_diff(peg)
        .checked_div(peg)
        .unwrap_or(Fixed::from_raw(u128::MAX))
}

/// Whether `price` sits inside the cushion band around the peg.
///
/// The cushion is a narrower band reserved for auxiliary stabilization
/// policy. It is exposed for consistency checks only and plays no part
/// in [`can_mint`].
pub fn is_within_cushion(price: Fixed, params: &RiskParameters, policy: &MintPolicy) -> bool {
    peg_deviation(price, policy.peg) <= params.cushion
}
