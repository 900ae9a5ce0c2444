//! A single collateral/debt position.

use ancora_fixed::Fixed;
use ancora_types::{AccountId, AssetId, Timestamp};
use serde::{Deserialize, Serialize};

/// One owner's collateralized debt position.
///
/// A position exists from its first deposit until both amounts return
/// to zero, at which point the book drops it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultPosition {
    /// The owning account, sole authority over this position.
    #[serde(with = "ancora_types::hexid")]
    pub owner: AccountId,
    /// The collateral asset backing the debt.
    #[serde(with = "ancora_types::hexid")]
    pub asset: AssetId,
    /// Locked collateral amount.
    pub collateral: Fixed,
    /// Outstanding stablecoin debt.
    pub debt: Fixed,
    /// When the position was first created.
    pub created_at: Timestamp,
    /// When the position last changed.
    pub last_updated: Timestamp,
}

impl VaultPosition {
    /// A position with nothing locked and nothing owed.
    pub fn empty(owner: AccountId, asset: AssetId, now: Timestamp) -> Self {
        Self {
            owner,
            asset,
            collateral: Fixed::ZERO,
            debt: Fixed::ZERO,
            created_at: now,
            last_updated: now,
        }
    }

    /// Whether both sides of the position are zero.
    pub fn is_empty(&self) -> bool {
        self.collateral.is_zero() && self.debt.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_position() {
        let pos = VaultPosition::empty([1; 32], [2; 32], 100);
        assert!(pos.is_empty());
        assert_eq!(pos.created_at, 100);
    }

    #[test]
    fn test_position_with_collateral_is_not_empty() {
        let mut pos = VaultPosition::empty([1; 32], [2; 32], 100);
        pos.collateral = "50".parse().expect("parse");
        assert!(!pos.is_empty());
    }
}
