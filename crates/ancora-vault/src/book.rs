//! The vault book: every open position plus the collateral allow-list.
//!
//! Both entry points validate fully before touching stored state, so a
//! failed call leaves the book exactly as it was. Solvency is judged on
//! the post-state: `debt ≤ (collateral · price) / min_collateral_ratio`
//! must hold at the moment of every successful mutation.

use std::collections::{BTreeMap, BTreeSet};

use ancora_fixed::Fixed;
use ancora_types::{short_id, AccountId, AssetId, Timestamp};

use crate::{Result, VaultError, VaultPosition};

/// Default minimum collateralization ratio (150%).
pub const DEFAULT_MIN_COLLATERAL_RATIO: Fixed = Fixed::from_raw(1_500_000_000_000_000_000);

/// Admissible range for the minimum collateralization ratio: [1.0, 10.0].
pub const MIN_RATIO_MIN: Fixed = Fixed::ONE;
pub const MIN_RATIO_MAX: Fixed = Fixed::from_raw(10_000_000_000_000_000_000);

/// The largest debt `collateral` can support at `price`.
///
/// `max = (collateral · price) / min_ratio`.
///
/// # Errors
///
/// [`VaultError::Math`] if the valuation overflows 128 bits.
pub fn max_debt(collateral: Fixed, price: Fixed, min_ratio: Fixed) -> Result<Fixed> {
    let value = collateral.checked_mul(price)?;
    Ok(value.checked_div(min_ratio)?)
}

/// All open positions and the collateral allow-list.
#[derive(Clone, Debug)]
pub struct VaultBook {
    /// Open positions, at most one per owner.
    positions: BTreeMap<AccountId, VaultPosition>,
    /// Assets accepted as collateral.
    supported: BTreeSet<AssetId>,
    /// Minimum collateralization ratio applied to every position.
    min_collateral_ratio: Fixed,
}

impl Default for VaultBook {
    fn default() -> Self {
        Self::new()
    }
}

impl VaultBook {
    /// Create an empty book with the default 150% minimum ratio.
    pub fn new() -> Self {
        Self {
            positions: BTreeMap::new(),
            supported: BTreeSet::new(),
            min_collateral_ratio: DEFAULT_MIN_COLLATERAL_RATIO,
        }
    }

    /// Create an empty book with a specific minimum ratio.
    ///
    /// # Errors
    ///
    /// [`VaultError::ParameterOutOfRange`] if the ratio lies outside
    /// `[1.0, 10.0]`.
    pub fn with_min_ratio(min_collateral_ratio: Fixed) -> Result<Self> {
        if min_collateral_ratio < MIN_RATIO_MIN || min_collateral_ratio > MIN_RATIO_MAX {
            return Err(VaultError::ParameterOutOfRange {
                name: "min_collateral_ratio",
                value: min_collateral_ratio,
                min: MIN_RATIO_MIN,
                max: MIN_RATIO_MAX,
            });
        }
        Ok(Self {
            min_collateral_ratio,
            ..Self::new()
        })
    }

    /// The minimum collateralization ratio in force.
    pub fn min_collateral_ratio(&self) -> Fixed {
        self.min_collateral_ratio
    }

    /// Add or remove an asset from the collateral allow-list.
    ///
    /// Removing an asset stops new deposits; existing positions keep
    /// operating so owners can always unwind.
    pub fn set_collateral_support(&mut self, asset: AssetId, supported: bool) {
        if supported {
            self.supported.insert(asset);
        } else {
            self.supported.remove(&asset);
        }
        tracing::info!(
            asset = %short_id(&asset),
            supported,
            "collateral support changed"
        );
    }

    /// Whether `asset` is currently accepted as collateral.
    pub fn is_supported(&self, asset: &AssetId) -> bool {
        self.supported.contains(asset)
    }

    /// The owner's position, if one is open.
    pub fn position(&self, owner: &AccountId) -> Option<&VaultPosition> {
        self.positions.get(owner)
    }

    /// Number of open positions.
    pub fn position_count(&self) -> usize {
        self.positions.len()
    }

    /// Deposit collateral and issue debt against it.
    ///
    /// Accumulates into an existing position of the same asset. The
    /// post-state must be solvent at `price`. A zero-debt call is a
    /// pure deposit.
    ///
    /// # Errors
    ///
    /// - [`VaultError::UnsupportedCollateral`] if `asset` is not allow-listed
    /// - [`VaultError::CollateralMismatch`] if an existing position holds
    ///   a different asset
    /// - [`VaultError::InsufficientCollateral`] if the resulting debt
    ///   exceeds what the resulting collateral supports at `price`
    /// - [`VaultError::Math`] on valuation overflow
    pub fn create_vault(
        &mut self,
        owner: AccountId,
        asset: AssetId,
        collateral_amount: Fixed,
        debt_amount: Fixed,
        price: Fixed,
        now: Timestamp,
    ) -> Result<VaultPosition> {
        if !self.supported.contains(&asset) {
            return Err(VaultError::UnsupportedCollateral {
                asset: short_id(&asset),
            });
        }
        let prior = self.positions.get(&owner).copied();
        if let Some(held) = prior {
            if held.asset != asset {
                return Err(VaultError::CollateralMismatch {
                    held: short_id(&held.asset),
                    offered: short_id(&asset),
                });
            }
        }
        let base = prior.unwrap_or_else(|| VaultPosition::empty(owner, asset, now));
        let collateral = base.collateral.checked_add(collateral_amount)?;
        let debt = base.debt.checked_add(debt_amount)?;
        let max_allowed = max_debt(collateral, price, self.min_collateral_ratio)?;
        if debt > max_allowed {
            return Err(VaultError::InsufficientCollateral {
                requested: debt,
                max_allowed,
            });
        }
        let position = VaultPosition {
            collateral,
            debt,
            last_updated: now,
            ..base
        };
        self.store(position);
        tracing::info!(
            owner = %short_id(&owner),
            asset = %short_id(&asset),
            collateral = %position.collateral,
            debt = %position.debt,
            "vault position opened or extended"
        );
        Ok(position)
    }

    /// Repay debt and withdraw collateral in one step.
    ///
    /// Either both legs apply or neither does. While debt remains, the
    /// post-state must be solvent at `price`; a full repayment needs no
    /// valuation and succeeds at any price. A zero/zero call is a no-op.
    ///
    /// # Errors
    ///
    /// - [`VaultError::CollateralMismatch`] if the position holds a
    ///   different asset
    /// - [`VaultError::InsufficientDebt`] if `repay_amount` exceeds the
    ///   outstanding debt
    /// - [`VaultError::InsufficientCollateral`] if `withdraw_amount`
    ///   exceeds the locked collateral, or the post-state would be
    ///   insolvent at `price` while debt remains
    /// - [`VaultError::Math`] on valuation overflow
    pub fn repay_debt(
        &mut self,
        owner: AccountId,
        asset: AssetId,
        repay_amount: Fixed,
        withdraw_amount: Fixed,
        price: Fixed,
        now: Timestamp,
    ) -> Result<VaultPosition> {
        let current = self
            .positions
            .get(&owner)
            .copied()
            .unwrap_or_else(|| VaultPosition::empty(owner, asset, now));
        if repay_amount.is_zero() && withdraw_amount.is_zero() {
            return Ok(current);
        }
        if current.asset != asset {
            return Err(VaultError::CollateralMismatch {
                held: short_id(&current.asset),
                offered: short_id(&asset),
            });
        }
        if repay_amount > current.debt {
            return Err(VaultError::InsufficientDebt {
                requested: repay_amount,
                outstanding: current.debt,
            });
        }
        if withdraw_amount > current.collateral {
            return Err(VaultError::InsufficientCollateral {
                requested: withdraw_amount,
                max_allowed: current.collateral,
            });
        }
        // Exact: both amounts were bounded by the checks above.
        let debt = current.debt.abs_diff(repay_amount);
        let collateral = current.collateral.abs_diff(withdraw_amount);
        if !debt.is_zero() {
            let max_allowed = max_debt(collateral, price, self.min_collateral_ratio)?;
            if debt > max_allowed {
                return Err(VaultError::InsufficientCollateral {
                    requested: debt,
                    max_allowed,
                });
            }
        }
        let position = VaultPosition {
            collateral,
            debt,
            last_updated: now,
            ..current
        };
        self.store(position);
        tracing::info!(
            owner = %short_id(&owner),
            repaid = %repay_amount,
            withdrawn = %withdraw_amount,
            collateral = %position.collateral,
            debt = %position.debt,
            "vault debt repaid"
        );
        Ok(position)
    }

    /// Store a position, dropping it once both sides reach zero.
    fn store(&mut self, position: VaultPosition) {
        if position.is_empty() {
            self.positions.remove(&position.owner);
        } else {
            self.positions.insert(position.owner, position);
        }
    }
}
