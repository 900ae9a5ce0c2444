//! Per-token balance and supply accounting.
//!
//! Every operation validates before it mutates, so a failed call leaves
//! the ledger exactly as it was. The `check_*` views expose the same
//! validation to callers that need to pre-flight a multi-step operation
//! before committing any of its legs.

use std::collections::{BTreeMap, BTreeSet};

use ancora_fixed::Fixed;
use ancora_types::{short_id, AccountId};

use crate::{Result, TokenError};

/// Balances and supply for a single token.
#[derive(Clone, Debug)]
pub struct TokenLedger {
    /// Display symbol used in logs.
    symbol: String,
    /// Per-account balances. Accounts with zero balance carry no entry.
    balances: BTreeMap<AccountId, Fixed>,
    /// Sum of all balances.
    total_supply: Fixed,
    /// Module principals allowed to mint and burn.
    minters: BTreeSet<AccountId>,
}

impl TokenLedger {
    /// Create an empty ledger with zero supply.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            balances: BTreeMap::new(),
            total_supply: Fixed::ZERO,
            minters: BTreeSet::new(),
        }
    }

    /// Create a ledger with a fixed initial supply credited to one account.
    pub fn with_initial_supply(
        symbol: impl Into<String>,
        recipient: AccountId,
        amount: Fixed,
    ) -> Self {
        let mut ledger = Self::new(symbol);
        if !amount.is_zero() {
            ledger.balances.insert(recipient, amount);
            ledger.total_supply = amount;
        }
        ledger
    }

    /// The token's display symbol.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Current total supply.
    pub fn total_supply(&self) -> Fixed {
        self.total_supply
    }

    /// Balance of `account`, zero if it has never held this token.
    pub fn balance_of(&self, account: &AccountId) -> Fixed {
        self.balances.get(account).copied().unwrap_or(Fixed::ZERO)
    }

    /// Register a module principal allowed to mint and burn.
    pub fn add_minter(&mut self, principal: AccountId) {
        self.minters.insert(principal);
        tracing::debug!(
            token = %self.symbol,
            principal = %short_id(&principal),
            "registered supply principal"
        );
    }

    /// Revoke a module principal. Returns whether it was registered.
    pub fn remove_minter(&mut self, principal: &AccountId) -> bool {
        self.minters.remove(principal)
    }

    /// Whether `principal` may mint and burn.
    pub fn is_minter(&self, principal: &AccountId) -> bool {
        self.minters.contains(principal)
    }

    /// Validate a mint without performing it.
    ///
    /// # Errors
    ///
    /// - [`TokenError::Unauthorized`] if `principal` is not registered
    /// - [`TokenError::Overflow`] if the supply cannot absorb `amount`
    pub fn check_mint(&self, principal: &AccountId, amount: Fixed) -> Result<()> {
        if !self.minters.contains(principal) {
            return Err(TokenError::Unauthorized {
                account: short_id(principal),
            });
        }
        self.total_supply
            .checked_add(amount)
            .map_err(|_| TokenError::Overflow)?;
        Ok(())
    }

    /// Mint `amount` to `to`, growing the supply.
    ///
    /// A zero amount is a no-op after the authorization check.
    ///
    /// # Errors
    ///
    /// Same failure set as [`TokenLedger::check_mint`].
    pub fn mint(&mut self, principal: &AccountId, to: AccountId, amount: Fixed) -> Result<()> {
        self.check_mint(principal, amount)?;
        if amount.is_zero() {
            return Ok(());
        }
        let supply = self
            .total_supply
            .checked_add(amount)
            .map_err(|_| TokenError::Overflow)?;
        let credited = self
            .balance_of(&to)
            .checked_add(amount)
            .map_err(|_| TokenError::Overflow)?;
        self.total_supply = supply;
        self.balances.insert(to, credited);
        tracing::debug!(
            token = %self.symbol,
            to = %short_id(&to),
            amount = %amount,
            supply = %self.total_supply,
            "minted tokens"
        );
        Ok(())
    }

    /// Validate a burn without performing it.
    ///
    /// # Errors
    ///
    /// - [`TokenError::Unauthorized`] if `principal` is not registered
    /// - [`TokenError::InsufficientBalance`] if `from` holds less than `amount`
    pub fn check_burn(&self, principal: &AccountId, from: &AccountId, amount: Fixed) -> Result<()> {
        if !self.minters.contains(principal) {
            return Err(TokenError::Unauthorized {
                account: short_id(principal),
            });
        }
        let available = self.balance_of(from);
        if available < amount {
            return Err(TokenError::InsufficientBalance {
                available,
                required: amount,
            });
        }
        Ok(())
    }

    /// Burn `amount` from `from`, shrinking the supply.
    ///
    /// A zero amount is a no-op after the authorization check.
    ///
    /// # Errors
    ///
    /// Same failure set as [`TokenLedger::check_burn`].
    pub fn burn(&mut self, principal: &AccountId, from: &AccountId, amount: Fixed) -> Result<()> {
        self.check_burn(principal, from, amount)?;
        if amount.is_zero() {
            return Ok(());
        }
        // Both subtractions are exact: check_burn established
        // amount <= balance <= total_supply.
        let remaining = self.balance_of(from).abs_diff(amount);
        if remaining.is_zero() {
            self.balances.remove(from);
        } else {
            self.balances.insert(*from, remaining);
        }
        self.total_supply = self.total_supply.abs_diff(amount);
        tracing::debug!(
            token = %self.symbol,
            from = %short_id(from),
            amount = %amount,
            supply = %self.total_supply,
            "burned tokens"
        );
        Ok(())
    }

    /// Validate a transfer without performing it.
    ///
    /// # Errors
    ///
    /// - [`TokenError::InsufficientBalance`] if `from` holds less than `amount`
    /// - [`TokenError::Overflow`] if `to`'s balance cannot absorb `amount`
    pub fn check_transfer(&self, from: &AccountId, to: &AccountId, amount: Fixed) -> Result<()> {
        if amount.is_zero() {
            return Ok(());
        }
        let available = self.balance_of(from);
        if available < amount {
            return Err(TokenError::InsufficientBalance {
                available,
                required: amount,
            });
        }
        if from == to {
            return Ok(());
        }
        self.balance_of(to)
            .checked_add(amount)
            .map_err(|_| TokenError::Overflow)?;
        Ok(())
    }

    /// Move `amount` from `from` to `to`. Open to any holder.
    ///
    /// A zero amount is a no-op, as is a transfer to oneself once the
    /// balance check has passed.
    ///
    /// # Errors
    ///
    /// Same failure set as [`TokenLedger::check_transfer`].
    pub fn transfer(&mut self, from: &AccountId, to: AccountId, amount: Fixed) -> Result<()> {
        self.check_transfer(from, &to, amount)?;
        if amount.is_zero() || *from == to {
            return Ok(());
        }
        let available = self.balance_of(from);
        // Exact: check_transfer established amount <= available.
        let credited = self
            .balance_of(&to)
            .checked_add(amount)
            .map_err(|_| TokenError::Overflow)?;
        let remaining = available.abs_diff(amount);
        if remaining.is_zero() {
            self.balances.remove(from);
        } else {
            self.balances.insert(*from, remaining);
        }
        self.balances.insert(to, credited);
        tracing::debug!(
            token = %self.symbol,
            from = %short_id(from),
            to = %short_id(&to),
            amount = %amount,
            "transferred tokens"
        );
        Ok(())
    }
}
