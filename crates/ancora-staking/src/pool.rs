//! The stake pool accumulator.
//!
//! Rewards accrue lazily: the pool carries a global reward-per-token
//! accumulator advanced on every interaction, and each account settles
//! its share against the accumulator before its stake changes. Between
//! interactions nothing runs; `now` is supplied by the caller.
//!
//! ## Formula
//!
//! ```text
//! acc += reward_rate · elapsed / SECS_PER_DAY / total_staked
//! earned(account) = staked · (acc − acc_at_last_settlement)
//! ```

use std::collections::BTreeMap;

use ancora_fixed::Fixed;
use ancora_types::{short_id, AccountId, SECS_PER_DAY};

use crate::{Result, StakingError};

/// Default emission: 100 governance tokens per day across the pool.
pub const DEFAULT_REWARD_RATE: Fixed = Fixed::from_int(100);

/// Per-account staking state.
#[derive(Clone, Copy, Debug, Default)]
struct StakeAccount {
    /// Stablecoins staked.
    staked: Fixed,
    /// Accumulator value at the last settlement.
    reward_per_token_paid: Fixed,
    /// Settled but unclaimed rewards.
    pending: Fixed,
}

/// Proportional reward accounting for all stakers.
#[derive(Clone, Debug)]
pub struct StakePool {
    accounts: BTreeMap<AccountId, StakeAccount>,
    /// Sum of all stakes.
    total_staked: Fixed,
    /// Global reward-per-token accumulator.
    acc_reward_per_token: Fixed,
    /// Governance tokens emitted per day across the whole pool.
    reward_rate: Fixed,
    /// Timestamp up to which emission has been folded into the
    /// accumulator. Never moves backwards.
    last_accrual: u64,
}

impl Default for StakePool {
    fn default() -> Self {
        Self::new()
    }
}

impl StakePool {
    /// Create an empty pool at the default emission rate.
    pub fn new() -> Self {
        Self::with_rate(DEFAULT_REWARD_RATE)
    }

    /// Create an empty pool with a specific emission rate.
    pub fn with_rate(reward_rate: Fixed) -> Self {
        Self {
            accounts: BTreeMap::new(),
            total_staked: Fixed::ZERO,
            acc_reward_per_token: Fixed::ZERO,
            reward_rate,
            last_accrual: 0,
        }
    }

    /// Sum of all stakes.
    pub fn total_staked(&self) -> Fixed {
        self.total_staked
    }

    /// Current emission rate in tokens per day.
    pub fn reward_rate(&self) -> Fixed {
        self.reward_rate
    }

    /// Number of accounts with stake or unclaimed rewards.
    pub fn staker_count(&self) -> usize {
        self.accounts.len()
    }

    /// The owner's staked amount.
    pub fn staked_of(&self, owner: &AccountId) -> Fixed {
        self.accounts
            .get(owner)
            .map(|a| a.staked)
            .unwrap_or(Fixed::ZERO)
    }

    /// The owner's claimable rewards as of `now`, accrued virtually.
    pub fn pending_reward(&self, owner: &AccountId, now: u64) -> Result<Fixed> {
        let acc = self.accrued_per_token(now)?;
        Ok(self.settled(owner, acc)?.pending)
    }

    /// Add `amount` to the owner's stake.
    ///
    /// # Errors
    ///
    /// - [`StakingError::ZeroStake`] on a zero amount
    /// - [`StakingError::Math`] on accumulator overflow
    pub fn stake(&mut self, owner: AccountId, amount: Fixed, now: u64) -> Result<()> {
        if amount.is_zero() {
            return Err(StakingError::ZeroStake);
        }
        let acc = self.accrued_per_token(now)?;
        let mut account = self.settled(&owner, acc)?;
        account.staked = account.staked.checked_add(amount)?;
        let total = self.total_staked.checked_add(amount)?;
        self.total_staked = total;
        self.commit(owner, account, acc, now);
        tracing::info!(
            owner = %short_id(&owner),
            amount = %amount,
            total = %self.total_staked,
            "stake added"
        );
        Ok(())
    }

    /// Remove `amount` from the owner's stake. Accrued rewards are
    /// preserved; a zero amount just settles the account.
    ///
    /// # Errors
    ///
    /// - [`StakingError::InsufficientStake`] if `amount` exceeds the stake
    /// - [`StakingError::Math`] on accumulator overflow
    pub fn withdraw(&mut self, owner: AccountId, amount: Fixed, now: u64) -> Result<()> {
        let acc = self.accrued_per_token(now)?;
        let mut account = self.settled(&owner, acc)?;
        if amount > account.staked {
            return Err(StakingError::InsufficientStake {
                requested: amount,
                staked: account.staked,
            });
        }
        account.staked = account.staked.abs_diff(amount);
        self.total_staked = self.total_staked.abs_diff(amount);
        self.commit(owner, account, acc, now);
        tracing::info!(
            owner = %short_id(&owner),
            amount = %amount,
            total = %self.total_staked,
            "stake withdrawn"
        );
        Ok(())
    }

    /// Take all settled rewards, returning the amount the assembly layer
    /// must pay out.
    ///
    /// # Errors
    ///
    /// - [`StakingError::NoRewards`] when nothing is pending
    /// - [`StakingError::Math`] on accumulator overflow
    pub fn claim(&mut self, owner: AccountId, now: u64) -> Result<Fixed> {
        let acc = self.accrued_per_token(now)?;
        let mut account = self.settled(&owner, acc)?;
        if account.pending.is_zero() {
            return Err(StakingError::NoRewards);
        }
        let amount = account.pending;
        account.pending = Fixed::ZERO;
        self.commit(owner, account, acc, now);
        tracing::info!(
            owner = %short_id(&owner),
            amount = %amount,
            "rewards claimed"
        );
        Ok(amount)
    }

    /// Change the emission rate. Emission already elapsed is folded in
    /// at the old rate first; the new rate applies only forward.
    ///
    /// # Errors
    ///
    /// [`StakingError::Math`] on accumulator overflow.
    pub fn set_reward_rate(&mut self, reward_rate: Fixed, now: u64) -> Result<()> {
        let acc = self.accrued_per_token(now)?;
        self.acc_reward_per_token = acc;
        self.last_accrual = self.last_accrual.max(now);
        self.reward_rate = reward_rate;
        tracing::info!(rate = %reward_rate, "reward rate changed");
        Ok(())
    }

    /// The accumulator as it would stand once accrued to `now`.
    ///
    /// While the pool is empty no emission occurs, and a `now` behind
    /// the last accrual contributes nothing.
    fn accrued_per_token(&self, now: u64) -> Result<Fixed> {
        let elapsed = now.saturating_sub(self.last_accrual);
        if elapsed == 0 || self.total_staked.is_zero() {
            return Ok(self.acc_reward_per_token);
        }
        let emitted = self
            .reward_rate
            .checked_mul(Fixed::from_int(elapsed))?
            .checked_div(Fixed::from_int(SECS_PER_DAY))?;
        let per_token = emitted.checked_div(self.total_staked)?;
        let acc = self.acc_reward_per_token.checked_add(per_token)?;
        tracing::trace!(
            elapsed,
            emitted = %emitted,
            per_token = %per_token,
            "accrued pool rewards"
        );
        Ok(acc)
    }

    /// The owner's account with earnings settled against `acc`.
    fn settled(&self, owner: &AccountId, acc: Fixed) -> Result<StakeAccount> {
        let mut account = self.accounts.get(owner).copied().unwrap_or_default();
        // The accumulator only grows, so the difference is exact.
        let delta = acc.abs_diff(account.reward_per_token_paid);
        if !delta.is_zero() && !account.staked.is_zero() {
            let earned = account.staked.checked_mul(delta)?;
            account.pending = account.pending.checked_add(earned)?;
        }
        account.reward_per_token_paid = acc;
        Ok(account)
    }

    /// Write back accumulator and account state after all fallible math
    /// has succeeded.
    fn commit(&mut self, owner: AccountId, account: StakeAccount, acc: Fixed, now: u64) {
        self.acc_reward_per_token = acc;
        self.last_accrual = self.last_accrual.max(now);
        if account.staked.is_zero() && account.pending.is_zero() {
            self.accounts.remove(&owner);
        } else {
            self.accounts.insert(owner, account);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: AccountId = [1; 32];
    const BOB: AccountId = [2; 32];
    const T0: u64 = 1_700_000_000;
    const DAY: u64 = SECS_PER_DAY;

    fn fx(s: &str) -> Fixed {
        s.parse().expect("test value should parse")
    }

    #[test]
    fn test_stake_zero_rejected() {
        let mut pool = StakePool::new();
        let err = pool.stake(ALICE, Fixed::ZERO, T0).expect_err("zero stake");
        assert!(matches!(err, StakingError::ZeroStake));
    }

    #[test]
    fn test_stake_and_withdraw_roundtrip() {
        let mut pool = StakePool::new();
        pool.stake(ALICE, fx("100"), T0).expect("stake");
        assert_eq!(pool.staked_of(&ALICE), fx("100"));
        assert_eq!(pool.total_staked(), fx("100"));
        pool.withdraw(ALICE, fx("100"), T0).expect("withdraw");
        assert_eq!(pool.staked_of(&ALICE), Fixed::ZERO);
        assert_eq!(pool.staker_count(), 0);
    }

    #[test]
    fn test_withdraw_more_than_staked() {
        let mut pool = StakePool::new();
        pool.stake(ALICE, fx("10"), T0).expect("stake");
        let err = pool
            .withdraw(ALICE, fx("11"), T0)
            .expect_err("over-withdrawal");
        match err {
            StakingError::InsufficientStake { requested, staked } => {
                assert_eq!(requested, fx("11"));
                assert_eq!(staked, fx("10"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_single_staker_earns_full_emission() {
        let mut pool = StakePool::new();
        pool.stake(ALICE, fx("100"), T0).expect("stake");
        let half_day = pool
            .pending_reward(&ALICE, T0 + DAY / 2)
            .expect("pending");
        assert_eq!(half_day, fx("50"));
        let full_day = pool.pending_reward(&ALICE, T0 + DAY).expect("pending");
        assert_eq!(full_day, fx("100"));
    }

    #[test]
    fn test_two_stakers_split_proportionally() {
        // Alice stakes 100 on day zero, Bob stakes 200 on day one.
        // Day one's emission is all Alice's; day two splits 1:2.
        let mut pool = StakePool::new();
        pool.stake(ALICE, fx("100"), T0).expect("stake alice");
        pool.stake(BOB, fx("200"), T0 + DAY).expect("stake bob");
        let alice = pool.pending_reward(&ALICE, T0 + 2 * DAY).expect("pending");
        let bob = pool.pending_reward(&BOB, T0 + 2 * DAY).expect("pending");
        assert_eq!(alice, fx("133.3333333333333333"));
        assert_eq!(bob, fx("66.6666666666666666"));
    }

    #[test]
    fn test_claim_returns_amount_and_resets() {
        let mut pool = StakePool::new();
        pool.stake(ALICE, fx("100"), T0).expect("stake");
        let amount = pool.claim(ALICE, T0 + DAY).expect("claim");
        assert_eq!(amount, fx("100"));
        let err = pool.claim(ALICE, T0 + DAY).expect_err("nothing left");
        assert!(matches!(err, StakingError::NoRewards));
    }

    #[test]
    fn test_claim_without_stake_history() {
        let mut pool = StakePool::new();
        let err = pool.claim(ALICE, T0).expect_err("never staked");
        assert!(matches!(err, StakingError::NoRewards));
    }

    #[test]
    fn test_partial_withdraw_preserves_pending() {
        let mut pool = StakePool::new();
        pool.stake(ALICE, fx("100"), T0).expect("stake");
        pool.withdraw(ALICE, fx("50"), T0 + DAY).expect("withdraw half");
        // Day one earned at full stake, day two at half stake, and the
        // pool is still Alice's alone.
        let pending = pool.pending_reward(&ALICE, T0 + 2 * DAY).expect("pending");
        assert_eq!(pending, fx("200"));
        assert_eq!(pool.staked_of(&ALICE), fx("50"));
    }

    #[test]
    fn test_rate_change_applies_only_forward() {
        let mut pool = StakePool::new();
        pool.stake(ALICE, fx("100"), T0).expect("stake");
        pool.set_reward_rate(fx("50"), T0 + DAY).expect("set rate");
        let pending = pool.pending_reward(&ALICE, T0 + 2 * DAY).expect("pending");
        assert_eq!(pending, fx("150"));
    }

    #[test]
    fn test_no_emission_while_pool_empty() {
        let mut pool = StakePool::new();
        pool.stake(ALICE, fx("100"), T0).expect("stake");
        pool.withdraw(ALICE, fx("100"), T0 + DAY).expect("withdraw all");
        pool.stake(ALICE, fx("100"), T0 + 3 * DAY).expect("restake");
        // Days one through three paid nothing: the pool was empty.
        let pending = pool.pending_reward(&ALICE, T0 + 4 * DAY).expect("pending");
        assert_eq!(pending, fx("200"));
    }

    #[test]
    fn test_clock_never_runs_backwards() {
        let mut pool = StakePool::new();
        pool.stake(ALICE, fx("100"), T0).expect("stake");
        pool.stake(BOB, fx("100"), T0 + DAY).expect("later stake");
        // A view dated before the last accrual adds nothing on top of
        // what is already settled.
        let pending = pool.pending_reward(&ALICE, T0).expect("pending");
        assert_eq!(pending, fx("100"));
        // And the accumulator still advances correctly afterwards.
        let pending = pool.pending_reward(&ALICE, T0 + 2 * DAY).expect("pending");
        assert_eq!(pending, fx("150"));
    }
}
