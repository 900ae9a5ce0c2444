//! The assembled stability core.
//!
//! [`StabilityCore`] owns every component and is the only public write
//! surface. Entry points share one shape: pause check, authorization,
//! full validation through the components being touched, then the
//! mutations, then one event per accepted state change. Cross-component
//! operations pre-flight their later legs with the `check_*` views
//! before committing the first, so a failed call never leaves the
//! components disagreeing with each other.
//!
//! Operations take `&mut self` and a caller-supplied `now`; there are
//! no timers or async waits in any operation path. Callers needing
//! shared access wrap the core in a mutex.

use ancora_fixed::Fixed;
use ancora_governance::{GovernanceError, ProposalBook};
use ancora_mint::{GateVerdict, MintPolicy};
use ancora_oracle::{PriceFeed, PriceSample};
use ancora_risk::{MarketSignals, RiskEngine, RiskParameters};
use ancora_staking::{StakePool, StakingError};
use ancora_token::TokenLedger;
use ancora_types::events::{Event, EventType};
use ancora_types::status::SystemStatus;
use ancora_types::{
    short_id, AccountId, AssetId, GOVERNANCE_TREASURY, STABILIZER_MODULE, STAKING_MODULE,
    VAULT_MODULE,
};
use ancora_vault::{VaultBook, VaultPosition};
use tokio::sync::broadcast;

use crate::events::EventBus;
use crate::{CoreError, ProtocolConfig, Result};

/// Stablecoin symbol.
pub const STABLE_SYMBOL: &str = "ANC";

/// Governance-token symbol.
pub const GOVERNANCE_SYMBOL: &str = "AGT";

/// Fixed governance-token supply, credited to the deployer.
pub const INITIAL_GOVERNANCE_SUPPLY: Fixed = Fixed::from_int(1_000_000);

/// All protocol state behind one write surface.
pub struct StabilityCore {
    /// Shared pause flag, checked by every state-changing entry point.
    status: SystemStatus,
    /// Account holding the governance capability.
    governance: AccountId,
    /// Collateral price feed.
    oracle: PriceFeed,
    /// Sample age in seconds beyond which the price counts as stale.
    staleness_max_age: u64,
    /// Composite risk scoring.
    engine: RiskEngine,
    /// Governed mint-gate configuration.
    policy: MintPolicy,
    /// Collateralized debt positions.
    vaults: VaultBook,
    /// The stablecoin ledger.
    stable: TokenLedger,
    /// The governance-token ledger.
    governance_token: TokenLedger,
    /// Stablecoin staking with governance-token rewards.
    staking: StakePool,
    /// Parameter proposals and votes.
    proposals: ProposalBook,
    /// Governance tokens charged for opening a proposal.
    proposal_fee: Fixed,
    /// Broadcast bus announcing accepted mutations.
    events: EventBus,
}

impl StabilityCore {
    /// Assemble a core from a validated configuration.
    ///
    /// The deployer receives the whole governance-token supply and the
    /// governance capability. The price feed is seeded at `now`.
    ///
    /// # Errors
    ///
    /// Any component constructor's validation error, unchanged; an
    /// invalid configuration fails here with the same variants the
    /// runtime setters produce.
    pub fn new(admin: AccountId, config: &ProtocolConfig, now: u64) -> Result<Self> {
        let oracle = PriceFeed::with_interval(
            config.oracle.initial_price,
            now,
            config.oracle.min_update_interval_secs,
        )?;
        let params = RiskParameters {
            alpha: config.risk.alpha,
            beta: config.risk.beta,
            gamma: config.risk.gamma,
            cushion: config.risk.cushion,
            wall: config.risk.wall,
        };
        let engine = RiskEngine::with_interval(params, config.risk.update_interval_secs)?;
        let policy = MintPolicy {
            peg: config.mint.peg,
            risk_threshold: config.mint.risk_threshold,
            enabled: config.mint.stabilization_enabled,
        };
        policy.validate()?;
        let vaults = VaultBook::with_min_ratio(config.vault.min_collateral_ratio)?;
        let mut stable = TokenLedger::new(STABLE_SYMBOL);
        stable.add_minter(VAULT_MODULE);
        stable.add_minter(STABILIZER_MODULE);
        let governance_token =
            TokenLedger::with_initial_supply(GOVERNANCE_SYMBOL, admin, INITIAL_GOVERNANCE_SUPPLY);
        let staking = StakePool::with_rate(config.staking.reward_rate_per_day);
        let proposals = ProposalBook::with_schedule(
            config.governance.voting_delay_secs,
            config.governance.voting_period_secs,
            config.governance.execution_window_secs,
            config.governance.quorum_fraction,
        )?;
        tracing::info!(
            governance = %short_id(&admin),
            initial_price = %config.oracle.initial_price,
            min_collateral_ratio = %config.vault.min_collateral_ratio,
            risk_threshold = %config.mint.risk_threshold,
            stabilization_enabled = config.mint.stabilization_enabled,
            "stability core initialized"
        );
        Ok(Self {
            status: SystemStatus::Active,
            governance: admin,
            oracle,
            staleness_max_age: config.oracle.staleness_max_age_secs,
            engine,
            policy,
            vaults,
            stable,
            governance_token,
            staking,
            proposals,
            proposal_fee: config.governance.proposal_fee,
            events: EventBus::default(),
        })
    }

    fn ensure_active(&self) -> Result<()> {
        if self.status.is_paused() {
            return Err(CoreError::Paused);
        }
        Ok(())
    }

    fn ensure_governance(&self, actor: &AccountId) -> Result<()> {
        if *actor != self.governance {
            return Err(CoreError::Unauthorized {
                actor: short_id(actor),
            });
        }
        Ok(())
    }

    // ---- Oracle & risk ----

    /// Submit a new price observation. Open to any feeder.
    pub fn submit_price(&mut self, actor: AccountId, price: Fixed, now: u64) -> Result<()> {
        self.ensure_active()?;
        self.oracle.submit(price, now)?;
        self.events.emit(
            EventType::PriceSubmitted,
            actor,
            now,
            serde_json::json!({ "price": price }),
        );
        Ok(())
    }

    /// Recalibrate the risk baselines. Governance only.
    pub fn update_baselines(
        &mut self,
        actor: AccountId,
        signals: MarketSignals,
        now: u64,
    ) -> Result<()> {
        self.ensure_active()?;
        self.ensure_governance(&actor)?;
        self.engine.update_baselines(signals)?;
        self.events.emit(
            EventType::BaselinesUpdated,
            actor,
            now,
            serde_json::json!({
                "sentiment": signals.sentiment,
                "volatility": signals.volatility,
                "order_book_imbalance": signals.order_book_imbalance,
            }),
        );
        Ok(())
    }

    /// Record a current market snapshot. Open to any feeder; the
    /// engine's own cooldown limits the cadence.
    pub fn update_current_values(
        &mut self,
        actor: AccountId,
        signals: MarketSignals,
        now: u64,
    ) -> Result<()> {
        self.ensure_active()?;
        self.engine.update_current_values(signals, now)?;
        self.events.emit(
            EventType::CurrentValuesUpdated,
            actor,
            now,
            serde_json::json!({
                "sentiment": signals.sentiment,
                "volatility": signals.volatility,
                "order_book_imbalance": signals.order_book_imbalance,
            }),
        );
        Ok(())
    }

    /// Recompute deviation ratios and the composite risk score.
    pub fn update_risk_factors(&mut self, actor: AccountId, now: u64) -> Result<()> {
        self.ensure_active()?;
        self.engine.update_risk_factors(now)?;
        self.events.emit(
            EventType::RiskFactorsUpdated,
            actor,
            now,
            serde_json::json!({ "risk_score": self.engine.risk_score() }),
        );
        Ok(())
    }

    /// Replace the risk parameters. Governance only.
    pub fn set_risk_parameters(
        &mut self,
        actor: AccountId,
        params: RiskParameters,
        now: u64,
    ) -> Result<()> {
        self.ensure_active()?;
        self.ensure_governance(&actor)?;
        self.engine.set_parameters(params)?;
        self.events.emit(
            EventType::RiskParametersChanged,
            actor,
            now,
            serde_json::json!({
                "alpha": params.alpha,
                "beta": params.beta,
                "gamma": params.gamma,
                "cushion": params.cushion,
                "wall": params.wall,
            }),
        );
        Ok(())
    }

    // ---- Stabilization gate ----

    /// Replace the mint policy. Governance only.
    pub fn set_mint_policy(
        &mut self,
        actor: AccountId,
        policy: MintPolicy,
        now: u64,
    ) -> Result<()> {
        self.ensure_active()?;
        self.ensure_governance(&actor)?;
        policy.validate()?;
        self.policy = policy;
        self.events.emit(
            EventType::MintPolicyChanged,
            actor,
            now,
            serde_json::json!({
                "peg": policy.peg,
                "risk_threshold": policy.risk_threshold,
                "enabled": policy.enabled,
            }),
        );
        Ok(())
    }

    /// Toggle gate enforcement. Governance only.
    pub fn set_stabilization(&mut self, actor: AccountId, enabled: bool, now: u64) -> Result<()> {
        self.ensure_active()?;
        self.ensure_governance(&actor)?;
        self.policy.enabled = enabled;
        self.events.emit(
            EventType::StabilizationToggled,
            actor,
            now,
            serde_json::json!({ "enabled": enabled }),
        );
        tracing::info!(enabled, "stabilization gate toggled");
        Ok(())
    }

    /// Mint stablecoins directly through the gate. Governance only.
    ///
    /// # Errors
    ///
    /// [`CoreError::StabilizationBlocked`] naming the failed gate leg.
    pub fn mint_stable(
        &mut self,
        actor: AccountId,
        to: AccountId,
        amount: Fixed,
        now: u64,
    ) -> Result<()> {
        self.ensure_active()?;
        self.ensure_governance(&actor)?;
        if let GateVerdict::Blocked(reason) = self.can_mint() {
            return Err(CoreError::StabilizationBlocked { reason });
        }
        self.stable.mint(&STABILIZER_MODULE, to, amount)?;
        if !amount.is_zero() {
            self.events.emit(
                EventType::TokensMinted,
                actor,
                now,
                serde_json::json!({
                    "token": STABLE_SYMBOL,
                    "to": hex::encode(to),
                    "amount": amount,
                }),
            );
        }
        Ok(())
    }

    // ---- Vaults ----

    /// Allow or disallow a collateral asset. Governance only.
    ///
    /// Delisting stops new positions in the asset; existing positions
    /// stay operable for repayment and withdrawal.
    pub fn set_collateral_support(
        &mut self,
        actor: AccountId,
        asset: AssetId,
        supported: bool,
        now: u64,
    ) -> Result<()> {
        self.ensure_active()?;
        self.ensure_governance(&actor)?;
        self.vaults.set_collateral_support(asset, supported);
        self.events.emit(
            EventType::CollateralSupportChanged,
            actor,
            now,
            serde_json::json!({
                "asset": hex::encode(asset),
                "supported": supported,
            }),
        );
        Ok(())
    }

    /// Open or extend a vault, minting the debt side as stablecoins.
    ///
    /// Valued at the oracle price read at this instant. A nonzero debt
    /// must pass the stabilization gate; a zero-debt call is a pure
    /// collateral deposit and bypasses it.
    pub fn create_vault(
        &mut self,
        owner: AccountId,
        asset: AssetId,
        collateral_amount: Fixed,
        debt_amount: Fixed,
        now: u64,
    ) -> Result<VaultPosition> {
        self.ensure_active()?;
        let price = self.oracle.price();
        if !debt_amount.is_zero() {
            if let GateVerdict::Blocked(reason) = self.can_mint() {
                return Err(CoreError::StabilizationBlocked { reason });
            }
            self.stable.check_mint(&VAULT_MODULE, debt_amount)?;
        }
        let position = self
            .vaults
            .create_vault(owner, asset, collateral_amount, debt_amount, price, now)?;
        if !debt_amount.is_zero() {
            // Cannot fail: pre-flighted by check_mint above.
            self.stable.mint(&VAULT_MODULE, owner, debt_amount)?;
        }
        self.events.emit(
            EventType::VaultCreated,
            owner,
            now,
            serde_json::json!({
                "asset": hex::encode(asset),
                "collateral": position.collateral,
                "debt": position.debt,
                "price": price,
            }),
        );
        if !debt_amount.is_zero() {
            self.events.emit(
                EventType::TokensMinted,
                owner,
                now,
                serde_json::json!({
                    "token": STABLE_SYMBOL,
                    "to": hex::encode(owner),
                    "amount": debt_amount,
                }),
            );
        }
        Ok(position)
    }

    /// Repay debt and withdraw collateral, burning the repaid
    /// stablecoins from the caller.
    ///
    /// Valued at the oracle price read at this instant. Zero/zero is a
    /// no-op and emits nothing.
    pub fn repay_debt(
        &mut self,
        owner: AccountId,
        asset: AssetId,
        repay_amount: Fixed,
        withdraw_amount: Fixed,
        now: u64,
    ) -> Result<VaultPosition> {
        self.ensure_active()?;
        let price = self.oracle.price();
        if repay_amount.is_zero() && withdraw_amount.is_zero() {
            return Ok(self
                .vaults
                .repay_debt(owner, asset, repay_amount, withdraw_amount, price, now)?);
        }
        if !repay_amount.is_zero() {
            self.stable.check_burn(&VAULT_MODULE, &owner, repay_amount)?;
        }
        let position = self
            .vaults
            .repay_debt(owner, asset, repay_amount, withdraw_amount, price, now)?;
        if !repay_amount.is_zero() {
            // Cannot fail: pre-flighted by check_burn above.
            self.stable.burn(&VAULT_MODULE, &owner, repay_amount)?;
        }
        self.events.emit(
            EventType::DebtRepaid,
            owner,
            now,
            serde_json::json!({
                "asset": hex::encode(asset),
                "repaid": repay_amount,
                "withdrawn": withdraw_amount,
                "collateral": position.collateral,
                "debt": position.debt,
            }),
        );
        if !repay_amount.is_zero() {
            self.events.emit(
                EventType::TokensBurned,
                owner,
                now,
                serde_json::json!({
                    "token": STABLE_SYMBOL,
                    "from": hex::encode(owner),
                    "amount": repay_amount,
                }),
            );
        }
        Ok(position)
    }

    // ---- Tokens ----

    /// Transfer stablecoins. Open to any holder.
    pub fn transfer_stable(
        &mut self,
        from: AccountId,
        to: AccountId,
        amount: Fixed,
        now: u64,
    ) -> Result<()> {
        self.ensure_active()?;
        self.stable.transfer(&from, to, amount)?;
        if !amount.is_zero() {
            self.events.emit(
                EventType::TokensTransferred,
                from,
                now,
                serde_json::json!({
                    "token": STABLE_SYMBOL,
                    "to": hex::encode(to),
                    "amount": amount,
                }),
            );
        }
        Ok(())
    }

    /// Transfer governance tokens. Open to any holder.
    ///
    /// Also how the staking reward pool is funded: transfer to the
    /// staking module account.
    pub fn transfer_governance_token(
        &mut self,
        from: AccountId,
        to: AccountId,
        amount: Fixed,
        now: u64,
    ) -> Result<()> {
        self.ensure_active()?;
        self.governance_token.transfer(&from, to, amount)?;
        if !amount.is_zero() {
            self.events.emit(
                EventType::TokensTransferred,
                from,
                now,
                serde_json::json!({
                    "token": GOVERNANCE_SYMBOL,
                    "to": hex::encode(to),
                    "amount": amount,
                }),
            );
        }
        Ok(())
    }

    // ---- Staking ----

    /// Stake stablecoins; they move to the staking module account.
    pub fn stake(&mut self, owner: AccountId, amount: Fixed, now: u64) -> Result<()> {
        self.ensure_active()?;
        self.stable.check_transfer(&owner, &STAKING_MODULE, amount)?;
        self.staking.stake(owner, amount, now)?;
        // Cannot fail: pre-flighted by check_transfer above.
        self.stable.transfer(&owner, STAKING_MODULE, amount)?;
        self.events.emit(
            EventType::Staked,
            owner,
            now,
            serde_json::json!({
                "amount": amount,
                "total_staked": self.staking.total_staked(),
            }),
        );
        Ok(())
    }

    /// Withdraw staked stablecoins back to the owner.
    ///
    /// Accrued rewards are preserved; a zero-amount call just settles.
    pub fn withdraw_stake(&mut self, owner: AccountId, amount: Fixed, now: u64) -> Result<()> {
        self.ensure_active()?;
        self.stable.check_transfer(&STAKING_MODULE, &owner, amount)?;
        self.staking.withdraw(owner, amount, now)?;
        // Cannot fail: pre-flighted by check_transfer above.
        self.stable.transfer(&STAKING_MODULE, owner, amount)?;
        self.events.emit(
            EventType::Withdrawn,
            owner,
            now,
            serde_json::json!({
                "amount": amount,
                "remaining_stake": self.staking.staked_of(&owner),
            }),
        );
        Ok(())
    }

    /// Claim accrued rewards, paid in governance tokens from the
    /// staking module account.
    ///
    /// # Errors
    ///
    /// - [`StakingError::NoRewards`] when nothing is pending
    /// - [`TokenError::InsufficientBalance`](ancora_token::TokenError::InsufficientBalance)
    ///   when the reward pool is underfunded; pending rewards stay
    ///   claimable after the pool is topped up
    pub fn claim_rewards(&mut self, owner: AccountId, now: u64) -> Result<Fixed> {
        self.ensure_active()?;
        let pending = self.staking.pending_reward(&owner, now)?;
        if pending.is_zero() {
            return Err(StakingError::NoRewards.into());
        }
        self.governance_token
            .check_transfer(&STAKING_MODULE, &owner, pending)?;
        let claimed = self.staking.claim(owner, now)?;
        // Cannot fail: pre-flighted by check_transfer above.
        self.governance_token
            .transfer(&STAKING_MODULE, owner, claimed)?;
        self.events.emit(
            EventType::RewardClaimed,
            owner,
            now,
            serde_json::json!({ "amount": claimed }),
        );
        Ok(claimed)
    }

    /// Change the daily reward emission rate. Governance only.
    ///
    /// Rewards accrued under the old rate are settled first.
    pub fn set_reward_rate(&mut self, actor: AccountId, rate: Fixed, now: u64) -> Result<()> {
        self.ensure_active()?;
        self.ensure_governance(&actor)?;
        self.staking.set_reward_rate(rate, now)?;
        self.events.emit(
            EventType::RewardRateChanged,
            actor,
            now,
            serde_json::json!({ "reward_rate": rate }),
        );
        Ok(())
    }

    // ---- Governance ----

    /// Open a proposal to change the risk weights, charging the
    /// proposal fee in governance tokens.
    pub fn propose(
        &mut self,
        proposer: AccountId,
        description: impl Into<String>,
        alpha: Fixed,
        beta: Fixed,
        gamma: Fixed,
        now: u64,
    ) -> Result<u64> {
        self.ensure_active()?;
        self.governance_token
            .check_transfer(&proposer, &GOVERNANCE_TREASURY, self.proposal_fee)?;
        let id = self
            .proposals
            .propose(proposer, description, alpha, beta, gamma, now)?;
        // Cannot fail: pre-flighted by check_transfer above.
        self.governance_token
            .transfer(&proposer, GOVERNANCE_TREASURY, self.proposal_fee)?;
        self.events.emit(
            EventType::ProposalCreated,
            proposer,
            now,
            serde_json::json!({
                "id": id,
                "alpha": alpha,
                "beta": beta,
                "gamma": gamma,
                "fee": self.proposal_fee,
            }),
        );
        Ok(id)
    }

    /// Cast a vote weighted by the voter's governance-token balance at
    /// this instant.
    pub fn cast_vote(&mut self, voter: AccountId, id: u64, support: bool, now: u64) -> Result<()> {
        self.ensure_active()?;
        let weight = self.governance_token.balance_of(&voter);
        self.proposals.cast_vote(voter, id, support, weight, now)?;
        self.events.emit(
            EventType::VoteCast,
            voter,
            now,
            serde_json::json!({ "id": id, "support": support, "weight": weight }),
        );
        Ok(())
    }

    /// Execute a passed proposal, applying its weights to the risk
    /// engine. Open to anyone once the voting window has closed.
    ///
    /// The cushion and wall are retained from the current parameters.
    pub fn execute_proposal(&mut self, actor: AccountId, id: u64, now: u64) -> Result<()> {
        self.ensure_active()?;
        let (alpha, beta, gamma) = {
            let proposal = self
                .proposals
                .proposal(id)
                .ok_or(GovernanceError::UnknownProposal { id })?;
            (proposal.alpha, proposal.beta, proposal.gamma)
        };
        let params = self.engine.params().with_weights(alpha, beta, gamma);
        // Validate the candidate before the proposal is marked
        // executed; set_parameters cannot fail afterwards.
        params.validate()?;
        self.proposals
            .execute(id, now, self.governance_token.total_supply())?;
        self.engine.set_parameters(params)?;
        self.events.emit(
            EventType::ProposalExecuted,
            actor,
            now,
            serde_json::json!({
                "id": id,
                "alpha": alpha,
                "beta": beta,
                "gamma": gamma,
            }),
        );
        Ok(())
    }

    // ---- Administration ----

    /// Transfer the governance capability. Governance only.
    pub fn set_governance(
        &mut self,
        actor: AccountId,
        new_admin: AccountId,
        now: u64,
    ) -> Result<()> {
        self.ensure_active()?;
        self.ensure_governance(&actor)?;
        self.governance = new_admin;
        self.events.emit(
            EventType::GovernanceTransferred,
            actor,
            now,
            serde_json::json!({ "new_governance": hex::encode(new_admin) }),
        );
        tracing::info!(new_governance = %short_id(&new_admin), "governance transferred");
        Ok(())
    }

    /// Halt all state-changing operations. Governance only; idempotent.
    pub fn pause(&mut self, actor: AccountId, now: u64) -> Result<()> {
        self.ensure_governance(&actor)?;
        if self.status.is_paused() {
            return Ok(());
        }
        self.status = SystemStatus::Paused;
        self.events
            .emit(EventType::SystemPaused, actor, now, serde_json::json!({}));
        tracing::warn!("system paused");
        Ok(())
    }

    /// Resume normal operation. Governance only; idempotent.
    pub fn unpause(&mut self, actor: AccountId, now: u64) -> Result<()> {
        self.ensure_governance(&actor)?;
        if !self.status.is_paused() {
            return Ok(());
        }
        self.status = SystemStatus::Active;
        self.events
            .emit(EventType::SystemResumed, actor, now, serde_json::json!({}));
        tracing::info!("system resumed");
        Ok(())
    }

    // ---- Views ----

    /// Current operational status.
    pub fn status(&self) -> SystemStatus {
        self.status
    }

    /// The governance account.
    pub fn governance(&self) -> AccountId {
        self.governance
    }

    /// The latest accepted price sample.
    pub fn current_price(&self) -> PriceSample {
        self.oracle.current()
    }

    /// Whether the latest price sample is older than the staleness
    /// limit.
    pub fn is_price_stale(&self, now: u64) -> bool {
        self.oracle.is_stale(self.staleness_max_age, now)
    }

    /// The composite risk score from the last factors update.
    pub fn risk_score(&self) -> Fixed {
        self.engine.risk_score()
    }

    /// The current risk parameters.
    pub fn risk_parameters(&self) -> RiskParameters {
        self.engine.params()
    }

    /// The current mint policy.
    pub fn mint_policy(&self) -> MintPolicy {
        self.policy
    }

    /// Evaluate the stabilization gate against the live score and
    /// price, without minting anything.
    pub fn can_mint(&self) -> GateVerdict {
        let params = self.engine.params();
        ancora_mint::can_mint(
            self.engine.risk_score(),
            self.oracle.price(),
            &params,
            &self.policy,
        )
    }

    /// Whether the live price sits inside the cushion band. Read-only;
    /// never part of the mint decision.
    pub fn is_within_cushion(&self) -> bool {
        let params = self.engine.params();
        ancora_mint::is_within_cushion(self.oracle.price(), &params, &self.policy)
    }

    /// A vault position by owner, if one exists.
    pub fn vault_position(&self, owner: &AccountId) -> Option<VaultPosition> {
        self.vaults.position(owner).copied()
    }

    /// The vault book.
    pub fn vaults(&self) -> &VaultBook {
        &self.vaults
    }

    /// The stablecoin ledger.
    pub fn stable(&self) -> &TokenLedger {
        &self.stable
    }

    /// The governance-token ledger.
    pub fn governance_token(&self) -> &TokenLedger {
        &self.governance_token
    }

    /// The staking pool.
    pub fn staking(&self) -> &StakePool {
        &self.staking
    }

    /// The proposal book.
    pub fn proposals(&self) -> &ProposalBook {
        &self.proposals
    }

    /// The configured proposal fee.
    pub fn proposal_fee(&self) -> Fixed {
        self.proposal_fee
    }

    /// Subscribe to protocol events.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    /// Sequence number of the most recently emitted event.
    pub fn event_sequence(&self) -> u64 {
        self.events.sequence()
    }
}
