//! Deployment configuration.
//!
//! Every tunable of the protocol lives here: oracle cadence, risk
//! weights, mint policy, vault ratio, staking rate and the governance
//! schedule. Values not present in the file fall back to the component
//! defaults, so an empty file is a valid calm-market deployment.
//! Validation happens at [`StabilityCore`](crate::StabilityCore)
//! construction through the component constructors, with the same
//! errors as the runtime setters.

use std::path::Path;

use ancora_fixed::Fixed;
use serde::{Deserialize, Serialize};

/// Complete protocol configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProtocolConfig {
    /// Price feed settings.
    #[serde(default)]
    pub oracle: OracleConfig,
    /// Risk engine settings.
    #[serde(default)]
    pub risk: RiskConfig,
    /// Stabilization gate settings.
    #[serde(default)]
    pub mint: MintConfig,
    /// Vault settings.
    #[serde(default)]
    pub vault: VaultConfig,
    /// Staking settings.
    #[serde(default)]
    pub staking: StakingConfig,
    /// Governance settings.
    #[serde(default)]
    pub governance: GovernanceConfig,
}

/// Price feed configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Price the feed is seeded with at construction.
    #[serde(default = "default_initial_price")]
    pub initial_price: Fixed,
    /// Minimum seconds between accepted price samples.
    #[serde(default = "default_oracle_interval")]
    pub min_update_interval_secs: u64,
    /// Sample age in seconds beyond which the price counts as stale.
    #[serde(default = "default_staleness_max_age")]
    pub staleness_max_age_secs: u64,
}

/// Risk engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Weight of the sentiment deviation.
    #[serde(default = "default_alpha")]
    pub alpha: Fixed,
    /// Weight of the volatility deviation.
    #[serde(default = "default_beta")]
    pub beta: Fixed,
    /// Weight of the order book imbalance deviation.
    #[serde(default = "default_gamma")]
    pub gamma: Fixed,
    /// Inner no-action band around the peg.
    #[serde(default = "default_cushion")]
    pub cushion: Fixed,
    /// Outer hard band around the peg.
    #[serde(default = "default_wall")]
    pub wall: Fixed,
    /// Minimum seconds between current-values updates.
    #[serde(default = "default_risk_interval")]
    pub update_interval_secs: u64,
}

/// Stabilization gate configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MintConfig {
    /// Target price the stablecoin is pegged to.
    #[serde(default = "default_peg")]
    pub peg: Fixed,
    /// Risk score at or above which minting is blocked.
    #[serde(default = "default_risk_threshold")]
    pub risk_threshold: Fixed,
    /// Whether the gate is enforced at all.
    #[serde(default = "default_true")]
    pub stabilization_enabled: bool,
}

/// Vault configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Minimum collateral-to-debt value ratio.
    #[serde(default = "default_min_collateral_ratio")]
    pub min_collateral_ratio: Fixed,
}

/// Staking configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StakingConfig {
    /// Governance tokens emitted per day, split across all stakers.
    #[serde(default = "default_reward_rate")]
    pub reward_rate_per_day: Fixed,
}

/// Governance configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GovernanceConfig {
    /// Governance tokens charged for opening a proposal.
    #[serde(default = "default_proposal_fee")]
    pub proposal_fee: Fixed,
    /// Fraction of total supply that for-votes must strictly exceed.
    #[serde(default = "default_quorum_fraction")]
    pub quorum_fraction: Fixed,
    /// Seconds between proposal creation and voting start.
    #[serde(default = "default_voting_delay")]
    pub voting_delay_secs: u64,
    /// Seconds the voting window stays open.
    #[serde(default = "default_voting_period")]
    pub voting_period_secs: u64,
    /// Seconds from creation until an unexecuted proposal expires.
    #[serde(default = "default_execution_window")]
    pub execution_window_secs: u64,
}

// Default value functions

fn default_initial_price() -> Fixed {
    Fixed::ONE
}

fn default_oracle_interval() -> u64 {
    ancora_oracle::feed::DEFAULT_UPDATE_INTERVAL
}

fn default_staleness_max_age() -> u64 {
    ancora_oracle::feed::DEFAULT_STALENESS_MAX_AGE
}

fn default_alpha() -> Fixed {
    ancora_risk::params::DEFAULT_ALPHA
}

fn default_beta() -> Fixed {
    ancora_risk::params::DEFAULT_BETA
}

fn default_gamma() -> Fixed {
    ancora_risk::params::DEFAULT_GAMMA
}

fn default_cushion() -> Fixed {
    ancora_risk::params::DEFAULT_CUSHION
}

fn default_wall() -> Fixed {
    ancora_risk::params::DEFAULT_WALL
}

fn default_risk_interval() -> u64 {
    ancora_risk::engine::DEFAULT_UPDATE_INTERVAL
}

fn default_peg() -> Fixed {
    Fixed::ONE
}

fn default_risk_threshold() -> Fixed {
    ancora_mint::gate::DEFAULT_RISK_THRESHOLD
}

fn default_true() -> bool {
    true
}

fn default_min_collateral_ratio() -> Fixed {
    ancora_vault::DEFAULT_MIN_COLLATERAL_RATIO
}

fn default_reward_rate() -> Fixed {
    ancora_staking::DEFAULT_REWARD_RATE
}

fn default_proposal_fee() -> Fixed {
    Fixed::from_int(10)
}

fn default_quorum_fraction() -> Fixed {
    ancora_governance::proposals::DEFAULT_QUORUM_FRACTION
}

fn default_voting_delay() -> u64 {
    ancora_governance::proposals::DEFAULT_VOTING_DELAY
}

fn default_voting_period() -> u64 {
    ancora_governance::proposals::DEFAULT_VOTING_PERIOD
}

fn default_execution_window() -> u64 {
    ancora_governance::proposals::DEFAULT_EXECUTION_WINDOW
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            initial_price: default_initial_price(),
            min_update_interval_secs: default_oracle_interval(),
            staleness_max_age_secs: default_staleness_max_age(),
        }
    }
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
            beta: default_beta(),
            gamma: default_gamma(),
            cushion: default_cushion(),
            wall: default_wall(),
            update_interval_secs: default_risk_interval(),
        }
    }
}

impl Default for MintConfig {
    fn default() -> Self {
        Self {
            peg: default_peg(),
            risk_threshold: default_risk_threshold(),
            stabilization_enabled: true,
        }
    }
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            min_collateral_ratio: default_min_collateral_ratio(),
        }
    }
}

impl Default for StakingConfig {
    fn default() -> Self {
        Self {
            reward_rate_per_day: default_reward_rate(),
        }
    }
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self {
            proposal_fee: default_proposal_fee(),
            quorum_fraction: default_quorum_fraction(),
            voting_delay_secs: default_voting_delay(),
            voting_period_secs: default_voting_period(),
            execution_window_secs: default_execution_window(),
        }
    }
}

impl ProtocolConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> crate::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load a configuration from a TOML file.
    ///
    /// Falls back to defaults if the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml_str(&content)
        } else {
            Ok(Self::default())
        }
    }
}
