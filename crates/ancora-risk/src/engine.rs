//! Risk engine stage machine and score computation.
//!
//! The engine moves through four stages:
//!
//! ```text
//! Uninitialized -> BaselineSet -> CurrentSet -> FactorsUpdated
//!                                     ^               |
//!                                     +---------------+
//! ```
//!
//! cycling back to `CurrentSet` whenever a new observation window opens
//! (a fresh current-values update). The score is always readable: it is
//! a pure function of the cached deviation ratios and reports zero until
//! the first factors update. Staleness of the cached ratios is the
//! caller's concern, observable through [`RiskEngine::deviations`].

use ancora_fixed::Fixed;
use serde::{Deserialize, Serialize};

use crate::params::RiskParameters;
use crate::signals::{DeviationRatios, MarketSignals};
use crate::{Result, RiskError};

/// Default minimum interval between current-values updates (1 hour).
pub const DEFAULT_UPDATE_INTERVAL: u64 = 3600;

/// Lifecycle stage of the risk engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskStage {
    /// No baseline recorded yet.
    Uninitialized,
    /// A baseline exists; no current snapshot yet.
    BaselineSet,
    /// A current snapshot exists; deviations not (re)computed for it.
    CurrentSet,
    /// Deviation ratios are cached for the latest snapshot pair.
    FactorsUpdated,
}

impl RiskStage {
    /// Stable lowercase name used in errors and logs.
    pub fn name(self) -> &'static str {
        match self {
            RiskStage::Uninitialized => "uninitialized",
            RiskStage::BaselineSet => "baseline set",
            RiskStage::CurrentSet => "current values set",
            RiskStage::FactorsUpdated => "risk factors updated",
        }
    }
}

/// The risk-based stabilization engine.
#[derive(Debug, Clone)]
pub struct RiskEngine {
    /// Governed weights and bands.
    params: RiskParameters,
    /// Reference snapshot, recalibrated rarely.
    baseline: Option<MarketSignals>,
    /// Most recent observed snapshot.
    current: Option<MarketSignals>,
    /// Cached deviation ratios from the last factors update.
    deviations: Option<DeviationRatios>,
    /// Timestamp of the last accepted current-values update.
    last_current_update: Option<u64>,
    /// Minimum seconds between current-values updates.
    update_interval: u64,
    /// Lifecycle stage.
    stage: RiskStage,
}

impl RiskEngine {
    /// Create an engine with validated parameters and the default
    /// current-values update interval.
    pub fn new(params: RiskParameters) -> Result<Self> {
        Self::with_interval(params, DEFAULT_UPDATE_INTERVAL)
    }

    /// Create an engine with a custom current-values update interval.
    ///
    /// # Errors
    ///
    /// [`RiskError::ParameterOutOfRange`] if any parameter is outside
    /// its admissible range.
    pub fn with_interval(params: RiskParameters, update_interval: u64) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            baseline: None,
            current: None,
            deviations: None,
            last_current_update: None,
            update_interval,
            stage: RiskStage::Uninitialized,
        })
    }

    /// Recalibrate the baseline snapshot.
    ///
    /// Any cached deviation ratios are invalidated: ratios measured
    /// against a replaced baseline are wrong, not merely stale. The next
    /// [`RiskEngine::update_risk_factors`] call recomputes them.
    ///
    /// # Errors
    ///
    /// [`RiskError::NonPositiveBaseline`] if any signal is zero.
    pub fn update_baselines(&mut self, signals: MarketSignals) -> Result<()> {
        if let Some(signal) = signals.zero_component() {
            return Err(RiskError::NonPositiveBaseline { signal });
        }
        self.baseline = Some(signals);
        self.deviations = None;
        self.stage = if self.current.is_some() {
            RiskStage::CurrentSet
        } else {
            RiskStage::BaselineSet
        };
        tracing::info!(
            sentiment = %signals.sentiment,
            volatility = %signals.volatility,
            order_book_imbalance = %signals.order_book_imbalance,
            "baselines recalibrated"
        );
        Ok(())
    }

    /// Record a new current snapshot, opening a new observation window.
    ///
    /// The first update after construction is exempt from the cooldown;
    /// afterwards the minimum interval applies. Zero values are
    /// accepted (the deviation then reads as 100%).
    ///
    /// # Errors
    ///
    /// - [`RiskError::InvalidState`] before any baseline is set
    /// - [`RiskError::CooldownActive`] inside the minimum interval
    pub fn update_current_values(&mut self, signals: MarketSignals, now: u64) -> Result<()> {
        if self.baseline.is_none() {
            return Err(RiskError::InvalidState {
                expected: "baseline set",
                actual: self.stage.name(),
            });
        }
        if let Some(last) = self.last_current_update {
            let elapsed = now.saturating_sub(last);
            if elapsed < self.update_interval {
                return Err(RiskError::CooldownActive {
                    elapsed,
                    required: self.update_interval,
                });
            }
        }
        self.current = Some(signals);
        self.last_current_update = Some(now);
        self.stage = RiskStage::CurrentSet;
        tracing::debug!(
            sentiment = %signals.sentiment,
            volatility = %signals.volatility,
            order_book_imbalance = %signals.order_book_imbalance,
            timestamp = now,
            "current signal values recorded"
        );
        Ok(())
    }

    /// Recompute and cache the per-signal deviation ratios.
    ///
    /// # Errors
    ///
    /// - [`RiskError::InvalidState`] unless both snapshots exist
    /// - [`RiskError::ZeroBaseline`] if a baseline component is zero
    pub fn update_risk_factors(&mut self, now: u64) -> Result<()> {
        let (baseline, current) = match (self.baseline, self.current) {
            (Some(b), Some(c)) => (b, c),
            _ => {
                return Err(RiskError::InvalidState {
                    expected: "current values set",
                    actual: self.stage.name(),
                })
            }
        };
        if let Some(signal) = baseline.zero_component() {
            return Err(RiskError::ZeroBaseline { signal });
        }

        let deviations = DeviationRatios {
            sentiment: deviation(current.sentiment, baseline.sentiment),
            volatility: deviation(current.volatility, baseline.volatility),
            order_book_imbalance: deviation(
                current.order_book_imbalance,
                baseline.order_book_imbalance,
            ),
            computed_at: now,
        };
        tracing::debug!(
            d_sentiment = %deviations.sentiment,
            d_volatility = %deviations.volatility,
            d_order_book_imbalance = %deviations.order_book_imbalance,
            timestamp = now,
            "risk factors updated"
        );
        self.deviations = Some(deviations);
        self.stage = RiskStage::FactorsUpdated;
        Ok(())
    }

    /// The composite risk score, clamped to `[0, 1]`.
    ///
    /// A pure view over the cached deviation ratios: it never triggers a
    /// recomputation and reports zero until the first factors update.
    pub fn risk_score(&self) -> Fixed {
        let Some(d) = self.deviations else {
            return Fixed::ZERO;
        };
        self.params
            .alpha
            .saturating_mul(d.sentiment)
            .saturating_add(self.params.beta.saturating_mul(d.volatility))
            .saturating_add(
                self.params
                    .gamma
                    .saturating_mul(d.order_book_imbalance),
            )
            .min(Fixed::ONE)
    }

    /// Replace the governed parameters.
    ///
    /// # Errors
    ///
    /// [`RiskError::ParameterOutOfRange`]; a rejected update leaves the
    /// previous parameters in force.
    pub fn set_parameters(&mut self, params: RiskParameters) -> Result<()> {
        params.validate()?;
        self.params = params;
        tracing::info!(
            alpha = %params.alpha,
            beta = %params.beta,
            gamma = %params.gamma,
            cushion = %params.cushion,
            wall = %params.wall,
            "risk parameters updated"
        );
        Ok(())
    }

    /// The governed parameters.
    pub fn params(&self) -> RiskParameters {
        self.params
    }

    /// The current lifecycle stage.
    pub fn stage(&self) -> RiskStage {
        self.stage
    }

    /// The baseline snapshot, if recorded.
    pub fn baseline(&self) -> Option<MarketSignals> {
        self.baseline
    }

    /// The latest current snapshot, if recorded.
    pub fn current(&self) -> Option<MarketSignals> {
        self.current
    }

    /// The cached deviation ratios, if computed.
    pub fn deviations(&self) -> Option<DeviationRatios> {
        self.deviations
    }

    /// Timestamp of the last factors update, if any.
    pub fn last_factors_update(&self) -> Option<u64> {
        self.deviations.map(|d| d.computed_at)
    }

    /// The configured current-values update interval.
    pub fn update_interval(&self) -> u64 {
        self.update_interval
    }
}

/// Deviation ratio `|current - baseline| / baseline`.
///
/// The baseline is known non-zero here. A ratio too large for 128 bits
/// pins to the maximum representable value; the score clamp caps it at
/// `1.0` regardless.
fn deviation(current: Fixed, baseline: Fixed) -> Fixed {
    current
        .abs_diff(baseline)
        .checked_div(baseline)
        .unwrap_or(Fixed::from_raw(u128::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fx(s: &str) -> Fixed {
        s.parse().expect("test value should parse")
    }

    fn signals(sentiment: &str, volatility: &str, obi: &str) -> MarketSignals {
        MarketSignals {
            sentiment: fx(sentiment),
            volatility: fx(volatility),
            order_book_imbalance: fx(obi),
        }
    }

    fn engine() -> RiskEngine {
        RiskEngine::new(RiskParameters::default()).expect("engine")
    }

    const T0: u64 = 1_700_000_000;

    #[test]
    fn test_stage_progression() {
        let mut e = engine();
        assert_eq!(e.stage(), RiskStage::Uninitialized);

        e.update_baselines(signals("1", "0.1", "1")).expect("baselines");
        assert_eq!(e.stage(), RiskStage::BaselineSet);

        e.update_current_values(signals("1", "0.1", "1"), T0)
            .expect("current");
        assert_eq!(e.stage(), RiskStage::CurrentSet);

        e.update_risk_factors(T0).expect("factors");
        assert_eq!(e.stage(), RiskStage::FactorsUpdated);

        // A new observation window cycles back to CurrentSet.
        e.update_current_values(signals("1.1", "0.1", "1"), T0 + DEFAULT_UPDATE_INTERVAL)
            .expect("second window");
        assert_eq!(e.stage(), RiskStage::CurrentSet);
    }

    #[test]
    fn test_current_values_require_baseline() {
        let mut e = engine();
        let err = e
            .update_current_values(signals("1", "0.1", "1"), T0)
            .expect_err("no baseline yet");
        assert!(matches!(
            err,
            RiskError::InvalidState {
                expected: "baseline set",
                actual: "uninitialized"
            }
        ));
    }

    #[test]
    fn test_factors_require_current_values() {
        let mut e = engine();
        e.update_baselines(signals("1", "0.1", "1")).expect("baselines");
        let err = e.update_risk_factors(T0).expect_err("no current values");
        assert!(matches!(err, RiskError::InvalidState { .. }));
    }

    #[test]
    fn test_zero_baseline_rejected() {
        let mut e = engine();
        let err = e
            .update_baselines(signals("1", "0", "1"))
            .expect_err("zero volatility baseline");
        assert!(matches!(
            err,
            RiskError::NonPositiveBaseline { signal: "volatility" }
        ));
    }

    #[test]
    fn test_current_values_cooldown() {
        let mut e = engine();
        e.update_baselines(signals("1", "0.1", "1")).expect("baselines");
        e.update_current_values(signals("1", "0.1", "1"), T0)
            .expect("first update is exempt");

        let err = e
            .update_current_values(signals("1", "0.1", "1"), T0 + 100)
            .expect_err("inside cooldown");
        assert!(matches!(
            err,
            RiskError::CooldownActive {
                elapsed: 100,
                required: DEFAULT_UPDATE_INTERVAL
            }
        ));

        // Exactly at the interval boundary passes.
        e.update_current_values(signals("1", "0.1", "1"), T0 + DEFAULT_UPDATE_INTERVAL)
            .expect("boundary update");
    }

    #[test]
    fn test_score_zero_before_any_factors_update() {
        let e = engine();
        assert_eq!(e.risk_score(), Fixed::ZERO);
    }

    #[test]
    fn test_score_zero_when_current_equals_baseline() {
        let mut e = engine();
        e.update_baselines(signals("1", "0.1", "1")).expect("baselines");
        e.update_current_values(signals("1", "0.1", "1"), T0)
            .expect("current");
        e.update_risk_factors(T0).expect("factors");
        assert_eq!(e.risk_score(), Fixed::ZERO);
    }

    #[test]
    fn test_reference_scenario_score() {
        // baseline {1.0, 0.01, 1.0}, current {0.99, 0.012, 0.99},
        // alpha = beta = 0.5, gamma = 0.1:
        //   d = {0.01, 0.2, 0.01}
        //   score = 0.5*0.01 + 0.5*0.2 + 0.1*0.01 = 0.106
        let mut e = engine();
        e.update_baselines(signals("1", "0.01", "1")).expect("baselines");
        e.update_current_values(signals("0.99", "0.012", "0.99"), T0)
            .expect("current");
        e.update_risk_factors(T0).expect("factors");

        let score = e.risk_score();
        assert_eq!(score, fx("0.106"));
        assert!(score > Fixed::ZERO && score < Fixed::ONE);
    }

    #[test]
    fn test_score_strictly_increases_per_signal() {
        let mut e = engine();
        e.update_baselines(signals("1", "0.01", "1")).expect("baselines");
        e.update_current_values(signals("0.99", "0.012", "0.99"), T0)
            .expect("current");
        e.update_risk_factors(T0).expect("factors");
        let base_score = e.risk_score();

        // Widen only the sentiment deviation.
        e.update_current_values(signals("0.98", "0.012", "0.99"), T0 + 3600)
            .expect("current");
        e.update_risk_factors(T0 + 3600).expect("factors");
        assert!(e.risk_score() > base_score);

        // Widen only the order-book-imbalance deviation on top.
        let mid_score = e.risk_score();
        e.update_current_values(signals("0.98", "0.012", "0.95"), T0 + 7200)
            .expect("current");
        e.update_risk_factors(T0 + 7200).expect("factors");
        assert!(e.risk_score() > mid_score);
    }

    #[test]
    fn test_score_clamps_to_one_for_huge_deviations() {
        let mut e = engine();
        e.update_baselines(signals("1", "0.000000000000000001", "1"))
            .expect("baselines");
        // Volatility explodes ten-billion-fold against a tiny baseline.
        e.update_current_values(signals("1", "10000000000", "1"), T0)
            .expect("current");
        e.update_risk_factors(T0).expect("factors");
        assert_eq!(e.risk_score(), Fixed::ONE);
    }

    #[test]
    fn test_zero_current_values_read_as_full_deviation() {
        let mut e = engine();
        e.update_baselines(signals("1", "0.1", "1")).expect("baselines");
        e.update_current_values(signals("0", "0.1", "1"), T0)
            .expect("zero current is accepted");
        e.update_risk_factors(T0).expect("factors");
        let d = e.deviations().expect("cached");
        assert_eq!(d.sentiment, Fixed::ONE);
    }

    #[test]
    fn test_recalibration_invalidates_cached_factors() {
        let mut e = engine();
        e.update_baselines(signals("1", "0.01", "1")).expect("baselines");
        e.update_current_values(signals("0.99", "0.012", "0.99"), T0)
            .expect("current");
        e.update_risk_factors(T0).expect("factors");
        assert!(e.risk_score() > Fixed::ZERO);

        e.update_baselines(signals("0.99", "0.012", "0.99"))
            .expect("recalibrate");
        assert_eq!(e.stage(), RiskStage::CurrentSet);
        assert!(e.deviations().is_none());
        assert_eq!(e.risk_score(), Fixed::ZERO);
    }

    #[test]
    fn test_set_parameters_rejects_and_keeps_previous() {
        let mut e = engine();
        let bad = RiskParameters {
            alpha: fx("0.005"),
            ..Default::default()
        };
        let err = e.set_parameters(bad).expect_err("alpha out of range");
        assert!(matches!(err, RiskError::ParameterOutOfRange { name: "alpha", .. }));
        assert_eq!(e.params(), RiskParameters::default());
    }

    #[test]
    fn test_score_timestamp_is_observable() {
        let mut e = engine();
        assert_eq!(e.last_factors_update(), None);
        e.update_baselines(signals("1", "0.1", "1")).expect("baselines");
        e.update_current_values(signals("1.2", "0.1", "1"), T0)
            .expect("current");
        e.update_risk_factors(T0 + 5).expect("factors");
        assert_eq!(e.last_factors_update(), Some(T0 + 5));
    }
}
