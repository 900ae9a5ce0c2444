//! Market signal snapshots and derived deviation ratios.

use ancora_fixed::Fixed;
use serde::{Deserialize, Serialize};

/// One snapshot of the three observed market signals.
///
/// Signal semantics are opaque to the engine: it only measures how far
/// the current snapshot has drifted from the baseline, signal by signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketSignals {
    /// Aggregated market sentiment.
    pub sentiment: Fixed,
    /// Observed market volatility.
    pub volatility: Fixed,
    /// Order-book imbalance.
    pub order_book_imbalance: Fixed,
}

impl MarketSignals {
    /// Name of the first zero component, if any.
    pub fn zero_component(&self) -> Option<&'static str> {
        if self.sentiment.is_zero() {
            Some("sentiment")
        } else if self.volatility.is_zero() {
            Some("volatility")
        } else if self.order_book_imbalance.is_zero() {
            Some("order_book_imbalance")
        } else {
            None
        }
    }
}

/// Cached per-signal deviation ratios, `|current - baseline| / baseline`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviationRatios {
    /// Sentiment deviation ratio.
    pub sentiment: Fixed,
    /// Volatility deviation ratio.
    pub volatility: Fixed,
    /// Order-book-imbalance deviation ratio.
    pub order_book_imbalance: Fixed,
    /// Unix timestamp of the computation that produced these ratios.
    pub computed_at: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fx(s: &str) -> Fixed {
        s.parse().expect("test value should parse")
    }

    #[test]
    fn test_zero_component_names_first_offender() {
        let all_set = MarketSignals {
            sentiment: fx("1"),
            volatility: fx("0.1"),
            order_book_imbalance: fx("1"),
        };
        assert_eq!(all_set.zero_component(), None);

        let no_volatility = MarketSignals {
            volatility: Fixed::ZERO,
            ..all_set
        };
        assert_eq!(no_volatility.zero_component(), Some("volatility"));
    }
}
