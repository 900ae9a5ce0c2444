//! Cooldown-gated single-sample price feed.
//!
//! The feed stores the latest accepted [`PriceSample`] and rejects a new
//! submission unless the configured minimum interval has elapsed since
//! the previous one. Cooldowns are precondition checks against the
//! caller-supplied clock; nothing here blocks or sleeps.

use ancora_fixed::Fixed;
use serde::{Deserialize, Serialize};

use crate::{OracleError, Result};

/// Default minimum interval between accepted price samples (1 hour).
pub const DEFAULT_UPDATE_INTERVAL: u64 = 3600;

/// Default staleness bound consumers should apply (1 hour).
pub const DEFAULT_STALENESS_MAX_AGE: u64 = 3600;

/// One accepted price observation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceSample {
    /// The accepted price.
    pub price: Fixed,
    /// Unix timestamp at which the price was accepted.
    pub timestamp: u64,
}

/// The oracle state: latest sample plus update discipline.
#[derive(Debug, Clone)]
pub struct PriceFeed {
    /// The latest accepted sample.
    sample: PriceSample,
    /// Minimum seconds between accepted samples.
    min_update_interval: u64,
}

impl PriceFeed {
    /// Create a feed seeded with an initial price at `initial_time`,
    /// using the default update interval.
    ///
    /// # Errors
    ///
    /// - [`OracleError::InvalidPrice`] if `initial_price` is zero
    pub fn new(initial_price: Fixed, initial_time: u64) -> Result<Self> {
        Self::with_interval(initial_price, initial_time, DEFAULT_UPDATE_INTERVAL)
    }

    /// Create a feed with a custom minimum update interval.
    pub fn with_interval(
        initial_price: Fixed,
        initial_time: u64,
        min_update_interval: u64,
    ) -> Result<Self> {
        if initial_price.is_zero() {
            return Err(OracleError::InvalidPrice(initial_price));
        }
        Ok(Self {
            sample: PriceSample {
                price: initial_price,
                timestamp: initial_time,
            },
            min_update_interval,
        })
    }

    /// Submit a new price observation.
    ///
    /// On success the sample is replaced; on any failure the previous
    /// sample stays in force.
    ///
    /// # Errors
    ///
    /// - [`OracleError::InvalidPrice`] if `price` is zero
    /// - [`OracleError::NonMonotonicTimestamp`] if `now` is not after
    ///   the last accepted timestamp
    /// - [`OracleError::CooldownActive`] if the minimum interval has not
    ///   elapsed
    pub fn submit(&mut self, price: Fixed, now: u64) -> Result<()> {
        if price.is_zero() {
            return Err(OracleError::InvalidPrice(price));
        }
        if now <= self.sample.timestamp {
            return Err(OracleError::NonMonotonicTimestamp {
                new: now,
                last: self.sample.timestamp,
            });
        }
        let elapsed = now - self.sample.timestamp;
        if elapsed < self.min_update_interval {
            return Err(OracleError::CooldownActive {
                elapsed,
                required: self.min_update_interval,
            });
        }
        self.sample = PriceSample {
            price,
            timestamp: now,
        };
        tracing::debug!(price = %price, timestamp = now, "accepted price sample");
        Ok(())
    }

    /// The latest accepted sample.
    pub fn current(&self) -> PriceSample {
        self.sample
    }

    /// The latest accepted price.
    pub fn price(&self) -> Fixed {
        self.sample.price
    }

    /// Whether the sample is older than `max_age` at time `now`.
    pub fn is_stale(&self, max_age: u64, now: u64) -> bool {
        now.saturating_sub(self.sample.timestamp) > max_age
    }

    /// Seconds until the next submission becomes acceptable (zero when
    /// the cooldown has already elapsed).
    pub fn time_until_next(&self, now: u64) -> u64 {
        (self.sample.timestamp + self.min_update_interval).saturating_sub(now)
    }

    /// The configured minimum update interval.
    pub fn min_update_interval(&self) -> u64 {
        self.min_update_interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fx(s: &str) -> Fixed {
        s.parse().expect("test value should parse")
    }

    #[test]
    fn test_new_rejects_zero_price() {
        let err = PriceFeed::new(Fixed::ZERO, 1000).expect_err("zero price");
        assert!(matches!(err, OracleError::InvalidPrice(_)));
    }

    #[test]
    fn test_submit_at_exact_interval_boundary() {
        let mut feed = PriceFeed::new(fx("1"), 1000).expect("feed");
        feed.submit(fx("1.02"), 1000 + DEFAULT_UPDATE_INTERVAL)
            .expect("boundary submit should pass");
        assert_eq!(feed.price(), fx("1.02"));
    }

    #[test]
    fn test_second_submit_within_cooldown_leaves_price_unchanged() {
        let mut feed = PriceFeed::new(fx("1"), 1000).expect("feed");
        feed.submit(fx("1.1"), 1000 + DEFAULT_UPDATE_INTERVAL)
            .expect("first submit");

        let err = feed
            .submit(fx("1.2"), 1000 + DEFAULT_UPDATE_INTERVAL + 10)
            .expect_err("second submit inside cooldown");
        assert!(matches!(
            err,
            OracleError::CooldownActive {
                elapsed: 10,
                required: DEFAULT_UPDATE_INTERVAL
            }
        ));
        assert_eq!(feed.price(), fx("1.1"), "rejected submit must not mutate");
    }

    #[test]
    fn test_non_monotonic_timestamp_rejected() {
        let mut feed = PriceFeed::new(fx("1"), 1000).expect("feed");
        let err = feed.submit(fx("1.1"), 1000).expect_err("same timestamp");
        assert!(matches!(
            err,
            OracleError::NonMonotonicTimestamp { new: 1000, last: 1000 }
        ));
    }

    #[test]
    fn test_zero_price_rejected_before_timing_checks() {
        let mut feed = PriceFeed::new(fx("1"), 1000).expect("feed");
        // Zero price fails even though the timestamp would also fail.
        let err = feed.submit(Fixed::ZERO, 500).expect_err("zero price");
        assert!(matches!(err, OracleError::InvalidPrice(_)));
    }

    #[test]
    fn test_staleness_boundary() {
        let feed = PriceFeed::new(fx("1"), 1000).expect("feed");
        assert!(!feed.is_stale(DEFAULT_STALENESS_MAX_AGE, 1000 + DEFAULT_STALENESS_MAX_AGE));
        assert!(feed.is_stale(DEFAULT_STALENESS_MAX_AGE, 1000 + DEFAULT_STALENESS_MAX_AGE + 1));
    }

    #[test]
    fn test_time_until_next() {
        let mut feed = PriceFeed::with_interval(fx("1"), 1000, 600).expect("feed");
        assert_eq!(feed.time_until_next(1000), 600);
        assert_eq!(feed.time_until_next(1300), 300);
        assert_eq!(feed.time_until_next(1600), 0);
        assert_eq!(feed.time_until_next(9999), 0);

        feed.submit(fx("1.01"), 1600).expect("submit");
        assert_eq!(feed.time_until_next(1600), 600);
    }
}
