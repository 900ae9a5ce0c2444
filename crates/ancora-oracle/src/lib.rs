//! # ancora-oracle
//!
//! Price oracle for the Ancora protocol.
//!
//! The oracle holds exactly one accepted price sample and enforces a
//! minimum interval between accepted submissions. The single-sample
//! model is deliberate: the cooldown blunts manipulation via rapid
//! resubmission without the state cost of a rolling window, and
//! consumers needing smoother references recalibrate their baselines
//! instead. Do not replace it with a moving average.
//!
//! ## Modules
//!
//! - [`feed`] — the cooldown-gated price feed and staleness checks

pub mod feed;

pub use feed::{PriceFeed, PriceSample};

use ancora_fixed::Fixed;

/// Error types for oracle operations.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    /// Price is zero.
    #[error("invalid price: {0}")]
    InvalidPrice(Fixed),

    /// Submission timestamp is not after the last accepted sample.
    #[error("non-monotonic timestamp: {new} <= {last}")]
    NonMonotonicTimestamp {
        /// The new timestamp that violated monotonicity.
        new: u64,
        /// The last accepted timestamp.
        last: u64,
    },

    /// Submission attempted before the minimum update interval elapsed.
    #[error("cooldown active: {elapsed}s elapsed of {required}s required")]
    CooldownActive {
        /// Seconds since the last accepted sample.
        elapsed: u64,
        /// Minimum seconds between accepted samples.
        required: u64,
    },
}

/// Convenience result type for oracle operations.
pub type Result<T> = std::result::Result<T, OracleError>;
