//! Integration test crate for the Ancora protocol.
//!
//! The tests drive a full [`StabilityCore`](ancora_core::StabilityCore)
//! end to end across the workspace crates. The library itself only
//! carries the shared tracing setup.
//!
//! Run all integration tests:
//! ```sh
//! cargo test -p ancora-integration-tests
//! ```

/// Install a fmt subscriber honoring `RUST_LOG`, defaulting to
/// `ancora=info`.
///
/// Tests across one binary share a process; only the first install
/// wins and later calls are no-ops.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("ancora=info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
