//! Tracing/logging initialization.
//!
//! Pricing decisions are logged under the `optrules_pricing` target at
//! `debug`; set `RUST_LOG=optrules_pricing=debug` to see why an option price
//! was (or was not) adjusted.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info";

/// Initialize JSON tracing, falling back to `default_filter` when `RUST_LOG`
/// is unset or invalid.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    // JSON logs + timestamps, configurable via RUST_LOG.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(true)
        .with_current_span(true)
        .try_init();
}

/// Initialize a human-readable subscriber that writes through the test
/// harness's captured output.
pub fn init_for_tests() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("optrules_pricing=debug"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
