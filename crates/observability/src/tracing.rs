//! Tracing/logging initialization.
//!
//! JSON lines with timestamps. The filter comes from `RUST_LOG`, then the
//! directive the caller passes in (the portal's configured log filter).

use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "info";

/// Initialize tracing/logging with the default filter.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    init_with_filter(DEFAULT_FILTER);
}

/// Initialize tracing/logging, using `fallback` when `RUST_LOG` is not set.
///
/// Returns `false` when a global subscriber was already installed.
pub fn init_with_filter(fallback: &str) -> bool {
    let filter = resolve_filter(fallback);

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init()
        .is_ok();

    if installed {
        ::tracing::debug!("tracing initialized");
    }
    installed
}

fn resolve_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}
