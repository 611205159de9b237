//! Log output for test runs.

use std::sync::Once;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable holding the filter directives.
pub const LOG_ENV: &str = "STRICTPY_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Install a fmt subscriber filtered by `STRICTPY_LOG` (default `warn`).
///
/// Safe to call from every test; only the first call installs anything, and
/// an already installed global subscriber is left alone.
pub fn init() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_test_writer())
            .try_init();
    });
}
