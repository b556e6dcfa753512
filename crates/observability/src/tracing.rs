//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

use crate::config::{LOG_FORMAT_ENV, LogConfig, LogFormat};

/// Initialize tracing/logging for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init_with(config: &LogConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    // JSON logs + timestamps by default, configurable via RUST_LOG.
    let installed = match config.format {
        LogFormat::Json => builder
            .json()
            .with_timer(tracing_subscriber::fmt::time::SystemTime)
            .try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };

    if installed.is_ok() {
        if let Some(rejected) = &config.rejected_format {
            ::tracing::warn!(
                variable = LOG_FORMAT_ENV,
                value = %rejected,
                "unknown log format; using json"
            );
        }
    }
}

/// Route logs through the test harness's captured output at debug level.
pub fn init_for_tests() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
