//! Tracing and logging setup shared by binaries and tests.

/// Initialize process-wide observability from the environment.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init_with(&LogConfig::from_env());
}

/// Environment-driven logging configuration.
pub mod config;

/// Tracing subscriber installation.
pub mod tracing;

pub use self::config::{LogConfig, LogFormat};
pub use self::tracing::{init_for_tests, init_with};
