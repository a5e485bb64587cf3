//! Structured logging setup.
//!
//! Library code only emits `tracing` events; applications and test binaries
//! decide where they go by installing a subscriber once.

use crate::error::CoreError;
use tracing_subscriber::EnvFilter;

/// Environment variable consulted by [`init_from_env`].
pub const LOG_ENV: &str = "FIELDKIT_LOG";

/// Install a global fmt subscriber with the given filter directives
/// (e.g. `"fieldkit_widgets=debug"`).
///
/// Returns [`CoreError::LogFilter`] for bad directives and
/// [`CoreError::Logging`] when a global subscriber is already installed.
pub fn init(filter: &str) -> Result<(), CoreError> {
    let filter = EnvFilter::try_new(filter).map_err(|e| CoreError::LogFilter(e.to_string()))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| CoreError::Logging(e.to_string()))
}

/// Install a global subscriber filtered by `FIELDKIT_LOG`, defaulting to `warn`.
pub fn init_from_env() -> Result<(), CoreError> {
    let directives = std::env::var(LOG_ENV).unwrap_or_else(|_| "warn".to_string());
    init(&directives)
}
