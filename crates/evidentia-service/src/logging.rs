//! Tracing initialization for binaries and integration tests.

use tracing_subscriber::EnvFilter;

/// Logging initialization errors.
#[derive(Debug, thiserror::Error)]
pub enum LogInitError {
    #[error("failed to initialize tracing: {0}")]
    Init(String),
}

/// Install a global subscriber honoring `RUST_LOG`, defaulting to
/// `default_level` when the variable is unset.
pub fn init_tracing(default_level: &str) -> Result<(), LogInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| LogInitError::Init(e.to_string()))
}
