//! Tracing and logging (shared setup).

pub mod config;

/// Tracing configuration (filters, layers).
pub mod tracing;

pub use config::{ConfigError, LogFormat, ObservabilityConfig};

/// Initialize process-wide observability from the environment.
///
/// An invalid `SPACEAUTH_LOG_FORMAT` is reported as an error and nothing is
/// installed. Safe to call multiple times; subsequent calls become no-ops.
pub fn init() -> Result<(), ConfigError> {
    let config = ObservabilityConfig::from_env()?;
    init_with(&config);
    Ok(())
}

/// Initialize process-wide observability with an explicit configuration.
pub fn init_with(config: &ObservabilityConfig) {
    tracing::init(config);
    ::tracing::debug!(
        filter = %config.filter,
        format = ?config.format,
        "observability initialized"
    );
}
