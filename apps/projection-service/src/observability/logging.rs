//! Structured logging setup.

use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingConfig};

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
///
/// # Errors
///
/// Returns an error if the level is not a valid filter directive or a
/// subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::try_new(directives),
        _ => EnvFilter::try_new(format!("{},hyper=warn", config.level)),
    }
    .map_err(|e| LoggingError::Filter(e.to_string()))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    }
    .map_err(|e| LoggingError::Subscriber(e.to_string()))
}

/// Error type for logging setup.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// Invalid filter directive.
    #[error("invalid log filter: {0}")]
    Filter(String),
    /// Failed to install subscriber.
    #[error("failed to initialize tracing subscriber: {0}")]
    Subscriber(String),
}
