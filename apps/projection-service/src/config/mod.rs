//! Configuration module for the projection service.
//!
//! Loads a YAML file, interpolating environment variables first, then
//! validates the result.
//!
//! # Usage
//!
//! ```rust,ignore
//! use projection_service::config::load_config;
//!
//! // $PROJECTION_CONFIG, falling back to config.yaml
//! let config = load_config(None)?;
//!
//! // Explicit path
//! let config = load_config(Some("custom/config.yaml"))?;
//!
//! println!("HTTP port: {}", config.server.http_port);
//! ```

mod market_data;
mod observability;
mod persistence;
mod server;
mod simulation;

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use market_data::{AlpacaSettings, MarketDataConfig, MarketDataSource};
pub use observability::{LogFormat, LoggingConfig, MetricsSettings, ObservabilityConfig};
pub use persistence::PersistenceConfig;
pub use server::ServerConfig;
pub use simulation::SimulationConfig;

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "PROJECTION_CONFIG";

/// Config file used when neither an explicit path nor `PROJECTION_CONFIG` is given.
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),

    /// Missing required environment variable.
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Market data source configuration.
    #[serde(default)]
    pub market_data: MarketDataConfig,
    /// Simulation defaults and limits.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Record storage configuration.
    #[serde(default)]
    pub persistence: PersistenceConfig,
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to `$PROJECTION_CONFIG`,
///   then "config.yaml".
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.map_or_else(
        || std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string()),
        str::to_string,
    );

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is compile-time constant; expect() is safe here
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map_or("", |m| m.as_str());
        match std::env::var(&cap[1]) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.to_string(),
        }
    })
    .into_owned()
}

/// Validate configuration values.
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` naming the first bad value, or
/// `ConfigError::MissingEnvVar` when the Alpaca source has no credentials.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server
    config
        .server
        .http_addr()
        .parse::<SocketAddr>()
        .map_err(|e| {
            ConfigError::ValidationError(format!(
                "server address '{}' is invalid: {e}",
                config.server.http_addr()
            ))
        })?;

    // Simulation
    let sim = &config.simulation;
    if sim.max_paths == 0 {
        return Err(ConfigError::ValidationError(
            "simulation.max_paths must be at least 1".to_string(),
        ));
    }
    if sim.default_paths == 0 || sim.default_paths > sim.max_paths {
        return Err(ConfigError::ValidationError(format!(
            "simulation.default_paths must be between 1 and max_paths ({})",
            sim.max_paths
        )));
    }
    if sim.trading_days_per_year == 0 {
        return Err(ConfigError::ValidationError(
            "simulation.trading_days_per_year must be at least 1".to_string(),
        ));
    }
    if !sim.drift.is_finite() {
        return Err(ConfigError::ValidationError(
            "simulation.drift must be finite".to_string(),
        ));
    }
    if sim.max_grid_cells == 0 {
        return Err(ConfigError::ValidationError(
            "simulation.max_grid_cells must be positive".to_string(),
        ));
    }

    // Persistence
    if config.persistence.max_records == 0 {
        return Err(ConfigError::ValidationError(
            "persistence.max_records must be at least 1".to_string(),
        ));
    }

    // Market data
    if config.market_data.source == MarketDataSource::Alpaca
        && !config.market_data.alpaca.has_credentials()
    {
        return Err(ConfigError::MissingEnvVar(
            "ALPACA_KEY / ALPACA_SECRET (required for market_data.source = alpaca)".to_string(),
        ));
    }

    // Observability
    let metrics = &config.observability.metrics;
    if metrics.enabled && metrics.listen_addr.parse::<SocketAddr>().is_err() {
        return Err(ConfigError::ValidationError(format!(
            "observability.metrics.listen_addr '{}' is not a socket address",
            metrics.listen_addr
        )));
    }

    Ok(())
}
