//! Market data source configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::infrastructure::marketdata::alpaca::{
    AlpacaDataConfig, DEFAULT_DATA_BASE_URL, DataFeed, RetryConfig,
};

/// Which `MarketDataPort` implementation to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketDataSource {
    /// Alpaca data API.
    Alpaca,
    /// Synthetic in-memory history, no credentials required.
    #[default]
    Demo,
}

impl MarketDataSource {
    /// Config value for this source.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Alpaca => "alpaca",
            Self::Demo => "demo",
        }
    }
}

/// Market data configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketDataConfig {
    /// Active source.
    #[serde(default)]
    pub source: MarketDataSource,
    /// Alpaca settings, used when `source` is `alpaca`.
    #[serde(default)]
    pub alpaca: AlpacaSettings,
}

/// Alpaca data API settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct AlpacaSettings {
    /// API key ID.
    #[serde(default)]
    pub api_key: String,
    /// API secret key.
    #[serde(default)]
    pub api_secret: String,
    /// Data API base URL.
    #[serde(default = "default_data_base_url")]
    pub data_base_url: String,
    /// `iex` or `sip`.
    #[serde(default)]
    pub feed: DataFeed,
    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Attempts per request, including the first.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// First retry delay.
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
    /// Retry delay cap.
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

impl std::fmt::Debug for AlpacaSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlpacaSettings")
            .field("api_key", &"[REDACTED]")
            .field("api_secret", &"[REDACTED]")
            .field("data_base_url", &self.data_base_url)
            .field("feed", &self.feed)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}

impl Default for AlpacaSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_secret: String::new(),
            data_base_url: default_data_base_url(),
            feed: DataFeed::default(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

impl AlpacaSettings {
    /// Whether both credentials are set.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.api_secret.trim().is_empty()
    }

    /// Build the adapter configuration.
    #[must_use]
    pub fn to_adapter_config(&self) -> AlpacaDataConfig {
        AlpacaDataConfig::new(self.api_key.clone(), self.api_secret.clone())
            .with_base_url(self.data_base_url.clone())
            .with_feed(self.feed)
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_retry(RetryConfig {
                max_attempts: self.max_retries.max(1),
                initial_backoff: Duration::from_millis(self.initial_backoff_ms),
                max_backoff: Duration::from_millis(self.max_backoff_ms),
                ..RetryConfig::default()
            })
    }
}

fn default_data_base_url() -> String {
    DEFAULT_DATA_BASE_URL.to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_max_retries() -> u32 {
    3
}

const fn default_initial_backoff_ms() -> u64 {
    100
}

const fn default_max_backoff_ms() -> u64 {
    10_000
}
