//! Market Data Port (Driven Port)
//!
//! Interface for fetching daily price history from external providers.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::market_data::PriceBar;
use crate::domain::shared::Symbol;

/// Market data error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarketDataError {
    /// Connection error.
    #[error("Market data connection error: {message}")]
    ConnectionError {
        /// Error details.
        message: String,
    },

    /// Authentication failed.
    #[error("Market data authentication failed")]
    AuthenticationFailed,

    /// Symbol not found.
    #[error("Symbol not found: {symbol}")]
    SymbolNotFound {
        /// The unknown symbol.
        symbol: String,
    },

    /// Rate limited.
    #[error("Rate limited, retry after {retry_after_secs} seconds")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    /// API error.
    #[error("Market data API error: {message}")]
    ApiError {
        /// Error details.
        message: String,
    },

    /// Response could not be interpreted.
    #[error("Invalid market data response: {message}")]
    InvalidResponse {
        /// Error details.
        message: String,
    },
}

/// Port for fetching daily bars.
///
/// The infrastructure layer provides implementations (Alpaca, in-memory).
#[async_trait]
pub trait MarketDataPort: Send + Sync {
    /// Get daily bars for `symbol` between `start` and `end` inclusive,
    /// oldest first.
    ///
    /// An empty vector means the provider has no data for the range.
    async fn get_daily_bars(
        &self,
        symbol: &Symbol,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, MarketDataError>;

    /// Short source name for logs and metrics.
    fn name(&self) -> &'static str;
}
