//! Alpaca market data adapter.
//!
//! Fetches split- and dividend-adjusted daily bars from the Alpaca data API
//! v2, following `next_page_token` pagination.

mod adapter;
mod api_types;
mod config;
mod error;
mod http_client;

pub use adapter::AlpacaMarketDataAdapter;
pub use config::{AlpacaDataConfig, DEFAULT_DATA_BASE_URL, DataFeed, RetryConfig};
pub use error::AlpacaError;
