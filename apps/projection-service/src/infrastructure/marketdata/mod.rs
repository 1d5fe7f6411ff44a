//! Market Data Adapters
//!
//! Implementations of `MarketDataPort`: the Alpaca REST data API and an
//! in-memory source for tests and demo mode.

pub mod alpaca;
mod in_memory;

pub use alpaca::{AlpacaDataConfig, AlpacaError, AlpacaMarketDataAdapter, DataFeed, RetryConfig};
pub use in_memory::InMemoryMarketData;
