//! Application Ports (Driven)
//!
//! Ports define the interfaces the use cases need from external systems.

mod market_data_port;
mod projection_repository_port;

pub use market_data_port::{MarketDataError, MarketDataPort};
pub use projection_repository_port::{ProjectionRepositoryPort, RepositoryError};
