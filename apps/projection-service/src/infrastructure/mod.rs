//! Infrastructure Layer
//!
//! Adapters that implement the application ports and expose the service.
//!
//! - `marketdata`: Alpaca REST adapter and in-memory source (driven)
//! - `persistence`: Projection record store (driven)
//! - `http`: Axum REST API (driver)

pub mod http;
pub mod marketdata;
pub mod persistence;
