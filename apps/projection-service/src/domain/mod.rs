//! Domain Layer
//!
//! Core business logic with no infrastructure dependencies.
//!
//! - `shared`: Value objects and errors shared across bounded contexts
//! - `market_data`: Daily bars and the validated historical close series
//! - `projection`: Monte Carlo price-path simulation and its statistics

pub mod market_data;
pub mod projection;
pub mod shared;
