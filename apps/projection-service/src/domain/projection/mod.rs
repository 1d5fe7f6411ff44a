//! Monte Carlo price projection.

pub mod calendar;
mod ensemble;
mod output;
mod params;
mod simulator;
pub mod statistics;

pub use ensemble::PathEnsemble;
pub use output::Projection;
pub use params::{
    DEFAULT_DRIFT, DEFAULT_PATHS, SimulationLimits, SimulationParams, SimulationParamsBuilder,
    TRADING_DAYS_PER_YEAR,
};
pub use simulator::PricePathSimulator;
