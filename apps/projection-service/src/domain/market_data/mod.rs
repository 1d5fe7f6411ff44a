//! Market Data Bounded Context
//!
//! Daily price bars as delivered by providers, and the validated
//! chronological close series the simulator consumes.

mod historical_series;
mod price_bar;

pub use historical_series::{HistoricalPoint, HistoricalSeries};
pub use price_bar::PriceBar;
