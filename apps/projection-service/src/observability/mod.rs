//! Observability module for logging and metrics.

mod logging;
mod metrics;

pub use logging::{LoggingError, init_logging};
pub use metrics::{
    MetricsConfig, MetricsError, init_metrics, record_market_data_request, record_projection,
};
