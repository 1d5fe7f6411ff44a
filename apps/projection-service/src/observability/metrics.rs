//! Prometheus metrics for the projection service.
//!
//! The exporter is optional. When it is not installed the `metrics` macros
//! are no-ops, so recording functions are safe to call from tests.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Configuration for the metrics exporter.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Address to bind the metrics HTTP listener.
    pub listen_addr: SocketAddr,
    /// Histogram buckets for durations (in seconds).
    pub latency_buckets: Vec<f64>,
}

impl MetricsConfig {
    /// Create a metrics configuration for `addr` with default buckets.
    #[must_use]
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            listen_addr: addr,
            // 1ms to 30s; simulations dominate the upper end
            latency_buckets: vec![
                0.001, 0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0,
            ],
        }
    }
}

/// Initialize the Prometheus metrics exporter.
///
/// This starts an HTTP server that exposes metrics at `/metrics`.
///
/// # Errors
///
/// Returns an error if the metrics exporter fails to start (e.g., port already in use).
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    PrometheusBuilder::new()
        .with_http_listener(config.listen_addr)
        .set_buckets(&config.latency_buckets)
        .map_err(|e| MetricsError::Configuration(e.to_string()))?
        .install()
        .map_err(|e| MetricsError::Installation(e.to_string()))?;

    tracing::info!(
        addr = %config.listen_addr,
        "Prometheus metrics exporter started"
    );

    Ok(())
}

/// Error type for metrics operations.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// Failed to configure metrics exporter.
    #[error("metrics configuration error: {0}")]
    Configuration(String),
    /// Failed to install metrics exporter.
    #[error("metrics installation error: {0}")]
    Installation(String),
}

/// Record a finished projection run.
///
/// # Arguments
///
/// * `status` - Outcome (e.g., "ok", "no_data", "error")
/// * `duration_seconds` - Wall time from request to response
/// * `paths` - Ensemble width
pub fn record_projection(status: &str, duration_seconds: f64, paths: usize) {
    counter!("projections_total", "status" => status.to_string()).increment(1);
    histogram!("projection_duration_seconds").record(duration_seconds);

    #[allow(clippy::cast_precision_loss)]
    histogram!("projection_paths").record(paths as f64);
}

/// Record a market data request.
///
/// # Arguments
///
/// * `source` - Data source (e.g., "alpaca", "in_memory")
/// * `status` - Request status (e.g., "ok", "empty", "error")
/// * `latency_seconds` - Request latency in seconds
pub fn record_market_data_request(source: &str, status: &str, latency_seconds: f64) {
    counter!(
        "market_data_requests_total",
        "source" => source.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        "market_data_latency_seconds",
        "source" => source.to_string()
    )
    .record(latency_seconds);
}
