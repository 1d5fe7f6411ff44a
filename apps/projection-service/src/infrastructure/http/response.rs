//! HTTP response DTOs.

use serde::{Deserialize, Serialize};

use crate::application::dto::ProjectionRecordDto;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Health status.
    pub status: String,
    /// Application version.
    pub version: String,
    /// Active market data source.
    pub market_data: String,
}

/// Listing of stored projections, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListProjectionsResponse {
    /// Number of records returned.
    pub count: usize,
    /// Record summaries.
    pub projections: Vec<ProjectionRecordDto>,
}
