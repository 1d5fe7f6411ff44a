//! HTTP request DTOs.
//!
//! `POST /api/v1/projections` takes `ProjectionRequestDto` directly.

use serde::{Deserialize, Serialize};

/// Query string for `GET /api/v1/projections`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListProjectionsQuery {
    /// Only records for this ticker.
    #[serde(default)]
    pub symbol: Option<String>,
    /// Maximum records to return.
    #[serde(default)]
    pub limit: Option<usize>,
}
