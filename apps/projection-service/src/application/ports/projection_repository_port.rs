//! Projection Repository Port (Driven Port)
//!
//! Interface for storing completed projection runs.

use async_trait::async_trait;

use crate::application::dto::ProjectionDto;
use crate::domain::shared::{ProjectionId, Symbol};

/// Repository error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    /// Storage backend failure.
    #[error("Projection storage error: {message}")]
    Storage {
        /// Error details.
        message: String,
    },
}

/// Port for projection persistence.
#[async_trait]
pub trait ProjectionRepositoryPort: Send + Sync {
    /// Save a completed projection.
    async fn save(&self, projection: &ProjectionDto) -> Result<(), RepositoryError>;

    /// Find a projection by ID.
    async fn find_by_id(&self, id: &ProjectionId) -> Result<Option<ProjectionDto>, RepositoryError>;

    /// Most recent projections first, optionally for one symbol.
    async fn list_recent(
        &self,
        symbol: Option<&Symbol>,
        limit: usize,
    ) -> Result<Vec<ProjectionDto>, RepositoryError>;
}
