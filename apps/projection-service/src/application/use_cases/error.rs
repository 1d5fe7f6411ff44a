//! Use case errors.

use crate::application::ports::{MarketDataError, RepositoryError};
use crate::domain::shared::DomainError;

/// Errors returned by the projection use cases.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProjectionError {
    /// Malformed request.
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// Error details.
        message: String,
    },

    /// Ticker failed validation.
    #[error("Invalid symbol '{symbol}': {message}")]
    InvalidSymbol {
        /// The rejected input.
        symbol: String,
        /// Error details.
        message: String,
    },

    /// Simulation parameters out of range.
    #[error("Invalid value for '{field}': {message}")]
    InvalidParameters {
        /// Offending parameter.
        field: String,
        /// Error details.
        message: String,
    },

    /// No history for the requested symbol and date range.
    #[error("No historical data available for {symbol} in the requested date range")]
    NoData {
        /// Requested symbol.
        symbol: String,
    },

    /// Stored projection not found.
    #[error("Projection not found: {id}")]
    NotFound {
        /// Projection ID.
        id: String,
    },

    /// Market data provider failure.
    #[error(transparent)]
    MarketData(#[from] MarketDataError),

    /// Storage failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Unexpected failure.
    #[error("Internal error: {message}")]
    Internal {
        /// Error details.
        message: String,
    },
}

impl From<DomainError> for ProjectionError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidValue { field, message } => {
                Self::InvalidParameters { field, message }
            }
            DomainError::InvariantViolation { .. } => Self::Internal {
                message: err.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_value_maps_to_parameters() {
        let err: ProjectionError = DomainError::invalid_value("paths", "must be at least 1").into();
        assert_eq!(
            err,
            ProjectionError::InvalidParameters {
                field: "paths".to_string(),
                message: "must be at least 1".to_string(),
            }
        );
    }

    #[test]
    fn invariant_maps_to_internal() {
        let err: ProjectionError = DomainError::invariant("calendar_range", "exhausted").into();
        let ProjectionError::Internal { message } = err else {
            panic!("expected Internal");
        };
        assert!(message.contains("calendar_range"));
    }

    #[test]
    fn no_data_message() {
        let err = ProjectionError::NoData {
            symbol: "ZZZZ".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "No historical data available for ZZZZ in the requested date range"
        );
    }
}
