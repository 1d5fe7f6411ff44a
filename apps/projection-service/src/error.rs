//! Service errors at the HTTP boundary.
//!
//! Use case errors are mapped onto a small set of stable error codes, each
//! with a fixed HTTP status. Response bodies are JSON:
//!
//! ```json
//! {"code": "NO_DATA", "message": "...", "status": 404, "details": {"symbol": "AAPL"}}
//! ```
//!
//! | Code | Status | Usage |
//! |------|--------|-------|
//! | `INVALID_REQUEST` | 400 | Malformed body, bad date range |
//! | `INVALID_SYMBOL` | 400 | Ticker rejected locally or by the provider |
//! | `INVALID_PARAMETERS` | 400 | Simulation parameters out of range |
//! | `NO_DATA` | 404 | No history for the symbol and range |
//! | `PROJECTION_NOT_FOUND` | 404 | Unknown projection id |
//! | `RATE_LIMITED` | 429 | Provider rate limit |
//! | `MARKET_DATA_UNAVAILABLE` | 502 | Provider unreachable or failing |
//! | `INTERNAL_ERROR` | 500 | Unexpected server error |

use std::collections::HashMap;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::ports::MarketDataError;
use crate::application::use_cases::ProjectionError;

/// Error codes returned by the projection service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors (400)
    /// Invalid request format or missing fields.
    InvalidRequest,
    /// Invalid ticker symbol.
    InvalidSymbol,
    /// Invalid simulation parameters.
    InvalidParameters,

    // Not found errors (404)
    /// No historical data for the requested range.
    NoData,
    /// Projection not found.
    ProjectionNotFound,

    // Upstream errors
    /// Market data provider rate limit hit.
    RateLimited,
    /// Market data provider failed.
    MarketDataUnavailable,

    // Internal errors (500)
    /// Internal server error.
    InternalError,
}

impl ErrorCode {
    /// HTTP status for this error.
    #[must_use]
    pub const fn http_status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest | Self::InvalidSymbol | Self::InvalidParameters => {
                StatusCode::BAD_REQUEST
            }
            Self::NoData | Self::ProjectionNotFound => StatusCode::NOT_FOUND,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::MarketDataUnavailable => StatusCode::BAD_GATEWAY,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable error reason string.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::InvalidSymbol => "INVALID_SYMBOL",
            Self::InvalidParameters => "INVALID_PARAMETERS",
            Self::NoData => "NO_DATA",
            Self::ProjectionNotFound => "PROJECTION_NOT_FOUND",
            Self::RateLimited => "RATE_LIMITED",
            Self::MarketDataUnavailable => "MARKET_DATA_UNAVAILABLE",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

/// An error with a code and key/value context, rendered as a JSON response.
#[derive(Debug, Error)]
pub struct ServiceError {
    code: ErrorCode,
    message: String,
    context: Vec<(String, String)>,
}

impl ServiceError {
    /// Create a new service error.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: Vec::new(),
        }
    }

    /// Add context to the error.
    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.push((key.into(), value.into()));
        self
    }

    /// Get the error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Get the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the context.
    #[must_use]
    pub fn context(&self) -> &[(String, String)] {
        &self.context
    }

    /// Convert to the JSON error body.
    #[must_use]
    pub fn to_http_response(&self) -> HttpErrorResponse {
        HttpErrorResponse {
            code: self.code.reason().to_string(),
            message: self.message.clone(),
            status: self.code.http_status().as_u16(),
            details: self.context.iter().cloned().collect(),
        }
    }

    fn context_value(&self, key: &str) -> Option<&str> {
        self.context
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code.reason(), self.message)
    }
}

/// HTTP error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpErrorResponse {
    /// Error code string.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// HTTP status code.
    pub status: u16,
    /// Additional details.
    pub details: HashMap<String, String>,
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.code.http_status();
        if status.is_server_error() {
            tracing::error!(code = %self.code, message = %self.message, "Request failed");
        }

        let retry_after = self
            .context_value("retry_after_secs")
            .and_then(|v| HeaderValue::from_str(v).ok());

        let mut response = (status, Json(self.to_http_response())).into_response();
        if let Some(value) = retry_after {
            response.headers_mut().insert(header::RETRY_AFTER, value);
        }
        response
    }
}

/// Convenience constructors for common errors.
impl ServiceError {
    /// Invalid request format.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Projection not found.
    #[must_use]
    pub fn projection_not_found(id: &str) -> Self {
        Self::new(
            ErrorCode::ProjectionNotFound,
            format!("Projection {id} not found"),
        )
        .with_context("id", id)
    }

    /// Internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl From<ProjectionError> for ServiceError {
    fn from(err: ProjectionError) -> Self {
        let message = err.to_string();
        match err {
            ProjectionError::InvalidRequest { .. } => Self::invalid_request(message),
            ProjectionError::InvalidSymbol { symbol, .. } => {
                Self::new(ErrorCode::InvalidSymbol, message).with_context("symbol", symbol)
            }
            ProjectionError::InvalidParameters { field, .. } => {
                Self::new(ErrorCode::InvalidParameters, message).with_context("field", field)
            }
            ProjectionError::NoData { symbol } => {
                Self::new(ErrorCode::NoData, message).with_context("symbol", symbol)
            }
            ProjectionError::NotFound { id } => Self::projection_not_found(&id),
            ProjectionError::MarketData(MarketDataError::SymbolNotFound { symbol }) => {
                Self::new(ErrorCode::InvalidSymbol, message).with_context("symbol", symbol)
            }
            ProjectionError::MarketData(MarketDataError::RateLimited { retry_after_secs }) => {
                Self::new(ErrorCode::RateLimited, message)
                    .with_context("retry_after_secs", retry_after_secs.to_string())
            }
            ProjectionError::MarketData(_) => Self::new(ErrorCode::MarketDataUnavailable, message),
            ProjectionError::Repository(_) | ProjectionError::Internal { .. } => {
                Self::internal(message)
            }
        }
    }
}

impl From<JsonRejection> for ServiceError {
    fn from(rejection: JsonRejection) -> Self {
        Self::invalid_request(rejection.body_text())
    }
}
