//! Alpaca-specific error types.

use thiserror::Error;

use crate::application::ports::MarketDataError;

/// Errors from the Alpaca adapter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AlpacaError {
    /// API returned an error.
    #[error("API error: {code} - {message}")]
    Api {
        /// Error code from the API.
        code: String,
        /// Error message from the API.
        message: String,
    },

    /// Authentication failed.
    #[error("Authentication failed")]
    AuthenticationFailed,

    /// Resource not found (404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request rejected as unprocessable (422).
    #[error("Unprocessable request: {0}")]
    Unprocessable(String),

    /// Rate limited.
    #[error("Rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Suggested retry delay in seconds.
        retry_after_secs: u64,
    },

    /// Network error (retryable).
    #[error("Network error: {0}")]
    Network(String),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(String),

    /// Max retries exceeded.
    #[error("Max retries exceeded after {attempts} attempts")]
    MaxRetriesExceeded {
        /// Number of attempts made before giving up.
        attempts: u32,
    },
}

impl From<AlpacaError> for MarketDataError {
    fn from(err: AlpacaError) -> Self {
        match err {
            AlpacaError::Network(message) => Self::ConnectionError { message },
            AlpacaError::MaxRetriesExceeded { attempts } => Self::ConnectionError {
                message: format!("Max retries exceeded after {attempts} attempts"),
            },
            AlpacaError::AuthenticationFailed => Self::AuthenticationFailed,
            AlpacaError::RateLimited { retry_after_secs } => Self::RateLimited { retry_after_secs },
            AlpacaError::NotFound(symbol) | AlpacaError::Unprocessable(symbol) => {
                Self::SymbolNotFound { symbol }
            }
            AlpacaError::Api { code, message } => Self::ApiError {
                message: format!("{code}: {message}"),
            },
            AlpacaError::JsonParse(message) => Self::InvalidResponse { message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_maps_to_connection_error() {
        let err: MarketDataError = AlpacaError::Network("connection refused".to_string()).into();
        assert!(matches!(err, MarketDataError::ConnectionError { .. }));
    }

    #[test]
    fn auth_maps_to_authentication_failed() {
        let err: MarketDataError = AlpacaError::AuthenticationFailed.into();
        assert_eq!(err, MarketDataError::AuthenticationFailed);
    }

    #[test]
    fn rate_limit_keeps_delay() {
        let err: MarketDataError = AlpacaError::RateLimited {
            retry_after_secs: 60,
        }
        .into();
        assert_eq!(
            err,
            MarketDataError::RateLimited {
                retry_after_secs: 60
            }
        );
    }

    #[test]
    fn not_found_maps_to_symbol_not_found() {
        let err: MarketDataError = AlpacaError::NotFound("ZZZZ".to_string()).into();
        assert!(matches!(err, MarketDataError::SymbolNotFound { symbol } if symbol == "ZZZZ"));
    }

    #[test]
    fn parse_error_maps_to_invalid_response() {
        let err: MarketDataError = AlpacaError::JsonParse("expected value".to_string()).into();
        assert!(matches!(err, MarketDataError::InvalidResponse { .. }));
    }
}
