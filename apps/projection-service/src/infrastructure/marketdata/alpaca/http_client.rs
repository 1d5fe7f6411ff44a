//! Authenticated data API client with bounded retries.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use super::api_types::AlpacaErrorResponse;
use super::config::{AlpacaDataConfig, RetryConfig};
use super::error::AlpacaError;

/// Client for the Alpaca data API.
#[derive(Clone)]
pub struct AlpacaHttpClient {
    client: Client,
    api_key: String,
    api_secret: String,
    data_base_url: String,
    retry_config: RetryConfig,
}

impl std::fmt::Debug for AlpacaHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlpacaHttpClient")
            .field("data_base_url", &self.data_base_url)
            .field("retry_config", &self.retry_config)
            .finish_non_exhaustive()
    }
}

impl AlpacaHttpClient {
    /// Create a new HTTP client from config.
    ///
    /// # Errors
    ///
    /// Returns `AlpacaError::AuthenticationFailed` if credentials are empty,
    /// or `AlpacaError::Network` if the client cannot be built.
    pub fn new(config: &AlpacaDataConfig) -> Result<Self, AlpacaError> {
        if config.api_key.is_empty() || config.api_secret.is_empty() {
            return Err(AlpacaError::AuthenticationFailed);
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AlpacaError::Network(e.to_string()))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            data_base_url: config.data_base_url.clone(),
            retry_config: config.retry.clone(),
        })
    }

    /// GET `path` on the data API and decode the JSON body.
    ///
    /// Transport errors, 408 and 5xx are retried with exponential backoff.
    /// 429 is retried too, waiting `Retry-After` when the server sends it.
    /// Every retry counts against `max_attempts`.
    ///
    /// # Errors
    ///
    /// Returns `AlpacaError` once retries are exhausted or on a
    /// non-retryable status.
    pub async fn data_get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, AlpacaError> {
        let url = format!("{}{path}", self.data_base_url);
        let mut backoff = ExponentialBackoff::new(&self.retry_config);

        loop {
            let failure = match self.send_once(&url, query).await {
                Ok(body) => {
                    return serde_json::from_str(&body)
                        .map_err(|e| AlpacaError::JsonParse(e.to_string()));
                }
                Err(failure) => failure,
            };

            match failure.category() {
                ErrorCategory::NonRetryable => return Err(failure.into_error()),
                ErrorCategory::Retryable | ErrorCategory::RateLimited => {
                    let Some(computed) = backoff.next_backoff() else {
                        return Err(failure.exhausted(backoff.attempt));
                    };
                    let delay = failure.retry_after().map_or(computed, Duration::from_secs);
                    tracing::warn!(
                        url = %url,
                        failure = %failure,
                        attempt = backoff.attempt,
                        delay_ms = delay.as_millis(),
                        "Data API request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// One request. Returns the body on 2xx.
    async fn send_once(&self, url: &str, query: &[(&str, String)]) -> Result<String, Failure> {
        let response = self
            .client
            .get(url)
            .query(query)
            .header("APCA-API-KEY-ID", &self.api_key)
            .header("APCA-API-SECRET-KEY", &self.api_secret)
            .send()
            .await
            .map_err(|e| Failure::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return response
                .text()
                .await
                .map_err(|e| Failure::Transport(e.to_string()));
        }

        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        let body = response.text().await.unwrap_or_default();
        let (code, message) = match serde_json::from_str::<AlpacaErrorResponse>(&body) {
            Ok(err) => (
                err.code_string()
                    .unwrap_or_else(|| status.as_u16().to_string()),
                err.message,
            ),
            Err(_) => (status.as_u16().to_string(), body),
        };

        Err(Failure::Status {
            status,
            retry_after,
            code,
            message,
        })
    }
}

/// A failed attempt.
#[derive(Debug)]
enum Failure {
    /// No usable response.
    Transport(String),
    /// Non-2xx response.
    Status {
        status: StatusCode,
        retry_after: Option<u64>,
        code: String,
        message: String,
    },
}

impl Failure {
    const fn category(&self) -> ErrorCategory {
        match self {
            Self::Transport(_) => ErrorCategory::Retryable,
            Self::Status { status, .. } => categorize_status(*status),
        }
    }

    const fn retry_after(&self) -> Option<u64> {
        match self {
            Self::Status { retry_after, .. } => *retry_after,
            Self::Transport(_) => None,
        }
    }

    /// Error once the attempt budget is spent.
    fn exhausted(self, attempts: u32) -> AlpacaError {
        match self.category() {
            ErrorCategory::RateLimited => AlpacaError::RateLimited {
                retry_after_secs: self.retry_after().unwrap_or(60),
            },
            _ => AlpacaError::MaxRetriesExceeded { attempts },
        }
    }

    /// Error for a non-retryable failure.
    fn into_error(self) -> AlpacaError {
        match self {
            Self::Transport(message) => AlpacaError::Network(message),
            Self::Status {
                status,
                code,
                message,
                ..
            } => match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    AlpacaError::AuthenticationFailed
                }
                StatusCode::NOT_FOUND => AlpacaError::NotFound(message),
                StatusCode::UNPROCESSABLE_ENTITY => AlpacaError::Unprocessable(message),
                _ => AlpacaError::Api { code, message },
            },
        }
    }
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(message) => write!(f, "transport: {message}"),
            Self::Status {
                status,
                code,
                message,
                ..
            } => write!(f, "{status} [{code}] {message}"),
        }
    }
}

/// How a failed attempt is handled.
enum ErrorCategory {
    RateLimited,
    Retryable,
    NonRetryable,
}

const fn categorize_status(status: StatusCode) -> ErrorCategory {
    match status.as_u16() {
        429 => ErrorCategory::RateLimited,
        408 | 500 | 502 | 503 | 504 => ErrorCategory::Retryable,
        _ => ErrorCategory::NonRetryable,
    }
}

/// Doubling delay capped at `max_backoff`, for at most `max_attempts` requests.
struct ExponentialBackoff {
    attempt: u32,
    max_attempts: u32,
    current_backoff: Duration,
    max_backoff: Duration,
    multiplier: f64,
}

impl ExponentialBackoff {
    const fn new(config: &RetryConfig) -> Self {
        Self {
            attempt: 0,
            max_attempts: config.max_attempts,
            current_backoff: config.initial_backoff,
            max_backoff: config.max_backoff,
            multiplier: config.multiplier,
        }
    }

    /// Record a failed attempt; `None` once the budget is spent.
    fn next_backoff(&mut self) -> Option<Duration> {
        self.attempt += 1;
        if self.attempt >= self.max_attempts {
            return None;
        }

        let delay = self.current_backoff;
        self.current_backoff = self
            .max_backoff
            .min(self.current_backoff.mul_f64(self.multiplier));
        Some(delay)
    }
}
