//! Alpaca Market Data Adapter
//!
//! REST implementation of `MarketDataPort` over Alpaca's historical bars API.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::api_types::{AlpacaBar, AlpacaBarsResponse};
use super::config::{AlpacaDataConfig, DataFeed};
use super::error::AlpacaError;
use super::http_client::AlpacaHttpClient;
use crate::application::ports::{MarketDataError, MarketDataPort};
use crate::domain::market_data::PriceBar;
use crate::domain::shared::Symbol;

/// Largest page Alpaca serves for bars.
const PAGE_LIMIT: u32 = 10_000;

/// Upper bound on pages followed for one request.
const MAX_PAGES: usize = 100;

/// Alpaca market data adapter for daily bars.
#[derive(Debug, Clone)]
pub struct AlpacaMarketDataAdapter {
    http: AlpacaHttpClient,
    feed: DataFeed,
}

impl AlpacaMarketDataAdapter {
    /// Create a new Alpaca market data adapter.
    ///
    /// # Errors
    ///
    /// Returns error if credentials are missing or the HTTP client cannot be
    /// built.
    pub fn new(config: &AlpacaDataConfig) -> Result<Self, AlpacaError> {
        Ok(Self {
            http: AlpacaHttpClient::new(config)?,
            feed: config.feed,
        })
    }

    async fn fetch_all_pages(
        &self,
        symbol: &Symbol,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, AlpacaError> {
        let path = format!("/v2/stocks/{}/bars", symbol.as_str());
        let mut bars = Vec::new();
        let mut page_token: Option<String> = None;

        for page in 0..MAX_PAGES {
            let mut query = vec![
                ("timeframe", "1Day".to_string()),
                ("start", start.format("%Y-%m-%d").to_string()),
                ("end", end.format("%Y-%m-%d").to_string()),
                ("adjustment", "all".to_string()),
                ("feed", self.feed.as_str().to_string()),
                ("limit", PAGE_LIMIT.to_string()),
            ];
            if let Some(token) = page_token.take() {
                query.push(("page_token", token));
            }

            let response: AlpacaBarsResponse = self.http.data_get(&path, &query).await?;
            if let Some(echoed) = response
                .symbol
                .as_deref()
                .filter(|echoed| !echoed.eq_ignore_ascii_case(symbol.as_str()))
            {
                return Err(AlpacaError::Api {
                    code: "symbol_mismatch".to_string(),
                    message: format!("requested {symbol}, response is for {echoed}"),
                });
            }

            let page_bars = response.bars.unwrap_or_default();
            tracing::debug!(
                symbol = %symbol,
                page,
                bars = page_bars.len(),
                "Fetched bars page"
            );
            bars.extend(page_bars.iter().map(AlpacaBar::to_price_bar));

            match response.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => return Ok(bars),
            }
        }

        tracing::warn!(
            symbol = %symbol,
            max_pages = MAX_PAGES,
            "Bars pagination truncated"
        );
        Ok(bars)
    }
}

#[async_trait]
impl MarketDataPort for AlpacaMarketDataAdapter {
    async fn get_daily_bars(
        &self,
        symbol: &Symbol,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, MarketDataError> {
        self.fetch_all_pages(symbol, start, end)
            .await
            .map_err(|e| match e {
                AlpacaError::NotFound(_) | AlpacaError::Unprocessable(_) => {
                    MarketDataError::SymbolNotFound {
                        symbol: symbol.to_string(),
                    }
                }
                other => other.into(),
            })
    }

    fn name(&self) -> &'static str {
        "alpaca"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::marketdata::alpaca::RetryConfig;
    use rust_decimal::Decimal;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn adapter(server: &MockServer) -> AlpacaMarketDataAdapter {
        let config = AlpacaDataConfig::new("test-key".to_string(), "test-secret".to_string())
            .with_base_url(server.uri())
            .with_retry(RetryConfig {
                max_attempts: 3,
                initial_backoff: Duration::from_millis(1),
                max_backoff: Duration::from_millis(5),
                multiplier: 2.0,
            });
        AlpacaMarketDataAdapter::new(&config).unwrap()
    }

    fn bar_json(day: u32, close: f64) -> serde_json::Value {
        serde_json::json!({
            "t": format!("2024-01-{day:02}T05:00:00Z"),
            "o": close, "h": close, "l": close, "c": close, "v": 1000
        })
    }

    async fn fetch(server: &MockServer) -> Result<Vec<PriceBar>, MarketDataError> {
        adapter(server)
            .get_daily_bars(&Symbol::new("AAPL"), date(2024, 1, 1), date(2024, 1, 31))
            .await
    }

    #[tokio::test]
    async fn fetches_single_page_with_auth_and_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/stocks/AAPL/bars"))
            .and(header("APCA-API-KEY-ID", "test-key"))
            .and(header("APCA-API-SECRET-KEY", "test-secret"))
            .and(query_param("timeframe", "1Day"))
            .and(query_param("start", "2024-01-01"))
            .and(query_param("end", "2024-01-31"))
            .and(query_param("adjustment", "all"))
            .and(query_param("feed", "iex"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "bars": [bar_json(2, 185.5), bar_json(3, 184.25)],
                "symbol": "AAPL",
                "next_page_token": null
            })))
            .expect(1)
            .mount(&server)
            .await;

        let bars = fetch(&server).await.unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, date(2024, 1, 2));
        assert_eq!(bars[1].close, Decimal::new(18_425, 2));
    }

    #[tokio::test]
    async fn follows_next_page_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/stocks/AAPL/bars"))
            .and(query_param_is_missing("page_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "bars": [bar_json(2, 100.0)],
                "symbol": "AAPL",
                "next_page_token": "page-2"
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v2/stocks/AAPL/bars"))
            .and(query_param("page_token", "page-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "bars": [bar_json(3, 101.0), bar_json(4, 102.0)],
                "symbol": "AAPL",
                "next_page_token": null
            })))
            .expect(1)
            .mount(&server)
            .await;

        let bars = fetch(&server).await.unwrap();
        let days: Vec<_> = bars.iter().map(|b| b.date).collect();
        assert_eq!(days, vec![date(2024, 1, 2), date(2024, 1, 3), date(2024, 1, 4)]);
    }

    #[tokio::test]
    async fn null_bars_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "bars": null,
                "symbol": "AAPL",
                "next_page_token": null
            })))
            .mount(&server)
            .await;

        assert!(fetch(&server).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn bars_for_another_symbol_are_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "bars": [bar_json(2, 400.0)],
                "symbol": "MSFT",
                "next_page_token": null
            })))
            .expect(1)
            .mount(&server)
            .await;

        let Err(MarketDataError::ApiError { message }) = fetch(&server).await else {
            panic!("expected symbol mismatch");
        };
        assert!(message.contains("symbol_mismatch"));
        assert!(message.contains("MSFT"));
    }

    #[tokio::test]
    async fn unauthorized_is_authentication_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(serde_json::json!({"message": "unauthorized."})),
            )
            .expect(1)
            .mount(&server)
            .await;

        assert_eq!(
            fetch(&server).await,
            Err(MarketDataError::AuthenticationFailed)
        );
    }

    #[tokio::test]
    async fn unprocessable_is_symbol_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(422).set_body_json(
                serde_json::json!({"code": 42210000, "message": "invalid symbol: AAPL"}),
            ))
            .mount(&server)
            .await;

        assert_eq!(
            fetch(&server).await,
            Err(MarketDataError::SymbolNotFound {
                symbol: "AAPL".to_string()
            })
        );
    }

    #[tokio::test]
    async fn retries_service_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "bars": [bar_json(2, 50.0)],
                "symbol": "AAPL",
                "next_page_token": null
            })))
            .expect(1)
            .mount(&server)
            .await;

        let bars = fetch(&server).await.unwrap();
        assert_eq!(bars.len(), 1);
    }

    #[tokio::test]
    async fn persistent_server_error_exhausts_retries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(3)
            .mount(&server)
            .await;

        let Err(err) = fetch(&server).await else {
            panic!("expected connection error");
        };
        assert!(matches!(err, MarketDataError::ConnectionError { .. }));
    }

    #[tokio::test]
    async fn rate_limit_surfaces_retry_after() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
            .expect(3)
            .mount(&server)
            .await;

        assert_eq!(
            fetch(&server).await,
            Err(MarketDataError::RateLimited {
                retry_after_secs: 0
            })
        );
    }

    #[tokio::test]
    async fn malformed_body_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let Err(err) = fetch(&server).await else {
            panic!("expected invalid response");
        };
        assert!(matches!(err, MarketDataError::InvalidResponse { .. }));
    }
}
