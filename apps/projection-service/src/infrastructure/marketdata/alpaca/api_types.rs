//! Alpaca data API response types.
//!
//! These types map directly to Alpaca's REST API format.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::market_data::PriceBar;

/// One page of `GET /v2/stocks/{symbol}/bars`.
#[derive(Debug, Clone, Deserialize)]
pub struct AlpacaBarsResponse {
    /// Bars on this page; Alpaca sends `null` when there are none.
    #[serde(default)]
    pub bars: Option<Vec<AlpacaBar>>,
    /// Symbol echoed back, checked against the request.
    #[serde(default)]
    pub symbol: Option<String>,
    /// Token for the next page, absent on the last page.
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// A single bar from Alpaca.
#[derive(Debug, Clone, Deserialize)]
pub struct AlpacaBar {
    /// Bar start time.
    #[serde(rename = "t")]
    pub timestamp: DateTime<Utc>,
    /// Open price.
    #[serde(rename = "o")]
    pub open: Decimal,
    /// High price.
    #[serde(rename = "h")]
    pub high: Decimal,
    /// Low price.
    #[serde(rename = "l")]
    pub low: Decimal,
    /// Close price.
    #[serde(rename = "c")]
    pub close: Decimal,
    /// Volume.
    #[serde(rename = "v")]
    pub volume: Decimal,
}

impl AlpacaBar {
    /// Convert to a domain bar dated by the UTC calendar day of the bar start.
    #[must_use]
    pub fn to_price_bar(&self) -> PriceBar {
        PriceBar {
            date: self.timestamp.date_naive(),
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            volume: self.volume,
        }
    }
}

/// Error response from Alpaca API.
#[derive(Debug, Clone, Deserialize)]
pub struct AlpacaErrorResponse {
    /// Error code, numeric or textual.
    #[serde(default)]
    pub code: Option<serde_json::Value>,
    /// Error message.
    pub message: String,
}

impl AlpacaErrorResponse {
    /// Error code rendered without JSON quoting.
    #[must_use]
    pub fn code_string(&self) -> Option<String> {
        self.code.as_ref().map(|code| match code {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}
