//! Daily OHLCV bar.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One trading day of price data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBar {
    /// Trading date.
    pub date: NaiveDate,
    /// Open price.
    pub open: Decimal,
    /// High price.
    pub high: Decimal,
    /// Low price.
    pub low: Decimal,
    /// Close price.
    pub close: Decimal,
    /// Traded volume.
    pub volume: Decimal,
}

impl PriceBar {
    /// Create a bar where open, high, low, and close are all `close`.
    ///
    /// Used for fixtures and sources that only publish closes.
    #[must_use]
    pub const fn from_close(date: NaiveDate, close: Decimal) -> Self {
        Self {
            date,
            open: close,
            high: close,
            low: close,
            close,
            volume: Decimal::ZERO,
        }
    }

    /// Whether the bar's prices are internally consistent.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.low <= self.high
            && self.open >= self.low
            && self.open <= self.high
            && self.close >= self.low
            && self.close <= self.high
    }
}
