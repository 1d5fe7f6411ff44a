//! In-memory market data source.
//!
//! Serves bars from a fixed table. Used by tests and by the `demo` source,
//! which seeds a deterministic random-walk history for a few tickers so the
//! service runs without provider credentials.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::RwLock;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use rust_decimal::Decimal;

use crate::application::ports::{MarketDataError, MarketDataPort};
use crate::domain::market_data::PriceBar;
use crate::domain::projection::calendar;
use crate::domain::shared::Symbol;

/// Tickers seeded by [`InMemoryMarketData::demo`] with their starting close.
const DEMO_TICKERS: [(&str, f64); 3] = [("AAPL", 75.0), ("MSFT", 160.0), ("SPY", 320.0)];

/// In-memory `MarketDataPort`.
#[derive(Debug, Default)]
pub struct InMemoryMarketData {
    bars: RwLock<HashMap<Symbol, Vec<PriceBar>>>,
}

impl InMemoryMarketData {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Source preloaded with synthetic daily history from 2020-01-02 to
    /// `until` for a handful of tickers.
    #[must_use]
    pub fn demo(until: NaiveDate) -> Self {
        let source = Self::new();
        let Some(start) = NaiveDate::from_ymd_opt(2020, 1, 2) else {
            return source;
        };

        for (seed, (ticker, first_close)) in (1_u64..).zip(DEMO_TICKERS) {
            source.insert(
                &Symbol::new(ticker),
                synthetic_history(start, until, first_close, seed),
            );
        }

        source
    }

    /// Replace the bars for `symbol`. Bars are stored sorted by date.
    pub fn insert(&self, symbol: &Symbol, mut bars: Vec<PriceBar>) {
        bars.sort_by_key(|bar| bar.date);
        self.bars.write().insert(symbol.clone(), bars);
    }

    /// Symbols with data.
    #[must_use]
    pub fn symbols(&self) -> Vec<Symbol> {
        let mut symbols: Vec<Symbol> = self.bars.read().keys().cloned().collect();
        symbols.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        symbols
    }
}

#[async_trait]
impl MarketDataPort for InMemoryMarketData {
    async fn get_daily_bars(
        &self,
        symbol: &Symbol,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, MarketDataError> {
        let bars = self.bars.read();
        Ok(bars
            .get(symbol)
            .map(|bars| {
                bars.iter()
                    .filter(|bar| bar.date >= start && bar.date <= end)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn name(&self) -> &'static str {
        "in_memory"
    }
}

/// Business-day random walk with roughly 25% annual volatility.
fn synthetic_history(
    start: NaiveDate,
    until: NaiveDate,
    first_close: f64,
    seed: u64,
) -> Vec<PriceBar> {
    let mut rng = StdRng::seed_from_u64(seed);
    let daily_vol = 0.25 / 252.0_f64.sqrt();
    let daily_drift = 0.08 / 252.0;

    let dates = start
        .iter_days()
        .take_while(|date| *date <= until)
        .filter(|date| calendar::is_business_day(*date));

    let mut close = first_close;
    dates
        .filter_map(|date| {
            let z: f64 = rng.sample(StandardNormal);
            let open = close;
            close *= (daily_drift + daily_vol * z).exp();
            let high = open.max(close) * 1.005;
            let low = open.min(close) * 0.995;
            let volume: u32 = rng.random_range(1_000_000..5_000_000);

            Some(PriceBar {
                date,
                open: price(open)?,
                high: price(high)?,
                low: price(low)?,
                close: price(close)?,
                volume: Decimal::from(volume),
            })
        })
        .collect()
}

/// Round to cents.
fn price(value: f64) -> Option<Decimal> {
    Decimal::from_f64_retain(value).map(|d| d.round_dp(2))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn filters_by_inclusive_range() {
        let source = InMemoryMarketData::new();
        let symbol = Symbol::new("TEST");
        source.insert(
            &symbol,
            vec![
                PriceBar::from_close(date(2024, 1, 4), Decimal::new(12, 0)),
                PriceBar::from_close(date(2024, 1, 2), Decimal::new(10, 0)),
                PriceBar::from_close(date(2024, 1, 3), Decimal::new(11, 0)),
            ],
        );

        let bars = source
            .get_daily_bars(&symbol, date(2024, 1, 2), date(2024, 1, 3))
            .await
            .unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].close, Decimal::new(10, 0));
        assert_eq!(bars[1].close, Decimal::new(11, 0));
    }

    #[tokio::test]
    async fn unknown_symbol_is_empty() {
        let source = InMemoryMarketData::new();
        let bars = source
            .get_daily_bars(&Symbol::new("NONE"), date(2024, 1, 1), date(2024, 12, 31))
            .await
            .unwrap();
        assert!(bars.is_empty());
    }

    #[tokio::test]
    async fn demo_history_is_deterministic_business_days() {
        let until = date(2024, 6, 28);
        let a = InMemoryMarketData::demo(until);
        let b = InMemoryMarketData::demo(until);
        let symbol = Symbol::new("AAPL");
        let range = (date(2023, 1, 1), date(2023, 12, 31));

        let bars_a = a.get_daily_bars(&symbol, range.0, range.1).await.unwrap();
        let bars_b = b.get_daily_bars(&symbol, range.0, range.1).await.unwrap();

        assert_eq!(bars_a, bars_b);
        assert_eq!(bars_a.len(), 260);
        assert!(bars_a.iter().all(|bar| calendar::is_business_day(bar.date)));
        assert!(bars_a.iter().all(|bar| bar.close > Decimal::ZERO && bar.is_consistent()));
        assert_eq!(a.symbols().len(), 3);
    }
}
