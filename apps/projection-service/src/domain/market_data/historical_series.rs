//! Chronological series of daily closes.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use super::PriceBar;
use crate::domain::shared::DomainError;

/// A single `(date, close)` observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    /// Trading date.
    pub date: NaiveDate,
    /// Closing price.
    pub close: f64,
}

impl HistoricalPoint {
    /// Create a new observation.
    #[must_use]
    pub const fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Historical close prices, strictly increasing by date.
///
/// Every close is finite and positive so that log returns are defined.
/// The series may be empty; the simulator treats that as "no data".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoricalSeries {
    dates: Vec<NaiveDate>,
    closes: Vec<f64>,
}

impl HistoricalSeries {
    /// Build a series from observations.
    ///
    /// Input must already be chronological; out-of-order input is reported,
    /// never reordered.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if dates are not strictly increasing or a close
    /// is not a finite positive number.
    pub fn new(points: Vec<HistoricalPoint>) -> Result<Self, DomainError> {
        let mut dates = Vec::with_capacity(points.len());
        let mut closes = Vec::with_capacity(points.len());

        for point in points {
            if !point.close.is_finite() || point.close <= 0.0 {
                return Err(DomainError::invalid_value(
                    "close",
                    format!("close on {} must be a positive number", point.date),
                ));
            }

            if let Some(previous) = dates.last()
                && point.date <= *previous
            {
                return Err(DomainError::invariant(
                    "chronological",
                    format!("{} does not follow {previous}", point.date),
                ));
            }

            dates.push(point.date);
            closes.push(point.close);
        }

        Ok(Self { dates, closes })
    }

    /// Build a series from provider bars using their close prices.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if a close cannot be represented as `f64` or the
    /// bars violate the series invariants.
    pub fn from_bars(bars: &[PriceBar]) -> Result<Self, DomainError> {
        let points = bars
            .iter()
            .map(|bar| {
                bar.close
                    .to_f64()
                    .map(|close| HistoricalPoint::new(bar.date, close))
                    .ok_or_else(|| {
                        DomainError::invalid_value(
                            "close",
                            format!("close on {} is not representable", bar.date),
                        )
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(points)
    }

    /// Build a series from parallel date/close slices.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if the slices differ in length or violate the
    /// series invariants.
    pub fn from_parts(dates: &[NaiveDate], closes: &[f64]) -> Result<Self, DomainError> {
        if dates.len() != closes.len() {
            return Err(DomainError::invalid_value(
                "closes",
                format!("{} dates but {} closes", dates.len(), closes.len()),
            ));
        }

        Self::new(
            dates
                .iter()
                .zip(closes)
                .map(|(date, close)| HistoricalPoint::new(*date, *close))
                .collect(),
        )
    }

    /// Number of observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.closes.len()
    }

    /// Whether the series has no observations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    /// Observation dates in order.
    #[must_use]
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Closing prices in order.
    #[must_use]
    pub fn closes(&self) -> &[f64] {
        &self.closes
    }

    /// First close, if any.
    #[must_use]
    pub fn first_close(&self) -> Option<f64> {
        self.closes.first().copied()
    }

    /// Last close, if any.
    #[must_use]
    pub fn last_close(&self) -> Option<f64> {
        self.closes.last().copied()
    }

    /// Last observation date, if any.
    #[must_use]
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// Log returns `ln(close[i] / close[i - 1])`.
    ///
    /// The undefined first entry is dropped, so the result has `len() - 1`
    /// elements (zero for an empty or single-point series).
    #[must_use]
    pub fn log_returns(&self) -> Vec<f64> {
        self.closes
            .windows(2)
            .map(|pair| (pair[1] / pair[0]).ln())
            .collect()
    }
}
