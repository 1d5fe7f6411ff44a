//! Simulator output.

use chrono::NaiveDate;

use super::PathEnsemble;

/// Result of one simulation run over a historical series.
///
/// All per-step series share the combined index: `history_len` historical
/// dates followed by `future_len` business days.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub(super) dates: Vec<NaiveDate>,
    pub(super) historical: Vec<f64>,
    pub(super) mean: Vec<f64>,
    pub(super) median: Vec<f64>,
    pub(super) lower_band: Vec<f64>,
    pub(super) upper_band: Vec<f64>,
    pub(super) daily_volatility: f64,
    pub(super) annualized_volatility: f64,
    pub(super) drift: f64,
    pub(super) time_step: f64,
    pub(super) horizon_years: u32,
    pub(super) seed: u64,
    pub(super) ensemble: PathEnsemble,
}

impl Projection {
    /// Combined date index.
    #[must_use]
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Historical closes the run was based on.
    #[must_use]
    pub fn historical(&self) -> &[f64] {
        &self.historical
    }

    /// Cross-path mean per step.
    #[must_use]
    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    /// Cross-path median per step.
    #[must_use]
    pub fn median(&self) -> &[f64] {
        &self.median
    }

    /// 5th percentile per step.
    #[must_use]
    pub fn lower_band(&self) -> &[f64] {
        &self.lower_band
    }

    /// 95th percentile per step.
    #[must_use]
    pub fn upper_band(&self) -> &[f64] {
        &self.upper_band
    }

    /// Sample standard deviation of daily log returns.
    #[must_use]
    pub const fn daily_volatility(&self) -> f64 {
        self.daily_volatility
    }

    /// Daily volatility scaled to one trading year.
    #[must_use]
    pub const fn annualized_volatility(&self) -> f64 {
        self.annualized_volatility
    }

    /// Drift constant used.
    #[must_use]
    pub const fn drift(&self) -> f64 {
        self.drift
    }

    /// Normalized time step between consecutive indices.
    #[must_use]
    pub const fn time_step(&self) -> f64 {
        self.time_step
    }

    /// Requested horizon in years.
    #[must_use]
    pub const fn horizon_years(&self) -> u32 {
        self.horizon_years
    }

    /// Seed that produced the ensemble.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of historical observations.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.historical.len()
    }

    /// Number of projected business days.
    #[must_use]
    pub fn future_len(&self) -> usize {
        self.dates.len() - self.historical.len()
    }

    /// Ensemble width.
    #[must_use]
    pub const fn paths(&self) -> usize {
        self.ensemble.width()
    }

    /// Full simulated grid.
    #[must_use]
    pub const fn ensemble(&self) -> &PathEnsemble {
        &self.ensemble
    }

    /// Mean at the last step.
    #[must_use]
    pub fn final_mean(&self) -> Option<f64> {
        self.mean.last().copied()
    }

    /// Median at the last step.
    #[must_use]
    pub fn final_median(&self) -> Option<f64> {
        self.median.last().copied()
    }

    /// Last historical close.
    #[must_use]
    pub fn last_close(&self) -> Option<f64> {
        self.historical.last().copied()
    }
}
