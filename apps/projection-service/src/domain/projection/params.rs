//! Simulation parameters and their operator-configured limits.

use serde::{Deserialize, Serialize};

use crate::domain::shared::DomainError;

/// Default ensemble width.
pub const DEFAULT_PATHS: usize = 1000;

/// Default drift constant.
pub const DEFAULT_DRIFT: f64 = 0.05;

/// Trading days in one year.
pub const TRADING_DAYS_PER_YEAR: u32 = 252;

/// Parameters of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationParams {
    /// Forward horizon in whole trading years.
    pub horizon_years: u32,
    /// Number of simulated paths.
    pub paths: usize,
    /// Constant drift per unit time.
    pub drift: f64,
    /// Trading days per year, used for the horizon and annualization.
    pub trading_days_per_year: u32,
    /// Seed for reproducibility (None = random).
    pub seed: Option<u64>,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            horizon_years: 1,
            paths: DEFAULT_PATHS,
            drift: DEFAULT_DRIFT,
            trading_days_per_year: TRADING_DAYS_PER_YEAR,
            seed: None,
        }
    }
}

impl SimulationParams {
    /// Start building parameters from the defaults.
    #[must_use]
    pub fn builder() -> SimulationParamsBuilder {
        SimulationParamsBuilder::default()
    }

    /// Number of future business days to simulate.
    #[must_use]
    pub const fn future_len(&self) -> usize {
        self.horizon_years as usize * self.trading_days_per_year as usize
    }

    /// Check the parameters against `limits`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidValue` naming the first offending field.
    pub fn validate(&self, limits: &SimulationLimits) -> Result<(), DomainError> {
        if self.paths == 0 {
            return Err(DomainError::invalid_value("paths", "must be at least 1"));
        }
        if self.paths > limits.max_paths {
            return Err(DomainError::invalid_value(
                "paths",
                format!("{} exceeds maximum of {}", self.paths, limits.max_paths),
            ));
        }
        if self.horizon_years > limits.max_horizon_years {
            return Err(DomainError::invalid_value(
                "horizon_years",
                format!(
                    "{} exceeds maximum of {}",
                    self.horizon_years, limits.max_horizon_years
                ),
            ));
        }
        if !self.drift.is_finite() {
            return Err(DomainError::invalid_value("drift", "must be a finite number"));
        }
        if self.trading_days_per_year == 0 {
            return Err(DomainError::invalid_value(
                "trading_days_per_year",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Upper bounds on simulation size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationLimits {
    /// Maximum ensemble width.
    pub max_paths: usize,
    /// Maximum horizon in years.
    pub max_horizon_years: u32,
    /// Maximum `steps x paths` cells in one ensemble.
    pub max_grid_cells: usize,
}

impl Default for SimulationLimits {
    fn default() -> Self {
        Self {
            max_paths: 20_000,
            max_horizon_years: 10,
            max_grid_cells: 25_000_000,
        }
    }
}

/// Builder for [`SimulationParams`].
#[derive(Debug, Default)]
pub struct SimulationParamsBuilder {
    params: SimulationParams,
}

impl SimulationParamsBuilder {
    /// Set the horizon in years.
    #[must_use]
    pub const fn horizon_years(mut self, years: u32) -> Self {
        self.params.horizon_years = years;
        self
    }

    /// Set the ensemble width.
    #[must_use]
    pub const fn paths(mut self, paths: usize) -> Self {
        self.params.paths = paths;
        self
    }

    /// Set the drift constant.
    #[must_use]
    pub const fn drift(mut self, drift: f64) -> Self {
        self.params.drift = drift;
        self
    }

    /// Set trading days per year.
    #[must_use]
    pub const fn trading_days_per_year(mut self, days: u32) -> Self {
        self.params.trading_days_per_year = days;
        self
    }

    /// Set random seed for reproducibility.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.params.seed = Some(seed);
        self
    }

    /// Set or clear the seed.
    #[must_use]
    pub const fn maybe_seed(mut self, seed: Option<u64>) -> Self {
        self.params.seed = seed;
        self
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> SimulationParams {
        self.params
    }
}
