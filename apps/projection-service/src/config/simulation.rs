//! Simulation defaults and limits.

use serde::{Deserialize, Serialize};

use crate::application::use_cases::ProjectionSettings;
use crate::domain::projection::{
    DEFAULT_DRIFT, DEFAULT_PATHS, SimulationLimits, TRADING_DAYS_PER_YEAR,
};

/// Simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Ensemble width when a request omits `paths`.
    #[serde(default = "default_paths")]
    pub default_paths: usize,
    /// Largest ensemble a request may ask for.
    #[serde(default = "default_max_paths")]
    pub max_paths: usize,
    /// Drift constant when a request omits `drift`.
    #[serde(default = "default_drift")]
    pub drift: f64,
    /// Trading days per year used for annualization and the horizon.
    #[serde(default = "default_trading_days_per_year")]
    pub trading_days_per_year: u32,
    /// Longest horizon a request may ask for.
    #[serde(default = "default_max_horizon_years")]
    pub max_horizon_years: u32,
    /// Most raw trajectories returned per response.
    #[serde(default = "default_max_sample_paths")]
    pub max_sample_paths: usize,
    /// Cap on `paths * (history + horizon)` values held per run.
    #[serde(default = "default_max_grid_cells")]
    pub max_grid_cells: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            default_paths: default_paths(),
            max_paths: default_max_paths(),
            drift: default_drift(),
            trading_days_per_year: default_trading_days_per_year(),
            max_horizon_years: default_max_horizon_years(),
            max_sample_paths: default_max_sample_paths(),
            max_grid_cells: default_max_grid_cells(),
        }
    }
}

impl SimulationConfig {
    /// Settings for `RunProjectionUseCase`.
    #[must_use]
    pub const fn to_settings(&self) -> ProjectionSettings {
        ProjectionSettings {
            default_paths: self.default_paths,
            default_drift: self.drift,
            trading_days_per_year: self.trading_days_per_year,
            max_sample_paths: self.max_sample_paths,
            limits: SimulationLimits {
                max_paths: self.max_paths,
                max_horizon_years: self.max_horizon_years,
                max_grid_cells: self.max_grid_cells,
            },
        }
    }
}

const fn default_paths() -> usize {
    DEFAULT_PATHS
}

const fn default_max_paths() -> usize {
    20_000
}

const fn default_drift() -> f64 {
    DEFAULT_DRIFT
}

const fn default_trading_days_per_year() -> u32 {
    TRADING_DAYS_PER_YEAR
}

const fn default_max_horizon_years() -> u32 {
    10
}

const fn default_max_sample_paths() -> usize {
    50
}

const fn default_max_grid_cells() -> usize {
    25_000_000
}
