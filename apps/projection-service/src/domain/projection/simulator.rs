//! Monte Carlo price-path simulator.
//!
//! Volatility comes from the sample standard deviation of daily log returns,
//! annualized by the square root of the trading year. Drift is a fixed
//! constant. Every path starts at the first historical close and is advanced
//! over the combined historical and future timeline, which is normalized to
//! span 2 time units:
//!
//! ```text
//! dt          = 2 / (N + F - 1)
//! next_value  = prev + prev * (drift * dt + vol * sqrt(dt) * z),  z ~ N(0, 1)
//! ```
//!
//! Steps within a path are sequential. Paths are independent and run in
//! parallel, each with its own RNG stream derived from the master seed, so a
//! fixed seed reproduces the same grid on any number of threads.
//!
//! Values are not floored at zero.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use rayon::prelude::*;
use tracing::debug;

use super::statistics::{self, StepSummary};
use super::{PathEnsemble, Projection, SimulationLimits, SimulationParams, calendar};
use crate::domain::market_data::HistoricalSeries;
use crate::domain::shared::DomainError;

/// Runs Monte Carlo simulations with fixed parameters.
#[derive(Debug, Clone)]
pub struct PricePathSimulator {
    params: SimulationParams,
    limits: SimulationLimits,
}

impl PricePathSimulator {
    /// Create a simulator.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if `params` violate `limits`.
    pub fn new(params: SimulationParams, limits: SimulationLimits) -> Result<Self, DomainError> {
        params.validate(&limits)?;
        Ok(Self { params, limits })
    }

    /// Parameters in use.
    #[must_use]
    pub const fn params(&self) -> &SimulationParams {
        &self.params
    }

    /// Check that `history_len` historical points plus the horizon fit the
    /// grid limit at the configured width.
    ///
    /// # Errors
    ///
    /// `DomainError::InvalidValue` on field `paths` when the grid is too large.
    pub fn check_grid(&self, history_len: usize) -> Result<(), DomainError> {
        let steps = history_len.saturating_add(self.params.future_len());
        let width = self.params.paths;
        let cells = steps.checked_mul(width).unwrap_or(usize::MAX);
        if cells > self.limits.max_grid_cells {
            return Err(DomainError::invalid_value(
                "paths",
                format!(
                    "{steps} steps x {width} paths exceeds the grid limit of {} cells",
                    self.limits.max_grid_cells
                ),
            ));
        }
        Ok(())
    }

    /// Simulate forward paths over `series`.
    ///
    /// Returns `Ok(None)` when the series is empty; nothing is computed in
    /// that case.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if the ensemble would exceed the grid limit, the
    /// calendar cannot supply enough future dates, or the paths overflow to
    /// non-finite values.
    pub fn simulate(&self, series: &HistoricalSeries) -> Result<Option<Projection>, DomainError> {
        let (Some(first_close), Some(last_date)) = (series.first_close(), series.last_date())
        else {
            return Ok(None);
        };

        let history_len = series.len();
        self.check_grid(history_len)?;
        let future_len = self.params.future_len();
        let steps = history_len + future_len;
        let width = self.params.paths;

        let returns = series.log_returns();
        let daily_volatility = statistics::sample_std_dev(&returns).unwrap_or(0.0);
        let annualized_volatility =
            daily_volatility * f64::from(self.params.trading_days_per_year).sqrt();

        let time_step = normalized_time_step(steps);

        let future_dates = calendar::next_business_days(last_date, future_len);
        if future_dates.len() != future_len {
            return Err(DomainError::invariant(
                "calendar_range",
                format!("only {} business days available after {last_date}", future_dates.len()),
            ));
        }
        let mut dates = Vec::with_capacity(steps);
        dates.extend_from_slice(series.dates());
        dates.extend(future_dates);

        let seed = self.params.seed.unwrap_or_else(rand::random);

        debug!(
            history_len,
            future_len,
            paths = width,
            daily_volatility,
            annualized_volatility,
            time_step,
            seed,
            "Simulating price paths"
        );

        let ensemble = simulate_paths(
            first_close,
            steps,
            width,
            self.params.drift,
            annualized_volatility,
            time_step,
            seed,
        )?;

        let summaries = summarize_steps(&ensemble)?;
        if let Some(step) = summaries.iter().position(|s| !s.is_finite()) {
            return Err(DomainError::invariant(
                "ensemble_finite",
                format!(
                    "paths overflow at step {step} with annualized volatility \
                     {annualized_volatility:.2}"
                ),
            ));
        }

        Ok(Some(Projection {
            dates,
            historical: series.closes().to_vec(),
            mean: summaries.iter().map(|s| s.mean).collect(),
            median: summaries.iter().map(|s| s.median).collect(),
            lower_band: summaries.iter().map(|s| s.lower).collect(),
            upper_band: summaries.iter().map(|s| s.upper).collect(),
            daily_volatility,
            annualized_volatility,
            drift: self.params.drift,
            time_step,
            horizon_years: self.params.horizon_years,
            seed,
            ensemble,
        }))
    }
}

/// `2 / (steps - 1)`, or 0 for a single-point timeline.
#[allow(clippy::cast_precision_loss)]
fn normalized_time_step(steps: usize) -> f64 {
    if steps > 1 {
        2.0 / (steps - 1) as f64
    } else {
        0.0
    }
}

fn simulate_paths(
    start: f64,
    steps: usize,
    width: usize,
    drift: f64,
    volatility: f64,
    time_step: f64,
    seed: u64,
) -> Result<PathEnsemble, DomainError> {
    let mut master = StdRng::seed_from_u64(seed);
    let path_seeds: Vec<u64> = (0..width).map(|_| master.random()).collect();

    let drift_term = drift * time_step;
    let diffusion = volatility * time_step.sqrt();

    let mut values = vec![0.0; steps * width];
    values
        .par_chunks_mut(steps)
        .zip(path_seeds.par_iter())
        .for_each(|(path, &path_seed)| {
            let mut rng = StdRng::seed_from_u64(path_seed);
            path[0] = start;
            for t in 1..steps {
                let z: f64 = rng.sample(StandardNormal);
                let prev = path[t - 1];
                path[t] = prev + prev * (drift_term + diffusion * z);
            }
        });

    PathEnsemble::from_path_major(steps, width, values)
}

fn summarize_steps(ensemble: &PathEnsemble) -> Result<Vec<StepSummary>, DomainError> {
    let width = ensemble.width();
    (0..ensemble.steps())
        .into_par_iter()
        .map_init(
            || Vec::with_capacity(width),
            |buf, step| {
                ensemble.copy_row_into(step, buf);
                statistics::summarize_row(buf)
            },
        )
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| DomainError::invariant("ensemble_width", "ensemble has no paths"))
}
