//! Run Projection Use Case

use std::sync::Arc;
use std::time::Instant;

use chrono::{NaiveDate, Utc};

use super::ProjectionError;
use crate::application::dto::{ProjectionDto, ProjectionRequestDto};
use crate::application::ports::{MarketDataError, MarketDataPort, ProjectionRepositoryPort};
use crate::domain::market_data::{HistoricalSeries, PriceBar};
use crate::domain::projection::{
    DEFAULT_DRIFT, DEFAULT_PATHS, PricePathSimulator, SimulationLimits, SimulationParams,
    TRADING_DAYS_PER_YEAR,
};
use crate::domain::shared::{ProjectionId, Symbol};
use crate::observability::{record_market_data_request, record_projection};

/// Service-wide simulation defaults and limits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionSettings {
    /// Ensemble width when the request omits it.
    pub default_paths: usize,
    /// Drift when the request omits it.
    pub default_drift: f64,
    /// Trading days per year.
    pub trading_days_per_year: u32,
    /// Maximum raw trajectories returned per response.
    pub max_sample_paths: usize,
    /// Simulation size limits.
    pub limits: SimulationLimits,
}

impl Default for ProjectionSettings {
    fn default() -> Self {
        Self {
            default_paths: DEFAULT_PATHS,
            default_drift: DEFAULT_DRIFT,
            trading_days_per_year: TRADING_DAYS_PER_YEAR,
            max_sample_paths: 50,
            limits: SimulationLimits::default(),
        }
    }
}

/// Use case for running a Monte Carlo projection for one symbol.
pub struct RunProjectionUseCase<M, R>
where
    M: MarketDataPort,
    R: ProjectionRepositoryPort,
{
    market_data: Arc<M>,
    repository: Arc<R>,
    settings: ProjectionSettings,
}

impl<M, R> RunProjectionUseCase<M, R>
where
    M: MarketDataPort,
    R: ProjectionRepositoryPort,
{
    /// Create a new `RunProjectionUseCase`.
    pub const fn new(market_data: Arc<M>, repository: Arc<R>, settings: ProjectionSettings) -> Self {
        Self {
            market_data,
            repository,
            settings,
        }
    }

    /// Settings in use.
    pub const fn settings(&self) -> &ProjectionSettings {
        &self.settings
    }

    /// Execute the use case.
    ///
    /// # Errors
    ///
    /// Returns `ProjectionError::NoData` when the provider has no bars for the
    /// range, and the matching variant for validation, provider, or storage
    /// failures.
    pub async fn execute(
        &self,
        request: ProjectionRequestDto,
    ) -> Result<ProjectionDto, ProjectionError> {
        let started = Instant::now();
        let result = self.run(request).await;

        let (status, paths) = match &result {
            Ok(dto) => ("ok", dto.summary.paths),
            Err(ProjectionError::NoData { .. }) => ("no_data", 0),
            Err(_) => ("error", 0),
        };
        record_projection(status, started.elapsed().as_secs_f64(), paths);

        result
    }

    async fn run(&self, request: ProjectionRequestDto) -> Result<ProjectionDto, ProjectionError> {
        // 1. Validate
        let symbol =
            Symbol::parse(&request.symbol).map_err(|e| ProjectionError::InvalidSymbol {
                symbol: request.symbol.clone(),
                message: e.to_string(),
            })?;

        if request.start_date >= request.end_date {
            return Err(ProjectionError::InvalidRequest {
                message: format!(
                    "start_date {} must be before end_date {}",
                    request.start_date, request.end_date
                ),
            });
        }

        if request.include_paths > self.settings.max_sample_paths {
            return Err(ProjectionError::InvalidParameters {
                field: "include_paths".to_string(),
                message: format!(
                    "{} exceeds maximum of {}",
                    request.include_paths, self.settings.max_sample_paths
                ),
            });
        }

        let params = self.params_for(&request);
        let simulator = PricePathSimulator::new(params, self.settings.limits)?;
        // Any non-empty history has at least one point
        simulator.check_grid(1)?;

        tracing::info!(
            symbol = %symbol,
            start_date = %request.start_date,
            end_date = %request.end_date,
            horizon_years = request.horizon_years,
            paths = simulator.params().paths,
            "Running projection"
        );

        // 2. Fetch history
        let bars = self
            .fetch_bars(&symbol, request.start_date, request.end_date)
            .await?;
        let series =
            HistoricalSeries::from_bars(&bars).map_err(|e| MarketDataError::InvalidResponse {
                message: e.to_string(),
            })?;

        // 3. Simulate off the async runtime
        let sim_started = Instant::now();
        let projection = tokio::task::spawn_blocking(move || simulator.simulate(&series))
            .await
            .map_err(|e| ProjectionError::Internal {
                message: format!("simulation task failed: {e}"),
            })??;

        // 4. No history is reported, not simulated
        let Some(projection) = projection else {
            tracing::info!(symbol = %symbol, "No historical data for projection");
            return Err(ProjectionError::NoData {
                symbol: symbol.to_string(),
            });
        };

        // 5. Store and return
        let dto = ProjectionDto::from_projection(
            ProjectionId::generate().to_string(),
            symbol.to_string(),
            Utc::now(),
            &projection,
            request.include_paths,
        );
        self.repository.save(&dto.without_sample_paths()).await?;

        tracing::info!(
            id = %dto.id,
            symbol = %symbol,
            history_len = dto.summary.history_len,
            future_len = dto.summary.future_len,
            paths = dto.summary.paths,
            annualized_volatility = dto.summary.annualized_volatility,
            elapsed_ms = u64::try_from(sim_started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Projection completed"
        );

        Ok(dto)
    }

    fn params_for(&self, request: &ProjectionRequestDto) -> SimulationParams {
        SimulationParams::builder()
            .horizon_years(request.horizon_years)
            .paths(request.paths.unwrap_or(self.settings.default_paths))
            .drift(request.drift.unwrap_or(self.settings.default_drift))
            .trading_days_per_year(self.settings.trading_days_per_year)
            .maybe_seed(request.seed)
            .build()
    }

    async fn fetch_bars(
        &self,
        symbol: &Symbol,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, ProjectionError> {
        let started = Instant::now();
        let result = self.market_data.get_daily_bars(symbol, start, end).await;

        let status = match &result {
            Ok(bars) if bars.is_empty() => "empty",
            Ok(_) => "ok",
            Err(_) => "error",
        };
        record_market_data_request(
            self.market_data.name(),
            status,
            started.elapsed().as_secs_f64(),
        );

        result.map_err(|e| {
            tracing::warn!(
                symbol = %symbol,
                source = self.market_data.name(),
                error = %e,
                "Market data request failed"
            );
            ProjectionError::from(e)
        })
    }
}
