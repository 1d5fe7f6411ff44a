//! Projection DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::projection::Projection;

/// Request to run a projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRequestDto {
    /// Ticker symbol.
    pub symbol: String,
    /// First day of history to fetch.
    pub start_date: NaiveDate,
    /// Last day of history to fetch.
    pub end_date: NaiveDate,
    /// Forward horizon in trading years.
    pub horizon_years: u32,
    /// Ensemble width (service default when absent).
    #[serde(default)]
    pub paths: Option<usize>,
    /// Drift constant (service default when absent).
    #[serde(default)]
    pub drift: Option<f64>,
    /// Seed for a reproducible run.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Number of raw trajectories to return for charting.
    #[serde(default)]
    pub include_paths: usize,
}

/// Scalar summary of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummaryDto {
    /// Historical observations used.
    pub history_len: usize,
    /// Projected business days.
    pub future_len: usize,
    /// Horizon in years.
    pub horizon_years: u32,
    /// Ensemble width.
    pub paths: usize,
    /// Drift constant.
    pub drift: f64,
    /// Standard deviation of daily log returns.
    pub daily_volatility: f64,
    /// Annualized volatility.
    pub annualized_volatility: f64,
    /// Normalized time step.
    pub time_step: f64,
    /// Seed that reproduces this run.
    pub seed: u64,
    /// Last historical close.
    pub last_close: Option<f64>,
    /// Mean at the final step.
    pub final_mean: Option<f64>,
    /// Median at the final step.
    pub final_median: Option<f64>,
}

impl ProjectionSummaryDto {
    /// Create from a domain projection.
    #[must_use]
    pub fn from_projection(projection: &Projection) -> Self {
        Self {
            history_len: projection.history_len(),
            future_len: projection.future_len(),
            horizon_years: projection.horizon_years(),
            paths: projection.paths(),
            drift: projection.drift(),
            daily_volatility: projection.daily_volatility(),
            annualized_volatility: projection.annualized_volatility(),
            time_step: projection.time_step(),
            seed: projection.seed(),
            last_close: projection.last_close(),
            final_mean: projection.final_mean(),
            final_median: projection.final_median(),
        }
    }
}

/// DTO representing a completed projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionDto {
    /// Projection ID.
    pub id: String,
    /// Symbol.
    pub symbol: String,
    /// Created at.
    pub created_at: DateTime<Utc>,
    /// Combined historical and future date index.
    pub dates: Vec<NaiveDate>,
    /// Historical closes.
    pub historical: Vec<f64>,
    /// Mean per step.
    pub mean: Vec<f64>,
    /// Median per step.
    pub median: Vec<f64>,
    /// 5th percentile per step.
    pub lower_band: Vec<f64>,
    /// 95th percentile per step.
    pub upper_band: Vec<f64>,
    /// First few simulated trajectories.
    pub sample_paths: Vec<Vec<f64>>,
    /// Summary.
    pub summary: ProjectionSummaryDto,
}

impl ProjectionDto {
    /// Create from a domain projection, keeping up to `sample_paths`
    /// trajectories.
    #[must_use]
    pub fn from_projection(
        id: String,
        symbol: String,
        created_at: DateTime<Utc>,
        projection: &Projection,
        sample_paths: usize,
    ) -> Self {
        Self {
            id,
            symbol,
            created_at,
            dates: projection.dates().to_vec(),
            historical: projection.historical().to_vec(),
            mean: projection.mean().to_vec(),
            median: projection.median().to_vec(),
            lower_band: projection.lower_band().to_vec(),
            upper_band: projection.upper_band().to_vec(),
            sample_paths: projection
                .ensemble()
                .paths()
                .take(sample_paths)
                .map(<[f64]>::to_vec)
                .collect(),
            summary: ProjectionSummaryDto::from_projection(projection),
        }
    }

    /// Copy without the raw trajectories. Stored records keep only the
    /// per-step series and the summary.
    #[must_use]
    pub fn without_sample_paths(&self) -> Self {
        Self {
            id: self.id.clone(),
            symbol: self.symbol.clone(),
            created_at: self.created_at,
            dates: self.dates.clone(),
            historical: self.historical.clone(),
            mean: self.mean.clone(),
            median: self.median.clone(),
            lower_band: self.lower_band.clone(),
            upper_band: self.upper_band.clone(),
            sample_paths: Vec::new(),
            summary: self.summary.clone(),
        }
    }
}

/// Listing entry for a stored projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRecordDto {
    /// Projection ID.
    pub id: String,
    /// Symbol.
    pub symbol: String,
    /// Created at.
    pub created_at: DateTime<Utc>,
    /// Summary.
    pub summary: ProjectionSummaryDto,
}

impl From<&ProjectionDto> for ProjectionRecordDto {
    fn from(dto: &ProjectionDto) -> Self {
        Self {
            id: dto.id.clone(),
            symbol: dto.symbol.clone(),
            created_at: dto.created_at,
            summary: dto.summary.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_optional_fields_default() {
        let json = r#"{
            "symbol": "AAPL",
            "start_date": "2023-01-01",
            "end_date": "2024-01-01",
            "horizon_years": 2
        }"#;
        let request: ProjectionRequestDto = serde_json::from_str(json).unwrap();
        assert_eq!(request.symbol, "AAPL");
        assert_eq!(request.horizon_years, 2);
        assert_eq!(request.paths, None);
        assert_eq!(request.drift, None);
        assert_eq!(request.seed, None);
        assert_eq!(request.include_paths, 0);
    }

    #[test]
    fn request_rejects_bad_date() {
        let json = r#"{
            "symbol": "AAPL",
            "start_date": "2023-13-01",
            "end_date": "2024-01-01",
            "horizon_years": 1
        }"#;
        assert!(serde_json::from_str::<ProjectionRequestDto>(json).is_err());
    }
}
