//! Get Projection Use Case

use std::sync::Arc;

use super::ProjectionError;
use crate::application::dto::{ProjectionDto, ProjectionRecordDto};
use crate::application::ports::ProjectionRepositoryPort;
use crate::domain::shared::{ProjectionId, Symbol};

/// Listing size when the caller gives none.
pub const DEFAULT_LIST_LIMIT: usize = 20;

/// Largest listing a caller may request.
pub const MAX_LIST_LIMIT: usize = 100;

/// Use case for reading stored projections.
pub struct GetProjectionUseCase<R>
where
    R: ProjectionRepositoryPort,
{
    repository: Arc<R>,
}

impl<R> GetProjectionUseCase<R>
where
    R: ProjectionRepositoryPort,
{
    /// Create a new `GetProjectionUseCase`.
    pub const fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Fetch one projection by ID.
    ///
    /// # Errors
    ///
    /// Returns `ProjectionError::NotFound` if no projection has that ID.
    pub async fn get(&self, id: &str) -> Result<ProjectionDto, ProjectionError> {
        self.repository
            .find_by_id(&ProjectionId::new(id))
            .await?
            .ok_or_else(|| ProjectionError::NotFound { id: id.to_string() })
    }

    /// List recent projections, newest first.
    ///
    /// `limit` defaults to 20 and is capped at 100.
    ///
    /// # Errors
    ///
    /// Returns `ProjectionError::InvalidSymbol` for a malformed filter or a
    /// repository error.
    pub async fn list(
        &self,
        symbol: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<ProjectionRecordDto>, ProjectionError> {
        let symbol = symbol
            .map(|s| {
                Symbol::parse(s).map_err(|e| ProjectionError::InvalidSymbol {
                    symbol: s.to_string(),
                    message: e.to_string(),
                })
            })
            .transpose()?;

        let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT);

        let projections = self
            .repository
            .list_recent(symbol.as_ref(), limit)
            .await?;

        Ok(projections.iter().map(ProjectionRecordDto::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dto::ProjectionSummaryDto;
    use crate::infrastructure::persistence::InMemoryProjectionRepository;
    use chrono::{Duration, TimeZone, Utc};

    fn dto(id: &str, symbol: &str, minutes: i64) -> ProjectionDto {
        ProjectionDto {
            id: id.to_string(),
            symbol: symbol.to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
                + Duration::minutes(minutes),
            dates: vec![],
            historical: vec![],
            mean: vec![],
            median: vec![],
            lower_band: vec![],
            upper_band: vec![],
            sample_paths: vec![],
            summary: ProjectionSummaryDto {
                history_len: 0,
                future_len: 0,
                horizon_years: 0,
                paths: 1,
                drift: 0.05,
                daily_volatility: 0.0,
                annualized_volatility: 0.0,
                time_step: 0.0,
                seed: 1,
                last_close: None,
                final_mean: None,
                final_median: None,
            },
        }
    }

    async fn seeded() -> GetProjectionUseCase<InMemoryProjectionRepository> {
        let repository = Arc::new(InMemoryProjectionRepository::new(10));
        repository.save(&dto("a", "AAPL", 0)).await.unwrap();
        repository.save(&dto("b", "MSFT", 1)).await.unwrap();
        repository.save(&dto("c", "AAPL", 2)).await.unwrap();
        GetProjectionUseCase::new(repository)
    }

    #[tokio::test]
    async fn get_existing_and_missing() {
        let use_case = seeded().await;
        assert_eq!(use_case.get("b").await.unwrap().symbol, "MSFT");

        let Err(err) = use_case.get("zzz").await else {
            panic!("expected NotFound");
        };
        assert_eq!(
            err,
            ProjectionError::NotFound {
                id: "zzz".to_string()
            }
        );
    }

    #[tokio::test]
    async fn list_filters_and_orders() {
        let use_case = seeded().await;

        let all = use_case.list(None, None).await.unwrap();
        let ids: Vec<_> = all.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);

        let aapl = use_case.list(Some("aapl"), None).await.unwrap();
        assert_eq!(aapl.len(), 2);
        assert!(aapl.iter().all(|r| r.symbol == "AAPL"));

        let one = use_case.list(None, Some(1)).await.unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].id, "c");
    }

    #[tokio::test]
    async fn list_rejects_bad_symbol() {
        let use_case = seeded().await;
        let Err(err) = use_case.list(Some("not a symbol"), None).await else {
            panic!("expected InvalidSymbol");
        };
        assert!(matches!(err, ProjectionError::InvalidSymbol { .. }));
    }
}
