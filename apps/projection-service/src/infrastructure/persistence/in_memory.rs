//! In-memory projection repository.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::application::dto::ProjectionDto;
use crate::application::ports::{ProjectionRepositoryPort, RepositoryError};
use crate::domain::shared::{ProjectionId, Symbol};

/// Bounded in-memory implementation of `ProjectionRepositoryPort`.
///
/// Keeps at most `max_records` projections; saving past the cap evicts the
/// oldest.
#[derive(Debug)]
pub struct InMemoryProjectionRepository {
    max_records: usize,
    inner: RwLock<Store>,
}

#[derive(Debug, Default)]
struct Store {
    /// Insertion order, oldest first.
    order: VecDeque<String>,
    records: HashMap<String, ProjectionDto>,
}

impl InMemoryProjectionRepository {
    /// Create an empty repository holding at most `max_records` (minimum 1).
    #[must_use]
    pub fn new(max_records: usize) -> Self {
        Self {
            max_records: max_records.max(1),
            inner: RwLock::new(Store::default()),
        }
    }

    /// Number of stored projections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().records.len()
    }

    /// Check if the repository is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().records.is_empty()
    }

    /// Capacity.
    #[must_use]
    pub const fn max_records(&self) -> usize {
        self.max_records
    }
}

#[async_trait]
impl ProjectionRepositoryPort for InMemoryProjectionRepository {
    async fn save(&self, projection: &ProjectionDto) -> Result<(), RepositoryError> {
        let mut store = self.inner.write();

        // Re-saving an id replaces the record in place.
        if store
            .records
            .insert(projection.id.clone(), projection.clone())
            .is_some()
        {
            return Ok(());
        }
        store.order.push_back(projection.id.clone());

        while store.order.len() > self.max_records {
            if let Some(evicted) = store.order.pop_front() {
                store.records.remove(&evicted);
                tracing::debug!(id = %evicted, "Evicted projection record");
            }
        }

        Ok(())
    }

    async fn find_by_id(&self, id: &ProjectionId) -> Result<Option<ProjectionDto>, RepositoryError> {
        Ok(self.inner.read().records.get(id.as_str()).cloned())
    }

    async fn list_recent(
        &self,
        symbol: Option<&Symbol>,
        limit: usize,
    ) -> Result<Vec<ProjectionDto>, RepositoryError> {
        let store = self.inner.read();
        Ok(store
            .order
            .iter()
            .rev()
            .filter_map(|id| store.records.get(id))
            .filter(|dto| symbol.is_none_or(|s| dto.symbol == s.as_str()))
            .take(limit)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dto::ProjectionSummaryDto;
    use chrono::Utc;

    fn record(id: &str, symbol: &str) -> ProjectionDto {
        ProjectionDto {
            id: id.to_string(),
            symbol: symbol.to_string(),
            created_at: Utc::now(),
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
                seed: 7,
                last_close: None,
                final_mean: None,
                final_median: None,
            },
        }
    }

    fn ids(records: &[ProjectionDto]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[tokio::test]
    async fn save_and_find() {
        let repo = InMemoryProjectionRepository::new(10);
        repo.save(&record("a", "AAPL")).await.unwrap();

        let found = repo.find_by_id(&ProjectionId::new("a")).await.unwrap();
        assert_eq!(found.map(|r| r.symbol), Some("AAPL".to_string()));
        assert!(
            repo.find_by_id(&ProjectionId::new("missing"))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn lists_newest_first_with_filter() {
        let repo = InMemoryProjectionRepository::new(10);
        repo.save(&record("a", "AAPL")).await.unwrap();
        repo.save(&record("b", "MSFT")).await.unwrap();
        repo.save(&record("c", "AAPL")).await.unwrap();

        let all = repo.list_recent(None, 10).await.unwrap();
        assert_eq!(ids(&all), vec!["c", "b", "a"]);

        let aapl = repo.list_recent(Some(&Symbol::new("AAPL")), 10).await.unwrap();
        assert_eq!(ids(&aapl), vec!["c", "a"]);

        let limited = repo.list_recent(None, 1).await.unwrap();
        assert_eq!(ids(&limited), vec!["c"]);
    }

    #[tokio::test]
    async fn evicts_oldest_beyond_capacity() {
        let repo = InMemoryProjectionRepository::new(2);
        for id in ["a", "b", "c"] {
            repo.save(&record(id, "SPY")).await.unwrap();
        }

        assert_eq!(repo.len(), 2);
        assert!(repo.find_by_id(&ProjectionId::new("a")).await.unwrap().is_none());
        assert_eq!(ids(&repo.list_recent(None, 10).await.unwrap()), vec!["c", "b"]);
    }

    #[tokio::test]
    async fn resave_replaces_without_growing() {
        let repo = InMemoryProjectionRepository::new(5);
        repo.save(&record("a", "SPY")).await.unwrap();
        repo.save(&record("a", "QQQ")).await.unwrap();

        assert_eq!(repo.len(), 1);
        let found = repo.find_by_id(&ProjectionId::new("a")).await.unwrap();
        assert_eq!(found.map(|r| r.symbol), Some("QQQ".to_string()));
    }
}
