//! HTTP Controller (Driver Adapter)
//!
//! Axum-based REST API that delegates to application use cases.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    routing::get,
};

use crate::application::dto::{ProjectionDto, ProjectionRequestDto};
use crate::application::ports::{MarketDataPort, ProjectionRepositoryPort};
use crate::application::use_cases::{GetProjectionUseCase, RunProjectionUseCase};
use crate::error::ServiceError;

use super::request::ListProjectionsQuery;
use super::response::{HealthResponse, ListProjectionsResponse};

/// Application state shared across handlers.
pub struct AppState<M, R>
where
    M: MarketDataPort,
    R: ProjectionRepositoryPort,
{
    /// Use case for running projections.
    pub run_projection: Arc<RunProjectionUseCase<M, R>>,
    /// Use case for reading stored projections.
    pub get_projection: Arc<GetProjectionUseCase<R>>,
    /// Application version.
    pub version: String,
    /// Name of the market data source.
    pub market_data: String,
}

impl<M, R> Clone for AppState<M, R>
where
    M: MarketDataPort,
    R: ProjectionRepositoryPort,
{
    fn clone(&self) -> Self {
        Self {
            run_projection: Arc::clone(&self.run_projection),
            get_projection: Arc::clone(&self.get_projection),
            version: self.version.clone(),
            market_data: self.market_data.clone(),
        }
    }
}

/// Create the HTTP router with all endpoints.
pub fn create_router<M, R>(state: AppState<M, R>) -> Router
where
    M: MarketDataPort + 'static,
    R: ProjectionRepositoryPort + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/api/v1/projections",
            get(list_projections).post(run_projection),
        )
        .route("/api/v1/projections/{id}", get(get_projection))
        .with_state(state)
}

/// Health check endpoint.
async fn health_check<M, R>(State(state): State<AppState<M, R>>) -> Json<HealthResponse>
where
    M: MarketDataPort,
    R: ProjectionRepositoryPort,
{
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        market_data: state.market_data.clone(),
    })
}

/// Run a projection and store it.
async fn run_projection<M, R>(
    State(state): State<AppState<M, R>>,
    payload: Result<Json<ProjectionRequestDto>, JsonRejection>,
) -> Result<(StatusCode, Json<ProjectionDto>), ServiceError>
where
    M: MarketDataPort,
    R: ProjectionRepositoryPort,
{
    let Json(request) = payload?;
    let dto = state.run_projection.execute(request).await?;
    Ok((StatusCode::CREATED, Json(dto)))
}

/// List recent projections.
async fn list_projections<M, R>(
    State(state): State<AppState<M, R>>,
    query: Result<Query<ListProjectionsQuery>, QueryRejection>,
) -> Result<Json<ListProjectionsResponse>, ServiceError>
where
    M: MarketDataPort,
    R: ProjectionRepositoryPort,
{
    let Query(query) = query.map_err(|e| ServiceError::invalid_request(e.body_text()))?;
    let projections = state
        .get_projection
        .list(query.symbol.as_deref(), query.limit)
        .await?;

    Ok(Json(ListProjectionsResponse {
        count: projections.len(),
        projections,
    }))
}

/// Fetch one stored projection.
async fn get_projection<M, R>(
    State(state): State<AppState<M, R>>,
    Path(id): Path<String>,
) -> Result<Json<ProjectionDto>, ServiceError>
where
    M: MarketDataPort,
    R: ProjectionRepositoryPort,
{
    Ok(Json(state.get_projection.get(&id).await?))
}
