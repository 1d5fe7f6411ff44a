//! End-to-end tests of the projection API over the in-memory adapters.

#![allow(clippy::unwrap_used, clippy::float_cmp)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{Days, NaiveDate};
use projection_service::application::dto::ProjectionRecordDto;
use projection_service::error::HttpErrorResponse;
use projection_service::infrastructure::http::{HealthResponse, ListProjectionsResponse};
use projection_service::{
    AppState, GetProjectionUseCase, InMemoryMarketData, InMemoryProjectionRepository, PriceBar,
    ProjectionDto, ProjectionSettings, RunProjectionUseCase, Symbol, create_router,
};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use test_case::test_case;
use tower::ServiceExt;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Router over a source holding `[100, 101, 99, 102]` for `FOUR` (Mon 2024-01-01
/// onwards) plus the demo tickers.
fn app() -> Router {
    let source = InMemoryMarketData::demo(date(2024, 6, 28));
    let start = date(2024, 1, 1);
    source.insert(
        &Symbol::new("FOUR"),
        [100, 101, 99, 102]
            .iter()
            .zip(0_u64..)
            .map(|(close, i)| PriceBar::from_close(start + Days::new(i), Decimal::new(*close, 0)))
            .collect(),
    );

    let repository = Arc::new(InMemoryProjectionRepository::new(100));
    create_router(AppState {
        run_projection: Arc::new(RunProjectionUseCase::new(
            Arc::new(source),
            Arc::clone(&repository),
            ProjectionSettings::default(),
        )),
        get_projection: Arc::new(GetProjectionUseCase::new(repository)),
        version: "test".to_string(),
        market_data: "in_memory".to_string(),
    })
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> T {
    serde_json::from_slice(body).unwrap()
}

fn post(body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/projections")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[test_case(1; "single path")]
#[test_case(2; "two paths")]
#[test_case(7; "seven paths")]
#[test_case(1000; "default width")]
#[tokio::test]
async fn zero_horizon_keeps_history_index(paths: usize) {
    let app = app();
    let (status, body) = send(
        &app,
        post(&serde_json::json!({
            "symbol": "FOUR",
            "start_date": "2024-01-01",
            "end_date": "2024-01-31",
            "horizon_years": 0,
            "paths": paths,
            "seed": 3
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let dto: ProjectionDto = decode(&body);
    assert_eq!(dto.summary.future_len, 0);
    assert_eq!(dto.dates.len(), 4);
    assert_eq!(dto.mean.len(), 4);
    assert_eq!(dto.median.len(), 4);
    assert_eq!(dto.mean[0], 100.0);
    assert_eq!(dto.median[0], 100.0);
    assert_eq!(dto.historical, vec![100.0, 101.0, 99.0, 102.0]);
}

#[tokio::test]
async fn demo_history_projects_one_year_of_business_days() {
    let app = app();
    let (status, body) = send(
        &app,
        post(&serde_json::json!({
            "symbol": "spy",
            "start_date": "2023-01-01",
            "end_date": "2023-12-31",
            "horizon_years": 1,
            "paths": 200,
            "seed": 11,
            "include_paths": 3
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let dto: ProjectionDto = decode(&body);
    let history = dto.summary.history_len;
    assert_eq!(history, 260);
    assert_eq!(dto.summary.future_len, 252);
    assert_eq!(dto.dates.len(), history + 252);
    assert!(dto.dates.windows(2).all(|w| w[0] < w[1]));

    let first_close = dto.historical[0];
    assert_eq!(dto.sample_paths.len(), 3);
    assert!(dto.sample_paths.iter().all(|p| p.len() == history + 252));
    assert!(dto.sample_paths.iter().all(|p| p[0] == first_close));
    assert!((dto.mean[0] - first_close).abs() < 1e-9);
    assert_eq!(dto.median[0], first_close);

    assert!(dto.summary.daily_volatility > 0.0);
    assert!(
        (dto.summary.annualized_volatility - dto.summary.daily_volatility * 252.0_f64.sqrt())
            .abs()
            < 1e-12
    );
    let expected_step = 2.0 / (history + 252 - 1) as f64;
    assert!((dto.summary.time_step - expected_step).abs() < 1e-15);
}

#[tokio::test]
async fn same_seed_reproduces_series() {
    let app = app();
    let body = serde_json::json!({
        "symbol": "MSFT",
        "start_date": "2022-01-01",
        "end_date": "2022-12-31",
        "horizon_years": 1,
        "paths": 50,
        "seed": 2024
    });

    let (_, first) = send(&app, post(&body)).await;
    let (_, second) = send(&app, post(&body)).await;
    let first: ProjectionDto = decode(&first);
    let second: ProjectionDto = decode(&second);

    assert_ne!(first.id, second.id);
    assert_eq!(first.mean, second.mean);
    assert_eq!(first.median, second.median);
    assert_eq!(first.upper_band, second.upper_band);
}

#[tokio::test]
async fn empty_range_reports_no_data() {
    let app = app();
    let (status, body) = send(
        &app,
        post(&serde_json::json!({
            "symbol": "AAPL",
            "start_date": "2019-01-01",
            "end_date": "2019-06-30",
            "horizon_years": 1
        })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let error: HttpErrorResponse = decode(&body);
    assert_eq!(error.code, "NO_DATA");
    assert_eq!(error.details.get("symbol").map(String::as_str), Some("AAPL"));

    let (_, body) = send(&app, get("/api/v1/projections")).await;
    let listing: ListProjectionsResponse = decode(&body);
    assert_eq!(listing.count, 0);
}

#[tokio::test]
async fn stored_runs_are_listed_newest_first() {
    let app = app();
    for symbol in ["AAPL", "MSFT", "AAPL"] {
        let (status, _) = send(
            &app,
            post(&serde_json::json!({
                "symbol": symbol,
                "start_date": "2023-06-01",
                "end_date": "2023-12-31",
                "horizon_years": 0,
                "paths": 10
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, get("/api/v1/projections?symbol=AAPL")).await;
    assert_eq!(status, StatusCode::OK);
    let listing: ListProjectionsResponse = decode(&body);
    assert_eq!(listing.count, 2);
    assert!(listing.projections.iter().all(|r| r.symbol == "AAPL"));
    assert!(listing.projections[0].created_at >= listing.projections[1].created_at);

    let newest: &ProjectionRecordDto = &listing.projections[0];
    let (status, body) = send(&app, get(&format!("/api/v1/projections/{}", newest.id))).await;
    assert_eq!(status, StatusCode::OK);
    let dto: ProjectionDto = decode(&body);
    assert_eq!(dto.id, newest.id);
}

#[tokio::test]
async fn horizon_over_limit_is_rejected() {
    let app = app();
    let (status, body) = send(
        &app,
        post(&serde_json::json!({
            "symbol": "AAPL",
            "start_date": "2023-01-01",
            "end_date": "2023-12-31",
            "horizon_years": 50
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: HttpErrorResponse = decode(&body);
    assert_eq!(error.code, "INVALID_PARAMETERS");
}

#[tokio::test]
async fn health_reports_source() {
    let (status, body) = send(&app(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    let health: HealthResponse = decode(&body);
    assert_eq!(health.status, "healthy");
    assert_eq!(health.market_data, "in_memory");
}
