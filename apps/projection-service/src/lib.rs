// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::needless_collect,
        clippy::items_after_statements,
        clippy::cast_possible_truncation
    )
)]

//! Projection Service - Monte Carlo price projections
//!
//! Projects forward price paths for a ticker from its daily close history.
//!
//! # Architecture (Clean Architecture + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Core logic with no I/O
//!   - `market_data`: Daily bars, validated close series, log returns
//!   - `projection`: Simulator, business-day calendar, per-step statistics
//!
//! - **Application**: Use cases and orchestration
//!   - `ports`: `MarketDataPort`, `ProjectionRepositoryPort`
//!   - `use_cases`: `RunProjection`, `GetProjection`
//!   - `dto`: Request/response shapes
//!
//! - **Infrastructure**: Adapters
//!   - `marketdata`: Alpaca data API, in-memory/demo source
//!   - `persistence`: Bounded in-memory record store
//!   - `http`: Axum REST API
//!
//! The simulator reports an empty history as `None`; the use case turns that
//! into a `NO_DATA` error at the HTTP boundary.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Core business logic with no external dependencies.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Cross-cutting
// =============================================================================

/// Configuration loading and validation.
pub mod config;

/// Service errors at the HTTP boundary.
pub mod error;

/// Logging and metrics.
pub mod observability;

// =============================================================================
// Re-exports
// =============================================================================

pub use domain::market_data::{HistoricalPoint, HistoricalSeries, PriceBar};
pub use domain::projection::{PathEnsemble, PricePathSimulator, Projection, SimulationParams};
pub use domain::shared::{DomainError, ProjectionId, Symbol};

pub use application::dto::{ProjectionDto, ProjectionRequestDto, ProjectionSummaryDto};
pub use application::ports::{MarketDataPort, ProjectionRepositoryPort};
pub use application::use_cases::{
    GetProjectionUseCase, ProjectionError, ProjectionSettings, RunProjectionUseCase,
};

pub use error::{ErrorCode, ServiceError};
pub use infrastructure::http::{AppState, create_router};
pub use infrastructure::marketdata::{AlpacaMarketDataAdapter, InMemoryMarketData};
pub use infrastructure::persistence::InMemoryProjectionRepository;
