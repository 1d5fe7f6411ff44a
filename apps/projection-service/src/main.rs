//! Projection Service Binary
//!
//! Serves Monte Carlo price projections over HTTP.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin projection-service
//! ```
//!
//! # Environment Variables
//!
//! - `PROJECTION_CONFIG`: Config file path (default: config.yaml)
//! - `MARKET_DATA_SOURCE`: alpaca | demo (read by the bundled config.yaml)
//! - `ALPACA_KEY` / `ALPACA_SECRET`: Data API credentials for the alpaca source
//! - `RUST_LOG`: Log filter, overrides `observability.logging.level`

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use projection_service::application::ports::{MarketDataPort, ProjectionRepositoryPort};
use projection_service::application::use_cases::{
    GetProjectionUseCase, ProjectionSettings, RunProjectionUseCase,
};
use projection_service::config::{Config, MarketDataSource, load_config};
use projection_service::infrastructure::http::{AppState, create_router};
use projection_service::infrastructure::marketdata::{
    AlpacaMarketDataAdapter, InMemoryMarketData,
};
use projection_service::infrastructure::persistence::InMemoryProjectionRepository;
use projection_service::observability::{MetricsConfig, init_logging, init_metrics};
use tokio::net::TcpListener;
use tokio::signal;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    load_dotenv();

    let config = load_config(None)?;
    init_logging(&config.observability.logging)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting projection service");
    log_config(&config);

    if config.observability.metrics.enabled {
        let addr: SocketAddr = config.observability.metrics.listen_addr.parse()?;
        init_metrics(&MetricsConfig::with_addr(addr))?;
    }

    match config.market_data.source {
        MarketDataSource::Alpaca => {
            let adapter =
                AlpacaMarketDataAdapter::new(&config.market_data.alpaca.to_adapter_config())?;
            tracing::info!(
                feed = %config.market_data.alpaca.feed,
                "AlpacaMarketDataAdapter initialized"
            );
            serve(&config, Arc::new(adapter)).await?;
        }
        MarketDataSource::Demo => {
            let source = InMemoryMarketData::demo(Utc::now().date_naive());
            tracing::info!(
                symbols = ?source.symbols().iter().map(|s| s.to_string()).collect::<Vec<_>>(),
                "Demo market data initialized"
            );
            serve(&config, Arc::new(source)).await?;
        }
    }

    tracing::info!("Projection service stopped");
    Ok(())
}

/// Log the loaded configuration.
fn log_config(config: &Config) {
    tracing::info!(
        http_addr = %config.server.http_addr(),
        market_data = config.market_data.source.as_str(),
        default_paths = config.simulation.default_paths,
        max_paths = config.simulation.max_paths,
        max_horizon_years = config.simulation.max_horizon_years,
        max_records = config.persistence.max_records,
        metrics_enabled = config.observability.metrics.enabled,
        "Configuration loaded"
    );
}

/// Wire use cases around `market_data` and run the HTTP server until shutdown.
async fn serve<M>(config: &Config, market_data: Arc<M>) -> Result<(), Box<dyn std::error::Error>>
where
    M: MarketDataPort + 'static,
{
    let repository = Arc::new(InMemoryProjectionRepository::new(
        config.persistence.max_records,
    ));
    let source_name = market_data.name().to_string();

    let state = create_state(
        market_data,
        repository,
        config.simulation.to_settings(),
        source_name,
    );
    let app = create_router(state);

    let http_addr: SocketAddr = config.server.http_addr().parse()?;
    tracing::info!(%http_addr, "HTTP server starting");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health");
    tracing::info!("  POST /api/v1/projections");
    tracing::info!("  GET  /api/v1/projections");
    tracing::info!("  GET  /api/v1/projections/{{id}}");

    let listener = TcpListener::bind(http_addr).await?;
    let shutdown_token = CancellationToken::new();
    let server_shutdown = shutdown_token.clone().cancelled_owned();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(server_shutdown)
            .await
    });

    tracing::info!("Projection service ready");

    let timeout = Duration::from_secs(config.server.shutdown_timeout_secs);
    tokio::select! {
        result = &mut server => {
            tracing::warn!("HTTP server exited before a shutdown signal");
            result??;
        }
        () = shutdown_signal(shutdown_token, timeout) => {
            match tokio::time::timeout(timeout, server).await {
                Ok(result) => result??,
                Err(_) => tracing::warn!(
                    timeout_secs = timeout.as_secs(),
                    "Graceful shutdown timed out, dropping open connections"
                ),
            }
        }
    }

    Ok(())
}

fn create_state<M, R>(
    market_data: Arc<M>,
    repository: Arc<R>,
    settings: ProjectionSettings,
    source_name: String,
) -> AppState<M, R>
where
    M: MarketDataPort,
    R: ProjectionRepositoryPort,
{
    AppState {
        run_projection: Arc::new(RunProjectionUseCase::new(
            market_data,
            Arc::clone(&repository),
            settings,
        )),
        get_projection: Arc::new(GetProjectionUseCase::new(repository)),
        version: env!("CARGO_PKG_VERSION").to_string(),
        market_data: source_name,
    }
}

/// Load .env file from current or ancestor directories.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Wait for SIGTERM or SIGINT, then cancel `shutdown`.
///
/// # Panics
///
/// Panics if signal handlers cannot be installed. Without them the process
/// cannot shut down gracefully, so startup fails fast instead.
#[allow(clippy::expect_used)]
async fn shutdown_signal(shutdown: CancellationToken, timeout: Duration) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("signal handler installation is critical for graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation is critical for graceful shutdown")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }

    shutdown.cancel();

    tracing::info!(
        timeout_secs = timeout.as_secs(),
        "Graceful shutdown started"
    );
}
