//! Quote Ingest Binary
//!
//! Starts the event ingestion and time-series query service.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin quote-ingest
//! ```
//!
//! # Environment Variables
//!
//! ## Optional
//! - `QUOTE_INGEST_HTTP_PORT`: HTTP API port (default: 8080)
//! - `QUOTE_INGEST_DB_PATH`: turso database path (default: quote-ingest.db)
//! - `QUOTE_INGEST_QUOTES_CAPACITY`: stored-quote channel capacity (default: 10000)
//! - `QUOTE_INGEST_LIFECYCLE_CAPACITY`: lifecycle channel capacity (default: 1000)
//! - `RUST_LOG`: Log level (default: info)

use std::net::SocketAddr;

use tokio_util::sync::CancellationToken;

use quote_ingest::infrastructure::telemetry;
use quote_ingest::{ApiState, Container, ServiceConfig, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();
    telemetry::init();

    tracing::info!("Starting Quote Ingest");

    let config = ServiceConfig::from_env()?;
    log_config(&config);

    let container = Container::build(&config).await?;
    let state = ApiState::new(container.ingest(), container.query());
    let router = create_router(state);

    let shutdown_token = CancellationToken::new();
    spawn_signal_watcher(shutdown_token.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "HTTP server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_token.cancelled_owned())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Load a `.env` file when present. Missing files are fine; anything
/// else is worth a warning before telemetry is up.
fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => eprintln!("Loaded environment from {}", path.display()),
        Err(error) if error.not_found() => {}
        Err(error) => eprintln!("Failed to load .env file: {error}"),
    }
}

/// Cancel the shutdown token on Ctrl-C.
fn spawn_signal_watcher(token: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Shutdown signal received");
                token.cancel();
            }
            Err(error) => {
                tracing::error!(%error, "Failed to listen for shutdown signal");
            }
        }
    });
}

/// Log the effective configuration at startup.
fn log_config(config: &ServiceConfig) {
    tracing::info!(
        http_port = config.http_port,
        database_path = %config.database_path,
        quotes_capacity = config.broadcast.quotes_capacity,
        lifecycle_capacity = config.broadcast.lifecycle_capacity,
        "Configuration loaded"
    );
}
