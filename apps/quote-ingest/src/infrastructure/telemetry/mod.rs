//! Tracing Initialization
//!
//! Structured logging via `tracing` with an `EnvFilter`. The `RUST_LOG`
//! environment variable overrides the default filter.
//!
//! # Usage
//!
//! ```ignore
//! quote_ingest::infrastructure::telemetry::init();
//! tracing::info!("ready");
//! ```

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Default filter when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "quote_ingest=info,axum=warn";

/// Initialize the global tracing subscriber.
///
/// Safe to call more than once; only the first call installs the
/// subscriber.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
