#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! Quote Ingest - Event-Driven Market Data Store
//!
//! Ingests a stream of instrument lifecycle events and price-quote
//! events, keeps the two collections consistent, and serves
//! time-bounded queries used to reconstruct price history (and
//! candlesticks) per instrument.
//!
//! # Layers (inside → outside)
//!
//! - **Domain**: Core market data types with no I/O
//!   - `instrument`: ISIN value object and instrument metadata
//!   - `quote`: price observations
//!   - `event`: typed lifecycle and quote events
//!   - `candle`: OHLC folding over ordered quote sequences
//!
//! - **Application**: Use cases and port definitions
//!   - `ports`: store and publisher interfaces
//!   - `services`: event dispatcher, ingest pipeline, query service
//!
//! - **Infrastructure**: Adapters and external integrations
//!   - `codec`: JSON event envelope decoding
//!   - `persistence`: turso and in-memory store adapters
//!   - `broadcast`: channel-based fan-out to in-process subscribers
//!   - `http`: ingestion and query endpoints
//!   - `config`: settings and explicit dependency wiring
//!   - `telemetry`: tracing setup
//!
//! # Data Flow
//!
//! ```text
//! raw message ──► codec ──► dispatcher ──► instrument / quote stores
//!                               │
//!                               └──► broadcast hub ──► subscribers
//!
//! range query ──► query service ──► quote store ──► candles
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Module Declarations
// =============================================================================

/// Domain layer - Core market data types with no I/O.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Re-exports
// =============================================================================

// Domain types
pub use domain::candle::{Candle, CandleInterval, aggregate as aggregate_candles};
pub use domain::event::MarketEvent;
pub use domain::instrument::{Instrument, Isin};
pub use domain::quote::Quote;

// Ports
pub use application::ports::{
    InstrumentRepository, NoOpPublisher, QuoteRepository, StoreError, UpdatePublisher,
};

// Services
pub use application::services::{
    CascadeHalf, DispatchError, EventDispatcher, IngestError, IngestService, QueryError,
    QuoteQueryService,
};

// Codec (for transport integrations)
pub use infrastructure::codec::{EventCodec, ParseError};

// Persistence adapters
pub use infrastructure::persistence::{
    InMemoryInstrumentRepository, InMemoryQuoteRepository, TursoDatabase,
};

// Broadcast hub (for attaching subscribers and integration tests)
pub use infrastructure::broadcast::{
    BroadcastConfig, BroadcastHub, BroadcastStats, InstrumentRemovedBroadcast,
    QuoteStoredBroadcast,
};

// Configuration and wiring
pub use infrastructure::config::{BroadcastSettings, ConfigError, Container, ServiceConfig};

// HTTP surface
pub use infrastructure::http::{ApiState, create_router};
