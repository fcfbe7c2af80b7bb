//! Explicit construction of the application graph.
//!
//! Builds stores, dispatcher, publisher, ingest pipeline, and query
//! service, and wires them together. No ambient or static access:
//! every component receives its collaborators at construction, which
//! also lets tests substitute in-memory stores.

use std::sync::Arc;

use crate::application::ports::{InstrumentRepository, QuoteRepository, StoreError, UpdatePublisher};
use crate::application::services::{EventDispatcher, IngestService, QuoteQueryService};
use crate::infrastructure::broadcast::{BroadcastConfig, BroadcastHub};
use crate::infrastructure::persistence::in_memory::{
    InMemoryInstrumentRepository, InMemoryQuoteRepository,
};
use crate::infrastructure::persistence::turso::TursoDatabase;

use super::settings::ServiceConfig;

/// The wired application graph.
pub struct Container {
    ingest: Arc<IngestService>,
    dispatcher: Arc<EventDispatcher>,
    query: Arc<QuoteQueryService>,
    hub: Arc<BroadcastHub>,
}

impl Container {
    /// Build the graph over a durable turso database.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the database cannot be opened or its
    /// schema cannot be applied.
    pub async fn build(config: &ServiceConfig) -> Result<Self, StoreError> {
        let database = TursoDatabase::open(&config.database_path).await?;
        let instruments: Arc<dyn InstrumentRepository> = Arc::new(database.instruments());
        let quotes: Arc<dyn QuoteRepository> = Arc::new(database.quotes());
        Ok(Self::assemble(
            instruments,
            quotes,
            BroadcastConfig::from(config.broadcast),
        ))
    }

    /// Build the graph over in-memory stores (tests, ephemeral runs).
    #[must_use]
    pub fn build_in_memory() -> Self {
        Self::assemble(
            Arc::new(InMemoryInstrumentRepository::new()),
            Arc::new(InMemoryQuoteRepository::new()),
            BroadcastConfig::default(),
        )
    }

    fn assemble(
        instruments: Arc<dyn InstrumentRepository>,
        quotes: Arc<dyn QuoteRepository>,
        broadcast: BroadcastConfig,
    ) -> Self {
        let hub = Arc::new(BroadcastHub::new(broadcast));
        let publisher: Arc<dyn UpdatePublisher> = hub.clone();
        let dispatcher = Arc::new(EventDispatcher::new(
            instruments,
            Arc::clone(&quotes),
            publisher,
        ));
        let ingest = Arc::new(IngestService::new(Arc::clone(&dispatcher)));
        let query = Arc::new(QuoteQueryService::new(quotes));

        Self {
            ingest,
            dispatcher,
            query,
            hub,
        }
    }

    /// Ingest pipeline handle (raw-message entry point).
    #[must_use]
    pub fn ingest(&self) -> Arc<IngestService> {
        Arc::clone(&self.ingest)
    }

    /// Dispatcher handle (typed-event entry point).
    #[must_use]
    pub fn dispatcher(&self) -> Arc<EventDispatcher> {
        Arc::clone(&self.dispatcher)
    }

    /// Query service handle.
    #[must_use]
    pub fn query(&self) -> Arc<QuoteQueryService> {
        Arc::clone(&self.query)
    }

    /// Broadcast hub for attaching subscribers.
    #[must_use]
    pub fn hub(&self) -> Arc<BroadcastHub> {
        Arc::clone(&self.hub)
    }
}
