//! Persistence Adapters
//!
//! Store implementations of the repository ports: a durable turso
//! database and an in-memory variant for tests and ephemeral runs.

pub mod in_memory;
pub mod turso;

pub use in_memory::{InMemoryInstrumentRepository, InMemoryQuoteRepository};
pub use turso::{TursoDatabase, TursoInstrumentRepository, TursoQuoteRepository};
