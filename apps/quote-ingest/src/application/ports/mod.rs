//! Port Interfaces
//!
//! Contracts between the application core and infrastructure adapters.
//!
//! ## Driven Ports (Outbound)
//!
//! - [`InstrumentRepository`]: keyed instrument persistence
//! - [`QuoteRepository`]: append-mostly quote persistence with range
//!   scans
//! - [`UpdatePublisher`]: best-effort fan-out of derived updates
//!
//! Store implementations hold no business rules beyond key-based
//! indexing and range scans; cross-entity transitions belong to the
//! dispatcher.

mod instrument_repository;
mod quote_repository;
mod update_publisher;

pub use instrument_repository::InstrumentRepository;
pub use quote_repository::QuoteRepository;
pub use update_publisher::{NoOpPublisher, UpdatePublisher};

use thiserror::Error;

/// Persistence failure surfaced by a store adapter.
///
/// Store failures are propagated to the dispatcher's caller unmodified
/// in kind and never retried internally; retry policy belongs to the
/// surrounding transport.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying storage engine failed (I/O, connectivity).
    #[error("storage engine error: {message}")]
    Engine {
        /// Engine-reported failure description.
        message: String,
    },

    /// A stored record could not be decoded back into a domain type.
    #[error("corrupt record: {message}")]
    Corrupt {
        /// What failed to decode.
        message: String,
    },
}

impl StoreError {
    /// Engine-level failure.
    #[must_use]
    pub fn engine(message: impl Into<String>) -> Self {
        Self::Engine {
            message: message.into(),
        }
    }

    /// Undecodable stored record.
    #[must_use]
    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::Corrupt {
            message: message.into(),
        }
    }
}
