//! Instrument persistence port.

use async_trait::async_trait;

use super::StoreError;
use crate::domain::instrument::{Instrument, Isin};

/// Keyed instrument store.
///
/// Implemented by persistence adapters in the infrastructure layer.
/// The cascade to the quote store is not this port's responsibility;
/// the dispatcher owns cross-entity transitions.
#[async_trait]
pub trait InstrumentRepository: Send + Sync {
    /// Insert the instrument, or replace its description in place if
    /// the ISIN is already present. Duplicate keys are absorbed by the
    /// upsert, never an error. Returns the resulting record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when persistence fails.
    async fn upsert(&self, isin: &Isin, description: &str) -> Result<Instrument, StoreError>;

    /// Remove the record if present; no-op when absent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the delete cannot be executed.
    async fn delete_by_isin(&self, isin: &Isin) -> Result<(), StoreError>;

    /// Look up a single instrument by its ISIN.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails.
    async fn find_by_isin(&self, isin: &Isin) -> Result<Option<Instrument>, StoreError>;

    /// Enumerate all instruments, in unspecified order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails.
    async fn find_all(&self) -> Result<Vec<Instrument>, StoreError>;
}
