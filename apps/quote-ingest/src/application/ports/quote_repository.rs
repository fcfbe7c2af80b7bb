//! Quote persistence port.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::StoreError;
use crate::domain::instrument::Isin;
use crate::domain::quote::Quote;

/// Append-mostly quote store, queryable by ISIN and time range.
#[async_trait]
pub trait QuoteRepository: Send + Sync {
    /// Append one quote. Never mutates an existing record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when persistence fails.
    async fn save(&self, quote: &Quote) -> Result<(), StoreError>;

    /// Append a batch of quotes.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when persistence fails.
    async fn save_all(&self, quotes: &[Quote]) -> Result<(), StoreError>;

    /// Remove every quote whose ISIN matches; no-op when none match.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the delete cannot be executed.
    async fn delete_all_by_isin(&self, isin: &Isin) -> Result<(), StoreError>;

    /// Enumerate all quotes, in unspecified order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails.
    async fn find_all(&self) -> Result<Vec<Quote>, StoreError>;

    /// All quotes for one ISIN, in unspecified order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails.
    async fn find_all_by_isin(&self, isin: &Isin) -> Result<Vec<Quote>, StoreError>;

    /// Quotes for one ISIN with `start <= timestamp <= end`, ordered
    /// ascending by timestamp. Both bounds inclusive; an empty result
    /// is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails.
    async fn find_all_by_isin_and_timestamp_between(
        &self,
        isin: &Isin,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Quote>, StoreError>;
}
