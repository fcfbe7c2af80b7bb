//! In-memory store adapters.
//!
//! Keeps records in process memory behind `parking_lot` locks. Used by
//! tests and ephemeral runs. Guards are never held across an await
//! point.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::application::ports::{InstrumentRepository, QuoteRepository, StoreError};
use crate::domain::instrument::{Instrument, Isin};
use crate::domain::quote::Quote;

/// In-memory implementation of [`InstrumentRepository`].
#[derive(Debug, Default)]
pub struct InMemoryInstrumentRepository {
    records: RwLock<HashMap<String, Instrument>>,
}

impl InMemoryInstrumentRepository {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored instruments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Check whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl InstrumentRepository for InMemoryInstrumentRepository {
    async fn upsert(&self, isin: &Isin, description: &str) -> Result<Instrument, StoreError> {
        let instrument = Instrument::new(isin.clone(), description);
        self.records
            .write()
            .insert(isin.as_str().to_owned(), instrument.clone());
        Ok(instrument)
    }

    async fn delete_by_isin(&self, isin: &Isin) -> Result<(), StoreError> {
        self.records.write().remove(isin.as_str());
        Ok(())
    }

    async fn find_by_isin(&self, isin: &Isin) -> Result<Option<Instrument>, StoreError> {
        Ok(self.records.read().get(isin.as_str()).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Instrument>, StoreError> {
        Ok(self.records.read().values().cloned().collect())
    }
}

/// In-memory implementation of [`QuoteRepository`].
///
/// An append-only vector; range queries filter and sort on read.
#[derive(Debug, Default)]
pub struct InMemoryQuoteRepository {
    records: RwLock<Vec<Quote>>,
}

impl InMemoryQuoteRepository {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored quotes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Check whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Preload quotes (for test setup).
    pub fn seed(&self, quotes: Vec<Quote>) {
        self.records.write().extend(quotes);
    }
}

#[async_trait]
impl QuoteRepository for InMemoryQuoteRepository {
    async fn save(&self, quote: &Quote) -> Result<(), StoreError> {
        self.records.write().push(quote.clone());
        Ok(())
    }

    async fn save_all(&self, quotes: &[Quote]) -> Result<(), StoreError> {
        self.records.write().extend_from_slice(quotes);
        Ok(())
    }

    async fn delete_all_by_isin(&self, isin: &Isin) -> Result<(), StoreError> {
        self.records.write().retain(|quote| &quote.isin != isin);
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Quote>, StoreError> {
        Ok(self.records.read().clone())
    }

    async fn find_all_by_isin(&self, isin: &Isin) -> Result<Vec<Quote>, StoreError> {
        Ok(self
            .records
            .read()
            .iter()
            .filter(|quote| &quote.isin == isin)
            .cloned()
            .collect())
    }

    async fn find_all_by_isin_and_timestamp_between(
        &self,
        isin: &Isin,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Quote>, StoreError> {
        let mut matching: Vec<Quote> = self
            .records
            .read()
            .iter()
            .filter(|quote| {
                &quote.isin == isin && quote.timestamp >= start && quote.timestamp <= end
            })
            .cloned()
            .collect();
        matching.sort_by_key(|quote| quote.timestamp);
        Ok(matching)
    }
}
