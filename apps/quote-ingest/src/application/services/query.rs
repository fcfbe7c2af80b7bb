//! Time-Series Query Service
//!
//! Thin validation layer over the quote store's range query, plus the
//! candle folding consumed by presentation layers.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::application::ports::{QuoteRepository, StoreError};
use crate::domain::candle::{self, Candle, CandleInterval};
use crate::domain::instrument::Isin;
use crate::domain::quote::Quote;

/// Caller misuse of the query contract, surfaced synchronously.
#[derive(Debug, Error)]
pub enum QueryError {
    /// A required argument was missing or empty.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// What was wrong with the argument.
        message: String,
    },

    /// The range start lies after its end.
    #[error("invalid range: start {start} is after end {end}")]
    InvalidRange {
        /// Requested range start.
        start: DateTime<Utc>,
        /// Requested range end.
        end: DateTime<Utc>,
    },

    /// The underlying store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Range queries over stored quotes.
pub struct QuoteQueryService {
    quotes: Arc<dyn QuoteRepository>,
}

impl QuoteQueryService {
    /// Create a query service over the quote store.
    #[must_use]
    pub fn new(quotes: Arc<dyn QuoteRepository>) -> Self {
        Self { quotes }
    }

    /// Quotes for `isin` with `start <= timestamp <= end`, ascending
    /// by timestamp. An empty result is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidArgument`] for an empty ISIN,
    /// [`QueryError::InvalidRange`] when `start > end`, and
    /// [`QueryError::Store`] when the store fails.
    pub async fn quotes_between(
        &self,
        isin: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Quote>, QueryError> {
        let isin = validated_isin(isin)?;
        validate_range(start, end)?;
        Ok(self
            .quotes
            .find_all_by_isin_and_timestamp_between(&isin, start, end)
            .await?)
    }

    /// All quotes for `isin`, in unspecified order.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidArgument`] for an empty ISIN and
    /// [`QueryError::Store`] when the store fails.
    pub async fn quotes_for(&self, isin: &str) -> Result<Vec<Quote>, QueryError> {
        let isin = validated_isin(isin)?;
        Ok(self.quotes.find_all_by_isin(&isin).await?)
    }

    /// Candles folded from the quotes inside the range, ascending by
    /// open time. Buckets without quotes are omitted.
    ///
    /// # Errors
    ///
    /// Same failure surface as [`Self::quotes_between`].
    pub async fn candles_between(
        &self,
        isin: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        interval: CandleInterval,
    ) -> Result<Vec<Candle>, QueryError> {
        let quotes = self.quotes_between(isin, start, end).await?;
        Ok(candle::aggregate(&quotes, interval))
    }
}

fn validated_isin(isin: &str) -> Result<Isin, QueryError> {
    let isin = Isin::new(isin);
    if isin.is_empty() {
        return Err(QueryError::InvalidArgument {
            message: "isin must not be empty".to_owned(),
        });
    }
    Ok(isin)
}

fn validate_range(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), QueryError> {
    if start > end {
        return Err(QueryError::InvalidRange { start, end });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    use crate::infrastructure::persistence::in_memory::InMemoryQuoteRepository;

    fn service_with(quotes: Vec<Quote>) -> QuoteQueryService {
        let repo = InMemoryQuoteRepository::new();
        repo.seed(quotes);
        QuoteQueryService::new(Arc::new(repo))
    }

    #[tokio::test]
    async fn empty_isin_is_rejected() {
        let service = service_with(vec![]);
        let now = Utc::now();

        let error = service.quotes_between("  ", now, now).await.unwrap_err();
        assert!(matches!(error, QueryError::InvalidArgument { .. }));
    }

    #[tokio::test]
    async fn inverted_range_is_rejected() {
        let service = service_with(vec![]);
        let now = Utc::now();

        let error = service
            .quotes_between("AAA111111", now, now - Duration::minutes(1))
            .await
            .unwrap_err();
        assert!(matches!(error, QueryError::InvalidRange { .. }));
    }

    #[tokio::test]
    async fn point_range_is_valid() {
        let now = Utc::now();
        let service = service_with(vec![Quote::new(Isin::new("AAA111111"), dec!(1.5), now)]);

        let quotes = service.quotes_between("AAA111111", now, now).await.unwrap();
        assert_eq!(quotes.len(), 1);
    }

    #[tokio::test]
    async fn candles_fold_the_ordered_range() {
        let base = Utc::now() - Duration::minutes(10);
        let service = service_with(vec![
            Quote::new(Isin::new("AAA111111"), dec!(1), base),
            Quote::new(Isin::new("AAA111111"), dec!(3), base + Duration::seconds(10)),
            Quote::new(Isin::new("AAA111111"), dec!(2), base + Duration::seconds(20)),
        ]);

        let candles = service
            .candles_between(
                "AAA111111",
                base - Duration::minutes(1),
                base + Duration::minutes(1),
                CandleInterval::MINUTE,
            )
            .await
            .unwrap();

        let total: u64 = candles.iter().map(|candle| candle.quote_count).sum();
        assert_eq!(total, 3);
        assert!(candles.iter().all(|candle| candle.high >= candle.low));
    }
}
