//! Store-level integration tests.
//!
//! Exercises the instrument and quote stores through the repository
//! ports, against both the in-memory adapter and a turso `:memory:`
//! database.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use quote_ingest::{
    InMemoryInstrumentRepository, InMemoryQuoteRepository, InstrumentRepository, Isin, Quote,
    QuoteRepository, TursoDatabase,
};

fn quote(isin: &str, price: Decimal, timestamp: DateTime<Utc>) -> Quote {
    Quote::new(Isin::new(isin), price, timestamp)
}

fn in_memory_stores() -> (Arc<dyn InstrumentRepository>, Arc<dyn QuoteRepository>) {
    (
        Arc::new(InMemoryInstrumentRepository::new()),
        Arc::new(InMemoryQuoteRepository::new()),
    )
}

async fn turso_stores() -> (Arc<dyn InstrumentRepository>, Arc<dyn QuoteRepository>) {
    let database = TursoDatabase::open(":memory:").await.unwrap();
    (
        Arc::new(database.instruments()),
        Arc::new(database.quotes()),
    )
}

// =============================================================================
// Scenarios, shared across both adapters
// =============================================================================

/// Freshly initialized stores report empty enumerations.
async fn check_empty_baseline(
    instruments: &dyn InstrumentRepository,
    quotes: &dyn QuoteRepository,
) {
    assert!(instruments.find_all().await.unwrap().is_empty());
    assert!(quotes.find_all().await.unwrap().is_empty());
}

/// Saving N quotes, then enumerating, yields exactly N records.
async fn check_insert_count(quotes: &dyn QuoteRepository) {
    let now = Utc::now();
    quotes
        .save(&quote("AAA111111", dec!(1.111), now))
        .await
        .unwrap();
    quotes
        .save_all(&[
            quote("AAA111111", dec!(1.222), now),
            quote("BBB222222", dec!(1.333), now),
        ])
        .await
        .unwrap();

    assert_eq!(quotes.find_all().await.unwrap().len(), 3);
}

/// Bulk delete by ISIN removes only that ISIN's records.
async fn check_delete_all_by_isin(quotes: &dyn QuoteRepository) {
    let now = Utc::now();
    quotes
        .save_all(&[
            quote("AAA111111", dec!(1.111), now),
            quote("BBB222222", dec!(1.222), now),
            quote("BBB222222", dec!(1.333), now),
        ])
        .await
        .unwrap();
    assert_eq!(quotes.find_all().await.unwrap().len(), 3);

    quotes
        .delete_all_by_isin(&Isin::new("BBB222222"))
        .await
        .unwrap();

    let remaining = quotes.find_all().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].isin.as_str(), "AAA111111");
}

/// Filtering by ISIN returns exactly that ISIN's records.
async fn check_find_all_by_isin(quotes: &dyn QuoteRepository) {
    let now = Utc::now();
    quotes
        .save_all(&[
            quote("AAA111111", dec!(1.111), now),
            quote("BBB222222", dec!(1.222), now),
            quote("BBB222222", dec!(1.333), now),
        ])
        .await
        .unwrap();

    let matching = quotes
        .find_all_by_isin(&Isin::new("BBB222222"))
        .await
        .unwrap();
    assert_eq!(matching.len(), 2);
    assert!(matching.iter().all(|q| q.isin.as_str() == "BBB222222"));
}

/// The time-range query is inclusive on both bounds and ordered
/// ascending by timestamp.
async fn check_time_range_filter(quotes: &dyn QuoteRepository) {
    let isin = Isin::new("AAA111111");
    let now = Utc::now();

    quotes
        .save_all(&[
            quote("AAA111111", dec!(1.111), now),
            quote("AAA111111", dec!(1.222), now),
            quote("AAA111111", dec!(1.333), now - Duration::minutes(700)),
            quote("AAA111111", dec!(1.444), now - Duration::minutes(650)),
            quote("AAA111111", dec!(1.555), now - Duration::minutes(600)),
        ])
        .await
        .unwrap();
    assert_eq!(quotes.find_all().await.unwrap().len(), 5);

    let matching = quotes
        .find_all_by_isin_and_timestamp_between(&isin, now - Duration::minutes(625), now)
        .await
        .unwrap();

    // The quotes at -700 and -650 minutes fall outside the window.
    assert_eq!(matching.len(), 3);
    assert_eq!(matching[0].price, dec!(1.555));
    assert!(matching.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));

    let newest: Vec<Decimal> = matching[1..].iter().map(|q| q.price).collect();
    assert!(newest.contains(&dec!(1.111)));
    assert!(newest.contains(&dec!(1.222)));
}

/// Upserting the same ISIN twice leaves a single record carrying the
/// second description.
async fn check_upsert_replaces(instruments: &dyn InstrumentRepository) {
    let isin = Isin::new("AAA111111");

    instruments.upsert(&isin, "description").await.unwrap();
    instruments
        .upsert(&isin, "updated description")
        .await
        .unwrap();

    let all = instruments.find_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].description, "updated description");

    let found = instruments.find_by_isin(&isin).await.unwrap().unwrap();
    assert_eq!(found.description, "updated description");
}

/// Deleting an absent instrument is a no-op, not an error.
async fn check_delete_absent_is_noop(instruments: &dyn InstrumentRepository) {
    instruments
        .delete_by_isin(&Isin::new("ZZZ999999"))
        .await
        .unwrap();
    assert!(instruments.find_all().await.unwrap().is_empty());
}

// =============================================================================
// In-memory adapter
// =============================================================================

#[tokio::test]
async fn in_memory_empty_baseline() {
    let (instruments, quotes) = in_memory_stores();
    check_empty_baseline(instruments.as_ref(), quotes.as_ref()).await;
}

#[tokio::test]
async fn in_memory_insert_count() {
    let (_, quotes) = in_memory_stores();
    check_insert_count(quotes.as_ref()).await;
}

#[tokio::test]
async fn in_memory_delete_all_by_isin() {
    let (_, quotes) = in_memory_stores();
    check_delete_all_by_isin(quotes.as_ref()).await;
}

#[tokio::test]
async fn in_memory_find_all_by_isin() {
    let (_, quotes) = in_memory_stores();
    check_find_all_by_isin(quotes.as_ref()).await;
}

#[tokio::test]
async fn in_memory_time_range_filter() {
    let (_, quotes) = in_memory_stores();
    check_time_range_filter(quotes.as_ref()).await;
}

#[tokio::test]
async fn in_memory_upsert_replaces() {
    let (instruments, _) = in_memory_stores();
    check_upsert_replaces(instruments.as_ref()).await;
}

#[tokio::test]
async fn in_memory_delete_absent_is_noop() {
    let (instruments, _) = in_memory_stores();
    check_delete_absent_is_noop(instruments.as_ref()).await;
}

// =============================================================================
// Turso adapter
// =============================================================================

#[tokio::test]
async fn turso_empty_baseline() {
    let (instruments, quotes) = turso_stores().await;
    check_empty_baseline(instruments.as_ref(), quotes.as_ref()).await;
}

#[tokio::test]
async fn turso_insert_count() {
    let (_, quotes) = turso_stores().await;
    check_insert_count(quotes.as_ref()).await;
}

#[tokio::test]
async fn turso_delete_all_by_isin() {
    let (_, quotes) = turso_stores().await;
    check_delete_all_by_isin(quotes.as_ref()).await;
}

#[tokio::test]
async fn turso_find_all_by_isin() {
    let (_, quotes) = turso_stores().await;
    check_find_all_by_isin(quotes.as_ref()).await;
}

#[tokio::test]
async fn turso_time_range_filter() {
    let (_, quotes) = turso_stores().await;
    check_time_range_filter(quotes.as_ref()).await;
}

#[tokio::test]
async fn turso_upsert_replaces() {
    let (instruments, _) = turso_stores().await;
    check_upsert_replaces(instruments.as_ref()).await;
}

#[tokio::test]
async fn turso_delete_absent_is_noop() {
    let (instruments, _) = turso_stores().await;
    check_delete_absent_is_noop(instruments.as_ref()).await;
}

#[tokio::test]
async fn turso_prices_survive_the_roundtrip_exactly() {
    let (_, quotes) = turso_stores().await;
    let now = Utc::now();

    quotes
        .save(&quote("AAA111111", dec!(-0.000001), now))
        .await
        .unwrap();

    let stored = quotes
        .find_all_by_isin(&Isin::new("AAA111111"))
        .await
        .unwrap();
    assert_eq!(stored[0].price, dec!(-0.000001));
}
