//! Turso-backed store adapters.
//!
//! Persists instruments and quotes in a local turso database (the Rust
//! rewrite of SQLite). Prices are stored as decimal strings to keep
//! exact precision; timestamps as microseconds since the Unix epoch so
//! the composite index yields an ordered range scan. Sub-microsecond
//! precision is truncated on write.

use std::str::FromStr;
use std::sync::Arc;

use ::turso::{Builder, Database, Value};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::debug;

use crate::application::ports::{InstrumentRepository, QuoteRepository, StoreError};
use crate::domain::instrument::{Instrument, Isin};
use crate::domain::quote::Quote;

/// Schema applied on open. `IF NOT EXISTS` keeps reopening idempotent.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS instruments (
        isin TEXT PRIMARY KEY,
        description TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS quotes (
        isin TEXT NOT NULL,
        price TEXT NOT NULL,
        timestamp_us INTEGER NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_quotes_isin_timestamp
        ON quotes (isin, timestamp_us)",
];

impl From<::turso::Error> for StoreError {
    fn from(error: ::turso::Error) -> Self {
        Self::engine(error.to_string())
    }
}

/// Handle to an open turso database with the schema applied.
#[derive(Clone)]
pub struct TursoDatabase {
    db: Arc<Database>,
}

impl TursoDatabase {
    /// Open (or create) the database at `path` and apply the schema.
    ///
    /// `:memory:` opens an ephemeral database, used by tests.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Engine`] when the database cannot be
    /// opened or the schema cannot be applied.
    pub async fn open(path: &str) -> Result<Self, StoreError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;
        for statement in SCHEMA {
            conn.execute(statement, ()).await?;
        }
        debug!(path, "Database opened");
        Ok(Self { db: Arc::new(db) })
    }

    /// Instrument store over this database.
    #[must_use]
    pub fn instruments(&self) -> TursoInstrumentRepository {
        TursoInstrumentRepository {
            db: Arc::clone(&self.db),
        }
    }

    /// Quote store over this database.
    #[must_use]
    pub fn quotes(&self) -> TursoQuoteRepository {
        TursoQuoteRepository {
            db: Arc::clone(&self.db),
        }
    }
}

/// Instrument store backed by turso.
#[derive(Clone)]
pub struct TursoInstrumentRepository {
    db: Arc<Database>,
}

#[async_trait]
impl InstrumentRepository for TursoInstrumentRepository {
    async fn upsert(&self, isin: &Isin, description: &str) -> Result<Instrument, StoreError> {
        let conn = self.db.connect()?;
        conn.execute(
            "INSERT OR REPLACE INTO instruments (isin, description) VALUES (?1, ?2)",
            [
                Value::Text(isin.as_str().to_owned()),
                Value::Text(description.to_owned()),
            ],
        )
        .await?;
        Ok(Instrument::new(isin.clone(), description))
    }

    async fn delete_by_isin(&self, isin: &Isin) -> Result<(), StoreError> {
        let conn = self.db.connect()?;
        conn.execute(
            "DELETE FROM instruments WHERE isin = ?1",
            [Value::Text(isin.as_str().to_owned())],
        )
        .await?;
        Ok(())
    }

    async fn find_by_isin(&self, isin: &Isin) -> Result<Option<Instrument>, StoreError> {
        let conn = self.db.connect()?;
        let mut rows = conn
            .query(
                "SELECT isin, description FROM instruments WHERE isin = ?1",
                [Value::Text(isin.as_str().to_owned())],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(instrument_from_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_all(&self) -> Result<Vec<Instrument>, StoreError> {
        let conn = self.db.connect()?;
        let mut rows = conn
            .query("SELECT isin, description FROM instruments", ())
            .await?;
        let mut instruments = Vec::new();
        while let Some(row) = rows.next().await? {
            instruments.push(instrument_from_row(&row)?);
        }
        Ok(instruments)
    }
}

/// Quote store backed by turso.
#[derive(Clone)]
pub struct TursoQuoteRepository {
    db: Arc<Database>,
}

#[async_trait]
impl QuoteRepository for TursoQuoteRepository {
    async fn save(&self, quote: &Quote) -> Result<(), StoreError> {
        let conn = self.db.connect()?;
        conn.execute(
            "INSERT INTO quotes (isin, price, timestamp_us) VALUES (?1, ?2, ?3)",
            quote_params(quote),
        )
        .await?;
        Ok(())
    }

    async fn save_all(&self, quotes: &[Quote]) -> Result<(), StoreError> {
        let conn = self.db.connect()?;
        for quote in quotes {
            conn.execute(
                "INSERT INTO quotes (isin, price, timestamp_us) VALUES (?1, ?2, ?3)",
                quote_params(quote),
            )
            .await?;
        }
        Ok(())
    }

    async fn delete_all_by_isin(&self, isin: &Isin) -> Result<(), StoreError> {
        let conn = self.db.connect()?;
        let deleted = conn
            .execute(
                "DELETE FROM quotes WHERE isin = ?1",
                [Value::Text(isin.as_str().to_owned())],
            )
            .await?;
        debug!(%isin, deleted, "Quotes removed");
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Quote>, StoreError> {
        let conn = self.db.connect()?;
        let mut rows = conn
            .query("SELECT isin, price, timestamp_us FROM quotes", ())
            .await?;
        collect_quotes(&mut rows).await
    }

    async fn find_all_by_isin(&self, isin: &Isin) -> Result<Vec<Quote>, StoreError> {
        let conn = self.db.connect()?;
        let mut rows = conn
            .query(
                "SELECT isin, price, timestamp_us FROM quotes WHERE isin = ?1",
                [Value::Text(isin.as_str().to_owned())],
            )
            .await?;
        collect_quotes(&mut rows).await
    }

    async fn find_all_by_isin_and_timestamp_between(
        &self,
        isin: &Isin,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Quote>, StoreError> {
        let conn = self.db.connect()?;
        let mut rows = conn
            .query(
                "SELECT isin, price, timestamp_us FROM quotes
                 WHERE isin = ?1 AND timestamp_us >= ?2 AND timestamp_us <= ?3
                 ORDER BY timestamp_us ASC",
                [
                    Value::Text(isin.as_str().to_owned()),
                    Value::Integer(start.timestamp_micros()),
                    Value::Integer(end.timestamp_micros()),
                ],
            )
            .await?;
        collect_quotes(&mut rows).await
    }
}

fn quote_params(quote: &Quote) -> [Value; 3] {
    [
        Value::Text(quote.isin.as_str().to_owned()),
        Value::Text(quote.price.to_string()),
        Value::Integer(quote.timestamp.timestamp_micros()),
    ]
}

async fn collect_quotes(rows: &mut ::turso::Rows) -> Result<Vec<Quote>, StoreError> {
    let mut quotes = Vec::new();
    while let Some(row) = rows.next().await? {
        quotes.push(quote_from_row(&row)?);
    }
    Ok(quotes)
}

fn instrument_from_row(row: &::turso::Row) -> Result<Instrument, StoreError> {
    Ok(Instrument::new(
        Isin::new(text_column(row, 0)?),
        text_column(row, 1)?,
    ))
}

fn quote_from_row(row: &::turso::Row) -> Result<Quote, StoreError> {
    let isin = Isin::new(text_column(row, 0)?);
    let price = Decimal::from_str(&text_column(row, 1)?)
        .map_err(|error| StoreError::corrupt(format!("undecodable price: {error}")))?;
    let micros = integer_column(row, 2)?;
    let timestamp = DateTime::from_timestamp_micros(micros)
        .ok_or_else(|| StoreError::corrupt(format!("timestamp out of range: {micros}")))?;
    Ok(Quote::new(isin, price, timestamp))
}

fn text_column(row: &::turso::Row, index: usize) -> Result<String, StoreError> {
    match row.get_value(index)? {
        Value::Text(text) => Ok(text),
        other => Err(StoreError::corrupt(format!(
            "expected text in column {index}, found {other:?}"
        ))),
    }
}

fn integer_column(row: &::turso::Row, index: usize) -> Result<i64, StoreError> {
    match row.get_value(index)? {
        Value::Integer(value) => Ok(value),
        other => Err(StoreError::corrupt(format!(
            "expected integer in column {index}, found {other:?}"
        ))),
    }
}
