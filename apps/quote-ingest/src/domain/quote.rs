//! Price observations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::instrument::Isin;

/// A single observed price for an instrument at a point in time.
///
/// Quotes are append-only: once stored they are never mutated, and
/// they are removed only in bulk when their owning instrument is
/// deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Identifier of the owning instrument. Not enforced as a hard
    /// foreign key: a quote may arrive before its instrument is
    /// registered, or after it was deleted.
    pub isin: Isin,
    /// Observed price. Signed decimal, exact arithmetic.
    pub price: Decimal,
    /// Observation time.
    pub timestamp: DateTime<Utc>,
}

impl Quote {
    /// Create a new quote.
    #[must_use]
    pub const fn new(isin: Isin, price: Decimal, timestamp: DateTime<Utc>) -> Self {
        Self {
            isin,
            price,
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn quote_roundtrips_through_json() {
        let quote = Quote::new(Isin::new("AAA111111"), dec!(12.3456), Utc::now());
        let json = serde_json::to_string(&quote).unwrap();
        let back: Quote = serde_json::from_str(&json).unwrap();
        assert_eq!(back, quote);
    }
}
