//! Candlestick aggregation.
//!
//! Folds a time-ordered quote sequence into fixed-interval OHLC
//! candles. The fold is a pure function over the output of the range
//! query; buckets that contain no quotes are omitted from the result.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::instrument::Isin;
use super::quote::Quote;

/// Fixed bucket width for candle aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandleInterval {
    seconds: u32,
}

impl CandleInterval {
    /// One-minute interval, the canonical candlestick bucket.
    pub const MINUTE: Self = Self { seconds: 60 };

    /// Create an interval from a bucket width in seconds.
    ///
    /// Returns `None` for a zero width.
    #[must_use]
    pub const fn from_secs(seconds: u32) -> Option<Self> {
        if seconds == 0 {
            None
        } else {
            Some(Self { seconds })
        }
    }

    /// Bucket width in seconds.
    #[must_use]
    pub const fn as_secs(self) -> u32 {
        self.seconds
    }
}

/// Open/high/low/close summary of the quotes inside one time bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candle {
    /// Instrument the candle belongs to.
    pub isin: Isin,
    /// Start of the bucket (inclusive).
    pub open_time: DateTime<Utc>,
    /// End of the bucket (exclusive).
    pub close_time: DateTime<Utc>,
    /// First observed price in the bucket.
    pub open: Decimal,
    /// Highest observed price in the bucket.
    pub high: Decimal,
    /// Lowest observed price in the bucket.
    pub low: Decimal,
    /// Last observed price in the bucket.
    pub close: Decimal,
    /// Number of quotes folded into the candle.
    pub quote_count: u64,
}

/// Fold a time-ordered quote sequence into candles.
///
/// Buckets are aligned to the Unix epoch in multiples of the interval.
/// The input must be ordered ascending by timestamp (the contract of
/// the range query) and belong to a single instrument.
#[must_use]
pub fn aggregate(quotes: &[Quote], interval: CandleInterval) -> Vec<Candle> {
    let width = i64::from(interval.as_secs());
    let mut candles: Vec<Candle> = Vec::new();

    for quote in quotes {
        let open_time = bucket_start(quote.timestamp, width);
        match candles.last_mut() {
            Some(current) if current.open_time == open_time => {
                current.high = current.high.max(quote.price);
                current.low = current.low.min(quote.price);
                current.close = quote.price;
                current.quote_count += 1;
            }
            _ => candles.push(Candle {
                isin: quote.isin.clone(),
                open_time,
                close_time: open_time + Duration::seconds(width),
                open: quote.price,
                high: quote.price,
                low: quote.price,
                close: quote.price,
                quote_count: 1,
            }),
        }
    }

    candles
}

/// Truncate a timestamp down to its epoch-aligned bucket boundary.
fn bucket_start(timestamp: DateTime<Utc>, width: i64) -> DateTime<Utc> {
    let offset = timestamp.timestamp().rem_euclid(width);
    timestamp
        - Duration::seconds(offset)
        - Duration::nanoseconds(i64::from(timestamp.timestamp_subsec_nanos()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn quote_at(secs: i64, price: Decimal) -> Quote {
        Quote::new(
            Isin::new("AAA111111"),
            price,
            Utc.timestamp_opt(secs, 0).unwrap(),
        )
    }

    #[test]
    fn empty_input_yields_no_candles() {
        assert!(aggregate(&[], CandleInterval::MINUTE).is_empty());
    }

    #[test]
    fn single_bucket_tracks_ohlc() {
        let quotes = vec![
            quote_at(60, dec!(10)),
            quote_at(70, dec!(14)),
            quote_at(80, dec!(8)),
            quote_at(119, dec!(12)),
        ];

        let candles = aggregate(&quotes, CandleInterval::MINUTE);

        assert_eq!(candles.len(), 1);
        let candle = &candles[0];
        assert_eq!(candle.open, dec!(10));
        assert_eq!(candle.high, dec!(14));
        assert_eq!(candle.low, dec!(8));
        assert_eq!(candle.close, dec!(12));
        assert_eq!(candle.quote_count, 4);
        assert_eq!(candle.open_time, Utc.timestamp_opt(60, 0).unwrap());
        assert_eq!(candle.close_time, Utc.timestamp_opt(120, 0).unwrap());
    }

    #[test]
    fn buckets_are_epoch_aligned_and_sparse() {
        // Quotes in minute buckets 1 and 3; bucket 2 has no quotes and
        // must be omitted.
        let quotes = vec![
            quote_at(65, dec!(1)),
            quote_at(185, dec!(2)),
            quote_at(190, dec!(3)),
        ];

        let candles = aggregate(&quotes, CandleInterval::MINUTE);

        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0].open_time, Utc.timestamp_opt(60, 0).unwrap());
        assert_eq!(candles[1].open_time, Utc.timestamp_opt(180, 0).unwrap());
        assert_eq!(candles[1].open, dec!(2));
        assert_eq!(candles[1].close, dec!(3));
    }

    #[test]
    fn bucket_boundary_quote_opens_the_next_candle() {
        let quotes = vec![quote_at(119, dec!(1)), quote_at(120, dec!(2))];

        let candles = aggregate(&quotes, CandleInterval::MINUTE);

        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0].close_time, candles[1].open_time);
    }

    #[test]
    fn zero_interval_is_rejected() {
        assert!(CandleInterval::from_secs(0).is_none());
        assert_eq!(CandleInterval::from_secs(60), Some(CandleInterval::MINUTE));
    }

    #[test]
    fn subsecond_precision_is_truncated_from_bucket_starts() {
        let timestamp = Utc.timestamp_opt(61, 0).unwrap() + Duration::milliseconds(250);
        let quotes = vec![Quote::new(Isin::new("AAA111111"), dec!(5), timestamp)];

        let candles = aggregate(&quotes, CandleInterval::MINUTE);

        assert_eq!(candles[0].open_time, Utc.timestamp_opt(60, 0).unwrap());
    }
}
