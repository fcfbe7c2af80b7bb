//! Typed inbound market events.
//!
//! The canonical internal representation of messages delivered by the
//! upstream transport: produced by the envelope codec, consumed by the
//! dispatcher.

use serde::{Deserialize, Serialize};

use super::instrument::Isin;
use super::quote::Quote;

/// A parsed market event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketEvent {
    /// Create an instrument, or replace its description if the ISIN is
    /// already registered (last write wins).
    InstrumentUpsert {
        /// Instrument identifier.
        isin: Isin,
        /// New description, replacing any previous one.
        description: String,
    },

    /// Delete an instrument together with every quote sharing its ISIN.
    InstrumentDelete {
        /// Instrument identifier.
        isin: Isin,
    },

    /// A price was observed for an instrument.
    QuoteObserved(Quote),
}

impl MarketEvent {
    /// The ISIN this event belongs to.
    ///
    /// Events for the same ISIN are applied in arrival order relative
    /// to each other; events for different ISINs are independent.
    #[must_use]
    pub const fn isin(&self) -> &Isin {
        match self {
            Self::InstrumentUpsert { isin, .. } | Self::InstrumentDelete { isin } => isin,
            Self::QuoteObserved(quote) => &quote.isin,
        }
    }

    /// Short name of the event kind, for logging.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InstrumentUpsert { .. } => "instrument_upsert",
            Self::InstrumentDelete { .. } => "instrument_delete",
            Self::QuoteObserved(_) => "quote_observed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    #[test]
    fn event_exposes_its_isin() {
        let upsert = MarketEvent::InstrumentUpsert {
            isin: Isin::new("AAA111111"),
            description: "first".to_owned(),
        };
        assert_eq!(upsert.isin().as_str(), "AAA111111");

        let observed = MarketEvent::QuoteObserved(Quote::new(
            Isin::new("BBB222222"),
            dec!(1.5),
            Utc::now(),
        ));
        assert_eq!(observed.isin().as_str(), "BBB222222");
    }
}
