//! Event Envelope Codec
//!
//! Decodes raw inbound messages into typed [`MarketEvent`]s. The codec
//! is pure and stateless: it performs no store access and holds no
//! connection state.
//!
//! # Message Types
//!
//! All messages are JSON objects carrying a `type` discriminator:
//!
//! - `INSTRUMENT_ADD`: create or update an instrument
//! - `INSTRUMENT_DELETE`: delete an instrument and its quotes
//! - `QUOTE`: price observation for an instrument
//!
//! Unknown or malformed shapes fail with [`ParseError`]; the caller
//! treats that as a non-fatal, logged, discarded input.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::event::MarketEvent;
use crate::domain::instrument::Isin;
use crate::domain::quote::Quote;

/// Decode errors for inbound event messages.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// JSON decoding failed, or a known message shape did not match.
    #[error("malformed event JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The payload is valid JSON but not an object.
    #[error("event payload is not a JSON object")]
    NotAnObject,

    /// The object carries no `type` discriminator.
    #[error("event payload is missing the \"type\" field")]
    MissingType,

    /// The `type` discriminator names no known event.
    #[error("unknown event type: {0}")]
    UnknownType(String),
}

/// Instrument add/update message.
///
/// # Wire Format (JSON)
/// ```json
/// {"type": "INSTRUMENT_ADD", "isin": "DE000BASF111", "description": "BASF SE"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentAddMessage {
    /// Message type (always "INSTRUMENT_ADD").
    #[serde(rename = "type")]
    pub msg_type: String,

    /// Instrument identifier.
    pub isin: String,

    /// Instrument description; replaces any previous one.
    pub description: String,
}

/// Instrument delete message.
///
/// # Wire Format (JSON)
/// ```json
/// {"type": "INSTRUMENT_DELETE", "isin": "DE000BASF111"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentDeleteMessage {
    /// Message type (always "INSTRUMENT_DELETE").
    #[serde(rename = "type")]
    pub msg_type: String,

    /// Instrument identifier.
    pub isin: String,
}

/// Quote observation message.
///
/// # Wire Format (JSON)
/// ```json
/// {"type": "QUOTE", "isin": "DE000BASF111", "price": 12.5, "timestamp": "2024-03-15T09:30:00Z"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteEventMessage {
    /// Message type (always "QUOTE").
    #[serde(rename = "type")]
    pub msg_type: String,

    /// Instrument identifier.
    pub isin: String,

    /// Observed price.
    pub price: Decimal,

    /// Observation time (ISO-8601).
    pub timestamp: DateTime<Utc>,
}

/// JSON codec for the inbound event stream.
#[derive(Debug, Default, Clone)]
pub struct EventCodec;

impl EventCodec {
    /// Create a new codec.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Decode one raw message into a typed event.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] when the payload is not a JSON object,
    /// lacks a known `type`, or does not match the shape its type
    /// requires.
    pub fn decode(&self, text: &str) -> Result<MarketEvent, ParseError> {
        let value: serde_json::Value = serde_json::from_str(text.trim())?;
        if !value.is_object() {
            return Err(ParseError::NotAnObject);
        }

        let msg_type = value
            .get("type")
            .and_then(serde_json::Value::as_str)
            .ok_or(ParseError::MissingType)?
            .to_owned();

        match msg_type.as_str() {
            "INSTRUMENT_ADD" => {
                let message: InstrumentAddMessage = serde_json::from_value(value)?;
                Ok(MarketEvent::InstrumentUpsert {
                    isin: Isin::new(message.isin),
                    description: message.description,
                })
            }
            "INSTRUMENT_DELETE" => {
                let message: InstrumentDeleteMessage = serde_json::from_value(value)?;
                Ok(MarketEvent::InstrumentDelete {
                    isin: Isin::new(message.isin),
                })
            }
            "QUOTE" => {
                let message: QuoteEventMessage = serde_json::from_value(value)?;
                Ok(MarketEvent::QuoteObserved(Quote::new(
                    Isin::new(message.isin),
                    message.price,
                    message.timestamp,
                )))
            }
            _ => Err(ParseError::UnknownType(msg_type)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use test_case::test_case;

    #[test]
    fn decodes_instrument_add() {
        let codec = EventCodec::new();
        let event = codec
            .decode(r#"{"type": "INSTRUMENT_ADD", "isin": "AAA111111", "description": "a share"}"#)
            .unwrap();

        assert_eq!(
            event,
            MarketEvent::InstrumentUpsert {
                isin: Isin::new("AAA111111"),
                description: "a share".to_owned(),
            }
        );
    }

    #[test]
    fn decodes_instrument_delete() {
        let codec = EventCodec::new();
        let event = codec
            .decode(r#"{"type": "INSTRUMENT_DELETE", "isin": "AAA111111"}"#)
            .unwrap();

        assert_eq!(
            event,
            MarketEvent::InstrumentDelete {
                isin: Isin::new("AAA111111"),
            }
        );
    }

    #[test]
    fn decodes_quote_with_numeric_price() {
        let codec = EventCodec::new();
        let event = codec
            .decode(
                r#"{"type": "QUOTE", "isin": "AAA111111", "price": 12.5, "timestamp": "2024-03-15T09:30:00Z"}"#,
            )
            .unwrap();

        let MarketEvent::QuoteObserved(quote) = event else {
            panic!("expected a quote event");
        };
        assert_eq!(quote.isin.as_str(), "AAA111111");
        assert_eq!(quote.price, dec!(12.5));
        assert_eq!(quote.timestamp.to_rfc3339(), "2024-03-15T09:30:00+00:00");
    }

    #[test]
    fn decodes_quote_with_string_price() {
        let codec = EventCodec::new();
        let event = codec
            .decode(
                r#"{"type": "QUOTE", "isin": "AAA111111", "price": "-3.1415", "timestamp": "2024-03-15T09:30:00Z"}"#,
            )
            .unwrap();

        let MarketEvent::QuoteObserved(quote) = event else {
            panic!("expected a quote event");
        };
        assert_eq!(quote.price, dec!(-3.1415));
    }

    #[test]
    fn unknown_type_is_rejected_with_its_name() {
        let codec = EventCodec::new();
        let error = codec
            .decode(r#"{"type": "INSTRUMENT_SPLIT", "isin": "AAA111111"}"#)
            .unwrap_err();

        assert!(matches!(error, ParseError::UnknownType(name) if name == "INSTRUMENT_SPLIT"));
    }

    #[test_case("this is not json" ; "plain text")]
    #[test_case("[1, 2, 3]" ; "json array")]
    #[test_case("42" ; "bare number")]
    #[test_case(r#"{"isin": "AAA111111"}"# ; "missing type field")]
    #[test_case(r#"{"type": "QUOTE", "isin": "AAA111111"}"# ; "quote without price")]
    #[test_case(r#"{"type": "QUOTE", "isin": "AAA111111", "price": 1.0, "timestamp": "yesterday"}"# ; "unparsable timestamp")]
    #[test_case(r#"{"type": "INSTRUMENT_ADD", "isin": "AAA111111"}"# ; "add without description")]
    fn malformed_payloads_fail(payload: &str) {
        let codec = EventCodec::new();
        assert!(codec.decode(payload).is_err());
    }

    #[test]
    fn surrounding_whitespace_is_tolerated() {
        let codec = EventCodec::new();
        let event = codec
            .decode("  \n {\"type\": \"INSTRUMENT_DELETE\", \"isin\": \"AAA111111\"} \n")
            .unwrap();
        assert_eq!(event.kind(), "instrument_delete");
    }
}
