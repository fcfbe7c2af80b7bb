//! Instrument metadata and the ISIN value object.

use std::fmt;

use serde::{Deserialize, Serialize};

/// International Securities Identification Number.
///
/// The unique key identifying an instrument. Normalized to uppercase
/// with surrounding whitespace stripped; no structural validation
/// beyond that, since upstream feeds occasionally carry non-standard
/// identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Isin(String);

impl Isin {
    /// Create a new ISIN, trimmed and normalized to uppercase.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        let value: String = value.into();
        Self(value.trim().to_uppercase())
    }

    /// Get the identifier string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Check whether the identifier is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Isin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Isin {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Instrument metadata, keyed by ISIN.
///
/// Created on the first ADD event for an ISIN; the description is
/// replaced on subsequent ADD events (last write wins); destroyed on a
/// DELETE event together with every quote sharing the ISIN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    /// Unique instrument identifier.
    pub isin: Isin,
    /// Free-text description, mutable across ADD events.
    pub description: String,
}

impl Instrument {
    /// Create a new instrument record.
    #[must_use]
    pub fn new(isin: Isin, description: impl Into<String>) -> Self {
        Self {
            isin,
            description: description.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isin_is_normalized_to_uppercase() {
        let isin = Isin::new(" de000basf111 ");
        assert_eq!(isin.as_str(), "DE000BASF111");
    }

    #[test]
    fn isin_display_matches_inner() {
        let isin = Isin::new("AAA111111");
        assert_eq!(isin.to_string(), "AAA111111");
    }

    #[test]
    fn blank_isin_is_empty() {
        assert!(Isin::new("   ").is_empty());
        assert!(!Isin::new("AAA111111").is_empty());
    }

    #[test]
    fn isin_serializes_transparently() {
        let isin = Isin::new("AAA111111");
        let json = serde_json::to_string(&isin).unwrap();
        assert_eq!(json, "\"AAA111111\"");
    }
}
