//! Broadcast Fan-Out
//!
//! Distributes derived updates to in-process subscribers over tokio
//! broadcast channels: one channel for stored quotes, one for
//! instrument lifecycle. Delivery is best-effort; a lagging or absent
//! receiver never fails the triggering store operation and never
//! blocks other receivers.

use tokio::sync::broadcast;

use crate::application::ports::UpdatePublisher;
use crate::domain::instrument::Isin;
use crate::domain::quote::Quote;
use crate::infrastructure::config::settings::BroadcastSettings;

/// A stored quote pushed to subscribers.
#[derive(Debug, Clone)]
pub struct QuoteStoredBroadcast {
    /// The quote that was stored.
    pub quote: Quote,
}

/// An instrument removal (with its quotes) pushed to subscribers.
#[derive(Debug, Clone)]
pub struct InstrumentRemovedBroadcast {
    /// Identifier of the removed instrument.
    pub isin: Isin,
}

/// Configuration for broadcast channel capacities.
#[derive(Debug, Clone, Copy)]
pub struct BroadcastConfig {
    /// Capacity of the stored-quote channel.
    pub quotes_capacity: usize,
    /// Capacity of the instrument-lifecycle channel.
    pub lifecycle_capacity: usize,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            quotes_capacity: 10_000,
            lifecycle_capacity: 1_000,
        }
    }
}

impl From<BroadcastSettings> for BroadcastConfig {
    fn from(settings: BroadcastSettings) -> Self {
        Self {
            quotes_capacity: settings.quotes_capacity,
            lifecycle_capacity: settings.lifecycle_capacity,
        }
    }
}

/// Central hub for subscriber channels.
///
/// Supports multiple receivers per channel; senders are not blocked by
/// slow receivers (the oldest messages are dropped for a lagging
/// receiver instead).
#[derive(Debug)]
pub struct BroadcastHub {
    quotes_tx: broadcast::Sender<QuoteStoredBroadcast>,
    lifecycle_tx: broadcast::Sender<InstrumentRemovedBroadcast>,
}

impl BroadcastHub {
    /// Create a hub with the given capacities.
    #[must_use]
    pub fn new(config: BroadcastConfig) -> Self {
        Self {
            quotes_tx: broadcast::channel(config.quotes_capacity).0,
            lifecycle_tx: broadcast::channel(config.lifecycle_capacity).0,
        }
    }

    /// Create a hub with default capacities.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(BroadcastConfig::default())
    }

    /// Send a stored quote to subscribers.
    ///
    /// Returns the number of receivers the message reached, or `None`
    /// when nobody is listening.
    pub fn send_quote_stored(&self, quote: Quote) -> Option<usize> {
        self.quotes_tx.send(QuoteStoredBroadcast { quote }).ok()
    }

    /// Subscribe to stored quotes.
    #[must_use]
    pub fn quotes_rx(&self) -> broadcast::Receiver<QuoteStoredBroadcast> {
        self.quotes_tx.subscribe()
    }

    /// Number of active stored-quote receivers.
    #[must_use]
    pub fn quotes_receiver_count(&self) -> usize {
        self.quotes_tx.receiver_count()
    }

    /// Send an instrument removal to subscribers.
    ///
    /// Returns the number of receivers the message reached, or `None`
    /// when nobody is listening.
    pub fn send_instrument_removed(&self, isin: Isin) -> Option<usize> {
        self.lifecycle_tx
            .send(InstrumentRemovedBroadcast { isin })
            .ok()
    }

    /// Subscribe to instrument removals.
    #[must_use]
    pub fn lifecycle_rx(&self) -> broadcast::Receiver<InstrumentRemovedBroadcast> {
        self.lifecycle_tx.subscribe()
    }

    /// Number of active lifecycle receivers.
    #[must_use]
    pub fn lifecycle_receiver_count(&self) -> usize {
        self.lifecycle_tx.receiver_count()
    }

    /// Snapshot of receiver counts.
    #[must_use]
    pub fn stats(&self) -> BroadcastStats {
        BroadcastStats {
            quote_receivers: self.quotes_receiver_count(),
            lifecycle_receivers: self.lifecycle_receiver_count(),
        }
    }
}

impl UpdatePublisher for BroadcastHub {
    fn publish_quote_stored(&self, quote: &Quote) {
        self.send_quote_stored(quote.clone());
    }

    fn publish_instrument_removed(&self, isin: &Isin) {
        self.send_instrument_removed(isin.clone());
    }
}

/// Receiver counts per channel.
#[derive(Debug, Clone, Copy)]
pub struct BroadcastStats {
    /// Active stored-quote receivers.
    pub quote_receivers: usize,
    /// Active lifecycle receivers.
    pub lifecycle_receivers: usize,
}
