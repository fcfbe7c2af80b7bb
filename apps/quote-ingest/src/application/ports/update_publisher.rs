//! Derived-update publishing port.

use crate::domain::instrument::Isin;
use crate::domain::quote::Quote;

/// Best-effort fan-out of derived updates to connected observers.
///
/// Publishing is fire-and-forget from the dispatcher's point of view:
/// a failure to reach one observer must not fail the triggering store
/// operation nor block other observers, so these methods return
/// nothing.
pub trait UpdatePublisher: Send + Sync {
    /// Notify observers that a quote was stored.
    fn publish_quote_stored(&self, quote: &Quote);

    /// Notify observers that an instrument and its quotes were removed.
    fn publish_instrument_removed(&self, isin: &Isin);
}

/// Publisher that drops every update, for tests and minimal wiring.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpPublisher;

impl UpdatePublisher for NoOpPublisher {
    fn publish_quote_stored(&self, _quote: &Quote) {}

    fn publish_instrument_removed(&self, _isin: &Isin) {}
}
