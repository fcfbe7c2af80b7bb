//! Event Dispatcher / Consistency Engine
//!
//! The single authority that turns a typed event into store
//! operations. The stores themselves carry no cross-entity knowledge.
//!
//! # Ordering
//!
//! Events for the same ISIN are serialized through a keyed lock and
//! applied in arrival order (tokio mutexes queue waiters FIFO); events
//! for different ISINs proceed fully in parallel. The guard covers the
//! whole logical event, including both halves of a cascade delete, and
//! is released immediately after.
//!
//! # Consistency
//!
//! An instrument delete cascades to the instrument's quotes. The two
//! deletes are issued quotes-first; a partial failure surfaces as
//! [`DispatchError::CascadeDelete`] naming the half that failed, never
//! silently swallowed. Store failures are not retried here.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::OwnedMutexGuard;
use tracing::{debug, warn};

use crate::application::ports::{
    InstrumentRepository, QuoteRepository, StoreError, UpdatePublisher,
};
use crate::domain::event::MarketEvent;
use crate::domain::instrument::Isin;

/// The half of a cascade delete that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeHalf {
    /// Deleting the instrument's quotes failed; the instrument record
    /// is still present.
    Quotes,
    /// Deleting the instrument record failed; its quotes are already
    /// gone.
    Instrument,
}

impl fmt::Display for CascadeHalf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quotes => f.write_str("quotes"),
            Self::Instrument => f.write_str("instrument"),
        }
    }
}

/// Failure while dispatching a typed event.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// A store operation failed; propagated, not retried.
    #[error("store operation failed: {0}")]
    Store(#[from] StoreError),

    /// An instrument delete completed only partially. Carries enough
    /// detail for the caller to drive a compensating retry.
    #[error("cascade delete for {isin} failed while removing the {failed} half: {source}")]
    CascadeDelete {
        /// Instrument whose delete was requested.
        isin: Isin,
        /// Which half of the cascade failed.
        failed: CascadeHalf,
        /// Underlying store failure.
        source: StoreError,
    },
}

/// Per-ISIN serialization points.
///
/// One async mutex per ISIN, created lazily. The registry itself is
/// guarded by a synchronous lock that is never held across an await
/// point.
#[derive(Default)]
struct IsinLocks {
    slots: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl IsinLocks {
    async fn acquire(&self, isin: &Isin) -> OwnedMutexGuard<()> {
        let slot = {
            let mut slots = self.slots.lock();
            Arc::clone(slots.entry(isin.as_str().to_owned()).or_default())
        };
        slot.lock_owned().await
    }
}

/// Routes typed events to store mutations, enforcing the upsert and
/// cascade-delete invariants.
pub struct EventDispatcher {
    instruments: Arc<dyn InstrumentRepository>,
    quotes: Arc<dyn QuoteRepository>,
    publisher: Arc<dyn UpdatePublisher>,
    locks: IsinLocks,
}

impl EventDispatcher {
    /// Create a dispatcher over the given stores and publisher.
    #[must_use]
    pub fn new(
        instruments: Arc<dyn InstrumentRepository>,
        quotes: Arc<dyn QuoteRepository>,
        publisher: Arc<dyn UpdatePublisher>,
    ) -> Self {
        Self {
            instruments,
            quotes,
            publisher,
            locks: IsinLocks::default(),
        }
    }

    /// Apply one event to the stores.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Store`] when a single store operation
    /// fails, and [`DispatchError::CascadeDelete`] when an instrument
    /// delete completes only partially.
    pub async fn dispatch(&self, event: MarketEvent) -> Result<(), DispatchError> {
        let _guard = self.locks.acquire(event.isin()).await;

        match event {
            MarketEvent::InstrumentUpsert { isin, description } => {
                let instrument = self.instruments.upsert(&isin, &description).await?;
                debug!(isin = %instrument.isin, "Instrument upserted");
            }
            MarketEvent::InstrumentDelete { isin } => {
                self.cascade_delete(&isin).await?;
                self.publisher.publish_instrument_removed(&isin);
            }
            MarketEvent::QuoteObserved(quote) => {
                // No synchronous existence check against the instrument
                // store: a quote may precede its instrument's
                // registration or outlive its deletion.
                self.quotes.save(&quote).await?;
                debug!(isin = %quote.isin, timestamp = %quote.timestamp, "Quote stored");
                self.publisher.publish_quote_stored(&quote);
            }
        }

        Ok(())
    }

    /// Remove the instrument's quotes, then the instrument itself.
    ///
    /// Quotes go first: when the second half fails, the leftover is a
    /// childless instrument rather than orphaned quotes.
    async fn cascade_delete(&self, isin: &Isin) -> Result<(), DispatchError> {
        self.quotes.delete_all_by_isin(isin).await.map_err(|source| {
            warn!(%isin, error = %source, "Cascade delete failed while removing quotes");
            DispatchError::CascadeDelete {
                isin: isin.clone(),
                failed: CascadeHalf::Quotes,
                source,
            }
        })?;

        self.instruments.delete_by_isin(isin).await.map_err(|source| {
            warn!(%isin, error = %source, "Cascade delete failed while removing the instrument");
            DispatchError::CascadeDelete {
                isin: isin.clone(),
                failed: CascadeHalf::Instrument,
                source,
            }
        })?;

        debug!(%isin, "Instrument and its quotes removed");
        Ok(())
    }
}
