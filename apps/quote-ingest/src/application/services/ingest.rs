//! Raw-message ingestion boundary.
//!
//! Decodes inbound transport payloads and hands typed events to the
//! dispatcher. Parse failures never reach the dispatcher; the
//! transport caller logs and discards them.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use super::dispatcher::{DispatchError, EventDispatcher};
use crate::infrastructure::codec::{EventCodec, ParseError};

/// Failure while ingesting a raw message.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The payload could not be decoded; nothing was written. Treated
    /// as non-fatal at the transport boundary: log and discard.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The decoded event could not be applied to the stores.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// Decode-then-dispatch pipeline for raw transport messages.
pub struct IngestService {
    codec: EventCodec,
    dispatcher: Arc<EventDispatcher>,
}

impl IngestService {
    /// Create an ingest pipeline over the dispatcher.
    #[must_use]
    pub fn new(dispatcher: Arc<EventDispatcher>) -> Self {
        Self {
            codec: EventCodec::new(),
            dispatcher,
        }
    }

    /// Decode one raw message and apply it to the stores.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Parse`] when the payload is malformed
    /// (store contents untouched) and [`IngestError::Dispatch`] when a
    /// store operation fails.
    pub async fn handle_raw(&self, payload: &str) -> Result<(), IngestError> {
        let event = self.codec.decode(payload)?;
        debug!(kind = event.kind(), isin = %event.isin(), "Event decoded");
        self.dispatcher.dispatch(event).await?;
        Ok(())
    }
}
