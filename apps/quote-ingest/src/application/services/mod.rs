//! Application services.
//!
//! - [`dispatcher`]: turns typed events into store mutations under
//!   per-ISIN ordering.
//! - [`ingest`]: the raw-message boundary (decode, then dispatch).
//! - [`query`]: validated time-series queries and candle folding.

pub mod dispatcher;
pub mod ingest;
pub mod query;

pub use dispatcher::{CascadeHalf, DispatchError, EventDispatcher};
pub use ingest::{IngestError, IngestService};
pub use query::{QueryError, QuoteQueryService};
