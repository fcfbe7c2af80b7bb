//! Application Layer - Use cases and port definitions.

/// Port definitions for stores and publishers.
pub mod ports;

/// Application services: dispatch, ingest, and query.
pub mod services;
