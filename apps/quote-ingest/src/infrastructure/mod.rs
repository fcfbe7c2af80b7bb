//! Infrastructure Layer - Adapters and external integrations.

/// Inbound event envelope codec.
pub mod codec;

/// Persistence adapters for the instrument and quote stores.
pub mod persistence;

/// Broadcast fan-out to in-process subscribers.
pub mod broadcast;

/// HTTP surface: ingestion endpoint, range queries, health.
pub mod http;

/// Configuration and dependency wiring.
pub mod config;

/// Tracing initialization.
pub mod telemetry;
