//! HTTP/JSON API server.
//!
//! The transport surface: event ingestion, range queries over stored
//! quotes, candle queries, and a liveness endpoint. Malformed inbound
//! events are rejected here, at the transport boundary, and never
//! reach the dispatcher.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::application::services::{
    DispatchError, IngestError, IngestService, QueryError, QuoteQueryService,
};
use crate::domain::candle::{Candle, CandleInterval};
use crate::domain::quote::Quote;

/// Shared state for the HTTP server.
#[derive(Clone)]
pub struct ApiState {
    ingest: Arc<IngestService>,
    query: Arc<QuoteQueryService>,
}

impl ApiState {
    /// Create the server state.
    #[must_use]
    pub fn new(ingest: Arc<IngestService>, query: Arc<QuoteQueryService>) -> Self {
        Self { ingest, query }
    }
}

/// Create the Axum router with all endpoints.
#[must_use]
pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/v1/events", post(ingest_event))
        .route("/v1/quotes", get(get_quotes))
        .route("/v1/candles", get(get_candles))
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

/// Acknowledgment for an accepted event.
#[derive(Debug, Serialize, Deserialize)]
pub struct EventAccepted {
    /// Always true on the success path.
    pub accepted: bool,
}

/// Ingest one raw event message.
async fn ingest_event(
    State(state): State<ApiState>,
    body: String,
) -> Result<(StatusCode, Json<EventAccepted>), ApiError> {
    match state.ingest.handle_raw(&body).await {
        Ok(()) => Ok((StatusCode::ACCEPTED, Json(EventAccepted { accepted: true }))),
        Err(IngestError::Parse(error)) => {
            warn!(error = %error, "Discarding malformed event");
            Err(ApiError::from(IngestError::Parse(error)))
        }
        Err(error) => Err(ApiError::from(error)),
    }
}

/// Time-range query parameters.
#[derive(Debug, Deserialize)]
struct RangeParams {
    isin: String,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

/// Quotes response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct QuotesResponse {
    /// Matching quotes, ascending by timestamp.
    pub quotes: Vec<Quote>,
}

/// Range query over stored quotes.
async fn get_quotes(
    State(state): State<ApiState>,
    Query(params): Query<RangeParams>,
) -> Result<Json<QuotesResponse>, ApiError> {
    let quotes = state
        .query
        .quotes_between(&params.isin, params.start, params.end)
        .await?;
    Ok(Json(QuotesResponse { quotes }))
}

/// Candle query parameters.
#[derive(Debug, Deserialize)]
struct CandleParams {
    isin: String,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    /// Bucket width in seconds; one minute when omitted.
    interval_secs: Option<u32>,
}

/// Candles response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct CandlesResponse {
    /// Folded candles, ascending by open time.
    pub candles: Vec<Candle>,
}

/// Candle query over stored quotes.
async fn get_candles(
    State(state): State<ApiState>,
    Query(params): Query<CandleParams>,
) -> Result<Json<CandlesResponse>, ApiError> {
    let interval = match params.interval_secs {
        None => CandleInterval::MINUTE,
        Some(secs) => CandleInterval::from_secs(secs).ok_or_else(|| {
            ApiError::bad_request("INVALID_ARGUMENT", "interval_secs must be positive")
        })?,
    };

    let candles = state
        .query
        .candles_between(&params.isin, params.start, params.end, interval)
        .await?;
    Ok(Json(CandlesResponse { candles }))
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct HttpErrorBody {
    /// Stable error code string.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

/// HTTP error wrapper mapping application failures to status codes.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: HttpErrorBody,
}

impl ApiError {
    fn new(status: StatusCode, code: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: HttpErrorBody {
                code: code.to_owned(),
                message: message.into(),
            },
        }
    }

    fn bad_request(code: &str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, code, message)
    }
}

impl From<QueryError> for ApiError {
    fn from(error: QueryError) -> Self {
        match &error {
            QueryError::InvalidArgument { .. } => {
                Self::bad_request("INVALID_ARGUMENT", error.to_string())
            }
            QueryError::InvalidRange { .. } => Self::bad_request("INVALID_RANGE", error.to_string()),
            QueryError::Store(_) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORE_ERROR",
                error.to_string(),
            ),
        }
    }
}

impl From<IngestError> for ApiError {
    fn from(error: IngestError) -> Self {
        match &error {
            IngestError::Parse(_) => Self::bad_request("PARSE_ERROR", error.to_string()),
            IngestError::Dispatch(DispatchError::CascadeDelete { .. }) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "CASCADE_DELETE_FAILED",
                error.to_string(),
            ),
            IngestError::Dispatch(DispatchError::Store(_)) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORE_ERROR",
                error.to_string(),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}
