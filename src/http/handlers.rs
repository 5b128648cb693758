//! Endpoint handlers.
//!
//! | Route                | Handler         |
//! |----------------------|-----------------|
//! | `POST/GET /hash`     | [`submit_hash`] |
//! | `GET /hash/{id}`     | [`get_hash`]    |
//! | `GET /stats`         | [`get_stats`]   |
//! | `GET/POST /shutdown` | [`shutdown`]    |
//! | anything else        | [`fallback`]    |

use axum::{
    extract::{
        rejection::{FormRejection, QueryRejection},
        Path, Query, State,
    },
    http::{HeaderMap, StatusCode, Uri},
    response::IntoResponse,
    Form, Json,
};
use std::num::IntErrorKind;
use std::time::Instant;

use crate::http::request::request_id;
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::stats::StatsReport;
use crate::store::DigestLookup;

/// Field carrying the secret in the query string or form body.
pub const SECRET_FIELD: &str = "password";

/// Urlencoded key/value pairs in arrival order, duplicates kept.
pub type FormPairs = Vec<(String, String)>;

/// First `password` value, if present and non-empty.
///
/// Later duplicates are ignored.
fn first_secret(pairs: FormPairs) -> Option<String> {
    pairs
        .into_iter()
        .find(|(key, _)| key == SECRET_FIELD)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

/// Accept a secret and return the id its digest will be available under.
///
/// The secret is read from the `password` query parameter first, then from a
/// urlencoded body. Every attempt that gets past the shutdown check is counted
/// in the statistics, including attempts without a secret or with a query
/// string or body that does not parse.
pub async fn submit_hash(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<FormPairs>, QueryRejection>,
    form: Result<Form<FormPairs>, FormRejection>,
) -> Result<String, ApiError> {
    let started = Instant::now();
    let request_id = request_id(&headers);

    if state.shutdown.is_shutting_down() {
        tracing::debug!(request_id = %request_id, "Rejecting submission during shutdown");
        return Err(ApiError::ShuttingDown);
    }

    let secret = query
        .ok()
        .and_then(|Query(pairs)| first_secret(pairs))
        .or_else(|| form.ok().and_then(|Form(pairs)| first_secret(pairs)));

    let result = match secret {
        Some(secret) => Ok(state.store.submit(secret.as_bytes(), started)),
        None => Err(ApiError::MissingSecret),
    };

    let elapsed = started.elapsed();
    state.stats.record_sample(elapsed);

    match result {
        Ok(id) => {
            metrics::record_submission("accepted", elapsed);
            tracing::info!(request_id = %request_id, id, elapsed_us = elapsed.as_micros() as u64, "Secret accepted");
            Ok(format!("{}\n", id))
        }
        Err(e) => {
            metrics::record_submission("missing_secret", elapsed);
            tracing::warn!(request_id = %request_id, "Submission without password");
            Err(e)
        }
    }
}

/// Return the digest for `id` once its visibility delay has passed.
pub async fn get_hash(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<String, ApiError> {
    let id: u64 = match raw_id.parse::<u64>() {
        Ok(id) if id > 0 => id,
        // larger than any id the store can hand out
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => {
            metrics::record_lookup("unknown");
            return Err(ApiError::OutOfRange(raw_id));
        }
        _ => {
            metrics::record_lookup("invalid");
            return Err(ApiError::InvalidId(raw_id));
        }
    };

    match state.store.lookup(id, Instant::now()) {
        DigestLookup::Ready(digest) => {
            metrics::record_lookup("ready");
            Ok(format!("{}\n", digest))
        }
        DigestLookup::Pending { remaining } => {
            metrics::record_lookup("pending");
            tracing::debug!(id, remaining_ms = remaining.as_millis() as u64, "Digest not visible yet");
            Err(ApiError::NotReady { id, remaining })
        }
        DigestLookup::Unknown => {
            metrics::record_lookup("unknown");
            Err(ApiError::NotFound(id))
        }
    }
}

/// Aggregate submission statistics.
pub async fn get_stats(State(state): State<AppState>) -> Json<StatsReport> {
    Json(state.stats.snapshot().report())
}

/// Ask the server to drain and stop. Repeat calls are acknowledged and ignored.
pub async fn shutdown(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let fired = state.shutdown.request_shutdown();
    metrics::record_shutdown_request(fired);

    if fired {
        tracing::info!(request_id = %request_id(&headers), "Shutdown requested over HTTP");
        (StatusCode::OK, "Shutting down\n")
    } else {
        (StatusCode::OK, "Shutdown already in progress\n")
    }
}

/// Anything not routed above.
pub async fn fallback(uri: Uri) -> impl IntoResponse {
    tracing::debug!(path = %uri.path(), "No handler for path");
    (
        StatusCode::NOT_FOUND,
        format!("No handler for {}\n", uri.path()),
    )
}
