//! Error responses.
//!
//! Maps handler outcomes that are not a plain success onto status codes and
//! short plain-text bodies.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use std::time::Duration;
use thiserror::Error;

/// Errors returned by the encoder endpoints.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    /// Submission carried no `password` field, or an empty one.
    #[error("missing password")]
    MissingSecret,

    /// The path segment was not a positive integer.
    #[error("invalid id '{0}'")]
    InvalidId(String),

    /// No record was ever assigned this id.
    #[error("no digest with id {0}")]
    NotFound(u64),

    /// A numeric id too large for any record to carry.
    #[error("no digest with id {0}")]
    OutOfRange(String),

    /// The record exists but its visibility delay has not elapsed.
    #[error("digest {id} not available yet, retry in {:.1}s", .remaining.as_secs_f64())]
    NotReady { id: u64, remaining: Duration },

    /// The server is draining and takes no new submissions.
    #[error("server is shutting down")]
    ShuttingDown,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingSecret | ApiError::InvalidId(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) | ApiError::OutOfRange(_) | ApiError::NotReady { .. } => {
                StatusCode::NOT_FOUND
            }
            ApiError::ShuttingDown => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = (self.status(), format!("{}\n", self)).into_response();

        if let ApiError::NotReady { remaining, .. } = &self {
            // whole seconds, rounded up so a prompt retry succeeds
            let secs = remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0);
            if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }
        response
    }
}
