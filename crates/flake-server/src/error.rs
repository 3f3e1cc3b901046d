//! Error type for the HTTP service.
//!
//! Every failure maps to `500 Internal Server Error` with the error message as
//! a plain-text body, which keeps `"The clock went backwards!"` and
//! `"Sequence Overflow!"` byte-for-byte compatible with existing clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

pub type Result<T, E = ApiError> = core::result::Result<T, E>;

/// Unified error type for request handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The generator refused to hand out an ID.
    #[error(transparent)]
    Generate(#[from] flake::Error),

    /// The stats snapshot could not be encoded.
    #[error("Failed to encode stats: {0}")]
    Encode(#[from] serde_json::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Generate(err) if err.is_transient() => {
                tracing::warn!(error = ?err, "ID generation failed");
            }
            _ => tracing::error!(error = ?self, "request failed"),
        }

        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}
