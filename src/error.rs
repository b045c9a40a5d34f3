use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Failures surfaced by the repositories. `Validation` is detected before any
/// store interaction; `Overlap` and `PropertyNotFound` abort the admission
/// transaction; the remaining variants are storage failures propagated to the
/// caller untouched.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("{0}")]
    Validation(&'static str),
    /// The candidate range overlaps an existing booking for the property.
    /// Retrying the same request would fail identically, so callers surface
    /// this as a rejection rather than retrying.
    #[error("booking dates overlap an existing booking")]
    Overlap,
    /// Admission was attempted against a property id that has no row.
    #[error("property does not exist")]
    PropertyNotFound,
    #[error("failed to connect to database: {0}")]
    Connection(#[from] diesel::result::ConnectionError),
    #[error("database operation failed: {0}")]
    Database(#[from] diesel::result::Error),
}

/// APIError is the JSON error body written at the HTTP boundary.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    pub status: u16,
}

impl ApiError {
    pub fn new(code: &str, message: &str, status: StatusCode) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            status: status.as_u16(),
        }
    }

    pub fn unauthorized() -> Self {
        Self::new("unauthorized", "unauthorized", StatusCode::UNAUTHORIZED)
    }

    pub fn internal(code: &str, message: &str) -> Self {
        Self::new(code, message, StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}
