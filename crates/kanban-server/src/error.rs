//! Error types for the game API server.
//!
//! [`ApiError`] unifies all failure modes into a single enum that can be
//! converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation.
//!
//! Rejected moves are not errors: relocation and assignment answer
//! `200 {"allowed": false}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kanban_core::SessionError;
use kanban_rules::RulesError;

/// Errors that can occur in the API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The requested card was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// The request was malformed.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The request is not legal in the current state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A UUID could not be parsed from the request path.
    #[error("invalid UUID: {0}")]
    InvalidUuid(String),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        let message = err.to_string();
        match err {
            SessionError::WorkerNotFound(_)
            | SessionError::TaskNotFound(_)
            | SessionError::FeatureNotFound(_)
            | SessionError::EntityNotFound(_) => Self::NotFound(message),
            SessionError::InvalidRequest(_)
            | SessionError::Ledger { .. }
            | SessionError::Board { .. }
            | SessionError::Rules {
                source: RulesError::InvalidVacationLength { .. },
            } => Self::BadRequest(message),
            SessionError::IllegalState(_)
            | SessionError::Rules {
                source: RulesError::InvalidTransition { .. },
            } => Self::Conflict(message),
            SessionError::Rules { .. } | SessionError::Clock { .. } => Self::Internal(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::BadRequest(msg) | Self::InvalidUuid(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Conflict(msg) => (StatusCode::CONFLICT, msg),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
