//! Error handling for the backend API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use vibe_cards_core::{CoreError, StoreError};

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            CoreError::Store(source) => Self::Storage(source),
            CoreError::UnknownList(_) | CoreError::CardNotFound(_) => Self::NotFound(message),
            CoreError::InvalidListName(_) => Self::BadRequest(message),
            CoreError::DuplicateList(_)
            | CoreError::LastList
            | CoreError::InvalidTransition { .. }
            | CoreError::ModeUnavailable(_)
            | CoreError::AlreadyAnswered
            | CoreError::NotRevealed
            | CoreError::NoCards => Self::Conflict(message),
            CoreError::OutOfRange { .. } => Self::Internal(message),
        }
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            // Deck state stays applied in memory; the client may retry the save.
            ApiError::Storage(_) => (StatusCode::SERVICE_UNAVAILABLE, "storage_error"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}

/// Result type alias for API operations
pub type Result<T> = std::result::Result<T, ApiError>;
