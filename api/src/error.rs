//! Error types for the HTTP layer.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use thiserror::Error;
use tutorial_store::StoreError;

/// Result type for HTTP handlers and router construction.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors surfaced by the API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No tutorial with the given id.
    #[error("tutorial not found: {0}")]
    NotFound(i64),

    /// The request carried no body (or a JSON `null`).
    #[error("request body is required")]
    MissingBody,

    /// The request body is not a valid tutorial document.
    #[error("invalid request body: {0}")]
    InvalidBody(#[from] serde_json::Error),

    /// The request body is not declared as JSON.
    #[error("unsupported content type: {0}")]
    UnsupportedMediaType(String),

    /// Invalid server configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Unexpected failure while handling a request.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::MissingBody | ApiError::Config(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ApiError::NotFound(id),
        }
    }
}

/// JSON body sent with error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            // Missing records answer with an empty body.
            ApiError::NotFound(id) => {
                tracing::debug!(id, "tutorial not found");
                status.into_response()
            }
            other => {
                if status.is_server_error() {
                    tracing::error!(error = %other, "request failed");
                } else {
                    tracing::debug!(error = %other, "request rejected");
                }
                (status, Json(ErrorBody { error: other.to_string() })).into_response()
            }
        }
    }
}
