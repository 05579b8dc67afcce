//! Error types for the binmap API.
//!
//! Errors serialize as JSON bodies with an `error` message and a
//! machine-readable `code`, mapped onto the appropriate HTTP status.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use binmap_core::{BinmapError, StoreError};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Request contains invalid input data.
    InvalidInput,

    /// Required field is missing from the request.
    MissingField,

    /// No location with the requested id exists.
    LocationNotFound,

    /// Neither the gateway nor the local fallback accepted a write.
    StorageUnavailable,

    /// Internal server error.
    InternalError,
}

impl ErrorCode {
    /// The HTTP status code for this error code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::InvalidInput | ErrorCode::MissingField => StatusCode::BAD_REQUEST,
            ErrorCode::LocationNotFound => StatusCode::NOT_FOUND,
            ErrorCode::StorageUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Structured API error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub error: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            error: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    pub fn missing_field(field: &str) -> Self {
        Self::new(ErrorCode::MissingField, format!("{field} required"))
    }

    pub fn not_found(id: Uuid) -> Self {
        Self::new(ErrorCode::LocationNotFound, format!("no location with id {id}"))
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.code, self.error)
    }
}

impl From<BinmapError> for ApiError {
    fn from(err: BinmapError) -> Self {
        match &err {
            BinmapError::Store(StoreError::BothBackendsFailed { .. }) => {
                Self::new(ErrorCode::StorageUnavailable, err.to_string())
            }
            _ => Self::internal_error(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status_code(), Json(self)).into_response()
    }
}

/// Result type alias for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;
