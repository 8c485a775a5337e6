//! Error types for the exercise cache
//!
//! Provides unified error handling using thiserror. The cache facade never
//! hands these to its callers; stores, the codec and storage adapters return
//! them so the facade can log and absorb them in one place.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the exercise cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Nothing cached for the requested lookup
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Storage adapter failed to read, write or remove a blob
    #[error("Storage error: {0}")]
    Storage(String),

    /// A persisted blob exists but does not decode into the expected shape
    #[error("Malformed cache data: {0}")]
    Malformed(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            CacheError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            CacheError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            CacheError::Storage(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            CacheError::Malformed(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            CacheError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the exercise cache.
pub type Result<T> = std::result::Result<T, CacheError>;
