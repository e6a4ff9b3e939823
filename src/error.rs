//! Error types for the cache service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Error type for the HTTP surface.
///
/// The cache itself never fails; these cover request-level problems only.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key not found in cache (or expired, which reads the same)
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// == Storage Error Enum ==
/// Failure talking to the durable snapshot store.
///
/// Never crosses the cache API boundary; callers of the persistence
/// operations see a logged no-op instead.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Underlying I/O failure (missing permissions, disk full, ...)
    #[error("storage io: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot blob failed to encode or decode
    #[error("snapshot codec: {0}")]
    Codec(#[from] serde_json::Error),

    /// Backend-specific failure
    #[error("storage backend: {0}")]
    Backend(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            CacheError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            CacheError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the HTTP surface.
pub type Result<T> = std::result::Result<T, CacheError>;
