//! Error types for the tracked cache
//!
//! Provides unified error handling using thiserror.

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the store, the caches built on it and the HTTP layer.
///
/// Missing keys are not errors in the library API: reads return `Option`.
/// `NotFound` only exists so the HTTP layer can answer 404.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key not found (HTTP layer only)
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Stored value kind is incompatible with the requested operation
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    /// Transport or connection failure to the backing store
    ///
    /// Raised by networked `KeyValueStore` implementations; `MemoryStore`
    /// never produces it.
    #[error("Backing store unavailable: {0}")]
    BackingStoreUnavailable(String),

    /// A backing store call did not complete within its deadline
    #[error("Backing store call timed out after {0:?}")]
    Timeout(Duration),

    /// Caller-supplied decode failed on a retrieved value
    #[error("Decode error: {0}")]
    Decode(String),

    /// The fetch collaborator failed to retrieve a resource
    #[error("Fetch failed: {0}")]
    Fetch(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CacheError {
    /// Returns true if retrying the call later may succeed.
    ///
    /// The cache never retries on its own: a retried `store()` would count twice.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            CacheError::BackingStoreUnavailable(_) | CacheError::Timeout(_)
        )
    }

    /// Builds a `Decode` error from any displayable cause.
    pub fn decode(cause: impl std::fmt::Display) -> Self {
        CacheError::Decode(cause.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::TypeMismatch(_) => StatusCode::CONFLICT,
            CacheError::BackingStoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            CacheError::Decode(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CacheError::Fetch(_) => StatusCode::BAD_GATEWAY,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the tracked cache.
pub type Result<T> = std::result::Result<T, CacheError>;
