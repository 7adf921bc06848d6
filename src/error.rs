//! Error types for the cache node
//!
//! Provides unified error handling using thiserror.

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for the cache node.
///
/// Errors are `Clone` so one failed load can be handed to every caller that
/// was waiting on it.
#[derive(Error, Debug, Clone)]
pub enum CacheError {
    /// Empty key passed to a lookup
    #[error("key is required")]
    EmptyKey,

    /// No group registered under this name
    #[error("no such group: {0}")]
    GroupNotFound(String),

    /// Misconfiguration that should abort startup
    #[error("configuration error: {0}")]
    Config(String),

    /// Fetching from a peer failed
    #[error("peer error: {0}")]
    Peer(String),

    /// The origin data source failed; passed through unchanged
    #[error("{0}")]
    Origin(Arc<anyhow::Error>),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CacheError {
    /// Wraps an origin failure.
    pub fn origin(err: anyhow::Error) -> Self {
        CacheError::Origin(Arc::new(err))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            CacheError::EmptyKey => StatusCode::BAD_REQUEST,
            CacheError::GroupNotFound(_) => StatusCode::NOT_FOUND,
            CacheError::Peer(_) => StatusCode::BAD_GATEWAY,
            CacheError::Config(_) | CacheError::Origin(_) | CacheError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl PartialEq for CacheError {
    fn eq(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
            && self.to_string() == other.to_string()
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse::new(self.to_string()));

        (self.status_code(), body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache node.
pub type Result<T> = std::result::Result<T, CacheError>;
