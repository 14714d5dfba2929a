//! Error types for the player service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Store Error ==
/// Failure of the persistence backend or of a file source/sink.
///
/// "Not found" is never a `StoreError`: stores report it through `Option`/`bool`.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Backend could not serve the request
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Underlying file or device failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Data could not be read or written in the expected shape
    #[error("malformed data: {0}")]
    Malformed(String),
}

// == Service Error ==
/// The three failure kinds surfaced by the player service.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Key absent in the store
    #[error("Not found: {0}")]
    NotFound(String),

    /// Candidate rejected by the validator
    #[error("Validation error: {0}")]
    Validation(String),

    /// Store or file I/O failure
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl ServiceError {
    pub fn not_found(id: i64) -> Self {
        ServiceError::NotFound(format!("player with id {} not found", id))
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Config Error ==
/// Invalid runtime configuration.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be positive")]
    NotPositive(&'static str),

    #[error("unknown import policy '{0}' (expected 'fail-fast' or 'best-effort')")]
    UnknownImportPolicy(String),
}

// == Result Type Alias ==
/// Convenience Result type for the service layer.
pub type Result<T> = std::result::Result<T, ServiceError>;
