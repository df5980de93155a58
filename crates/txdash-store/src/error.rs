//! Error types for txdash-store

use std::io;
use thiserror::Error;
use txdash_core::CoreError;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Transaction source unavailable: {message}")]
    Source { message: String },

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl StoreError {
    /// The request itself was rejected (as opposed to the backend failing)
    pub fn is_validation(&self) -> bool {
        matches!(self, StoreError::Core(CoreError::Validation { .. }))
    }
}

/// Result type with StoreError
pub type StoreResult<T> = Result<T, StoreError>;
