//! # File Storage Errors

use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// File storage errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    // Request errors
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid name: {0}")]
    InvalidName(String),

    // Object errors
    #[error("Object not found: {0}")]
    NotFound(String),

    // Backend errors
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    // Signed link errors
    #[error("Link generation failed: {0}")]
    LinkGenerationError(String),

    #[error("Link expired")]
    LinkExpired,

    #[error("Invalid signature")]
    InvalidSignature,
}

impl StorageError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            StorageError::MissingField(_) => 400,
            StorageError::InvalidName(_) => 400,
            StorageError::NotFound(_) => 404,
            StorageError::StoreUnavailable(_) => 503,
            StorageError::LinkGenerationError(_) => 500,
            StorageError::LinkExpired => 403,
            StorageError::InvalidSignature => 403,
        }
    }

    /// Stable machine-readable kind, used as a log field
    pub fn kind(&self) -> &'static str {
        match self {
            StorageError::MissingField(_) => "MISSING_FIELD",
            StorageError::InvalidName(_) => "INVALID_NAME",
            StorageError::NotFound(_) => "NOT_FOUND",
            StorageError::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            StorageError::LinkGenerationError(_) => "LINK_GENERATION_ERROR",
            StorageError::LinkExpired => "LINK_EXPIRED",
            StorageError::InvalidSignature => "INVALID_SIGNATURE",
        }
    }

    pub(crate) fn unavailable(e: impl std::fmt::Display) -> Self {
        StorageError::StoreUnavailable(e.to_string())
    }
}
