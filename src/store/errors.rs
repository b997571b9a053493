//! # Schema Store Errors

use std::io;

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Schema store errors
///
/// Only writes surface these to callers; failed reads degrade to an empty
/// collection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    #[error("Storage quota exceeded: {needed} bytes (max: {limit})")]
    QuotaExceeded { needed: usize, limit: usize },

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    /// Stable code for reporting
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::InvalidKey(_) => "FORM_STORE_INVALID_KEY",
            StoreError::QuotaExceeded { .. } => "FORM_STORE_QUOTA_EXCEEDED",
            StoreError::Io(_) => "FORM_STORE_IO",
            StoreError::Serialization(_) => "FORM_STORE_SERIALIZATION",
        }
    }
}

impl From<io::Error> for StoreError {
    fn from(e: io::Error) -> Self {
        StoreError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}
