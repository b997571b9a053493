//! Builder errors

use thiserror::Error;

use crate::schema::SchemaError;
use crate::store::StoreError;

/// Result type for builder operations
pub type BuilderResult<T> = Result<T, BuilderError>;

/// Builder errors: a rejected edit or a failed save
#[derive(Debug, Clone, Error)]
pub enum BuilderError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("Failed to save form: {0}")]
    Store(#[from] StoreError),

    #[error("Field '{field_id}' has no rule at index {index}")]
    RuleIndex { field_id: String, index: usize },
}

impl BuilderError {
    /// Stable code for reporting
    pub fn code(&self) -> &'static str {
        match self {
            BuilderError::Schema(e) => e.code().code(),
            BuilderError::Store(e) => e.code(),
            BuilderError::RuleIndex { .. } => "FORM_RULE_INDEX",
        }
    }
}
