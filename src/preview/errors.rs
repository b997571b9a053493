//! Preview errors
//!
//! These reject an edit outright. Validation failures are not errors; they
//! land in the session's error map.

use thiserror::Error;

/// Result type for preview operations
pub type PreviewResult<T> = Result<T, PreviewError>;

/// Preview errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreviewError {
    #[error("Field not found: {0}")]
    UnknownField(String),

    #[error("Field '{0}' is derived and cannot be edited")]
    DerivedField(String),

    #[error("Field '{field_id}' is a {kind} field and does not take a {shape} value")]
    WrongShape {
        field_id: String,
        kind: &'static str,
        shape: &'static str,
    },
}

impl PreviewError {
    /// Stable code for reporting
    pub fn code(&self) -> &'static str {
        match self {
            PreviewError::UnknownField(_) => "FORM_PREVIEW_UNKNOWN_FIELD",
            PreviewError::DerivedField(_) => "FORM_PREVIEW_DERIVED_FIELD",
            PreviewError::WrongShape { .. } => "FORM_PREVIEW_WRONG_SHAPE",
        }
    }
}
