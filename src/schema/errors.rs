//! Schema error types
//!
//! Error codes:
//! - FORM_NAME_REQUIRED
//! - FORM_EMPTY
//! - FORM_DUPLICATE_FIELD
//! - FORM_UNKNOWN_FIELD
//! - FORM_INVALID_FIELD
//! - FORM_INVALID_RULE
//! - FORM_INVALID_DERIVATION

use std::fmt;

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Schema name is blank
    FormNameRequired,
    /// Schema has no fields
    FormEmpty,
    /// Two fields share an id
    FormDuplicateField,
    /// Field id not present in the schema
    FormUnknownField,
    /// Field shape does not fit its kind
    FormInvalidField,
    /// Validation rule is malformed
    FormInvalidRule,
    /// Derived field references are invalid
    FormInvalidDerivation,
}

impl SchemaErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::FormNameRequired => "FORM_NAME_REQUIRED",
            SchemaErrorCode::FormEmpty => "FORM_EMPTY",
            SchemaErrorCode::FormDuplicateField => "FORM_DUPLICATE_FIELD",
            SchemaErrorCode::FormUnknownField => "FORM_UNKNOWN_FIELD",
            SchemaErrorCode::FormInvalidField => "FORM_INVALID_FIELD",
            SchemaErrorCode::FormInvalidRule => "FORM_INVALID_RULE",
            SchemaErrorCode::FormInvalidDerivation => "FORM_INVALID_DERIVATION",
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Schema error with the offending field, when there is one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    field_id: Option<String>,
}

impl SchemaError {
    fn new(code: SchemaErrorCode, message: String, field_id: Option<String>) -> Self {
        Self {
            code,
            message,
            field_id,
        }
    }

    /// Create a blank form name error
    pub fn name_required() -> Self {
        Self::new(
            SchemaErrorCode::FormNameRequired,
            "Please enter a form name".into(),
            None,
        )
    }

    /// Create an empty form error
    pub fn empty_form() -> Self {
        Self::new(
            SchemaErrorCode::FormEmpty,
            "A form needs at least one field".into(),
            None,
        )
    }

    /// Create a duplicate field id error
    pub fn duplicate_field(field_id: impl Into<String>) -> Self {
        let id = field_id.into();
        Self::new(
            SchemaErrorCode::FormDuplicateField,
            format!("Field id '{}' is used more than once", id),
            Some(id),
        )
    }

    /// Create an unknown field error
    pub fn unknown_field(field_id: impl Into<String>) -> Self {
        let id = field_id.into();
        Self::new(
            SchemaErrorCode::FormUnknownField,
            format!("Field '{}' not found", id),
            Some(id),
        )
    }

    /// Create an invalid field error
    pub fn invalid_field(field_id: impl Into<String>, reason: impl Into<String>) -> Self {
        let id = field_id.into();
        Self::new(
            SchemaErrorCode::FormInvalidField,
            format!("Field '{}': {}", id, reason.into()),
            Some(id),
        )
    }

    /// Create an invalid rule error
    pub fn invalid_rule(field_id: impl Into<String>, reason: impl Into<String>) -> Self {
        let id = field_id.into();
        Self::new(
            SchemaErrorCode::FormInvalidRule,
            format!("Field '{}': {}", id, reason.into()),
            Some(id),
        )
    }

    /// Create an invalid derivation error
    pub fn invalid_derivation(field_id: impl Into<String>, reason: impl Into<String>) -> Self {
        let id = field_id.into();
        Self::new(
            SchemaErrorCode::FormInvalidDerivation,
            format!("Derived field '{}': {}", id, reason.into()),
            Some(id),
        )
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the offending field id if applicable
    pub fn field_id(&self) -> Option<&str> {
        self.field_id.as_deref()
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
