//! CLI-specific error types
//!
//! Every CLI error ends the process with a non-zero exit code.

use std::fmt;
use std::io;

use serde_json::Value;

use crate::builder::BuilderError;
use crate::preview::PreviewError;
use crate::schema::SchemaError;
use crate::store::StoreError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (files, stdin/stdout)
    IoError,
    /// Store already initialized
    AlreadyInitialized,
    /// Store not initialized
    NotInitialized,
    /// No schema with the given id
    NotFound,
    /// Imported schema breaks an invariant
    InvalidSchema,
    /// Data record does not fit the schema
    InvalidData,
    /// Submit blocked by validation errors
    SubmitRejected,
    /// Store write failed
    StoreFailed,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "FORM_CLI_CONFIG_ERROR",
            Self::IoError => "FORM_CLI_IO_ERROR",
            Self::AlreadyInitialized => "FORM_CLI_ALREADY_INITIALIZED",
            Self::NotInitialized => "FORM_CLI_NOT_INITIALIZED",
            Self::NotFound => "FORM_CLI_NOT_FOUND",
            Self::InvalidSchema => "FORM_CLI_INVALID_SCHEMA",
            Self::InvalidData => "FORM_CLI_INVALID_DATA",
            Self::SubmitRejected => "FORM_CLI_SUBMIT_REJECTED",
            Self::StoreFailed => "FORM_CLI_STORE_FAILED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
    details: Option<Value>,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Attach structured details to the error response
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Already initialized
    pub fn already_initialized() -> Self {
        Self::new(
            CliErrorCode::AlreadyInitialized,
            "Schema store already initialized",
        )
    }

    /// Not initialized
    pub fn not_initialized() -> Self {
        Self::new(
            CliErrorCode::NotInitialized,
            "Schema store not initialized. Run 'formkit init' first.",
        )
    }

    /// Unknown schema id
    pub fn not_found(id: &str) -> Self {
        Self::new(CliErrorCode::NotFound, format!("Form '{}' not found", id))
    }

    /// Invalid data record
    pub fn invalid_data(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidData, msg)
    }

    /// Submit blocked
    pub fn submit_rejected(first_error: &str) -> Self {
        Self::new(
            CliErrorCode::SubmitRejected,
            format!("Form has validation errors, first in field '{}'", first_error),
        )
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Structured details, if any
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        Self::new(CliErrorCode::StoreFailed, format!("{} ({})", e, e.code()))
    }
}

impl From<SchemaError> for CliError {
    fn from(e: SchemaError) -> Self {
        Self::new(CliErrorCode::InvalidSchema, e.to_string())
    }
}

impl From<BuilderError> for CliError {
    fn from(e: BuilderError) -> Self {
        match e {
            BuilderError::Schema(e) => e.into(),
            BuilderError::Store(e) => e.into(),
            other => Self::new(CliErrorCode::InvalidSchema, other.to_string()),
        }
    }
}

impl From<PreviewError> for CliError {
    fn from(e: PreviewError) -> Self {
        Self::new(CliErrorCode::InvalidData, format!("{} ({})", e, e.code()))
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
