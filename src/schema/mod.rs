//! Form schema model
//!
//! A schema is a named, ordered list of typed fields. Fields carry
//! validation rules and may be derived from other fields through a formula.
//!
//! # Invariants
//!
//! - Field ids are unique within a schema and never change
//! - Length rules carry a threshold; other rules do not
//! - Options exist only on select, radio and checkbox fields
//! - A derived field's parents exist, are not derived, and are not itself

mod errors;
mod types;
mod value;

pub use errors::{SchemaError, SchemaErrorCode, SchemaResult};
pub use types::{validate_fields, FieldKind, FormField, FormSchema, RuleKind, ValidationRule};
pub use value::{format_number, FieldValue, FormData};
