//! formkit - form schemas with rule-based validation and derived fields
//!
//! A form is an ordered list of typed fields. Fields carry validation rules
//! and may be derived from other fields through a small arithmetic formula.
//! Schemas are kept in a pluggable key-value store.

pub mod builder;
pub mod cli;
pub mod derivation;
pub mod observability;
pub mod preview;
pub mod schema;
pub mod store;
pub mod validation;
