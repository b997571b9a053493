//! Validation engine
//!
//! Three levels of evaluation:
//! - `evaluate_rule`: one rule against one value
//! - `evaluate_field`: a field's rules in order, first failure wins
//! - `evaluate_schema`: every non-derived field against a data record
//!
//! Failures are user-facing messages, never `Err` values.

mod engine;
mod error_map;
mod rules;

pub use engine::{evaluate_field, evaluate_schema};
pub use error_map::FormErrorMap;
pub use rules::{
    evaluate_rule, unmet_password_requirements, EMAIL_MESSAGE, PASSWORD_SYMBOLS,
    REQUIRED_MESSAGE,
};
