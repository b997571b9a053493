//! Field values entered into a form
//!
//! A value is one of four shapes. The shape a field accepts is decided by its
//! [`FieldKind`](super::FieldKind); see `FieldKind::accepts`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A value held by a single form field.
///
/// Serialized untagged so that a data record reads as plain JSON:
/// `"text"`, `42`, `true`, `["a", "b"]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Checkbox state before any option is picked
    Flag(bool),
    /// Numeric input
    Number(f64),
    /// Free text, a picked option, or an ISO date
    Text(String),
    /// Selected options of a checkbox group
    Selection(Vec<String>),
}

impl FieldValue {
    /// Shorthand for a text value.
    pub fn text(s: impl Into<String>) -> Self {
        FieldValue::Text(s.into())
    }

    /// Shorthand for a selection value.
    pub fn selection<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldValue::Selection(items.into_iter().map(Into::into).collect())
    }

    /// Returns the text if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Whether the value counts as "nothing entered".
    ///
    /// Empty text, an empty selection and an unchecked flag are empty.
    /// Numbers are never empty: zero is a real answer.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::Selection(items) => items.is_empty(),
            FieldValue::Flag(checked) => !checked,
            FieldValue::Number(_) => false,
        }
    }

    /// Returns the value's name for error messages
    pub fn shape_name(&self) -> &'static str {
        match self {
            FieldValue::Flag(_) => "flag",
            FieldValue::Number(_) => "number",
            FieldValue::Text(_) => "text",
            FieldValue::Selection(_) => "selection",
        }
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Flag(b)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Flag(b) => write!(f, "{}", b),
            FieldValue::Number(n) => f.write_str(&format_number(*n)),
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Selection(items) => f.write_str(&items.join(",")),
        }
    }
}

/// Renders a number the way it is shown to the user.
///
/// Integral values print without a fraction, negative zero prints as `0`,
/// and non-finite values print as `NaN` / `Infinity` / `-Infinity`.
/// Magnitudes of at least 1e21 or below 1e-6 use exponent form with a signed
/// exponent (`1e+21`, `1.5e-7`), as in JavaScript.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }

    let magnitude = n.abs();
    if !(1e-6..1e21).contains(&magnitude) {
        let exponent_form = format!("{:e}", n);
        return match exponent_form.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
            _ => exponent_form,
        };
    }

    n.to_string()
}

/// Current entries of a form, keyed by field id, in entry order.
pub type FormData = IndexMap<String, FieldValue>;
