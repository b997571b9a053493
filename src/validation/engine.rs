//! Field and schema evaluation
//!
//! Evaluation is pure: the same fields and data always produce the same
//! messages, and nothing is mutated.

use crate::schema::{FieldValue, FormData, FormField};

use super::error_map::FormErrorMap;
use super::rules::evaluate_rule;

/// Evaluates a field's rules in declaration order.
///
/// Stops at the first failing rule and returns its message.
pub fn evaluate_field(field: &FormField, value: Option<&FieldValue>) -> Option<String> {
    field
        .validation_rules
        .iter()
        .find_map(|rule| evaluate_rule(rule, value))
}

/// Evaluates every non-derived field against the data record.
///
/// Derived fields are skipped; their correctness follows from their inputs.
/// A field with no entry in `data` is evaluated as having no value.
pub fn evaluate_schema(fields: &[FormField], data: &FormData) -> FormErrorMap {
    let mut errors = FormErrorMap::new();

    for field in fields.iter().filter(|f| !f.is_derived) {
        errors.set(&field.id, evaluate_field(field, data.get(&field.id)));
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldKind, ValidationRule};

    fn signup_fields() -> Vec<FormField> {
        vec![
            FormField::new("email", FieldKind::Text)
                .with_rule(ValidationRule::min_length(10).with_message("Too short"))
                .with_rule(ValidationRule::email()),
            FormField::new("name", FieldKind::Text).with_rule(ValidationRule::required()),
            FormField::new("greeting", FieldKind::Text)
                .with_rule(ValidationRule::required())
                .derived(["name"], "Hello {name}"),
        ]
    }

    #[test]
    fn test_evaluate_field_short_circuits() {
        let fields = signup_fields();
        let value = FieldValue::text("bad");
        assert_eq!(
            evaluate_field(&fields[0], Some(&value)).as_deref(),
            Some("Too short")
        );
    }

    #[test]
    fn test_evaluate_field_reaches_later_rules() {
        let fields = signup_fields();
        let value = FieldValue::text("not-an-email-address");
        assert_eq!(
            evaluate_field(&fields[0], Some(&value)).as_deref(),
            Some("Please enter a valid email address")
        );
    }

    #[test]
    fn test_field_without_rules_is_valid() {
        let field = FormField::new("free", FieldKind::Text);
        assert!(evaluate_field(&field, None).is_none());
    }

    #[test]
    fn test_evaluate_schema_skips_derived() {
        let fields = signup_fields();
        let errors = evaluate_schema(&fields, &FormData::new());

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("name"), "This field is required");
        assert_eq!(errors.get("email"), "");
        assert_eq!(errors.get("greeting"), "");
    }

    #[test]
    fn test_evaluate_schema_all_valid() {
        let fields = signup_fields();
        let mut data = FormData::new();
        data.insert("email".into(), FieldValue::text("ada@example.org"));
        data.insert("name".into(), FieldValue::text("Ada"));

        assert!(!evaluate_schema(&fields, &data).has_errors());
    }

    #[test]
    fn test_evaluate_schema_is_idempotent() {
        let fields = signup_fields();
        let mut data = FormData::new();
        data.insert("email".into(), FieldValue::text("x"));

        assert_eq!(evaluate_schema(&fields, &data), evaluate_schema(&fields, &data));
    }
}
