//! Validation Property Tests
//!
//! Rule evaluation, per-field short-circuiting and whole-form evaluation:
//! - Required fails on empty text, empty selection and absent values
//! - Length limits count characters of text values only
//! - Email and password checks apply only to entered values
//! - A field reports only its first failing rule
//! - Form evaluation is idempotent and skips derived fields

use formkit::schema::{FieldKind, FieldValue, FormData, FormField, RuleKind, ValidationRule};
use formkit::validation::{
    evaluate_field, evaluate_rule, evaluate_schema, unmet_password_requirements,
};

// =============================================================================
// Helper Functions
// =============================================================================

fn text(s: &str) -> FieldValue {
    FieldValue::text(s)
}

fn check(rule: &ValidationRule, value: FieldValue) -> Option<String> {
    evaluate_rule(rule, Some(&value))
}

fn signup_fields() -> Vec<FormField> {
    vec![
        FormField::new("username", FieldKind::Text)
            .with_rule(ValidationRule::required())
            .with_rule(ValidationRule::min_length(3))
            .with_rule(ValidationRule::max_length(12)),
        FormField::new("email", FieldKind::Text)
            .with_rule(ValidationRule::required())
            .with_rule(ValidationRule::email()),
        FormField::new("password", FieldKind::Text).with_rule(ValidationRule::password()),
        FormField::new("topics", FieldKind::Checkbox)
            .with_options(["rust", "go"])
            .with_rule(ValidationRule::required()),
        FormField::new("a", FieldKind::Number),
        FormField::new("b", FieldKind::Number),
        FormField::new("sum", FieldKind::Number)
            .with_rule(ValidationRule::required())
            .derived(["a", "b"], "{a}+{b}"),
    ]
}

// =============================================================================
// Required Tests
// =============================================================================

/// Empty text, empty selection and a missing entry all fail Required.
#[test]
fn test_required_rejects_empty_values() {
    let rule = ValidationRule::required();

    assert_eq!(check(&rule, text("")).as_deref(), Some("This field is required"));
    assert!(check(&rule, FieldValue::Selection(vec![])).is_some());
    assert!(evaluate_rule(&rule, None).is_some());
}

/// Any non-empty value passes Required.
#[test]
fn test_required_accepts_present_values() {
    let rule = ValidationRule::required();

    assert!(check(&rule, text("x")).is_none());
    assert!(check(&rule, FieldValue::selection(["a"])).is_none());
    assert!(check(&rule, FieldValue::Number(0.0)).is_none());
    assert!(check(&rule, FieldValue::Flag(true)).is_none());
}

// =============================================================================
// Length Tests
// =============================================================================

/// MinLength 5 rejects four characters and accepts five.
#[test]
fn test_min_length_boundary() {
    let rule = ValidationRule::min_length(5);

    assert_eq!(
        check(&rule, text("abcd")).as_deref(),
        Some("Minimum 5 characters required")
    );
    assert!(check(&rule, text("abcde")).is_none());
}

/// MaxLength counts characters, not bytes.
#[test]
fn test_max_length_counts_characters() {
    let rule = ValidationRule::max_length(3);

    assert!(check(&rule, text("äöü")).is_none());
    assert_eq!(
        check(&rule, text("abcd")).as_deref(),
        Some("Maximum 3 characters allowed")
    );
}

/// Length rules never fail non-text values.
#[test]
fn test_length_rules_ignore_non_text() {
    let min = ValidationRule::min_length(5);
    let max = ValidationRule::max_length(1);

    assert!(check(&min, FieldValue::Number(1.0)).is_none());
    assert!(check(&max, FieldValue::selection(["a", "b"])).is_none());
    assert!(evaluate_rule(&min, None).is_none());
}

// =============================================================================
// Email and Password Tests
// =============================================================================

/// Email shape check.
#[test]
fn test_email_rule() {
    let rule = ValidationRule::email();

    assert!(check(&rule, text("a@b.co")).is_none());
    assert_eq!(
        check(&rule, text("a@b")).as_deref(),
        Some("Please enter a valid email address")
    );
    assert!(check(&rule, text("a b@c.com")).is_some());
    assert!(check(&rule, text("")).is_none());
}

/// Password message lists each unmet requirement.
#[test]
fn test_password_rule() {
    let rule = ValidationRule::password();

    assert!(check(&rule, text("Abcdef1!")).is_none());

    let message = check(&rule, text("abcdef1!")).unwrap();
    assert!(message.contains("one uppercase letter"));
    assert!(!message.contains("one lowercase letter"));

    assert_eq!(
        unmet_password_requirements("abc"),
        vec![
            "at least 8 characters",
            "one uppercase letter",
            "one number",
            "one symbol"
        ]
    );
}

/// A custom message replaces the default one.
#[test]
fn test_custom_message_overrides_default() {
    let rule = ValidationRule::new(RuleKind::Email).with_message("Bad address");
    assert_eq!(check(&rule, text("nope")).as_deref(), Some("Bad address"));
}

// =============================================================================
// Field and Form Tests
// =============================================================================

/// Only the first failing rule is reported.
#[test]
fn test_field_short_circuits() {
    let field = FormField::new("f", FieldKind::Text)
        .with_rule(ValidationRule::min_length(10))
        .with_rule(ValidationRule::email());

    assert_eq!(
        evaluate_field(&field, Some(&text("bad"))).as_deref(),
        Some("Minimum 10 characters required")
    );
}

/// A field without rules is always valid.
#[test]
fn test_field_without_rules() {
    let field = FormField::new("f", FieldKind::Text);
    assert!(evaluate_field(&field, None).is_none());
}

/// Form evaluation reports every editable field and skips derived ones.
#[test]
fn test_schema_evaluation() {
    let fields = signup_fields();
    let mut data = FormData::new();
    data.insert("username".into(), text("al"));
    data.insert("email".into(), text("al@example.com"));
    data.insert("password".into(), text("weak"));

    let errors = evaluate_schema(&fields, &data);

    assert_eq!(errors.get("username"), "Minimum 3 characters required");
    assert_eq!(errors.get("email"), "");
    assert!(errors.get("password").starts_with("Password must contain"));
    assert_eq!(errors.get("topics"), "This field is required");
    assert_eq!(errors.get("sum"), "");
    assert_eq!(errors.first_error().map(|(id, _)| id), Some("username"));
}

/// Evaluating twice with the same inputs gives the same map.
#[test]
fn test_schema_evaluation_is_idempotent() {
    let fields = signup_fields();
    let mut data = FormData::new();
    data.insert("username".into(), text("someone"));
    data.insert("topics".into(), FieldValue::selection(["rust"]));

    let first = evaluate_schema(&fields, &data);
    for _ in 0..10 {
        assert_eq!(evaluate_schema(&fields, &data), first);
    }
}
