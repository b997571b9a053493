//! Form schema type definitions
//!
//! Supported field kinds:
//! - text: single-line text
//! - number: numeric input
//! - textarea: multi-line text
//! - select: one option from a dropdown
//! - radio: one option from a radio group
//! - checkbox: any number of options
//! - date: ISO calendar date
//!
//! The JSON shape is camelCase and matches what the form builder has always
//! persisted, so stored collections stay readable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashSet;

use super::errors::{SchemaError, SchemaResult};
use super::value::FieldValue;

/// Kinds of validation rule a field can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleKind {
    /// Value must be present
    Required,
    /// Text must have at least `threshold` characters
    MinLength,
    /// Text must have at most `threshold` characters
    MaxLength,
    /// Text must look like an email address
    Email,
    /// Text must satisfy the password policy
    Password,
}

impl RuleKind {
    /// Whether rules of this kind need a numeric threshold
    pub fn needs_threshold(&self) -> bool {
        matches!(self, RuleKind::MinLength | RuleKind::MaxLength)
    }

    /// Returns the rule name as stored
    pub fn name(&self) -> &'static str {
        match self {
            RuleKind::Required => "required",
            RuleKind::MinLength => "minLength",
            RuleKind::MaxLength => "maxLength",
            RuleKind::Email => "email",
            RuleKind::Password => "password",
        }
    }
}

/// A single validation rule attached to a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRule {
    /// Rule kind
    #[serde(rename = "type")]
    pub kind: RuleKind,
    /// Length limit for MinLength / MaxLength
    #[serde(
        rename = "value",
        default,
        deserialize_with = "lenient_threshold",
        skip_serializing_if = "Option::is_none"
    )]
    pub threshold: Option<usize>,
    /// Custom error message; empty means the built-in message is used
    #[serde(default)]
    pub message: String,
}

impl ValidationRule {
    /// Create a rule of the given kind with no threshold and no custom message
    pub fn new(kind: RuleKind) -> Self {
        Self {
            kind,
            threshold: None,
            message: String::new(),
        }
    }

    /// Create a required rule
    pub fn required() -> Self {
        Self::new(RuleKind::Required)
    }

    /// Create a minimum length rule
    pub fn min_length(threshold: usize) -> Self {
        Self {
            threshold: Some(threshold),
            ..Self::new(RuleKind::MinLength)
        }
    }

    /// Create a maximum length rule
    pub fn max_length(threshold: usize) -> Self {
        Self {
            threshold: Some(threshold),
            ..Self::new(RuleKind::MaxLength)
        }
    }

    /// Create an email rule
    pub fn email() -> Self {
        Self::new(RuleKind::Email)
    }

    /// Create a password rule
    pub fn password() -> Self {
        Self::new(RuleKind::Password)
    }

    /// Replace the built-in error message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Checks that a threshold is present exactly when the kind needs one.
    pub fn check_structure(&self) -> Result<(), String> {
        match (self.kind.needs_threshold(), self.threshold) {
            (true, None) => Err(format!("{} rule needs a length value", self.kind.name())),
            (false, Some(_)) => Err(format!("{} rule takes no length value", self.kind.name())),
            _ => Ok(()),
        }
    }
}

/// Reads a stored length limit.
///
/// Older collections hold limits as numbers or numeric strings (`5`, `5.0`,
/// `"5"`). Anything that is not a non-negative whole number means no limit,
/// so a single odd rule never makes the whole collection unreadable.
fn lenient_threshold<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let whole = |n: f64| (n.is_finite() && n >= 0.0 && n.fract() == 0.0).then_some(n as usize);

    let threshold = match Value::deserialize(deserializer)? {
        Value::Number(n) => match n.as_u64() {
            Some(n) => usize::try_from(n).ok(),
            None => n.as_f64().and_then(whole),
        },
        Value::String(s) => s.trim().parse::<f64>().ok().and_then(whole),
        _ => None,
    };
    Ok(threshold)
}

/// Field kinds offered by the builder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Number,
    TextArea,
    Select,
    Radio,
    Checkbox,
    Date,
}

impl FieldKind {
    /// Every kind, in palette order
    pub const ALL: [FieldKind; 7] = [
        FieldKind::Text,
        FieldKind::Number,
        FieldKind::TextArea,
        FieldKind::Select,
        FieldKind::Radio,
        FieldKind::Checkbox,
        FieldKind::Date,
    ];

    /// Returns the kind name as stored
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Number => "number",
            FieldKind::TextArea => "textarea",
            FieldKind::Select => "select",
            FieldKind::Radio => "radio",
            FieldKind::Checkbox => "checkbox",
            FieldKind::Date => "date",
        }
    }

    /// Returns the label shown in the field palette
    pub fn label(&self) -> &'static str {
        match self {
            FieldKind::Text => "Text Input",
            FieldKind::Number => "Number Input",
            FieldKind::TextArea => "Text Area",
            FieldKind::Select => "Select Dropdown",
            FieldKind::Radio => "Radio Buttons",
            FieldKind::Checkbox => "Checkboxes",
            FieldKind::Date => "Date Picker",
        }
    }

    /// Whether fields of this kind carry a list of options
    pub fn has_options(&self) -> bool {
        matches!(self, FieldKind::Select | FieldKind::Radio | FieldKind::Checkbox)
    }

    /// Default value given to a freshly added field
    pub fn default_value(&self) -> FieldValue {
        match self {
            FieldKind::Checkbox => FieldValue::Flag(false),
            _ => FieldValue::default(),
        }
    }

    /// Whether a value has a shape this kind accepts.
    ///
    /// Number fields also take raw text, since that is what an input box
    /// hands over before parsing.
    pub fn accepts(&self, value: &FieldValue) -> bool {
        match self {
            FieldKind::Text
            | FieldKind::TextArea
            | FieldKind::Select
            | FieldKind::Radio
            | FieldKind::Date => matches!(value, FieldValue::Text(_)),
            FieldKind::Number => matches!(value, FieldValue::Number(_) | FieldValue::Text(_)),
            FieldKind::Checkbox => {
                matches!(value, FieldValue::Selection(_) | FieldValue::Flag(_))
            }
        }
    }
}

/// A single field of a form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    /// Unique, immutable field id
    pub id: String,
    /// Field kind
    #[serde(rename = "type")]
    pub kind: FieldKind,
    /// Label shown next to the input
    #[serde(default)]
    pub label: String,
    /// Value shown before the user enters anything
    #[serde(default)]
    pub default_value: FieldValue,
    /// Rules checked in declaration order
    #[serde(default)]
    pub validation_rules: Vec<ValidationRule>,
    /// Options for select, radio and checkbox fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    /// Whether the value is computed from other fields
    #[serde(default)]
    pub is_derived: bool,
    /// Parent field ids of a derived field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derived_from: Option<Vec<String>>,
    /// Formula with `{fieldId}` placeholders
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derived_formula: Option<String>,
}

impl FormField {
    /// Create a field of the given kind with that kind's defaults
    pub fn new(id: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            id: id.into(),
            kind,
            label: String::new(),
            default_value: kind.default_value(),
            validation_rules: Vec::new(),
            options: kind.has_options().then(Vec::new),
            is_derived: false,
            derived_from: None,
            derived_formula: None,
        }
    }

    /// Set the label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Append a validation rule
    pub fn with_rule(mut self, rule: ValidationRule) -> Self {
        self.validation_rules.push(rule);
        self
    }

    /// Replace the options list
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    /// Turn this field into a derived field
    pub fn derived<I, S>(mut self, parents: I, formula: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.is_derived = true;
        self.derived_from = Some(parents.into_iter().map(Into::into).collect());
        self.derived_formula = Some(formula.into());
        self
    }

    /// Parent ids, empty when the field is not derived
    pub fn parents(&self) -> &[String] {
        self.derived_from.as_deref().unwrap_or(&[])
    }

    /// Whether `id` is one of this field's parents
    pub fn depends_on(&self, id: &str) -> bool {
        self.is_derived && self.parents().iter().any(|p| p == id)
    }

    /// Validates this field against the fields of its schema.
    ///
    /// `fields` may include this field itself.
    pub fn check_structure(&self, fields: &[FormField]) -> SchemaResult<()> {
        if self.id.trim().is_empty() {
            return Err(SchemaError::invalid_field(&self.id, "field id must not be empty"));
        }

        for rule in &self.validation_rules {
            rule.check_structure()
                .map_err(|reason| SchemaError::invalid_rule(&self.id, reason))?;
        }

        if self.options.is_some() && !self.kind.has_options() {
            return Err(SchemaError::invalid_field(
                &self.id,
                format!("{} fields take no options", self.kind.type_name()),
            ));
        }

        if !self.kind.accepts(&self.default_value) {
            return Err(SchemaError::invalid_field(
                &self.id,
                format!(
                    "{} default value does not fit a {} field",
                    self.default_value.shape_name(),
                    self.kind.type_name()
                ),
            ));
        }

        if !self.is_derived {
            if self.derived_from.is_some() || self.derived_formula.is_some() {
                return Err(SchemaError::invalid_derivation(
                    &self.id,
                    "formula settings on a field that is not derived",
                ));
            }
            return Ok(());
        }

        for parent_id in self.parents() {
            if parent_id == &self.id {
                return Err(SchemaError::invalid_derivation(
                    &self.id,
                    "a field cannot derive from itself",
                ));
            }

            match fields.iter().find(|f| &f.id == parent_id) {
                None => {
                    return Err(SchemaError::invalid_derivation(
                        &self.id,
                        format!("parent '{}' not found", parent_id),
                    ))
                }
                Some(parent) if parent.is_derived => {
                    return Err(SchemaError::invalid_derivation(
                        &self.id,
                        format!("parent '{}' is itself derived", parent_id),
                    ))
                }
                Some(_) => {}
            }
        }

        Ok(())
    }
}

/// Validates a field list: unique ids and every field's own structure.
pub fn validate_fields(fields: &[FormField]) -> SchemaResult<()> {
    let mut seen = HashSet::new();
    for field in fields {
        if !seen.insert(field.id.as_str()) {
            return Err(SchemaError::duplicate_field(&field.id));
        }
    }

    for field in fields {
        field.check_structure(fields)?;
    }

    Ok(())
}

/// A named, ordered collection of fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSchema {
    /// Unique schema id
    pub id: String,
    /// Display name
    pub name: String,
    /// Fields in display order
    pub fields: Vec<FormField>,
    /// When the schema was first saved
    pub created_at: DateTime<Utc>,
}

impl FormSchema {
    /// Create a schema stamped with the current time
    pub fn new(id: impl Into<String>, name: impl Into<String>, fields: Vec<FormField>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            fields,
            created_at: Utc::now(),
        }
    }

    /// Looks up a field by id
    pub fn field(&self, id: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Derived fields in display order
    pub fn derived_fields(&self) -> impl Iterator<Item = &FormField> {
        self.fields.iter().filter(|f| f.is_derived)
    }

    /// Whether any field is derived
    pub fn has_derived_fields(&self) -> bool {
        self.fields.iter().any(|f| f.is_derived)
    }

    /// Validates the schema structure itself (not entered data)
    pub fn validate_structure(&self) -> SchemaResult<()> {
        if self.name.trim().is_empty() {
            return Err(SchemaError::name_required());
        }

        validate_fields(&self.fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaErrorCode;

    fn sample_schema() -> FormSchema {
        let fields = vec![
            FormField::new("price", FieldKind::Number).with_label("Price"),
            FormField::new("qty", FieldKind::Number).with_label("Quantity"),
            FormField::new("total", FieldKind::Number).derived(["price", "qty"], "{price}*{qty}"),
        ];
        FormSchema::new("form_1", "Order", fields)
    }

    #[test]
    fn test_threshold_read_leniently() {
        let read = |value: serde_json::Value| -> Option<usize> {
            let rule: ValidationRule =
                serde_json::from_value(serde_json::json!({"type": "minLength", "value": value}))
                    .unwrap();
            rule.threshold
        };

        assert_eq!(read(serde_json::json!(5)), Some(5));
        assert_eq!(read(serde_json::json!(5.0)), Some(5));
        assert_eq!(read(serde_json::json!("5")), Some(5));
        assert_eq!(read(serde_json::json!(" 12 ")), Some(12));
        assert_eq!(read(serde_json::json!(2.5)), None);
        assert_eq!(read(serde_json::json!(-1)), None);
        assert_eq!(read(serde_json::json!("abc")), None);
        assert_eq!(read(serde_json::json!(null)), None);

        let rule: ValidationRule = serde_json::from_str(r#"{"type": "required"}"#).unwrap();
        assert_eq!(rule.threshold, None);
    }

    #[test]
    fn test_palette_kinds() {
        let labels: Vec<&str> = FieldKind::ALL.iter().map(FieldKind::label).collect();
        assert_eq!(
            labels,
            [
                "Text Input",
                "Number Input",
                "Text Area",
                "Select Dropdown",
                "Radio Buttons",
                "Checkboxes",
                "Date Picker"
            ]
        );

        for kind in FieldKind::ALL {
            let stored = serde_json::to_value(kind).unwrap();
            assert_eq!(stored, kind.type_name());
            assert!(kind.accepts(&kind.default_value()));
        }
    }

    #[test]
    fn test_derived_fields() {
        let schema = sample_schema();
        let ids: Vec<&str> = schema.derived_fields().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, ["total"]);
        assert!(schema.has_derived_fields());
    }

    #[test]
    fn test_schema_structure_valid() {
        assert!(sample_schema().validate_structure().is_ok());
    }

    #[test]
    fn test_blank_name_rejected() {
        let mut schema = sample_schema();
        schema.name = "   ".into();
        let err = schema.validate_structure().unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::FormNameRequired);
    }

    #[test]
    fn test_duplicate_field_ids_rejected() {
        let mut schema = sample_schema();
        schema.fields.push(FormField::new("qty", FieldKind::Text));
        let err = schema.validate_structure().unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::FormDuplicateField);
    }

    #[test]
    fn test_derived_parent_must_exist() {
        let mut schema = sample_schema();
        schema.fields[2] = FormField::new("total", FieldKind::Number).derived(["ghost"], "{ghost}");
        let err = schema.validate_structure().unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::FormInvalidDerivation);
        assert!(err.message().contains("ghost"));
    }

    #[test]
    fn test_derived_parent_cannot_be_derived() {
        let mut schema = sample_schema();
        schema
            .fields
            .push(FormField::new("double", FieldKind::Number).derived(["total"], "{total}*2"));
        let err = schema.validate_structure().unwrap_err();
        assert_eq!(err.field_id(), Some("double"));
    }

    #[test]
    fn test_derived_cannot_reference_itself() {
        let fields = vec![FormField::new("a", FieldKind::Number).derived(["a"], "{a}+1")];
        assert!(validate_fields(&fields).is_err());
    }

    #[test]
    fn test_threshold_required_for_length_rules() {
        let mut rule = ValidationRule::min_length(3);
        assert!(rule.check_structure().is_ok());
        rule.threshold = None;
        assert!(rule.check_structure().is_err());
        assert!(ValidationRule {
            threshold: Some(2),
            ..ValidationRule::email()
        }
        .check_structure()
        .is_err());
    }

    #[test]
    fn test_options_only_on_choice_kinds() {
        let field = FormField::new("name", FieldKind::Text).with_options(["a"]);
        let err = validate_fields(&[field]).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::FormInvalidField);

        assert!(FormField::new("c", FieldKind::Checkbox).options.is_some());
        assert!(FormField::new("t", FieldKind::Text).options.is_none());
    }

    #[test]
    fn test_kind_accepts() {
        assert!(FieldKind::Text.accepts(&FieldValue::text("x")));
        assert!(!FieldKind::Text.accepts(&FieldValue::Number(1.0)));
        assert!(FieldKind::Number.accepts(&FieldValue::Number(1.0)));
        assert!(FieldKind::Number.accepts(&FieldValue::text("1")));
        assert!(FieldKind::Checkbox.accepts(&FieldValue::selection(["a"])));
        assert!(FieldKind::Checkbox.accepts(&FieldValue::Flag(false)));
        assert!(!FieldKind::Select.accepts(&FieldValue::selection(["a"])));
    }

    #[test]
    fn test_json_shape() {
        let field = FormField::new("email", FieldKind::Text)
            .with_label("Email")
            .with_rule(ValidationRule::required())
            .with_rule(ValidationRule::min_length(5).with_message("Too short"));
        let json = serde_json::to_value(&field).unwrap();

        assert_eq!(json["type"], "text");
        assert_eq!(json["defaultValue"], "");
        assert_eq!(json["isDerived"], false);
        assert_eq!(json["validationRules"][1]["type"], "minLength");
        assert_eq!(json["validationRules"][1]["value"], 5);
        assert!(json.get("options").is_none());
    }

    #[test]
    fn test_reads_builder_json() {
        let json = r#"{
            "id": "form_1700000000000",
            "name": "Signup",
            "createdAt": "2024-05-01T10:00:00.000Z",
            "fields": [
                {"id": "field_1", "type": "checkbox", "label": "Topics",
                 "defaultValue": false, "validationRules": [], "options": ["a", "b"]},
                {"id": "field_2", "type": "text", "label": "Sum",
                 "defaultValue": "", "validationRules": [{"type": "required", "message": ""}],
                 "isDerived": true, "derivedFrom": ["field_1"], "derivedFormula": "{field_1}"}
            ]
        }"#;
        let schema: FormSchema = serde_json::from_str(json).unwrap();
        assert_eq!(schema.fields.len(), 2);
        assert_eq!(schema.fields[0].kind, FieldKind::Checkbox);
        assert!(schema.fields[1].depends_on("field_1"));
        assert!(schema.has_derived_fields());
        assert!(schema.validate_structure().is_ok());
    }
}
