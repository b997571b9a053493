//! Form builder session
//!
//! Holds the draft field list while a form is being composed or edited and
//! enforces schema invariants on every edit, so a draft is always a valid
//! field list. In particular, derived fields may only name existing,
//! non-derived fields as parents.

mod errors;

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::schema::{
    validate_fields, FieldKind, FormField, FormSchema, RuleKind, SchemaError, ValidationRule,
};
use crate::store::SchemaStore;

pub use errors::{BuilderError, BuilderResult};

/// Mints a new field id
pub fn new_field_id() -> String {
    format!("field_{}", Uuid::new_v4().simple())
}

/// Mints a new schema id
pub fn new_form_id() -> String {
    format!("form_{}", Uuid::new_v4().simple())
}

/// Splits a comma-separated option list, dropping blanks.
pub fn parse_options(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|opt| !opt.is_empty())
        .map(String::from)
        .collect()
}

/// Draft state of a form being built
#[derive(Debug, Clone, Default)]
pub struct FormBuilder {
    name: String,
    fields: Vec<FormField>,
    /// Id and creation time of the schema being edited, if any
    origin: Option<(String, DateTime<Utc>)>,
}

impl FormBuilder {
    /// Starts an empty draft.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a draft from a stored schema. Saving replaces that schema.
    pub fn edit(schema: FormSchema) -> Self {
        Self {
            name: schema.name,
            fields: schema.fields,
            origin: Some((schema.id, schema.created_at)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn field(&self, id: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Whether saving will replace an existing schema
    pub fn is_editing(&self) -> bool {
        self.origin.is_some()
    }

    /// Appends a blank field of the given kind and returns its id.
    pub fn add_field(&mut self, kind: FieldKind) -> String {
        let id = new_field_id();
        self.fields.push(FormField::new(id.clone(), kind));
        debug!(field_id = %id, kind = kind.type_name(), "field added");
        id
    }

    /// Replaces the field with id `id`.
    ///
    /// The id cannot change. Clearing `is_derived` drops the parent list and
    /// formula. The edit is rejected if the resulting field list breaks a
    /// schema invariant, including turning a field that other derived fields
    /// read into a derived field.
    pub fn update_field(&mut self, id: &str, mut field: FormField) -> BuilderResult<()> {
        let index = self.index_of(id)?;

        if field.id != id {
            return Err(SchemaError::invalid_field(id, "field id cannot change").into());
        }

        if !field.is_derived {
            field.derived_from = None;
            field.derived_formula = None;
        }

        let mut candidate = self.fields.clone();
        candidate[index] = field;
        validate_fields(&candidate)?;

        self.fields = candidate;
        debug!(field_id = %id, "field updated");
        Ok(())
    }

    /// Applies an in-place change to a field, subject to the same checks as
    /// [`update_field`](Self::update_field).
    pub fn modify_field<F>(&mut self, id: &str, change: F) -> BuilderResult<()>
    where
        F: FnOnce(&mut FormField),
    {
        let mut field = self.fields[self.index_of(id)?].clone();
        change(&mut field);
        self.update_field(id, field)
    }

    /// Removes a field and drops it from every derived field's parents.
    pub fn delete_field(&mut self, id: &str) -> BuilderResult<FormField> {
        let index = self.index_of(id)?;
        let removed = self.fields.remove(index);

        for field in self.fields.iter_mut().filter(|f| f.is_derived) {
            if let Some(parents) = field.derived_from.as_mut() {
                parents.retain(|p| p != id);
            }
        }

        debug!(field_id = %id, "field deleted");
        Ok(removed)
    }

    /// Appends a rule of the given kind with a placeholder message.
    ///
    /// Length rules start with a limit of 1.
    pub fn add_rule(&mut self, id: &str, kind: RuleKind) -> BuilderResult<()> {
        let mut rule = ValidationRule::new(kind)
            .with_message(format!("Please provide a valid {}", kind.name()));
        if kind.needs_threshold() {
            rule.threshold = Some(1);
        }
        self.modify_field(id, |field| field.validation_rules.push(rule))
    }

    /// Replaces the rule at `index`.
    pub fn update_rule(&mut self, id: &str, index: usize, rule: ValidationRule) -> BuilderResult<()> {
        self.check_rule_index(id, index)?;
        self.modify_field(id, |field| field.validation_rules[index] = rule)
    }

    /// Removes the rule at `index`.
    pub fn remove_rule(&mut self, id: &str, index: usize) -> BuilderResult<()> {
        self.check_rule_index(id, index)?;
        self.modify_field(id, |field| {
            field.validation_rules.remove(index);
        })
    }

    /// Replaces a choice field's options from comma-separated text.
    pub fn set_options(&mut self, id: &str, text: &str) -> BuilderResult<()> {
        let options = parse_options(text);
        self.modify_field(id, |field| field.options = Some(options))
    }

    /// Fields that `id` may name as parents: every non-derived field but itself.
    pub fn eligible_parents(&self, id: &str) -> Vec<&FormField> {
        self.fields
            .iter()
            .filter(|f| f.id != id && !f.is_derived)
            .collect()
    }

    /// Validates the draft and persists it under `name`.
    ///
    /// A new draft gets a fresh id and the current time; an edited schema
    /// keeps its id and creation time. After a successful save the draft
    /// tracks the saved schema.
    pub fn save<S: SchemaStore + ?Sized>(
        &mut self,
        name: &str,
        store: &mut S,
    ) -> BuilderResult<FormSchema> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SchemaError::name_required().into());
        }
        if self.fields.is_empty() {
            return Err(SchemaError::empty_form().into());
        }
        validate_fields(&self.fields)?;

        let (id, created_at) = self
            .origin
            .clone()
            .unwrap_or_else(|| (new_form_id(), Utc::now()));

        let schema = FormSchema {
            id,
            name: name.to_string(),
            fields: self.fields.clone(),
            created_at,
        };

        store.save_schema(&schema)?;
        info!(schema_id = %schema.id, name = %schema.name, "form saved");

        self.name = schema.name.clone();
        self.origin = Some((schema.id.clone(), schema.created_at));
        Ok(schema)
    }

    fn index_of(&self, id: &str) -> BuilderResult<usize> {
        self.fields
            .iter()
            .position(|f| f.id == id)
            .ok_or_else(|| SchemaError::unknown_field(id).into())
    }

    fn check_rule_index(&self, id: &str, index: usize) -> BuilderResult<()> {
        let field = &self.fields[self.index_of(id)?];
        if index >= field.validation_rules.len() {
            return Err(BuilderError::RuleIndex {
                field_id: id.to_string(),
                index,
            });
        }
        Ok(())
    }
}
