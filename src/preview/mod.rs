//! Form preview session
//!
//! Renders a saved schema headlessly: holds the entered data and current
//! error map, re-validates a field whenever it changes, recomputes the
//! derived fields that read it, and gates submission on a full validation.

mod errors;

use std::mem;

use tracing::{debug, info};

use crate::derivation::{compute_all, compute_derived, dependents_of, DerivedValues};
use crate::schema::{FieldValue, FormData, FormSchema};
use crate::validation::{evaluate_field, evaluate_schema, FormErrorMap};

pub use errors::{PreviewError, PreviewResult};

/// Result of a submit attempt
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Every field passed; the session has been reset
    Accepted {
        /// Data as entered
        data: FormData,
        /// Derived values at submit time
        derived: DerivedValues,
    },
    /// At least one field failed; data is kept for correction
    Rejected {
        /// Full error map, valid fields included
        errors: FormErrorMap,
        /// First failing field in schema order
        first_error: String,
    },
}

impl SubmitOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitOutcome::Accepted { .. })
    }
}

/// A live preview of one schema
#[derive(Debug, Clone)]
pub struct FormPreview {
    schema: FormSchema,
    data: FormData,
    errors: FormErrorMap,
}

impl FormPreview {
    pub fn new(schema: FormSchema) -> Self {
        Self {
            schema,
            data: FormData::new(),
            errors: FormErrorMap::new(),
        }
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    /// Entered data, derived fields excluded
    pub fn data(&self) -> &FormData {
        &self.data
    }

    /// Errors as of the last edit or submit
    pub fn errors(&self) -> &FormErrorMap {
        &self.errors
    }

    /// Current message for a field; empty when valid.
    pub fn error(&self, field_id: &str) -> &str {
        self.errors.get(field_id)
    }

    /// The value to display for a field.
    ///
    /// Derived fields show their computed text; other fields show the entered
    /// value, falling back to the field's default. `None` for unknown ids.
    pub fn value(&self, field_id: &str) -> Option<FieldValue> {
        let field = self.schema.field(field_id)?;

        if field.is_derived {
            return Some(FieldValue::Text(compute_derived(field, &self.data)));
        }

        Some(
            self.data
                .get(field_id)
                .cloned()
                .unwrap_or_else(|| field.default_value.clone()),
        )
    }

    /// Records an edit to a field.
    ///
    /// Re-validates that field and returns the recomputed values of the
    /// derived fields that read it.
    pub fn set_value(&mut self, field_id: &str, value: FieldValue) -> PreviewResult<DerivedValues> {
        let field = self
            .schema
            .field(field_id)
            .ok_or_else(|| PreviewError::UnknownField(field_id.to_string()))?;

        if field.is_derived {
            return Err(PreviewError::DerivedField(field_id.to_string()));
        }
        if !field.kind.accepts(&value) {
            return Err(PreviewError::WrongShape {
                field_id: field_id.to_string(),
                kind: field.kind.type_name(),
                shape: value.shape_name(),
            });
        }

        let error = evaluate_field(field, Some(&value));
        self.data.insert(field_id.to_string(), value);
        self.errors.set(field_id, error);

        let recomputed: DerivedValues = dependents_of(&self.schema.fields, field_id)
            .into_iter()
            .map(|d| (d.id.clone(), compute_derived(d, &self.data)))
            .collect();

        debug!(
            field_id = %field_id,
            error = %self.errors.get(field_id),
            recomputed = recomputed.len(),
            "field changed"
        );
        Ok(recomputed)
    }

    /// Records several edits in order. Stops at the first rejected edit.
    pub fn set_values<I>(&mut self, values: I) -> PreviewResult<()>
    where
        I: IntoIterator<Item = (String, FieldValue)>,
    {
        for (field_id, value) in values {
            self.set_value(&field_id, value)?;
        }
        Ok(())
    }

    /// Every derived field's current value
    pub fn derived_values(&self) -> DerivedValues {
        compute_all(&self.schema.fields, &self.data)
    }

    /// Validates the whole form without changing the session.
    pub fn check(&self) -> FormErrorMap {
        evaluate_schema(&self.schema.fields, &self.data)
    }

    /// Validates the whole form and, if it passes, hands back the entered
    /// data and resets the session.
    pub fn submit(&mut self) -> SubmitOutcome {
        let errors = self.check();

        if let Some((first, _)) = errors.first_error() {
            let first_error = first.to_string();
            info!(
                schema_id = %self.schema.id,
                failing = errors.errors().count(),
                first_error = %first_error,
                "submit rejected"
            );
            self.errors = errors.clone();
            return SubmitOutcome::Rejected {
                errors,
                first_error,
            };
        }

        let derived = self.derived_values();
        let data = mem::take(&mut self.data);
        self.errors.clear();

        info!(schema_id = %self.schema.id, fields = data.len(), "submit accepted");
        SubmitOutcome::Accepted { data, derived }
    }

    /// Drops all entered data and errors.
    pub fn reset(&mut self) {
        self.data.clear();
        self.errors.clear();
    }
}
