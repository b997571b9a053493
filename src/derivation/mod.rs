//! Derivation engine
//!
//! A derived field names its parent fields and a formula containing
//! `{parentId}` placeholders. Computing its value substitutes the parents'
//! current values into the formula and reduces the result with a single
//! arithmetic operator (see [`formula`]).
//!
//! Computation never fails: anything unexpected degrades to the substituted
//! text.

pub mod formula;

use indexmap::IndexMap;
use tracing::debug;

use crate::schema::{FormData, FormField};

pub use formula::{Anomaly, Operator};

/// Derived field id to computed display value
pub type DerivedValues = IndexMap<String, String>;

/// Computes the display value of a derived field.
///
/// Returns an empty string when the field is not derived, has no formula,
/// or declares no parents.
pub fn compute_derived(field: &FormField, data: &FormData) -> String {
    if !field.is_derived {
        return String::new();
    }
    let formula = match field.derived_formula.as_deref() {
        Some(formula) if !formula.is_empty() => formula,
        _ => return String::new(),
    };
    if field.parents().is_empty() {
        return String::new();
    }

    let substituted = substitute(formula, field.parents(), data);

    match formula::evaluate(&substituted) {
        Ok(value) => value,
        Err(anomaly) => {
            debug!(
                field = %field.id,
                formula = %substituted,
                %anomaly,
                "derived value left unevaluated"
            );
            substituted
        }
    }
}

/// Replaces every `{id}` for each parent with that parent's current value.
///
/// Parents without an entry, or with an empty entry, substitute as `""`.
pub fn substitute(formula: &str, parents: &[String], data: &FormData) -> String {
    parents.iter().fold(formula.to_string(), |text, parent_id| {
        let value = data
            .get(parent_id)
            .filter(|v| !v.is_empty())
            .map(ToString::to_string)
            .unwrap_or_default();
        text.replace(&format!("{{{}}}", parent_id), &value)
    })
}

/// Derived fields that read `changed_id`, in field order.
pub fn dependents_of<'a>(fields: &'a [FormField], changed_id: &str) -> Vec<&'a FormField> {
    fields.iter().filter(|f| f.depends_on(changed_id)).collect()
}

/// Computes every derived field of a schema.
pub fn compute_all(fields: &[FormField], data: &FormData) -> DerivedValues {
    fields
        .iter()
        .filter(|f| f.is_derived)
        .map(|f| (f.id.clone(), compute_derived(f, data)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldKind, FieldValue};

    fn data(pairs: &[(&str, FieldValue)]) -> FormData {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn derived(formula: &str) -> FormField {
        FormField::new("out", FieldKind::Text).derived(["a", "b"], formula)
    }

    #[test]
    fn test_sum_of_parents() {
        let d = data(&[("a", "2".into()), ("b", "3".into())]);
        assert_eq!(compute_derived(&derived("{a}+{b}"), &d), "5");
    }

    #[test]
    fn test_division_by_zero_is_skipped() {
        let d = data(&[("a", "10".into()), ("b", "0".into())]);
        assert_eq!(compute_derived(&derived("{a}/{b}"), &d), "10");
    }

    #[test]
    fn test_unparseable_part_counts_as_zero() {
        let d = data(&[("a", "x".into()), ("b", "3".into())]);
        assert_eq!(compute_derived(&derived("{a}+{b}"), &d), "3");
    }

    #[test]
    fn test_numeric_values_substitute() {
        let d = data(&[("a", FieldValue::Number(4.0)), ("b", FieldValue::Number(2.5))]);
        assert_eq!(compute_derived(&derived("{a}*{b}"), &d), "10");
    }

    #[test]
    fn test_absent_parent_substitutes_empty() {
        let d = data(&[("a", "7".into())]);
        assert_eq!(compute_derived(&derived("{a}-{b}"), &d), "7");
        assert_eq!(compute_derived(&derived("{a} and {b}"), &d), "7 and ");
    }

    #[test]
    fn test_all_occurrences_replaced() {
        let d = data(&[("a", "3".into()), ("b", "1".into())]);
        assert_eq!(compute_derived(&derived("{a}*{a}"), &d), "9");
    }

    #[test]
    fn test_literal_text_passes_through() {
        let d = data(&[("a", "Ada".into()), ("b", "Lovelace".into())]);
        assert_eq!(compute_derived(&derived("{a} {b}"), &d), "Ada Lovelace");
    }

    #[test]
    fn test_overflow_is_infinity() {
        let d = data(&[("a", "1e308".into()), ("b", "10".into())]);
        assert_eq!(compute_derived(&derived("{a}*{b}"), &d), "Infinity");
    }

    #[test]
    fn test_not_derived_or_incomplete_is_empty() {
        let d = data(&[("a", "1".into())]);
        assert_eq!(compute_derived(&FormField::new("a", FieldKind::Text), &d), "");

        let mut no_formula = derived("{a}");
        no_formula.derived_formula = None;
        assert_eq!(compute_derived(&no_formula, &d), "");

        let mut empty_formula = derived("{a}");
        empty_formula.derived_formula = Some(String::new());
        assert_eq!(compute_derived(&empty_formula, &d), "");

        let no_parents = FormField::new("out", FieldKind::Text).derived(Vec::<String>::new(), "1+1");
        assert_eq!(compute_derived(&no_parents, &d), "");
    }

    #[test]
    fn test_dependents_and_compute_all() {
        let fields = vec![
            FormField::new("a", FieldKind::Number),
            FormField::new("b", FieldKind::Number),
            FormField::new("sum", FieldKind::Number).derived(["a", "b"], "{a}+{b}"),
            FormField::new("twice", FieldKind::Number).derived(["b"], "{b}*2"),
        ];

        let ids: Vec<_> = dependents_of(&fields, "b").iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, ["sum", "twice"]);
        assert_eq!(dependents_of(&fields, "a").len(), 1);
        assert!(dependents_of(&fields, "sum").is_empty());

        let d = data(&[("a", FieldValue::Number(1.0)), ("b", FieldValue::Number(2.0))]);
        let all = compute_all(&fields, &d);
        assert_eq!(all["sum"], "3");
        assert_eq!(all["twice"], "4");
    }
}
