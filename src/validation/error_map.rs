//! Per-field validation messages

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Field id to error message. An empty message means the field is valid.
///
/// Entries keep insertion order, which for a full evaluation is the schema's
/// field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormErrorMap {
    entries: IndexMap<String, String>,
}

impl FormErrorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the outcome of one field's validation.
    pub fn set(&mut self, field_id: impl Into<String>, error: Option<String>) {
        self.entries.insert(field_id.into(), error.unwrap_or_default());
    }

    /// Message for a field; empty when valid or never checked.
    pub fn get(&self, field_id: &str) -> &str {
        self.entries.get(field_id).map_or("", String::as_str)
    }

    /// Whether any field carries a message
    pub fn has_errors(&self) -> bool {
        self.entries.values().any(|msg| !msg.is_empty())
    }

    /// The first field, in entry order, that carries a message
    pub fn first_error(&self) -> Option<(&str, &str)> {
        self.entries
            .iter()
            .find(|(_, msg)| !msg.is_empty())
            .map(|(id, msg)| (id.as_str(), msg.as_str()))
    }

    /// Fields that carry a message, in entry order
    pub fn errors(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .filter(|(_, msg)| !msg.is_empty())
            .map(|(id, msg)| (id.as_str(), msg.as_str()))
    }

    /// Number of recorded fields, valid ones included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_message_is_not_an_error() {
        let mut map = FormErrorMap::new();
        map.set("a", None);
        map.set("b", Some("bad".into()));
        map.set("c", Some("worse".into()));

        assert!(map.has_errors());
        assert_eq!(map.len(), 3);
        assert_eq!(map.get("a"), "");
        assert_eq!(map.get("missing"), "");
        assert_eq!(map.first_error(), Some(("b", "bad")));
        assert_eq!(map.errors().count(), 2);
    }

    #[test]
    fn test_overwrite_clears_error() {
        let mut map = FormErrorMap::new();
        map.set("a", Some("bad".into()));
        map.set("a", None);
        assert!(!map.has_errors());
        assert_eq!(map.first_error(), None);
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let mut map = FormErrorMap::new();
        map.set("name", Some("This field is required".into()));
        map.set("age", None);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"name":"This field is required","age":""}"#);
    }
}
