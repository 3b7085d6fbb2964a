//! Declared output fields of a serializer.
//!
//! A [`FieldSet`] maps each field name to something that knows how to render
//! that field. Selection only ever removes entries; it never adds or renames
//! them.

use std::collections::{BTreeSet, HashSet};

use indexmap::IndexMap;
use serde_json::Value;

/// Renders one output field from a source instance.
pub trait Field: Send + Sync {
    fn to_representation(&self, instance: &Value) -> Value;
}

impl<F: Field + ?Sized> Field for Box<F> {
    fn to_representation(&self, instance: &Value) -> Value {
        (**self).to_representation(instance)
    }
}

/// Copies a key out of a JSON object instance, `null` when missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceField {
    source: String,
}

impl SourceField {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

impl Field for SourceField {
    fn to_representation(&self, instance: &Value) -> Value {
        instance.get(&self.source).cloned().unwrap_or(Value::Null)
    }
}

/// Ordered field name → field mapping.
#[derive(Debug, Clone)]
pub struct FieldSet<F> {
    fields: IndexMap<String, F>,
}

impl<F> Default for FieldSet<F> {
    fn default() -> Self {
        Self {
            fields: IndexMap::new(),
        }
    }
}

impl<F> FieldSet<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field. A later declaration with the same name replaces the
    /// earlier one but keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, field: F) -> Option<F> {
        self.fields.insert(name.into(), field)
    }

    pub fn with(mut self, name: impl Into<String>, field: F) -> Self {
        self.insert(name, field);
        self
    }

    pub fn get(&self, name: &str) -> Option<&F> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &F)> {
        self.fields.iter().map(|(name, field)| (name.as_str(), field))
    }

    /// Remove one field, keeping the order of the rest.
    pub fn remove(&mut self, name: &str) -> Option<F> {
        self.fields.shift_remove(name)
    }

    /// Remove every named field. Names that are not declared are ignored.
    ///
    /// Returns the names that were actually removed.
    pub fn remove_all<'a, I>(&mut self, names: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut removed = BTreeSet::new();
        for name in names {
            if self.fields.shift_remove(name.as_str()).is_some() {
                removed.insert(name.clone());
            }
        }
        removed
    }
}

impl FieldSet<SourceField> {
    /// Declare plain fields that each read the same-named key.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names
            .into_iter()
            .map(|name| {
                let name = name.into();
                let field = SourceField::new(name.clone());
                (name, field)
            })
            .collect()
    }
}

impl<S: Into<String>, F> FromIterator<(S, F)> for FieldSet<F> {
    fn from_iter<I: IntoIterator<Item = (S, F)>>(iter: I) -> Self {
        let mut set = FieldSet::new();
        for (name, field) in iter {
            set.insert(name, field);
        }
        set
    }
}

/// Field names a caller forces at construction time, bypassing the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForcedFields(HashSet<String>);

impl ForcedFields {
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn names(&self) -> &HashSet<String> {
        &self.0
    }
}

impl<S: Into<String>> FromIterator<S> for ForcedFields {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_names_keep_declaration_order() {
        let set = FieldSet::from_names(["id", "name", "email"]);
        assert_eq!(set.names().collect::<Vec<_>>(), ["id", "name", "email"]);
    }

    #[test]
    fn test_remove_all_ignores_unknown() {
        let mut set = FieldSet::from_names(["a", "b", "c"]);
        let drop: Vec<String> = vec!["b".into(), "zzz".into()];

        let removed = set.remove_all(&drop);

        assert_eq!(removed.into_iter().collect::<Vec<_>>(), ["b"]);
        assert_eq!(set.names().collect::<Vec<_>>(), ["a", "c"]);
    }

    #[test]
    fn test_lookup_and_remove() {
        let mut set = FieldSet::from_names(["a", "b"]);
        assert!(set.contains("a"));
        assert_eq!(set.get("b").map(SourceField::source), Some("b"));
        assert!(set.get("zzz").is_none());

        assert!(set.remove("a").is_some());
        assert!(set.remove("a").is_none());
        assert!(set.remove("b").is_some());
        assert!(set.is_empty());
    }

    #[test]
    fn test_redeclared_field_keeps_position() {
        let mut set = FieldSet::from_names(["a", "b"]);
        let previous = set.insert("a", SourceField::new("alias"));

        assert_eq!(previous.map(|field| field.source().to_string()), Some("a".into()));
        assert_eq!(set.names().collect::<Vec<_>>(), ["a", "b"]);
    }

    #[test]
    fn test_source_field_reads_key() {
        let field = SourceField::new("title");
        let instance = json!({ "title": "Hello", "body": "..." });
        assert_eq!(field.to_representation(&instance), json!("Hello"));
    }

    #[test]
    fn test_source_field_missing_is_null() {
        let field = SourceField::new("missing");
        assert_eq!(field.to_representation(&json!({})), Value::Null);
        assert_eq!(field.to_representation(&json!("not an object")), Value::Null);
    }

    #[test]
    fn test_forced_fields_from_iter() {
        let forced: ForcedFields = ["a", "b", "a"].into_iter().collect();
        assert_eq!(forced.len(), 2);
        assert!(forced.contains("a"));
        assert!(!forced.contains("c"));
        assert_eq!(
            forced.names(),
            &HashSet::from(["a".to_string(), "b".to_string()])
        );
    }
}
