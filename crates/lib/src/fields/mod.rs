//! Field sets submitted by forms and the value helpers shared by the adapter
//! and the account stores.
//!
//! A [`FieldSet`] is an insertion-ordered map from field name to a JSON value.
//! `Value::Null` plays the role of "unset": a field present with a null value
//! asks for the stored value to be removed.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Ordered mapping from field name to value.
///
/// Inserting an existing key replaces its value in place, so merging field sets
/// keeps the position of the first occurrence and appends new keys at the end.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldSet(Map<String, Value>);

impl FieldSet {
    /// Create an empty field set.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert a field, returning the previous value if there was one.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(name.into(), value.into())
    }

    /// Get the value of a field.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Get a field as a string slice, if it holds a string.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    /// Whether the field set contains the given field name.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Remove a field, preserving the order of the remaining fields.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.0.shift_remove(name)
    }

    /// Keep only the fields for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&str, &Value) -> bool) {
        self.0.retain(|name, value| keep(name, value));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Iterate over field names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Overlay `other` on top of this set: values from `other` win.
    pub fn merge(&mut self, other: &FieldSet) {
        for (name, value) in other.iter() {
            self.0.insert(name.clone(), value.clone());
        }
    }

    /// Merge several field sets left to right; later sets take precedence.
    pub fn layered<'a>(layers: impl IntoIterator<Item = &'a FieldSet>) -> FieldSet {
        let mut merged = FieldSet::new();
        for layer in layers {
            merged.merge(layer);
        }
        merged
    }

    /// Split into `(matching, rest)` according to `predicate` on the field name.
    pub fn split_by(self, mut predicate: impl FnMut(&str) -> bool) -> (FieldSet, FieldSet) {
        let mut matching = FieldSet::new();
        let mut rest = FieldSet::new();
        for (name, value) in self.0 {
            if predicate(&name) {
                matching.0.insert(name, value);
            } else {
                rest.0.insert(name, value);
            }
        }
        (matching, rest)
    }

    /// Borrow the underlying JSON map.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for FieldSet {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<FieldSet> for Value {
    fn from(fields: FieldSet) -> Self {
        Value::Object(fields.0)
    }
}

impl TryFrom<Value> for FieldSet {
    type Error = Value;

    /// Only JSON objects convert; anything else is handed back unchanged.
    fn try_from(value: Value) -> std::result::Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(other),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for FieldSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}

impl IntoIterator for FieldSet {
    type Item = (String, Value);
    type IntoIter = serde_json::map::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a FieldSet {
    type Item = (&'a String, &'a Value);
    type IntoIter = serde_json::map::Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Whether a value counts as unset.
pub fn is_unset(value: &Value) -> bool {
    value.is_null()
}

/// Whether a value is the empty string.
pub fn is_empty_string(value: &Value) -> bool {
    matches!(value, Value::String(s) if s.is_empty())
}

/// Trim surrounding whitespace from string values; other values pass through.
pub fn trimmed(value: Value) -> Value {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.len() == s.len() {
                Value::String(s)
            } else {
                Value::String(trimmed.to_string())
            }
        }
        other => other,
    }
}

/// Normalize a read value: null and the empty string both become `None`.
pub fn value_or_null(value: Option<Value>) -> Option<Value> {
    value.filter(|v| !is_unset(v) && !is_empty_string(v))
}

/// Render a scalar value as text.
///
/// Strings pass through, numbers use their JSON spelling, `true` becomes `"1"`
/// and `false` the empty string. Null yields `None`; arrays and objects are
/// rendered as compact JSON.
pub fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(true) => Some("1".to_string()),
        Value::Bool(false) => Some(String::new()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

/// Split a dotted field path into its base field name and the remaining segments.
///
/// `"address.city"` yields `("address", ["city"])`; a path without dots is just
/// the base name.
pub fn split_path(path: &str) -> (&str, Vec<&str>) {
    let mut segments = path.split('.');
    let base = segments.next().unwrap_or_default();
    (base, segments.collect())
}

/// Descend into a structured value along `segments`.
///
/// Object segments are looked up by key, array segments by numeric index.
pub fn resolve_path<'a>(value: &'a Value, segments: &[&str]) -> Option<&'a Value> {
    segments
        .iter()
        .try_fold(value, |current, segment| match current {
            Value::Object(map) => map.get(*segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
}
