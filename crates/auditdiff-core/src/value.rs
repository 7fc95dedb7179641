//! Tree value model: a closed representation of parsed JSON documents.
//!
//! `TreeValue` mirrors the JSON data model but owns its own object type so that
//! equality is order-independent while iteration stays in insertion order. The
//! insertion order is what makes serialized diff output reproducible.

use std::collections::HashMap;
use std::fmt;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::{Map, Number, Value};

/// The kind tag of a [`TreeValue`], used to detect type changes between snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

/// A JSON-like value. Always finite and acyclic, since it is built from a
/// serialized document rather than a live object graph.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeValue {
    Null,
    Bool(bool),
    /// Keeps the integer/float distinction of the source text: `1` != `1.0`.
    Number(Number),
    String(String),
    Array(Vec<TreeValue>),
    Object(Object),
}

impl TreeValue {
    /// The kind tag of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            TreeValue::Null => ValueKind::Null,
            TreeValue::Bool(_) => ValueKind::Bool,
            TreeValue::Number(_) => ValueKind::Number,
            TreeValue::String(_) => ValueKind::String,
            TreeValue::Array(_) => ValueKind::Array,
            TreeValue::Object(_) => ValueKind::Object,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            TreeValue::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[TreeValue]> {
        match self {
            TreeValue::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Look up a field when this value is an object.
    pub fn get(&self, key: &str) -> Option<&TreeValue> {
        self.as_object().and_then(|obj| obj.get(key))
    }
}

/// Object entries in insertion order, with unique keys.
///
/// Inserting an existing key replaces its value but keeps its original
/// position, which matches how serde_json treats duplicate keys.
#[derive(Debug, Clone, Default)]
pub struct Object {
    entries: Vec<(String, TreeValue)>,
}

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Insert a field, returning the previous value if the key was present.
    pub fn insert(&mut self, key: impl Into<String>, value: TreeValue) -> Option<TreeValue> {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Append a field whose key the caller knows is not yet present.
    pub(crate) fn push_unique(&mut self, key: String, value: TreeValue) {
        debug_assert!(!self.contains_key(&key), "duplicate key {key:?}");
        self.entries.push((key, value));
    }

    pub fn get(&self, key: &str) -> Option<&TreeValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TreeValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Hash index over the entries for constant-time key lookups on wide objects.
    pub(crate) fn index(&self) -> HashMap<&str, &TreeValue> {
        self.iter().collect()
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        // Keys are unique on both sides, so equal lengths plus a match for
        // every key of `self` means the key sets are equal.
        let index = other.index();
        self.entries
            .iter()
            .all(|(k, v)| index.get(k.as_str()).is_some_and(|o| v == *o))
    }
}

/// Collecting follows [`Object::insert`] for repeated keys: first position,
/// last value.
impl<K: Into<String>> FromIterator<(K, TreeValue)> for Object {
    fn from_iter<I: IntoIterator<Item = (K, TreeValue)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut entries: Vec<(String, TreeValue)> = Vec::with_capacity(iter.size_hint().0);
        let mut positions: HashMap<String, usize> = HashMap::with_capacity(entries.capacity());
        for (k, v) in iter {
            let key = k.into();
            match positions.get(&key) {
                Some(&at) => entries[at].1 = v,
                None => {
                    positions.insert(key.clone(), entries.len());
                    entries.push((key, v));
                }
            }
        }
        Object { entries }
    }
}

impl IntoIterator for Object {
    type Item = (String, TreeValue);
    type IntoIter = std::vec::IntoIter<(String, TreeValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

// ---------------------------------------------------------------------------
// Conversions to and from serde_json
// ---------------------------------------------------------------------------

impl From<Value> for TreeValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => TreeValue::Null,
            Value::Bool(b) => TreeValue::Bool(b),
            Value::Number(n) => TreeValue::Number(n),
            Value::String(s) => TreeValue::String(s),
            Value::Array(items) => {
                TreeValue::Array(items.into_iter().map(TreeValue::from).collect())
            }
            // serde_json maps already hold unique keys.
            Value::Object(map) => TreeValue::Object(Object {
                entries: map
                    .into_iter()
                    .map(|(k, v)| (k, TreeValue::from(v)))
                    .collect(),
            }),
        }
    }
}

impl From<&TreeValue> for Value {
    fn from(value: &TreeValue) -> Self {
        match value {
            TreeValue::Null => Value::Null,
            TreeValue::Bool(b) => Value::Bool(*b),
            TreeValue::Number(n) => Value::Number(n.clone()),
            TreeValue::String(s) => Value::String(s.clone()),
            TreeValue::Array(items) => Value::Array(items.iter().map(Value::from).collect()),
            TreeValue::Object(obj) => {
                let mut map = Map::with_capacity(obj.len());
                for (k, v) in obj.iter() {
                    map.insert(k.to_string(), Value::from(v));
                }
                Value::Object(map)
            }
        }
    }
}

impl From<bool> for TreeValue {
    fn from(b: bool) -> Self {
        TreeValue::Bool(b)
    }
}

impl From<i64> for TreeValue {
    fn from(n: i64) -> Self {
        TreeValue::Number(n.into())
    }
}

impl From<u64> for TreeValue {
    fn from(n: u64) -> Self {
        TreeValue::Number(n.into())
    }
}

impl From<&str> for TreeValue {
    fn from(s: &str) -> Self {
        TreeValue::String(s.to_string())
    }
}

impl From<String> for TreeValue {
    fn from(s: String) -> Self {
        TreeValue::String(s)
    }
}

impl From<Vec<TreeValue>> for TreeValue {
    fn from(items: Vec<TreeValue>) -> Self {
        TreeValue::Array(items)
    }
}

impl From<Object> for TreeValue {
    fn from(obj: Object) -> Self {
        TreeValue::Object(obj)
    }
}

// ---------------------------------------------------------------------------
// Serialization
// ---------------------------------------------------------------------------

impl Serialize for TreeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TreeValue::Null => serializer.serialize_unit(),
            TreeValue::Bool(b) => serializer.serialize_bool(*b),
            TreeValue::Number(n) => n.serialize(serializer),
            TreeValue::String(s) => serializer.serialize_str(s),
            TreeValue::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            TreeValue::Object(obj) => obj.serialize(serializer),
        }
    }
}

impl Serialize for Object {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl fmt::Display for TreeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}
