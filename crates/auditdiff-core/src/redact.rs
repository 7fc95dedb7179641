//! Snapshot redaction: strip fields from a tree before diffing.
//!
//! Entity snapshots often carry fields that should never show up in an audit
//! trail (back-references, secrets, bookkeeping timestamps). Redacting both
//! snapshots with the same patterns keeps those fields out of every diff part.
//!
//! # Pattern syntax
//!
//! A pattern is a dot-separated path from the root of the snapshot:
//!
//! - `"password"` strips the top-level field `password`
//! - `"owner.email"` strips `email` inside the object under `owner`
//! - `"members.*.token"` strips `token` one level below `members`: `*` stands
//!   for exactly one array element or one object key, never more
//! - `"*.updatedAt"` strips `updatedAt` at any depth. Only a leading `*.`
//!   floats like this.
//!
//! Arrays are transparent to literal segments, so `"members.token"` also
//! reaches into every element of a `members` array. A path ending in `*` on an
//! array (`"members.*"`) empties the array.

use crate::value::{Object, TreeValue};

/// One step of a pattern path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Key(&'a str),
    /// Exactly one object key or array element.
    Any,
}

impl<'a> Segment<'a> {
    fn parse(segment: &'a str) -> Self {
        match segment {
            "*" => Segment::Any,
            key => Segment::Key(key),
        }
    }

    fn matches_key(self, key: &str) -> bool {
        match self {
            Segment::Key(k) => k == key,
            Segment::Any => true,
        }
    }
}

/// A remaining suffix of a pattern, still to be matched below the current value.
type Path<'p> = &'p [Segment<'p>];

/// Return a copy of `value` with every field matching `patterns` removed.
///
/// # Examples
///
/// ```
/// use auditdiff_core::{json::parse, redact};
///
/// let value = parse(r#"{"name":"Alice","password":"x"}"#).unwrap();
/// let redacted = redact(&value, &["password"]);
/// assert_eq!(redacted, parse(r#"{"name":"Alice"}"#).unwrap());
/// ```
pub fn redact(value: &TreeValue, patterns: &[&str]) -> TreeValue {
    let mut rooted: Vec<Vec<Segment<'_>>> = Vec::new();
    let mut floating: Vec<Vec<Segment<'_>>> = Vec::new();

    for pattern in patterns {
        let segments: Vec<Segment<'_>> = pattern.split('.').map(Segment::parse).collect();
        match segments.split_first() {
            Some((Segment::Any, rest)) if !rest.is_empty() => floating.push(rest.to_vec()),
            _ => rooted.push(segments),
        }
    }

    let rooted: Vec<Path<'_>> = rooted.iter().map(Vec::as_slice).collect();
    let floating: Vec<Path<'_>> = floating.iter().map(Vec::as_slice).collect();
    redact_value(value, &rooted, &floating)
}

/// `active` holds the suffixes that must match starting at `value`;
/// `floating` holds the `*.`-prefixed paths, retried at every object.
fn redact_value<'p>(value: &TreeValue, active: &[Path<'p>], floating: &[Path<'p>]) -> TreeValue {
    if active.is_empty() && floating.is_empty() {
        return value.clone();
    }
    match value {
        TreeValue::Object(obj) => TreeValue::Object(redact_object(obj, active, floating)),
        TreeValue::Array(items) => redact_array(items, active, floating),
        other => other.clone(),
    }
}

fn redact_object<'p>(obj: &Object, active: &[Path<'p>], floating: &[Path<'p>]) -> Object {
    let mut result = Object::with_capacity(obj.len());

    'fields: for (key, child) in obj.iter() {
        let mut below: Vec<Path<'p>> = Vec::new();
        for &path in active.iter().chain(floating) {
            let Some((first, rest)) = path.split_first() else {
                continue;
            };
            if !first.matches_key(key) {
                continue;
            }
            if rest.is_empty() {
                continue 'fields;
            }
            below.push(rest);
        }
        result.push_unique(key.to_string(), redact_value(child, &below, floating));
    }

    result
}

/// A leading `*` consumes the element level; literal segments pass through
/// to every element unchanged.
fn redact_array<'p>(items: &[TreeValue], active: &[Path<'p>], floating: &[Path<'p>]) -> TreeValue {
    let mut per_element: Vec<Path<'p>> = Vec::with_capacity(active.len());
    for &path in active {
        match path.split_first() {
            Some((Segment::Any, [])) => return TreeValue::Array(Vec::new()),
            Some((Segment::Any, rest)) => per_element.push(rest),
            Some((Segment::Key(_), _)) => per_element.push(path),
            None => {}
        }
    }

    TreeValue::Array(
        items
            .iter()
            .map(|item| redact_value(item, &per_element, floating))
            .collect(),
    )
}
