//! Three-way structural diff of two [`TreeValue`]s.
//!
//! The diff splits an old/new pair into what was removed or changed (old side),
//! what was added or changed (new side), and what stayed the same:
//!
//! - **Different kinds**: full replacement, nothing unchanged.
//! - **Objects**: compared key by key, recursing into keys present on both sides.
//! - **Arrays and scalars**: compared as whole values. Arrays are never diffed
//!   per index.
//!
//! An object bucket that ends up with no keys is reported as absent rather than
//! as `{}`, so emptiness propagates upward as "no contribution".
//!
//! # Example
//! ```
//! use auditdiff_core::{diff, json::parse};
//!
//! let old = parse(r#"{"a":1,"b":2}"#).unwrap();
//! let new = parse(r#"{"b":2,"c":3}"#).unwrap();
//! let result = diff(&old, &new);
//! assert_eq!(result.removed, Some(parse(r#"{"a":1}"#).unwrap()));
//! assert_eq!(result.added, Some(parse(r#"{"c":3}"#).unwrap()));
//! assert_eq!(result.unchanged, Some(parse(r#"{"b":2}"#).unwrap()));
//! ```

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::json;
use crate::value::{Object, TreeValue};

/// The three parts of a diff. Each part is absent when it has nothing in it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DiffResult {
    /// Values present in the old tree that were changed or dropped.
    pub removed: Option<TreeValue>,
    /// Values present in the new tree that were changed or introduced.
    pub added: Option<TreeValue>,
    /// Values identical on both sides.
    pub unchanged: Option<TreeValue>,
}

impl DiffResult {
    /// True when nothing was removed or added.
    pub fn is_unchanged(&self) -> bool {
        self.removed.is_none() && self.added.is_none()
    }

    /// True when all three parts are absent, e.g. when diffing `{}` with `{}`.
    pub fn is_empty(&self) -> bool {
        self.is_unchanged() && self.unchanged.is_none()
    }

    fn replaced(old: &TreeValue, new: &TreeValue) -> Self {
        Self {
            removed: Some(old.clone()),
            added: Some(new.clone()),
            unchanged: None,
        }
    }

    fn same(value: &TreeValue) -> Self {
        Self {
            removed: None,
            added: None,
            unchanged: Some(value.clone()),
        }
    }
}

/// Compute the three-way diff of `old` against `new`.
///
/// Inputs are only borrowed; every call builds fresh output trees, so the
/// function is safe to call from any number of threads at once.
pub fn diff(old: &TreeValue, new: &TreeValue) -> DiffResult {
    let result = diff_values(old, new);
    debug!(
        old_kind = ?old.kind(),
        new_kind = ?new.kind(),
        removed = bucket_size(&result.removed),
        added = bucket_size(&result.added),
        unchanged = bucket_size(&result.unchanged),
        "computed diff"
    );
    result
}

/// Parse two JSON documents and diff them.
///
/// # Errors
///
/// Returns [`crate::AuditError::MalformedInput`] if either side is not valid JSON.
pub fn diff_json(old: &str, new: &str) -> Result<DiffResult> {
    let old = json::parse(old)?;
    let new = json::parse(new)?;
    Ok(diff(&old, &new))
}

fn diff_values(old: &TreeValue, new: &TreeValue) -> DiffResult {
    match (old, new) {
        (TreeValue::Object(old_obj), TreeValue::Object(new_obj)) => diff_objects(old_obj, new_obj),
        _ if old.kind() != new.kind() => DiffResult::replaced(old, new),
        // Same kind, not objects: arrays and scalars compare atomically.
        _ if old == new => DiffResult::same(old),
        _ => DiffResult::replaced(old, new),
    }
}

/// Key-by-key object diff. Keys of `old` come first in `old` order, then keys
/// only present in `new` in `new` order.
fn diff_objects(old: &Object, new: &Object) -> DiffResult {
    let new_index = new.index();
    let mut removed = Object::new();
    let mut added = Object::new();
    let mut unchanged = Object::new();

    for (key, old_child) in old.iter() {
        let Some(new_child) = new_index.get(key) else {
            removed.push_unique(key.to_string(), old_child.clone());
            continue;
        };
        let part = diff_values(old_child, new_child);
        if let Some(value) = part.removed {
            removed.push_unique(key.to_string(), value);
        }
        if let Some(value) = part.added {
            added.push_unique(key.to_string(), value);
        }
        if let Some(value) = part.unchanged {
            unchanged.push_unique(key.to_string(), value);
        }
    }

    let old_keys: HashSet<&str> = old.keys().collect();
    for (key, new_child) in new.iter() {
        if !old_keys.contains(key) {
            added.push_unique(key.to_string(), new_child.clone());
        }
    }

    DiffResult {
        removed: non_empty(removed),
        added: non_empty(added),
        unchanged: non_empty(unchanged),
    }
}

fn non_empty(obj: Object) -> Option<TreeValue> {
    (!obj.is_empty()).then(|| TreeValue::Object(obj))
}

/// Number of top-level entries in a bucket, for log fields.
fn bucket_size(bucket: &Option<TreeValue>) -> usize {
    match bucket {
        None => 0,
        Some(TreeValue::Object(obj)) => obj.len(),
        Some(_) => 1,
    }
}
