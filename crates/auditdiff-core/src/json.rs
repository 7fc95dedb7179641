//! JSON interchange boundary: text ↔ [`TreeValue`].
//!
//! Malformed text is rejected here, so nothing past this point has to
//! handle invalid trees.

use serde_json::Value;

use crate::error::{AuditError, Result};
use crate::value::TreeValue;

/// Parse a JSON document into a [`TreeValue`].
///
/// # Errors
///
/// Returns [`AuditError::MalformedInput`] for syntax errors, trailing data,
/// or documents nested deeper than serde_json's recursion limit.
///
/// # Examples
///
/// ```
/// use auditdiff_core::{json::parse, TreeValue};
///
/// let value = parse(r#"{"name":"Alice"}"#).unwrap();
/// assert_eq!(value.get("name"), Some(&TreeValue::from("Alice")));
/// ```
pub fn parse(text: &str) -> Result<TreeValue> {
    let value: Value = serde_json::from_str(text).map_err(AuditError::MalformedInput)?;
    Ok(TreeValue::from(value))
}

/// Serialize a [`TreeValue`] to compact JSON, keeping object insertion order.
pub fn to_json(value: &TreeValue) -> serde_json::Result<String> {
    serde_json::to_string(value)
}

/// Serialize a [`TreeValue`] to indented JSON, keeping object insertion order.
pub fn to_json_pretty(value: &TreeValue) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}
