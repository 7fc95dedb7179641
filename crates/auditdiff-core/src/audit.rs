//! Audit records: a diff packaged with who/what/when metadata.
//!
//! A record is built once per audited mutation and never changes afterwards.
//! Each diff part is stored as its own JSON document so it can be parsed
//! independently when the record is displayed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::diff::{diff, DiffResult};
use crate::error::{AuditError, Result};
use crate::json;
use crate::value::TreeValue;

/// Metadata describing one audited mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditMeta {
    pub timestamp: DateTime<Utc>,
    /// The user who performed the mutation.
    pub actor_id: i64,
    /// The entity (typically a project) the mutation belongs to.
    pub subject_id: i64,
    /// Free-form operation tag such as `"task.update"`.
    pub operation: String,
}

impl AuditMeta {
    /// Metadata stamped with the current time.
    pub fn new(actor_id: i64, subject_id: i64, operation: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            actor_id,
            subject_id,
            operation: operation.into(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// A persisted audit log entry.
///
/// The serialized form uses camelCase field names (`oldValues`, `newValues`,
/// `sameValues`); absent diff parts serialize as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<u64>,
    timestamp: DateTime<Utc>,
    actor_id: i64,
    subject_id: i64,
    operation: String,
    old_values: Option<String>,
    new_values: Option<String>,
    same_values: Option<String>,
}

impl AuditRecord {
    /// Sink-assigned id; `None` until the record has been appended.
    pub fn id(&self) -> Option<u64> {
        self.id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn actor_id(&self) -> i64 {
        self.actor_id
    }

    pub fn subject_id(&self) -> i64 {
        self.subject_id
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Serialized removed-or-changed values, if any.
    pub fn old_values(&self) -> Option<&str> {
        self.old_values.as_deref()
    }

    /// Serialized added-or-changed values, if any.
    pub fn new_values(&self) -> Option<&str> {
        self.new_values.as_deref()
    }

    /// Serialized unchanged values, if any.
    pub fn same_values(&self) -> Option<&str> {
        self.same_values.as_deref()
    }

    pub fn old_values_tree(&self) -> Result<Option<TreeValue>> {
        self.old_values.as_deref().map(json::parse).transpose()
    }

    pub fn new_values_tree(&self) -> Result<Option<TreeValue>> {
        self.new_values.as_deref().map(json::parse).transpose()
    }

    pub fn same_values_tree(&self) -> Result<Option<TreeValue>> {
        self.same_values.as_deref().map(json::parse).transpose()
    }

    /// The stored copy of this record, carrying the id its sink assigned.
    pub(crate) fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }
}

/// Package a diff and its metadata into an [`AuditRecord`].
///
/// Every present part is serialized independently; absent parts stay unset.
///
/// # Errors
///
/// Returns [`AuditError::SerializationFailure`] naming the first part that
/// could not be serialized. No partially built record is returned.
pub fn build(meta: AuditMeta, diff: &DiffResult) -> Result<AuditRecord> {
    let old_values = serialize_part("oldValues", diff.removed.as_ref())?;
    let new_values = serialize_part("newValues", diff.added.as_ref())?;
    let same_values = serialize_part("sameValues", diff.unchanged.as_ref())?;

    debug!(
        actor_id = meta.actor_id,
        subject_id = meta.subject_id,
        operation = %meta.operation,
        has_old = old_values.is_some(),
        has_new = new_values.is_some(),
        has_same = same_values.is_some(),
        "built audit record"
    );

    Ok(AuditRecord {
        id: None,
        timestamp: meta.timestamp,
        actor_id: meta.actor_id,
        subject_id: meta.subject_id,
        operation: meta.operation,
        old_values,
        new_values,
        same_values,
    })
}

/// Parse both snapshots, diff them, and build the record.
///
/// # Errors
///
/// [`AuditError::MalformedInput`] if either snapshot is not valid JSON,
/// [`AuditError::SerializationFailure`] if a diff part cannot be serialized.
pub fn record_change(meta: AuditMeta, old_json: &str, new_json: &str) -> Result<AuditRecord> {
    let old = json::parse(old_json)?;
    let new = json::parse(new_json)?;
    build(meta, &diff(&old, &new))
}

fn serialize_part<T: Serialize>(field: &'static str, part: Option<&T>) -> Result<Option<String>> {
    part.map(|value| {
        serde_json::to_string(value)
            .map_err(|source| AuditError::SerializationFailure { field, source })
    })
    .transpose()
}
