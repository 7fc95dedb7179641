//! # auditdiff-core
//!
//! Structural three-way diff of JSON-like trees, packaged as audit records.
//!
//! Given a serialized "before" and "after" snapshot of an entity, the diff splits
//! the pair into removed-or-changed values, added-or-changed values, and unchanged
//! values. The audit layer stores each part as its own JSON document next to the
//! actor, subject, operation tag, and timestamp of the mutation.
//!
//! ## Quick start
//!
//! ```rust
//! use auditdiff_core::{record_change, AuditMeta};
//!
//! let meta = AuditMeta::new(7, 3, "task.update");
//! let record = record_change(
//!     meta,
//!     r#"{"name":"Fix login","status":"open","points":3}"#,
//!     r#"{"name":"Fix login","status":"done","points":3}"#,
//! )
//! .unwrap();
//!
//! assert_eq!(record.old_values(), Some(r#"{"status":"open"}"#));
//! assert_eq!(record.new_values(), Some(r#"{"status":"done"}"#));
//! assert_eq!(record.same_values(), Some(r#"{"name":"Fix login","points":3}"#));
//! ```
//!
//! ## Modules
//!
//! - [`value`] -- `TreeValue` model with order-independent object equality
//! - [`json`] -- JSON text ↔ `TreeValue` boundary
//! - [`diff`] -- the three-way diff engine
//! - [`audit`] -- `AuditMeta`, `AuditRecord`, and the record builder
//! - [`redact`] -- strip fields from snapshots before diffing
//! - [`sink`] -- append-only record stores (`MemorySink`, `JsonlSink`)
//! - [`error`] -- error types

pub mod audit;
pub mod diff;
pub mod error;
pub mod json;
pub mod redact;
pub mod sink;
pub mod value;

pub use audit::{build, record_change, AuditMeta, AuditRecord};
pub use diff::{diff, diff_json, DiffResult};
pub use error::AuditError;
pub use redact::redact;
pub use sink::{AuditQuery, AuditSink, JsonlSink, MemorySink};
pub use value::{Object, TreeValue, ValueKind};
