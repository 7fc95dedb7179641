//! Error types for parsing, diffing, and audit record operations.

use thiserror::Error;

/// Errors that can occur while turning snapshots into audit records.
///
/// The diff itself is total over well-formed trees, so every variant here comes
/// from a boundary: parsing interchange text, serializing diff parts, or a sink.
#[derive(Error, Debug)]
pub enum AuditError {
    /// The input text was not a valid JSON document.
    #[error("malformed input: {0}")]
    MalformedInput(#[source] serde_json::Error),

    /// A persisted record could not be read back.
    /// Includes the 1-based line number of the offending record.
    #[error("malformed audit record at line {line}: {source}")]
    MalformedRecord {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// A diff part could not be serialized to JSON. No record is produced.
    #[error("failed to serialize {field}: {source}")]
    SerializationFailure {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The sink's backing file could not be read or written.
    #[error("audit sink I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout auditdiff-core.
pub type Result<T> = std::result::Result<T, AuditError>;
