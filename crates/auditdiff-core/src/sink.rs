//! Append-only destinations for audit records.
//!
//! The [`AuditSink`] trait is the seam to whatever store the host application
//! uses. Two implementations ship with the crate: [`MemorySink`] for tests and
//! embedding, and [`JsonlSink`], which keeps one JSON record per line in a file.
//! Records are never updated or deleted through a sink.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::info;

use crate::audit::AuditRecord;
use crate::error::{AuditError, Result};

/// An append-only store of audit records.
pub trait AuditSink {
    /// Store `record`, assigning it the next id (starting at 1).
    ///
    /// Returns the stored copy, which carries the assigned id.
    fn append(&mut self, record: AuditRecord) -> Result<AuditRecord>;
}

/// Filter for reading records back. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditQuery {
    pub actor_id: Option<i64>,
    pub subject_id: Option<i64>,
    /// Inclusive lower bound on the record timestamp.
    pub since: Option<DateTime<Utc>>,
    /// Exclusive upper bound on the record timestamp.
    pub until: Option<DateTime<Utc>>,
}

impl AuditQuery {
    pub fn matches(&self, record: &AuditRecord) -> bool {
        self.actor_id.is_none_or(|id| record.actor_id() == id)
            && self.subject_id.is_none_or(|id| record.subject_id() == id)
            && self.since.is_none_or(|since| record.timestamp() >= since)
            && self.until.is_none_or(|until| record.timestamp() < until)
    }
}

/// Keeps records in memory, in append order.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Vec<AuditRecord>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[AuditRecord] {
        &self.records
    }

    pub fn query(&self, query: &AuditQuery) -> Vec<&AuditRecord> {
        self.records.iter().filter(|r| query.matches(r)).collect()
    }
}

impl AuditSink for MemorySink {
    fn append(&mut self, record: AuditRecord) -> Result<AuditRecord> {
        let stored = record.with_id(self.records.len() as u64 + 1);
        log_append(&stored);
        self.records.push(stored.clone());
        Ok(stored)
    }
}

/// Stores records as JSON Lines in a single file.
#[derive(Debug)]
pub struct JsonlSink {
    path: PathBuf,
    next_id: u64,
}

impl JsonlSink {
    /// Open the log at `path`. The file is created on the first append; ids
    /// continue after the highest id already stored.
    ///
    /// # Errors
    ///
    /// [`AuditError::Io`] if an existing file cannot be read,
    /// [`AuditError::MalformedRecord`] if it holds a corrupt line.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let last_id = read_records(&path)?
            .iter()
            .filter_map(AuditRecord::id)
            .max()
            .unwrap_or(0);
        Ok(Self {
            path,
            next_id: last_id + 1,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All stored records, in file order.
    pub fn records(&self) -> Result<Vec<AuditRecord>> {
        read_records(&self.path)
    }

    pub fn query(&self, query: &AuditQuery) -> Result<Vec<AuditRecord>> {
        let mut records = self.records()?;
        records.retain(|r| query.matches(r));
        Ok(records)
    }
}

impl AuditSink for JsonlSink {
    fn append(&mut self, record: AuditRecord) -> Result<AuditRecord> {
        let stored = record.with_id(self.next_id);
        let line = serde_json::to_string(&stored).map_err(|source| {
            AuditError::SerializationFailure {
                field: "record",
                source,
            }
        })?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")?;

        self.next_id += 1;
        log_append(&stored);
        Ok(stored)
    }
}

/// Read every record in a JSONL file. A missing file holds no records.
fn read_records(path: &Path) -> Result<Vec<AuditRecord>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut records = Vec::new();
    for (i, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line)
            .map_err(|source| AuditError::MalformedRecord { line: i + 1, source })?;
        records.push(record);
    }
    Ok(records)
}

fn log_append(record: &AuditRecord) {
    info!(
        id = record.id(),
        actor_id = record.actor_id(),
        subject_id = record.subject_id(),
        operation = record.operation(),
        "appended audit record"
    );
}
