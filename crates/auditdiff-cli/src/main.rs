//! `auditdiff` CLI -- diff JSON snapshots and keep an audit log from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Three-way diff of two snapshots
//! auditdiff diff --old before.json --new after.json
//!
//! # Ignore noisy fields before diffing
//! auditdiff diff --old before.json --new after.json --ignore updatedAt,owner.email
//!
//! # Build an audit record and append it to a JSON Lines log
//! auditdiff record --old before.json --new after.json \
//!     --actor 7 --subject 3 --operation task.update --log audit.jsonl
//!
//! # Read the log back, filtered
//! auditdiff history --log audit.jsonl --subject 3 --since 2026-03-01T00:00:00Z
//! ```

mod logging;

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use auditdiff_core::json;
use auditdiff_core::{build, diff, redact, AuditMeta, AuditQuery, AuditSink, JsonlSink, TreeValue};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::debug;

use crate::logging::LogFormat;

#[derive(Parser)]
#[command(
    name = "auditdiff",
    version,
    about = "Structural three-way JSON diff and audit log CLI"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log line format (logs go to stderr)
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, global = true)]
    log_format: LogFormat,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// The before/after snapshot pair shared by `diff` and `record`.
#[derive(Args)]
struct Snapshots {
    /// Old (before) snapshot file, or `-` for stdin
    #[arg(long)]
    old: String,
    /// New (after) snapshot file, or `-` for stdin
    #[arg(long)]
    new: String,
    /// Comma-separated field patterns to strip from both snapshots
    #[arg(long)]
    ignore: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the removed/added/unchanged split of two JSON snapshots
    Diff {
        #[command(flatten)]
        snapshots: Snapshots,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Build an audit record from two JSON snapshots
    Record {
        #[command(flatten)]
        snapshots: Snapshots,
        /// Id of the user who made the change
        #[arg(long)]
        actor: i64,
        /// Id of the subject (project) the change belongs to
        #[arg(long)]
        subject: i64,
        /// Operation tag, e.g. "task.update"
        #[arg(long)]
        operation: String,
        /// Record timestamp in RFC 3339 (defaults to now)
        #[arg(long)]
        timestamp: Option<DateTime<Utc>>,
        /// Append the record to this JSON Lines audit log
        #[arg(long)]
        log: Option<PathBuf>,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// List records from a JSON Lines audit log
    History {
        /// The audit log to read
        #[arg(long)]
        log: PathBuf,
        /// Only records by this actor
        #[arg(long)]
        actor: Option<i64>,
        /// Only records for this subject
        #[arg(long)]
        subject: Option<i64>,
        /// Only records at or after this RFC 3339 time
        #[arg(long)]
        since: Option<DateTime<Utc>>,
        /// Only records before this RFC 3339 time
        #[arg(long)]
        until: Option<DateTime<Utc>>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_format, cli.verbose);

    match cli.command {
        Commands::Diff {
            snapshots,
            output,
            pretty,
        } => {
            let (old, new) = load_snapshots(&snapshots)?;
            let result = diff(&old, &new);
            let text = to_output(&result, pretty)?;
            write_output(output.as_deref(), &text)?;
        }
        Commands::Record {
            snapshots,
            actor,
            subject,
            operation,
            timestamp,
            log,
            pretty,
        } => {
            let (old, new) = load_snapshots(&snapshots)?;
            let mut meta = AuditMeta::new(actor, subject, operation);
            if let Some(timestamp) = timestamp {
                meta = meta.with_timestamp(timestamp);
            }

            let mut record =
                build(meta, &diff(&old, &new)).context("Failed to build audit record")?;
            if let Some(path) = log {
                let mut sink = JsonlSink::open(&path)
                    .with_context(|| format!("Failed to open audit log: {}", path.display()))?;
                record = sink.append(record).with_context(|| {
                    format!("Failed to append to audit log: {}", path.display())
                })?;
            }

            let text = to_output(&record, pretty)?;
            write_output(None, &text)?;
        }
        Commands::History {
            log,
            actor,
            subject,
            since,
            until,
        } => {
            let sink = JsonlSink::open(&log)
                .with_context(|| format!("Failed to open audit log: {}", log.display()))?;
            let query = AuditQuery {
                actor_id: actor,
                subject_id: subject,
                since,
                until,
            };
            let records = sink
                .query(&query)
                .with_context(|| format!("Failed to read audit log: {}", log.display()))?;
            debug!(matched = records.len(), "history query");

            let mut out = String::new();
            for record in &records {
                out.push_str(&serde_json::to_string(record)?);
                out.push('\n');
            }
            write_output(None, &out)?;
        }
    }

    Ok(())
}

/// Read, parse, and redact both snapshots.
fn load_snapshots(snapshots: &Snapshots) -> Result<(TreeValue, TreeValue)> {
    if snapshots.old == "-" && snapshots.new == "-" {
        anyhow::bail!("--old and --new cannot both read from stdin");
    }

    let patterns = build_ignore_patterns(snapshots.ignore.as_deref());
    let pattern_refs: Vec<&str> = patterns.iter().map(|s| s.as_str()).collect();

    let old = load_snapshot(&snapshots.old, &pattern_refs)?;
    let new = load_snapshot(&snapshots.new, &pattern_refs)?;
    Ok((old, new))
}

fn load_snapshot(path: &str, patterns: &[&str]) -> Result<TreeValue> {
    let text = read_input(path)?;
    let value = json::parse(&text).with_context(|| format!("Invalid JSON snapshot: {}", path))?;
    Ok(redact(&value, patterns))
}

/// Split `--ignore a,b.c` into `["a", "b.c"]`, dropping empty entries.
fn build_ignore_patterns(ignore: Option<&str>) -> Vec<String> {
    ignore
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn to_output<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let mut text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    text.push('\n');
    Ok(text)
}

fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read from stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(Path::new(path))
        .with_context(|| format!("Failed to read file: {}", path))
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
