//! JSONL audit trail: append-only line-delimited JSON removal records.
//!
//! Each line is a self-contained JSON object. Lines are assembled in memory
//! and written via a single `write_all` so a tailing process never sees a
//! partial record. The writer degrades to disabled when the file cannot be
//! opened or written — audit logging must never abort a cleanup pass.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::sanitizer::RemovedRoute;

/// Audit event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// One route's triple was condemned and removed.
    RouteRemoved,
    /// A pass finished; carries summary counts.
    PassCompleted,
}

/// A single JSONL audit record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    /// ISO 8601 UTC timestamp.
    pub ts: String,
    /// Event type identifier.
    pub event: EventType,
    /// Condemned route as a URL path (`/worlds`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    /// HTML fault label, when the HTML side condemned the route.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_fault: Option<String>,
    /// Metadata fault label, when the metadata side condemned the route.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_fault: Option<String>,
    /// Members actually unlinked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files_removed: Option<usize>,
    /// Routes examined (pass summary).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routes_examined: Option<usize>,
    /// Routes removed (pass summary).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routes_removed: Option<usize>,
    /// Whether the pass ran without unlinking.
    pub dry_run: bool,
}

impl AuditRecord {
    /// Record for one condemned route.
    #[must_use]
    pub fn route_removed(entry: &RemovedRoute) -> Self {
        Self {
            ts: format_utc_now(),
            event: EventType::RouteRemoved,
            route: Some(entry.route.as_url_path()),
            html_fault: entry.verdict.html.map(|fault| fault.as_str().to_string()),
            meta_fault: entry.verdict.meta.map(|fault| fault.as_str().to_string()),
            files_removed: Some(entry.outcome.files_removed),
            routes_examined: None,
            routes_removed: None,
            dry_run: entry.outcome.dry_run,
        }
    }

    /// Summary record for a completed pass.
    #[must_use]
    pub fn pass_completed(examined: usize, removed: usize, dry_run: bool) -> Self {
        Self {
            ts: format_utc_now(),
            event: EventType::PassCompleted,
            route: None,
            html_fault: None,
            meta_fault: None,
            files_removed: None,
            routes_examined: Some(examined),
            routes_removed: Some(removed),
            dry_run,
        }
    }
}

/// Append-only JSONL audit writer.
pub struct AuditWriter {
    writer: Option<BufWriter<File>>,
}

impl AuditWriter {
    /// Open the audit file for append, creating parent directories.
    /// Any failure yields a disabled writer.
    #[must_use]
    pub fn open(path: &Path) -> Self {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let writer = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .ok()
            .map(BufWriter::new);
        Self { writer }
    }

    /// A writer that records nothing.
    #[must_use]
    pub const fn disabled() -> Self {
        Self { writer: None }
    }

    /// Whether records will actually be written.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.writer.is_some()
    }

    /// Append one record as a single JSONL line. Failures disable the writer.
    pub fn record(&mut self, record: &AuditRecord) {
        let Some(writer) = self.writer.as_mut() else {
            return;
        };
        let Ok(mut line) = serde_json::to_vec(record) else {
            return;
        };
        line.push(b'\n');
        if writer.write_all(&line).and_then(|()| writer.flush()).is_err() {
            self.writer = None;
        }
    }
}

fn format_utc_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
