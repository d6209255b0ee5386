//! File-backed action log using JSON lines.
//!
//! Entries are appended to `actions.jsonl` and also indexed in memory by
//! ticket reference. Existing lines are replayed on open.

use std::collections::HashMap;
use std::fs::{create_dir_all, read, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::core::action_log::sort_chronologically;
use crate::core::{ActionLogEntry, ActionLogSink, SchedulerError};

/// Append-only JSON-lines action log.
pub struct JsonLinesActionLog {
    path: PathBuf,
    file: File,
    by_ticket: HashMap<String, Vec<ActionLogEntry>>,
    next_sequence: u64,
}

impl JsonLinesActionLog {
    /// Open (creating if needed) `actions.jsonl` under `dir`.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, SchedulerError> {
        let dir = dir.as_ref();
        create_dir_all(dir)?;
        let path = dir.join("actions.jsonl");
        let mut by_ticket: HashMap<String, Vec<ActionLogEntry>> = HashMap::new();
        let mut next_sequence = 0;
        let raw = if path.exists() { read(&path)? } else { Vec::new() };
        for (index, line) in String::from_utf8_lossy(&raw).lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            // A torn write leaves a partial line; the log is advisory, so skip it.
            let entry: ActionLogEntry = match serde_json::from_str(line) {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!(
                        path = %path.display(),
                        line = index + 1,
                        error = %err,
                        "skipping unreadable action log line"
                    );
                    continue;
                }
            };
            next_sequence = next_sequence.max(entry.sequence + 1);
            by_ticket.entry(entry.ticket_ref.clone()).or_default().push(entry);
        }
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        if raw.last().is_some_and(|b| *b != b'\n') {
            // Terminate a torn tail so the next entry starts on its own line.
            writeln!(file)?;
        }
        Ok(Self {
            path,
            file,
            by_ticket,
            next_sequence,
        })
    }

    /// Log file location.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ActionLogSink for JsonLinesActionLog {
    fn record(&mut self, mut entry: ActionLogEntry) -> Result<(), SchedulerError> {
        entry.sequence = self.next_sequence;
        let line = serde_json::to_string(&entry)?;
        writeln!(self.file, "{line}")?;
        self.file.flush()?;
        self.next_sequence += 1;
        self.by_ticket.entry(entry.ticket_ref.clone()).or_default().push(entry);
        Ok(())
    }

    fn entries_for(&self, ticket_ref: &str) -> Result<Vec<ActionLogEntry>, SchedulerError> {
        let mut entries = self.by_ticket.get(ticket_ref).cloned().unwrap_or_default();
        sort_chronologically(&mut entries);
        Ok(entries)
    }
}
