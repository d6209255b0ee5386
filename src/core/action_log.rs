//! Append-only work history per ticket.
//!
//! Entries are never edited once recorded. Readers get them oldest first,
//! ordered by timestamp with ties kept in recording order.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::model::TicketStatus;
use crate::core::SchedulerError;

/// Work event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Work started.
    Start,
    /// Work paused.
    Pause,
    /// Work resumed after a pause.
    Resume,
    /// Vehicle out on a test drive.
    TestDrive,
    /// Blocked waiting on parts.
    WaitingParts,
    /// Work finished.
    Complete,
}

impl ActionKind {
    /// Every kind.
    pub const ALL: [Self; 6] = [
        Self::Start,
        Self::Pause,
        Self::Resume,
        Self::TestDrive,
        Self::WaitingParts,
        Self::Complete,
    ];

    /// Wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::TestDrive => "test_drive",
            Self::WaitingParts => "waiting_parts",
            Self::Complete => "complete",
        }
    }

    /// Ticket status the action puts the vehicle in.
    pub const fn implied_status(self) -> TicketStatus {
        match self {
            Self::Start | Self::Resume | Self::TestDrive => TicketStatus::InProgress,
            Self::Pause => TicketStatus::Scheduled,
            Self::WaitingParts => TicketStatus::Delayed,
            Self::Complete => TicketStatus::Completed,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s.trim())
            .ok_or_else(|| SchedulerError::Validation(format!("unknown action kind `{s}`")))
    }
}

/// One recorded work event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionLogEntry {
    /// Entry identifier.
    pub id: Uuid,
    /// Vehicle code of the ticket the event belongs to.
    pub ticket_ref: String,
    /// Who performed the action.
    pub actor_id: String,
    /// What happened.
    pub action: ActionKind,
    /// When it happened.
    pub timestamp: DateTime<Utc>,
    /// Recording order, assigned by the sink.
    #[serde(default)]
    pub sequence: u64,
    /// Optional remark.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Storage for action-log entries.
pub trait ActionLogSink: Send {
    /// Record an entry. The sink assigns `sequence`.
    fn record(&mut self, entry: ActionLogEntry) -> Result<(), SchedulerError>;

    /// All entries for a ticket, oldest first.
    fn entries_for(&self, ticket_ref: &str) -> Result<Vec<ActionLogEntry>, SchedulerError>;

    /// The last `n` entries for a ticket, oldest first.
    fn recent_for(&self, ticket_ref: &str, n: usize) -> Result<Vec<ActionLogEntry>, SchedulerError> {
        let mut entries = self.entries_for(ticket_ref)?;
        let skip = entries.len().saturating_sub(n);
        Ok(entries.split_off(skip))
    }
}

/// Sort entries by timestamp, then recording order.
pub fn sort_chronologically(entries: &mut [ActionLogEntry]) {
    entries.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.sequence.cmp(&b.sequence)));
}

/// In-memory action log for testing and dev. Oldest entries are evicted past `max_entries`.
pub struct InMemoryActionLog {
    entries: VecDeque<ActionLogEntry>,
    max_entries: usize,
    next_sequence: u64,
}

impl InMemoryActionLog {
    /// Create a log with a bounded buffer.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(max_entries.min(1024)),
            max_entries,
            next_sequence: 0,
        }
    }

    /// Snapshot of every stored entry in recording order.
    pub fn entries(&self) -> Vec<ActionLogEntry> {
        self.entries.iter().cloned().collect()
    }
}

impl ActionLogSink for InMemoryActionLog {
    fn record(&mut self, mut entry: ActionLogEntry) -> Result<(), SchedulerError> {
        if self.max_entries == 0 {
            return Err(SchedulerError::Backend("action log has no capacity".into()));
        }
        if self.entries.len() >= self.max_entries {
            self.entries.pop_front();
        }
        entry.sequence = self.next_sequence;
        self.next_sequence += 1;
        self.entries.push_back(entry);
        Ok(())
    }

    fn entries_for(&self, ticket_ref: &str) -> Result<Vec<ActionLogEntry>, SchedulerError> {
        let mut entries: Vec<_> = self
            .entries
            .iter()
            .filter(|e| e.ticket_ref == ticket_ref)
            .cloned()
            .collect();
        sort_chronologically(&mut entries);
        Ok(entries)
    }
}

/// Helper to build an entry from context.
pub fn build_action_entry(
    ticket_ref: impl Into<String>,
    action: ActionKind,
    actor_id: impl Into<String>,
    notes: Option<String>,
    timestamp: DateTime<Utc>,
) -> ActionLogEntry {
    ActionLogEntry {
        id: Uuid::new_v4(),
        ticket_ref: ticket_ref.into(),
        actor_id: actor_id.into(),
        action,
        timestamp,
        sequence: 0,
        notes,
    }
}
