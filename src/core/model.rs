//! Shared domain vocabulary: sections, priorities, ticket status.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::SchedulerError;

/// Unique ticket identifier.
pub type TicketId = Uuid;

/// Workshop discipline a ticket is assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    /// Electrical diagnostics and repair.
    Electrical,
    /// Mechanical repair.
    #[serde(alias = "mechanic")]
    Mechanical,
    /// Body work.
    BodyWork,
    /// Paint shop.
    Painter,
    /// Cleaning and detailing.
    Detailer,
}

impl SectionKind {
    /// Every section, in display order.
    pub const ALL: [Self; 5] = [
        Self::Electrical,
        Self::Mechanical,
        Self::BodyWork,
        Self::Painter,
        Self::Detailer,
    ];

    /// Wire name of the section.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Electrical => "electrical",
            Self::Mechanical => "mechanical",
            Self::BodyWork => "body_work",
            Self::Painter => "painter",
            Self::Detailer => "detailer",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionKind {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "electrical" => Ok(Self::Electrical),
            "mechanical" | "mechanic" => Ok(Self::Mechanical),
            "body_work" | "bodywork" => Ok(Self::BodyWork),
            "painter" => Ok(Self::Painter),
            "detailer" => Ok(Self::Detailer),
            other => Err(SchedulerError::Validation(format!("unknown section `{other}`"))),
        }
    }
}

/// Ticket priority. Ordering is `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Can wait.
    Low,
    /// Normal work.
    #[default]
    Medium,
    /// Urgent; requires a reason.
    High,
}

impl FromStr for Priority {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(SchedulerError::Validation(format!("unknown priority `{other}`"))),
        }
    }
}

/// Work state of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    /// Admitted but waiting for a slot.
    Pending,
    /// Planned for the day.
    Scheduled,
    /// Being worked on.
    InProgress,
    /// Work finished.
    Completed,
    /// Held up (parts, customer, etc.).
    Delayed,
}

impl TicketStatus {
    /// Allowed `(from, to)` edges. Operators may revert any state, so every edge is open.
    const TRANSITIONS: &'static [(Self, Self)] = &[
        (Self::Pending, Self::Scheduled),
        (Self::Pending, Self::InProgress),
        (Self::Pending, Self::Completed),
        (Self::Pending, Self::Delayed),
        (Self::Scheduled, Self::Pending),
        (Self::Scheduled, Self::InProgress),
        (Self::Scheduled, Self::Completed),
        (Self::Scheduled, Self::Delayed),
        (Self::InProgress, Self::Pending),
        (Self::InProgress, Self::Scheduled),
        (Self::InProgress, Self::Completed),
        (Self::InProgress, Self::Delayed),
        (Self::Completed, Self::Pending),
        (Self::Completed, Self::Scheduled),
        (Self::Completed, Self::InProgress),
        (Self::Completed, Self::Delayed),
        (Self::Delayed, Self::Pending),
        (Self::Delayed, Self::Scheduled),
        (Self::Delayed, Self::InProgress),
        (Self::Delayed, Self::Completed),
    ];

    /// Every status.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Scheduled,
        Self::InProgress,
        Self::Completed,
        Self::Delayed,
    ];

    /// Wire name of the status.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Scheduled => "scheduled",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Delayed => "delayed",
        }
    }

    /// Whether the transition table permits moving to `to`. Self-edges always pass.
    pub fn can_transition_to(self, to: Self) -> bool {
        self == to || Self::TRANSITIONS.iter().any(|&(f, t)| f == self && t == to)
    }

    /// Terminal by convention only; nothing prevents leaving it.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| SchedulerError::Validation(format!("unknown status `{s}`")))
    }
}
