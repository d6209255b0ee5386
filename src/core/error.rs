//! Error types for scheduler operations.

use chrono::NaiveDate;
use thiserror::Error;

use crate::core::model::TicketStatus;

/// Errors produced by scheduler components.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    /// No day schedule has been defined for the target date.
    #[error("no schedule defined for {0}; define the day or pick another date")]
    ScheduleNotFound(NaiveDate),
    /// The day already holds as many cars as it may admit.
    #[error("capacity exceeded for {date}: {current} of {max} cars already scheduled")]
    CapacityExceeded {
        /// Day that rejected the admission.
        date: NaiveDate,
        /// Cars already scheduled that day.
        current: u32,
        /// Day-level ceiling.
        max: u32,
    },
    /// The day exists but the workshop is closed.
    #[error("workshop is not operating on {0}")]
    ScheduleUnavailable(NaiveDate),
    /// Status change refused by the transition table.
    #[error("invalid status transition from {from} to {to}")]
    InvalidStatusTransition {
        /// Current status.
        from: TicketStatus,
        /// Requested status.
        to: TicketStatus,
    },
    /// Caller input failed validation; nothing was mutated.
    #[error("validation error: {0}")]
    Validation(String),
    /// Unknown ticket identifier or vehicle reference.
    #[error("not found: {0}")]
    NotFound(String),
    /// Backend-specific failure with context.
    #[error("backend error: {0}")]
    Backend(String),
}

impl From<std::io::Error> for SchedulerError {
    fn from(err: std::io::Error) -> Self {
        Self::Backend(err.to_string())
    }
}

impl From<serde_json::Error> for SchedulerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Backend(format!("serialization: {err}"))
    }
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
