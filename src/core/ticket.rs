//! Scheduled-car tickets and the drafts they are created from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::model::{Priority, SectionKind, TicketId, TicketStatus};
use crate::core::SchedulerError;

/// One vehicle's work assignment for one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    /// Unique identifier.
    pub id: TicketId,
    /// VIN or equivalent identifier.
    pub vehicle_code: String,
    /// Vehicle model.
    pub vehicle_model: String,
    /// Customer name.
    #[serde(default)]
    pub customer_name: String,
    /// Section doing the work.
    pub section: SectionKind,
    /// Urgency.
    pub priority: Priority,
    /// Why the ticket is high priority.
    #[serde(default)]
    pub priority_reason: Option<String>,
    /// Estimated work in hours.
    pub estimated_duration_hours: f64,
    /// Worker name, if assigned.
    #[serde(default)]
    pub assigned_worker: Option<String>,
    /// Free text.
    #[serde(default)]
    pub notes: String,
    /// Vehicle is part of a special event.
    #[serde(default)]
    pub is_special_event: bool,
    /// Owner asked for the work personally.
    #[serde(default)]
    pub is_owner_request: bool,
    /// Current work state.
    pub status: TicketStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last mutation time.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketDraft {
    /// VIN or equivalent identifier; required.
    pub vehicle_code: String,
    /// Vehicle model.
    #[serde(default)]
    pub vehicle_model: String,
    /// Customer name.
    #[serde(default)]
    pub customer_name: String,
    /// Section doing the work.
    pub section: SectionKind,
    /// Urgency.
    #[serde(default)]
    pub priority: Priority,
    /// Required when `priority` is high.
    #[serde(default)]
    pub priority_reason: Option<String>,
    /// Estimated work in hours.
    #[serde(default)]
    pub estimated_duration_hours: f64,
    /// Worker name, if assigned.
    #[serde(default)]
    pub assigned_worker: Option<String>,
    /// Free text.
    #[serde(default)]
    pub notes: String,
    /// Special-event flag.
    #[serde(default)]
    pub is_special_event: bool,
    /// Owner-request flag.
    #[serde(default)]
    pub is_owner_request: bool,
    /// Explicit initial status; computed from the section queue when absent.
    #[serde(default)]
    pub status: Option<TicketStatus>,
}

impl TicketDraft {
    /// Create a draft for a vehicle in a section with medium priority.
    pub fn new(vehicle_code: impl Into<String>, section: SectionKind) -> Self {
        Self {
            vehicle_code: vehicle_code.into(),
            vehicle_model: String::new(),
            customer_name: String::new(),
            section,
            priority: Priority::Medium,
            priority_reason: None,
            estimated_duration_hours: 0.0,
            assigned_worker: None,
            notes: String::new(),
            is_special_event: false,
            is_owner_request: false,
            status: None,
        }
    }

    /// Set the vehicle model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.vehicle_model = model.into();
        self
    }

    /// Set the customer name.
    #[must_use]
    pub fn with_customer(mut self, customer: impl Into<String>) -> Self {
        self.customer_name = customer.into();
        self
    }

    /// Set the priority and its reason.
    #[must_use]
    pub fn with_priority(mut self, priority: Priority, reason: Option<String>) -> Self {
        self.priority = priority;
        self.priority_reason = reason;
        self
    }

    /// Set the estimated duration in hours.
    #[must_use]
    pub const fn with_duration(mut self, hours: f64) -> Self {
        self.estimated_duration_hours = hours;
        self
    }

    /// Assign a worker.
    #[must_use]
    pub fn with_worker(mut self, worker: impl Into<String>) -> Self {
        self.assigned_worker = Some(worker.into());
        self
    }

    /// Set notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Set the special-event and owner-request flags.
    #[must_use]
    pub const fn with_flags(mut self, special_event: bool, owner_request: bool) -> Self {
        self.is_special_event = special_event;
        self.is_owner_request = owner_request;
        self
    }

    /// Force the initial status.
    #[must_use]
    pub const fn with_status(mut self, status: TicketStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Check required fields.
    pub fn validate(&self) -> Result<(), SchedulerError> {
        if self.vehicle_code.trim().is_empty() {
            return Err(SchedulerError::Validation("vehicle code is required".into()));
        }
        validate_priority(self.priority, self.priority_reason.as_deref())?;
        validate_duration(self.estimated_duration_hours)
    }

    /// Turn a validated draft into a ticket.
    pub(crate) fn into_ticket(self, status: TicketStatus, now: DateTime<Utc>) -> Ticket {
        Ticket {
            id: Uuid::new_v4(),
            vehicle_code: self.vehicle_code.trim().to_string(),
            vehicle_model: self.vehicle_model,
            customer_name: self.customer_name,
            section: self.section,
            priority: self.priority,
            priority_reason: self.priority_reason,
            estimated_duration_hours: self.estimated_duration_hours,
            assigned_worker: self.assigned_worker,
            notes: self.notes,
            is_special_event: self.is_special_event,
            is_owner_request: self.is_owner_request,
            status,
            created_at: now,
            updated_at: now,
        }
    }
}

impl From<&Ticket> for TicketDraft {
    fn from(ticket: &Ticket) -> Self {
        Self {
            vehicle_code: ticket.vehicle_code.clone(),
            vehicle_model: ticket.vehicle_model.clone(),
            customer_name: ticket.customer_name.clone(),
            section: ticket.section,
            priority: ticket.priority,
            priority_reason: ticket.priority_reason.clone(),
            estimated_duration_hours: ticket.estimated_duration_hours,
            assigned_worker: ticket.assigned_worker.clone(),
            notes: ticket.notes.clone(),
            is_special_event: ticket.is_special_event,
            is_owner_request: ticket.is_owner_request,
            status: None,
        }
    }
}

/// Field edits for an existing ticket. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TicketUpdate {
    /// New worker; `Some(None)` clears the assignment.
    #[serde(default)]
    pub assigned_worker: Option<Option<String>>,
    /// New notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// New priority and reason.
    #[serde(default)]
    pub priority: Option<(Priority, Option<String>)>,
    /// New duration estimate.
    #[serde(default)]
    pub estimated_duration_hours: Option<f64>,
    /// New special-event flag.
    #[serde(default)]
    pub is_special_event: Option<bool>,
    /// New owner-request flag.
    #[serde(default)]
    pub is_owner_request: Option<bool>,
}

impl Ticket {
    /// Apply field edits after validating them; on error the ticket is untouched.
    pub fn apply(&mut self, update: TicketUpdate, now: DateTime<Utc>) -> Result<(), SchedulerError> {
        if let Some((priority, reason)) = &update.priority {
            validate_priority(*priority, reason.as_deref())?;
        }
        if let Some(hours) = update.estimated_duration_hours {
            validate_duration(hours)?;
        }

        if let Some(worker) = update.assigned_worker {
            self.assigned_worker = worker;
        }
        if let Some(notes) = update.notes {
            self.notes = notes;
        }
        if let Some((priority, reason)) = update.priority {
            self.priority = priority;
            self.priority_reason = reason;
        }
        if let Some(hours) = update.estimated_duration_hours {
            self.estimated_duration_hours = hours;
        }
        if let Some(flag) = update.is_special_event {
            self.is_special_event = flag;
        }
        if let Some(flag) = update.is_owner_request {
            self.is_owner_request = flag;
        }
        self.updated_at = now;
        Ok(())
    }
}

fn validate_priority(priority: Priority, reason: Option<&str>) -> Result<(), SchedulerError> {
    if priority == Priority::High && reason.is_none_or(|r| r.trim().is_empty()) {
        return Err(SchedulerError::Validation(
            "priority reason is required for high priority".into(),
        ));
    }
    Ok(())
}

fn validate_duration(hours: f64) -> Result<(), SchedulerError> {
    if !hours.is_finite() || hours < 0.0 {
        return Err(SchedulerError::Validation(format!(
            "estimated duration must be a non-negative number of hours, got {hours}"
        )));
    }
    Ok(())
}
