//! Admission of vehicles from the arrivals process into a day.
//!
//! The gate only checks the day-level ceiling. A vehicle admitted here may
//! still land in its section's pending queue.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::model::{Priority, SectionKind, TicketId, TicketStatus};
use crate::core::schedule::DaySchedule;
use crate::core::ticket::{Ticket, TicketDraft};
use crate::core::SchedulerError;

/// A vehicle handed over by the arrivals process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakeRequest {
    /// VIN or equivalent identifier.
    pub vehicle_code: String,
    /// Vehicle model.
    #[serde(default)]
    pub vehicle_model: String,
    /// Customer name.
    #[serde(default)]
    pub customer_name: String,
    /// Estimated work in hours.
    pub estimated_duration_hours: f64,
    /// Section that will do the work.
    pub section: SectionKind,
    /// Urgency.
    #[serde(default)]
    pub priority: Priority,
    /// Required for high priority.
    #[serde(default)]
    pub priority_reason: Option<String>,
    /// Day to schedule the vehicle on.
    pub target_date: NaiveDate,
    /// Free text.
    #[serde(default)]
    pub notes: String,
    /// Special-event flag.
    #[serde(default)]
    pub is_special_event: bool,
    /// Owner-request flag.
    #[serde(default)]
    pub is_owner_request: bool,
}

impl IntakeRequest {
    /// Minimal request for a vehicle, section and date.
    pub fn new(vehicle_code: impl Into<String>, section: SectionKind, target_date: NaiveDate) -> Self {
        Self {
            vehicle_code: vehicle_code.into(),
            vehicle_model: String::new(),
            customer_name: String::new(),
            estimated_duration_hours: 0.0,
            section,
            priority: Priority::Medium,
            priority_reason: None,
            target_date,
            notes: String::new(),
            is_special_event: false,
            is_owner_request: false,
        }
    }

    fn into_draft(self) -> TicketDraft {
        TicketDraft {
            vehicle_code: self.vehicle_code,
            vehicle_model: self.vehicle_model,
            customer_name: self.customer_name,
            section: self.section,
            priority: self.priority,
            priority_reason: self.priority_reason,
            estimated_duration_hours: self.estimated_duration_hours,
            assigned_worker: None,
            notes: self.notes,
            is_special_event: self.is_special_event,
            is_owner_request: self.is_owner_request,
            status: Some(TicketStatus::Scheduled),
        }
    }
}

/// Answer returned to the arrivals process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeOutcome {
    /// Whether the vehicle left the arrivals pool.
    pub accepted: bool,
    /// Rejection message naming the date and limiting number.
    pub reason: Option<String>,
    /// Ticket created on acceptance.
    pub ticket_id: Option<TicketId>,
}

impl From<&Result<Ticket, SchedulerError>> for IntakeOutcome {
    fn from(result: &Result<Ticket, SchedulerError>) -> Self {
        match result {
            Ok(ticket) => Self {
                accepted: true,
                reason: None,
                ticket_id: Some(ticket.id),
            },
            Err(err) => Self {
                accepted: false,
                reason: Some(err.to_string()),
                ticket_id: None,
            },
        }
    }
}

/// Admit a vehicle into `day`. The day is untouched on error.
pub fn admit(day: &mut DaySchedule, request: IntakeRequest, now: DateTime<Utc>) -> Result<Ticket, SchedulerError> {
    let draft = request.into_draft();
    draft.validate()?;
    if !day.available {
        return Err(SchedulerError::ScheduleUnavailable(day.date));
    }
    if !day.has_room() {
        return Err(SchedulerError::CapacityExceeded {
            date: day.date,
            current: day.current_cars_scheduled,
            max: day.max_cars_capacity,
        });
    }
    day.add_ticket(draft, now)
}
