//! Day schedules and the ticket store they own.
//!
//! Tickets live in insertion order; that order is the assignment order the
//! queue admission rule reads. Store operations do not log actions, callers do.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::admission::ACTIVE_SLOTS_PER_SECTION;
use crate::core::capacity::{CapacityConfig, HoursPolicy};
use crate::core::model::{SectionKind, TicketId, TicketStatus};
use crate::core::ticket::{Ticket, TicketDraft, TicketUpdate};
use crate::core::SchedulerError;

/// Everything scheduled for one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySchedule {
    /// Calendar date; unique key.
    pub date: NaiveDate,
    /// Opening time.
    pub start_time: NaiveTime,
    /// Closing time.
    pub end_time: NaiveTime,
    /// Whether the workshop operates that day.
    pub available: bool,
    /// Ceiling on tickets admitted that day.
    pub max_cars_capacity: u32,
    /// Tickets currently held by the day; kept equal to `tickets.len()`.
    #[serde(default)]
    pub current_cars_scheduled: u32,
    /// Free text.
    #[serde(default)]
    pub notes: String,
    /// Staffing and section numbers.
    pub capacity: CapacityConfig,
    /// Tickets in assignment order.
    #[serde(default)]
    pub tickets: Vec<Ticket>,
}

impl DaySchedule {
    /// New available day with default hours for its date.
    pub fn new(
        date: NaiveDate,
        max_cars_capacity: u32,
        policy: &HoursPolicy,
        capacity: CapacityConfig,
    ) -> Self {
        let (start_time, end_time) = policy.window(capacity.hours_open);
        Self {
            date,
            start_time,
            end_time,
            available: true,
            max_cars_capacity,
            current_cars_scheduled: 0,
            notes: String::new(),
            capacity,
            tickets: Vec::new(),
        }
    }

    /// Whether another car may be admitted to the day.
    pub const fn has_room(&self) -> bool {
        self.current_cars_scheduled < self.max_cars_capacity
    }

    /// Cars that may still be admitted.
    pub const fn remaining_slots(&self) -> u32 {
        self.max_cars_capacity.saturating_sub(self.current_cars_scheduled)
    }

    /// Refresh `start_time`/`end_time` from `hours_open`.
    pub fn sync_window(&mut self, policy: &HoursPolicy) {
        let (start, end) = policy.window(self.capacity.hours_open);
        self.start_time = start;
        self.end_time = end;
    }

    /// Check the capacity numbers and every ticket against the rules the setters enforce.
    pub fn validate(&self) -> Result<(), SchedulerError> {
        self.capacity.validate()?;
        for ticket in &self.tickets {
            TicketDraft::from(ticket).validate()?;
        }
        Ok(())
    }

    /// Tickets in one section, in assignment order.
    pub fn section_tickets(&self, section: SectionKind) -> impl Iterator<Item = &Ticket> {
        self.tickets.iter().filter(move |t| t.section == section)
    }

    /// Look up a ticket.
    pub fn ticket(&self, id: TicketId) -> Option<&Ticket> {
        self.tickets.iter().find(|t| t.id == id)
    }

    /// First ticket for a vehicle.
    pub fn ticket_by_vehicle(&self, vehicle_code: &str) -> Option<&Ticket> {
        self.tickets.iter().find(|t| t.vehicle_code == vehicle_code)
    }

    fn ticket_mut(&mut self, id: TicketId) -> Result<&mut Ticket, SchedulerError> {
        self.tickets
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| SchedulerError::NotFound(format!("ticket {id}")))
    }

    /// Status a new ticket gets: pending once the section's active slots are taken.
    pub fn initial_status(&self, section: SectionKind) -> TicketStatus {
        if self.section_tickets(section).count() >= ACTIVE_SLOTS_PER_SECTION {
            TicketStatus::Pending
        } else {
            TicketStatus::Scheduled
        }
    }

    /// Validate and append a ticket. Nothing changes on error.
    pub fn add_ticket(&mut self, draft: TicketDraft, now: DateTime<Utc>) -> Result<Ticket, SchedulerError> {
        draft.validate()?;
        let status = draft.status.unwrap_or_else(|| self.initial_status(draft.section));
        let ticket = draft.into_ticket(status, now);
        self.tickets.push(ticket.clone());
        self.sync_count();
        Ok(ticket)
    }

    /// Overwrite a ticket's status if the transition table allows it.
    pub fn update_status(
        &mut self,
        id: TicketId,
        status: TicketStatus,
        now: DateTime<Utc>,
    ) -> Result<Ticket, SchedulerError> {
        let ticket = self.ticket_mut(id)?;
        if !ticket.status.can_transition_to(status) {
            return Err(SchedulerError::InvalidStatusTransition {
                from: ticket.status,
                to: status,
            });
        }
        if ticket.status != status {
            ticket.status = status;
            ticket.updated_at = now;
        }
        Ok(ticket.clone())
    }

    /// Apply field edits to a ticket.
    pub fn update_ticket(
        &mut self,
        id: TicketId,
        update: TicketUpdate,
        now: DateTime<Utc>,
    ) -> Result<Ticket, SchedulerError> {
        let ticket = self.ticket_mut(id)?;
        ticket.apply(update, now)?;
        Ok(ticket.clone())
    }

    /// Hard-delete a ticket.
    pub fn remove_ticket(&mut self, id: TicketId) -> Result<Ticket, SchedulerError> {
        let index = self
            .tickets
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| SchedulerError::NotFound(format!("ticket {id}")))?;
        let removed = self.tickets.remove(index);
        self.sync_count();
        Ok(removed)
    }

    fn sync_count(&mut self) {
        self.current_cars_scheduled = u32::try_from(self.tickets.len()).unwrap_or(u32::MAX);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn day() -> DaySchedule {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let policy = HoursPolicy::default();
        let capacity = CapacityConfig::for_date(date, &policy, CapacityConfig::default_sections());
        DaySchedule::new(date, 10, &policy, capacity)
    }

    #[test]
    fn test_new_day_window() {
        let d = day();
        assert_eq!(d.end_time, NaiveTime::from_hms_opt(16, 0, 0).unwrap());
        assert!(d.available);
        assert_eq!(d.remaining_slots(), 10);
    }

    #[test]
    fn test_third_ticket_in_section_starts_pending() {
        let mut d = day();
        let now = Utc::now();
        let a = d.add_ticket(TicketDraft::new("A", SectionKind::Mechanical), now).unwrap();
        let b = d.add_ticket(TicketDraft::new("B", SectionKind::Mechanical), now).unwrap();
        let other = d.add_ticket(TicketDraft::new("X", SectionKind::Painter), now).unwrap();
        let c = d.add_ticket(TicketDraft::new("C", SectionKind::Mechanical), now).unwrap();
        assert_eq!(a.status, TicketStatus::Scheduled);
        assert_eq!(b.status, TicketStatus::Scheduled);
        assert_eq!(other.status, TicketStatus::Scheduled);
        assert_eq!(c.status, TicketStatus::Pending);
        assert_eq!(d.current_cars_scheduled, 4);
    }

    #[test]
    fn test_invalid_draft_leaves_day_untouched() {
        let mut d = day();
        let before = d.clone();
        assert!(d.add_ticket(TicketDraft::new("", SectionKind::Painter), Utc::now()).is_err());
        assert_eq!(d, before);
    }

    #[test]
    fn test_update_status_is_idempotent() {
        let mut d = day();
        let now = Utc::now();
        let t = d.add_ticket(TicketDraft::new("A", SectionKind::Electrical), now).unwrap();
        let first = d.update_status(t.id, TicketStatus::Completed, now).unwrap();
        let snapshot = d.clone();
        let second = d.update_status(t.id, TicketStatus::Completed, now).unwrap();
        assert_eq!(first, second);
        assert_eq!(d, snapshot);
    }

    #[test]
    fn test_remove_unknown_ticket() {
        let mut d = day();
        let err = d.remove_ticket(uuid::Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, SchedulerError::NotFound(_)));
    }

    #[test]
    fn test_remove_updates_count() {
        let mut d = DaySchedule::new(
            NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            3,
            &HoursPolicy::default(),
            CapacityConfig::for_date(
                NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
                &HoursPolicy::default(),
                BTreeMap::new(),
            ),
        );
        let t = d.add_ticket(TicketDraft::new("A", SectionKind::Detailer), Utc::now()).unwrap();
        assert_eq!(d.current_cars_scheduled, 1);
        d.remove_ticket(t.id).unwrap();
        assert_eq!(d.current_cars_scheduled, 0);
        assert!(d.has_room());
    }
}
