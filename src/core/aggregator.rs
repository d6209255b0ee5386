//! Read-only derived views over a day.
//!
//! Everything is recomputed from the snapshot passed in; nothing is cached.

use chrono::NaiveDate;
use serde::Serialize;

use crate::core::admission::{partition_day, QueuePartition};
use crate::core::model::{Priority, SectionKind, TicketStatus};
use crate::core::schedule::DaySchedule;
use crate::core::ticket::Ticket;

/// Ticket counts per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    /// `pending` tickets.
    pub pending: usize,
    /// `scheduled` tickets.
    pub scheduled: usize,
    /// `in_progress` tickets.
    pub in_progress: usize,
    /// `completed` tickets.
    pub completed: usize,
    /// `delayed` tickets.
    pub delayed: usize,
}

impl StatusCounts {
    fn tally<'a>(tickets: impl IntoIterator<Item = &'a Ticket>) -> Self {
        let mut counts = Self::default();
        for ticket in tickets {
            match ticket.status {
                TicketStatus::Pending => counts.pending += 1,
                TicketStatus::Scheduled => counts.scheduled += 1,
                TicketStatus::InProgress => counts.in_progress += 1,
                TicketStatus::Completed => counts.completed += 1,
                TicketStatus::Delayed => counts.delayed += 1,
            }
        }
        counts
    }

    /// Sum of all counts.
    pub const fn total(&self) -> usize {
        self.pending + self.scheduled + self.in_progress + self.completed + self.delayed
    }
}

/// Figures for one section of one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionStats {
    /// Section described.
    pub section: SectionKind,
    /// Tickets in the section.
    pub total: usize,
    /// Counts per status.
    pub by_status: StatusCounts,
    /// High-priority tickets.
    pub high_priority: usize,
    /// Configured daily capacity.
    pub daily_capacity: u32,
    /// Configured workers.
    pub workers_assigned: u32,
    /// `total / daily_capacity` as a percentage; 0 without capacity.
    pub utilization_pct: f64,
}

/// Figures for a whole day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayStats {
    /// Day described.
    pub date: NaiveDate,
    /// Whether the workshop operates.
    pub available: bool,
    /// Tickets in the day.
    pub total_tickets: usize,
    /// Counts per status.
    pub by_status: StatusCounts,
    /// High-priority tickets.
    pub high_priority: usize,
    /// Tickets flagged as special event.
    pub special_events: usize,
    /// Tickets flagged as owner request.
    pub owner_requests: usize,
    /// Sum of section daily capacities.
    pub total_day_capacity: u32,
    /// Day-level admission ceiling.
    pub max_cars_capacity: u32,
    /// Cars that may still be admitted.
    pub remaining_slots: u32,
    /// Ticket count over total day capacity, as a percentage.
    pub utilization_pct: f64,
    /// Sum of ticket duration estimates.
    pub estimated_hours: f64,
    /// `total_workers * hours_open`.
    pub available_worker_hours: u32,
}

/// Everything the presentation layer needs for a day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleView {
    /// Day figures.
    pub stats: DayStats,
    /// Per-section figures, in [`SectionKind::ALL`] order.
    pub sections: Vec<SectionStats>,
    /// Per-section active/pending partitions.
    pub queues: Vec<QueuePartition>,
}

#[allow(clippy::cast_precision_loss)]
fn percentage(count: usize, capacity: u32) -> f64 {
    if capacity == 0 {
        return 0.0;
    }
    count as f64 / f64::from(capacity) * 100.0
}

/// Ticket count over total day capacity, in percent. Zero capacity gives 0.
pub fn utilization(day: &DaySchedule) -> f64 {
    percentage(day.tickets.len(), day.capacity.total_day_capacity())
}

/// Figures for one section.
pub fn section_stats(day: &DaySchedule, section: SectionKind) -> SectionStats {
    let capacity = day.capacity.section(section);
    let total = day.section_tickets(section).count();
    SectionStats {
        section,
        total,
        by_status: StatusCounts::tally(day.section_tickets(section)),
        high_priority: day
            .section_tickets(section)
            .filter(|t| t.priority == Priority::High)
            .count(),
        daily_capacity: capacity.daily_capacity,
        workers_assigned: capacity.workers_assigned,
        utilization_pct: percentage(total, capacity.daily_capacity),
    }
}

/// Figures for the whole day.
pub fn day_stats(day: &DaySchedule) -> DayStats {
    DayStats {
        date: day.date,
        available: day.available,
        total_tickets: day.tickets.len(),
        by_status: StatusCounts::tally(&day.tickets),
        high_priority: day.tickets.iter().filter(|t| t.priority == Priority::High).count(),
        special_events: day.tickets.iter().filter(|t| t.is_special_event).count(),
        owner_requests: day.tickets.iter().filter(|t| t.is_owner_request).count(),
        total_day_capacity: day.capacity.total_day_capacity(),
        max_cars_capacity: day.max_cars_capacity,
        remaining_slots: day.remaining_slots(),
        utilization_pct: utilization(day),
        estimated_hours: day.tickets.iter().map(|t| t.estimated_duration_hours).sum(),
        available_worker_hours: day.capacity.worker_hours(),
    }
}

/// Day figures, section figures and queues in one snapshot.
pub fn view(day: &DaySchedule) -> ScheduleView {
    ScheduleView {
        stats: day_stats(day),
        sections: SectionKind::ALL
            .into_iter()
            .map(|section| section_stats(day, section))
            .collect(),
        queues: partition_day(day),
    }
}
