//! Active/pending partition of a section's tickets.
//!
//! The first [`ACTIVE_SLOTS_PER_SECTION`] tickets of a section, in assignment
//! order, are active. The rest are pending with a 1-based position. Positions
//! are derived on every call and never stored.

use serde::Serialize;

use crate::core::model::SectionKind;
use crate::core::schedule::DaySchedule;
use crate::core::ticket::Ticket;

/// Physical working slots per section, independent of configured capacity or workers.
pub const ACTIVE_SLOTS_PER_SECTION: usize = 2;

/// A queued ticket and its place in line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingTicket {
    /// 1-based place in the section queue.
    pub position: usize,
    /// The queued ticket.
    pub ticket: Ticket,
}

/// Active and pending tickets of one section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueuePartition {
    /// Section partitioned.
    pub section: SectionKind,
    /// Tickets occupying the working slots.
    pub active: Vec<Ticket>,
    /// Tickets waiting, in order.
    pub pending: Vec<PendingTicket>,
}

impl QueuePartition {
    /// Number of active tickets; never above [`ACTIVE_SLOTS_PER_SECTION`].
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Queue position of a ticket, if it is pending.
    pub fn position_of(&self, vehicle_code: &str) -> Option<usize> {
        self.pending
            .iter()
            .find(|p| p.ticket.vehicle_code == vehicle_code)
            .map(|p| p.position)
    }
}

/// Partition `tickets` (already in assignment order) for `section`.
pub fn partition<'a, I>(section: SectionKind, tickets: I) -> QueuePartition
where
    I: IntoIterator<Item = &'a Ticket>,
{
    let mut active = Vec::with_capacity(ACTIVE_SLOTS_PER_SECTION);
    let mut pending = Vec::new();
    for (index, ticket) in tickets.into_iter().filter(|t| t.section == section).enumerate() {
        if index < ACTIVE_SLOTS_PER_SECTION {
            active.push(ticket.clone());
        } else {
            pending.push(PendingTicket {
                position: index + 1 - ACTIVE_SLOTS_PER_SECTION,
                ticket: ticket.clone(),
            });
        }
    }
    QueuePartition {
        section,
        active,
        pending,
    }
}

/// Partition one section of a day.
pub fn partition_section(day: &DaySchedule, section: SectionKind) -> QueuePartition {
    partition(section, &day.tickets)
}

/// Partition every section of a day, in [`SectionKind::ALL`] order.
pub fn partition_day(day: &DaySchedule) -> Vec<QueuePartition> {
    SectionKind::ALL
        .into_iter()
        .map(|section| partition_section(day, section))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::core::model::TicketStatus;
    use crate::core::ticket::TicketDraft;

    fn tickets(codes: &[(&str, SectionKind)]) -> Vec<Ticket> {
        let now = Utc::now();
        codes
            .iter()
            .map(|(code, section)| TicketDraft::new(*code, *section).into_ticket(TicketStatus::Scheduled, now))
            .collect()
    }

    #[test]
    fn test_first_two_are_active() {
        let ts = tickets(&[
            ("A", SectionKind::Mechanical),
            ("B", SectionKind::Mechanical),
            ("C", SectionKind::Mechanical),
        ]);
        let p = partition(SectionKind::Mechanical, &ts);
        let active: Vec<_> = p.active.iter().map(|t| t.vehicle_code.as_str()).collect();
        assert_eq!(active, ["A", "B"]);
        assert_eq!(p.pending.len(), 1);
        assert_eq!(p.pending[0].ticket.vehicle_code, "C");
        assert_eq!(p.pending[0].position, 1);
    }

    #[test]
    fn test_other_sections_ignored() {
        let ts = tickets(&[
            ("A", SectionKind::Painter),
            ("B", SectionKind::Mechanical),
            ("C", SectionKind::Painter),
            ("D", SectionKind::Painter),
            ("E", SectionKind::Painter),
        ]);
        let p = partition(SectionKind::Painter, &ts);
        assert_eq!(p.active_count(), 2);
        assert_eq!(p.position_of("D"), Some(1));
        assert_eq!(p.position_of("E"), Some(2));
        assert_eq!(p.position_of("B"), None);
    }

    #[test]
    fn test_fewer_than_two_all_active() {
        let ts = tickets(&[("A", SectionKind::Detailer)]);
        let p = partition(SectionKind::Detailer, &ts);
        assert_eq!(p.active_count(), 1);
        assert!(p.pending.is_empty());

        let empty = partition(SectionKind::Electrical, &ts);
        assert!(empty.active.is_empty());
        assert!(empty.pending.is_empty());
    }

    #[test]
    fn test_active_never_exceeds_slots() {
        for n in 0..12 {
            let codes: Vec<String> = (0..n).map(|i| format!("V{i}")).collect();
            let pairs: Vec<(&str, SectionKind)> =
                codes.iter().map(|c| (c.as_str(), SectionKind::BodyWork)).collect();
            let p = partition(SectionKind::BodyWork, &tickets(&pairs));
            assert!(p.active_count() <= ACTIVE_SLOTS_PER_SECTION);
            assert_eq!(p.active_count() + p.pending.len(), n);
            for (i, pending) in p.pending.iter().enumerate() {
                assert_eq!(pending.position, i + 1);
                assert_eq!(pending.ticket.vehicle_code, format!("V{}", i + ACTIVE_SLOTS_PER_SECTION));
            }
        }
    }
}
