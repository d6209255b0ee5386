//! In-memory schedule repository.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use parking_lot::RwLock;

use crate::core::{DaySchedule, ScheduleRepository, SchedulerError};

/// Day records held in a map; readers get clones.
#[derive(Debug, Default)]
pub struct InMemoryScheduleRepository {
    days: RwLock<BTreeMap<NaiveDate, DaySchedule>>,
}

impl InMemoryScheduleRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored days.
    pub fn len(&self) -> usize {
        self.days.read().len()
    }

    /// Whether no day is stored.
    pub fn is_empty(&self) -> bool {
        self.days.read().is_empty()
    }
}

impl ScheduleRepository for InMemoryScheduleRepository {
    fn load(&self, date: NaiveDate) -> Result<Option<DaySchedule>, SchedulerError> {
        Ok(self.days.read().get(&date).cloned())
    }

    fn upsert(&self, day: &DaySchedule) -> Result<(), SchedulerError> {
        self.days.write().insert(day.date, day.clone());
        Ok(())
    }

    fn delete(&self, date: NaiveDate) -> Result<(), SchedulerError> {
        self.days.write().remove(&date);
        Ok(())
    }

    fn dates(&self) -> Result<Vec<NaiveDate>, SchedulerError> {
        Ok(self.days.read().keys().copied().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CapacityConfig, HoursPolicy, SectionKind, TicketDraft};

    fn day(d: u32) -> DaySchedule {
        let date = NaiveDate::from_ymd_opt(2026, 11, d).unwrap();
        let policy = HoursPolicy::default();
        DaySchedule::new(date, 5, &policy, CapacityConfig::for_date(date, &policy, CapacityConfig::default_sections()))
    }

    #[test]
    fn test_upsert_load_delete() {
        let repo = InMemoryScheduleRepository::new();
        assert!(repo.is_empty());
        repo.upsert(&day(3)).unwrap();
        repo.upsert(&day(2)).unwrap();
        assert_eq!(repo.len(), 2);
        assert_eq!(repo.dates().unwrap(), vec![day(2).date, day(3).date]);

        repo.delete(day(2).date).unwrap();
        assert!(repo.load(day(2).date).unwrap().is_none());
        repo.delete(day(2).date).unwrap();
    }

    #[test]
    fn test_locate_ticket() {
        let repo = InMemoryScheduleRepository::new();
        let mut d = day(4);
        let t = d.add_ticket(TicketDraft::new("VIN9", SectionKind::Painter), chrono::Utc::now()).unwrap();
        repo.upsert(&day(1)).unwrap();
        repo.upsert(&d).unwrap();
        assert_eq!(repo.locate_ticket(t.id).unwrap(), Some(d.date));
        assert_eq!(repo.locate_ticket(uuid::Uuid::new_v4()).unwrap(), None);
    }
}
