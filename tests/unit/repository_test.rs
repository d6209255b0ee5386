//! Tests for schedule repositories

use chrono::{NaiveDate, Utc};
use garage_ticket_scheduler::core::{
    CapacityConfig, DaySchedule, HoursPolicy, ScheduleRepository, SectionKind, TicketDraft,
};
use garage_ticket_scheduler::infra::{InMemoryScheduleRepository, JsonFileScheduleRepository};

fn sample_day(day: u32) -> DaySchedule {
    let date = NaiveDate::from_ymd_opt(2026, 10, day).unwrap();
    let policy = HoursPolicy::default();
    let mut schedule = DaySchedule::new(
        date,
        6,
        &policy,
        CapacityConfig::for_date(date, &policy, CapacityConfig::default_sections()),
    );
    schedule
        .add_ticket(TicketDraft::new(format!("VIN-{day}"), SectionKind::Electrical), Utc::now())
        .unwrap();
    schedule
}

fn exercise(repo: &dyn ScheduleRepository) {
    let a = sample_day(20);
    let b = sample_day(21);
    repo.upsert(&b).unwrap();
    repo.upsert(&a).unwrap();
    assert_eq!(repo.dates().unwrap(), vec![a.date, b.date]);
    assert_eq!(repo.load(a.date).unwrap(), Some(a.clone()));

    let ticket_id = b.tickets[0].id;
    assert_eq!(repo.locate_ticket(ticket_id).unwrap(), Some(b.date));

    repo.delete(b.date).unwrap();
    assert_eq!(repo.dates().unwrap(), vec![a.date]);
    assert_eq!(repo.locate_ticket(ticket_id).unwrap(), None);
}

#[test]
fn test_in_memory_repository_contract() {
    exercise(&InMemoryScheduleRepository::new());
}

#[test]
fn test_json_file_repository_contract() {
    let tmp = tempfile::tempdir().unwrap();
    exercise(&JsonFileScheduleRepository::new(tmp.path()).unwrap());
}
