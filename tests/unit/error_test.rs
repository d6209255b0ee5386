//! Tests for error types

use chrono::NaiveDate;
use garage_ticket_scheduler::core::{SchedulerError, TicketStatus};

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 22).unwrap()
}

#[test]
fn test_schedule_not_found_names_date() {
    let err = SchedulerError::ScheduleNotFound(date());
    assert_eq!(
        format!("{}", err),
        "no schedule defined for 2026-10-22; define the day or pick another date"
    );
}

#[test]
fn test_capacity_exceeded_names_limit() {
    let err = SchedulerError::CapacityExceeded {
        date: date(),
        current: 12,
        max: 12,
    };
    assert_eq!(
        format!("{}", err),
        "capacity exceeded for 2026-10-22: 12 of 12 cars already scheduled"
    );
}

#[test]
fn test_invalid_transition_error() {
    let err = SchedulerError::InvalidStatusTransition {
        from: TicketStatus::Completed,
        to: TicketStatus::Pending,
    };
    assert_eq!(format!("{}", err), "invalid status transition from completed to pending");
}

#[test]
fn test_validation_and_backend_errors() {
    let err = SchedulerError::Validation("vehicle code is required".to_string());
    assert_eq!(format!("{}", err), "validation error: vehicle code is required");
    let err = SchedulerError::Backend("disk full".to_string());
    assert_eq!(format!("{}", err), "backend error: disk full");
}

#[test]
fn test_io_error_maps_to_backend() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
    assert!(matches!(SchedulerError::from(io), SchedulerError::Backend(_)));
}
