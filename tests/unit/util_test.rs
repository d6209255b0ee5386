//! Tests for utility functions

use chrono::{TimeDelta, TimeZone, Utc};
use garage_ticket_scheduler::util::{init_tracing, Clock, ManualClock, SystemClock};

#[test]
fn test_manual_clock_moves_only_when_told() {
    let start = Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap();
    let clock = ManualClock::new(start);
    assert_eq!(clock.now(), start);
    clock.advance(TimeDelta::minutes(90));
    assert_eq!(clock.now(), start + TimeDelta::minutes(90));
    clock.set(start);
    assert_eq!(clock.now(), start);
}

#[test]
fn test_system_clock_is_current() {
    let before = Utc::now();
    let now = SystemClock.now();
    assert!(now >= before);
}

#[test]
fn test_init_tracing_is_repeatable() {
    init_tracing();
    init_tracing();
}
