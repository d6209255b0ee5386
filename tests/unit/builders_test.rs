//! Tests for builder modules

use garage_ticket_scheduler::builders::build_scheduler;
use garage_ticket_scheduler::config::SchedulerConfig;

#[test]
fn test_build_scheduler_defaults() {
    let scheduler = build_scheduler(SchedulerConfig::default()).unwrap();
    assert_eq!(scheduler.config().default_max_cars, 25);
    assert!(scheduler.defined_dates().unwrap().is_empty());
}

#[test]
fn test_build_scheduler_rejects_invalid_config() {
    let cfg = SchedulerConfig {
        regular_hours: 0,
        ..SchedulerConfig::default()
    };
    assert!(build_scheduler(cfg).is_err());
}
