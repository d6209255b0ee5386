//! Tests for configuration validation

use garage_ticket_scheduler::config::{RepositoryBackendConfig, SchedulerConfig};
use garage_ticket_scheduler::core::{SectionCapacity, SectionKind};

#[test]
fn test_scheduler_config_from_json() {
    let json = r#"{
        "short_day": "Fri",
        "regular_hours": 9,
        "short_day_hours": 5,
        "default_max_cars": 18,
        "section_defaults": {
            "electrical": { "workers_assigned": 2, "daily_capacity": 6 },
            "mechanic": { "workers_assigned": 4, "daily_capacity": 10 }
        }
    }"#;

    let config = SchedulerConfig::from_json_str(json).unwrap();
    assert_eq!(config.short_day, chrono::Weekday::Fri);
    assert_eq!(config.regular_hours, 9);
    assert_eq!(config.default_max_cars, 18);
    assert_eq!(
        config.section_defaults.get(&SectionKind::Mechanical),
        Some(&SectionCapacity::new(4, 10))
    );
    assert_eq!(config.repository, RepositoryBackendConfig::InMemory);
}

#[test]
fn test_invalid_hours_rejected() {
    let config = SchedulerConfig {
        regular_hours: 15,
        ..SchedulerConfig::default()
    };
    assert!(config.validate().is_err());

    let config = SchedulerConfig {
        short_day_hours: 1,
        ..SchedulerConfig::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_zero_action_log_capacity_rejected() {
    let config = SchedulerConfig {
        action_log_capacity: 0,
        ..SchedulerConfig::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_section_default_over_limit_rejected() {
    let mut config = SchedulerConfig::default();
    config
        .section_defaults
        .insert(SectionKind::Painter, SectionCapacity::new(1, 21));
    let err = config.validate().unwrap_err();
    assert!(err.contains("painter"));
}

#[test]
fn test_json_parse_error() {
    let err = SchedulerConfig::from_json_str("{ nope").unwrap_err();
    assert!(err.starts_with("parse error"));
}

#[test]
fn test_json_file_backend_requires_dir() {
    let err = SchedulerConfig::from_json_str(r#"{ "repository": "json_file" }"#).unwrap_err();
    assert!(err.contains("data_dir"));
}
