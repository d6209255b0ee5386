//! Tests for action log sinks

use chrono::{TimeDelta, TimeZone, Utc};
use garage_ticket_scheduler::core::{build_action_entry, ActionKind, ActionLogSink, InMemoryActionLog};

#[test]
fn test_in_memory_action_log() {
    let mut log = InMemoryActionLog::new(10);
    let at = Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap();

    log.record(build_action_entry("VIN1", ActionKind::Complete, "ana", Some("ok".to_string()), at))
        .unwrap();

    let recent = log.recent_for("VIN1", 1).unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].action, ActionKind::Complete);
    assert_eq!(recent[0].actor_id, "ana");
    assert_eq!(recent[0].notes.as_deref(), Some("ok"));
}

#[test]
fn test_entries_non_decreasing_timestamps() {
    let mut log = InMemoryActionLog::new(100);
    let base = Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap();
    for offset in [30, 0, 45, 15, 15, 60] {
        log.record(build_action_entry(
            "VIN1",
            ActionKind::Resume,
            "ana",
            None,
            base + TimeDelta::minutes(offset),
        ))
        .unwrap();
    }
    let entries = log.entries_for("VIN1").unwrap();
    assert!(entries.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    let ties: Vec<_> = entries
        .iter()
        .filter(|e| e.timestamp == base + TimeDelta::minutes(15))
        .map(|e| e.sequence)
        .collect();
    assert_eq!(ties, vec![3, 4]);
}

#[test]
fn test_zero_capacity_log_fails() {
    let mut log = InMemoryActionLog::new(0);
    let result = log.record(build_action_entry("VIN1", ActionKind::Start, "ana", None, Utc::now()));
    assert!(result.is_err());
}

#[test]
fn test_action_kind_wire_names() {
    for kind in ActionKind::ALL {
        let parsed: ActionKind = kind.as_str().parse().unwrap();
        assert_eq!(parsed, kind);
    }
    let json = serde_json::to_string(&ActionKind::TestDrive).unwrap();
    assert_eq!(json, "\"test_drive\"");
}
