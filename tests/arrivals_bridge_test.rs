//! Arrivals process talking to the intake gate through the Tokio bridge.

use std::sync::Arc;

use chrono::NaiveDate;
use garage_ticket_scheduler::config::SchedulerConfig;
use garage_ticket_scheduler::core::{GarageScheduler, InMemoryActionLog, IntakeRequest, SectionKind};
use garage_ticket_scheduler::infra::InMemoryScheduleRepository;
use garage_ticket_scheduler::runtime::spawn_arrivals_bridge;

fn scheduler() -> Arc<GarageScheduler> {
    Arc::new(GarageScheduler::new(
        SchedulerConfig::default(),
        Arc::new(InMemoryScheduleRepository::new()),
        Box::new(InMemoryActionLog::new(100)),
    ))
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 27).unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_bridge_accepts_then_rejects() {
    let s = scheduler();
    s.define_day(date(), Some(1)).unwrap();
    let (bridge, handle) = spawn_arrivals_bridge(Arc::clone(&s), 8);

    let first = bridge
        .submit(IntakeRequest::new("VIN-1", SectionKind::Electrical, date()))
        .await
        .expect("bridge reply");
    assert!(first.accepted);

    let second = bridge
        .submit(IntakeRequest::new("VIN-2", SectionKind::Electrical, date()))
        .await
        .expect("bridge reply");
    assert!(!second.accepted);
    assert!(second.reason.unwrap().contains("1 of 1"));

    drop(bridge);
    handle.await.expect("bridge task exits cleanly");
    assert_eq!(s.day(date()).unwrap().current_cars_scheduled, 1);
}

#[tokio::test]
async fn test_bridge_reports_missing_schedule() {
    let s = scheduler();
    let (bridge, _handle) = spawn_arrivals_bridge(s, 1);
    let outcome = bridge
        .submit(IntakeRequest::new("VIN-1", SectionKind::Painter, date()))
        .await
        .expect("bridge reply");
    assert!(!outcome.accepted);
    assert!(outcome.reason.unwrap().contains("no schedule defined for 2026-10-27"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_arrivals_share_the_bridge() {
    let s = scheduler();
    s.define_day(date(), Some(5)).unwrap();
    let (bridge, _handle) = spawn_arrivals_bridge(Arc::clone(&s), 4);

    let mut tasks = Vec::new();
    for i in 0..8 {
        let bridge = bridge.clone();
        tasks.push(tokio::spawn(async move {
            bridge
                .submit(IntakeRequest::new(format!("VIN-{i}"), SectionKind::Mechanical, date()))
                .await
                .expect("bridge reply")
                .accepted
        }));
    }
    let mut accepted = 0;
    for task in tasks {
        if task.await.unwrap() {
            accepted += 1;
        }
    }
    assert_eq!(accepted, 5);
}
