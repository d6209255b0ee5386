//! # Garage Ticket Scheduler
//!
//! Daily work-scheduling and capacity engine for a garage workshop.
//!
//! The crate decides which vehicles are being worked on right now, which are
//! queued, how much a workshop section can absorb in a day, and how a repair
//! ticket moves through its work states.
//!
//! ## Core Concepts
//!
//! - **Day schedule**: one per calendar date, owning its tickets in assignment order
//!   and a capacity configuration (workers, hours open, per-section daily capacity).
//! - **Queue admission**: within a section, the first two tickets are active and the
//!   rest are pending with a derived position. Configured capacity does not change this.
//! - **Intake gate**: admits vehicles from the arrivals process while the day is below
//!   its `max_cars_capacity`.
//! - **Action log**: append-only work history per ticket, advisory only.
//! - **Aggregator**: utilization and per-section figures recomputed on every read.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use garage_ticket_scheduler::config::SchedulerConfig;
//! use garage_ticket_scheduler::core::{GarageScheduler, InMemoryActionLog, IntakeRequest, SectionKind};
//! use garage_ticket_scheduler::infra::InMemoryScheduleRepository;
//!
//! let scheduler = GarageScheduler::new(
//!     SchedulerConfig::default(),
//!     Arc::new(InMemoryScheduleRepository::new()),
//!     Box::new(InMemoryActionLog::new(1_000)),
//! );
//! scheduler.define_day(date, Some(12))?;
//! let ticket = scheduler.intake(IntakeRequest::new("VF1RFB00X", SectionKind::Mechanical, date))?;
//! let queue = scheduler.queue(date, SectionKind::Mechanical)?;
//! ```
//!
//! For complete flows, see `tests/scheduling_scenarios_test.rs`.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core scheduling model, algorithms and the scheduler facade.
pub mod core;
/// Configuration models for the scheduler and its backends.
pub mod config;
/// Builders to construct the scheduler from configuration.
pub mod builders;
/// Infrastructure adapters for schedule storage and the action log.
pub mod infra;
/// Runtime adapters for async collaborators.
pub mod runtime;
/// Shared utilities.
pub mod util;
