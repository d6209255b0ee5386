//! Core scheduling abstractions and capacity accounting.

pub mod action_log;
pub mod admission;
pub mod aggregator;
pub mod capacity;
pub mod error;
pub mod intake;
pub mod model;
pub mod schedule;
pub mod scheduler;
pub mod ticket;

pub use action_log::{
    build_action_entry, ActionKind, ActionLogEntry, ActionLogSink, InMemoryActionLog,
};
pub use admission::{
    partition, partition_day, partition_section, PendingTicket, QueuePartition,
    ACTIVE_SLOTS_PER_SECTION,
};
pub use aggregator::{DayStats, ScheduleView, SectionStats, StatusCounts};
pub use capacity::{CapacityConfig, CapacityField, HoursPolicy, SectionCapacity};
pub use error::{AppResult, SchedulerError};
pub use intake::{admit, IntakeOutcome, IntakeRequest};
pub use model::{Priority, SectionKind, TicketId, TicketStatus};
pub use schedule::DaySchedule;
pub use scheduler::{GarageScheduler, ScheduleRepository, SharedActionLog};
pub use ticket::{Ticket, TicketDraft, TicketUpdate};
