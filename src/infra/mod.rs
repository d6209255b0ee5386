//! Infrastructure adapters for schedule storage and the action log.

pub mod action_log;
pub mod repository;

pub use action_log::JsonLinesActionLog;
pub use repository::{InMemoryScheduleRepository, JsonFileScheduleRepository};
