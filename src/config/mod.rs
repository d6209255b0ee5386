//! Configuration models for the scheduler and its storage backends.

pub mod scheduler;

pub use scheduler::{ActionLogBackendConfig, RepositoryBackendConfig, SchedulerConfig};
