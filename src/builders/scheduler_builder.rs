//! Build a [`GarageScheduler`] with the backends named in its configuration.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::config::{ActionLogBackendConfig, RepositoryBackendConfig, SchedulerConfig};
use crate::core::{
    ActionLogSink, AppResult, GarageScheduler, InMemoryActionLog, ScheduleRepository, SchedulerError,
};
use crate::infra::{InMemoryScheduleRepository, JsonFileScheduleRepository, JsonLinesActionLog};

fn data_dir(cfg: &SchedulerConfig) -> Result<&Path, SchedulerError> {
    cfg.data_dir
        .as_deref()
        .ok_or_else(|| SchedulerError::Backend("data_dir is required for file-backed adapters".into()))
}

/// Build a scheduler from validated configuration.
pub fn build_scheduler(cfg: SchedulerConfig) -> Result<GarageScheduler, SchedulerError> {
    cfg.validate()
        .map_err(|e| SchedulerError::Backend(format!("config invalid: {e}")))?;

    let repository: Arc<dyn ScheduleRepository> = match cfg.repository {
        RepositoryBackendConfig::InMemory => Arc::new(InMemoryScheduleRepository::new()),
        RepositoryBackendConfig::JsonFile => {
            Arc::new(JsonFileScheduleRepository::new(data_dir(&cfg)?.join("schedules"))?)
        }
    };
    let action_log: Box<dyn ActionLogSink> = match cfg.action_log {
        ActionLogBackendConfig::InMemory => Box::new(InMemoryActionLog::new(cfg.action_log_capacity)),
        ActionLogBackendConfig::JsonLines => Box::new(JsonLinesActionLog::new(data_dir(&cfg)?)?),
    };

    tracing::info!(
        repository = ?cfg.repository,
        action_log = ?cfg.action_log,
        short_day = %cfg.short_day,
        "scheduler built"
    );
    Ok(GarageScheduler::new(cfg, repository, action_log))
}

/// Read configuration from the environment and build a scheduler.
pub fn build_scheduler_from_env() -> AppResult<GarageScheduler> {
    let cfg = SchedulerConfig::from_env()
        .map_err(anyhow::Error::msg)
        .context("loading scheduler configuration from environment")?;
    let scheduler = build_scheduler(cfg).context("building garage scheduler")?;
    Ok(scheduler)
}
