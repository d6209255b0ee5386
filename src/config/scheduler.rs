//! Scheduler configuration structures.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::core::capacity::{
    CapacityConfig, HoursPolicy, SectionCapacity, MAX_HOURS_OPEN, MAX_SECTION_VALUE, MIN_HOURS_OPEN,
};
use crate::core::model::SectionKind;

/// Schedule repository selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepositoryBackendConfig {
    /// In-memory store for development/testing.
    #[default]
    InMemory,
    /// One JSON record per day under `data_dir`.
    JsonFile,
}

/// Action log backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionLogBackendConfig {
    /// Bounded in-memory ring.
    #[default]
    InMemory,
    /// Append-only JSON-lines file under `data_dir`.
    JsonLines,
}

/// Root scheduler configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Weekly half-day.
    pub short_day: Weekday,
    /// Default hours on regular days.
    pub regular_hours: u32,
    /// Default hours on the short day.
    pub short_day_hours: u32,
    /// Opening time.
    pub day_start: NaiveTime,
    /// Admission ceiling for days defined without one.
    pub default_max_cars: u32,
    /// Entries kept by the in-memory action log.
    pub action_log_capacity: usize,
    /// Section numbers for new days.
    pub section_defaults: BTreeMap<SectionKind, SectionCapacity>,
    /// Repository backend.
    pub repository: RepositoryBackendConfig,
    /// Action log backend.
    pub action_log: ActionLogBackendConfig,
    /// Directory for file-backed adapters.
    pub data_dir: Option<PathBuf>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        let policy = HoursPolicy::default();
        Self {
            short_day: policy.short_day,
            regular_hours: policy.regular_hours,
            short_day_hours: policy.short_day_hours,
            day_start: policy.day_start,
            default_max_cars: 25,
            action_log_capacity: 10_000,
            section_defaults: CapacityConfig::default_sections(),
            repository: RepositoryBackendConfig::InMemory,
            action_log: ActionLogBackendConfig::InMemory,
            data_dir: None,
        }
    }
}

impl SchedulerConfig {
    /// Hours rules derived from this configuration.
    pub const fn hours_policy(&self) -> HoursPolicy {
        HoursPolicy {
            short_day: self.short_day,
            regular_hours: self.regular_hours,
            short_day_hours: self.short_day_hours,
            day_start: self.day_start,
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        let hours = MIN_HOURS_OPEN..=MAX_HOURS_OPEN;
        if !hours.contains(&self.regular_hours) {
            return Err(format!(
                "regular_hours must be within {MIN_HOURS_OPEN}..={MAX_HOURS_OPEN}"
            ));
        }
        if !hours.contains(&self.short_day_hours) {
            return Err(format!(
                "short_day_hours must be within {MIN_HOURS_OPEN}..={MAX_HOURS_OPEN}"
            ));
        }
        if self.action_log_capacity == 0 {
            return Err("action_log_capacity must be greater than 0".into());
        }
        for (section, cap) in &self.section_defaults {
            if cap.workers_assigned > MAX_SECTION_VALUE || cap.daily_capacity > MAX_SECTION_VALUE {
                return Err(format!(
                    "section `{section}` values must not exceed {MAX_SECTION_VALUE}"
                ));
            }
        }
        let needs_dir = self.repository == RepositoryBackendConfig::JsonFile
            || self.action_log == ActionLogBackendConfig::JsonLines;
        if needs_dir && self.data_dir.is_none() {
            return Err("data_dir is required for file-backed adapters".into());
        }
        Ok(())
    }

    /// Parse scheduler configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read `GARAGE_*` variables (after loading `.env`) over the defaults and validate.
    pub fn from_env() -> Result<Self, String> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from a key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(v) = lookup("GARAGE_SHORT_DAY") {
            cfg.short_day = v
                .parse()
                .map_err(|_| format!("GARAGE_SHORT_DAY: unknown weekday `{v}`"))?;
        }
        if let Some(v) = lookup("GARAGE_REGULAR_HOURS") {
            cfg.regular_hours = parse_var("GARAGE_REGULAR_HOURS", &v)?;
        }
        if let Some(v) = lookup("GARAGE_SHORT_DAY_HOURS") {
            cfg.short_day_hours = parse_var("GARAGE_SHORT_DAY_HOURS", &v)?;
        }
        if let Some(v) = lookup("GARAGE_DAY_START") {
            cfg.day_start = NaiveTime::parse_from_str(&v, "%H:%M")
                .map_err(|e| format!("GARAGE_DAY_START: {e}"))?;
        }
        if let Some(v) = lookup("GARAGE_DEFAULT_MAX_CARS") {
            cfg.default_max_cars = parse_var("GARAGE_DEFAULT_MAX_CARS", &v)?;
        }
        if let Some(v) = lookup("GARAGE_ACTION_LOG_CAPACITY") {
            cfg.action_log_capacity = parse_var("GARAGE_ACTION_LOG_CAPACITY", &v)?;
        }
        if let Some(v) = lookup("GARAGE_DATA_DIR") {
            cfg.data_dir = Some(PathBuf::from(v));
            cfg.repository = RepositoryBackendConfig::JsonFile;
            cfg.action_log = ActionLogBackendConfig::JsonLines;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, String>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e| format!("{key}: {e}"))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let cfg = SchedulerConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.hours_policy(), HoursPolicy::default());
    }

    #[test]
    fn test_lookup_overrides() {
        let vars = HashMap::from([
            ("GARAGE_SHORT_DAY", "Friday"),
            ("GARAGE_SHORT_DAY_HOURS", "5"),
            ("GARAGE_DAY_START", "07:30"),
        ]);
        let cfg = SchedulerConfig::from_lookup(|k| vars.get(k).map(|v| (*v).to_string())).unwrap();
        assert_eq!(cfg.short_day, Weekday::Fri);
        assert_eq!(cfg.short_day_hours, 5);
        assert_eq!(cfg.day_start, NaiveTime::from_hms_opt(7, 30, 0).unwrap());
        assert_eq!(cfg.regular_hours, 8);
    }

    #[test]
    fn test_lookup_rejects_garbage() {
        let err = SchedulerConfig::from_lookup(|k| (k == "GARAGE_REGULAR_HOURS").then(|| "lots".to_string()))
            .unwrap_err();
        assert!(err.starts_with("GARAGE_REGULAR_HOURS"));
    }

    #[test]
    fn test_data_dir_switches_to_files() {
        let cfg = SchedulerConfig::from_lookup(|k| (k == "GARAGE_DATA_DIR").then(|| "/tmp/garage".to_string()))
            .unwrap();
        assert_eq!(cfg.repository, RepositoryBackendConfig::JsonFile);
        assert_eq!(cfg.action_log, ActionLogBackendConfig::JsonLines);
    }
}
