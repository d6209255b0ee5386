//! File-backed schedule repository.
//!
//! Each day is one pretty-printed JSON record named `<YYYY-MM-DD>.json`.
//! Writes go to a temporary file first and are renamed into place.

use std::fs::{self, create_dir_all};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use parking_lot::Mutex;

use crate::core::{DaySchedule, ScheduleRepository, SchedulerError};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Directory of JSON day records.
pub struct JsonFileScheduleRepository {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileScheduleRepository {
    /// Open (creating if needed) a repository rooted at `dir`.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, SchedulerError> {
        let dir = dir.as_ref().to_path_buf();
        create_dir_all(&dir)?;
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    /// Root directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(format!("{}.json", date.format(DATE_FORMAT)))
    }
}

impl ScheduleRepository for JsonFileScheduleRepository {
    fn load(&self, date: NaiveDate) -> Result<Option<DaySchedule>, SchedulerError> {
        match fs::read_to_string(self.record_path(date)) {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn upsert(&self, day: &DaySchedule) -> Result<(), SchedulerError> {
        let body = serde_json::to_string_pretty(day)?;
        let path = self.record_path(day.date);
        let tmp = path.with_extension("json.tmp");
        let _guard = self.write_lock.lock();
        fs::write(&tmp, body)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn delete(&self, date: NaiveDate) -> Result<(), SchedulerError> {
        let _guard = self.write_lock.lock();
        match fs::remove_file(self.record_path(date)) {
            Err(err) if err.kind() != ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }

    fn dates(&self) -> Result<Vec<NaiveDate>, SchedulerError> {
        let mut dates = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match NaiveDate::parse_from_str(stem, DATE_FORMAT) {
                Ok(date) => dates.push(date),
                Err(_) => tracing::debug!(file = %path.display(), "skipping non-schedule file"),
            }
        }
        dates.sort_unstable();
        Ok(dates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CapacityConfig, HoursPolicy, SectionKind, TicketDraft};

    fn day() -> DaySchedule {
        let date = NaiveDate::from_ymd_opt(2026, 12, 1).unwrap();
        let policy = HoursPolicy::default();
        DaySchedule::new(date, 4, &policy, CapacityConfig::for_date(date, &policy, CapacityConfig::default_sections()))
    }

    #[test]
    fn test_round_trip_on_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let repo = JsonFileScheduleRepository::new(tmp.path()).unwrap();
        let mut d = day();
        d.add_ticket(TicketDraft::new("VIN1", SectionKind::BodyWork).with_flags(true, false), chrono::Utc::now())
            .unwrap();
        repo.upsert(&d).unwrap();

        let reopened = JsonFileScheduleRepository::new(tmp.path()).unwrap();
        assert_eq!(reopened.load(d.date).unwrap(), Some(d.clone()));
        assert_eq!(reopened.dates().unwrap(), vec![d.date]);
        assert!(tmp.path().join("2026-12-01.json").exists());
    }

    #[test]
    fn test_missing_and_stray_files() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("notes.txt"), "hello").unwrap();
        fs::write(tmp.path().join("readme.json"), "{}").unwrap();
        let repo = JsonFileScheduleRepository::new(tmp.path()).unwrap();
        assert!(repo.dates().unwrap().is_empty());
        assert!(repo.load(day().date).unwrap().is_none());
        repo.delete(day().date).unwrap();
    }

    #[test]
    fn test_corrupt_record_is_backend_error() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("2026-12-01.json"), "{ not json").unwrap();
        let repo = JsonFileScheduleRepository::new(tmp.path()).unwrap();
        assert!(matches!(repo.load(day().date), Err(SchedulerError::Backend(_))));
    }
}
