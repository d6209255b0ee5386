//! Per-day staffing and throughput limits.
//!
//! A [`CapacityConfig`] supplies the denominator for utilization and the
//! per-section planning ceilings. Operator input is clamped or ignored rather
//! than rejected, so a stored config never holds out-of-range values.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, NaiveTime, TimeDelta, Weekday};
use serde::{Deserialize, Serialize};

use crate::core::model::SectionKind;
use crate::core::SchedulerError;

/// Lowest accepted value for `hours_open`.
pub const MIN_HOURS_OPEN: u32 = 2;
/// Highest accepted value for `hours_open`.
pub const MAX_HOURS_OPEN: u32 = 12;
/// Upper bound for section workers and section daily capacity.
pub const MAX_SECTION_VALUE: u32 = 20;

/// Staffing and throughput for one section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SectionCapacity {
    /// Workers nominally assigned to the section.
    pub workers_assigned: u32,
    /// Tickets the section may take in a day.
    pub daily_capacity: u32,
}

impl SectionCapacity {
    /// Build a section capacity.
    pub const fn new(workers_assigned: u32, daily_capacity: u32) -> Self {
        Self {
            workers_assigned,
            daily_capacity,
        }
    }
}

/// Which section number an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapacityField {
    /// `workers_assigned`.
    WorkersAssigned,
    /// `daily_capacity`.
    DailyCapacity,
}

/// Rules for a day's default opening hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoursPolicy {
    /// The workshop's weekly half-day.
    pub short_day: Weekday,
    /// Hours on every other day.
    pub regular_hours: u32,
    /// Hours on the short day.
    pub short_day_hours: u32,
    /// Opening time of every day.
    pub day_start: NaiveTime,
}

impl Default for HoursPolicy {
    fn default() -> Self {
        Self {
            short_day: Weekday::Sat,
            regular_hours: 8,
            short_day_hours: 6,
            day_start: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or_default(),
        }
    }
}

impl HoursPolicy {
    /// Whether `date` falls on the short day.
    pub fn is_short_day(&self, date: NaiveDate) -> bool {
        date.weekday() == self.short_day
    }

    /// Default `hours_open` for `date`.
    pub fn default_hours(&self, date: NaiveDate) -> u32 {
        if self.is_short_day(date) {
            self.short_day_hours
        } else {
            self.regular_hours
        }
    }

    /// Opening and closing time for a day open `hours` long.
    pub fn window(&self, hours: u32) -> (NaiveTime, NaiveTime) {
        let end = self.day_start + TimeDelta::hours(i64::from(hours));
        (self.day_start, end)
    }
}

/// Staffing and capacity numbers for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityConfig {
    /// Operator-entered headcount; not reconciled with section workers.
    pub total_workers: u32,
    /// Hours the workshop is open.
    pub hours_open: u32,
    /// Set once an operator edits `hours_open`; default recomputation skips the day.
    #[serde(default)]
    pub hours_overridden: bool,
    /// Per-section numbers.
    pub sections: BTreeMap<SectionKind, SectionCapacity>,
    /// Free text such as staff absence.
    #[serde(default)]
    pub special_issues: String,
}

impl CapacityConfig {
    /// Section numbers used when a day is created without explicit ones.
    pub fn default_sections() -> BTreeMap<SectionKind, SectionCapacity> {
        BTreeMap::from([
            (SectionKind::Electrical, SectionCapacity::new(2, 6)),
            (SectionKind::Mechanical, SectionCapacity::new(3, 10)),
            (SectionKind::BodyWork, SectionCapacity::new(1, 3)),
            (SectionKind::Painter, SectionCapacity::new(1, 2)),
            (SectionKind::Detailer, SectionCapacity::new(1, 4)),
        ])
    }

    /// Capacity for `date` with default hours and the given section numbers.
    pub fn for_date(
        date: NaiveDate,
        policy: &HoursPolicy,
        sections: BTreeMap<SectionKind, SectionCapacity>,
    ) -> Self {
        let total_workers = sections.values().map(|s| s.workers_assigned).sum();
        Self {
            total_workers,
            hours_open: policy.default_hours(date),
            hours_overridden: false,
            sections,
            special_issues: String::new(),
        }
    }

    /// Numbers for one section; unconfigured sections read as zero.
    pub fn section(&self, section: SectionKind) -> SectionCapacity {
        self.sections.get(&section).copied().unwrap_or_default()
    }

    /// Sum of section daily capacities.
    pub fn total_day_capacity(&self) -> u32 {
        self.sections.values().map(|s| s.daily_capacity).sum()
    }

    /// Sum of section worker counts.
    pub fn assigned_workers(&self) -> u32 {
        self.sections.values().map(|s| s.workers_assigned).sum()
    }

    /// Worker-hours available in the day.
    pub const fn worker_hours(&self) -> u32 {
        self.total_workers.saturating_mul(self.hours_open)
    }

    /// Set `hours_open` if `hours` is within bounds. Returns whether it was applied.
    pub fn set_hours_open(&mut self, hours: i64) -> bool {
        match u32::try_from(hours) {
            Ok(h) if (MIN_HOURS_OPEN..=MAX_HOURS_OPEN).contains(&h) => {
                self.hours_open = h;
                self.hours_overridden = true;
                true
            }
            _ => false,
        }
    }

    /// Set one section number, clamped to `0..=MAX_SECTION_VALUE`. Returns the stored value.
    pub fn set_section_value(&mut self, section: SectionKind, field: CapacityField, value: i64) -> u32 {
        let clamped = u32::try_from(value.clamp(0, i64::from(MAX_SECTION_VALUE))).unwrap_or(0);
        let entry = self.sections.entry(section).or_default();
        match field {
            CapacityField::WorkersAssigned => entry.workers_assigned = clamped,
            CapacityField::DailyCapacity => entry.daily_capacity = clamped,
        }
        clamped
    }

    /// Reject numbers the setters would never store.
    pub fn validate(&self) -> Result<(), SchedulerError> {
        if !(MIN_HOURS_OPEN..=MAX_HOURS_OPEN).contains(&self.hours_open) {
            return Err(SchedulerError::Validation(format!(
                "hours_open must be within {MIN_HOURS_OPEN}..={MAX_HOURS_OPEN}, got {}",
                self.hours_open
            )));
        }
        for (section, numbers) in &self.sections {
            if numbers.workers_assigned > MAX_SECTION_VALUE || numbers.daily_capacity > MAX_SECTION_VALUE {
                return Err(SchedulerError::Validation(format!(
                    "{section} numbers must be within 0..={MAX_SECTION_VALUE}"
                )));
            }
        }
        Ok(())
    }

    /// Recompute `hours_open` from the date unless an operator override is recorded.
    pub fn apply_default_hours(&mut self, date: NaiveDate, policy: &HoursPolicy) -> bool {
        if self.hours_overridden {
            return false;
        }
        self.hours_open = policy.default_hours(date);
        true
    }

    /// Drop any override and restore the date's default hours.
    pub fn reset_default_hours(&mut self, date: NaiveDate, policy: &HoursPolicy) {
        self.hours_overridden = false;
        self.hours_open = policy.default_hours(date);
    }
}
