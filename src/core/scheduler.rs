//! Scheduler facade and the storage seam it is built on.
//!
//! Every mutation of a day runs under that day's lock: load, apply to a copy,
//! persist, release. A failed operation never reaches the repository, so a day
//! is never observed half-updated. Different days never contend.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::Mutex;

use crate::config::SchedulerConfig;
use crate::core::action_log::{build_action_entry, ActionKind, ActionLogEntry, ActionLogSink};
use crate::core::admission::{partition_day, partition_section, QueuePartition};
use crate::core::aggregator::{self, DayStats, ScheduleView, SectionStats};
use crate::core::capacity::{CapacityConfig, CapacityField, HoursPolicy};
use crate::core::intake::{admit, IntakeOutcome, IntakeRequest};
use crate::core::model::{SectionKind, TicketId, TicketStatus};
use crate::core::schedule::DaySchedule;
use crate::core::ticket::{Ticket, TicketDraft, TicketUpdate};
use crate::core::SchedulerError;
use crate::util::clock::{Clock, SystemClock};

/// Abstraction for day-schedule persistence. Records are keyed by date.
pub trait ScheduleRepository: Send + Sync {
    /// Load the record for a date.
    fn load(&self, date: NaiveDate) -> Result<Option<DaySchedule>, SchedulerError>;
    /// Insert or replace a record.
    fn upsert(&self, day: &DaySchedule) -> Result<(), SchedulerError>;
    /// Delete a record; missing records are not an error.
    fn delete(&self, date: NaiveDate) -> Result<(), SchedulerError>;
    /// Dates with a stored record, ascending.
    fn dates(&self) -> Result<Vec<NaiveDate>, SchedulerError>;

    /// Date of the day holding a ticket.
    fn locate_ticket(&self, id: TicketId) -> Result<Option<NaiveDate>, SchedulerError> {
        for date in self.dates()? {
            if let Some(day) = self.load(date)? {
                if day.ticket(id).is_some() {
                    return Ok(Some(date));
                }
            }
        }
        Ok(None)
    }
}

/// Idle per-date locks are dropped once the map reaches this size.
const DAY_LOCK_SWEEP_THRESHOLD: usize = 64;

/// Shared handle to an action-log sink.
pub type SharedActionLog = Arc<Mutex<Box<dyn ActionLogSink>>>;

/// Garage ticket scheduler: capacity, ticket lifecycle, intake and derived views.
pub struct GarageScheduler {
    config: SchedulerConfig,
    policy: HoursPolicy,
    repository: Arc<dyn ScheduleRepository>,
    action_log: SharedActionLog,
    clock: Arc<dyn Clock>,
    day_locks: Mutex<HashMap<NaiveDate, Arc<Mutex<()>>>>,
}

impl GarageScheduler {
    /// Create a scheduler from components, using the wall clock.
    pub fn new(
        config: SchedulerConfig,
        repository: Arc<dyn ScheduleRepository>,
        action_log: Box<dyn ActionLogSink>,
    ) -> Self {
        Self {
            policy: config.hours_policy(),
            config,
            repository,
            action_log: Arc::new(Mutex::new(action_log)),
            clock: Arc::new(SystemClock),
            day_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Replace the time source.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Configuration in use.
    pub const fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Handle to the action log.
    pub fn action_log(&self) -> SharedActionLog {
        Arc::clone(&self.action_log)
    }

    fn day_lock(&self, date: NaiveDate) -> Arc<Mutex<()>> {
        let mut locks = self.day_locks.lock();
        if locks.len() >= DAY_LOCK_SWEEP_THRESHOLD {
            // Only the map holds an idle lock, and no one can clone it while we hold the map.
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        }
        Arc::clone(locks.entry(date).or_default())
    }

    fn load_existing(&self, date: NaiveDate) -> Result<DaySchedule, SchedulerError> {
        self.repository
            .load(date)?
            .ok_or(SchedulerError::ScheduleNotFound(date))
    }

    /// Run `f` on a copy of the day under its lock and persist the copy on success.
    fn mutate_day<T, F>(&self, date: NaiveDate, f: F) -> Result<T, SchedulerError>
    where
        F: FnOnce(&mut DaySchedule, DateTime<Utc>) -> Result<T, SchedulerError>,
    {
        let lock = self.day_lock(date);
        let _guard = lock.lock();
        let mut day = self.load_existing(date)?;
        let out = f(&mut day, self.clock.now())?;
        self.repository.upsert(&day)?;
        Ok(out)
    }

    fn locate(&self, id: TicketId) -> Result<NaiveDate, SchedulerError> {
        self.repository
            .locate_ticket(id)?
            .ok_or_else(|| SchedulerError::NotFound(format!("ticket {id}")))
    }

    fn mutate_ticket<T, F>(&self, id: TicketId, f: F) -> Result<T, SchedulerError>
    where
        F: FnOnce(&mut DaySchedule, DateTime<Utc>) -> Result<T, SchedulerError>,
    {
        let date = self.locate(id)?;
        self.mutate_day(date, f)
    }

    // ---- Days ----

    /// Define a day with default hours and section numbers. An existing day is returned unchanged.
    pub fn define_day(&self, date: NaiveDate, max_cars: Option<u32>) -> Result<DaySchedule, SchedulerError> {
        let lock = self.day_lock(date);
        let _guard = lock.lock();
        if let Some(existing) = self.repository.load(date)? {
            tracing::debug!(%date, "day already defined");
            return Ok(existing);
        }
        let capacity = CapacityConfig::for_date(date, &self.policy, self.config.section_defaults.clone());
        let day = DaySchedule::new(
            date,
            max_cars.unwrap_or(self.config.default_max_cars),
            &self.policy,
            capacity,
        );
        self.repository.upsert(&day)?;
        tracing::info!(%date, max_cars = day.max_cars_capacity, hours = day.capacity.hours_open, "day defined");
        Ok(day)
    }

    /// Store a fully specified day. Fails if the date is already defined or the day
    /// holds numbers or tickets the regular setters would reject.
    pub fn define_day_with(&self, mut day: DaySchedule) -> Result<DaySchedule, SchedulerError> {
        let lock = self.day_lock(day.date);
        let _guard = lock.lock();
        if self.repository.load(day.date)?.is_some() {
            return Err(SchedulerError::Validation(format!(
                "schedule for {} is already defined",
                day.date
            )));
        }
        day.validate()?;
        day.current_cars_scheduled = u32::try_from(day.tickets.len()).unwrap_or(u32::MAX);
        day.sync_window(&self.policy);
        self.repository.upsert(&day)?;
        tracing::info!(date = %day.date, "day stored");
        Ok(day)
    }

    /// Snapshot of a day.
    pub fn day(&self, date: NaiveDate) -> Result<DaySchedule, SchedulerError> {
        self.load_existing(date)
    }

    /// Dates with a defined schedule.
    pub fn defined_dates(&self) -> Result<Vec<NaiveDate>, SchedulerError> {
        self.repository.dates()
    }

    /// Close the workshop for a day. Days are never deleted.
    pub fn mark_unavailable(&self, date: NaiveDate) -> Result<(), SchedulerError> {
        self.mutate_day(date, |day, _| {
            day.available = false;
            Ok(())
        })?;
        tracing::info!(%date, "day marked unavailable");
        Ok(())
    }

    /// Reopen a closed day.
    pub fn mark_available(&self, date: NaiveDate) -> Result<(), SchedulerError> {
        self.mutate_day(date, |day, _| {
            day.available = true;
            Ok(())
        })
    }

    /// Change the day-level admission ceiling.
    pub fn set_max_cars(&self, date: NaiveDate, max_cars: u32) -> Result<(), SchedulerError> {
        self.mutate_day(date, |day, _| {
            day.max_cars_capacity = max_cars;
            Ok(())
        })
    }

    /// Replace the day notes.
    pub fn set_notes(&self, date: NaiveDate, notes: impl Into<String>) -> Result<(), SchedulerError> {
        let notes = notes.into();
        self.mutate_day(date, |day, _| {
            day.notes = notes;
            Ok(())
        })
    }

    // ---- Capacity ----

    /// Set opening hours. Values outside 2..=12 are ignored; returns whether the value was applied.
    pub fn set_hours_open(&self, date: NaiveDate, hours: i64) -> Result<bool, SchedulerError> {
        let policy = self.policy;
        let applied = self.mutate_day(date, |day, _| {
            let applied = day.capacity.set_hours_open(hours);
            day.sync_window(&policy);
            Ok(applied)
        })?;
        if !applied {
            tracing::warn!(%date, hours, "hours_open out of range; keeping previous value");
        }
        Ok(applied)
    }

    /// Recompute a day's hours from its date, leaving a manual override in place.
    /// Returns whether the default was applied.
    pub fn apply_default_hours(&self, date: NaiveDate) -> Result<bool, SchedulerError> {
        let policy = self.policy;
        let applied = self.mutate_day(date, |day, _| {
            let applied = day.capacity.apply_default_hours(date, &policy);
            day.sync_window(&policy);
            Ok(applied)
        })?;
        if !applied {
            tracing::debug!(%date, "hours_open overridden; default not applied");
        }
        Ok(applied)
    }

    /// Recompute a day's default hours and drop any manual override.
    pub fn reset_default_hours(&self, date: NaiveDate) -> Result<u32, SchedulerError> {
        let policy = self.policy;
        self.mutate_day(date, |day, _| {
            day.capacity.reset_default_hours(date, &policy);
            day.sync_window(&policy);
            Ok(day.capacity.hours_open)
        })
    }

    /// Set a section's workers or daily capacity, clamped to 0..=20. Returns the stored value.
    pub fn set_section_capacity(
        &self,
        date: NaiveDate,
        section: SectionKind,
        field: CapacityField,
        value: i64,
    ) -> Result<u32, SchedulerError> {
        let stored = self.mutate_day(date, |day, _| Ok(day.capacity.set_section_value(section, field, value)))?;
        if i64::from(stored) != value {
            tracing::warn!(%date, %section, ?field, value, stored, "section value clamped");
        }
        Ok(stored)
    }

    /// Set the operator-entered headcount.
    pub fn set_total_workers(&self, date: NaiveDate, workers: u32) -> Result<(), SchedulerError> {
        self.mutate_day(date, |day, _| {
            day.capacity.total_workers = workers;
            Ok(())
        })
    }

    /// Record special issues such as staff absence.
    pub fn set_special_issues(&self, date: NaiveDate, issues: impl Into<String>) -> Result<(), SchedulerError> {
        let issues = issues.into();
        self.mutate_day(date, |day, _| {
            day.capacity.special_issues = issues;
            Ok(())
        })
    }

    /// Sum of section daily capacities for a day.
    pub fn total_day_capacity(&self, date: NaiveDate) -> Result<u32, SchedulerError> {
        Ok(self.load_existing(date)?.capacity.total_day_capacity())
    }

    // ---- Tickets ----

    /// Add a ticket through the manual scheduling path. The day ceiling is not checked here.
    pub fn add_ticket(&self, date: NaiveDate, draft: TicketDraft) -> Result<Ticket, SchedulerError> {
        let ticket = self.mutate_day(date, |day, now| day.add_ticket(draft, now))?;
        tracing::info!(%date, ticket = %ticket.id, vehicle = %ticket.vehicle_code, status = %ticket.status, "ticket added");
        Ok(ticket)
    }

    /// Overwrite a ticket's status.
    pub fn update_status(&self, id: TicketId, status: TicketStatus) -> Result<Ticket, SchedulerError> {
        let ticket = self.mutate_ticket(id, |day, now| day.update_status(id, status, now))?;
        tracing::info!(ticket = %id, %status, "ticket status updated");
        Ok(ticket)
    }

    /// Edit ticket fields.
    pub fn update_ticket(&self, id: TicketId, update: TicketUpdate) -> Result<Ticket, SchedulerError> {
        self.mutate_ticket(id, |day, now| day.update_ticket(id, update, now))
    }

    /// Delete a ticket. Later pending positions shift down on the next partition.
    pub fn remove_ticket(&self, id: TicketId) -> Result<Ticket, SchedulerError> {
        let removed = self.mutate_ticket(id, |day, _| day.remove_ticket(id))?;
        tracing::info!(ticket = %id, vehicle = %removed.vehicle_code, "ticket removed");
        Ok(removed)
    }

    /// Look up a ticket by id.
    pub fn ticket(&self, id: TicketId) -> Result<Ticket, SchedulerError> {
        let date = self.locate(id)?;
        self.load_existing(date)?
            .ticket(id)
            .cloned()
            .ok_or_else(|| SchedulerError::NotFound(format!("ticket {id}")))
    }

    /// Move a ticket to another day: delete here, recreate there with a new id.
    pub fn reschedule_ticket(&self, id: TicketId, new_date: NaiveDate) -> Result<Ticket, SchedulerError> {
        let from = self.locate(id)?;
        if from == new_date {
            return Err(SchedulerError::Validation(format!(
                "ticket {id} is already scheduled on {new_date}"
            )));
        }
        // Fixed lock order avoids deadlock between opposite moves.
        let (first, second) = if from < new_date { (from, new_date) } else { (new_date, from) };
        let first_lock = self.day_lock(first);
        let second_lock = self.day_lock(second);
        let _first_guard = first_lock.lock();
        let _second_guard = second_lock.lock();

        let mut source = self.load_existing(from)?;
        let mut target = self.load_existing(new_date)?;
        if !target.available {
            return Err(SchedulerError::ScheduleUnavailable(new_date));
        }
        if !target.has_room() {
            return Err(SchedulerError::CapacityExceeded {
                date: new_date,
                current: target.current_cars_scheduled,
                max: target.max_cars_capacity,
            });
        }
        let now = self.clock.now();
        let original_target = target.clone();
        let old = source.remove_ticket(id)?;
        let created = target.add_ticket(TicketDraft::from(&old), now)?;
        self.repository.upsert(&target)?;
        if let Err(err) = self.repository.upsert(&source) {
            // Put the target back so the vehicle is never held by both days.
            if let Err(restore) = self.repository.upsert(&original_target) {
                tracing::error!(%new_date, error = %restore, "failed to restore target day");
            }
            return Err(err);
        }
        tracing::info!(old = %id, new = %created.id, %from, to = %new_date, "ticket rescheduled");
        Ok(created)
    }

    // ---- Action log ----

    /// Apply the status implied by `kind` and log the action under the day's lock.
    /// A log failure does not undo the status.
    pub fn record_action(
        &self,
        id: TicketId,
        kind: ActionKind,
        actor_id: &str,
        notes: Option<String>,
    ) -> Result<Ticket, SchedulerError> {
        let date = self.locate(id)?;
        let lock = self.day_lock(date);
        let _guard = lock.lock();
        let mut day = self.load_existing(date)?;
        let now = self.clock.now();
        let ticket = day.update_status(id, kind.implied_status(), now)?;
        self.repository.upsert(&day)?;
        tracing::info!(ticket = %id, status = %ticket.status, action = %kind, "ticket status updated");

        let entry = build_action_entry(ticket.vehicle_code.clone(), kind, actor_id, notes, now);
        if let Err(err) = self.action_log.lock().record(entry) {
            tracing::warn!(ticket = %id, action = %kind, error = %err, "action log write failed");
        }
        Ok(ticket)
    }

    /// Append a log entry for the vehicle's ticket without touching its status.
    pub fn append_action(
        &self,
        vehicle_code: &str,
        kind: &str,
        actor_id: &str,
        notes: Option<String>,
    ) -> Result<ActionLogEntry, SchedulerError> {
        let kind: ActionKind = kind.parse()?;
        if self.find_vehicle(vehicle_code)?.is_none() {
            return Err(SchedulerError::NotFound(format!("vehicle {vehicle_code}")));
        }
        let entry = build_action_entry(vehicle_code, kind, actor_id, notes, self.clock.now());
        let mut log = self.action_log.lock();
        log.record(entry.clone())?;
        // The sink assigns the sequence; hand back the stored copy.
        let stored = log
            .entries_for(vehicle_code)?
            .into_iter()
            .find(|e| e.id == entry.id)
            .unwrap_or(entry);
        Ok(stored)
    }

    /// The last `n` log entries for a vehicle, oldest first.
    pub fn recent_actions(&self, vehicle_code: &str, n: usize) -> Result<Vec<ActionLogEntry>, SchedulerError> {
        self.action_log.lock().recent_for(vehicle_code, n)
    }

    /// Find the day and ticket holding a vehicle, latest day first.
    pub fn find_vehicle(&self, vehicle_code: &str) -> Result<Option<(NaiveDate, Ticket)>, SchedulerError> {
        for date in self.repository.dates()?.into_iter().rev() {
            if let Some(day) = self.repository.load(date)? {
                if let Some(ticket) = day.ticket_by_vehicle(vehicle_code) {
                    return Ok(Some((date, ticket.clone())));
                }
            }
        }
        Ok(None)
    }

    // ---- Intake ----

    /// Admit a vehicle from the arrivals process.
    pub fn intake(&self, request: IntakeRequest) -> Result<Ticket, SchedulerError> {
        let date = request.target_date;
        let vehicle = request.vehicle_code.clone();
        let result = self.mutate_day(date, |day, now| admit(day, request, now));
        match &result {
            Ok(ticket) => tracing::info!(%date, %vehicle, ticket = %ticket.id, "vehicle admitted"),
            Err(err) => tracing::warn!(%date, %vehicle, error = %err, "vehicle rejected"),
        }
        result
    }

    /// Admit a vehicle and answer in the arrivals-process shape.
    pub fn intake_outcome(&self, request: IntakeRequest) -> IntakeOutcome {
        IntakeOutcome::from(&self.intake(request))
    }

    // ---- Views ----

    /// Active/pending partition of one section.
    pub fn queue(&self, date: NaiveDate, section: SectionKind) -> Result<QueuePartition, SchedulerError> {
        Ok(partition_section(&self.load_existing(date)?, section))
    }

    /// Active/pending partitions of every section.
    pub fn queues(&self, date: NaiveDate) -> Result<Vec<QueuePartition>, SchedulerError> {
        Ok(partition_day(&self.load_existing(date)?))
    }

    /// Ticket count over total day capacity, in percent.
    pub fn utilization(&self, date: NaiveDate) -> Result<f64, SchedulerError> {
        Ok(aggregator::utilization(&self.load_existing(date)?))
    }

    /// Figures for one section.
    pub fn section_stats(&self, date: NaiveDate, section: SectionKind) -> Result<SectionStats, SchedulerError> {
        Ok(aggregator::section_stats(&self.load_existing(date)?, section))
    }

    /// Figures for the whole day.
    pub fn day_stats(&self, date: NaiveDate) -> Result<DayStats, SchedulerError> {
        Ok(aggregator::day_stats(&self.load_existing(date)?))
    }

    /// Everything the presentation layer needs for a day, from one snapshot.
    pub fn view(&self, date: NaiveDate) -> Result<ScheduleView, SchedulerError> {
        Ok(aggregator::view(&self.load_existing(date)?))
    }
}
