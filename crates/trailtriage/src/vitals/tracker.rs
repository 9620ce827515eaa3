//! The public tracking API.
//!
//! Each note is either untracked or tracking. Every mutation updates the
//! in-memory map, persists it, and then makes a best-effort notification call.
//! Notification failures never roll back state.

use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, info};
use uuid::Uuid;

use super::notify::NotificationService;
use super::reading::VitalSigns;
use super::scheduler::{ReminderScheduler, ScheduleOutcome};
use super::session::{format_time_remaining, TrackingInterval, TrackingSession};
use super::store::SessionStore;
use crate::clock::Clock;
use crate::config::Config;
use crate::error::Result;
use crate::storage::KeyValueStore;

/// Tracks periodic vitals checks for any number of notes.
///
/// Construct one per process and pass it by handle; mutations take `&mut self`.
#[derive(Debug)]
pub struct VitalsTracker {
    store: SessionStore,
    scheduler: ReminderScheduler,
    clock: Arc<dyn Clock>,
    default_interval: TrackingInterval,
    snooze: Duration,
}

impl VitalsTracker {
    /// Assemble a tracker from its parts. The store is used as given; call
    /// [`SessionStore::load`] beforehand to restore persisted sessions.
    #[must_use]
    pub fn new(store: SessionStore, scheduler: ReminderScheduler, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            scheduler,
            clock,
            default_interval: TrackingInterval::default(),
            snooze: Duration::minutes(5),
        }
    }

    /// Build a tracker from configuration and load persisted sessions.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured default interval is not supported.
    pub fn from_config(
        config: &Config,
        kv: Box<dyn KeyValueStore>,
        notifier: Arc<dyn NotificationService>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let tracking = &config.tracking;
        let default_interval = tracking.default_interval()?;

        let mut store =
            SessionStore::new(kv, tracking.sessions_key.clone(), tracking.grace_period());
        let pruned = store.load(clock.now());
        debug!(active = store.len(), pruned, "Loaded tracking sessions");

        let scheduler = ReminderScheduler::new(notifier, clock.clone(), &config.notifications);

        Ok(Self {
            store,
            scheduler,
            clock,
            default_interval,
            snooze: tracking.snooze(),
        })
    }

    /// Re-read persisted sessions, picking up changes made by other processes.
    ///
    /// Returns how many stale sessions were pruned.
    pub fn reload(&mut self) -> usize {
        self.store.load(self.clock.now())
    }

    /// Register the reminder category with the notification service.
    pub async fn register_categories(&self) {
        self.scheduler.register_categories().await;
    }

    /// The interval to preselect: the last one used, else the configured default.
    #[must_use]
    pub fn default_interval(&self) -> TrackingInterval {
        self.store
            .preferred_interval()
            .unwrap_or(self.default_interval)
    }

    /// Start tracking a note, replacing any session it already has.
    ///
    /// The first check falls one interval from now. A blank patient name is
    /// treated as no name.
    pub async fn start_tracking(
        &mut self,
        note_id: Uuid,
        patient_name: Option<&str>,
        interval: TrackingInterval,
    ) -> ScheduleOutcome {
        self.scheduler.request_permission().await;

        let patient_name = patient_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string);
        let session = TrackingSession::start(note_id, patient_name, interval, self.clock.now());

        if self.store.insert(session.clone()).is_some() {
            info!(note_id = %note_id, "Restarted vitals tracking");
        } else {
            info!(note_id = %note_id, interval = %interval, "Started vitals tracking");
        }
        self.store.persist();
        self.store.set_preferred_interval(interval);

        self.scheduler.schedule(&session).await
    }

    /// Stop tracking a note and withdraw its reminder.
    ///
    /// Returns whether the note was being tracked.
    pub async fn stop_tracking(&mut self, note_id: Uuid) -> bool {
        let Some(session) = self.store.remove(&note_id) else {
            debug!(note_id = %note_id, "Stop requested for untracked note");
            return false;
        };
        self.store.persist();
        self.scheduler.cancel(note_id).await;

        info!(
            note_id = %note_id,
            checks = session.checks_completed(),
            "Stopped vitals tracking"
        );
        true
    }

    /// Count a completed check and reschedule one interval from now.
    ///
    /// Returns `None` if the note is not tracked.
    pub async fn record_check(&mut self, note_id: Uuid) -> Option<ScheduleOutcome> {
        let now = self.clock.now();
        let session = self.store.get_mut(&note_id)?;
        session.record_check(now);
        let session = session.clone();
        self.store.persist();

        info!(
            note_id = %note_id,
            checks = session.checks_completed(),
            next_check = %session.next_check_time(),
            "Recorded vitals check"
        );
        Some(self.scheduler.schedule(&session).await)
    }

    /// Record a vitals reading taken for a note. Counts as a check.
    ///
    /// Returns `None` if the note is not tracked.
    pub async fn record_vitals(
        &mut self,
        note_id: Uuid,
        reading: &VitalSigns,
    ) -> Option<ScheduleOutcome> {
        if !self.store.contains(&note_id) {
            debug!(note_id = %note_id, "Vitals recorded for untracked note");
            return None;
        }
        info!(note_id = %note_id, summary = %reading.summary(), "Vitals recorded");
        self.record_check(note_id).await
    }

    /// Remind again after the snooze delay, leaving the session as is.
    ///
    /// Returns `None` if the note is not tracked.
    pub async fn snooze(&self, note_id: Uuid) -> Option<ScheduleOutcome> {
        let session = self.store.get(&note_id)?;
        let when = self.clock.now() + self.snooze;

        self.scheduler.cancel(note_id).await;
        let outcome = self.scheduler.schedule_at(session, when).await;
        info!(note_id = %note_id, minutes = self.snooze.num_minutes(), "Snoozed vitals reminder");
        Some(outcome)
    }

    /// Whether a note is tracked.
    #[must_use]
    pub fn is_tracking(&self, note_id: Uuid) -> bool {
        self.store.contains(&note_id)
    }

    /// The session for a note.
    #[must_use]
    pub fn session(&self, note_id: Uuid) -> Option<&TrackingSession> {
        self.store.get(&note_id)
    }

    /// All active sessions, soonest check first.
    #[must_use]
    pub fn sessions(&self) -> Vec<&TrackingSession> {
        let mut sessions: Vec<_> = self.store.iter().collect();
        sessions.sort_by_key(|s| (s.next_check_time(), s.note_id()));
        sessions
    }

    /// Time until the note's next check; negative once overdue.
    #[must_use]
    pub fn time_remaining(&self, note_id: Uuid) -> Option<Duration> {
        self.store
            .get(&note_id)
            .map(|s| s.time_remaining(self.clock.now()))
    }

    /// Countdown text such as `"4m 5s"`, absent when untracked or due.
    #[must_use]
    pub fn formatted_time_remaining(&self, note_id: Uuid) -> Option<String> {
        self.time_remaining(note_id).and_then(format_time_remaining)
    }

    /// Write all sessions now.
    ///
    /// # Errors
    ///
    /// Returns an error if the sessions cannot be written.
    pub fn save(&self) -> Result<()> {
        self.store.save()
    }
}
