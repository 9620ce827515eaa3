//! Turns a tracking session into exactly one pending reminder.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::notify::{
    notification_id, NotificationCategory, NotificationContent, NotificationRequest,
    NotificationService, ReminderPayload, VITALS_CATEGORY,
};
use super::session::TrackingSession;
use crate::clock::Clock;
use crate::config::NotificationConfig;

/// Result of a scheduling attempt.
///
/// Scheduling is best effort; the outcome exists so callers can report on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleOutcome {
    /// A reminder will fire after `delay`.
    Scheduled {
        /// Time until delivery.
        delay: std::time::Duration,
    },
    /// The check time has already passed; nothing was scheduled.
    PastDue,
    /// The notification service rejected the request.
    Failed,
}

impl ScheduleOutcome {
    /// Whether a reminder is now pending.
    #[must_use]
    pub fn is_scheduled(&self) -> bool {
        matches!(self, Self::Scheduled { .. })
    }
}

/// Schedules and cancels vitals reminders through a [`NotificationService`].
#[derive(Debug, Clone)]
pub struct ReminderScheduler {
    notifier: Arc<dyn NotificationService>,
    clock: Arc<dyn Clock>,
    title: String,
    time_sensitive: bool,
}

impl ReminderScheduler {
    /// Create a scheduler.
    #[must_use]
    pub fn new(
        notifier: Arc<dyn NotificationService>,
        clock: Arc<dyn Clock>,
        config: &NotificationConfig,
    ) -> Self {
        Self {
            notifier,
            clock,
            title: config.title.clone(),
            time_sensitive: config.time_sensitive,
        }
    }

    /// Ask for notification permission. A failure counts as a denial.
    pub async fn request_permission(&self) -> bool {
        match self.notifier.request_permission().await {
            Ok(true) => true,
            Ok(false) => {
                warn!("Notification permission denied; reminders will not be delivered");
                false
            }
            Err(e) => {
                warn!(error = %e, "Notification permission request failed");
                false
            }
        }
    }

    /// Register the vitals reminder category and its actions.
    pub async fn register_categories(&self) {
        if let Err(e) = self
            .notifier
            .register_categories(&[NotificationCategory::vitals_check()])
            .await
        {
            warn!(error = %e, "Failed to register notification categories");
        }
    }

    /// Replace any reminder for the session's note with one at its next check.
    pub async fn schedule(&self, session: &TrackingSession) -> ScheduleOutcome {
        self.cancel(session.note_id()).await;
        self.schedule_at(session, session.next_check_time()).await
    }

    /// Schedule a reminder for the session's note at `when`, without
    /// cancelling anything first.
    pub async fn schedule_at(
        &self,
        session: &TrackingSession,
        when: DateTime<Utc>,
    ) -> ScheduleOutcome {
        let note_id = session.note_id();
        let remaining = when - self.clock.now();

        let delay = match remaining.to_std() {
            Ok(delay) if !delay.is_zero() => delay,
            _ => {
                debug!(note_id = %note_id, "Check time already passed; not scheduling");
                return ScheduleOutcome::PastDue;
            }
        };

        let request = NotificationRequest {
            id: notification_id(note_id),
            content: self.content(session),
            delay,
        };

        match self.notifier.schedule(request).await {
            Ok(()) => {
                info!(
                    note_id = %note_id,
                    delay_secs = delay.as_secs(),
                    "Scheduled vitals reminder"
                );
                ScheduleOutcome::Scheduled { delay }
            }
            Err(e) => {
                warn!(note_id = %note_id, error = %e, "Failed to schedule vitals reminder");
                ScheduleOutcome::Failed
            }
        }
    }

    /// Remove pending and delivered reminders for a note.
    pub async fn cancel(&self, note_id: Uuid) {
        if let Err(e) = self.notifier.cancel(&[notification_id(note_id)]).await {
            warn!(note_id = %note_id, error = %e, "Failed to cancel vitals reminder");
        }
    }

    fn content(&self, session: &TrackingSession) -> NotificationContent {
        NotificationContent {
            title: self.title.clone(),
            body: reminder_body(session.patient_name()),
            category: VITALS_CATEGORY.to_string(),
            time_sensitive: self.time_sensitive,
            payload: ReminderPayload::add_vitals(session.note_id()),
        }
    }
}

/// Reminder text, naming the patient when a name is known.
#[must_use]
pub fn reminder_body(patient_name: Option<&str>) -> String {
    match patient_name.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) => format!("It's time to record vitals for {name}"),
        None => "It's time to record patient vitals".to_string(),
    }
}
