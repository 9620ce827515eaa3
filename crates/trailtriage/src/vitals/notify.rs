//! The platform notification seam.
//!
//! [`NotificationService`] is the narrow surface the reminder scheduler needs
//! from the host: ask for permission, schedule a one-shot notification after a
//! delay, and cancel by identifier. [`LogNotifier`] is a headless implementation
//! that reports through `tracing`.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Category identifier attached to every vitals reminder.
pub const VITALS_CATEGORY: &str = "VITALS_CHECK";

/// Action that opens the note's vitals entry.
pub const ADD_VITALS_ACTION: &str = "ADD_VITALS";

/// Action that re-reminds a few minutes later.
pub const SNOOZE_ACTION: &str = "SNOOZE_5MIN";

/// Payload action routed by the deep-link handler.
pub const PAYLOAD_ACTION_ADD_VITALS: &str = "addVitals";

/// Deterministic notification identifier for a note.
#[must_use]
pub fn notification_id(note_id: Uuid) -> String {
    format!("vitals-{note_id}")
}

/// Deep-link data carried by a reminder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderPayload {
    /// The note to open, as a UUID string.
    pub note_id: String,
    /// What to do once the note is open.
    pub action: String,
}

impl ReminderPayload {
    /// Payload that routes back to `note_id`'s vitals entry.
    #[must_use]
    pub fn add_vitals(note_id: Uuid) -> Self {
        Self {
            note_id: note_id.to_string(),
            action: PAYLOAD_ACTION_ADD_VITALS.to_string(),
        }
    }
}

/// What the user sees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationContent {
    /// Headline.
    pub title: String,
    /// Body text.
    pub body: String,
    /// Category used to attach actions.
    pub category: String,
    /// Break through focus modes and silent mode where supported.
    pub time_sensitive: bool,
    /// Deep-link data.
    pub payload: ReminderPayload,
}

/// A one-shot notification to fire after `delay`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    /// Identifier used for later cancellation.
    pub id: String,
    /// Presentation and payload.
    pub content: NotificationContent,
    /// Time from now until delivery.
    pub delay: Duration,
}

/// A button shown on a delivered notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationAction {
    /// Action identifier reported back on tap.
    pub id: &'static str,
    /// Button label.
    pub title: &'static str,
    /// Whether tapping brings the app to the foreground.
    pub foreground: bool,
}

/// A named group of actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationCategory {
    /// Category identifier.
    pub id: &'static str,
    /// Available actions, in display order.
    pub actions: Vec<NotificationAction>,
}

impl NotificationCategory {
    /// The category used for vitals reminders: add vitals now, or snooze.
    #[must_use]
    pub fn vitals_check() -> Self {
        Self {
            id: VITALS_CATEGORY,
            actions: vec![
                NotificationAction {
                    id: ADD_VITALS_ACTION,
                    title: "Add Vitals Now",
                    foreground: true,
                },
                NotificationAction {
                    id: SNOOZE_ACTION,
                    title: "Remind in 5 min",
                    foreground: false,
                },
            ],
        }
    }
}

/// Host notification facility.
#[async_trait]
pub trait NotificationService: Send + Sync + fmt::Debug {
    /// Ask the user for permission to notify. Returns whether it is granted.
    ///
    /// Repeated calls must be harmless once the user has decided.
    async fn request_permission(&self) -> Result<bool>;

    /// Register notification categories and their actions.
    async fn register_categories(&self, categories: &[NotificationCategory]) -> Result<()>;

    /// Schedule a one-shot notification.
    async fn schedule(&self, request: NotificationRequest) -> Result<()>;

    /// Remove pending and delivered notifications with the given identifiers.
    /// Unknown identifiers are ignored.
    async fn cancel(&self, ids: &[String]) -> Result<()>;
}

/// Notification service that only logs.
///
/// Used by the CLI, where there is no system notification centre to talk to.
/// Permission mirrors the `notifications.enabled` setting.
#[derive(Debug, Clone, Copy)]
pub struct LogNotifier {
    allowed: bool,
}

impl LogNotifier {
    /// Create a notifier that grants permission when `allowed` is true.
    #[must_use]
    pub fn new(allowed: bool) -> Self {
        Self { allowed }
    }
}

#[async_trait]
impl NotificationService for LogNotifier {
    async fn request_permission(&self) -> Result<bool> {
        Ok(self.allowed)
    }

    async fn register_categories(&self, categories: &[NotificationCategory]) -> Result<()> {
        for category in categories {
            info!(
                category = category.id,
                actions = category.actions.len(),
                "Registered notification category"
            );
        }
        Ok(())
    }

    async fn schedule(&self, request: NotificationRequest) -> Result<()> {
        if !self.allowed {
            return Err(Error::notification("notifications are disabled"));
        }
        info!(
            id = %request.id,
            delay_secs = request.delay.as_secs(),
            title = %request.content.title,
            body = %request.content.body,
            "Reminder scheduled"
        );
        Ok(())
    }

    async fn cancel(&self, ids: &[String]) -> Result<()> {
        for id in ids {
            info!(id = %id, "Reminder cancelled");
        }
        if ids.is_empty() {
            warn!("Cancel called with no identifiers");
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! A notification service that records every call.

    use std::sync::Mutex;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub(crate) enum Call {
        Permission,
        Categories(Vec<&'static str>),
        Schedule(NotificationRequest),
        Cancel(Vec<String>),
    }

    #[derive(Debug)]
    pub(crate) struct RecordingNotifier {
        pub(crate) grant: bool,
        pub(crate) fail_schedule: bool,
        calls: Mutex<Vec<Call>>,
    }

    impl RecordingNotifier {
        pub(crate) fn granting() -> Self {
            Self {
                grant: true,
                fail_schedule: false,
                calls: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn denying() -> Self {
            Self {
                grant: false,
                fail_schedule: true,
                calls: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        pub(crate) fn scheduled(&self) -> Vec<NotificationRequest> {
            self.calls()
                .into_iter()
                .filter_map(|c| match c {
                    Call::Schedule(r) => Some(r),
                    _ => None,
                })
                .collect()
        }

        pub(crate) fn cancelled(&self) -> Vec<String> {
            self.calls()
                .into_iter()
                .filter_map(|c| match c {
                    Call::Cancel(ids) => Some(ids),
                    _ => None,
                })
                .flatten()
                .collect()
        }

        pub(crate) fn clear(&self) {
            self.calls.lock().unwrap().clear();
        }
    }

    #[async_trait]
    impl NotificationService for RecordingNotifier {
        async fn request_permission(&self) -> Result<bool> {
            self.calls.lock().unwrap().push(Call::Permission);
            Ok(self.grant)
        }

        async fn register_categories(&self, categories: &[NotificationCategory]) -> Result<()> {
            let ids = categories.iter().map(|c| c.id).collect();
            self.calls.lock().unwrap().push(Call::Categories(ids));
            Ok(())
        }

        async fn schedule(&self, request: NotificationRequest) -> Result<()> {
            self.calls.lock().unwrap().push(Call::Schedule(request));
            if self.fail_schedule {
                return Err(Error::notification("not authorized"));
            }
            Ok(())
        }

        async fn cancel(&self, ids: &[String]) -> Result<()> {
            self.calls.lock().unwrap().push(Call::Cancel(ids.to_vec()));
            Ok(())
        }
    }
}
