//! Vitals re-check reminders.
//!
//! A [`VitalsTracker`] keeps one [`TrackingSession`] per clinical note, persists
//! the set through a [`SessionStore`], and keeps exactly one pending reminder per
//! note through a [`ReminderScheduler`].

mod notify;
mod reading;
mod scheduler;
mod session;
mod store;
mod tracker;

pub use notify::{
    notification_id, LogNotifier, NotificationAction, NotificationCategory, NotificationContent,
    NotificationRequest, NotificationService, ReminderPayload, ADD_VITALS_ACTION,
    PAYLOAD_ACTION_ADD_VITALS, SNOOZE_ACTION, VITALS_CATEGORY,
};
pub use reading::{parse_blood_pressure, VitalSigns};
pub use scheduler::{reminder_body, ReminderScheduler, ScheduleOutcome};
pub use session::{format_time_remaining, TrackingInterval, TrackingSession};
pub use store::{SessionStore, PREFERRED_INTERVAL_KEY};
pub use tracker::VitalsTracker;
