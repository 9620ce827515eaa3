//! `trailtriage` - Vitals re-check reminders for wilderness patient care
//!
//! This library tracks periodic vital-sign checks per clinical note, persists
//! active sessions across restarts, and keeps exactly one pending reminder per
//! note through a pluggable notification service. It also converts the legacy
//! chapter-based field guide into topic modules.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod clock;
pub mod config;
pub mod error;
pub mod library;
pub mod logging;
pub mod storage;
pub mod vitals;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use storage::{KeyValueStore, MemoryStore, SqliteStore};
pub use vitals::{
    LogNotifier, NotificationService, ScheduleOutcome, TrackingInterval, TrackingSession,
    VitalSigns, VitalsTracker,
};
