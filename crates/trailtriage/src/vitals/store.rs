//! In-memory session map backed by a key-value store.
//!
//! The whole map is persisted under a single key as a JSON object keyed by note
//! UUID. Persistence is best effort: a failed or undecodable read starts empty,
//! and a failed write is logged and not retried.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::session::{TrackingInterval, TrackingSession};
use crate::error::{Error, Result};
use crate::storage::KeyValueStore;

/// Key under which the last interval used to start tracking is stored.
pub const PREFERRED_INTERVAL_KEY: &str = "preferredVitalsInterval";

/// Owner of all active tracking sessions.
#[derive(Debug)]
pub struct SessionStore {
    kv: Box<dyn KeyValueStore>,
    key: String,
    grace: Duration,
    sessions: HashMap<Uuid, TrackingSession>,
}

impl SessionStore {
    /// Create an empty store. Call [`SessionStore::load`] to read persisted
    /// sessions.
    #[must_use]
    pub fn new(kv: Box<dyn KeyValueStore>, key: impl Into<String>, grace: Duration) -> Self {
        Self {
            kv,
            key: key.into(),
            grace,
            sessions: HashMap::new(),
        }
    }

    /// Replace the in-memory map with the persisted one, dropping sessions
    /// whose next check plus the grace window is not after `now`.
    ///
    /// The pruned map is written back straight away. Returns how many
    /// sessions were dropped.
    pub fn load(&mut self, now: DateTime<Utc>) -> usize {
        self.sessions.clear();

        let bytes = match self.kv.get(&self.key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!(key = %self.key, "No persisted sessions");
                return 0;
            }
            Err(e) => {
                warn!(error = %e, "Failed to read persisted sessions; starting empty");
                return 0;
            }
        };

        let stored: HashMap<Uuid, TrackingSession> = match serde_json::from_slice(&bytes) {
            Ok(stored) => stored,
            Err(e) => {
                warn!(error = %e, "Persisted sessions are unreadable; starting empty");
                return 0;
            }
        };

        let total = stored.len();
        self.sessions = stored
            .into_iter()
            .filter(|(_, session)| !session.is_expired(now, self.grace))
            .collect();
        let pruned = total - self.sessions.len();

        if pruned > 0 {
            info!(pruned, remaining = self.sessions.len(), "Pruned stale sessions");
        }
        self.persist();
        pruned
    }

    /// Serialize the full map and write it.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self) -> Result<()> {
        let bytes = serde_json::to_vec(&self.sessions)?;
        self.kv.set(&self.key, &bytes)?;
        debug!(sessions = self.sessions.len(), "Saved sessions");
        Ok(())
    }

    /// [`SessionStore::save`], logging instead of returning failures.
    pub(crate) fn persist(&self) {
        if let Err(e) = self.save() {
            warn!(error = %e, "Failed to save sessions");
        }
    }

    /// Session for a note.
    #[must_use]
    pub fn get(&self, note_id: &Uuid) -> Option<&TrackingSession> {
        self.sessions.get(note_id)
    }

    /// Whether a note has a session.
    #[must_use]
    pub fn contains(&self, note_id: &Uuid) -> bool {
        self.sessions.contains_key(note_id)
    }

    /// All sessions, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &TrackingSession> {
        self.sessions.values()
    }

    /// Number of sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// True when nothing is being tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub(crate) fn insert(&mut self, session: TrackingSession) -> Option<TrackingSession> {
        self.sessions.insert(session.note_id(), session)
    }

    pub(crate) fn remove(&mut self, note_id: &Uuid) -> Option<TrackingSession> {
        self.sessions.remove(note_id)
    }

    pub(crate) fn get_mut(&mut self, note_id: &Uuid) -> Option<&mut TrackingSession> {
        self.sessions.get_mut(note_id)
    }

    /// The interval most recently used to start tracking, if one was stored
    /// and is still valid.
    #[must_use]
    pub fn preferred_interval(&self) -> Option<TrackingInterval> {
        match self.kv.get(PREFERRED_INTERVAL_KEY) {
            Ok(Some(bytes)) => serde_json::from_slice(&bytes).ok(),
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "Failed to read preferred interval");
                None
            }
        }
    }

    /// Remember `interval` as the preferred one.
    pub fn set_preferred_interval(&self, interval: TrackingInterval) {
        let result = serde_json::to_vec(&interval)
            .map_err(Error::from)
            .and_then(|bytes| self.kv.set(PREFERRED_INTERVAL_KEY, &bytes));
        if let Err(e) = result {
            warn!(error = %e, "Failed to save preferred interval");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_SESSIONS_KEY;
    use crate::storage::MemoryStore;

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn store(kv: &MemoryStore) -> SessionStore {
        SessionStore::new(
            Box::new(kv.clone()),
            DEFAULT_SESSIONS_KEY,
            Duration::hours(1),
        )
    }

    fn session(interval: TrackingInterval) -> TrackingSession {
        TrackingSession::start(Uuid::new_v4(), Some("Pat".to_string()), interval, t0())
    }

    #[derive(Debug)]
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
            Err(Error::internal("disk unavailable"))
        }

        fn set(&self, _key: &str, _value: &[u8]) -> Result<()> {
            Err(Error::internal("disk unavailable"))
        }
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let kv = MemoryStore::new();
        let mut first = store(&kv);
        let a = session(TrackingInterval::FifteenMinutes);
        let b = session(TrackingInterval::FiveMinutes);
        first.insert(a.clone());
        first.insert(b.clone());
        first.save().unwrap();

        let mut second = store(&kv);
        assert_eq!(second.load(t0()), 0);
        assert_eq!(second.len(), 2);
        assert_eq!(second.get(&a.note_id()), Some(&a));
        assert_eq!(second.get(&b.note_id()), Some(&b));
    }

    #[test]
    fn test_persisted_layout_is_keyed_by_uuid() {
        let kv = MemoryStore::new();
        let mut store = store(&kv);
        let s = session(TrackingInterval::TenMinutes);
        store.insert(s.clone());
        store.save().unwrap();

        let bytes = kv.get(DEFAULT_SESSIONS_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let entry = &value[s.note_id().to_string()];
        assert_eq!(entry["noteId"], s.note_id().to_string());
        assert_eq!(entry["intervalMinutes"], 10);
    }

    #[test]
    fn test_load_prunes_expired_and_persists() {
        let kv = MemoryStore::new();
        let mut writer = store(&kv);
        let short = session(TrackingInterval::FiveMinutes);
        let long = session(TrackingInterval::SixtyMinutes);
        writer.insert(short.clone());
        writer.insert(long.clone());
        writer.save().unwrap();

        // short: next at +5m, expires at +65m. long: next at +60m, expires at +120m.
        let now = t0() + Duration::minutes(65);
        let mut reader = store(&kv);
        assert_eq!(reader.load(now), 1);
        assert!(!reader.contains(&short.note_id()));
        assert!(reader.contains(&long.note_id()));

        let mut again = store(&kv);
        assert_eq!(again.load(now), 0);
        assert_eq!(again.len(), 1);
    }

    #[test]
    fn test_load_keeps_session_inside_grace() {
        let kv = MemoryStore::new();
        let mut writer = store(&kv);
        let s = session(TrackingInterval::FiveMinutes);
        writer.insert(s.clone());
        writer.save().unwrap();

        let mut reader = store(&kv);
        reader.load(t0() + Duration::minutes(64));
        assert!(reader.contains(&s.note_id()));
    }

    #[test]
    fn test_load_keeps_far_future_session() {
        let kv = MemoryStore::new();
        let id = Uuid::new_v4();
        let payload = serde_json::json!({
            id.to_string(): {
                "noteId": id,
                "startTime": "2023-11-14T22:13:20Z",
                "intervalMinutes": 5,
                "nextCheckTime": "+262142-12-31T23:30:00Z",
                "checksCompleted": 2,
            }
        });
        kv.set(DEFAULT_SESSIONS_KEY, payload.to_string().as_bytes())
            .unwrap();

        let mut reader = store(&kv);
        assert_eq!(reader.load(t0()), 0);
        assert_eq!(reader.get(&id).unwrap().checks_completed(), 2);

        let mut again = store(&kv);
        assert_eq!(again.load(t0() + Duration::days(365)), 0);
        assert!(again.contains(&id));
    }

    #[test]
    fn test_load_missing_key_is_empty() {
        let kv = MemoryStore::new();
        let mut store = store(&kv);
        assert_eq!(store.load(t0()), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_garbage_is_empty_and_untouched() {
        let kv = MemoryStore::new();
        kv.set(DEFAULT_SESSIONS_KEY, b"not json").unwrap();

        let mut store = store(&kv);
        assert_eq!(store.load(t0()), 0);
        assert!(store.is_empty());
        assert_eq!(
            kv.get(DEFAULT_SESSIONS_KEY).unwrap(),
            Some(b"not json".to_vec())
        );
    }

    #[test]
    fn test_read_failure_is_cold_start() {
        let mut store = SessionStore::new(Box::new(BrokenStore), "k", Duration::hours(1));
        assert_eq!(store.load(t0()), 0);
        assert!(store.is_empty());
        assert!(store.save().is_err());
        store.persist();
        assert!(store.preferred_interval().is_none());
        store.set_preferred_interval(TrackingInterval::TenMinutes);
    }

    #[test]
    fn test_insert_replaces_existing() {
        let kv = MemoryStore::new();
        let mut store = store(&kv);
        let first = session(TrackingInterval::FiveMinutes);
        let id = first.note_id();
        store.insert(first);

        let replacement =
            TrackingSession::start(id, None, TrackingInterval::ThirtyMinutes, t0());
        let previous = store.insert(replacement);
        assert!(previous.is_some());
        assert_eq!(store.len(), 1);
        assert_eq!(
            store.get(&id).unwrap().interval(),
            TrackingInterval::ThirtyMinutes
        );
    }

    #[test]
    fn test_preferred_interval() {
        let kv = MemoryStore::new();
        let store = store(&kv);
        assert!(store.preferred_interval().is_none());

        store.set_preferred_interval(TrackingInterval::ThirtyMinutes);
        assert_eq!(
            store.preferred_interval(),
            Some(TrackingInterval::ThirtyMinutes)
        );
        assert_eq!(kv.get(PREFERRED_INTERVAL_KEY).unwrap(), Some(b"30".to_vec()));

        kv.set(PREFERRED_INTERVAL_KEY, b"7").unwrap();
        assert!(store.preferred_interval().is_none());
    }
}
