//! Tracking session records and the supported reminder intervals.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// How often vitals should be re-checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum TrackingInterval {
    /// Every 5 minutes.
    FiveMinutes,
    /// Every 10 minutes.
    TenMinutes,
    /// Every 15 minutes.
    #[default]
    FifteenMinutes,
    /// Every 30 minutes.
    ThirtyMinutes,
    /// Every hour.
    SixtyMinutes,
}

impl TrackingInterval {
    /// All intervals, shortest first.
    pub const ALL: [TrackingInterval; 5] = [
        Self::FiveMinutes,
        Self::TenMinutes,
        Self::FifteenMinutes,
        Self::ThirtyMinutes,
        Self::SixtyMinutes,
    ];

    /// Length of the interval in minutes.
    #[must_use]
    pub fn minutes(self) -> u32 {
        match self {
            Self::FiveMinutes => 5,
            Self::TenMinutes => 10,
            Self::FifteenMinutes => 15,
            Self::ThirtyMinutes => 30,
            Self::SixtyMinutes => 60,
        }
    }

    /// Length of the interval.
    #[must_use]
    pub fn duration(self) -> Duration {
        Duration::minutes(i64::from(self.minutes()))
    }

    /// Label for pickers, e.g. "15 minutes".
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::FiveMinutes => "5 minutes",
            Self::TenMinutes => "10 minutes",
            Self::FifteenMinutes => "15 minutes",
            Self::ThirtyMinutes => "30 minutes",
            Self::SixtyMinutes => "1 hour",
        }
    }

    /// Compact label, e.g. "15 min".
    #[must_use]
    pub fn short_name(self) -> &'static str {
        match self {
            Self::FiveMinutes => "5 min",
            Self::TenMinutes => "10 min",
            Self::FifteenMinutes => "15 min",
            Self::ThirtyMinutes => "30 min",
            Self::SixtyMinutes => "1 hr",
        }
    }
}

impl TryFrom<u32> for TrackingInterval {
    type Error = Error;

    fn try_from(minutes: u32) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|interval| interval.minutes() == minutes)
            .ok_or_else(|| Error::InvalidInterval {
                value: minutes.to_string(),
            })
    }
}

impl From<TrackingInterval> for u32 {
    fn from(interval: TrackingInterval) -> Self {
        interval.minutes()
    }
}

impl FromStr for TrackingInterval {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_suffix("min")
            .or_else(|| trimmed.strip_suffix('m'))
            .unwrap_or(trimmed)
            .trim();
        let minutes: u32 = digits.parse().map_err(|_| Error::InvalidInterval {
            value: s.to_string(),
        })?;
        Self::try_from(minutes)
    }
}

impl fmt::Display for TrackingInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One active vitals reminder cycle attached to a note.
///
/// Sessions are owned by the session store; callers receive shared references
/// and read through the accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingSession {
    pub(crate) note_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) patient_name: Option<String>,
    pub(crate) start_time: DateTime<Utc>,
    pub(crate) interval_minutes: TrackingInterval,
    pub(crate) next_check_time: DateTime<Utc>,
    #[serde(default)]
    pub(crate) checks_completed: u32,
}

impl TrackingSession {
    /// Begin a fresh cycle at `now`; the first check falls one interval later.
    pub(crate) fn start(
        note_id: Uuid,
        patient_name: Option<String>,
        interval: TrackingInterval,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            note_id,
            patient_name,
            start_time: now,
            interval_minutes: interval,
            next_check_time: now + interval.duration(),
            checks_completed: 0,
        }
    }

    /// Count a completed check and push the next one a full interval past `now`.
    pub(crate) fn record_check(&mut self, now: DateTime<Utc>) {
        self.checks_completed = self.checks_completed.saturating_add(1);
        self.next_check_time = (now + self.interval_minutes.duration()).max(self.start_time);
    }

    /// The note this session belongs to.
    #[must_use]
    pub fn note_id(&self) -> Uuid {
        self.note_id
    }

    /// Patient name shown in reminder text.
    #[must_use]
    pub fn patient_name(&self) -> Option<&str> {
        self.patient_name.as_deref()
    }

    /// When tracking began.
    #[must_use]
    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// Reminder interval.
    #[must_use]
    pub fn interval(&self) -> TrackingInterval {
        self.interval_minutes
    }

    /// When the next vitals check is due.
    #[must_use]
    pub fn next_check_time(&self) -> DateTime<Utc> {
        self.next_check_time
    }

    /// Number of checks recorded since tracking began.
    #[must_use]
    pub fn checks_completed(&self) -> u32 {
        self.checks_completed
    }

    /// Time until the next check; negative once overdue.
    #[must_use]
    pub fn time_remaining(&self, now: DateTime<Utc>) -> Duration {
        self.next_check_time - now
    }

    /// Whether the next check is due at `now`.
    #[must_use]
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        now >= self.next_check_time
    }

    /// Whether the session was abandoned: its next check plus `grace` has passed.
    ///
    /// A deadline beyond the representable range never expires.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>, grace: Duration) -> bool {
        self.next_check_time
            .checked_add_signed(grace)
            .is_some_and(|deadline| deadline <= now)
    }
}

/// Render a countdown as `"4m 5s"`-style text.
///
/// Returns `None` when nothing remains (the check is due or overdue).
#[must_use]
pub fn format_time_remaining(remaining: Duration) -> Option<String> {
    let total = remaining.num_seconds();
    if total <= 0 {
        return None;
    }
    let minutes = total / 60;
    let seconds = total % 60;
    if minutes > 0 {
        Some(format!("{minutes}m {seconds}s"))
    } else {
        Some(format!("{seconds}s"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn test_interval_minutes_and_names() {
        let minutes: Vec<u32> = TrackingInterval::ALL.iter().map(|i| i.minutes()).collect();
        assert_eq!(minutes, vec![5, 10, 15, 30, 60]);
        assert_eq!(TrackingInterval::SixtyMinutes.display_name(), "1 hour");
        assert_eq!(TrackingInterval::SixtyMinutes.short_name(), "1 hr");
        assert_eq!(TrackingInterval::TenMinutes.to_string(), "10 minutes");
    }

    #[test]
    fn test_interval_default_is_fifteen() {
        assert_eq!(TrackingInterval::default(), TrackingInterval::FifteenMinutes);
    }

    #[test]
    fn test_interval_try_from_rejects_unsupported() {
        assert_eq!(
            TrackingInterval::try_from(30).unwrap(),
            TrackingInterval::ThirtyMinutes
        );
        assert!(matches!(
            TrackingInterval::try_from(20),
            Err(Error::InvalidInterval { ref value }) if value == "20"
        ));
    }

    #[test]
    fn test_interval_from_str() {
        assert_eq!(
            "5".parse::<TrackingInterval>().unwrap(),
            TrackingInterval::FiveMinutes
        );
        assert_eq!(
            "60min".parse::<TrackingInterval>().unwrap(),
            TrackingInterval::SixtyMinutes
        );
        assert_eq!(
            " 10m ".parse::<TrackingInterval>().unwrap(),
            TrackingInterval::TenMinutes
        );
        assert!("fast".parse::<TrackingInterval>().is_err());
        assert!("45".parse::<TrackingInterval>().is_err());
    }

    #[test]
    fn test_interval_serializes_as_minutes() {
        assert_eq!(
            serde_json::to_string(&TrackingInterval::ThirtyMinutes).unwrap(),
            "30"
        );
        assert!(serde_json::from_str::<TrackingInterval>("7").is_err());
    }

    #[test]
    fn test_start_sets_first_check_one_interval_out() {
        for interval in TrackingInterval::ALL {
            let session = TrackingSession::start(Uuid::new_v4(), None, interval, t0());
            assert_eq!(session.start_time(), t0());
            assert_eq!(
                session.next_check_time(),
                t0() + Duration::seconds(i64::from(interval.minutes()) * 60)
            );
            assert_eq!(session.checks_completed(), 0);
            assert!(session.next_check_time() >= session.start_time());
        }
    }

    #[test]
    fn test_record_check_advances_from_now() {
        let mut session = TrackingSession::start(
            Uuid::new_v4(),
            Some("Jane Doe".to_string()),
            TrackingInterval::FifteenMinutes,
            t0(),
        );
        session.record_check(t0() + Duration::seconds(920));

        assert_eq!(session.checks_completed(), 1);
        assert_eq!(session.next_check_time(), t0() + Duration::seconds(1820));
    }

    #[test]
    fn test_record_check_never_precedes_start() {
        let mut session =
            TrackingSession::start(Uuid::new_v4(), None, TrackingInterval::FiveMinutes, t0());
        session.record_check(t0() - Duration::hours(2));
        assert_eq!(session.next_check_time(), session.start_time());
    }

    #[test]
    fn test_time_remaining_goes_negative() {
        let session =
            TrackingSession::start(Uuid::new_v4(), None, TrackingInterval::FiveMinutes, t0());
        assert_eq!(session.time_remaining(t0()), Duration::minutes(5));
        assert_eq!(
            session.time_remaining(t0() + Duration::minutes(6)),
            Duration::minutes(-1)
        );
        assert!(!session.is_due(t0()));
        assert!(session.is_due(t0() + Duration::minutes(5)));
    }

    #[test]
    fn test_is_expired_respects_grace() {
        let session =
            TrackingSession::start(Uuid::new_v4(), None, TrackingInterval::FiveMinutes, t0());
        let next = session.next_check_time();
        let grace = Duration::hours(1);

        assert!(!session.is_expired(next + Duration::minutes(59), grace));
        assert!(session.is_expired(next + Duration::minutes(60), grace));
        assert!(session.is_expired(next + Duration::minutes(61), grace));
    }

    #[test]
    fn test_is_expired_far_future_deadline() {
        let mut session =
            TrackingSession::start(Uuid::new_v4(), None, TrackingInterval::FiveMinutes, t0());
        session.next_check_time = DateTime::<Utc>::MAX_UTC - Duration::minutes(30);

        assert!(!session.is_expired(t0(), Duration::hours(1)));
        assert!(!session.is_expired(DateTime::<Utc>::MAX_UTC, Duration::hours(1)));
        assert!(session.time_remaining(t0()) > Duration::zero());
    }

    #[test]
    fn test_session_json_field_names() {
        let id = Uuid::new_v4();
        let session = TrackingSession::start(
            id,
            Some("Jane Doe".to_string()),
            TrackingInterval::FifteenMinutes,
            t0(),
        );
        let value = serde_json::to_value(&session).unwrap();

        assert_eq!(value["noteId"], id.to_string());
        assert_eq!(value["patientName"], "Jane Doe");
        assert_eq!(value["intervalMinutes"], 15);
        assert_eq!(value["checksCompleted"], 0);
        assert!(value["startTime"].is_string());
        assert!(value["nextCheckTime"].is_string());
    }

    #[test]
    fn test_session_without_patient_name_omits_field() {
        let session =
            TrackingSession::start(Uuid::new_v4(), None, TrackingInterval::TenMinutes, t0());
        let value = serde_json::to_value(&session).unwrap();
        assert!(value.get("patientName").is_none());
    }

    #[test]
    fn test_format_time_remaining() {
        assert_eq!(
            format_time_remaining(Duration::seconds(245)).as_deref(),
            Some("4m 5s")
        );
        assert_eq!(
            format_time_remaining(Duration::seconds(42)).as_deref(),
            Some("42s")
        );
        assert!(format_time_remaining(Duration::zero()).is_none());
        assert!(format_time_remaining(Duration::seconds(-30)).is_none());
    }
}
