//! Configuration management for trailtriage.
//!
//! Configuration is layered with figment: built-in defaults, then a TOML file,
//! then `TRAILTRIAGE_`-prefixed environment variables. Nested keys in the
//! environment use a double underscore, e.g.
//! `TRAILTRIAGE_TRACKING__SNOOZE_MINUTES=10`.

use std::path::PathBuf;

use chrono::Duration;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::vitals::TrackingInterval;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "trailtriage";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "trailtriage.db";

/// Key under which active tracking sessions are persisted.
pub const DEFAULT_SESSIONS_KEY: &str = "activeVitalsSessions";

/// Longest accepted grace window (seven days).
pub const MAX_GRACE_PERIOD_SECS: u64 = 7 * 24 * 60 * 60;

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Vitals tracking configuration.
    pub tracking: TrackingConfig,
    /// Reminder notification configuration.
    pub notifications: NotificationConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `<local data dir>/trailtriage/trailtriage.db`.
    pub database_path: Option<PathBuf>,
}

/// Vitals tracking configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Interval used when none is given and no preference has been stored.
    pub default_interval_minutes: u32,
    /// How long past its next check a session survives a restart.
    pub grace_period_secs: u64,
    /// Delay used by the snooze action.
    pub snooze_minutes: u32,
    /// Storage key holding the serialized session map.
    pub sessions_key: String,
}

/// Reminder notification configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Whether the user allows reminders at all.
    pub enabled: bool,
    /// Reminder title.
    pub title: String,
    /// Ask the platform to break through focus modes.
    pub time_sensitive: bool,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            default_interval_minutes: TrackingInterval::default().minutes(),
            grace_period_secs: 3600,
            snooze_minutes: 5,
            sessions_key: DEFAULT_SESSIONS_KEY.to_string(),
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            title: "Time to Check Vitals".to_string(),
            time_sensitive: true,
        }
    }
}

impl TrackingConfig {
    /// The default interval as a typed value.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured minutes are not a supported interval.
    pub fn default_interval(&self) -> Result<TrackingInterval> {
        TrackingInterval::try_from(self.default_interval_minutes)
    }

    /// Grace window applied when pruning stale sessions at load, capped at
    /// [`MAX_GRACE_PERIOD_SECS`].
    #[must_use]
    pub fn grace_period(&self) -> Duration {
        let secs = self.grace_period_secs.min(MAX_GRACE_PERIOD_SECS);
        i64::try_from(secs)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or_else(Duration::zero)
    }

    /// Snooze delay.
    #[must_use]
    pub fn snooze(&self) -> Duration {
        Duration::minutes(i64::from(self.snooze_minutes))
    }
}

impl Config {
    /// Load configuration from the default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// A missing file is not an error; defaults and the environment still apply.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("TRAILTRIAGE_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.tracking.default_interval().is_err() {
            return Err(Error::ConfigValidation {
                message: format!(
                    "default_interval_minutes ({}) must be one of 5, 10, 15, 30 or 60",
                    self.tracking.default_interval_minutes
                ),
            });
        }

        if self.tracking.grace_period_secs > MAX_GRACE_PERIOD_SECS {
            return Err(Error::ConfigValidation {
                message: format!(
                    "grace_period_secs ({}) must be at most {MAX_GRACE_PERIOD_SECS}",
                    self.tracking.grace_period_secs
                ),
            });
        }

        if self.tracking.snooze_minutes == 0 {
            return Err(Error::ConfigValidation {
                message: "snooze_minutes must be greater than 0".to_string(),
            });
        }

        if self.tracking.sessions_key.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "sessions_key cannot be empty".to_string(),
            });
        }

        if self.notifications.title.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "notification title cannot be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.storage.database_path.is_none());
        assert_eq!(config.tracking.default_interval_minutes, 15);
        assert_eq!(config.tracking.grace_period_secs, 3600);
        assert_eq!(config.tracking.snooze_minutes, 5);
        assert_eq!(config.tracking.sessions_key, "activeVitalsSessions");
        assert!(config.notifications.enabled);
        assert!(config.notifications.time_sensitive);
        assert_eq!(config.notifications.title, "Time to Check Vitals");
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_unsupported_interval() {
        let mut config = Config::default();
        config.tracking.default_interval_minutes = 20;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("default_interval_minutes"));
    }

    #[test]
    fn test_validate_zero_snooze() {
        let mut config = Config::default();
        config.tracking.snooze_minutes = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("snooze_minutes"));
    }

    #[test]
    fn test_validate_huge_grace() {
        let mut config = Config::default();
        for secs in [u64::MAX, 9_000_000_000_000, MAX_GRACE_PERIOD_SECS + 1] {
            config.tracking.grace_period_secs = secs;
            let err = config.validate().unwrap_err().to_string();
            assert!(err.contains("grace_period_secs"));
        }

        config.tracking.grace_period_secs = MAX_GRACE_PERIOD_SECS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_grace_period_is_capped() {
        let tracking = TrackingConfig {
            grace_period_secs: u64::MAX,
            ..TrackingConfig::default()
        };
        assert_eq!(tracking.grace_period(), Duration::days(7));

        let tracking = TrackingConfig {
            grace_period_secs: 0,
            ..TrackingConfig::default()
        };
        assert_eq!(tracking.grace_period(), Duration::zero());
    }

    #[test]
    fn test_load_rejects_huge_grace_from_file() {
        let path = std::env::temp_dir().join(format!(
            "trailtriage_config_grace_{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "[tracking]\ngrace_period_secs = 9000000000000\n").unwrap();

        let result = Config::load_from(Some(path.clone()));
        assert!(matches!(result, Err(Error::ConfigValidation { .. })));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_validate_blank_sessions_key() {
        let mut config = Config::default();
        config.tracking.sessions_key = "  ".to_string();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_empty_title() {
        let mut config = Config::default();
        config.notifications.title = String::new();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("title"));
    }

    #[test]
    fn test_tracking_durations() {
        let tracking = TrackingConfig::default();
        assert_eq!(tracking.grace_period(), Duration::hours(1));
        assert_eq!(tracking.snooze(), Duration::minutes(5));
        assert_eq!(
            tracking.default_interval().unwrap(),
            TrackingInterval::FifteenMinutes
        );
    }

    #[test]
    fn test_database_path_default() {
        let path = Config::default().database_path();
        assert!(path.to_string_lossy().contains("trailtriage.db"));
    }

    #[test]
    fn test_database_path_custom() {
        let mut config = Config::default();
        config.storage.database_path = Some(PathBuf::from("/custom/path/vitals.sqlite"));

        assert_eq!(
            config.database_path(),
            PathBuf::from("/custom/path/vitals.sqlite")
        );
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("trailtriage"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_toml_file() {
        let path = std::env::temp_dir().join(format!(
            "trailtriage_config_test_{}.toml",
            std::process::id()
        ));
        std::fs::write(
            &path,
            "[tracking]\ndefault_interval_minutes = 30\nsnooze_minutes = 10\n\n[notifications]\nenabled = false\n",
        )
        .unwrap();

        let config = Config::load_from(Some(path.clone())).unwrap();
        assert_eq!(config.tracking.default_interval_minutes, 30);
        assert_eq!(config.tracking.snooze_minutes, 10);
        assert!(!config.notifications.enabled);
        assert_eq!(config.tracking.grace_period_secs, 3600);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_rejects_invalid_file_values() {
        let path = std::env::temp_dir().join(format!(
            "trailtriage_config_invalid_{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "[tracking]\ndefault_interval_minutes = 7\n").unwrap();

        let result = Config::load_from(Some(path.clone()));
        assert!(matches!(result, Err(Error::ConfigValidation { .. })));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_tracking_config_deserialize_partial() {
        let json = r#"{"grace_period_secs": 60}"#;
        let tracking: TrackingConfig = serde_json::from_str(json).unwrap();
        assert_eq!(tracking.grace_period_secs, 60);
        assert_eq!(tracking.default_interval_minutes, 15);
    }
}
