//! Command-line interface for trailtriage.
//!
//! This module provides the CLI structure for the `trailtriage` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    CheckCommand, ConfigCommand, MigrateCommand, NoteCommand, StartCommand, StatusCommand,
    WatchCommand,
};

/// trailtriage - Vitals re-check reminders for wilderness patient care
///
/// Tracks periodic vital-sign checks per patient note, persists them across
/// restarts, and keeps one pending reminder per note.
#[derive(Debug, Parser)]
#[command(name = "trailtriage")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start (or restart) vitals tracking for a note
    Start(StartCommand),

    /// Stop tracking a note
    Stop(NoteCommand),

    /// Record a completed vitals check
    Check(CheckCommand),

    /// Remind again in a few minutes
    Snooze(NoteCommand),

    /// Show tracked notes
    Status(StatusCommand),

    /// Live countdown until each next check
    Watch(WatchCommand),

    /// Convert legacy field guide chapters to topic modules
    Migrate(MigrateCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        crate::logging::Verbosity::from_flags(self.quiet, self.verbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vitals::TrackingInterval;
    use clap::CommandFactory;
    use uuid::Uuid;

    const NOTE: &str = "67e55044-10b1-426f-9247-bb680e5fe0c8";

    fn cli(verbose: u8, quiet: bool) -> Cli {
        Cli {
            config: None,
            verbose,
            quiet,
            command: Command::Status(StatusCommand { json: false }),
        }
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "trailtriage");
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(cli(0, true).verbosity(), crate::logging::Verbosity::Quiet);
        assert_eq!(cli(3, true).verbosity(), crate::logging::Verbosity::Quiet);
        assert_eq!(cli(0, false).verbosity(), crate::logging::Verbosity::Normal);
        assert_eq!(cli(1, false).verbosity(), crate::logging::Verbosity::Verbose);
        assert_eq!(cli(2, false).verbosity(), crate::logging::Verbosity::Trace);
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_start() {
        let cli = Cli::try_parse_from([
            "trailtriage",
            "start",
            NOTE,
            "--patient",
            "Jane Doe",
            "--interval",
            "30",
        ])
        .unwrap();
        let Command::Start(cmd) = cli.command else {
            panic!("expected start");
        };
        assert_eq!(cmd.note_id, Some(Uuid::parse_str(NOTE).unwrap()));
        assert_eq!(cmd.patient.as_deref(), Some("Jane Doe"));
        assert_eq!(cmd.interval, Some(TrackingInterval::ThirtyMinutes));
    }

    #[test]
    fn test_parse_start_without_note() {
        let cli = Cli::try_parse_from(["trailtriage", "start"]).unwrap();
        let Command::Start(cmd) = cli.command else {
            panic!("expected start");
        };
        assert!(cmd.note_id.is_none());
        assert!(cmd.interval.is_none());
    }

    #[test]
    fn test_parse_start_rejects_unsupported_interval() {
        assert!(Cli::try_parse_from(["trailtriage", "start", "-i", "20"]).is_err());
    }

    #[test]
    fn test_parse_rejects_bad_note_id() {
        assert!(Cli::try_parse_from(["trailtriage", "stop", "abc"]).is_err());
    }

    #[test]
    fn test_parse_check_with_vitals() {
        let cli = Cli::try_parse_from([
            "trailtriage",
            "check",
            NOTE,
            "--hr",
            "92",
            "--bp",
            "118/76",
            "--spo2",
            "97",
        ])
        .unwrap();
        let Command::Check(cmd) = cli.command else {
            panic!("expected check");
        };
        assert_eq!(cmd.hr, Some(92));
        assert_eq!(cmd.bp.as_deref(), Some("118/76"));
        assert_eq!(cmd.spo2, Some(97));
        assert!(cmd.notes.is_none());
    }

    #[test]
    fn test_parse_check_rejects_spo2_over_100() {
        assert!(Cli::try_parse_from(["trailtriage", "check", NOTE, "--spo2", "101"]).is_err());
    }

    #[test]
    fn test_parse_snooze_and_stop() {
        let cli = Cli::try_parse_from(["trailtriage", "snooze", NOTE]).unwrap();
        assert!(matches!(cli.command, Command::Snooze(_)));
        let cli = Cli::try_parse_from(["trailtriage", "stop", NOTE]).unwrap();
        assert!(matches!(cli.command, Command::Stop(_)));
    }

    #[test]
    fn test_parse_status_json() {
        let cli = Cli::try_parse_from(["trailtriage", "status", "--json"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Status(StatusCommand { json: true })
        ));
    }

    #[test]
    fn test_parse_watch() {
        let cli = Cli::try_parse_from(["trailtriage", "watch"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Watch(WatchCommand { note_id: None })
        ));
    }

    #[test]
    fn test_parse_migrate() {
        let cli =
            Cli::try_parse_from(["trailtriage", "migrate", "chapters.json", "-o", "modules.json"])
                .unwrap();
        let Command::Migrate(cmd) = cli.command else {
            panic!("expected migrate");
        };
        assert_eq!(cmd.input, PathBuf::from("chapters.json"));
        assert_eq!(cmd.output, Some(PathBuf::from("modules.json")));
    }

    #[test]
    fn test_parse_config_validate_with_file() {
        let cli =
            Cli::try_parse_from(["trailtriage", "config", "validate", "/tmp/broken.toml"]).unwrap();
        let Command::Config(ConfigCommand::Validate { file }) = cli.command else {
            panic!("expected config validate");
        };
        assert_eq!(file, Some(PathBuf::from("/tmp/broken.toml")));
    }

    #[test]
    fn test_parse_config_validate() {
        let cli = Cli::try_parse_from(["trailtriage", "config", "validate"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Validate { file: None })
        ));
    }

    #[test]
    fn test_parse_with_global_flags() {
        let cli =
            Cli::try_parse_from(["trailtriage", "status", "-c", "/custom/config.toml", "-vv"])
                .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
        assert_eq!(cli.verbose, 2);
        assert!(!cli.quiet);
    }
}
