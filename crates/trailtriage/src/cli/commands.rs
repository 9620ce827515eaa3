//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use uuid::Uuid;

use crate::vitals::TrackingInterval;

/// Start tracking arguments.
#[derive(Debug, Args)]
pub struct StartCommand {
    /// Note to track (a new identifier is generated when omitted)
    pub note_id: Option<Uuid>,

    /// Patient name shown in reminders
    #[arg(short, long)]
    pub patient: Option<String>,

    /// Reminder interval in minutes: 5, 10, 15, 30 or 60
    #[arg(short, long)]
    pub interval: Option<TrackingInterval>,
}

/// Arguments for commands that act on one tracked note.
#[derive(Debug, Args)]
pub struct NoteCommand {
    /// The tracked note
    pub note_id: Uuid,
}

/// Record-check arguments. Any measurement given is logged with the check.
#[derive(Debug, Args)]
pub struct CheckCommand {
    /// The tracked note
    pub note_id: Uuid,

    /// Heart rate (beats per minute)
    #[arg(long)]
    pub hr: Option<u16>,

    /// Respiratory rate (breaths per minute)
    #[arg(long)]
    pub rr: Option<u16>,

    /// Blood pressure as SYS/DIA, e.g. 120/80
    #[arg(long)]
    pub bp: Option<String>,

    /// Temperature in degrees Celsius
    #[arg(long)]
    pub temp: Option<f64>,

    /// Oxygen saturation percentage
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub spo2: Option<u8>,

    /// Free-text observations
    #[arg(short, long)]
    pub notes: Option<String>,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Watch command arguments.
#[derive(Debug, Args)]
pub struct WatchCommand {
    /// Only watch this note
    pub note_id: Option<Uuid>,
}

/// Migrate command arguments.
#[derive(Debug, Args)]
pub struct MigrateCommand {
    /// JSON file holding an array of chapters
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Write modules here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },
}
