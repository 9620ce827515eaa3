//! `trailtriage` - CLI for vitals re-check reminders
//!
//! This binary drives the vitals tracker against a local `SQLite` store, with
//! reminders reported through the log, and runs the field guide migration.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use uuid::Uuid;

use trailtriage::cli::{
    CheckCommand, Cli, Command, ConfigCommand, MigrateCommand, StartCommand, WatchCommand,
};
use trailtriage::library::{migrate_all, parse_chapters};
use trailtriage::vitals::{format_time_remaining, parse_blood_pressure};
use trailtriage::{
    init_logging, Config, LogNotifier, ScheduleOutcome, SqliteStore, SystemClock,
    TrackingSession, VitalSigns, VitalsTracker,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            exit_code(&e)
        }
    }
}

/// 2 for rejected input, 3 for storage failures, 1 otherwise.
fn exit_code(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<trailtriage::Error>() {
        Some(e) if e.is_input_error() => ExitCode::from(2),
        Some(e) if e.is_storage_error() => ExitCode::from(3),
        _ => ExitCode::FAILURE,
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Config and migrate commands run without a valid configuration
    let load = || Config::load_from(cli.config.clone());

    match cli.command {
        Command::Start(cmd) => handle_start(&load()?, cmd).await,
        Command::Stop(cmd) => {
            let mut tracker = open_tracker(&load()?)?;
            if tracker.stop_tracking(cmd.note_id).await {
                println!("Stopped tracking {}", cmd.note_id);
            } else {
                println!("Note {} is not being tracked", cmd.note_id);
            }
            Ok(())
        }
        Command::Check(cmd) => handle_check(&load()?, cmd).await,
        Command::Snooze(cmd) => {
            let config = load()?;
            let tracker = open_tracker(&config)?;
            match tracker.snooze(cmd.note_id).await {
                Some(outcome) => println!(
                    "Snoozed {} for {} min ({})",
                    cmd.note_id,
                    config.tracking.snooze_minutes,
                    describe_outcome(outcome)
                ),
                None => println!("Note {} is not being tracked", cmd.note_id),
            }
            Ok(())
        }
        Command::Status(cmd) => handle_status(&load()?, cmd.json),
        Command::Watch(cmd) => handle_watch(&load()?, &cmd).await,
        Command::Migrate(cmd) => handle_migrate(&cmd),
        Command::Config(cmd) => handle_config(cli.config.clone(), cmd),
    }
}

fn open_tracker(config: &Config) -> anyhow::Result<VitalsTracker> {
    let path = config.database_path();
    let store = SqliteStore::open(&path)
        .with_context(|| format!("opening tracking store at {}", path.display()))?;

    let tracker = VitalsTracker::from_config(
        config,
        Box::new(store),
        Arc::new(LogNotifier::new(config.notifications.enabled)),
        Arc::new(SystemClock),
    )?;
    Ok(tracker)
}

fn describe_outcome(outcome: ScheduleOutcome) -> String {
    match outcome {
        ScheduleOutcome::Scheduled { delay } => format!("reminder in {}s", delay.as_secs()),
        ScheduleOutcome::PastDue => "check already due, no reminder".to_string(),
        ScheduleOutcome::Failed => "reminder not scheduled".to_string(),
    }
}

fn describe_remaining(session: &TrackingSession, now: chrono::DateTime<chrono::Utc>) -> String {
    let remaining = session.time_remaining(now);
    if !session.is_due(now) {
        return format_time_remaining(remaining).unwrap_or_else(|| "due now".to_string());
    }
    match (-remaining).num_minutes() {
        0 => "due now".to_string(),
        minutes => format!("overdue by {minutes}m"),
    }
}

async fn handle_start(config: &Config, cmd: StartCommand) -> anyhow::Result<()> {
    let mut tracker = open_tracker(config)?;
    tracker.register_categories().await;

    let note_id = cmd.note_id.unwrap_or_else(Uuid::new_v4);
    let interval = cmd.interval.unwrap_or_else(|| tracker.default_interval());

    let outcome = tracker
        .start_tracking(note_id, cmd.patient.as_deref(), interval)
        .await;

    println!("Tracking {note_id} every {interval}");
    println!("  {}", describe_outcome(outcome));
    Ok(())
}

fn reading_from(cmd: &CheckCommand) -> anyhow::Result<VitalSigns> {
    let mut reading = VitalSigns::new(chrono::Utc::now());
    if let Some(hr) = cmd.hr {
        reading = reading.with_heart_rate(hr);
    }
    if let Some(rr) = cmd.rr {
        reading = reading.with_respiratory_rate(rr);
    }
    if let Some(bp) = &cmd.bp {
        let (sys, dia) = parse_blood_pressure(bp)?;
        reading = reading.with_blood_pressure(sys, dia);
    }
    if let Some(temp) = cmd.temp {
        reading = reading.with_temperature(temp);
    }
    if let Some(spo2) = cmd.spo2 {
        reading = reading.with_oxygen_saturation(spo2);
    }
    if let Some(notes) = &cmd.notes {
        reading = reading.with_notes(notes.clone());
    }
    Ok(reading)
}

async fn handle_check(config: &Config, cmd: CheckCommand) -> anyhow::Result<()> {
    let mut tracker = open_tracker(config)?;

    let reading = reading_from(&cmd)?;
    let outcome = if reading.is_empty() {
        tracker.record_check(cmd.note_id).await
    } else {
        println!("Vitals: {}", reading.summary());
        tracker.record_vitals(cmd.note_id, &reading).await
    };

    let Some(outcome) = outcome else {
        bail!("note {} is not being tracked", cmd.note_id);
    };
    if let Some(session) = tracker.session(cmd.note_id) {
        println!(
            "Check {} recorded for {}; next at {}",
            session.checks_completed(),
            cmd.note_id,
            session.next_check_time().format("%H:%M:%S")
        );
    }
    println!("  {}", describe_outcome(outcome));
    Ok(())
}

fn handle_status(config: &Config, json: bool) -> anyhow::Result<()> {
    let tracker = open_tracker(config)?;
    let sessions = tracker.sessions();
    let now = chrono::Utc::now();

    if json {
        let entries: Vec<_> = sessions
            .iter()
            .map(|s| {
                serde_json::json!({
                    "session": s,
                    "secondsRemaining": s.time_remaining(now).num_seconds(),
                })
            })
            .collect();
        let status = serde_json::json!({
            "database_path": config.database_path(),
            "active": sessions.len(),
            "sessions": entries,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("trailtriage status");
    println!("------------------");
    println!("Database:      {}", config.database_path().display());
    println!("Tracking:      {} note(s)", sessions.len());
    for session in sessions {
        println!();
        println!("{}", session.note_id());
        println!(
            "  Patient:     {}",
            session.patient_name().unwrap_or("(unnamed)")
        );
        println!("  Interval:    {}", session.interval());
        println!("  Checks:      {}", session.checks_completed());
        println!(
            "  Next check:  {} ({})",
            session.next_check_time().format("%Y-%m-%d %H:%M:%S UTC"),
            describe_remaining(session, now)
        );
    }
    Ok(())
}

async fn handle_watch(config: &Config, cmd: &WatchCommand) -> anyhow::Result<()> {
    let mut tracker = open_tracker(config)?;
    if let Some(note_id) = cmd.note_id {
        if !tracker.is_tracking(note_id) {
            bail!("note {note_id} is not being tracked");
        }
    }

    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                // Pick up checks and stops made from other shells
                tracker.reload();
                let now = chrono::Utc::now();
                let line: Vec<String> = tracker
                    .sessions()
                    .into_iter()
                    .filter(|s| cmd.note_id.map_or(true, |id| id == s.note_id()))
                    .map(|s| {
                        let name = s.patient_name().map_or_else(
                            || s.note_id().to_string()[..8].to_string(),
                            str::to_string,
                        );
                        format!("{name}: {}", describe_remaining(s, now))
                    })
                    .collect();
                if line.is_empty() {
                    println!("Nothing is being tracked");
                    return Ok(());
                }
                println!("{}", line.join("  |  "));
            }
            _ = tokio::signal::ctrl_c() => {
                return Ok(());
            }
        }
    }
}

fn handle_migrate(cmd: &MigrateCommand) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&cmd.input)
        .with_context(|| format!("reading {}", cmd.input.display()))?;
    let chapters =
        parse_chapters(&text).with_context(|| format!("parsing {}", cmd.input.display()))?;

    let modules = migrate_all(&chapters);
    let json = serde_json::to_string_pretty(&modules)?;

    for module in &modules {
        eprintln!(
            "  {:<28} {:<14} {:<7} {}",
            module.module_title,
            module.category.label(),
            module.category.color(),
            module.location.as_deref().unwrap_or("-")
        );
    }

    match &cmd.output {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            eprintln!("Migrated {} chapter(s) to {}", modules.len(), path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn handle_config(config_path: Option<PathBuf>, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = Config::load_from(config_path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                print_config(&config);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .or(config_path)
                .unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            Config::load_from(Some(path.clone()))
                .with_context(|| format!("invalid configuration in {}", path.display()))?;
            println!("Configuration is valid.");
        }
    }
    Ok(())
}

fn print_config(config: &Config) {
    println!("Current Configuration");
    println!("=====================");
    println!();
    println!("[Storage]");
    println!("  Database path:      {}", config.database_path().display());
    println!();
    println!("[Tracking]");
    println!(
        "  Default interval:   {} min",
        config.tracking.default_interval_minutes
    );
    println!("  Grace period:       {}s", config.tracking.grace_period_secs);
    println!("  Snooze:             {} min", config.tracking.snooze_minutes);
    println!("  Sessions key:       {}", config.tracking.sessions_key);
    println!();
    println!("[Notifications]");
    println!("  Enabled:            {}", config.notifications.enabled);
    println!("  Title:              {}", config.notifications.title);
    println!(
        "  Time sensitive:     {}",
        config.notifications.time_sensitive
    );
}
