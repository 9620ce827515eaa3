//! Logging setup.
//!
//! The CLI installs one `tracing` subscriber that writes compact lines to
//! stderr, so command output on stdout stays machine-readable. Library code
//! only emits events; embedders install their own subscriber.

use std::io::IsTerminal;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Crate target the verbosity flags apply to. Other targets stay at `warn`.
const TARGET: &str = "trailtriage";

/// How chatty the CLI is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    /// Tracking events: starts, checks, stops.
    #[default]
    Normal,
    /// Adds store and scheduler detail.
    Verbose,
    /// Everything.
    Trace,
}

impl Verbosity {
    /// Map `--quiet` and the `-v` count to a level. Quiet wins.
    #[must_use]
    pub fn from_flags(quiet: bool, verbose: u8) -> Self {
        match (quiet, verbose) {
            (true, _) => Self::Quiet,
            (false, 0) => Self::Normal,
            (false, 1) => Self::Verbose,
            (false, _) => Self::Trace,
        }
    }

    /// Most detailed level logged for this crate.
    #[must_use]
    pub fn level(self) -> LevelFilter {
        match self {
            Self::Quiet => LevelFilter::ERROR,
            Self::Normal => LevelFilter::INFO,
            Self::Verbose => LevelFilter::DEBUG,
            Self::Trace => LevelFilter::TRACE,
        }
    }

    /// Filter directive used when `RUST_LOG` is unset, e.g.
    /// `"warn,trailtriage=debug"`.
    #[must_use]
    pub fn directive(self) -> String {
        if self == Self::Quiet {
            return "error".to_string();
        }
        format!("warn,{TARGET}={}", self.level().to_string().to_lowercase())
    }
}

/// The filter to install: `rust_log` when it parses, else the verbosity default.
#[must_use]
pub fn build_filter(verbosity: Verbosity, rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .filter(|spec| !spec.trim().is_empty())
        .and_then(|spec| EnvFilter::try_new(spec).ok())
        .unwrap_or_else(|| EnvFilter::new(verbosity.directive()))
}

/// Install the stderr subscriber.
///
/// `RUST_LOG` overrides `verbosity` when it holds a valid filter. Returns
/// `false` if a subscriber was already installed, in which case nothing
/// changes.
///
/// # Examples
///
/// ```no_run
/// use trailtriage::{init_logging, logging::Verbosity};
///
/// init_logging(Verbosity::from_flags(false, 1));
/// ```
pub fn init_logging(verbosity: Verbosity) -> bool {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(verbosity, rust_log.as_deref());

    let stderr_layer = fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(verbosity >= Verbosity::Verbose);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .try_init()
        .is_ok()
}

/// Warnings and errors through the test writer.
#[cfg(test)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("warn"))
        .with_test_writer()
        .try_init();
}
