//! Process-wide `tracing` subscriber setup.
//!
//! The level is decided once by [`LogSettings::resolve`], a pure function of
//! the inputs, and installed once by [`init`] at the start of `main`.
//! Components log through the `tracing` macros and never touch the
//! subscriber.
//!
//! Precedence, highest first:
//!
//! 1. `ACTIONS_STEP_DEBUG=true` (GitHub Actions debug logging) forces `debug`
//! 2. `--verbose` → `debug`, `--quiet` → `error`
//! 3. `--log-level` / `LOG_LEVEL`, then `log_level` from `blockdeploy.toml`
//! 4. `info`
//!
//! `RUST_LOG`, when set, replaces the computed filter entirely.

use anyhow::{Result, anyhow};
use std::io::IsTerminal;
use tracing::{Level, warn};
use tracing_subscriber::EnvFilter;

/// The logging configuration for one process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// Maximum level emitted
    pub level: Level,
    /// A `--log-level` value that was not understood, reported after init
    pub rejected_level: Option<String>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            rejected_level: None,
        }
    }
}

impl LogSettings {
    /// Decide the log level.
    ///
    /// An unrecognized `requested` level falls back to `info` and is kept in
    /// `rejected_level` so it can be reported once logging works.
    pub fn resolve(requested: Option<&str>, verbose: bool, quiet: bool, step_debug: bool) -> Self {
        if step_debug || verbose {
            return Self {
                level: Level::DEBUG,
                rejected_level: None,
            };
        }
        if quiet {
            return Self {
                level: Level::ERROR,
                rejected_level: None,
            };
        }

        match requested.map(str::trim).filter(|s| !s.is_empty()) {
            None => Self::default(),
            Some(value) => match parse_level(value) {
                Some(level) => Self {
                    level,
                    rejected_level: None,
                },
                None => Self {
                    level: Level::INFO,
                    rejected_level: Some(value.to_string()),
                },
            },
        }
    }

    fn filter(&self) -> EnvFilter {
        if std::env::var_os("RUST_LOG").is_some() {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::new(self.level.to_string().to_lowercase())
        }
    }
}

fn parse_level(value: &str) -> Option<Level> {
    match value.to_ascii_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" | "warning" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}

/// Whether GitHub Actions step debug logging is switched on.
pub fn step_debug_enabled() -> bool {
    std::env::var("ACTIONS_STEP_DEBUG").is_ok_and(|v| v.eq_ignore_ascii_case("true"))
}

/// Install the global subscriber writing to stderr.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init(settings: &LogSettings) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(settings.filter())
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {e}"))?;

    if let Some(rejected) = &settings.rejected_level {
        warn!("Unknown log level '{}', using info", rejected);
    }
    Ok(())
}
