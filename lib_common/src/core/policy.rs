//! # Run Policies
//!
//! Immutable per-run settings: how many ticks to run, which tick payloads are
//! echoed to the console and whether payloads are journaled. All parsing from
//! raw configuration values lives here so that invalid settings are rejected
//! before the engine starts.

use std::fmt;
use std::num::NonZeroU64;
use std::path::PathBuf;
use std::str::FromStr;

use super::error::ConfigError;

/// Journal destination used when logging is enabled without an explicit path.
pub const DEFAULT_LOG_FILE: &str = "app_logs.jsonl";

/// Governs whether the loop runs a fixed number of ticks or indefinitely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecurrenceSpec {
    /// Stop after exactly this many ticks.
    Fixed(NonZeroU64),
    /// Run until interrupted.
    Infinite,
}

impl RecurrenceSpec {
    /// Fixed recurrence. A zero count is rejected.
    pub fn fixed(count: u64) -> Result<Self, ConfigError> {
        NonZeroU64::new(count)
            .map(Self::Fixed)
            .ok_or(ConfigError::MissingCount)
    }

    /// Parses `mode` (`fixed` | `infinite`, case-insensitive) together with the
    /// optional count. The count is required for `fixed` and ignored otherwise.
    pub fn parse(mode: &str, count: Option<u64>) -> Result<Self, ConfigError> {
        match mode.trim().to_ascii_lowercase().as_str() {
            "fixed" => Self::fixed(count.ok_or(ConfigError::MissingCount)?),
            "infinite" => Ok(Self::Infinite),
            _ => Err(ConfigError::UnknownRecurrenceMode(mode.to_string())),
        }
    }

    /// Tick budget, `None` when infinite.
    pub fn count(&self) -> Option<u64> {
        match self {
            Self::Fixed(n) => Some(n.get()),
            Self::Infinite => None,
        }
    }

    /// Whether the run stops on its own once `completed` ticks have run.
    pub fn is_exhausted(&self, completed: u64) -> bool {
        matches!(self, Self::Fixed(n) if completed >= n.get())
    }
}

impl fmt::Display for RecurrenceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(n) => write!(f, "fixed({n})"),
            Self::Infinite => write!(f, "infinite"),
        }
    }
}

/// Decides, per 1-based tick index, whether the payload is echoed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrintPolicy {
    /// Never echo.
    #[default]
    None,
    /// Echo tick 1 only.
    First,
    /// Echo exactly one tick, the n-th. Not every n-th tick.
    Nth(NonZeroU64),
    /// Echo every tick.
    All,
}

impl PrintPolicy {
    /// `Nth` with `n` clamped to at least 1.
    pub fn nth(n: u64) -> Self {
        Self::Nth(NonZeroU64::new(n).unwrap_or(NonZeroU64::MIN))
    }

    /// Parses a print mode name. `n` is only consulted for `nth` and defaults
    /// to 1 when absent.
    pub fn parse(mode: &str, n: Option<u64>) -> Result<Self, ConfigError> {
        match mode.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "first" => Ok(Self::First),
            "nth" => Ok(Self::nth(n.unwrap_or(1))),
            "all" => Ok(Self::All),
            _ => Err(ConfigError::UnknownPrintMode(mode.to_string())),
        }
    }

    /// Pure decision for one tick; holds no state across ticks.
    pub fn should_print(&self, tick: u64) -> bool {
        match self {
            Self::None => false,
            Self::All => true,
            Self::First => tick == 1,
            Self::Nth(n) => tick == n.get(),
        }
    }
}

impl FromStr for PrintPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, None)
    }
}

impl fmt::Display for PrintPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::First => write!(f, "first"),
            Self::Nth(n) => write!(f, "nth({n})"),
            Self::All => write!(f, "all"),
        }
    }
}

/// Whether every payload is appended to a newline-delimited journal file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogPolicy {
    /// Journal every tick when true.
    pub enabled: bool,
    /// Destination file; parent directories are created on first write.
    pub destination: PathBuf,
}

impl LogPolicy {
    /// Logging switched off.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            destination: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }

    /// Logging to `destination`.
    pub fn to_file(destination: impl Into<PathBuf>) -> Self {
        Self {
            enabled: true,
            destination: destination.into(),
        }
    }

    /// Builds the policy from the raw `log_enabled` / `log_file` pair.
    pub fn from_settings(enabled: bool, log_file: Option<PathBuf>) -> Self {
        Self {
            enabled,
            destination: log_file.unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
        }
    }
}

impl Default for LogPolicy {
    fn default() -> Self {
        Self::disabled()
    }
}
