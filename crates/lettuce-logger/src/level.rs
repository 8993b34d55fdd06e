//! Severity levels and thresholds

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};

use crate::error::{LogError, LogResult};

/// Log severities
///
/// `Pretty` sits between `Debug` and `Info` so that pretty-printed values can
/// be shown or hidden independently of ordinary informational output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Severity {
    Debug = 10,
    Pretty = 15,
    Info = 20,
    Warning = 30,
    Error = 40,
    Critical = 50,
}

impl Severity {
    /// All severities, least severe first
    pub const ALL: [Severity; 6] = [
        Severity::Debug,
        Severity::Pretty,
        Severity::Info,
        Severity::Warning,
        Severity::Error,
        Severity::Critical,
    ];

    /// Numeric value of this severity
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Look up a severity by its exact numeric value
    pub fn from_value(value: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.value() == value)
    }

    /// Name used in formatted records
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Pretty => "PP",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = LogError;

    fn from_str(s: &str) -> LogResult<Self> {
        let trimmed = s.trim();
        if let Ok(value) = trimmed.parse::<u8>() {
            return Self::from_value(value)
                .ok_or_else(|| LogError::invalid_argument(format!("unknown severity value: {}", value)));
        }
        match trimmed.to_lowercase().as_str() {
            "debug" => Ok(Severity::Debug),
            "pp" | "pretty" => Ok(Severity::Pretty),
            "info" => Ok(Severity::Info),
            "warning" | "warn" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            "critical" => Ok(Severity::Critical),
            _ => Err(LogError::invalid_argument(format!("unknown severity: {}", trimmed))),
        }
    }
}

const NO_MINIMUM: u8 = 0;

/// A minimum severity that can be read and replaced from any thread
///
/// `None` means "no minimum": every record passes.
#[derive(Debug)]
pub struct Threshold(AtomicU8);

impl Threshold {
    pub fn new(minimum: Option<Severity>) -> Self {
        Self(AtomicU8::new(Self::encode(minimum)))
    }

    /// Current minimum, `None` when unrestricted
    pub fn get(&self) -> Option<Severity> {
        Severity::from_value(self.0.load(Ordering::Acquire))
    }

    /// Replace the minimum
    pub fn set(&self, minimum: Option<Severity>) {
        self.0.store(Self::encode(minimum), Ordering::Release);
    }

    /// Whether a record at `severity` passes this threshold
    pub fn allows(&self, severity: Severity) -> bool {
        severity.value() >= self.0.load(Ordering::Acquire)
    }

    fn encode(minimum: Option<Severity>) -> u8 {
        minimum.map(Severity::value).unwrap_or(NO_MINIMUM)
    }
}
