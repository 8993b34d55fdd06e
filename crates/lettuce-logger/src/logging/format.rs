//! Log records and line formatting

use std::borrow::Cow;
use std::panic::Location;
use std::path::Path;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::source;
use crate::level::Severity;

/// Timestamp layout of file records
pub const TIMESTAMP_FORMAT: &str = "%m-%d %H:%M:%S";

/// Placeholder shown instead of a notebook cell's synthetic file name
pub const CELL_PLACEHOLDER: &str = "ipy";

/// File name fragments that identify notebook cells
const CELL_MARKERS: &[&str] = &["ipython-input"];

/// Source location a record is attributed to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    pub file: &'static str,
    pub line: u32,
    /// Path of the enclosing function, when known
    pub function: Option<Cow<'static, str>>,
}

impl CallSite {
    pub fn new(file: &'static str, line: u32, function: Option<&'static str>) -> Self {
        Self {
            file,
            line,
            function: function.map(Cow::Borrowed),
        }
    }

    pub fn with_function(mut self, function: impl Into<Cow<'static, str>>) -> Self {
        self.function = Some(function.into());
        self
    }

    /// Attribute to a `#[track_caller]` location; the function is unknown
    pub fn from_location(location: &'static Location<'static>) -> Self {
        Self::new(location.file(), location.line(), None)
    }

    /// Attribute to a `#[track_caller]` location, recovering the enclosing
    /// function from the source file when it can be read
    pub fn from_caller(location: &'static Location<'static>) -> Self {
        Self::from_location(location).with_source_function()
    }

    /// Fill in a missing function name by scanning the source upward
    pub fn with_source_function(self) -> Self {
        if self.function.is_some() {
            return self;
        }
        match source::enclosing_function(self.file, self.line) {
            Some(function) => self.with_function(function),
            None => self,
        }
    }

    /// Base name of the source file
    pub fn file_name(&self) -> &'static str {
        Path::new(self.file)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(self.file)
    }

    /// Bare name of the enclosing function, skipping closure frames
    pub fn function_name(&self) -> &str {
        self.function
            .as_deref()
            .and_then(|path| path.rsplit("::").find(|segment| *segment != "{{closure}}"))
            .unwrap_or("?")
    }
}

/// A single log event
#[derive(Debug, Clone)]
pub struct Record {
    pub severity: Severity,
    pub timestamp: DateTime<Local>,
    pub message: String,
    pub call_site: CallSite,
}

impl Record {
    pub fn new(severity: Severity, message: impl Into<String>, call_site: CallSite) -> Self {
        Self {
            severity,
            timestamp: Local::now(),
            message: message.into(),
            call_site,
        }
    }
}

/// Console line layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleFormat {
    /// `<function>@<file>:<line>| <message>`
    #[default]
    Verbose,
    /// `<file>:<line>| <message>`
    Terse,
}

impl std::str::FromStr for ConsoleFormat {
    type Err = crate::error::LogError;

    fn from_str(s: &str) -> crate::error::LogResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "verbose" => Ok(ConsoleFormat::Verbose),
            "terse" => Ok(ConsoleFormat::Terse),
            other => Err(crate::error::LogError::invalid_argument(format!(
                "unknown console format: {}",
                other
            ))),
        }
    }
}

/// Renders records into single output lines (without the trailing newline)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Formatter {
    /// `<MM-DD HH:MM:SS>|<file>:<line>|<LEVEL>: <message>`
    Full,
    Console(ConsoleFormat),
}

impl Formatter {
    pub fn format(&self, record: &Record) -> String {
        let site = &record.call_site;
        match self {
            Formatter::Full => format!(
                "{}|{}:{}|{}: {}",
                record.timestamp.format(TIMESTAMP_FORMAT),
                site.file_name(),
                site.line,
                record.severity,
                record.message
            ),
            Formatter::Console(ConsoleFormat::Verbose) => format!(
                "{}@{}:{}| {}",
                site.function_name(),
                console_file_name(site),
                site.line,
                record.message
            ),
            Formatter::Console(ConsoleFormat::Terse) => format!(
                "{}:{}| {}",
                console_file_name(site),
                site.line,
                record.message
            ),
        }
    }
}

/// Whether a file name belongs to a notebook cell
pub fn is_notebook_cell(file: &str) -> bool {
    CELL_MARKERS.iter().any(|marker| file.contains(marker))
}

fn console_file_name(site: &CallSite) -> &'static str {
    let name = site.file_name();
    if is_notebook_cell(name) {
        CELL_PLACEHOLDER
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(site: CallSite) -> Record {
        Record {
            severity: Severity::Pretty,
            timestamp: Local.with_ymd_and_hms(2024, 3, 7, 9, 5, 2).unwrap(),
            message: "x = 1".to_string(),
            call_site: site,
        }
    }

    #[test]
    fn test_full_format() {
        let site = CallSite::new("src/bin/main.rs", 12, Some("app::main"));
        let line = Formatter::Full.format(&record(site));
        assert_eq!(line, "03-07 09:05:02|main.rs:12|PP: x = 1");
    }

    #[test]
    fn test_console_formats() {
        let site = CallSite::new("src/worker.rs", 40, Some("app::worker::run::{{closure}}"));
        assert_eq!(
            Formatter::Console(ConsoleFormat::Verbose).format(&record(site.clone())),
            "run@worker.rs:40| x = 1"
        );
        assert_eq!(
            Formatter::Console(ConsoleFormat::Terse).format(&record(site)),
            "worker.rs:40| x = 1"
        );
    }

    #[test]
    fn test_unknown_function() {
        let site = CallSite::new("lib.rs", 1, None);
        assert_eq!(
            Formatter::Console(ConsoleFormat::Verbose).format(&record(site)),
            "?@lib.rs:1| x = 1"
        );
    }

    #[test]
    fn test_function_recovered_later() {
        let site = CallSite::new("main.rs", 3, None).with_function(String::from("load"));
        assert_eq!(site.function_name(), "load");
    }

    #[test]
    fn test_from_caller_recovers_function() {
        let site = CallSite::from_caller(Location::caller());
        assert_eq!(site.function_name(), "test_from_caller_recovers_function");

        let site = CallSite::new("does/not/exist.rs", 4, None).with_source_function();
        assert_eq!(site.function_name(), "?");

        let site = CallSite::new(file!(), line!(), Some("kept::as_is")).with_source_function();
        assert_eq!(site.function_name(), "as_is");
    }

    #[test]
    fn test_notebook_cell_placeholder() {
        let site = CallSite::new("<ipython-input-3-abc>", 2, Some("cell"));
        assert_eq!(
            Formatter::Console(ConsoleFormat::Terse).format(&record(site.clone())),
            "ipy:2| x = 1"
        );
        // File records keep the raw name
        assert!(Formatter::Full.format(&record(site)).contains("<ipython-input-3-abc>:2"));
    }

    #[test]
    fn test_console_format_parse() {
        assert_eq!("Terse".parse::<ConsoleFormat>().unwrap(), ConsoleFormat::Terse);
        assert!("fancy".parse::<ConsoleFormat>().is_err());
    }
}
