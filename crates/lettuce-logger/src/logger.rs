//! The multi-sink logger

use std::io::{self, Write};
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{LogError, LogResult};
use crate::level::{Severity, Threshold};
use crate::logging::{CallSite, ConsoleFormat, ConsoleSink, Record, RotationPolicy, Sink, SinkSet};
use crate::storage::{Project, StorageProvider, TempDirStorage};

/// Construction-time choices for a logger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoggerOptions {
    /// Attach the `all_pp.log` aggregate sink
    pub pretty_aggregate_file: bool,
    pub console_format: ConsoleFormat,
    pub rotation: RotationPolicy,
}

impl Default for LoggerOptions {
    fn default() -> Self {
        Self {
            pretty_aggregate_file: true,
            console_format: ConsoleFormat::Verbose,
            rotation: RotationPolicy::default(),
        }
    }
}

impl LoggerOptions {
    pub fn with_pretty_aggregate_file(mut self, enabled: bool) -> Self {
        self.pretty_aggregate_file = enabled;
        self
    }

    pub fn with_console_format(mut self, format: ConsoleFormat) -> Self {
        self.console_format = format;
        self
    }

    pub fn with_rotation(mut self, rotation: RotationPolicy) -> Self {
        self.rotation = rotation;
        self
    }
}

/// A named logger fanning records out to a console and several rotating files
///
/// Two gates decide where a record goes: the logger's own minimum severity,
/// then each sink's threshold. Pretty records only pass the second gate, so
/// [`Logger::hide_pretty`] silences them on the console while the file sinks
/// keep recording them.
///
/// # Example
///
/// ```no_run
/// use lettuce_logger::Logger;
///
/// let logger = Logger::new("worker", "my-project").unwrap();
/// logger.info("started");
/// logger.hide_pretty();
/// logger.pp("only in the files");
/// ```
#[derive(Debug)]
pub struct Logger {
    name: String,
    dir: PathBuf,
    level: Threshold,
    sinks: SinkSet,
}

/// Type alias for an Arc-wrapped logger
pub type SharedLogger = Arc<Logger>;

impl Logger {
    /// Create a logger writing under the directory resolved for `project`
    pub fn new(name: impl Into<String>, project: impl Into<Project>) -> LogResult<Self> {
        Self::builder(name).project(project).build()
    }

    pub fn builder(name: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Directory holding this logger's files
    pub fn log_dir(&self) -> &Path {
        &self.dir
    }

    pub fn sinks(&self) -> &SinkSet {
        &self.sinks
    }

    /// The logger's own minimum severity
    pub fn level(&self) -> Severity {
        self.level.get().unwrap_or(Severity::Debug)
    }

    pub fn set_level(&self, level: Severity) {
        self.level.set(Some(level));
    }

    pub fn is_enabled_for(&self, severity: Severity) -> bool {
        self.level.allows(severity)
    }

    /// Whether pretty records currently reach the console
    pub fn is_pretty_visible(&self) -> bool {
        self.is_enabled_for(Severity::Pretty) && self.sinks.console().accepts(Severity::Pretty)
    }

    /// Show pretty records on the console
    pub fn show_pretty(&self) {
        self.set_level(Severity::Pretty);
        self.sinks.console().threshold().set(Some(Severity::Pretty));
    }

    /// Hide pretty records from the console; file sinks still receive them
    pub fn hide_pretty(&self) {
        self.set_level(Severity::Info);
        self.sinks.console().threshold().set(Some(Severity::Info));
    }

    /// Log `message` at `severity`, attributed to the caller
    #[track_caller]
    pub fn log(&self, severity: Severity, message: impl Into<String>) {
        self.log_at(severity, message, CallSite::from_caller(Location::caller()));
    }

    /// Log `message` at `severity`, attributed to `call_site`
    pub fn log_at(&self, severity: Severity, message: impl Into<String>, call_site: CallSite) {
        if !self.is_enabled_for(severity) {
            return;
        }
        self.dispatch(&Record::new(severity, message, call_site));
    }

    /// Log a pretty record attributed to the caller
    #[track_caller]
    pub fn pp(&self, message: impl Into<String>) {
        self.pp_at(message, CallSite::from_caller(Location::caller()));
    }

    /// Log a pretty record attributed to `call_site`
    ///
    /// Skips the logger's own minimum; only sink thresholds apply.
    pub fn pp_at(&self, message: impl Into<String>, call_site: CallSite) {
        self.dispatch(&Record::new(Severity::Pretty, message, call_site));
    }

    #[track_caller]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(Severity::Debug, message);
    }

    #[track_caller]
    pub fn info(&self, message: impl Into<String>) {
        self.log(Severity::Info, message);
    }

    #[track_caller]
    pub fn warning(&self, message: impl Into<String>) {
        self.log(Severity::Warning, message);
    }

    #[track_caller]
    pub fn error(&self, message: impl Into<String>) {
        self.log(Severity::Error, message);
    }

    #[track_caller]
    pub fn critical(&self, message: impl Into<String>) {
        self.log(Severity::Critical, message);
    }

    /// Flush every sink, returning the first failure
    pub fn flush(&self) -> LogResult<()> {
        let mut result = Ok(());
        for sink in self.sinks.iter() {
            if let Err(err) = sink.flush() {
                if result.is_ok() {
                    result = Err(err);
                }
            }
        }
        result
    }

    fn dispatch(&self, record: &Record) {
        let mut failures = Vec::new();
        for sink in self.sinks.iter() {
            if !sink.accepts(record.severity) {
                continue;
            }
            if let Err(err) = sink.emit(record) {
                failures.push(err);
            }
        }
        for err in failures {
            self.report_failure(record, &err);
        }
    }

    /// Report a sink failure on the console, falling back to raw stderr
    fn report_failure(&self, record: &Record, err: &LogError) {
        let message = format!("{} ({} record dropped)", err, record.severity);
        let report = Record::new(Severity::Error, message, record.call_site.clone());
        if self.sinks.console().emit(&report).is_err() {
            let _ = writeln!(io::stderr(), "[{}] {}", self.name, report.message);
        }
    }
}

/// Builder for [`Logger`]
pub struct LoggerBuilder {
    name: String,
    project: Project,
    options: LoggerOptions,
    level: Severity,
    storage: Arc<dyn StorageProvider>,
    console_writer: Option<Box<dyn Write + Send>>,
}

impl LoggerBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            project: Project::Default,
            options: LoggerOptions::default(),
            level: Severity::Debug,
            storage: Arc::new(TempDirStorage::new()),
            console_writer: None,
        }
    }

    pub fn project(mut self, project: impl Into<Project>) -> Self {
        self.project = project.into();
        self
    }

    pub fn options(mut self, options: LoggerOptions) -> Self {
        self.options = options;
        self
    }

    /// Initial minimum severity of the logger
    pub fn level(mut self, level: Severity) -> Self {
        self.level = level;
        self
    }

    /// Resolve directories through a custom provider
    pub fn storage(mut self, storage: Arc<dyn StorageProvider>) -> Self {
        self.storage = storage;
        self
    }

    /// Send console output somewhere other than stderr
    pub fn console_writer(mut self, writer: impl Write + Send + 'static) -> Self {
        self.console_writer = Some(Box::new(writer));
        self
    }

    /// Resolve the directory, open every file sink and assemble the logger
    pub fn build(self) -> LogResult<Logger> {
        let dir = self.storage.resolve(&self.project)?;
        let console = match self.console_writer {
            Some(writer) => ConsoleSink::with_writer(self.options.console_format, writer),
            None => ConsoleSink::new(self.options.console_format),
        };
        let sinks = SinkSet::build(&self.name, &dir, &self.options, console)?;
        Ok(Logger {
            name: self.name,
            dir,
            level: Threshold::new(Some(self.level)),
            sinks,
        })
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! __function_path {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = type_name_of(f);
        name.strip_suffix("::f").unwrap_or(name)
    }};
}

/// The call site of the macro invocation, including the enclosing function
#[macro_export]
macro_rules! call_site {
    () => {
        $crate::CallSite::new(file!(), line!(), Some($crate::__function_path!()))
    };
}

/// Log with format arguments at an explicit severity
#[macro_export]
macro_rules! log_at_level {
    ($logger:expr, $severity:expr, $($arg:tt)*) => {{
        let logger = &$logger;
        let severity = $severity;
        if logger.is_enabled_for(severity) {
            logger.log_at(severity, format!($($arg)*), $crate::call_site!());
        }
    }};
}

#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)*) => {
        $crate::log_at_level!($logger, $crate::Severity::Debug, $($arg)*)
    };
}

#[macro_export]
macro_rules! log_pp {
    ($logger:expr, $($arg:tt)*) => {
        $logger.pp_at(format!($($arg)*), $crate::call_site!())
    };
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)*) => {
        $crate::log_at_level!($logger, $crate::Severity::Info, $($arg)*)
    };
}

#[macro_export]
macro_rules! log_warning {
    ($logger:expr, $($arg:tt)*) => {
        $crate::log_at_level!($logger, $crate::Severity::Warning, $($arg)*)
    };
}

#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)*) => {
        $crate::log_at_level!($logger, $crate::Severity::Error, $($arg)*)
    };
}

#[macro_export]
macro_rules! log_critical {
    ($logger:expr, $($arg:tt)*) => {
        $crate::log_at_level!($logger, $crate::Severity::Critical, $($arg)*)
    };
}
