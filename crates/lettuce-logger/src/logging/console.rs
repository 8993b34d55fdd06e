//! Console sink implementation

use std::fmt;
use std::io::{self, Write};

use parking_lot::Mutex;

use super::format::{ConsoleFormat, Formatter, Record};
use super::traits::Sink;
use crate::error::{LogError, LogResult};
use crate::level::Threshold;

/// A sink that writes caller-oriented lines to stderr
///
/// Starts with no minimum severity. The writer can be swapped for any
/// `Write` implementation, which is how tests capture console output.
pub struct ConsoleSink {
    threshold: Threshold,
    formatter: Formatter,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl fmt::Debug for ConsoleSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleSink")
            .field("threshold", &self.threshold)
            .field("formatter", &self.formatter)
            .finish()
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new(ConsoleFormat::default())
    }
}

impl ConsoleSink {
    /// Create a console sink writing to stderr
    pub fn new(format: ConsoleFormat) -> Self {
        Self::with_writer(format, io::stderr())
    }

    /// Create a console sink writing to a custom destination
    pub fn with_writer(format: ConsoleFormat, writer: impl Write + Send + 'static) -> Self {
        Self {
            threshold: Threshold::new(None),
            formatter: Formatter::Console(format),
            writer: Mutex::new(Box::new(writer)),
        }
    }

    pub fn format(&self) -> Formatter {
        self.formatter
    }

    fn write_raw(&self, line: &str) -> io::Result<()> {
        let mut writer = self.writer.lock();
        writer.write_all(format!("{}\n", line).as_bytes())?;
        writer.flush()
    }
}

impl Sink for ConsoleSink {
    fn name(&self) -> &str {
        "console"
    }

    fn threshold(&self) -> &Threshold {
        &self.threshold
    }

    fn emit(&self, record: &Record) -> LogResult<()> {
        let line = self.formatter.format(record);
        self.write_raw(&line).map_err(|e| LogError::sink(self.name(), e))
    }

    fn flush(&self) -> LogResult<()> {
        self.writer.lock().flush().map_err(|e| LogError::sink(self.name(), e))
    }
}
