//! Sink trait definition

use std::sync::Arc;

use super::format::Record;
use crate::error::LogResult;
use crate::level::{Severity, Threshold};

/// An output destination with its own minimum severity
///
/// Implementations:
/// - `ConsoleSink`: Writes to stderr (or any injected writer)
/// - `FileSink`: Writes to a size-rotated file
///
/// `emit` must write a record as one unit; concurrent callers never see
/// interleaved partial lines.
pub trait Sink: Send + Sync {
    /// Short identifier used when reporting failures
    fn name(&self) -> &str;

    /// This sink's own threshold
    fn threshold(&self) -> &Threshold;

    /// Format and write one record, ignoring the threshold
    fn emit(&self, record: &Record) -> LogResult<()>;

    /// Flush buffered output
    fn flush(&self) -> LogResult<()> {
        Ok(())
    }

    /// Whether a record at `severity` passes this sink's threshold
    fn accepts(&self, severity: Severity) -> bool {
        self.threshold().allows(severity)
    }
}

/// Type alias for an Arc-wrapped sink
pub type SharedSink = Arc<dyn Sink>;
