//! Sinks, formatting and file rotation

mod traits;
mod console;
mod file_sink;
mod sink_set;
pub mod format;
pub mod rotation;
pub mod source;

pub use traits::{Sink, SharedSink};
pub use console::ConsoleSink;
pub use file_sink::FileSink;
pub use sink_set::{SinkSet, ALL_INFO_FILE, ALL_PP_FILE, ALL_WARNING_FILE};
pub use format::{CallSite, ConsoleFormat, Formatter, Record};
pub use rotation::{RotatingFile, RotationPolicy, DEFAULT_BACKUP_COUNT, DEFAULT_MAX_BYTES};
