//! Rotating file sink

use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use super::format::{Formatter, Record};
use super::rotation::{RotatingFile, RotationPolicy};
use super::traits::Sink;
use crate::error::{LogError, LogResult};
use crate::level::{Severity, Threshold};

/// A sink that appends full-format lines to a size-rotated file
///
/// The size check, rollover and write all happen under one lock, so a writer
/// never lands in a file that is being rotated.
#[derive(Debug)]
pub struct FileSink {
    name: String,
    path: PathBuf,
    threshold: Threshold,
    file: Mutex<RotatingFile>,
}

impl FileSink {
    /// Open `path` for appending; fails if the file cannot be opened
    pub fn open(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        minimum: Severity,
        policy: RotationPolicy,
    ) -> LogResult<Self> {
        let path = path.into();
        let file = RotatingFile::open(&path, policy).map_err(|e| LogError::io(&path, e))?;
        Ok(Self {
            name: name.into(),
            path,
            threshold: Threshold::new(Some(minimum)),
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn policy(&self) -> RotationPolicy {
        self.file.lock().policy()
    }
}

impl Sink for FileSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn threshold(&self) -> &Threshold {
        &self.threshold
    }

    fn emit(&self, record: &Record) -> LogResult<()> {
        let line = Formatter::Full.format(record);
        self.file
            .lock()
            .write_line(&line)
            .map_err(|e| LogError::sink(&self.name, e))
    }

    fn flush(&self) -> LogResult<()> {
        self.file.lock().flush().map_err(|e| LogError::sink(&self.name, e))
    }
}
