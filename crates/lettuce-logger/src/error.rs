//! Error types

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building or driving a logger
#[derive(Error, Debug)]
pub enum LogError {
    /// A project identifier or configuration value has an unsupported shape
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No default logger has been installed
    #[error("No default logger is installed")]
    Uninitialized,

    /// Filesystem error while preparing a log directory or opening a file
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A sink failed to write or rotate a record
    #[error("Sink {sink} failed: {source}")]
    Sink {
        sink: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed
    #[error("Configuration error: {0}")]
    Config(String),
}

impl LogError {
    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create an IO error tied to a path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a sink failure
    pub fn sink(sink: impl Into<String>, source: std::io::Error) -> Self {
        Self::Sink {
            sink: sink.into(),
            source,
        }
    }
}

pub type LogResult<T> = Result<T, LogError>;
