//! Process-wide default logger
//!
//! The slot is filled lazily on first access from [`LoggerConfig::load`].
//! Callers clone the `Arc` out of the slot, so a logger swapped out while a
//! record is in flight finishes writing through the old instance.

use std::path::PathBuf;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::config::LoggerConfig;
use crate::error::{LogError, LogResult};
use crate::logger::{Logger, LoggerOptions, SharedLogger};
use crate::storage::Project;

static DEFAULT_LOGGER: Lazy<RwLock<Option<SharedLogger>>> =
    Lazy::new(|| RwLock::new(init_default()));

/// Build the implicit default logger, falling back to built-in defaults
fn init_default() -> Option<SharedLogger> {
    let config = LoggerConfig::load().unwrap_or_else(|err| {
        eprintln!("[lettuce_logger] {}; using defaults", err);
        LoggerConfig::default()
    });

    let built = config.build().or_else(|err| {
        eprintln!("[lettuce_logger] cannot build configured logger: {}; using defaults", err);
        LoggerConfig::default().build()
    });

    match built {
        Ok(logger) => Some(Arc::new(logger)),
        Err(err) => {
            eprintln!("[lettuce_logger] no default logger: {}", err);
            None
        }
    }
}

/// Create a logger, install it as the default and return it
///
/// A new logger is built on every call, even for a name seen before.
pub fn get_logger(name: impl Into<String>, project: impl Into<Project>) -> LogResult<SharedLogger> {
    get_logger_with(name, project, LoggerOptions::default())
}

/// Like [`get_logger`] with explicit construction options
pub fn get_logger_with(
    name: impl Into<String>,
    project: impl Into<Project>,
    options: LoggerOptions,
) -> LogResult<SharedLogger> {
    let logger = Arc::new(
        Logger::builder(name)
            .project(project)
            .options(options)
            .build()?,
    );
    set_default_logger(Arc::clone(&logger));
    Ok(logger)
}

/// Install `logger` as the default, returning the previous one
pub fn set_default_logger(logger: SharedLogger) -> Option<SharedLogger> {
    DEFAULT_LOGGER.write().replace(logger)
}

/// Remove the default logger (mainly for testing)
pub fn take_default_logger() -> Option<SharedLogger> {
    DEFAULT_LOGGER.write().take()
}

/// The current default logger
pub fn default_logger() -> LogResult<SharedLogger> {
    DEFAULT_LOGGER.read().clone().ok_or(LogError::Uninitialized)
}

/// Show pretty output on the default logger's console
pub fn show_pretty() -> LogResult<()> {
    default_logger()?.show_pretty();
    Ok(())
}

/// Hide pretty output from the default logger's console
pub fn hide_pretty() -> LogResult<()> {
    default_logger()?.hide_pretty();
    Ok(())
}

/// Directory of the default logger
pub fn get_log_dir() -> LogResult<PathBuf> {
    Ok(default_logger()?.log_dir().to_path_buf())
}
