//! Lettuce Logger
//!
//! Zero-setup multi-destination logging with a pretty-print facade.
//! Every logger fans each record out to the console and a set of size-rotated
//! files in its log directory:
//! - `<name>.log`: everything from DEBUG up
//! - `all_info.log` / `all_warning.log`: INFO and WARNING upward
//! - `all_pp.log`: the pretty-print (PP) level and up
//!
//! ```rust,no_run
//! use lettuce_logger::{get_logger, hide_pretty, pp, show_pretty};
//!
//! let total = pp(2 + 3);
//! hide_pretty()?;
//! pp("only in the files");
//! show_pretty()?;
//!
//! let logger = get_logger("mylog", "my-project")?;
//! logger.info(format!("total is {}", total));
//! # Ok::<(), lettuce_logger::LogError>(())
//! ```
//!
//! The default logger is built on first use from the YAML file at
//! `<config-dir>/lettuce_logger/config.yaml` and `LETTUCE_LOGGER_*`
//! environment variables; see [`LoggerConfig`].

pub mod config;
pub mod error;
pub mod level;
pub mod logging;
pub mod storage;
mod logger;
mod pp;
mod registry;

#[cfg(test)]
mod testing;

pub use config::LoggerConfig;
pub use error::{LogError, LogResult};
pub use level::Severity;
pub use logger::{Logger, LoggerBuilder, LoggerOptions, SharedLogger};
pub use logging::source::source_line;
pub use logging::{CallSite, ConsoleFormat, RotationPolicy};
pub use pp::{expression_label, pp, pp_with, render, FALLBACK_LABEL};
pub use registry::{
    default_logger, get_log_dir, get_logger, get_logger_with, hide_pretty, set_default_logger,
    show_pretty, take_default_logger,
};
pub use storage::{resolve, Project, StorageProvider, TempDirStorage};

#[doc(hidden)]
pub use pp::__private;
