//! Configuration for the implicit default logger
//!
//! Sources, lowest precedence first:
//! - built-in defaults
//! - the YAML file (`LoggerConfig::default_path` or `LETTUCE_LOGGER_CONFIG`)
//! - `LETTUCE_LOGGER_*` environment variables

mod env;
mod file;

pub use env::{CONFIG_PATH_VAR, DIR_VAR, LEVEL_VAR, NAME_VAR, PROJECT_VAR};
pub use file::LoggerConfig;
