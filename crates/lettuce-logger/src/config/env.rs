//! Environment overrides for the logger configuration

use std::path::PathBuf;

use super::file::LoggerConfig;

/// Alternate config file path
pub const CONFIG_PATH_VAR: &str = "LETTUCE_LOGGER_CONFIG";
pub const NAME_VAR: &str = "LETTUCE_LOGGER_NAME";
pub const PROJECT_VAR: &str = "LETTUCE_LOGGER_PROJECT";
pub const DIR_VAR: &str = "LETTUCE_LOGGER_DIR";
pub const LEVEL_VAR: &str = "LETTUCE_LOGGER_LEVEL";

/// Apply every non-empty variable found through `lookup`
pub(crate) fn apply<F>(config: &mut LoggerConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(name) = get(NAME_VAR) {
        config.name = name;
    }
    if let Some(project) = get(PROJECT_VAR) {
        config.project = serde_yaml::Value::String(project);
    }
    if let Some(dir) = get(DIR_VAR) {
        config.log_dir = Some(PathBuf::from(dir));
    }
    if let Some(level) = get(LEVEL_VAR) {
        config.level = Some(level);
    }
}
