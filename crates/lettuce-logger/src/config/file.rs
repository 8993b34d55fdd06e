//! File-based logger configuration (YAML)
//!
//! Read from `<config-dir>/lettuce_logger/config.yaml` unless
//! `LETTUCE_LOGGER_CONFIG` points elsewhere.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::env::{self, CONFIG_PATH_VAR};
use crate::error::{LogError, LogResult};
use crate::level::Severity;
use crate::logger::{Logger, LoggerBuilder, LoggerOptions};
use crate::logging::{ConsoleFormat, RotationPolicy};
use crate::storage::{Project, FACILITY_NAME};

/// Settings for the implicit default logger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Logger name; also the per-logger file stem
    pub name: String,
    /// Project name under the temp facility directory, or null
    pub project: serde_yaml::Value,
    /// Explicit log directory; wins over `project`
    pub log_dir: Option<PathBuf>,
    /// Attach the `all_pp.log` aggregate file
    pub pretty_file: bool,
    pub console_format: ConsoleFormat,
    /// Initial logger minimum (`debug`, `pp`, `info`, ...)
    pub level: Option<String>,
    /// `true` shows pretty output, `false` hides it, unset leaves the initial state
    pub show_pretty: Option<bool>,
    #[serde(flatten)]
    pub rotation: RotationPolicy,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            name: FACILITY_NAME.to_string(),
            project: serde_yaml::Value::Null,
            log_dir: None,
            pretty_file: true,
            console_format: ConsoleFormat::default(),
            level: None,
            show_pretty: None,
            rotation: RotationPolicy::default(),
        }
    }
}

impl LoggerConfig {
    /// The user-level config path
    pub fn default_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".config"));
        config_dir.join(FACILITY_NAME).join("config.yaml")
    }

    /// Parse a YAML document; an empty document yields the defaults
    pub fn from_yaml(content: &str) -> LogResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
            .map_err(|e| LogError::Config(format!("Failed to parse YAML: {}", e)))
    }

    /// Load from `path`; a missing file yields the defaults
    pub fn load_file(path: impl AsRef<Path>) -> LogResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|e| LogError::io(path, e))?;
        Self::from_yaml(&content)
    }

    /// Load the config file, then apply environment overrides
    pub fn load() -> LogResult<Self> {
        let path = std::env::var_os(CONFIG_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(Self::default_path);
        let mut config = Self::load_file(path)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Override fields from variables found through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        env::apply(self, lookup);
    }

    /// The project this config writes into
    pub fn project(&self) -> LogResult<Project> {
        match &self.log_dir {
            Some(dir) => Ok(Project::Path(dir.clone())),
            None => Project::try_from(&self.project),
        }
    }

    /// The initial logger minimum, if configured
    pub fn level(&self) -> LogResult<Option<Severity>> {
        self.level.as_deref().map(str::parse).transpose()
    }

    pub fn options(&self) -> LoggerOptions {
        LoggerOptions::default()
            .with_pretty_aggregate_file(self.pretty_file)
            .with_console_format(self.console_format)
            .with_rotation(self.rotation)
    }

    /// A builder carrying every setting except `show_pretty`
    pub fn builder(&self) -> LogResult<LoggerBuilder> {
        let mut builder = Logger::builder(self.name.clone())
            .project(self.project()?)
            .options(self.options());
        if let Some(level) = self.level()? {
            builder = builder.level(level);
        }
        Ok(builder)
    }

    /// Build a logger and apply the pretty toggle
    pub fn build(&self) -> LogResult<Logger> {
        let logger = self.builder()?.build()?;
        match self.show_pretty {
            Some(true) => logger.show_pretty(),
            Some(false) => logger.hide_pretty(),
            None => {}
        }
        Ok(logger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::read_log;
    use serial_test::serial;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = LoggerConfig::default();
        assert_eq!(config.name, "lettuce_logger");
        assert!(config.pretty_file);
        assert_eq!(config.rotation, RotationPolicy::default());
        assert!(matches!(config.project().unwrap(), Project::Default));
        assert_eq!(config.level().unwrap(), None);
    }

    #[test]
    fn test_parse_yaml() {
        let config = LoggerConfig::from_yaml(
            r#"
name: worker
project: batch
pretty_file: false
console_format: terse
level: pp
show_pretty: false
max_bytes: 2048
backup_count: 1
"#,
        )
        .unwrap();

        assert_eq!(config.name, "worker");
        assert!(matches!(config.project().unwrap(), Project::Name(ref n) if n == "batch"));
        assert_eq!(config.console_format, ConsoleFormat::Terse);
        assert_eq!(config.level().unwrap(), Some(Severity::Pretty));
        assert_eq!(config.show_pretty, Some(false));
        assert_eq!(config.rotation, RotationPolicy::new(2048, 1));

        let options = config.options();
        assert!(!options.pretty_aggregate_file);
        assert_eq!(options.console_format, ConsoleFormat::Terse);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = LoggerConfig::from_yaml("name: partial\n").unwrap();
        assert_eq!(config.name, "partial");
        assert_eq!(config.rotation, RotationPolicy::default());
        assert!(config.pretty_file);

        assert_eq!(LoggerConfig::from_yaml("").unwrap(), LoggerConfig::default());
    }

    #[test]
    fn test_bad_yaml() {
        let err = LoggerConfig::from_yaml("max_bytes: [1, 2").unwrap_err();
        assert!(matches!(err, LogError::Config(_)));

        let err = LoggerConfig::from_yaml("console_format: fancy\n").unwrap_err();
        assert!(matches!(err, LogError::Config(_)));
    }

    #[test]
    fn test_project_must_be_string_or_null() {
        let config = LoggerConfig::from_yaml("project: 42\n").unwrap();
        assert!(matches!(config.project(), Err(LogError::InvalidArgument(_))));
    }

    #[test]
    fn test_log_dir_wins_over_project() {
        let config = LoggerConfig::from_yaml("project: batch\nlog_dir: /var/tmp/app\n").unwrap();
        assert!(matches!(
            config.project().unwrap(),
            Project::Path(ref p) if p == Path::new("/var/tmp/app")
        ));
    }

    #[test]
    fn test_bad_level() {
        let config = LoggerConfig::from_yaml("level: loud\n").unwrap();
        assert!(config.level().is_err());
        assert!(config.builder().is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let config = LoggerConfig::load_file(dir.path().join("absent.yaml")).unwrap();
        assert_eq!(config, LoggerConfig::default());
    }

    #[test]
    fn test_build_from_config() {
        let dir = tempdir().unwrap();
        let mut config = LoggerConfig::from_yaml("name: cfg\nshow_pretty: false\npretty_file: false\n").unwrap();
        config.log_dir = Some(dir.path().to_path_buf());

        let logger = config.build().unwrap();
        assert_eq!(logger.name(), "cfg");
        assert_eq!(logger.level(), Severity::Info);
        assert!(!logger.is_pretty_visible());
        assert_eq!(logger.sinks().len(), 4);

        logger.info("configured");
        logger.flush().unwrap();
        assert!(read_log(dir.path(), "cfg.log").contains("INFO: configured"));
        assert!(!dir.path().join("all_pp.log").exists());
    }

    #[test]
    #[serial]
    fn test_load_reads_config_var_and_env_overrides() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "name: from_file\nlevel: info\nbackup_count: 7\n").unwrap();

        std::env::set_var(CONFIG_PATH_VAR, &path);
        std::env::set_var("LETTUCE_LOGGER_NAME", "from_env");
        let loaded = LoggerConfig::load();
        std::env::remove_var(CONFIG_PATH_VAR);
        std::env::remove_var("LETTUCE_LOGGER_NAME");

        let config = loaded.unwrap();
        assert_eq!(config.name, "from_env");
        assert_eq!(config.level.as_deref(), Some("info"));
        assert_eq!(config.rotation.backup_count, 7);
    }
}
