//! Log directory resolution
//!
//! Maps a logical project identifier to a directory on disk, creating it on
//! the way. Resolution is deterministic: the same identifier always yields the
//! same canonical path.

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::{LogError, LogResult};

/// Directory name used under the temp root
pub const FACILITY_NAME: &str = "lettuce_logger";

/// Where a logger keeps its files
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Project {
    /// The facility directory itself
    #[default]
    Default,
    /// An explicit directory, used as-is after `~` expansion
    Path(PathBuf),
    /// A named subdirectory of the facility directory
    Name(String),
}

impl From<&str> for Project {
    fn from(name: &str) -> Self {
        Project::Name(name.to_string())
    }
}

impl From<String> for Project {
    fn from(name: String) -> Self {
        Project::Name(name)
    }
}

impl From<PathBuf> for Project {
    fn from(path: PathBuf) -> Self {
        Project::Path(path)
    }
}

impl From<&Path> for Project {
    fn from(path: &Path) -> Self {
        Project::Path(path.to_path_buf())
    }
}

impl<T: Into<Project>> From<Option<T>> for Project {
    fn from(project: Option<T>) -> Self {
        project.map(Into::into).unwrap_or_default()
    }
}

impl TryFrom<&serde_yaml::Value> for Project {
    type Error = LogError;

    /// Interpret a loosely typed value: null selects the default directory and a
    /// string names a project. Anything else is rejected.
    fn try_from(value: &serde_yaml::Value) -> LogResult<Self> {
        match value {
            serde_yaml::Value::Null => Ok(Project::Default),
            serde_yaml::Value::String(name) => Ok(Project::Name(name.clone())),
            other => Err(LogError::invalid_argument(format!(
                "project must be a string or null, got {:?}",
                other
            ))),
        }
    }
}

/// Provides the directory a logger writes into
pub trait StorageProvider: Send + Sync {
    /// Resolve and create the directory for `project`
    fn resolve(&self, project: &Project) -> LogResult<PathBuf>;
}

/// Resolves projects under `<root>/<facility>`
///
/// The default root is the system temp directory.
#[derive(Debug, Clone)]
pub struct TempDirStorage {
    root: PathBuf,
    facility: String,
}

impl Default for TempDirStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl TempDirStorage {
    /// Storage rooted at the system temp directory
    pub fn new() -> Self {
        Self::with_root(std::env::temp_dir())
    }

    /// Storage rooted at a custom directory
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            facility: FACILITY_NAME.to_string(),
        }
    }

    /// The facility directory, before creation
    pub fn base_dir(&self) -> PathBuf {
        self.root.join(&self.facility)
    }

    fn target_dir(&self, project: &Project) -> LogResult<PathBuf> {
        match project {
            Project::Default => Ok(self.base_dir()),
            Project::Path(path) => absolute(&expand_home(path)),
            Project::Name(name) => {
                validate_name(name)?;
                Ok(self.base_dir().join(name))
            }
        }
    }
}

impl StorageProvider for TempDirStorage {
    fn resolve(&self, project: &Project) -> LogResult<PathBuf> {
        let dir = self.target_dir(project)?;
        fs::create_dir_all(&dir).map_err(|e| LogError::io(&dir, e))?;
        dir.canonicalize().map_err(|e| LogError::io(&dir, e))
    }
}

/// Resolve `project` with the default temp-dir storage
pub fn resolve(project: impl Into<Project>) -> LogResult<PathBuf> {
    TempDirStorage::new().resolve(&project.into())
}

fn validate_name(name: &str) -> LogResult<()> {
    if name.trim().is_empty() {
        return Err(LogError::invalid_argument("project name must not be empty"));
    }
    let escapes = Path::new(name).components().any(|c| {
        matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_))
    });
    if escapes {
        return Err(LogError::invalid_argument(format!(
            "project name must stay inside the log root: {}",
            name
        )));
    }
    Ok(())
}

fn expand_home(path: &Path) -> PathBuf {
    let mut components = path.components();
    match components.next() {
        Some(Component::Normal(first)) if first == "~" => match dirs::home_dir() {
            Some(home) => home.join(components.as_path()),
            None => path.to_path_buf(),
        },
        _ => path.to_path_buf(),
    }
}

fn absolute(path: &Path) -> LogResult<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(|e| LogError::io(path, e))?;
    Ok(cwd.join(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_project() {
        let root = tempdir().unwrap();
        let storage = TempDirStorage::with_root(root.path());

        let dir = storage.resolve(&Project::Default).unwrap();
        assert!(dir.is_dir());
        assert!(dir.ends_with(FACILITY_NAME));
        assert!(dir.starts_with(root.path().canonicalize().unwrap()));
    }

    #[test]
    fn test_named_project_is_idempotent() {
        let root = tempdir().unwrap();
        let storage = TempDirStorage::with_root(root.path());

        let first = storage.resolve(&"proj1".into()).unwrap();
        let second = storage.resolve(&"proj1".into()).unwrap();
        assert_eq!(first, second);
        assert!(first.is_dir());
        assert!(first.ends_with(Path::new(FACILITY_NAME).join("proj1")));
    }

    #[test]
    fn test_path_project_used_as_is() {
        let root = tempdir().unwrap();
        let target = root.path().join("custom").join("logs");
        let storage = TempDirStorage::with_root(root.path().join("unused"));

        let dir = storage.resolve(&Project::from(target.clone())).unwrap();
        assert_eq!(dir, target.canonicalize().unwrap());
        assert!(!root.path().join("unused").exists());
    }

    #[test]
    fn test_expand_home() {
        let expanded = expand_home(Path::new("~/logs"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expanded, home.join("logs"));
        }
        assert_eq!(expand_home(Path::new("/var/log")), PathBuf::from("/var/log"));
        assert_eq!(expand_home(Path::new("a/~")), PathBuf::from("a/~"));
    }

    #[test]
    fn test_invalid_names() {
        let root = tempdir().unwrap();
        let storage = TempDirStorage::with_root(root.path());

        for name in ["", "  ", "../escape", "/abs"] {
            let err = storage.resolve(&Project::from(name)).unwrap_err();
            assert!(matches!(err, LogError::InvalidArgument(_)), "{:?}", name);
        }
    }

    #[test]
    fn test_project_from_value() {
        assert_eq!(Project::try_from(&serde_yaml::Value::Null).unwrap(), Project::Default);
        assert_eq!(
            Project::try_from(&serde_yaml::Value::String("proj1".to_string())).unwrap(),
            Project::Name("proj1".to_string())
        );

        let number: serde_yaml::Value = serde_yaml::from_str("42").unwrap();
        let err = Project::try_from(&number).unwrap_err();
        assert!(matches!(err, LogError::InvalidArgument(_)));
    }

    #[test]
    fn test_project_from_option() {
        assert_eq!(Project::from(None::<&str>), Project::Default);
        assert_eq!(Project::from(Some("x")), Project::Name("x".to_string()));
    }
}
