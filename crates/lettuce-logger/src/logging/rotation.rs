//! Size-capped append-mode files with numbered backups

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default size cap of a log file in bytes
pub const DEFAULT_MAX_BYTES: u64 = 500_000;

/// Default number of rotated backups kept per file
pub const DEFAULT_BACKUP_COUNT: u32 = 3;

/// When and how a file sink rolls over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationPolicy {
    /// Size cap in bytes; `0` disables rotation
    pub max_bytes: u64,
    /// Backups kept as `<file>.1` (newest) .. `<file>.N` (oldest)
    pub backup_count: u32,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
            backup_count: DEFAULT_BACKUP_COUNT,
        }
    }
}

impl RotationPolicy {
    pub fn new(max_bytes: u64, backup_count: u32) -> Self {
        Self { max_bytes, backup_count }
    }

    /// Whether appending `incoming` bytes to a file of `current` bytes must roll first
    pub fn should_rotate(&self, current: u64, incoming: u64) -> bool {
        self.max_bytes > 0 && current > 0 && current + incoming >= self.max_bytes
    }
}

/// Path of the `index`-th backup of `path`
pub fn backup_path(path: &Path, index: u32) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(format!(".{}", index));
    PathBuf::from(name)
}

/// An append-mode file that rotates itself according to a [`RotationPolicy`]
///
/// Not synchronized; callers serialize access.
#[derive(Debug)]
pub struct RotatingFile {
    path: PathBuf,
    policy: RotationPolicy,
    file: Option<File>,
    size: u64,
}

impl RotatingFile {
    /// Open (or create) `path` for appending
    pub fn open(path: impl Into<PathBuf>, policy: RotationPolicy) -> io::Result<Self> {
        let path = path.into();
        let file = open_append(&path)?;
        let size = file.metadata()?.len();
        Ok(Self {
            path,
            policy,
            file: Some(file),
            size,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn policy(&self) -> RotationPolicy {
        self.policy
    }

    /// Bytes in the active file
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Append one line, rolling the file first when it would reach the cap
    pub fn write_line(&mut self, line: &str) -> io::Result<()> {
        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');

        if self.policy.should_rotate(self.size, buf.len() as u64) {
            self.rotate()?;
        }

        if self.file.is_none() {
            // A previous rollover could not reopen the file
            let file = open_append(&self.path)?;
            self.size = file.metadata()?.len();
            self.file = Some(file);
        }
        if let Some(file) = self.file.as_mut() {
            file.write_all(buf.as_bytes())?;
            file.flush()?;
            self.size += buf.len() as u64;
        }
        Ok(())
    }

    /// Shift backups up by one, move the active file to `.1` and start afresh
    ///
    /// With no backups configured the active file is truncated instead.
    pub fn rotate(&mut self) -> io::Result<()> {
        if self.policy.backup_count == 0 {
            if let Some(file) = self.file.as_mut() {
                file.set_len(0)?;
            }
            self.size = 0;
            return Ok(());
        }

        // Close before renaming so rotation also works where open files are locked
        self.file = None;

        for index in (1..self.policy.backup_count).rev() {
            let src = backup_path(&self.path, index);
            if src.exists() {
                replace(&src, &backup_path(&self.path, index + 1))?;
            }
        }
        if self.path.exists() {
            replace(&self.path, &backup_path(&self.path, 1))?;
        }

        let file = open_append(&self.path)?;
        self.size = 0;
        self.file = Some(file);
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

fn replace(src: &Path, dst: &Path) -> io::Result<()> {
    if dst.exists() {
        fs::remove_file(dst)?;
    }
    fs::rename(src, dst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_should_rotate() {
        let policy = RotationPolicy::new(100, 2);
        assert!(!policy.should_rotate(0, 500));
        assert!(!policy.should_rotate(50, 49));
        assert!(policy.should_rotate(50, 50));

        let disabled = RotationPolicy::new(0, 2);
        assert!(!disabled.should_rotate(10_000, 10_000));
    }

    #[test]
    fn test_backup_path() {
        assert_eq!(
            backup_path(Path::new("/tmp/logs/app.log"), 2),
            PathBuf::from("/tmp/logs/app.log.2")
        );
    }

    #[test]
    fn test_appends_to_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        fs::write(&path, "earlier\n").unwrap();

        let mut file = RotatingFile::open(&path, RotationPolicy::default()).unwrap();
        assert_eq!(file.size(), 8);
        file.write_line("later").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "earlier\nlater\n");
    }

    #[test]
    fn test_rotation_keeps_bounded_backups() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let mut file = RotatingFile::open(&path, RotationPolicy::new(64, 2)).unwrap();

        let line = "x".repeat(39); // 40 bytes with newline
        for _ in 0..10 {
            file.write_line(&line).unwrap();
            assert!(file.size() < 64);
        }

        assert!(backup_path(&path, 1).exists());
        assert!(backup_path(&path, 2).exists());
        assert!(!backup_path(&path, 3).exists());
        assert_eq!(fs::read_to_string(&path).unwrap().len(), 40);
        assert_eq!(fs::read_to_string(backup_path(&path, 1)).unwrap().len(), 40);
    }

    #[test]
    fn test_backups_shift_newest_first() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let mut file = RotatingFile::open(&path, RotationPolicy::new(10, 3)).unwrap();

        for n in 0..4 {
            file.write_line(&format!("record-{}", n)).unwrap();
        }

        assert_eq!(fs::read_to_string(&path).unwrap(), "record-3\n");
        assert_eq!(fs::read_to_string(backup_path(&path, 1)).unwrap(), "record-2\n");
        assert_eq!(fs::read_to_string(backup_path(&path, 2)).unwrap(), "record-1\n");
        assert_eq!(fs::read_to_string(backup_path(&path, 3)).unwrap(), "record-0\n");
    }

    #[test]
    fn test_zero_backups_truncates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let mut file = RotatingFile::open(&path, RotationPolicy::new(10, 0)).unwrap();

        file.write_line("first-one").unwrap();
        file.write_line("second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second\n");
        assert!(!backup_path(&path, 1).exists());
    }

    #[test]
    fn test_oversized_record_still_written() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let mut file = RotatingFile::open(&path, RotationPolicy::new(16, 1)).unwrap();

        let big = "y".repeat(40);
        file.write_line(&big).unwrap();
        assert_eq!(file.size(), 41);
        assert!(!backup_path(&path, 1).exists());

        file.write_line("small").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "small\n");
        assert_eq!(fs::read_to_string(backup_path(&path, 1)).unwrap().len(), 41);
    }
}
