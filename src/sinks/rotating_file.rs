//! Size-bounded rotating file destination
//!
//! Writes to `path` until the next line would make it reach `max_bytes`,
//! then shifts `path.N-1 -> path.N`, …, `path -> path.1` and starts a fresh
//! file. At most `max_files` backups are kept.

use super::file::{open_log_file, Encoding, FileMode};
use crate::core::{Destination, ObserveError, Record, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Default number of backups kept
pub const DEFAULT_MAX_FILES: usize = 10;

/// Default size threshold in bytes
pub const DEFAULT_MAX_BYTES: u64 = 1_000_000;

pub struct RotatingFileDestination {
    base_path: PathBuf,
    mode: FileMode,
    max_files: usize,
    max_bytes: u64,
    encoding: std::result::Result<Encoding, String>,
    writer: Option<BufWriter<File>>,
    current_size: u64,
}

impl RotatingFileDestination {
    /// Rotation is disabled when `max_files` or `max_bytes` is zero. Any
    /// size bound forces append, so `mode` only applies when `max_bytes` is
    /// zero.
    pub fn new(
        path: impl Into<PathBuf>,
        mode: FileMode,
        max_files: usize,
        max_bytes: u64,
        encoding: Option<&str>,
    ) -> Self {
        Self {
            base_path: path.into(),
            mode: if max_bytes > 0 { FileMode::Append } else { mode },
            max_files,
            max_bytes,
            encoding: Encoding::lookup(encoding),
            writer: None,
            current_size: 0,
        }
    }

    fn rotates(&self) -> bool {
        self.max_files > 0 && self.max_bytes > 0
    }

    fn should_rotate(&self, incoming: u64) -> bool {
        self.rotates() && self.current_size > 0 && self.current_size + incoming >= self.max_bytes
    }

    fn open(&mut self) -> Result<()> {
        let file = open_log_file(&self.base_path, self.mode)?;
        let metadata = file.metadata().map_err(|e| {
            ObserveError::io_operation(
                "reading log file metadata",
                format!("cannot stat '{}'", self.base_path.display()),
                e,
            )
        })?;
        self.current_size = metadata.len();
        self.writer = Some(BufWriter::new(file));
        Ok(())
    }

    /// Perform log rotation
    fn rotate(&mut self) -> Result<()> {
        // Explicitly drop writer to release file handle before renaming
        if let Some(mut writer) = self.writer.take() {
            writer.flush().map_err(|e| {
                ObserveError::io_operation(
                    "rotating log file",
                    format!("failed to flush '{}'", self.base_path.display()),
                    e,
                )
            })?;
        }

        let oldest = self.backup_path(self.max_files);
        if oldest.exists() {
            fs::remove_file(&oldest).map_err(|e| {
                ObserveError::io_operation(
                    "rotating log file",
                    format!("failed to remove oldest backup '{}'", oldest.display()),
                    e,
                )
            })?;
        }

        for i in (1..self.max_files).rev() {
            let old_path = self.backup_path(i);
            let new_path = self.backup_path(i + 1);
            if old_path.exists() {
                fs::rename(&old_path, &new_path).map_err(|e| {
                    ObserveError::io_operation(
                        "rotating log file",
                        format!("failed to move '{}'", old_path.display()),
                        e,
                    )
                })?;
            }
        }

        if self.base_path.exists() {
            let first = self.backup_path(1);
            fs::rename(&self.base_path, &first).map_err(|e| {
                ObserveError::io_operation(
                    "rotating log file",
                    format!("failed to move '{}'", self.base_path.display()),
                    e,
                )
            })?;
        }

        self.open()
    }

    /// Get backup file path for given index
    fn backup_path(&self, index: usize) -> PathBuf {
        let mut path = self.base_path.clone();
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("observe.log");
        path.set_file_name(format!("{}.{}", filename, index));
        path
    }

    /// Bytes written to the current file
    #[must_use]
    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.base_path
    }

    #[must_use]
    pub fn max_files(&self) -> usize {
        self.max_files
    }

    #[must_use]
    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }
}

impl Destination for RotatingFileDestination {
    fn write(&mut self, _record: &Record, line: &str) -> Result<()> {
        let encoding = self.encoding.clone().map_err(|name| {
            ObserveError::unknown_encoding(name, self.base_path.display().to_string())
        })?;
        let bytes = encoding.encode_line(line)?;

        if self.writer.is_none() {
            self.open()?;
        }
        if self.should_rotate(bytes.len() as u64) {
            self.rotate()?;
        }

        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| ObserveError::other("Rotating file writer not initialized"))?;
        writer.write_all(&bytes)?;
        writer.flush()?;
        self.current_size += bytes.len() as u64;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "rotating-file"
    }
}

impl Drop for RotatingFileDestination {
    fn drop(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Level;
    use tempfile::tempdir;

    fn write_lines(dest: &mut RotatingFileDestination, count: usize) {
        for i in 0..count {
            let line = format!("line {:04}", i);
            let record = Record::new(Level::INFO, "global", &line);
            dest.write(&record, &line).unwrap();
        }
    }

    #[test]
    fn test_size_bound_without_backups_appends() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        fs::write(&path, "old\n").unwrap();

        let mut dest = RotatingFileDestination::new(&path, FileMode::Truncate, 0, 10, None);
        write_lines(&mut dest, 2);

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "old\nline 0000\nline 0001\n"
        );
        assert!(!dir.path().join("app.log.1").exists());
    }

    #[test]
    fn test_rotation_by_size() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        // each line is 10 bytes including the newline
        let mut dest = RotatingFileDestination::new(&path, FileMode::Append, 3, 31, None);

        write_lines(&mut dest, 3);
        assert!(!dir.path().join("app.log.1").exists());

        write_lines(&mut dest, 1);
        assert!(dir.path().join("app.log.1").exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), "line 0000\n");
        assert_eq!(dest.current_size(), 10);
    }

    #[test]
    fn test_keeps_at_most_max_files_backups() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let mut dest = RotatingFileDestination::new(&path, FileMode::Append, 2, 10, None);

        write_lines(&mut dest, 6);

        assert!(path.exists());
        assert!(dir.path().join("app.log.1").exists());
        assert!(dir.path().join("app.log.2").exists());
        assert!(!dir.path().join("app.log.3").exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), "line 0005\n");
        assert_eq!(
            fs::read_to_string(dir.path().join("app.log.2")).unwrap(),
            "line 0003\n"
        );
    }

    #[test]
    fn test_zero_limits_disable_rotation() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let mut dest = RotatingFileDestination::new(&path, FileMode::Append, 0, 10, None);

        write_lines(&mut dest, 5);
        assert!(!dir.path().join("app.log.1").exists());
        assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 5);
    }

    #[test]
    fn test_existing_file_size_counts() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        fs::write(&path, "0123456789012345678\n").unwrap();
        let mut dest = RotatingFileDestination::new(&path, FileMode::Truncate, 5, 25, None);

        write_lines(&mut dest, 1);
        assert_eq!(
            fs::read_to_string(dir.path().join("app.log.1")).unwrap(),
            "0123456789012345678\n"
        );
    }
}
