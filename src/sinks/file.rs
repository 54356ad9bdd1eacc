//! File destination implementation

use crate::core::{Destination, ObserveError, Record, Result};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// How a file is opened the first time it is written
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FileMode {
    /// `a`: keep existing content
    #[default]
    Append,
    /// `w`: discard existing content
    Truncate,
}

impl FromStr for FileMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "a" => Ok(FileMode::Append),
            "w" => Ok(FileMode::Truncate),
            _ => Err(format!("Invalid file mode: '{}'", s)),
        }
    }
}

/// Text encodings understood by file destinations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Encoding {
    Utf8,
    Ascii,
    Latin1,
}

impl Encoding {
    /// `None` means UTF-8
    pub(crate) fn lookup(name: Option<&str>) -> std::result::Result<Self, String> {
        let Some(name) = name else {
            return Ok(Encoding::Utf8);
        };
        match name.to_ascii_lowercase().replace('_', "-").as_str() {
            "utf-8" | "utf8" => Ok(Encoding::Utf8),
            "ascii" | "us-ascii" => Ok(Encoding::Ascii),
            "latin-1" | "latin1" | "iso-8859-1" => Ok(Encoding::Latin1),
            _ => Err(name.to_string()),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Encoding::Utf8 => "utf-8",
            Encoding::Ascii => "ascii",
            Encoding::Latin1 => "latin-1",
        }
    }

    /// Encode `line` plus a newline; fails on the first unrepresentable char
    pub(crate) fn encode_line(&self, line: &str) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(line.len() + 1);
        match self {
            Encoding::Utf8 => bytes.extend_from_slice(line.as_bytes()),
            Encoding::Ascii | Encoding::Latin1 => {
                let max = if *self == Encoding::Ascii { 0x7F } else { 0xFF };
                for c in line.chars() {
                    let code = u32::from(c);
                    if code > max {
                        return Err(ObserveError::encode(self.label(), c));
                    }
                    bytes.push(code as u8);
                }
            }
        }
        bytes.push(b'\n');
        Ok(bytes)
    }
}

/// Open `path` for writing according to `mode`
pub(crate) fn open_log_file(path: &Path, mode: FileMode) -> Result<File> {
    let mut options = OpenOptions::new();
    options.create(true);
    match mode {
        FileMode::Append => options.append(true),
        FileMode::Truncate => options.write(true).truncate(true),
    };
    options.open(path).map_err(|e| {
        ObserveError::io_operation(
            "opening log file",
            format!("cannot open '{}'", path.display()),
            e,
        )
    })
}

pub struct FileDestination {
    path: PathBuf,
    mode: FileMode,
    encoding: std::result::Result<Encoding, String>,
    writer: Option<BufWriter<File>>,
}

impl FileDestination {
    /// Nothing is opened until the first write.
    pub fn new(path: impl Into<PathBuf>, mode: FileMode, encoding: Option<&str>) -> Self {
        Self {
            path: path.into(),
            mode,
            encoding: Encoding::lookup(encoding),
            writer: None,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn mode(&self) -> FileMode {
        self.mode
    }
}

impl Destination for FileDestination {
    fn write(&mut self, _record: &Record, line: &str) -> Result<()> {
        let encoding = self.encoding.clone().map_err(|name| {
            ObserveError::unknown_encoding(name, self.path.display().to_string())
        })?;
        let bytes = encoding.encode_line(line)?;

        if self.writer.is_none() {
            let file = open_log_file(&self.path, self.mode)?;
            self.writer = Some(BufWriter::new(file));
        }
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| ObserveError::other("File writer not initialized"))?;

        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileDestination {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Level;
    use std::fs;
    use tempfile::tempdir;

    fn record(message: &str) -> Record {
        Record::new(Level::INFO, "global", message)
    }

    #[test]
    fn test_file_is_created_lazily() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lazy.log");
        let mut file = FileDestination::new(&path, FileMode::Append, None);
        assert!(!path.exists());

        file.write(&record("first"), "first").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "first\n");
    }

    #[test]
    fn test_append_and_truncate_modes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("modes.log");
        fs::write(&path, "old\n").unwrap();

        let mut append = FileDestination::new(&path, FileMode::Append, None);
        append.write(&record("new"), "new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "old\nnew\n");

        let mut truncate = FileDestination::new(&path, FileMode::Truncate, None);
        truncate.write(&record("fresh"), "fresh").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "fresh\n");
    }

    #[test]
    fn test_unwritable_path_fails_on_first_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("app.log");
        let mut file = FileDestination::new(&path, FileMode::Append, None);
        let err = file.write(&record("x"), "x").unwrap_err();
        assert!(matches!(err, ObserveError::IoOperation { .. }));
    }

    #[test]
    fn test_encodings() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("latin.log");
        let mut latin = FileDestination::new(&path, FileMode::Append, Some("latin-1"));
        latin.write(&record("café"), "café").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"caf\xe9\n");

        let mut ascii = FileDestination::new(&path, FileMode::Append, Some("ascii"));
        let err = ascii.write(&record("café"), "café").unwrap_err();
        assert!(matches!(err, ObserveError::Encode { character: 'é', .. }));

        let mut unknown = FileDestination::new(&path, FileMode::Append, Some("ebcdic"));
        let err = unknown.write(&record("x"), "x").unwrap_err();
        assert!(matches!(err, ObserveError::UnknownEncoding { .. }));
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!("a".parse::<FileMode>().unwrap(), FileMode::Append);
        assert_eq!("w".parse::<FileMode>().unwrap(), FileMode::Truncate);
        assert!("x".parse::<FileMode>().is_err());
    }
}
