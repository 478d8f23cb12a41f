//! Log file store
//!
//! Owns the directory that holds session log files. Appends open the file,
//! write one row, and close it again; no buffering is held across calls.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use super::{LogFileInfo, LogRow, StoreError};

/// Append-only store of named session log files under a root directory.
#[derive(Debug, Clone)]
pub struct LogStore {
    root: PathBuf,
}

impl LogStore {
    /// Create a store rooted at the given directory. The directory is
    /// created if absent.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// The store's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a file name to its path, rejecting names with path
    /// components.
    pub fn path_of(&self, name: &str) -> Result<PathBuf, StoreError> {
        validate_name(name)?;
        Ok(self.root.join(name))
    }

    /// Create an empty file, truncating any existing one of the same name.
    pub fn create_empty(&self, name: &str) -> Result<(), StoreError> {
        let path = self.path_of(name)?;
        File::create(path)?;
        Ok(())
    }

    /// Append one row to the named file, creating it first if absent.
    ///
    /// The file is opened and closed per call, so every row round-trips
    /// through the filesystem immediately.
    pub fn append(&self, name: &str, row: &LogRow) -> Result<(), StoreError> {
        let path = self.path_of(name)?;
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(row.to_line().as_bytes())?;
        Ok(())
    }

    /// Whether the named file exists.
    pub fn exists(&self, name: &str) -> bool {
        self.path_of(name).map(|p| p.is_file()).unwrap_or(false)
    }

    /// List stored files with their sizes, sorted by name.
    pub fn list(&self) -> Result<Vec<LogFileInfo>, StoreError> {
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            files.push(LogFileInfo {
                name,
                size: entry.metadata()?.len(),
            });
        }
        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }

    /// Delete the named file. Unconditional and irreversible; the
    /// active-session guard lives at the session boundary, which is the only
    /// path the control surface uses.
    pub fn delete(&self, name: &str) -> Result<(), StoreError> {
        let path = self.path_of(name)?;
        if !path.is_file() {
            return Err(StoreError::NotFound(name.to_owned()));
        }
        fs::remove_file(path)?;
        Ok(())
    }

    /// Generate a session file name from the given local time, e.g.
    /// `templog-20260824-153012.csv`.
    ///
    /// Two sessions started within the same second would collide, so a `-N`
    /// suffix is appended until the name is unused.
    pub fn unique_session_name(&self, started: DateTime<Local>) -> String {
        let base = started.format("templog-%Y%m%d-%H%M%S").to_string();
        let mut candidate = format!("{base}.csv");
        let mut n = 2;
        while self.exists(&candidate) {
            candidate = format!("{base}-{n}.csv");
            n += 1;
        }
        candidate
    }
}

fn validate_name(name: &str) -> Result<(), StoreError> {
    if name.is_empty() || name.contains('/') || name.contains('\\') || name.contains("..") {
        return Err(StoreError::InvalidName(name.to_owned()));
    }
    Ok(())
}
