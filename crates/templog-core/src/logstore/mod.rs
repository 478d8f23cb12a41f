//! Append-Only Log Storage
//!
//! One plain-text CSV file per recording session under a root directory,
//! one `HH:MM:SS,<value>` row per acquisition tick. Each append round-trips
//! through the filesystem immediately: durability over throughput, which is
//! the right trade at the logger's low sampling rate.

mod row;
mod store;

pub use row::{fmt_hhmmss, parse_hhmmss, LogRow};
pub use store::LogStore;

use serde::Serialize;
use thiserror::Error;

/// Fallback log file name, used only when no session has ever been started.
pub const LEGACY_LOG_FILE: &str = "templog.csv";

/// A stored log file, as reported by [`LogStore::list`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogFileInfo {
    /// Bare file name within the store
    pub name: String,
    /// Size in bytes
    pub size: u64,
}

/// Errors from log storage operations.
///
/// Invalid names and missing files are distinct from I/O failures so the
/// control surface can map them to distinct rejections.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The name is empty or contains path components
    #[error("invalid log file name: {0:?}")]
    InvalidName(String),

    /// No such file in the store
    #[error("log file not found: {0}")]
    NotFound(String),

    /// Underlying filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
