//! Series Reconstruction
//!
//! Rebuilds an ordered time series from a stored session log for querying
//! and plotting. Parsing is deliberately lenient: a truncated trailing write
//! must never corrupt an entire series, so malformed rows are skipped, not
//! fatal.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use serde::ser::SerializeTuple;
use serde::{Serialize, Serializer};

use crate::logstore::LogRow;

/// One series point: millisecond offset from session start, and the value.
///
/// Serializes as a `[offset_ms, value]` pair, the shape charting frontends
/// consume directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    /// Milliseconds since the owning session started
    pub offset_ms: u64,
    /// Recorded value
    pub value: f64,
}

impl Serialize for SeriesPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&self.offset_ms)?;
        tuple.serialize_element(&self.value)?;
        tuple.end()
    }
}

/// An ordered time series loaded from a session log file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Series {
    points: Vec<SeriesPoint>,
}

impl Series {
    /// Load a series from a log file, in insertion order.
    ///
    /// Rows missing the separator or with unparsable fields are skipped
    /// (and debug-logged); only I/O failures abort the read.
    pub fn load(path: impl AsRef<Path>) -> io::Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let mut points = Vec::new();
        for line in reader.lines() {
            let line = line?;
            match LogRow::parse_line(&line) {
                Some(row) => points.push(SeriesPoint {
                    offset_ms: row.elapsed_secs * 1000,
                    value: row.value,
                }),
                None => {
                    if !line.trim().is_empty() {
                        tracing::debug!(line = %line, "skipping malformed log row");
                    }
                }
            }
        }
        Ok(Self { points })
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series holds no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All points, in insertion order.
    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    /// Offset of the last point, i.e. the series duration in milliseconds.
    pub fn duration_ms(&self) -> u64 {
        self.points.last().map(|p| p.offset_ms).unwrap_or(0)
    }

    /// Just the values, in insertion order.
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }
}
