//! Log row formatting
//!
//! Rows are stored as `HH:MM:SS,<value>` with the time zero-padded and the
//! value rendered to two decimal places. The format assumes elapsed times
//! below 100 hours.

/// One persisted log row: elapsed time since session start, and a value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogRow {
    /// Whole seconds since the owning session started
    pub elapsed_secs: u64,
    /// Recorded value (temperature in °C)
    pub value: f64,
}

impl LogRow {
    /// Create a row.
    pub fn new(elapsed_secs: u64, value: f64) -> Self {
        Self {
            elapsed_secs,
            value,
        }
    }

    /// Render the row as a line, including the terminating newline.
    pub fn to_line(&self) -> String {
        format!("{},{:.2}\n", fmt_hhmmss(self.elapsed_secs), self.value)
    }

    /// Parse a stored line back into a row.
    ///
    /// Returns `None` for lines missing the separator or with an unparsable
    /// time or value field; callers treat those as skippable, never fatal.
    pub fn parse_line(line: &str) -> Option<Self> {
        let (time, value) = line.split_once(',')?;
        let elapsed_secs = parse_hhmmss(time)?;
        let value = value.trim().parse().ok()?;
        Some(Self {
            elapsed_secs,
            value,
        })
    }
}

/// Format seconds as zero-padded `HH:MM:SS`.
pub fn fmt_hhmmss(secs: u64) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60
    )
}

/// Parse `HH:MM:SS` back into seconds. Exact inverse of [`fmt_hhmmss`].
pub fn parse_hhmmss(s: &str) -> Option<u64> {
    let mut parts = s.trim().splitn(3, ':');
    let h: u64 = parts.next()?.parse().ok()?;
    let m: u64 = parts.next()?.parse().ok()?;
    let sec: u64 = parts.next()?.parse().ok()?;
    Some(h * 3600 + m * 60 + sec)
}
