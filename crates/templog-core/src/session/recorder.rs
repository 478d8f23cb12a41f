//! Recording-session state machine
//!
//! Two states, `Idle` and `Recording`. A session owns its elapsed-time
//! origin (a monotonic instant, immune to wall-clock adjustments) and the
//! name of its dedicated log file. Stopping leaves the file behind as an
//! independent, read-only artifact; past sessions exist only as files.

use std::time::{Duration, Instant};

use chrono::Local;

use crate::logstore::{fmt_hhmmss, LogRow, LogStore, StoreError};

use super::{Reading, SessionStatus};

enum SessionState {
    Idle,
    Recording { file: String, started: Instant },
}

/// The recording-session state machine.
///
/// Not synchronized by itself; share it through
/// [`SessionHandle`](super::SessionHandle).
pub struct RecordingSession {
    store: LogStore,
    state: SessionState,
    latest: Option<Reading>,
}

impl RecordingSession {
    /// Create an idle session over the given store.
    pub fn new(store: LogStore) -> Self {
        Self {
            store,
            state: SessionState::Idle,
            latest: None,
        }
    }

    /// The underlying log store.
    pub fn store(&self) -> &LogStore {
        &self.store
    }

    /// Whether a session is recording.
    pub fn is_recording(&self) -> bool {
        matches!(self.state, SessionState::Recording { .. })
    }

    /// The active log file name while recording.
    pub fn active_file(&self) -> Option<&str> {
        match &self.state {
            SessionState::Recording { file, .. } => Some(file),
            SessionState::Idle => None,
        }
    }

    /// Elapsed time since session start, while recording.
    pub fn elapsed(&self) -> Option<Duration> {
        match &self.state {
            SessionState::Recording { started, .. } => Some(started.elapsed()),
            SessionState::Idle => None,
        }
    }

    /// Retain the latest acquired reading for the query surface.
    pub fn observe(&mut self, reading: Reading) {
        self.latest = Some(reading);
    }

    /// The latest observed reading, if any.
    pub fn latest(&self) -> Option<Reading> {
        self.latest
    }

    /// Start a new session.
    ///
    /// From `Idle`: generates a timestamp-derived file name, creates the
    /// empty file, captures the monotonic start instant, and immediately
    /// records one row at elapsed zero (when a reading has been observed) so
    /// consumers see data without waiting a full sampling interval.
    ///
    /// From `Recording`: a no-op that preserves the existing active file.
    /// The reference firmware behaves this way; it is kept as-is rather than
    /// reinterpreted as file rotation.
    pub fn start(&mut self) -> Result<(), StoreError> {
        if self.is_recording() {
            tracing::debug!(file = self.active_file(), "start ignored, already recording");
            return Ok(());
        }

        let file = self.store.unique_session_name(Local::now());
        self.store.create_empty(&file)?;
        tracing::info!(file = %file, "recording started");
        self.state = SessionState::Recording {
            file,
            started: Instant::now(),
        };

        if let Some(reading) = self.latest {
            // First row at t=0; a failure here leaves the session running
            if let Err(e) = self.record(reading.external_temp_c) {
                tracing::warn!(error = %e, "failed to write initial log row");
            }
        }
        Ok(())
    }

    /// Stop the active session. The log file is left untouched. No-op while
    /// idle.
    pub fn stop(&mut self) {
        let prev = std::mem::replace(&mut self.state, SessionState::Idle);
        if let SessionState::Recording { file, .. } = prev {
            tracing::info!(file = %file, "recording stopped");
        }
    }

    /// Append one row at the current elapsed time. Silent no-op while idle.
    pub fn record(&self, value: f64) -> Result<(), StoreError> {
        let SessionState::Recording { file, started } = &self.state else {
            return Ok(());
        };
        let row = LogRow::new(started.elapsed().as_secs(), value);
        self.store.append(file, &row)
    }

    /// Consistent snapshot for the status endpoint.
    pub fn status(&self) -> SessionStatus {
        let elapsed_secs = self.elapsed().map(|d| d.as_secs()).unwrap_or(0);
        SessionStatus {
            reading: self.latest,
            recording: self.is_recording(),
            active: self.active_file().map(str::to_owned),
            elapsed_secs,
            elapsed_hms: if self.is_recording() {
                fmt_hhmmss(elapsed_secs)
            } else {
                String::new()
            },
        }
    }
}
