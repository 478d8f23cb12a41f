//! Recording Sessions
//!
//! The recording-session state machine and the synchronized handle through
//! which the acquisition loop and the control-request handlers share it.

mod handle;
mod recorder;

pub use handle::SessionHandle;
pub use recorder::RecordingSession;

use serde::Serialize;
use thiserror::Error;

use crate::logstore::StoreError;
use crate::probe::{AveragedSample, DecodedSample};

/// The most recent observed reading, as retained for the query surface.
///
/// Carries only what the status endpoint needs; both instant and averaged
/// samples reduce to it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Reading {
    /// External-junction temperature in °C
    pub external_temp_c: f64,
    /// Internal (cold-junction) temperature in °C
    pub internal_temp_c: f64,
    /// Whether the sample was fault-flagged (for averaged samples, whether
    /// any contributing frame was)
    pub fault: bool,
}

impl From<DecodedSample> for Reading {
    fn from(sample: DecodedSample) -> Self {
        Self {
            external_temp_c: sample.external_temp_c,
            internal_temp_c: sample.internal_temp_c,
            fault: sample.fault.any(),
        }
    }
}

impl From<AveragedSample> for Reading {
    fn from(sample: AveragedSample) -> Self {
        Self {
            external_temp_c: sample.external_temp_c,
            internal_temp_c: sample.internal_temp_c,
            fault: sample.fault_count > 0,
        }
    }
}

/// Consistent snapshot of session state and the latest reading, for the
/// external status endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionStatus {
    /// Latest observed reading, if any sample has been acquired yet
    pub reading: Option<Reading>,
    /// Whether a session is recording
    pub recording: bool,
    /// Active log file name while recording
    pub active: Option<String>,
    /// Whole seconds since session start (0 while idle)
    pub elapsed_secs: u64,
    /// Elapsed time as `HH:MM:SS` (empty while idle)
    pub elapsed_hms: String,
}

/// Rejection results for control requests.
///
/// Not-found, busy/conflict, and bad-input are deliberately distinct
/// variants; callers must not conflate them.
#[derive(Error, Debug)]
pub enum ControlError {
    /// The named log file does not exist
    #[error("log file not found: {0}")]
    NotFound(String),

    /// The named log file is the active session file
    #[error("log file is busy: {0} belongs to the active session")]
    Busy(String),

    /// Missing or malformed request input
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Storage failure underneath an otherwise valid request
    #[error("storage error: {0}")]
    Storage(StoreError),
}

impl From<StoreError> for ControlError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(name) => ControlError::NotFound(name),
            StoreError::InvalidName(name) => {
                ControlError::BadRequest(format!("invalid log file name: {name:?}"))
            }
            other => ControlError::Storage(other),
        }
    }
}
