//! # TempLog Core Library
//!
//! Core functionality for the TempLog thermocouple session logger.
//!
//! This library provides:
//! - Bit-banged acquisition of 32-bit frames from a MAX31855-style
//!   thermocouple-to-digital converter
//! - Frame decoding (two's-complement temperatures, fault bits)
//! - Jitter suppression by frame averaging
//! - A recording-session state machine with append-only CSV persistence
//! - Time-series reconstruction from stored logs
//!
//! Display rendering, network provisioning, HTTP routing, and time sync are
//! external collaborators: they consume the session/control API exposed here
//! but are not part of this crate.
//!
//! ## Example
//!
//! ```rust,ignore
//! use templog_core::prelude::*;
//!
//! let (service, session) = AcquisitionLoop::new(bus, ServiceConfig::new("/var/lib/templog"));
//! tokio::spawn(service.run(shutdown_rx));
//!
//! // Control surface, driven by the external request dispatcher
//! session.start()?;
//! let status = session.status();
//! println!("{:?} C", status.reading);
//! ```

#![warn(missing_docs)]

pub mod logstore;
pub mod probe;
pub mod series;
pub mod service;
pub mod session;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::logstore::{LogFileInfo, LogRow, LogStore, StoreError, LEGACY_LOG_FILE};
    pub use crate::probe::{
        average, decode, AggregatorConfig, AveragedSample, DecodedSample, FaultKind, FaultStatus,
        FrameSampler, RawFrame, SamplerTiming, SensorBus,
    };
    pub use crate::series::{Series, SeriesPoint};
    pub use crate::service::{AcquisitionLoop, ServiceConfig};
    pub use crate::session::{
        ControlError, Reading, RecordingSession, SessionHandle, SessionStatus,
    };
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
