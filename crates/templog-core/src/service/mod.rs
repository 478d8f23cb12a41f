//! Acquisition Service
//!
//! The periodic sample→decode→record loop. The loop is the sole user of the
//! sensor bus and the only caller of `record()`; control requests
//! (start/stop/list/delete/series) arrive concurrently through clones of the
//! [`SessionHandle`] and synchronize with it at the session mutex.
//!
//! Storage failures are reported and the cycle abandoned; they are never
//! fatal to the loop.

use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::logstore::LogStore;
use crate::probe::{average, AggregatorConfig, FrameSampler, SamplerTiming, SensorBus};
use crate::session::{Reading, SessionHandle};

/// Configuration for the acquisition service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Directory holding the session log files
    pub log_dir: PathBuf,
    /// Acquisition interval
    pub sample_interval: Duration,
    /// Bit-level timing for the sampler
    pub timing: SamplerTiming,
    /// Frame averaging; `None` records instant samples
    pub aggregator: Option<AggregatorConfig>,
    /// Bounded re-reads of stuck-looking frames (0 matches the reference
    /// firmware, which never retries)
    pub sample_retries: u32,
}

impl ServiceConfig {
    /// Defaults: 15 s interval, instant samples, no retries.
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: log_dir.into(),
            sample_interval: Duration::from_secs(15),
            timing: SamplerTiming::default(),
            aggregator: None,
            sample_retries: 0,
        }
    }
}

/// The periodic acquisition loop.
///
/// Owns the sampler exclusively; hand out the [`SessionHandle`] to control
/// layers.
pub struct AcquisitionLoop<B: SensorBus> {
    sampler: FrameSampler<B>,
    session: SessionHandle,
    config: ServiceConfig,
}

impl<B: SensorBus> AcquisitionLoop<B> {
    /// Build the loop and its session handle over the configured log
    /// directory.
    pub fn new(bus: B, config: ServiceConfig) -> Result<(Self, SessionHandle), anyhow::Error> {
        let store = LogStore::new(&config.log_dir)?;
        let session = SessionHandle::new(store);
        let sampler = FrameSampler::with_timing(bus, config.timing);
        Ok((
            Self {
                sampler,
                session: session.clone(),
                config,
            },
            session,
        ))
    }

    /// A clone of the session handle.
    pub fn session(&self) -> SessionHandle {
        self.session.clone()
    }

    /// Run until the shutdown channel flips to `true` (or its sender is
    /// dropped).
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> Result<(), anyhow::Error> {
        let mut ticker = tokio::time::interval(self.config.sample_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::info!(
            interval_secs = self.config.sample_interval.as_secs_f64(),
            log_dir = %self.config.log_dir.display(),
            "acquisition loop running"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => self.acquire_once(),
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::info!("acquisition loop stopped");
        Ok(())
    }

    /// One acquisition cycle: sample, decode, publish, and (while recording)
    /// append.
    fn acquire_once(&mut self) {
        let reading: Reading = match &self.config.aggregator {
            Some(aggregator) => average(&mut self.sampler, aggregator).into(),
            None => {
                let frame = if self.config.sample_retries > 0 {
                    self.sampler.sample_checked(self.config.sample_retries)
                } else {
                    self.sampler.sample()
                };
                frame.decode().into()
            }
        };

        tracing::debug!(
            temp_c = reading.external_temp_c,
            internal_c = reading.internal_temp_c,
            fault = reading.fault,
            "acquired sample"
        );

        if let Err(e) = self.session.observe_and_record(reading) {
            // Abandon this cycle; the loop keeps sampling
            tracing::warn!(error = %e, "failed to append log row");
        }
    }
}
