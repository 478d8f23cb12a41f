//! Thermocouple Probe Acquisition
//!
//! Drives the synchronous serial link of a MAX31855-style
//! thermocouple-to-digital converter and decodes the 32-bit frames it
//! returns.
//!
//! The converter is read-only: a transaction asserts chip select and clocks
//! out one fixed-width frame, MSB first. There is no CRC or parity in the
//! frame; the decoder's fault fields are the only validity signal and are
//! passed through to callers unfiltered.

mod aggregator;
mod bus;
pub mod demo;
mod frame;
mod sampler;

pub use aggregator::{average, AggregatorConfig, AveragedSample};
pub use bus::{SamplerTiming, SensorBus};
pub use frame::{decode, DecodedSample, FaultKind, FaultStatus, RawFrame};
pub use sampler::FrameSampler;

/// Bits per protocol frame
pub const FRAME_BITS: u32 = 32;

#[cfg(test)]
pub(crate) mod testutil {
    //! Scripted fake bus shared by the probe unit tests.

    use std::collections::VecDeque;

    use super::SensorBus;

    /// A pin event recorded by [`ScriptedBus`]
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum PinEvent {
        /// Chip-select driven to the given level
        Select(bool),
        /// Clock driven to the given level
        Clock(bool),
        /// Data line sampled
        Read,
    }

    /// Fake bus that plays back scripted frames and records pin activity.
    ///
    /// Delays are ignored so tests run deterministically.
    pub struct ScriptedBus {
        frames: VecDeque<u32>,
        current: u32,
        cursor: u32,
        pub events: Vec<PinEvent>,
        pub delays_us: u64,
    }

    impl ScriptedBus {
        pub fn new(frames: impl IntoIterator<Item = u32>) -> Self {
            Self {
                frames: frames.into_iter().collect(),
                current: 0,
                cursor: 0,
                events: Vec::new(),
                delays_us: 0,
            }
        }
    }

    impl SensorBus for ScriptedBus {
        fn set_select(&mut self, level: bool) {
            self.events.push(PinEvent::Select(level));
            if !level {
                // Select asserted: latch the next scripted frame
                self.current = self.frames.pop_front().unwrap_or(self.current);
                self.cursor = 0;
            }
        }

        fn set_clock(&mut self, level: bool) {
            self.events.push(PinEvent::Clock(level));
        }

        fn read_data(&mut self) -> bool {
            self.events.push(PinEvent::Read);
            let shift = 31u32.saturating_sub(self.cursor);
            let bit = self.current & (1 << shift) != 0;
            if self.cursor < 31 {
                self.cursor += 1;
            }
            bit
        }

        fn delay_us(&mut self, us: u64) {
            self.delays_us += us;
        }
    }
}
