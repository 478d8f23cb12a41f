//! Frame sampler
//!
//! Bit-bangs one 32-bit frame out of the converter per transaction.
//!
//! The clock idles high; chip select is asserted low after a guard delay;
//! each of the 32 bits is clocked out on a falling edge and sampled after a
//! settle delay, most significant bit first. This layer never errors: a
//! disconnected link silently yields all-zero or stuck frames, and validity
//! is entirely the decoder's concern.

use super::bus::{SamplerTiming, SensorBus};
use super::frame::RawFrame;
use super::FRAME_BITS;

/// Captures raw frames from the converter over a [`SensorBus`].
pub struct FrameSampler<B: SensorBus> {
    bus: B,
    timing: SamplerTiming,
}

impl<B: SensorBus> FrameSampler<B> {
    /// Create a sampler with default timing.
    pub fn new(bus: B) -> Self {
        Self::with_timing(bus, SamplerTiming::default())
    }

    /// Create a sampler with explicit timing parameters.
    pub fn with_timing(bus: B, timing: SamplerTiming) -> Self {
        Self { bus, timing }
    }

    /// Capture one raw frame. Blocking, synchronous.
    pub fn sample(&mut self) -> RawFrame {
        let SamplerTiming { guard_us, settle_us } = self.timing;

        // Establish idle levels, then assert select
        self.bus.set_select(true);
        self.bus.set_clock(true);
        self.bus.delay_us(guard_us);
        self.bus.set_select(false);
        self.bus.delay_us(guard_us);

        let mut bits: u32 = 0;
        for i in (0..FRAME_BITS).rev() {
            // Falling edge, settle, then sample
            self.bus.set_clock(false);
            self.bus.delay_us(settle_us);
            if self.bus.read_data() {
                bits |= 1 << i;
            }
            self.bus.set_clock(true);
            self.bus.delay_us(settle_us);
        }

        self.bus.set_select(true);
        RawFrame(bits)
    }

    /// Capture a frame, retrying a bounded number of times when the result
    /// looks like a stuck data line (all zeros or all ones).
    ///
    /// The reference firmware has no such retry; this is a hardening
    /// addition. The last frame is returned regardless, so a genuinely dead
    /// link still produces a frame for the decoder to classify.
    pub fn sample_checked(&mut self, max_retries: u32) -> RawFrame {
        let mut frame = self.sample();
        for _ in 0..max_retries {
            if !frame.looks_stuck() {
                break;
            }
            tracing::debug!(frame = %frame, "stuck frame, retrying");
            frame = self.sample();
        }
        frame
    }

    /// Access the underlying bus, e.g. for inter-sample delays.
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Consume the sampler and return the bus.
    pub fn into_bus(self) -> B {
        self.bus
    }
}
