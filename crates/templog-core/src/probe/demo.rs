//! Demo probe: simulated converter for testing without hardware
//!
//! Generates plausible frames from a random-walk probe temperature so the
//! acquisition pipeline, session manager, and any UI on top can run end to
//! end with no sensor wired up.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::bus::SensorBus;
use super::frame::{
    EXT_LSB_C, EXT_MASK, EXT_SHIFT, FAULT_FLAG, FAULT_OC, FAULT_SCG, FAULT_SCV, INT_LSB_C,
    INT_MASK, INT_SHIFT,
};
use super::RawFrame;

/// Encode temperatures and fault detail bits into a raw frame.
///
/// The inverse of [`decode`](super::decode), within quantization: the
/// temperatures are rounded to the field LSB. The overall fault flag is set
/// whenever any detail bit is.
pub fn encode_frame(external_c: f64, internal_c: f64, fault_detail: u32) -> RawFrame {
    let ext = (external_c / EXT_LSB_C).round() as i32;
    let int = (internal_c / INT_LSB_C).round() as i32;

    let mut bits = ((ext as u32) & EXT_MASK) << EXT_SHIFT;
    bits |= ((int as u32) & INT_MASK) << INT_SHIFT;
    bits |= fault_detail & (FAULT_OC | FAULT_SCG | FAULT_SCV);
    if bits & (FAULT_OC | FAULT_SCG | FAULT_SCV) != 0 {
        bits |= FAULT_FLAG;
    }
    RawFrame(bits)
}

/// Simulated sensor bus.
///
/// Each chip-select assertion latches a fresh frame derived from a slowly
/// wandering probe temperature; the sampler then clocks it out bit by bit
/// like real hardware. Delays are ignored.
pub struct SimulatedBus {
    external_c: f64,
    internal_c: f64,
    fault_detail: u32,
    rng: StdRng,
    frame: u32,
    cursor: u32,
}

impl SimulatedBus {
    /// Create a simulated probe starting near room temperature.
    pub fn new() -> Self {
        Self::with_seed(rand::thread_rng().gen())
    }

    /// Create a simulated probe with a fixed RNG seed for reproducible runs.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            external_c: 22.0,
            internal_c: 24.0,
            fault_detail: 0,
            rng: StdRng::seed_from_u64(seed),
            frame: 0,
            cursor: 0,
        }
    }

    /// Force the probe temperature.
    pub fn set_temperature(&mut self, external_c: f64) {
        self.external_c = external_c;
    }

    /// Inject fault detail bits into every subsequent frame (0 clears).
    pub fn set_fault_detail(&mut self, detail: u32) {
        self.fault_detail = detail;
    }

    fn next_frame(&mut self) -> u32 {
        self.external_c += self.rng.gen_range(-0.25..=0.25);
        self.external_c = self.external_c.clamp(-50.0, 400.0);
        self.internal_c += self.rng.gen_range(-0.0625..=0.0625);
        encode_frame(self.external_c, self.internal_c, self.fault_detail).0
    }
}

impl Default for SimulatedBus {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorBus for SimulatedBus {
    fn set_select(&mut self, level: bool) {
        if !level {
            self.frame = self.next_frame();
            self.cursor = 0;
        }
    }

    fn set_clock(&mut self, _level: bool) {}

    fn read_data(&mut self) -> bool {
        let shift = 31u32.saturating_sub(self.cursor);
        let bit = self.frame & (1 << shift) != 0;
        if self.cursor < 31 {
            self.cursor += 1;
        }
        bit
    }

    fn delay_us(&mut self, _us: u64) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::{decode, FaultKind, FrameSampler};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_encode_decode_roundtrip() {
        let sample = decode(encode_frame(23.5, 21.0625, 0));
        assert_eq!(sample.external_temp_c, 23.5);
        assert_eq!(sample.internal_temp_c, 21.0625);
        assert!(!sample.fault.any());
    }

    #[test]
    fn test_encode_negative_temperature() {
        let sample = decode(encode_frame(-12.25, -3.5, 0));
        assert_eq!(sample.external_temp_c, -12.25);
        assert_eq!(sample.internal_temp_c, -3.5);
    }

    #[test]
    fn test_encode_sets_fault_flag_for_detail_bits() {
        let sample = decode(encode_frame(0.0, 0.0, FAULT_OC));
        assert!(sample.fault.any());
        assert_eq!(sample.fault.kind(), FaultKind::OpenCircuit);
    }

    #[test]
    fn test_simulated_bus_produces_plausible_frames() {
        let mut sampler = FrameSampler::new(SimulatedBus::with_seed(7));
        for _ in 0..10 {
            let sample = decode(sampler.sample());
            assert!((15.0..30.0).contains(&sample.external_temp_c));
            assert!(!sample.fault.any());
        }
    }

    #[test]
    fn test_simulated_fault_injection() {
        let mut bus = SimulatedBus::with_seed(7);
        bus.set_fault_detail(FAULT_SCG);
        let mut sampler = FrameSampler::new(bus);
        let sample = decode(sampler.sample());
        assert!(sample.fault.any());
        assert_eq!(sample.fault.kind(), FaultKind::ShortToGnd);
    }
}
