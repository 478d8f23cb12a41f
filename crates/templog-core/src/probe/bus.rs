//! Sensor bus abstraction
//!
//! Pin-drive/read and delay abstraction over the synchronous link, so the
//! bit-level sampler can run against real GPIO on the target or against a
//! deterministic fake in unit tests.

/// Abstraction over the three-wire link to the converter.
///
/// Implementations map the calls onto GPIO pins (chip select and clock as
/// outputs, data as an input). The converter never receives data, so there is
/// no write-side line.
pub trait SensorBus {
    /// Drive the chip-select line. `true` is the deasserted (idle high)
    /// level; `false` asserts the converter.
    fn set_select(&mut self, level: bool);

    /// Drive the clock line. Idles high; data is sampled after the falling
    /// edge.
    fn set_clock(&mut self, level: bool);

    /// Sample the data line.
    fn read_data(&mut self) -> bool;

    /// Wait for the given number of microseconds.
    ///
    /// Hardware backends sleep or busy-wait; test fakes may ignore this
    /// entirely.
    fn delay_us(&mut self, us: u64);
}

/// Timing parameters for the bit-banged transaction.
///
/// The defaults match the microsecond-scale delays the reference firmware
/// uses on real hardware; both are tunable for slower wiring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerTiming {
    /// Delay around chip-select transitions, in microseconds
    pub guard_us: u64,
    /// Delay after each clock edge before the next action, in microseconds
    pub settle_us: u64,
}

impl Default for SamplerTiming {
    fn default() -> Self {
        Self {
            guard_us: 5,
            settle_us: 3,
        }
    }
}
