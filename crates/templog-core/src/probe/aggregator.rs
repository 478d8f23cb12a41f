//! Sample averaging
//!
//! Averages several decoded frames to suppress acquisition jitter. No
//! fault-aware weighting or outlier rejection: faulted frames contribute to
//! the sums like any other, and the caller decides what to make of the fault
//! count.

use std::time::Duration;

use serde::Serialize;

use super::bus::SensorBus;
use super::frame::decode;
use super::sampler::FrameSampler;

/// Configuration for frame averaging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregatorConfig {
    /// Number of frames per averaged sample
    pub samples: u32,
    /// Pause between acquisitions, to avoid bus contention with other
    /// periodic work
    pub inter_sample_delay: Duration,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            samples: 4,
            inter_sample_delay: Duration::from_millis(5),
        }
    }
}

/// The arithmetic mean of several decoded samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AveragedSample {
    /// Mean external-junction temperature in °C
    pub external_temp_c: f64,
    /// Mean internal temperature in °C
    pub internal_temp_c: f64,
    /// How many of the frames had the overall fault flag set (a count, not a
    /// fraction, so callers can apply their own thresholds)
    pub fault_count: u32,
}

/// Acquire and decode `config.samples` independent frames and average them.
pub fn average<B: SensorBus>(
    sampler: &mut FrameSampler<B>,
    config: &AggregatorConfig,
) -> AveragedSample {
    let n = config.samples.max(1);
    let delay_us = config.inter_sample_delay.as_micros() as u64;

    let mut sum_ext = 0.0;
    let mut sum_int = 0.0;
    let mut fault_count = 0u32;

    for _ in 0..n {
        let sample = decode(sampler.sample());
        sum_ext += sample.external_temp_c;
        sum_int += sample.internal_temp_c;
        if sample.fault.any() {
            fault_count += 1;
        }
        sampler.bus_mut().delay_us(delay_us);
    }

    AveragedSample {
        external_temp_c: sum_ext / n as f64,
        internal_temp_c: sum_int / n as f64,
        fault_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::testutil::ScriptedBus;
    use pretty_assertions::assert_eq;

    // 1.00 C external, 1.00 C internal, no fault
    const ONE_C: u32 = (4 << 18) | (16 << 4);
    // Same, with the fault flag and open-circuit bit set
    const ONE_C_FAULTED: u32 = ONE_C | 0x0001_0000 | 0x0000_0001;

    #[test]
    fn test_identical_samples_average_unchanged() {
        let mut sampler = FrameSampler::new(ScriptedBus::new([ONE_C; 4]));
        let avg = average(&mut sampler, &AggregatorConfig::default());
        assert_eq!(avg.external_temp_c, 1.0);
        assert_eq!(avg.internal_temp_c, 1.0);
        assert_eq!(avg.fault_count, 0);
    }

    #[test]
    fn test_fault_count_position_independent() {
        for pos in 0..4 {
            let mut frames = [ONE_C; 4];
            frames[pos] = ONE_C_FAULTED;
            let mut sampler = FrameSampler::new(ScriptedBus::new(frames));
            let avg = average(&mut sampler, &AggregatorConfig::default());
            assert_eq!(avg.fault_count, 1, "fault at position {pos}");
        }
    }

    #[test]
    fn test_mean_of_distinct_samples() {
        // 1.00 and 3.00 C external
        let mut sampler = FrameSampler::new(ScriptedBus::new([4 << 18, 12 << 18]));
        let avg = average(
            &mut sampler,
            &AggregatorConfig {
                samples: 2,
                ..Default::default()
            },
        );
        assert_eq!(avg.external_temp_c, 2.0);
    }

    #[test]
    fn test_inter_sample_delay_applied() {
        let config = AggregatorConfig::default();
        let mut sampler = FrameSampler::new(ScriptedBus::new([ONE_C; 4]));
        average(&mut sampler, &config);
        // 4 inter-sample pauses of 5 ms on top of the per-bit timing
        let timing_us = 4 * (2 * 5 + 32 * 2 * 3);
        assert_eq!(sampler.bus_mut().delays_us, timing_us + 4 * 5000);
    }
}
