//! Static bias estimation for the accelerometer and gyroscope.
//!
//! A calibration run averages a fixed batch of raw samples taken while the
//! device is at rest. The resulting per-axis means are subtracted from every
//! later reading.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let calibrator = Calibrator::new(1000, 500)?;
//! let offset = calibrator.run(&mut source, &mut delay);
//! let corrected = offset.correct(&source.next_sample());
//! ```

use embedded_hal::delay::DelayNs;
use log::info;
use serde::{Deserialize, Serialize};

use crate::error::MotionError;
use crate::sensors::{CorrectedSample, RawSample, SampleSource, Vector3};

/// Per-axis bias of both sensors.
///
/// Only produced from a complete batch, so an offset in hand is always valid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CalibrationOffset {
    pub accel: Vector3<f64>,
    pub gyro: Vector3<f64>,
}

impl CalibrationOffset {
    /// Remove the bias from a raw reading.
    pub fn correct(&self, raw: &RawSample) -> CorrectedSample {
        CorrectedSample {
            accel: raw.accel.as_f64() - self.accel,
            gyro: raw.gyro.as_f64() - self.gyro,
        }
    }

    /// Put the bias back, recovering the raw reading exactly.
    pub fn restore(&self, corrected: &CorrectedSample) -> RawSample {
        let round = |v: f64| libm::round(v) as i32;
        RawSample {
            accel: (corrected.accel + self.accel).map(round),
            gyro: (corrected.gyro + self.gyro).map(round),
        }
    }
}

/// Running per-axis sums of a calibration batch.
///
/// Sums are kept as integers so the final mean is exact regardless of the
/// order samples arrive in.
#[derive(Debug, Clone, Default)]
pub struct BiasAccumulator {
    accel_sum: Vector3<i64>,
    gyro_sum: Vector3<i64>,
    count: u32,
}

impl BiasAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all sums.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Add one raw sample to the batch.
    pub fn add(&mut self, sample: &RawSample) {
        let widen = |sum: Vector3<i64>, v: Vector3<i32>| sum.zip_with(v, |s, v| s + v as i64);
        self.accel_sum = widen(self.accel_sum, sample.accel);
        self.gyro_sum = widen(self.gyro_sum, sample.gyro);
        self.count += 1;
    }

    /// Number of samples added since the last reset.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Divide the sums by the batch size. Returns `None` for an empty batch.
    pub fn mean(&self) -> Option<CalibrationOffset> {
        if self.count == 0 {
            return None;
        }

        let n = self.count as f64;
        let divide = |sum: Vector3<i64>| sum.map(|s| s as f64 / n);

        Some(CalibrationOffset {
            accel: divide(self.accel_sum),
            gyro: divide(self.gyro_sum),
        })
    }
}

/// Computes a fresh [`CalibrationOffset`] from a batch of samples.
#[derive(Debug, Clone, Copy)]
pub struct Calibrator {
    batch_size: u32,
    spacing_us: u32,
}

impl Calibrator {
    /// Create a calibrator. A zero batch has no mean and is rejected.
    pub fn new(batch_size: u32, spacing_us: u32) -> Result<Self, MotionError> {
        if batch_size == 0 {
            return Err(MotionError::InvalidBatchSize(batch_size));
        }

        Ok(Self {
            batch_size,
            spacing_us,
        })
    }

    pub fn batch_size(&self) -> u32 {
        self.batch_size
    }

    /// Pull `batch_size` samples from `source`, `spacing_us` apart, and
    /// return their mean.
    ///
    /// Blocks for the whole batch. Callers must not service ticks while this
    /// runs.
    pub fn run<S, D>(&self, source: &mut S, delay: &mut D) -> CalibrationOffset
    where
        S: SampleSource + ?Sized,
        D: DelayNs + ?Sized,
    {
        info!(
            "Starting calibration: {} samples, {} us apart",
            self.batch_size, self.spacing_us
        );

        let mut accumulator = BiasAccumulator::new();
        for _ in 0..self.batch_size {
            accumulator.add(&source.next_sample());
            delay.delay_us(self.spacing_us);
        }

        // batch_size > 0 is checked in `new`, so the batch is never empty
        let offset = accumulator.mean().unwrap_or_default();

        info!(
            "Calibration done: accel bias ({:.1}, {:.1}, {:.1}), gyro bias ({:.1}, {:.1}, {:.1})",
            offset.accel.x,
            offset.accel.y,
            offset.accel.z,
            offset.gyro.x,
            offset.gyro.y,
            offset.gyro.z
        );

        offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{CountingDelay, ScriptedSource, sample};

    #[test]
    fn test_offset_is_exact_mean() {
        let mut source = ScriptedSource::new([
            sample([10, 0, 0], [0, 0, 0]),
            sample([20, 0, 0], [0, 0, 0]),
        ]);
        let calibrator = Calibrator::new(2, 0).unwrap();

        let offset = calibrator.run(&mut source, &mut CountingDelay::default());

        assert_eq!(offset.accel, Vector3::new(15.0, 0.0, 0.0));
        assert_eq!(offset.gyro, Vector3::default());
    }

    #[test]
    fn test_mean_over_both_sensors() {
        let mut source = ScriptedSource::new([
            sample([1, -4, 1000], [300, -200, 7]),
            sample([3, -6, 1002], [100, -100, 8]),
            sample([2, -5, 998], [200, -300, 9]),
        ]);
        let calibrator = Calibrator::new(3, 0).unwrap();

        let offset = calibrator.run(&mut source, &mut CountingDelay::default());

        assert_eq!(offset.accel, Vector3::new(2.0, -5.0, 1000.0));
        assert_eq!(offset.gyro, Vector3::new(200.0, -200.0, 8.0));
    }

    #[test]
    fn test_zero_batch_fails_fast() {
        assert_eq!(
            Calibrator::new(0, 500).unwrap_err(),
            MotionError::InvalidBatchSize(0)
        );
    }

    #[test]
    fn test_run_pulls_batch_and_waits_between_samples() {
        let mut source = ScriptedSource::new([sample([1, 1, 1], [1, 1, 1])]);
        let mut delay = CountingDelay::default();
        let calibrator = Calibrator::new(1000, 500).unwrap();

        calibrator.run(&mut source, &mut delay);

        assert_eq!(source.pulled(), 1000);
        assert_eq!(delay.calls, 1000);
        assert_eq!(delay.total_ns, 1000 * 500 * 1000);
    }

    #[test]
    fn test_accumulator_reset() {
        let mut accumulator = BiasAccumulator::new();
        assert!(accumulator.mean().is_none());

        accumulator.add(&sample([4, 4, 4], [4, 4, 4]));
        assert_eq!(accumulator.count(), 1);

        accumulator.reset();
        assert_eq!(accumulator.count(), 0);
        assert!(accumulator.mean().is_none());
    }

    #[test]
    fn test_correct_then_restore_round_trips() {
        let offset = CalibrationOffset {
            accel: Vector3::new(15.0, -2.5, 1003.0),
            gyro: Vector3::new(420.0, -130.5, 12.0),
        };
        let raw = sample([-120, 33, 998], [65_000, -7, 0]);

        let corrected = offset.correct(&raw);
        assert_eq!(corrected.accel, Vector3::new(-135.0, 35.5, -5.0));

        assert_eq!(offset.restore(&corrected), raw);
    }

    #[test]
    fn test_round_trip_holds_across_the_integer_range() {
        let offset = CalibrationOffset {
            accel: Vector3::new(0.5, -0.25, 1003.4),
            gyro: Vector3::new(-130.5, 0.125, 2_000_000.7),
        };

        for raw in [
            sample([16_777_217, -16_777_217, 0], [i32::MAX, i32::MIN, 1]),
            sample([i32::MAX, i32::MIN, -1], [16_777_219, 0, i32::MAX]),
            sample([i32::MIN, i32::MAX, i32::MAX], [i32::MIN, -3, -16_777_218]),
        ] {
            let corrected = offset.correct(&raw);
            assert_eq!(offset.restore(&corrected), raw, "corrected {corrected:?}");
        }

        let corrected = offset.correct(&sample([16_777_217, 0, 0], [0, 0, 0]));
        assert_eq!(corrected.accel.x, 16_777_216.5);
    }
}
