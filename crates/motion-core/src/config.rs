//! Tunable constants and the runtime configuration of a motion session.

use serde::{Deserialize, Serialize};

use crate::error::MotionError;

/// Number of samples held by the motion window unless a session picks its own.
pub const DEFAULT_WINDOW_CAPACITY: usize = 100;

/// Samples averaged per calibration run.
pub const CALIBRATION_SAMPLES: u32 = 1000;

/// Delay between two calibration reads, in microseconds.
pub const CALIBRATION_SPACING_US: u32 = 500;

/// Fast tick: one sample per period. Also the integration timestep.
pub const SAMPLE_PERIOD_MS: u32 = 10;

/// Slow tick: statistics refresh and classification.
pub const STATS_PERIOD_MS: u32 = 100;

/// Converts a corrected gyro reading (mdps) to degrees per second.
pub const GYRO_SCALE: f32 = 0.001;

/// Scaled angular rates at or below this are treated as jitter.
pub const GYRO_NOISE_FLOOR: f32 = 50.0;

/// Differential below which the device is considered at rest.
pub const LOW_THRESHOLD: f32 = 100.0;

/// Differential at or above which a high-intensity episode is running.
pub const HIGH_THRESHOLD: f32 = 1000.0;

/// Episode length (in classifications) separating a jump from a run.
pub const HYSTERESIS_TICKS: u32 = 5;

/// Runtime configuration of a motion session.
///
/// Every field has a default, so a partial TOML or JSON document only needs
/// to name the values it changes.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct MotionConfig {
    pub calibration_samples: u32,
    pub calibration_spacing_us: u32,
    pub sample_period_ms: u32,
    pub stats_period_ms: u32,
    pub gyro_scale: f32,
    pub noise_floor: f32,
    pub low_threshold: f32,
    pub high_threshold: f32,
    pub hysteresis_ticks: u32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            calibration_samples: CALIBRATION_SAMPLES,
            calibration_spacing_us: CALIBRATION_SPACING_US,
            sample_period_ms: SAMPLE_PERIOD_MS,
            stats_period_ms: STATS_PERIOD_MS,
            gyro_scale: GYRO_SCALE,
            noise_floor: GYRO_NOISE_FLOOR,
            low_threshold: LOW_THRESHOLD,
            high_threshold: HIGH_THRESHOLD,
            hysteresis_ticks: HYSTERESIS_TICKS,
        }
    }
}

impl MotionConfig {
    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> Result<(), MotionError> {
        if self.calibration_samples == 0 {
            return Err(MotionError::InvalidBatchSize(self.calibration_samples));
        }

        if self.sample_period_ms == 0 || self.stats_period_ms < self.sample_period_ms {
            return Err(MotionError::InvalidCadence {
                sample_ms: self.sample_period_ms,
                stats_ms: self.stats_period_ms,
            });
        }

        if !(self.low_threshold < self.high_threshold) {
            return Err(MotionError::InvalidThresholds {
                low: self.low_threshold,
                high: self.high_threshold,
            });
        }

        if !self.gyro_scale.is_finite() || self.gyro_scale <= 0.0 || !self.noise_floor.is_finite()
        {
            return Err(MotionError::InvalidScale {
                scale: self.gyro_scale,
                noise_floor: self.noise_floor,
            });
        }

        Ok(())
    }

    /// Integration timestep in seconds.
    pub fn timestep_secs(&self) -> f32 {
        self.sample_period_ms as f32 / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(MotionConfig::default().validate(), Ok(()));
        assert_eq!(MotionConfig::default().timestep_secs(), 0.01);
    }

    #[test]
    fn test_zero_batch_rejected() {
        let config = MotionConfig {
            calibration_samples: 0,
            ..MotionConfig::default()
        };
        assert_eq!(config.validate(), Err(MotionError::InvalidBatchSize(0)));
    }

    #[test]
    fn test_slow_tick_faster_than_fast_tick_rejected() {
        let config = MotionConfig {
            sample_period_ms: 20,
            stats_period_ms: 10,
            ..MotionConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(MotionError::InvalidCadence { .. })
        ));
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let config = MotionConfig {
            low_threshold: 1000.0,
            high_threshold: 100.0,
            ..MotionConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(MotionError::InvalidThresholds { .. })
        ));
    }

    #[test]
    fn test_nan_scale_rejected() {
        let config = MotionConfig {
            gyro_scale: f32::NAN,
            ..MotionConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(MotionError::InvalidScale { .. })
        ));
    }
}
