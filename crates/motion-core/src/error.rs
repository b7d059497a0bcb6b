//! Error type for the motion core

use thiserror_no_std::Error;

/// Configuration errors.
///
/// The core has no runtime failure path: sensor reads cannot fail and all
/// arithmetic is well defined. Everything here is rejected up front, before
/// any sample is processed.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum MotionError {
    #[error("Calibration batch size must be at least 1, got {0}")]
    InvalidBatchSize(u32),
    #[error("Tick periods invalid: sample period {sample_ms} ms, stats period {stats_ms} ms")]
    InvalidCadence { sample_ms: u32, stats_ms: u32 },
    #[error("Classifier thresholds invalid: low {low} must be below high {high}")]
    InvalidThresholds { low: f32, high: f32 },
    #[error("Gyro scale and noise floor must be finite, scale positive: scale {scale}, floor {noise_floor}")]
    InvalidScale { scale: f32, noise_floor: f32 },
}
