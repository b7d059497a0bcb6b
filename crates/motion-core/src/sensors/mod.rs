//! Sample types exchanged with the sensor collaborator.

mod vector;

pub use vector::Vector3;

use serde::{Deserialize, Serialize};

/// One raw reading as delivered by the board support package.
///
/// Acceleration is in milli-g and angular rate in milli-degrees per second,
/// both still carrying the sensor's static bias.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSample {
    pub accel: Vector3<i32>,
    pub gyro: Vector3<i32>,
}

impl RawSample {
    pub const fn new(accel: Vector3<i32>, gyro: Vector3<i32>) -> Self {
        Self { accel, gyro }
    }
}

/// A raw sample with the calibration offset removed.
///
/// Kept in `f64` so that adding the offset back recovers the raw integers
/// exactly; the signal pipeline narrows to `f32` after correction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrectedSample {
    pub accel: Vector3<f64>,
    pub gyro: Vector3<f64>,
}

/// Trait for anything that can hand the core one accelerometer/gyroscope pair
/// on demand.
///
/// Reads cannot fail from the core's point of view: a disconnected or
/// saturated sensor simply produces biased data.
pub trait SampleSource {
    /// Pull the next raw reading.
    fn next_sample(&mut self) -> RawSample;
}

impl<S: SampleSource + ?Sized> SampleSource for &mut S {
    fn next_sample(&mut self) -> RawSample {
        (**self).next_sample()
    }
}
