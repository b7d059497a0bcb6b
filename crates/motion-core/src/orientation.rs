//! Relative orientation from integrated gyroscope rate.

use serde::{Deserialize, Serialize};

use crate::sensors::Vector3;

/// Accumulates a rotation angle per axis using the trapezoidal rule.
///
/// Rates whose scaled magnitude does not exceed the noise floor are not
/// integrated. The previous rate is still recorded for those ticks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrientationIntegrator {
    angles: Vector3<f32>,
    previous_rate: Vector3<f32>,
    scale: f32,
    noise_floor: f32,
}

impl OrientationIntegrator {
    pub const fn new(scale: f32, noise_floor: f32) -> Self {
        Self {
            angles: Vector3::ZERO,
            previous_rate: Vector3::ZERO,
            scale,
            noise_floor,
        }
    }

    /// Advance every axis by one tick of `timestep_secs` and return the
    /// accumulated angles.
    pub fn step(&mut self, rate: Vector3<f32>, timestep_secs: f32) -> Vector3<f32> {
        let scale = self.scale;
        let noise_floor = self.noise_floor;

        let integrate = |angle: f32, current: f32, previous: f32| {
            if libm::fabsf(current) * scale > noise_floor {
                angle + (current + previous) / 2.0 * timestep_secs * scale
            } else {
                angle
            }
        };

        self.angles = Vector3::new(
            integrate(self.angles.x, rate.x, self.previous_rate.x),
            integrate(self.angles.y, rate.y, self.previous_rate.y),
            integrate(self.angles.z, rate.z, self.previous_rate.z),
        );
        self.previous_rate = rate;

        self.angles
    }

    pub fn angles(&self) -> Vector3<f32> {
        self.angles
    }

    /// Zero the angles and the remembered rate.
    pub fn reset(&mut self) {
        self.angles = Vector3::ZERO;
        self.previous_rate = Vector3::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GYRO_NOISE_FLOOR, GYRO_SCALE};
    use approx::assert_relative_eq;

    const DT: f32 = 0.01;

    fn integrator() -> OrientationIntegrator {
        OrientationIntegrator::new(GYRO_SCALE, GYRO_NOISE_FLOOR)
    }

    #[test]
    fn test_sub_floor_rates_never_integrate() {
        let mut orientation = integrator();
        // 49_999 mdps scales to just under 50 dps
        let rates = [
            Vector3::new(49_999.0, -49_999.0, 0.0),
            Vector3::new(-20_000.0, 10.0, 49_000.0),
            Vector3::new(45_000.0, -45_000.0, 1.0),
        ];

        for _ in 0..500 {
            for rate in rates {
                orientation.step(rate, DT);
            }
        }

        assert_eq!(orientation.angles(), Vector3::ZERO);
    }

    #[test]
    fn test_rate_above_floor_integrates_monotonically() {
        let mut orientation = integrator();
        let rate = Vector3::new(50_001.0, 0.0, -50_001.0);

        let mut last = orientation.angles();
        for _ in 0..200 {
            let angles = orientation.step(rate, DT);
            assert!(angles.x > last.x);
            assert!(angles.z < last.z);
            assert_eq!(angles.y, 0.0);
            last = angles;
        }

        // first tick averages against a zero previous rate, then full steps
        let expected = 50_001.0 * GYRO_SCALE * DT * 199.5;
        assert_relative_eq!(last.x, expected, max_relative = 1e-4);
        assert_relative_eq!(last.z, -expected, max_relative = 1e-4);
    }

    #[test]
    fn test_trapezoid_uses_previous_rate_even_when_gated() {
        let mut orientation = integrator();

        // below the floor: no integration, but remembered
        orientation.step(Vector3::new(40_000.0, 0.0, 0.0), DT);
        assert_eq!(orientation.angles().x, 0.0);

        // (60_000 + 40_000) / 2 * 0.01 * 0.001
        let angles = orientation.step(Vector3::new(60_000.0, 0.0, 0.0), DT);
        assert_relative_eq!(angles.x, 0.5, max_relative = 1e-6);
    }

    #[test]
    fn test_reset_clears_state() {
        let mut orientation = integrator();
        orientation.step(Vector3::splat(90_000.0), DT);
        orientation.reset();
        assert_eq!(orientation.angles(), Vector3::ZERO);

        // previous rate was cleared as well: half step against zero
        let angles = orientation.step(Vector3::new(90_000.0, 0.0, 0.0), DT);
        assert_relative_eq!(angles.x, 0.45, max_relative = 1e-6);
    }
}
