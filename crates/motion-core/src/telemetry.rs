//! Read-only results handed to the transport collaborators.
//!
//! The core never encodes these; formatters on the other side of the
//! boundary decide on text or bytes. Everything derives `Serialize` so a
//! `serde` backend can be used directly.

use serde::Serialize;

use crate::classifier::ActivityLabel;
use crate::dispersion::DispersionSnapshot;
use crate::sensors::Vector3;

/// Number of values in [`DispersionReading::to_array`].
pub const DISPERSION_READING_LEN: usize = 7;

/// Latest bias-corrected sample plus the integrated angles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MotionReading {
    /// Corrected acceleration, mg.
    pub accel: Vector3<f32>,
    /// Corrected angular rate, mdps.
    pub gyro: Vector3<f32>,
    /// Integrated angles, degrees.
    pub angles: Vector3<f32>,
}

/// Latest dispersion refresh, the differential and the integrated angles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DispersionReading {
    pub dispersion: DispersionSnapshot,
    pub differential: f32,
    pub angles: Vector3<f32>,
}

impl DispersionReading {
    /// Flat layout used by the low-energy link:
    /// `[x, y, z, magnitude, angle x, angle y, angle z]`.
    pub fn to_array(&self) -> [f32; DISPERSION_READING_LEN] {
        [
            self.dispersion.x,
            self.dispersion.y,
            self.dispersion.z,
            self.dispersion.magnitude,
            self.angles.x,
            self.angles.y,
            self.angles.z,
        ]
    }
}

/// Activity label as reported to the telemetry link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActivityReading {
    pub label: ActivityLabel,
    pub code: u8,
}

impl From<ActivityLabel> for ActivityReading {
    fn from(label: ActivityLabel) -> Self {
        Self {
            label,
            code: label.code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispersion_array_order() {
        let reading = DispersionReading {
            dispersion: DispersionSnapshot {
                x: 1.0,
                y: 2.0,
                z: 3.0,
                magnitude: 4.0,
            },
            differential: 99.0,
            angles: Vector3::new(5.0, 6.0, 7.0),
        };

        assert_eq!(reading.to_array(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
    }

    #[test]
    fn test_activity_reading_carries_code() {
        let reading = ActivityReading::from(ActivityLabel::Jumping);
        assert_eq!(reading.code, 4);
        assert_eq!(reading.label, ActivityLabel::Jumping);
    }
}
