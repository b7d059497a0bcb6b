//! Synthetic IMU and host delay.

use std::f64::consts::TAU;
use std::time::Duration;

use clap::ValueEnum;
use embedded_hal::delay::DelayNs;
use motion_core::sensors::{RawSample, SampleSource, Vector3};
use serde::Deserialize;

/// Static bias the synthetic sensor reports at rest, mg and mdps.
const ACCEL_BIAS: [f64; 3] = [18.0, -25.0, 1_000.0];
const GYRO_BIAS: [f64; 3] = [420.0, -310.0, 95.0];

/// Seconds each profile lasts in [`MotionProfile::Mixed`].
const MIXED_SEGMENT_SECS: f64 = 8.0;

/// Kind of movement the synthetic sensor produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MotionProfile {
    Stationary,
    Walking,
    Running,
    Jumping,
    /// Cycle through the four profiles above.
    Mixed,
}

impl MotionProfile {
    const CYCLE: [MotionProfile; 4] = [
        MotionProfile::Stationary,
        MotionProfile::Walking,
        MotionProfile::Running,
        MotionProfile::Jumping,
    ];

    /// Concrete profile active at `t` seconds.
    fn at(self, t: f64) -> MotionProfile {
        match self {
            Self::Mixed => {
                let segment = (t / MIXED_SEGMENT_SECS) as usize % Self::CYCLE.len();
                Self::CYCLE[segment]
            }
            other => other,
        }
    }
}

/// Generates biased accelerometer/gyroscope readings that vary over time.
///
/// Motion is a sample-to-sample swing on the vertical axis, sized so the
/// differential lands in the band of the selected activity. Which activity is
/// active follows the clock set with [`SyntheticImu::advance_to`]; pulling
/// samples never moves it, so a calibration batch sees a single instant.
pub struct SyntheticImu {
    profile: MotionProfile,
    now_secs: f64,
    samples: u64,
}

impl SyntheticImu {
    pub fn new(profile: MotionProfile) -> Self {
        Self {
            profile,
            now_secs: 0.0,
            samples: 0,
        }
    }

    /// Move the simulated clock to `now_ms`.
    pub fn advance_to(&mut self, now_ms: u64) {
        self.now_secs = now_ms as f64 / 1000.0;
    }

    /// Profile in effect at the current simulated time.
    pub fn active_profile(&self) -> MotionProfile {
        self.profile.at(self.now_secs)
    }

    /// Source that reports the device held still, whatever the profile.
    pub fn at_rest(&mut self) -> AtRest<'_> {
        AtRest(self)
    }

    /// Vertical swing and yaw rate for one sample, mg and mdps.
    fn motion(&self, profile: MotionProfile) -> (f64, f64) {
        let t = self.now_secs;
        let alternate = if self.samples % 2 == 0 { 1.0 } else { -1.0 };

        match profile {
            // at rest the only motion is sensor noise
            MotionProfile::Stationary | MotionProfile::Mixed => (0.0, 0.0),
            MotionProfile::Walking => (150.0 * alternate, 30_000.0 * (TAU * 0.5 * t).sin()),
            MotionProfile::Running => (700.0 * alternate, 120_000.0 * (TAU * 1.5 * t).sin()),
            MotionProfile::Jumping => {
                // 200 ms of take-off and landing every second, walking-like otherwise
                let amplitude = if t.fract() < 0.2 { 700.0 } else { 150.0 };
                (amplitude * alternate, 0.0)
            }
        }
    }

    fn sample(&mut self, profile: MotionProfile) -> RawSample {
        let (swing, yaw) = self.motion(profile);
        let s = self.samples as f64;
        self.samples += 1;

        // a few mg / mdps of deterministic jitter on every axis
        let noise = |phase: f64| 3.0 * (s * 0.37 + phase).sin() + 2.0 * (s * 0.91 + phase).cos();

        let accel = Vector3::new(
            ACCEL_BIAS[0] + noise(0.0),
            ACCEL_BIAS[1] + noise(1.0),
            ACCEL_BIAS[2] + swing + noise(2.0),
        );
        let gyro = Vector3::new(
            GYRO_BIAS[0] + 10.0 * noise(3.0),
            GYRO_BIAS[1] + 10.0 * noise(4.0),
            GYRO_BIAS[2] + yaw + 10.0 * noise(5.0),
        );

        RawSample::new(
            accel.map(|v| v.round() as i32),
            gyro.map(|v| v.round() as i32),
        )
    }
}

impl SampleSource for SyntheticImu {
    fn next_sample(&mut self) -> RawSample {
        let profile = self.active_profile();
        self.sample(profile)
    }
}

/// See [`SyntheticImu::at_rest`].
pub struct AtRest<'a>(&'a mut SyntheticImu);

impl SampleSource for AtRest<'_> {
    fn next_sample(&mut self) -> RawSample {
        self.0.sample(MotionProfile::Stationary)
    }
}

/// [`DelayNs`] backed by `std::thread::sleep`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadDelay;

impl DelayNs for ThreadDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(ns as u64));
    }
}
