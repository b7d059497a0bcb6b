//! Statistics over the motion window

use log::debug;
use serde::{Deserialize, Serialize};

use crate::window::{Channel, MotionWindow};

/// Sum of all values.
pub fn sum(values: &[f32]) -> f32 {
    values.iter().sum()
}

/// Arithmetic mean over the full slice.
pub fn mean(values: &[f32]) -> f32 {
    sum(values) / values.len() as f32
}

/// Sum of squared deviations from the mean, Σ(x - mean)².
///
/// Deliberately not divided by the length; [`std_dev`] does that once before
/// taking the square root.
pub fn variance(values: &[f32]) -> f32 {
    let mean = mean(values);
    values
        .iter()
        .map(|v| {
            let d = v - mean;
            d * d
        })
        .sum()
}

/// Population standard deviation, sqrt(Σ(x - mean)² / n).
///
/// Recomputed from scratch in one O(n) pass per call. Callers never pass an
/// empty slice: window capacity is checked to be non-zero at compile time.
pub fn std_dev(values: &[f32]) -> f32 {
    libm::sqrtf(variance(values) / values.len() as f32)
}

/// Computes dispersion of a [`MotionWindow`] channel.
pub struct DispersionEngine;

impl DispersionEngine {
    /// Standard deviation of one channel over the whole window.
    ///
    /// Before the window has wrapped the untouched slots still count as zero;
    /// cold-start values are small but well defined.
    pub fn compute_std_dev<const N: usize>(window: &MotionWindow<N>, channel: Channel) -> f32 {
        std_dev(window.channel(channel))
    }
}

/// Standard deviation of every window channel at one refresh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DispersionSnapshot {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub magnitude: f32,
}

impl DispersionSnapshot {
    /// Read the whole window once per channel. Does not modify it.
    pub fn from_window<const N: usize>(window: &MotionWindow<N>) -> Self {
        let snapshot = Self {
            x: DispersionEngine::compute_std_dev(window, Channel::X),
            y: DispersionEngine::compute_std_dev(window, Channel::Y),
            z: DispersionEngine::compute_std_dev(window, Channel::Z),
            magnitude: DispersionEngine::compute_std_dev(window, Channel::Magnitude),
        };

        debug!(
            "Dispersion: x={:.2} y={:.2} z={:.2} all={:.2}",
            snapshot.x, snapshot.y, snapshot.z, snapshot.magnitude
        );

        snapshot
    }

    pub fn get(&self, channel: Channel) -> f32 {
        match channel {
            Channel::X => self.x,
            Channel::Y => self.y,
            Channel::Z => self.z,
            Channel::Magnitude => self.magnitude,
        }
    }
}
