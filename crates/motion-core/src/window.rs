//! Fixed-capacity circular window of recent motion signals.
//!
//! Four channels share a single write cursor: the per-axis frame-to-frame
//! acceleration delta and the magnitude of the corrected acceleration. All
//! four always hold the same logical samples, so an index means the same
//! instant in every channel.

use serde::{Deserialize, Serialize};

use crate::sensors::Vector3;

/// One of the four window channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Channel {
    X,
    Y,
    Z,
    Magnitude,
}

impl Channel {
    pub const ALL: [Channel; 4] = [Channel::X, Channel::Y, Channel::Z, Channel::Magnitude];

    /// Short label, matching the keys used by the telemetry frames.
    pub const fn label(self) -> &'static str {
        match self {
            Self::X => "ax",
            Self::Y => "ay",
            Self::Z => "az",
            Self::Magnitude => "all",
        }
    }
}

/// Circular window holding the most recent `N` samples of every channel.
///
/// Insertion never allocates. There is no "full" flag: once `N` samples have
/// been written the oldest one is overwritten on every insert.
#[derive(Debug, Clone)]
pub struct MotionWindow<const N: usize> {
    x: [f32; N],
    y: [f32; N],
    z: [f32; N],
    magnitude: [f32; N],
    cursor: usize,
}

/// Read-only view of all four channels, in storage order.
#[derive(Debug, Clone, Copy)]
pub struct WindowView<'a, const N: usize> {
    pub x: &'a [f32; N],
    pub y: &'a [f32; N],
    pub z: &'a [f32; N],
    pub magnitude: &'a [f32; N],
    /// Slot the next insert will write.
    pub cursor: usize,
}

impl<const N: usize> MotionWindow<N> {
    pub const fn new() -> Self {
        const { assert!(N > 0, "motion window capacity must be non-zero") };

        Self {
            x: [0.0; N],
            y: [0.0; N],
            z: [0.0; N],
            magnitude: [0.0; N],
            cursor: 0,
        }
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Slot the next insert will write.
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Write one sample into every channel and advance the shared cursor.
    pub fn insert(&mut self, delta: Vector3<f32>, magnitude: f32) {
        let slot = self.cursor;
        self.x[slot] = delta.x;
        self.y[slot] = delta.y;
        self.z[slot] = delta.z;
        self.magnitude[slot] = magnitude;
        self.cursor = (slot + 1) % N;
    }

    /// Delta triple most recently written.
    pub fn latest_delta(&self) -> Vector3<f32> {
        let slot = (self.cursor + N - 1) % N;
        Vector3::new(self.x[slot], self.y[slot], self.z[slot])
    }

    pub fn channel(&self, channel: Channel) -> &[f32; N] {
        match channel {
            Channel::X => &self.x,
            Channel::Y => &self.y,
            Channel::Z => &self.z,
            Channel::Magnitude => &self.magnitude,
        }
    }

    pub fn snapshot(&self) -> WindowView<'_, N> {
        WindowView {
            x: &self.x,
            y: &self.y,
            z: &self.z,
            magnitude: &self.magnitude,
            cursor: self.cursor,
        }
    }

    /// Zero every channel and rewind the cursor.
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

impl<const N: usize> Default for MotionWindow<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Turns successive corrected readings into frame-to-frame deltas.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeltaSignal {
    previous: Vector3<f32>,
}

impl DeltaSignal {
    pub const fn new() -> Self {
        Self {
            previous: Vector3::ZERO,
        }
    }

    /// Difference to the previous reading. The reading then becomes the new
    /// previous value, every call.
    pub fn update(&mut self, current: Vector3<f32>) -> Vector3<f32> {
        let delta = current - self.previous;
        self.previous = current;
        delta
    }

    pub fn reset(&mut self) {
        self.previous = Vector3::ZERO;
    }
}
