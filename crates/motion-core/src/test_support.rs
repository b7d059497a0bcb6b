//! Deterministic collaborators for unit tests.

use embedded_hal::delay::DelayNs;

use crate::sensors::{RawSample, SampleSource, Vector3};

pub(crate) fn sample(accel: [i32; 3], gyro: [i32; 3]) -> RawSample {
    RawSample::new(Vector3::from(accel), Vector3::from(gyro))
}

/// Replays a fixed list of samples, wrapping around at the end.
pub(crate) struct ScriptedSource<const K: usize> {
    samples: [RawSample; K],
    next: usize,
    pulled: u32,
}

impl<const K: usize> ScriptedSource<K> {
    pub(crate) fn new(samples: [RawSample; K]) -> Self {
        Self {
            samples,
            next: 0,
            pulled: 0,
        }
    }

    pub(crate) fn pulled(&self) -> u32 {
        self.pulled
    }
}

impl<const K: usize> SampleSource for ScriptedSource<K> {
    fn next_sample(&mut self) -> RawSample {
        let sample = self.samples[self.next];
        self.next = (self.next + 1) % K;
        self.pulled += 1;
        sample
    }
}

/// Records requested delays instead of sleeping.
#[derive(Default)]
pub(crate) struct CountingDelay {
    pub(crate) calls: u32,
    pub(crate) total_ns: u64,
}

impl DelayNs for CountingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.calls += 1;
        self.total_ns += ns as u64;
    }
}
