//! Hardware-independent core library for motion tracking
//!
//! This crate contains all platform-agnostic logic of the wearable motion
//! tracker: sensor bias calibration, the circular motion window, dispersion
//! statistics, gyroscope integration, activity classification and the
//! fast/slow tick schedule that drives them.
//!
//! It is `#![no_std]` and allocation free so it compiles on both embedded
//! targets and desktop hosts (for the simulator and tests). Sensors, clocks,
//! buttons and radios stay on the other side of the [`sensors::SampleSource`],
//! [`embedded_hal::delay::DelayNs`] and [`commands::CommandChannel`] seams.

#![no_std]

pub mod calibration;
pub mod classifier;
pub mod commands;
pub mod config;
pub mod dispersion;
pub mod error;
pub mod orientation;
pub mod runtime;
pub mod schedule;
pub mod sensors;
pub mod session;
pub mod telemetry;
pub mod window;

#[cfg(test)]
mod test_support;

pub use calibration::{CalibrationOffset, Calibrator};
pub use classifier::{ActivityLabel, MotionClassifier};
pub use config::MotionConfig;
pub use error::MotionError;
pub use runtime::{MotionRuntime, ServiceReport};
pub use session::MotionSession;
