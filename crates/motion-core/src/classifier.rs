//! Activity classification from the acceleration differential.
//!
//! The classifier looks at one number per call, the differential (norm of the
//! latest frame-to-frame acceleration delta), and keeps a short memory of how
//! long the differential has stayed high:
//!
//! | Differential | Episode | Result |
//! |---|---|---|
//! | `< low` | active, length `> hysteresis` | Jumping, episode continues |
//! | `< low` | otherwise | Stationary, episode cleared |
//! | `< high` | active, length `< hysteresis` | Jumping, episode continues |
//! | `< high` | otherwise | Walking, episode cleared |
//! | `>= high` | none | episode starts at the buffer position |
//! | `>= high` | active | episode continues |
//! | `>= high` | length `> hysteresis` | Running |
//! | `>= high` | length `<= hysteresis` | previous label is held |
//!
//! A short burst that falls back into the walking band is a jump; a burst
//! that stays high long enough is a run.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::MotionConfig;

/// Physical activity reported to telemetry.
///
/// The discriminants are the codes sent over the wireless link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ActivityLabel {
    Stationary = 1,
    Walking = 2,
    Running = 3,
    Jumping = 4,
}

impl ActivityLabel {
    /// Telemetry code of this label.
    pub const fn code(self) -> u8 {
        self as u8
    }

    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Stationary),
            2 => Some(Self::Walking),
            3 => Some(Self::Running),
            4 => Some(Self::Jumping),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Stationary => "stand",
            Self::Walking => "walk",
            Self::Running => "run",
            Self::Jumping => "jump",
        }
    }
}

/// A run of classifications with a high differential.
///
/// `start` is the window position the episode began at; `end` advances by one
/// per classification that extends it, so `end >= start` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Episode {
    start: usize,
    end: usize,
}

impl Episode {
    const fn at(position: usize) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    const fn len(&self) -> usize {
        self.end - self.start
    }
}

/// Hysteresis classifier over the differential signal.
///
/// Whether an episode is active is tracked explicitly, not by a zero start
/// position, so an episode anchored at window slot 0 counts as active.
#[derive(Debug, Clone, Copy)]
pub struct MotionClassifier {
    label: ActivityLabel,
    episode: Option<Episode>,
    low_threshold: f32,
    high_threshold: f32,
    hysteresis: usize,
}

impl MotionClassifier {
    pub const fn new(low_threshold: f32, high_threshold: f32, hysteresis: usize) -> Self {
        Self {
            label: ActivityLabel::Stationary,
            episode: None,
            low_threshold,
            high_threshold,
            hysteresis,
        }
    }

    pub fn from_config(config: &MotionConfig) -> Self {
        Self::new(
            config.low_threshold,
            config.high_threshold,
            config.hysteresis_ticks as usize,
        )
    }

    /// Classify one differential reading.
    ///
    /// `position` is the motion window cursor; it anchors a new episode.
    pub fn classify(&mut self, differential: f32, position: usize) -> ActivityLabel {
        let previous = self.label;

        self.label = if differential < self.low_threshold {
            match self.episode {
                Some(ref mut episode) if episode.len() > self.hysteresis => {
                    episode.end += 1;
                    ActivityLabel::Jumping
                }
                _ => {
                    self.episode = None;
                    ActivityLabel::Stationary
                }
            }
        } else if differential < self.high_threshold {
            match self.episode {
                Some(ref mut episode) if episode.len() < self.hysteresis => {
                    episode.end += 1;
                    ActivityLabel::Jumping
                }
                _ => {
                    self.episode = None;
                    ActivityLabel::Walking
                }
            }
        } else {
            let episode = match self.episode {
                Some(ref mut episode) => {
                    episode.end += 1;
                    *episode
                }
                None => {
                    let episode = Episode::at(position);
                    self.episode = Some(episode);
                    episode
                }
            };

            if episode.len() > self.hysteresis {
                ActivityLabel::Running
            } else {
                // too early to call: keep reporting what we had
                self.label
            }
        };

        if self.label != previous {
            debug!(
                "Activity {} -> {} (differential {:.1})",
                previous.label(),
                self.label.label(),
                differential
            );
        }

        self.label
    }

    /// Most recently reported label.
    pub fn label(&self) -> ActivityLabel {
        self.label
    }

    /// Window position the current episode started at, 0 without an episode.
    pub fn ramp_start(&self) -> usize {
        self.episode.map_or(0, |e| e.start)
    }

    /// Position the current episode has advanced to, 0 without an episode.
    pub fn ramp_end(&self) -> usize {
        self.episode.map_or(0, |e| e.end)
    }

    pub fn episode_active(&self) -> bool {
        self.episode.is_some()
    }

    /// Back to Stationary with no episode.
    pub fn reset(&mut self) {
        self.label = ActivityLabel::Stationary;
        self.episode = None;
    }
}

impl Default for MotionClassifier {
    fn default() -> Self {
        Self::from_config(&MotionConfig::default())
    }
}
