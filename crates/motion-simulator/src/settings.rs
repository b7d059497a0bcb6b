//! Simulator settings file.
//!
//! ```toml
//! [motion]
//! calibration_samples = 500
//! high_threshold = 900.0
//!
//! [simulation]
//! profile = "mixed"
//! duration_secs = 40
//! frames = "serial"
//! ```
//!
//! Both tables and every key are optional. Command line flags override the
//! `[simulation]` table.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use motion_core::MotionConfig;
use serde::Deserialize;

use crate::imu::MotionProfile;
use crate::transport::FrameStyle;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub motion: MotionConfig,
    pub simulation: SimulationSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationSettings {
    pub profile: MotionProfile,
    /// 0 runs until interrupted.
    pub duration_secs: u64,
    pub frames: FrameStyle,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            profile: MotionProfile::Mixed,
            duration_secs: 0,
            frames: FrameStyle::Wireless,
        }
    }
}

impl Settings {
    pub fn from_toml(raw: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(raw).context("invalid TOML settings")?;
        settings
            .motion
            .validate()
            .map_err(|e| anyhow::anyhow!("invalid [motion] table: {e}"))?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        Self::from_toml(&raw).with_context(|| format!("in {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_all_defaults() {
        let settings = Settings::from_toml("").unwrap();
        assert_eq!(settings.motion, MotionConfig::default());
        assert_eq!(settings.simulation.profile, MotionProfile::Mixed);
        assert_eq!(settings.simulation.frames, FrameStyle::Wireless);
    }

    #[test]
    fn test_partial_tables() {
        let settings = Settings::from_toml(
            r#"
            [motion]
            calibration_samples = 200
            high_threshold = 900.0

            [simulation]
            profile = "running"
            frames = "serial"
            "#,
        )
        .unwrap();

        assert_eq!(settings.motion.calibration_samples, 200);
        assert_eq!(settings.motion.high_threshold, 900.0);
        assert_eq!(settings.motion.low_threshold, 100.0);
        assert_eq!(settings.simulation.profile, MotionProfile::Running);
        assert_eq!(settings.simulation.frames, FrameStyle::Serial);
    }

    #[test]
    fn test_invalid_motion_table_rejected() {
        let err = Settings::from_toml("[motion]\nlow_threshold = 2000.0\n").unwrap_err();
        assert!(format!("{err:#}").contains("low 2000"));
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(Settings::from_toml("[simulation]\nspeed = 3\n").is_err());
    }
}
