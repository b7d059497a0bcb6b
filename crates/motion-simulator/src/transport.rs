//! Text frames for the telemetry link.
//!
//! Frames are written into fixed-capacity `heapless` strings, the same way a
//! firmware would fill its radio buffer. Serial frames carry a short tag in
//! front of the JSON body so a host can tell the two kinds apart on one line
//! based stream.

use core::fmt::Write;

use clap::ValueEnum;
use heapless::String;
use motion_core::telemetry::{DispersionReading, MotionReading};
use serde::Deserialize;

/// Large enough for either frame with five-digit values on every field.
pub const FRAME_CAPACITY: usize = 192;

pub type Frame = String<FRAME_CAPACITY>;

/// Which link the frames are formatted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameStyle {
    /// Bare JSON object, as sent over the wireless link.
    Wireless,
    /// JSON prefixed with `sen` / `std`.
    Serial,
}

/// `{"ax":..,"ay":..,"az":..,"gx":..,"gy":..,"gz":..}`
///
/// Acceleration is rounded to whole mg, angular rate is reported in dps.
pub fn motion_frame(reading: &MotionReading, style: FrameStyle) -> Result<Frame, core::fmt::Error> {
    let mut frame = Frame::new();
    if style == FrameStyle::Serial {
        frame.write_str("sen")?;
    }

    let gyro = reading.gyro.map(|v| v / 1000.0);
    write!(
        frame,
        "{{\"ax\":{:.0},\"ay\":{:.0},\"az\":{:.0},\"gx\":{:.2},\"gy\":{:.2},\"gz\":{:.2}}}",
        reading.accel.x, reading.accel.y, reading.accel.z, gyro.x, gyro.y, gyro.z
    )?;

    Ok(frame)
}

/// `{"ax":..,"ay":..,"az":..,"all":..,"diff":..,"ang0":..,"ang1":..,"ang2":..}`
///
/// The serial variant omits `diff`.
pub fn dispersion_frame(
    reading: &DispersionReading,
    style: FrameStyle,
) -> Result<Frame, core::fmt::Error> {
    let mut frame = Frame::new();
    let d = &reading.dispersion;

    match style {
        FrameStyle::Serial => write!(
            frame,
            "std{{\"ax\":{:.2},\"ay\":{:.2},\"az\":{:.2},\"all\":{:.2},",
            d.x, d.y, d.z, d.magnitude
        )?,
        FrameStyle::Wireless => write!(
            frame,
            "{{\"ax\":{:.2},\"ay\":{:.2},\"az\":{:.2},\"all\":{:.2},\"diff\":{:.2},",
            d.x, d.y, d.z, d.magnitude, reading.differential
        )?,
    }

    write!(
        frame,
        "\"ang0\":{:.0},\"ang1\":{:.0},\"ang2\":{:.0}}}",
        reading.angles.x, reading.angles.y, reading.angles.z
    )?;

    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use motion_core::dispersion::DispersionSnapshot;
    use motion_core::sensors::Vector3;

    #[test]
    fn test_motion_frame_layout() {
        let reading = MotionReading {
            accel: Vector3::new(12.4, -3.0, 998.6),
            gyro: Vector3::new(1500.0, -250.0, 0.0),
            angles: Vector3::ZERO,
        };

        let frame = motion_frame(&reading, FrameStyle::Wireless).unwrap();
        assert_eq!(
            frame.as_str(),
            "{\"ax\":12,\"ay\":-3,\"az\":999,\"gx\":1.50,\"gy\":-0.25,\"gz\":0.00}"
        );

        let frame = motion_frame(&reading, FrameStyle::Serial).unwrap();
        assert!(frame.starts_with("sen{\"ax\":12,"));
    }

    #[test]
    fn test_dispersion_frame_layout() {
        let reading = DispersionReading {
            dispersion: DispersionSnapshot {
                x: 1.0,
                y: 2.5,
                z: 0.1,
                magnitude: 40.0,
            },
            differential: 321.0,
            angles: Vector3::new(90.4, -12.0, 0.0),
        };

        let frame = dispersion_frame(&reading, FrameStyle::Wireless).unwrap();
        assert_eq!(
            frame.as_str(),
            "{\"ax\":1.00,\"ay\":2.50,\"az\":0.10,\"all\":40.00,\"diff\":321.00,\
             \"ang0\":90,\"ang1\":-12,\"ang2\":0}"
        );

        let frame = dispersion_frame(&reading, FrameStyle::Serial).unwrap();
        assert!(frame.starts_with("std{"));
        assert!(!frame.contains("diff"));
    }

    #[test]
    fn test_extreme_values_fit() {
        let big = Vector3::splat(-99_999.99);
        let reading = DispersionReading {
            dispersion: DispersionSnapshot {
                x: 99_999.99,
                y: 99_999.99,
                z: 99_999.99,
                magnitude: 99_999.99,
            },
            differential: 99_999.99,
            angles: big,
        };

        assert!(dispersion_frame(&reading, FrameStyle::Wireless).is_ok());
        assert!(
            motion_frame(
                &MotionReading {
                    accel: big,
                    gyro: big,
                    angles: big
                },
                FrameStyle::Serial
            )
            .is_ok()
        );
    }
}
