//! Desktop simulator for the motion tracker.
//!
//! Drives motion-core with a synthetic IMU on the wall clock and prints the
//! telemetry frames a device would send on every statistics refresh.
//!
//! Press Enter at any time to recalibrate, the way the board's button does.
//! Set `RUST_LOG=debug` to watch dispersion refreshes and label transitions.

mod imu;
mod settings;
mod transport;

use std::io::BufRead;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use motion_core::commands::{CommandChannel, RecalibrationTrigger};
use motion_core::{MotionRuntime, MotionSession};

use crate::imu::{MotionProfile, SyntheticImu, ThreadDelay};
use crate::settings::Settings;
use crate::transport::{FrameStyle, dispersion_frame, motion_frame};

/// Shared between the stdin "button" thread and the tick loop.
static COMMANDS: CommandChannel = CommandChannel::new();

#[derive(Parser, Debug)]
#[command(name = "motion-simulator")]
#[command(about = "Run the motion tracking core against a synthetic IMU", long_about = None)]
struct Args {
    /// TOML settings file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Motion to simulate, overrides the settings file
    #[arg(long, value_enum)]
    profile: Option<MotionProfile>,

    /// Run time in seconds, 0 runs until interrupted
    #[arg(long, value_name = "SECONDS")]
    duration_secs: Option<u64>,

    /// Telemetry frame layout
    #[arg(long, value_enum)]
    frames: Option<FrameStyle>,
}

impl Args {
    fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };

        let simulation = &mut settings.simulation;
        if let Some(profile) = self.profile {
            simulation.profile = profile;
        }
        if let Some(duration) = self.duration_secs {
            simulation.duration_secs = duration;
        }
        if let Some(frames) = self.frames {
            simulation.frames = frames;
        }

        Ok(settings)
    }
}

/// Forward every line on stdin as a recalibration request.
fn spawn_button() -> Result<()> {
    std::thread::Builder::new()
        .name("button".into())
        .spawn(|| {
            let trigger = RecalibrationTrigger::new(&COMMANDS);
            for line in std::io::stdin().lock().lines() {
                if line.is_err() {
                    break;
                }
                trigger.request();
            }
        })
        .context("failed to spawn stdin thread")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let settings = Args::parse().settings()?;
    let config = settings.motion;
    let simulation = settings.simulation;

    info!("Starting motion simulator");
    info!(
        "Profile {:?}, fast tick {} ms, slow tick {} ms, frames {:?}",
        simulation.profile, config.sample_period_ms, config.stats_period_ms, simulation.frames
    );
    info!("Press Enter to recalibrate");

    let mut imu = SyntheticImu::new(simulation.profile);
    let mut delay = ThreadDelay;

    // the device sits on the desk for its first calibration
    let session: MotionSession = MotionSession::start(config, &mut imu.at_rest(), &mut delay)
        .map_err(|e| anyhow::anyhow!("cannot start session: {e}"))?;
    let mut runtime = MotionRuntime::from_session(session);

    spawn_button()?;

    let started = Instant::now();
    let deadline = (simulation.duration_secs > 0)
        .then(|| Duration::from_secs(simulation.duration_secs));

    loop {
        let elapsed = started.elapsed();
        if deadline.is_some_and(|limit| elapsed >= limit) {
            break;
        }

        let now_ms = elapsed.as_millis() as u64;
        imu.advance_to(now_ms);
        let report = runtime.service(now_ms, &mut imu, &mut delay, &COMMANDS);

        if report.recalibrated {
            info!("Recalibrated, offset {:?}", runtime.session().offset());
        }

        if let Some(label) = report.activity {
            let session = runtime.session();
            let motion = motion_frame(&session.motion_reading(), simulation.frames);
            let dispersion = dispersion_frame(&session.dispersion_reading(), simulation.frames);

            match (motion, dispersion) {
                (Ok(motion), Ok(dispersion)) => {
                    println!("{} {} {}", label.code(), motion, dispersion);
                }
                _ => warn!("Telemetry frame overflowed, skipped"),
            }
        }

        let wait = runtime.until_next(started.elapsed().as_millis() as u64);
        if wait > 0 {
            std::thread::sleep(Duration::from_millis(wait));
        }
    }

    info!("Simulator exiting");
    Ok(())
}
