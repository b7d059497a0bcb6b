//! Tick loop driver.
//!
//! [`MotionRuntime`] ties a [`MotionSession`] to a [`TickSchedule`] and the
//! command channel. The caller owns the clock and the sleeping; each call to
//! [`MotionRuntime::service`] handles pending commands, then runs whatever
//! ticks have come due, all on the caller's context.

use embedded_hal::delay::DelayNs;

use crate::classifier::ActivityLabel;
use crate::commands::{self, CommandChannel};
use crate::config::{DEFAULT_WINDOW_CAPACITY, MotionConfig};
use crate::error::MotionError;
use crate::schedule::TickSchedule;
use crate::sensors::SampleSource;
use crate::session::MotionSession;

/// What one [`MotionRuntime::service`] call did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServiceReport {
    /// A recalibration ran before any tick.
    pub recalibrated: bool,
    /// Fast ticks executed.
    pub fast_ticks: u32,
    /// Label produced by the slow tick, if it ran.
    pub activity: Option<ActivityLabel>,
}

impl ServiceReport {
    pub fn is_idle(&self) -> bool {
        !self.recalibrated && self.fast_ticks == 0 && self.activity.is_none()
    }
}

pub struct MotionRuntime<const N: usize = DEFAULT_WINDOW_CAPACITY> {
    session: MotionSession<N>,
    schedule: TickSchedule,
}

impl<const N: usize> MotionRuntime<N> {
    /// Calibrate and build the runtime. No tick runs before this returns.
    pub fn start<S, D>(
        config: MotionConfig,
        source: &mut S,
        delay: &mut D,
    ) -> Result<Self, MotionError>
    where
        S: SampleSource + ?Sized,
        D: DelayNs + ?Sized,
    {
        let session = MotionSession::start(config, source, delay)?;
        Ok(Self::from_session(session))
    }

    pub fn from_session(session: MotionSession<N>) -> Self {
        let config = session.config();
        let schedule = TickSchedule::new(config.sample_period_ms, config.stats_period_ms);
        Self { session, schedule }
    }

    /// Run everything due at `now_ms`.
    ///
    /// A pending recalibration runs first and re-arms the schedule, so ticks
    /// missed while it blocked are skipped. Otherwise due fast ticks run
    /// oldest first and the slow tick, if due, runs after them.
    pub fn service<S, D>(
        &mut self,
        now_ms: u64,
        source: &mut S,
        delay: &mut D,
        commands: &CommandChannel,
    ) -> ServiceReport
    where
        S: SampleSource + ?Sized,
        D: DelayNs + ?Sized,
    {
        let mut report = ServiceReport::default();

        if commands::drain(commands).recalibrate {
            self.session.calibrate(source, delay);
            self.session.log_recalibrated();
            self.schedule.rearm();
            report.recalibrated = true;
            return report;
        }

        let due = self.schedule.poll(now_ms);
        for _ in 0..due.fast {
            self.session.fast_tick(source);
        }
        report.fast_ticks = due.fast;

        if due.slow {
            report.activity = Some(self.session.slow_tick());
        }

        report
    }

    /// Milliseconds the caller may sleep before the next tick is due.
    pub fn until_next(&self, now_ms: u64) -> u64 {
        self.schedule.until_next(now_ms)
    }

    pub fn session(&self) -> &MotionSession<N> {
        &self.session
    }
}
