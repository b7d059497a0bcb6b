//! Session state and the per-tick handlers.

use embedded_hal::delay::DelayNs;
use log::info;

use crate::calibration::{CalibrationOffset, Calibrator};
use crate::classifier::{ActivityLabel, MotionClassifier};
use crate::config::{DEFAULT_WINDOW_CAPACITY, MotionConfig};
use crate::dispersion::DispersionSnapshot;
use crate::error::MotionError;
use crate::orientation::OrientationIntegrator;
use crate::sensors::{CorrectedSample, SampleSource};
use crate::telemetry::{ActivityReading, DispersionReading, MotionReading};
use crate::window::{DeltaSignal, MotionWindow};

/// Everything the motion core remembers between ticks.
///
/// One value of this type replaces the set of globals a firmware would
/// otherwise keep. Tick handlers take `&mut self`, so exclusive access during
/// a tick is enforced by the borrow checker; sharing across contexts goes
/// through [`crate::commands`].
///
/// A session always holds a valid calibration offset: it is either created by
/// [`MotionSession::start`], which calibrates first, or handed one explicitly.
pub struct MotionSession<const N: usize = DEFAULT_WINDOW_CAPACITY> {
    config: MotionConfig,
    calibrator: Calibrator,
    offset: CalibrationOffset,
    latest: CorrectedSample,
    deltas: DeltaSignal,
    window: MotionWindow<N>,
    differential: f32,
    orientation: OrientationIntegrator,
    dispersion: DispersionSnapshot,
    classifier: MotionClassifier,
}

impl<const N: usize> MotionSession<N> {
    /// Validate `config`, run the first calibration and return a session
    /// ready for ticking.
    pub fn start<S, D>(
        config: MotionConfig,
        source: &mut S,
        delay: &mut D,
    ) -> Result<Self, MotionError>
    where
        S: SampleSource + ?Sized,
        D: DelayNs + ?Sized,
    {
        let mut session = Self::with_offset(config, CalibrationOffset::default())?;
        session.calibrate(source, delay);
        Ok(session)
    }

    /// Build a session around an offset obtained elsewhere.
    pub fn with_offset(
        config: MotionConfig,
        offset: CalibrationOffset,
    ) -> Result<Self, MotionError> {
        config.validate()?;
        let calibrator =
            Calibrator::new(config.calibration_samples, config.calibration_spacing_us)?;

        Ok(Self {
            config,
            calibrator,
            offset,
            latest: CorrectedSample::default(),
            deltas: DeltaSignal::new(),
            window: MotionWindow::new(),
            differential: 0.0,
            orientation: OrientationIntegrator::new(config.gyro_scale, config.noise_floor),
            dispersion: DispersionSnapshot::default(),
            classifier: MotionClassifier::from_config(&config),
        })
    }

    /// Re-estimate the bias and drop every value derived from the old one.
    ///
    /// Blocks for the whole batch; no tick may run in between.
    pub fn calibrate<S, D>(&mut self, source: &mut S, delay: &mut D) -> CalibrationOffset
    where
        S: SampleSource + ?Sized,
        D: DelayNs + ?Sized,
    {
        self.reset_derived_state();
        self.offset = self.calibrator.run(source, delay);
        self.offset
    }

    fn reset_derived_state(&mut self) {
        self.latest = CorrectedSample::default();
        self.deltas.reset();
        self.window.clear();
        self.differential = 0.0;
        self.orientation.reset();
        self.dispersion = DispersionSnapshot::default();
        self.classifier.reset();
    }

    /// Per-sample update: correct, extend the window, integrate orientation.
    pub fn fast_tick<S>(&mut self, source: &mut S)
    where
        S: SampleSource + ?Sized,
    {
        let corrected = self.offset.correct(&source.next_sample());
        let accel = corrected.accel.as_f32();

        let delta = self.deltas.update(accel);
        self.window.insert(delta, accel.norm());
        self.differential = delta.norm();

        self.orientation
            .step(corrected.gyro.as_f32(), self.config.timestep_secs());
        self.latest = corrected;
    }

    /// Periodic refresh: recompute dispersion over the window and classify
    /// the latest differential.
    pub fn slow_tick(&mut self) -> ActivityLabel {
        self.dispersion = DispersionSnapshot::from_window(&self.window);
        self.classifier.classify(self.differential, self.window.cursor())
    }

    /// Announce a finished recalibration.
    pub(crate) fn log_recalibrated(&self) {
        info!(
            "Session recalibrated, window of {} samples cleared",
            self.window.capacity()
        );
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    pub fn offset(&self) -> CalibrationOffset {
        self.offset
    }

    pub fn window(&self) -> &MotionWindow<N> {
        &self.window
    }

    pub fn classifier(&self) -> &MotionClassifier {
        &self.classifier
    }

    /// Norm of the most recent delta triple.
    pub fn differential(&self) -> f32 {
        self.differential
    }

    pub fn motion_reading(&self) -> MotionReading {
        MotionReading {
            accel: self.latest.accel.as_f32(),
            gyro: self.latest.gyro.as_f32(),
            angles: self.orientation.angles(),
        }
    }

    pub fn dispersion_reading(&self) -> DispersionReading {
        DispersionReading {
            dispersion: self.dispersion,
            differential: self.differential,
            angles: self.orientation.angles(),
        }
    }

    pub fn activity(&self) -> ActivityLabel {
        self.classifier.label()
    }

    pub fn activity_reading(&self) -> ActivityReading {
        self.activity().into()
    }
}
