//! The per-frame loop: uniform write, one strip draw, one reschedule.

use tracing::{debug, warn};

use crate::compile::UniformSlot;
use crate::error::FrameError;

/// Outcome of a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// The quad was drawn and presented.
    Presented,
    /// Nothing was drawn (zero-area surface or an acquire timeout).
    Skipped,
    /// The surface was lost or outdated and has been reconfigured.
    Recovered,
}

/// Something that can receive the time uniform and draw the uploaded quad.
pub trait FrameTarget {
    /// Writes `seconds` into the resolved time uniform.
    fn write_time(&mut self, slot: UniformSlot, seconds: f32);
    /// Draws the four-vertex strip once.
    fn draw_quad(&mut self) -> Result<FrameStatus, FrameError>;
}

/// Host facility that runs the frame callback before the next repaint.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> Result<(), FrameError>;
}

/// Converts a host frame timestamp in milliseconds into shader seconds.
pub fn timestamp_seconds(timestamp_ms: f64) -> f32 {
    (timestamp_ms * 0.001) as f32
}

/// Rolling frames-per-second counter fed by frame timestamps.
#[derive(Debug, Clone, Default)]
pub struct FrameStats {
    window_start_ms: Option<f64>,
    frames_in_window: u32,
    frames_per_second: f32,
}

impl FrameStats {
    const WINDOW_MS: f64 = 1000.0;

    /// Counts a frame; returns the new rate whenever a one-second window closes.
    pub fn record(&mut self, timestamp_ms: f64) -> Option<f32> {
        let start = *self.window_start_ms.get_or_insert(timestamp_ms);
        self.frames_in_window += 1;

        let elapsed = timestamp_ms - start;
        if elapsed < Self::WINDOW_MS {
            return None;
        }
        self.frames_per_second = (f64::from(self.frames_in_window) * 1000.0 / elapsed) as f32;
        self.frames_in_window = 0;
        self.window_start_ms = Some(timestamp_ms);
        Some(self.frames_per_second)
    }

    pub fn frames_per_second(&self) -> f32 {
        self.frames_per_second
    }
}

/// Drives the continuous animation over a ready-to-draw target.
///
/// A driver can only be built from a target, and the GPU target can only be
/// built from a linked pipeline, so no draw is ever issued before start-up
/// succeeded.
pub struct AnimationDriver<T> {
    target: T,
    time_uniform: Option<UniformSlot>,
    stats: FrameStats,
    log_fps: bool,
}

impl<T: FrameTarget> AnimationDriver<T> {
    pub fn new(target: T, time_uniform: Option<UniformSlot>) -> Self {
        if time_uniform.is_none() {
            debug!("time uniform not found; frames will not update it");
        }
        Self {
            target,
            time_uniform,
            stats: FrameStats::default(),
            log_fps: false,
        }
    }

    /// Emits a `debug` line with the frame rate once per second.
    pub fn with_fps_logging(mut self, enabled: bool) -> Self {
        self.log_fps = enabled;
        self
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    /// Renders one frame at `timestamp_ms` and re-arms the scheduler.
    ///
    /// A fatal draw error returns early without rescheduling, which ends the
    /// loop.
    pub fn render<S>(&mut self, timestamp_ms: f64, scheduler: &mut S) -> Result<FrameStatus, FrameError>
    where
        S: FrameScheduler + ?Sized,
    {
        if let Some(slot) = self.time_uniform {
            self.target.write_time(slot, timestamp_seconds(timestamp_ms));
        }

        let status = self.target.draw_quad()?;
        match status {
            FrameStatus::Presented => {}
            FrameStatus::Skipped => debug!(timestamp_ms, "frame skipped"),
            FrameStatus::Recovered => warn!(timestamp_ms, "surface reconfigured after loss"),
        }

        if let Some(fps) = self.stats.record(timestamp_ms) {
            if self.log_fps {
                debug!(fps, "frame rate");
            }
        }

        scheduler.request_frame()?;
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingTarget {
        times: Vec<f32>,
        draws: usize,
        fail_with: Option<fn() -> FrameError>,
    }

    impl FrameTarget for RecordingTarget {
        fn write_time(&mut self, _slot: UniformSlot, seconds: f32) {
            self.times.push(seconds);
        }

        fn draw_quad(&mut self) -> Result<FrameStatus, FrameError> {
            self.draws += 1;
            match self.fail_with {
                Some(make) => Err(make()),
                None => Ok(FrameStatus::Presented),
            }
        }
    }

    #[derive(Default)]
    struct CountingScheduler {
        requests: usize,
    }

    impl FrameScheduler for CountingScheduler {
        fn request_frame(&mut self) -> Result<(), FrameError> {
            self.requests += 1;
            Ok(())
        }
    }

    const SLOT: UniformSlot = UniformSlot {
        group: 0,
        binding: 0,
        offset: 0,
        block_size: 16,
    };

    #[test]
    fn each_frame_draws_once_and_reschedules_once() {
        let mut driver = AnimationDriver::new(RecordingTarget::default(), Some(SLOT));
        let mut scheduler = CountingScheduler::default();

        for (index, timestamp) in [16.0, 32.5, 1000.0, 2500.0].into_iter().enumerate() {
            let status = driver.render(timestamp, &mut scheduler).expect("frame");
            assert_eq!(status, FrameStatus::Presented);
            assert_eq!(driver.target().draws, index + 1);
            assert_eq!(scheduler.requests, index + 1);
        }
        let expected = [0.016_f32, 0.0325, 1.0, 2.5];
        assert_eq!(driver.target().times.len(), expected.len());
        for (actual, wanted) in driver.target().times.iter().zip(expected) {
            assert!((actual - wanted).abs() < 1e-6, "{actual} vs {wanted}");
        }
    }

    #[test]
    fn missing_time_uniform_is_skipped_silently() {
        let mut driver = AnimationDriver::new(RecordingTarget::default(), None);
        let mut scheduler = CountingScheduler::default();

        driver.render(500.0, &mut scheduler).expect("frame");

        assert!(driver.target().times.is_empty());
        assert_eq!(driver.target().draws, 1);
        assert_eq!(scheduler.requests, 1);
    }

    #[test]
    fn fatal_draw_error_stops_the_loop() {
        let target = RecordingTarget {
            fail_with: Some(|| FrameError::Surface(wgpu::SurfaceError::OutOfMemory)),
            ..RecordingTarget::default()
        };
        let mut driver = AnimationDriver::new(target, Some(SLOT));
        let mut scheduler = CountingScheduler::default();

        let err = driver.render(16.0, &mut scheduler).expect_err("fatal");
        assert!(matches!(err, FrameError::Surface(wgpu::SurfaceError::OutOfMemory)));
        assert_eq!(driver.target().draws, 1);
        assert_eq!(scheduler.requests, 0);
    }

    #[test]
    fn timestamp_is_converted_to_seconds() {
        assert_eq!(timestamp_seconds(0.0), 0.0);
        assert!((timestamp_seconds(1234.0) - 1.234).abs() < 1e-6);
    }

    #[test]
    fn frame_stats_reports_once_per_window() {
        let mut stats = FrameStats::default();
        let mut reports = Vec::new();
        for frame in 0..=120 {
            if let Some(fps) = stats.record(frame as f64 * 1000.0 / 60.0) {
                reports.push(fps);
            }
        }
        assert_eq!(reports.len(), 2);
        assert!((reports[0] - 61.0).abs() < 1.0, "{reports:?}");
        assert!((stats.frames_per_second() - reports[1]).abs() < f32::EPSILON);
    }
}
