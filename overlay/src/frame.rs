//! Smoothed frame rate line

use nether_fmt::{Arg, FormatError, TextBuffer};

use crate::config::FrameConfig;

const RATE_LINE: &str = "{0:0.} FPS, {1:0.0}ms";
const STATS_LINE: &str = "Avg: {0:0.}, Min: {1:0.}, Max: {2:0.}";

/// Frame counter producing `"60 FPS, 16.7ms\nAvg: 59, Min: 58, Max: 61"`.
///
/// The delta is an exponential moving average of the raw frame time. Every
/// render folds the current rate into a slow running average and the min/max
/// trackers.
#[derive(Debug, Clone)]
pub struct FrameCounter {
    config: FrameConfig,
    delta: f32,
    average: f32,
    min: f32,
    max: f32,
}

impl FrameCounter {
    pub fn new(config: FrameConfig) -> Self {
        Self {
            config,
            delta: 0.0,
            average: 0.0,
            min: f32::MAX,
            max: 0.0,
        }
    }

    /// Feed the unscaled frame time in seconds.
    pub fn update(&mut self, unscaled_delta_secs: f32) {
        self.delta += (unscaled_delta_secs - self.delta) * self.config.delta_smoothing;
    }

    /// Current rate in frames per second, 0 before the first update
    pub fn fps(&self) -> f32 {
        if self.delta > 0.0 { 1.0 / self.delta } else { 0.0 }
    }

    /// Smoothed frame time in milliseconds
    pub fn delta_ms(&self) -> f32 {
        self.delta * 1000.0
    }

    pub fn average(&self) -> f32 {
        self.average
    }

    /// Lowest rate seen since the last reset (`f32::MAX` before any render)
    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// Fold the current rate into the statistics and write both lines.
    pub fn render(&mut self, buf: &mut TextBuffer) -> Result<(), FormatError> {
        let fps = self.fps();
        let fraction = self.config.average_fraction;
        self.average = fraction * self.average + (1.0 - fraction) * fps;
        self.min = self.min.min(fps);
        self.max = self.max.max(fps);

        buf.append_format(RATE_LINE, &[Arg::from(fps), Arg::from(self.delta_ms())])?;
        buf.append_char('\n')?;
        buf.append_format(
            STATS_LINE,
            &[
                Arg::from(self.average),
                Arg::from(self.min),
                Arg::from(self.max),
            ],
        )
    }

    /// Forget the running average and the min/max trackers.
    pub fn reset(&mut self) {
        self.average = 0.0;
        self.min = f32::MAX;
        self.max = 0.0;
        tracing::debug!("frame counter reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settled(delta: f32) -> FrameCounter {
        let mut counter = FrameCounter::new(FrameConfig::default());
        for _ in 0..300 {
            counter.update(delta);
        }
        counter
    }

    #[test]
    fn test_delta_is_smoothed() {
        let mut counter = FrameCounter::new(FrameConfig::default());
        counter.update(0.1);
        assert!((counter.delta_ms() - 10.0).abs() < 1e-3);
        counter.update(0.1);
        assert!((counter.delta_ms() - 19.0).abs() < 1e-3);
    }

    #[test]
    fn test_fps_before_update_is_zero() {
        let counter = FrameCounter::new(FrameConfig::default());
        assert_eq!(counter.fps(), 0.0);
    }

    #[test]
    fn test_render_text() {
        let mut counter = settled(1.0 / 60.0);
        let mut buf = TextBuffer::new(128).unwrap();
        counter.render(&mut buf).unwrap();
        assert_eq!(
            buf.finalize(),
            "60 FPS, 16.7ms\nAvg: 0, Min: 60, Max: 60"
        );
    }

    #[test]
    fn test_average_converges() {
        let mut counter = settled(0.01);
        let mut buf = TextBuffer::new(128).unwrap();
        for _ in 0..2000 {
            counter.render(&mut buf).unwrap();
            buf.clear();
        }
        assert!((counter.average() - 100.0).abs() < 1.0);
    }

    #[test]
    fn test_min_max_track_extremes() {
        let mut counter = settled(0.01);
        let mut buf = TextBuffer::new(128).unwrap();
        counter.render(&mut buf).unwrap();

        for _ in 0..300 {
            counter.update(0.02);
        }
        counter.render(&mut buf).unwrap();
        assert!((counter.max() - 100.0).abs() < 0.1);
        assert!((counter.min() - 50.0).abs() < 0.1);

        counter.reset();
        assert_eq!(counter.min(), f32::MAX);
        assert_eq!(counter.max(), 0.0);
        assert_eq!(counter.average(), 0.0);
    }

    #[test]
    fn test_render_overflow_propagates() {
        let mut counter = settled(1.0 / 60.0);
        let mut buf = TextBuffer::new(8).unwrap();
        assert!(matches!(
            counter.render(&mut buf),
            Err(FormatError::BufferOverflow { .. })
        ));
    }
}
