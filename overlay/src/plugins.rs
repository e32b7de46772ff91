//! Per-plugin timing line
//!
//! Plugins register once by name and report elapsed time as they run. At the
//! end of each frame the accumulated time of every plugin becomes one sample in
//! its own [`SampleWindow`]. Rendering ranks the plugins by their windowed
//! average and prints the slowest few:
//!
//! ```text
//! physics:  2.41ms | audio:  0.87ms | ui:  0.12ms
//! ```

use std::time::Duration;

use hashbrown::HashMap;
use nether_fmt::float::format_f32_rounded;
use nether_fmt::{FormatError, TextBuffer};

use crate::config::PluginConfig;
use crate::window::{SampleWindow, WindowError};

/// Handle returned by [`PluginTimings::register`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PluginId(usize);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimingError {
    #[error("unknown plugin id {0}")]
    UnknownPlugin(usize),
    #[error(transparent)]
    Window(#[from] WindowError),
}

#[derive(Debug, Clone)]
struct PluginSlot {
    name: String,
    window: SampleWindow,
    /// Nanoseconds recorded since the last `end_frame`
    pending: u64,
}

/// Windowed timings for a set of named plugins.
#[derive(Debug, Clone)]
pub struct PluginTimings {
    config: PluginConfig,
    slots: Vec<PluginSlot>,
    ids: HashMap<String, PluginId>,
    /// (average nanoseconds, slot index), reused by every render
    ranking: Vec<(i64, usize)>,
}

impl PluginTimings {
    pub fn new(config: PluginConfig) -> Self {
        Self {
            config,
            slots: Vec::new(),
            ids: HashMap::new(),
            ranking: Vec::new(),
        }
    }

    /// Register `name`, or return its existing id.
    pub fn register(&mut self, name: &str) -> Result<PluginId, TimingError> {
        if let Some(&id) = self.ids.get(name) {
            return Ok(id);
        }

        let id = PluginId(self.slots.len());
        self.slots.push(PluginSlot {
            name: name.to_string(),
            window: SampleWindow::new(self.config.window_size)?,
            pending: 0,
        });
        self.ids.insert(name.to_string(), id);
        if self.ranking.capacity() < self.slots.len() {
            self.ranking.reserve_exact(self.slots.len() - self.ranking.len());
        }
        tracing::info!(plugin = name, registered = self.slots.len(), "plugin registered");
        Ok(id)
    }

    /// Look up a registered plugin by name
    pub fn id(&self, name: &str) -> Option<PluginId> {
        self.ids.get(name).copied()
    }

    pub fn name(&self, id: PluginId) -> Option<&str> {
        self.slots.get(id.0).map(|slot| slot.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Add `elapsed` to the plugin's time for the current frame.
    pub fn record(&mut self, id: PluginId, elapsed: Duration) -> Result<(), TimingError> {
        let slot = self
            .slots
            .get_mut(id.0)
            .ok_or(TimingError::UnknownPlugin(id.0))?;
        let nanos = u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX);
        slot.pending = slot.pending.saturating_add(nanos);
        Ok(())
    }

    /// Sample every plugin's frame time into its window and start a new frame.
    pub fn end_frame(&mut self) {
        for slot in &mut self.slots {
            slot.window.sample(i64::try_from(slot.pending).unwrap_or(i64::MAX));
            slot.pending = 0;
        }
    }

    /// Windowed average of one plugin
    pub fn average(&self, id: PluginId) -> Result<Duration, TimingError> {
        let slot = self.slots.get(id.0).ok_or(TimingError::UnknownPlugin(id.0))?;
        let nanos = slot.window.average()?;
        Ok(Duration::from_nanos(u64::try_from(nanos).unwrap_or(0)))
    }

    /// Write the slowest plugins above the cutoff, joined by `separator`.
    ///
    /// Returns how many plugins were written. On error the buffer is rewound.
    pub fn render(&mut self, buf: &mut TextBuffer, separator: &str) -> Result<usize, FormatError> {
        let cutoff = i64::from(self.config.cutoff_micros) * 1_000;
        self.ranking.clear();
        for (index, slot) in self.slots.iter().enumerate() {
            if let Some(average) = slot.window.average().ok().filter(|&avg| avg > cutoff) {
                self.ranking.push((average, index));
            }
        }
        self.ranking
            .sort_unstable_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

        let mark = buf.len();
        let result = self.write_ranking(buf, separator);
        if result.is_err() {
            buf.truncate(mark);
        }
        result
    }

    fn write_ranking(&self, buf: &mut TextBuffer, separator: &str) -> Result<usize, FormatError> {
        let shown = self.ranking.len().min(self.config.max_shown);
        for (position, &(average, index)) in self.ranking[..shown].iter().enumerate() {
            if position > 0 {
                buf.append_str(separator)?;
            }
            buf.append_str(&self.slots[index].name)?;
            buf.append_str(": ")?;
            let ms = average as f32 / 1_000_000.0;
            format_f32_rounded(buf, ms, 2, 2, ' ')?;
            buf.append_str("ms")?;
        }
        Ok(shown)
    }

    /// Forget every sample; registrations are kept.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.window.clear();
            slot.pending = 0;
        }
        tracing::debug!("plugin timings cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timings() -> PluginTimings {
        PluginTimings::new(PluginConfig::default())
    }

    fn render(timings: &mut PluginTimings) -> String {
        let mut buf = TextBuffer::new(256).unwrap();
        timings.render(&mut buf, " | ").unwrap();
        buf.finalize()
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut t = timings();
        let a = t.register("physics").unwrap();
        let b = t.register("audio").unwrap();
        assert_ne!(a, b);
        assert_eq!(t.register("physics").unwrap(), a);
        assert_eq!(t.len(), 2);
        assert_eq!(t.id("audio"), Some(b));
        assert_eq!(t.name(a), Some("physics"));
    }

    #[test]
    fn test_zero_window_size_rejected() {
        let mut t = PluginTimings::new(PluginConfig {
            window_size: 0,
            ..PluginConfig::default()
        });
        assert_eq!(
            t.register("x"),
            Err(TimingError::Window(WindowError::InvalidSize))
        );
        assert!(t.is_empty());
    }

    #[test]
    fn test_record_accumulates_within_frame() {
        let mut t = timings();
        let id = t.register("physics").unwrap();
        t.record(id, Duration::from_micros(700)).unwrap();
        t.record(id, Duration::from_micros(300)).unwrap();
        t.end_frame();
        assert_eq!(t.average(id).unwrap(), Duration::from_millis(1));

        t.end_frame();
        assert_eq!(t.average(id).unwrap(), Duration::from_micros(500));
    }

    #[test]
    fn test_unknown_id() {
        let mut t = timings();
        assert_eq!(
            t.record(PluginId(3), Duration::ZERO),
            Err(TimingError::UnknownPlugin(3))
        );
    }

    #[test]
    fn test_render_ranks_and_filters() {
        let mut t = timings();
        let slow = t.register("physics").unwrap();
        let fast = t.register("ui").unwrap();
        let idle = t.register("idle").unwrap();
        let mid = t.register("audio").unwrap();

        t.record(fast, Duration::from_micros(120)).unwrap();
        t.record(slow, Duration::from_micros(12_340)).unwrap();
        t.record(idle, Duration::from_micros(5)).unwrap();
        t.record(mid, Duration::from_micros(870)).unwrap();
        t.end_frame();

        assert_eq!(
            render(&mut t),
            "physics: 12.34ms | audio:  0.87ms | ui:  0.12ms"
        );
    }

    #[test]
    fn test_render_limits_count() {
        let mut t = PluginTimings::new(PluginConfig {
            max_shown: 2,
            ..PluginConfig::default()
        });
        for (name, micros) in [("a", 100), ("b", 300), ("c", 200)] {
            let id = t.register(name).unwrap();
            t.record(id, Duration::from_micros(micros)).unwrap();
        }
        t.end_frame();
        assert_eq!(render(&mut t), "b:  0.30ms | c:  0.20ms");
    }

    #[test]
    fn test_render_empty_and_unsampled() {
        let mut t = timings();
        assert_eq!(render(&mut t), "");
        t.register("late").unwrap();
        assert_eq!(render(&mut t), "");
    }

    #[test]
    fn test_render_overflow_rewinds() {
        let mut t = timings();
        let id = t.register("physics").unwrap();
        t.record(id, Duration::from_millis(3)).unwrap();
        t.end_frame();

        let mut buf = TextBuffer::new(12).unwrap();
        buf.append_str("fps").unwrap();
        assert!(t.render(&mut buf, " | ").is_err());
        assert_eq!(buf.finalize(), "fps");
    }

    #[test]
    fn test_clear_forgets_samples() {
        let mut t = timings();
        let id = t.register("physics").unwrap();
        t.record(id, Duration::from_millis(1)).unwrap();
        t.end_frame();
        t.clear();
        assert_eq!(
            t.average(id),
            Err(TimingError::Window(WindowError::Empty))
        );
        assert_eq!(t.len(), 1);
    }
}
