//! Overlay composition
//!
//! [`Overlay`] owns the one [`TextBuffer`] every line is written into and the
//! one `String` the finished frame is copied out to. After the first few
//! frames have grown that string, rendering allocates nothing.


use std::path::PathBuf;
use std::time::Duration;

use nether_fmt::{FormatError, TextBuffer};
use serde::{Deserialize, Serialize};

use crate::config::{self, ConfigError, OverlayConfig};
use crate::frame::FrameCounter;
use crate::memory::{self, MemoryError, MemorySource};
use crate::plugins::{PluginId, PluginTimings, TimingError};

/// Keybind hint shown after startup
pub const HINT_TEXT: &str = "Press U to toggle/reset the counters.";

/// Joins entries on the plugin line
pub const PLUGIN_SEPARATOR: &str = " | ";

#[derive(Debug, thiserror::Error)]
pub enum OverlayError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("overlay text: {0}")]
    Format(#[from] FormatError),
    #[error(transparent)]
    Timing(#[from] TimingError),
    #[error(transparent)]
    Memory(#[from] MemoryError),
}

/// Overlay visibility, cycled by the toggle key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DisplayMode {
    Hidden,
    /// Dark text
    #[default]
    Normal,
    /// Light text for dark scenes
    NormalWhite,
}

impl DisplayMode {
    /// Hidden -> Normal -> NormalWhite -> Hidden
    pub fn next(self) -> Self {
        match self {
            DisplayMode::Hidden => DisplayMode::Normal,
            DisplayMode::Normal => DisplayMode::NormalWhite,
            DisplayMode::NormalWhite => DisplayMode::Hidden,
        }
    }

    /// RGB text color, `None` when hidden
    pub fn text_color(self) -> Option<[u8; 3]> {
        match self {
            DisplayMode::Hidden => None,
            DisplayMode::Normal => Some([0, 0, 0]),
            DisplayMode::NormalWhite => Some([255, 255, 255]),
        }
    }

    pub fn is_visible(self) -> bool {
        self != DisplayMode::Hidden
    }
}

/// Frame rate, plugin timing and memory overlay.
pub struct Overlay {
    mode: DisplayMode,
    buffer: TextBuffer,
    text: String,
    frame: FrameCounter,
    plugins: PluginTimings,
    memory_enabled: bool,
    memory_source: Option<Box<dyn MemorySource>>,
    hint_remaining: f32,
    config: OverlayConfig,
    config_path: Option<PathBuf>,
}

impl Overlay {
    /// Build an overlay from a validated config.
    pub fn new(config: &OverlayConfig) -> Result<Self, OverlayError> {
        config.validate()?;
        let buffer = TextBuffer::with_config(config.buffer)?;
        let hint_remaining = if config.display.show_hint {
            config.display.hint_seconds
        } else {
            0.0
        };

        Ok(Self {
            mode: config.display.mode,
            text: String::with_capacity(buffer.capacity()),
            buffer,
            frame: FrameCounter::new(config.frame),
            plugins: PluginTimings::new(config.plugins),
            memory_enabled: config.memory.enabled,
            memory_source: None,
            hint_remaining,
            config: config.clone(),
            config_path: None,
        })
    }

    /// Attach the source the memory line is read from.
    pub fn set_memory_source(&mut self, source: Box<dyn MemorySource>) {
        self.memory_source = Some(source);
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: DisplayMode) {
        if mode != self.mode {
            tracing::debug!(from = ?self.mode, to = ?mode, "overlay display mode changed");
            self.mode = mode;
        }
    }

    /// Save the config to `path` whenever the display mode is toggled.
    pub fn persist_to(&mut self, path: PathBuf) {
        self.config_path = Some(path);
    }

    /// Advance to the next display mode, dismiss the hint and reset every counter.
    ///
    /// With a path from [`Overlay::persist_to`] the new mode is saved and the
    /// hint stays off on later starts. A failed save is logged and ignored.
    pub fn toggle(&mut self) {
        self.set_mode(self.mode.next());
        self.hint_remaining = 0.0;
        self.frame.reset();
        self.plugins.clear();

        self.config.display.mode = self.mode;
        self.config.display.show_hint = false;
        let Some(path) = &self.config_path else {
            return;
        };
        if let Err(e) = config::save_to(path, &self.config) {
            tracing::warn!(error = %e, path = %path.display(), "Failed to save overlay config");
        }
    }

    pub fn hint_visible(&self) -> bool {
        self.hint_remaining > 0.0
    }

    pub fn frame(&self) -> &FrameCounter {
        &self.frame
    }

    pub fn plugins(&self) -> &PluginTimings {
        &self.plugins
    }

    pub fn register_plugin(&mut self, name: &str) -> Result<PluginId, OverlayError> {
        Ok(self.plugins.register(name)?)
    }

    pub fn record_plugin(&mut self, id: PluginId, elapsed: Duration) -> Result<(), OverlayError> {
        Ok(self.plugins.record(id, elapsed)?)
    }

    /// Feed the unscaled frame time in seconds.
    pub fn update(&mut self, delta_secs: f32) {
        self.frame.update(delta_secs);
        if self.hint_remaining > 0.0 {
            self.hint_remaining = (self.hint_remaining - delta_secs).max(0.0);
        }
    }

    /// Close the frame's plugin timings.
    pub fn end_frame(&mut self) {
        self.plugins.end_frame();
    }

    /// Build this frame's text, or `None` while hidden.
    ///
    /// The returned text stays valid until the next call that takes `&mut self`.
    pub fn render(&mut self) -> Result<Option<&str>, OverlayError> {
        if !self.mode.is_visible() {
            return Ok(None);
        }

        self.buffer.clear();
        if let Err(e) = self.write_lines() {
            self.buffer.clear();
            return Err(e);
        }
        self.buffer.finalize_into(&mut self.text);
        Ok(Some(self.text.as_str()))
    }

    fn write_lines(&mut self) -> Result<(), OverlayError> {
        self.frame.render(&mut self.buffer)?;

        let mark = self.buffer.len();
        self.buffer.append_char('\n')?;
        if self.plugins.render(&mut self.buffer, PLUGIN_SEPARATOR)? == 0 {
            self.buffer.truncate(mark);
        }

        let memory_enabled = self.memory_enabled;
        if let Some(source) = self.memory_source.as_mut().filter(|_| memory_enabled) {
            let snapshot = source.snapshot()?;
            self.buffer.append_char('\n')?;
            memory::render(&mut self.buffer, &snapshot)?;
        }

        if self.hint_visible() {
            self.buffer.append_char('\n')?;
            self.buffer.append_str(HINT_TEXT)?;
        }
        Ok(())
    }
}
