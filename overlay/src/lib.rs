//! Nethercore diagnostic overlay
//!
//! Frame rate, per-plugin timings and memory usage, redrawn every frame
//! through a single [`nether_fmt::TextBuffer`].
//!
//! # Frame Loop
//!
//! ```text
//! overlay.update(delta)              smoothed frame time, hint timer
//! overlay.record_plugin(id, dt)      any number of times per frame
//! overlay.end_frame()                plugin times -> sample windows
//! overlay.render()?                  Some(text) unless hidden
//! overlay.toggle()                   on the toggle key
//! ```
//!
//! # Output
//!
//! ```text
//! 60 FPS, 16.7ms
//! Avg: 59, Min: 57, Max: 61
//! physics:  2.41ms | audio:  0.87ms
//! Mem: 12.0 MB (peak 14.5 MB) | Sys: 3.3 GB free of 16.0 GB
//! Press U to toggle/reset the counters.
//! ```

pub mod config;
pub mod frame;
pub mod memory;
pub mod overlay;
pub mod plugins;
pub mod window;

pub use config::{ConfigError, OverlayConfig};
pub use frame::FrameCounter;
pub use memory::{MemoryError, MemorySnapshot, MemorySource, StaticMemorySource};
pub use overlay::{DisplayMode, Overlay, OverlayError};
pub use plugins::{PluginId, PluginTimings, TimingError};
pub use window::{SampleWindow, WindowError};
