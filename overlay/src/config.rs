//! Configuration management (overlay.toml)
//!
//! Handles loading, saving, and providing defaults for overlay settings.
//! Settings are stored in TOML format in the platform-specific config directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use nether_fmt::BufferConfig;

use crate::overlay::DisplayMode;

/// File name inside [`config_dir`]
pub const CONFIG_FILE: &str = "overlay.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to access config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Overlay configuration.
///
/// Contains all user-configurable settings organized into sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct OverlayConfig {
    /// Visibility and keybind hint
    #[serde(default)]
    pub display: DisplayConfig,
    /// Text buffer shared by every line
    #[serde(default)]
    pub buffer: BufferConfig,
    /// Frame rate smoothing
    #[serde(default)]
    pub frame: FrameConfig,
    /// Per-plugin timing line
    #[serde(default)]
    pub plugins: PluginConfig,
    /// Memory line
    #[serde(default)]
    pub memory: MemoryConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Initial display mode (default: Normal)
    #[serde(default)]
    pub mode: DisplayMode,
    /// Show the toggle keybind hint after startup (default: true)
    #[serde(default = "default_true")]
    pub show_hint: bool,
    /// Seconds the hint stays visible (default: 15)
    #[serde(default = "default_hint_seconds")]
    pub hint_seconds: f32,
}

/// Frame counter smoothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameConfig {
    /// Weight of each new frame time in the smoothed delta (default: 0.1, range: (0, 1])
    #[serde(default = "default_delta_smoothing")]
    pub delta_smoothing: f32,
    /// Weight of the previous value in the running FPS average (default: 0.994, range: [0, 1))
    #[serde(default = "default_average_fraction")]
    pub average_fraction: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginConfig {
    /// Frames averaged per plugin (default: 60)
    #[serde(default = "default_window_size")]
    pub window_size: usize,
    /// Most plugins listed (default: 5)
    #[serde(default = "default_max_shown")]
    pub max_shown: usize,
    /// Plugins averaging at or below this many microseconds are hidden (default: 10)
    #[serde(default = "default_cutoff_micros")]
    pub cutoff_micros: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Show the memory line (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}
fn default_hint_seconds() -> f32 {
    15.0
}

fn default_delta_smoothing() -> f32 {
    0.1
}
fn default_average_fraction() -> f32 {
    0.994
}

fn default_window_size() -> usize {
    60
}
fn default_max_shown() -> usize {
    5
}
fn default_cutoff_micros() -> u32 {
    10
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            mode: DisplayMode::default(),
            show_hint: default_true(),
            hint_seconds: default_hint_seconds(),
        }
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            delta_smoothing: default_delta_smoothing(),
            average_fraction: default_average_fraction(),
        }
    }
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
            max_shown: default_max_shown(),
            cutoff_micros: default_cutoff_micros(),
        }
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
        }
    }
}

impl OverlayConfig {
    /// Reject settings no overlay can be built from.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.buffer.capacity < self.buffer.minimum_capacity() {
            return Err(ConfigError::Invalid(format!(
                "buffer.capacity must be at least {}",
                self.buffer.minimum_capacity()
            )));
        }
        if self.plugins.window_size == 0 {
            return Err(ConfigError::Invalid(
                "plugins.window_size must be at least 1".to_string(),
            ));
        }
        let smoothing = self.frame.delta_smoothing;
        if smoothing.is_nan() || smoothing <= 0.0 || smoothing > 1.0 {
            return Err(ConfigError::Invalid(format!(
                "frame.delta_smoothing must be in (0, 1], got {smoothing}"
            )));
        }
        let fraction = self.frame.average_fraction;
        if !(0.0..1.0).contains(&fraction) {
            return Err(ConfigError::Invalid(format!(
                "frame.average_fraction must be in [0, 1), got {fraction}"
            )));
        }
        let hint = self.display.hint_seconds;
        if hint.is_nan() || hint < 0.0 {
            return Err(ConfigError::Invalid(
                "display.hint_seconds must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Returns the platform-specific configuration directory.
///
/// On Windows: `%APPDATA%\Nethercore\config`
/// On macOS: `~/Library/Application Support/io.nethercore.Nethercore`
/// On Linux: `~/.config/Nethercore`
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("io.nethercore", "", "Nethercore")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// `overlay.toml` inside [`config_dir`].
pub fn default_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(CONFIG_FILE))
}

/// Read and validate a config file.
pub fn load_from(path: &Path) -> Result<OverlayConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: OverlayConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Write a config file, creating its parent directory.
pub fn save_to(path: &Path, config: &OverlayConfig) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Loads `overlay.toml` from the config directory.
///
/// Returns default values if the file doesn't exist or cannot be used.
pub fn load() -> OverlayConfig {
    let Some(path) = default_path() else {
        return OverlayConfig::default();
    };
    if !path.exists() {
        return OverlayConfig::default();
    }
    match load_from(&path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, path = %path.display(), "Failed to load overlay config, using defaults");
            OverlayConfig::default()
        }
    }
}
