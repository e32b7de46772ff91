//! Headless overlay simulator
//!
//! Drives an [`Overlay`] with synthetic frame and plugin timings and prints the
//! rendered text, so the overlay can be checked without a running game.
//!
//! ```bash
//! nether-overlay --frames 600 --target-fps 60 --jitter-ms 2 --plugins 4 --every 120
//! nether-overlay --config ./overlay.toml --toggle-at 300
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use nethercore_overlay::{
    MemoryError, MemorySnapshot, MemorySource, Overlay, OverlayConfig, PluginId, config,
};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

const PLUGIN_NAMES: &[&str] = &[
    "physics",
    "audio",
    "render",
    "ui",
    "scripting",
    "network",
    "particles",
    "pathfinding",
];

const MB: u64 = 1024 * 1024;

/// Nethercore overlay simulator
#[derive(Parser)]
#[command(name = "nether-overlay")]
#[command(about = "Feed the diagnostic overlay synthetic timings and print its text")]
#[command(version)]
struct Cli {
    /// Frames to simulate
    #[arg(long, default_value_t = 600)]
    frames: u32,

    /// Frame rate the synthetic frame times center on
    #[arg(long, default_value_t = 60.0)]
    target_fps: f32,

    /// Maximum deviation of each frame time, in milliseconds
    #[arg(long, default_value_t = 2.0)]
    jitter_ms: f32,

    /// Number of simulated plugins
    #[arg(long, default_value_t = 4)]
    plugins: usize,

    /// RNG seed; the same seed always produces the same output
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Overlay config file (default: overlay.toml in the config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the overlay every N frames
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..))]
    every: u32,

    /// Press the toggle key on these frames (saves the new display mode)
    #[arg(long, value_delimiter = ',')]
    toggle_at: Vec<u32>,
}

/// A plugin with a base cost and the id the overlay gave it
struct SimPlugin {
    id: PluginId,
    base_ms: f32,
}

/// Memory source whose usage drifts a little every query
struct SimMemory {
    rng: Pcg64,
    snapshot: MemorySnapshot,
}

impl SimMemory {
    fn new(seed: u64) -> Self {
        Self {
            rng: Pcg64::seed_from_u64(seed ^ 0x6d65_6d6f_7279),
            snapshot: MemorySnapshot {
                process_used: 48 * MB,
                process_peak: 48 * MB,
                system_total: 16 * 1024 * MB,
                system_available: 9 * 1024 * MB,
            },
        }
    }
}

impl MemorySource for SimMemory {
    fn snapshot(&mut self) -> Result<MemorySnapshot, MemoryError> {
        let step = self.rng.random_range(0..=MB / 4);
        let snapshot = &mut self.snapshot;
        if self.rng.random_bool(0.5) {
            snapshot.process_used = snapshot.process_used.saturating_add(step);
        } else {
            snapshot.process_used = snapshot.process_used.saturating_sub(step).max(MB);
        }
        snapshot.process_peak = snapshot.process_peak.max(snapshot.process_used);
        Ok(*snapshot)
    }
}

fn plugin_name(index: usize) -> String {
    let base = PLUGIN_NAMES[index % PLUGIN_NAMES.len()];
    match index / PLUGIN_NAMES.len() {
        0 => base.to_string(),
        round => format!("{base}{round}"),
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<OverlayConfig> {
    match path {
        Some(path) => config::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(config::load()),
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    if cli.target_fps.is_nan() || cli.target_fps <= 0.0 {
        anyhow::bail!("--target-fps must be positive");
    }

    let config = load_config(cli.config.as_ref())?;
    let mut overlay = Overlay::new(&config)?;
    match cli.config.clone().or_else(config::default_path) {
        Some(path) => overlay.persist_to(path),
        None => tracing::warn!("No config directory available, display mode will not be saved"),
    }
    overlay.set_memory_source(Box::new(SimMemory::new(cli.seed)));

    let mut rng = Pcg64::seed_from_u64(cli.seed);
    let mut plugins = Vec::with_capacity(cli.plugins);
    for index in 0..cli.plugins {
        plugins.push(SimPlugin {
            id: overlay.register_plugin(&plugin_name(index))?,
            base_ms: rng.random_range(0.005..3.0),
        });
    }

    let target_ms = 1000.0 / cli.target_fps;
    let jitter_ms = cli.jitter_ms.abs();
    tracing::info!(
        frames = cli.frames,
        target_fps = cli.target_fps,
        plugins = plugins.len(),
        seed = cli.seed,
        "starting overlay simulation"
    );

    for frame in 1..=cli.frames {
        let jitter = if jitter_ms > 0.0 {
            rng.random_range(-jitter_ms..=jitter_ms)
        } else {
            0.0
        };
        let frame_ms = (target_ms + jitter).max(0.1);
        overlay.update(frame_ms / 1000.0);

        for plugin in &plugins {
            let scale: f32 = rng.random_range(0.8..1.2);
            let elapsed = Duration::from_secs_f32(plugin.base_ms * scale / 1000.0);
            overlay.record_plugin(plugin.id, elapsed)?;
        }
        overlay.end_frame();

        if cli.toggle_at.contains(&frame) {
            overlay.toggle();
            tracing::info!(frame, mode = ?overlay.mode(), "toggled overlay");
        }

        if frame % cli.every == 0 {
            if let Some(text) = overlay.render()? {
                println!("--- frame {frame} ---\n{text}\n");
            }
        }
    }

    Ok(())
}
