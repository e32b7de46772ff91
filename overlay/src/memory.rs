//! Memory statistics line
//!
//! Querying the OS is left to the host; it hands snapshots in through
//! [`MemorySource`].

use nether_fmt::float::format_f32_rounded;
use nether_fmt::{FormatError, TextBuffer};

const KB: u64 = 1024;
const MB: u64 = 1024 * KB;
const GB: u64 = 1024 * MB;

/// Errors from a [`MemorySource`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MemoryError {
    #[error("memory statistics unavailable on this platform")]
    Unavailable,
}

/// Byte counts sampled at one point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MemorySnapshot {
    pub process_used: u64,
    pub process_peak: u64,
    pub system_total: u64,
    pub system_available: u64,
}

/// Something that can report current memory usage.
pub trait MemorySource {
    fn snapshot(&mut self) -> Result<MemorySnapshot, MemoryError>;
}

/// Source that always reports the same snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StaticMemorySource(pub MemorySnapshot);

impl MemorySource for StaticMemorySource {
    fn snapshot(&mut self) -> Result<MemorySnapshot, MemoryError> {
        Ok(self.0)
    }
}

/// Write a byte count as `B`, `KB`, `MB` or `GB` with one decimal place.
pub fn write_bytes(buf: &mut TextBuffer, bytes: u64) -> Result<(), FormatError> {
    let (divisor, unit) = if bytes >= GB {
        (GB, " GB")
    } else if bytes >= MB {
        (MB, " MB")
    } else if bytes >= KB {
        (KB, " KB")
    } else {
        buf.append_u64(bytes)?;
        return buf.append_str(" B");
    };

    let scaled = (bytes as f64 / divisor as f64) as f32;
    format_f32_rounded(buf, scaled, 1, 0, ' ')?;
    buf.append_str(unit)
}

/// Write `Mem: 12.0 MB (peak 14.5 MB) | Sys: 3.2 GB free of 16.0 GB`.
pub fn render(buf: &mut TextBuffer, snapshot: &MemorySnapshot) -> Result<(), FormatError> {
    buf.append_str("Mem: ")?;
    write_bytes(buf, snapshot.process_used)?;
    buf.append_str(" (peak ")?;
    write_bytes(buf, snapshot.process_peak)?;
    buf.append_str(") | Sys: ")?;
    write_bytes(buf, snapshot.system_available)?;
    buf.append_str(" free of ")?;
    write_bytes(buf, snapshot.system_total)
}
