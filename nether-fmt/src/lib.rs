//! Nether-FMT: zero-allocation text formatting for frame overlays
//!
//! Debug overlays redraw their statistics every frame. Going through `format!`
//! for each line allocates a fresh `String` per value per frame, which shows up
//! in the very frame timings the overlay is trying to report. This crate writes
//! numbers straight into a [`TextBuffer`] that is sized once and reused forever.
//!
//! # Components
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`digits`] | Digit lookup table for bases 2-16 |
//! | [`buffer`] | [`TextBuffer`], the fixed-capacity character store |
//! | [`integer`] | Signed/unsigned 32 and 64 bit formatting, any base 2-16 |
//! | [`float`] | `f32` formatting with clamped decimal places |
//! | [`template`] | `{0}`-style positional templates dispatching to the above |
//!
//! # Frame Lifecycle
//!
//! ```text
//! TextBuffer::new(capacity)      <- the only allocation of the buffer's life
//!   loop {
//!     append_* / format_*        <- advance the cursor, never grow
//!     finalize_into(&mut text)   <- copy out, cursor back to 0
//!   }
//! ```
//!
//! # Overflow
//!
//! Every write is checked against the remaining capacity before a single
//! character is stored. A write that does not fit either fails with
//! [`FormatError::BufferOverflow`] ([`OverflowPolicy::Strict`]) or is dropped
//! whole ([`OverflowPolicy::Saturating`]). Nothing is ever partially written.
//!
//! # Usage
//!
//! ```
//! use nether_fmt::{Arg, TextBuffer};
//!
//! let mut buf = TextBuffer::new(64).unwrap();
//! buf.append_format("{0} FPS, {1:0.0}ms", &[Arg::from(60), Arg::from(16.67f32)])
//!     .unwrap();
//! assert_eq!(buf.finalize(), "60 FPS, 16.7ms");
//! assert!(buf.is_empty());
//! ```

pub mod buffer;
pub mod digits;
mod error;
pub mod float;
pub mod integer;
mod scratch;
pub mod template;

pub use buffer::{BufferConfig, FinalizeMode, NonFiniteMode, OverflowPolicy, TextBuffer};
pub use digits::{BINARY, DECIMAL, HEX};
pub use error::FormatError;
pub use float::FractionRounding;
pub use template::{Arg, MAX_ARGS};

// =============================================================================
// Constants
// =============================================================================

/// Widest padding honoured for 32-bit integers (`u32::MAX` has 10 decimal digits)
pub const MAX_PAD_32: u32 = 10;

/// Widest padding honoured for 64-bit integers (`u64::MAX` has 20 decimal digits)
pub const MAX_PAD_64: u32 = 20;

/// Widest padding honoured for the integer part of a float
pub const MAX_PAD_FLOAT: u32 = 5;

/// Default decimal-place clamp for float formatting
pub const DEFAULT_MAX_DECIMALS: u32 = 2;

/// Hard ceiling for the decimal-place clamp; `f32` carries no more precision
pub const DECIMALS_LIMIT: u32 = 7;

/// Token written for NaN when [`NonFiniteMode::Tokens`] is active
pub const NAN_TOKEN: &str = "NaN";

/// Token written for positive infinity when [`NonFiniteMode::Tokens`] is active
pub const POS_INFINITY_TOKEN: &str = "+∞";

/// Token written for negative infinity when [`NonFiniteMode::Tokens`] is active
pub const NEG_INFINITY_TOKEN: &str = "-∞";
