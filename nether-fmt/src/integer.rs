//! Integer formatting
//!
//! All widths funnel into [`format_magnitude`], which stages the digits in a
//! stack [`Scratch`] from least to most significant and then copies the padded
//! run into the buffer in one append.
//!
//! Padding is lenient: a `min_width` above the field's useful maximum
//! ([`MAX_PAD_32`] or [`MAX_PAD_64`]) means "no padding", and a width narrower
//! than the digits is ignored rather than truncating them.

use crate::digits::{self, DECIMAL};
use crate::scratch::Scratch;
use crate::{FormatError, MAX_PAD_32, MAX_PAD_64, TextBuffer};

/// Write `magnitude` (with an optional leading `-`) into `buf`.
///
/// `max_pad` is the largest `min_width` honoured for this field.
pub(crate) fn format_magnitude(
    buf: &mut TextBuffer,
    magnitude: u64,
    negative: bool,
    min_width: u32,
    max_pad: u32,
    pad_char: char,
    base: u32,
) -> Result<(), FormatError> {
    if !digits::is_supported_base(base) {
        return Err(FormatError::InvalidBase(base));
    }

    let min_width = if min_width <= max_pad { min_width as usize } else { 0 };
    let digit_count = digits::count_digits(magnitude, base);
    let pad_len = min_width.saturating_sub(digit_count);

    let mut scratch = Scratch::new();
    scratch.push_unsigned(magnitude, base, pad_len, pad_char, negative);
    buf.append_chars(scratch.as_slice())
}

/// Magnitude of a negative `i32` through wrapping arithmetic, so `i32::MIN`
/// has a representable counterpart.
#[inline]
fn magnitude_32(value: i32) -> (u64, bool) {
    if value < 0 {
        let magnitude = u32::MAX.wrapping_sub(value as u32).wrapping_add(1);
        (u64::from(magnitude), true)
    } else {
        (value as u64, false)
    }
}

#[inline]
fn magnitude_64(value: i64) -> (u64, bool) {
    if value < 0 {
        (u64::MAX.wrapping_sub(value as u64).wrapping_add(1), true)
    } else {
        (value as u64, false)
    }
}

/// Format an unsigned 32-bit value.
pub fn format_u32(
    buf: &mut TextBuffer,
    value: u32,
    min_width: u32,
    pad_char: char,
    base: u32,
) -> Result<(), FormatError> {
    format_magnitude(buf, u64::from(value), false, min_width, MAX_PAD_32, pad_char, base)
}

/// Format a signed 32-bit value; negative values get a leading `-`.
pub fn format_i32(
    buf: &mut TextBuffer,
    value: i32,
    min_width: u32,
    pad_char: char,
    base: u32,
) -> Result<(), FormatError> {
    let (magnitude, negative) = magnitude_32(value);
    format_magnitude(buf, magnitude, negative, min_width, MAX_PAD_32, pad_char, base)
}

/// Format an unsigned 64-bit value.
pub fn format_u64(
    buf: &mut TextBuffer,
    value: u64,
    min_width: u32,
    pad_char: char,
    base: u32,
) -> Result<(), FormatError> {
    format_magnitude(buf, value, false, min_width, MAX_PAD_64, pad_char, base)
}

/// Format a signed 64-bit value; negative values get a leading `-`.
pub fn format_i64(
    buf: &mut TextBuffer,
    value: i64,
    min_width: u32,
    pad_char: char,
    base: u32,
) -> Result<(), FormatError> {
    let (magnitude, negative) = magnitude_64(value);
    format_magnitude(buf, magnitude, negative, min_width, MAX_PAD_64, pad_char, base)
}

// =============================================================================
// Shorthands (base 10, no padding)
// =============================================================================

impl TextBuffer {
    pub fn append_u32(&mut self, value: u32) -> Result<(), FormatError> {
        let pad = self.config().default_pad;
        format_u32(self, value, 0, pad, DECIMAL)
    }

    pub fn append_i32(&mut self, value: i32) -> Result<(), FormatError> {
        let pad = self.config().default_pad;
        format_i32(self, value, 0, pad, DECIMAL)
    }

    pub fn append_u64(&mut self, value: u64) -> Result<(), FormatError> {
        let pad = self.config().default_pad;
        format_u64(self, value, 0, pad, DECIMAL)
    }

    pub fn append_i64(&mut self, value: i64) -> Result<(), FormatError> {
        let pad = self.config().default_pad;
        format_i64(self, value, 0, pad, DECIMAL)
    }

    /// Base-10 `i64` padded to `min_width` with the configured pad character
    pub fn append_i64_padded(&mut self, value: i64, min_width: u32) -> Result<(), FormatError> {
        let pad = self.config().default_pad;
        format_i64(self, value, min_width, pad, DECIMAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digits::{BINARY, HEX};
    use crate::{BufferConfig, OverflowPolicy};
    use proptest::prelude::*;

    fn render(f: impl FnOnce(&mut TextBuffer) -> Result<(), FormatError>) -> String {
        let mut buf = TextBuffer::new(80).unwrap();
        f(&mut buf).unwrap();
        buf.finalize()
    }

    #[test]
    fn test_zero_is_single_digit() {
        assert_eq!(render(|b| format_u32(b, 0, 0, ' ', DECIMAL)), "0");
        assert_eq!(render(|b| format_i64(b, 0, 0, ' ', HEX)), "0");
    }

    #[test]
    fn test_padding() {
        assert_eq!(render(|b| format_u32(b, 5, 3, '0', DECIMAL)), "005");
        assert_eq!(render(|b| format_u32(b, 12345, 3, '0', DECIMAL)), "12345");
        assert_eq!(render(|b| format_i32(b, -7, 4, ' ', DECIMAL)), "-   7");
        assert_eq!(render(|b| format_u64(b, 42, 20, '.', DECIMAL)).len(), 20);
    }

    #[test]
    fn test_out_of_range_padding_is_ignored() {
        assert_eq!(render(|b| format_u32(b, 5, 11, '0', DECIMAL)), "5");
        assert_eq!(render(|b| format_u64(b, 5, 21, '0', DECIMAL)), "5");
        assert_eq!(render(|b| format_u32(b, 5, 10, '0', DECIMAL)), "0000000005");
    }

    #[test]
    fn test_bases() {
        assert_eq!(render(|b| format_u32(b, 255, 0, ' ', HEX)), "FF");
        assert_eq!(render(|b| format_u32(b, 5, 8, '0', BINARY)), "00000101");
        assert_eq!(render(|b| format_u64(b, 0xDEAD_BEEF, 0, ' ', HEX)), "DEADBEEF");
        assert_eq!(render(|b| format_i32(b, -255, 0, ' ', HEX)), "-FF");
        assert_eq!(render(|b| format_u32(b, 35, 0, ' ', 7)), "50");
    }

    #[test]
    fn test_full_width_binary_fits_scratch() {
        assert_eq!(
            render(|b| format_u64(b, u64::MAX, 0, ' ', BINARY)),
            "1".repeat(64)
        );
        assert_eq!(
            render(|b| format_i64(b, i64::MIN, 0, ' ', BINARY)),
            format!("-1{}", "0".repeat(63))
        );
    }

    #[test]
    fn test_min_values() {
        assert_eq!(render(|b| format_i32(b, i32::MIN, 0, ' ', DECIMAL)), "-2147483648");
        assert_eq!(
            render(|b| format_i64(b, i64::MIN, 0, ' ', DECIMAL)),
            "-9223372036854775808"
        );
        assert_eq!(render(|b| format_i32(b, i32::MIN, 0, ' ', HEX)), "-80000000");
    }

    #[test]
    fn test_max_values() {
        assert_eq!(render(|b| format_u32(b, u32::MAX, 0, ' ', DECIMAL)), "4294967295");
        assert_eq!(
            render(|b| format_u64(b, u64::MAX, 0, ' ', DECIMAL)),
            "18446744073709551615"
        );
    }

    #[test]
    fn test_invalid_base() {
        let mut buf = TextBuffer::new(8).unwrap();
        assert_eq!(format_u32(&mut buf, 1, 0, ' ', 1), Err(FormatError::InvalidBase(1)));
        assert_eq!(format_i64(&mut buf, 1, 0, ' ', 17), Err(FormatError::InvalidBase(17)));
        assert_eq!(format_u64(&mut buf, 1, 0, ' ', 0), Err(FormatError::InvalidBase(0)));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_overflow_is_atomic() {
        let mut buf = TextBuffer::new(4).unwrap();
        buf.append_str("ab").unwrap();
        assert_eq!(
            format_i32(&mut buf, -12, 0, ' ', DECIMAL),
            Err(FormatError::BufferOverflow {
                requested: 3,
                available: 2
            })
        );
        assert_eq!(buf.len(), 2);

        let mut sat = TextBuffer::with_config(BufferConfig {
            overflow: OverflowPolicy::Saturating,
            ..BufferConfig::with_capacity(4)
        })
        .unwrap();
        sat.append_str("ab").unwrap();
        format_u32(&mut sat, 123, 0, ' ', DECIMAL).unwrap();
        assert_eq!(sat.len(), 2);
        format_u32(&mut sat, 12, 0, ' ', DECIMAL).unwrap();
        assert_eq!(sat.finalize(), "ab12");
    }

    #[test]
    fn test_shorthands_use_default_pad() {
        let mut buf = TextBuffer::with_config(BufferConfig {
            default_pad: '_',
            ..BufferConfig::with_capacity(32)
        })
        .unwrap();
        buf.append_u32(7).unwrap();
        buf.append_char(' ').unwrap();
        buf.append_i32(-7).unwrap();
        buf.append_char(' ').unwrap();
        buf.append_u64(u64::MAX).unwrap();
        buf.append_char(' ').unwrap();
        buf.append_i64_padded(3, 3).unwrap();
        assert_eq!(buf.finalize(), "7 -7 18446744073709551615 __3");
    }

    fn base_strategy() -> impl Strategy<Value = u32> {
        2u32..=16
    }

    proptest! {
        #[test]
        fn prop_u64_round_trips(value in any::<u64>(), base in base_strategy()) {
            let text = render(|b| format_u64(b, value, 0, ' ', base));
            prop_assert_eq!(u64::from_str_radix(&text, base).unwrap(), value);
        }

        #[test]
        fn prop_u32_round_trips(value in any::<u32>(), base in base_strategy()) {
            let text = render(|b| format_u32(b, value, 0, ' ', base));
            prop_assert_eq!(u32::from_str_radix(&text, base).unwrap(), value);
        }

        #[test]
        fn prop_i64_round_trips(value in any::<i64>(), base in base_strategy()) {
            let text = render(|b| format_i64(b, value, 0, ' ', base));
            prop_assert_eq!(i64::from_str_radix(&text, base).unwrap(), value);
        }

        #[test]
        fn prop_i32_matches_std(value in any::<i32>()) {
            let text = render(|b| format_i32(b, value, 0, ' ', DECIMAL));
            prop_assert_eq!(text, value.to_string());
        }

        #[test]
        fn prop_padding_never_truncates(value in any::<u64>(), width in 0u32..=20) {
            let text = render(|b| format_u64(b, value, width, '0', DECIMAL));
            let natural = value.to_string();
            prop_assert_eq!(text.len(), natural.len().max(width as usize));
            prop_assert!(text.ends_with(&natural));
        }
    }
}
