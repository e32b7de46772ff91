//! `f32` formatting
//!
//! Two fraction policies exist. [`FractionRounding::Truncate`] writes the
//! truncated integer part and then peels fractional digits by repeated
//! multiplication by ten, with no rounding of the last digit: `2.005` with two
//! places prints `2.00`. It is cheap and stable frame to frame, which is what a
//! jittery overlay value wants. [`FractionRounding::HalfAwayFromZero`] adds half
//! a unit of the last place before splitting, so `16.67` with one place prints
//! `16.7`.
//!
//! Both clamp `decimal_places` to the buffer's `max_decimals`, pad only the
//! integer part (widths above [`MAX_PAD_FLOAT`] are ignored), and with zero
//! decimal places round half away from zero.
//!
//! The integer part is a `u64`. Finite values beyond `u64::MAX` print
//! `18446744073709551615` with their sign, and the fraction digits stay those
//! of the value itself (all zeros at that magnitude).

use serde::{Deserialize, Serialize};

use crate::digits::{self, DECIMAL};
use crate::integer::format_magnitude;
use crate::scratch::Scratch;
use crate::{DECIMALS_LIMIT, FormatError, MAX_PAD_FLOAT, NonFiniteMode, TextBuffer};
use crate::{NAN_TOKEN, NEG_INFINITY_TOKEN, POS_INFINITY_TOKEN};

/// How the last fractional digit is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FractionRounding {
    /// Digits are truncated, never rounded
    #[default]
    Truncate,
    /// Round half away from zero at the last written place
    HalfAwayFromZero,
}

/// Format `value` with the given fraction policy.
pub fn format_f32_with(
    buf: &mut TextBuffer,
    value: f32,
    decimal_places: u32,
    min_width: u32,
    pad_char: char,
    rounding: FractionRounding,
) -> Result<(), FormatError> {
    match rounding {
        FractionRounding::Truncate => format_f32(buf, value, decimal_places, min_width, pad_char),
        FractionRounding::HalfAwayFromZero => {
            format_f32_rounded(buf, value, decimal_places, min_width, pad_char)
        }
    }
}

/// Format `value` with truncated fractional digits.
pub fn format_f32(
    buf: &mut TextBuffer,
    value: f32,
    decimal_places: u32,
    min_width: u32,
    pad_char: char,
) -> Result<(), FormatError> {
    if write_non_finite(buf, value)? {
        return Ok(());
    }

    let decimals = decimal_places.min(buf.config().max_decimals) as usize;
    if decimals == 0 {
        let rounded = (value.abs() + 0.5) as u64;
        return format_magnitude(
            buf,
            rounded,
            value < 0.0 && rounded > 0,
            min_width,
            MAX_PAD_FLOAT,
            pad_char,
            DECIMAL,
        );
    }

    let int_part = value.trunc();
    let mut remainder = (value - int_part).abs();
    let mut fraction = ['0'; DECIMALS_LIMIT as usize];
    for slot in fraction.iter_mut().take(decimals) {
        remainder *= 10.0;
        *slot = digits::digit(u64::from(remainder as u32 % 10));
    }

    let mut scratch = Scratch::new();
    for &c in fraction[..decimals].iter().rev() {
        scratch.push_front(c);
    }
    scratch.push_front('.');
    push_integer_part(&mut scratch, int_part.abs() as u64, value < 0.0, min_width, pad_char);
    buf.append_chars(scratch.as_slice())
}

/// Format `value` rounded half away from zero at the last decimal place.
pub fn format_f32_rounded(
    buf: &mut TextBuffer,
    value: f32,
    decimal_places: u32,
    min_width: u32,
    pad_char: char,
) -> Result<(), FormatError> {
    if write_non_finite(buf, value)? {
        return Ok(());
    }

    let decimals = decimal_places.min(buf.config().max_decimals) as usize;
    let scale = 10u64.pow(decimals as u32);
    let magnitude = f64::from(value).abs();
    let whole = magnitude.trunc();
    // The fraction of an f32 scaled by at most 10^7 is exact in f64, so ties stay ties
    let mut fraction = ((magnitude - whole) * scale as f64 + 0.5).floor() as u64;
    let mut int_part = whole as u64;
    if fraction >= scale {
        fraction -= scale;
        int_part = int_part.saturating_add(1);
    }

    let mut scratch = Scratch::new();
    if decimals > 0 {
        for _ in 0..decimals {
            scratch.push_front(digits::digit(fraction % 10));
            fraction /= 10;
        }
        scratch.push_front('.');
    }
    push_integer_part(&mut scratch, int_part, value < 0.0, min_width, pad_char);
    buf.append_chars(scratch.as_slice())
}

fn push_integer_part(
    scratch: &mut Scratch,
    magnitude: u64,
    negative: bool,
    min_width: u32,
    pad_char: char,
) {
    let min_width = if min_width <= MAX_PAD_FLOAT { min_width as usize } else { 0 };
    let pad_len = min_width.saturating_sub(digits::count_digits(magnitude, DECIMAL));
    scratch.push_unsigned(magnitude, DECIMAL, pad_len, pad_char, negative);
}

/// Write the NaN/infinity token if the buffer is configured for it.
///
/// Returns whether `value` was handled.
fn write_non_finite(buf: &mut TextBuffer, value: f32) -> Result<bool, FormatError> {
    if value.is_finite() || buf.config().non_finite == NonFiniteMode::Raw {
        return Ok(false);
    }
    let token = if value.is_nan() {
        NAN_TOKEN
    } else if value.is_sign_negative() {
        NEG_INFINITY_TOKEN
    } else {
        POS_INFINITY_TOKEN
    };
    buf.append_str(token)?;
    Ok(true)
}

impl TextBuffer {
    /// Truncated `f32` with the configured maximum decimal places, no padding
    pub fn append_f32(&mut self, value: f32) -> Result<(), FormatError> {
        let (decimals, pad) = (self.config().max_decimals, self.config().default_pad);
        format_f32(self, value, decimals, 0, pad)
    }

    /// Truncated `f32` with explicit decimal places, no padding
    pub fn append_f32_places(&mut self, value: f32, decimal_places: u32) -> Result<(), FormatError> {
        let pad = self.config().default_pad;
        format_f32(self, value, decimal_places, 0, pad)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BufferConfig, OverflowPolicy};

    fn truncated(value: f32, places: u32, width: u32, pad: char) -> String {
        let mut buf = TextBuffer::new(64).unwrap();
        format_f32(&mut buf, value, places, width, pad).unwrap();
        buf.finalize()
    }

    fn rounded(value: f32, places: u32, width: u32, pad: char) -> String {
        let mut buf = TextBuffer::new(64).unwrap();
        format_f32_rounded(&mut buf, value, places, width, pad).unwrap();
        buf.finalize()
    }

    #[test]
    fn test_truncated_basic() {
        assert_eq!(truncated(3.14159, 2, 0, ' '), "3.14");
        assert_eq!(truncated(0.0, 2, 0, ' '), "0.00");
        assert_eq!(truncated(10.5, 1, 0, ' '), "10.5");
        assert_eq!(truncated(-2.75, 2, 0, ' '), "-2.75");
    }

    #[test]
    fn test_truncated_does_not_round_last_digit() {
        assert_eq!(truncated(2.005, 2, 0, ' '), "2.00");
        assert_eq!(truncated(16.67, 1, 0, ' '), "16.6");
        assert_eq!(truncated(0.999, 2, 0, ' '), "0.99");
    }

    #[test]
    fn test_zero_places_rounds_half_away_from_zero() {
        assert_eq!(truncated(-0.5, 0, 0, ' '), "-1");
        assert_eq!(truncated(0.5, 0, 0, ' '), "1");
        assert_eq!(truncated(2.4, 0, 0, ' '), "2");
        assert_eq!(truncated(-2.4, 0, 0, ' '), "-2");
        assert_eq!(rounded(-0.5, 0, 0, ' '), "-1");
        assert_eq!(rounded(59.6, 0, 0, ' '), "60");
    }

    #[test]
    fn test_small_negative_keeps_sign() {
        assert_eq!(truncated(-0.5, 2, 0, ' '), "-0.50");
        assert_eq!(rounded(-0.25, 1, 0, ' '), "-0.3");
    }

    #[test]
    fn test_decimal_places_clamped() {
        assert_eq!(truncated(1.23456, 5, 0, ' '), "1.23");
        assert_eq!(rounded(1.23456, 5, 0, ' '), "1.23");

        let mut buf = TextBuffer::with_config(BufferConfig {
            max_decimals: 4,
            ..BufferConfig::with_capacity(32)
        })
        .unwrap();
        format_f32(&mut buf, 1.5, 9, 0, ' ').unwrap();
        assert_eq!(buf.finalize(), "1.5000");
    }

    #[test]
    fn test_padding_applies_to_integer_part() {
        assert_eq!(truncated(3.5, 1, 3, '0'), "003.5");
        assert_eq!(truncated(-3.5, 1, 3, ' '), "-  3.5");
        assert_eq!(truncated(123456.0, 1, 3, '0'), "123456.0");
        assert_eq!(truncated(3.5, 1, 6, '0'), "3.5");
        assert_eq!(rounded(5.25, 2, 5, ' '), "    5.25");
    }

    #[test]
    fn test_rounded() {
        assert_eq!(rounded(16.67, 1, 0, ' '), "16.7");
        assert_eq!(rounded(3.14159, 2, 0, ' '), "3.14");
        assert_eq!(rounded(9.996, 2, 0, ' '), "10.00");
        assert_eq!(rounded(0.05, 1, 0, ' '), "0.1");
        assert_eq!(rounded(42.0, 0, 0, ' '), "42");
    }

    #[test]
    fn test_huge_values_saturate_integer_part() {
        let max = "18446744073709551615";
        assert_eq!(rounded(-3.4e38, 2, 0, ' '), format!("-{max}.00"));
        assert_eq!(truncated(-3.4e38, 2, 0, ' '), format!("-{max}.00"));
        assert_eq!(rounded(3.4e38, 0, 0, ' '), max);
        assert_eq!(truncated(3.4e38, 0, 0, ' '), max);
        assert_eq!(truncated(-3.4e38, 0, 0, ' '), format!("-{max}"));

        // Below the limit every integer digit survives
        assert_eq!(rounded(1.0e19, 1, 0, ' '), "9999999980506447872.0");
        assert_eq!(truncated(1.0e19, 1, 0, ' '), "9999999980506447872.0");
    }

    #[test]
    fn test_non_finite_tokens() {
        assert_eq!(truncated(f32::NAN, 2, 0, ' '), "NaN");
        assert_eq!(truncated(f32::INFINITY, 2, 0, ' '), "+∞");
        assert_eq!(truncated(f32::NEG_INFINITY, 0, 0, ' '), "-∞");
        assert_eq!(rounded(f32::NAN, 1, 0, ' '), "NaN");
    }

    #[test]
    fn test_non_finite_raw() {
        let mut buf = TextBuffer::with_config(BufferConfig {
            non_finite: NonFiniteMode::Raw,
            ..BufferConfig::with_capacity(64)
        })
        .unwrap();
        format_f32(&mut buf, f32::NAN, 2, 0, ' ').unwrap();
        assert_eq!(buf.finalize(), "0.00");

        format_f32(&mut buf, f32::INFINITY, 0, 0, ' ').unwrap();
        assert_eq!(buf.finalize(), u64::MAX.to_string());
    }

    #[test]
    fn test_float_write_is_atomic() {
        let mut buf = TextBuffer::new(4).unwrap();
        assert!(matches!(
            format_f32(&mut buf, 12.34, 2, 0, ' '),
            Err(FormatError::BufferOverflow { requested: 5, .. })
        ));
        assert!(buf.is_empty());

        let mut sat = TextBuffer::with_config(BufferConfig {
            overflow: OverflowPolicy::Saturating,
            ..BufferConfig::with_capacity(2)
        })
        .unwrap();
        format_f32(&mut sat, f32::NAN, 2, 0, ' ').unwrap();
        assert!(sat.is_empty());
    }

    #[test]
    fn test_dispatch_and_shorthands() {
        let mut buf = TextBuffer::new(32).unwrap();
        format_f32_with(&mut buf, 16.67, 1, 0, ' ', FractionRounding::HalfAwayFromZero).unwrap();
        buf.append_char(' ').unwrap();
        format_f32_with(&mut buf, 16.67, 1, 0, ' ', FractionRounding::Truncate).unwrap();
        buf.append_char(' ').unwrap();
        buf.append_f32(1.0 / 3.0).unwrap();
        buf.append_char(' ').unwrap();
        buf.append_f32_places(2.5, 0).unwrap();
        assert_eq!(buf.finalize(), "16.7 16.6 0.33 3");
    }
}
