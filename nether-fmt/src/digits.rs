//! Digit lookup for bases 2 through 16
//!
//! `A`-`F` do not follow `9` in ASCII, so digits come from a table rather than
//! from arithmetic on `'0'`.

/// Base 2
pub const BINARY: u32 = 2;
/// Base 10
pub const DECIMAL: u32 = 10;
/// Base 16
pub const HEX: u32 = 16;

/// Smallest supported base
pub const MIN_BASE: u32 = 2;
/// Largest supported base
pub const MAX_BASE: u32 = 16;

/// Upper-case digits for every supported base
pub const DIGITS: [char; 16] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F',
];

/// Character for a single digit value.
///
/// Callers guarantee `value < 16`; every caller derives it from `x % base`.
#[inline]
pub fn digit(value: u64) -> char {
    DIGITS[value as usize]
}

/// Whether `base` can be rendered with [`DIGITS`]
#[inline]
pub fn is_supported_base(base: u32) -> bool {
    (MIN_BASE..=MAX_BASE).contains(&base)
}

/// Number of digits `value` needs in `base` (at least 1, for zero).
pub fn count_digits(mut value: u64, base: u32) -> usize {
    let base = u64::from(base);
    let mut count = 0;
    loop {
        value /= base;
        count += 1;
        if value == 0 {
            return count;
        }
    }
}
