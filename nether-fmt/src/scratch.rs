//! Stack staging area for a single formatted value
//!
//! Digits come out of `value % base` least significant first, so the scratch
//! fills from the back. The finished run is then copied into the buffer in one
//! atomic append.

use crate::digits;

/// Sign + 64 binary digits; also covers every padded decimal and float layout.
pub(crate) const SCRATCH_LEN: usize = 65;

pub(crate) struct Scratch {
    chars: [char; SCRATCH_LEN],
    start: usize,
}

impl Scratch {
    pub(crate) fn new() -> Self {
        Self {
            chars: ['\0'; SCRATCH_LEN],
            start: SCRATCH_LEN,
        }
    }

    #[inline]
    pub(crate) fn push_front(&mut self, c: char) {
        debug_assert!(self.start > 0, "scratch exhausted");
        self.start -= 1;
        self.chars[self.start] = c;
    }

    /// Stage `value` in `base`, left-padded to `pad_len` extra characters and
    /// optionally prefixed with `-`.
    pub(crate) fn push_unsigned(
        &mut self,
        mut value: u64,
        base: u32,
        pad_len: usize,
        pad_char: char,
        negative: bool,
    ) {
        let base = u64::from(base);
        loop {
            self.push_front(digits::digit(value % base));
            value /= base;
            if value == 0 {
                break;
            }
        }
        for _ in 0..pad_len {
            self.push_front(pad_char);
        }
        if negative {
            self.push_front('-');
        }
    }

    pub(crate) fn as_slice(&self) -> &[char] {
        &self.chars[self.start..]
    }
}
