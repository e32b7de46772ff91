//! Fixed-capacity text buffer
//!
//! [`TextBuffer`] owns one boxed `[char]` slice for its whole life. The
//! `cursor` marks how much of it holds this frame's text; everything past the
//! cursor is stale. Writes check the total length they are about to produce
//! against the free space before touching storage, so a rejected or dropped
//! write leaves both content and cursor unchanged.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::FormatError;
use crate::{DECIMALS_LIMIT, DEFAULT_MAX_DECIMALS};

/// What happens when a write does not fit in the remaining capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OverflowPolicy {
    /// Fail with [`FormatError::BufferOverflow`]
    #[default]
    Strict,
    /// Silently drop the whole write
    Saturating,
}

/// Shape of the value produced by [`TextBuffer::finalize`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FinalizeMode {
    /// Exactly the written characters
    #[default]
    Trimmed,
    /// Always `capacity` characters; the unwritten tail is filled with the sentinel
    Sentinel(char),
}

/// How floats that are NaN or infinite are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum NonFiniteMode {
    /// `NaN`, `+∞` or `-∞`
    #[default]
    Tokens,
    /// Run the numeric algorithm anyway (saturating casts, meaningless digits)
    Raw,
}

/// Construction-time parameters of a [`TextBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferConfig {
    /// Capacity in characters (default: 256)
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    /// Overflow policy (default: Strict)
    #[serde(default)]
    pub overflow: OverflowPolicy,
    /// Finalize shape (default: Trimmed)
    #[serde(default)]
    pub finalize: FinalizeMode,
    /// Non-finite float handling (default: Tokens)
    #[serde(default)]
    pub non_finite: NonFiniteMode,
    /// Pad character used by the shorthand appenders (default: space)
    #[serde(default = "default_pad_char")]
    pub default_pad: char,
    /// Decimal places are clamped to this (default: 2, at most 7)
    #[serde(default = "default_max_decimals")]
    pub max_decimals: u32,
}

fn default_capacity() -> usize {
    256
}
fn default_pad_char() -> char {
    ' '
}
fn default_max_decimals() -> u32 {
    DEFAULT_MAX_DECIMALS
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            overflow: OverflowPolicy::default(),
            finalize: FinalizeMode::default(),
            non_finite: NonFiniteMode::default(),
            default_pad: default_pad_char(),
            max_decimals: default_max_decimals(),
        }
    }
}

impl BufferConfig {
    /// Default configuration with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    /// Smallest capacity this configuration accepts.
    ///
    /// The sentinel shape needs room for at least one character plus its
    /// terminator.
    pub fn minimum_capacity(&self) -> usize {
        match self.finalize {
            FinalizeMode::Trimmed => 1,
            FinalizeMode::Sentinel(_) => 2,
        }
    }
}

/// Reusable fixed-capacity character buffer.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    storage: Box<[char]>,
    cursor: usize,
    config: BufferConfig,
}

impl TextBuffer {
    /// Create a strict, trimmed buffer holding `capacity` characters.
    ///
    /// # Errors
    ///
    /// [`FormatError::InvalidSize`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, FormatError> {
        Self::with_config(BufferConfig::with_capacity(capacity))
    }

    /// Create a buffer from a full configuration.
    ///
    /// This is the only allocation the buffer ever makes. `max_decimals` is
    /// clamped to [`DECIMALS_LIMIT`].
    ///
    /// # Errors
    ///
    /// [`FormatError::InvalidSize`] if the capacity is below
    /// [`BufferConfig::minimum_capacity`].
    pub fn with_config(mut config: BufferConfig) -> Result<Self, FormatError> {
        let minimum = config.minimum_capacity();
        if config.capacity < minimum {
            return Err(FormatError::InvalidSize {
                capacity: config.capacity,
                minimum,
            });
        }
        config.max_decimals = config.max_decimals.min(DECIMALS_LIMIT);

        Ok(Self {
            storage: vec!['\0'; config.capacity].into_boxed_slice(),
            cursor: 0,
            config,
        })
    }

    /// Construction parameters
    pub fn config(&self) -> &BufferConfig {
        &self.config
    }

    /// Characters written since the last finalize
    #[inline]
    pub fn len(&self) -> usize {
        self.cursor
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cursor == 0
    }

    /// Fixed capacity in characters
    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Free characters left before overflow
    #[inline]
    pub fn remaining(&self) -> usize {
        self.storage.len() - self.cursor
    }

    pub fn is_saturating(&self) -> bool {
        self.config.overflow == OverflowPolicy::Saturating
    }

    /// The written content
    pub fn as_chars(&self) -> &[char] {
        &self.storage[..self.cursor]
    }

    /// Discard the written content without producing output.
    pub fn clear(&mut self) {
        self.cursor = 0;
    }

    /// Shorten the written content to `len` characters.
    ///
    /// Has no effect if `len` is not shorter than the current length.
    pub fn truncate(&mut self, len: usize) {
        if len < self.cursor {
            self.cursor = len;
        }
    }

    /// Check that `count` more characters fit.
    ///
    /// `Ok(true)` means write, `Ok(false)` means a saturating buffer is
    /// dropping the write.
    pub(crate) fn reserve(&self, count: usize) -> Result<bool, FormatError> {
        let available = self.remaining();
        if count <= available {
            return Ok(true);
        }
        match self.config.overflow {
            OverflowPolicy::Strict => Err(FormatError::BufferOverflow {
                requested: count,
                available,
            }),
            OverflowPolicy::Saturating => {
                tracing::trace!(requested = count, available, "dropping write on full text buffer");
                Ok(false)
            }
        }
    }

    /// Copy an already-reserved run into storage.
    fn write_reserved(&mut self, chars: &[char]) {
        let end = self.cursor + chars.len();
        self.storage[self.cursor..end].copy_from_slice(chars);
        self.cursor = end;
    }

    /// Append a single character.
    pub fn append_char(&mut self, c: char) -> Result<(), FormatError> {
        if self.reserve(1)? {
            self.storage[self.cursor] = c;
            self.cursor += 1;
        }
        Ok(())
    }

    /// Append every character of `chars`, all or nothing.
    pub fn append_chars(&mut self, chars: &[char]) -> Result<(), FormatError> {
        if self.reserve(chars.len())? {
            self.write_reserved(chars);
        }
        Ok(())
    }

    /// Append `count` characters of `source` starting at `offset`, all or nothing.
    ///
    /// # Errors
    ///
    /// [`FormatError::InvalidSpec`] if the range falls outside `source`, or
    /// [`FormatError::BufferOverflow`] in strict mode.
    pub fn append_slice(
        &mut self,
        source: &[char],
        offset: usize,
        count: usize,
    ) -> Result<(), FormatError> {
        let range = offset
            .checked_add(count)
            .filter(|&end| end <= source.len())
            .map(|end| offset..end)
            .ok_or(FormatError::InvalidSpec {
                position: offset,
                reason: "slice range exceeds source length",
            })?;
        if count == 0 {
            return Ok(());
        }
        self.append_chars(&source[range])
    }

    /// Append a string, all or nothing.
    pub fn append_str(&mut self, s: &str) -> Result<(), FormatError> {
        let count = s.chars().count();
        if self.reserve(count)? {
            for (slot, c) in self.storage[self.cursor..self.cursor + count]
                .iter_mut()
                .zip(s.chars())
            {
                *slot = c;
            }
            self.cursor += count;
        }
        Ok(())
    }

    /// Append `c` repeated `count` times, all or nothing.
    pub fn append_repeat(&mut self, c: char, count: usize) -> Result<(), FormatError> {
        if self.reserve(count)? {
            let end = self.cursor + count;
            self.storage[self.cursor..end].fill(c);
            self.cursor = end;
        }
        Ok(())
    }

    /// Append `true` or `false`.
    pub fn append_bool(&mut self, value: bool) -> Result<(), FormatError> {
        self.append_str(if value { "true" } else { "false" })
    }

    /// Copy the written content into a fresh `String` and reset the cursor.
    ///
    /// See [`finalize_into`](Self::finalize_into) for the allocation-free form.
    pub fn finalize(&mut self) -> String {
        let mut out = String::new();
        self.finalize_into(&mut out);
        out
    }

    /// Replace the contents of `out` with the written text and reset the cursor.
    ///
    /// An empty buffer always produces an empty string. With
    /// [`FinalizeMode::Sentinel`] a non-empty result is padded to `capacity`
    /// characters. Once `out` has grown to fit a frame, reusing it costs no
    /// further allocation.
    pub fn finalize_into(&mut self, out: &mut String) {
        out.clear();
        if self.cursor == 0 {
            return;
        }

        out.extend(self.storage[..self.cursor].iter());
        if let FinalizeMode::Sentinel(sentinel) = self.config.finalize {
            self.storage[self.cursor..].fill(sentinel);
            out.extend(self.storage[self.cursor..].iter());
        }

        self.cursor = 0;
    }
}

impl fmt::Write for TextBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.append_str(s).map_err(|_| fmt::Error)
    }

    fn write_char(&mut self, c: char) -> fmt::Result {
        self.append_char(c).map_err(|_| fmt::Error)
    }
}
