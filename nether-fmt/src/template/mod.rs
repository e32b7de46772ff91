//! Positional templates
//!
//! A deliberately small subset of .NET-style composite formatting, enough for
//! the handful of fixed overlay lines:
//!
//! ```text
//! {{            literal '{'
//! {N}           argument N (0-3), default formatting
//! {N:SPEC}      argument N with a spec
//!
//! SPEC := ZEROS [ 'X' [DIGIT] | '.' ZEROS ]
//!   ZEROS   - each '0' adds one to the zero-padded minimum width
//!   X       - hexadecimal; a trailing digit overrides the width
//!   . ZEROS - decimal places, one per '0' (floats only)
//! ```
//!
//! The template is scanned once. Literal runs are copied straight into the
//! buffer and each placeholder dispatches to the integer or float formatter.
//! Floats in templates round half away from zero at the last place, so
//! `{0:0.0}` of `16.67` prints `16.7`.
//!
//! A malformed template is a caller bug; it surfaces as a [`FormatError`] and the
//! buffer is rewound to where it was before the call.

mod parse;

use crate::digits::{DECIMAL, HEX};
use crate::float::format_f32_rounded;
use crate::integer::{format_i32, format_i64, format_u32, format_u64};
use crate::{FormatError, TextBuffer};

use parse::{FormatSpec, Placeholder};

/// Most positional arguments a template can reference
pub const MAX_ARGS: usize = 4;

/// A template argument, tagged with its kind at the call site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Arg<'a> {
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    Char(char),
    Bool(bool),
    Text(&'a str),
}

impl From<i32> for Arg<'_> {
    fn from(value: i32) -> Self {
        Arg::I32(value)
    }
}

impl From<u32> for Arg<'_> {
    fn from(value: u32) -> Self {
        Arg::U32(value)
    }
}

impl From<i64> for Arg<'_> {
    fn from(value: i64) -> Self {
        Arg::I64(value)
    }
}

impl From<u64> for Arg<'_> {
    fn from(value: u64) -> Self {
        Arg::U64(value)
    }
}

impl From<f32> for Arg<'_> {
    fn from(value: f32) -> Self {
        Arg::F32(value)
    }
}

impl From<char> for Arg<'_> {
    fn from(value: char) -> Self {
        Arg::Char(value)
    }
}

impl From<bool> for Arg<'_> {
    fn from(value: bool) -> Self {
        Arg::Bool(value)
    }
}

impl<'a> From<&'a str> for Arg<'a> {
    fn from(value: &'a str) -> Self {
        Arg::Text(value)
    }
}

/// Expand `template` into `buf`.
///
/// # Errors
///
/// Template errors ([`FormatError::UnclosedPlaceholder`],
/// [`FormatError::ArgumentIndex`], [`FormatError::InvalidSpec`]) and strict
/// overflow. On error the buffer is rewound to its length before the call.
pub fn format(buf: &mut TextBuffer, template: &str, args: &[Arg<'_>]) -> Result<(), FormatError> {
    let mark = buf.len();
    let result = expand(buf, template, args);
    if result.is_err() {
        buf.truncate(mark);
    }
    result
}

fn expand(buf: &mut TextBuffer, template: &str, args: &[Arg<'_>]) -> Result<(), FormatError> {
    let bytes = template.as_bytes();
    let mut run_start = 0;
    let mut pos = 0;

    while pos < bytes.len() {
        if bytes[pos] != b'{' {
            pos += 1;
            continue;
        }

        buf.append_str(&template[run_start..pos])?;

        if bytes.get(pos + 1) == Some(&b'{') {
            buf.append_char('{')?;
            pos += 2;
        } else {
            let placeholder = parse::placeholder(bytes, pos)?;
            let arg = args
                .get(placeholder.index)
                .filter(|_| placeholder.index < MAX_ARGS)
                .ok_or(FormatError::ArgumentIndex {
                    index: placeholder.index,
                    available: args.len().min(MAX_ARGS),
                })?;
            write_arg(buf, arg, &placeholder)?;
            pos = placeholder.end;
        }
        run_start = pos;
    }

    buf.append_str(&template[run_start..])
}

fn write_arg(buf: &mut TextBuffer, arg: &Arg<'_>, placeholder: &Placeholder) -> Result<(), FormatError> {
    let spec = placeholder.spec;
    let invalid = |reason| FormatError::InvalidSpec {
        position: placeholder.start,
        reason,
    };

    match *arg {
        Arg::I32(v) => format_i32(buf, v, spec.width, '0', integer_base(spec).map_err(invalid)?),
        Arg::U32(v) => format_u32(buf, v, spec.width, '0', integer_base(spec).map_err(invalid)?),
        Arg::I64(v) => format_i64(buf, v, spec.width, '0', integer_base(spec).map_err(invalid)?),
        Arg::U64(v) => format_u64(buf, v, spec.width, '0', integer_base(spec).map_err(invalid)?),
        Arg::F32(v) => {
            if spec.hex {
                return Err(invalid("hexadecimal on a float argument"));
            }
            let decimals = spec.decimals.unwrap_or(buf.config().max_decimals);
            format_f32_rounded(buf, v, decimals, spec.width, '0')
        }
        Arg::Char(c) => {
            require_plain(spec).map_err(invalid)?;
            buf.append_char(c)
        }
        Arg::Bool(b) => {
            require_plain(spec).map_err(invalid)?;
            buf.append_bool(b)
        }
        Arg::Text(s) => {
            require_plain(spec).map_err(invalid)?;
            buf.append_str(s)
        }
    }
}

fn integer_base(spec: FormatSpec) -> Result<u32, &'static str> {
    match (spec.hex, spec.decimals) {
        (_, Some(_)) => Err("decimal places on an integer argument"),
        (true, None) => Ok(HEX),
        (false, None) => Ok(DECIMAL),
    }
}

fn require_plain(spec: FormatSpec) -> Result<(), &'static str> {
    if spec == FormatSpec::default() {
        Ok(())
    } else {
        Err("format spec on a non-numeric argument")
    }
}

impl TextBuffer {
    /// Expand a positional template; see [`template::format`](format).
    pub fn append_format(&mut self, template: &str, args: &[Arg<'_>]) -> Result<(), FormatError> {
        format(self, template, args)
    }
}
