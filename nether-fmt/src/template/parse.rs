//! Placeholder parsing

use crate::FormatError;

/// Parsed `:SPEC` section of a placeholder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct FormatSpec {
    /// Zero-padded minimum width
    pub width: u32,
    /// Hexadecimal output
    pub hex: bool,
    /// Explicit decimal places (`None` = formatter default)
    pub decimals: Option<u32>,
}

/// A placeholder spanning `start..end` in the template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Placeholder {
    pub index: usize,
    pub spec: FormatSpec,
    pub start: usize,
    pub end: usize,
}

/// Parse the placeholder whose `{` sits at `start`.
pub(crate) fn placeholder(bytes: &[u8], start: usize) -> Result<Placeholder, FormatError> {
    let unclosed = FormatError::UnclosedPlaceholder { position: start };
    let mut pos = start + 1;

    let index = match bytes.get(pos) {
        None => return Err(unclosed),
        Some(&b) if b.is_ascii_digit() => usize::from(b - b'0'),
        Some(_) => {
            return Err(FormatError::InvalidSpec {
                position: start,
                reason: "expected an argument index",
            });
        }
    };
    pos += 1;

    if bytes.get(pos).is_some_and(u8::is_ascii_digit) {
        return Err(FormatError::InvalidSpec {
            position: start,
            reason: "argument index must be a single digit",
        });
    }

    let mut spec = FormatSpec::default();
    if bytes.get(pos) == Some(&b':') {
        pos += 1;
        let zeros = count_zeros(bytes, &mut pos);
        spec.width = zeros;

        match bytes.get(pos) {
            Some(b'X') => {
                spec.hex = true;
                pos += 1;
                if let Some(&b) = bytes.get(pos).filter(|b| b.is_ascii_digit()) {
                    spec.width = u32::from(b - b'0');
                    pos += 1;
                }
            }
            Some(b'.') => {
                pos += 1;
                spec.decimals = Some(count_zeros(bytes, &mut pos));
            }
            _ => {}
        }
    }

    match bytes.get(pos) {
        Some(b'}') => Ok(Placeholder {
            index,
            spec,
            start,
            end: pos + 1,
        }),
        None => Err(unclosed),
        Some(_) => Err(FormatError::InvalidSpec {
            position: start,
            reason: "unexpected character in placeholder",
        }),
    }
}

fn count_zeros(bytes: &[u8], pos: &mut usize) -> u32 {
    let mut count = 0;
    while bytes.get(*pos) == Some(&b'0') {
        count += 1;
        *pos += 1;
    }
    count
}
