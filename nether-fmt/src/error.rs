/// Errors raised while building or writing into a [`TextBuffer`](crate::TextBuffer)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// Buffer capacity below what the configuration requires
    #[error("invalid buffer size {capacity} (must be at least {minimum})")]
    InvalidSize { capacity: usize, minimum: usize },

    /// Write does not fit in the remaining capacity (strict mode only)
    #[error("not enough free space to accommodate {requested} characters ({available} available)")]
    BufferOverflow { requested: usize, available: usize },

    /// Numeric base outside 2-16
    #[error("unsupported base {0} (must be 2-16)")]
    InvalidBase(u32),

    /// Template placeholder opened with `{` but never closed
    #[error("unclosed placeholder starting at byte {position}")]
    UnclosedPlaceholder { position: usize },

    /// Template placeholder refers to a missing argument
    #[error("placeholder refers to argument {index} but only {available} were supplied")]
    ArgumentIndex { index: usize, available: usize },

    /// Template placeholder or slice request is malformed
    #[error("invalid format spec at byte {position}: {reason}")]
    InvalidSpec { position: usize, reason: &'static str },
}
