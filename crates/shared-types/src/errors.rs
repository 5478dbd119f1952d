//! # Error Types
//!
//! Format errors raised while reading a persisted object. All of them are
//! fatal: a reader never guesses at a layout it does not understand.

use thiserror::Error;

/// Errors raised by the binary streams and the versioned envelope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Format version tag is zero or newer than the reader knows.
    #[error("Unsupported format version {version} for {type_name} (max {max})")]
    BadVersion {
        type_name: &'static str,
        version: u16,
        max: u16,
    },

    /// An object marker was not where the layout says it must be.
    #[error("Stream corrupt: expected marker {expected:#04x}, found {found:#04x}")]
    BadMarker { expected: u8, found: u8 },

    /// The stream ended in the middle of a value.
    #[error("Unexpected end of stream: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof { needed: usize, remaining: usize },

    /// A persisted string was not valid UTF-8.
    #[error("Invalid UTF-8 in persisted string")]
    InvalidUtf8,

    /// A value is too long to carry in a u32 length prefix.
    #[error("Length {0} does not fit the stream length prefix")]
    LengthOverflow(usize),

    /// Bytes left over after the final end marker.
    #[error("Trailing data: {0} bytes after end of object")]
    TrailingBytes(usize),

    /// A field carried a value outside its domain.
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: u64 },
}

impl FormatError {
    /// Returns true for version tag rejections.
    #[must_use]
    pub fn is_version_error(&self) -> bool {
        matches!(self, FormatError::BadVersion { .. })
    }
}
