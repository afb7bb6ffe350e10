//! Error types for hds-bootstrap

use std::io;

use crate::boxes::FourCC;

/// Result type for hds-bootstrap operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while decoding bootstrap boxes
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Fewer bytes remain in the buffer than a field requires
    #[error("truncated input at offset {offset}: need {needed} bytes, {remaining} remain")]
    TruncatedInput {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    /// The buffer's box tag does not match the box kind being decoded
    #[error("unexpected box type: expected '{expected}', found '{found}'")]
    UnexpectedBoxType { expected: FourCC, found: FourCC },

    /// A box's declared total size disagrees with its encoded length
    #[error("'{box_type}' box declares {declared} bytes but encodes {consumed}")]
    BoxSizeMismatch {
        box_type: FourCC,
        declared: u64,
        consumed: u64,
    },

    /// A contained asrt or afrt box failed to decode
    #[error("nested '{expected}' box {index} failed to decode: {source}")]
    NestedBoxDecodeFailed {
        index: usize,
        expected: FourCC,
        source: Box<Error>,
    },
}
