//! Error types for cbash-common.

use thiserror::Error;

/// Common error type for buffer marshaling.
#[derive(Debug, Error)]
pub enum Error {
    /// End of buffer reached while reading.
    #[error("unexpected end of buffer: needed {needed} bytes but only {available} available")]
    UnexpectedEof { needed: usize, available: usize },

    /// A four-character tag was not exactly four bytes long.
    #[error("invalid tag {0:?}: expected exactly 4 bytes")]
    InvalidTag(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
