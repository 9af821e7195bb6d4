//! Error types for record access.

use cbash_common::Signature;
use thiserror::Error;

/// Errors that can occur when reading or writing record fields.
#[derive(Debug, Error)]
pub enum Error {
    /// A symbolic reference had to be written but cannot be resolved in the
    /// destination collection, or is known to be unsafe.
    #[error("invalid reference {0}")]
    InvalidReference(String),

    /// A fixed-size array was written with the wrong number of elements.
    #[error("{field}: expected {expected} elements, got {actual}")]
    SizeMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// No field with this name on the record type or list entry.
    #[error("no field {field} on {signature}")]
    UnknownField { signature: Signature, field: String },

    /// The value's type does not fit the field.
    #[error("{field}: expected {expected}, got {actual}")]
    TypeMismatch {
        field: &'static str,
        expected: &'static str,
        actual: &'static str,
    },

    /// The list would be nested deeper than the engine can address.
    #[error("list nesting deeper than {0} levels")]
    NestingTooDeep(usize),

    /// The field can only be read.
    #[error("{0} is read-only")]
    ReadOnly(&'static str),

    /// No schema is registered for a record type.
    #[error("no schema for record type {0}")]
    UnknownSignature(Signature),

    /// Fields were copied between records of different types.
    #[error("record type mismatch: expected {expected}, got {actual}")]
    SignatureMismatch { expected: Signature, actual: Signature },

    /// A record id does not name a live record.
    #[error("record not found: {0}")]
    RecordNotFound(String),

    /// Engine call error.
    #[error("{0}")]
    Engine(#[from] cbash_engine::Error),

    /// I/O error while writing a dump.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON conversion error.
    #[cfg(feature = "serde")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] cbash_common::Error),
}

/// Result type for record operations.
pub type Result<T> = std::result::Result<T, Error>;
