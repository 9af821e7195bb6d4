//! Error types for engine calls.

use thiserror::Error;

/// Errors raised by an [`Engine`](crate::Engine) implementation.
#[derive(Debug, Error)]
pub enum Error {
    /// A foreign call reported a non-success status.
    #[error("engine call {op} failed with status {code}")]
    Call { op: &'static str, code: i32 },

    /// An identifier does not name a live collection, mod, or record.
    #[error("unknown {kind} id {id}")]
    UnknownId { kind: &'static str, id: u32 },

    /// A name passed across the boundary contained an interior null byte.
    #[error("name contains a null byte: {0}")]
    InvalidName(#[from] std::ffi::NulError),

    /// The shared library could not be loaded.
    #[cfg(feature = "native")]
    #[error("failed to load engine library: {0}")]
    Library(#[from] libloading::Error),

    /// The shared library is missing a required export.
    #[cfg(feature = "native")]
    #[error("engine library is missing export {name}: {source}")]
    Symbol {
        name: &'static str,
        #[source]
        source: libloading::Error,
    },
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Translate a lifecycle status into a result (negative means failure).
#[inline]
pub(crate) fn check_status(op: &'static str, code: i32) -> Result<()> {
    if code < 0 {
        Err(Error::Call { op, code })
    } else {
        Ok(())
    }
}
