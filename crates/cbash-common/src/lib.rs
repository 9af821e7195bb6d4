//! Common utilities for the CBash bindings.
//!
//! This crate provides the marshaling primitives shared by the engine and
//! record crates:
//!
//! - [`BinaryReader`] - Zero-copy reading of raw field buffers returned by the engine
//! - [`BinaryWriter`] - Little-endian encoding of values handed to the engine
//! - [`Signature`] - Four-byte record type tags (and `CHAR4` field values)
//! - [`TextEncoding`] - Decoding and encoding of string fields

mod error;
mod reader;
mod signature;
mod text;
mod writer;

pub use error::{Error, Result};
pub use reader::BinaryReader;
pub use signature::Signature;
pub use text::TextEncoding;
pub use writer::BinaryWriter;

/// Re-export zerocopy traits for convenience
pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};
