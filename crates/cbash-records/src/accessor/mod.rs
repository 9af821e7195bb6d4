//! Declarative field access.
//!
//! Each record type is a table of [`FieldDef`]s: a name, the engine field id,
//! and a [`Shape`] describing how the bytes map to a [`Value`](crate::Value).
//! The [`Accessor`] interprets those tables against an engine, threading list
//! indices through a [`Handle`] so the same definitions serve top-level
//! fields and fields inside list entries.

mod field;
mod handle;
mod schema;
mod shape;

use cbash_common::TextEncoding;

pub use field::Accessor;
pub use handle::Handle;
pub use schema::{FieldDef, RecordSchema, SchemaRegistry, HEADER};
pub use shape::{ScalarType, Shape};

pub(crate) use schema::find_field;

/// Options shared by every accessor of a collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccessorConfig {
    /// Encoding of string fields.
    pub text_encoding: TextEncoding,
}
