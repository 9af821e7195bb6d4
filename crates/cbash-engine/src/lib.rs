//! Foreign engine surface for the CBash bindings.
//!
//! CBash parses, indexes, and mutates plugin records; this crate describes
//! what the binding needs from it as the [`Engine`] trait, and provides two
//! implementations:
//!
//! - [`MemoryEngine`] - An in-process engine with the same field, identity,
//!   and conflict semantics, used for tests and offline tooling
//! - `NativeEngine` - Calls into the CBash shared library (requires the
//!   `native` feature)
//!
//! # Addressing
//!
//! Fields are addressed by a [`FieldPath`]: a field id, followed by up to three
//! `(list index, field id)` pairs for fields inside repeated groups.
//!
//! ```
//! use cbash_engine::FieldPath;
//!
//! // stages[2].entries[0].text
//! let path = FieldPath::new(10).push(2, 2).unwrap().push(0, 3).unwrap();
//! assert_eq!(path.args(), [10, 2, 2, 0, 3, 0, 0]);
//! ```

mod engine;
mod error;
mod ids;
mod kind;
mod memory;
mod path;

#[cfg(feature = "native")]
mod native;

pub use engine::{header, Engine};
pub use error::{Error, Result};
pub use ids::{CollectionId, CreateFlags, GameMode, ModFlags, ModId, RecordId, SaveFlags};
pub use kind::{Attribute, FieldKind};
pub use memory::MemoryEngine;
pub use path::FieldPath;

#[cfg(feature = "native")]
pub use native::NativeEngine;
