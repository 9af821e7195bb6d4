//! CBash - Rust bindings for the CBash plugin library.
//!
//! This crate provides a unified interface to the CBash binding crates for
//! reading and editing Oblivion-era plugin files.
//!
//! # Crates
//!
//! - [`cbash_common`] - Field buffer marshaling, record tags, text encodings
//! - [`cbash_engine`] - The engine surface, the in-memory engine, and (with
//!   the `native` feature) the shared library loader
//! - [`cbash_records`] - Symbolic references, field accessors, record views
//!
//! # Example
//!
//! ```
//! use cbash::prelude::*;
//!
//! // `NativeEngine::open("CBash.dll")` with the `native` feature
//! let engine = MemoryEngine::new();
//! SchemaRegistry::global().install(&engine);
//!
//! let collection = Collection::create(&engine, "Oblivion/Data", GameMode::Oblivion)?;
//! collection.add_mod("Oblivion.esm", ModFlags::editing())?;
//! let patch = collection.add_mod("Patch.esp", ModFlags::editing())?;
//! patch.create_record(Signature::new(*b"NPC_"), Some("Guard"))?.set("full", "Guard")?;
//!
//! for npc in collection.winning_records(Signature::new(*b"NPC_"))? {
//!     println!("{} {:?}", npc.form_id(), npc.get_str("full")?);
//! }
//! # Ok::<(), cbash::Error>(())
//! ```

// Re-export all sub-crates
pub use cbash_common as common;
pub use cbash_engine as engine;
pub use cbash_records as records;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use cbash_common::{Signature, TextEncoding};
    #[cfg(feature = "native")]
    pub use cbash_engine::NativeEngine;
    pub use cbash_engine::{Engine, FieldKind, FieldPath, GameMode, MemoryEngine, ModFlags, SaveFlags};
    pub use cbash_records::accessor::SchemaRegistry;
    pub use cbash_records::identity::{ActorValue, FormId, MgefCode};
    pub use cbash_records::{AccessorConfig, Collection, EntryView, FieldAccess, ModFile, RecordView, Value};
}

// Re-export commonly used types at the crate root
pub use cbash_records::{Collection, Error, RecordView, Result};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
