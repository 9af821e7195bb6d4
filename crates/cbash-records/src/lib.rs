//! Typed record access for CBash collections.
//!
//! Two layers sit on top of the [`Engine`](cbash_engine::Engine) surface:
//!
//! - **Identity** ([`identity`]): symbolic references (`FormId`,
//!   `ActorValue`, `MgefCode`) that name their target by defining file and
//!   local id, and are converted to the engine's load-order-dependent short
//!   form only when written
//! - **Accessors** ([`accessor`]): declarative field tables that turn engine
//!   field calls into typed [`Value`]s, including flags, masked enums,
//!   groups, nested lists, and fields whose encoding is chosen per record
//!
//! [`Collection`], [`ModFile`], and [`RecordView`] wrap the lifecycle calls.
//!
//! # Quick Start
//!
//! ```
//! use cbash_common::Signature;
//! use cbash_engine::{GameMode, MemoryEngine, ModFlags};
//! use cbash_records::accessor::SchemaRegistry;
//! use cbash_records::identity::FormId;
//! use cbash_records::{Collection, FieldAccess, Value};
//!
//! let engine = MemoryEngine::new();
//! SchemaRegistry::global().install(&engine);
//!
//! let collection = Collection::create(&engine, "Data", GameMode::Oblivion)?;
//! collection.add_mod("Oblivion.esm", ModFlags::editing())?;
//! let patch = collection.add_mod("Patch.esp", ModFlags::editing())?;
//!
//! let npc = patch.create_record(Signature::new(*b"NPC_"), Some("Guard"))?;
//! npc.set("level", 10i16)?;
//! npc.set("is_female", true)?;
//! npc.set("spells", vec![FormId::long("Oblivion.esm", 0x00014C)])?;
//!
//! assert_eq!(npc.get("level")?, Some(Value::Int16(10)));
//! assert_eq!(npc.get_bool("is_female")?, Some(true));
//! # Ok::<(), cbash_records::Error>(())
//! ```
//!
//! # Lists
//!
//! List entries are views of their own, addressed through the parent:
//!
//! ```
//! # use cbash_common::Signature;
//! # use cbash_engine::{GameMode, MemoryEngine, ModFlags};
//! # use cbash_records::accessor::SchemaRegistry;
//! # use cbash_records::{Collection, FieldAccess};
//! # let engine = MemoryEngine::new();
//! # SchemaRegistry::global().install(&engine);
//! # let collection = Collection::create(&engine, "Data", GameMode::Oblivion)?;
//! # let patch = collection.add_mod("Patch.esp", ModFlags::editing())?;
//! let quest = patch.create_record(Signature::new(*b"QUST"), Some("MQ01"))?;
//! let stage = quest.create("stages")?;
//! stage.set("stage", 10u16)?;
//! let entry = stage.create("entries")?;
//! entry.set("text", "Talk to the Emperor.")?;
//!
//! for stage in quest.entries("stages")? {
//!     println!("stage {:?}", stage.get_u32("stage")?);
//! }
//! # Ok::<(), cbash_records::Error>(())
//! ```

pub mod accessor;
pub mod collection;
pub mod dump;
pub mod error;
pub mod identity;
pub mod schemas;
pub mod value;
pub mod view;

pub use accessor::AccessorConfig;
pub use collection::{Collection, ModFile};
pub use error::{Error, Result};
pub use value::{Members, Value};
pub use view::{EntryView, FieldAccess, RecordView};
