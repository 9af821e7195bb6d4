//! Record type tables.
//!
//! A record type is declared once as a static table of [`FieldDef`]s and
//! compiled into a [`RecordSchema`], a name → field lookup table. The
//! [`SchemaRegistry`] maps record signatures to their schemas.

use std::hash::BuildHasherDefault;
use std::sync::OnceLock;

use cbash_common::Signature;
use cbash_engine::{header, FieldKind, MemoryEngine};
use hashbrown::HashMap;
use rustc_hash::FxHasher;

use super::{ScalarType, Shape};
use crate::Value;

type FxHashMap<K, V> = HashMap<K, V, BuildHasherDefault<FxHasher>>;

/// A named field and how to access it.
#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    pub name: &'static str,
    /// Field id at this nesting level. Unused by flags, enums, and groups.
    pub id: u32,
    pub shape: Shape,
}

impl FieldDef {
    pub const fn scalar(name: &'static str, id: u32, ty: ScalarType) -> Self {
        Self { name, id, shape: Shape::Scalar(ty) }
    }

    pub const fn array(name: &'static str, id: u32, element: ScalarType) -> Self {
        Self {
            name,
            id,
            shape: Shape::Array { element, fixed: None },
        }
    }

    pub const fn fixed_array(name: &'static str, id: u32, element: ScalarType, len: usize) -> Self {
        Self {
            name,
            id,
            shape: Shape::Array {
                element,
                fixed: Some(len),
            },
        }
    }

    pub const fn string(name: &'static str, id: u32) -> Self {
        Self { name, id, shape: Shape::String }
    }

    pub const fn istring(name: &'static str, id: u32) -> Self {
        Self { name, id, shape: Shape::IString }
    }

    pub const fn flag(name: &'static str, base: u32, mask: u32) -> Self {
        Self {
            name,
            id: 0,
            shape: Shape::Flag { base, mask },
        }
    }

    pub const fn masked(name: &'static str, base: u32, mask: u32, value: u32) -> Self {
        Self {
            name,
            id: 0,
            shape: Shape::Enum { base, mask, value },
        }
    }

    pub const fn group(name: &'static str, members: &'static [FieldDef]) -> Self {
        Self {
            name,
            id: 0,
            shape: Shape::Group(members),
        }
    }

    pub const fn list(name: &'static str, id: u32, members: &'static [FieldDef]) -> Self {
        Self {
            name,
            id,
            shape: Shape::List(members),
        }
    }

    pub const fn dynamic(name: &'static str, id: u32, kind: FieldKind) -> Self {
        Self {
            name,
            id,
            shape: Shape::Dynamic(kind),
        }
    }

    pub const fn sub_record(name: &'static str, id: u32, signature: Signature) -> Self {
        Self {
            name,
            id,
            shape: Shape::SubRecord(signature),
        }
    }

    pub const fn sub_records(name: &'static str, id: u32, signature: Signature) -> Self {
        Self {
            name,
            id,
            shape: Shape::SubRecords(signature),
        }
    }

    /// Value written for this field when a group or list entry is written
    /// without it. Flags and enums have none; their base field carries them.
    pub fn default_value(&self) -> Option<Value> {
        match self.shape {
            Shape::Scalar(ty) => Some(match ty {
                ScalarType::Bool => Value::Bool(false),
                ScalarType::Int8 => Value::Int8(0),
                ScalarType::UInt8 => Value::UInt8(0),
                ScalarType::Int16 => Value::Int16(0),
                ScalarType::UInt16 => Value::UInt16(0),
                ScalarType::Int32 => Value::Int32(0),
                ScalarType::UInt32 => Value::UInt32(0),
                ScalarType::Float | ScalarType::Radian => Value::Float(0.0),
                ScalarType::FormId => Value::FormId(Default::default()),
                ScalarType::ActorValue => Value::ActorValue(Default::default()),
                ScalarType::MgefCode => Value::MgefCode(Default::default()),
                ScalarType::Char4 => Value::Char4(Signature::default()),
            }),
            Shape::Array {
                element,
                fixed: Some(len),
            } => FieldDef::scalar(self.name, self.id, element)
                .default_value()
                .map(|zero| Value::Array(vec![zero; len])),
            _ => None,
        }
    }
}

/// Find a field by name in a flat table, looking through groups.
pub(crate) fn find_field(defs: &'static [FieldDef], name: &str) -> Option<&'static FieldDef> {
    defs.iter().find_map(|def| match def.shape {
        _ if def.name == name => Some(def),
        Shape::Group(members) => find_field(members, name),
        _ => None,
    })
}

/// Fields every record carries in its header.
pub static HEADER: &[FieldDef] = &[
    FieldDef::scalar("flags1", header::FLAGS1, ScalarType::UInt32),
    FieldDef::scalar("fid", header::FORM_ID, ScalarType::FormId),
    FieldDef::scalar("flags2", header::FLAGS2, ScalarType::UInt32),
    FieldDef::string("eid", header::EDITOR_ID),
    FieldDef::flag("is_deleted", header::FLAGS1, 0x0000_0020),
    FieldDef::flag("is_persistent", header::FLAGS1, 0x0000_0400),
    FieldDef::flag("is_initially_disabled", header::FLAGS1, 0x0000_0800),
    FieldDef::flag("is_ignored", header::FLAGS1, 0x0000_1000),
    FieldDef::flag("is_visible_when_distant", header::FLAGS1, 0x0000_8000),
    FieldDef::flag("is_dangerous", header::FLAGS1, 0x0002_0000),
    FieldDef::flag("is_compressed", header::FLAGS1, 0x0004_0000),
    FieldDef::flag("is_cant_wait", header::FLAGS1, 0x0008_0000),
];

/// A record type's fields, indexed by name.
#[derive(Debug)]
pub struct RecordSchema {
    signature: Signature,
    fields: &'static [FieldDef],
    index: FxHashMap<&'static str, &'static FieldDef>,
}

impl RecordSchema {
    pub fn new(signature: Signature, fields: &'static [FieldDef]) -> Self {
        fn add(index: &mut FxHashMap<&'static str, &'static FieldDef>, defs: &'static [FieldDef]) {
            for def in defs {
                index.insert(def.name, def);
                if let Shape::Group(members) = def.shape {
                    add(index, members);
                }
            }
        }

        let mut index = FxHashMap::default();
        add(&mut index, HEADER);
        add(&mut index, fields);
        Self {
            signature,
            fields,
            index,
        }
    }

    #[inline]
    pub fn signature(&self) -> Signature {
        self.signature
    }

    /// Look up a field by name, including header fields and group members.
    #[inline]
    pub fn field(&self, name: &str) -> Option<&'static FieldDef> {
        self.index.get(name).copied()
    }

    /// Header fields followed by the record type's own fields.
    pub fn fields(&self) -> impl Iterator<Item = &'static FieldDef> {
        HEADER.iter().chain(self.fields.iter())
    }

    /// The record type's own fields.
    #[inline]
    pub fn own_fields(&self) -> &'static [FieldDef] {
        self.fields
    }
}

/// Record schemas by signature.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: FxHashMap<Signature, RecordSchema>,
}

impl SchemaRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in record type.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for (signature, fields) in crate::schemas::ALL {
            registry.register(*signature, fields);
        }
        registry
    }

    /// The shared built-in registry.
    pub fn global() -> &'static SchemaRegistry {
        static GLOBAL: OnceLock<SchemaRegistry> = OnceLock::new();
        GLOBAL.get_or_init(Self::builtin)
    }

    pub fn register(&mut self, signature: Signature, fields: &'static [FieldDef]) {
        self.schemas.insert(signature, RecordSchema::new(signature, fields));
    }

    #[inline]
    pub fn get(&self, signature: Signature) -> Option<&RecordSchema> {
        self.schemas.get(&signature)
    }

    /// Registered signatures, sorted.
    pub fn signatures(&self) -> Vec<Signature> {
        let mut signatures: Vec<_> = self.schemas.keys().copied().collect();
        signatures.sort();
        signatures
    }

    /// Declare every registered field's kind and child slot on an in-memory
    /// engine, so that it reports kinds the way the native engine does.
    pub fn install(&self, engine: &MemoryEngine) {
        for schema in self.schemas.values() {
            declare(engine, schema.signature, &[], schema.fields);
        }
    }
}

fn declare(engine: &MemoryEngine, signature: Signature, prefix: &[u32], defs: &'static [FieldDef]) {
    for def in defs {
        let mut ids = prefix.to_vec();
        ids.push(def.id);
        match def.shape {
            Shape::Group(members) => declare(engine, signature, prefix, members),
            Shape::Flag { .. } | Shape::Enum { .. } => {}
            Shape::List(members) => {
                engine.declare_field(signature, &ids, FieldKind::List);
                declare(engine, signature, &ids, members);
            }
            Shape::SubRecord(child) | Shape::SubRecords(child) => {
                let many = matches!(def.shape, Shape::SubRecords(_));
                if let Some(kind) = def.shape.kind() {
                    engine.declare_field(signature, &ids, kind);
                }
                if prefix.is_empty() {
                    engine.declare_child(signature, def.id, child, many);
                }
            }
            _ => {
                if let Some(kind) = def.shape.kind() {
                    engine.declare_field(signature, &ids, kind);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MEMBERS: &[FieldDef] = &[
        FieldDef::scalar("aggression", 20, ScalarType::UInt8),
        FieldDef::scalar("confidence", 21, ScalarType::UInt8),
    ];

    const FIELDS: &[FieldDef] = &[
        FieldDef::string("full", 5),
        FieldDef::group("ai", MEMBERS),
        FieldDef::fixed_array("unused", 6, ScalarType::UInt8, 2),
    ];

    #[test]
    fn test_lookup_includes_header_and_group_members() {
        let schema = RecordSchema::new(Signature::new(*b"TEST"), FIELDS);
        assert_eq!(schema.field("eid").map(|d| d.id), Some(header::EDITOR_ID));
        assert_eq!(schema.field("confidence").map(|d| d.id), Some(21));
        assert!(schema.field("missing").is_none());
        assert_eq!(schema.fields().count(), HEADER.len() + FIELDS.len());
        assert_eq!(find_field(FIELDS, "aggression").map(|d| d.id), Some(20));
    }

    #[test]
    fn test_default_values() {
        assert_eq!(FIELDS[2].default_value(), Some(Value::Array(vec![Value::UInt8(0); 2])));
        assert_eq!(FIELDS[0].default_value(), None);
        assert_eq!(MEMBERS[0].default_value(), Some(Value::UInt8(0)));
    }

    #[test]
    fn test_builtin_registry() {
        let registry = SchemaRegistry::global();
        assert!(registry.get(Signature::new(*b"NPC_")).is_some());
        assert!(registry.get(Signature::new(*b"XXXX")).is_none());
        assert!(registry.signatures().windows(2).all(|w| w[0] < w[1]));
    }
}
