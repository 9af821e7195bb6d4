//! Records and list entries bound to an engine.

use cbash_common::Signature;
use cbash_engine::{CreateFlags, Engine, ModId, RecordId};

use crate::accessor::{find_field, Accessor, FieldDef, Handle, RecordSchema, Shape};
use crate::identity::FormId;
use crate::value::{Members, Value};
use crate::{Error, Result};

/// Named field access shared by records and list entries.
pub trait FieldAccess<'e, E: Engine + ?Sized + 'e>: Sized {
    fn accessor(&self) -> Accessor<'e, E>;

    fn handle(&self) -> Handle;

    /// Signature of the record the fields belong to.
    fn signature(&self) -> Signature;

    /// Look up a field definition by name.
    fn lookup(&self, name: &str) -> Option<&'static FieldDef>;

    /// Fields in declaration order. Group members are reached through
    /// their group.
    fn field_defs(&self) -> Vec<&'static FieldDef>;

    fn def(&self, name: &str) -> Result<&'static FieldDef> {
        self.lookup(name).ok_or_else(|| Error::UnknownField {
            signature: self.signature(),
            field: name.to_string(),
        })
    }

    fn get(&self, name: &str) -> Result<Option<Value>> {
        let def = self.def(name)?;
        Ok(self.accessor().get(self.handle(), def))
    }

    fn get_str(&self, name: &str) -> Result<Option<String>> {
        self.get_as(name, "string", |v| match v {
            Value::String(s) => Some(s),
            _ => None,
        })
    }

    fn get_bool(&self, name: &str) -> Result<Option<bool>> {
        self.get_as(name, "bool", |v| v.as_bool())
    }

    fn get_u32(&self, name: &str) -> Result<Option<u32>> {
        self.get_as(name, "uint32", |v| v.as_u32())
    }

    fn get_i32(&self, name: &str) -> Result<Option<i32>> {
        self.get_as(name, "int32", |v| v.as_i32())
    }

    fn get_f32(&self, name: &str) -> Result<Option<f32>> {
        self.get_as(name, "float", |v| v.as_f32())
    }

    fn get_form_id(&self, name: &str) -> Result<Option<FormId>> {
        self.get_as(name, "formid", |v| match v {
            Value::FormId(r) => Some(r),
            _ => None,
        })
    }

    /// Read a field and convert it, failing if the value has another type.
    fn get_as<T>(&self, name: &str, expected: &'static str, convert: impl FnOnce(Value) -> Option<T>) -> Result<Option<T>> {
        let def = self.def(name)?;
        match self.accessor().get(self.handle(), def) {
            None => Ok(None),
            Some(value) => {
                let actual = value.type_name();
                convert(value).map(Some).ok_or(Error::TypeMismatch {
                    field: def.name,
                    expected,
                    actual,
                })
            }
        }
    }

    fn set(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        let def = self.def(name)?;
        self.accessor().set(self.handle(), def, Some(&value.into()))
    }

    /// Delete a field, or clear a flag.
    fn clear(&self, name: &str) -> Result<()> {
        let def = self.def(name)?;
        self.accessor().set(self.handle(), def, None)
    }

    /// Number of entries in a list or elements in an array.
    fn len(&self, name: &str) -> Result<u32> {
        let def = self.def(name)?;
        Ok(self.accessor().len(self.handle(), def))
    }

    fn entries(&self, name: &str) -> Result<Vec<EntryView<'e, E>>> {
        let (def, members) = self.list_def(name)?;
        let accessor = self.accessor();
        Ok(accessor
            .entries(self.handle(), def)?
            .into_iter()
            .map(|handle| EntryView::new(accessor, handle, self.signature(), members))
            .collect())
    }

    /// Entry `index` of a list, if the list is that long.
    fn entry(&self, name: &str, index: u32) -> Result<Option<EntryView<'e, E>>> {
        let (def, members) = self.list_def(name)?;
        let accessor = self.accessor();
        if index >= accessor.len(self.handle(), def) {
            return Ok(None);
        }
        let handle = self.handle().entry(def.id, index)?;
        Ok(Some(EntryView::new(accessor, handle, self.signature(), members)))
    }

    /// Append an entry to a list.
    fn create(&self, name: &str) -> Result<EntryView<'e, E>> {
        let (def, members) = self.list_def(name)?;
        let accessor = self.accessor();
        let handle = accessor.create_entry(self.handle(), def)?;
        Ok(EntryView::new(accessor, handle, self.signature(), members))
    }

    fn list_def(&self, name: &str) -> Result<(&'static FieldDef, &'static [FieldDef])> {
        let def = self.def(name)?;
        match def.shape {
            Shape::List(members) => Ok((def, members)),
            _ => Err(Error::TypeMismatch {
                field: def.name,
                expected: "list",
                actual: "field",
            }),
        }
    }

    /// Every field's current value.
    fn values(&self) -> Members {
        let accessor = self.accessor();
        self.field_defs()
            .into_iter()
            .map(|def| (def.name, accessor.get(self.handle(), def)))
            .collect()
    }
}

/// One entry of a list field.
pub struct EntryView<'e, E: Engine + ?Sized> {
    accessor: Accessor<'e, E>,
    handle: Handle,
    signature: Signature,
    members: &'static [FieldDef],
}

impl<E: Engine + ?Sized> Clone for EntryView<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: Engine + ?Sized> Copy for EntryView<'_, E> {}

impl<'e, E: Engine + ?Sized> EntryView<'e, E> {
    fn new(accessor: Accessor<'e, E>, handle: Handle, signature: Signature, members: &'static [FieldDef]) -> Self {
        Self {
            accessor,
            handle,
            signature,
            members,
        }
    }

    /// Position of the entry in its list.
    pub fn index(&self) -> u32 {
        self.handle.index().unwrap_or(0)
    }
}

impl<'e, E: Engine + ?Sized + 'e> FieldAccess<'e, E> for EntryView<'e, E> {
    fn accessor(&self) -> Accessor<'e, E> {
        self.accessor
    }

    fn handle(&self) -> Handle {
        self.handle
    }

    fn signature(&self) -> Signature {
        self.signature
    }

    fn lookup(&self, name: &str) -> Option<&'static FieldDef> {
        find_field(self.members, name)
    }

    fn field_defs(&self) -> Vec<&'static FieldDef> {
        self.members.iter().collect()
    }
}

/// A record and its schema.
pub struct RecordView<'e, E: Engine + ?Sized> {
    accessor: Accessor<'e, E>,
    record: RecordId,
    schema: &'e RecordSchema,
}

impl<E: Engine + ?Sized> Clone for RecordView<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: Engine + ?Sized> Copy for RecordView<'_, E> {}

impl<'e, E: Engine + ?Sized> RecordView<'e, E> {
    pub fn new(accessor: Accessor<'e, E>, record: RecordId, schema: &'e RecordSchema) -> Self {
        Self {
            accessor,
            record,
            schema,
        }
    }

    /// View of `record` through its signature's schema.
    pub fn open(accessor: Accessor<'e, E>, record: RecordId, signature: Signature) -> Result<Self> {
        let schema = accessor
            .registry()
            .get(signature)
            .ok_or(Error::UnknownSignature(signature))?;
        Ok(Self::new(accessor, record, schema))
    }

    #[inline]
    pub fn id(&self) -> RecordId {
        self.record
    }

    #[inline]
    pub fn schema(&self) -> &'e RecordSchema {
        self.schema
    }

    pub fn mod_id(&self) -> Option<ModId> {
        self.accessor.engine().mod_id_by_record(self.record)
    }

    /// The record's own FormID.
    pub fn form_id(&self) -> FormId {
        self.get_form_id("fid").ok().flatten().unwrap_or_default()
    }

    pub fn editor_id(&self) -> Option<String> {
        self.get_str("eid").ok().flatten()
    }

    /// Another record of the same type in the same collection.
    fn sibling(&self, record: RecordId) -> Self {
        Self::new(self.accessor, record, self.schema)
    }

    pub fn is_winning(&self, ignore_scanned: bool) -> Result<bool> {
        Ok(self.accessor.engine().is_record_winning(self.record, ignore_scanned)?)
    }

    /// Every version of this record, winning version first.
    pub fn conflicts(&self, ignore_scanned: bool) -> Vec<Self> {
        self.accessor
            .engine()
            .record_conflicts(self.record, ignore_scanned)
            .into_iter()
            .map(|id| self.sibling(id))
            .collect()
    }

    /// Versions this record overrides, earliest first.
    pub fn history(&self) -> Vec<Self> {
        self.accessor
            .engine()
            .record_history(self.record)
            .into_iter()
            .map(|id| self.sibling(id))
            .collect()
    }

    /// Discard unsaved changes.
    pub fn reset(&self) -> Result<()> {
        Ok(self.accessor.engine().reset_record(self.record)?)
    }

    /// Delete the record and the child records it owns.
    pub fn delete(self) -> Result<()> {
        Ok(self.accessor.engine().delete_record(self.record)?)
    }

    pub fn unload(&self) -> Result<()> {
        Ok(self.accessor.engine().unload_record(self.record)?)
    }

    /// Copy the record into `dest`, keeping its FormID so the copy overrides
    /// it there.
    pub fn copy_as_override(&self, dest: ModId, parent: Option<&RecordView<'e, E>>) -> Result<Self> {
        self.copy_into(dest, parent, None, CreateFlags::SET_AS_OVERRIDE)
    }

    /// Copy the record into `dest` as a new record with a fresh FormID.
    pub fn copy_as_new(&self, dest: ModId, parent: Option<&RecordView<'e, E>>, editor_id: Option<&str>) -> Result<Self> {
        self.copy_into(dest, parent, editor_id, CreateFlags::empty())
    }

    fn copy_into(
        &self,
        dest: ModId,
        parent: Option<&RecordView<'e, E>>,
        editor_id: Option<&str>,
        flags: CreateFlags,
    ) -> Result<Self> {
        let engine = self.accessor.engine();
        let record = engine.copy_record(self.record, dest, parent.map(|p| p.record), 0, editor_id, flags)?;
        let accessor = Accessor::for_record(engine, record, self.accessor.registry(), self.accessor.config())?;
        Ok(Self::new(accessor, record, self.schema))
    }

    /// Write every field of `source` into this record.
    ///
    /// References are re-resolved against this record's collection, so the
    /// source may live in a collection with a different load order. Child
    /// records are not copied.
    pub fn assign_from<S: Engine + ?Sized>(&self, source: &RecordView<'_, S>) -> Result<()> {
        if source.signature() != self.signature() {
            return Err(Error::SignatureMismatch {
                expected: self.signature(),
                actual: source.signature(),
            });
        }
        for def in self.schema.own_fields() {
            if def.shape.is_derived() || matches!(def.shape, Shape::SubRecord(_) | Shape::SubRecords(_)) {
                continue;
            }
            let value = source.accessor.get(source.handle(), def);
            self.accessor.set(self.handle(), def, value.as_ref())?;
        }
        Ok(())
    }

    /// The child record stored in a sub-record field.
    pub fn sub_record(&self, name: &str) -> Result<Option<Self>> {
        let def = self.def(name)?;
        let Shape::SubRecord(signature) = def.shape else {
            return Err(Error::TypeMismatch {
                field: def.name,
                expected: "subrecord",
                actual: "field",
            });
        };
        match self.accessor.get(self.handle(), def) {
            Some(Value::SubRecord(id)) => Ok(Some(Self::open(self.accessor, id, signature)?)),
            _ => Ok(None),
        }
    }

    /// The child records listed in a sub-records field.
    pub fn sub_records(&self, name: &str) -> Result<Vec<Self>> {
        let def = self.def(name)?;
        let Shape::SubRecords(signature) = def.shape else {
            return Err(Error::TypeMismatch {
                field: def.name,
                expected: "subrecords",
                actual: "field",
            });
        };
        match self.accessor.get(self.handle(), def) {
            Some(Value::SubRecords(ids)) => ids.into_iter().map(|id| Self::open(self.accessor, id, signature)).collect(),
            _ => Ok(Vec::new()),
        }
    }
}

impl<'e, E: Engine + ?Sized + 'e> FieldAccess<'e, E> for RecordView<'e, E> {
    fn accessor(&self) -> Accessor<'e, E> {
        self.accessor
    }

    fn handle(&self) -> Handle {
        Handle::record(self.record)
    }

    fn signature(&self) -> Signature {
        self.schema.signature()
    }

    fn lookup(&self, name: &str) -> Option<&'static FieldDef> {
        self.schema.field(name)
    }

    fn field_defs(&self) -> Vec<&'static FieldDef> {
        self.schema.fields().collect()
    }
}

impl<E: Engine + ?Sized> std::fmt::Debug for RecordView<'_, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordView")
            .field("id", &self.record)
            .field("signature", &self.schema.signature())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use cbash_engine::{FieldKind, FieldPath, GameMode, MemoryEngine, ModFlags, SaveFlags};

    use super::*;
    use crate::accessor::SchemaRegistry;
    use crate::collection::{Collection, ModFile};
    use crate::identity::RefState;

    const NPC: Signature = Signature::new(*b"NPC_");
    const QUST: Signature = Signature::new(*b"QUST");
    const CELL: Signature = Signature::new(*b"CELL");

    fn engine() -> MemoryEngine {
        let engine = MemoryEngine::new();
        SchemaRegistry::global().install(&engine);
        engine
    }

    fn collection<'e>(engine: &'e MemoryEngine, mods: &[&str]) -> (Collection<'e, MemoryEngine>, Vec<ModFile<'e, MemoryEngine>>) {
        let collection = Collection::create(engine, "Data", GameMode::Oblivion).unwrap();
        let files = mods
            .iter()
            .map(|name| collection.add_mod(name, ModFlags::editing()).unwrap())
            .collect();
        (collection, files)
    }

    fn raw_u32s(engine: &MemoryEngine, record: RecordId, field_id: u32) -> Vec<u32> {
        let mut buffer = Vec::new();
        engine.get_field(record, &FieldPath::new(field_id), &mut buffer);
        buffer
            .chunks_exact(4)
            .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect()
    }

    #[test]
    fn test_unknown_field_and_type_mismatch() {
        let engine = engine();
        let (_, files) = collection(&engine, &["Test.esp"]);
        let npc = files[0].create_record(NPC, Some("Guard")).unwrap();

        assert!(matches!(npc.get("no_such_field"), Err(Error::UnknownField { .. })));
        npc.set("level", 3i16).unwrap();
        assert!(matches!(npc.get_str("level"), Err(Error::TypeMismatch { field: "level", .. })));
        assert_eq!(npc.get_i32("level").unwrap(), Some(3));
        assert!(matches!(npc.create("level"), Err(Error::TypeMismatch { expected: "list", .. })));
        assert_eq!(npc.editor_id().as_deref(), Some("Guard"));
    }

    #[test]
    fn test_entries_and_bounds() {
        let engine = engine();
        let (_, files) = collection(&engine, &["Oblivion.esm", "Test.esp"]);
        let npc = files[1].create_record(NPC, None).unwrap();

        assert!(npc.entry("factions", 0).unwrap().is_none());
        let first = npc.create("factions").unwrap();
        first.set("faction", FormId::long("Oblivion.esm", 0x0001_3B)).unwrap();
        first.set("rank", 2u8).unwrap();
        npc.create("factions").unwrap().set("rank", 5u8).unwrap();

        assert_eq!(npc.len("factions").unwrap(), 2);
        let entries = npc.entries("factions").unwrap();
        assert_eq!(entries.iter().map(|e| e.index()).collect::<Vec<_>>(), [0, 1]);
        assert_eq!(entries[0].get_form_id("faction").unwrap(), Some(FormId::long("Oblivion.esm", 0x13B)));
        assert_eq!(npc.entry("factions", 1).unwrap().and_then(|e| e.get_u32("rank").ok().flatten()), Some(5));
        assert!(npc.entry("factions", 2).unwrap().is_none());

        npc.clear("factions").unwrap();
        assert_eq!(npc.len("factions").unwrap(), 0);
    }

    #[test]
    fn test_three_level_nesting_with_polymorphic_params() {
        let engine = engine();
        let (_, files) = collection(&engine, &["Oblivion.esm", "Quest.esp"]);
        let quest = files[1].create_record(QUST, Some("MQ01")).unwrap();

        let stage = quest.create("stages").unwrap();
        stage.set("stage", 10u16).unwrap();
        let entry = stage.create("entries").unwrap();
        entry.set("text", "Find the amulet.").unwrap();
        entry.set("is_complete", true).unwrap();
        let condition = entry.create("conditions").unwrap();
        condition.set("ifunc", 72u32).unwrap();
        condition.set("is_greater_or_equal", true).unwrap();

        // The engine resolves the parameter kinds once the function is known.
        let param = condition.handle().path(5).unwrap();
        assert_eq!(param.depth(), 4);
        engine.set_field_kind(quest.id(), &param, FieldKind::FormId).unwrap();
        let amulet = FormId::long("Oblivion.esm", 0x0001_D2);
        condition.set("param1", amulet.clone()).unwrap();
        condition.set("param2", 3u32).unwrap();

        let stage = quest.entry("stages", 0).unwrap().unwrap();
        let entry = stage.entry("entries", 0).unwrap().unwrap();
        let condition = entry.entry("conditions", 0).unwrap().unwrap();
        assert_eq!(condition.get("param1").unwrap(), Some(Value::FormId(amulet)));
        assert_eq!(condition.get("param2").unwrap(), Some(Value::UInt32(3)));
        assert_eq!(condition.get_u32("oper_type").unwrap(), Some(0x60));
        assert_eq!(entry.get_bool("is_complete").unwrap(), Some(true));
        assert_eq!(entry.get_str("text").unwrap().as_deref(), Some("Find the amulet."));
        assert!(condition.get("no_such_field").is_err());
    }

    #[test]
    fn test_cell_sub_records() {
        let engine = engine();
        let (_, files) = collection(&engine, &["Test.esp"]);
        let file = files[0];
        let cell = file.create_record(CELL, Some("TestCell")).unwrap();
        assert!(cell.sub_record("land").unwrap().is_none());
        assert!(cell.sub_records("references").unwrap().is_empty());

        let land = file.create_child(&cell, Signature::new(*b"LAND"), None).unwrap();
        land.set("height_offset", 12.5f32).unwrap();
        let first = file.create_child(&cell, Signature::new(*b"REFR"), None).unwrap();
        let second = file.create_child(&cell, Signature::new(*b"REFR"), None).unwrap();
        second.set("scale", 2.0f32).unwrap();

        let found = cell.sub_record("land").unwrap().unwrap();
        assert_eq!(found.id(), land.id());
        assert_eq!(found.get_f32("height_offset").unwrap(), Some(12.5));

        let references = cell.sub_records("references").unwrap();
        assert_eq!(references.iter().map(|r| r.id()).collect::<Vec<_>>(), [first.id(), second.id()]);
        assert_eq!(references[1].get_f32("scale").unwrap(), Some(2.0));

        first.delete().unwrap();
        assert_eq!(cell.sub_records("references").unwrap().len(), 1);
        assert!(matches!(cell.set("references", 1u32), Err(Error::ReadOnly("references"))));
        assert!(matches!(cell.sub_record("references"), Err(Error::TypeMismatch { .. })));
    }

    #[test]
    fn test_assign_from_rebases_references() {
        let engine = engine();
        let (_, source_files) = collection(&engine, &["Oblivion.esm", "A.esp"]);
        let (_, dest_files) = collection(&engine, &["Oblivion.esm", "B.esp", "A.esp"]);

        let source = source_files[1].create_record(NPC, Some("Source")).unwrap();
        source.set("spells", vec![FormId::long("Oblivion.esm", 0x14C), FormId::long("A.esp", 0x900)]).unwrap();
        source.create("factions").unwrap().set("faction", FormId::long("A.esp", 0x901)).unwrap();
        source.set("skills", vec![10u8; 21]).unwrap();
        assert_eq!(raw_u32s(&engine, source.id(), 17), [0x0000_014C, 0x0100_0900]);

        let dest = dest_files[1].create_record(NPC, Some("Dest")).unwrap();
        dest.set("level", 4i16).unwrap();
        dest.assign_from(&source).unwrap();

        assert_eq!(raw_u32s(&engine, dest.id(), 17), [0x0000_014C, 0x0200_0900]);
        assert_eq!(dest.get("spells").unwrap(), source.get("spells").unwrap());
        let faction = dest.entry("factions", 0).unwrap().unwrap();
        assert_eq!(faction.get_form_id("faction").unwrap(), Some(FormId::long("A.esp", 0x901)));
        assert_eq!(dest.get("skills").unwrap(), Some(Value::from(vec![10u8; 21])));
        assert_eq!(dest.get("level").unwrap(), None);
        assert_eq!(dest.editor_id().as_deref(), Some("Dest"));
    }

    #[test]
    fn test_assign_from_missing_master() {
        let engine = engine();
        let (_, source_files) = collection(&engine, &["Oblivion.esm", "A.esp"]);
        let (_, dest_files) = collection(&engine, &["Oblivion.esm", "C.esp"]);

        let source = source_files[1].create_record(NPC, None).unwrap();
        source.set("spells", vec![FormId::long("Oblivion.esm", 0x14C), FormId::long("A.esp", 0x900)]).unwrap();
        let dest = dest_files[1].create_record(NPC, None).unwrap();
        dest.assign_from(&source).unwrap();
        assert_eq!(raw_u32s(&engine, dest.id(), 17), [0x0000_014C]);

        source.set("race", FormId::long("A.esp", 0x902)).unwrap();
        assert!(matches!(dest.assign_from(&source), Err(Error::InvalidReference(_))));

        let quest = dest_files[1].create_record(QUST, None).unwrap();
        assert!(matches!(
            quest.assign_from(&source),
            Err(Error::SignatureMismatch { .. })
        ));
    }

    #[test]
    fn test_skipped_mod_references_are_untrusted() {
        let engine = engine();
        let collection = Collection::create(&engine, "Data", GameMode::Oblivion).unwrap();
        collection.add_mod("Oblivion.esm", ModFlags::editing()).unwrap();
        let skipped = collection
            .add_mod("Skipped.esp", ModFlags::editing() | ModFlags::SKIP_NEW_RECORDS)
            .unwrap();
        let other = collection.add_mod("Other.esp", ModFlags::editing()).unwrap();

        let npc = skipped.create_record(NPC, None).unwrap();
        npc.set("race", FormId::long("Oblivion.esm", 0x0000_0907)).unwrap();

        let own = npc.form_id();
        assert!(matches!(own.state(), RefState::Invalid { local: 0x800 }));
        assert!(matches!(npc.get_form_id("race").unwrap().unwrap().state(), RefState::Valid { .. }));

        let target = other.create_record(NPC, None).unwrap();
        assert!(matches!(target.set("race", own), Err(Error::InvalidReference(_))));
    }

    #[test]
    fn test_conflicts_history_and_copies() {
        let engine = engine();
        let (collection, files) = collection(&engine, &["Oblivion.esm", "Patch.esp"]);
        let base = files[0].create_record(NPC, Some("Guard")).unwrap();
        base.set("level", 5i16).unwrap();

        let patched = base.copy_as_override(files[1].id(), None).unwrap();
        patched.set("level", 20i16).unwrap();
        assert_eq!(patched.form_id(), base.form_id());
        assert_eq!(patched.mod_id(), Some(files[1].id()));

        assert!(patched.is_winning(false).unwrap());
        assert!(!base.is_winning(false).unwrap());
        let conflicts: Vec<_> = patched.conflicts(false).iter().map(|r| r.id()).collect();
        assert_eq!(conflicts, [patched.id(), base.id()]);
        let history: Vec<_> = patched.history().iter().map(|r| r.id()).collect();
        assert_eq!(history, [base.id()]);

        let winners = collection.winning_records(NPC).unwrap();
        assert_eq!(winners.len(), 1);
        assert_eq!(winners[0].get_i32("level").unwrap(), Some(20));

        let copy = base.copy_as_new(files[1].id(), None, Some("GuardCopy")).unwrap();
        assert_eq!(copy.form_id(), FormId::long("Patch.esp", 0x800));
        assert_eq!(copy.editor_id().as_deref(), Some("GuardCopy"));
        assert_eq!(copy.get_i32("level").unwrap(), Some(5));
    }

    #[test]
    fn test_reset_returns_to_saved_values() {
        let engine = engine();
        let (_, files) = collection(&engine, &["Test.esp"]);
        let npc = files[0].create_record(NPC, None).unwrap();
        npc.set("full", "Guard").unwrap();
        files[0].save(SaveFlags::empty(), None).unwrap();

        npc.set("full", "Captain").unwrap();
        npc.set("level", 9i16).unwrap();
        npc.reset().unwrap();
        assert_eq!(npc.get_str("full").unwrap().as_deref(), Some("Guard"));
        assert_eq!(npc.get("level").unwrap(), None);
        assert_eq!(engine.saved_name(files[0].id()).as_deref(), Some("Test.esp"));
    }
}
