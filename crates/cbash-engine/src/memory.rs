//! In-process engine with CBash field, identity, and conflict semantics.
//!
//! `MemoryEngine` keeps collections, mods, and records in plain tables and
//! stores each record's fields as raw little-endian bytes keyed by
//! [`FieldPath`]. It never touches the file system: loading and unloading
//! are bookkeeping only, and saving snapshots the mod's records so that
//! [`Engine::reset_record`] has something to return to.
//!
//! The engine follows the same contract the native library does:
//!
//! - Short ids carry the owning mod's load-order position in the top byte
//!   (in the low byte for magic effect codes).
//! - Arrays and lists never grow implicitly; a length-only `set_field` call
//!   must allocate the slots first.
//! - Fields of an existing list entry read as zero until written.

use std::cell::RefCell;
use std::hash::BuildHasherDefault;

use cbash_common::Signature;
use hashbrown::HashMap as FastHashMap;
use rustc_hash::FxHasher;
use tracing::debug;

use crate::engine::header;
use crate::{
    Attribute, CollectionId, CreateFlags, Engine, Error, FieldKind, FieldPath, GameMode, ModFlags,
    ModId, RecordId, Result, SaveFlags,
};

type FxHashMap<K, V> = FastHashMap<K, V, BuildHasherDefault<FxHasher>>;

/// First object id handed out for new records; lower ids are reserved.
const FIRST_OBJECT_ID: u32 = 0x800;

/// Maximum number of mods that can take a load-order slot.
const MAX_LOAD_ORDER: usize = 255;

/// An engine that keeps everything in memory.
///
/// Uses interior mutability without locking, so it is `!Sync`.
#[derive(Default)]
pub struct MemoryEngine {
    state: RefCell<State>,
}

#[derive(Default)]
struct State {
    collections: Vec<Option<CollectionData>>,
    mods: Vec<Option<ModData>>,
    records: Vec<Option<RecordData>>,
    /// Declared kind per (record type, field path with zeroed indices).
    kinds: FxHashMap<(Signature, FieldPath), FieldKind>,
    /// Where a child record type is attached on its parent.
    children: FxHashMap<(Signature, Signature), ChildSlot>,
}

struct CollectionData {
    mods: Vec<ModId>,
}

struct ModData {
    collection: CollectionId,
    name: String,
    flags: ModFlags,
    records: Vec<RecordId>,
    next_object_id: u32,
    saved_as: Option<String>,
}

struct RecordData {
    mod_id: ModId,
    signature: Signature,
    form_id: u32,
    parent: Option<RecordId>,
    fields: Fields,
    baseline: Fields,
}

#[derive(Clone, Copy)]
struct ChildSlot {
    field_id: u32,
    many: bool,
}

#[derive(Clone, Default)]
struct Fields {
    values: FxHashMap<FieldPath, Vec<u8>>,
    lists: FxHashMap<FieldPath, u32>,
    runtime_kinds: FxHashMap<FieldPath, FieldKind>,
}

impl Fields {
    /// Check that every list entry crossed by `path` has been allocated.
    fn entry_exists(&self, path: &FieldPath) -> bool {
        (0..path.depth().saturating_sub(1)).all(|level| match path.list_level(level) {
            Some((list, index)) => self.lists.get(&list).copied().unwrap_or(0) > index,
            None => false,
        })
    }

    fn resize_list(&mut self, list: &FieldPath, length: u32) {
        if length == 0 {
            self.lists.remove(list);
        } else {
            self.lists.insert(*list, length);
        }
        let keep = |path: &FieldPath| path.entry_index_in(list).map_or(true, |index| index < length);
        self.values.retain(|path, _| keep(path));
        self.lists.retain(|path, _| keep(path));
        self.runtime_kinds.retain(|path, _| keep(path));
    }
}

fn shape_key(path: &FieldPath) -> FieldPath {
    let zeros = [0u32; 3];
    FieldPath::from_parts(path.field_ids(), &zeros[..path.depth() - 1]).unwrap_or(*path)
}

fn header_kind(path: &FieldPath) -> Option<FieldKind> {
    if path.depth() != 1 {
        return None;
    }
    match path.field_id() {
        header::FLAGS1 | header::FLAGS2 => Some(FieldKind::UInt32),
        header::FORM_ID => Some(FieldKind::FormId),
        header::EDITOR_ID => Some(FieldKind::String),
        _ => None,
    }
}

fn call_failed(op: &'static str, code: i32) -> Error {
    Error::Call { op, code }
}

fn slot<T>(table: &[Option<T>], id: u32) -> Option<&T> {
    table.get((id as usize).checked_sub(1)?)?.as_ref()
}

fn slot_mut<T>(table: &mut [Option<T>], id: u32) -> Option<&mut T> {
    table.get_mut((id as usize).checked_sub(1)?)?.as_mut()
}

fn next_id<T>(table: &mut Vec<Option<T>>, value: T) -> u32 {
    table.push(Some(value));
    table.len() as u32
}

impl State {
    fn collection(&self, id: CollectionId) -> Result<&CollectionData> {
        slot(&self.collections, id.0).ok_or(Error::UnknownId { kind: "collection", id: id.0 })
    }

    fn mod_data(&self, id: ModId) -> Result<&ModData> {
        slot(&self.mods, id.0).ok_or(Error::UnknownId { kind: "mod", id: id.0 })
    }

    fn record(&self, id: RecordId) -> Result<&RecordData> {
        slot(&self.records, id.0).ok_or(Error::UnknownId { kind: "record", id: id.0 })
    }

    fn record_mut(&mut self, id: RecordId) -> Result<&mut RecordData> {
        slot_mut(&mut self.records, id.0).ok_or(Error::UnknownId { kind: "record", id: id.0 })
    }

    fn load_order(&self, collection: CollectionId) -> Vec<ModId> {
        let Ok(data) = self.collection(collection) else {
            return Vec::new();
        };
        data.mods
            .iter()
            .copied()
            .filter(|&m| {
                self.mod_data(m)
                    .map(|d| d.flags.contains(ModFlags::IN_LOAD_ORDER))
                    .unwrap_or(false)
            })
            .collect()
    }

    fn load_order_position(&self, mod_id: ModId) -> Option<u8> {
        let collection = self.mod_data(mod_id).ok()?.collection;
        self.load_order(collection)
            .iter()
            .position(|&m| m == mod_id)
            .map(|p| p as u8)
    }

    fn kind_of(&self, record: &RecordData, path: &FieldPath) -> FieldKind {
        if let Some(kind) = record.fields.runtime_kinds.get(path) {
            return *kind;
        }
        self.kinds
            .get(&(record.signature, shape_key(path)))
            .copied()
            .or_else(|| header_kind(path))
            .unwrap_or(FieldKind::Unknown)
    }

    fn allocate_form_id(&mut self, mod_id: ModId) -> Result<u32> {
        let position = self
            .load_order_position(mod_id)
            .ok_or(call_failed("create_record", -2))?;
        let data = slot_mut(&mut self.mods, mod_id.0).ok_or(Error::UnknownId { kind: "mod", id: mod_id.0 })?;
        let object_id = data.next_object_id;
        data.next_object_id += 1;
        Ok(((position as u32) << 24) | (object_id & 0x00FF_FFFF))
    }

    fn insert_record(
        &mut self,
        mod_id: ModId,
        signature: Signature,
        form_id: u32,
        editor_id: Option<&str>,
        parent: Option<RecordId>,
        mut fields: Fields,
    ) -> Result<RecordId> {
        self.mod_data(mod_id)?;
        if let Some(editor_id) = editor_id {
            fields
                .values
                .insert(FieldPath::new(header::EDITOR_ID), editor_id.as_bytes().to_vec());
        }

        let id = RecordId(next_id(
            &mut self.records,
            RecordData {
                mod_id,
                signature,
                form_id,
                parent,
                baseline: fields.clone(),
                fields,
            },
        ));
        if let Some(data) = slot_mut(&mut self.mods, mod_id.0) {
            data.records.push(id);
        }
        if let Some(parent) = parent {
            self.attach_child(parent, id, signature)?;
        }
        Ok(id)
    }

    fn attach_child(&mut self, parent: RecordId, child: RecordId, signature: Signature) -> Result<()> {
        let parent_signature = self.record(parent)?.signature;
        let Some(slot) = self.children.get(&(parent_signature, signature)).copied() else {
            debug!(%parent_signature, %signature, "no child slot declared; child left unattached");
            return Ok(());
        };
        let path = FieldPath::new(slot.field_id);
        let values = &mut self.record_mut(parent)?.fields.values;
        if slot.many {
            values.entry(path).or_default().extend_from_slice(&child.0.to_le_bytes());
        } else {
            values.insert(path, child.0.to_le_bytes().to_vec());
        }
        Ok(())
    }

    fn detach_child(&mut self, parent: RecordId, child: RecordId, signature: Signature) {
        let Ok(parent_signature) = self.record(parent).map(|r| r.signature) else {
            return;
        };
        let Some(slot) = self.children.get(&(parent_signature, signature)).copied() else {
            return;
        };
        let Some(parent) = slot_mut(&mut self.records, parent.0) else {
            return;
        };
        let path = FieldPath::new(slot.field_id);
        let needle = child.0.to_le_bytes();
        let Some(bytes) = parent.fields.values.get_mut(&path) else {
            return;
        };
        let kept: Vec<u8> = bytes
            .chunks_exact(4)
            .filter(|chunk| *chunk != needle)
            .flatten()
            .copied()
            .collect();
        if kept.is_empty() {
            parent.fields.values.remove(&path);
        } else {
            *bytes = kept;
        }
    }

    fn remove_record(&mut self, id: RecordId) -> Result<()> {
        let record = self.record(id)?;
        let (mod_id, parent, signature) = (record.mod_id, record.parent, record.signature);

        let children: Vec<RecordId> = self
            .records
            .iter()
            .enumerate()
            .filter_map(|(i, r)| match r {
                Some(r) if r.parent == Some(id) => Some(RecordId(i as u32 + 1)),
                _ => None,
            })
            .collect();
        for child in children {
            self.remove_record(child)?;
        }

        if let Some(parent) = parent {
            self.detach_child(parent, id, signature);
        }
        if let Some(data) = slot_mut(&mut self.mods, mod_id.0) {
            data.records.retain(|&r| r != id);
        }
        self.records[id.0 as usize - 1] = None;
        Ok(())
    }

    /// Every version of `record` in its collection as (add-order position, id).
    fn versions(&self, record: RecordId, ignore_scanned: bool) -> Vec<(usize, RecordId)> {
        let Ok(data) = self.record(record) else {
            return Vec::new();
        };
        let Ok(mod_data) = self.mod_data(data.mod_id) else {
            return Vec::new();
        };
        let Ok(collection) = self.collection(mod_data.collection) else {
            return Vec::new();
        };

        let mut versions = Vec::new();
        for (position, &mod_id) in collection.mods.iter().enumerate() {
            let Ok(candidate_mod) = self.mod_data(mod_id) else {
                continue;
            };
            if ignore_scanned && !candidate_mod.flags.contains(ModFlags::IN_LOAD_ORDER) {
                continue;
            }
            for &candidate in &candidate_mod.records {
                if let Ok(other) = self.record(candidate) {
                    if other.signature == data.signature && other.form_id == data.form_id {
                        versions.push((position, candidate));
                    }
                }
            }
        }
        versions
    }
}

impl MemoryEngine {
    /// Create an empty engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the kind of a field for a record type.
    ///
    /// `field_ids` is the path with the list indices left out, e.g.
    /// `[10, 2, 3]` for `stages[*].entries[*].text`.
    pub fn declare_field(&self, signature: Signature, field_ids: &[u32], kind: FieldKind) {
        let zeros = [0u32; 3];
        let Some(path) = field_ids
            .len()
            .checked_sub(1)
            .and_then(|levels| zeros.get(..levels))
            .and_then(|indices| FieldPath::from_parts(field_ids, indices))
        else {
            debug!(%signature, ?field_ids, "ignoring field declaration with invalid depth");
            return;
        };
        self.state.borrow_mut().kinds.insert((signature, path), kind);
    }

    /// Declare that records of type `child` created under a `parent` record
    /// are listed in the parent's `field_id`.
    pub fn declare_child(&self, parent: Signature, field_id: u32, child: Signature, many: bool) {
        self.state
            .borrow_mut()
            .children
            .insert((parent, child), ChildSlot { field_id, many });
    }

    /// Fix the concrete kind of a polymorphic field on one record.
    pub fn set_field_kind(&self, record: RecordId, path: &FieldPath, kind: FieldKind) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.record_mut(record)?.fields.runtime_kinds.insert(*path, kind);
        Ok(())
    }

    /// File name the mod was last saved under.
    pub fn saved_name(&self, mod_id: ModId) -> Option<String> {
        self.state.borrow().mod_data(mod_id).ok()?.saved_as.clone()
    }
}

impl Engine for MemoryEngine {
    fn create_collection(&self, _data_path: &str, _game: GameMode) -> Result<CollectionId> {
        let mut state = self.state.borrow_mut();
        Ok(CollectionId(next_id(&mut state.collections, CollectionData { mods: Vec::new() })))
    }

    fn delete_collection(&self, collection: CollectionId) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let mods = state.collection(collection)?.mods.clone();
        for mod_id in mods {
            let records = state.mod_data(mod_id).map(|m| m.records.clone()).unwrap_or_default();
            for record in records {
                if state.record(record).is_ok() {
                    state.remove_record(record)?;
                }
            }
            state.mods[mod_id.0 as usize - 1] = None;
        }
        state.collections[collection.0 as usize - 1] = None;
        Ok(())
    }

    fn load_collection(&self, collection: CollectionId) -> Result<()> {
        self.state.borrow().collection(collection).map(|_| ())
    }

    fn unload_collection(&self, collection: CollectionId) -> Result<()> {
        self.state.borrow().collection(collection).map(|_| ())
    }

    fn add_mod(&self, collection: CollectionId, name: &str, flags: ModFlags) -> Result<ModId> {
        let mut state = self.state.borrow_mut();
        let existing = state.collection(collection)?.mods.clone();
        if existing
            .iter()
            .any(|&m| state.mod_data(m).map(|d| d.name.eq_ignore_ascii_case(name)).unwrap_or(false))
        {
            return Err(call_failed("add_mod", -1));
        }
        if flags.contains(ModFlags::IN_LOAD_ORDER) && state.load_order(collection).len() >= MAX_LOAD_ORDER {
            return Err(call_failed("add_mod", -2));
        }

        let id = ModId(next_id(
            &mut state.mods,
            ModData {
                collection,
                name: name.to_string(),
                flags,
                records: Vec::new(),
                next_object_id: FIRST_OBJECT_ID,
                saved_as: None,
            },
        ));
        if let Some(data) = slot_mut(&mut state.collections, collection.0) {
            data.mods.push(id);
        }
        Ok(id)
    }

    fn load_mod(&self, mod_id: ModId) -> Result<()> {
        self.state.borrow().mod_data(mod_id).map(|_| ())
    }

    fn unload_mod(&self, mod_id: ModId) -> Result<()> {
        self.state.borrow().mod_data(mod_id).map(|_| ())
    }

    fn save_mod(&self, mod_id: ModId, flags: SaveFlags, dest_name: Option<&str>) -> Result<()> {
        let collection = {
            let mut state = self.state.borrow_mut();
            let data = state.mod_data(mod_id)?;
            if !data.flags.contains(ModFlags::SAVEABLE) {
                return Err(call_failed("save_mod", -1));
            }
            let records = data.records.clone();
            let collection = data.collection;
            for record in records {
                if let Ok(record) = state.record_mut(record) {
                    record.baseline = record.fields.clone();
                }
            }
            if let Some(data) = slot_mut(&mut state.mods, mod_id.0) {
                data.saved_as = Some(dest_name.unwrap_or(&data.name).to_string());
            }
            collection
        };
        if flags.contains(SaveFlags::CLOSE_COLLECTION) {
            self.delete_collection(collection)?;
        }
        Ok(())
    }

    fn mod_ids_by_load_order(&self, collection: CollectionId) -> Vec<ModId> {
        self.state.borrow().load_order(collection)
    }

    fn mod_ids(&self, collection: CollectionId) -> Vec<ModId> {
        self.state
            .borrow()
            .collection(collection)
            .map(|c| c.mods.clone())
            .unwrap_or_default()
    }

    fn mod_id_by_name(&self, collection: CollectionId, name: &str) -> Option<ModId> {
        let state = self.state.borrow();
        state.collection(collection).ok()?.mods.iter().copied().find(|&m| {
            state
                .mod_data(m)
                .map(|d| d.name.eq_ignore_ascii_case(name))
                .unwrap_or(false)
        })
    }

    fn mod_name(&self, mod_id: ModId) -> Option<String> {
        self.state.borrow().mod_data(mod_id).ok().map(|m| m.name.clone())
    }

    fn mod_load_order(&self, mod_id: ModId) -> Option<u8> {
        self.state.borrow().load_order_position(mod_id)
    }

    fn create_record(
        &self,
        mod_id: ModId,
        signature: Signature,
        form_id: u32,
        editor_id: Option<&str>,
        parent: Option<RecordId>,
        flags: CreateFlags,
    ) -> Result<RecordId> {
        let mut state = self.state.borrow_mut();
        let form_id = match form_id {
            0 if flags.contains(CreateFlags::SET_AS_OVERRIDE) => return Err(call_failed("create_record", -1)),
            0 => state.allocate_form_id(mod_id)?,
            given => given,
        };
        state.insert_record(mod_id, signature, form_id, editor_id, parent, Fields::default())
    }

    fn copy_record(
        &self,
        record: RecordId,
        dest_mod: ModId,
        parent: Option<RecordId>,
        new_form_id: u32,
        new_editor_id: Option<&str>,
        flags: CreateFlags,
    ) -> Result<RecordId> {
        let mut state = self.state.borrow_mut();
        let source = state.record(record)?;
        let (signature, source_form_id, fields) = (source.signature, source.form_id, source.fields.clone());
        let form_id = if flags.contains(CreateFlags::SET_AS_OVERRIDE) {
            source_form_id
        } else if new_form_id != 0 {
            new_form_id
        } else {
            state.allocate_form_id(dest_mod)?
        };
        state.insert_record(dest_mod, signature, form_id, new_editor_id, parent, fields)
    }

    fn reset_record(&self, record: RecordId) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let record = state.record_mut(record)?;
        record.fields = record.baseline.clone();
        Ok(())
    }

    fn delete_record(&self, record: RecordId) -> Result<()> {
        self.state.borrow_mut().remove_record(record)
    }

    fn unload_record(&self, record: RecordId) -> Result<()> {
        self.state.borrow().record(record).map(|_| ())
    }

    fn record_ids(&self, mod_id: ModId, signature: Signature) -> Vec<RecordId> {
        let state = self.state.borrow();
        let Ok(data) = state.mod_data(mod_id) else {
            return Vec::new();
        };
        data.records
            .iter()
            .copied()
            .filter(|&r| state.record(r).map(|d| d.signature == signature).unwrap_or(false))
            .collect()
    }

    fn mod_id_by_record(&self, record: RecordId) -> Option<ModId> {
        self.state.borrow().record(record).ok().map(|r| r.mod_id)
    }

    fn collection_id_by_record(&self, record: RecordId) -> Option<CollectionId> {
        let state = self.state.borrow();
        let mod_id = state.record(record).ok()?.mod_id;
        state.mod_data(mod_id).ok().map(|m| m.collection)
    }

    fn collection_id_by_mod(&self, mod_id: ModId) -> Option<CollectionId> {
        self.state.borrow().mod_data(mod_id).ok().map(|m| m.collection)
    }

    fn get_field(&self, record: RecordId, path: &FieldPath, out: &mut Vec<u8>) -> bool {
        out.clear();
        let state = self.state.borrow();
        let Ok(data) = state.record(record) else {
            return false;
        };
        if path.depth() == 1 && path.field_id() == header::FORM_ID {
            out.extend_from_slice(&data.form_id.to_le_bytes());
            return true;
        }
        if !data.fields.entry_exists(path) {
            return false;
        }

        let kind = state.kind_of(data, path);
        match data.fields.values.get(path) {
            Some(bytes) => {
                out.extend_from_slice(bytes);
                true
            }
            // Members of an allocated entry read as their zero value.
            None if path.depth() > 1 && !kind.is_array() && kind.element_size() > 0 => {
                out.resize(kind.element_size(), 0);
                true
            }
            None => false,
        }
    }

    fn set_field(&self, record: RecordId, path: &FieldPath, value: Option<&[u8]>, length: u32) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let data = state.record(record)?;
        if path.depth() == 1 && path.field_id() == header::FORM_ID {
            let bytes: [u8; 4] = value
                .and_then(|v| v.try_into().ok())
                .ok_or(call_failed("set_field", -4))?;
            state.record_mut(record)?.form_id = u32::from_le_bytes(bytes);
            return Ok(());
        }
        if !data.fields.entry_exists(path) {
            debug!(%record, %path, "write into unallocated list entry rejected");
            return Err(call_failed("set_field", -1));
        }

        let kind = state.kind_of(data, path);
        let element_size = kind.element_size();
        let fields = &mut state.record_mut(record)?.fields;
        match value {
            None if kind == FieldKind::List => fields.resize_list(path, length),
            None if kind.is_array() => {
                let bytes = fields.values.entry(*path).or_default();
                bytes.resize(length as usize * element_size, 0);
                if bytes.is_empty() {
                    fields.values.remove(path);
                }
            }
            None => return Err(call_failed("set_field", -2)),
            Some(_) if kind == FieldKind::List => return Err(call_failed("set_field", -2)),
            Some(bytes) if kind.is_array() => {
                let current = fields.values.get(path).map(|b| b.len() / element_size).unwrap_or(0);
                if length as usize > current {
                    debug!(%record, %path, length, current, "array write past allocated length rejected");
                    return Err(call_failed("set_field", -3));
                }
                if bytes.len() != length as usize * element_size {
                    return Err(call_failed("set_field", -4));
                }
                fields.values.insert(*path, bytes.to_vec());
            }
            Some(bytes) if kind.is_string() => {
                let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
                fields.values.insert(*path, bytes[..end].to_vec());
            }
            Some(bytes) => {
                if element_size > 0 && bytes.len() != element_size {
                    return Err(call_failed("set_field", -4));
                }
                fields.values.insert(*path, bytes.to_vec());
            }
        }
        Ok(())
    }

    fn delete_field(&self, record: RecordId, path: &FieldPath) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let data = state.record(record)?;
        if path.depth() == 1 && path.field_id() == header::FORM_ID {
            return Err(call_failed("delete_field", -2));
        }
        if !data.fields.entry_exists(path) {
            return Err(call_failed("delete_field", -1));
        }
        let kind = state.kind_of(data, path);
        let fields = &mut state.record_mut(record)?.fields;
        if kind == FieldKind::List {
            fields.resize_list(path, 0);
        }
        fields.values.remove(path);
        Ok(())
    }

    fn field_attribute(&self, record: RecordId, path: &FieldPath, attribute: Attribute) -> u32 {
        let state = self.state.borrow();
        let Ok(data) = state.record(record) else {
            return 0;
        };
        if !data.fields.entry_exists(path) {
            return match attribute {
                Attribute::Kind => FieldKind::Missing as u32,
                Attribute::Size => 0,
            };
        }
        let kind = state.kind_of(data, path);
        match attribute {
            Attribute::Kind => kind as u32,
            Attribute::Size if kind == FieldKind::List => data.fields.lists.get(path).copied().unwrap_or(0),
            Attribute::Size => {
                let len = data.fields.values.get(path).map(Vec::len).unwrap_or(0);
                if kind.is_array() {
                    (len / kind.element_size()) as u32
                } else if kind.is_string() {
                    len as u32
                } else {
                    0
                }
            }
        }
    }

    fn long_id_name(&self, record: RecordId, short_id: u32, is_mgef_code: bool) -> Option<String> {
        let state = self.state.borrow();
        let data = state.record(record).ok()?;
        let owner = state.mod_data(data.mod_id).ok()?;
        let index = if is_mgef_code { short_id & 0xFF } else { short_id >> 24 } as usize;
        let target = *state.load_order(owner.collection).get(index)?;
        if target == data.mod_id && owner.flags.contains(ModFlags::SKIP_NEW_RECORDS) {
            return None;
        }
        state.mod_data(target).ok().map(|m| m.name.clone())
    }

    fn make_short_form_id(&self, mod_id: ModId, local_id: u32, is_mgef_code: bool) -> Option<u32> {
        let position = self.state.borrow().load_order_position(mod_id)? as u32;
        Some(if is_mgef_code {
            (local_id & 0xFFFF_FF00) | position
        } else {
            (position << 24) | (local_id & 0x00FF_FFFF)
        })
    }

    fn is_record_winning(&self, record: RecordId, ignore_scanned: bool) -> Result<bool> {
        let state = self.state.borrow();
        state.record(record)?;
        let versions = state.versions(record, ignore_scanned);
        Ok(versions.iter().max_by_key(|(position, _)| *position).map(|(_, id)| *id) == Some(record))
    }

    fn record_conflicts(&self, record: RecordId, ignore_scanned: bool) -> Vec<RecordId> {
        let mut versions = self.state.borrow().versions(record, ignore_scanned);
        versions.sort_by(|a, b| b.0.cmp(&a.0));
        versions.into_iter().map(|(_, id)| id).collect()
    }

    fn record_history(&self, record: RecordId) -> Vec<RecordId> {
        let versions = self.state.borrow().versions(record, false);
        let Some(own) = versions.iter().find(|(_, id)| *id == record).map(|(p, _)| *p) else {
            return Vec::new();
        };
        let mut earlier: Vec<_> = versions.into_iter().filter(|(p, _)| *p < own).collect();
        earlier.sort_by_key(|(p, _)| *p);
        earlier.into_iter().map(|(_, id)| id).collect()
    }
}
