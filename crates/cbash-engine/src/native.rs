//! Engine backed by the CBash shared library.
//!
//! The library is opened at runtime with `libloading` and every export the
//! binding uses is resolved up front, so a missing symbol fails at
//! [`NativeEngine::open`] rather than on first use. This targets the
//! integer-handle export set: collections, mods, and records are all `u32`
//! handles and lifecycle calls return a negative status on failure.

use std::ffi::{c_char, c_void, CStr, CString, OsStr};
use std::ptr;

use cbash_common::Signature;
use libloading::Library;
use tracing::trace;

use crate::error::check_status;
use crate::{
    Attribute, CollectionId, CreateFlags, Engine, Error, FieldKind, FieldPath, GameMode, ModFlags,
    ModId, RecordId, Result, SaveFlags,
};

macro_rules! exports {
    ($($field:ident = $symbol:literal: fn($($arg:ty),*) $(-> $ret:ty)?;)*) => {
        struct Api {
            $($field: unsafe extern "C" fn($($arg),*) $(-> $ret)?,)*
        }

        impl Api {
            /// Resolve every export.
            ///
            /// # Safety
            /// The library must export these symbols with these signatures.
            unsafe fn resolve(library: &Library) -> Result<Self> {
                Ok(Self {
                    $($field: *library
                        .get::<unsafe extern "C" fn($($arg),*) $(-> $ret)?>(concat!($symbol, "\0").as_bytes())
                        .map_err(|source| Error::Symbol { name: $symbol, source })?,)*
                })
            }
        }
    };
}

exports! {
    create_collection = "cb_CreateCollection": fn(*const c_char, u32) -> i32;
    delete_collection = "cb_DeleteCollection": fn(u32) -> i32;
    load_collection = "cb_LoadCollection": fn(u32) -> i32;
    unload_collection = "cb_UnloadCollection": fn(u32) -> i32;

    add_mod = "cb_AddMod": fn(u32, *const c_char, u32) -> i32;
    load_mod = "cb_LoadMod": fn(u32) -> i32;
    unload_mod = "cb_UnloadMod": fn(u32) -> i32;
    save_mod = "cb_SaveMod": fn(u32, u32, *const c_char) -> i32;
    load_order_num_mods = "cb_GetLoadOrderNumMods": fn(u32) -> i32;
    load_order_mod_ids = "cb_GetLoadOrderModIDs": fn(u32, *mut u32) -> i32;
    all_num_mods = "cb_GetAllNumMods": fn(u32) -> i32;
    all_mod_ids = "cb_GetAllModIDs": fn(u32, *mut u32) -> i32;
    mod_id_by_name = "cb_GetModIDByName": fn(u32, *const c_char) -> i32;
    file_name_by_id = "cb_GetFileNameByID": fn(u32) -> *const c_char;
    mod_load_order = "cb_GetModLoadOrderByID": fn(u32) -> i32;

    create_record = "cb_CreateRecord": fn(u32, u32, u32, *const c_char, u32, u32) -> u32;
    copy_record = "cb_CopyRecord": fn(u32, u32, u32, u32, *const c_char, u32) -> u32;
    reset_record = "cb_ResetRecord": fn(u32) -> i32;
    delete_record = "cb_DeleteRecord": fn(u32) -> i32;
    unload_record = "cb_UnloadRecord": fn(u32) -> i32;
    num_records = "cb_GetNumRecords": fn(u32, u32) -> i32;
    record_ids = "cb_GetRecordIDs": fn(u32, u32, *mut u32) -> i32;
    mod_id_by_record = "cb_GetModIDByRecordID": fn(u32) -> u32;
    collection_id_by_record = "cb_GetCollectionIDByRecordID": fn(u32) -> u32;
    collection_id_by_mod = "cb_GetCollectionIDByModID": fn(u32) -> u32;

    get_field = "cb_GetField": fn(u32, u32, u32, u32, u32, u32, u32, u32, *mut *mut c_void) -> *mut c_void;
    set_field = "cb_SetField": fn(u32, u32, u32, u32, u32, u32, u32, u32, *mut c_void, u32) -> i32;
    delete_field = "cb_DeleteField": fn(u32, u32, u32, u32, u32, u32, u32, u32) -> i32;
    field_attribute = "cb_GetFieldAttribute": fn(u32, u32, u32, u32, u32, u32, u32, u32, u32) -> u32;

    long_id_name = "cb_GetLongIDName": fn(u32, u32, u8) -> *const c_char;
    make_short_form_id = "cb_MakeShortFormID": fn(u32, u32, u8) -> u32;

    is_record_winning = "cb_IsRecordWinning": fn(u32, u8) -> i32;
    num_record_conflicts = "cb_GetNumRecordConflicts": fn(u32, u8) -> i32;
    record_conflicts = "cb_GetRecordConflicts": fn(u32, *mut u32, u8) -> i32;
    record_history = "cb_GetRecordHistory": fn(u32, *mut u32) -> i32;
}

/// An engine that calls into the CBash shared library.
pub struct NativeEngine {
    api: Api,
    // Keeps the resolved function pointers valid; must drop after `api`.
    _library: Library,
}

/// Copy a NUL-terminated string owned by the library.
///
/// # Safety
/// `ptr` must be null or point to a valid NUL-terminated string.
unsafe fn owned_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    Some(CStr::from_ptr(ptr).to_string_lossy().into_owned())
}

/// Run a count-then-fill export pair.
fn collect_ids<T>(count: i32, fill: impl FnOnce(*mut u32) -> i32, wrap: impl Fn(u32) -> Option<T>) -> Vec<T> {
    if count <= 0 {
        return Vec::new();
    }
    let mut ids = vec![0u32; count as usize];
    let written = fill(ids.as_mut_ptr());
    ids.truncate(written.clamp(0, count) as usize);
    ids.into_iter().filter_map(wrap).collect()
}

fn optional_name(name: Option<&str>) -> Result<Option<CString>> {
    name.map(CString::new).transpose().map_err(Error::from)
}

fn name_ptr(name: &Option<CString>) -> *const c_char {
    name.as_ref().map_or(ptr::null(), |n| n.as_ptr())
}

impl NativeEngine {
    /// Load the shared library at `path` and resolve its exports.
    pub fn open(path: impl AsRef<OsStr>) -> Result<Self> {
        let path = path.as_ref();
        trace!(path = ?path, "loading engine library");
        // SAFETY: loading runs the library's initializers; CBash has none
        // with observable side effects beyond allocation.
        let library = unsafe { Library::new(path) }?;
        // SAFETY: signatures above match the exported C interface.
        let api = unsafe { Api::resolve(&library) }?;
        Ok(Self { api, _library: library })
    }

    fn kind(&self, record: RecordId, path: &FieldPath) -> FieldKind {
        FieldKind::from_u32(self.field_attribute(record, path, Attribute::Kind)).unwrap_or(FieldKind::Unknown)
    }
}

impl Engine for NativeEngine {
    fn create_collection(&self, data_path: &str, game: GameMode) -> Result<CollectionId> {
        let data_path = CString::new(data_path)?;
        let code = unsafe { (self.api.create_collection)(data_path.as_ptr(), game as u32) };
        trace!(code, "cb_CreateCollection");
        check_status("create_collection", code)?;
        CollectionId::from_raw(code as u32).ok_or(Error::Call { op: "create_collection", code })
    }

    fn delete_collection(&self, collection: CollectionId) -> Result<()> {
        let code = unsafe { (self.api.delete_collection)(collection.0) };
        trace!(%collection, code, "cb_DeleteCollection");
        check_status("delete_collection", code)
    }

    fn load_collection(&self, collection: CollectionId) -> Result<()> {
        let code = unsafe { (self.api.load_collection)(collection.0) };
        trace!(%collection, code, "cb_LoadCollection");
        check_status("load_collection", code)
    }

    fn unload_collection(&self, collection: CollectionId) -> Result<()> {
        let code = unsafe { (self.api.unload_collection)(collection.0) };
        trace!(%collection, code, "cb_UnloadCollection");
        check_status("unload_collection", code)
    }

    fn add_mod(&self, collection: CollectionId, name: &str, flags: ModFlags) -> Result<ModId> {
        let c_name = CString::new(name)?;
        let code = unsafe { (self.api.add_mod)(collection.0, c_name.as_ptr(), flags.bits()) };
        trace!(%collection, name, code, "cb_AddMod");
        check_status("add_mod", code)?;
        ModId::from_raw(code as u32).ok_or(Error::Call { op: "add_mod", code })
    }

    fn load_mod(&self, mod_id: ModId) -> Result<()> {
        let code = unsafe { (self.api.load_mod)(mod_id.0) };
        trace!(%mod_id, code, "cb_LoadMod");
        check_status("load_mod", code)
    }

    fn unload_mod(&self, mod_id: ModId) -> Result<()> {
        let code = unsafe { (self.api.unload_mod)(mod_id.0) };
        trace!(%mod_id, code, "cb_UnloadMod");
        check_status("unload_mod", code)
    }

    fn save_mod(&self, mod_id: ModId, flags: SaveFlags, dest_name: Option<&str>) -> Result<()> {
        let dest = optional_name(dest_name)?;
        let code = unsafe { (self.api.save_mod)(mod_id.0, flags.bits(), name_ptr(&dest)) };
        trace!(%mod_id, code, "cb_SaveMod");
        check_status("save_mod", code)
    }

    fn mod_ids_by_load_order(&self, collection: CollectionId) -> Vec<ModId> {
        let count = unsafe { (self.api.load_order_num_mods)(collection.0) };
        collect_ids(
            count,
            |buf| unsafe { (self.api.load_order_mod_ids)(collection.0, buf) },
            ModId::from_raw,
        )
    }

    fn mod_ids(&self, collection: CollectionId) -> Vec<ModId> {
        let count = unsafe { (self.api.all_num_mods)(collection.0) };
        collect_ids(count, |buf| unsafe { (self.api.all_mod_ids)(collection.0, buf) }, ModId::from_raw)
    }

    fn mod_id_by_name(&self, collection: CollectionId, name: &str) -> Option<ModId> {
        let name = CString::new(name).ok()?;
        let code = unsafe { (self.api.mod_id_by_name)(collection.0, name.as_ptr()) };
        (code > 0).then_some(ModId(code as u32))
    }

    fn mod_name(&self, mod_id: ModId) -> Option<String> {
        unsafe { owned_string((self.api.file_name_by_id)(mod_id.0)) }
    }

    fn mod_load_order(&self, mod_id: ModId) -> Option<u8> {
        let code = unsafe { (self.api.mod_load_order)(mod_id.0) };
        u8::try_from(code).ok()
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
        let eid = optional_name(editor_id)?;
        let raw = unsafe {
            (self.api.create_record)(
                mod_id.0,
                signature.to_u32(),
                form_id,
                name_ptr(&eid),
                parent.map_or(0, RecordId::get),
                flags.bits(),
            )
        };
        trace!(%mod_id, %signature, form_id, raw, "cb_CreateRecord");
        RecordId::from_raw(raw).ok_or(Error::Call { op: "create_record", code: 0 })
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
        let eid = optional_name(new_editor_id)?;
        let raw = unsafe {
            (self.api.copy_record)(
                record.0,
                dest_mod.0,
                parent.map_or(0, RecordId::get),
                new_form_id,
                name_ptr(&eid),
                flags.bits(),
            )
        };
        trace!(%record, %dest_mod, raw, "cb_CopyRecord");
        RecordId::from_raw(raw).ok_or(Error::Call { op: "copy_record", code: 0 })
    }

    fn reset_record(&self, record: RecordId) -> Result<()> {
        check_status("reset_record", unsafe { (self.api.reset_record)(record.0) })
    }

    fn delete_record(&self, record: RecordId) -> Result<()> {
        let code = unsafe { (self.api.delete_record)(record.0) };
        trace!(%record, code, "cb_DeleteRecord");
        check_status("delete_record", code)
    }

    fn unload_record(&self, record: RecordId) -> Result<()> {
        check_status("unload_record", unsafe { (self.api.unload_record)(record.0) })
    }

    fn record_ids(&self, mod_id: ModId, signature: Signature) -> Vec<RecordId> {
        let sig = signature.to_u32();
        let count = unsafe { (self.api.num_records)(mod_id.0, sig) };
        collect_ids(count, |buf| unsafe { (self.api.record_ids)(mod_id.0, sig, buf) }, RecordId::from_raw)
    }

    fn mod_id_by_record(&self, record: RecordId) -> Option<ModId> {
        ModId::from_raw(unsafe { (self.api.mod_id_by_record)(record.0) })
    }

    fn collection_id_by_record(&self, record: RecordId) -> Option<CollectionId> {
        CollectionId::from_raw(unsafe { (self.api.collection_id_by_record)(record.0) })
    }

    fn collection_id_by_mod(&self, mod_id: ModId) -> Option<CollectionId> {
        CollectionId::from_raw(unsafe { (self.api.collection_id_by_mod)(mod_id.0) })
    }

    fn get_field(&self, record: RecordId, path: &FieldPath, out: &mut Vec<u8>) -> bool {
        out.clear();
        let kind = self.kind(record, path);
        let [f, i1, f1, i2, f2, i3, f3] = path.args();
        trace!(%record, %path, %kind, "cb_GetField");
        match kind {
            FieldKind::Unknown | FieldKind::Missing | FieldKind::List => false,
            kind if kind.is_array() => {
                let count = self.field_attribute(record, path, Attribute::Size) as usize;
                if count == 0 {
                    return false;
                }
                out.resize(count * kind.element_size(), 0);
                unsafe {
                    (self.api.get_field)(record.0, f, i1, f1, i2, f2, i3, f3, out.as_mut_ptr() as *mut *mut c_void);
                }
                true
            }
            kind => {
                let value = unsafe { (self.api.get_field)(record.0, f, i1, f1, i2, f2, i3, f3, ptr::null_mut()) };
                if value.is_null() {
                    return false;
                }
                match kind.element_size() {
                    // SAFETY: variable-size kinds come back as NUL-terminated strings.
                    0 => out.extend_from_slice(unsafe { CStr::from_ptr(value as *const c_char) }.to_bytes()),
                    // SAFETY: fixed-size kinds point at one value of that size.
                    size => out.extend_from_slice(unsafe { std::slice::from_raw_parts(value as *const u8, size) }),
                }
                true
            }
        }
    }

    fn set_field(&self, record: RecordId, path: &FieldPath, value: Option<&[u8]>, length: u32) -> Result<()> {
        let [f, i1, f1, i2, f2, i3, f3] = path.args();
        let mut buffer = match value {
            Some(bytes) => {
                let mut buffer = bytes.to_vec();
                if self.kind(record, path).element_size() == 0 && buffer.last() != Some(&0) {
                    buffer.push(0);
                }
                Some(buffer)
            }
            None => None,
        };
        let data = buffer.as_mut().map_or(ptr::null_mut(), |b| b.as_mut_ptr() as *mut c_void);
        let code = unsafe { (self.api.set_field)(record.0, f, i1, f1, i2, f2, i3, f3, data, length) };
        trace!(%record, %path, length, code, "cb_SetField");
        check_status("set_field", code)
    }

    fn delete_field(&self, record: RecordId, path: &FieldPath) -> Result<()> {
        let [f, i1, f1, i2, f2, i3, f3] = path.args();
        let code = unsafe { (self.api.delete_field)(record.0, f, i1, f1, i2, f2, i3, f3) };
        trace!(%record, %path, code, "cb_DeleteField");
        check_status("delete_field", code)
    }

    fn field_attribute(&self, record: RecordId, path: &FieldPath, attribute: Attribute) -> u32 {
        let [f, i1, f1, i2, f2, i3, f3] = path.args();
        unsafe { (self.api.field_attribute)(record.0, f, i1, f1, i2, f2, i3, f3, attribute as u32) }
    }

    fn long_id_name(&self, record: RecordId, short_id: u32, is_mgef_code: bool) -> Option<String> {
        unsafe { owned_string((self.api.long_id_name)(record.0, short_id, is_mgef_code as u8)) }
    }

    fn make_short_form_id(&self, mod_id: ModId, local_id: u32, is_mgef_code: bool) -> Option<u32> {
        let short = unsafe { (self.api.make_short_form_id)(mod_id.0, local_id, is_mgef_code as u8) };
        (short != u32::MAX).then_some(short)
    }

    fn is_record_winning(&self, record: RecordId, ignore_scanned: bool) -> Result<bool> {
        let code = unsafe { (self.api.is_record_winning)(record.0, ignore_scanned as u8) };
        check_status("is_record_winning", code)?;
        Ok(code > 0)
    }

    fn record_conflicts(&self, record: RecordId, ignore_scanned: bool) -> Vec<RecordId> {
        let count = unsafe { (self.api.num_record_conflicts)(record.0, ignore_scanned as u8) };
        collect_ids(
            count,
            |buf| unsafe { (self.api.record_conflicts)(record.0, buf, ignore_scanned as u8) },
            RecordId::from_raw,
        )
    }

    fn record_history(&self, record: RecordId) -> Vec<RecordId> {
        // History is bounded by the number of conflicting versions.
        let count = unsafe { (self.api.num_record_conflicts)(record.0, 0) };
        collect_ids(count, |buf| unsafe { (self.api.record_history)(record.0, buf) }, RecordId::from_raw)
    }
}
