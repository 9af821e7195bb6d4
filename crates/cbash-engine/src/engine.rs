//! The operations the binding consumes from the native record engine.
//!
//! The engine owns every collection, mod, and record; callers only hold the
//! integer identifiers it hands out. All operations are synchronous and take
//! `&self`: the native engine is not reentrant, and callers must not drive
//! the same engine from several threads at once.

use cbash_common::Signature;

use crate::{
    Attribute, CollectionId, CreateFlags, FieldPath, GameMode, ModFlags, ModId, RecordId, Result,
    SaveFlags,
};

/// Field ids shared by every record type's header.
pub mod header {
    /// Record header flags.
    pub const FLAGS1: u32 = 1;
    /// The record's own short FormID.
    pub const FORM_ID: u32 = 2;
    /// Version control info.
    pub const FLAGS2: u32 = 3;
    /// Editor id string.
    pub const EDITOR_ID: u32 = 4;
}

/// The native engine surface.
pub trait Engine {
    // Collection lifecycle

    fn create_collection(&self, data_path: &str, game: GameMode) -> Result<CollectionId>;

    fn delete_collection(&self, collection: CollectionId) -> Result<()>;

    fn load_collection(&self, collection: CollectionId) -> Result<()>;

    fn unload_collection(&self, collection: CollectionId) -> Result<()>;

    // Mod lifecycle

    fn add_mod(&self, collection: CollectionId, name: &str, flags: ModFlags) -> Result<ModId>;

    fn load_mod(&self, mod_id: ModId) -> Result<()>;

    fn unload_mod(&self, mod_id: ModId) -> Result<()>;

    /// Write the mod to disk, optionally under a different file name.
    fn save_mod(&self, mod_id: ModId, flags: SaveFlags, dest_name: Option<&str>) -> Result<()>;

    /// Mods that take a load-order slot, in load order.
    fn mod_ids_by_load_order(&self, collection: CollectionId) -> Vec<ModId>;

    /// Every mod in the collection, in the order they were added.
    fn mod_ids(&self, collection: CollectionId) -> Vec<ModId>;

    fn mod_id_by_name(&self, collection: CollectionId, name: &str) -> Option<ModId>;

    fn mod_name(&self, mod_id: ModId) -> Option<String>;

    /// Load-order position, or `None` for mods that are only scanned.
    fn mod_load_order(&self, mod_id: ModId) -> Option<u8>;

    // Record lifecycle

    /// Create a record. A `form_id` of 0 asks the engine to allocate a new one.
    fn create_record(
        &self,
        mod_id: ModId,
        signature: Signature,
        form_id: u32,
        editor_id: Option<&str>,
        parent: Option<RecordId>,
        flags: CreateFlags,
    ) -> Result<RecordId>;

    fn copy_record(
        &self,
        record: RecordId,
        dest_mod: ModId,
        parent: Option<RecordId>,
        new_form_id: u32,
        new_editor_id: Option<&str>,
        flags: CreateFlags,
    ) -> Result<RecordId>;

    /// Discard unsaved changes to a record.
    fn reset_record(&self, record: RecordId) -> Result<()>;

    fn delete_record(&self, record: RecordId) -> Result<()>;

    /// Release the record's field data; it is reloaded on next access.
    fn unload_record(&self, record: RecordId) -> Result<()>;

    fn record_ids(&self, mod_id: ModId, signature: Signature) -> Vec<RecordId>;

    fn mod_id_by_record(&self, record: RecordId) -> Option<ModId>;

    fn collection_id_by_record(&self, record: RecordId) -> Option<CollectionId>;

    fn collection_id_by_mod(&self, mod_id: ModId) -> Option<CollectionId>;

    // Field access

    /// Read a field's raw bytes into `out`. Returns `false` if the field is absent.
    ///
    /// Scalars fill `out` with their little-endian value, strings with their
    /// bytes (no terminator), arrays with `Size * element_size` bytes.
    fn get_field(&self, record: RecordId, path: &FieldPath, out: &mut Vec<u8>) -> bool;

    /// Write a field. `value: None` is a length-only call that resizes an
    /// array or list to `length` default-initialized elements; for arrays
    /// `length` is also the element count of `value`.
    fn set_field(&self, record: RecordId, path: &FieldPath, value: Option<&[u8]>, length: u32) -> Result<()>;

    fn delete_field(&self, record: RecordId, path: &FieldPath) -> Result<()>;

    fn field_attribute(&self, record: RecordId, path: &FieldPath, attribute: Attribute) -> u32;

    // Identity

    /// Name of the mod that a short id (as seen from `record`'s collection) belongs to.
    fn long_id_name(&self, record: RecordId, short_id: u32, is_mgef_code: bool) -> Option<String>;

    /// Combine a mod's load-order position with a local id.
    fn make_short_form_id(&self, mod_id: ModId, local_id: u32, is_mgef_code: bool) -> Option<u32>;

    // Conflicts

    fn is_record_winning(&self, record: RecordId, ignore_scanned: bool) -> Result<bool>;

    /// Every version of the record in the collection, winner first.
    fn record_conflicts(&self, record: RecordId, ignore_scanned: bool) -> Vec<RecordId>;

    /// Versions of the record this one overrides, in load order.
    fn record_history(&self, record: RecordId) -> Vec<RecordId>;
}
