//! Collections and the mods loaded into them.

use cbash_common::Signature;
use cbash_engine::{CollectionId, CreateFlags, Engine, GameMode, ModFlags, ModId, RecordId, SaveFlags};
use tracing::{debug, warn};

use crate::accessor::{Accessor, AccessorConfig, SchemaRegistry};
use crate::identity::{EngineScope, FormId};
use crate::view::RecordView;
use crate::{Error, Result};

/// A load order of mods sharing one FormID space.
pub struct Collection<'e, E: Engine + ?Sized> {
    engine: &'e E,
    id: CollectionId,
    registry: &'e SchemaRegistry,
    config: AccessorConfig,
}

impl<E: Engine + ?Sized> Clone for Collection<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: Engine + ?Sized> Copy for Collection<'_, E> {}

impl<'e, E: Engine + ?Sized> Collection<'e, E> {
    /// Create an empty collection reading from `data_path`.
    pub fn create(engine: &'e E, data_path: &str, game: GameMode) -> Result<Self> {
        let id = engine.create_collection(data_path, game)?;
        debug!(%id, data_path, game = game.as_str(), "created collection");
        Ok(Self::open(engine, id))
    }

    /// Wrap an existing collection, using the built-in schemas.
    pub fn open(engine: &'e E, id: CollectionId) -> Self {
        Self {
            engine,
            id,
            registry: SchemaRegistry::global(),
            config: AccessorConfig::default(),
        }
    }

    pub fn with_registry(mut self, registry: &'e SchemaRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_config(mut self, config: AccessorConfig) -> Self {
        self.config = config;
        self
    }

    #[inline]
    pub fn id(&self) -> CollectionId {
        self.id
    }

    #[inline]
    pub fn engine(&self) -> &'e E {
        self.engine
    }

    #[inline]
    pub fn registry(&self) -> &'e SchemaRegistry {
        self.registry
    }

    #[inline]
    pub fn config(&self) -> AccessorConfig {
        self.config
    }

    /// Scope for resolving symbolic references against this collection.
    pub fn scope(&self) -> EngineScope<'e, E> {
        EngineScope::new(self.engine, self.id)
    }

    pub fn accessor(&self) -> Accessor<'e, E> {
        Accessor::new(self.engine, self.id, self.registry, self.config)
    }

    /// Add a mod by file name. It is read on [`Collection::load`].
    pub fn add_mod(&self, name: &str, flags: ModFlags) -> Result<ModFile<'e, E>> {
        let id = self.engine.add_mod(self.id, name, flags)?;
        Ok(ModFile { collection: *self, id })
    }

    pub fn load(&self) -> Result<()> {
        Ok(self.engine.load_collection(self.id)?)
    }

    pub fn unload(&self) -> Result<()> {
        Ok(self.engine.unload_collection(self.id)?)
    }

    /// Destroy the collection and everything loaded into it.
    pub fn delete(self) -> Result<()> {
        Ok(self.engine.delete_collection(self.id)?)
    }

    /// Mods in load order.
    pub fn mods(&self) -> Vec<ModFile<'e, E>> {
        self.wrap_mods(self.engine.mod_ids_by_load_order(self.id))
    }

    /// Every mod, including scanned mods outside the load order.
    pub fn all_mods(&self) -> Vec<ModFile<'e, E>> {
        self.wrap_mods(self.engine.mod_ids(self.id))
    }

    fn wrap_mods(&self, ids: Vec<ModId>) -> Vec<ModFile<'e, E>> {
        ids.into_iter().map(|id| ModFile { collection: *self, id }).collect()
    }

    pub fn mod_by_name(&self, name: &str) -> Option<ModFile<'e, E>> {
        let id = self.engine.mod_id_by_name(self.id, name)?;
        Some(ModFile { collection: *self, id })
    }

    /// View a record of a known type.
    pub fn record(&self, record: RecordId, signature: Signature) -> Result<RecordView<'e, E>> {
        if self.engine.collection_id_by_record(record) != Some(self.id) {
            return Err(Error::RecordNotFound(record.to_string()));
        }
        RecordView::open(self.accessor(), record, signature)
    }

    /// Winning versions of every record of a type, across all mods.
    pub fn winning_records(&self, signature: Signature) -> Result<Vec<RecordView<'e, E>>> {
        let mut winners = Vec::new();
        for file in self.mods() {
            for record in file.records(signature)? {
                if record.is_winning(false)? {
                    winners.push(record);
                }
            }
        }
        Ok(winners)
    }
}

/// A mod within a collection.
pub struct ModFile<'e, E: Engine + ?Sized> {
    collection: Collection<'e, E>,
    id: ModId,
}

impl<E: Engine + ?Sized> Clone for ModFile<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: Engine + ?Sized> Copy for ModFile<'_, E> {}

impl<'e, E: Engine + ?Sized> ModFile<'e, E> {
    #[inline]
    pub fn id(&self) -> ModId {
        self.id
    }

    #[inline]
    pub fn collection(&self) -> Collection<'e, E> {
        self.collection
    }

    pub fn name(&self) -> Option<String> {
        self.collection.engine.mod_name(self.id)
    }

    /// Load-order position, or `None` for scanned mods.
    pub fn load_order(&self) -> Option<u8> {
        self.collection.engine.mod_load_order(self.id)
    }

    pub fn load(&self) -> Result<()> {
        Ok(self.collection.engine.load_mod(self.id)?)
    }

    pub fn unload(&self) -> Result<()> {
        Ok(self.collection.engine.unload_mod(self.id)?)
    }

    /// Write the mod to disk, under `dest_name` if given.
    pub fn save(&self, flags: SaveFlags, dest_name: Option<&str>) -> Result<()> {
        Ok(self.collection.engine.save_mod(self.id, flags, dest_name)?)
    }

    /// Every record of a type in this mod.
    pub fn records(&self, signature: Signature) -> Result<Vec<RecordView<'e, E>>> {
        let Some(schema) = self.collection.registry.get(signature) else {
            warn!(%signature, "no schema registered for record type");
            return Err(Error::UnknownSignature(signature));
        };
        let accessor = self.collection.accessor();
        Ok(self
            .collection
            .engine
            .record_ids(self.id, signature)
            .into_iter()
            .map(|id| RecordView::new(accessor, id, schema))
            .collect())
    }

    /// Find a record of a type by editor id, ignoring case.
    pub fn record_by_editor_id(&self, signature: Signature, editor_id: &str) -> Result<Option<RecordView<'e, E>>> {
        Ok(self
            .records(signature)?
            .into_iter()
            .find(|r| r.editor_id().is_some_and(|eid| eid.eq_ignore_ascii_case(editor_id))))
    }

    /// Find a record of a type by FormID.
    pub fn record_by_form_id(&self, signature: Signature, form_id: &FormId) -> Result<Option<RecordView<'e, E>>> {
        Ok(self.records(signature)?.into_iter().find(|r| r.form_id() == *form_id))
    }

    /// Create a new top-level record with a fresh FormID.
    pub fn create_record(&self, signature: Signature, editor_id: Option<&str>) -> Result<RecordView<'e, E>> {
        self.create(signature, editor_id, None)
    }

    /// Create a new record owned by `parent`, such as a placed reference
    /// inside a cell.
    pub fn create_child(
        &self,
        parent: &RecordView<'e, E>,
        signature: Signature,
        editor_id: Option<&str>,
    ) -> Result<RecordView<'e, E>> {
        self.create(signature, editor_id, Some(parent.id()))
    }

    fn create(&self, signature: Signature, editor_id: Option<&str>, parent: Option<RecordId>) -> Result<RecordView<'e, E>> {
        let schema = self
            .collection
            .registry
            .get(signature)
            .ok_or(Error::UnknownSignature(signature))?;
        let record =
            self.collection
                .engine
                .create_record(self.id, signature, 0, editor_id, parent, CreateFlags::empty())?;
        debug!(%record, %signature, mod_id = %self.id, "created record");
        Ok(RecordView::new(self.collection.accessor(), record, schema))
    }
}
