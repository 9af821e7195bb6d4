//! Destinations that namespace names resolve against.

use cbash_engine::{CollectionId, Engine};

use super::RefKind;

/// A load-order-bound universe of namespaces.
pub trait Scope {
    /// Identity of the scope, compared to decide whether a cached short form
    /// is still usable.
    fn id(&self) -> CollectionId;

    /// Short form of `local` in namespace `master`, or `None` if `master` is
    /// not part of this scope.
    fn short_id<K: RefKind>(&self, master: &str, local: u32) -> Option<u32>;
}

/// A collection on an engine.
pub struct EngineScope<'e, E: Engine + ?Sized> {
    engine: &'e E,
    collection: CollectionId,
}

impl<'e, E: Engine + ?Sized> EngineScope<'e, E> {
    #[inline]
    pub fn new(engine: &'e E, collection: CollectionId) -> Self {
        Self { engine, collection }
    }

    #[inline]
    pub fn engine(&self) -> &'e E {
        self.engine
    }
}

impl<E: Engine + ?Sized> Clone for EngineScope<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: Engine + ?Sized> Copy for EngineScope<'_, E> {}

impl<E: Engine + ?Sized> Scope for EngineScope<'_, E> {
    fn id(&self) -> CollectionId {
        self.collection
    }

    fn short_id<K: RefKind>(&self, master: &str, local: u32) -> Option<u32> {
        let mod_id = self.engine.mod_id_by_name(self.collection, master)?;
        self.engine.make_short_form_id(mod_id, local, K::IS_MGEF)
    }
}

/// A plain ordered list of namespace names.
///
/// Resolves the same way a collection does, without an engine behind it.
#[derive(Debug, Clone)]
pub struct LoadOrder {
    id: CollectionId,
    names: Vec<String>,
}

impl LoadOrder {
    pub fn new<I, S>(id: CollectionId, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id,
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Position of a namespace, matched case-insensitively.
    pub fn position(&self, master: &str) -> Option<u8> {
        self.names
            .iter()
            .position(|name| name.eq_ignore_ascii_case(master))
            .and_then(|p| u8::try_from(p).ok())
    }
}

impl Scope for LoadOrder {
    fn id(&self) -> CollectionId {
        self.id
    }

    fn short_id<K: RefKind>(&self, master: &str, local: u32) -> Option<u32> {
        Some(K::join(self.position(master)?, local))
    }
}
