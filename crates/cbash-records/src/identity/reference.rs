//! Symbolic cross-file references.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use cbash_common::Signature;
use cbash_engine::{CollectionId, Engine, RecordId};
use tracing::debug;

use super::{ActorValueKind, FormIdKind, MgefCodeKind, RefKind, Scope};
use crate::{Error, Result};

/// Resolution state of a symbolic reference.
#[derive(Debug, Clone)]
pub enum RefState {
    /// No reference. Always valid, resolves to nothing.
    Empty,
    /// A namespace and local id not yet checked against any scope.
    Unvalidated { master: String, local: u32 },
    /// Read from a mod whose new records were skipped, so the namespace
    /// index cannot be trusted.
    Invalid { local: u32 },
    /// Checked against `scope`; `short` is only correct there.
    Valid {
        master: String,
        local: u32,
        short: u32,
        scope: CollectionId,
    },
    /// A pre-resolved integer whose namespace cannot be checked.
    Raw { short: u32 },
}

/// A reference to something defined in a particular mod, resolved per
/// destination collection.
///
/// Equality and hashing use the logical `(namespace, local id)` pair, so a
/// validated reference equals the unvalidated one it came from.
#[derive(Clone)]
pub struct SymbolicRef<K: RefKind> {
    state: RefState,
    kind: PhantomData<K>,
}

/// Reference to a record.
pub type FormId = SymbolicRef<FormIdKind>;
/// Reference to an actor value.
pub type ActorValue = SymbolicRef<ActorValueKind>;
/// Reference to a magic effect.
pub type MgefCode = SymbolicRef<MgefCodeKind>;

impl<K: RefKind> SymbolicRef<K> {
    #[inline]
    fn from_state(state: RefState) -> Self {
        Self {
            state,
            kind: PhantomData,
        }
    }

    /// The empty reference.
    #[inline]
    pub fn empty() -> Self {
        Self::from_state(RefState::Empty)
    }

    /// A reference to `local` in namespace `master`.
    ///
    /// Local ids that are never namespaced for this kind become raw.
    pub fn long(master: impl Into<String>, local: u32) -> Self {
        if !K::is_namespaced(local) {
            return Self::raw(local);
        }
        Self::from_state(RefState::Unvalidated {
            master: master.into(),
            local: K::local(local),
        })
    }

    /// A pre-resolved short form, trusted as-is.
    #[inline]
    pub fn raw(short: u32) -> Self {
        Self::from_state(RefState::Raw { short })
    }

    /// A reference known to be unsafe.
    #[inline]
    pub fn invalid(local: u32) -> Self {
        Self::from_state(RefState::Invalid { local: K::local(local) })
    }

    /// Wrap a short form read from `record`.
    ///
    /// The namespace is looked up in the record's own collection; if the
    /// engine cannot name it, the reference is [`RefState::Invalid`].
    pub fn from_short<E: Engine + ?Sized>(engine: &E, record: RecordId, short: u32) -> Self {
        if K::is_null(short) {
            return Self::empty();
        }
        if !K::is_namespaced(K::local(short)) {
            return Self::raw(short);
        }
        let name = engine.long_id_name(record, short, K::IS_MGEF);
        let scope = engine.collection_id_by_record(record);
        match (name, scope) {
            (Some(master), Some(scope)) => Self::from_state(RefState::Valid {
                master,
                local: K::local(short),
                short,
                scope,
            }),
            _ => Self::invalid(short),
        }
    }

    #[inline]
    pub fn state(&self) -> &RefState {
        &self.state
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self.state, RefState::Empty)
    }

    /// The namespace name, when known.
    pub fn master(&self) -> Option<&str> {
        match &self.state {
            RefState::Unvalidated { master, .. } | RefState::Valid { master, .. } => Some(master),
            _ => None,
        }
    }

    /// The local id, or the whole short form for raw references.
    pub fn local(&self) -> Option<u32> {
        match self.state {
            RefState::Empty => None,
            RefState::Unvalidated { local, .. } | RefState::Invalid { local } | RefState::Valid { local, .. } => {
                Some(local)
            }
            RefState::Raw { short } => Some(short),
        }
    }

    /// Normalize the reference for `scope`.
    ///
    /// Idempotent. A valid reference checked against a different scope is
    /// re-derived from its namespace and local id; a reference whose
    /// namespace is not part of `scope` is returned unvalidated.
    pub fn validate<S: Scope>(&self, scope: &S) -> Self {
        match &self.state {
            RefState::Empty | RefState::Invalid { .. } | RefState::Raw { .. } => self.clone(),
            RefState::Valid { scope: cached, .. } if *cached == scope.id() => self.clone(),
            RefState::Valid { master, local, .. } | RefState::Unvalidated { master, local } => {
                match scope.short_id::<K>(master, *local) {
                    Some(short) => Self::from_state(RefState::Valid {
                        master: master.clone(),
                        local: *local,
                        short,
                        scope: scope.id(),
                    }),
                    None => {
                        debug!(reference = %self, scope = %scope.id(), "namespace not in scope");
                        Self::from_state(RefState::Unvalidated {
                            master: master.clone(),
                            local: *local,
                        })
                    }
                }
            }
        }
    }

    /// Check if the reference can be written into `scope`.
    pub fn is_valid<S: Scope>(&self, scope: &S) -> bool {
        match &self.state {
            RefState::Empty | RefState::Raw { .. } => true,
            RefState::Invalid { .. } => false,
            _ => matches!(self.validate(scope).state, RefState::Valid { .. }),
        }
    }

    /// The short form to write into `scope`.
    ///
    /// Returns `Ok(None)` for the empty reference and fails with
    /// [`Error::InvalidReference`] when the reference is unsafe or its
    /// namespace is not part of `scope`.
    pub fn short<S: Scope>(&self, scope: &S) -> Result<Option<u32>> {
        match &self.state {
            RefState::Empty => Ok(None),
            RefState::Raw { short } => Ok(Some(*short)),
            RefState::Invalid { .. } => Err(Error::InvalidReference(self.to_string())),
            _ => match self.validate(scope).state {
                RefState::Valid { short, .. } => Ok(Some(short)),
                _ => Err(Error::InvalidReference(self.to_string())),
            },
        }
    }

    fn key(&self) -> (Option<&str>, Option<u32>) {
        (self.master(), self.local())
    }
}

impl MgefCode {
    /// A magic effect code given as its four-character tag.
    pub fn from_tag(tag: Signature) -> Self {
        Self::raw(tag.to_u32())
    }

    /// The four-character tag, for codes that are not namespaced.
    pub fn as_tag(&self) -> Option<Signature> {
        match self.state {
            RefState::Raw { short } if !MgefCodeKind::is_namespaced(short) => Some(Signature::from_u32(short)),
            _ => None,
        }
    }
}

impl<K: RefKind> Default for SymbolicRef<K> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<K: RefKind> PartialEq for SymbolicRef<K> {
    fn eq(&self, other: &Self) -> bool {
        let (a_master, a_local) = self.key();
        let (b_master, b_local) = other.key();
        a_local == b_local
            && match (a_master, b_master) {
                (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
                (None, None) => true,
                _ => false,
            }
    }
}

impl<K: RefKind> Eq for SymbolicRef<K> {}

impl<K: RefKind> Hash for SymbolicRef<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let (master, local) = self.key();
        match master {
            Some(master) => {
                true.hash(state);
                for byte in master.bytes() {
                    byte.to_ascii_lowercase().hash(state);
                }
            }
            None => false.hash(state),
        }
        local.hash(state);
    }
}

impl<K: RefKind> fmt::Display for SymbolicRef<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            RefState::Empty => write!(f, "{}(None)", K::NAME),
            RefState::Unvalidated { master, local } | RefState::Valid { master, local, .. } => {
                write!(f, "{}('{}', 0x{:06X})", K::NAME, master, local)
            }
            RefState::Invalid { local } => write!(f, "{}(invalid, 0x{:06X})", K::NAME, local),
            RefState::Raw { short } => write!(f, "{}(0x{:08X})", K::NAME, short),
        }
    }
}

impl<K: RefKind> fmt::Debug for SymbolicRef<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{:?}]", self, self.state)
    }
}

#[cfg(feature = "serde")]
impl<K: RefKind> serde::Serialize for SymbolicRef<K> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match &self.state {
            RefState::Empty => serializer.serialize_none(),
            RefState::Unvalidated { master, local } | RefState::Valid { master, local, .. } => {
                serde::Serialize::serialize(&(master.as_str(), *local), serializer)
            }
            RefState::Invalid { local } => serde::Serialize::serialize(&(None::<&str>, *local), serializer),
            RefState::Raw { short } => serializer.serialize_u32(*short),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::LoadOrder;

    fn scope(id: u32, names: &[&str]) -> LoadOrder {
        LoadOrder::new(CollectionId(id), names.iter().copied())
    }

    #[test]
    fn test_scenario_index_zero_and_one() {
        let r = FormId::long("Oblivion.esm", 0x001234);
        let first = scope(1, &["Oblivion.esm", "Patch.esp"]);
        let second = scope(2, &["Base.esm", "Oblivion.esm"]);
        assert_eq!(r.short(&first).unwrap(), Some(0x0000_1234));
        assert_eq!(r.short(&second).unwrap(), Some(0x0100_1234));
    }

    #[test]
    fn test_validate_is_idempotent() {
        let s = scope(1, &["Oblivion.esm"]);
        let refs = [
            FormId::empty(),
            FormId::raw(0x0100_0001),
            FormId::invalid(0x42),
            FormId::long("Oblivion.esm", 0x42),
            FormId::long("Missing.esp", 0x42),
        ];
        for r in refs {
            let once = r.validate(&s);
            let twice = once.validate(&s);
            assert_eq!(once, twice);
            assert_eq!(format!("{:?}", once.state()), format!("{:?}", twice.state()));
        }
    }

    #[test]
    fn test_valid_rederives_for_other_scope() {
        let s1 = scope(1, &["Oblivion.esm", "Mod.esp"]);
        let s2 = scope(2, &["Oblivion.esm", "Other.esp", "Mod.esp"]);
        let valid = FormId::long("Mod.esp", 0x000800).validate(&s1);
        assert!(matches!(valid.state(), RefState::Valid { short: 0x0100_0800, .. }));

        let fresh = FormId::long("Mod.esp", 0x000800).short(&s2).unwrap();
        assert_eq!(valid.short(&s2).unwrap(), fresh);
        assert_ne!(valid.short(&s2).unwrap(), valid.short(&s1).unwrap());
    }

    #[test]
    fn test_same_id_different_order_reresolves() {
        let s1 = scope(1, &["Oblivion.esm", "Mod.esp"]);
        let s1_reordered = scope(3, &["Mod.esp", "Oblivion.esm"]);
        let valid = FormId::long("Mod.esp", 0x10).validate(&s1);
        assert_eq!(valid.short(&s1_reordered).unwrap(), Some(0x0000_0010));
    }

    #[test]
    fn test_unresolvable_stays_unvalidated() {
        let s = scope(1, &["Oblivion.esm"]);
        let r = FormId::long("Missing.esp", 0x10);
        assert!(matches!(r.validate(&s).state(), RefState::Unvalidated { .. }));
        assert!(!r.is_valid(&s));
        assert!(matches!(r.short(&s), Err(Error::InvalidReference(_))));
    }

    #[test]
    fn test_invalid_never_resolves() {
        for s in [scope(1, &["Oblivion.esm"]), scope(2, &[])] {
            let r = FormId::invalid(0x001234);
            assert!(matches!(r.short(&s), Err(Error::InvalidReference(_))));
            assert!(matches!(r.validate(&s).state(), RefState::Invalid { .. }));
        }
    }

    #[test]
    fn test_empty_and_raw() {
        let s1 = scope(1, &["Oblivion.esm"]);
        let s2 = scope(2, &["Other.esm", "Oblivion.esm"]);
        assert_eq!(FormId::empty().short(&s1).unwrap(), None);
        assert_eq!(FormId::empty().short(&s2).unwrap(), None);
        let raw = FormId::raw(0x0500_0001);
        assert_eq!(raw.short(&s1).unwrap(), Some(0x0500_0001));
        assert_eq!(raw.short(&s2).unwrap(), Some(0x0500_0001));
    }

    #[test]
    fn test_actor_value_below_threshold_is_raw() {
        let s = scope(1, &["Oblivion.esm", "Mod.esp"]);
        let strength = ActorValue::long("Mod.esp", 0x0);
        assert!(matches!(strength.state(), RefState::Raw { short: 0 }));
        assert_eq!(strength.short(&s).unwrap(), Some(0));
        assert_eq!(ActorValue::long("Mod.esp", 0x800).short(&s).unwrap(), Some(0x0100_0800));
    }

    #[test]
    fn test_mgef_code_tags() {
        let s = scope(1, &["Oblivion.esm", "Mod.esp"]);
        let tag = Signature::new(*b"FIDG");
        let code = MgefCode::from_tag(tag);
        assert_eq!(code.as_tag(), Some(tag));
        assert_eq!(code.short(&s).unwrap(), Some(tag.to_u32()));

        let scoped = MgefCode::long("Mod.esp", 0x8000_1200);
        assert_eq!(scoped.short(&s).unwrap(), Some(0x8000_1201));
        assert_eq!(scoped.as_tag(), None);
    }

    #[test]
    fn test_equality_is_logical() {
        let s = scope(1, &["Oblivion.esm"]);
        let a = FormId::long("Oblivion.esm", 0x10);
        let b = FormId::long("OBLIVION.ESM", 0x10).validate(&s);
        assert_eq!(a, b);
        assert_ne!(a, FormId::long("Oblivion.esm", 0x11));

        let mut set = std::collections::HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn test_display() {
        assert_eq!(FormId::long("Oblivion.esm", 0x1234).to_string(), "FormID('Oblivion.esm', 0x001234)");
        assert_eq!(FormId::empty().to_string(), "FormID(None)");
        assert_eq!(MgefCode::raw(0x10).to_string(), "MGEFCode(0x00000010)");
    }
}
