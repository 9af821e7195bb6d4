//! Bulk validation ahead of building a write buffer.
//!
//! Entries that do not resolve in the destination are dropped rather than
//! failing the whole batch. Empty references are valid everywhere and are
//! kept, except by the `_shorts` variants, which have no integer for them.

use tracing::debug;

use super::{RefKind, Scope, SymbolicRef};

/// The validated reference and its short form (`None` when empty), or
/// `None` if it does not resolve.
fn resolve<K: RefKind, S: Scope>(reference: &SymbolicRef<K>, scope: &S) -> Option<(SymbolicRef<K>, Option<u32>)> {
    let validated = reference.validate(scope);
    match validated.short(scope) {
        Ok(short) => Some((validated, short)),
        Err(_) => {
            debug!(%reference, scope = %scope.id(), "dropping unresolvable reference");
            None
        }
    }
}

/// Keep the references that resolve in `scope`, validated for it.
pub fn filter_valid<'a, K, S, I>(references: I, scope: &S) -> Vec<SymbolicRef<K>>
where
    K: RefKind,
    S: Scope,
    I: IntoIterator<Item = &'a SymbolicRef<K>>,
{
    references
        .into_iter()
        .filter_map(|r| resolve(r, scope).map(|(validated, _)| validated))
        .collect()
}

/// Short forms of the references that resolve in `scope`. Empty
/// references are skipped.
pub fn filter_valid_shorts<'a, K, S, I>(references: I, scope: &S) -> Vec<u32>
where
    K: RefKind,
    S: Scope,
    I: IntoIterator<Item = &'a SymbolicRef<K>>,
{
    references
        .into_iter()
        .filter_map(|r| resolve(r, scope).and_then(|(_, short)| short))
        .collect()
}

/// Keep the pairs whose key resolves in `scope`.
pub fn filter_valid_dict<K, V, S, I>(entries: I, scope: &S) -> Vec<(SymbolicRef<K>, V)>
where
    K: RefKind,
    S: Scope,
    I: IntoIterator<Item = (SymbolicRef<K>, V)>,
{
    entries
        .into_iter()
        .filter_map(|(key, value)| resolve(&key, scope).map(|(validated, _)| (validated, value)))
        .collect()
}

/// Keep the pairs whose value resolves in `scope`.
pub fn filter_valid_dict_values<T, K, S, I>(entries: I, scope: &S) -> Vec<(T, SymbolicRef<K>)>
where
    K: RefKind,
    S: Scope,
    I: IntoIterator<Item = (T, SymbolicRef<K>)>,
{
    entries
        .into_iter()
        .filter_map(|(key, value)| resolve(&value, scope).map(|(validated, _)| (key, validated)))
        .collect()
}

/// Pairs whose key resolves in `scope`, keyed by short form. Empty keys
/// are skipped.
pub fn filter_valid_dict_shorts<K, V, S, I>(entries: I, scope: &S) -> Vec<(u32, V)>
where
    K: RefKind,
    S: Scope,
    I: IntoIterator<Item = (SymbolicRef<K>, V)>,
{
    entries
        .into_iter()
        .filter_map(|(key, value)| resolve(&key, scope).and_then(|(_, short)| short).map(|short| (short, value)))
        .collect()
}

#[cfg(test)]
mod tests {
    use cbash_engine::CollectionId;

    use super::*;
    use crate::identity::{FormId, LoadOrder, RefState};

    fn scope() -> LoadOrder {
        LoadOrder::new(CollectionId(1), ["Oblivion.esm", "Mod.esp"])
    }

    #[test]
    fn test_filter_valid_drops_unresolvable() {
        let refs = vec![
            FormId::long("Mod.esp", 0x801),
            FormId::long("Gone.esp", 0x802),
            FormId::invalid(0x803),
            FormId::empty(),
            FormId::raw(0x0000_0007),
        ];
        let kept = filter_valid(&refs, &scope());
        assert_eq!(kept.len(), 3);
        assert!(matches!(kept[0].state(), RefState::Valid { short: 0x0100_0801, .. }));
        assert!(kept[1].is_empty());
        assert!(matches!(kept[2].state(), RefState::Raw { short: 0x7 }));
        assert_eq!(filter_valid_shorts(&refs, &scope()), vec![0x0100_0801, 0x0000_0007]);
    }

    #[test]
    fn test_filter_valid_agrees_with_is_valid() {
        let refs = vec![FormId::empty(), FormId::long("Oblivion.esm", 0x10), FormId::long("Gone.esp", 0x11)];
        let expected: Vec<_> = refs.iter().filter(|r| r.is_valid(&scope())).cloned().collect();
        assert_eq!(filter_valid(&refs, &scope()), expected);
        assert_eq!(filter_valid(&[FormId::empty()], &scope()).len(), 1);

        let entries = vec![(FormId::empty(), 1), (FormId::long("Gone.esp", 0x11), 2)];
        assert_eq!(filter_valid_dict(entries.clone(), &scope()), vec![(FormId::empty(), 1)]);
        assert!(filter_valid_dict_shorts(entries, &scope()).is_empty());

        let by_value = vec![("a", FormId::empty()), ("b", FormId::invalid(1))];
        assert_eq!(filter_valid_dict_values(by_value, &scope()), vec![("a", FormId::empty())]);
    }

    #[test]
    fn test_filter_valid_dict() {
        let entries = vec![
            (FormId::long("Oblivion.esm", 0x10), 1),
            (FormId::long("Gone.esp", 0x11), 2),
        ];
        assert_eq!(filter_valid_dict_shorts(entries.clone(), &scope()), vec![(0x10, 1)]);
        assert_eq!(filter_valid_dict(entries, &scope()).len(), 1);

        let by_value = vec![("a", FormId::invalid(1)), ("b", FormId::long("Mod.esp", 2))];
        let kept = filter_valid_dict_values(by_value, &scope());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].0, "b");
    }
}
