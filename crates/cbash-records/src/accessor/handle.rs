//! Addressing of records and list entries.

use cbash_engine::{FieldPath, RecordId};

use crate::{Error, Result};

/// A record, or one list entry inside it.
///
/// Carries no field data; every access goes back to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    record: RecordId,
    /// Path of the list and the entry index, for list entries.
    entry: Option<(FieldPath, u32)>,
}

impl Handle {
    /// Handle to a record's top-level fields.
    #[inline]
    pub fn record(record: RecordId) -> Self {
        Self { record, entry: None }
    }

    #[inline]
    pub fn record_id(&self) -> RecordId {
        self.record
    }

    /// Number of list levels between the record and this handle.
    pub fn depth(&self) -> usize {
        self.entry.map_or(0, |(list, _)| list.depth())
    }

    /// Index of this entry within its list.
    pub fn index(&self) -> Option<u32> {
        self.entry.map(|(_, index)| index)
    }

    /// Full path of field `field_id` under this handle.
    pub fn path(&self, field_id: u32) -> Result<FieldPath> {
        match self.entry {
            None => Ok(FieldPath::new(field_id)),
            Some((list, index)) => list
                .push(index, field_id)
                .ok_or(Error::NestingTooDeep(FieldPath::MAX_DEPTH - 1)),
        }
    }

    /// Handle to entry `index` of the list `list_id` under this handle.
    pub fn entry(&self, list_id: u32, index: u32) -> Result<Handle> {
        let list = self.path(list_id)?;
        if list.depth() >= FieldPath::MAX_DEPTH {
            return Err(Error::NestingTooDeep(FieldPath::MAX_DEPTH - 1));
        }
        Ok(Self {
            record: self.record,
            entry: Some((list, index)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_thread_indices() {
        let record = Handle::record(RecordId(7));
        assert_eq!(record.path(5).unwrap(), FieldPath::new(5));

        let stage = record.entry(11, 2).unwrap();
        let entry = stage.entry(2, 0).unwrap();
        let condition = entry.entry(2, 4).unwrap();
        assert_eq!(condition.depth(), 3);
        assert_eq!(condition.path(5).unwrap().args(), [11, 2, 2, 0, 2, 4, 5]);
        assert_eq!(condition.index(), Some(4));
    }

    #[test]
    fn test_fourth_list_level_is_rejected() {
        let deep = Handle::record(RecordId(1))
            .entry(1, 0)
            .and_then(|h| h.entry(1, 0))
            .and_then(|h| h.entry(1, 0))
            .unwrap();
        assert!(matches!(deep.entry(1, 0), Err(Error::NestingTooDeep(3))));
    }
}
