//! Positional field addressing.
//!
//! The engine addresses every field through a fixed argument tuple:
//! `(FieldID, ListIndex, ListFieldID, ListX2Index, ListX2FieldID, ListX3Index,
//! ListX3FieldID)`. A top-level field uses only the first slot; each level of
//! list nesting adds an `(index, field_id)` pair.

use std::fmt;

/// Path to one field in a record's field tree.
///
/// Holds between one and four field ids, with one list index between each
/// consecutive pair.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldPath {
    fields: [u32; 4],
    indices: [u32; 3],
    depth: u8,
}

impl FieldPath {
    /// Maximum number of field ids in a path (record plus three list levels).
    pub const MAX_DEPTH: usize = 4;

    /// A path to a top-level record field.
    #[inline]
    pub const fn new(field_id: u32) -> Self {
        Self {
            fields: [field_id, 0, 0, 0],
            indices: [0; 3],
            depth: 1,
        }
    }

    /// Build a path from its field ids and the list indices between them.
    ///
    /// Returns `None` unless `fields.len() == indices.len() + 1` and the
    /// path fits in [`MAX_DEPTH`](Self::MAX_DEPTH) levels.
    pub fn from_parts(fields: &[u32], indices: &[u32]) -> Option<Self> {
        if fields.is_empty() || fields.len() > Self::MAX_DEPTH || fields.len() != indices.len() + 1 {
            return None;
        }
        let mut path = Self::new(fields[0]);
        path.fields[..fields.len()].copy_from_slice(fields);
        path.indices[..indices.len()].copy_from_slice(indices);
        path.depth = fields.len() as u8;
        Some(path)
    }

    /// Descend into entry `index` of the list this path names, then into
    /// `field_id` within that entry.
    pub fn push(&self, index: u32, field_id: u32) -> Option<Self> {
        let depth = self.depth();
        if depth >= Self::MAX_DEPTH {
            return None;
        }
        let mut path = *self;
        path.indices[depth - 1] = index;
        path.fields[depth] = field_id;
        path.depth += 1;
        Some(path)
    }

    /// Number of field ids in the path.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth as usize
    }

    /// The field ids, outermost first.
    #[inline]
    pub fn field_ids(&self) -> &[u32] {
        &self.fields[..self.depth()]
    }

    /// The list indices, outermost first.
    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices[..self.depth() - 1]
    }

    /// The innermost field id.
    #[inline]
    pub fn field_id(&self) -> u32 {
        self.fields[self.depth() - 1]
    }

    /// The list crossed at `level` and the entry index used there.
    pub fn list_level(&self, level: usize) -> Option<(FieldPath, u32)> {
        if level + 1 >= self.depth() {
            return None;
        }
        let list = Self::from_parts(&self.fields[..=level], &self.indices[..level])?;
        Some((list, self.indices[level]))
    }

    /// If this path lies inside an entry of `list`, the index of that entry.
    pub fn entry_index_in(&self, list: &FieldPath) -> Option<u32> {
        let depth = list.depth();
        if self.depth() <= depth
            || self.fields[..depth] != list.fields[..depth]
            || self.indices[..depth - 1] != list.indices[..depth - 1]
        {
            return None;
        }
        Some(self.indices[depth - 1])
    }

    /// The interleaved seven-slot argument tuple, zero-filled past the depth.
    pub fn args(&self) -> [u32; 7] {
        let mut args = [0u32; 7];
        for (level, &field) in self.field_ids().iter().enumerate() {
            args[level * 2] = field;
            if level > 0 {
                args[level * 2 - 1] = self.indices[level - 1];
            }
        }
        args
    }
}

impl fmt::Debug for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldPath({})", self)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fields[0])?;
        for level in 1..self.depth() {
            write!(f, "[{}].{}", self.indices[level - 1], self.fields[level])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_layout() {
        let path = FieldPath::new(10).push(1, 2).unwrap().push(3, 2).unwrap().push(0, 5).unwrap();
        assert_eq!(path.args(), [10, 1, 2, 3, 2, 0, 5]);
        assert_eq!(path.to_string(), "10[1].2[3].2[0].5");
        assert!(path.push(0, 1).is_none());
    }

    #[test]
    fn test_top_level_args() {
        assert_eq!(FieldPath::new(7).args(), [7, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_from_parts() {
        let path = FieldPath::from_parts(&[14, 2], &[4]).unwrap();
        assert_eq!(path, FieldPath::new(14).push(4, 2).unwrap());
        assert!(FieldPath::from_parts(&[14, 2], &[]).is_none());
        assert!(FieldPath::from_parts(&[], &[]).is_none());
    }

    #[test]
    fn test_list_level() {
        let path = FieldPath::new(10).push(1, 2).unwrap().push(3, 4).unwrap();
        let (outer, index) = path.list_level(0).unwrap();
        assert_eq!((outer, index), (FieldPath::new(10), 1));
        let (inner, index) = path.list_level(1).unwrap();
        assert_eq!(inner, FieldPath::new(10).push(1, 2).unwrap());
        assert_eq!(index, 3);
        assert!(path.list_level(2).is_none());
    }

    #[test]
    fn test_entry_index_in() {
        let list = FieldPath::new(10).push(1, 2).unwrap();
        let inside = list.push(5, 1).unwrap();
        assert_eq!(inside.entry_index_in(&list), Some(5));
        let sibling = FieldPath::new(10).push(2, 2).unwrap().push(5, 1).unwrap();
        assert_eq!(sibling.entry_index_in(&list), None);
        assert_eq!(list.entry_index_in(&list), None);
    }
}
