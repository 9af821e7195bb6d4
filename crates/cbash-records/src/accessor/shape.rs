//! Value shapes a field accessor can take.

use cbash_common::Signature;
use cbash_engine::FieldKind;

use super::FieldDef;

/// Element type of scalar and array fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Bool,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Float,
    /// Angle in radians, stored as a float.
    Radian,
    FormId,
    ActorValue,
    MgefCode,
    Char4,
}

impl ScalarType {
    /// Kind the engine reports for a single value.
    pub fn kind(self) -> FieldKind {
        match self {
            ScalarType::Bool => FieldKind::Bool,
            ScalarType::Int8 => FieldKind::SInt8,
            ScalarType::UInt8 => FieldKind::UInt8,
            ScalarType::Int16 => FieldKind::SInt16,
            ScalarType::UInt16 => FieldKind::UInt16,
            ScalarType::Int32 => FieldKind::SInt32,
            ScalarType::UInt32 => FieldKind::UInt32,
            ScalarType::Float => FieldKind::Float32,
            ScalarType::Radian => FieldKind::Radian,
            ScalarType::FormId => FieldKind::FormId,
            ScalarType::ActorValue => FieldKind::ActorValue,
            ScalarType::MgefCode => FieldKind::MgefCode,
            ScalarType::Char4 => FieldKind::Char4,
        }
    }

    /// Kind the engine reports for an array of this type.
    pub fn array_kind(self) -> FieldKind {
        match self {
            ScalarType::Bool | ScalarType::UInt8 => FieldKind::UInt8Array,
            ScalarType::Int8 => FieldKind::SInt8Array,
            ScalarType::Int16 => FieldKind::SInt16Array,
            ScalarType::UInt16 => FieldKind::UInt16Array,
            ScalarType::Int32 => FieldKind::SInt32Array,
            ScalarType::UInt32 | ScalarType::ActorValue | ScalarType::Char4 => FieldKind::UInt32Array,
            ScalarType::Float | ScalarType::Radian => FieldKind::Float32Array,
            ScalarType::FormId => FieldKind::FormIdArray,
            ScalarType::MgefCode => FieldKind::MgefCodeArray,
        }
    }

    #[inline]
    pub fn size(self) -> usize {
        self.kind().element_size()
    }

    /// Check if values of this type are symbolic references.
    #[inline]
    pub fn is_reference(self) -> bool {
        matches!(self, ScalarType::FormId | ScalarType::ActorValue | ScalarType::MgefCode)
    }
}

/// How a field's value is laid out and accessed.
#[derive(Debug, Clone, Copy)]
pub enum Shape {
    Scalar(ScalarType),
    /// Variable-length array, or fixed-length when `fixed` is set.
    Array { element: ScalarType, fixed: Option<usize> },
    String,
    /// Case-insensitive string.
    IString,
    /// One bit of the scalar field `base`.
    Flag { base: u32, mask: u32 },
    /// True when the bits of `base` under `mask` equal `value`.
    Enum { base: u32, mask: u32, value: u32 },
    /// Sibling fields presented as one object.
    Group(&'static [FieldDef]),
    /// Repeated group of fields.
    List(&'static [FieldDef]),
    /// Encoding chosen per record; the declared kind is polymorphic.
    Dynamic(FieldKind),
    /// One child record, viewed through its own schema.
    SubRecord(Signature),
    /// Child records owned by the engine, listed by id.
    SubRecords(Signature),
}

impl Shape {
    /// Kind the engine declares for the field slot, if the shape has one.
    ///
    /// Flags, enums, and groups have no slot of their own.
    pub fn kind(&self) -> Option<FieldKind> {
        Some(match *self {
            Shape::Scalar(ty) => ty.kind(),
            Shape::Array { element, .. } => element.array_kind(),
            Shape::String => FieldKind::String,
            Shape::IString => FieldKind::IString,
            Shape::List(_) => FieldKind::List,
            Shape::Dynamic(kind) => kind,
            Shape::SubRecord(_) => FieldKind::SubRecord,
            Shape::SubRecords(_) => FieldKind::SubRecordArray,
            Shape::Flag { .. } | Shape::Enum { .. } | Shape::Group(_) => return None,
        })
    }

    /// Check if the shape is computed from another field's bits.
    #[inline]
    pub fn is_derived(&self) -> bool {
        matches!(self, Shape::Flag { .. } | Shape::Enum { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_kinds() {
        assert_eq!(ScalarType::FormId.array_kind(), FieldKind::FormIdArray);
        assert_eq!(ScalarType::Radian.array_kind().element_size(), 4);
        assert_eq!(ScalarType::Int16.size(), 2);
        assert!(ScalarType::MgefCode.is_reference());
    }

    #[test]
    fn test_shape_kind() {
        assert_eq!(Shape::Flag { base: 1, mask: 2 }.kind(), None);
        assert_eq!(
            Shape::Array { element: ScalarType::UInt8, fixed: Some(3) }.kind(),
            Some(FieldKind::UInt8Array)
        );
        assert_eq!(Shape::SubRecords(Signature::new(*b"REFR")).kind(), Some(FieldKind::SubRecordArray));
        assert!(Shape::Enum { base: 1, mask: 0xFF, value: 2 }.is_derived());
        assert!(!Shape::Scalar(ScalarType::UInt8).is_derived());
    }
}
