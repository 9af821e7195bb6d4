//! Runtime field kinds reported by the engine.

/// The kind of a field, as reported by the `Kind` field attribute.
///
/// The values are the codes the engine returns. Polymorphic kinds
/// (`FormIdOrUInt32`, ...) describe fields whose physical encoding depends on
/// other data in the record; the engine reports the concrete kind when it
/// can and the polymorphic kind when it cannot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum FieldKind {
    /// Field id not known for this record type.
    Unknown = 0,
    /// Field is known but currently absent.
    Missing = 1,
    Bool = 2,
    SInt8 = 3,
    UInt8 = 4,
    SInt16 = 5,
    UInt16 = 6,
    SInt32 = 7,
    UInt32 = 8,
    Float32 = 9,
    Radian = 10,
    FormId = 11,
    MgefCode = 12,
    ActorValue = 13,
    FormIdOrUInt32 = 14,
    FormIdOrFloat32 = 15,
    FormIdOrString = 16,
    MgefCodeOrChar4 = 17,
    SInt32OrFloat32OrString = 18,
    Char4 = 19,
    String = 20,
    /// Case-insensitive string (model paths and similar).
    IString = 21,
    SInt8Array = 22,
    UInt8Array = 23,
    SInt16Array = 24,
    UInt16Array = 25,
    SInt32Array = 26,
    UInt32Array = 27,
    Float32Array = 28,
    FormIdArray = 29,
    MgefCodeArray = 30,
    /// Repeated group of fields addressed by list index.
    List = 31,
    /// Id of a child record owned by the engine.
    SubRecord = 32,
    /// Ids of several child records owned by the engine.
    SubRecordArray = 33,
}

impl FieldKind {
    /// Parse from an engine code.
    pub fn from_u32(value: u32) -> Option<Self> {
        Some(match value {
            0 => Self::Unknown,
            1 => Self::Missing,
            2 => Self::Bool,
            3 => Self::SInt8,
            4 => Self::UInt8,
            5 => Self::SInt16,
            6 => Self::UInt16,
            7 => Self::SInt32,
            8 => Self::UInt32,
            9 => Self::Float32,
            10 => Self::Radian,
            11 => Self::FormId,
            12 => Self::MgefCode,
            13 => Self::ActorValue,
            14 => Self::FormIdOrUInt32,
            15 => Self::FormIdOrFloat32,
            16 => Self::FormIdOrString,
            17 => Self::MgefCodeOrChar4,
            18 => Self::SInt32OrFloat32OrString,
            19 => Self::Char4,
            20 => Self::String,
            21 => Self::IString,
            22 => Self::SInt8Array,
            23 => Self::UInt8Array,
            24 => Self::SInt16Array,
            25 => Self::UInt16Array,
            26 => Self::SInt32Array,
            27 => Self::UInt32Array,
            28 => Self::Float32Array,
            29 => Self::FormIdArray,
            30 => Self::MgefCodeArray,
            31 => Self::List,
            32 => Self::SubRecord,
            33 => Self::SubRecordArray,
            _ => return None,
        })
    }

    /// Size in bytes of one value (one element, for arrays).
    ///
    /// Returns 0 for variable-size kinds.
    pub fn element_size(&self) -> usize {
        match self {
            Self::Bool | Self::SInt8 | Self::UInt8 | Self::SInt8Array | Self::UInt8Array => 1,
            Self::SInt16 | Self::UInt16 | Self::SInt16Array | Self::UInt16Array => 2,
            Self::SInt32
            | Self::UInt32
            | Self::Float32
            | Self::Radian
            | Self::FormId
            | Self::MgefCode
            | Self::ActorValue
            | Self::FormIdOrUInt32
            | Self::FormIdOrFloat32
            | Self::MgefCodeOrChar4
            | Self::Char4
            | Self::SInt32Array
            | Self::UInt32Array
            | Self::Float32Array
            | Self::FormIdArray
            | Self::MgefCodeArray
            | Self::SubRecord
            | Self::SubRecordArray => 4,
            Self::Unknown
            | Self::Missing
            | Self::FormIdOrString
            | Self::SInt32OrFloat32OrString
            | Self::String
            | Self::IString
            | Self::List => 0,
        }
    }

    /// Check if values of this kind are read into a caller-sized buffer.
    pub fn is_array(&self) -> bool {
        matches!(
            self,
            Self::SInt8Array
                | Self::UInt8Array
                | Self::SInt16Array
                | Self::UInt16Array
                | Self::SInt32Array
                | Self::UInt32Array
                | Self::Float32Array
                | Self::FormIdArray
                | Self::MgefCodeArray
                | Self::SubRecordArray
        )
    }

    /// Check if values of this kind are null-terminated strings.
    pub fn is_string(&self) -> bool {
        matches!(self, Self::String | Self::IString | Self::FormIdOrString)
    }

    /// Check if the concrete encoding must be resolved per record.
    pub fn is_polymorphic(&self) -> bool {
        matches!(
            self,
            Self::FormIdOrUInt32
                | Self::FormIdOrFloat32
                | Self::FormIdOrString
                | Self::MgefCodeOrChar4
                | Self::SInt32OrFloat32OrString
        )
    }

    /// Get the string name for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Missing => "Missing",
            Self::Bool => "Bool",
            Self::SInt8 => "SInt8",
            Self::UInt8 => "UInt8",
            Self::SInt16 => "SInt16",
            Self::UInt16 => "UInt16",
            Self::SInt32 => "SInt32",
            Self::UInt32 => "UInt32",
            Self::Float32 => "Float32",
            Self::Radian => "Radian",
            Self::FormId => "FormID",
            Self::MgefCode => "MGEFCode",
            Self::ActorValue => "ActorValue",
            Self::FormIdOrUInt32 => "FormIDOrUInt32",
            Self::FormIdOrFloat32 => "FormIDOrFloat32",
            Self::FormIdOrString => "FormIDOrString",
            Self::MgefCodeOrChar4 => "MGEFCodeOrChar4",
            Self::SInt32OrFloat32OrString => "SInt32OrFloat32OrString",
            Self::Char4 => "Char4",
            Self::String => "String",
            Self::IString => "IString",
            Self::SInt8Array => "SInt8Array",
            Self::UInt8Array => "UInt8Array",
            Self::SInt16Array => "SInt16Array",
            Self::UInt16Array => "UInt16Array",
            Self::SInt32Array => "SInt32Array",
            Self::UInt32Array => "UInt32Array",
            Self::Float32Array => "Float32Array",
            Self::FormIdArray => "FormIDArray",
            Self::MgefCodeArray => "MGEFCodeArray",
            Self::List => "List",
            Self::SubRecord => "SubRecord",
            Self::SubRecordArray => "SubRecordArray",
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Attribute selector for [`Engine::field_attribute`](crate::Engine::field_attribute).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Attribute {
    /// The field's [`FieldKind`] code.
    Kind = 0,
    /// Element count for arrays and lists, byte length for strings.
    Size = 1,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip() {
        for code in 0..=33 {
            let kind = FieldKind::from_u32(code).unwrap();
            assert_eq!(kind as u32, code);
        }
        assert_eq!(FieldKind::from_u32(34), None);
    }

    #[test]
    fn test_classification() {
        assert!(FieldKind::FormIdArray.is_array());
        assert_eq!(FieldKind::FormIdArray.element_size(), 4);
        assert!(FieldKind::FormIdOrUInt32.is_polymorphic());
        assert!(!FieldKind::FormId.is_polymorphic());
        assert!(FieldKind::IString.is_string());
        assert_eq!(FieldKind::List.element_size(), 0);
    }
}
