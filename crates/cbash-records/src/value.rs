//! Typed values read from and written to record fields.

use std::fmt;

use cbash_common::Signature;
use cbash_engine::RecordId;

use crate::identity::{ActorValue, FormId, MgefCode};

/// Named member values of a group or list entry. `None` marks an absent
/// member.
pub type Members = Vec<(&'static str, Option<Value>)>;

/// A field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int8(i8),
    UInt8(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Float(f32),
    FormId(FormId),
    ActorValue(ActorValue),
    MgefCode(MgefCode),
    /// Four-character code.
    Char4(Signature),
    String(String),
    Array(Vec<Value>),
    /// Run of sibling fields presented as one object.
    Group(Members),
    /// Entries of a repeated group.
    List(Vec<Members>),
    /// Child record owned by the engine.
    SubRecord(RecordId),
    /// Several child records owned by the engine.
    SubRecords(Vec<RecordId>),
}

impl Value {
    /// Name of the variant, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int8(_) => "int8",
            Value::UInt8(_) => "uint8",
            Value::Int16(_) => "int16",
            Value::UInt16(_) => "uint16",
            Value::Int32(_) => "int32",
            Value::UInt32(_) => "uint32",
            Value::Float(_) => "float",
            Value::FormId(_) => "formid",
            Value::ActorValue(_) => "actorvalue",
            Value::MgefCode(_) => "mgefcode",
            Value::Char4(_) => "char4",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Group(_) => "group",
            Value::List(_) => "list",
            Value::SubRecord(_) => "subrecord",
            Value::SubRecords(_) => "subrecords",
        }
    }

    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => self.as_i64().map(|v| v != 0),
        }
    }

    /// Any integer value, widened.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Bool(v) => Some(v as i64),
            Value::Int8(v) => Some(v as i64),
            Value::UInt8(v) => Some(v as i64),
            Value::Int16(v) => Some(v as i64),
            Value::UInt16(v) => Some(v as i64),
            Value::Int32(v) => Some(v as i64),
            Value::UInt32(v) => Some(v as i64),
            _ => None,
        }
    }

    #[inline]
    pub fn as_i32(&self) -> Option<i32> {
        self.as_i64().and_then(|v| i32::try_from(v).ok())
    }

    #[inline]
    pub fn as_u32(&self) -> Option<u32> {
        self.as_i64().and_then(|v| u32::try_from(v).ok())
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Value::Float(v) => Some(*v),
            _ => self.as_i64().map(|v| v as f32),
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_form_id(&self) -> Option<&FormId> {
        match self {
            Value::FormId(r) => Some(r),
            _ => None,
        }
    }

    #[inline]
    pub fn as_actor_value(&self) -> Option<&ActorValue> {
        match self {
            Value::ActorValue(r) => Some(r),
            _ => None,
        }
    }

    #[inline]
    pub fn as_mgef_code(&self) -> Option<&MgefCode> {
        match self {
            Value::MgefCode(r) => Some(r),
            _ => None,
        }
    }

    #[inline]
    pub fn as_char4(&self) -> Option<Signature> {
        match self {
            Value::Char4(s) => Some(*s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    #[inline]
    pub fn as_group(&self) -> Option<&Members> {
        match self {
            Value::Group(members) => Some(members),
            _ => None,
        }
    }

    #[inline]
    pub fn as_list(&self) -> Option<&[Members]> {
        match self {
            Value::List(entries) => Some(entries),
            _ => None,
        }
    }

    /// Look up a member of a group value.
    pub fn member(&self, name: &str) -> Option<&Value> {
        self.as_group()?
            .iter()
            .find(|(n, _)| *n == name)
            .and_then(|(_, v)| v.as_ref())
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

value_from! {
    bool => Bool,
    i8 => Int8,
    u8 => UInt8,
    i16 => Int16,
    u16 => UInt16,
    i32 => Int32,
    u32 => UInt32,
    f32 => Float,
    FormId => FormId,
    ActorValue => ActorValue,
    MgefCode => MgefCode,
    Signature => Char4,
    String => String,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

fn fmt_members(f: &mut fmt::Formatter<'_>, members: &Members) -> fmt::Result {
    write!(f, "{{")?;
    for (i, (name, value)) in members.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        match value {
            Some(v) => write!(f, "{}: {}", name, v)?,
            None => write!(f, "{}: None", name)?,
        }
    }
    write!(f, "}}")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{}", v),
            Value::Int8(v) => write!(f, "{}", v),
            Value::UInt8(v) => write!(f, "{}", v),
            Value::Int16(v) => write!(f, "{}", v),
            Value::UInt16(v) => write!(f, "{}", v),
            Value::Int32(v) => write!(f, "{}", v),
            Value::UInt32(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::FormId(r) => write!(f, "{}", r),
            Value::ActorValue(r) => write!(f, "{}", r),
            Value::MgefCode(r) => match r.as_tag() {
                Some(tag) => write!(f, "MGEFCode('{}')", tag),
                None => write!(f, "{}", r),
            },
            Value::Char4(s) => write!(f, "{}", s),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Group(members) => fmt_members(f, members),
            Value::List(entries) => {
                write!(f, "[")?;
                for (i, entry) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    fmt_members(f, entry)?;
                }
                write!(f, "]")
            }
            Value::SubRecord(id) => write!(f, "{}", id),
            Value::SubRecords(ids) => write!(f, "{} records", ids.len()),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Value {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::{Serialize, SerializeMap};

        fn members<S: serde::Serializer>(serializer: S, members: &Members) -> std::result::Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(members.len()))?;
            for (name, value) in members {
                map.serialize_entry(name, value)?;
            }
            map.end()
        }

        struct Entry<'a>(&'a Members);

        impl serde::Serialize for Entry<'_> {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                members(serializer, self.0)
            }
        }

        match self {
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::Int8(v) => serializer.serialize_i8(*v),
            Value::UInt8(v) => serializer.serialize_u8(*v),
            Value::Int16(v) => serializer.serialize_i16(*v),
            Value::UInt16(v) => serializer.serialize_u16(*v),
            Value::Int32(v) => serializer.serialize_i32(*v),
            Value::UInt32(v) => serializer.serialize_u32(*v),
            Value::Float(v) => serializer.serialize_f32(*v),
            Value::FormId(r) => r.serialize(serializer),
            Value::ActorValue(r) => r.serialize(serializer),
            Value::MgefCode(r) => match r.as_tag() {
                Some(tag) => tag.serialize(serializer),
                None => r.serialize(serializer),
            },
            Value::Char4(s) => s.serialize(serializer),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => serializer.collect_seq(items),
            Value::Group(m) => members(serializer, m),
            Value::List(entries) => serializer.collect_seq(entries.iter().map(Entry)),
            Value::SubRecord(id) => id.serialize(serializer),
            Value::SubRecords(ids) => serializer.collect_seq(ids),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_widening() {
        assert_eq!(Value::UInt8(200).as_i32(), Some(200));
        assert_eq!(Value::Int16(-1).as_u32(), None);
        assert_eq!(Value::Bool(true).as_u32(), Some(1));
        assert_eq!(Value::Int32(3).as_f32(), Some(3.0));
        assert_eq!(Value::String("x".into()).as_i64(), None);
    }

    #[test]
    fn test_group_member() {
        let group = Value::Group(vec![("aggression", Some(Value::UInt8(5))), ("confidence", None)]);
        assert_eq!(group.member("aggression"), Some(&Value::UInt8(5)));
        assert_eq!(group.member("confidence"), None);
        assert_eq!(group.to_string(), "{aggression: 5, confidence: None}");
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from(vec![1u8, 2]).to_string(), "[1, 2]");
        assert_eq!(Value::from("Iron Sword").to_string(), "\"Iron Sword\"");
        assert_eq!(
            Value::MgefCode(MgefCode::from_tag(Signature::new(*b"FIDG"))).to_string(),
            "MGEFCode('FIDG')"
        );
    }
}
