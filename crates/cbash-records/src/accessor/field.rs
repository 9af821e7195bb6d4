//! Translation between typed values and engine field calls.
//!
//! Reads never fail: an absent field, an empty array, or a buffer that does
//! not decode all come back as `None`. Writes fail loudly, in particular
//! when a symbolic reference cannot be resolved in the destination, since a
//! wrong short form would silently point at an unrelated record.

use cbash_common::{BinaryReader, BinaryWriter};
use cbash_engine::{Attribute, CollectionId, Engine, FieldKind, FieldPath, RecordId};
use tracing::debug;

use super::{AccessorConfig, FieldDef, Handle, ScalarType, SchemaRegistry, Shape};
use crate::identity::{filter_valid_shorts, ActorValue, EngineScope, FormId, MgefCode, RefKind, SymbolicRef};
use crate::value::{Members, Value};
use crate::{Error, Result};

/// Element kind of an array kind.
fn element_kind(kind: FieldKind) -> Option<FieldKind> {
    Some(match kind {
        FieldKind::SInt8Array => FieldKind::SInt8,
        FieldKind::UInt8Array => FieldKind::UInt8,
        FieldKind::SInt16Array => FieldKind::SInt16,
        FieldKind::UInt16Array => FieldKind::UInt16,
        FieldKind::SInt32Array => FieldKind::SInt32,
        FieldKind::UInt32Array => FieldKind::UInt32,
        FieldKind::Float32Array => FieldKind::Float32,
        FieldKind::FormIdArray => FieldKind::FormId,
        FieldKind::MgefCodeArray => FieldKind::MgefCode,
        FieldKind::SubRecordArray => FieldKind::SubRecord,
        _ => return None,
    })
}

/// Concrete kind to write a value into a polymorphic slot as.
fn concrete_kind(declared: FieldKind, value: &Value) -> FieldKind {
    if !declared.is_polymorphic() {
        return declared;
    }
    match value {
        Value::FormId(_) => FieldKind::FormId,
        Value::MgefCode(_) => FieldKind::MgefCode,
        Value::Char4(_) => FieldKind::Char4,
        Value::String(_) => FieldKind::String,
        Value::Float(_) => FieldKind::Float32,
        Value::Int8(_) | Value::Int16(_) | Value::Int32(_) => FieldKind::SInt32,
        _ => FieldKind::UInt32,
    }
}

fn mismatch(field: &'static str, expected: &'static str, value: &Value) -> Error {
    Error::TypeMismatch {
        field,
        expected,
        actual: value.type_name(),
    }
}

fn integer<T: TryFrom<i64>>(field: &'static str, expected: &'static str, value: &Value) -> Result<T> {
    value
        .as_i64()
        .and_then(|v| T::try_from(v).ok())
        .ok_or_else(|| mismatch(field, expected, value))
}

fn collect_refs<K: RefKind>(
    field: &'static str,
    items: &[Value],
    get: impl Fn(&Value) -> Option<SymbolicRef<K>>,
) -> Result<Vec<SymbolicRef<K>>> {
    items
        .iter()
        .map(|item| get(item).ok_or_else(|| mismatch(field, K::NAME, item)))
        .collect()
}

fn as_mgef_code(value: &Value) -> Option<MgefCode> {
    match value {
        Value::MgefCode(r) => Some(r.clone()),
        Value::Char4(tag) => Some(MgefCode::from_tag(*tag)),
        _ => None,
    }
}

/// Value to write into a group or list entry member. Members the caller did
/// not name get their default, except derived ones, which are skipped.
fn member_value(given: Option<&Members>, member: &FieldDef) -> Option<Option<Value>> {
    let named = given.and_then(|given| given.iter().find(|(name, _)| *name == member.name));
    match (given, named) {
        (_, Some((_, value))) => Some(value.clone()),
        _ if member.shape.is_derived() => None,
        (None, None) => Some(None),
        (Some(_), None) => Some(member.default_value()),
    }
}

/// Reads and writes fields of one collection's records.
///
/// Holds the engine, the scope symbolic references are resolved against
/// when writing, and the text encoding for string fields.
pub struct Accessor<'e, E: Engine + ?Sized> {
    engine: &'e E,
    scope: EngineScope<'e, E>,
    registry: &'e SchemaRegistry,
    config: AccessorConfig,
}

impl<E: Engine + ?Sized> Clone for Accessor<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: Engine + ?Sized> Copy for Accessor<'_, E> {}

impl<'e, E: Engine + ?Sized> Accessor<'e, E> {
    pub fn new(
        engine: &'e E,
        collection: CollectionId,
        registry: &'e SchemaRegistry,
        config: AccessorConfig,
    ) -> Self {
        Self {
            engine,
            scope: EngineScope::new(engine, collection),
            registry,
            config,
        }
    }

    /// Accessor for the collection that owns `record`.
    pub fn for_record(
        engine: &'e E,
        record: RecordId,
        registry: &'e SchemaRegistry,
        config: AccessorConfig,
    ) -> Result<Self> {
        let collection = engine
            .collection_id_by_record(record)
            .ok_or_else(|| Error::RecordNotFound(record.to_string()))?;
        Ok(Self::new(engine, collection, registry, config))
    }

    #[inline]
    pub fn engine(&self) -> &'e E {
        self.engine
    }

    #[inline]
    pub fn scope(&self) -> &EngineScope<'e, E> {
        &self.scope
    }

    #[inline]
    pub fn registry(&self) -> &'e SchemaRegistry {
        self.registry
    }

    #[inline]
    pub fn config(&self) -> AccessorConfig {
        self.config
    }

    // Reading

    /// Read a field.
    pub fn get(&self, handle: Handle, def: &FieldDef) -> Option<Value> {
        let record = handle.record_id();
        match def.shape {
            Shape::Flag { base, mask } => {
                let (bits, _) = self.read_bits(record, &handle.path(base).ok()?)?;
                Some(Value::Bool(bits & mask != 0))
            }
            Shape::Enum { base, mask, value } => {
                let (bits, _) = self.read_bits(record, &handle.path(base).ok()?)?;
                Some(Value::Bool(bits & mask == value))
            }
            Shape::Group(members) => {
                let values: Members = members.iter().map(|m| (m.name, self.get(handle, m))).collect();
                values.iter().any(|(_, v)| v.is_some()).then_some(Value::Group(values))
            }
            Shape::List(members) => {
                let entries = self.entries(handle, def).ok()?;
                if entries.is_empty() {
                    return None;
                }
                let entries = entries
                    .into_iter()
                    .map(|entry| members.iter().map(|m| (m.name, self.get(entry, m))).collect())
                    .collect();
                Some(Value::List(entries))
            }
            Shape::Array { element, .. } => {
                let path = handle.path(def.id).ok()?;
                if self.engine.field_attribute(record, &path, Attribute::Size) == 0 {
                    return None;
                }
                self.read_array(record, &path, element)
            }
            Shape::Dynamic(_) => {
                let path = handle.path(def.id).ok()?;
                let kind = self.query_kind(record, &path);
                self.read_as(record, &path, kind)
            }
            _ => {
                let kind = def.shape.kind()?;
                self.read_as(record, &handle.path(def.id).ok()?, kind)
            }
        }
    }

    /// The kind the engine currently reports for a field.
    pub fn query_kind(&self, record: RecordId, path: &FieldPath) -> FieldKind {
        let code = self.engine.field_attribute(record, path, Attribute::Kind);
        FieldKind::from_u32(code).unwrap_or(FieldKind::Unknown)
    }

    /// Read a field as the given kind.
    pub fn read_as(&self, record: RecordId, path: &FieldPath, kind: FieldKind) -> Option<Value> {
        if matches!(kind, FieldKind::Unknown | FieldKind::Missing | FieldKind::List) {
            return None;
        }
        let mut buffer = Vec::new();
        if !self.engine.get_field(record, path, &mut buffer) {
            return None;
        }

        let mut reader = BinaryReader::new(&buffer);
        if kind.is_string() || kind == FieldKind::SInt32OrFloat32OrString {
            return Some(Value::String(self.config.text_encoding.decode(reader.read_cstr_bytes())));
        }

        let value = match element_kind(kind) {
            Some(FieldKind::SubRecord) => {
                let mut ids = Vec::new();
                while !reader.is_empty() {
                    match reader.read_u32() {
                        Ok(raw) => ids.extend(RecordId::from_raw(raw)),
                        Err(_) => break,
                    }
                }
                (!ids.is_empty()).then_some(Value::SubRecords(ids))
            }
            Some(element) => self.decode_items(record, &mut reader, element),
            None => self.decode(record, &mut reader, kind),
        };
        if value.is_none() {
            debug!(%record, %path, %kind, len = buffer.len(), "field read suppressed");
        }
        value
    }

    /// Read an array field. Elements decode as the declared type, not the
    /// engine's storage kind.
    fn read_array(&self, record: RecordId, path: &FieldPath, element: ScalarType) -> Option<Value> {
        let mut buffer = Vec::new();
        if !self.engine.get_field(record, path, &mut buffer) {
            return None;
        }
        let value = self.decode_items(record, &mut BinaryReader::new(&buffer), element.kind());
        if value.is_none() {
            debug!(%record, %path, ?element, len = buffer.len(), "array read suppressed");
        }
        value
    }

    fn decode_items(&self, record: RecordId, reader: &mut BinaryReader<'_>, element: FieldKind) -> Option<Value> {
        let mut items = Vec::new();
        while !reader.is_empty() {
            match self.decode(record, reader, element) {
                Some(item) => items.push(item),
                None => break,
            }
        }
        (!items.is_empty() && reader.is_empty()).then_some(Value::Array(items))
    }

    fn decode(&self, record: RecordId, reader: &mut BinaryReader<'_>, kind: FieldKind) -> Option<Value> {
        Some(match kind {
            FieldKind::Bool => Value::Bool(reader.read_bool().ok()?),
            FieldKind::SInt8 => Value::Int8(reader.read_i8().ok()?),
            FieldKind::UInt8 => Value::UInt8(reader.read_u8().ok()?),
            FieldKind::SInt16 => Value::Int16(reader.read_i16().ok()?),
            FieldKind::UInt16 => Value::UInt16(reader.read_u16().ok()?),
            FieldKind::SInt32 => Value::Int32(reader.read_i32().ok()?),
            // Unresolved polymorphic slots read as their plain encoding.
            FieldKind::UInt32 | FieldKind::FormIdOrUInt32 => Value::UInt32(reader.read_u32().ok()?),
            FieldKind::Float32 | FieldKind::Radian | FieldKind::FormIdOrFloat32 => {
                Value::Float(reader.read_f32().ok()?)
            }
            FieldKind::FormId => Value::FormId(FormId::from_short(self.engine, record, reader.read_u32().ok()?)),
            FieldKind::ActorValue => {
                Value::ActorValue(ActorValue::from_short(self.engine, record, reader.read_u32().ok()?))
            }
            FieldKind::MgefCode | FieldKind::MgefCodeOrChar4 => {
                Value::MgefCode(MgefCode::from_short(self.engine, record, reader.read_u32().ok()?))
            }
            FieldKind::Char4 => Value::Char4(reader.read_tag().ok()?),
            FieldKind::SubRecord => Value::SubRecord(RecordId::from_raw(reader.read_u32().ok()?)?),
            _ => return None,
        })
    }

    /// Read a scalar field as raw bits, with its width in bytes.
    fn read_bits(&self, record: RecordId, path: &FieldPath) -> Option<(u32, usize)> {
        let mut buffer = Vec::new();
        if !self.engine.get_field(record, path, &mut buffer) {
            return None;
        }
        let mut reader = BinaryReader::new(&buffer);
        let bits = match buffer.len() {
            1 => reader.read_u8().ok()? as u32,
            2 => reader.read_u16().ok()? as u32,
            4 => reader.read_u32().ok()?,
            _ => return None,
        };
        Some((bits, buffer.len()))
    }

    /// Element count of a list or array field, or byte length of a string.
    pub fn len(&self, handle: Handle, def: &FieldDef) -> u32 {
        match handle.path(def.id) {
            Ok(path) => self.engine.field_attribute(handle.record_id(), &path, Attribute::Size),
            Err(_) => 0,
        }
    }

    /// Handles to every entry of a list field.
    pub fn entries(&self, handle: Handle, def: &FieldDef) -> Result<Vec<Handle>> {
        (0..self.len(handle, def)).map(|index| handle.entry(def.id, index)).collect()
    }

    // Writing

    /// Write a field. `None` deletes it.
    pub fn set(&self, handle: Handle, def: &FieldDef, value: Option<&Value>) -> Result<()> {
        let record = handle.record_id();
        match def.shape {
            Shape::SubRecord(_) | Shape::SubRecords(_) => Err(Error::ReadOnly(def.name)),
            Shape::Flag { base, mask } => {
                let on = self.bool_value(def, value)?;
                let path = handle.path(base)?;
                let (bits, width) = self.bits_for_write(record, &path);
                let next = if on { bits | mask } else { bits & !mask };
                self.write_bits(record, &path, next, width)
            }
            Shape::Enum { base, mask, value: wanted } => {
                let on = self.bool_value(def, value)?;
                let path = handle.path(base)?;
                let (bits, width) = self.bits_for_write(record, &path);
                let next = if on {
                    (bits & !mask) | wanted
                } else if bits & mask == wanted {
                    bits & !mask
                } else {
                    bits
                };
                self.write_bits(record, &path, next, width)
            }
            Shape::Group(members) => {
                let given = match value {
                    None => None,
                    Some(Value::Group(given)) => Some(given),
                    Some(other) => return Err(mismatch(def.name, "group", other)),
                };
                for member in members {
                    if let Some(member_value) = member_value(given, member) {
                        self.set(handle, member, member_value.as_ref())?;
                    }
                }
                Ok(())
            }
            Shape::List(members) => {
                let path = handle.path(def.id)?;
                let entries = match value {
                    None => return self.delete(record, &path),
                    Some(Value::List(entries)) => entries,
                    Some(other) => return Err(mismatch(def.name, "list", other)),
                };
                if entries.is_empty() {
                    return self.delete(record, &path);
                }
                handle.entry(def.id, 0)?;
                self.engine.set_field(record, &path, None, entries.len() as u32)?;
                for (index, given) in entries.iter().enumerate() {
                    let entry = handle.entry(def.id, index as u32)?;
                    for member in members {
                        if let Some(member_value) = member_value(Some(given), member) {
                            self.set(entry, member, member_value.as_ref())?;
                        }
                    }
                }
                Ok(())
            }
            Shape::Array { element, fixed } => {
                let path = handle.path(def.id)?;
                let items = match value {
                    None => return self.delete(record, &path),
                    Some(Value::Array(items)) => items.as_slice(),
                    Some(other) => return Err(mismatch(def.name, "array", other)),
                };
                if let Some(expected) = fixed {
                    if items.len() != expected {
                        debug!(%record, %path, expected, actual = items.len(), "fixed-size array write rejected");
                        return Err(Error::SizeMismatch {
                            field: def.name,
                            expected,
                            actual: items.len(),
                        });
                    }
                }
                let bytes = self.encode_array(def.name, element, items, fixed.is_none())?;
                let count = (bytes.len() / element.size()) as u32;
                if count == 0 {
                    return self.delete(record, &path);
                }
                self.engine.set_field(record, &path, None, count)?;
                self.engine.set_field(record, &path, Some(&bytes), count)?;
                Ok(())
            }
            Shape::Dynamic(declared) => {
                let path = handle.path(def.id)?;
                let Some(value) = value else {
                    return self.delete(record, &path);
                };
                let reported = self.query_kind(record, &path);
                let kind = if reported.is_polymorphic() || matches!(reported, FieldKind::Unknown | FieldKind::Missing) {
                    concrete_kind(declared, value)
                } else {
                    reported
                };
                self.write_as(record, &path, def.name, kind, value)
            }
            _ => {
                let path = handle.path(def.id)?;
                let Some(value) = value else {
                    return self.delete(record, &path);
                };
                let kind = def.shape.kind().ok_or(Error::ReadOnly(def.name))?;
                self.write_as(record, &path, def.name, kind, value)
            }
        }
    }

    /// Append a default-initialized entry to a list field.
    pub fn create_entry(&self, handle: Handle, def: &FieldDef) -> Result<Handle> {
        if !matches!(def.shape, Shape::List(_)) {
            return Err(Error::TypeMismatch {
                field: def.name,
                expected: "list",
                actual: "field",
            });
        }
        let record = handle.record_id();
        let path = handle.path(def.id)?;
        let count = self.engine.field_attribute(record, &path, Attribute::Size);
        let entry = handle.entry(def.id, count)?;
        self.engine.set_field(record, &path, None, count + 1)?;
        Ok(entry)
    }

    /// Write a value encoded as `kind`.
    pub fn write_as(
        &self,
        record: RecordId,
        path: &FieldPath,
        field: &'static str,
        kind: FieldKind,
        value: &Value,
    ) -> Result<()> {
        let bytes = self.encode(field, kind, value)?;
        self.engine.set_field(record, path, Some(&bytes), 0)?;
        Ok(())
    }

    fn delete(&self, record: RecordId, path: &FieldPath) -> Result<()> {
        self.engine.delete_field(record, path)?;
        Ok(())
    }

    fn bool_value(&self, def: &FieldDef, value: Option<&Value>) -> Result<bool> {
        match value {
            None => Ok(false),
            Some(v) => v.as_bool().ok_or_else(|| mismatch(def.name, "bool", v)),
        }
    }

    fn bits_for_write(&self, record: RecordId, path: &FieldPath) -> (u32, usize) {
        self.read_bits(record, path).unwrap_or_else(|| {
            let width = match self.query_kind(record, path).element_size() {
                0 => 4,
                size => size,
            };
            (0, width)
        })
    }

    fn write_bits(&self, record: RecordId, path: &FieldPath, bits: u32, width: usize) -> Result<()> {
        let mut writer = BinaryWriter::with_capacity(width);
        match width {
            1 => writer.write_u8(bits as u8)?,
            2 => writer.write_u16(bits as u16)?,
            _ => writer.write_u32(bits)?,
        }
        self.engine.set_field(record, path, Some(writer.as_bytes()), 0)?;
        Ok(())
    }

    fn short_of<K: RefKind>(&self, reference: &SymbolicRef<K>) -> Result<u32> {
        Ok(reference.short(&self.scope)?.unwrap_or(0))
    }

    fn encode(&self, field: &'static str, kind: FieldKind, value: &Value) -> Result<Vec<u8>> {
        let mut writer = BinaryWriter::with_capacity(4);
        match kind {
            FieldKind::Bool => writer.write_bool(value.as_bool().ok_or_else(|| mismatch(field, "bool", value))?)?,
            FieldKind::SInt8 => writer.write_i8(integer(field, "int8", value)?)?,
            FieldKind::UInt8 => writer.write_u8(integer(field, "uint8", value)?)?,
            FieldKind::SInt16 => writer.write_i16(integer(field, "int16", value)?)?,
            FieldKind::UInt16 => writer.write_u16(integer(field, "uint16", value)?)?,
            FieldKind::SInt32 => writer.write_i32(integer(field, "int32", value)?)?,
            FieldKind::UInt32 | FieldKind::FormIdOrUInt32 => writer.write_u32(integer(field, "uint32", value)?)?,
            FieldKind::Float32 | FieldKind::Radian | FieldKind::FormIdOrFloat32 => {
                writer.write_f32(value.as_f32().ok_or_else(|| mismatch(field, "float", value))?)?
            }
            FieldKind::FormId => {
                let short = match value {
                    Value::FormId(r) => self.short_of(r)?,
                    other => integer(field, "formid", other)?,
                };
                writer.write_u32(short)?
            }
            FieldKind::ActorValue => {
                let short = match value {
                    Value::ActorValue(r) => self.short_of(r)?,
                    other => integer(field, "actorvalue", other)?,
                };
                writer.write_u32(short)?
            }
            FieldKind::MgefCode | FieldKind::MgefCodeOrChar4 => {
                let code = as_mgef_code(value).ok_or_else(|| mismatch(field, "mgefcode", value))?;
                writer.write_u32(self.short_of(&code)?)?
            }
            FieldKind::Char4 => writer.write_tag(value.as_char4().ok_or_else(|| mismatch(field, "char4", value))?),
            kind if kind.is_string() || kind == FieldKind::SInt32OrFloat32OrString => {
                let text = value.as_str().ok_or_else(|| mismatch(field, "string", value))?;
                return Ok(self.config.text_encoding.encode(text));
            }
            _ => return Err(mismatch(field, kind.as_str(), value)),
        }
        Ok(writer.into_inner())
    }

    /// Encode array items. Variable-length reference arrays drop entries
    /// that do not resolve in the destination.
    fn encode_array(
        &self,
        field: &'static str,
        element: ScalarType,
        items: &[Value],
        drop_unresolved: bool,
    ) -> Result<Vec<u8>> {
        let shorts = match element {
            _ if !drop_unresolved => None,
            ScalarType::FormId => Some(filter_valid_shorts(
                &collect_refs(field, items, |v| v.as_form_id().cloned())?,
                &self.scope,
            )),
            ScalarType::ActorValue => Some(filter_valid_shorts(
                &collect_refs(field, items, |v| v.as_actor_value().cloned())?,
                &self.scope,
            )),
            ScalarType::MgefCode => Some(filter_valid_shorts(&collect_refs(field, items, as_mgef_code)?, &self.scope)),
            _ => None,
        };
        if let Some(shorts) = shorts {
            let mut writer = BinaryWriter::with_capacity(shorts.len() * 4);
            for short in shorts {
                writer.write_u32(short)?;
            }
            return Ok(writer.into_inner());
        }

        let mut bytes = Vec::with_capacity(items.len() * element.size());
        for item in items {
            bytes.extend(self.encode(field, element.kind(), item)?);
        }
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use cbash_common::{Signature, TextEncoding};
    use cbash_engine::{CreateFlags, GameMode, MemoryEngine, ModFlags, ModId};

    use super::*;
    use crate::identity::RefState;

    const TEST: Signature = Signature::new(*b"TEST");

    const CONDITION: &[FieldDef] = &[
        FieldDef::scalar("value", 1, ScalarType::Float),
        FieldDef::dynamic("param", 2, FieldKind::FormIdOrUInt32),
    ];

    const ENTRY: &[FieldDef] = &[
        FieldDef::scalar("level", 1, ScalarType::Int16),
        FieldDef::scalar("item", 2, ScalarType::FormId),
        FieldDef::list("conditions", 3, CONDITION),
    ];

    const AI: &[FieldDef] = &[
        FieldDef::scalar("aggression", 20, ScalarType::UInt8),
        FieldDef::scalar("confidence", 21, ScalarType::UInt8),
        FieldDef::scalar("services", 22, ScalarType::UInt32),
        FieldDef::flag("is_service_weapons", 22, 0x1),
    ];

    const FIELDS: &[FieldDef] = &[
        FieldDef::scalar("flags", 5, ScalarType::UInt32),
        FieldDef::flag("is_female", 5, 0b1000),
        FieldDef::scalar("kind", 6, ScalarType::UInt8),
        FieldDef::masked("is_power", 6, 0x0F, 2),
        FieldDef::scalar("level", 7, ScalarType::Int16),
        FieldDef::string("full", 8),
        FieldDef::array("spells", 9, ScalarType::FormId),
        FieldDef::fixed_array("unused", 10, ScalarType::UInt8, 2),
        FieldDef::group("ai", AI),
        FieldDef::list("entries", 11, ENTRY),
        FieldDef::dynamic("value", 12, FieldKind::SInt32OrFloat32OrString),
        FieldDef::scalar("resist", 13, ScalarType::ActorValue),
        FieldDef::array("counters", 14, ScalarType::MgefCode),
        FieldDef::array("bools", 30, ScalarType::Bool),
        FieldDef::array("bytes", 31, ScalarType::Int8),
        FieldDef::array("ubytes", 32, ScalarType::UInt8),
        FieldDef::array("shorts", 33, ScalarType::Int16),
        FieldDef::array("ushorts", 34, ScalarType::UInt16),
        FieldDef::array("ints", 35, ScalarType::Int32),
        FieldDef::array("uints", 36, ScalarType::UInt32),
        FieldDef::array("floats", 37, ScalarType::Float),
        FieldDef::array("angles", 38, ScalarType::Radian),
        FieldDef::array("avs", 39, ScalarType::ActorValue),
        FieldDef::array("tags", 40, ScalarType::Char4),
    ];

    struct Fixture {
        engine: MemoryEngine,
        registry: SchemaRegistry,
        master: ModId,
        record: RecordId,
    }

    impl Fixture {
        fn new() -> Self {
            let engine = MemoryEngine::new();
            let mut registry = SchemaRegistry::new();
            registry.register(TEST, FIELDS);
            registry.install(&engine);

            let collection = engine.create_collection("Data", GameMode::Oblivion).unwrap();
            let master = engine.add_mod(collection, "Oblivion.esm", ModFlags::editing()).unwrap();
            let plugin = engine.add_mod(collection, "Test.esp", ModFlags::editing()).unwrap();
            let record = engine
                .create_record(plugin, TEST, 0, Some("TestRecord"), None, CreateFlags::empty())
                .unwrap();
            Self {
                engine,
                registry,
                master,
                record,
            }
        }

        fn accessor(&self) -> Accessor<'_, MemoryEngine> {
            Accessor::for_record(&self.engine, self.record, &self.registry, AccessorConfig::default()).unwrap()
        }

        fn handle(&self) -> Handle {
            Handle::record(self.record)
        }

        fn def(&self, name: &str) -> &'static FieldDef {
            self.registry.get(TEST).and_then(|s| s.field(name)).unwrap()
        }

        fn get(&self, name: &str) -> Option<Value> {
            self.accessor().get(self.handle(), self.def(name))
        }

        fn set(&self, name: &str, value: Option<Value>) -> Result<()> {
            self.accessor().set(self.handle(), self.def(name), value.as_ref())
        }
    }

    #[test]
    fn test_scalar_round_trip_and_delete() {
        let f = Fixture::new();
        assert_eq!(f.get("level"), None);
        f.set("level", Some(Value::Int16(-12))).unwrap();
        assert_eq!(f.get("level"), Some(Value::Int16(-12)));
        f.set("level", Some(Value::Int32(40))).unwrap();
        assert_eq!(f.get("level"), Some(Value::Int16(40)));
        f.set("level", None).unwrap();
        assert_eq!(f.get("level"), None);
    }

    #[test]
    fn test_out_of_range_integer_is_rejected() {
        let f = Fixture::new();
        let err = f.set("level", Some(Value::Int32(70_000))).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { field: "level", .. }));
    }

    #[test]
    fn test_string_uses_configured_encoding() {
        let f = Fixture::new();
        f.set("full", Some(Value::from("Café"))).unwrap();
        assert_eq!(f.get("full"), Some(Value::from("Café")));

        let mut raw = Vec::new();
        let path = Handle::record(f.record).path(8).unwrap();
        assert!(f.engine.get_field(f.record, &path, &mut raw));
        assert_eq!(raw, b"Caf\xE9");

        let utf8 = Accessor::for_record(
            &f.engine,
            f.record,
            &f.registry,
            AccessorConfig {
                text_encoding: TextEncoding::Utf8,
            },
        )
        .unwrap();
        assert_eq!(utf8.get(f.handle(), f.def("eid")), Some(Value::from("TestRecord")));
    }

    #[test]
    fn test_array_resize_before_write() {
        let f = Fixture::new();
        let spells = vec![FormId::long("Oblivion.esm", 0x0001_4C), FormId::long("Test.esp", 0x0000_0900)];
        f.set("spells", Some(Value::from(spells.clone()))).unwrap();

        let read = f.get("spells").unwrap();
        let items = read.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_form_id(), Some(&spells[0]));
        assert!(matches!(items[1].as_form_id().unwrap().state(), RefState::Valid { short: 0x0100_0900, .. }));

        f.set("spells", Some(Value::from(vec![FormId::long("Oblivion.esm", 0x10)]))).unwrap();
        assert_eq!(f.get("spells").and_then(|v| v.as_array().map(<[Value]>::len)), Some(1));
    }

    #[test]
    fn test_reference_array_drops_unresolvable_entries() {
        let f = Fixture::new();
        let spells = vec![
            FormId::long("Missing.esp", 0x800),
            FormId::invalid(0x801),
            FormId::long("Oblivion.esm", 0x802),
        ];
        f.set("spells", Some(Value::from(spells))).unwrap();
        let read = f.get("spells").unwrap();
        assert_eq!(read.as_array().unwrap(), &[Value::FormId(FormId::long("Oblivion.esm", 0x802))]);
    }

    #[test]
    fn test_array_round_trip_every_element_type() {
        let f = Fixture::new();
        let cases = [
            ("bools", Value::from(vec![true, false, true])),
            ("bytes", Value::from(vec![-1i8, 2])),
            ("ubytes", Value::from(vec![0u8, 255])),
            ("shorts", Value::from(vec![-300i16, 300])),
            ("ushorts", Value::from(vec![1u16, u16::MAX])),
            ("ints", Value::from(vec![-70_000i32, 5])),
            ("uints", Value::from(vec![0xDEAD_BEEFu32])),
            ("floats", Value::from(vec![1.5f32, -2.25])),
            ("angles", Value::from(vec![1.25f32, -0.5])),
            ("spells", Value::from(vec![FormId::long("Oblivion.esm", 0x14C)])),
            ("avs", Value::from(vec![ActorValue::raw(0x0C), ActorValue::long("Test.esp", 0x900)])),
            ("counters", Value::from(vec![MgefCode::from_tag(Signature::new(*b"FIDG"))])),
            ("tags", Value::from(vec![Signature::new(*b"ABCD"), Signature::new(*b"WXYZ")])),
        ];
        for (name, value) in cases {
            f.set(name, Some(value.clone())).unwrap();
            let read = f.get(name);
            assert_eq!(read.as_ref(), Some(&value), "{name}");

            // What a read returns must be writable again unchanged.
            f.set(name, read).unwrap();
            assert_eq!(f.get(name), Some(value), "{name}");
        }
    }

    #[test]
    fn test_actor_value_array_elements_keep_their_type() {
        let f = Fixture::new();
        f.set("avs", Some(Value::from(vec![ActorValue::long("Test.esp", 0x900)]))).unwrap();
        let read = f.get("avs").unwrap();
        let items = read.as_array().unwrap();
        assert!(matches!(
            items[0].as_actor_value().map(ActorValue::state),
            Some(RefState::Valid { short: 0x0100_0900, .. })
        ));
        f.set("tags", Some(Value::from(vec![Signature::new(*b"FIRE")]))).unwrap();
        assert_eq!(f.get("tags"), Some(Value::Array(vec![Value::Char4(Signature::new(*b"FIRE"))])));
    }

    #[test]
    fn test_fixed_size_mismatch_leaves_field_unchanged() {
        let f = Fixture::new();
        f.set("unused", Some(Value::from(vec![1u8, 2]))).unwrap();
        let err = f.set("unused", Some(Value::from(vec![7u8, 7, 7]))).unwrap_err();
        assert!(matches!(
            err,
            Error::SizeMismatch {
                field: "unused",
                expected: 2,
                actual: 3
            }
        ));
        assert_eq!(f.get("unused"), Some(Value::from(vec![1u8, 2])));
    }

    #[test]
    fn test_empty_and_absent_arrays_read_as_none() {
        let f = Fixture::new();
        assert_eq!(f.get("spells"), None);
        f.set("spells", Some(Value::Array(Vec::new()))).unwrap();
        assert_eq!(f.get("spells"), None);
    }

    #[test]
    fn test_flag_preserves_other_bits() {
        let f = Fixture::new();
        f.set("flags", Some(Value::UInt32(0b0110))).unwrap();
        assert_eq!(f.get("is_female"), Some(Value::Bool(false)));

        f.set("is_female", Some(Value::Bool(true))).unwrap();
        assert_eq!(f.get("flags"), Some(Value::UInt32(0b1110)));
        assert_eq!(f.get("is_female"), Some(Value::Bool(true)));

        f.set("is_female", Some(Value::Bool(false))).unwrap();
        assert_eq!(f.get("flags"), Some(Value::UInt32(0b0110)));
    }

    #[test]
    fn test_flag_on_absent_base_field() {
        let f = Fixture::new();
        assert_eq!(f.get("is_female"), None);
        f.set("is_female", Some(Value::Bool(true))).unwrap();
        assert_eq!(f.get("flags"), Some(Value::UInt32(0b1000)));
    }

    #[test]
    fn test_header_flag_uses_record_flags() {
        let f = Fixture::new();
        f.set("flags1", Some(Value::UInt32(0x0000_0400))).unwrap();
        f.set("is_deleted", Some(Value::Bool(true))).unwrap();
        assert_eq!(f.get("flags1"), Some(Value::UInt32(0x0000_0420)));
        assert_eq!(f.get("is_persistent"), Some(Value::Bool(true)));
    }

    #[test]
    fn test_masked_enum() {
        let f = Fixture::new();
        f.set("kind", Some(Value::UInt8(0x31))).unwrap();
        assert_eq!(f.get("is_power"), Some(Value::Bool(false)));

        f.set("is_power", Some(Value::Bool(true))).unwrap();
        assert_eq!(f.get("kind"), Some(Value::UInt8(0x32)));
        assert_eq!(f.get("is_power"), Some(Value::Bool(true)));

        f.set("is_power", Some(Value::Bool(false))).unwrap();
        assert_eq!(f.get("kind"), Some(Value::UInt8(0x30)));
    }

    #[test]
    fn test_group_write_fills_defaults() {
        let f = Fixture::new();
        f.set("confidence", Some(Value::UInt8(9))).unwrap();
        f.set("ai", Some(Value::Group(vec![("aggression", Some(Value::UInt8(50)))]))).unwrap();

        let ai = f.get("ai").unwrap();
        assert_eq!(ai.member("aggression"), Some(&Value::UInt8(50)));
        assert_eq!(ai.member("confidence"), Some(&Value::UInt8(0)));

        f.set("ai", None).unwrap();
        assert_eq!(f.get("ai"), None);
    }

    #[test]
    fn test_group_write_leaves_unnamed_flags_alone() {
        let f = Fixture::new();
        f.set("ai", Some(Value::Group(vec![("services", Some(Value::UInt32(0x3)))]))).unwrap();
        let ai = f.get("ai").unwrap();
        assert_eq!(ai.member("services"), Some(&Value::UInt32(0x3)));
        assert_eq!(ai.member("is_service_weapons"), Some(&Value::Bool(true)));

        f.set(
            "ai",
            Some(Value::Group(vec![
                ("services", Some(Value::UInt32(0x3))),
                ("is_service_weapons", Some(Value::Bool(false))),
            ])),
        )
        .unwrap();
        assert_eq!(f.get("services"), Some(Value::UInt32(0x2)));
    }

    #[test]
    fn test_create_entries_and_nested_lists() {
        let f = Fixture::new();
        let accessor = f.accessor();
        let entries = f.def("entries");
        let level = find_member(ENTRY, "level");
        let conditions = find_member(ENTRY, "conditions");

        assert_eq!(accessor.len(f.handle(), entries), 0);
        let first = accessor.create_entry(f.handle(), entries).unwrap();
        let second = accessor.create_entry(f.handle(), entries).unwrap();
        assert_eq!(second.index(), Some(1));
        assert_eq!(accessor.get(first, level), Some(Value::Int16(0)));

        accessor.set(second, level, Some(&Value::Int16(5))).unwrap();
        let condition = accessor.create_entry(second, conditions).unwrap();
        accessor
            .set(condition, find_member(CONDITION, "value"), Some(&Value::Float(1.5)))
            .unwrap();

        let list = f.get("entries").unwrap();
        let list = list.as_list().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[1][0], ("level", Some(Value::Int16(5))));
        let nested = list[1][2].1.as_ref().and_then(Value::as_list).unwrap();
        assert_eq!(nested[0][0], ("value", Some(Value::Float(1.5))));
        assert_eq!(list[0][2].1, None);
    }

    #[test]
    fn test_list_write_resizes_then_fills_entries() {
        let f = Fixture::new();
        let entry = |level: i16| vec![("level", Some(Value::Int16(level)))];
        f.set("entries", Some(Value::List(vec![entry(1), entry(2), entry(3)]))).unwrap();
        f.set("entries", Some(Value::List(vec![entry(7)]))).unwrap();

        let list = f.get("entries").unwrap();
        let list = list.as_list().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0][0].1, Some(Value::Int16(7)));
        assert_eq!(list[0][1].1, Some(Value::FormId(FormId::empty())));
    }

    #[test]
    fn test_dynamic_two_phase_read() {
        let f = Fixture::new();
        let path = Handle::record(f.record).path(12).unwrap();

        f.engine.set_field_kind(f.record, &path, FieldKind::Float32).unwrap();
        f.set("value", Some(Value::Float(0.25))).unwrap();
        assert_eq!(f.get("value"), Some(Value::Float(0.25)));

        f.engine.set_field_kind(f.record, &path, FieldKind::String).unwrap();
        f.set("value", Some(Value::from("sHello"))).unwrap();
        assert_eq!(f.get("value"), Some(Value::from("sHello")));
    }

    #[test]
    fn test_dynamic_reference_param() {
        let f = Fixture::new();
        let accessor = f.accessor();
        let entry = accessor.create_entry(f.handle(), f.def("entries")).unwrap();
        let condition = accessor.create_entry(entry, find_member(ENTRY, "conditions")).unwrap();
        let param = find_member(CONDITION, "param");
        let path = condition.path(param.id).unwrap();

        f.engine.set_field_kind(f.record, &path, FieldKind::FormId).unwrap();
        let target = FormId::long("Oblivion.esm", 0x0001_4C);
        accessor.set(condition, param, Some(&Value::FormId(target.clone()))).unwrap();
        assert_eq!(accessor.get(condition, param), Some(Value::FormId(target)));

        f.engine.set_field_kind(f.record, &path, FieldKind::UInt32).unwrap();
        accessor.set(condition, param, Some(&Value::UInt32(3))).unwrap();
        assert_eq!(accessor.get(condition, param), Some(Value::UInt32(3)));
    }

    #[test]
    fn test_unresolvable_reference_write_fails() {
        let f = Fixture::new();
        f.set("resist", Some(Value::ActorValue(ActorValue::long("Test.esp", 0x900)))).unwrap();
        let err = f
            .set("resist", Some(Value::ActorValue(ActorValue::long("Missing.esp", 0x900))))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidReference(_)));
        assert_eq!(f.get("resist"), Some(Value::ActorValue(ActorValue::long("Test.esp", 0x900))));

        f.set("resist", Some(Value::ActorValue(ActorValue::raw(0x10)))).unwrap();
        assert_eq!(f.get("resist"), Some(Value::ActorValue(ActorValue::raw(0x10))));
    }

    #[test]
    fn test_mgef_code_array_accepts_tags() {
        let f = Fixture::new();
        let fire = Signature::new(*b"FIDG");
        f.set(
            "counters",
            Some(Value::Array(vec![
                Value::Char4(fire),
                Value::MgefCode(MgefCode::long("Oblivion.esm", 0x8000_1200)),
            ])),
        )
        .unwrap();
        let read = f.get("counters").unwrap();
        let items = read.as_array().unwrap();
        assert_eq!(items[0].as_mgef_code().and_then(MgefCode::as_tag), Some(fire));
        assert_eq!(items[1], Value::MgefCode(MgefCode::long("Oblivion.esm", 0x8000_1200)));
    }

    #[test]
    fn test_own_form_id() {
        let f = Fixture::new();
        let fid = f.get("fid").unwrap();
        assert_eq!(fid.as_form_id(), Some(&FormId::long("Test.esp", 0x800)));
        assert_eq!(f.engine.mod_load_order(f.master), Some(0));
    }

    #[test]
    fn test_sub_records_are_read_only() {
        const PARENT: &[FieldDef] = &[FieldDef::sub_record("land", 5, Signature::new(*b"LAND"))];
        let f = Fixture::new();
        let def = &PARENT[0];
        let err = f.accessor().set(f.handle(), def, Some(&Value::UInt32(1))).unwrap_err();
        assert!(matches!(err, Error::ReadOnly("land")));
    }

    fn find_member(defs: &'static [FieldDef], name: &str) -> &'static FieldDef {
        super::super::schema::find_field(defs, name).unwrap()
    }
}
