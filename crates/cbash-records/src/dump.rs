//! Human-readable record dumps.
//!
//! Indentation is carried as an explicit depth, two spaces per level.

use std::io::Write;

use cbash_engine::Engine;

use crate::accessor::Shape;
use crate::value::{Members, Value};
use crate::view::{FieldAccess, RecordView};
use crate::Result;

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

/// Write a record's present fields, then its child records one level
/// deeper.
pub fn dump<E: Engine + ?Sized>(record: &RecordView<'_, E>, depth: usize, out: &mut dyn Write) -> Result<()> {
    let form_id = record.form_id();
    match record.editor_id() {
        Some(eid) => writeln!(out, "{}{} {} {}", indent(depth), record.signature(), form_id, eid)?,
        None => writeln!(out, "{}{} {}", indent(depth), record.signature(), form_id)?,
    }

    let values: Members = record
        .values()
        .into_iter()
        .filter(|(name, _)| !matches!(*name, "fid" | "eid"))
        .collect();
    write_members(&values, depth + 1, out)?;

    for def in record.schema().own_fields() {
        let children: Vec<RecordView<'_, E>> = match def.shape {
            Shape::SubRecord(_) => record.sub_record(def.name)?.into_iter().collect(),
            Shape::SubRecords(_) => record.sub_records(def.name)?,
            _ => continue,
        };
        for child in children {
            dump(&child, depth + 1, out)?;
        }
    }
    Ok(())
}

/// Write present members, one per line. Groups and list entries nest one
/// level deeper.
pub fn write_members(members: &Members, depth: usize, out: &mut dyn Write) -> Result<()> {
    for (name, value) in members {
        let Some(value) = value else {
            continue;
        };
        match value {
            Value::Group(inner) => {
                writeln!(out, "{}{}:", indent(depth), name)?;
                write_members(inner, depth + 1, out)?;
            }
            Value::List(entries) => {
                for (index, entry) in entries.iter().enumerate() {
                    writeln!(out, "{}{}[{}]:", indent(depth), name, index)?;
                    write_members(entry, depth + 1, out)?;
                }
            }
            // Listed with their own header by `dump`.
            Value::SubRecord(_) | Value::SubRecords(_) => {}
            other => writeln!(out, "{}{} = {}", indent(depth), name, other)?,
        }
    }
    Ok(())
}

/// A record and its child records as JSON.
#[cfg(feature = "serde")]
pub fn to_json<E: Engine + ?Sized>(record: &RecordView<'_, E>) -> Result<serde_json::Value> {
    use serde_json::{json, Map};

    let mut fields = Map::new();
    for (name, value) in record.values() {
        if let Some(value) = value {
            if !matches!(value, Value::SubRecord(_) | Value::SubRecords(_)) {
                fields.insert(name.to_string(), serde_json::to_value(&value)?);
            }
        }
    }

    let mut children = Vec::new();
    for def in record.schema().own_fields() {
        match def.shape {
            Shape::SubRecord(_) => {
                if let Some(child) = record.sub_record(def.name)? {
                    children.push(to_json(&child)?);
                }
            }
            Shape::SubRecords(_) => {
                for child in record.sub_records(def.name)? {
                    children.push(to_json(&child)?);
                }
            }
            _ => {}
        }
    }

    let mut object = json!({
        "signature": record.signature().to_string(),
        "form_id": record.form_id().to_string(),
        "fields": fields,
    });
    if !children.is_empty() {
        object["children"] = serde_json::Value::Array(children);
    }
    Ok(object)
}

#[cfg(test)]
mod tests {
    use cbash_common::Signature;
    use cbash_engine::{GameMode, MemoryEngine, ModFlags};

    use super::*;
    use crate::accessor::SchemaRegistry;
    use crate::collection::Collection;
    use crate::identity::FormId;

    #[test]
    fn test_dump_nests_lists_and_children() {
        let engine = MemoryEngine::new();
        SchemaRegistry::global().install(&engine);
        let collection = Collection::create(&engine, "Data", GameMode::Oblivion).unwrap();
        let file = collection.add_mod("Dump.esp", ModFlags::editing()).unwrap();

        let cell = file.create_record(Signature::new(*b"CELL"), Some("TestCell")).unwrap();
        cell.set("full", "Test Cell").unwrap();
        let door = file.create_child(&cell, Signature::new(*b"REFR"), None).unwrap();
        door.set("base", FormId::long("Dump.esp", 0x900)).unwrap();

        let npc = file.create_record(Signature::new(*b"NPC_"), Some("Guard")).unwrap();
        npc.create("items").unwrap().set("count", 3i32).unwrap();

        let mut out = Vec::new();
        dump(&cell, 0, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "CELL FormID('Dump.esp', 0x000800) TestCell");
        assert!(lines.contains(&"  full = \"Test Cell\""));
        assert!(lines.contains(&"  REFR FormID('Dump.esp', 0x000801)"));
        assert!(lines.contains(&"    base = FormID('Dump.esp', 0x000900)"));

        let mut out = Vec::new();
        dump(&npc, 1, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("    items[0]:\n      item = FormID(None)\n      count = 3\n"));
    }
}
