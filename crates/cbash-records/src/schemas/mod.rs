//! Built-in record type tables.
//!
//! Field ids follow the engine's numbering for each record type, starting
//! at 5 after the four header fields. List entry members are numbered from 1.

mod cell;
mod faction;
mod leveled;
mod magic;
mod misc;
mod npc;
mod quest;

use cbash_common::Signature;

use crate::accessor::FieldDef;

pub use cell::{CELL, LAND, PGRD, REFR};
pub use faction::FACT;
pub use leveled::{LVLC, LVLI};
pub use magic::{ENCH, MGEF, SPEL};
pub use misc::{GLOB, GMST};
pub use npc::NPC_;
pub use quest::QUST;

/// Every built-in record type.
pub static ALL: &[(Signature, &[FieldDef])] = &[
    (Signature::new(*b"GMST"), GMST),
    (Signature::new(*b"GLOB"), GLOB),
    (Signature::new(*b"LVLI"), LVLI),
    (Signature::new(*b"LVLC"), LVLC),
    (Signature::new(*b"FACT"), FACT),
    (Signature::new(*b"MGEF"), MGEF),
    (Signature::new(*b"SPEL"), SPEL),
    (Signature::new(*b"ENCH"), ENCH),
    (Signature::new(*b"QUST"), QUST),
    (Signature::new(*b"NPC_"), NPC_),
    (Signature::new(*b"CELL"), CELL),
    (Signature::new(*b"PGRD"), PGRD),
    (Signature::new(*b"LAND"), LAND),
    (Signature::new(*b"REFR"), REFR),
];

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::accessor::Shape;

    fn check_unique(owner: &str, defs: &'static [FieldDef], names: &mut HashSet<&'static str>, ids: &mut HashSet<u32>) {
        for def in defs {
            assert!(names.insert(def.name), "{owner}: duplicate name {}", def.name);
            match def.shape {
                Shape::Group(members) => check_unique(owner, members, names, ids),
                Shape::Flag { base, .. } | Shape::Enum { base, .. } => {
                    assert!(ids.contains(&base), "{owner}: {} precedes its base field", def.name)
                }
                Shape::List(members) => {
                    assert!(ids.insert(def.id), "{owner}: duplicate id {}", def.id);
                    check_unique(def.name, members, &mut HashSet::new(), &mut HashSet::new());
                }
                _ => assert!(ids.insert(def.id), "{owner}: duplicate id {}", def.id),
            }
        }
    }

    #[test]
    fn test_tables_are_well_formed() {
        for (signature, defs) in ALL {
            let mut names = HashSet::new();
            let mut ids: HashSet<u32> = (1..=4).collect();
            check_unique(&signature.to_string(), *defs, &mut names, &mut ids);
            assert!(defs.iter().all(|d| d.id == 0 || d.id >= 5 || d.shape.is_derived()));
        }
    }

    #[test]
    fn test_signatures_are_unique() {
        let unique: HashSet<_> = ALL.iter().map(|(s, _)| *s).collect();
        assert_eq!(unique.len(), ALL.len());
    }
}
