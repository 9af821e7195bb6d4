use crate::accessor::FieldDef as F;
use crate::accessor::ScalarType::*;

const RELATION: &[F] = &[F::scalar("faction", 1, FormId), F::scalar("mod", 2, Int32)];

const RANK: &[F] = &[
    F::scalar("rank", 1, Int32),
    F::string("male", 2),
    F::string("female", 3),
    F::istring("insignia_path", 4),
];

pub const FACT: &[F] = &[
    F::string("full", 5),
    F::scalar("flags", 6, UInt8),
    F::flag("is_hidden_from_pc", 6, 0x01),
    F::flag("is_evil", 6, 0x02),
    F::flag("is_special_combat", 6, 0x04),
    F::list("relations", 7, RELATION),
    F::scalar("crime_gold_multiplier", 8, Float),
    F::list("ranks", 9, RANK),
];
