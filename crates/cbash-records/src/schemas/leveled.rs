use crate::accessor::FieldDef as F;
use crate::accessor::ScalarType::*;

const ENTRY: &[F] = &[
    F::scalar("level", 1, Int16),
    F::fixed_array("unused1", 2, UInt8, 2),
    F::scalar("list_id", 3, FormId),
    F::scalar("count", 4, Int16),
    F::fixed_array("unused2", 5, UInt8, 2),
];

/// Leveled item.
pub const LVLI: &[F] = &[
    F::scalar("chance_none", 5, UInt8),
    F::scalar("flags", 6, UInt8),
    F::flag("is_calc_from_all_levels", 6, 0x01),
    F::flag("is_calc_for_each_item", 6, 0x02),
    F::flag("is_use_all", 6, 0x04),
    F::list("entries", 9, ENTRY),
];

/// Leveled creature.
pub const LVLC: &[F] = &[
    F::scalar("chance_none", 5, UInt8),
    F::scalar("flags", 6, UInt8),
    F::flag("is_calc_from_all_levels", 6, 0x01),
    F::flag("is_calc_for_each_item", 6, 0x02),
    F::flag("is_use_all", 6, 0x04),
    F::scalar("script", 7, FormId),
    F::scalar("template", 8, FormId),
    F::list("entries", 9, ENTRY),
];
