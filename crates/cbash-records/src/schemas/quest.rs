use cbash_engine::FieldKind;

use crate::accessor::FieldDef as F;
use crate::accessor::ScalarType::*;

/// Condition check. The parameters are record references or plain integers
/// depending on `ifunc`.
const CONDITION: &[F] = &[
    F::scalar("oper_type", 1, UInt8),
    F::masked("is_equal", 1, 0xF0, 0x00),
    F::masked("is_not_equal", 1, 0xF0, 0x20),
    F::masked("is_greater", 1, 0xF0, 0x40),
    F::masked("is_greater_or_equal", 1, 0xF0, 0x60),
    F::masked("is_less", 1, 0xF0, 0x80),
    F::masked("is_less_or_equal", 1, 0xF0, 0xA0),
    F::flag("is_or", 1, 0x01),
    F::flag("is_run_on_target", 1, 0x02),
    F::flag("is_use_global", 1, 0x04),
    F::fixed_array("unused1", 2, UInt8, 3),
    F::scalar("comp_value", 3, Float),
    F::scalar("ifunc", 4, UInt32),
    F::dynamic("param1", 5, FieldKind::FormIdOrUInt32),
    F::dynamic("param2", 6, FieldKind::FormIdOrUInt32),
    F::fixed_array("unused2", 7, UInt8, 4),
];

const LOG_ENTRY: &[F] = &[
    F::scalar("flags", 1, UInt8),
    F::flag("is_complete", 1, 0x01),
    F::list("conditions", 2, CONDITION),
    F::string("text", 3),
    F::string("result_text", 4),
];

const STAGE: &[F] = &[F::scalar("stage", 1, UInt16), F::list("entries", 2, LOG_ENTRY)];

const TARGET: &[F] = &[
    F::scalar("target_id", 1, FormId),
    F::scalar("flags", 2, UInt8),
    F::flag("is_ignores_locks", 2, 0x01),
    F::fixed_array("unused1", 3, UInt8, 3),
    F::list("conditions", 4, CONDITION),
];

pub const QUST: &[F] = &[
    F::scalar("script", 5, FormId),
    F::string("full", 6),
    F::istring("icon", 7),
    F::scalar("flags", 8, UInt8),
    F::flag("is_start_enabled", 8, 0x01),
    F::flag("is_repeated_topics", 8, 0x04),
    F::flag("is_repeated_stages", 8, 0x08),
    F::scalar("priority", 9, UInt8),
    F::list("conditions", 10, CONDITION),
    F::list("stages", 11, STAGE),
    F::list("targets", 12, TARGET),
];
