use cbash_engine::FieldKind;

use crate::accessor::FieldDef as F;
use crate::accessor::ScalarType::*;

/// Game setting. The value's encoding depends on the setting's name prefix.
pub const GMST: &[F] = &[F::dynamic("value", 5, FieldKind::SInt32OrFloat32OrString)];

pub const GLOB: &[F] = &[
    // 's', 'l', or 'f'
    F::scalar("format", 5, UInt8),
    F::scalar("value", 6, Float),
];
