//! Cells and the records the engine stores under them.

use cbash_common::Signature;

use crate::accessor::FieldDef as F;
use crate::accessor::ScalarType::*;

const LIGHTING: &[F] = &[
    F::scalar("ambient_red", 7, UInt8),
    F::scalar("ambient_green", 8, UInt8),
    F::scalar("ambient_blue", 9, UInt8),
    F::scalar("directional_red", 10, UInt8),
    F::scalar("directional_green", 11, UInt8),
    F::scalar("directional_blue", 12, UInt8),
    F::scalar("fog_red", 13, UInt8),
    F::scalar("fog_green", 14, UInt8),
    F::scalar("fog_blue", 15, UInt8),
    F::scalar("fog_near", 16, Float),
    F::scalar("fog_far", 17, Float),
    F::scalar("directional_xy", 18, Int32),
    F::scalar("directional_z", 19, Int32),
    F::scalar("directional_fade", 20, Float),
    F::scalar("fog_clip", 21, Float),
];

pub const CELL: &[F] = &[
    F::string("full", 5),
    F::scalar("flags", 6, UInt8),
    F::flag("is_interior", 6, 0x01),
    F::flag("has_water", 6, 0x02),
    F::flag("is_invert_fast_travel", 6, 0x04),
    F::flag("is_force_hide_land", 6, 0x08),
    F::flag("is_public_place", 6, 0x20),
    F::flag("is_hand_changed", 6, 0x40),
    F::flag("is_behave_like_exterior", 6, 0x80),
    F::group("lighting", LIGHTING),
    F::scalar("music", 22, UInt8),
    F::masked("is_music_default", 22, 0xFF, 0),
    F::masked("is_music_public", 22, 0xFF, 1),
    F::masked("is_music_dungeon", 22, 0xFF, 2),
    F::scalar("owner", 23, FormId),
    F::scalar("rank", 24, Int32),
    F::scalar("global_variable", 25, FormId),
    F::scalar("climate", 26, FormId),
    F::scalar("water_height", 27, Float),
    F::array("regions", 28, FormId),
    F::scalar("pos_x", 29, Int32),
    F::scalar("pos_y", 30, Int32),
    F::scalar("water", 31, FormId),
    F::sub_record("pathgrid", 32, Signature::new(*b"PGRD")),
    F::sub_record("land", 33, Signature::new(*b"LAND")),
    F::sub_records("references", 34, Signature::new(*b"REFR")),
];

const POINT: &[F] = &[
    F::scalar("x", 1, Float),
    F::scalar("y", 2, Float),
    F::scalar("z", 3, Float),
    F::scalar("connections", 4, UInt8),
    F::fixed_array("unused1", 5, UInt8, 3),
];

/// Path grid.
pub const PGRD: &[F] = &[F::scalar("count", 5, UInt16), F::list("points", 6, POINT)];

const TEXTURE: &[F] = &[
    F::scalar("texture", 1, FormId),
    F::scalar("quadrant", 2, UInt8),
    F::scalar("unused1", 3, UInt8),
    F::scalar("layer", 4, Int16),
];

/// Landscape.
pub const LAND: &[F] = &[
    F::scalar("flags", 5, UInt32),
    F::array("data", 6, UInt8),
    F::scalar("height_offset", 7, Float),
    F::list("textures", 8, TEXTURE),
];

/// Placed object.
pub const REFR: &[F] = &[
    F::scalar("base", 5, FormId),
    F::scalar("owner", 6, FormId),
    F::scalar("rank", 7, Int32),
    F::scalar("scale", 8, Float),
    F::scalar("pos_x", 9, Float),
    F::scalar("pos_y", 10, Float),
    F::scalar("pos_z", 11, Float),
    F::scalar("rot_x", 12, Radian),
    F::scalar("rot_y", 13, Radian),
    F::scalar("rot_z", 14, Radian),
    F::scalar("destination", 15, FormId),
    F::scalar("lock_level", 16, UInt8),
    F::scalar("lock_key", 17, FormId),
    F::scalar("lock_flags", 18, UInt8),
    F::flag("is_leveled_lock", 18, 0x04),
];
