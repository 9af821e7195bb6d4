//! Magic effects and the records that apply them.

use crate::accessor::FieldDef as F;
use crate::accessor::ScalarType::*;

pub const MGEF: &[F] = &[
    F::string("full", 5),
    F::string("text", 6),
    F::istring("icon", 7),
    F::istring("model", 8),
    F::scalar("modb", 9, Float),
    F::scalar("flags", 10, UInt32),
    F::flag("is_hostile", 10, 0x0000_0001),
    F::flag("is_recover", 10, 0x0000_0002),
    F::flag("is_detrimental", 10, 0x0000_0004),
    F::flag("is_magnitude_percent", 10, 0x0000_0008),
    F::flag("is_self", 10, 0x0000_0010),
    F::flag("is_touch", 10, 0x0000_0020),
    F::flag("is_target", 10, 0x0000_0040),
    F::flag("is_no_duration", 10, 0x0000_0080),
    F::flag("is_no_magnitude", 10, 0x0000_0100),
    F::flag("is_no_area", 10, 0x0000_0200),
    F::flag("is_fx_persist", 10, 0x0000_0400),
    F::flag("is_spellmaking", 10, 0x0000_0800),
    F::flag("is_enchanting", 10, 0x0000_1000),
    F::flag("is_no_ingredient", 10, 0x0000_2000),
    F::flag("is_use_weapon", 10, 0x0001_0000),
    F::flag("is_use_armor", 10, 0x0002_0000),
    F::flag("is_use_creature", 10, 0x0004_0000),
    F::flag("is_use_skill", 10, 0x0008_0000),
    F::flag("is_use_attribute", 10, 0x0010_0000),
    F::flag("is_use_actor_value", 10, 0x0100_0000),
    F::flag("is_spray", 10, 0x0200_0000),
    F::flag("is_bolt", 10, 0x0400_0000),
    F::flag("is_fog", 10, 0x0800_0000),
    F::flag("is_no_hit_effect", 10, 0x1000_0000),
    F::scalar("base_cost", 11, Float),
    F::scalar("associated", 12, FormId),
    F::scalar("school", 13, UInt32),
    F::masked("is_alteration", 13, 0xFFFF_FFFF, 0),
    F::masked("is_conjuration", 13, 0xFFFF_FFFF, 1),
    F::masked("is_destruction", 13, 0xFFFF_FFFF, 2),
    F::masked("is_illusion", 13, 0xFFFF_FFFF, 3),
    F::masked("is_mysticism", 13, 0xFFFF_FFFF, 4),
    F::masked("is_restoration", 13, 0xFFFF_FFFF, 5),
    F::scalar("resist_value", 14, ActorValue),
    F::scalar("light", 15, FormId),
    F::scalar("projectile_speed", 16, Float),
    F::scalar("effect_shader", 17, FormId),
    F::scalar("enchant_effect", 18, FormId),
    F::scalar("casting_sound", 19, FormId),
    F::scalar("bolt_sound", 20, FormId),
    F::scalar("hit_sound", 21, FormId),
    F::scalar("area_sound", 22, FormId),
    F::scalar("cef_enchantment", 23, Float),
    F::scalar("cef_barter", 24, Float),
    F::array("counter_effects", 25, MgefCode),
];

const SCRIPT_EFFECT: &[F] = &[
    F::scalar("script", 8, FormId),
    F::scalar("school", 9, UInt32),
    F::scalar("visual", 10, MgefCode),
    F::scalar("flags", 11, UInt8),
    F::flag("is_hostile", 11, 0x01),
    F::string("full", 12),
];

const EFFECT: &[F] = &[
    // Must match `name`.
    F::scalar("name0", 1, MgefCode),
    F::scalar("name", 2, MgefCode),
    F::scalar("magnitude", 3, UInt32),
    F::scalar("area", 4, UInt32),
    F::scalar("duration", 5, UInt32),
    F::scalar("range", 6, UInt32),
    F::masked("is_range_self", 6, 0xFFFF_FFFF, 0),
    F::masked("is_range_touch", 6, 0xFFFF_FFFF, 1),
    F::masked("is_range_target", 6, 0xFFFF_FFFF, 2),
    F::scalar("actor_value", 7, ActorValue),
    F::group("script_effect", SCRIPT_EFFECT),
];

/// Spell.
pub const SPEL: &[F] = &[
    F::string("full", 5),
    F::scalar("spell_type", 6, UInt32),
    F::masked("is_spell", 6, 0xFFFF_FFFF, 0),
    F::masked("is_disease", 6, 0xFFFF_FFFF, 1),
    F::masked("is_power", 6, 0xFFFF_FFFF, 2),
    F::masked("is_lesser_power", 6, 0xFFFF_FFFF, 3),
    F::masked("is_ability", 6, 0xFFFF_FFFF, 4),
    F::masked("is_poison", 6, 0xFFFF_FFFF, 5),
    F::scalar("cost", 7, UInt32),
    F::scalar("level_type", 8, UInt32),
    F::masked("is_novice", 8, 0xFFFF_FFFF, 0),
    F::masked("is_apprentice", 8, 0xFFFF_FFFF, 1),
    F::masked("is_journeyman", 8, 0xFFFF_FFFF, 2),
    F::masked("is_expert", 8, 0xFFFF_FFFF, 3),
    F::masked("is_master", 8, 0xFFFF_FFFF, 4),
    F::scalar("flags", 9, UInt8),
    F::flag("is_manual_cost", 9, 0x01),
    F::flag("is_start_spell", 9, 0x04),
    F::flag("is_area_ignores_los", 9, 0x10),
    F::flag("is_script_always_applies", 9, 0x20),
    F::flag("is_disallow_absorb_reflect", 9, 0x40),
    F::flag("is_touch_explodes", 9, 0x80),
    F::list("effects", 10, EFFECT),
];

/// Enchantment.
pub const ENCH: &[F] = &[
    F::string("full", 5),
    F::scalar("item_type", 6, UInt32),
    F::masked("is_scroll", 6, 0xFFFF_FFFF, 0),
    F::masked("is_staff", 6, 0xFFFF_FFFF, 1),
    F::masked("is_weapon", 6, 0xFFFF_FFFF, 2),
    F::masked("is_apparel", 6, 0xFFFF_FFFF, 3),
    F::scalar("charge_amount", 7, UInt32),
    F::scalar("enchant_cost", 8, UInt32),
    F::scalar("flags", 9, UInt8),
    F::flag("is_no_auto_calc", 9, 0x01),
    F::list("effects", 10, EFFECT),
];
