use crate::accessor::FieldDef as F;
use crate::accessor::ScalarType::*;

const FACTION: &[F] = &[
    F::scalar("faction", 1, FormId),
    F::scalar("rank", 2, UInt8),
    F::fixed_array("unused1", 3, UInt8, 3),
];

const ITEM: &[F] = &[F::scalar("item", 1, FormId), F::scalar("count", 2, Int32)];

const AI: &[F] = &[
    F::scalar("aggression", 20, UInt8),
    F::scalar("confidence", 21, UInt8),
    F::scalar("energy_level", 22, UInt8),
    F::scalar("responsibility", 23, UInt8),
    F::scalar("services", 24, UInt32),
    F::flag("is_service_weapons", 24, 0x0000_0001),
    F::flag("is_service_armor", 24, 0x0000_0002),
    F::flag("is_service_clothing", 24, 0x0000_0004),
    F::flag("is_service_books", 24, 0x0000_0008),
    F::flag("is_service_ingredients", 24, 0x0000_0010),
    F::flag("is_service_lights", 24, 0x0000_0080),
    F::flag("is_service_spells", 24, 0x0000_0800),
    F::flag("is_service_training", 24, 0x0000_4000),
    F::flag("is_service_recharge", 24, 0x0001_0000),
    F::flag("is_service_repair", 24, 0x0002_0000),
    F::scalar("train_skill", 25, UInt8),
    F::scalar("train_level", 26, UInt8),
];

const HAIR_COLOR: &[F] = &[
    F::scalar("hair_red", 35, UInt8),
    F::scalar("hair_green", 36, UInt8),
    F::scalar("hair_blue", 37, UInt8),
];

/// Non-player character.
pub const NPC_: &[F] = &[
    F::string("full", 5),
    F::istring("model", 6),
    F::scalar("flags", 7, UInt32),
    F::flag("is_female", 7, 0x0000_0001),
    F::flag("is_essential", 7, 0x0000_0002),
    F::flag("is_respawn", 7, 0x0000_0008),
    F::flag("is_auto_calc", 7, 0x0000_0010),
    F::flag("is_pc_level_offset", 7, 0x0000_0080),
    F::flag("is_no_low_level", 7, 0x0000_0200),
    F::flag("is_no_rumors", 7, 0x0000_2000),
    F::flag("is_summonable", 7, 0x0000_4000),
    F::flag("is_no_persuasion", 7, 0x0000_8000),
    F::flag("is_can_corpse_check", 7, 0x0010_0000),
    F::scalar("base_spell", 8, UInt16),
    F::scalar("fatigue", 9, UInt16),
    F::scalar("barter_gold", 10, UInt16),
    F::scalar("level", 11, Int16),
    F::scalar("calc_min", 12, UInt16),
    F::scalar("calc_max", 13, UInt16),
    F::list("factions", 14, FACTION),
    F::scalar("death_item", 15, FormId),
    F::scalar("race", 16, FormId),
    F::array("spells", 17, FormId),
    F::scalar("script", 18, FormId),
    F::list("items", 19, ITEM),
    F::group("ai", AI),
    F::array("ai_packages", 27, FormId),
    F::scalar("iclass", 28, FormId),
    // armorer through speechcraft
    F::fixed_array("skills", 29, UInt8, 21),
    F::scalar("health", 30, UInt16),
    // strength through luck
    F::fixed_array("attributes", 31, UInt8, 8),
    F::scalar("hair", 32, FormId),
    F::scalar("hair_length", 33, Float),
    F::scalar("eye", 34, FormId),
    F::group("hair_color", HAIR_COLOR),
];
