//! Opaque identifiers issued by the engine, plus the flag sets passed to
//! lifecycle calls.

use std::fmt;

use bitflags::bitflags;

macro_rules! engine_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
        pub struct $name(pub u32);

        impl $name {
            /// Map the engine's "0 means none" convention onto `Option`.
            #[inline]
            pub fn from_raw(raw: u32) -> Option<Self> {
                (raw != 0).then_some(Self(raw))
            }

            /// Get the raw identifier.
            #[inline]
            pub const fn get(self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", $label, self.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(self, f)
            }
        }
    };
}

engine_id!(
    /// A load-order-bound collection of mods.
    CollectionId,
    "collection"
);
engine_id!(
    /// A mod (plugin file) inside a collection.
    ModId,
    "mod"
);
engine_id!(
    /// A record owned by the engine.
    RecordId,
    "record"
);

/// Game whose file format a collection reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum GameMode {
    #[default]
    Oblivion = 0,
    Fallout3 = 1,
    FalloutNewVegas = 2,
    Skyrim = 3,
}

impl GameMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Oblivion => "oblivion",
            Self::Fallout3 => "fallout3",
            Self::FalloutNewVegas => "newvegas",
            Self::Skyrim => "skyrim",
        }
    }
}

impl std::str::FromStr for GameMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "oblivion" | "tes4" => Ok(Self::Oblivion),
            "fallout3" | "fo3" => Ok(Self::Fallout3),
            "newvegas" | "fnv" => Ok(Self::FalloutNewVegas),
            "skyrim" | "tes5" => Ok(Self::Skyrim),
            other => Err(format!("unknown game: {}", other)),
        }
    }
}

bitflags! {
    /// Options for adding a mod to a collection.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ModFlags: u32 {
        /// Load only the record headers needed for indexing.
        const MIN_LOAD = 0x0000_0001;
        /// Load every record fully.
        const FULL_LOAD = 0x0000_0002;
        /// Skip records the mod introduces; references to them become untrusted.
        const SKIP_NEW_RECORDS = 0x0000_0004;
        /// The mod takes a slot in the load order (otherwise it is only scanned).
        const IN_LOAD_ORDER = 0x0000_0008;
        const SAVEABLE = 0x0000_0010;
        const ADD_MASTERS = 0x0000_0020;
        const LOAD_MASTERS = 0x0000_0040;
        const EXTENDED_CONFLICTS = 0x0000_0080;
        const TRACK_NEW_TYPES = 0x0000_0100;
        const INDEX_LANDS = 0x0000_0200;
        const FIXUP_PLACEABLES = 0x0000_0400;
        const CREATE_NEW = 0x0000_0800;
        const IGNORE_INACTIVE_MASTERS = 0x0000_1000;
        const SKIP_ALL_RECORDS = 0x0000_2000;
    }
}

impl ModFlags {
    /// The flags a typical editing session uses for active plugins.
    pub const fn editing() -> Self {
        Self::from_bits_truncate(
            Self::IN_LOAD_ORDER.bits()
                | Self::SAVEABLE.bits()
                | Self::ADD_MASTERS.bits()
                | Self::LOAD_MASTERS.bits(),
        )
    }
}

impl Default for ModFlags {
    fn default() -> Self {
        Self::editing()
    }
}

bitflags! {
    /// Options for saving a mod.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SaveFlags: u32 {
        /// Drop masters no record refers to.
        const CLEAN_MASTERS = 0x0000_0001;
        /// Close the owning collection once the file is written.
        const CLOSE_COLLECTION = 0x0000_0002;
    }
}

bitflags! {
    /// Options for creating or copying a record.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CreateFlags: u32 {
        /// Keep the source FormID so the new record overrides it.
        const SET_AS_OVERRIDE = 0x0000_0001;
        /// Copy the winning version of the parent record along with the record.
        const COPY_WINNING_PARENT = 0x0000_0002;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw() {
        assert_eq!(RecordId::from_raw(0), None);
        assert_eq!(RecordId::from_raw(7), Some(RecordId(7)));
    }

    #[test]
    fn test_display() {
        assert_eq!(ModId(3).to_string(), "mod#3");
    }

    #[test]
    fn test_editing_flags() {
        let flags = ModFlags::default();
        assert!(flags.contains(ModFlags::IN_LOAD_ORDER | ModFlags::SAVEABLE));
        assert!(!flags.contains(ModFlags::SKIP_NEW_RECORDS));
    }
}
