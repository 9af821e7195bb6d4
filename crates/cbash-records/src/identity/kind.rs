//! Numeric semantics of the three reference kinds.

use std::fmt;

/// How a kind of symbolic reference packs a namespace index and a local id
/// into one 32-bit short form.
pub trait RefKind: Clone + Copy + fmt::Debug + Default + 'static {
    /// Display name.
    const NAME: &'static str;

    /// Passed to the engine's identity calls.
    const IS_MGEF: bool;

    /// Check if a short form means "no reference".
    fn is_null(short: u32) -> bool;

    /// Check if a local id is defined relative to a namespace. Ids that are
    /// not are static enumerants and always stay raw.
    fn is_namespaced(local: u32) -> bool;

    /// Strip the namespace index from a short form.
    fn local(short: u32) -> u32;

    /// Namespace index carried by a short form.
    fn index(short: u32) -> u8;

    /// Pack a namespace index and a local id.
    fn join(index: u8, local: u32) -> u32;
}

/// Record identifiers. Namespace index in the top byte.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FormIdKind;

impl RefKind for FormIdKind {
    const NAME: &'static str = "FormID";
    const IS_MGEF: bool = false;

    fn is_null(short: u32) -> bool {
        short == 0
    }

    fn is_namespaced(_local: u32) -> bool {
        true
    }

    fn local(short: u32) -> u32 {
        short & 0x00FF_FFFF
    }

    fn index(short: u32) -> u8 {
        (short >> 24) as u8
    }

    fn join(index: u8, local: u32) -> u32 {
        ((index as u32) << 24) | Self::local(local)
    }
}

/// Actor values. Ids below `0x800` are the engine's built-in attributes and
/// skills; only higher ids belong to a namespace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ActorValueKind;

impl ActorValueKind {
    pub const FIRST_SCOPED: u32 = 0x800;
}

impl RefKind for ActorValueKind {
    const NAME: &'static str = "ActorValue";
    const IS_MGEF: bool = false;

    fn is_null(_short: u32) -> bool {
        false
    }

    fn is_namespaced(local: u32) -> bool {
        local >= Self::FIRST_SCOPED
    }

    fn local(short: u32) -> u32 {
        short & 0x00FF_FFFF
    }

    fn index(short: u32) -> u8 {
        (short >> 24) as u8
    }

    fn join(index: u8, local: u32) -> u32 {
        ((index as u32) << 24) | Self::local(local)
    }
}

/// Magic effect codes. Codes below `0x80000000` are four-character tags;
/// scoped codes carry the namespace index in the low byte.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MgefCodeKind;

impl MgefCodeKind {
    pub const FIRST_SCOPED: u32 = 0x8000_0000;
}

impl RefKind for MgefCodeKind {
    const NAME: &'static str = "MGEFCode";
    const IS_MGEF: bool = true;

    fn is_null(short: u32) -> bool {
        short == 0
    }

    fn is_namespaced(local: u32) -> bool {
        local >= Self::FIRST_SCOPED
    }

    fn local(short: u32) -> u32 {
        short & 0xFFFF_FF00
    }

    fn index(short: u32) -> u8 {
        short as u8
    }

    fn join(index: u8, local: u32) -> u32 {
        Self::local(local) | index as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_id_packing() {
        assert_eq!(FormIdKind::join(1, 0x001234), 0x0100_1234);
        assert_eq!(FormIdKind::join(0, 0x0500_1234), 0x0000_1234);
        assert_eq!(FormIdKind::index(0x0300_0001), 3);
        assert_eq!(FormIdKind::local(0x0300_0001), 1);
    }

    #[test]
    fn test_mgef_packing() {
        assert_eq!(MgefCodeKind::join(2, 0x8000_1200), 0x8000_1202);
        assert_eq!(MgefCodeKind::index(0x8000_1202), 2);
        assert_eq!(MgefCodeKind::local(0x8000_1202), 0x8000_1200);
        assert!(!MgefCodeKind::is_namespaced(u32::from_le_bytes(*b"FIDG")));
    }

    #[test]
    fn test_actor_value_threshold() {
        assert!(!ActorValueKind::is_namespaced(0x7FF));
        assert!(ActorValueKind::is_namespaced(0x800));
        assert!(!ActorValueKind::is_null(0));
    }
}
