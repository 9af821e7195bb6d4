//! Four-character record type tags.
//!
//! Every record type in a plugin file is identified by a four-byte tag such as
//! `NPC_` or `MGEF`. The same encoding is used for `CHAR4` field values and for
//! the static magic effect codes (`FIDG`, `REHE`, ...), which the engine stores
//! as the little-endian integer formed by the four bytes.

use std::fmt;
use std::str::FromStr;

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::Error;

/// A four-byte tag.
///
/// The integer form is the little-endian interpretation of the tag bytes, so
/// `Signature::from(*b"GMST").to_u32()` equals `0x54534D47`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct Signature {
    bytes: [u8; 4],
}

impl Signature {
    /// Create a tag from raw bytes.
    #[inline]
    pub const fn new(bytes: [u8; 4]) -> Self {
        Self { bytes }
    }

    /// Reinterpret an engine integer as a tag.
    #[inline]
    pub const fn from_u32(value: u32) -> Self {
        Self { bytes: value.to_le_bytes() }
    }

    /// The engine integer for this tag.
    #[inline]
    pub const fn to_u32(self) -> u32 {
        u32::from_le_bytes(self.bytes)
    }

    /// Get the raw bytes of the tag.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.bytes
    }

    /// Check whether every byte is printable ASCII.
    pub fn is_printable(&self) -> bool {
        self.bytes.iter().all(|b| b.is_ascii_graphic() || *b == b' ')
    }
}

impl From<[u8; 4]> for Signature {
    #[inline]
    fn from(bytes: [u8; 4]) -> Self {
        Self::new(bytes)
    }
}

impl FromStr for Signature {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes: [u8; 4] = s
            .as_bytes()
            .try_into()
            .map_err(|_| Error::InvalidTag(s.to_string()))?;
        Ok(Self::new(bytes))
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_printable() {
            for &b in &self.bytes {
                write!(f, "{}", b as char)?;
            }
            Ok(())
        } else {
            write!(f, "0x{:08X}", self.to_u32())
        }
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Signature {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_form() {
        let sig: Signature = "GMST".parse().unwrap();
        assert_eq!(sig.to_u32(), 0x54534D47);
        assert_eq!(Signature::from_u32(0x54534D47), sig);
    }

    #[test]
    fn test_display() {
        assert_eq!(Signature::from(*b"NPC_").to_string(), "NPC_");
        assert_eq!(Signature::from_u32(0x8000_0001).to_string(), "0x80000001");
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        assert!("FID".parse::<Signature>().is_err());
        assert!("FIDGX".parse::<Signature>().is_err());
    }
}
