//! Text encodings for string fields.
//!
//! The engine stores strings as raw null-terminated bytes. The game files use
//! Windows-1252, but some tools write UTF-8, so the encoding is a caller
//! choice rather than a constant.

use std::fmt;
use std::str::FromStr;

/// Windows-1252 code points for bytes 0x80..=0x9F. Unassigned slots map to
/// the matching C1 control character, as Windows does.
const CP1252_HIGH: [char; 32] = [
    '\u{20AC}', '\u{0081}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{008D}', '\u{017D}', '\u{008F}',
    '\u{0090}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{02DC}', '\u{2122}', '\u{0161}', '\u{203A}', '\u{0153}', '\u{009D}', '\u{017E}', '\u{0178}',
];

/// Encoding used to convert string fields to and from engine bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    /// Windows-1252, the encoding of the shipped game data.
    #[default]
    Windows1252,
    /// UTF-8; invalid sequences decode to U+FFFD.
    Utf8,
}

impl TextEncoding {
    /// Decode engine bytes into a string.
    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            Self::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            Self::Windows1252 => bytes
                .iter()
                .map(|&b| match b {
                    0x80..=0x9F => CP1252_HIGH[(b - 0x80) as usize],
                    _ => b as char,
                })
                .collect(),
        }
    }

    /// Encode a string into engine bytes (without the null terminator).
    ///
    /// Characters that Windows-1252 cannot represent become `?`.
    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            Self::Utf8 => text.as_bytes().to_vec(),
            Self::Windows1252 => text.chars().map(encode_cp1252).collect(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Windows1252 => "windows-1252",
            Self::Utf8 => "utf-8",
        }
    }
}

fn encode_cp1252(c: char) -> u8 {
    let code = c as u32;
    if code < 0x80 || (0xA0..=0xFF).contains(&code) {
        return code as u8;
    }
    CP1252_HIGH
        .iter()
        .position(|&high| high == c)
        .map(|i| 0x80 + i as u8)
        .unwrap_or(b'?')
}

impl FromStr for TextEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "windows-1252" | "cp1252" | "latin1" => Ok(Self::Windows1252),
            "utf-8" | "utf8" => Ok(Self::Utf8),
            other => Err(format!("unknown text encoding: {}", other)),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cp1252_round_trip() {
        let text = "Dagon\u{2019}s \u{20AC}5 caf\u{E9}";
        let bytes = TextEncoding::Windows1252.encode(text);
        assert_eq!(bytes[5], 0x92);
        assert_eq!(TextEncoding::Windows1252.decode(&bytes), text);
    }

    #[test]
    fn test_cp1252_unmappable() {
        assert_eq!(TextEncoding::Windows1252.encode("\u{4E2D}"), b"?");
    }

    #[test]
    fn test_utf8_lossy() {
        assert_eq!(TextEncoding::Utf8.decode(&[0x41, 0xFF]), "A\u{FFFD}");
    }

    #[test]
    fn test_parse() {
        assert_eq!("UTF8".parse::<TextEncoding>().unwrap(), TextEncoding::Utf8);
        assert!("ebcdic".parse::<TextEncoding>().is_err());
    }
}
