//! Little-endian encoder for values passed to the engine.

use byteorder::{LittleEndian, WriteBytesExt};
use zerocopy::{Immutable, IntoBytes};

use crate::{Result, Signature};

/// Accumulates the raw bytes of a single field write.
///
/// Every scalar is written little-endian, which is what the engine expects
/// regardless of host byte order.
#[derive(Debug, Default, Clone)]
pub struct BinaryWriter {
    buffer: Vec<u8>,
}

impl BinaryWriter {
    /// Create an empty writer.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty writer with room for `capacity` bytes.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self { buffer: Vec::with_capacity(capacity) }
    }

    /// Number of bytes written so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if nothing has been written.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        Ok(self.buffer.write_u8(value)?)
    }

    pub fn write_i8(&mut self, value: i8) -> Result<()> {
        Ok(self.buffer.write_i8(value)?)
    }

    pub fn write_bool(&mut self, value: bool) -> Result<()> {
        self.write_u8(value as u8)
    }

    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        Ok(self.buffer.write_u16::<LittleEndian>(value)?)
    }

    pub fn write_i16(&mut self, value: i16) -> Result<()> {
        Ok(self.buffer.write_i16::<LittleEndian>(value)?)
    }

    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        Ok(self.buffer.write_u32::<LittleEndian>(value)?)
    }

    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        Ok(self.buffer.write_i32::<LittleEndian>(value)?)
    }

    pub fn write_f32(&mut self, value: f32) -> Result<()> {
        Ok(self.buffer.write_f32::<LittleEndian>(value)?)
    }

    /// Write a four-byte tag verbatim.
    pub fn write_tag(&mut self, tag: Signature) {
        self.buffer.extend_from_slice(tag.as_bytes());
    }

    /// Write a string payload followed by the null terminator the engine expects.
    pub fn write_cstr_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
        self.buffer.push(0);
    }

    /// Write a plain-old-data value using its in-memory representation.
    pub fn write_struct<T: IntoBytes + Immutable + ?Sized>(&mut self, value: &T) {
        self.buffer.extend_from_slice(value.as_bytes());
    }

    /// Consume the writer and return the encoded bytes.
    #[inline]
    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }

    /// Borrow the encoded bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BinaryReader;

    #[test]
    fn test_little_endian_layout() {
        let mut writer = BinaryWriter::new();
        writer.write_u32(0x01001234).unwrap();
        writer.write_i16(-2).unwrap();
        assert_eq!(writer.as_bytes(), &[0x34, 0x12, 0x00, 0x01, 0xFE, 0xFF]);
    }

    #[test]
    fn test_cstr_is_terminated() {
        let mut writer = BinaryWriter::new();
        writer.write_cstr_bytes(b"Skooma");
        assert_eq!(writer.as_bytes(), b"Skooma\0");

        let mut reader = BinaryReader::new(writer.as_bytes());
        assert_eq!(reader.read_cstr_bytes(), b"Skooma");
    }

    #[test]
    fn test_write_struct_slice() {
        let mut writer = BinaryWriter::with_capacity(6);
        writer.write_struct([1u8, 2, 3].as_slice());
        writer.write_struct(&[0xABCDu16]);
        assert_eq!(writer.len(), 5);
        assert_eq!(writer.into_inner()[3..], [0xCD, 0xAB]);
    }
}
