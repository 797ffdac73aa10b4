//! Data output traits and implementations for the Ignite binary format.

use crate::error::{IgniteError, Result};
use bytes::{BufMut, BytesMut};

/// Trait for writing primitive values in Ignite's binary format.
///
/// All multi-byte values are written in little-endian byte order.
pub trait DataOutput {
    /// Writes a single unsigned byte.
    fn write_u8(&mut self, v: u8) -> Result<()>;

    /// Writes a single byte (i8).
    fn write_byte(&mut self, v: i8) -> Result<()>;

    /// Writes a boolean as a single byte (0 for false, 1 for true).
    fn write_bool(&mut self, v: bool) -> Result<()>;

    /// Writes a 16-bit signed integer.
    fn write_short(&mut self, v: i16) -> Result<()>;

    /// Writes a 16-bit UTF-16 code unit.
    fn write_char(&mut self, v: u16) -> Result<()>;

    /// Writes a 32-bit signed integer.
    fn write_int(&mut self, v: i32) -> Result<()>;

    /// Writes a 64-bit signed integer.
    fn write_long(&mut self, v: i64) -> Result<()>;

    /// Writes a 32-bit floating point.
    fn write_float(&mut self, v: f32) -> Result<()>;

    /// Writes a 64-bit floating point.
    fn write_double(&mut self, v: f64) -> Result<()>;

    /// Writes raw bytes without length prefix.
    fn write_bytes(&mut self, v: &[u8]) -> Result<()>;

    /// Writes an `i32` length prefix followed by the UTF-8 bytes.
    fn write_string(&mut self, v: &str) -> Result<()>;
}

/// Converts a collection length to the `i32` the wire format carries.
pub fn wire_len(len: usize) -> Result<i32> {
    i32::try_from(len)
        .map_err(|_| IgniteError::Encode(format!("length {} exceeds i32::MAX", len)))
}

/// A buffer-based implementation of `DataOutput`.
#[derive(Debug)]
pub struct ObjectDataOutput {
    buffer: BytesMut,
}

impl ObjectDataOutput {
    /// Creates a new `ObjectDataOutput` with default capacity.
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::with_capacity(256),
        }
    }

    /// Creates a new `ObjectDataOutput` with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(capacity),
        }
    }

    /// Returns the written bytes as a slice.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Consumes the output and returns the written bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer.to_vec()
    }

    /// Consumes the output and returns the underlying buffer.
    pub fn into_inner(self) -> BytesMut {
        self.buffer
    }

    /// Returns the number of bytes written.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns true if no bytes have been written.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Overwrites four bytes at `offset` with `v`.
    ///
    /// Used for length fields that are only known once the body is written.
    pub fn patch_int(&mut self, offset: usize, v: i32) -> Result<()> {
        let end = offset + 4;
        if end > self.buffer.len() {
            return Err(IgniteError::Encode(format!(
                "cannot patch offset {}: only {} bytes written",
                offset,
                self.buffer.len()
            )));
        }
        self.buffer[offset..end].copy_from_slice(&v.to_le_bytes());
        Ok(())
    }
}

impl Default for ObjectDataOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl DataOutput for ObjectDataOutput {
    fn write_u8(&mut self, v: u8) -> Result<()> {
        self.buffer.put_u8(v);
        Ok(())
    }

    fn write_byte(&mut self, v: i8) -> Result<()> {
        self.buffer.put_i8(v);
        Ok(())
    }

    fn write_bool(&mut self, v: bool) -> Result<()> {
        self.buffer.put_u8(if v { 1 } else { 0 });
        Ok(())
    }

    fn write_short(&mut self, v: i16) -> Result<()> {
        self.buffer.put_i16_le(v);
        Ok(())
    }

    fn write_char(&mut self, v: u16) -> Result<()> {
        self.buffer.put_u16_le(v);
        Ok(())
    }

    fn write_int(&mut self, v: i32) -> Result<()> {
        self.buffer.put_i32_le(v);
        Ok(())
    }

    fn write_long(&mut self, v: i64) -> Result<()> {
        self.buffer.put_i64_le(v);
        Ok(())
    }

    fn write_float(&mut self, v: f32) -> Result<()> {
        self.buffer.put_f32_le(v);
        Ok(())
    }

    fn write_double(&mut self, v: f64) -> Result<()> {
        self.buffer.put_f64_le(v);
        Ok(())
    }

    fn write_bytes(&mut self, v: &[u8]) -> Result<()> {
        self.buffer.put_slice(v);
        Ok(())
    }

    fn write_string(&mut self, v: &str) -> Result<()> {
        let bytes = v.as_bytes();
        self.write_int(wire_len(bytes.len())?)?;
        self.write_bytes(bytes)
    }
}
