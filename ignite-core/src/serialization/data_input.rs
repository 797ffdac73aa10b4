//! Data input traits and implementations for the Ignite binary format.

use crate::error::{IgniteError, Result};
use bytes::Buf;
use std::io::Cursor;

/// Trait for reading primitive values from Ignite's binary format.
///
/// All multi-byte values are read in little-endian byte order.
pub trait DataInput {
    /// Reads a single unsigned byte.
    fn read_u8(&mut self) -> Result<u8>;

    /// Reads a single byte (i8).
    fn read_byte(&mut self) -> Result<i8>;

    /// Reads a boolean from a single byte.
    fn read_bool(&mut self) -> Result<bool>;

    /// Reads a 16-bit signed integer.
    fn read_short(&mut self) -> Result<i16>;

    /// Reads a 16-bit UTF-16 code unit.
    fn read_char(&mut self) -> Result<u16>;

    /// Reads a 32-bit signed integer.
    fn read_int(&mut self) -> Result<i32>;

    /// Reads a 64-bit signed integer.
    fn read_long(&mut self) -> Result<i64>;

    /// Reads a 32-bit floating point.
    fn read_float(&mut self) -> Result<f32>;

    /// Reads a 64-bit floating point.
    fn read_double(&mut self) -> Result<f64>;

    /// Reads the specified number of raw bytes.
    fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>>;

    /// Reads an `i32` length prefix followed by that many UTF-8 bytes.
    fn read_string(&mut self) -> Result<String>;
}

/// A buffer-based implementation of `DataInput`.
#[derive(Debug)]
pub struct ObjectDataInput<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> ObjectDataInput<'a> {
    /// Creates a new `ObjectDataInput` from the given byte slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(data),
        }
    }

    /// Returns the number of bytes remaining to be read.
    pub fn remaining(&self) -> usize {
        self.cursor.remaining()
    }

    /// Returns the current position in the buffer.
    pub fn position(&self) -> usize {
        self.cursor.position() as usize
    }

    /// Reads a non-negative `i32` count or length prefix.
    pub fn read_len(&mut self) -> Result<usize> {
        let len = self.read_int()?;
        usize::try_from(len)
            .map_err(|_| IgniteError::Decode(format!("invalid length prefix: {}", len)))
    }

    fn ensure_remaining(&self, n: usize) -> Result<()> {
        if self.cursor.remaining() < n {
            Err(IgniteError::Decode(format!(
                "insufficient data: need {} bytes, have {}",
                n,
                self.cursor.remaining()
            )))
        } else {
            Ok(())
        }
    }
}

impl DataInput for ObjectDataInput<'_> {
    fn read_u8(&mut self) -> Result<u8> {
        self.ensure_remaining(1)?;
        Ok(self.cursor.get_u8())
    }

    fn read_byte(&mut self) -> Result<i8> {
        self.ensure_remaining(1)?;
        Ok(self.cursor.get_i8())
    }

    fn read_bool(&mut self) -> Result<bool> {
        self.ensure_remaining(1)?;
        Ok(self.cursor.get_u8() != 0)
    }

    fn read_short(&mut self) -> Result<i16> {
        self.ensure_remaining(2)?;
        Ok(self.cursor.get_i16_le())
    }

    fn read_char(&mut self) -> Result<u16> {
        self.ensure_remaining(2)?;
        Ok(self.cursor.get_u16_le())
    }

    fn read_int(&mut self) -> Result<i32> {
        self.ensure_remaining(4)?;
        Ok(self.cursor.get_i32_le())
    }

    fn read_long(&mut self) -> Result<i64> {
        self.ensure_remaining(8)?;
        Ok(self.cursor.get_i64_le())
    }

    fn read_float(&mut self) -> Result<f32> {
        self.ensure_remaining(4)?;
        Ok(self.cursor.get_f32_le())
    }

    fn read_double(&mut self) -> Result<f64> {
        self.ensure_remaining(8)?;
        Ok(self.cursor.get_f64_le())
    }

    fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        self.ensure_remaining(len)?;
        let mut buf = vec![0u8; len];
        self.cursor.copy_to_slice(&mut buf);
        Ok(buf)
    }

    fn read_string(&mut self) -> Result<String> {
        let len = self.read_len()?;
        let bytes = self.read_bytes(len)?;
        String::from_utf8(bytes)
            .map_err(|e| IgniteError::Decode(format!("invalid UTF-8 string: {}", e)))
    }
}
