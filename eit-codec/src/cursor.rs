//! Bounds-checked sequential reader over an EIT byte buffer.

use crate::error::EitError;

/// Sequential big-endian reader over an immutable byte buffer.
///
/// The cursor knows nothing about table semantics; it only tracks a
/// position and refuses to read past the end of the buffer.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor at position 0.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current read position in bytes from the start of the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Move the read position to an absolute offset.
    ///
    /// The offset may lie past the end of the buffer; the next read
    /// fails with `TruncatedInput` in that case.
    pub fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Number of bytes left before the end of the buffer.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// True once the position is at or past the end of the buffer.
    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.data.len()
    }

    fn check(&self, n: usize) -> Result<(), EitError> {
        if self.remaining() < n {
            return Err(EitError::TruncatedInput {
                offset: self.pos,
                needed: n,
                available: self.remaining(),
            });
        }
        Ok(())
    }

    /// Read `n` bytes (1..=4) as a big-endian unsigned integer.
    pub fn read_uint(&mut self, n: usize) -> Result<u32, EitError> {
        self.check(n)?;
        let mut value = 0u32;
        for i in 0..n {
            value = (value << 8) | self.data[self.pos + i] as u32;
        }
        self.pos += n;
        Ok(value)
    }

    /// Read one byte.
    pub fn read_u8(&mut self) -> Result<u8, EitError> {
        Ok(self.read_uint(1)? as u8)
    }

    /// Read a big-endian 16-bit integer.
    pub fn read_u16(&mut self) -> Result<u16, EitError> {
        Ok(self.read_uint(2)? as u16)
    }

    /// Read `n` raw bytes.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], EitError> {
        self.check(n)?;
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }
}
