//! Bounds-checked little-endian byte readers/writers.
//!
//! Array constants live in the `rgcb` trailer of a formula record, so the reader is a plain
//! cursor over an in-memory slice rather than an `io::Read`. Short reads and writes fail without
//! moving the position.

use crate::error::{DecodeArrayError, EncodeArrayError};

#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Start reading at `offset`. An offset past the end leaves nothing to read.
    pub fn with_offset(data: &'a [u8], offset: usize) -> Self {
        Self {
            data,
            offset: offset.min(data.len()),
        }
    }

    /// Current read position, relative to the start of the underlying slice.
    pub fn position(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.offset)
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], DecodeArrayError> {
        let remaining = self.remaining();
        if remaining < n {
            return Err(DecodeArrayError::UnexpectedEof {
                offset: self.offset,
                needed: n,
                remaining,
            });
        }
        let data: &'a [u8] = self.data;
        let out = &data[self.offset..self.offset + n];
        self.offset += n;
        Ok(out)
    }

    pub fn skip(&mut self, n: usize) -> Result<(), DecodeArrayError> {
        self.read_bytes(n).map(|_| ())
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeArrayError> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u16_le(&mut self) -> Result<u16, DecodeArrayError> {
        let b = self.read_bytes(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn read_f64_le(&mut self) -> Result<f64, DecodeArrayError> {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(self.read_bytes(8)?);
        Ok(f64::from_le_bytes(bytes))
    }
}

/// Writer over a caller-owned buffer, starting at a caller-chosen offset.
#[derive(Debug)]
pub struct ByteSink<'a> {
    buf: &'a mut [u8],
    start: usize,
    offset: usize,
}

impl<'a> ByteSink<'a> {
    pub fn new(buf: &'a mut [u8], offset: usize) -> Self {
        Self {
            buf,
            start: offset,
            offset,
        }
    }

    /// Absolute write position in the underlying buffer.
    pub fn position(&self) -> usize {
        self.offset
    }

    /// Bytes written since the sink was created.
    pub fn written(&self) -> usize {
        self.offset - self.start
    }

    fn reserve(&mut self, n: usize) -> Result<&mut [u8], EncodeArrayError> {
        let available = self.buf.len().saturating_sub(self.offset);
        if available < n {
            return Err(EncodeArrayError::BufferTooSmall {
                offset: self.offset,
                needed: n,
                available,
            });
        }
        let start = self.offset;
        self.offset += n;
        Ok(&mut self.buf[start..start + n])
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), EncodeArrayError> {
        self.reserve(bytes.len())?.copy_from_slice(bytes);
        Ok(())
    }

    pub fn write_zeros(&mut self, n: usize) -> Result<(), EncodeArrayError> {
        self.reserve(n)?.fill(0);
        Ok(())
    }

    pub fn write_u8(&mut self, v: u8) -> Result<(), EncodeArrayError> {
        self.write_bytes(&[v])
    }

    pub fn write_u16_le(&mut self, v: u16) -> Result<(), EncodeArrayError> {
        self.write_bytes(&v.to_le_bytes())
    }

    pub fn write_f64_le(&mut self, v: f64) -> Result<(), EncodeArrayError> {
        self.write_bytes(&v.to_le_bytes())
    }
}
