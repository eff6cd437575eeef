//! Array-constant header: `[cols_minus1: u8][rows_minus1: u16]`.
//!
//! Both counts are stored as `count - 1` so a 256-column or 65536-row array still fits the field.
//! [`ArrayHeader::from_bytes`] adds the one back when decoding and [`ArrayHeader::to_bytes`]
//! subtracts it when encoding; no other code touches the raw fields.

use crate::cursor::{ByteCursor, ByteSink};
use crate::error::{ArrayConstantError, DecodeArrayError, EncodeArrayError};

pub const HEADER_LEN: usize = 3;
pub const MAX_COLUMNS: usize = u8::MAX as usize + 1;
pub const MAX_ROWS: usize = u16::MAX as usize + 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ArrayHeader {
    column_count: usize,
    row_count: usize,
}

impl ArrayHeader {
    pub fn new(column_count: usize, row_count: usize) -> Result<Self, ArrayConstantError> {
        if !(1..=MAX_COLUMNS).contains(&column_count) {
            return Err(ArrayConstantError::Shape(format!(
                "column count {column_count} outside 1..={MAX_COLUMNS}"
            )));
        }
        if !(1..=MAX_ROWS).contains(&row_count) {
            return Err(ArrayConstantError::Shape(format!(
                "row count {row_count} outside 1..={MAX_ROWS}"
            )));
        }
        Ok(Self {
            column_count,
            row_count,
        })
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn cell_count(&self) -> usize {
        self.column_count * self.row_count
    }

    pub fn from_bytes(bytes: [u8; HEADER_LEN]) -> Self {
        Self {
            column_count: bytes[0] as usize + 1,
            row_count: u16::from_le_bytes([bytes[1], bytes[2]]) as usize + 1,
        }
    }

    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        // Counts are range-checked on construction, so both narrowings are lossless.
        let cols_minus1 = (self.column_count - 1) as u8;
        let rows_minus1 = ((self.row_count - 1) as u16).to_le_bytes();
        [cols_minus1, rows_minus1[0], rows_minus1[1]]
    }

    pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Self, DecodeArrayError> {
        let mut bytes = [0u8; HEADER_LEN];
        bytes.copy_from_slice(cursor.read_bytes(HEADER_LEN)?);
        Ok(Self::from_bytes(bytes))
    }

    pub fn write(&self, sink: &mut ByteSink<'_>) -> Result<(), EncodeArrayError> {
        sink.write_bytes(&self.to_bytes())
    }
}
