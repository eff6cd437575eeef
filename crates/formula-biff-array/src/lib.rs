//! BIFF8 array-constant codec.
//!
//! A formula such as `SUM({1,2,3;4,5,6})` compiles to a `PtgArray` token in the `rgce` token
//! stream; the matrix itself is stored separately in the formula's trailing `rgcb` block:
//!
//! - a 3-byte header: `[cols_minus1: u8][rows_minus1: u16]`
//! - `rows × cols` serialized values, **column by column**
//!
//! This crate decodes and re-encodes that block byte-for-byte:
//! - [`ArrayConstant::read`] / [`ArrayConstant::decode`]: parse a block from a [`ByteCursor`]
//! - [`ArrayConstant::write_to`] / [`ArrayConstant::encode`]: serialize it back
//! - [`ArrayConstant::value_at`]: `(column, row)` access independent of storage order
//!
//! The surrounding token stream, the `PtgArray` token itself, and workbook context are the
//! caller's concern.

mod array;
mod cursor;
mod error;
mod error_code;
pub mod grid;
mod header;
mod options;
mod value;

pub use array::ArrayConstant;
pub use cursor::{ByteCursor, ByteSink};
pub use error::{ArrayConstantError, DecodeArrayError, EncodeArrayError};
pub use error_code::ErrorCode;
pub use header::{ArrayHeader, HEADER_LEN, MAX_COLUMNS, MAX_ROWS};
pub use options::{DecodeOptions, MAX_ARRAY_CELLS};
pub use value::{
    ConstantValue, DISC_BLANK, DISC_BOOLEAN, DISC_ERROR, DISC_NUMBER, DISC_TEXT, FIXED_ENTRY_LEN,
    MIN_ENTRY_LEN,
};
