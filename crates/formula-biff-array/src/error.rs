use thiserror::Error;

/// Structured failure while decoding an array-constant block.
///
/// Every variant that relates to a position in the input carries the byte offset (relative to the
/// start of the buffer handed to the cursor) so corrupt inputs are actionable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeArrayError {
    /// Not enough bytes remained to decode the current field.
    #[error("corrupt array constant: unexpected eof at offset {offset} (needed {needed} bytes, remaining {remaining})")]
    UnexpectedEof {
        offset: usize,
        needed: usize,
        remaining: usize,
    },
    /// The value discriminant is not one of the `SerAr` kinds.
    #[error("corrupt array constant: unknown value discriminant 0x{value:02X} at offset {offset}")]
    UnknownDiscriminant { offset: usize, value: u8 },
    /// A `SerErr` entry carried a byte that is not a BIFF8 error code.
    #[error("corrupt array constant: invalid error code 0x{code:02X} at offset {offset}")]
    InvalidErrorCode { offset: usize, code: u8 },
    /// A `SerStr` entry set rich-text / ext-string flags, which array constants never use.
    #[error("corrupt array constant: unsupported string flags 0x{flags:02X} at offset {offset}")]
    InvalidTextFlags { offset: usize, flags: u8 },
    /// Strict decoding only: an unused byte of a fixed-size entry was not zero.
    #[error("corrupt array constant: non-zero padding at offset {offset}")]
    NonZeroPadding { offset: usize },
    /// Strict decoding only: a `SerBool` byte other than 0 or 1.
    #[error("corrupt array constant: boolean byte 0x{value:02X} at offset {offset} is not 0 or 1")]
    NonCanonicalBoolean { offset: usize, value: u8 },
    /// The header declared more cells than the configured limit.
    #[error("corrupt array constant: {cells} cells exceeds the limit of {max}")]
    TooManyCells { cells: usize, max: usize },
}

impl DecodeArrayError {
    /// Byte offset of the failure, if the error is tied to a position in the input.
    pub fn offset(&self) -> Option<usize> {
        match *self {
            DecodeArrayError::UnexpectedEof { offset, .. }
            | DecodeArrayError::UnknownDiscriminant { offset, .. }
            | DecodeArrayError::InvalidErrorCode { offset, .. }
            | DecodeArrayError::InvalidTextFlags { offset, .. }
            | DecodeArrayError::NonZeroPadding { offset }
            | DecodeArrayError::NonCanonicalBoolean { offset, .. } => Some(offset),
            DecodeArrayError::TooManyCells { .. } => None,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeArrayError {
    #[error("output buffer too small: needed {needed} bytes at offset {offset}, {available} available")]
    BufferTooSmall {
        offset: usize,
        needed: usize,
        available: usize,
    },
    /// BIFF8 strings store their length in a u16.
    #[error("text constant too long: {len} characters (max 65535)")]
    TextTooLong { len: usize },
}

/// Rejected array shape (zero or out-of-range counts, ragged rows, length mismatch).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ArrayConstantError {
    #[error("invalid array constant shape: {0}")]
    Shape(String),
}
