//! Array element values (`SerAr`, [MS-XLS] 2.5.224) and their wire codec.
//!
//! Every element starts with a one-byte discriminant:
//!
//! | disc | kind | payload | size |
//! |------|------|---------|------|
//! | 0x00 | blank (`SerNil`) | 8 unused bytes | 9 |
//! | 0x01 | number (`SerNum`) | f64 | 9 |
//! | 0x02 | text (`SerStr`) | `[cch: u16][flags: u8][chars]` | 4 + cch (or 4 + 2·cch) |
//! | 0x04 | boolean (`SerBool`) | `[f: u8]` + 7 unused bytes | 9 |
//! | 0x10 | error (`SerErr`) | `[err: u8]` + 7 unused bytes | 9 |
//!
//! Unused bytes are written as zero. Text uses the BIFF8 `XLUnicodeString` layout: characters are
//! stored "compressed" (one Latin-1 byte each) unless `fHighByte` is set, in which case they are
//! UTF-16LE code units.
//!
//! [`ConstantValue::Text`] is written compressed whenever every char fits in Latin-1. UTF-16 text
//! that would not come back out in the same form (Latin-1-only text, or code units that are not
//! well-formed UTF-16) decodes as [`ConstantValue::WideText`] and is written back unit for unit.

use std::borrow::Cow;
use std::fmt;

use crate::cursor::{ByteCursor, ByteSink};
use crate::error::{DecodeArrayError, EncodeArrayError};
use crate::error_code::ErrorCode;
use crate::options::DecodeOptions;

pub const DISC_BLANK: u8 = 0x00;
pub const DISC_NUMBER: u8 = 0x01;
pub const DISC_TEXT: u8 = 0x02;
pub const DISC_BOOLEAN: u8 = 0x04;
pub const DISC_ERROR: u8 = 0x10;

/// Size of every non-text entry, discriminant included.
pub const FIXED_ENTRY_LEN: usize = 9;
/// Smallest possible entry (an empty string).
pub const MIN_ENTRY_LEN: usize = 4;

const STR_FLAG_HIGH_BYTE: u8 = 0x01;

#[derive(Clone, Debug, PartialEq)]
pub enum ConstantValue {
    Blank,
    Number(f64),
    Text(String),
    /// `fHighByte` text kept as the raw UTF-16 code units it was stored with.
    WideText(Vec<u16>),
    Boolean(bool),
    Error(ErrorCode),
}

impl ConstantValue {
    pub fn discriminant(&self) -> u8 {
        match self {
            ConstantValue::Blank => DISC_BLANK,
            ConstantValue::Number(_) => DISC_NUMBER,
            ConstantValue::Text(_) | ConstantValue::WideText(_) => DISC_TEXT,
            ConstantValue::Boolean(_) => DISC_BOOLEAN,
            ConstantValue::Error(_) => DISC_ERROR,
        }
    }

    /// String content of a text element. Unpaired surrogates in [`ConstantValue::WideText`]
    /// become U+FFFD.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            ConstantValue::Text(s) => Some(Cow::Borrowed(s)),
            ConstantValue::WideText(units) => Some(Cow::Owned(String::from_utf16_lossy(units))),
            _ => None,
        }
    }

    /// Number of bytes [`ConstantValue::write`] will produce.
    pub fn encoded_len(&self) -> usize {
        match self {
            ConstantValue::Text(s) => match TextForm::of(s) {
                TextForm::Compressed(cch) => MIN_ENTRY_LEN + cch,
                TextForm::Wide(units) => MIN_ENTRY_LEN + units.len() * 2,
            },
            ConstantValue::WideText(units) => MIN_ENTRY_LEN + units.len() * 2,
            _ => FIXED_ENTRY_LEN,
        }
    }

    pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Self, DecodeArrayError> {
        Self::read_with_options(cursor, &DecodeOptions::default())
    }

    pub fn read_with_options(
        cursor: &mut ByteCursor<'_>,
        options: &DecodeOptions,
    ) -> Result<Self, DecodeArrayError> {
        let offset = cursor.position();
        let disc = cursor.read_u8()?;
        match disc {
            DISC_BLANK => {
                read_unused(cursor, 8, options)?;
                Ok(ConstantValue::Blank)
            }
            DISC_NUMBER => Ok(ConstantValue::Number(cursor.read_f64_le()?)),
            DISC_TEXT => read_text(cursor),
            DISC_BOOLEAN => {
                let f = cursor.read_u8()?;
                if f > 1 {
                    if options.strict_padding {
                        return Err(DecodeArrayError::NonCanonicalBoolean {
                            offset: offset + 1,
                            value: f,
                        });
                    }
                    log::debug!("non-canonical boolean byte 0x{f:02X} at offset {}", offset + 1);
                }
                read_unused(cursor, 7, options)?;
                Ok(ConstantValue::Boolean(f != 0))
            }
            DISC_ERROR => {
                let code_offset = cursor.position();
                let code = cursor.read_u8()?;
                let err = ErrorCode::from_code(code).ok_or(DecodeArrayError::InvalidErrorCode {
                    offset: code_offset,
                    code,
                })?;
                read_unused(cursor, 7, options)?;
                Ok(ConstantValue::Error(err))
            }
            value => Err(DecodeArrayError::UnknownDiscriminant { offset, value }),
        }
    }

    pub fn write(&self, sink: &mut ByteSink<'_>) -> Result<(), EncodeArrayError> {
        // Build the whole entry first so a short buffer never receives a partial entry.
        let mut entry = Vec::with_capacity(self.encoded_len());
        entry.push(self.discriminant());
        match self {
            ConstantValue::Blank => entry.extend_from_slice(&[0u8; 8]),
            ConstantValue::Number(n) => entry.extend_from_slice(&n.to_le_bytes()),
            ConstantValue::Text(s) => push_text(&mut entry, s)?,
            ConstantValue::WideText(units) => push_wide(&mut entry, units)?,
            ConstantValue::Boolean(b) => {
                entry.push(u8::from(*b));
                entry.extend_from_slice(&[0u8; 7]);
            }
            ConstantValue::Error(err) => {
                entry.push(err.code());
                entry.extend_from_slice(&[0u8; 7]);
            }
        }
        sink.write_bytes(&entry)
    }
}

enum TextForm {
    /// Every char is <= U+00FF; holds the char count.
    Compressed(usize),
    Wide(Vec<u16>),
}

impl TextForm {
    fn of(s: &str) -> Self {
        if is_latin1(s) {
            TextForm::Compressed(s.chars().count())
        } else {
            TextForm::Wide(s.encode_utf16().collect())
        }
    }
}

fn is_latin1(s: &str) -> bool {
    s.chars().all(|c| (c as u32) <= 0xFF)
}

fn cch(len: usize) -> Result<[u8; 2], EncodeArrayError> {
    u16::try_from(len)
        .map(u16::to_le_bytes)
        .map_err(|_| EncodeArrayError::TextTooLong { len })
}

fn push_text(out: &mut Vec<u8>, s: &str) -> Result<(), EncodeArrayError> {
    match TextForm::of(s) {
        TextForm::Compressed(len) => {
            out.extend_from_slice(&cch(len)?);
            out.push(0);
            out.extend(s.chars().map(|c| c as u32 as u8));
            Ok(())
        }
        TextForm::Wide(units) => push_wide(out, &units),
    }
}

fn push_wide(out: &mut Vec<u8>, units: &[u16]) -> Result<(), EncodeArrayError> {
    out.extend_from_slice(&cch(units.len())?);
    out.push(STR_FLAG_HIGH_BYTE);
    for unit in units {
        out.extend_from_slice(&unit.to_le_bytes());
    }
    Ok(())
}

fn read_text(cursor: &mut ByteCursor<'_>) -> Result<ConstantValue, DecodeArrayError> {
    let cch = cursor.read_u16_le()? as usize;
    let flags_offset = cursor.position();
    let flags = cursor.read_u8()?;
    if flags & !STR_FLAG_HIGH_BYTE != 0 {
        return Err(DecodeArrayError::InvalidTextFlags {
            offset: flags_offset,
            flags,
        });
    }

    if flags & STR_FLAG_HIGH_BYTE == 0 {
        let raw = cursor.read_bytes(cch)?;
        return Ok(ConstantValue::Text(raw.iter().copied().map(char::from).collect()));
    }

    let raw = cursor.read_bytes(cch * 2)?;
    let units: Vec<u16> = raw
        .chunks_exact(2)
        .map(|chunk| u16::from_le_bytes([chunk[0], chunk[1]]))
        .collect();
    match String::from_utf16(&units) {
        Ok(s) if !is_latin1(&s) => Ok(ConstantValue::Text(s)),
        Ok(_) => Ok(ConstantValue::WideText(units)),
        Err(_) => {
            log::debug!("unpaired surrogate in text at offset {flags_offset}; keeping code units");
            Ok(ConstantValue::WideText(units))
        }
    }
}

fn read_unused(
    cursor: &mut ByteCursor<'_>,
    n: usize,
    options: &DecodeOptions,
) -> Result<(), DecodeArrayError> {
    let start = cursor.position();
    let bytes = cursor.read_bytes(n)?;
    if let Some(idx) = bytes.iter().position(|&b| b != 0) {
        if options.strict_padding {
            return Err(DecodeArrayError::NonZeroPadding { offset: start + idx });
        }
        log::debug!(
            "ignoring non-zero padding at offset {}; entry will not re-encode byte-identically",
            start + idx
        );
    }
    Ok(())
}

impl From<f64> for ConstantValue {
    fn from(value: f64) -> Self {
        ConstantValue::Number(value)
    }
}

impl From<bool> for ConstantValue {
    fn from(value: bool) -> Self {
        ConstantValue::Boolean(value)
    }
}

impl From<String> for ConstantValue {
    fn from(value: String) -> Self {
        ConstantValue::Text(value)
    }
}

impl From<&str> for ConstantValue {
    fn from(value: &str) -> Self {
        ConstantValue::Text(value.to_string())
    }
}

impl From<ErrorCode> for ConstantValue {
    fn from(value: ErrorCode) -> Self {
        ConstantValue::Error(value)
    }
}

/// Formula-literal text of a single element (`"a""b"`, `TRUE`, `#N/A`, blank as empty).
///
/// A formula literal cannot spell NaN or infinity, so non-finite numbers render as `#NUM!`.
impl fmt::Display for ConstantValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstantValue::Blank => Ok(()),
            ConstantValue::Number(n) if !n.is_finite() => f.write_str(ErrorCode::Num.as_literal()),
            ConstantValue::Number(n) => write!(f, "{n}"),
            ConstantValue::Text(s) => write_quoted(f, s),
            ConstantValue::WideText(units) => write_quoted(f, &String::from_utf16_lossy(units)),
            ConstantValue::Boolean(b) => f.write_str(if *b { "TRUE" } else { "FALSE" }),
            ConstantValue::Error(err) => f.write_str(err.as_literal()),
        }
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    write!(f, "\"{}\"", s.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn decode(bytes: &[u8]) -> (ConstantValue, usize) {
        let mut cursor = ByteCursor::new(bytes);
        let value = ConstantValue::read(&mut cursor).expect("decode value");
        (value, cursor.position())
    }

    fn encode(value: &ConstantValue) -> Vec<u8> {
        let mut buf = vec![0xEE; value.encoded_len()];
        let mut sink = ByteSink::new(&mut buf, 0);
        value.write(&mut sink).expect("encode value");
        assert_eq!(sink.written(), buf.len());
        buf
    }

    #[test]
    fn decodes_boolean_true() {
        let (value, used) = decode(&[0x04, 0x01, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(value, ConstantValue::Boolean(true));
        assert_eq!(used, 9);
    }

    #[test]
    fn decodes_compressed_text() {
        let (value, used) = decode(&[0x02, 0x04, 0x00, 0x00, 0x41, 0x42, 0x43, 0x44]);
        assert_eq!(value, ConstantValue::Text("ABCD".to_string()));
        assert_eq!(used, 8);
    }

    #[test]
    fn decodes_number_zero() {
        let (value, used) = decode(&[0x01, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(value, ConstantValue::Number(0.0));
        assert_eq!(used, 9);
    }

    #[test]
    fn decodes_error_and_blank() {
        let (value, _) = decode(&[0x10, 0x07, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(value, ConstantValue::Error(ErrorCode::Div0));
        let (value, used) = decode(&[0x00, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(value, ConstantValue::Blank);
        assert_eq!(used, 9);
    }

    #[test]
    fn nonzero_boolean_byte_is_true_and_reencodes_canonically() {
        let (value, _) = decode(&[0x04, 0x02, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(value, ConstantValue::Boolean(true));
        assert_eq!(encode(&value), vec![0x04, 0x01, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn encodes_scalars_with_zeroed_padding() {
        assert_eq!(
            encode(&ConstantValue::Boolean(false)),
            vec![0x04, 0, 0, 0, 0, 0, 0, 0, 0]
        );
        assert_eq!(
            encode(&ConstantValue::Error(ErrorCode::NA)),
            vec![0x10, 0x2A, 0, 0, 0, 0, 0, 0, 0]
        );
        assert_eq!(encode(&ConstantValue::Blank), vec![0u8; 9]);

        let mut expected = vec![0x01];
        expected.extend_from_slice(&1.5f64.to_le_bytes());
        assert_eq!(encode(&ConstantValue::Number(1.5)), expected);
    }

    #[test]
    fn text_outside_latin1_uses_utf16() {
        let value = ConstantValue::from("a\u{20AC}");
        let bytes = encode(&value);
        assert_eq!(bytes, vec![0x02, 0x02, 0x00, 0x01, 0x61, 0x00, 0xAC, 0x20]);
        assert_eq!(decode(&bytes), (value, 8));
    }

    #[test]
    fn latin1_text_stored_as_utf16_keeps_its_form() {
        // "A" with fHighByte set, as some writers emit it.
        let bytes = [0x02, 0x01, 0x00, 0x01, 0x41, 0x00];
        let (value, used) = decode(&bytes);
        assert_eq!(value, ConstantValue::WideText(vec![0x0041]));
        assert_eq!(used, 6);
        assert_eq!(value.as_text().as_deref(), Some("A"));
        assert_eq!(value.to_string(), "\"A\"");
        assert_eq!(encode(&value), bytes.to_vec());
    }

    #[test]
    fn unpaired_surrogate_survives_reencoding() {
        let bytes = [0x02, 0x01, 0x00, 0x01, 0x00, 0xD8];
        let (value, _) = decode(&bytes);
        assert_eq!(value, ConstantValue::WideText(vec![0xD800]));
        assert_eq!(encode(&value), bytes.to_vec());
        assert_eq!(value.to_string(), "\"\u{FFFD}\"");
    }

    #[test]
    fn latin1_text_stays_compressed() {
        let value = ConstantValue::from("\u{e9}t\u{e9}");
        let bytes = encode(&value);
        assert_eq!(bytes, vec![0x02, 0x03, 0x00, 0x00, 0xE9, 0x74, 0xE9]);
        assert_eq!(decode(&bytes).0, value);
    }

    #[test]
    fn unknown_discriminant_is_an_error() {
        let mut cursor = ByteCursor::new(&[0x03, 0, 0, 0, 0, 0, 0, 0, 0]);
        let err = ConstantValue::read(&mut cursor).unwrap_err();
        assert_eq!(
            err,
            DecodeArrayError::UnknownDiscriminant {
                offset: 0,
                value: 0x03
            }
        );
    }

    #[test]
    fn invalid_error_code_is_an_error() {
        let mut cursor = ByteCursor::new(&[0x10, 0x2B, 0, 0, 0, 0, 0, 0, 0]);
        let err = ConstantValue::read(&mut cursor).unwrap_err();
        assert_eq!(
            err,
            DecodeArrayError::InvalidErrorCode {
                offset: 1,
                code: 0x2B
            }
        );
    }

    #[test]
    fn rich_text_flags_are_rejected() {
        let mut cursor = ByteCursor::new(&[0x02, 0x01, 0x00, 0x08, 0x41]);
        let err = ConstantValue::read(&mut cursor).unwrap_err();
        assert_eq!(
            err,
            DecodeArrayError::InvalidTextFlags {
                offset: 3,
                flags: 0x08
            }
        );
    }

    #[test]
    fn text_length_past_end_is_eof() {
        let mut cursor = ByteCursor::new(&[0x02, 0x05, 0x00, 0x00, 0x41, 0x42]);
        let err = ConstantValue::read(&mut cursor).unwrap_err();
        assert_eq!(
            err,
            DecodeArrayError::UnexpectedEof {
                offset: 4,
                needed: 5,
                remaining: 2
            }
        );
    }

    #[test]
    fn strict_padding_rejects_garbage() {
        let bytes = [0x04, 0x01, 0, 0, 0xFF, 0, 0, 0, 0];
        let mut cursor = ByteCursor::new(&bytes);
        assert_eq!(
            ConstantValue::read(&mut cursor).unwrap(),
            ConstantValue::Boolean(true)
        );

        let strict = DecodeOptions::default().with_strict_padding(true);
        let mut cursor = ByteCursor::new(&bytes);
        let err = ConstantValue::read_with_options(&mut cursor, &strict).unwrap_err();
        assert_eq!(err, DecodeArrayError::NonZeroPadding { offset: 4 });
    }

    #[test]
    fn strict_decoding_rejects_non_canonical_boolean() {
        let bytes = [0x04, 0x02, 0, 0, 0, 0, 0, 0, 0];
        let strict = DecodeOptions::default().with_strict_padding(true);
        let mut cursor = ByteCursor::new(&bytes);
        let err = ConstantValue::read_with_options(&mut cursor, &strict).unwrap_err();
        assert_eq!(
            err,
            DecodeArrayError::NonCanonicalBoolean {
                offset: 1,
                value: 0x02
            }
        );
        assert_eq!(err.offset(), Some(1));
    }

    #[test]
    fn oversized_wide_text_is_rejected() {
        let value = ConstantValue::WideText(vec![0x0041; u16::MAX as usize + 1]);
        let mut buf = vec![0u8; value.encoded_len()];
        let err = value.write(&mut ByteSink::new(&mut buf, 0)).unwrap_err();
        assert_eq!(
            err,
            EncodeArrayError::TextTooLong {
                len: u16::MAX as usize + 1
            }
        );
    }

    #[test]
    fn oversized_text_is_rejected_before_writing() {
        let value = ConstantValue::Text("x".repeat(u16::MAX as usize + 1));
        let mut buf = vec![0u8; value.encoded_len()];
        let mut sink = ByteSink::new(&mut buf, 0);
        let err = value.write(&mut sink).unwrap_err();
        assert_eq!(
            err,
            EncodeArrayError::TextTooLong {
                len: u16::MAX as usize + 1
            }
        );
        assert_eq!(sink.written(), 0);
    }

    #[test]
    fn displays_as_formula_literals() {
        assert_eq!(ConstantValue::from("a\"b").to_string(), "\"a\"\"b\"");
        assert_eq!(ConstantValue::Number(0.0).to_string(), "0");
        assert_eq!(ConstantValue::Number(-2.5).to_string(), "-2.5");
        assert_eq!(ConstantValue::Boolean(false).to_string(), "FALSE");
        assert_eq!(ConstantValue::Error(ErrorCode::Ref).to_string(), "#REF!");
        assert_eq!(ConstantValue::Blank.to_string(), "");
    }

    #[test]
    fn non_finite_numbers_display_as_num_error() {
        assert_eq!(ConstantValue::Number(f64::NAN).to_string(), "#NUM!");
        assert_eq!(ConstantValue::Number(f64::INFINITY).to_string(), "#NUM!");
        assert_eq!(ConstantValue::Number(f64::NEG_INFINITY).to_string(), "#NUM!");
        assert_eq!(ConstantValue::Number(1e300).to_string(), format!("{}", 1e300));
    }
}
