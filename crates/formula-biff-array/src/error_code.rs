//! BIFF8 error constants (`BErr`).
//!
//! Array constants store an error value as a single byte code. BIFF8 only defines the seven
//! legacy Excel errors; newer literals such as `#SPILL!` or `#GETTING_DATA` have no BIFF8 code and
//! cannot appear in an `.xls` array constant.
//!
//! | Code | Literal |
//! |------|---------|
//! | 0x00 | `#NULL!` |
//! | 0x07 | `#DIV/0!` |
//! | 0x0F | `#VALUE!` |
//! | 0x17 | `#REF!` |
//! | 0x1D | `#NAME?` |
//! | 0x24 | `#NUM!` |
//! | 0x2A | `#N/A` |

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Null,
    Div0,
    Value,
    Ref,
    Name,
    Num,
    NA,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 7] = [
        ErrorCode::Null,
        ErrorCode::Div0,
        ErrorCode::Value,
        ErrorCode::Ref,
        ErrorCode::Name,
        ErrorCode::Num,
        ErrorCode::NA,
    ];

    pub fn from_code(code: u8) -> Option<ErrorCode> {
        match code {
            0x00 => Some(ErrorCode::Null),
            0x07 => Some(ErrorCode::Div0),
            0x0F => Some(ErrorCode::Value),
            0x17 => Some(ErrorCode::Ref),
            0x1D => Some(ErrorCode::Name),
            0x24 => Some(ErrorCode::Num),
            0x2A => Some(ErrorCode::NA),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            ErrorCode::Null => 0x00,
            ErrorCode::Div0 => 0x07,
            ErrorCode::Value => 0x0F,
            ErrorCode::Ref => 0x17,
            ErrorCode::Name => 0x1D,
            ErrorCode::Num => 0x24,
            ErrorCode::NA => 0x2A,
        }
    }

    pub fn as_literal(self) -> &'static str {
        match self {
            ErrorCode::Null => "#NULL!",
            ErrorCode::Div0 => "#DIV/0!",
            ErrorCode::Value => "#VALUE!",
            ErrorCode::Ref => "#REF!",
            ErrorCode::Name => "#NAME?",
            ErrorCode::Num => "#NUM!",
            ErrorCode::NA => "#N/A",
        }
    }

    /// Parse an Excel error literal. Matching is case-insensitive; `#N/A!` is accepted for `#N/A`.
    pub fn from_literal(literal: &str) -> Option<ErrorCode> {
        match literal.trim().to_ascii_uppercase().as_str() {
            "#NULL!" => Some(ErrorCode::Null),
            "#DIV/0!" => Some(ErrorCode::Div0),
            "#VALUE!" => Some(ErrorCode::Value),
            "#REF!" => Some(ErrorCode::Ref),
            "#NAME?" => Some(ErrorCode::Name),
            "#NUM!" => Some(ErrorCode::Num),
            "#N/A" | "#N/A!" => Some(ErrorCode::NA),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_literal())
    }
}
