//! Error codes for catalogue diagnostics.
//!
//! Codes are grouped by phase:
//! - `E0xx` - Lexer errors
//! - `E1xx` - Literal syntax errors
//! - `E2xx` - Catalogue shape errors

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Lexer Errors (E0xx)
    // =========================================================================
    /// Unterminated string literal.
    E001,

    /// Unexpected character.
    E002,

    /// Invalid escape sequence.
    ///
    /// Valid escapes are: `\n`, `\r`, `\t`, `\b`, `\f`, `\\`, `\/`, `\'`, `\"`,
    /// `\0`, `\uXXXX` and `\u{...}`.
    E003,

    /// Invalid unicode escape (bad format or codepoint out of range).
    E004,

    /// Unterminated block comment.
    E005,

    // =========================================================================
    // Syntax Errors (E1xx)
    // =========================================================================
    /// Unexpected token.
    E100,

    /// The input ended before the literal was complete.
    E101,

    /// No `export const <binding> =` declaration was found.
    E102,

    // =========================================================================
    // Shape Errors (E2xx)
    // =========================================================================
    /// A required field is missing.
    E200,

    /// A value has the wrong type.
    E201,

    /// A transition or `initialState` names a state that is not declared.
    E202,

    /// The same key appears twice in one object.
    E203,
}

impl ErrorCode {
    /// Short description, used as the default label text.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "unterminated string literal",
            ErrorCode::E002 => "unexpected character",
            ErrorCode::E003 => "invalid escape sequence",
            ErrorCode::E004 => "invalid unicode escape",
            ErrorCode::E005 => "unterminated block comment",
            ErrorCode::E100 => "unexpected token",
            ErrorCode::E101 => "unexpected end of input",
            ErrorCode::E102 => "catalogue declaration not found",
            ErrorCode::E200 => "missing field",
            ErrorCode::E201 => "wrong value type",
            ErrorCode::E202 => "unknown state",
            ErrorCode::E203 => "duplicate key",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
