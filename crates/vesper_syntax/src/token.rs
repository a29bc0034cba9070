//! Tokens produced by the scanner.
//!
//! Tokens are plain `Copy` values; their text lives in the interner, never
//! in the token itself, so they can be stored in arena-allocated node slices.

use crate::syntax_kind::SyntaxKind;
use vesper_core::intern::InternedString;
use vesper_core::text::TextSpan;

/// The cooked value of a literal token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenValue {
    None,
    Int(i64),
    String(InternedString),
}

/// A single token: kind, source span, interned text, cooked value.
#[derive(Debug, Clone, Copy)]
pub struct Token {
    pub kind: SyntaxKind,
    pub span: TextSpan,
    /// The raw text of the token (for identifiers, the identifier itself).
    pub text: InternedString,
    pub value: TokenValue,
    /// True for tokens manufactured by the parser during error recovery.
    pub is_missing: bool,
}

impl Token {
    pub fn new(kind: SyntaxKind, span: TextSpan, text: InternedString, value: TokenValue) -> Self {
        Self {
            kind,
            span,
            text,
            value,
            is_missing: false,
        }
    }

    /// A zero-width token inserted where the parser expected one.
    pub fn missing(kind: SyntaxKind, pos: u32, text: InternedString) -> Self {
        Self {
            kind,
            span: TextSpan::empty(pos),
            text,
            value: TokenValue::None,
            is_missing: true,
        }
    }
}
