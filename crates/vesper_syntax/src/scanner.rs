//! The Vesper scanner.
//!
//! Converts source text into a token stream. Whitespace and comments are
//! consumed as trivia and never surface as tokens. Scanning never fails:
//! malformed input produces diagnostics plus best-effort tokens so the
//! parser always sees a terminated stream.

use crate::syntax_kind::{syntax_facts, SyntaxKind};
use crate::token::{Token, TokenValue};
use vesper_core::intern::StringInterner;
use vesper_core::text::{SourceText, TextSpan};
use vesper_diagnostics::{messages, DiagnosticCollection};

pub struct Scanner<'s> {
    text: &'s str,
    bytes: &'s [u8],
    /// Current byte position.
    pos: usize,
    /// Start of the current token.
    token_start: usize,
    interner: StringInterner,
    diagnostics: DiagnosticCollection,
}

impl<'s> Scanner<'s> {
    pub fn new(source: &'s SourceText, interner: StringInterner) -> Self {
        Self {
            text: source.text(),
            bytes: source.text().as_bytes(),
            pos: 0,
            token_start: 0,
            interner,
            diagnostics: DiagnosticCollection::new(),
        }
    }

    pub fn take_diagnostics(&mut self) -> DiagnosticCollection {
        std::mem::take(&mut self.diagnostics)
    }

    /// Scan the whole source. The returned stream always ends with a single
    /// `EndOfFileToken`.
    pub fn scan_all(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token.kind == SyntaxKind::EndOfFileToken;
            tokens.push(token);
            if done {
                break;
            }
        }
        tokens
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn current(&self) -> u8 {
        if self.is_eof() {
            0
        } else {
            self.bytes[self.pos]
        }
    }

    fn lookahead(&self) -> u8 {
        if self.pos + 1 >= self.bytes.len() {
            0
        } else {
            self.bytes[self.pos + 1]
        }
    }

    fn token_span(&self) -> TextSpan {
        TextSpan::from_bounds(self.token_start as u32, self.pos as u32)
    }

    fn token_text(&self) -> &'s str {
        &self.text[self.token_start..self.pos]
    }

    fn fixed(&mut self, kind: SyntaxKind, len: usize) -> Token {
        self.pos += len;
        let text = self
            .interner
            .intern_static(kind.fixed_text().unwrap_or(""));
        Token::new(kind, self.token_span(), text, TokenValue::None)
    }

    fn next_token(&mut self) -> Token {
        self.skip_trivia();
        self.token_start = self.pos;

        if self.is_eof() {
            let text = self.interner.intern_static("");
            return Token::new(
                SyntaxKind::EndOfFileToken,
                TextSpan::empty(self.pos as u32),
                text,
                TokenValue::None,
            );
        }

        match self.current() {
            b'+' => self.fixed(SyntaxKind::PlusToken, 1),
            b'-' => self.fixed(SyntaxKind::MinusToken, 1),
            b'*' => self.fixed(SyntaxKind::StarToken, 1),
            b'/' => self.fixed(SyntaxKind::SlashToken, 1),
            b'~' => self.fixed(SyntaxKind::TildeToken, 1),
            b'^' => self.fixed(SyntaxKind::HatToken, 1),
            b'(' => self.fixed(SyntaxKind::OpenParenToken, 1),
            b')' => self.fixed(SyntaxKind::CloseParenToken, 1),
            b'{' => self.fixed(SyntaxKind::OpenBraceToken, 1),
            b'}' => self.fixed(SyntaxKind::CloseBraceToken, 1),
            b':' => self.fixed(SyntaxKind::ColonToken, 1),
            b',' => self.fixed(SyntaxKind::CommaToken, 1),
            b'&' => {
                if self.lookahead() == b'&' {
                    self.fixed(SyntaxKind::AmpersandAmpersandToken, 2)
                } else {
                    self.fixed(SyntaxKind::AmpersandToken, 1)
                }
            }
            b'|' => {
                if self.lookahead() == b'|' {
                    self.fixed(SyntaxKind::PipePipeToken, 2)
                } else {
                    self.fixed(SyntaxKind::PipeToken, 1)
                }
            }
            b'=' => {
                if self.lookahead() == b'=' {
                    self.fixed(SyntaxKind::EqualsEqualsToken, 2)
                } else {
                    self.fixed(SyntaxKind::EqualsToken, 1)
                }
            }
            b'!' => {
                if self.lookahead() == b'=' {
                    self.fixed(SyntaxKind::BangEqualsToken, 2)
                } else {
                    self.fixed(SyntaxKind::BangToken, 1)
                }
            }
            b'<' => {
                if self.lookahead() == b'=' {
                    self.fixed(SyntaxKind::LessOrEqualsToken, 2)
                } else {
                    self.fixed(SyntaxKind::LessToken, 1)
                }
            }
            b'>' => {
                if self.lookahead() == b'=' {
                    self.fixed(SyntaxKind::GreaterOrEqualsToken, 2)
                } else {
                    self.fixed(SyntaxKind::GreaterToken, 1)
                }
            }
            b'"' => self.scan_string(),
            b'0'..=b'9' => self.scan_number(),
            c if c == b'_' || c.is_ascii_alphabetic() => self.scan_identifier_or_keyword(),
            _ => self.scan_bad_character(),
        }
    }

    fn skip_trivia(&mut self) {
        loop {
            if self.is_eof() {
                return;
            }
            match self.current() {
                c if c.is_ascii_whitespace() => {
                    self.pos += 1;
                }
                b'/' if self.lookahead() == b'/' => {
                    while !self.is_eof() && self.current() != b'\n' {
                        self.pos += 1;
                    }
                }
                b'/' if self.lookahead() == b'*' => self.skip_multiline_comment(),
                _ => return,
            }
        }
    }

    fn skip_multiline_comment(&mut self) {
        let start = self.pos as u32;
        self.pos += 2;
        loop {
            if self.is_eof() {
                self.diagnostics.report(
                    TextSpan::new(start, 2),
                    &messages::UNTERMINATED_MULTILINE_COMMENT,
                    &[],
                );
                return;
            }
            if self.current() == b'*' && self.lookahead() == b'/' {
                self.pos += 2;
                return;
            }
            self.pos += 1;
        }
    }

    fn scan_number(&mut self) -> Token {
        while self.current().is_ascii_digit() {
            self.pos += 1;
        }
        let text = self.token_text();
        let value = match text.parse::<i64>() {
            Ok(value) => value,
            Err(_) => {
                self.diagnostics
                    .report(self.token_span(), &messages::INVALID_INT_LITERAL, &[text]);
                0
            }
        };
        let interned = self.interner.intern(text);
        Token::new(
            SyntaxKind::NumberToken,
            self.token_span(),
            interned,
            TokenValue::Int(value),
        )
    }

    fn scan_identifier_or_keyword(&mut self) -> Token {
        while self.current() == b'_' || self.current().is_ascii_alphanumeric() {
            self.pos += 1;
        }
        let text = self.token_text();
        let kind = syntax_facts::keyword_kind(text).unwrap_or(SyntaxKind::IdentifierToken);
        let interned = self.interner.intern(text);
        Token::new(kind, self.token_span(), interned, TokenValue::None)
    }

    /// Strings are `"..."`; a doubled quote (`""`) inside escapes a quote.
    fn scan_string(&mut self) -> Token {
        self.pos += 1;
        let mut value = Vec::new();
        loop {
            if self.is_eof() || self.current() == b'\n' || self.current() == b'\r' {
                self.diagnostics.report(
                    TextSpan::new(self.token_start as u32, 1),
                    &messages::UNTERMINATED_STRING_LITERAL,
                    &[],
                );
                break;
            }
            if self.current() == b'"' {
                if self.lookahead() == b'"' {
                    value.push(b'"');
                    self.pos += 2;
                } else {
                    self.pos += 1;
                    break;
                }
            } else {
                value.push(self.current());
                self.pos += 1;
            }
        }
        // The bytes came straight out of valid UTF-8 source, split only at
        // ASCII quotes.
        let cooked = String::from_utf8_lossy(&value).into_owned();
        let cooked = self.interner.intern(&cooked);
        let raw = self.interner.intern(self.token_text());
        Token::new(
            SyntaxKind::StringToken,
            self.token_span(),
            raw,
            TokenValue::String(cooked),
        )
    }

    fn scan_bad_character(&mut self) -> Token {
        // Step over one whole character, not one byte.
        let ch = self.text[self.pos..].chars().next().unwrap_or('\u{FFFD}');
        self.pos += ch.len_utf8();
        self.diagnostics.report(
            self.token_span(),
            &messages::BAD_CHARACTER,
            &[&ch.to_string()],
        );
        let text = self.interner.intern(self.token_text());
        Token::new(SyntaxKind::BadToken, self.token_span(), text, TokenValue::None)
    }
}
