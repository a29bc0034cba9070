//! Token and node kinds, plus the fixed facts tables the scanner and parser
//! share: keyword recognition, operator precedences, and operator spellings.

use std::fmt;

/// Every kind of token the scanner can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    // Tokens
    BadToken,
    EndOfFileToken,
    NumberToken,
    StringToken,
    IdentifierToken,
    PlusToken,
    MinusToken,
    StarToken,
    SlashToken,
    BangToken,
    EqualsToken,
    TildeToken,
    HatToken,
    AmpersandToken,
    AmpersandAmpersandToken,
    PipeToken,
    PipePipeToken,
    EqualsEqualsToken,
    BangEqualsToken,
    LessToken,
    LessOrEqualsToken,
    GreaterToken,
    GreaterOrEqualsToken,
    OpenParenToken,
    CloseParenToken,
    OpenBraceToken,
    CloseBraceToken,
    ColonToken,
    CommaToken,

    // Keywords
    TrueKeyword,
    FalseKeyword,
    VarKeyword,
    LetKeyword,
    IfKeyword,
    ElseKeyword,
    WhileKeyword,
    DoKeyword,
    ForKeyword,
    ToKeyword,
    BreakKeyword,
    ContinueKeyword,
    FunctionKeyword,
    ReturnKeyword,
}

impl SyntaxKind {
    /// The fixed spelling of this kind, if it has one (operators, keywords,
    /// punctuation). Literal and identifier tokens have none.
    pub fn fixed_text(self) -> Option<&'static str> {
        use SyntaxKind::*;
        match self {
            PlusToken => Some("+"),
            MinusToken => Some("-"),
            StarToken => Some("*"),
            SlashToken => Some("/"),
            BangToken => Some("!"),
            EqualsToken => Some("="),
            TildeToken => Some("~"),
            HatToken => Some("^"),
            AmpersandToken => Some("&"),
            AmpersandAmpersandToken => Some("&&"),
            PipeToken => Some("|"),
            PipePipeToken => Some("||"),
            EqualsEqualsToken => Some("=="),
            BangEqualsToken => Some("!="),
            LessToken => Some("<"),
            LessOrEqualsToken => Some("<="),
            GreaterToken => Some(">"),
            GreaterOrEqualsToken => Some(">="),
            OpenParenToken => Some("("),
            CloseParenToken => Some(")"),
            OpenBraceToken => Some("{"),
            CloseBraceToken => Some("}"),
            ColonToken => Some(":"),
            CommaToken => Some(","),
            TrueKeyword => Some("true"),
            FalseKeyword => Some("false"),
            VarKeyword => Some("var"),
            LetKeyword => Some("let"),
            IfKeyword => Some("if"),
            ElseKeyword => Some("else"),
            WhileKeyword => Some("while"),
            DoKeyword => Some("do"),
            ForKeyword => Some("for"),
            ToKeyword => Some("to"),
            BreakKeyword => Some("break"),
            ContinueKeyword => Some("continue"),
            FunctionKeyword => Some("function"),
            ReturnKeyword => Some("return"),
            _ => None,
        }
    }
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

pub mod syntax_facts {
    use super::SyntaxKind;
    use super::SyntaxKind::*;

    /// Precedence of a prefix operator, or 0 if the kind is not one.
    pub fn unary_operator_precedence(kind: SyntaxKind) -> u8 {
        match kind {
            PlusToken | MinusToken | BangToken | TildeToken => 6,
            _ => 0,
        }
    }

    /// Precedence of an infix operator, or 0 if the kind is not one.
    /// Higher binds tighter.
    pub fn binary_operator_precedence(kind: SyntaxKind) -> u8 {
        match kind {
            StarToken | SlashToken => 5,
            PlusToken | MinusToken => 4,
            EqualsEqualsToken | BangEqualsToken | LessToken | LessOrEqualsToken
            | GreaterToken | GreaterOrEqualsToken => 3,
            AmpersandToken | AmpersandAmpersandToken => 2,
            PipeToken | PipePipeToken | HatToken => 1,
            _ => 0,
        }
    }

    /// Map identifier text to a keyword kind, if it is one.
    pub fn keyword_kind(text: &str) -> Option<SyntaxKind> {
        match text {
            "true" => Some(TrueKeyword),
            "false" => Some(FalseKeyword),
            "var" => Some(VarKeyword),
            "let" => Some(LetKeyword),
            "if" => Some(IfKeyword),
            "else" => Some(ElseKeyword),
            "while" => Some(WhileKeyword),
            "do" => Some(DoKeyword),
            "for" => Some(ForKeyword),
            "to" => Some(ToKeyword),
            "break" => Some(BreakKeyword),
            "continue" => Some(ContinueKeyword),
            "function" => Some(FunctionKeyword),
            "return" => Some(ReturnKeyword),
            _ => None,
        }
    }
}
