//! The fixed operator tables.
//!
//! Operator resolution is a lookup keyed by (syntax operator kind, operand
//! type(s)). There is no overloading beyond what these tables list; a failed
//! lookup is a binder diagnostic.

use crate::ty::TypeSymbol;
use vesper_syntax::syntax_kind::SyntaxKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundUnaryOperatorKind {
    Identity,
    Negation,
    LogicalNegation,
    OnesComplement,
}

#[derive(Debug, Clone, Copy)]
pub struct BoundUnaryOperator {
    pub syntax_kind: SyntaxKind,
    pub kind: BoundUnaryOperatorKind,
    pub operand_type: TypeSymbol,
    pub result_type: TypeSymbol,
}

impl BoundUnaryOperator {
    const fn new(
        syntax_kind: SyntaxKind,
        kind: BoundUnaryOperatorKind,
        operand_type: TypeSymbol,
        result_type: TypeSymbol,
    ) -> Self {
        Self {
            syntax_kind,
            kind,
            operand_type,
            result_type,
        }
    }

    /// Resolve a unary operator for the given operand type.
    pub fn bind(
        syntax_kind: SyntaxKind,
        operand_type: TypeSymbol,
    ) -> Option<&'static BoundUnaryOperator> {
        UNARY_OPERATORS
            .iter()
            .find(|op| op.syntax_kind == syntax_kind && op.operand_type == operand_type)
    }
}

static UNARY_OPERATORS: &[BoundUnaryOperator] = &[
    BoundUnaryOperator::new(
        SyntaxKind::PlusToken,
        BoundUnaryOperatorKind::Identity,
        TypeSymbol::Int,
        TypeSymbol::Int,
    ),
    BoundUnaryOperator::new(
        SyntaxKind::MinusToken,
        BoundUnaryOperatorKind::Negation,
        TypeSymbol::Int,
        TypeSymbol::Int,
    ),
    BoundUnaryOperator::new(
        SyntaxKind::TildeToken,
        BoundUnaryOperatorKind::OnesComplement,
        TypeSymbol::Int,
        TypeSymbol::Int,
    ),
    BoundUnaryOperator::new(
        SyntaxKind::BangToken,
        BoundUnaryOperatorKind::LogicalNegation,
        TypeSymbol::Bool,
        TypeSymbol::Bool,
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundBinaryOperatorKind {
    Addition,
    Subtraction,
    Multiplication,
    Division,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    LogicalAnd,
    LogicalOr,
    Equals,
    NotEquals,
    Less,
    LessOrEquals,
    Greater,
    GreaterOrEquals,
}

#[derive(Debug, Clone, Copy)]
pub struct BoundBinaryOperator {
    pub syntax_kind: SyntaxKind,
    pub kind: BoundBinaryOperatorKind,
    pub left_type: TypeSymbol,
    pub right_type: TypeSymbol,
    pub result_type: TypeSymbol,
}

impl BoundBinaryOperator {
    const fn new(
        syntax_kind: SyntaxKind,
        kind: BoundBinaryOperatorKind,
        left_type: TypeSymbol,
        right_type: TypeSymbol,
        result_type: TypeSymbol,
    ) -> Self {
        Self {
            syntax_kind,
            kind,
            left_type,
            right_type,
            result_type,
        }
    }

    /// Shorthand: both operands and the result share one type.
    const fn uniform(
        syntax_kind: SyntaxKind,
        kind: BoundBinaryOperatorKind,
        ty: TypeSymbol,
    ) -> Self {
        Self::new(syntax_kind, kind, ty, ty, ty)
    }

    /// Shorthand: both operands share one type, the result is another.
    const fn comparing(
        syntax_kind: SyntaxKind,
        kind: BoundBinaryOperatorKind,
        operand_type: TypeSymbol,
    ) -> Self {
        Self::new(syntax_kind, kind, operand_type, operand_type, TypeSymbol::Bool)
    }

    /// Resolve a binary operator for the given operand types.
    pub fn bind(
        syntax_kind: SyntaxKind,
        left_type: TypeSymbol,
        right_type: TypeSymbol,
    ) -> Option<&'static BoundBinaryOperator> {
        BINARY_OPERATORS.iter().find(|op| {
            op.syntax_kind == syntax_kind
                && op.left_type == left_type
                && op.right_type == right_type
        })
    }
}

use BoundBinaryOperatorKind::*;
use TypeSymbol::{Any, Bool, Int, String};

static BINARY_OPERATORS: &[BoundBinaryOperator] = &[
    // Int arithmetic
    BoundBinaryOperator::uniform(SyntaxKind::PlusToken, Addition, Int),
    BoundBinaryOperator::uniform(SyntaxKind::MinusToken, Subtraction, Int),
    BoundBinaryOperator::uniform(SyntaxKind::StarToken, Multiplication, Int),
    BoundBinaryOperator::uniform(SyntaxKind::SlashToken, Division, Int),
    // Int bitwise
    BoundBinaryOperator::uniform(SyntaxKind::AmpersandToken, BitwiseAnd, Int),
    BoundBinaryOperator::uniform(SyntaxKind::PipeToken, BitwiseOr, Int),
    BoundBinaryOperator::uniform(SyntaxKind::HatToken, BitwiseXor, Int),
    // Int comparisons
    BoundBinaryOperator::comparing(SyntaxKind::EqualsEqualsToken, Equals, Int),
    BoundBinaryOperator::comparing(SyntaxKind::BangEqualsToken, NotEquals, Int),
    BoundBinaryOperator::comparing(SyntaxKind::LessToken, Less, Int),
    BoundBinaryOperator::comparing(SyntaxKind::LessOrEqualsToken, LessOrEquals, Int),
    BoundBinaryOperator::comparing(SyntaxKind::GreaterToken, Greater, Int),
    BoundBinaryOperator::comparing(SyntaxKind::GreaterOrEqualsToken, GreaterOrEquals, Int),
    // Bool logic (no short-circuit; see the evaluator)
    BoundBinaryOperator::uniform(SyntaxKind::AmpersandAmpersandToken, LogicalAnd, Bool),
    BoundBinaryOperator::uniform(SyntaxKind::PipePipeToken, LogicalOr, Bool),
    BoundBinaryOperator::uniform(SyntaxKind::AmpersandToken, BitwiseAnd, Bool),
    BoundBinaryOperator::uniform(SyntaxKind::PipeToken, BitwiseOr, Bool),
    BoundBinaryOperator::uniform(SyntaxKind::HatToken, BitwiseXor, Bool),
    BoundBinaryOperator::comparing(SyntaxKind::EqualsEqualsToken, Equals, Bool),
    BoundBinaryOperator::comparing(SyntaxKind::BangEqualsToken, NotEquals, Bool),
    // String concatenation and equality
    BoundBinaryOperator::uniform(SyntaxKind::PlusToken, Addition, String),
    BoundBinaryOperator::comparing(SyntaxKind::EqualsEqualsToken, Equals, String),
    BoundBinaryOperator::comparing(SyntaxKind::BangEqualsToken, NotEquals, String),
    // Structural equality across anything
    BoundBinaryOperator::comparing(SyntaxKind::EqualsEqualsToken, Equals, Any),
    BoundBinaryOperator::comparing(SyntaxKind::BangEqualsToken, NotEquals, Any),
];
