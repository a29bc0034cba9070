//! Bound tree node definitions, the IR every later stage consumes.
//!
//! Like the syntax tree, bound nodes are immutable and arena-allocated; the
//! enums are `Copy` and hold `&'a` references to their payload structs.
//! Rewrites never mutate: they build new nodes and reuse unchanged subtrees,
//! which makes `std::ptr::eq` on the payloads a cheap did-anything-change
//! test.

use crate::constant::BoundConstant;
use crate::label::BoundLabel;
use crate::op::{BoundBinaryOperator, BoundUnaryOperator};
use crate::symbol::{FunctionSymbol, VariableSymbol};
use crate::ty::TypeSymbol;

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub enum BoundExpression<'a> {
    Literal(&'a BoundLiteralExpression),
    Variable(&'a BoundVariableExpression),
    Assignment(&'a BoundAssignmentExpression<'a>),
    Unary(&'a BoundUnaryExpression<'a>),
    Binary(&'a BoundBinaryExpression<'a>),
    Call(&'a BoundCallExpression<'a>),
    Conversion(&'a BoundConversionExpression<'a>),
    Error(&'a BoundErrorExpression),
}

impl<'a> BoundExpression<'a> {
    /// The static type of this expression.
    pub fn ty(&self) -> TypeSymbol {
        match self {
            BoundExpression::Literal(n) => n.value.ty(),
            BoundExpression::Variable(n) => n.variable.ty,
            BoundExpression::Assignment(n) => n.expression.ty(),
            BoundExpression::Unary(n) => n.op.result_type,
            BoundExpression::Binary(n) => n.op.result_type,
            BoundExpression::Call(n) => n.function.return_type,
            BoundExpression::Conversion(n) => n.ty,
            BoundExpression::Error(_) => TypeSymbol::Error,
        }
    }

    /// The statically known value of this expression, if any.
    pub fn constant(&self) -> Option<BoundConstant> {
        match self {
            BoundExpression::Literal(n) => Some(n.value),
            BoundExpression::Variable(n) => n.variable.constant,
            BoundExpression::Unary(n) => n.constant,
            BoundExpression::Binary(n) => n.constant,
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct BoundLiteralExpression {
    pub value: BoundConstant,
}

#[derive(Debug)]
pub struct BoundVariableExpression {
    pub variable: VariableSymbol,
}

#[derive(Debug)]
pub struct BoundAssignmentExpression<'a> {
    pub variable: VariableSymbol,
    pub expression: BoundExpression<'a>,
}

#[derive(Debug)]
pub struct BoundUnaryExpression<'a> {
    pub op: &'static BoundUnaryOperator,
    pub operand: BoundExpression<'a>,
    /// Folded at construction when the operand carries a constant.
    pub constant: Option<BoundConstant>,
}

#[derive(Debug)]
pub struct BoundBinaryExpression<'a> {
    pub left: BoundExpression<'a>,
    pub op: &'static BoundBinaryOperator,
    pub right: BoundExpression<'a>,
    /// Folded at construction when both operands carry constants.
    pub constant: Option<BoundConstant>,
}

#[derive(Debug)]
pub struct BoundCallExpression<'a> {
    pub function: FunctionSymbol<'a>,
    pub arguments: &'a [BoundExpression<'a>],
}

#[derive(Debug)]
pub struct BoundConversionExpression<'a> {
    pub ty: TypeSymbol,
    pub expression: BoundExpression<'a>,
}

/// Placeholder where binding failed; its type is `Error`.
#[derive(Debug)]
pub struct BoundErrorExpression;

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub enum BoundStatement<'a> {
    Block(&'a BoundBlockStatement<'a>),
    VariableDeclaration(&'a BoundVariableDeclaration<'a>),
    Expression(&'a BoundExpressionStatement<'a>),
    If(&'a BoundIfStatement<'a>),
    While(&'a BoundWhileStatement<'a>),
    DoWhile(&'a BoundDoWhileStatement<'a>),
    For(&'a BoundForStatement<'a>),
    Label(&'a BoundLabelStatement),
    Goto(&'a BoundGotoStatement),
    ConditionalGoto(&'a BoundConditionalGotoStatement<'a>),
    Return(&'a BoundReturnStatement<'a>),
    Nop(&'a BoundNopStatement),
}

#[derive(Debug)]
pub struct BoundBlockStatement<'a> {
    pub statements: &'a [BoundStatement<'a>],
}

#[derive(Debug)]
pub struct BoundVariableDeclaration<'a> {
    pub variable: VariableSymbol,
    pub initializer: BoundExpression<'a>,
}

#[derive(Debug)]
pub struct BoundExpressionStatement<'a> {
    pub expression: BoundExpression<'a>,
}

#[derive(Debug)]
pub struct BoundIfStatement<'a> {
    pub condition: BoundExpression<'a>,
    pub then_statement: BoundStatement<'a>,
    pub else_statement: Option<BoundStatement<'a>>,
}

#[derive(Debug)]
pub struct BoundWhileStatement<'a> {
    pub condition: BoundExpression<'a>,
    pub body: BoundStatement<'a>,
    pub break_label: BoundLabel,
    pub continue_label: BoundLabel,
}

#[derive(Debug)]
pub struct BoundDoWhileStatement<'a> {
    pub body: BoundStatement<'a>,
    pub condition: BoundExpression<'a>,
    pub break_label: BoundLabel,
    pub continue_label: BoundLabel,
}

/// `for v = lower to upper body`; the upper bound is inclusive.
#[derive(Debug)]
pub struct BoundForStatement<'a> {
    pub variable: VariableSymbol,
    pub lower_bound: BoundExpression<'a>,
    pub upper_bound: BoundExpression<'a>,
    pub body: BoundStatement<'a>,
    pub break_label: BoundLabel,
    pub continue_label: BoundLabel,
}

#[derive(Debug)]
pub struct BoundLabelStatement {
    pub label: BoundLabel,
}

#[derive(Debug)]
pub struct BoundGotoStatement {
    pub label: BoundLabel,
}

#[derive(Debug)]
pub struct BoundConditionalGotoStatement<'a> {
    pub label: BoundLabel,
    pub condition: BoundExpression<'a>,
    /// Jump when the condition equals this value, fall through otherwise.
    pub jump_if_true: bool,
}

#[derive(Debug)]
pub struct BoundReturnStatement<'a> {
    pub expression: Option<BoundExpression<'a>>,
}

/// Left behind when lowering erases a statement.
#[derive(Debug)]
pub struct BoundNopStatement;
