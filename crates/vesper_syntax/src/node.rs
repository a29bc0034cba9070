//! Syntax tree node definitions.
//!
//! The tree is immutable and arena-allocated: nodes hold `&'a` references to
//! children allocated in a caller-owned `bumpalo::Bump`, and node enums are
//! `Copy`. Spans are derived from the first and last token of each node.

use crate::token::Token;
use vesper_core::text::TextSpan;

/// A list of child nodes, allocated in the arena.
pub type NodeList<'a, T> = &'a [T];

// ============================================================================
// Compilation unit and members
// ============================================================================

#[derive(Debug)]
pub struct CompilationUnit<'a> {
    pub members: NodeList<'a, Member<'a>>,
    pub end_of_file_token: Token,
}

impl<'a> CompilationUnit<'a> {
    pub fn span(&self) -> TextSpan {
        match self.members.first() {
            Some(first) => first.span().union(&self.end_of_file_token.span),
            None => self.end_of_file_token.span,
        }
    }
}

/// A top-level member: a function declaration or a global statement.
#[derive(Debug, Clone, Copy)]
pub enum Member<'a> {
    Function(&'a FunctionDeclaration<'a>),
    GlobalStatement(&'a GlobalStatement<'a>),
}

impl<'a> Member<'a> {
    pub fn span(&self) -> TextSpan {
        match self {
            Member::Function(n) => n.span(),
            Member::GlobalStatement(n) => n.statement.span(),
        }
    }
}

#[derive(Debug)]
pub struct FunctionDeclaration<'a> {
    pub function_keyword: Token,
    pub identifier: Token,
    pub open_paren_token: Token,
    pub parameters: NodeList<'a, ParameterSyntax>,
    pub close_paren_token: Token,
    /// Optional return type clause; absent means Void.
    pub type_clause: Option<TypeClauseSyntax>,
    pub body: &'a BlockStatementSyntax<'a>,
}

impl<'a> FunctionDeclaration<'a> {
    pub fn span(&self) -> TextSpan {
        self.function_keyword.span.union(&self.body.span())
    }
}

/// One declared parameter: `name: Type`.
#[derive(Debug, Clone, Copy)]
pub struct ParameterSyntax {
    pub identifier: Token,
    pub type_clause: TypeClauseSyntax,
}

impl ParameterSyntax {
    pub fn span(&self) -> TextSpan {
        self.identifier.span.union(&self.type_clause.span())
    }
}

/// `: Type` on a parameter, variable, or function.
#[derive(Debug, Clone, Copy)]
pub struct TypeClauseSyntax {
    pub colon_token: Token,
    pub identifier: Token,
}

impl TypeClauseSyntax {
    pub fn span(&self) -> TextSpan {
        self.colon_token.span.union(&self.identifier.span)
    }
}

#[derive(Debug)]
pub struct GlobalStatement<'a> {
    pub statement: Statement<'a>,
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub enum Statement<'a> {
    Block(&'a BlockStatementSyntax<'a>),
    Variable(&'a VariableDeclarationSyntax<'a>),
    If(&'a IfStatementSyntax<'a>),
    While(&'a WhileStatementSyntax<'a>),
    DoWhile(&'a DoWhileStatementSyntax<'a>),
    For(&'a ForStatementSyntax<'a>),
    Break(&'a BreakStatementSyntax),
    Continue(&'a ContinueStatementSyntax),
    Return(&'a ReturnStatementSyntax<'a>),
    Expression(&'a ExpressionStatementSyntax<'a>),
}

impl<'a> Statement<'a> {
    pub fn span(&self) -> TextSpan {
        match self {
            Statement::Block(n) => n.span(),
            Statement::Variable(n) => n.span(),
            Statement::If(n) => n.span(),
            Statement::While(n) => n.span(),
            Statement::DoWhile(n) => n.span(),
            Statement::For(n) => n.span(),
            Statement::Break(n) => n.keyword.span,
            Statement::Continue(n) => n.keyword.span,
            Statement::Return(n) => n.span(),
            Statement::Expression(n) => n.expression.span(),
        }
    }
}

#[derive(Debug)]
pub struct BlockStatementSyntax<'a> {
    pub open_brace_token: Token,
    pub statements: NodeList<'a, Statement<'a>>,
    pub close_brace_token: Token,
}

impl<'a> BlockStatementSyntax<'a> {
    pub fn span(&self) -> TextSpan {
        self.open_brace_token.span.union(&self.close_brace_token.span)
    }
}

/// `var name = init` / `let name: Type = init`.
#[derive(Debug)]
pub struct VariableDeclarationSyntax<'a> {
    pub keyword: Token,
    pub identifier: Token,
    pub type_clause: Option<TypeClauseSyntax>,
    pub equals_token: Token,
    pub initializer: Expression<'a>,
}

impl<'a> VariableDeclarationSyntax<'a> {
    pub fn span(&self) -> TextSpan {
        self.keyword.span.union(&self.initializer.span())
    }
}

#[derive(Debug)]
pub struct IfStatementSyntax<'a> {
    pub if_keyword: Token,
    pub condition: Expression<'a>,
    pub then_statement: Statement<'a>,
    pub else_clause: Option<ElseClauseSyntax<'a>>,
}

impl<'a> IfStatementSyntax<'a> {
    pub fn span(&self) -> TextSpan {
        let end = match &self.else_clause {
            Some(e) => e.else_statement.span(),
            None => self.then_statement.span(),
        };
        self.if_keyword.span.union(&end)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ElseClauseSyntax<'a> {
    pub else_keyword: Token,
    pub else_statement: Statement<'a>,
}

#[derive(Debug)]
pub struct WhileStatementSyntax<'a> {
    pub while_keyword: Token,
    pub condition: Expression<'a>,
    pub body: Statement<'a>,
}

impl<'a> WhileStatementSyntax<'a> {
    pub fn span(&self) -> TextSpan {
        self.while_keyword.span.union(&self.body.span())
    }
}

#[derive(Debug)]
pub struct DoWhileStatementSyntax<'a> {
    pub do_keyword: Token,
    pub body: Statement<'a>,
    pub while_keyword: Token,
    pub condition: Expression<'a>,
}

impl<'a> DoWhileStatementSyntax<'a> {
    pub fn span(&self) -> TextSpan {
        self.do_keyword.span.union(&self.condition.span())
    }
}

/// `for i = lower to upper body`, with an inclusive upper bound.
#[derive(Debug)]
pub struct ForStatementSyntax<'a> {
    pub for_keyword: Token,
    pub identifier: Token,
    pub equals_token: Token,
    pub lower_bound: Expression<'a>,
    pub to_keyword: Token,
    pub upper_bound: Expression<'a>,
    pub body: Statement<'a>,
}

impl<'a> ForStatementSyntax<'a> {
    pub fn span(&self) -> TextSpan {
        self.for_keyword.span.union(&self.body.span())
    }
}

#[derive(Debug)]
pub struct BreakStatementSyntax {
    pub keyword: Token,
}

#[derive(Debug)]
pub struct ContinueStatementSyntax {
    pub keyword: Token,
}

#[derive(Debug)]
pub struct ReturnStatementSyntax<'a> {
    pub return_keyword: Token,
    pub expression: Option<Expression<'a>>,
}

impl<'a> ReturnStatementSyntax<'a> {
    pub fn span(&self) -> TextSpan {
        match &self.expression {
            Some(e) => self.return_keyword.span.union(&e.span()),
            None => self.return_keyword.span,
        }
    }
}

#[derive(Debug)]
pub struct ExpressionStatementSyntax<'a> {
    pub expression: Expression<'a>,
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub enum Expression<'a> {
    Literal(&'a LiteralExpressionSyntax),
    Name(&'a NameExpressionSyntax),
    Unary(&'a UnaryExpressionSyntax<'a>),
    Binary(&'a BinaryExpressionSyntax<'a>),
    Parenthesized(&'a ParenthesizedExpressionSyntax<'a>),
    Assignment(&'a AssignmentExpressionSyntax<'a>),
    Call(&'a CallExpressionSyntax<'a>),
}

impl<'a> Expression<'a> {
    pub fn span(&self) -> TextSpan {
        match self {
            Expression::Literal(n) => n.literal_token.span,
            Expression::Name(n) => n.identifier.span,
            Expression::Unary(n) => n.operator_token.span.union(&n.operand.span()),
            Expression::Binary(n) => n.left.span().union(&n.right.span()),
            Expression::Parenthesized(n) => {
                n.open_paren_token.span.union(&n.close_paren_token.span)
            }
            Expression::Assignment(n) => n.identifier.span.union(&n.expression.span()),
            Expression::Call(n) => n.identifier.span.union(&n.close_paren_token.span),
        }
    }
}

/// A number, string, `true`, or `false` token.
#[derive(Debug)]
pub struct LiteralExpressionSyntax {
    pub literal_token: Token,
}

#[derive(Debug)]
pub struct NameExpressionSyntax {
    pub identifier: Token,
}

#[derive(Debug)]
pub struct UnaryExpressionSyntax<'a> {
    pub operator_token: Token,
    pub operand: Expression<'a>,
}

#[derive(Debug)]
pub struct BinaryExpressionSyntax<'a> {
    pub left: Expression<'a>,
    pub operator_token: Token,
    pub right: Expression<'a>,
}

#[derive(Debug)]
pub struct ParenthesizedExpressionSyntax<'a> {
    pub open_paren_token: Token,
    pub expression: Expression<'a>,
    pub close_paren_token: Token,
}

#[derive(Debug)]
pub struct AssignmentExpressionSyntax<'a> {
    pub identifier: Token,
    pub equals_token: Token,
    pub expression: Expression<'a>,
}

#[derive(Debug)]
pub struct CallExpressionSyntax<'a> {
    pub identifier: Token,
    pub open_paren_token: Token,
    pub arguments: NodeList<'a, Expression<'a>>,
    pub close_paren_token: Token,
}
