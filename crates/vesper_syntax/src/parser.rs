//! The Vesper parser.
//!
//! A hand-written recursive-descent parser with precedence climbing for
//! binary expressions. Parsing never fails: a missing token is manufactured
//! with a diagnostic and a zero-width span, so every parse yields a complete
//! tree plus a diagnostic list.

use crate::node::*;
use crate::scanner::Scanner;
use crate::syntax_kind::{syntax_facts, SyntaxKind};
use crate::token::Token;
use bumpalo::Bump;
use vesper_core::intern::StringInterner;
use vesper_core::text::SourceText;
use vesper_diagnostics::{messages, Diagnostic, DiagnosticCollection};

/// A parsed submission: its source, its root, and the diagnostics the
/// scanner and parser produced along the way.
pub struct SyntaxTree<'a> {
    source: SourceText,
    root: &'a CompilationUnit<'a>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> SyntaxTree<'a> {
    /// Scan and parse one source text into the given arena.
    pub fn parse(arena: &'a Bump, interner: &StringInterner, source: SourceText) -> SyntaxTree<'a> {
        let mut scanner = Scanner::new(&source, interner.clone());
        let tokens = scanner.scan_all();
        let mut diagnostics = scanner.take_diagnostics();

        let mut parser = Parser::new(arena, interner.clone(), &source, tokens);
        let root = parser.parse_compilation_unit();
        diagnostics.extend(parser.take_diagnostics());
        diagnostics.sort();

        SyntaxTree {
            source,
            root,
            diagnostics: diagnostics.into_diagnostics(),
        }
    }

    pub fn source(&self) -> &SourceText {
        &self.source
    }

    pub fn root(&self) -> &'a CompilationUnit<'a> {
        self.root
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

pub struct Parser<'a, 's> {
    arena: &'a Bump,
    interner: StringInterner,
    source: &'s SourceText,
    /// Token stream with bad tokens filtered out; always ends in EOF.
    tokens: Vec<Token>,
    position: usize,
    diagnostics: DiagnosticCollection,
}

impl<'a, 's> Parser<'a, 's> {
    pub fn new(
        arena: &'a Bump,
        interner: StringInterner,
        source: &'s SourceText,
        tokens: Vec<Token>,
    ) -> Self {
        let tokens = tokens
            .into_iter()
            .filter(|t| t.kind != SyntaxKind::BadToken)
            .collect();
        Self {
            arena,
            interner,
            source,
            tokens,
            position: 0,
            diagnostics: DiagnosticCollection::new(),
        }
    }

    pub fn take_diagnostics(&mut self) -> DiagnosticCollection {
        std::mem::take(&mut self.diagnostics)
    }

    fn peek(&self, offset: usize) -> Token {
        let index = (self.position + offset).min(self.tokens.len() - 1);
        self.tokens[index]
    }

    fn current(&self) -> Token {
        self.peek(0)
    }

    fn next_token(&mut self) -> Token {
        let current = self.current();
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
        current
    }

    /// Consume a token of the expected kind, or report a diagnostic and
    /// manufacture a zero-width token in its place.
    fn match_token(&mut self, kind: SyntaxKind) -> Token {
        let current = self.current();
        if current.kind == kind {
            return self.next_token();
        }
        self.diagnostics.report(
            current.span,
            &messages::UNEXPECTED_TOKEN,
            &[&current.kind.to_string(), &kind.to_string()],
        );
        let text = self.interner.intern_static(kind.fixed_text().unwrap_or(""));
        Token::missing(kind, current.span.start, text)
    }

    // ========================================================================
    // Members
    // ========================================================================

    pub fn parse_compilation_unit(&mut self) -> &'a CompilationUnit<'a> {
        let mut members = Vec::new();
        while self.current().kind != SyntaxKind::EndOfFileToken {
            let start_position = self.position;
            members.push(self.parse_member());
            // If the member parser consumed nothing we would loop forever;
            // skip the offending token and try again.
            if self.position == start_position {
                self.next_token();
            }
        }
        let end_of_file_token = self.match_token(SyntaxKind::EndOfFileToken);
        let members = self.arena.alloc_slice_copy(&members);
        self.arena.alloc(CompilationUnit {
            members,
            end_of_file_token,
        })
    }

    fn parse_member(&mut self) -> Member<'a> {
        if self.current().kind == SyntaxKind::FunctionKeyword {
            Member::Function(self.parse_function_declaration())
        } else {
            let statement = self.parse_statement();
            Member::GlobalStatement(self.arena.alloc(GlobalStatement { statement }))
        }
    }

    fn parse_function_declaration(&mut self) -> &'a FunctionDeclaration<'a> {
        let function_keyword = self.match_token(SyntaxKind::FunctionKeyword);
        let identifier = self.match_token(SyntaxKind::IdentifierToken);
        let open_paren_token = self.match_token(SyntaxKind::OpenParenToken);
        let parameters = self.parse_parameter_list();
        let close_paren_token = self.match_token(SyntaxKind::CloseParenToken);
        let type_clause = self.parse_optional_type_clause();
        let body = self.parse_block_statement();
        self.arena.alloc(FunctionDeclaration {
            function_keyword,
            identifier,
            open_paren_token,
            parameters,
            close_paren_token,
            type_clause,
            body,
        })
    }

    fn parse_parameter_list(&mut self) -> NodeList<'a, ParameterSyntax> {
        let mut parameters = Vec::new();
        while self.current().kind != SyntaxKind::CloseParenToken
            && self.current().kind != SyntaxKind::EndOfFileToken
        {
            let identifier = self.match_token(SyntaxKind::IdentifierToken);
            let type_clause = self.parse_type_clause();
            parameters.push(ParameterSyntax {
                identifier,
                type_clause,
            });
            if self.current().kind == SyntaxKind::CommaToken {
                self.next_token();
            } else {
                break;
            }
        }
        self.arena.alloc_slice_copy(&parameters)
    }

    fn parse_optional_type_clause(&mut self) -> Option<TypeClauseSyntax> {
        if self.current().kind != SyntaxKind::ColonToken {
            return None;
        }
        Some(self.parse_type_clause())
    }

    fn parse_type_clause(&mut self) -> TypeClauseSyntax {
        let colon_token = self.match_token(SyntaxKind::ColonToken);
        let identifier = self.match_token(SyntaxKind::IdentifierToken);
        TypeClauseSyntax {
            colon_token,
            identifier,
        }
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn parse_statement(&mut self) -> Statement<'a> {
        match self.current().kind {
            SyntaxKind::OpenBraceToken => Statement::Block(self.parse_block_statement()),
            SyntaxKind::VarKeyword | SyntaxKind::LetKeyword => self.parse_variable_declaration(),
            SyntaxKind::IfKeyword => self.parse_if_statement(),
            SyntaxKind::WhileKeyword => self.parse_while_statement(),
            SyntaxKind::DoKeyword => self.parse_do_while_statement(),
            SyntaxKind::ForKeyword => self.parse_for_statement(),
            SyntaxKind::BreakKeyword => {
                let keyword = self.next_token();
                Statement::Break(self.arena.alloc(BreakStatementSyntax { keyword }))
            }
            SyntaxKind::ContinueKeyword => {
                let keyword = self.next_token();
                Statement::Continue(self.arena.alloc(ContinueStatementSyntax { keyword }))
            }
            SyntaxKind::ReturnKeyword => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_block_statement(&mut self) -> &'a BlockStatementSyntax<'a> {
        let open_brace_token = self.match_token(SyntaxKind::OpenBraceToken);
        let mut statements = Vec::new();
        while self.current().kind != SyntaxKind::CloseBraceToken
            && self.current().kind != SyntaxKind::EndOfFileToken
        {
            let start_position = self.position;
            statements.push(self.parse_statement());
            if self.position == start_position {
                self.next_token();
            }
        }
        let close_brace_token = self.match_token(SyntaxKind::CloseBraceToken);
        let statements = self.arena.alloc_slice_copy(&statements);
        self.arena.alloc(BlockStatementSyntax {
            open_brace_token,
            statements,
            close_brace_token,
        })
    }

    fn parse_variable_declaration(&mut self) -> Statement<'a> {
        let keyword = self.next_token();
        let identifier = self.match_token(SyntaxKind::IdentifierToken);
        let type_clause = self.parse_optional_type_clause();
        let equals_token = self.match_token(SyntaxKind::EqualsToken);
        let initializer = self.parse_expression();
        Statement::Variable(self.arena.alloc(VariableDeclarationSyntax {
            keyword,
            identifier,
            type_clause,
            equals_token,
            initializer,
        }))
    }

    fn parse_if_statement(&mut self) -> Statement<'a> {
        let if_keyword = self.match_token(SyntaxKind::IfKeyword);
        let condition = self.parse_expression();
        let then_statement = self.parse_statement();
        let else_clause = if self.current().kind == SyntaxKind::ElseKeyword {
            let else_keyword = self.next_token();
            let else_statement = self.parse_statement();
            Some(ElseClauseSyntax {
                else_keyword,
                else_statement,
            })
        } else {
            None
        };
        Statement::If(self.arena.alloc(IfStatementSyntax {
            if_keyword,
            condition,
            then_statement,
            else_clause,
        }))
    }

    fn parse_while_statement(&mut self) -> Statement<'a> {
        let while_keyword = self.match_token(SyntaxKind::WhileKeyword);
        let condition = self.parse_expression();
        let body = self.parse_statement();
        Statement::While(self.arena.alloc(WhileStatementSyntax {
            while_keyword,
            condition,
            body,
        }))
    }

    fn parse_do_while_statement(&mut self) -> Statement<'a> {
        let do_keyword = self.match_token(SyntaxKind::DoKeyword);
        let body = self.parse_statement();
        let while_keyword = self.match_token(SyntaxKind::WhileKeyword);
        let condition = self.parse_expression();
        Statement::DoWhile(self.arena.alloc(DoWhileStatementSyntax {
            do_keyword,
            body,
            while_keyword,
            condition,
        }))
    }

    fn parse_for_statement(&mut self) -> Statement<'a> {
        let for_keyword = self.match_token(SyntaxKind::ForKeyword);
        let identifier = self.match_token(SyntaxKind::IdentifierToken);
        let equals_token = self.match_token(SyntaxKind::EqualsToken);
        let lower_bound = self.parse_expression();
        let to_keyword = self.match_token(SyntaxKind::ToKeyword);
        let upper_bound = self.parse_expression();
        let body = self.parse_statement();
        Statement::For(self.arena.alloc(ForStatementSyntax {
            for_keyword,
            identifier,
            equals_token,
            lower_bound,
            to_keyword,
            upper_bound,
            body,
        }))
    }

    fn parse_return_statement(&mut self) -> Statement<'a> {
        let return_keyword = self.match_token(SyntaxKind::ReturnKeyword);
        // A return value must start on the same line as the keyword; there
        // are no statement terminators to disambiguate otherwise.
        let keyword_line = self
            .source
            .line_map()
            .line_of(return_keyword.span.start);
        let current = self.current();
        let same_line = current.kind != SyntaxKind::EndOfFileToken
            && self.source.line_map().line_of(current.span.start) == keyword_line;
        let expression = if same_line && can_begin_expression(current.kind) {
            Some(self.parse_expression())
        } else {
            None
        };
        Statement::Return(self.arena.alloc(ReturnStatementSyntax {
            return_keyword,
            expression,
        }))
    }

    fn parse_expression_statement(&mut self) -> Statement<'a> {
        let expression = self.parse_expression();
        Statement::Expression(self.arena.alloc(ExpressionStatementSyntax { expression }))
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn parse_expression(&mut self) -> Expression<'a> {
        self.parse_assignment_expression()
    }

    fn parse_assignment_expression(&mut self) -> Expression<'a> {
        // Assignment is right-associative and only targets plain names, so a
        // two-token lookahead settles it.
        if self.current().kind == SyntaxKind::IdentifierToken
            && self.peek(1).kind == SyntaxKind::EqualsToken
        {
            let identifier = self.next_token();
            let equals_token = self.next_token();
            let expression = self.parse_assignment_expression();
            return Expression::Assignment(self.arena.alloc(AssignmentExpressionSyntax {
                identifier,
                equals_token,
                expression,
            }));
        }
        self.parse_binary_expression(0)
    }

    fn parse_binary_expression(&mut self, parent_precedence: u8) -> Expression<'a> {
        let unary_precedence = syntax_facts::unary_operator_precedence(self.current().kind);
        let mut left = if unary_precedence != 0 && unary_precedence >= parent_precedence {
            let operator_token = self.next_token();
            let operand = self.parse_binary_expression(unary_precedence);
            Expression::Unary(self.arena.alloc(UnaryExpressionSyntax {
                operator_token,
                operand,
            }))
        } else {
            self.parse_primary_expression()
        };

        loop {
            let precedence = syntax_facts::binary_operator_precedence(self.current().kind);
            if precedence == 0 || precedence <= parent_precedence {
                break;
            }
            let operator_token = self.next_token();
            let right = self.parse_binary_expression(precedence);
            left = Expression::Binary(self.arena.alloc(BinaryExpressionSyntax {
                left,
                operator_token,
                right,
            }));
        }
        left
    }

    fn parse_primary_expression(&mut self) -> Expression<'a> {
        match self.current().kind {
            SyntaxKind::OpenParenToken => {
                let open_paren_token = self.next_token();
                let expression = self.parse_expression();
                let close_paren_token = self.match_token(SyntaxKind::CloseParenToken);
                Expression::Parenthesized(self.arena.alloc(ParenthesizedExpressionSyntax {
                    open_paren_token,
                    expression,
                    close_paren_token,
                }))
            }
            SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword
            | SyntaxKind::NumberToken
            | SyntaxKind::StringToken => {
                let literal_token = self.next_token();
                Expression::Literal(self.arena.alloc(LiteralExpressionSyntax { literal_token }))
            }
            _ => self.parse_name_or_call_expression(),
        }
    }

    fn parse_name_or_call_expression(&mut self) -> Expression<'a> {
        if self.current().kind == SyntaxKind::IdentifierToken
            && self.peek(1).kind == SyntaxKind::OpenParenToken
        {
            return self.parse_call_expression();
        }
        let identifier = self.match_token(SyntaxKind::IdentifierToken);
        Expression::Name(self.arena.alloc(NameExpressionSyntax { identifier }))
    }

    fn parse_call_expression(&mut self) -> Expression<'a> {
        let identifier = self.match_token(SyntaxKind::IdentifierToken);
        let open_paren_token = self.match_token(SyntaxKind::OpenParenToken);
        let mut arguments = Vec::new();
        while self.current().kind != SyntaxKind::CloseParenToken
            && self.current().kind != SyntaxKind::EndOfFileToken
        {
            let start_position = self.position;
            arguments.push(self.parse_expression());
            if self.current().kind == SyntaxKind::CommaToken {
                self.next_token();
            } else if self.position == start_position {
                self.next_token();
            } else {
                break;
            }
        }
        let close_paren_token = self.match_token(SyntaxKind::CloseParenToken);
        let arguments = self.arena.alloc_slice_copy(&arguments);
        Expression::Call(self.arena.alloc(CallExpressionSyntax {
            identifier,
            open_paren_token,
            arguments,
            close_paren_token,
        }))
    }
}

/// Whether a token of this kind can start an expression.
fn can_begin_expression(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::NumberToken
            | SyntaxKind::StringToken
            | SyntaxKind::IdentifierToken
            | SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword
            | SyntaxKind::OpenParenToken
            | SyntaxKind::PlusToken
            | SyntaxKind::MinusToken
            | SyntaxKind::BangToken
            | SyntaxKind::TildeToken
    )
}
