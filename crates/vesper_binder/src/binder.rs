//! The binder: name resolution, type checking, and bound tree construction.
//!
//! Binding never fails. Unresolvable names, bad operators, and impossible
//! conversions produce diagnostics plus recovery nodes (a literal zero, the
//! unchanged operand, an error expression), so one mistake yields one
//! message and binding keeps going.

use bumpalo::Bump;
use vesper_core::intern::{InternedString, StringInterner};
use vesper_core::text::TextSpan;
use vesper_diagnostics::{messages, DiagnosticCollection};
use vesper_ir::node::*;
use vesper_ir::op::{BoundBinaryOperator, BoundUnaryOperator};
use vesper_ir::{
    BoundConstant, BoundLabel, FunctionSymbol, SymbolId, TypeSymbol, VariableKind, VariableSymbol,
};
use vesper_syntax::node as syntax;
use vesper_syntax::syntax_kind::SyntaxKind;
use vesper_syntax::token::{Token, TokenValue};

use crate::constant_folding::{fold_binary, fold_unary};
use crate::conversion::Conversion;
use crate::scope::{BoundScope, ScopedSymbol};

pub struct Binder<'a> {
    arena: &'a Bump,
    interner: StringInterner,
    diagnostics: DiagnosticCollection,
    scope: BoundScope<'a>,
    /// The function whose body is being bound; `None` for global statements.
    function: Option<FunctionSymbol<'a>>,
    /// Innermost loop last: (break label, continue label).
    loop_labels: Vec<(BoundLabel, BoundLabel)>,
    label_count: u32,
    symbol_count: u32,
    /// Functions declared in this submission, paired with their syntax.
    functions: Vec<(FunctionSymbol<'a>, &'a syntax::FunctionDeclaration<'a>)>,
}

impl<'a> Binder<'a> {
    pub fn new(
        arena: &'a Bump,
        interner: StringInterner,
        parent: BoundScope<'a>,
        symbol_seed: u32,
        function: Option<FunctionSymbol<'a>>,
    ) -> Self {
        Self {
            arena,
            interner,
            diagnostics: DiagnosticCollection::new(),
            scope: BoundScope::new(Some(Box::new(parent))),
            function,
            loop_labels: Vec::new(),
            label_count: 0,
            symbol_count: symbol_seed,
            functions: Vec::new(),
        }
    }

    pub fn label_count(&self) -> u32 {
        self.label_count
    }

    pub fn symbol_count(&self) -> u32 {
        self.symbol_count
    }

    pub fn take_diagnostics(&mut self) -> DiagnosticCollection {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn take_functions(
        &mut self,
    ) -> Vec<(FunctionSymbol<'a>, &'a syntax::FunctionDeclaration<'a>)> {
        std::mem::take(&mut self.functions)
    }

    /// The binder's own outermost scope, detached from the ambient parent
    /// chain: where this submission's globals and functions were declared.
    pub fn into_submission_scope(mut self) -> BoundScope<'a> {
        debug_assert!(self.loop_labels.is_empty());
        let mut scope = std::mem::take(&mut self.scope);
        scope.parent = None;
        scope
    }

    fn fresh_symbol_id(&mut self) -> SymbolId {
        let id = SymbolId::new(self.symbol_count);
        self.symbol_count += 1;
        id
    }

    fn fresh_label(&mut self) -> BoundLabel {
        let label = BoundLabel::new(self.label_count);
        self.label_count += 1;
        label
    }

    fn push_scope(&mut self) {
        let parent = std::mem::take(&mut self.scope);
        self.scope = BoundScope::new(Some(Box::new(parent)));
    }

    fn pop_scope(&mut self) {
        let scope = std::mem::take(&mut self.scope);
        self.scope = *scope.parent.unwrap_or_default();
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    /// First pass over a submission: declare function signatures so bodies
    /// and global statements can call in any order.
    pub fn declare_function(&mut self, declaration: &'a syntax::FunctionDeclaration<'a>) {
        let mut parameters = Vec::with_capacity(declaration.parameters.len());
        let mut seen: Vec<InternedString> = Vec::new();
        for (ordinal, parameter) in declaration.parameters.iter().enumerate() {
            let name = parameter.identifier.text;
            if seen.contains(&name) {
                self.diagnostics.report(
                    parameter.span(),
                    &messages::PARAMETER_ALREADY_DECLARED,
                    &[self.interner.resolve(name)],
                );
                continue;
            }
            seen.push(name);
            let ty = self.bind_type_clause(&parameter.type_clause);
            parameters.push(VariableSymbol {
                id: self.fresh_symbol_id(),
                name,
                kind: VariableKind::Parameter {
                    ordinal: ordinal as u32,
                },
                read_only: true,
                ty,
                constant: None,
            });
        }

        let return_type = match &declaration.type_clause {
            Some(clause) => self.bind_type_clause(clause),
            None => TypeSymbol::Void,
        };

        let function = FunctionSymbol {
            id: self.fresh_symbol_id(),
            name: declaration.identifier.text,
            parameters: self.arena.alloc_slice_copy(&parameters),
            return_type,
        };

        if !declaration.identifier.is_missing && !self.scope.try_declare_function(function) {
            self.diagnostics.report(
                declaration.identifier.span,
                &messages::SYMBOL_ALREADY_DECLARED,
                &[self.interner.resolve(declaration.identifier.text)],
            );
        }
        self.functions.push((function, declaration));
    }

    /// Declare a function's parameters into the current scope.
    pub fn declare_parameters(&mut self, function: FunctionSymbol<'a>) {
        for parameter in function.parameters {
            self.scope.try_declare_variable(*parameter);
        }
    }

    fn bind_type_clause(&mut self, clause: &syntax::TypeClauseSyntax) -> TypeSymbol {
        let text = self.interner.resolve(clause.identifier.text);
        match TypeSymbol::lookup(text) {
            Some(ty) => ty,
            None => {
                if !clause.identifier.is_missing {
                    self.diagnostics.report(
                        clause.identifier.span,
                        &messages::TYPE_DOESNT_EXIST,
                        &[text],
                    );
                }
                TypeSymbol::Error
            }
        }
    }

    // ========================================================================
    // Statements
    // ========================================================================

    pub fn bind_statement(&mut self, statement: syntax::Statement<'a>) -> BoundStatement<'a> {
        match statement {
            syntax::Statement::Block(n) => self.bind_block_statement(n),
            syntax::Statement::Variable(n) => self.bind_variable_declaration(n),
            syntax::Statement::If(n) => self.bind_if_statement(n),
            syntax::Statement::While(n) => self.bind_while_statement(n),
            syntax::Statement::DoWhile(n) => self.bind_do_while_statement(n),
            syntax::Statement::For(n) => self.bind_for_statement(n),
            syntax::Statement::Break(n) => self.bind_break_statement(n),
            syntax::Statement::Continue(n) => self.bind_continue_statement(n),
            syntax::Statement::Return(n) => self.bind_return_statement(n),
            syntax::Statement::Expression(n) => self.bind_expression_statement(n),
        }
    }

    fn bind_block_statement(&mut self, node: &'a syntax::BlockStatementSyntax<'a>) -> BoundStatement<'a> {
        // Global statements share one flat scope so a REPL submission can
        // use a name introduced inside an earlier top-level block. Inside
        // functions, blocks scope normally.
        let scoped = self.function.is_some();
        if scoped {
            self.push_scope();
        }
        let mut statements = Vec::with_capacity(node.statements.len());
        for &statement in node.statements {
            statements.push(self.bind_statement(statement));
        }
        if scoped {
            self.pop_scope();
        }
        let statements = self.arena.alloc_slice_copy(&statements);
        BoundStatement::Block(self.arena.alloc(BoundBlockStatement { statements }))
    }

    fn bind_variable_declaration(
        &mut self,
        node: &'a syntax::VariableDeclarationSyntax<'a>,
    ) -> BoundStatement<'a> {
        let initializer = self.bind_expression(node.initializer);
        let read_only = node.keyword.kind == SyntaxKind::LetKeyword;
        let ty = match &node.type_clause {
            Some(clause) => self.bind_type_clause(clause),
            None => initializer.ty(),
        };
        let initializer =
            self.bind_conversion_to(initializer, ty, node.initializer.span(), false);
        let constant = if read_only { initializer.constant() } else { None };

        let variable = self.declare_variable(node.identifier, read_only, ty, constant);
        BoundStatement::VariableDeclaration(self.arena.alloc(BoundVariableDeclaration {
            variable,
            initializer,
        }))
    }

    fn declare_variable(
        &mut self,
        identifier: Token,
        read_only: bool,
        ty: TypeSymbol,
        constant: Option<BoundConstant>,
    ) -> VariableSymbol {
        let kind = if self.function.is_none() {
            VariableKind::Global
        } else {
            VariableKind::Local
        };
        let variable = VariableSymbol {
            id: self.fresh_symbol_id(),
            name: identifier.text,
            kind,
            read_only,
            ty,
            constant,
        };
        if !identifier.is_missing && !self.scope.try_declare_variable(variable) {
            self.diagnostics.report(
                identifier.span,
                &messages::SYMBOL_ALREADY_DECLARED,
                &[self.interner.resolve(identifier.text)],
            );
        }
        variable
    }

    fn bind_if_statement(&mut self, node: &'a syntax::IfStatementSyntax<'a>) -> BoundStatement<'a> {
        let condition = self.bind_converted_expression(node.condition, TypeSymbol::Bool);
        let then_statement = self.bind_statement(node.then_statement);
        let else_statement = node
            .else_clause
            .as_ref()
            .map(|clause| self.bind_statement(clause.else_statement));
        BoundStatement::If(self.arena.alloc(BoundIfStatement {
            condition,
            then_statement,
            else_statement,
        }))
    }

    fn bind_loop_body(
        &mut self,
        body: syntax::Statement<'a>,
    ) -> (BoundStatement<'a>, BoundLabel, BoundLabel) {
        let break_label = self.fresh_label();
        let continue_label = self.fresh_label();
        self.loop_labels.push((break_label, continue_label));
        let body = self.bind_statement(body);
        self.loop_labels.pop();
        (body, break_label, continue_label)
    }

    fn bind_while_statement(
        &mut self,
        node: &'a syntax::WhileStatementSyntax<'a>,
    ) -> BoundStatement<'a> {
        let condition = self.bind_converted_expression(node.condition, TypeSymbol::Bool);
        let (body, break_label, continue_label) = self.bind_loop_body(node.body);
        BoundStatement::While(self.arena.alloc(BoundWhileStatement {
            condition,
            body,
            break_label,
            continue_label,
        }))
    }

    fn bind_do_while_statement(
        &mut self,
        node: &'a syntax::DoWhileStatementSyntax<'a>,
    ) -> BoundStatement<'a> {
        let (body, break_label, continue_label) = self.bind_loop_body(node.body);
        let condition = self.bind_converted_expression(node.condition, TypeSymbol::Bool);
        BoundStatement::DoWhile(self.arena.alloc(BoundDoWhileStatement {
            body,
            condition,
            break_label,
            continue_label,
        }))
    }

    fn bind_for_statement(&mut self, node: &'a syntax::ForStatementSyntax<'a>) -> BoundStatement<'a> {
        let lower_bound = self.bind_converted_expression(node.lower_bound, TypeSymbol::Int);
        let upper_bound = self.bind_converted_expression(node.upper_bound, TypeSymbol::Int);

        // The induction variable lives in its own scope, visible only to the
        // loop body, and cannot be assigned there.
        self.push_scope();
        let variable = self.declare_variable(node.identifier, true, TypeSymbol::Int, None);
        let (body, break_label, continue_label) = self.bind_loop_body(node.body);
        self.pop_scope();

        BoundStatement::For(self.arena.alloc(BoundForStatement {
            variable,
            lower_bound,
            upper_bound,
            body,
            break_label,
            continue_label,
        }))
    }

    fn bind_break_statement(&mut self, node: &'a syntax::BreakStatementSyntax) -> BoundStatement<'a> {
        match self.loop_labels.last() {
            Some(&(break_label, _)) => {
                BoundStatement::Goto(self.arena.alloc(BoundGotoStatement { label: break_label }))
            }
            None => {
                self.diagnostics.report(
                    node.keyword.span,
                    &messages::INVALID_BREAK_OR_CONTINUE,
                    &[self.interner.resolve(node.keyword.text)],
                );
                self.error_statement()
            }
        }
    }

    fn bind_continue_statement(
        &mut self,
        node: &'a syntax::ContinueStatementSyntax,
    ) -> BoundStatement<'a> {
        match self.loop_labels.last() {
            Some(&(_, continue_label)) => BoundStatement::Goto(
                self.arena.alloc(BoundGotoStatement {
                    label: continue_label,
                }),
            ),
            None => {
                self.diagnostics.report(
                    node.keyword.span,
                    &messages::INVALID_BREAK_OR_CONTINUE,
                    &[self.interner.resolve(node.keyword.text)],
                );
                self.error_statement()
            }
        }
    }

    fn bind_return_statement(
        &mut self,
        node: &'a syntax::ReturnStatementSyntax<'a>,
    ) -> BoundStatement<'a> {
        let expression = node.expression.map(|e| self.bind_expression(e));

        let expression = match self.function {
            // Global statements belong to the synthetic script function,
            // whose type is Any: a bare `return` and `return <expr>` are
            // both fine.
            None => expression
                .map(|e| self.bind_conversion_to(e, TypeSymbol::Any, node.span(), false)),
            Some(function) => {
                if function.return_type == TypeSymbol::Void {
                    if expression.is_some() {
                        self.diagnostics.report(
                            node.span(),
                            &messages::INVALID_RETURN_EXPRESSION,
                            &[self.interner.resolve(function.name)],
                        );
                    }
                    None
                } else {
                    match expression {
                        None => {
                            self.diagnostics.report(
                                node.return_keyword.span,
                                &messages::MISSING_RETURN_EXPRESSION,
                                &[function.return_type.name()],
                            );
                            None
                        }
                        Some(e) => {
                            let span = node
                                .expression
                                .map(|e| e.span())
                                .unwrap_or(node.return_keyword.span);
                            Some(self.bind_conversion_to(e, function.return_type, span, false))
                        }
                    }
                }
            }
        };

        BoundStatement::Return(self.arena.alloc(BoundReturnStatement { expression }))
    }

    fn bind_expression_statement(
        &mut self,
        node: &'a syntax::ExpressionStatementSyntax<'a>,
    ) -> BoundStatement<'a> {
        let expression = self.bind_expression_internal(node.expression, true);
        BoundStatement::Expression(self.arena.alloc(BoundExpressionStatement { expression }))
    }

    fn error_statement(&mut self) -> BoundStatement<'a> {
        BoundStatement::Expression(self.arena.alloc(BoundExpressionStatement {
            expression: self.error_expression(),
        }))
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    pub fn bind_expression(&mut self, expression: syntax::Expression<'a>) -> BoundExpression<'a> {
        self.bind_expression_internal(expression, false)
    }

    fn bind_expression_internal(
        &mut self,
        expression: syntax::Expression<'a>,
        can_be_void: bool,
    ) -> BoundExpression<'a> {
        let bound = match expression {
            syntax::Expression::Literal(n) => self.bind_literal_expression(n),
            syntax::Expression::Name(n) => self.bind_name_expression(n),
            syntax::Expression::Unary(n) => self.bind_unary_expression(n),
            syntax::Expression::Binary(n) => self.bind_binary_expression(n),
            syntax::Expression::Parenthesized(n) => self.bind_expression(n.expression),
            syntax::Expression::Assignment(n) => self.bind_assignment_expression(n),
            syntax::Expression::Call(n) => self.bind_call_expression(n),
        };
        if !can_be_void && bound.ty() == TypeSymbol::Void {
            self.diagnostics
                .report(expression.span(), &messages::EXPRESSION_MUST_HAVE_VALUE, &[]);
            return self.error_expression();
        }
        bound
    }

    fn bind_converted_expression(
        &mut self,
        expression: syntax::Expression<'a>,
        ty: TypeSymbol,
    ) -> BoundExpression<'a> {
        let span = expression.span();
        let bound = self.bind_expression(expression);
        self.bind_conversion_to(bound, ty, span, false)
    }

    fn bind_literal_expression(
        &mut self,
        node: &'a syntax::LiteralExpressionSyntax,
    ) -> BoundExpression<'a> {
        let value = match (node.literal_token.kind, node.literal_token.value) {
            (_, TokenValue::Int(v)) => BoundConstant::Int(v),
            (_, TokenValue::String(s)) => BoundConstant::String(s),
            (SyntaxKind::TrueKeyword, _) => BoundConstant::Bool(true),
            (SyntaxKind::FalseKeyword, _) => BoundConstant::Bool(false),
            // A manufactured literal token; recover with zero.
            _ => BoundConstant::Int(0),
        };
        self.literal(value)
    }

    fn bind_name_expression(
        &mut self,
        node: &'a syntax::NameExpressionSyntax,
    ) -> BoundExpression<'a> {
        if node.identifier.is_missing {
            // The parser already reported the missing token.
            return self.error_expression();
        }
        match self.scope.lookup(node.identifier.text) {
            Some(ScopedSymbol::Variable(variable)) => {
                BoundExpression::Variable(self.arena.alloc(BoundVariableExpression { variable }))
            }
            Some(ScopedSymbol::Function(_)) => {
                self.diagnostics.report(
                    node.identifier.span,
                    &messages::NOT_A_VARIABLE,
                    &[self.interner.resolve(node.identifier.text)],
                );
                self.error_expression()
            }
            None => {
                self.diagnostics.report(
                    node.identifier.span,
                    &messages::VARIABLE_DOESNT_EXIST,
                    &[self.interner.resolve(node.identifier.text)],
                );
                self.literal(BoundConstant::Int(0))
            }
        }
    }

    fn bind_assignment_expression(
        &mut self,
        node: &'a syntax::AssignmentExpressionSyntax<'a>,
    ) -> BoundExpression<'a> {
        let expression = self.bind_expression(node.expression);

        let variable = match self.scope.lookup(node.identifier.text) {
            Some(ScopedSymbol::Variable(variable)) => {
                if variable.read_only {
                    self.diagnostics.report(
                        node.identifier.span,
                        &messages::VARIABLE_IS_READ_ONLY,
                        &[self.interner.resolve(node.identifier.text)],
                    );
                }
                variable
            }
            Some(ScopedSymbol::Function(_)) => {
                self.diagnostics.report(
                    node.identifier.span,
                    &messages::NOT_A_VARIABLE,
                    &[self.interner.resolve(node.identifier.text)],
                );
                return self.error_expression();
            }
            // Assignment to an unknown name declares it: Vesper is a
            // scripting language and `x = 10` is how scripts introduce
            // variables.
            None => {
                if node.identifier.is_missing || expression.ty().is_error() {
                    return self.error_expression();
                }
                self.declare_variable(node.identifier, false, expression.ty(), None)
            }
        };

        let expression =
            self.bind_conversion_to(expression, variable.ty, node.expression.span(), false);
        BoundExpression::Assignment(self.arena.alloc(BoundAssignmentExpression {
            variable,
            expression,
        }))
    }

    fn bind_unary_expression(
        &mut self,
        node: &'a syntax::UnaryExpressionSyntax<'a>,
    ) -> BoundExpression<'a> {
        let operand = self.bind_expression(node.operand);
        if operand.ty().is_error() {
            return self.error_expression();
        }
        let Some(op) = BoundUnaryOperator::bind(node.operator_token.kind, operand.ty()) else {
            self.diagnostics.report(
                node.operator_token.span,
                &messages::UNDEFINED_UNARY_OPERATOR,
                &[self.interner.resolve(node.operator_token.text), operand.ty().name()],
            );
            return operand;
        };
        let constant = fold_unary(op, operand.constant());
        BoundExpression::Unary(self.arena.alloc(BoundUnaryExpression {
            op,
            operand,
            constant,
        }))
    }

    fn bind_binary_expression(
        &mut self,
        node: &'a syntax::BinaryExpressionSyntax<'a>,
    ) -> BoundExpression<'a> {
        let left = self.bind_expression(node.left);
        let right = self.bind_expression(node.right);
        if left.ty().is_error() || right.ty().is_error() {
            return self.error_expression();
        }
        let Some(op) =
            BoundBinaryOperator::bind(node.operator_token.kind, left.ty(), right.ty())
        else {
            self.diagnostics.report(
                node.operator_token.span,
                &messages::UNDEFINED_BINARY_OPERATOR,
                &[
                    self.interner.resolve(node.operator_token.text),
                    left.ty().name(),
                    right.ty().name(),
                ],
            );
            return left;
        };
        let constant = fold_binary(op, left.constant(), right.constant(), &self.interner);
        BoundExpression::Binary(self.arena.alloc(BoundBinaryExpression {
            left,
            op,
            right,
            constant,
        }))
    }

    fn bind_call_expression(
        &mut self,
        node: &'a syntax::CallExpressionSyntax<'a>,
    ) -> BoundExpression<'a> {
        // A one-argument call to a type name is cast syntax: `Int("42")`.
        if node.arguments.len() == 1 {
            if let Some(ty) = TypeSymbol::lookup(self.interner.resolve(node.identifier.text)) {
                let argument = self.bind_expression(node.arguments[0]);
                return self.bind_conversion_to(argument, ty, node.arguments[0].span(), true);
            }
        }

        let function = match self.scope.lookup(node.identifier.text) {
            Some(ScopedSymbol::Function(function)) => function,
            Some(ScopedSymbol::Variable(_)) => {
                self.diagnostics.report(
                    node.identifier.span,
                    &messages::NOT_A_FUNCTION,
                    &[self.interner.resolve(node.identifier.text)],
                );
                return self.error_expression();
            }
            None => {
                if !node.identifier.is_missing {
                    self.diagnostics.report(
                        node.identifier.span,
                        &messages::FUNCTION_DOESNT_EXIST,
                        &[self.interner.resolve(node.identifier.text)],
                    );
                }
                return self.error_expression();
            }
        };

        if node.arguments.len() != function.parameters.len() {
            self.diagnostics.report(
                node.identifier.span.union(&node.close_paren_token.span),
                &messages::WRONG_ARGUMENT_COUNT,
                &[
                    self.interner.resolve(node.identifier.text),
                    &function.parameters.len().to_string(),
                    &node.arguments.len().to_string(),
                ],
            );
            return self.error_expression();
        }

        let mut arguments = Vec::with_capacity(node.arguments.len());
        for (argument, parameter) in node.arguments.iter().zip(function.parameters) {
            let span = argument.span();
            let bound = self.bind_expression(*argument);
            arguments.push(self.bind_conversion_to(bound, parameter.ty, span, false));
        }
        let arguments = self.arena.alloc_slice_copy(&arguments);
        BoundExpression::Call(self.arena.alloc(BoundCallExpression {
            function,
            arguments,
        }))
    }

    /// Wrap an expression in a conversion to `ty`, reporting when none (or
    /// only an explicit one, with `allow_explicit` false) exists.
    fn bind_conversion_to(
        &mut self,
        expression: BoundExpression<'a>,
        ty: TypeSymbol,
        span: TextSpan,
        allow_explicit: bool,
    ) -> BoundExpression<'a> {
        let from = expression.ty();
        let conversion = Conversion::classify(from, ty);

        if !conversion.exists() {
            if !from.is_error() && !ty.is_error() {
                self.diagnostics.report(
                    span,
                    &messages::CANNOT_CONVERT,
                    &[from.name(), ty.name()],
                );
            }
            return self.error_expression();
        }
        if !allow_explicit && conversion == Conversion::Explicit {
            self.diagnostics.report(
                span,
                &messages::CANNOT_CONVERT_IMPLICITLY,
                &[from.name(), ty.name()],
            );
            return self.error_expression();
        }
        if conversion.is_identity() {
            return expression;
        }
        BoundExpression::Conversion(self.arena.alloc(BoundConversionExpression {
            ty,
            expression,
        }))
    }

    fn literal(&mut self, value: BoundConstant) -> BoundExpression<'a> {
        BoundExpression::Literal(self.arena.alloc(BoundLiteralExpression { value }))
    }

    fn error_expression(&mut self) -> BoundExpression<'a> {
        BoundExpression::Error(self.arena.alloc(BoundErrorExpression))
    }
}
