//! Functional rewriting over the bound tree.
//!
//! [`BoundTreeRewriter`] walks a bound tree and rebuilds it through
//! overridable per-kind methods. The defaults preserve identity: a node is
//! reconstructed only when one of its children actually changed, checked by
//! pointer equality on the arena-allocated payloads, so untouched subtrees
//! are shared between the old and new trees.

use bumpalo::Bump;
use vesper_ir::node::*;

/// Pointer identity of two statements.
pub fn same_statement(a: BoundStatement<'_>, b: BoundStatement<'_>) -> bool {
    use BoundStatement::*;
    match (a, b) {
        (Block(x), Block(y)) => std::ptr::eq(x, y),
        (VariableDeclaration(x), VariableDeclaration(y)) => std::ptr::eq(x, y),
        (Expression(x), Expression(y)) => std::ptr::eq(x, y),
        (If(x), If(y)) => std::ptr::eq(x, y),
        (While(x), While(y)) => std::ptr::eq(x, y),
        (DoWhile(x), DoWhile(y)) => std::ptr::eq(x, y),
        (For(x), For(y)) => std::ptr::eq(x, y),
        (Label(x), Label(y)) => std::ptr::eq(x, y),
        (Goto(x), Goto(y)) => std::ptr::eq(x, y),
        (ConditionalGoto(x), ConditionalGoto(y)) => std::ptr::eq(x, y),
        (Return(x), Return(y)) => std::ptr::eq(x, y),
        (Nop(x), Nop(y)) => std::ptr::eq(x, y),
        _ => false,
    }
}

/// Pointer identity of two expressions.
pub fn same_expression(a: BoundExpression<'_>, b: BoundExpression<'_>) -> bool {
    use BoundExpression::*;
    match (a, b) {
        (Literal(x), Literal(y)) => std::ptr::eq(x, y),
        (Variable(x), Variable(y)) => std::ptr::eq(x, y),
        (Assignment(x), Assignment(y)) => std::ptr::eq(x, y),
        (Unary(x), Unary(y)) => std::ptr::eq(x, y),
        (Binary(x), Binary(y)) => std::ptr::eq(x, y),
        (Call(x), Call(y)) => std::ptr::eq(x, y),
        (Conversion(x), Conversion(y)) => std::ptr::eq(x, y),
        (Error(x), Error(y)) => std::ptr::eq(x, y),
        _ => false,
    }
}

pub trait BoundTreeRewriter<'a> {
    fn arena(&self) -> &'a Bump;

    // ========================================================================
    // Statements
    // ========================================================================

    fn rewrite_statement(&mut self, statement: BoundStatement<'a>) -> BoundStatement<'a> {
        match statement {
            BoundStatement::Block(n) => self.rewrite_block_statement(n),
            BoundStatement::VariableDeclaration(n) => self.rewrite_variable_declaration(n),
            BoundStatement::Expression(n) => self.rewrite_expression_statement(n),
            BoundStatement::If(n) => self.rewrite_if_statement(n),
            BoundStatement::While(n) => self.rewrite_while_statement(n),
            BoundStatement::DoWhile(n) => self.rewrite_do_while_statement(n),
            BoundStatement::For(n) => self.rewrite_for_statement(n),
            BoundStatement::Label(_) | BoundStatement::Goto(_) | BoundStatement::Nop(_) => {
                statement
            }
            BoundStatement::ConditionalGoto(n) => self.rewrite_conditional_goto_statement(n),
            BoundStatement::Return(n) => self.rewrite_return_statement(n),
        }
    }

    fn rewrite_block_statement(&mut self, node: &'a BoundBlockStatement<'a>) -> BoundStatement<'a> {
        let mut changed: Option<Vec<BoundStatement<'a>>> = None;
        for (index, statement) in node.statements.iter().enumerate() {
            let rewritten = self.rewrite_statement(*statement);
            if changed.is_none() && !same_statement(rewritten, *statement) {
                let mut statements = Vec::with_capacity(node.statements.len());
                statements.extend_from_slice(&node.statements[..index]);
                changed = Some(statements);
            }
            if let Some(statements) = &mut changed {
                statements.push(rewritten);
            }
        }
        match changed {
            None => BoundStatement::Block(node),
            Some(statements) => {
                let statements = self.arena().alloc_slice_copy(&statements);
                BoundStatement::Block(self.arena().alloc(BoundBlockStatement { statements }))
            }
        }
    }

    fn rewrite_variable_declaration(
        &mut self,
        node: &'a BoundVariableDeclaration<'a>,
    ) -> BoundStatement<'a> {
        let initializer = self.rewrite_expression(node.initializer);
        if same_expression(initializer, node.initializer) {
            return BoundStatement::VariableDeclaration(node);
        }
        BoundStatement::VariableDeclaration(self.arena().alloc(BoundVariableDeclaration {
            variable: node.variable,
            initializer,
        }))
    }

    fn rewrite_expression_statement(
        &mut self,
        node: &'a BoundExpressionStatement<'a>,
    ) -> BoundStatement<'a> {
        let expression = self.rewrite_expression(node.expression);
        if same_expression(expression, node.expression) {
            return BoundStatement::Expression(node);
        }
        BoundStatement::Expression(
            self.arena().alloc(BoundExpressionStatement { expression }),
        )
    }

    fn rewrite_if_statement(&mut self, node: &'a BoundIfStatement<'a>) -> BoundStatement<'a> {
        let condition = self.rewrite_expression(node.condition);
        let then_statement = self.rewrite_statement(node.then_statement);
        let else_statement = node.else_statement.map(|s| self.rewrite_statement(s));
        let unchanged = same_expression(condition, node.condition)
            && same_statement(then_statement, node.then_statement)
            && match (else_statement, node.else_statement) {
                (None, None) => true,
                (Some(a), Some(b)) => same_statement(a, b),
                _ => false,
            };
        if unchanged {
            return BoundStatement::If(node);
        }
        BoundStatement::If(self.arena().alloc(BoundIfStatement {
            condition,
            then_statement,
            else_statement,
        }))
    }

    fn rewrite_while_statement(&mut self, node: &'a BoundWhileStatement<'a>) -> BoundStatement<'a> {
        let condition = self.rewrite_expression(node.condition);
        let body = self.rewrite_statement(node.body);
        if same_expression(condition, node.condition) && same_statement(body, node.body) {
            return BoundStatement::While(node);
        }
        BoundStatement::While(self.arena().alloc(BoundWhileStatement {
            condition,
            body,
            break_label: node.break_label,
            continue_label: node.continue_label,
        }))
    }

    fn rewrite_do_while_statement(
        &mut self,
        node: &'a BoundDoWhileStatement<'a>,
    ) -> BoundStatement<'a> {
        let body = self.rewrite_statement(node.body);
        let condition = self.rewrite_expression(node.condition);
        if same_statement(body, node.body) && same_expression(condition, node.condition) {
            return BoundStatement::DoWhile(node);
        }
        BoundStatement::DoWhile(self.arena().alloc(BoundDoWhileStatement {
            body,
            condition,
            break_label: node.break_label,
            continue_label: node.continue_label,
        }))
    }

    fn rewrite_for_statement(&mut self, node: &'a BoundForStatement<'a>) -> BoundStatement<'a> {
        let lower_bound = self.rewrite_expression(node.lower_bound);
        let upper_bound = self.rewrite_expression(node.upper_bound);
        let body = self.rewrite_statement(node.body);
        if same_expression(lower_bound, node.lower_bound)
            && same_expression(upper_bound, node.upper_bound)
            && same_statement(body, node.body)
        {
            return BoundStatement::For(node);
        }
        BoundStatement::For(self.arena().alloc(BoundForStatement {
            variable: node.variable,
            lower_bound,
            upper_bound,
            body,
            break_label: node.break_label,
            continue_label: node.continue_label,
        }))
    }

    fn rewrite_conditional_goto_statement(
        &mut self,
        node: &'a BoundConditionalGotoStatement<'a>,
    ) -> BoundStatement<'a> {
        let condition = self.rewrite_expression(node.condition);
        if same_expression(condition, node.condition) {
            return BoundStatement::ConditionalGoto(node);
        }
        BoundStatement::ConditionalGoto(self.arena().alloc(BoundConditionalGotoStatement {
            label: node.label,
            condition,
            jump_if_true: node.jump_if_true,
        }))
    }

    fn rewrite_return_statement(
        &mut self,
        node: &'a BoundReturnStatement<'a>,
    ) -> BoundStatement<'a> {
        let expression = node.expression.map(|e| self.rewrite_expression(e));
        let unchanged = match (expression, node.expression) {
            (None, None) => true,
            (Some(a), Some(b)) => same_expression(a, b),
            _ => false,
        };
        if unchanged {
            return BoundStatement::Return(node);
        }
        BoundStatement::Return(self.arena().alloc(BoundReturnStatement { expression }))
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn rewrite_expression(&mut self, expression: BoundExpression<'a>) -> BoundExpression<'a> {
        match expression {
            BoundExpression::Literal(_)
            | BoundExpression::Variable(_)
            | BoundExpression::Error(_) => expression,
            BoundExpression::Assignment(n) => self.rewrite_assignment_expression(n),
            BoundExpression::Unary(n) => self.rewrite_unary_expression(n),
            BoundExpression::Binary(n) => self.rewrite_binary_expression(n),
            BoundExpression::Call(n) => self.rewrite_call_expression(n),
            BoundExpression::Conversion(n) => self.rewrite_conversion_expression(n),
        }
    }

    fn rewrite_assignment_expression(
        &mut self,
        node: &'a BoundAssignmentExpression<'a>,
    ) -> BoundExpression<'a> {
        let expression = self.rewrite_expression(node.expression);
        if same_expression(expression, node.expression) {
            return BoundExpression::Assignment(node);
        }
        BoundExpression::Assignment(self.arena().alloc(BoundAssignmentExpression {
            variable: node.variable,
            expression,
        }))
    }

    fn rewrite_unary_expression(
        &mut self,
        node: &'a BoundUnaryExpression<'a>,
    ) -> BoundExpression<'a> {
        let operand = self.rewrite_expression(node.operand);
        if same_expression(operand, node.operand) {
            return BoundExpression::Unary(node);
        }
        BoundExpression::Unary(self.arena().alloc(BoundUnaryExpression {
            op: node.op,
            operand,
            constant: node.constant,
        }))
    }

    fn rewrite_binary_expression(
        &mut self,
        node: &'a BoundBinaryExpression<'a>,
    ) -> BoundExpression<'a> {
        let left = self.rewrite_expression(node.left);
        let right = self.rewrite_expression(node.right);
        if same_expression(left, node.left) && same_expression(right, node.right) {
            return BoundExpression::Binary(node);
        }
        BoundExpression::Binary(self.arena().alloc(BoundBinaryExpression {
            left,
            op: node.op,
            right,
            constant: node.constant,
        }))
    }

    fn rewrite_call_expression(
        &mut self,
        node: &'a BoundCallExpression<'a>,
    ) -> BoundExpression<'a> {
        let mut changed: Option<Vec<BoundExpression<'a>>> = None;
        for (index, argument) in node.arguments.iter().enumerate() {
            let rewritten = self.rewrite_expression(*argument);
            if changed.is_none() && !same_expression(rewritten, *argument) {
                let mut arguments = Vec::with_capacity(node.arguments.len());
                arguments.extend_from_slice(&node.arguments[..index]);
                changed = Some(arguments);
            }
            if let Some(arguments) = &mut changed {
                arguments.push(rewritten);
            }
        }
        match changed {
            None => BoundExpression::Call(node),
            Some(arguments) => {
                let arguments = self.arena().alloc_slice_copy(&arguments);
                BoundExpression::Call(self.arena().alloc(BoundCallExpression {
                    function: node.function,
                    arguments,
                }))
            }
        }
    }

    fn rewrite_conversion_expression(
        &mut self,
        node: &'a BoundConversionExpression<'a>,
    ) -> BoundExpression<'a> {
        let expression = self.rewrite_expression(node.expression);
        if same_expression(expression, node.expression) {
            return BoundExpression::Conversion(node);
        }
        BoundExpression::Conversion(self.arena().alloc(BoundConversionExpression {
            ty: node.ty,
            expression,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vesper_ir::BoundConstant;

    #[test]
    fn identity_is_pointer_equality() {
        let arena = Bump::new();
        let lit = BoundExpression::Literal(arena.alloc(BoundLiteralExpression {
            value: BoundConstant::Int(1),
        }));
        let copy = BoundExpression::Literal(arena.alloc(BoundLiteralExpression {
            value: BoundConstant::Int(1),
        }));
        assert!(same_expression(lit, lit));
        assert!(!same_expression(lit, copy));
    }

    #[test]
    fn different_variants_are_never_the_same() {
        let arena = Bump::new();
        let lit = BoundExpression::Literal(arena.alloc(BoundLiteralExpression {
            value: BoundConstant::Bool(true),
        }));
        let error = BoundExpression::Error(arena.alloc(BoundErrorExpression));
        assert!(!same_expression(lit, error));
        assert!(!same_expression(error, lit));
    }
}
