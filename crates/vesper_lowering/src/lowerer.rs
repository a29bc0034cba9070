//! Lowering: structured control flow down to labels and gotos.
//!
//! The evaluator only understands straight-line code with labels, gotos, and
//! conditional gotos, so every `if`, `while`, `do while`, and `for` is
//! rewritten into that form here. The result of [`Lowerer::lower_body`] is a
//! single flat block.

use bumpalo::Bump;
use vesper_core::intern::StringInterner;
use vesper_ir::constant::BoundConstant;
use vesper_ir::label::BoundLabel;
use vesper_ir::node::*;
use vesper_ir::op::BoundBinaryOperator;
use vesper_ir::symbol::{SymbolId, VariableKind, VariableSymbol};
use vesper_ir::ty::TypeSymbol;
use vesper_syntax::syntax_kind::SyntaxKind;

use crate::cfg::ControlFlowGraph;
use crate::rewriter::BoundTreeRewriter;

pub struct Lowerer<'a> {
    arena: &'a Bump,
    interner: StringInterner,
    label_count: u32,
    symbol_count: u32,
}

impl<'a> Lowerer<'a> {
    /// Seeds continue the binder's counters so labels and synthetic symbols
    /// never collide with ones already handed out.
    pub fn new(
        arena: &'a Bump,
        interner: StringInterner,
        label_seed: u32,
        symbol_seed: u32,
    ) -> Self {
        Self {
            arena,
            interner,
            label_count: label_seed,
            symbol_count: symbol_seed,
        }
    }

    pub fn label_count(&self) -> u32 {
        self.label_count
    }

    pub fn symbol_count(&self) -> u32 {
        self.symbol_count
    }

    /// Lower one function body to a flat block of labels, gotos, and simple
    /// statements, then drop whatever the control-flow graph proves
    /// unreachable.
    pub fn lower_body(
        &mut self,
        body: BoundStatement<'a>,
        return_type: TypeSymbol,
    ) -> &'a BoundBlockStatement<'a> {
        let rewritten = self.rewrite_statement(body);
        let flat = self.flatten(rewritten, return_type);
        self.remove_dead_code(flat)
    }

    fn fresh_label(&mut self) -> BoundLabel {
        let label = BoundLabel::new(self.label_count);
        self.label_count += 1;
        label
    }

    fn fresh_bound_variable(&mut self, constant: Option<BoundConstant>) -> VariableSymbol {
        let id = SymbolId::new(self.symbol_count);
        self.symbol_count += 1;
        VariableSymbol {
            id,
            name: self.interner.intern_static("upperBound"),
            kind: VariableKind::Local,
            read_only: true,
            ty: TypeSymbol::Int,
            constant,
        }
    }

    // Small node constructors used by the rewrites below.

    fn block(&self, statements: &[BoundStatement<'a>]) -> BoundStatement<'a> {
        let statements = self.arena.alloc_slice_copy(statements);
        BoundStatement::Block(self.arena.alloc(BoundBlockStatement { statements }))
    }

    fn label(&self, label: BoundLabel) -> BoundStatement<'a> {
        BoundStatement::Label(self.arena.alloc(BoundLabelStatement { label }))
    }

    fn goto(&self, label: BoundLabel) -> BoundStatement<'a> {
        BoundStatement::Goto(self.arena.alloc(BoundGotoStatement { label }))
    }

    fn goto_if(
        &self,
        label: BoundLabel,
        condition: BoundExpression<'a>,
        jump_if_true: bool,
    ) -> BoundStatement<'a> {
        BoundStatement::ConditionalGoto(self.arena.alloc(BoundConditionalGotoStatement {
            label,
            condition,
            jump_if_true,
        }))
    }

    fn variable(&self, variable: VariableSymbol) -> BoundExpression<'a> {
        BoundExpression::Variable(self.arena.alloc(BoundVariableExpression { variable }))
    }

    fn literal(&self, value: BoundConstant) -> BoundExpression<'a> {
        BoundExpression::Literal(self.arena.alloc(BoundLiteralExpression { value }))
    }

    fn flatten(
        &mut self,
        statement: BoundStatement<'a>,
        return_type: TypeSymbol,
    ) -> &'a BoundBlockStatement<'a> {
        let mut statements = Vec::new();
        let mut stack = vec![statement];
        while let Some(current) = stack.pop() {
            if let BoundStatement::Block(block) = current {
                for &inner in block.statements.iter().rev() {
                    stack.push(inner);
                }
            } else {
                statements.push(current);
            }
        }

        if return_type == TypeSymbol::Void && can_fall_through(statements.last()) {
            statements.push(BoundStatement::Return(
                self.arena.alloc(BoundReturnStatement { expression: None }),
            ));
        }

        let statements = self.arena.alloc_slice_copy(&statements);
        self.arena.alloc(BoundBlockStatement { statements })
    }

    fn remove_dead_code(
        &mut self,
        block: &'a BoundBlockStatement<'a>,
    ) -> &'a BoundBlockStatement<'a> {
        let graph = ControlFlowGraph::create(self.arena, block);
        let reachable = graph.reachable_statements();
        if reachable.len() == block.statements.len() {
            return block;
        }
        let statements = self.arena.alloc_slice_copy(&reachable);
        self.arena.alloc(BoundBlockStatement { statements })
    }
}

fn can_fall_through(last: Option<&BoundStatement<'_>>) -> bool {
    !matches!(
        last,
        Some(BoundStatement::Return(_)) | Some(BoundStatement::Goto(_))
    )
}

impl<'a> BoundTreeRewriter<'a> for Lowerer<'a> {
    fn arena(&self) -> &'a Bump {
        self.arena
    }

    // if <condition> <then>
    //
    //      gotoFalse <condition> end
    //      <then>
    //      end:
    //
    // if <condition> <then> else <else>
    //
    //      gotoFalse <condition> else
    //      <then>
    //      goto end
    //      else:
    //      <else>
    //      end:
    fn rewrite_if_statement(&mut self, node: &'a BoundIfStatement<'a>) -> BoundStatement<'a> {
        let result = match node.else_statement {
            None => {
                let end_label = self.fresh_label();
                self.block(&[
                    self.goto_if(end_label, node.condition, false),
                    node.then_statement,
                    self.label(end_label),
                ])
            }
            Some(else_statement) => {
                let else_label = self.fresh_label();
                let end_label = self.fresh_label();
                self.block(&[
                    self.goto_if(else_label, node.condition, false),
                    node.then_statement,
                    self.goto(end_label),
                    self.label(else_label),
                    else_statement,
                    self.label(end_label),
                ])
            }
        };
        self.rewrite_statement(result)
    }

    // while <condition> <body>
    //
    //      goto continue
    //      body:
    //      <body>
    //      continue:
    //      gotoTrue <condition> body
    //      break:
    fn rewrite_while_statement(&mut self, node: &'a BoundWhileStatement<'a>) -> BoundStatement<'a> {
        let body_label = self.fresh_label();
        let result = self.block(&[
            self.goto(node.continue_label),
            self.label(body_label),
            node.body,
            self.label(node.continue_label),
            self.goto_if(body_label, node.condition, true),
            self.label(node.break_label),
        ]);
        self.rewrite_statement(result)
    }

    // do <body> while <condition>
    //
    //      body:
    //      <body>
    //      continue:
    //      gotoTrue <condition> body
    //      break:
    fn rewrite_do_while_statement(
        &mut self,
        node: &'a BoundDoWhileStatement<'a>,
    ) -> BoundStatement<'a> {
        let body_label = self.fresh_label();
        let result = self.block(&[
            self.label(body_label),
            node.body,
            self.label(node.continue_label),
            self.goto_if(body_label, node.condition, true),
            self.label(node.break_label),
        ]);
        self.rewrite_statement(result)
    }

    // for <var> = <lower> to <upper> <body>
    //
    //      {
    //          var <var> = <lower>
    //          let upperBound = <upper>
    //          while <var> <= upperBound {
    //              <body>
    //              continue:
    //              <var> = <var> + 1
    //          }
    //      }
    //
    // The upper bound is captured once so it is evaluated exactly once. The
    // inner while gets its own continue label; the loop's continue label sits
    // just before the increment so `continue` still advances the variable.
    fn rewrite_for_statement(&mut self, node: &'a BoundForStatement<'a>) -> BoundStatement<'a> {
        let declaration = BoundStatement::VariableDeclaration(self.arena.alloc(
            BoundVariableDeclaration {
                variable: node.variable,
                initializer: node.lower_bound,
            },
        ));

        let upper_bound = self.fresh_bound_variable(node.upper_bound.constant());
        let upper_declaration = BoundStatement::VariableDeclaration(self.arena.alloc(
            BoundVariableDeclaration {
                variable: upper_bound,
                initializer: node.upper_bound,
            },
        ));

        let le = BoundBinaryOperator::bind(
            SyntaxKind::LessOrEqualsToken,
            TypeSymbol::Int,
            TypeSymbol::Int,
        )
        .expect("operator table covers Int <= Int");
        let condition = BoundExpression::Binary(self.arena.alloc(BoundBinaryExpression {
            left: self.variable(node.variable),
            op: le,
            right: self.variable(upper_bound),
            constant: None,
        }));

        let plus =
            BoundBinaryOperator::bind(SyntaxKind::PlusToken, TypeSymbol::Int, TypeSymbol::Int)
                .expect("operator table covers Int + Int");
        let increment_value = BoundExpression::Binary(self.arena.alloc(BoundBinaryExpression {
            left: self.variable(node.variable),
            op: plus,
            right: self.literal(BoundConstant::Int(1)),
            constant: None,
        }));
        let increment =
            BoundStatement::Expression(self.arena.alloc(BoundExpressionStatement {
                expression: BoundExpression::Assignment(self.arena.alloc(
                    BoundAssignmentExpression {
                        variable: node.variable,
                        expression: increment_value,
                    },
                )),
            }));

        let while_body = self.block(&[node.body, self.label(node.continue_label), increment]);
        let while_continue = self.fresh_label();
        let while_statement = BoundStatement::While(self.arena.alloc(BoundWhileStatement {
            condition,
            body: while_body,
            break_label: node.break_label,
            continue_label: while_continue,
        }));

        let result = self.block(&[declaration, upper_declaration, while_statement]);
        self.rewrite_statement(result)
    }

    // A conditional jump whose condition is known at compile time becomes an
    // unconditional jump or disappears.
    fn rewrite_conditional_goto_statement(
        &mut self,
        node: &'a BoundConditionalGotoStatement<'a>,
    ) -> BoundStatement<'a> {
        let condition = self.rewrite_expression(node.condition);
        if let Some(BoundConstant::Bool(value)) = condition.constant() {
            return if value == node.jump_if_true {
                self.goto(node.label)
            } else {
                BoundStatement::Nop(self.arena.alloc(BoundNopStatement))
            };
        }
        if crate::rewriter::same_expression(condition, node.condition) {
            return BoundStatement::ConditionalGoto(node);
        }
        BoundStatement::ConditionalGoto(self.arena.alloc(BoundConditionalGotoStatement {
            label: node.label,
            condition,
            jump_if_true: node.jump_if_true,
        }))
    }
}
