use bumpalo::Bump;
use vesper_ir::label::BoundLabel;
use vesper_ir::node::*;
use vesper_ir::op::BoundBinaryOperator;
use vesper_ir::symbol::{SymbolId, VariableKind, VariableSymbol};
use vesper_ir::{BoundConstant, TypeSymbol};
use vesper_lowering::ControlFlowGraph;
use vesper_syntax::syntax_kind::SyntaxKind;

fn literal(arena: &Bump, value: BoundConstant) -> BoundExpression<'_> {
    BoundExpression::Literal(arena.alloc(BoundLiteralExpression { value }))
}

fn variable<'a>(
    arena: &'a Bump,
    id: u32,
    interner: &vesper_core::intern::StringInterner,
) -> BoundExpression<'a> {
    BoundExpression::Variable(arena.alloc(BoundVariableExpression {
        variable: VariableSymbol {
            id: SymbolId::new(id),
            name: interner.intern("v"),
            kind: VariableKind::Local,
            read_only: false,
            ty: TypeSymbol::Bool,
            constant: None,
        },
    }))
}

fn ret<'a>(arena: &'a Bump, expression: Option<BoundExpression<'a>>) -> BoundStatement<'a> {
    BoundStatement::Return(arena.alloc(BoundReturnStatement { expression }))
}

fn label(arena: &Bump, id: u32) -> BoundStatement<'_> {
    BoundStatement::Label(arena.alloc(BoundLabelStatement {
        label: BoundLabel::new(id),
    }))
}

fn goto(arena: &Bump, id: u32) -> BoundStatement<'_> {
    BoundStatement::Goto(arena.alloc(BoundGotoStatement {
        label: BoundLabel::new(id),
    }))
}

fn goto_if<'a>(
    arena: &'a Bump,
    id: u32,
    condition: BoundExpression<'a>,
    jump_if_true: bool,
) -> BoundStatement<'a> {
    BoundStatement::ConditionalGoto(arena.alloc(BoundConditionalGotoStatement {
        label: BoundLabel::new(id),
        condition,
        jump_if_true,
    }))
}

fn block<'a>(arena: &'a Bump, statements: &[BoundStatement<'a>]) -> &'a BoundBlockStatement<'a> {
    arena.alloc(BoundBlockStatement {
        statements: arena.alloc_slice_copy(statements),
    })
}

#[test]
fn single_return_covers_all_paths() {
    let arena = Bump::new();
    let body = block(&arena, &[ret(&arena, Some(literal(&arena, BoundConstant::Int(1))))]);
    let graph = ControlFlowGraph::create(&arena, body);
    assert!(graph.all_paths_return());
}

#[test]
fn fall_through_branch_fails_all_paths_return() {
    let arena = Bump::new();
    let interner = vesper_core::intern::StringInterner::new();
    // gotoFalse v end; return 1; end:
    let body = block(
        &arena,
        &[
            goto_if(&arena, 0, variable(&arena, 10, &interner), false),
            ret(&arena, Some(literal(&arena, BoundConstant::Int(1)))),
            label(&arena, 0),
        ],
    );
    let graph = ControlFlowGraph::create(&arena, body);
    assert!(!graph.all_paths_return());
}

#[test]
fn both_branches_returning_pass() {
    let arena = Bump::new();
    let interner = vesper_core::intern::StringInterner::new();
    // gotoFalse v else; return 1; else: return 2
    let body = block(
        &arena,
        &[
            goto_if(&arena, 0, variable(&arena, 10, &interner), false),
            ret(&arena, Some(literal(&arena, BoundConstant::Int(1)))),
            label(&arena, 0),
            ret(&arena, Some(literal(&arena, BoundConstant::Int(2)))),
        ],
    );
    let graph = ControlFlowGraph::create(&arena, body);
    assert!(graph.all_paths_return());
}

#[test]
fn statements_after_a_jump_are_unreachable() {
    let arena = Bump::new();
    let dead = BoundStatement::Expression(arena.alloc(BoundExpressionStatement {
        expression: literal(&arena, BoundConstant::Int(99)),
    }));
    // goto end; 99; end: return
    let body = block(
        &arena,
        &[goto(&arena, 0), dead, label(&arena, 0), ret(&arena, None)],
    );
    let graph = ControlFlowGraph::create(&arena, body);
    let reachable = graph.reachable_statements();
    assert_eq!(reachable.len(), 3);
    assert!(!reachable
        .iter()
        .any(|s| matches!(s, BoundStatement::Expression(_))));
}

#[test]
fn constant_false_guard_skips_the_branch() {
    let arena = Bump::new();
    // gotoTrue false target; return; target: <dead>
    let dead = BoundStatement::Expression(arena.alloc(BoundExpressionStatement {
        expression: literal(&arena, BoundConstant::Int(5)),
    }));
    let body = block(
        &arena,
        &[
            goto_if(&arena, 0, literal(&arena, BoundConstant::Bool(false)), true),
            ret(&arena, None),
            label(&arena, 0),
            dead,
        ],
    );
    let graph = ControlFlowGraph::create(&arena, body);
    let reachable = graph.reachable_statements();
    assert!(!reachable
        .iter()
        .any(|s| matches!(s, BoundStatement::Expression(_))));
    assert!(graph.all_paths_return());
}

#[test]
fn comparison_guards_keep_both_edges() {
    let arena = Bump::new();
    let op = BoundBinaryOperator::bind(SyntaxKind::LessToken, TypeSymbol::Int, TypeSymbol::Int)
        .unwrap();
    let condition = BoundExpression::Binary(arena.alloc(BoundBinaryExpression {
        left: literal(&arena, BoundConstant::Int(1)),
        op,
        right: literal(&arena, BoundConstant::Int(2)),
        constant: None,
    }));
    let body = block(
        &arena,
        &[
            goto_if(&arena, 0, condition, false),
            ret(&arena, Some(literal(&arena, BoundConstant::Int(1)))),
            label(&arena, 0),
            ret(&arena, Some(literal(&arena, BoundConstant::Int(2)))),
        ],
    );
    let graph = ControlFlowGraph::create(&arena, body);
    assert_eq!(graph.reachable_statements().len(), 4);

    // The jump-if-false branch pair: the taken edge carries the negated
    // guard, the fall-through edge carries the condition itself.
    let guarded: Vec<_> = graph
        .branches
        .iter()
        .filter(|b| b.condition.is_some())
        .collect();
    assert_eq!(guarded.len(), 2);
    assert!(guarded
        .iter()
        .any(|b| matches!(b.condition, Some(vesper_ir::node::BoundExpression::Unary(_)))));
    assert!(guarded
        .iter()
        .any(|b| matches!(b.condition, Some(vesper_ir::node::BoundExpression::Binary(_)))));
}
