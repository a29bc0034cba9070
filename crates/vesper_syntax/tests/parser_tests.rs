use bumpalo::Bump;
use vesper_core::intern::StringInterner;
use vesper_core::text::SourceText;
use vesper_syntax::node::{Expression, Member, Statement};
use vesper_syntax::syntax_kind::SyntaxKind;
use vesper_syntax::SyntaxTree;

fn parse<'a>(arena: &'a Bump, interner: &StringInterner, text: &str) -> SyntaxTree<'a> {
    SyntaxTree::parse(arena, interner, SourceText::new("test", text))
}

fn single_expression<'a>(tree: &SyntaxTree<'a>) -> Expression<'a> {
    assert_eq!(tree.root().members.len(), 1);
    match tree.root().members[0] {
        Member::GlobalStatement(global) => match global.statement {
            Statement::Expression(node) => node.expression,
            other => panic!("expected an expression statement, got {:?}", other),
        },
        _ => panic!("expected a global statement"),
    }
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    let arena = Bump::new();
    let interner = StringInterner::new();
    let tree = parse(&arena, &interner, "1 + 2 * 3");
    assert!(tree.diagnostics().is_empty());

    // (1 + (2 * 3))
    let Expression::Binary(add) = single_expression(&tree) else {
        panic!("expected a binary expression");
    };
    assert_eq!(add.operator_token.kind, SyntaxKind::PlusToken);
    let Expression::Binary(mul) = add.right else {
        panic!("expected the multiplication on the right");
    };
    assert_eq!(mul.operator_token.kind, SyntaxKind::StarToken);
}

#[test]
fn comparison_binds_tighter_than_logic() {
    let arena = Bump::new();
    let interner = StringInterner::new();
    let tree = parse(&arena, &interner, "1 < 2 && 3 < 4");
    assert!(tree.diagnostics().is_empty());

    let Expression::Binary(and) = single_expression(&tree) else {
        panic!("expected a binary expression");
    };
    assert_eq!(and.operator_token.kind, SyntaxKind::AmpersandAmpersandToken);
    assert!(matches!(and.left, Expression::Binary(_)));
    assert!(matches!(and.right, Expression::Binary(_)));
}

#[test]
fn unary_binds_tighter_than_binary() {
    let arena = Bump::new();
    let interner = StringInterner::new();
    let tree = parse(&arena, &interner, "-1 + 2");
    assert!(tree.diagnostics().is_empty());

    let Expression::Binary(add) = single_expression(&tree) else {
        panic!("expected a binary expression");
    };
    assert!(matches!(add.left, Expression::Unary(_)));
}

#[test]
fn assignment_is_right_associative() {
    let arena = Bump::new();
    let interner = StringInterner::new();
    let tree = parse(&arena, &interner, "a = b = 1");
    // a = (b = 1); the names are unbound but that's the binder's problem.
    let Expression::Assignment(outer) = single_expression(&tree) else {
        panic!("expected an assignment");
    };
    assert!(matches!(outer.expression, Expression::Assignment(_)));
}

#[test]
fn parses_function_declaration() {
    let arena = Bump::new();
    let interner = StringInterner::new();
    let tree = parse(
        &arena,
        &interner,
        "function add(a: Int, b: Int): Int { return a + b }",
    );
    assert!(tree.diagnostics().is_empty());

    let Member::Function(declaration) = tree.root().members[0] else {
        panic!("expected a function declaration");
    };
    assert_eq!(interner.resolve(declaration.identifier.text), "add");
    assert_eq!(declaration.parameters.len(), 2);
    assert!(declaration.type_clause.is_some());
    assert_eq!(declaration.body.statements.len(), 1);
}

#[test]
fn parses_for_statement() {
    let arena = Bump::new();
    let interner = StringInterner::new();
    let tree = parse(&arena, &interner, "for i = 1 to 10 { print(String(i)) }");
    assert!(tree.diagnostics().is_empty());

    let Member::GlobalStatement(global) = tree.root().members[0] else {
        panic!("expected a global statement");
    };
    let Statement::For(node) = global.statement else {
        panic!("expected a for statement");
    };
    assert_eq!(interner.resolve(node.identifier.text), "i");
}

#[test]
fn missing_token_is_manufactured_with_diagnostic() {
    let arena = Bump::new();
    let interner = StringInterner::new();
    let tree = parse(&arena, &interner, "(1 + 2");
    assert_eq!(tree.diagnostics().len(), 1);
    assert_eq!(tree.diagnostics()[0].code, 1101);

    // The tree is still complete.
    let Expression::Parenthesized(node) = single_expression(&tree) else {
        panic!("expected a parenthesized expression");
    };
    assert!(node.close_paren_token.is_missing);
}

#[test]
fn return_expression_stays_on_the_same_line() {
    let arena = Bump::new();
    let interner = StringInterner::new();
    let tree = parse(
        &arena,
        &interner,
        "function f(): Int {\n    return 1\n}\nvar x = 2",
    );
    assert!(tree.diagnostics().is_empty());

    // `return` followed by a newline takes no expression.
    let tree = parse(&arena, &interner, "function g() {\n    return\n    1\n}");
    assert!(tree.diagnostics().is_empty());
    let Member::Function(declaration) = tree.root().members[0] else {
        panic!("expected a function declaration");
    };
    let Statement::Return(node) = declaration.body.statements[0] else {
        panic!("expected a return statement");
    };
    assert!(node.expression.is_none());
}

#[test]
fn do_while_round_trips() {
    let arena = Bump::new();
    let interner = StringInterner::new();
    let tree = parse(&arena, &interner, "var i = 0 do { i = i + 1 } while i < 3");
    assert!(tree.diagnostics().is_empty());
    assert_eq!(tree.root().members.len(), 2);
}
