use bumpalo::Bump;
use vesper_binder::program::{bind_global_scope, bind_program, BoundGlobalScope};
use vesper_core::intern::StringInterner;
use vesper_core::text::SourceText;
use vesper_ir::node::{BoundExpression, BoundStatement};
use vesper_ir::{BoundConstant, TypeSymbol};
use vesper_syntax::SyntaxTree;

fn bind<'a>(arena: &'a Bump, interner: &StringInterner, text: &str) -> BoundGlobalScope<'a> {
    let tree = SyntaxTree::parse(arena, interner, SourceText::new("test", text));
    assert!(
        tree.diagnostics().is_empty(),
        "parse diagnostics: {:?}",
        tree.diagnostics()
    );
    bind_global_scope(arena, interner, None, &tree)
}

fn messages(scope: &BoundGlobalScope<'_>) -> Vec<String> {
    scope
        .diagnostics
        .iter()
        .map(|d| d.message_text.clone())
        .collect()
}

#[test]
fn undefined_variable_reports_exact_message() {
    let arena = Bump::new();
    let interner = StringInterner::new();
    let scope = bind(&arena, &interner, "x + 1");
    assert_eq!(messages(&scope), vec!["Variable 'x' doesn't exist."]);
}

#[test]
fn undefined_name_recovers_with_zero() {
    let arena = Bump::new();
    let interner = StringInterner::new();
    // Binding continues past the bad name; only one diagnostic results.
    let scope = bind(&arena, &interner, "var y = x + 1");
    assert_eq!(scope.diagnostics.len(), 1);
    assert_eq!(scope.variables.len(), 1);
    assert_eq!(scope.variables[0].ty, TypeSymbol::Int);
}

#[test]
fn redeclaration_in_same_scope_is_an_error() {
    let arena = Bump::new();
    let interner = StringInterner::new();
    let scope = bind(&arena, &interner, "var x = 1 var x = 2");
    assert_eq!(messages(&scope), vec!["'x' is already declared."]);
}

#[test]
fn assignment_declares_unknown_names() {
    let arena = Bump::new();
    let interner = StringInterner::new();
    let scope = bind(&arena, &interner, "x = 10 x = x + 1");
    assert!(scope.diagnostics.is_empty(), "{:?}", scope.diagnostics);
    assert_eq!(scope.variables.len(), 1);
    assert_eq!(scope.variables[0].ty, TypeSymbol::Int);
    assert!(!scope.variables[0].read_only);
}

#[test]
fn later_assignment_with_wrong_type_is_reported() {
    let arena = Bump::new();
    let interner = StringInterner::new();
    let scope = bind(&arena, &interner, "x = 10 x = true");
    assert_eq!(
        messages(&scope),
        vec!["Cannot convert type 'Bool' to type 'Int'."]
    );
}

#[test]
fn let_variables_are_read_only() {
    let arena = Bump::new();
    let interner = StringInterner::new();
    let scope = bind(&arena, &interner, "let x = 1 x = 2");
    assert_eq!(
        messages(&scope),
        vec!["Variable 'x' is read-only and cannot be assigned to."]
    );
}

#[test]
fn explicit_conversion_needs_cast_syntax() {
    let arena = Bump::new();
    let interner = StringInterner::new();
    let scope = bind(&arena, &interner, "print(42)");
    assert_eq!(scope.diagnostics.len(), 1);
    assert!(scope.diagnostics[0]
        .message_text
        .starts_with("Cannot convert type 'Int' to type 'String'. An explicit conversion exists"));

    let scope = bind(&arena, &interner, "print(String(42))");
    assert!(scope.diagnostics.is_empty(), "{:?}", scope.diagnostics);
}

#[test]
fn cast_call_binds_a_conversion() {
    let arena = Bump::new();
    let interner = StringInterner::new();
    let scope = bind(&arena, &interner, "var x = Int(\"42\")");
    assert!(scope.diagnostics.is_empty());
    let BoundStatement::VariableDeclaration(declaration) = scope.statements[0] else {
        panic!("expected a variable declaration");
    };
    assert!(matches!(
        declaration.initializer,
        BoundExpression::Conversion(_)
    ));
    assert_eq!(declaration.variable.ty, TypeSymbol::Int);
}

#[test]
fn undefined_operator_reports_types() {
    let arena = Bump::new();
    let interner = StringInterner::new();
    let scope = bind(&arena, &interner, "true + 1");
    assert_eq!(
        messages(&scope),
        vec!["Binary operator '+' is not defined for types 'Bool' and 'Int'."]
    );
}

#[test]
fn constant_expressions_fold() {
    let arena = Bump::new();
    let interner = StringInterner::new();
    let scope = bind(&arena, &interner, "let x = 1 + 2 * 3");
    assert!(scope.diagnostics.is_empty());
    assert_eq!(scope.variables[0].constant, Some(BoundConstant::Int(7)));
}

#[test]
fn division_by_constant_zero_does_not_fold() {
    let arena = Bump::new();
    let interner = StringInterner::new();
    let scope = bind(&arena, &interner, "let x = 1 / 0");
    assert!(scope.diagnostics.is_empty());
    assert_eq!(scope.variables[0].constant, None);
}

#[test]
fn break_outside_loop_is_an_error() {
    let arena = Bump::new();
    let interner = StringInterner::new();
    let scope = bind(&arena, &interner, "break");
    assert_eq!(
        messages(&scope),
        vec!["The keyword 'break' can only be used inside of loops."]
    );
}

#[test]
fn global_blocks_share_the_submission_scope() {
    let arena = Bump::new();
    let interner = StringInterner::new();
    // A name introduced inside a top-level block stays visible after it.
    let scope = bind(&arena, &interner, "{ var i = 0 i = i + 1 } i");
    assert!(scope.diagnostics.is_empty(), "{:?}", scope.diagnostics);
}

#[test]
fn function_blocks_scope_normally() {
    let arena = Bump::new();
    let interner = StringInterner::new();
    let scope = bind(
        &arena,
        &interner,
        "function f(): Int { { var i = 0 } return i }",
    );
    assert_eq!(scope.diagnostics.len(), 0);
    let program = bind_program(&arena, &interner, None, &scope);
    assert_eq!(
        program.diagnostics[0].message_text,
        "Variable 'i' doesn't exist."
    );
}

#[test]
fn for_variable_is_scoped_to_the_loop() {
    let arena = Bump::new();
    let interner = StringInterner::new();
    let scope = bind(&arena, &interner, "for i = 1 to 3 { } i");
    assert_eq!(messages(&scope), vec!["Variable 'i' doesn't exist."]);
}

#[test]
fn all_paths_must_return() {
    let arena = Bump::new();
    let interner = StringInterner::new();
    let scope = bind(
        &arena,
        &interner,
        "function f(n: Int): Int { if n > 0 return 1 }",
    );
    assert!(scope.diagnostics.is_empty());
    let program = bind_program(&arena, &interner, None, &scope);
    assert_eq!(
        program
            .diagnostics
            .iter()
            .map(|d| d.message_text.as_str())
            .collect::<Vec<_>>(),
        vec!["Not all code paths return a value."]
    );

    let scope = bind(
        &arena,
        &interner,
        "function g(n: Int): Int { if n > 0 return 1 else return 2 }",
    );
    let program = bind_program(&arena, &interner, None, &scope);
    assert!(program.diagnostics.is_empty(), "{:?}", program.diagnostics);
}

#[test]
fn wrong_argument_count() {
    let arena = Bump::new();
    let interner = StringInterner::new();
    let scope = bind(&arena, &interner, "rnd(1)");
    assert_eq!(
        messages(&scope),
        vec!["Function 'rnd' requires 2 arguments but was given 1."]
    );
}

#[test]
fn symbol_ids_are_deterministic() {
    let arena = Bump::new();
    let interner = StringInterner::new();
    let text = "var a = 1 var b = 2 function f() { }";
    let first = bind(&arena, &interner, text);
    let second = bind(&arena, &interner, text);

    let first_ids: Vec<_> = first.variables.iter().map(|v| v.id).collect();
    let second_ids: Vec<_> = second.variables.iter().map(|v| v.id).collect();
    assert_eq!(first_ids, second_ids);
    assert_eq!(
        first.functions[0].0.id,
        second.functions[0].0.id
    );
}

#[test]
fn chained_submissions_see_earlier_declarations() {
    let arena = Bump::new();
    let interner = StringInterner::new();

    let first = bind(&arena, &interner, "var a = 10");
    assert!(first.diagnostics.is_empty());

    let tree = SyntaxTree::parse(&arena, &interner, SourceText::new("test", "a + 1"));
    let first = arena.alloc(first);
    let second = bind_global_scope(&arena, &interner, Some(first), &tree);
    assert!(second.diagnostics.is_empty(), "{:?}", second.diagnostics);
    // The watermark advances monotonically.
    assert!(second.next_symbol_id >= first.next_symbol_id);
}
