use bumpalo::Bump;
use rustc_hash::FxHashMap;
use vesper_binder::ScopedSymbol;
use vesper_compiler::Compilation;
use vesper_core::intern::StringInterner;
use vesper_core::text::SourceText;
use vesper_evaluator::{RuntimeError, Value};
use vesper_syntax::parser::SyntaxTree;

fn parse<'a>(arena: &'a Bump, interner: &StringInterner, text: &str) -> SyntaxTree<'a> {
    SyntaxTree::parse(arena, interner, SourceText::new("test", text))
}

#[test]
fn evaluates_a_single_submission() {
    let arena = Bump::new();
    let interner = StringInterner::new();
    let compilation = Compilation::new(&arena, interner.clone(), parse(&arena, &interner, "1 + 2"));

    let mut variables = FxHashMap::default();
    let result = compilation.evaluate(&mut variables).unwrap();
    assert!(!result.has_errors());
    assert_eq!(result.value(), Some(&Value::Int(3)));
}

#[test]
fn variables_flow_into_later_submissions() {
    let arena = Bump::new();
    let interner = StringInterner::new();
    let mut variables = FxHashMap::default();

    let first = Compilation::new(
        &arena,
        interner.clone(),
        parse(&arena, &interner, "var x = 10"),
    );
    let result = first.evaluate(&mut variables).unwrap();
    assert_eq!(result.value(), Some(&Value::Int(10)));

    let second = first.continue_with(parse(&arena, &interner, "x + 5"));
    let result = second.evaluate(&mut variables).unwrap();
    assert!(!result.has_errors());
    assert_eq!(result.value(), Some(&Value::Int(15)));
}

#[test]
fn functions_flow_into_later_submissions() {
    let arena = Bump::new();
    let interner = StringInterner::new();
    let mut variables = FxHashMap::default();

    let first = Compilation::new(
        &arena,
        interner.clone(),
        parse(
            &arena,
            &interner,
            "function double(n: Int): Int { return n * 2 }",
        ),
    );
    let result = first.evaluate(&mut variables).unwrap();
    assert!(!result.has_errors());
    assert_eq!(result.value(), None);

    let second = first.continue_with(parse(&arena, &interner, "double(21)"));
    let result = second.evaluate(&mut variables).unwrap();
    assert_eq!(result.value(), Some(&Value::Int(42)));
}

#[test]
fn bind_errors_stop_evaluation() {
    let arena = Bump::new();
    let interner = StringInterner::new();
    let compilation = Compilation::new(
        &arena,
        interner.clone(),
        parse(&arena, &interner, "nope + 1"),
    );

    let mut variables = FxHashMap::default();
    let result = compilation.evaluate(&mut variables).unwrap();
    assert!(result.has_errors());
    assert_eq!(result.value(), None);
    assert!(variables.is_empty());
}

#[test]
fn runtime_faults_surface_as_errors() {
    let arena = Bump::new();
    let interner = StringInterner::new();
    let compilation = Compilation::new(&arena, interner.clone(), parse(&arena, &interner, "1 / 0"));

    let mut variables = FxHashMap::default();
    match compilation.evaluate(&mut variables) {
        Err(RuntimeError::DivisionByZero) => {}
        other => panic!("expected a division fault, got {other:?}"),
    }
}

#[test]
fn symbols_deduplicate_by_name_across_the_chain() {
    let arena = Bump::new();
    let interner = StringInterner::new();
    let mut variables = FxHashMap::default();

    let first = Compilation::new(
        &arena,
        interner.clone(),
        parse(&arena, &interner, "var answer = 1"),
    );
    first.evaluate(&mut variables).unwrap();
    let second = first.continue_with(parse(&arena, &interner, "var answer = 2"));
    second.evaluate(&mut variables).unwrap();

    let symbols = second.symbols();
    let answers: Vec<_> = symbols
        .iter()
        .filter_map(|s| match s {
            ScopedSymbol::Variable(v) if interner.resolve(v.name) == "answer" => Some(v),
            _ => None,
        })
        .collect();
    assert_eq!(answers.len(), 1);

    // Built-ins are always visible.
    for name in ["print", "input", "rnd"] {
        assert!(symbols.iter().any(|s| match s {
            ScopedSymbol::Function(f) => interner.resolve(f.name) == name,
            _ => false,
        }));
    }
}

#[test]
fn newest_declaration_shadows_the_oldest() {
    let arena = Bump::new();
    let interner = StringInterner::new();
    let mut variables = FxHashMap::default();

    let first = Compilation::new(
        &arena,
        interner.clone(),
        parse(&arena, &interner, "var answer = 1"),
    );
    first.evaluate(&mut variables).unwrap();
    let second = first.continue_with(parse(&arena, &interner, "var answer = true"));
    second.evaluate(&mut variables).unwrap();

    let third = second.continue_with(parse(&arena, &interner, "answer && true"));
    let result = third.evaluate(&mut variables).unwrap();
    assert!(!result.has_errors());
    assert_eq!(result.value(), Some(&Value::Bool(true)));
}
