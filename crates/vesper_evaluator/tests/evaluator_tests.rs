use bumpalo::Bump;
use rustc_hash::FxHashMap;
use vesper_binder::{bind_global_scope, bind_program};
use vesper_core::intern::StringInterner;
use vesper_core::text::SourceText;
use vesper_evaluator::{evaluate, RuntimeError, Value};
use vesper_ir::symbol::SymbolId;
use vesper_syntax::parser::SyntaxTree;

fn run(text: &str) -> Result<Value, RuntimeError> {
    run_with(text, &mut FxHashMap::default())
}

fn run_with(
    text: &str,
    globals: &mut FxHashMap<SymbolId, Value>,
) -> Result<Value, RuntimeError> {
    let arena = Bump::new();
    let interner = StringInterner::new();
    let tree = SyntaxTree::parse(&arena, &interner, SourceText::new("test", text));
    assert!(
        tree.diagnostics().is_empty(),
        "unexpected syntax diagnostics: {:?}",
        tree.diagnostics()
    );
    let scope = bind_global_scope(&arena, &interner, None, &tree);
    assert!(
        scope.diagnostics.is_empty(),
        "unexpected binder diagnostics: {:?}",
        scope.diagnostics
    );
    let program = bind_program(&arena, &interner, None, &scope);
    assert!(
        program.diagnostics.is_empty(),
        "unexpected program diagnostics: {:?}",
        program.diagnostics
    );
    evaluate(&program, &interner, globals)
}

fn int(text: &str) -> i64 {
    match run(text) {
        Ok(Value::Int(n)) => n,
        other => panic!("expected an integer from {text:?}, got {other:?}"),
    }
}

#[test]
fn arithmetic_follows_precedence() {
    assert_eq!(int("1 + 2 * 3"), 7);
    assert_eq!(int("(1 + 2) * 3"), 9);
    assert_eq!(int("-4 + 6"), 2);
    assert_eq!(int("7 / 2"), 3);
}

#[test]
fn comparisons_and_logic() {
    assert_eq!(run("1 < 2 && 3 >= 3"), Ok(Value::Bool(true)));
    assert_eq!(run("!(1 == 2) || false"), Ok(Value::Bool(true)));
    assert_eq!(run("1 ^ 3"), Ok(Value::Int(2)));
    assert_eq!(run("true & false"), Ok(Value::Bool(false)));
}

#[test]
fn variables_persist_across_statements() {
    assert_eq!(int("var a = 10 a = a + 5 a"), 15);
}

#[test]
fn assignment_introduces_a_variable() {
    assert_eq!(int("x = 10 x * x"), 100);
}

#[test]
fn global_blocks_leak_into_the_submission() {
    assert_eq!(int("{ var i = 0 i = i + 1 } i"), 1);
}

#[test]
fn for_loop_sums_the_range() {
    assert_eq!(int("var total = 0 for i = 1 to 10 { total = total + i } total"), 55);
}

#[test]
fn for_loop_with_empty_range_runs_once_per_bound() {
    assert_eq!(int("var n = 0 for i = 3 to 3 { n = n + 1 } n"), 1);
    assert_eq!(int("var n = 0 for i = 3 to 2 { n = n + 1 } n"), 0);
}

#[test]
fn while_with_break_and_continue() {
    let text = "
        var n = 0
        var sum = 0
        while true {
            n = n + 1
            if n > 10 { break }
            if n / 2 * 2 == n { continue }
            sum = sum + n
        }
        sum
    ";
    assert_eq!(int(text), 25);
}

#[test]
fn do_while_runs_the_body_first() {
    assert_eq!(int("var n = 10 do { n = n + 1 } while n < 5 n"), 11);
}

#[test]
fn functions_recurse() {
    let text = "
        function fib(n: Int): Int {
            if n < 2 { return n }
            return fib(n - 1) + fib(n - 2)
        }
        fib(10)
    ";
    assert_eq!(int(text), 55);
}

#[test]
fn void_function_calls_are_statements() {
    let text = "
        var hits = 0
        function bump() {
            hits = hits + 1
        }
        bump()
        bump()
        hits
    ";
    assert_eq!(int(text), 2);
}

#[test]
fn string_concatenation_and_casts() {
    let text = "let greeting = \"a\" + \"b\" greeting + String(3)";
    assert_eq!(run(text), Ok(Value::String("ab3".into())));
    assert_eq!(int("Int(\" 42 \") + 1"), 43);
    assert_eq!(run("Bool(\"true\")"), Ok(Value::Bool(true)));
    assert_eq!(run("String(false)"), Ok(Value::String("false".into())));
}

#[test]
fn logical_operators_do_not_short_circuit() {
    assert_eq!(run("false && 1 / 0 == 0"), Err(RuntimeError::DivisionByZero));
    assert_eq!(run("true || 1 / 0 == 0"), Err(RuntimeError::DivisionByZero));
}

#[test]
fn division_by_zero_is_a_runtime_error() {
    let divisor = "var d = 0 10 / d";
    assert_eq!(run(divisor), Err(RuntimeError::DivisionByZero));
}

#[test]
fn failed_casts_name_the_value_and_type() {
    match run("Int(\"twelve\")") {
        Err(RuntimeError::InvalidCast { value, to }) => {
            assert_eq!(value, "twelve");
            assert_eq!(to, "Int");
        }
        other => panic!("expected an invalid cast, got {other:?}"),
    }
}

#[test]
fn arithmetic_wraps_instead_of_trapping() {
    let max = i64::MAX;
    assert_eq!(int(&format!("{max} + 1")), i64::MIN);
}

#[test]
fn trailing_assignment_yields_the_assigned_value() {
    assert_eq!(run("var a = 1 a = 2"), Ok(Value::Int(2)));
}

#[test]
fn submission_without_a_value_yields_unit() {
    assert_eq!(run("if false { x = 1 }"), Ok(Value::Unit));
}

#[test]
fn reading_a_never_initialized_variable_is_a_fault() {
    // The declaration binds into the flat global scope but never executes,
    // so the read must fault instead of aborting.
    match run("if false { var z = 1 } z") {
        Err(RuntimeError::UninitializedVariable { name }) => assert_eq!(name, "z"),
        other => panic!("expected an uninitialized read fault, got {other:?}"),
    }
}

#[test]
fn globals_survive_between_runs() {
    let mut globals = FxHashMap::default();
    run_with("counter = 41", &mut globals).unwrap();
    assert!(globals.values().any(|v| *v == Value::Int(41)));
}
