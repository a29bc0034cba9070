use bumpalo::Bump;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rustc_hash::FxHashMap;
use vesper_compiler::Compilation;
use vesper_core::intern::StringInterner;
use vesper_core::text::SourceText;
use vesper_syntax::SyntaxTree;

const FIBONACCI: &str = r#"
function fib(n: Int): Int {
    if n <= 1 return n
    return fib(n - 1) + fib(n - 2)
}

var total = 0
for i = 1 to 12 {
    total = total + fib(i)
}
total
"#;

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_fibonacci", |b| {
        b.iter(|| {
            let arena = Bump::new();
            let interner = StringInterner::new();
            let source = SourceText::new("bench.vsp", FIBONACCI);
            let tree = SyntaxTree::parse(&arena, &interner, source);
            black_box(tree.diagnostics().len())
        })
    });
}

fn bench_compile_and_run(c: &mut Criterion) {
    c.bench_function("evaluate_fibonacci", |b| {
        b.iter(|| {
            let arena = Bump::new();
            let interner = StringInterner::new();
            let source = SourceText::new("bench.vsp", FIBONACCI);
            let tree = SyntaxTree::parse(&arena, &interner, source);
            let compilation = Compilation::new(&arena, interner, tree);
            let mut variables = FxHashMap::default();
            let result = compilation.evaluate(&mut variables).unwrap();
            black_box(result.value().cloned())
        })
    });
}

criterion_group!(benches, bench_parse, bench_compile_and_run);
criterion_main!(benches);
