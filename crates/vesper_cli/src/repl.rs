//! The interactive loop.
//!
//! Submissions chain through `Compilation::continue_with`, so names declared
//! in one line stay visible in the next. Each accepted compilation is
//! allocated into the session arena to keep the chain borrowable for the
//! whole session.

use std::io::{self, BufRead, IsTerminal, Write};

use bumpalo::Bump;
use rustc_hash::FxHashMap;
use vesper_compiler::Compilation;
use vesper_core::intern::StringInterner;
use vesper_core::text::SourceText;
use vesper_evaluator::Value;
use vesper_ir::SymbolId;
use vesper_syntax::SyntaxTree;

use crate::render;

pub fn run() -> io::Result<()> {
    let arena = Bump::new();
    let interner = StringInterner::new();
    let mut previous: Option<&Compilation<'_>> = None;
    let mut variables: FxHashMap<SymbolId, Value> = FxHashMap::default();
    let mut show_tree = false;

    let interactive = io::stdin().is_terminal();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        let Some(text) = read_submission(&mut lines, interactive)? else {
            return Ok(());
        };
        match text.trim() {
            "" => continue,
            "#quit" => return Ok(()),
            "#showTree" => {
                show_tree = !show_tree;
                println!(
                    "{}",
                    if show_tree {
                        "Showing parse trees."
                    } else {
                        "Not showing parse trees."
                    }
                );
                continue;
            }
            _ => {}
        }

        let source = SourceText::new("repl", text);
        let tree = SyntaxTree::parse(&arena, &interner, source);

        if show_tree {
            let mut rendered = String::new();
            let _ = vesper_printer::write_syntax_tree(&mut rendered, &tree, &interner);
            print!("{}", rendered);
        }

        let compilation: &Compilation<'_> = match previous {
            Some(p) => arena.alloc(p.continue_with(tree)),
            None => arena.alloc(Compilation::new(&arena, interner.clone(), tree)),
        };

        match compilation.evaluate(&mut variables) {
            Ok(result) => {
                if !result.diagnostics().is_empty() {
                    render::print_diagnostics(
                        compilation.syntax_tree().source(),
                        result.diagnostics(),
                    );
                }
                if !result.has_errors() {
                    if let Some(value) = result.value() {
                        println!("{}", value);
                    }
                    // Submissions with errors don't join the chain.
                    previous = Some(compilation);
                }
            }
            Err(fault) => eprintln!("runtime error: {}", fault),
        }
    }
}

/// Read one submission: lines accumulate until braces balance, so function
/// declarations can span lines.
fn read_submission(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    interactive: bool,
) -> io::Result<Option<String>> {
    let mut text = String::new();
    let mut depth: i32 = 0;
    loop {
        if interactive {
            let prompt = if text.is_empty() { "» " } else { "· " };
            print!("{}", prompt);
            io::stdout().flush()?;
        }
        let Some(line) = lines.next() else {
            return Ok(if text.is_empty() { None } else { Some(text) });
        };
        let line = line?;
        depth += brace_depth(&line);
        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str(&line);
        if depth <= 0 {
            return Ok(Some(text));
        }
    }
}

/// Net brace nesting of a line, ignoring braces inside string literals and
/// line comments.
fn brace_depth(line: &str) -> i32 {
    let mut depth = 0;
    let mut chars = line.chars().peekable();
    let mut in_string = false;
    while let Some(c) = chars.next() {
        match c {
            '"' => in_string = !in_string,
            '/' if !in_string && chars.peek() == Some(&'/') => break,
            '{' if !in_string => depth += 1,
            '}' if !in_string => depth -= 1,
            _ => {}
        }
    }
    depth
}
