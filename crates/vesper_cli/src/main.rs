//! The `vesper` binary: run a script file, or start the REPL.

mod render;
mod repl;

use std::path::PathBuf;
use std::process::ExitCode;

use bumpalo::Bump;
use clap::Parser;
use rustc_hash::FxHashMap;
use vesper_compiler::Compilation;
use vesper_core::intern::StringInterner;
use vesper_core::text::SourceText;
use vesper_syntax::SyntaxTree;

#[derive(Parser)]
#[command(name = "vesper", version, about = "The Vesper scripting language")]
struct Cli {
    /// Script file to run. Without it, an interactive session starts.
    file: Option<PathBuf>,

    /// Print the parsed syntax tree before running.
    #[arg(long)]
    show_tree: bool,

    /// Print the lowered program instead of running it.
    #[arg(long)]
    show_program: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.file {
        Some(path) => run_file(&path, cli.show_tree, cli.show_program),
        None => match repl::run() {
            Ok(()) => ExitCode::SUCCESS,
            Err(error) => {
                eprintln!("vesper: {}", error);
                ExitCode::FAILURE
            }
        },
    }
}

fn run_file(path: &std::path::Path, show_tree: bool, show_program: bool) -> ExitCode {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(error) => {
            eprintln!("vesper: {}: {}", path.display(), error);
            return ExitCode::FAILURE;
        }
    };

    let arena = Bump::new();
    let interner = StringInterner::new();
    let source = SourceText::new(path.display().to_string(), text);
    let tree = SyntaxTree::parse(&arena, &interner, source);

    if show_tree {
        let mut rendered = String::new();
        let _ = vesper_printer::write_syntax_tree(&mut rendered, &tree, &interner);
        print!("{}", rendered);
    }

    let compilation = Compilation::new(&arena, interner.clone(), tree);

    if show_program {
        let scope = compilation.global_scope();
        if !scope.diagnostics.is_empty() {
            render::print_diagnostics(compilation.syntax_tree().source(), &scope.diagnostics);
            return ExitCode::FAILURE;
        }
        let mut rendered = String::new();
        for statement in &scope.statements {
            let _ = vesper_printer::write_bound_statement(&mut rendered, *statement, &interner);
        }
        print!("{}", rendered);
        return ExitCode::SUCCESS;
    }

    let mut variables = FxHashMap::default();
    match compilation.evaluate(&mut variables) {
        Ok(result) => {
            if !result.diagnostics().is_empty() {
                render::print_diagnostics(compilation.syntax_tree().source(), result.diagnostics());
            }
            if result.has_errors() {
                return ExitCode::FAILURE;
            }
            if let Some(value) = result.value() {
                println!("{}", value);
            }
            ExitCode::SUCCESS
        }
        Err(fault) => {
            eprintln!("runtime error: {}", fault);
            ExitCode::FAILURE
        }
    }
}
