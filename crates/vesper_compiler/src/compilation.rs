//! Compilation: one submission, chained to whatever came before it.
//!
//! All submissions of a session share one arena and one interner; each
//! `Compilation` borrows the previous one, so a REPL keeps every submission
//! alive for the lifetime of the session. The global scope is bound lazily
//! and memoized in a `OnceLock`.

use std::sync::OnceLock;

use bumpalo::Bump;
use rustc_hash::{FxHashMap, FxHashSet};
use vesper_binder::program::{bind_global_scope, bind_program, BoundGlobalScope, BoundProgram};
use vesper_binder::scope::ScopedSymbol;
use vesper_binder::Builtins;
use vesper_core::intern::{InternedString, StringInterner};
use vesper_diagnostics::Diagnostic;
use vesper_evaluator::{evaluate, RuntimeError, Value};
use vesper_ir::SymbolId;
use vesper_syntax::SyntaxTree;

use crate::result::EvaluationResult;

pub struct Compilation<'a> {
    arena: &'a Bump,
    interner: StringInterner,
    previous: Option<&'a Compilation<'a>>,
    syntax_tree: SyntaxTree<'a>,
    global_scope: OnceLock<BoundGlobalScope<'a>>,
}

impl<'a> Compilation<'a> {
    pub fn new(arena: &'a Bump, interner: StringInterner, syntax_tree: SyntaxTree<'a>) -> Self {
        Self {
            arena,
            interner,
            previous: None,
            syntax_tree,
            global_scope: OnceLock::new(),
        }
    }

    /// Chain a new submission onto this one. The new compilation sees every
    /// symbol declared so far.
    pub fn continue_with(&'a self, syntax_tree: SyntaxTree<'a>) -> Compilation<'a> {
        Self {
            arena: self.arena,
            interner: self.interner.clone(),
            previous: Some(self),
            syntax_tree,
            global_scope: OnceLock::new(),
        }
    }

    pub fn syntax_tree(&self) -> &SyntaxTree<'a> {
        &self.syntax_tree
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    /// The submission's global scope; bound at most once.
    pub fn global_scope(&'a self) -> &'a BoundGlobalScope<'a> {
        self.global_scope.get_or_init(|| {
            bind_global_scope(
                self.arena,
                &self.interner,
                self.previous.map(|p| p.global_scope()),
                &self.syntax_tree,
            )
        })
    }

    fn program(&'a self) -> BoundProgram<'a> {
        let previous = self.previous.map(|p| p.program());
        bind_program(
            self.arena,
            &self.interner,
            previous.as_ref(),
            self.global_scope(),
        )
    }

    /// Bind and run this submission against a persistent variable store.
    ///
    /// Diagnostics short-circuit: if the chain has parse or bind errors the
    /// result carries them and no code runs. A runtime fault is the `Err`
    /// case; diagnostics never are.
    pub fn evaluate(
        &'a self,
        variables: &mut FxHashMap<SymbolId, Value>,
    ) -> Result<EvaluationResult, RuntimeError> {
        let mut diagnostics: Vec<Diagnostic> = self.syntax_tree.diagnostics().to_vec();
        diagnostics.extend(self.global_scope().diagnostics.iter().cloned());
        if diagnostics.iter().any(Diagnostic::is_error) {
            return Ok(EvaluationResult::new(diagnostics, None));
        }

        let program = self.program();
        diagnostics.extend(program.diagnostics.iter().cloned());
        if diagnostics.iter().any(Diagnostic::is_error) {
            return Ok(EvaluationResult::new(diagnostics, None));
        }

        let value = evaluate(&program, &self.interner, variables)?;
        let value = match value {
            Value::Unit => None,
            value => Some(value),
        };
        Ok(EvaluationResult::new(diagnostics, value))
    }

    /// Every symbol visible at the end of this submission: built-ins plus
    /// all declarations of the chain, newest shadowing oldest by name.
    pub fn symbols(&'a self) -> Vec<ScopedSymbol<'a>> {
        let mut seen: FxHashSet<InternedString> = FxHashSet::default();
        let mut symbols = Vec::new();

        let mut current = Some(self.global_scope());
        while let Some(scope) = current {
            for (function, _) in &scope.functions {
                if seen.insert(function.name) {
                    symbols.push(ScopedSymbol::Function(*function));
                }
            }
            for variable in &scope.variables {
                if seen.insert(variable.name) {
                    symbols.push(ScopedSymbol::Variable(*variable));
                }
            }
            current = scope.previous;
        }

        for function in Builtins::create(self.arena, &self.interner).all() {
            if seen.insert(function.name) {
                symbols.push(ScopedSymbol::Function(function));
            }
        }
        symbols
    }
}
