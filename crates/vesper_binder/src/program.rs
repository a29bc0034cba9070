//! Whole-submission binding: the global scope and the bound program.
//!
//! A REPL session is a chain of submissions. `bind_global_scope` resolves
//! one submission's declarations against everything the chain declared
//! before it; `bind_program` then binds and lowers every function body
//! (including the synthetic script function that owns the global
//! statements) into evaluator-ready flat blocks.

use bumpalo::Bump;
use rustc_hash::FxHashMap;
use vesper_core::intern::StringInterner;
use vesper_diagnostics::{messages, Diagnostic};
use vesper_ir::node::{BoundBlockStatement, BoundReturnStatement, BoundStatement};
use vesper_ir::{FunctionSymbol, SymbolId, TypeSymbol, VariableSymbol};
use vesper_lowering::{ControlFlowGraph, Lowerer};
use vesper_syntax::node::{FunctionDeclaration, Member};
use vesper_syntax::SyntaxTree;

use crate::binder::Binder;
use crate::builtins::{Builtins, FIRST_USER_SYMBOL_ID};
use crate::scope::BoundScope;

/// Everything one submission declares, plus its bound (not yet lowered)
/// global statements.
pub struct BoundGlobalScope<'a> {
    pub previous: Option<&'a BoundGlobalScope<'a>>,
    pub diagnostics: Vec<Diagnostic>,
    /// This submission's function declarations, paired with their syntax.
    pub functions: Vec<(FunctionSymbol<'a>, &'a FunctionDeclaration<'a>)>,
    /// This submission's global variables, in declaration order.
    pub variables: Vec<VariableSymbol>,
    pub statements: Vec<BoundStatement<'a>>,
    /// The synthetic function owning the global statements; its type is Any
    /// so the REPL can surface a trailing expression's value.
    pub script_function: FunctionSymbol<'a>,
    /// Id watermark for the next submission.
    pub next_symbol_id: u32,
    /// Label watermark for lowering the global statements.
    pub next_label_id: u32,
}

/// A function with its lowered, flattened body.
#[derive(Clone, Copy)]
pub struct BoundFunction<'a> {
    pub symbol: FunctionSymbol<'a>,
    pub body: &'a BoundBlockStatement<'a>,
}

/// The executable form of a whole chain: every function body lowered, keyed
/// by symbol id, with bodies from previous submissions merged in.
pub struct BoundProgram<'a> {
    pub diagnostics: Vec<Diagnostic>,
    pub functions: FxHashMap<SymbolId, BoundFunction<'a>>,
    pub script_function: FunctionSymbol<'a>,
}

/// Rebuild the scope chain of previous submissions, oldest outermost, with
/// the built-ins in the root scope.
fn create_parent_scope<'a>(
    arena: &'a Bump,
    interner: &StringInterner,
    previous: Option<&'a BoundGlobalScope<'a>>,
) -> BoundScope<'a> {
    let mut chain = Vec::new();
    let mut current = previous;
    while let Some(scope) = current {
        chain.push(scope);
        current = scope.previous;
    }

    let mut parent = BoundScope::new(None);
    for function in Builtins::create(arena, interner).all() {
        parent.try_declare_function(function);
    }

    for submission in chain.into_iter().rev() {
        let mut scope = BoundScope::new(Some(Box::new(parent)));
        for (function, _) in &submission.functions {
            scope.try_declare_function(*function);
        }
        for variable in &submission.variables {
            scope.try_declare_variable(*variable);
        }
        parent = scope;
    }
    parent
}

pub fn bind_global_scope<'a>(
    arena: &'a Bump,
    interner: &StringInterner,
    previous: Option<&'a BoundGlobalScope<'a>>,
    syntax_tree: &SyntaxTree<'a>,
) -> BoundGlobalScope<'a> {
    let parent = create_parent_scope(arena, interner, previous);
    let symbol_seed = previous
        .map(|p| p.next_symbol_id)
        .unwrap_or(FIRST_USER_SYMBOL_ID);
    let script_function = FunctionSymbol {
        id: SymbolId::new(symbol_seed),
        name: interner.intern_static("$eval"),
        parameters: &[],
        return_type: TypeSymbol::Any,
    };
    // The script function took the seed id itself.
    let mut binder = Binder::new(arena, interner.clone(), parent, symbol_seed + 1, None);

    let root = syntax_tree.root();

    // Signatures first so call order never matters.
    for member in root.members {
        if let Member::Function(declaration) = member {
            binder.declare_function(declaration);
        }
    }

    let mut statements = Vec::new();
    for member in root.members {
        if let Member::GlobalStatement(global) = member {
            statements.push(binder.bind_statement(global.statement));
        }
    }

    let functions = binder.take_functions();
    let mut diagnostics = binder.take_diagnostics();
    diagnostics.sort();
    let next_symbol_id = binder.symbol_count();
    let next_label_id = binder.label_count();
    let variables: Vec<VariableSymbol> =
        binder.into_submission_scope().variables().copied().collect();

    BoundGlobalScope {
        previous,
        diagnostics: diagnostics.into_diagnostics(),
        functions,
        variables,
        statements,
        script_function,
        next_symbol_id,
        next_label_id,
    }
}

pub fn bind_program<'a>(
    arena: &'a Bump,
    interner: &StringInterner,
    previous: Option<&BoundProgram<'a>>,
    global_scope: &'a BoundGlobalScope<'a>,
) -> BoundProgram<'a> {
    let mut functions: FxHashMap<SymbolId, BoundFunction<'a>> = previous
        .map(|p| p.functions.clone())
        .unwrap_or_default();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    // Synthetic symbols introduced by lowering continue the binder's
    // numbering.
    let mut symbol_seed = global_scope.next_symbol_id;

    for &(function, declaration) in &global_scope.functions {
        let parent = create_parent_scope(arena, interner, Some(global_scope));
        let mut binder = Binder::new(
            arena,
            interner.clone(),
            parent,
            symbol_seed,
            Some(function),
        );
        binder.declare_parameters(function);

        let mut body_statements = Vec::with_capacity(declaration.body.statements.len());
        for &statement in declaration.body.statements {
            body_statements.push(binder.bind_statement(statement));
        }
        let body = BoundStatement::Block(arena.alloc(BoundBlockStatement {
            statements: arena.alloc_slice_copy(&body_statements),
        }));

        let mut lowerer = Lowerer::new(
            arena,
            interner.clone(),
            binder.label_count(),
            binder.symbol_count(),
        );
        let lowered = lowerer.lower_body(body, function.return_type);
        symbol_seed = lowerer.symbol_count();

        if function.return_type != TypeSymbol::Void
            && !function.return_type.is_error()
            && !ControlFlowGraph::create(arena, lowered).all_paths_return()
        {
            diagnostics.push(Diagnostic::new(
                declaration.identifier.span,
                &messages::ALL_PATHS_MUST_RETURN,
                &[],
            ));
        }

        let mut binder_diagnostics = binder.take_diagnostics();
        binder_diagnostics.sort();
        diagnostics.extend(binder_diagnostics);
        functions.insert(
            function.id,
            BoundFunction {
                symbol: function,
                body: lowered,
            },
        );
    }

    // The script function: global statements, with a trailing non-void
    // expression statement turned into a return so its value surfaces.
    let mut statements = global_scope.statements.clone();
    let trailing = match statements.last() {
        Some(BoundStatement::Expression(last)) => {
            let ty = last.expression.ty();
            (ty != TypeSymbol::Void && !ty.is_error()).then_some(last.expression)
        }
        _ => None,
    };
    if let Some(expression) = trailing {
        *statements.last_mut().unwrap() = BoundStatement::Return(arena.alloc(
            BoundReturnStatement {
                expression: Some(expression),
            },
        ));
    }
    let script_body = BoundStatement::Block(arena.alloc(BoundBlockStatement {
        statements: arena.alloc_slice_copy(&statements),
    }));
    let mut lowerer = Lowerer::new(
        arena,
        interner.clone(),
        global_scope.next_label_id,
        symbol_seed,
    );
    // Void here only controls the implicit trailing return; the script
    // function itself evaluates to its last value.
    let lowered = lowerer.lower_body(script_body, TypeSymbol::Void);
    functions.insert(
        global_scope.script_function.id,
        BoundFunction {
            symbol: global_scope.script_function,
            body: lowered,
        },
    );

    BoundProgram {
        diagnostics,
        functions,
        script_function: global_scope.script_function,
    }
}
