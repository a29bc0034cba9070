//! Built-in functions.
//!
//! Built-ins occupy reserved symbol ids so the evaluator can intercept calls
//! by symbol identity rather than by name. They are re-created per binder
//! run (the interner makes the names stable), but their ids never change.

use vesper_core::intern::StringInterner;
use vesper_ir::{FunctionSymbol, SymbolId, TypeSymbol, VariableKind, VariableSymbol};

pub const PRINT_ID: SymbolId = SymbolId::new(0);
pub const INPUT_ID: SymbolId = SymbolId::new(2);
pub const RND_ID: SymbolId = SymbolId::new(3);

/// The first id available to user declarations.
pub const FIRST_USER_SYMBOL_ID: u32 = 6;

fn parameter(
    interner: &StringInterner,
    id: u32,
    name: &'static str,
    ordinal: u32,
    ty: TypeSymbol,
) -> VariableSymbol {
    VariableSymbol {
        id: SymbolId::new(id),
        name: interner.intern_static(name),
        kind: VariableKind::Parameter { ordinal },
        read_only: true,
        ty,
        constant: None,
    }
}

/// The built-in functions, with parameter symbols allocated in the arena.
#[derive(Debug, Clone, Copy)]
pub struct Builtins<'a> {
    pub print: FunctionSymbol<'a>,
    pub input: FunctionSymbol<'a>,
    pub rnd: FunctionSymbol<'a>,
}

impl<'a> Builtins<'a> {
    pub fn create(arena: &'a bumpalo::Bump, interner: &StringInterner) -> Self {
        let print = FunctionSymbol {
            id: PRINT_ID,
            name: interner.intern_static("print"),
            parameters: arena
                .alloc_slice_copy(&[parameter(interner, 1, "text", 0, TypeSymbol::String)]),
            return_type: TypeSymbol::Void,
        };
        let input = FunctionSymbol {
            id: INPUT_ID,
            name: interner.intern_static("input"),
            parameters: &[],
            return_type: TypeSymbol::String,
        };
        let rnd = FunctionSymbol {
            id: RND_ID,
            name: interner.intern_static("rnd"),
            parameters: arena.alloc_slice_copy(&[
                parameter(interner, 4, "min", 0, TypeSymbol::Int),
                parameter(interner, 5, "max", 1, TypeSymbol::Int),
            ]),
            return_type: TypeSymbol::Int,
        };
        Self { print, input, rnd }
    }

    pub fn all(&self) -> [FunctionSymbol<'a>; 3] {
        [self.print, self.input, self.rnd]
    }
}
