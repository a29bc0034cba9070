//! Symbols: the named entities of a program.
//!
//! Identity is the numeric [`SymbolId`], assigned at declaration time and
//! monotonically increasing across chained submissions. Run-time stores are
//! keyed by id; names are used only during lookup, never for identity.

use crate::constant::BoundConstant;
use crate::ty::TypeSymbol;
use std::fmt;
use vesper_core::intern::InternedString;

/// Unique identity of a declared symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub u32);

impl SymbolId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where a variable lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    /// Stored in the shared global map.
    Global,
    /// Stored in the current call frame.
    Local,
    /// A function parameter; `ordinal` is its 0-based position.
    Parameter { ordinal: u32 },
}

/// A variable, parameter, or synthetic loop bound.
#[derive(Debug, Clone, Copy)]
pub struct VariableSymbol {
    pub id: SymbolId,
    pub name: InternedString,
    pub kind: VariableKind,
    pub read_only: bool,
    pub ty: TypeSymbol,
    /// Present only when the variable is read-only and its initializer has a
    /// statically known value.
    pub constant: Option<BoundConstant>,
}

impl VariableSymbol {
    pub fn is_global(&self) -> bool {
        self.kind == VariableKind::Global
    }
}

/// A declared or built-in function.
#[derive(Debug, Clone, Copy)]
pub struct FunctionSymbol<'a> {
    pub id: SymbolId,
    pub name: InternedString,
    /// Parameters in declaration order; each carries its ordinal.
    pub parameters: &'a [VariableSymbol],
    pub return_type: TypeSymbol,
}
