//! Compile-time constants attached to bound expressions.

use crate::ty::TypeSymbol;
use vesper_core::intern::InternedString;

/// A statically known value. String constants are interned so the constant
/// stays `Copy` and can live in arena-allocated nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundConstant {
    Int(i64),
    Bool(bool),
    String(InternedString),
}

impl BoundConstant {
    pub fn ty(self) -> TypeSymbol {
        match self {
            BoundConstant::Int(_) => TypeSymbol::Int,
            BoundConstant::Bool(_) => TypeSymbol::Bool,
            BoundConstant::String(_) => TypeSymbol::String,
        }
    }

    pub fn as_int(self) -> Option<i64> {
        match self {
            BoundConstant::Int(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bool(self) -> Option<bool> {
        match self {
            BoundConstant::Bool(value) => Some(value),
            _ => None,
        }
    }
}
