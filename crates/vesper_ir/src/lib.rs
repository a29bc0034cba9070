//! vesper_ir: Symbols, types, and the bound tree.
//!
//! The type-checked, scope-resolved intermediate representation produced by
//! the binder and consumed by the lowerer, the control-flow graph, the
//! evaluator, and the printer.

pub mod constant;
pub mod label;
pub mod node;
pub mod op;
pub mod symbol;
pub mod ty;

pub use constant::BoundConstant;
pub use label::BoundLabel;
pub use symbol::{FunctionSymbol, SymbolId, VariableKind, VariableSymbol};
pub use ty::TypeSymbol;
