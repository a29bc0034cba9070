//! vesper_binder: name resolution, type checking, and program binding.

pub mod binder;
pub mod builtins;
pub mod constant_folding;
pub mod conversion;
pub mod program;
pub mod scope;

pub use binder::Binder;
pub use builtins::Builtins;
pub use conversion::Conversion;
pub use program::{
    bind_global_scope, bind_program, BoundFunction, BoundGlobalScope, BoundProgram,
};
pub use scope::{BoundScope, ScopedSymbol};
