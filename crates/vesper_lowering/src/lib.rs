//! Lowering of structured bound trees into label/goto form, plus the
//! control-flow graph built over the result.

pub mod cfg;
pub mod lowerer;
pub mod rewriter;

pub use cfg::ControlFlowGraph;
pub use lowerer::Lowerer;
pub use rewriter::BoundTreeRewriter;
