//! vesper_evaluator: run-time values and the lowered-tree evaluator.

pub mod builtins;
pub mod evaluator;
pub mod value;

pub use evaluator::{evaluate, RuntimeError};
pub use value::Value;
