//! vesper_core: Shared infrastructure for the Vesper pipeline.
//!
//! Text spans, line maps, source text, and string interning. Everything
//! downstream (scanner, binder, evaluator, CLI) builds on these types.

pub mod intern;
pub mod text;
