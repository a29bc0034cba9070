//! vesper_syntax: The Vesper front end.
//!
//! Scanner, recursive-descent parser, and the immutable arena-allocated
//! syntax tree the binder consumes. Errors are accumulated as diagnostics;
//! scanning and parsing always produce a complete tree.

pub mod node;
pub mod parser;
pub mod scanner;
pub mod syntax_kind;
pub mod token;

pub use parser::SyntaxTree;
