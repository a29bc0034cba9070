//! vesper_compiler: the compilation driver.

pub mod compilation;
pub mod result;

pub use compilation::Compilation;
pub use result::EvaluationResult;
