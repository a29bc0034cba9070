//! The outcome of evaluating one submission.

use vesper_diagnostics::Diagnostic;
use vesper_evaluator::Value;

#[derive(Debug, Clone)]
pub struct EvaluationResult {
    diagnostics: Vec<Diagnostic>,
    value: Option<Value>,
}

impl EvaluationResult {
    pub fn new(diagnostics: Vec<Diagnostic>, value: Option<Value>) -> Self {
        Self { diagnostics, value }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_warning())
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    /// The final value of the submission, when it produced one.
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn into_value(self) -> Option<Value> {
        self.value
    }
}
