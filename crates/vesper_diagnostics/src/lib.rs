//! vesper_diagnostics: Diagnostic records and message table.
//!
//! User-facing problems are never thrown; every stage accumulates
//! [`Diagnostic`] values into a [`DiagnosticCollection`] and keeps going, so
//! a single run reports all errors instead of the first one.

use std::fmt;
use vesper_core::text::TextSpan;

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    Warning,
    Error,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::Warning => write!(f, "warning"),
            DiagnosticCategory::Error => write!(f, "error"),
        }
    }
}

/// A diagnostic message template with a code and category.
///
/// Templates may contain `{0}`, `{1}`, ... placeholders which are filled in
/// when a concrete [`Diagnostic`] is realized.
#[derive(Debug, Clone)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

/// A realized diagnostic: a source span plus resolved message text.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Where in the submission's source this diagnostic points.
    pub span: TextSpan,
    /// The resolved message text.
    pub message_text: String,
    pub code: u32,
    pub category: DiagnosticCategory,
}

impl Diagnostic {
    pub fn new(span: TextSpan, message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            span,
            message_text: format_message(message.message, args),
            code: message.code,
            category: message.category,
        }
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }

    pub fn is_warning(&self) -> bool {
        self.category == DiagnosticCategory::Warning
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} V{}: {}", self.category, self.code, self.message_text)
    }
}

/// Fill in `{0}`, `{1}`, ... placeholders of a message template.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{}}}", i), arg);
    }
    result
}

/// A collection of diagnostics accumulated during a compilation stage.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticCollection {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Realize a message template at a span and add it.
    pub fn report(&mut self, span: TextSpan, message: &DiagnosticMessage, args: &[&str]) {
        self.add(Diagnostic::new(span, message, args));
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
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

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn extend(&mut self, other: DiagnosticCollection) {
        self.diagnostics.extend(other.diagnostics);
    }

    pub fn extend_from_slice(&mut self, diagnostics: &[Diagnostic]) {
        self.diagnostics.extend_from_slice(diagnostics);
    }

    /// Sort diagnostics by source position.
    pub fn sort(&mut self) {
        self.diagnostics.sort_by_key(|d| (d.span.start, d.span.length));
    }
}

impl IntoIterator for DiagnosticCollection {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.into_iter()
    }
}

// ============================================================================
// Diagnostic messages
// ============================================================================

pub mod messages {
    use super::*;

    macro_rules! diag {
        ($code:expr, Error, $msg:expr) => {
            DiagnosticMessage {
                code: $code,
                category: DiagnosticCategory::Error,
                message: $msg,
            }
        };
        ($code:expr, Warning, $msg:expr) => {
            DiagnosticMessage {
                code: $code,
                category: DiagnosticCategory::Warning,
                message: $msg,
            }
        };
    }

    pub(crate) use diag;

    // ------------------------------------------------------------------------
    // Scanner errors (1000-1099)
    // ------------------------------------------------------------------------
    pub const BAD_CHARACTER: DiagnosticMessage =
        diag!(1001, Error, "Bad character input: '{0}'.");
    pub const UNTERMINATED_STRING_LITERAL: DiagnosticMessage =
        diag!(1002, Error, "Unterminated string literal.");
    pub const UNTERMINATED_MULTILINE_COMMENT: DiagnosticMessage =
        diag!(1003, Error, "Unterminated multi-line comment.");
    pub const INVALID_INT_LITERAL: DiagnosticMessage =
        diag!(1004, Error, "The number '{0}' isn't a valid Int.");

    // ------------------------------------------------------------------------
    // Parser errors (1100-1199)
    // ------------------------------------------------------------------------
    pub const UNEXPECTED_TOKEN: DiagnosticMessage =
        diag!(1101, Error, "Unexpected token <{0}>, expected <{1}>.");

    // ------------------------------------------------------------------------
    // Binder errors (2000-2099)
    // ------------------------------------------------------------------------
    pub const VARIABLE_DOESNT_EXIST: DiagnosticMessage =
        diag!(2001, Error, "Variable '{0}' doesn't exist.");
    pub const FUNCTION_DOESNT_EXIST: DiagnosticMessage =
        diag!(2002, Error, "Function '{0}' doesn't exist.");
    pub const TYPE_DOESNT_EXIST: DiagnosticMessage =
        diag!(2003, Error, "Type '{0}' doesn't exist.");
    pub const SYMBOL_ALREADY_DECLARED: DiagnosticMessage =
        diag!(2004, Error, "'{0}' is already declared.");
    pub const PARAMETER_ALREADY_DECLARED: DiagnosticMessage =
        diag!(2005, Error, "A parameter with the name '{0}' already exists.");
    pub const CANNOT_CONVERT: DiagnosticMessage =
        diag!(2006, Error, "Cannot convert type '{0}' to type '{1}'.");
    pub const CANNOT_CONVERT_IMPLICITLY: DiagnosticMessage = diag!(
        2007,
        Error,
        "Cannot convert type '{0}' to type '{1}'. An explicit conversion exists (are you missing a cast?)"
    );
    pub const UNDEFINED_UNARY_OPERATOR: DiagnosticMessage =
        diag!(2008, Error, "Unary operator '{0}' is not defined for type '{1}'.");
    pub const UNDEFINED_BINARY_OPERATOR: DiagnosticMessage = diag!(
        2009,
        Error,
        "Binary operator '{0}' is not defined for types '{1}' and '{2}'."
    );
    pub const WRONG_ARGUMENT_COUNT: DiagnosticMessage = diag!(
        2010,
        Error,
        "Function '{0}' requires {1} arguments but was given {2}."
    );
    pub const VARIABLE_IS_READ_ONLY: DiagnosticMessage = diag!(
        2011,
        Error,
        "Variable '{0}' is read-only and cannot be assigned to."
    );
    pub const INVALID_BREAK_OR_CONTINUE: DiagnosticMessage = diag!(
        2012,
        Error,
        "The keyword '{0}' can only be used inside of loops."
    );
    pub const INVALID_RETURN_EXPRESSION: DiagnosticMessage = diag!(
        2013,
        Error,
        "Since the function '{0}' does not return a value, the 'return' keyword cannot be followed by an expression."
    );
    pub const MISSING_RETURN_EXPRESSION: DiagnosticMessage =
        diag!(2014, Error, "An expression of type '{0}' is expected.");
    pub const ALL_PATHS_MUST_RETURN: DiagnosticMessage =
        diag!(2015, Error, "Not all code paths return a value.");
    pub const EXPRESSION_MUST_HAVE_VALUE: DiagnosticMessage =
        diag!(2016, Error, "Expression must have a value.");
    pub const NOT_A_VARIABLE: DiagnosticMessage =
        diag!(2017, Error, "'{0}' is not a variable.");
    pub const NOT_A_FUNCTION: DiagnosticMessage =
        diag!(2018, Error, "'{0}' is not a function.");
}

#[cfg(test)]
mod tests {
    use super::messages::diag;
    use super::*;

    #[test]
    fn message_formatting() {
        assert_eq!(
            format_message("Variable '{0}' doesn't exist.", &["x"]),
            "Variable 'x' doesn't exist."
        );
        assert_eq!(
            format_message("'{0}' vs '{1}'", &["Int", "Bool"]),
            "'Int' vs 'Bool'"
        );
    }

    #[test]
    fn collection_views() {
        const DEPRECATED_SYNTAX: DiagnosticMessage =
            diag!(9000, Warning, "Deprecated syntax.");

        let mut collection = DiagnosticCollection::new();
        collection.report(TextSpan::new(0, 1), &messages::VARIABLE_DOESNT_EXIST, &["x"]);
        collection.report(TextSpan::new(2, 1), &DEPRECATED_SYNTAX, &[]);

        assert_eq!(collection.len(), 2);
        assert!(collection.has_errors());
        assert_eq!(collection.errors().count(), 1);
        assert_eq!(collection.warnings().count(), 1);
        assert_eq!(
            collection.diagnostics()[0].message_text,
            "Variable 'x' doesn't exist."
        );
    }

    #[test]
    fn sorts_by_position() {
        let mut collection = DiagnosticCollection::new();
        collection.report(TextSpan::new(9, 1), &messages::EXPRESSION_MUST_HAVE_VALUE, &[]);
        collection.report(TextSpan::new(2, 1), &messages::EXPRESSION_MUST_HAVE_VALUE, &[]);
        collection.sort();
        assert_eq!(collection.diagnostics()[0].span.start, 2);
    }
}
