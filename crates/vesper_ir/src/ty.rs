//! The closed set of Vesper types.

use std::fmt;

/// A primitive type. `Error` is the sentinel for binding failures: it never
/// unifies with anything, which keeps one bad expression from cascading into
/// a wall of follow-on diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeSymbol {
    Any,
    Bool,
    Int,
    String,
    Void,
    Error,
}

impl TypeSymbol {
    pub fn name(self) -> &'static str {
        match self {
            TypeSymbol::Any => "Any",
            TypeSymbol::Bool => "Bool",
            TypeSymbol::Int => "Int",
            TypeSymbol::String => "String",
            TypeSymbol::Void => "Void",
            TypeSymbol::Error => "?",
        }
    }

    /// Resolve a source-level type name. `Void` and `Error` are not
    /// denotable in source.
    pub fn lookup(text: &str) -> Option<TypeSymbol> {
        match text {
            "Any" => Some(TypeSymbol::Any),
            "Bool" => Some(TypeSymbol::Bool),
            "Int" => Some(TypeSymbol::Int),
            "String" => Some(TypeSymbol::String),
            _ => None,
        }
    }

    pub fn is_error(self) -> bool {
        self == TypeSymbol::Error
    }
}

impl fmt::Display for TypeSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
