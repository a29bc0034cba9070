//! Type conversion classification.

use vesper_ir::TypeSymbol;

/// How one type converts to another. Only implicit conversions are inserted
/// automatically; explicit ones require a cast call such as `String(x)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// No conversion exists.
    None,
    /// The types are equal.
    Identity,
    /// Widening to `Any`; inserted automatically.
    Implicit,
    /// Narrowing from `Any`, or coercion between Bool/Int and String.
    Explicit,
}

impl Conversion {
    pub fn classify(from: TypeSymbol, to: TypeSymbol) -> Conversion {
        use TypeSymbol::*;
        if from == to {
            return Conversion::Identity;
        }
        // Error never unifies; Void converts to nothing.
        if from == Error || to == Error || from == Void || to == Void {
            return Conversion::None;
        }
        if to == Any {
            return Conversion::Implicit;
        }
        if from == Any {
            return Conversion::Explicit;
        }
        match (from, to) {
            (Bool | Int, String) => Conversion::Explicit,
            (String, Bool | Int) => Conversion::Explicit,
            _ => Conversion::None,
        }
    }

    pub fn exists(self) -> bool {
        self != Conversion::None
    }

    pub fn is_identity(self) -> bool {
        self == Conversion::Identity
    }

    pub fn is_implicit(self) -> bool {
        matches!(self, Conversion::Identity | Conversion::Implicit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vesper_ir::TypeSymbol::*;

    #[test]
    fn widening_to_any_is_implicit() {
        assert_eq!(Conversion::classify(Int, Any), Conversion::Implicit);
        assert_eq!(Conversion::classify(String, Any), Conversion::Implicit);
    }

    #[test]
    fn narrowing_from_any_is_explicit() {
        assert_eq!(Conversion::classify(Any, Int), Conversion::Explicit);
    }

    #[test]
    fn string_coercions_are_explicit() {
        assert_eq!(Conversion::classify(Int, String), Conversion::Explicit);
        assert_eq!(Conversion::classify(String, Bool), Conversion::Explicit);
        assert_eq!(Conversion::classify(Bool, Int), Conversion::None);
    }

    #[test]
    fn error_never_unifies() {
        assert_eq!(Conversion::classify(Error, Any), Conversion::None);
        assert_eq!(Conversion::classify(Any, Error), Conversion::None);
        assert_eq!(Conversion::classify(Error, Error), Conversion::Identity);
    }
}
