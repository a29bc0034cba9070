//! Scope management for the binder.
//!
//! Scopes form a singly-parented chain from inner to outer. Declaration
//! fails (returns false, no diagnostic here) when the name already exists in
//! that scope; shadowing an outer scope is allowed.

use rustc_hash::FxHashMap;
use vesper_core::intern::InternedString;
use vesper_ir::{FunctionSymbol, VariableSymbol};

/// What a name can resolve to.
#[derive(Debug, Clone, Copy)]
pub enum ScopedSymbol<'a> {
    Variable(VariableSymbol),
    Function(FunctionSymbol<'a>),
}

#[derive(Debug, Default)]
pub struct BoundScope<'a> {
    symbols: FxHashMap<InternedString, ScopedSymbol<'a>>,
    /// Insertion order, for symbol enumeration.
    order: Vec<InternedString>,
    pub parent: Option<Box<BoundScope<'a>>>,
}

impl<'a> BoundScope<'a> {
    pub fn new(parent: Option<Box<BoundScope<'a>>>) -> Self {
        Self {
            symbols: FxHashMap::default(),
            order: Vec::new(),
            parent,
        }
    }

    pub fn try_declare_variable(&mut self, variable: VariableSymbol) -> bool {
        self.try_declare(variable.name, ScopedSymbol::Variable(variable))
    }

    pub fn try_declare_function(&mut self, function: FunctionSymbol<'a>) -> bool {
        self.try_declare(function.name, ScopedSymbol::Function(function))
    }

    fn try_declare(&mut self, name: InternedString, symbol: ScopedSymbol<'a>) -> bool {
        if self.symbols.contains_key(&name) {
            return false;
        }
        self.symbols.insert(name, symbol);
        self.order.push(name);
        true
    }

    /// Resolve a name against this scope and its ancestors.
    pub fn lookup(&self, name: InternedString) -> Option<ScopedSymbol<'a>> {
        if let Some(symbol) = self.symbols.get(&name) {
            return Some(*symbol);
        }
        self.parent.as_ref().and_then(|p| p.lookup(name))
    }

    /// Variables declared directly in this scope, in declaration order.
    pub fn variables(&self) -> impl Iterator<Item = &VariableSymbol> {
        self.order.iter().filter_map(|name| match &self.symbols[name] {
            ScopedSymbol::Variable(v) => Some(v),
            ScopedSymbol::Function(_) => None,
        })
    }

    pub fn functions(&self) -> impl Iterator<Item = &FunctionSymbol<'a>> {
        self.order.iter().filter_map(|name| match &self.symbols[name] {
            ScopedSymbol::Function(f) => Some(f),
            ScopedSymbol::Variable(_) => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vesper_core::intern::StringInterner;
    use vesper_ir::{SymbolId, TypeSymbol, VariableKind};

    fn variable(interner: &StringInterner, id: u32, name: &str) -> VariableSymbol {
        VariableSymbol {
            id: SymbolId::new(id),
            name: interner.intern(name),
            kind: VariableKind::Global,
            read_only: false,
            ty: TypeSymbol::Int,
            constant: None,
        }
    }

    #[test]
    fn redeclaration_in_same_scope_fails() {
        let interner = StringInterner::new();
        let mut scope = BoundScope::new(None);
        assert!(scope.try_declare_variable(variable(&interner, 10, "x")));
        assert!(!scope.try_declare_variable(variable(&interner, 11, "x")));
    }

    #[test]
    fn shadowing_across_scopes_is_allowed() {
        let interner = StringInterner::new();
        let mut outer = BoundScope::new(None);
        assert!(outer.try_declare_variable(variable(&interner, 10, "x")));
        let mut inner = BoundScope::new(Some(Box::new(outer)));
        assert!(inner.try_declare_variable(variable(&interner, 11, "x")));

        let name = interner.intern("x");
        match inner.lookup(name) {
            Some(ScopedSymbol::Variable(v)) => assert_eq!(v.id, SymbolId::new(11)),
            _ => panic!("expected the inner variable"),
        }
    }

    #[test]
    fn lookup_walks_to_parent() {
        let interner = StringInterner::new();
        let mut outer = BoundScope::new(None);
        outer.try_declare_variable(variable(&interner, 10, "x"));
        let inner = BoundScope::new(Some(Box::new(outer)));
        assert!(inner.lookup(interner.intern("x")).is_some());
        assert!(inner.lookup(interner.intern("y")).is_none());
    }
}
