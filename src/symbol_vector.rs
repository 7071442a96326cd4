//! Recall-time symbol storage: once a parse is done and its declarations
//! have been written to an intermediate-code stream, a later pass reads
//! them back into index-keyed vectors rather than name-keyed tables —
//! nothing after parsing ever looks a symbol up by name again, only by
//! the `SymbolRef` a token already carries.

use crate::symbol::{ScopeId, Symbol, GLOBAL_SCOPE};

/// One scope's symbols, recalled from a stream and indexed exactly as
/// they were written.
#[derive(Debug, Default)]
pub struct SymbolVector {
    symbols: Vec<Symbol>,
}

impl SymbolVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, symbol: Symbol) -> i32 {
        let index = self.symbols.len() as i32;
        self.symbols.push(symbol);
        index
    }

    pub fn get(&self, index: i32) -> Option<&Symbol> {
        if index < 0 {
            return None;
        }
        self.symbols.get(index as usize)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Every recalled scope, indexed by `ScopeId`, mirroring the structure a
/// `SymbolTableVector` had at parse time.
#[derive(Debug)]
pub struct SymbolVectorVector {
    scopes: Vec<SymbolVector>,
}

impl Default for SymbolVectorVector {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolVectorVector {
    pub fn new() -> Self {
        Self {
            scopes: vec![SymbolVector::new()],
        }
    }

    fn normalize(&self, scope: ScopeId) -> ScopeId {
        if scope >= 0 && (scope as usize) < self.scopes.len() {
            scope
        } else {
            GLOBAL_SCOPE
        }
    }

    /// Grows the scope vector so `scope` has a slot, normalizing a
    /// negative or already-out-of-range id to the global scope first —
    /// the same convention `recall` and `push_into` apply, so a caller
    /// can never turn a bad scope id into an unbounded allocation.
    pub fn ensure_scope(&mut self, scope: ScopeId) -> ScopeId {
        if scope < 0 {
            return GLOBAL_SCOPE;
        }
        while (scope as usize) >= self.scopes.len() {
            self.scopes.push(SymbolVector::new());
        }
        scope
    }

    pub fn push_into(&mut self, scope: ScopeId, symbol: Symbol) -> i32 {
        let scope = self.ensure_scope(scope);
        self.scopes[scope as usize].push(symbol)
    }

    /// Recalls the symbol a `SymbolRef` names, out-of-range scope
    /// references falling back to the global scope the same way
    /// `SymbolTableVector` does at parse time.
    pub fn recall(&self, scope: ScopeId, index: i32) -> Option<&Symbol> {
        let scope = self.normalize(scope);
        self.scopes[scope as usize].get(index)
    }

    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::SymbolCategory;

    #[test]
    fn recall_finds_symbol_placed_at_scope_and_index() {
        let mut vectors = SymbolVectorVector::new();
        vectors.push_into(GLOBAL_SCOPE, Symbol::recalled("a", SymbolCategory::VARIABLE, 0, 0));
        vectors.ensure_scope(1);
        vectors.push_into(1, Symbol::recalled("b", SymbolCategory::VARIABLE, 1, 0));

        assert_eq!(vectors.recall(0, 0).unwrap().name, "a");
        assert_eq!(vectors.recall(1, 0).unwrap().name, "b");
        assert!(vectors.recall(0, 1).is_none());
    }

    #[test]
    fn recall_with_out_of_range_scope_falls_back_to_global() {
        let mut vectors = SymbolVectorVector::new();
        vectors.push_into(GLOBAL_SCOPE, Symbol::recalled("a", SymbolCategory::VARIABLE, 0, 0));
        assert_eq!(vectors.recall(42, 0).unwrap().name, "a");
    }

    #[test]
    fn push_into_with_negative_scope_falls_back_to_global_without_growing() {
        let mut vectors = SymbolVectorVector::new();
        vectors.push_into(
            crate::symbol::NO_SCOPE,
            Symbol::recalled("a", SymbolCategory::VARIABLE, 0, 0),
        );
        assert_eq!(vectors.scope_count(), 1);
        assert_eq!(vectors.recall(GLOBAL_SCOPE, 0).unwrap().name, "a");
    }
}
