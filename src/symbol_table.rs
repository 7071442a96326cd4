//! Parse-time symbol tables: one name-keyed table per scope, chained to a
//! parent scope for lexical lookup. This is the collaborator a
//! symbol-aware parser binds declarations into as it parses; once
//! parsing finishes, the same data recalled from an intermediate-code
//! stream lives in a `SymbolVectorVector` instead (see
//! [`crate::symbol_vector`]).

use std::collections::HashMap;

use crate::error_log::ErrorLog;
use crate::symbol::{ScopeId, Symbol, SymbolHandle, GLOBAL_SCOPE, NO_SCOPE};

/// One scope's declarations, keyed by name, plus a link to the scope it
/// nests inside.
#[derive(Debug, Default)]
pub struct SymbolTable {
    parent: Option<ScopeId>,
    entries: HashMap<String, SymbolHandle>,
    order: Vec<SymbolHandle>,
}

impl SymbolTable {
    fn new(parent: Option<ScopeId>) -> Self {
        Self {
            parent,
            entries: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    pub fn lookup_local(&self, name: &str) -> Option<SymbolHandle> {
        self.entries.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Every scope opened during a parse, indexed by `ScopeId`. Scope `0` —
/// the global scope — always exists and has no parent.
#[derive(Debug)]
pub struct SymbolTableVector {
    tables: Vec<SymbolTable>,
}

impl Default for SymbolTableVector {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTableVector {
    pub fn new() -> Self {
        Self {
            tables: vec![SymbolTable::new(None)],
        }
    }

    /// Any scope outside `0..len()` is treated as the global scope — the
    /// same "out of range falls back to global" convention symbol
    /// references use throughout this crate.
    fn normalize(&self, scope: ScopeId) -> ScopeId {
        if scope >= 0 && (scope as usize) < self.tables.len() {
            scope
        } else {
            GLOBAL_SCOPE
        }
    }

    /// Opens a new scope nested under `parent` (normalized the same way
    /// as any other scope id), returning its id.
    pub fn push_scope(&mut self, parent: ScopeId) -> ScopeId {
        let parent = self.normalize(parent);
        self.tables.push(SymbolTable::new(Some(parent)));
        (self.tables.len() - 1) as ScopeId
    }

    pub fn table(&self, scope: ScopeId) -> &SymbolTable {
        &self.tables[self.normalize(scope) as usize]
    }

    /// Looks up `name` starting in `scope` and walking outward through
    /// parent scopes until found or the global scope has been checked.
    pub fn named_symbol_in(&self, scope: ScopeId, name: &str) -> Option<SymbolHandle> {
        let mut cursor = Some(self.normalize(scope));
        while let Some(s) = cursor {
            let table = &self.tables[s as usize];
            if let Some(sym) = table.lookup_local(name) {
                return Some(sym);
            }
            cursor = table.parent;
        }
        None
    }

    /// Binds `symbol` into `scope`, assigning it that scope's next free
    /// index. Fails — without side effects — if `scope` already has a
    /// local entry of the same name; the caller is expected to report
    /// that through an `ErrorLog`.
    pub fn enter_symbol_into(
        &mut self,
        scope: ScopeId,
        mut symbol: Symbol,
        log: &mut dyn ErrorLog,
    ) -> Option<SymbolHandle> {
        let scope = self.normalize(scope);
        let table = &mut self.tables[scope as usize];
        if let Some(existing) = table.lookup_local(&symbol.name) {
            log.syntax_error(
                symbol.source_name(),
                symbol.source_line(),
                format!(
                    "'{}' is already declared at line {}",
                    symbol.name,
                    existing.borrow().source_line()
                ),
            );
            return None;
        }
        symbol.scope = scope;
        symbol.index = table.order.len() as i32;
        let handle: SymbolHandle = std::rc::Rc::new(std::cell::RefCell::new(symbol));
        table.entries.insert(handle.borrow().name.clone(), handle.clone());
        table.order.push(handle.clone());
        Some(handle)
    }

    /// Convenience for binding straight into the global scope.
    pub fn enter_global_symbol(&mut self, symbol: Symbol, log: &mut dyn ErrorLog) -> Option<SymbolHandle> {
        self.enter_symbol_into(GLOBAL_SCOPE, symbol, log)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }
}
