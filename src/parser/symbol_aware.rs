//! Adds scope-aware symbol binding and lookup on top of the base
//! [`Parser`]: entering declarations into the current (or an explicit)
//! scope, and looking names back up through the lexical parent chain.

use crate::scanner::Scanner;
use crate::symbol::{ScopeId, Symbol, SymbolHandle};
use crate::token::{SymbolRef, Token, TokenKind};

use super::Parser;

impl<Sc: Scanner> Parser<Sc> {
    /// Resolves a token produced by a `SourceScanner` whose symbol
    /// reference has not yet been placed into a scope, returning its
    /// original spelling. `None` for any token that isn't a pending
    /// symbolic reference (including ones already placed, e.g. replayed
    /// from a `BinaryScanner`).
    pub fn resolve_pending(&self, token: &Token) -> Option<String> {
        let TokenKind::Symbolic(symbol_ref) = token.kind else {
            return None;
        };
        self.scanner_pending_text(symbol_ref)
    }

    fn scanner_pending_text(&self, symbol_ref: SymbolRef) -> Option<String> {
        self.raw_scanner(|scanner| scanner.pending_text(symbol_ref).map(str::to_string))
    }

    fn raw_scanner<T>(&self, f: impl FnOnce(&Sc) -> T) -> T {
        let scanner = self.scanner_ref();
        f(&*scanner)
    }

    fn scanner_ref(&self) -> std::cell::Ref<'_, Sc> {
        self.scanner_handle().borrow()
    }

    fn scanner_handle(&self) -> &std::rc::Rc<std::cell::RefCell<Sc>> {
        &self.scanner
    }

    /// Binds `symbol` into `scope`, assigning it that scope's next free
    /// index. `None` (and a logged syntax error) if `scope` already has
    /// an entry of the same name. Lazily builds symbol tracking via
    /// [`Parser::ready_to_parse`] if this is the first symbol entered.
    pub fn enter_symbol_into(&mut self, scope: ScopeId, symbol: Symbol) -> Option<SymbolHandle> {
        self.ready_to_parse();
        let symbols = self.symbols().expect("ready_to_parse guarantees this");
        let mut table_vec = symbols.borrow_mut();
        table_vec.enter_symbol_into(scope, symbol, &mut *self.log().borrow_mut())
    }

    /// Binds `symbol` into the parser's current scope.
    pub fn enter_symbol(&mut self, symbol: Symbol) -> Option<SymbolHandle> {
        let scope = self.current_scope();
        self.enter_symbol_into(scope, symbol)
    }

    /// Binds `symbol` into the global scope regardless of the parser's
    /// current scope.
    pub fn enter_global_symbol(&mut self, symbol: Symbol) -> Option<SymbolHandle> {
        self.enter_symbol_into(crate::symbol::GLOBAL_SCOPE, symbol)
    }

    /// Looks `name` up starting at `scope` and walking outward through
    /// parent scopes.
    pub fn named_symbol_in(&mut self, scope: ScopeId, name: &str) -> Option<SymbolHandle> {
        self.ready_to_parse();
        let symbols = self.symbols()?;
        let table_vec = symbols.borrow();
        table_vec.named_symbol_in(scope, name)
    }

    /// Looks `name` up starting at the parser's current scope.
    pub fn symbol_named(&mut self, name: &str) -> Option<SymbolHandle> {
        let scope = self.current_scope();
        self.named_symbol_in(scope, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_log::DefaultErrorLog;
    use crate::language::{CaseFolding, LanguageDefinition};
    use crate::scanner::source::SourceScanner;
    use crate::scanner::ScannerFlags;
    use crate::stream::CursorStream;
    use crate::symbol::SymbolCategory;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn parser_over(
        text: &[u8],
        lang: LanguageDefinition,
    ) -> Parser<SourceScanner<'static, CursorStream>> {
        let lang: &'static LanguageDefinition = Box::leak(Box::new(lang));
        let scanner = SourceScanner::new(CursorStream::from_bytes("mem", text.to_vec()), lang, ScannerFlags::NONE).unwrap();
        let log: Rc<RefCell<dyn crate::error_log::ErrorLog>> = Rc::new(RefCell::new(DefaultErrorLog::new()));
        Parser::new_root(scanner, log, Rc::new(RefCell::new(LanguageDefinition::new(CaseFolding::Exact))))
    }

    #[test]
    fn resolve_pending_recovers_identifier_spelling() {
        let parser = parser_over(b"count", LanguageDefinition::new(CaseFolding::Exact));
        let tok = parser.current().clone();
        assert_eq!(parser.resolve_pending(&tok).as_deref(), Some("count"));
    }

    #[test]
    fn enter_symbol_places_into_current_scope() {
        let mut parser = parser_over(b"count", LanguageDefinition::new(CaseFolding::Exact));
        let handle = parser
            .enter_symbol(Symbol::from_source("count", SymbolCategory::VARIABLE, "mem", 1))
            .unwrap();
        assert_eq!(handle.borrow().scope, crate::symbol::GLOBAL_SCOPE);
        assert!(parser.symbol_named("count").is_some());
    }

    #[test]
    fn duplicate_entry_in_same_scope_is_rejected() {
        let mut parser = parser_over(b"count", LanguageDefinition::new(CaseFolding::Exact));
        parser
            .enter_symbol(Symbol::from_source("count", SymbolCategory::VARIABLE, "mem", 1))
            .unwrap();
        let dup = parser.enter_symbol(Symbol::from_source("count", SymbolCategory::VARIABLE, "mem", 2));
        assert!(dup.is_none());
    }

    #[test]
    fn lookup_of_unknown_name_is_none() {
        let mut parser = parser_over(b"count", LanguageDefinition::new(CaseFolding::Exact));
        assert!(parser.symbol_named("missing").is_none());
    }
}
