//! The parser driver: pulls tokens from a scanner one at a time, keeps a
//! short lookback buffer, and recovers from syntax errors by skipping
//! forward to a token a grammar rule names as a resynchronization point.
//!
//! A grammar built on this crate layers its own recursive-descent rules
//! on top of [`Parser`]; this module only supplies the mechanical parts
//! every such grammar needs regardless of what it parses. Two further
//! capability sets — [`crate::parser::language_aware`] and
//! [`crate::parser::symbol_aware`] — extend `Parser` with syntax-rule-
//! driven skipping and scope-aware symbol binding, respectively.
//!
//! A child parser (built with [`Parser::for_source`]) shares its
//! parent's scanner, error log, language, symbol tables, and output
//! stream — they are genuinely the same parse, just handled by a nested
//! instance — but starts with its own copy of the current scope, token
//! lookback, and current token, so it can open a nested scope or
//! rewind its own history without disturbing its parent's.

pub mod language_aware;
pub mod symbol_aware;

use std::cell::RefCell;
use std::rc::Rc;

use crate::error_log::ErrorLog;
use crate::language::LanguageDefinition;
use crate::rule::SyntaxRule;
use crate::scanner::Scanner;
use crate::stream::ByteStream;
use crate::symbol::{ScopeId, NO_SCOPE};
use crate::symbol_table::SymbolTableVector;
use crate::token::Token;
use crate::token_list::TokenList;

/// A recursive-descent parser driver, generic over the scanner it pulls
/// tokens from.
pub struct Parser<Sc> {
    scanner: Rc<RefCell<Sc>>,
    current: Token,
    token_list: TokenList,
    log: Rc<RefCell<dyn ErrorLog>>,
    language: Rc<RefCell<LanguageDefinition>>,
    symbols: Option<Rc<RefCell<SymbolTableVector>>>,
    output: Option<Rc<RefCell<dyn ByteStream>>>,
    current_scope: ScopeId,
    source_name: String,
}

impl<Sc: Scanner> Parser<Sc> {
    /// Builds a root parser: it owns a fresh token lookback buffer and
    /// starts outside any scope. Symbol tracking is added lazily by
    /// [`Parser::ready_to_parse`] the first time it is needed.
    pub fn new_root(
        scanner: Sc,
        log: Rc<RefCell<dyn ErrorLog>>,
        language: Rc<RefCell<LanguageDefinition>>,
    ) -> Self {
        let source_name = scanner.name().to_string();
        let current = scanner.current().clone();
        Self {
            scanner: Rc::new(RefCell::new(scanner)),
            current,
            token_list: TokenList::new(),
            log,
            language,
            symbols: None,
            output: None,
            current_scope: NO_SCOPE,
            source_name,
        }
    }

    /// Builds a child parser sharing `parent`'s scanner, log, language,
    /// symbol tables, and output, starting at `parent`'s current token
    /// and scope but with its own lookback buffer.
    pub fn for_source(parent: &Parser<Sc>) -> Self {
        Self {
            scanner: parent.scanner.clone(),
            current: parent.current.clone(),
            token_list: TokenList::new(),
            log: parent.log.clone(),
            language: parent.language.clone(),
            symbols: parent.symbols.clone(),
            output: parent.output.clone(),
            current_scope: parent.current_scope,
            source_name: parent.source_name.clone(),
        }
    }

    /// Attaches an output stream, for a parser that writes an
    /// intermediate-code representation of what it parses.
    pub fn with_output(mut self, output: Rc<RefCell<dyn ByteStream>>) -> Self {
        self.output = Some(output);
        self
    }

    pub fn current(&self) -> &Token {
        &self.current
    }

    pub fn current_scope(&self) -> ScopeId {
        self.current_scope
    }

    pub fn set_current_scope(&mut self, scope: ScopeId) {
        self.current_scope = scope;
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn line_number(&self) -> u32 {
        self.scanner.borrow().line_number()
    }

    pub fn language(&self) -> Rc<RefCell<LanguageDefinition>> {
        self.language.clone()
    }

    pub fn log(&self) -> Rc<RefCell<dyn ErrorLog>> {
        self.log.clone()
    }

    pub fn output(&self) -> Option<Rc<RefCell<dyn ByteStream>>> {
        self.output.clone()
    }

    pub fn symbols(&self) -> Option<Rc<RefCell<SymbolTableVector>>> {
        self.symbols.clone()
    }

    /// Confirms every collaborator this driver needs is present, lazily
    /// constructing symbol tracking (a fresh global scope) the first
    /// time it's asked for. Always returns `true` today — scanner, log,
    /// and language are guaranteed present at construction — but callers
    /// should still check it, since a future collaborator could make
    /// this fail.
    pub fn ready_to_parse(&mut self) -> bool {
        if self.symbols.is_none() {
            self.symbols = Some(Rc::new(RefCell::new(SymbolTableVector::new())));
            self.current_scope = crate::symbol::GLOBAL_SCOPE;
        }
        true
    }

    /// Advances to the next token, pushing the current one onto the
    /// lookback buffer first.
    pub fn next_token(&mut self) -> &Token {
        let previous = self.current.clone();
        self.token_list.push(previous);
        let mut scanner = self.scanner.borrow_mut();
        let next = scanner.advance().expect("scanner read failed");
        self.current = next.clone();
        drop(scanner);
        &self.current
    }

    /// The most recently consumed token, or `None` before any call to
    /// `next_token`.
    pub fn previous_token(&self) -> Option<&Token> {
        self.token_list.last()
    }

    /// `true` once the current token is the stream's end.
    pub fn is_at_end(&self) -> bool {
        self.current.is_stream_ending()
    }

    /// Reports a syntax error and advances past tokens until the current
    /// one is a member of `rule` or the stream ends.
    pub fn resync_to(&mut self, rule: &SyntaxRule, message: impl Into<String>) {
        let source_name = self.source_name.clone();
        let line = self.line_number();
        self.log.borrow_mut().syntax_error(&source_name, line, message.into());
        while !rule.has(self.current.opcode) && !self.is_at_end() {
            self.next_token();
        }
    }

    /// Advances past tokens, without reporting an error, until the
    /// current one is a member of `rule` or the stream ends. Tokens
    /// skipped this way are marked silenced when `silence` is set.
    pub fn skip_to(&mut self, rule: &SyntaxRule, silence: bool) {
        while !rule.has(self.current.opcode) && !self.is_at_end() {
            if silence {
                self.current.set_silenced(true);
            }
            self.next_token();
        }
    }

    /// Advances past tokens for as long as the current one is a member
    /// of `rule` — the inverse of `skip_to`, for consuming a run of
    /// tokens all belonging to the same rule (for example, consecutive
    /// modifiers).
    pub fn skip_over(&mut self, rule: &SyntaxRule, silence: bool) {
        while rule.has(self.current.opcode) && !self.is_at_end() {
            if silence {
                self.current.set_silenced(true);
            }
            self.next_token();
        }
    }
}
