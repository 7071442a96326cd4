//! Reusable machinery for recursive-descent parsers.
//!
//! This crate is deliberately grammar-agnostic: it supplies an
//! opcode-tagged token model, a lazy scanner that can read either a
//! binary intermediate-code stream or raw source text, a parser driver
//! with error recovery and resynchronization, and lexically-scoped
//! symbol tables — the machinery every hand-written recursive-descent
//! parser ends up building for itself, factored out so it doesn't have
//! to be rebuilt per grammar. What to do with a token once it's in hand
//! — which grammar rule it belongs to, what AST node it produces — is
//! left entirely to the caller.
//!
//! ## Layout
//!
//! - [`opcode`] — the opcode type, its category encoding, and the
//!   dictionary that maps spellings to opcodes.
//! - [`rule`] / [`language`] — named syntax rules and the language
//!   definition (dictionary + rules + case folding) that binds them.
//! - [`token`] / [`token_list`] — the token model and its binary
//!   encoding, and the lookback buffer a parser keeps.
//! - [`stream`] — the byte-stream abstraction scanners read from and
//!   write to.
//! - [`scanner`] — [`scanner::BinaryScanner`] (replays an
//!   intermediate-code stream) and [`scanner::source::SourceScanner`]
//!   (lexes source text), sharing one whitespace/line-ending
//!   consolidation policy.
//! - [`symbol`] / [`symbol_table`] / [`symbol_vector`] — declarations
//!   bound while parsing (name-keyed, scope-chained) versus recalled
//!   later from a stream (index-keyed).
//! - [`parser`] — the parser driver itself, in three layered capability
//!   sets: the base driver, syntax-rule-aware skipping
//!   ([`parser::language_aware`]), and scope-aware symbol binding
//!   ([`parser::symbol_aware`]).
//! - [`error`] / [`error_log`] — the crate's fatal-error type, and the
//!   `ErrorLog` collaborator a parser accumulates recoverable syntax
//!   errors through.

pub mod error;
pub mod error_log;
pub mod language;
pub mod opcode;
pub mod parser;
pub mod rule;
pub mod scanner;
pub mod stream;
pub mod symbol;
pub mod symbol_table;
pub mod symbol_vector;
pub mod token;
pub mod token_list;

pub use error::{Error, FatalError, Result};
pub use error_log::{DefaultErrorLog, ErrorLog};
pub use language::{CaseFolding, LanguageDefinition};
pub use opcode::{Opcode, OpcodeDict};
pub use parser::Parser;
pub use rule::{RuleId, RuleSet, SyntaxRule};
pub use scanner::{BinaryScanner, ScannerFlags};
pub use stream::{ByteStream, CursorStream, FileStream};
pub use symbol::{ScopeId, Symbol, SymbolCategory, SymbolHandle, GLOBAL_SCOPE, NO_SCOPE};
pub use symbol_table::SymbolTableVector;
pub use symbol_vector::SymbolVectorVector;
pub use token::{SymbolRef, Token, TokenKind};
pub use token_list::TokenList;
