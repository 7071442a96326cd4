//! Lexes tokens directly out of source text, rather than replaying ones
//! already encoded in an intermediate-code stream.
//!
//! Identifiers, numbers, and quoted strings can't be placed into a scope
//! yet — a scanner has no notion of scope, only a parser does — so this
//! scanner interns their spelling locally and hands back a token whose
//! `SymbolRef` points into that local table (`scope` set to
//! [`PENDING_SCOPE`]) instead of a real, placed scope/index pair. A
//! symbol-aware parser recognizes a pending reference, resolves the
//! spelling through [`SourceScanner::pending_text`], and replaces it with
//! a symbol actually entered into (or looked up in) a scope.

use std::io;

use crate::language::LanguageDefinition;
use crate::opcode::{self, CAT_DUMMY, CAT_NUMBER, CAT_SPACE, CAT_STRING, OPCODE_NONE};
use crate::scanner::{next_consolidated, ScanState, Scanner, ScannerFlags, UndoPoint};
use crate::stream::ByteStream;
use crate::token::{SymbolRef, Token};

/// Marks a `SymbolRef` as not-yet-placed text interned by a
/// `SourceScanner`, distinct from [`crate::symbol::NO_SCOPE`] (which
/// means "no parent/no scope at all").
pub const PENDING_SCOPE: i32 = -2;

/// A small string table a `SourceScanner` uses to hand out stable indices
/// for identifier/number/string spellings before a parser has decided
/// which scope (if any) they belong in.
#[derive(Debug, Default)]
struct TextInterner {
    by_text: std::collections::HashMap<String, i32>,
    texts: Vec<String>,
}

impl TextInterner {
    fn intern(&mut self, text: &str) -> i32 {
        if let Some(&i) = self.by_text.get(text) {
            return i;
        }
        let i = self.texts.len() as i32;
        self.texts.push(text.to_string());
        self.by_text.insert(text.to_string(), i);
        i
    }

    fn resolve(&self, index: i32) -> Option<&str> {
        self.texts.get(index as usize).map(String::as_str)
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn read_char<S: ByteStream>(stream: &mut S) -> io::Result<char> {
    let mut byte = [0u8; 1];
    crate::stream::read_exact(stream, &mut byte)?;
    Ok(byte[0] as char)
}

fn lex_raw<S: ByteStream>(
    stream: &mut S,
    lang: &LanguageDefinition,
    interner: &mut TextInterner,
) -> io::Result<Token> {
    if stream.has_ended() {
        return Ok(Token::stream_ending());
    }
    let c = read_char(stream)?;

    match c {
        '\n' => Ok(Token::line_ending(1)),
        '\r' => {
            if !stream.has_ended() {
                let peek = read_char(stream)?;
                if peek != '\n' {
                    stream.rewind_by(1)?;
                }
            }
            Ok(Token::line_ending(1))
        }
        c if c.is_whitespace() => Ok(Token::generic(CAT_SPACE)),
        '"' => {
            let mut text = String::new();
            while !stream.has_ended() {
                let ch = read_char(stream)?;
                if ch == '"' {
                    break;
                }
                text.push(ch);
            }
            let index = interner.intern(&text);
            Ok(Token::symbolic(
                CAT_STRING,
                SymbolRef {
                    scope: PENDING_SCOPE,
                    index,
                },
            ))
        }
        c if c.is_ascii_digit() => {
            let mut text = String::new();
            text.push(c);
            while !stream.has_ended() {
                let ch = read_char(stream)?;
                if ch.is_ascii_digit() || ch == '.' {
                    text.push(ch);
                } else {
                    stream.rewind_by(1)?;
                    break;
                }
            }
            let index = interner.intern(&text);
            Ok(Token::symbolic(
                CAT_NUMBER,
                SymbolRef {
                    scope: PENDING_SCOPE,
                    index,
                },
            ))
        }
        c if is_ident_start(c) => {
            let mut text = String::new();
            text.push(c);
            while !stream.has_ended() {
                let ch = read_char(stream)?;
                if is_ident_continue(ch) {
                    text.push(ch);
                } else {
                    stream.rewind_by(1)?;
                    break;
                }
            }
            let opcode = lang.lookup_opcode(&text);
            if opcode != OPCODE_NONE {
                Ok(Token::generic(opcode))
            } else {
                let folded = lang.fold(&text).into_owned();
                let index = interner.intern(&folded);
                Ok(Token::symbolic(
                    opcode::CAT_IDENTIFIER,
                    SymbolRef {
                        scope: PENDING_SCOPE,
                        index,
                    },
                ))
            }
        }
        other => {
            let spelling = other.to_string();
            let opcode = lang.lookup_opcode(&spelling);
            if opcode != OPCODE_NONE {
                Ok(Token::generic(opcode))
            } else {
                Ok(Token::generic(CAT_DUMMY | (other as u32 & 0xFFFF)))
            }
        }
    }
}

/// Lexes tokens from source text using a language's opcode dictionary
/// for keyword/operator spellings and its built-in category rules for
/// identifiers, numbers, strings, whitespace, and line endings.
pub struct SourceScanner<'lang, S> {
    stream: S,
    lang: &'lang LanguageDefinition,
    flags: ScannerFlags,
    state: ScanState,
    current: Token,
    interner: TextInterner,
    undo: Option<UndoPoint>,
}

impl<'lang, S: ByteStream> SourceScanner<'lang, S> {
    /// Builds a scanner and lexes its first token, so `current` already
    /// holds it (or `EOS`, for empty source text) by the time this
    /// returns.
    pub fn new(stream: S, lang: &'lang LanguageDefinition, flags: ScannerFlags) -> io::Result<Self> {
        let mut scanner = Self {
            stream,
            lang,
            flags,
            state: ScanState::default(),
            current: Token::generic(CAT_DUMMY),
            interner: TextInterner::default(),
            undo: None,
        };
        scanner.advance()?;
        Ok(scanner)
    }

    /// Resolves a pending (not-yet-placed) symbol reference's spelling,
    /// or `None` if `symbol_ref` does not name one of this scanner's
    /// interned spellings.
    pub fn pending_text(&self, symbol_ref: SymbolRef) -> Option<&str> {
        if symbol_ref.scope != PENDING_SCOPE {
            return None;
        }
        self.interner.resolve(symbol_ref.index)
    }

    /// Reads the next token the way `advance` would, without disturbing
    /// `current` or consolidation state, then rewinds the stream past
    /// whatever it read. Any identifier/number/string spelling touched
    /// along the way stays interned (interning is idempotent, so this
    /// costs nothing if the token is later read for real and nothing is
    /// observable if it never is).
    pub fn peek(&mut self) -> io::Result<Token> {
        let mut state_copy = self.state.clone();
        let lang = self.lang;
        let interner = &mut self.interner;
        let mut counted = crate::stream::CountingStream::new(&mut self.stream);
        let tok = next_consolidated(self.flags, &mut state_copy, || lex_raw(&mut counted, lang, interner))?;
        counted.unwind()?;
        Ok(tok)
    }

    // No `return_token` here: `Token::return_to` rewinds by the token's
    // *binary* on-stream length (`self_streaming_len`), which has nothing
    // to do with how many source-text bytes were actually lexed for it.
    // That equivalence only holds for a stream already in the binary
    // intermediate-code format — see `BinaryScanner::return_token`. `rewind`
    // doesn't have this problem: it undoes by the actual byte count the
    // last `advance` pulled through `CountingStream`, not by a token's
    // on-stream length, so it works the same regardless of what backs it.

    /// Undoes the most recent `advance`: rewinds the stream back past
    /// whatever source text it lexed to produce the current token,
    /// restores the consolidation state from just before that read, and
    /// clears `current`. A following `advance` re-lexes the same token
    /// (any identifier/number/string spelling it interns along the way
    /// was already interned, so re-lexing costs nothing new).
    pub fn rewind(&mut self) -> io::Result<()> {
        if let Some(undo) = self.undo.take() {
            if undo.bytes > 0 {
                self.stream.rewind_by(undo.bytes)?;
            }
            self.state = undo.state;
            self.current = Token::generic(CAT_DUMMY);
        }
        Ok(())
    }
}

impl<'lang, S: ByteStream> Scanner for SourceScanner<'lang, S> {
    fn current(&self) -> &Token {
        &self.current
    }

    fn advance(&mut self) -> io::Result<&Token> {
        let snapshot_state = self.state.clone();
        let lang = self.lang;
        let interner = &mut self.interner;
        let mut counted = crate::stream::CountingStream::new(&mut self.stream);
        let tok = next_consolidated(self.flags, &mut self.state, || lex_raw(&mut counted, lang, interner))?;
        let bytes = counted.consumed().max(0) as usize;
        self.current = tok;
        self.undo = Some(UndoPoint { state: snapshot_state, bytes });
        Ok(&self.current)
    }

    fn line_number(&self) -> u32 {
        self.state.line_number
    }

    fn name(&self) -> &str {
        self.stream.name()
    }

    fn pending_text(&self, symbol_ref: SymbolRef) -> Option<&str> {
        SourceScanner::pending_text(self, symbol_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::CaseFolding;
    use crate::stream::CursorStream;
    use crate::token::TokenKind;

    fn lang_with_keyword(word: &str, opcode: crate::opcode::Opcode) -> LanguageDefinition {
        let mut lang = LanguageDefinition::new(CaseFolding::Exact);
        lang.dict_mut().bind(word, opcode);
        lang
    }

    #[test]
    fn keyword_spelling_becomes_generic_token() {
        let lang = lang_with_keyword("if", opcode::CAT_USER | 1);
        let stream = CursorStream::from_bytes("mem", b"if".to_vec());
        let scanner = SourceScanner::new(stream, &lang, ScannerFlags::NONE).unwrap();
        assert_eq!(*scanner.current(), Token::generic(opcode::CAT_USER | 1));
    }

    #[test]
    fn identifier_is_interned_and_pending() {
        let lang = LanguageDefinition::new(CaseFolding::Exact);
        let stream = CursorStream::from_bytes("mem", b"count".to_vec());
        let scanner = SourceScanner::new(stream, &lang, ScannerFlags::NONE).unwrap();
        let TokenKind::Symbolic(symbol_ref) = scanner.current().kind else {
            panic!("expected a symbolic token");
        };
        assert_eq!(symbol_ref.scope, PENDING_SCOPE);
        assert_eq!(scanner.pending_text(symbol_ref), Some("count"));
    }

    #[test]
    fn same_spelling_interns_to_the_same_index() {
        let lang = LanguageDefinition::new(CaseFolding::Exact);
        let stream = CursorStream::from_bytes("mem", b"a a".to_vec());
        let mut scanner = SourceScanner::new(stream, &lang, ScannerFlags::NO_WHITESPACE).unwrap();
        let TokenKind::Symbolic(first) = scanner.current().kind else {
            panic!()
        };
        scanner.advance().unwrap();
        let TokenKind::Symbolic(second) = scanner.current().kind else {
            panic!()
        };
        assert_eq!(first.index, second.index);
    }

    #[test]
    fn whitespace_run_consolidates_to_one_token() {
        let lang = LanguageDefinition::new(CaseFolding::Exact);
        let stream = CursorStream::from_bytes("mem", b"a   b".to_vec());
        let mut scanner = SourceScanner::new(stream, &lang, ScannerFlags::CONSOLIDATE_WHITESPACE).unwrap();
        scanner.advance().unwrap();
        assert_eq!(scanner.current().category(), CAT_SPACE);
        scanner.advance().unwrap();
        assert!(matches!(scanner.current().kind, TokenKind::Symbolic(_)));
    }

    #[test]
    fn number_literal_is_lexed_as_a_run_of_digits() {
        let lang = LanguageDefinition::new(CaseFolding::Exact);
        let stream = CursorStream::from_bytes("mem", b"42".to_vec());
        let scanner = SourceScanner::new(stream, &lang, ScannerFlags::NONE).unwrap();
        let TokenKind::Symbolic(symbol_ref) = scanner.current().kind else {
            panic!("expected a numeric token");
        };
        assert_eq!(scanner.current().category(), CAT_NUMBER);
        assert_eq!(scanner.pending_text(symbol_ref), Some("42"));
    }

    #[test]
    fn peek_does_not_consume_or_disturb_current() {
        let lang = LanguageDefinition::new(CaseFolding::Exact);
        let stream = CursorStream::from_bytes("mem", b"ab cd".to_vec());
        let mut scanner = SourceScanner::new(stream, &lang, ScannerFlags::CONSOLIDATE_WHITESPACE).unwrap();
        let TokenKind::Symbolic(first) = scanner.current().kind else {
            panic!("expected the first identifier");
        };
        assert_eq!(scanner.pending_text(first), Some("ab"));

        let peeked = scanner.peek().unwrap();
        assert_eq!(peeked.category(), CAT_SPACE);
        // current is unchanged, and advancing for real reproduces the
        // same peeked token.
        let TokenKind::Symbolic(still_first) = scanner.current().kind else {
            panic!("peek must not disturb current");
        };
        assert_eq!(still_first, first);
        scanner.advance().unwrap();
        assert_eq!(scanner.current().category(), CAT_SPACE);
        scanner.advance().unwrap();
        let TokenKind::Symbolic(second) = scanner.current().kind else {
            panic!("expected the second identifier");
        };
        assert_eq!(scanner.pending_text(second), Some("cd"));
    }

    #[test]
    fn quoted_string_consumes_through_closing_quote() {
        let lang = LanguageDefinition::new(CaseFolding::Exact);
        let stream = CursorStream::from_bytes("mem", b"\"hi\"".to_vec());
        let scanner = SourceScanner::new(stream, &lang, ScannerFlags::NONE).unwrap();
        assert_eq!(scanner.current().category(), CAT_STRING);
    }

    #[test]
    fn rewind_undoes_the_last_advance_and_re_lexing_reproduces_it() {
        let lang = LanguageDefinition::new(CaseFolding::Exact);
        let stream = CursorStream::from_bytes("mem", b"ab cd".to_vec());
        let mut scanner = SourceScanner::new(stream, &lang, ScannerFlags::CONSOLIDATE_WHITESPACE).unwrap();
        let TokenKind::Symbolic(first) = scanner.current().kind else {
            panic!("expected the first identifier");
        };
        assert_eq!(scanner.pending_text(first), Some("ab"));

        scanner.advance().unwrap();
        assert_eq!(scanner.current().category(), CAT_SPACE);

        scanner.rewind().unwrap();
        assert_eq!(*scanner.current(), Token::generic(CAT_DUMMY));

        scanner.advance().unwrap();
        assert_eq!(scanner.current().category(), CAT_SPACE);
        scanner.advance().unwrap();
        let TokenKind::Symbolic(second) = scanner.current().kind else {
            panic!("expected the second identifier");
        };
        assert_eq!(scanner.pending_text(second), Some("cd"));
    }
}
