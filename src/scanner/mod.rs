//! Scanners: the lazy token producers a parser driver pulls from one
//! token at a time.
//!
//! Two concrete scanners share one contract (see the [`Scanner`] trait)
//! and one consolidation/whitespace policy (`next_consolidated`, below):
//! a [`BinaryScanner`] replays tokens already encoded as opcodes from an
//! intermediate-code stream, a [`SourceScanner`] (in `scanner::source`)
//! lexes them fresh out of source text. Neither repeats the other's
//! bookkeeping — each only supplies how to produce one *raw* token; the
//! shared helper applies flags, counts lines, and makes end-of-stream
//! sticky once reached.

pub mod source;

use std::io;

use crate::opcode::{CAT_EOL, CAT_SPACE};
use crate::token::{Token, TokenKind};

/// What a scanner drops or merges as it produces tokens. A hand-rolled
/// bitset rather than a crate dependency — three independent flags don't
/// need more than that.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScannerFlags(u8);

impl ScannerFlags {
    pub const NONE: ScannerFlags = ScannerFlags(0);
    /// Drop space tokens entirely rather than returning them.
    pub const NO_WHITESPACE: ScannerFlags = ScannerFlags(0b001);
    /// Merge consecutive space tokens into a single one.
    pub const CONSOLIDATE_WHITESPACE: ScannerFlags = ScannerFlags(0b010);
    /// Merge consecutive line-ending tokens into one carrying the total
    /// line count.
    pub const CONSOLIDATE_LINE_ENDINGS: ScannerFlags = ScannerFlags(0b100);

    pub fn contains(self, flag: ScannerFlags) -> bool {
        self.0 & flag.0 == flag.0
    }
}

/// A scanner built with no explicit flags drops whitespace entirely and
/// consolidates whitespace runs that do survive (moot, since they're
/// dropped first, but kept so that toggling `NO_WHITESPACE` off alone
/// degrades to "one space token per run" rather than "one token per
/// space character").
impl Default for ScannerFlags {
    fn default() -> Self {
        ScannerFlags::NO_WHITESPACE | ScannerFlags::CONSOLIDATE_WHITESPACE
    }
}

impl std::ops::BitOr for ScannerFlags {
    type Output = ScannerFlags;
    fn bitor(self, rhs: ScannerFlags) -> ScannerFlags {
        ScannerFlags(self.0 | rhs.0)
    }
}

/// The contract both scanners implement: pull one token at a time,
/// track how many lines have gone by, and report when the underlying
/// source is exhausted.
pub trait Scanner {
    fn current(&self) -> &Token;
    fn advance(&mut self) -> io::Result<&Token>;
    fn line_number(&self) -> u32;
    fn name(&self) -> &str;

    fn continues(&self) -> bool {
        !self.current().is_stream_ending()
    }

    /// Resolves the spelling behind a not-yet-placed symbol reference.
    /// Only `SourceScanner` produces these; every other scanner's
    /// symbols are already placed, so the default is `None`.
    fn pending_text(&self, symbol_ref: crate::token::SymbolRef) -> Option<&str> {
        let _ = symbol_ref;
        None
    }
}

/// Shared state both scanners thread through `next_consolidated`: the
/// running line count, whether end-of-stream has already been reached
/// (making it sticky), and a one-token carry slot for when consolidating
/// a run reads one token past the run's end.
#[derive(Debug, Clone, Default)]
pub struct ScanState {
    pub line_number: u32,
    pub eos_reached: bool,
    pending: Option<Token>,
}

/// Applies `flags`' whitespace/line-ending policy on top of a raw token
/// producer, and makes reaching end-of-stream sticky: once `raw_next`
/// has reported it, every later call returns it again without invoking
/// `raw_next`.
pub fn next_consolidated(
    flags: ScannerFlags,
    state: &mut ScanState,
    mut raw_next: impl FnMut() -> io::Result<Token>,
) -> io::Result<Token> {
    if state.eos_reached {
        return Ok(Token::stream_ending());
    }

    loop {
        let tok = match state.pending.take() {
            Some(t) => t,
            None => raw_next()?,
        };

        if tok.is_stream_ending() {
            state.eos_reached = true;
            return Ok(tok);
        }

        match tok.category() {
            CAT_EOL => {
                let TokenKind::LineEnding { line_count } = tok.kind else {
                    unreachable!("EOL-category token must carry LineEnding")
                };
                state.line_number += line_count;

                if !flags.contains(ScannerFlags::CONSOLIDATE_LINE_ENDINGS) {
                    return Ok(tok);
                }

                let mut total = line_count;
                loop {
                    let next = raw_next()?;
                    if next.is_stream_ending() {
                        state.eos_reached = true;
                        state.pending = Some(next);
                        return Ok(Token::line_ending(total));
                    }
                    if next.category() != CAT_EOL {
                        state.pending = Some(next);
                        return Ok(Token::line_ending(total));
                    }
                    let TokenKind::LineEnding { line_count } = next.kind else {
                        unreachable!()
                    };
                    state.line_number += line_count;
                    total += line_count;
                }
            }
            CAT_SPACE => {
                if flags.contains(ScannerFlags::NO_WHITESPACE) {
                    continue;
                }
                if !flags.contains(ScannerFlags::CONSOLIDATE_WHITESPACE) {
                    return Ok(tok);
                }
                loop {
                    let next = raw_next()?;
                    if next.is_stream_ending() || next.category() != CAT_SPACE {
                        state.pending = Some(next);
                        return Ok(tok);
                    }
                }
            }
            _ => return Ok(tok),
        }
    }
}

/// What a scanner needs to undo its most recent `advance`: the
/// consolidation state from just before that call, and how many bytes it
/// pulled from the underlying stream to produce the token now current.
pub(crate) struct UndoPoint {
    state: ScanState,
    bytes: usize,
}

/// Replays tokens from an intermediate-code stream previously written by
/// [`crate::token::Token::write_to`].
pub struct BinaryScanner<S> {
    stream: S,
    flags: ScannerFlags,
    state: ScanState,
    current: Token,
    undo: Option<UndoPoint>,
}

impl<S: crate::stream::ByteStream> BinaryScanner<S> {
    /// Builds a scanner and loads its first token, so `current` already
    /// holds it (or `EOS`, for an empty stream) by the time this returns.
    pub fn new(stream: S, flags: ScannerFlags) -> io::Result<Self> {
        let mut scanner = Self {
            stream,
            flags,
            state: ScanState::default(),
            current: Token::generic(crate::opcode::CAT_DUMMY),
            undo: None,
        };
        scanner.advance()?;
        Ok(scanner)
    }

    pub fn into_inner(self) -> S {
        self.stream
    }

    /// Reads the next token the way `advance` would, without disturbing
    /// `current` or the scanner's consolidation state, then rewinds the
    /// stream past whatever it read so the same token is produced again
    /// on the next real `advance`.
    pub fn peek(&mut self) -> io::Result<Token> {
        let mut state_copy = self.state.clone();
        let mut counted = crate::stream::CountingStream::new(&mut self.stream);
        let tok = next_consolidated(self.flags, &mut state_copy, || Token::read_from(&mut counted))?;
        counted.unwind()?;
        Ok(tok)
    }

    /// Rewinds the stream past `tok`'s on-stream payload, as if it had
    /// never been read.
    pub fn return_token(&mut self, tok: &Token) -> io::Result<()> {
        tok.return_to(&mut self.stream)
    }

    /// Undoes the most recent `advance`: rewinds the stream back past
    /// whatever it consumed to produce the current token, restores the
    /// consolidation state from just before that read, and clears
    /// `current`. A following `advance` reproduces the same token. A
    /// second `rewind` in a row, with nothing advanced in between, is a
    /// no-op — there is only one level of undo.
    pub fn rewind(&mut self) -> io::Result<()> {
        if let Some(undo) = self.undo.take() {
            if undo.bytes > 0 {
                self.stream.rewind_by(undo.bytes)?;
            }
            self.state = undo.state;
            self.current = Token::generic(crate::opcode::CAT_DUMMY);
        }
        Ok(())
    }
}

impl<S: crate::stream::ByteStream> Scanner for BinaryScanner<S> {
    fn current(&self) -> &Token {
        &self.current
    }

    fn advance(&mut self) -> io::Result<&Token> {
        let snapshot_state = self.state.clone();
        let mut counted = crate::stream::CountingStream::new(&mut self.stream);
        let tok = next_consolidated(self.flags, &mut self.state, || Token::read_from(&mut counted))?;
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
}
