//! Tokens and their binary representation in the intermediate-code stream.
//!
//! Every token's on-stream layout is self-describing from its opcode
//! alone: a reader that knows nothing else about the language can tell,
//! from the opcode's category, how many further bytes (if any) to read.
//! Stream-ending tokens are the one exception — they are never written,
//! only synthesized when a stream runs dry.

use crate::opcode::{self, Opcode, CAT_EOL, CAT_EOS};
use crate::stream::{read_exact, ByteStream};

/// Identifies a declared symbol: which scope it lives in, and its index
/// within that scope's symbol table/vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolRef {
    pub scope: i32,
    pub index: i32,
}

impl SymbolRef {
    pub const NONE: SymbolRef = SymbolRef {
        scope: -1,
        index: -1,
    };

    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }
}

/// The payload carried alongside a token's opcode, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A plain token — keyword, operator, punctuation, whitespace run.
    /// No further payload.
    Generic,
    /// An identifier, number, or string literal: carries a reference to
    /// its interned symbol rather than repeating the spelling inline.
    Symbolic(SymbolRef),
    /// One or more consolidated newlines.
    LineEnding { line_count: u32 },
    /// The synthetic token a scanner returns once its stream is
    /// exhausted. Never appears in a stream on disk.
    StreamEnding,
}

/// A single token: an opcode, a payload determined by its category, and
/// a flag marking whether a parser has asked for it to be dropped from
/// output (see `skip_to`/`skip_over` in the parser driver).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub opcode: Opcode,
    pub silenced: bool,
    pub kind: TokenKind,
}

impl Token {
    pub fn generic(opcode: Opcode) -> Self {
        debug_assert!(
            !opcode::is_symbol_category(opcode::category(opcode)),
            "symbol-category opcode {opcode:#x} requires Token::symbolic"
        );
        Self {
            opcode,
            silenced: false,
            kind: TokenKind::Generic,
        }
    }

    pub fn symbolic(opcode: Opcode, symbol_ref: SymbolRef) -> Self {
        debug_assert!(
            opcode::is_symbol_category(opcode::category(opcode)),
            "opcode {opcode:#x} is not an identifier/number/string category"
        );
        Self {
            opcode,
            silenced: false,
            kind: TokenKind::Symbolic(symbol_ref),
        }
    }

    pub fn line_ending(line_count: u32) -> Self {
        Self {
            opcode: CAT_EOL,
            silenced: false,
            kind: TokenKind::LineEnding { line_count },
        }
    }

    pub fn stream_ending() -> Self {
        Self {
            opcode: CAT_EOS,
            silenced: false,
            kind: TokenKind::StreamEnding,
        }
    }

    pub fn category(&self) -> Opcode {
        opcode::category(self.opcode)
    }

    pub fn is_stream_ending(&self) -> bool {
        matches!(self.kind, TokenKind::StreamEnding)
    }

    /// Marks this token silenced (or not), returning its previous state.
    pub fn set_silenced(&mut self, silenced: bool) -> bool {
        std::mem::replace(&mut self.silenced, silenced)
    }

    /// Number of payload bytes beyond the 4-byte opcode this token's
    /// category carries on stream.
    fn payload_len(&self) -> usize {
        match self.kind {
            TokenKind::Generic => 0,
            TokenKind::Symbolic(_) => 8,
            TokenKind::LineEnding { .. } => 4,
            TokenKind::StreamEnding => 0,
        }
    }

    /// Total bytes this token occupies on stream — `0` for a
    /// stream-ending token, since those are never written.
    pub fn self_streaming_len(&self) -> usize {
        if self.is_stream_ending() {
            0
        } else {
            4 + self.payload_len()
        }
    }

    /// Writes this token's binary representation. A stream-ending token
    /// writes nothing, matching the "never written" contract.
    pub fn write_to<S: ByteStream + ?Sized>(&self, stream: &mut S) -> std::io::Result<()> {
        if self.is_stream_ending() {
            return Ok(());
        }
        stream.write(&self.opcode.to_be_bytes())?;
        match self.kind {
            TokenKind::Generic => {}
            TokenKind::Symbolic(s) => {
                stream.write(&s.scope.to_be_bytes())?;
                stream.write(&s.index.to_be_bytes())?;
            }
            TokenKind::LineEnding { line_count } => {
                stream.write(&line_count.to_be_bytes())?;
            }
            TokenKind::StreamEnding => unreachable!(),
        }
        Ok(())
    }

    /// Reads one token. Returns a stream-ending token, without consuming
    /// any bytes, once `stream.has_ended()`.
    pub fn read_from<S: ByteStream + ?Sized>(stream: &mut S) -> std::io::Result<Token> {
        if stream.has_ended() {
            return Ok(Token::stream_ending());
        }
        let mut opcode_bytes = [0u8; 4];
        read_exact(stream, &mut opcode_bytes)?;
        let opcode = Opcode::from_be_bytes(opcode_bytes);
        let cat = opcode::category(opcode);
        if opcode::is_symbol_category(cat) {
            let mut scope_bytes = [0u8; 4];
            let mut index_bytes = [0u8; 4];
            read_exact(stream, &mut scope_bytes)?;
            read_exact(stream, &mut index_bytes)?;
            Ok(Token::symbolic(
                opcode,
                SymbolRef {
                    scope: i32::from_be_bytes(scope_bytes),
                    index: i32::from_be_bytes(index_bytes),
                },
            ))
        } else if cat == CAT_EOL {
            let mut count_bytes = [0u8; 4];
            read_exact(stream, &mut count_bytes)?;
            Ok(Token::line_ending(u32::from_be_bytes(count_bytes)))
        } else {
            Ok(Token::generic(opcode))
        }
    }

    /// Rewinds `stream` by exactly this token's on-stream length. A
    /// stream-ending token is a no-op, since it was never read from the
    /// stream in the first place.
    pub fn return_to<S: ByteStream + ?Sized>(&self, stream: &mut S) -> std::io::Result<()> {
        if self.is_stream_ending() {
            return Ok(());
        }
        stream.rewind_by(self.self_streaming_len())
    }
}
