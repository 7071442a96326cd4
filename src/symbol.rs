//! Symbols: the declarations a parser binds into scope while parsing, and
//! later recalls by reference while replaying an intermediate-code stream.
//!
//! A symbol built while parsing source and a symbol recalled from a
//! stream carry the same fields; they differ only in how their parent
//! (the symbol whose scope they were declared inside) is referenced —
//! directly, while both are in memory together, or by `SymbolRef`, once
//! only the stream's record of the relationship survives.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::token::SymbolRef;

/// A scope's identity: its index into a `SymbolTableVector` /
/// `SymbolVectorVector`. Scope `0` is always the global scope.
pub type ScopeId = i32;

pub const GLOBAL_SCOPE: ScopeId = 0;
pub const NO_SCOPE: ScopeId = -1;

/// Coarse classification of what a symbol names. The high bit marks a
/// symbol declared outside the source under parse (an externally-linked
/// declaration), orthogonal to the category itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolCategory(pub u32);

impl SymbolCategory {
    pub const UNDEFINED: SymbolCategory = SymbolCategory(0);
    pub const TYPE: SymbolCategory = SymbolCategory(1);
    pub const LITERAL: SymbolCategory = SymbolCategory(2);
    pub const VARIABLE: SymbolCategory = SymbolCategory(3);
    pub const SUBROUTINE: SymbolCategory = SymbolCategory(4);
    pub const STRUCTURE_MEMBER: SymbolCategory = SymbolCategory(5);
    pub const PARAMETER: SymbolCategory = SymbolCategory(6);

    /// User-defined categories start here.
    pub const USER_BASE: u32 = 0x0000_0100;

    const EXTERNAL_BIT: u32 = 0x8000_0000;

    pub fn external(self) -> SymbolCategory {
        SymbolCategory(self.0 | Self::EXTERNAL_BIT)
    }

    pub fn is_external(self) -> bool {
        self.0 & Self::EXTERNAL_BIT != 0
    }

    pub fn base(self) -> u32 {
        self.0 & !Self::EXTERNAL_BIT
    }
}

/// How a symbol's parent (the enclosing declaration its scope nests
/// under, if any) is referenced.
#[derive(Debug, Clone)]
pub enum Parent {
    /// No parent — this symbol's scope is not nested under another
    /// symbol's declaration.
    None,
    /// A direct, in-memory link to the parent, valid only while both
    /// symbols are part of the same live parse. Weak so a symbol table
    /// does not need its entries to form a reference cycle with their
    /// parents to stay alive.
    Direct(Weak<RefCell<Symbol>>),
    /// A link recovered from an intermediate-code stream, where only the
    /// parent's scope/index survives.
    Recalled(SymbolRef),
}

/// Where a symbol came from, kept for error reporting.
#[derive(Debug, Clone)]
pub enum Origin {
    FromSource { source_name: String, source_line: u32 },
    Recalled,
}

/// A declared name: its scope and index once placed, its category, its
/// parent link, and where it was declared.
#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: String,
    pub scope: ScopeId,
    pub index: i32,
    pub category: SymbolCategory,
    pub parent: Parent,
    pub origin: Origin,
}

/// Shared ownership handle for a symbol while it is part of a live parse.
pub type SymbolHandle = Rc<RefCell<Symbol>>;

impl Symbol {
    /// Constructs a symbol declared while parsing source, not yet placed
    /// into any scope (`scope`/`index` are filled in by
    /// `SymbolTableVector::enter`).
    pub fn from_source(
        name: impl Into<String>,
        category: SymbolCategory,
        source_name: impl Into<String>,
        source_line: u32,
    ) -> Self {
        Self {
            name: name.into(),
            scope: NO_SCOPE,
            index: -1,
            category,
            parent: Parent::None,
            origin: Origin::FromSource {
                source_name: source_name.into(),
                source_line,
            },
        }
    }

    /// Constructs a symbol recovered from an intermediate-code stream,
    /// already placed at `scope`/`index`.
    pub fn recalled(name: impl Into<String>, category: SymbolCategory, scope: ScopeId, index: i32) -> Self {
        Self {
            name: name.into(),
            scope,
            index,
            category,
            parent: Parent::None,
            origin: Origin::Recalled,
        }
    }

    /// This symbol's stable reference, usable once it has been placed.
    pub fn reference(&self) -> SymbolRef {
        SymbolRef {
            scope: self.scope,
            index: self.index,
        }
    }

    pub fn is_placed(&self) -> bool {
        self.scope != NO_SCOPE && self.index >= 0
    }

    /// The line this symbol was declared on, for error messages. `0` for
    /// a recalled symbol, which carries no source position.
    pub fn source_line(&self) -> u32 {
        match &self.origin {
            Origin::FromSource { source_line, .. } => *source_line,
            Origin::Recalled => 0,
        }
    }

    pub fn source_name(&self) -> &str {
        match &self.origin {
            Origin::FromSource { source_name, .. } => source_name,
            Origin::Recalled => "<recalled>",
        }
    }

    /// `true` if `other` is reachable by walking `self`'s parent chain —
    /// the rule that decides whether a value of `self`'s type may be
    /// assigned to a variable declared with `other`'s type. Directional:
    /// only `self`'s chain is walked outward, `other` is only ever
    /// compared against. A symmetric walk that also advanced `other`'s
    /// chain and accepted any point where the two met would conflate
    /// "shares an ancestor with" and "is assignable to" — a sibling type
    /// reached through a common base is not an upcast target.
    ///
    /// Each ancestor is matched against `other` by identity if both are
    /// live (`Direct`), or by placed reference if the chain has been
    /// partly recovered from a stream (`Recalled`) — the two parent
    /// representations are mutually exclusive per node, not per chain,
    /// so a chain can cross from one to the other partway up.
    pub fn can_assign_from(self_handle: &SymbolHandle, other: &SymbolHandle) -> bool {
        let other_ref = other.borrow().reference();
        let other_is_placed = other.borrow().is_placed();
        let mut cursor = self_handle.clone();
        loop {
            if Rc::ptr_eq(&cursor, other) {
                return true;
            }
            let next = match &cursor.borrow().parent {
                Parent::Direct(weak) => weak.upgrade(),
                Parent::Recalled(symbol_ref) => {
                    if other_is_placed && *symbol_ref == other_ref {
                        return true;
                    }
                    None
                }
                Parent::None => None,
            };
            match next {
                Some(parent) => cursor = parent,
                None => return false,
            }
        }
    }
}
