//! Syntax rules: named sets of opcodes a parser driver tests the current
//! token against when deciding whether to keep skipping, stop skipping, or
//! give up and resynchronize.

use std::collections::{HashMap, HashSet};

use crate::opcode::Opcode;

/// Identifies a syntax rule within a `RuleSet`. Grammar authors define
/// their own numbering; this crate only reserves nothing.
pub type RuleId = u32;

/// An unordered set of opcodes membership is tested against.
#[derive(Debug, Clone, Default)]
pub struct SyntaxRule {
    opcodes: HashSet<Opcode>,
}

impl SyntaxRule {
    pub fn new(opcodes: impl IntoIterator<Item = Opcode>) -> Self {
        Self {
            opcodes: opcodes.into_iter().collect(),
        }
    }

    pub fn has(&self, opcode: Opcode) -> bool {
        self.opcodes.contains(&opcode)
    }

    pub fn len(&self) -> usize {
        self.opcodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.opcodes.is_empty()
    }
}

impl FromIterator<Opcode> for SyntaxRule {
    fn from_iter<T: IntoIterator<Item = Opcode>>(iter: T) -> Self {
        SyntaxRule::new(iter)
    }
}

/// A named collection of syntax rules, owned by a `LanguageDefinition`.
#[derive(Debug, Default)]
pub struct RuleSet {
    rules: HashMap<RuleId, SyntaxRule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: RuleId, rule: SyntaxRule) {
        self.rules.insert(id, rule);
    }

    pub fn get(&self, id: RuleId) -> Option<&SyntaxRule> {
        self.rules.get(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcode::{CAT_EOS, CAT_IDENTIFIER};

    #[test]
    fn syntax_rule_membership() {
        let rule = SyntaxRule::new([CAT_EOS, CAT_IDENTIFIER | 3]);
        assert!(rule.has(CAT_EOS));
        assert!(rule.has(CAT_IDENTIFIER | 3));
        assert!(!rule.has(CAT_IDENTIFIER | 4));
    }

    #[test]
    fn rule_set_lookup_by_id() {
        let mut rules = RuleSet::new();
        rules.insert(1, SyntaxRule::new([CAT_EOS]));
        assert!(rules.get(1).unwrap().has(CAT_EOS));
        assert!(rules.get(2).is_none());
    }
}
