//! A language definition: the opcode dictionary and syntax rules a source
//! scanner and a language-aware parser share.

use std::borrow::Cow;

use crate::opcode::{Opcode, OpcodeDict};
use crate::rule::{RuleId, RuleSet, SyntaxRule};

/// Whether keyword/operator lookups fold case before consulting the
/// opcode dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseFolding {
    /// Match spellings exactly as bound.
    Exact,
    /// Lowercase before lookup — bind keywords in lowercase too.
    Lowercase,
}

/// The complete description of a language's vocabulary: which spellings
/// map to which opcodes, and which opcode sets form named syntax rules.
#[derive(Debug)]
pub struct LanguageDefinition {
    dict: OpcodeDict,
    rules: RuleSet,
    case_folding: CaseFolding,
}

impl LanguageDefinition {
    pub fn new(case_folding: CaseFolding) -> Self {
        Self {
            dict: OpcodeDict::new(),
            rules: RuleSet::new(),
            case_folding,
        }
    }

    pub fn dict(&self) -> &OpcodeDict {
        &self.dict
    }

    pub fn dict_mut(&mut self) -> &mut OpcodeDict {
        &mut self.dict
    }

    pub fn rules_mut(&mut self) -> &mut RuleSet {
        &mut self.rules
    }

    pub fn syntax_rule(&self, id: RuleId) -> Option<&SyntaxRule> {
        self.rules.get(id)
    }

    /// Applies this language's case-folding policy to a raw spelling.
    pub fn fold<'a>(&self, raw: &'a str) -> Cow<'a, str> {
        match self.case_folding {
            CaseFolding::Exact => Cow::Borrowed(raw),
            CaseFolding::Lowercase => Cow::Owned(raw.to_lowercase()),
        }
    }

    /// Folds `raw` and looks it up in the opcode dictionary.
    pub fn lookup_opcode(&self, raw: &str) -> Opcode {
        self.dict.lookup(&self.fold(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcode::CAT_USER;

    #[test]
    fn lowercase_folding_matches_regardless_of_case() {
        let mut lang = LanguageDefinition::new(CaseFolding::Lowercase);
        lang.dict_mut().bind("if", CAT_USER | 1);
        assert_eq!(lang.lookup_opcode("IF"), CAT_USER | 1);
        assert_eq!(lang.lookup_opcode("If"), CAT_USER | 1);
    }

    #[test]
    fn exact_folding_is_case_sensitive() {
        let mut lang = LanguageDefinition::new(CaseFolding::Exact);
        lang.dict_mut().bind("if", CAT_USER | 1);
        assert_eq!(lang.lookup_opcode("IF"), 0);
        assert_eq!(lang.lookup_opcode("if"), CAT_USER | 1);
    }
}
