//! Adds syntax-rule-id-based skipping and the `parse_until` driving loop
//! on top of the base [`Parser`], resolving rule ids against the
//! parser's own `LanguageDefinition` instead of requiring the caller to
//! hold a `SyntaxRule` directly.

use crate::error::{Error, FatalError};
use crate::opcode::OPCODE_EOS;
use crate::rule::RuleId;
use crate::scanner::Scanner;

use super::Parser;

impl<Sc: Scanner> Parser<Sc> {
    /// Reports a syntax error and skips to the next token matching the
    /// syntax rule `rule_id` names, or does nothing if `rule_id` is not
    /// defined in this parser's language.
    pub fn resync_to_rule(&mut self, rule_id: RuleId, message: impl Into<String>) {
        let Some(rule) = self.language.borrow().syntax_rule(rule_id).cloned() else {
            return;
        };
        self.resync_to(&rule, message);
    }

    pub fn skip_to_rule(&mut self, rule_id: RuleId, silence: bool) {
        let Some(rule) = self.language.borrow().syntax_rule(rule_id).cloned() else {
            return;
        };
        self.skip_to(&rule, silence);
    }

    pub fn skip_over_rule(&mut self, rule_id: RuleId, silence: bool) {
        let Some(rule) = self.language.borrow().syntax_rule(rule_id).cloned() else {
            return;
        };
        self.skip_over(&rule, silence);
    }

    /// Repeatedly invokes `parse_one` — the grammar's own per-item parse
    /// step — until the current token matches the syntax rule `rule_id`
    /// names. Returns the number of items that raised a (recoverable)
    /// error, or `-1` if `rule_id` names no rule in this parser's
    /// language, or propagates a fatal error immediately.
    ///
    /// Reaching end-of-stream before the terminating rule matches is
    /// fatal unless the rule itself includes the end-of-stream opcode —
    /// a grammar that wants `parse_until` to run to the end of its input
    /// should include `OPCODE_EOS` in the rule it passes.
    pub fn parse_until(
        &mut self,
        rule_id: RuleId,
        mut parse_one: impl FnMut(&mut Self) -> Result<(), Error>,
    ) -> Result<isize, Error> {
        let Some(rule) = self.language.borrow().syntax_rule(rule_id).cloned() else {
            return Ok(-1);
        };
        let mut error_count: isize = 0;
        loop {
            if rule.has(self.current().opcode) {
                return Ok(error_count);
            }
            if self.is_at_end() {
                if rule.has(OPCODE_EOS) {
                    return Ok(error_count);
                }
                let source_name = self.source_name().to_string();
                let line = self.line_number();
                let fatal: FatalError = self
                    .log()
                    .borrow_mut()
                    .fatal_error(format!("{source_name}:{line}: unexpected end of stream"));
                return Err(fatal.into());
            }
            match parse_one(self) {
                Ok(()) => {}
                Err(Error::Fatal(f)) => return Err(Error::Fatal(f)),
                Err(_) => error_count += 1,
            }
        }
    }
}
