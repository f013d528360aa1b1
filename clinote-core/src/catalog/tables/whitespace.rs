//! Whitespace normalization rules

use super::compile;
use crate::catalog::config::{WhitespaceRule, REQUIRED_WHITESPACE_RULES};
use crate::catalog::rule::{Rule, RuleAction, RuleCategory};
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct WhitespaceTable {
    rules: Vec<Rule>,
    interior_gaps: usize,
    trailing: usize,
    blank_lines: usize,
}

impl WhitespaceTable {
    pub(crate) fn from_config(whitespace: &[WhitespaceRule]) -> Result<Self> {
        let mut rules = Vec::with_capacity(whitespace.len());
        for entry in whitespace {
            let rule_id = format!("whitespace.{}", entry.id);
            let matcher = compile(&rule_id, &entry.pattern)?;
            rules.push(Rule::new(
                rule_id,
                RuleCategory::WhitespaceNormalize,
                matcher,
                RuleCategory::WhitespaceNormalize.default_priority(),
                RuleAction::Replace(entry.replacement.clone()),
            ));
        }

        let position = |name: &str| {
            whitespace
                .iter()
                .position(|entry| entry.id == name)
                .ok_or_else(|| Error::InvalidCatalog(format!("Missing whitespace rule '{name}'")))
        };
        let [interior_gaps, trailing, blank_lines] = REQUIRED_WHITESPACE_RULES;
        Ok(Self {
            interior_gaps: position(interior_gaps)?,
            trailing: position(trailing)?,
            blank_lines: position(blank_lines)?,
            rules,
        })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Runs of spaces or tabs inside a line
    pub fn interior_gaps(&self) -> &Rule {
        &self.rules[self.interior_gaps]
    }

    /// Spaces or tabs at the end of a line
    pub fn trailing(&self) -> &Rule {
        &self.rules[self.trailing]
    }

    /// Consecutive blank lines
    pub fn blank_lines(&self) -> &Rule {
        &self.rules[self.blank_lines]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(id: &str, pattern: &str, replacement: &str) -> WhitespaceRule {
        WhitespaceRule {
            id: id.to_string(),
            pattern: pattern.to_string(),
            replacement: replacement.to_string(),
        }
    }

    #[test]
    fn test_required_rules_resolve() {
        let table = WhitespaceTable::from_config(&[
            rule("interior_gaps", r"[ \t]{2,}", " "),
            rule("trailing_whitespace", r"[ \t]+$", ""),
            rule("blank_line_runs", r"\n{3,}", "\n\n"),
        ])
        .unwrap();
        assert_eq!(table.trailing().apply("Plan:   "), "Plan:");
        assert_eq!(table.blank_lines().apply("a\n\n\n\nb"), "a\n\nb");
        assert_eq!(table.interior_gaps().id(), "whitespace.interior_gaps");
    }

    #[test]
    fn test_missing_rule_is_an_error() {
        let err = WhitespaceTable::from_config(&[rule("interior_gaps", " +", " ")]).unwrap_err();
        assert!(matches!(err, Error::InvalidCatalog(_)));
    }
}
