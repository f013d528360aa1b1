//! Dictionary of words broken in two by upstream export

use super::compile;
use crate::catalog::config::WordSplit;
use crate::catalog::rule::{Rule, RuleAction, RuleCategory};
use crate::error::Result;

/// Joins each half back together, keeping the casing of both halves
const JOIN_TEMPLATE: &str = "${1}${2}";

/// Whole-word split repair rules in declaration order
#[derive(Debug, Clone, Default)]
pub struct WordSplitTable {
    rules: Vec<Rule>,
}

impl WordSplitTable {
    pub(crate) fn from_config(splits: &[WordSplit]) -> Result<Self> {
        let rules = splits
            .iter()
            .map(|split| {
                let rule_id = split.rule_id();
                let pattern = format!(
                    r"(?i)\b({})[ \t]+({})\b",
                    regex::escape(&split.parts[0]),
                    regex::escape(&split.parts[1])
                );
                let matcher = compile(&rule_id, &pattern)?;
                Ok(Rule::new(
                    rule_id,
                    RuleCategory::WordSplitFix,
                    matcher,
                    split
                        .priority
                        .unwrap_or_else(|| RuleCategory::WordSplitFix.default_priority()),
                    RuleAction::Replace(JOIN_TEMPLATE.to_string()),
                ))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
