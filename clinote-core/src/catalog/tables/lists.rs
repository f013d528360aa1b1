//! Tilde-delimited lists and the keywords that mark orphan list lines

use super::compile;
use crate::catalog::config::{ListConfig, ListContext};
use crate::catalog::rule::{Rule, RuleAction, RuleCategory, SplitKind};
use crate::domain::buffer::Lines;
use crate::domain::section::SectionType;
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct ListTable {
    rule: Rule,
    bullet: String,
    contexts: Vec<(String, SectionType)>,
}

impl ListTable {
    pub(crate) fn from_config(list: &ListConfig, contexts: &[ListContext]) -> Result<Self> {
        let rule_id = format!("list.{}", list.id);
        let delimiter = compile(&rule_id, &list.delimiter)?;
        Ok(Self {
            rule: Rule::new(
                rule_id,
                RuleCategory::MedicationList,
                delimiter,
                RuleCategory::MedicationList.default_priority(),
                RuleAction::Split(SplitKind::TildeBullets),
            ),
            bullet: list.bullet.clone(),
            contexts: contexts
                .iter()
                .map(|context| (context.keyword.to_lowercase(), context.section))
                .collect(),
        })
    }

    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    pub fn bullet(&self) -> &str {
        &self.bullet
    }

    /// Whether the line opens with a list delimiter
    pub fn starts_with_delimiter(&self, line: &str) -> bool {
        self.rule
            .matcher()
            .find(line)
            .is_some_and(|m| m.start() == 0 && m.as_str().contains('~'))
    }

    /// List section suggested by a keyword in `line`
    pub fn context_section(&self, line: &str) -> Option<SectionType> {
        let lower = line.to_lowercase();
        self.contexts
            .iter()
            .find(|(keyword, _)| lower.contains(keyword.as_str()))
            .map(|(_, section)| *section)
    }

    /// Split a delimited line into bulleted items
    ///
    /// Text before the first delimiter keeps its own line. Items already
    /// carrying the bullet are not prefixed again. Returns `None` when the
    /// line has no delimiter.
    pub fn bulletize(&self, line: &str) -> Option<Lines> {
        let delimiter = self.rule.matcher();
        if !delimiter.is_match(line) {
            return None;
        }

        let mut lines = Lines::new();
        let mut pieces = delimiter.split(line);
        if let Some(prefix) = pieces.next() {
            let prefix = prefix.trim_end();
            if !prefix.trim_start().is_empty() {
                lines.push(prefix.to_string());
            }
        }
        for item in pieces {
            let item = item.trim();
            if item.is_empty() {
                continue;
            }
            if item.starts_with(&self.bullet) {
                lines.push(item.to_string());
            } else {
                lines.push(format!("{}{item}", self.bullet));
            }
        }
        Some(lines)
    }
}
