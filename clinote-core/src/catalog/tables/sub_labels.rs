//! Sub-labels inside examination, review-of-systems and mental status sections

use super::{compile, phrase_pattern};
use crate::catalog::config::SubLabelGroup;
use crate::catalog::rule::{Rule, RuleAction, SplitKind};
use crate::domain::section::SectionType;
use crate::error::Result;
use regex::Regex;
use std::collections::HashMap;

/// Per-section sub-label matchers
///
/// Labels always need a colon and match case-insensitively, longest first.
#[derive(Debug, Clone)]
pub struct SubLabelTable {
    by_section: HashMap<SectionType, (String, Regex)>,
    rules: Vec<Rule>,
}

impl SubLabelTable {
    pub(crate) fn from_config(groups: &[SubLabelGroup]) -> Result<Self> {
        let mut labels: HashMap<SectionType, Vec<&str>> = HashMap::new();
        let mut owners: HashMap<SectionType, Vec<&str>> = HashMap::new();
        let mut rules = Vec::with_capacity(groups.len());

        for group in groups {
            let rule_id = format!("sub_label.{}", group.id);
            let matcher = compile(&rule_id, &label_pattern(group.labels.iter().map(String::as_str)))?;
            rules.push(Rule::new(
                rule_id,
                group.category,
                matcher,
                group
                    .priority
                    .unwrap_or_else(|| group.category.default_priority()),
                RuleAction::Split(SplitKind::SubLabels),
            ));
            for section in &group.sections {
                labels
                    .entry(*section)
                    .or_default()
                    .extend(group.labels.iter().map(String::as_str));
                owners.entry(*section).or_default().push(&group.id);
            }
        }

        let mut by_section = HashMap::with_capacity(labels.len());
        for (section, section_labels) in labels {
            let rule_id = format!("sub_label.{}", owners[&section].join("+"));
            let matcher = compile(&rule_id, &label_pattern(section_labels.into_iter()))?;
            by_section.insert(section, (rule_id, matcher));
        }

        Ok(Self { by_section, rules })
    }

    /// One rule per label group
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Matcher for a section's labels with the ids of the groups behind it
    pub fn for_section(&self, section: SectionType) -> Option<(&str, &Regex)> {
        self.by_section
            .get(&section)
            .map(|(id, matcher)| (id.as_str(), matcher))
    }

    /// Byte offsets where a sub-label starts in `text`
    pub fn split_points(&self, section: SectionType, text: &str) -> Vec<usize> {
        match self.by_section.get(&section) {
            Some((_, matcher)) => matcher.find_iter(text).map(|m| m.start()).collect(),
            None => Vec::new(),
        }
    }
}

fn label_pattern<'a>(labels: impl Iterator<Item = &'a str>) -> String {
    let mut labels: Vec<&str> = labels.collect();
    labels.sort_by_key(|label| std::cmp::Reverse(label.chars().count()));
    let body = labels
        .into_iter()
        .map(phrase_pattern)
        .collect::<Vec<_>>()
        .join("|");
    format!(r"(?i)\b(?:{body})[ \t]*:")
}
