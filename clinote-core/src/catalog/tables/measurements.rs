//! "Label Value [unit]" runs in vitals and lab sections

use super::compile;
use crate::catalog::config::MeasurementConfig;
use crate::catalog::rule::{Rule, RuleAction, RuleCategory, SplitKind};
use crate::domain::buffer::Lines;
use crate::domain::section::SectionType;
use crate::error::Result;
use regex::Regex;

/// Compiled measurement matchers
#[derive(Debug, Clone)]
pub struct MeasurementTable {
    min_pairs: usize,
    label: Regex,
    value: Regex,
    units: Vec<String>,
    /// Known multi-word labels, lower-cased, most words first
    phrases: Vec<Vec<String>>,
    rules: Vec<Rule>,
}

impl MeasurementTable {
    pub(crate) fn from_config(config: &MeasurementConfig) -> Result<Self> {
        let label = compile("measurements.label", &config.label_pattern)?;
        let value = compile("measurements.value", &config.value_pattern)?;

        let mut phrases: Vec<Vec<String>> = config
            .labels
            .iter()
            .map(|label| label.split_whitespace().map(str::to_lowercase).collect())
            .collect();
        phrases.sort_by_key(|words: &Vec<String>| std::cmp::Reverse(words.len()));

        let rules = [
            ("measurements.vitals", RuleCategory::Vitals),
            ("measurements.labs", RuleCategory::LabValue),
        ]
        .into_iter()
        .map(|(id, category)| {
            Rule::new(
                id,
                category,
                value.clone(),
                category.default_priority(),
                RuleAction::Split(SplitKind::MeasurementPairs),
            )
        })
        .collect();

        Ok(Self {
            min_pairs: config.min_pairs,
            label,
            value,
            units: config.units.clone(),
            phrases,
            rules,
        })
    }

    pub fn min_pairs(&self) -> usize {
        self.min_pairs
    }

    /// Vitals and lab-value rules
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Rule applied for a measurement section
    pub fn rule_for(&self, section: SectionType) -> Option<&Rule> {
        match section {
            SectionType::Vitals => self.rules.first(),
            SectionType::Labs => self.rules.get(1),
            _ => None,
        }
    }

    /// Split every run of `min_pairs` or more pairs into one pair per line
    ///
    /// Text before, between and after runs keeps a line of its own. Returns
    /// `None` when the line holds no qualifying run.
    pub fn split_runs(&self, line: &str) -> Option<Lines> {
        let tokens = tokens(line);
        let mut runs: Vec<Vec<(usize, usize)>> = Vec::new();

        let mut i = 0;
        while i < tokens.len() {
            let mut pairs = Vec::new();
            let mut j = i;
            while let Some(next) = self.pair_at(&tokens, j) {
                pairs.push((j, next));
                j = next;
            }
            if pairs.len() >= self.min_pairs {
                runs.push(pairs);
                i = j;
            } else {
                i += 1;
            }
        }

        if runs.is_empty() {
            return None;
        }

        let span = |first: usize, last: usize| {
            let (start, _) = tokens[first];
            let (end_start, end_token) = tokens[last];
            (start, end_start + end_token.len())
        };

        let mut lines = Lines::new();
        let mut cursor = 0;
        for run in runs {
            for (first, next) in run {
                let (start, end) = span(first, next - 1);
                push_trimmed(&mut lines, &line[cursor..start]);
                lines.push(line[start..end].to_string());
                cursor = end;
            }
        }
        push_trimmed(&mut lines, &line[cursor..]);
        Some(lines)
    }

    /// Token index after the pair starting at `i`
    fn pair_at(&self, tokens: &[(usize, &str)], i: usize) -> Option<usize> {
        let value_index = i + self.label_len(tokens, i)?;
        let (_, value) = tokens.get(value_index)?;
        if !self.value.is_match(value) {
            return None;
        }
        let mut next = value_index + 1;
        if tokens.get(next).is_some_and(|(_, unit)| self.is_unit(unit)) {
            next += 1;
        }
        Some(next)
    }

    fn label_len(&self, tokens: &[(usize, &str)], i: usize) -> Option<usize> {
        for words in &self.phrases {
            let Some(candidate) = tokens.get(i..i + words.len()) else {
                continue;
            };
            let matches = candidate.iter().zip(words).all(|((_, token), word)| {
                token.trim_end_matches(':').eq_ignore_ascii_case(word)
            });
            if matches {
                return Some(words.len());
            }
        }
        let (_, token) = tokens.get(i)?;
        (self.label.is_match(token) && !self.value.is_match(token)).then_some(1)
    }

    fn is_unit(&self, token: &str) -> bool {
        let token = token.trim_end_matches(|c: char| c == ',' || c == ';');
        self.units.iter().any(|unit| {
            unit == token || (unit.len() > 2 && unit.eq_ignore_ascii_case(token))
        })
    }
}

fn tokens(line: &str) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut start = None;
    for (i, ch) in line.char_indices() {
        if ch.is_whitespace() {
            if let Some(s) = start.take() {
                out.push((s, &line[s..i]));
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        out.push((s, &line[s..]));
    }
    out
}

fn push_trimmed(lines: &mut Lines, text: &str) {
    let text = text.trim();
    if !text.is_empty() {
        lines.push(text.to_string());
    }
}
