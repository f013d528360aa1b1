//! Section header vocabulary
//!
//! All header patterns are merged into one alternation ordered by descending
//! pattern length. Regex alternation is leftmost-first, so at any position the
//! longest header wins: "Mental Status Exam:" is never read as "Exam:".
//!
//! A header without a colon counts mid-line only after a sentence boundary,
//! so "changes in Mental Status and in Labs" stays one sentence.

use super::{compile, phrase_pattern};
use crate::catalog::config::{normalize_key, HeaderConfig};
use crate::catalog::rule::{Rule, RuleAction, RuleCategory, SplitKind};
use crate::domain::section::SectionType;
use crate::error::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// When a header needs a trailing colon to match
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColonPolicy {
    /// Case-insensitive, colon required
    #[default]
    Required,
    /// Also matches without a colon in the listed or upper-case spelling
    Optional,
}

/// Where the tokenizer and engine break before a header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitPolicy {
    /// Only inside dense lines
    #[default]
    Dense,
    /// Before every mid-line occurrence
    Always,
}

/// How a header is laid out relative to its content
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderLayout {
    /// Header alone on its line, content below
    #[default]
    Detached,
    /// Content stays on the header line
    Inline,
}

/// One compiled header vocabulary entry
#[derive(Debug, Clone)]
pub struct HeaderEntry {
    pub id: String,
    pub section: SectionType,
    pub category: RuleCategory,
    pub colon: ColonPolicy,
    pub split: SplitPolicy,
    pub layout: HeaderLayout,
    pub patterns: Vec<String>,
    pub priority: i32,
}

/// A header occurrence inside a line
#[derive(Debug, Clone, Copy)]
pub struct HeaderMatch<'c> {
    /// Vocabulary entry that matched
    pub entry: &'c HeaderEntry,
    /// Byte offset of the first header character
    pub start: usize,
    /// Byte offset just past the header words
    pub label_end: usize,
    /// Byte offset just past the header, including any colon
    pub end: usize,
}

impl HeaderMatch<'_> {
    /// Whether the occurrence carries a colon
    pub fn has_colon(&self) -> bool {
        self.end > self.label_end
    }
}

/// Two header patterns where one is a word prefix or suffix of the other
///
/// Such pairs are resolved by longest match; they are reported so a catalog
/// author can confirm the resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderConflict {
    pub shorter: String,
    pub shorter_id: String,
    pub longer: String,
    pub longer_id: String,
}

impl fmt::Display for HeaderConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' ({}) overlaps '{}' ({}); '{}' wins where both match",
            self.shorter, self.shorter_id, self.longer, self.longer_id, self.longer
        )
    }
}

/// Compiled header vocabulary
#[derive(Debug, Clone)]
pub struct HeaderTable {
    entries: Vec<HeaderEntry>,
    combined: Regex,
    lookup: HashMap<String, usize>,
    rules: Vec<Rule>,
}

impl HeaderTable {
    pub(crate) fn from_config(headers: &[HeaderConfig]) -> Result<Self> {
        let mut entries = Vec::with_capacity(headers.len());
        let mut lookup = HashMap::new();
        let mut arms: Vec<(usize, String)> = Vec::new();
        let mut rules = Vec::with_capacity(headers.len());

        for (index, header) in headers.iter().enumerate() {
            let rule_id = format!("header.{}", header.id);
            let mut own_arms: Vec<(usize, String)> = header
                .patterns
                .iter()
                .map(|pattern| {
                    (
                        pattern.chars().count(),
                        pattern_arm(pattern, header.colon),
                    )
                })
                .collect();
            for pattern in &header.patterns {
                lookup.insert(normalize_key(pattern), index);
            }
            arms.extend(own_arms.iter().cloned());

            own_arms.sort_by(|a, b| b.0.cmp(&a.0));
            let matcher = compile(&rule_id, &alternation(own_arms.into_iter()))?;
            let priority = header
                .priority
                .unwrap_or_else(|| header.category.default_priority());
            let kind = match header.split {
                SplitPolicy::Always => SplitKind::BreakBefore,
                SplitPolicy::Dense => SplitKind::DetachHeader,
            };
            rules.push(Rule::new(
                rule_id,
                header.category,
                matcher,
                priority,
                RuleAction::Split(kind),
            ));

            entries.push(HeaderEntry {
                id: header.id.clone(),
                section: header.section,
                category: header.category,
                colon: header.colon,
                split: header.split,
                layout: header.layout,
                patterns: header.patterns.clone(),
                priority,
            });
        }

        // stable: equal lengths keep declaration order
        arms.sort_by(|a, b| b.0.cmp(&a.0));
        let combined = compile("headers", &alternation(arms.into_iter()))?;

        Ok(Self {
            entries,
            combined,
            lookup,
            rules,
        })
    }

    /// Vocabulary entries in declaration order
    pub fn entries(&self) -> &[HeaderEntry] {
        &self.entries
    }

    /// Entry by id
    pub fn get(&self, id: &str) -> Option<&HeaderEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// One rule per entry
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Number of literal header patterns
    pub fn pattern_count(&self) -> usize {
        self.lookup.len()
    }

    /// Whether `text` contains any header
    pub fn is_match(&self, text: &str) -> bool {
        !self.find_all(text).is_empty()
    }

    /// Every non-overlapping header occurrence, left to right
    pub fn find_all(&self, text: &str) -> Vec<HeaderMatch<'_>> {
        let floor = content_start(text);
        self.combined
            .find_iter(text)
            .filter_map(|m| self.resolve(m))
            .filter(|found| {
                found.has_colon() || found.start <= floor || after_boundary(&text[..found.start])
            })
            .collect()
    }

    /// Header at the start of `line`, after indentation and an optional bullet
    pub fn leading(&self, line: &str) -> Option<HeaderMatch<'_>> {
        let offset = content_start(line);
        let m = self.combined.find_at(line, offset)?;
        if m.start() != offset {
            return None;
        }
        self.resolve(m)
    }

    /// Word-prefix and word-suffix overlaps between header patterns
    pub fn conflicts(&self) -> Vec<HeaderConflict> {
        let patterns: Vec<(&HeaderEntry, &String, Vec<String>)> = self
            .entries
            .iter()
            .flat_map(|entry| {
                entry.patterns.iter().map(move |pattern| {
                    let words = normalize_key(pattern)
                        .split(' ')
                        .map(str::to_string)
                        .collect();
                    (entry, pattern, words)
                })
            })
            .collect();

        let mut conflicts = Vec::new();
        for (short_entry, short, short_words) in &patterns {
            for (long_entry, long, long_words) in &patterns {
                if short_words.len() >= long_words.len() {
                    continue;
                }
                if long_words.starts_with(short_words) || long_words.ends_with(short_words) {
                    conflicts.push(HeaderConflict {
                        shorter: (*short).clone(),
                        shorter_id: short_entry.id.clone(),
                        longer: (*long).clone(),
                        longer_id: long_entry.id.clone(),
                    });
                }
            }
        }
        conflicts
    }

    fn resolve<'c>(&'c self, m: regex::Match<'_>) -> Option<HeaderMatch<'c>> {
        let text = m.as_str();
        let label = text.strip_suffix(':').map_or(text, str::trim_end);
        let index = *self.lookup.get(&normalize_key(label))?;
        Some(HeaderMatch {
            entry: &self.entries[index],
            start: m.start(),
            label_end: m.start() + label.len(),
            end: m.end(),
        })
    }
}

/// Whether `prefix` ends in a sentence break or a field-separator gap
fn after_boundary(prefix: &str) -> bool {
    let before_gap = prefix.trim_end_matches([' ', '\t']);
    prefix.len() - before_gap.len() >= 2 || before_gap.ends_with(['.', ';'])
}

/// Byte offset of the first character after indentation and a bullet marker
pub(crate) fn content_start(line: &str) -> usize {
    let trimmed = line.trim_start();
    let indent = line.len() - trimmed.len();
    for bullet in ["-", "*", "\u{2022}"] {
        if let Some(rest) = trimmed.strip_prefix(bullet) {
            let body = rest.trim_start();
            if body.len() < rest.len() {
                return line.len() - body.len();
            }
        }
    }
    indent
}

fn pattern_arm(pattern: &str, colon: ColonPolicy) -> String {
    let phrase = phrase_pattern(pattern);
    let with_colon = format!(r"(?i:{phrase})[ \t]*:");
    match colon {
        ColonPolicy::Required => with_colon,
        ColonPolicy::Optional => {
            let upper = phrase_pattern(&pattern.to_uppercase());
            if upper == phrase {
                format!(r"{with_colon}|{phrase}\b")
            } else {
                format!(r"{with_colon}|(?:{phrase}|{upper})\b")
            }
        }
    }
}

fn alternation(arms: impl Iterator<Item = (usize, String)>) -> String {
    let body = arms
        .map(|(_, arm)| format!("(?:{arm})"))
        .collect::<Vec<_>>()
        .join("|");
    format!(r"\b(?:{body})")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(id: &str, section: SectionType, patterns: &[&str], colon: ColonPolicy) -> HeaderConfig {
        HeaderConfig {
            id: id.to_string(),
            section,
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
            colon,
            split: SplitPolicy::Dense,
            layout: HeaderLayout::Detached,
            category: RuleCategory::SectionHeader,
            priority: None,
        }
    }

    fn table() -> HeaderTable {
        HeaderTable::from_config(&[
            header("exam", SectionType::PhysicalExam, &["Exam"], ColonPolicy::Required),
            header(
                "mse",
                SectionType::MentalStatusExam,
                &["Mental Status", "Mental Status Exam"],
                ColonPolicy::Optional,
            ),
            header("labs", SectionType::Labs, &["Labs"], ColonPolicy::Optional),
        ])
        .unwrap()
    }

    #[test]
    fn test_longest_header_wins() {
        let table = table();
        let found = table.find_all("Mental Status Exam: calm");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].entry.id, "mse");
        assert_eq!(found[0].end, "Mental Status Exam:".len());
        assert!(found[0].has_colon());
    }

    #[test]
    fn test_required_colon() {
        let table = table();
        assert!(table.find_all("the exam was normal").is_empty());
        assert_eq!(table.find_all("EXAM: normal").len(), 1);
    }

    #[test]
    fn test_optional_colon_respects_casing() {
        let table = table();
        assert_eq!(table.find_all("Labs reviewed").len(), 1);
        assert_eq!(table.find_all("LABS reviewed").len(), 1);
        assert!(table.find_all("labs reviewed").is_empty());
        assert_eq!(table.find_all("labs: reviewed").len(), 1);
    }

    #[test]
    fn test_colonless_header_mid_sentence_is_ignored() {
        let table = table();
        let text = "worse with changes in Mental Status and in Labs noted by family";
        assert!(table.find_all(text).is_empty());
        assert!(!table.is_match(text));
    }

    #[test]
    fn test_colonless_header_after_boundary() {
        let table = table();
        let found = table.find_all("Seen today. Labs reviewed; Mental Status calm");
        assert_eq!(
            found.iter().map(|f| f.entry.id.as_str()).collect::<Vec<_>>(),
            ["labs", "mse"]
        );

        let gap = table.find_all("BP stable  LABS pending");
        assert_eq!(gap.len(), 1);
        assert_eq!(gap[0].entry.id, "labs");
        assert_eq!(table.find_all("in labs: Na 140").len(), 1);
    }

    #[test]
    fn test_no_match_inside_words() {
        let table = table();
        assert!(table.find_all("Collabs: x").is_empty());
    }

    #[test]
    fn test_label_end_excludes_colon() {
        let table = table();
        let found = table.leading("Labs :  Na 140").unwrap();
        assert_eq!(&"Labs :  Na 140"[found.start..found.label_end], "Labs");
        assert_eq!(found.end, "Labs :".len());
    }

    #[test]
    fn test_leading_skips_bullet() {
        let table = table();
        assert!(table.leading("  - Exam: normal").is_some());
        assert!(table.leading("See Exam: normal").is_none());
    }

    #[test]
    fn test_conflicts_are_reported() {
        let conflicts = table().conflicts();
        assert!(conflicts
            .iter()
            .any(|c| c.shorter == "Mental Status" && c.longer == "Mental Status Exam"));
    }

    #[test]
    fn test_content_start() {
        assert_eq!(content_start("  * Plan: x"), 4);
        assert_eq!(content_start("-5 mg"), 0);
        assert_eq!(content_start("\tPlan"), 1);
    }
}
