//! Catalog schema and validation
//!
//! This module defines the TOML schema for pattern catalogs.

use crate::catalog::rule::RuleCategory;
use crate::catalog::tables::{ColonPolicy, HeaderLayout, SplitPolicy};
use crate::domain::section::{BlockStyle, SectionType};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Root catalog document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub metadata: Metadata,
    #[serde(default)]
    pub word_splits: Vec<WordSplit>,
    #[serde(default)]
    pub headers: Vec<HeaderConfig>,
    #[serde(default)]
    pub sub_labels: Vec<SubLabelGroup>,
    pub lists: ListConfig,
    #[serde(default)]
    pub list_contexts: Vec<ListContext>,
    pub measurements: MeasurementConfig,
    #[serde(default)]
    pub whitespace: Vec<WhitespaceRule>,
}

/// Catalog metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub description: String,
}

/// A known word broken in two by upstream export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordSplit {
    pub parts: Vec<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub priority: Option<i32>,
}

impl WordSplit {
    /// Rule id, derived from the parts when not given
    pub fn rule_id(&self) -> String {
        match &self.id {
            Some(id) => id.clone(),
            None => format!("word_split.{}", self.parts.join("_").to_lowercase()),
        }
    }
}

/// Section header vocabulary entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderConfig {
    pub id: String,
    pub section: SectionType,
    pub patterns: Vec<String>,
    #[serde(default)]
    pub colon: ColonPolicy,
    #[serde(default)]
    pub split: SplitPolicy,
    #[serde(default)]
    pub layout: HeaderLayout,
    #[serde(default = "default_header_category")]
    pub category: RuleCategory,
    #[serde(default)]
    pub priority: Option<i32>,
}

/// Sub-labels that structure examination sections
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubLabelGroup {
    pub id: String,
    pub sections: Vec<SectionType>,
    pub labels: Vec<String>,
    #[serde(default = "default_sub_label_category")]
    pub category: RuleCategory,
    #[serde(default)]
    pub priority: Option<i32>,
}

/// Delimited list handling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListConfig {
    pub id: String,
    pub delimiter: String,
    #[serde(default = "default_bullet")]
    pub bullet: String,
}

/// Keyword on a previous line that tags an orphan list line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListContext {
    pub keyword: String,
    pub section: SectionType,
}

/// Lab value and vitals runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeasurementConfig {
    pub min_pairs: usize,
    pub label_pattern: String,
    pub value_pattern: String,
    #[serde(default)]
    pub units: Vec<String>,
    /// Multi-word labels such as "Heart Rate"
    #[serde(default)]
    pub labels: Vec<String>,
}

/// Whitespace normalization rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhitespaceRule {
    pub id: String,
    pub pattern: String,
    pub replacement: String,
}

fn default_header_category() -> RuleCategory {
    RuleCategory::SectionHeader
}

fn default_sub_label_category() -> RuleCategory {
    RuleCategory::DenseList
}

fn default_bullet() -> String {
    "- ".to_string()
}

/// Whitespace ids the engine relies on
pub(crate) const REQUIRED_WHITESPACE_RULES: [&str; 3] =
    ["interior_gaps", "trailing_whitespace", "blank_line_runs"];

impl CatalogConfig {
    /// Validate structure before any pattern is compiled
    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.metadata.name.trim().is_empty() {
            return Err("metadata.name must not be empty".to_string());
        }

        let mut ids = HashSet::new();
        let mut claim = |id: String| -> Result<(), String> {
            if ids.insert(id.clone()) {
                Ok(())
            } else {
                Err(format!("Duplicate rule id: {id}"))
            }
        };

        for split in &self.word_splits {
            if split.parts.len() != 2 {
                return Err(format!(
                    "Word split {:?} must have exactly two parts",
                    split.parts
                ));
            }
            if split
                .parts
                .iter()
                .any(|part| part.is_empty() || part.chars().any(char::is_whitespace))
            {
                return Err(format!(
                    "Word split {:?} has an empty or multi-word part",
                    split.parts
                ));
            }
            claim(split.rule_id())?;
        }

        let mut seen_patterns = HashSet::new();
        for header in &self.headers {
            claim(format!("header.{}", header.id))?;
            if !matches!(
                header.category,
                RuleCategory::SectionHeader
                    | RuleCategory::AxisDiagnosis
                    | RuleCategory::DischargeHeader
            ) {
                return Err(format!(
                    "Header '{}' has non-header category '{}'",
                    header.id, header.category
                ));
            }
            if header.section == SectionType::Plain {
                return Err(format!("Header '{}' cannot introduce plain text", header.id));
            }
            if header.patterns.is_empty() {
                return Err(format!("Header '{}' has no patterns", header.id));
            }
            for pattern in &header.patterns {
                let key = normalize_key(pattern);
                if key.is_empty() {
                    return Err(format!("Header '{}' has a blank pattern", header.id));
                }
                if !seen_patterns.insert(key) {
                    return Err(format!(
                        "Header pattern '{pattern}' is declared more than once"
                    ));
                }
            }
        }

        let mut seen_labels = HashSet::new();
        for group in &self.sub_labels {
            claim(format!("sub_label.{}", group.id))?;
            if !matches!(
                group.category,
                RuleCategory::DenseList | RuleCategory::MentalStatus
            ) {
                return Err(format!(
                    "Sub-label group '{}' has unsupported category '{}'",
                    group.id, group.category
                ));
            }
            if group.labels.is_empty() || group.sections.is_empty() {
                return Err(format!(
                    "Sub-label group '{}' needs labels and sections",
                    group.id
                ));
            }
            for section in &group.sections {
                if section.block_style() != BlockStyle::Examination {
                    return Err(format!(
                        "Sub-label group '{}' targets non-examination section '{section}'",
                        group.id
                    ));
                }
                for label in &group.labels {
                    if !seen_labels.insert((*section, normalize_key(label))) {
                        return Err(format!(
                            "Sub-label '{label}' is declared twice for section '{section}'"
                        ));
                    }
                }
            }
        }

        claim(format!("list.{}", self.lists.id))?;
        if self.lists.bullet.trim().is_empty() {
            return Err("lists.bullet must contain a marker".to_string());
        }

        for context in &self.list_contexts {
            if context.keyword.trim().is_empty() {
                return Err("list_contexts keyword must not be empty".to_string());
            }
            if context.section.block_style() != BlockStyle::List {
                return Err(format!(
                    "List context '{}' targets non-list section '{}'",
                    context.keyword, context.section
                ));
            }
        }

        if self.measurements.min_pairs == 0 {
            return Err("measurements.min_pairs must be greater than 0".to_string());
        }

        for rule in &self.whitespace {
            claim(format!("whitespace.{}", rule.id))?;
        }
        for required in REQUIRED_WHITESPACE_RULES {
            if !self.whitespace.iter().any(|rule| rule.id == required) {
                return Err(format!("Missing whitespace rule '{required}'"));
            }
        }

        Ok(())
    }
}

/// Lower-case key with single spaces, used to compare vocabulary entries
pub(crate) fn normalize_key(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::BUILTIN_CATALOG;

    fn builtin() -> CatalogConfig {
        toml::from_str(BUILTIN_CATALOG).unwrap()
    }

    #[test]
    fn test_builtin_catalog_validates() {
        assert!(builtin().validate().is_ok());
    }

    #[test]
    fn test_duplicate_header_pattern_rejected() {
        let mut config = builtin();
        config.headers[1].patterns.push("chief  complaint".to_string());
        let err = config.validate().unwrap_err();
        assert!(err.contains("declared more than once"));
    }

    #[test]
    fn test_three_part_word_split_rejected() {
        let mut config = builtin();
        config.word_splits.push(WordSplit {
            parts: vec!["a".into(), "b".into(), "c".into()],
            id: None,
            priority: None,
        });
        assert!(config.validate().unwrap_err().contains("exactly two parts"));
    }

    #[test]
    fn test_sub_labels_must_target_examination_sections() {
        let mut config = builtin();
        config.sub_labels[0].sections.push(SectionType::Labs);
        assert!(config
            .validate()
            .unwrap_err()
            .contains("non-examination section"));
    }

    #[test]
    fn test_missing_whitespace_rule_rejected() {
        let mut config = builtin();
        config.whitespace.retain(|rule| rule.id != "blank_line_runs");
        assert!(config.validate().unwrap_err().contains("blank_line_runs"));
    }

    #[test]
    fn test_zero_min_pairs_rejected() {
        let mut config = builtin();
        config.measurements.min_pairs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("  Physical\tExam "), "physical exam");
    }
}
