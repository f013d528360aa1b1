//! Compiled pattern catalog
//!
//! Bridges the TOML schema and the engine: every table is compiled here, and
//! the full rule list is kept sorted for inspection and ordered application.

use std::path::Path;
use std::sync::Arc;

use log::debug;

use crate::catalog::{
    config::CatalogConfig,
    loader,
    rule::{Rule, RuleCategory},
    tables::*,
};
use crate::domain::section::SectionType;
use crate::error::{Error, Result};

/// Immutable set of rewrite rules and the lookup tables derived from them
#[derive(Debug, Clone)]
pub struct PatternCatalog {
    name: String,
    version: String,
    description: String,

    word_splits: WordSplitTable,
    headers: HeaderTable,
    sub_labels: SubLabelTable,
    lists: ListTable,
    measurements: MeasurementTable,
    whitespace: WhitespaceTable,

    /// All rules, ascending priority, ties in declaration order
    ordered: Vec<Rule>,
    conflicts: Vec<HeaderConflict>,
}

impl PatternCatalog {
    /// Validate and compile a parsed catalog
    ///
    /// Any pattern that fails to compile rejects the whole catalog.
    pub fn from_config(config: &CatalogConfig) -> Result<Self> {
        config.validate().map_err(Error::InvalidCatalog)?;

        let word_splits = WordSplitTable::from_config(&config.word_splits)?;
        let headers = HeaderTable::from_config(&config.headers)?;
        let sub_labels = SubLabelTable::from_config(&config.sub_labels)?;
        let lists = ListTable::from_config(&config.lists, &config.list_contexts)?;
        let measurements = MeasurementTable::from_config(&config.measurements)?;
        let whitespace = WhitespaceTable::from_config(&config.whitespace)?;

        let mut ordered: Vec<Rule> = word_splits
            .rules()
            .iter()
            .chain(headers.rules())
            .chain(sub_labels.rules())
            .chain(std::iter::once(lists.rule()))
            .chain(measurements.rules())
            .chain(whitespace.rules())
            .cloned()
            .collect();
        ordered.sort_by_key(Rule::priority);

        let conflicts = headers.conflicts();
        for conflict in &conflicts {
            debug!("header overlap: {conflict}");
        }
        debug!(
            "compiled catalog '{}' v{}: {} rules, {} header patterns, {} overlaps",
            config.metadata.name,
            config.metadata.version,
            ordered.len(),
            headers.pattern_count(),
            conflicts.len()
        );

        Ok(Self {
            name: config.metadata.name.clone(),
            version: config.metadata.version.clone(),
            description: config.metadata.description.clone(),
            word_splits,
            headers,
            sub_labels,
            lists,
            measurements,
            whitespace,
            ordered,
            conflicts,
        })
    }

    /// Shared handle to the embedded catalog
    pub fn builtin() -> Result<Arc<Self>> {
        loader::builtin()
    }

    /// Parse and compile catalog TOML
    pub fn from_toml_str(source: &str) -> Result<Self> {
        loader::load_str(source)
    }

    /// Read, parse and compile a catalog file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        loader::load_file(path.as_ref())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Rules in application order, optionally restricted to one category
    pub fn rules(&self, category: Option<RuleCategory>) -> Vec<&Rule> {
        self.ordered
            .iter()
            .filter(|rule| category.map_or(true, |c| rule.category() == c))
            .collect()
    }

    /// Rule by id
    pub fn rule(&self, id: &str) -> Option<&Rule> {
        self.ordered.iter().find(|rule| rule.id() == id)
    }

    /// Total number of rules
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn word_splits(&self) -> &WordSplitTable {
        &self.word_splits
    }

    pub fn headers(&self) -> &HeaderTable {
        &self.headers
    }

    pub fn sub_labels(&self) -> &SubLabelTable {
        &self.sub_labels
    }

    pub fn lists(&self) -> &ListTable {
        &self.lists
    }

    pub fn measurements(&self) -> &MeasurementTable {
        &self.measurements
    }

    pub fn whitespace(&self) -> &WhitespaceTable {
        &self.whitespace
    }

    /// Header pattern pairs resolved by longest match
    pub fn header_conflicts(&self) -> &[HeaderConflict] {
        &self.conflicts
    }

    /// Sections that at least one header introduces
    pub fn sections(&self) -> Vec<SectionType> {
        let mut sections: Vec<SectionType> = self
            .headers
            .entries()
            .iter()
            .map(|entry| entry.section)
            .collect();
        sections.sort();
        sections.dedup();
        sections
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::rule::RuleAction;

    fn catalog() -> Arc<PatternCatalog> {
        PatternCatalog::builtin().unwrap()
    }

    #[test]
    fn test_builtin_metadata() {
        let catalog = catalog();
        assert_eq!(catalog.name(), "clinical-notes");
        assert_eq!(catalog.version(), "1.0");
    }

    #[test]
    fn test_rules_sorted_by_priority() {
        let catalog = catalog();
        let priorities: Vec<i32> = catalog.rules(None).iter().map(|r| r.priority()).collect();
        assert!(priorities.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(catalog.rules(None).len(), catalog.len());
    }

    #[test]
    fn test_rules_by_category_keep_declaration_order() {
        let catalog = catalog();
        let splits = catalog.rules(Some(RuleCategory::WordSplitFix));
        assert_eq!(splits[0].id(), "word_split.cardio_vascular");
        assert_eq!(splits.len(), catalog.word_splits().len());
        assert!(splits
            .iter()
            .all(|rule| matches!(rule.action(), RuleAction::Replace(_))));
    }

    #[test]
    fn test_every_category_is_populated() {
        let catalog = catalog();
        for category in RuleCategory::ALL {
            assert!(
                !catalog.rules(Some(category)).is_empty(),
                "no rules for {category}"
            );
        }
    }

    #[test]
    fn test_axis_headers_are_listed() {
        let catalog = catalog();
        let axis: Vec<&str> = catalog
            .rules(Some(RuleCategory::AxisDiagnosis))
            .iter()
            .map(|rule| rule.id())
            .collect();
        assert_eq!(
            axis,
            [
                "header.axis_i",
                "header.axis_ii",
                "header.axis_iii",
                "header.axis_iv",
                "header.axis_v"
            ]
        );
    }

    #[test]
    fn test_known_overlaps_are_flagged() {
        let catalog = catalog();
        let conflicts = catalog.header_conflicts();
        assert!(conflicts
            .iter()
            .any(|c| c.shorter == "Exam" && c.longer == "Physical Exam"));
        assert!(conflicts
            .iter()
            .any(|c| c.shorter == "Mental Status" && c.longer == "Mental Status Exam"));
    }

    #[test]
    fn test_invalid_catalog_is_rejected() {
        let source = crate::catalog::BUILTIN_CATALOG.replace("name = \"clinical-notes\"", "name = \"\"");
        let err = PatternCatalog::from_toml_str(&source).unwrap_err();
        assert!(matches!(err, Error::InvalidCatalog(_)));
    }

    #[test]
    fn test_sections_cover_list_styles() {
        let sections = catalog().sections();
        assert!(sections.contains(&SectionType::Medications));
        assert!(sections.contains(&SectionType::Labs));
        assert!(!sections.contains(&SectionType::Plain));
    }
}
