//! List command implementation

use super::ListCommands;
use anyhow::{Context, Result};
use clinote_core::{PatternCatalog, RuleCategory};
use std::path::Path;
use std::sync::Arc;

/// Print catalog contents
pub fn execute(command: &ListCommands, catalog: Option<&Path>) -> Result<()> {
    let catalog = load(catalog)?;
    let listing = match command {
        ListCommands::Sections => sections(&catalog),
        ListCommands::Rules { category } => rules(&catalog, *category),
    };
    print!("{listing}");
    Ok(())
}

fn load(path: Option<&Path>) -> Result<Arc<PatternCatalog>> {
    match path {
        Some(path) => Ok(Arc::new(PatternCatalog::from_file(path).with_context(
            || format!("Failed to load catalog {}", path.display()),
        )?)),
        None => Ok(PatternCatalog::builtin()?),
    }
}

/// One line per section: name, block style, header patterns
fn sections(catalog: &PatternCatalog) -> String {
    let mut out = String::new();
    for section in catalog.sections() {
        let patterns: Vec<&str> = catalog
            .headers()
            .entries()
            .iter()
            .filter(|entry| entry.section == section)
            .flat_map(|entry| entry.patterns.iter().map(String::as_str))
            .collect();
        out.push_str(&format!(
            "{:<28} {:<13} {}\n",
            section.as_str(),
            section.block_style().to_string(),
            patterns.join(" | ")
        ));
    }
    out
}

/// One line per rule in application order
fn rules(catalog: &PatternCatalog, category: Option<RuleCategory>) -> String {
    let mut out = String::new();
    for rule in catalog.rules(category) {
        out.push_str(&format!(
            "{:>5}  {:<22} {}\n",
            rule.priority(),
            rule.category().as_str(),
            rule.id()
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_listing() {
        let catalog = PatternCatalog::builtin().unwrap();
        let listing = sections(&catalog);
        assert!(listing.contains("medications"));
        assert!(listing
            .lines()
            .any(|line| line.starts_with("medications") && line.contains(" list ")));
    }

    #[test]
    fn test_rules_filtered_by_category() {
        let catalog = PatternCatalog::builtin().unwrap();
        let listing = rules(&catalog, Some(RuleCategory::WordSplitFix));
        assert!(!listing.is_empty());
        assert!(listing.lines().all(|line| line.contains("word-split-fix")));
    }

    #[test]
    fn test_rules_in_priority_order() {
        let catalog = PatternCatalog::builtin().unwrap();
        let priorities: Vec<i32> = catalog.rules(None).iter().map(|r| r.priority()).collect();
        assert!(priorities.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(rules(&catalog, None).lines().count(), catalog.len());
    }

    #[test]
    fn test_missing_catalog_file() {
        assert!(load(Some(Path::new("/nonexistent/catalog.toml"))).is_err());
    }
}
