//! Loading, validating and swapping pattern catalogs

use std::fs;
use std::sync::Arc;

use clinote_core::catalog::BUILTIN_CATALOG;
use clinote_core::{Error, FormatterConfig, NoteFormatter, PatternCatalog, RuleCategory};
use tempfile::TempDir;

const MINIMAL: &str = r#"
[metadata]
name = "minimal"
version = "0.1"

[[word_splits]]
parts = ["schizo", "phrenia"]

[[headers]]
id = "plan"
section = "plan"
patterns = ["Plan"]

[[headers]]
id = "meds"
section = "medications"
patterns = ["Meds"]

[lists]
id = "tilde_bullets"
delimiter = '^[ \t]*~[ \t]*|[ \t]*~(?:[ \t]+|$)'
bullet = "* "

[measurements]
min_pairs = 2
label_pattern = '^[A-Z][A-Za-z]*:?$'
value_pattern = '^\d+(?:\.\d+)?$'

[[whitespace]]
id = "interior_gaps"
pattern = '[ \t]{2,}'
replacement = " "

[[whitespace]]
id = "trailing_whitespace"
pattern = '[ \t]+$'
replacement = ""

[[whitespace]]
id = "blank_line_runs"
pattern = '\n{3,}'
replacement = "\n\n"
"#;

#[test]
fn test_reduced_catalog_drives_the_engine() {
    let catalog = Arc::new(PatternCatalog::from_toml_str(MINIMAL).unwrap());
    assert_eq!(catalog.name(), "minimal");
    assert_eq!(catalog.rules(Some(RuleCategory::WordSplitFix)).len(), 1);

    let formatter = NoteFormatter::with_catalog(catalog, FormatterConfig::default()).unwrap();
    assert_eq!(
        formatter.format("Meds: ~ olanzapine ~ lithium"),
        "Meds:\n* olanzapine\n* lithium"
    );
    // headers missing from this catalog are plain text
    assert_eq!(
        formatter.format("Medications: ~ olanzapine"),
        "Medications: ~ olanzapine"
    );
    assert_eq!(formatter.format("hx of schizo phrenia"), "hx of schizophrenia");
}

#[test]
fn test_catalog_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("catalog.toml");
    fs::write(&path, BUILTIN_CATALOG).unwrap();

    let formatter = NoteFormatter::builder().catalog_file(&path).build().unwrap();
    assert_eq!(formatter.catalog().name(), "clinical-notes");
}

#[test]
fn test_malformed_pattern_is_fatal() {
    let broken = MINIMAL.replace(r"'[ \t]+$'", "'[ \\t+$'");
    match PatternCatalog::from_toml_str(&broken) {
        Err(Error::InvalidPattern { rule_id, .. }) => {
            assert_eq!(rule_id, "whitespace.trailing_whitespace")
        }
        other => panic!("expected InvalidPattern, got {other:?}"),
    }
}

#[test]
fn test_duplicate_rule_ids_rejected() {
    let duplicated = MINIMAL.replace(r#"id = "meds""#, r#"id = "plan""#);
    let err = PatternCatalog::from_toml_str(&duplicated).unwrap_err();
    assert!(matches!(err, Error::InvalidCatalog(_)));
    assert!(err.to_string().contains("header.plan"));
}

#[test]
fn test_unknown_section_is_a_parse_error() {
    let unknown = MINIMAL.replace(r#"section = "plan""#, r#"section = "billing""#);
    assert!(matches!(
        PatternCatalog::from_toml_str(&unknown),
        Err(Error::CatalogParse(_))
    ));
}

#[test]
fn test_builtin_catalog_size() {
    let catalog = PatternCatalog::builtin().unwrap();
    assert!(catalog.headers().pattern_count() >= 90);
    assert!(catalog.word_splits().len() >= 40);
    assert!(catalog.len() > 100);
}
