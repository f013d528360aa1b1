//! Stage 1: dictionary word-split repair

use crate::catalog::{PatternCatalog, RuleCategory};
use crate::domain::buffer::{Lines, WorkingBuffer};
use crate::domain::guard::guarded_text;
use log::trace;

/// Join known split words on every line, rules in catalog order
pub(crate) fn repair_split_words(
    catalog: &PatternCatalog,
    buffer: WorkingBuffer,
    skipped: &mut Vec<String>,
) -> WorkingBuffer {
    let rules = catalog.rules(Some(RuleCategory::WordSplitFix));
    buffer.flat_map_lines(|line| {
        let mut current = line.to_string();
        for rule in &rules {
            if !rule.matcher().is_match(&current) {
                continue;
            }
            trace!("applying {}", rule.id());
            current = guarded_text(rule.id(), &current, skipped, |text| {
                rule.apply(text).into_owned()
            });
        }
        let mut lines = Lines::new();
        lines.push(current);
        lines
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repair(text: &str) -> String {
        let catalog = PatternCatalog::builtin().unwrap();
        let mut skipped = Vec::new();
        let buffer = repair_split_words(&catalog, WorkingBuffer::from_text(text), &mut skipped);
        assert!(skipped.is_empty());
        buffer.to_text()
    }

    #[test]
    fn test_known_pairs_are_joined() {
        assert_eq!(
            repair("cardio vascular exam; neuro logical intact; hx of hyper tension"),
            "cardiovascular exam; neurological intact; hx of hypertension"
        );
    }

    #[test]
    fn test_drug_name_fragments() {
        assert_eq!(repair("car BAMazepine 200 mg"), "carBAMazepine 200 mg");
        assert_eq!(repair("tra ZODone 50 mg qhs"), "traZODone 50 mg qhs");
    }

    #[test]
    fn test_unlisted_pairs_are_left_alone() {
        assert_eq!(repair("blood pressure cuff"), "blood pressure cuff");
        assert_eq!(repair("hyper active"), "hyper active");
    }
}
