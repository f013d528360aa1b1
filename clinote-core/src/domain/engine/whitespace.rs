//! Stage 5: whitespace normalization

use crate::api::FormatterConfig;
use crate::catalog::{PatternCatalog, RuleAction};
use crate::domain::buffer::{Lines, WorkingBuffer};
use crate::domain::guard::guarded_text;
use crate::domain::section::SectionType;
use regex::Captures;

/// Trim line ends, collapse long interior gaps and runs of blank lines
///
/// Interior gaps are only collapsed on lines of a recognized section or on
/// lines longer than the dense threshold; short plain lines keep their
/// spacing. Leading indentation is never touched.
pub(crate) fn normalize_whitespace(
    catalog: &PatternCatalog,
    config: &FormatterConfig,
    buffer: WorkingBuffer,
    sections: &[SectionType],
    skipped: &mut Vec<String>,
) -> WorkingBuffer {
    let rules = catalog.whitespace();
    let gaps = rules.interior_gaps();
    let trailing = rules.trailing();
    let gap_replacement = match gaps.action() {
        RuleAction::Replace(replacement) => replacement.as_str(),
        RuleAction::Split(_) => " ",
    };

    let mut index = 0;
    let buffer = buffer.flat_map_lines(|line| {
        let section = sections.get(index).copied().unwrap_or(SectionType::Plain);
        index += 1;

        let mut current = guarded_text(trailing.id(), line, skipped, |text| {
            trailing.apply(text).into_owned()
        });

        let collapse = section.is_recognized()
            || current.chars().count() > config.dense_line_threshold;
        if collapse {
            current = guarded_text(gaps.id(), &current, skipped, |text| {
                let body_start = text.len() - text.trim_start().len();
                let (indent, body) = text.split_at(body_start);
                let body = gaps.matcher().replace_all(body, |caps: &Captures| {
                    let gap = &caps[0];
                    if gap.chars().count() >= config.collapse_run {
                        gap_replacement.to_string()
                    } else {
                        gap.to_string()
                    }
                });
                format!("{indent}{body}")
            });
        }

        let mut lines = Lines::new();
        lines.push(current);
        lines
    });

    let blank_lines = rules.blank_lines();
    let text = guarded_text(blank_lines.id(), &buffer.to_text(), skipped, |text| {
        blank_lines.apply(text).into_owned()
    });
    WorkingBuffer::from_text(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(text: &str, section: SectionType) -> String {
        let catalog = PatternCatalog::builtin().unwrap();
        let buffer = WorkingBuffer::from_text(text);
        let sections = vec![section; buffer.len()];
        let mut skipped = Vec::new();
        normalize_whitespace(
            &catalog,
            &FormatterConfig::default(),
            buffer,
            &sections,
            &mut skipped,
        )
        .to_text()
    }

    #[test]
    fn test_trailing_whitespace_trimmed() {
        assert_eq!(normalize("Plan:   \ncontinue\t", SectionType::Plan), "Plan:\ncontinue");
    }

    #[test]
    fn test_long_gaps_collapse_in_sections() {
        assert_eq!(
            normalize("BP 118/65    HR 82  RR 16", SectionType::Vitals),
            "BP 118/65 HR 82  RR 16"
        );
    }

    #[test]
    fn test_plain_short_lines_keep_spacing() {
        assert_eq!(
            normalize("Name:     J. Doe", SectionType::Plain),
            "Name:     J. Doe"
        );
    }

    #[test]
    fn test_indentation_is_kept() {
        assert_eq!(
            normalize("    GEN:    alert", SectionType::PhysicalExam),
            "    GEN: alert"
        );
    }

    #[test]
    fn test_blank_line_runs_collapse() {
        assert_eq!(
            normalize("a\n\n\n\n  \nb", SectionType::Plain),
            "a\n\nb"
        );
    }
}
