//! Output types for the formatter facade

use serde::Serialize;

use crate::domain::{RewriteReport, SectionSpan, SectionType};

/// Formatted text with metadata about the run
#[derive(Debug, Clone, Serialize)]
pub struct FormatOutput {
    /// Formatted note
    pub text: String,
    /// What the formatter did
    pub metadata: FormatMetadata,
}

/// Metadata about one format call
#[derive(Debug, Clone, Default, Serialize)]
pub struct FormatMetadata {
    /// Characters in the raw input
    pub input_chars: usize,
    /// Characters in the formatted output
    pub output_chars: usize,
    /// Lines in the raw input
    pub input_lines: usize,
    /// Lines in the formatted output
    pub output_lines: usize,
    /// Section spans over the output lines
    pub sections: Vec<SectionSpan>,
    /// Rules the content guard rejected
    pub skipped_rules: Vec<String>,
    /// Whether the time budget cut formatting short
    pub budget_exceeded: bool,
    /// Wall-clock time in milliseconds
    pub elapsed_ms: f64,
}

impl FormatMetadata {
    pub(crate) fn new(raw: &str, text: &str, report: RewriteReport, elapsed_ms: f64) -> Self {
        Self {
            input_chars: raw.chars().count(),
            output_chars: text.chars().count(),
            input_lines: line_count(raw),
            output_lines: line_count(text),
            sections: report.sections,
            skipped_rules: report.skipped_rules,
            budget_exceeded: report.budget_exceeded,
            elapsed_ms,
        }
    }

    /// Distinct recognized sections, in order of first appearance
    pub fn recognized_sections(&self) -> Vec<SectionType> {
        let mut seen = Vec::new();
        for span in &self.sections {
            if span.section.is_recognized() && !seen.contains(&span.section) {
                seen.push(span.section);
            }
        }
        seen
    }
}

fn line_count(text: &str) -> usize {
    if text.is_empty() {
        0
    } else {
        text.lines().count()
    }
}
