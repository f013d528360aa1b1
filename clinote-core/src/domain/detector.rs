//! Section classification of buffer lines

use super::buffer::WorkingBuffer;
use super::section::{SectionSpan, SectionType};
use crate::catalog::PatternCatalog;

/// What precedes the line being classified
#[derive(Debug, Clone, Copy)]
pub struct LineContext<'a> {
    /// Section of the preceding line
    pub section: SectionType,
    /// Closest preceding non-blank line
    pub previous_line: Option<&'a str>,
}

impl Default for LineContext<'_> {
    fn default() -> Self {
        Self {
            section: SectionType::Plain,
            previous_line: None,
        }
    }
}

/// Assigns a [`SectionType`] to every line
#[derive(Debug, Clone, Copy)]
pub struct SectionDetector<'a> {
    catalog: &'a PatternCatalog,
}

impl<'a> SectionDetector<'a> {
    pub fn new(catalog: &'a PatternCatalog) -> Self {
        Self { catalog }
    }

    /// Classify one line
    ///
    /// A leading header decides first (longest header wins). A line opening
    /// with a list delimiter takes the list section named by a keyword on the
    /// previous line. Otherwise the line inherits the preceding section.
    pub fn classify(&self, line: &str, context: &LineContext<'_>) -> SectionType {
        if let Some(header) = self.catalog.headers().leading(line) {
            return header.entry.section;
        }

        let lists = self.catalog.lists();
        if lists.starts_with_delimiter(line) {
            if let Some(section) = context
                .previous_line
                .and_then(|previous| lists.context_section(previous))
            {
                return section;
            }
        }

        context.section
    }

    /// Section of every line, in buffer order
    pub fn classify_lines(&self, buffer: &WorkingBuffer) -> Vec<SectionType> {
        let mut context = LineContext::default();
        let mut sections = Vec::with_capacity(buffer.len());
        for line in buffer.lines() {
            if line.trim().is_empty() {
                sections.push(context.section);
                continue;
            }
            let section = self.classify(line, &context);
            sections.push(section);
            context = LineContext {
                section,
                previous_line: Some(line.as_str()),
            };
        }
        sections
    }

    /// Group consecutive lines of equal section into spans
    pub fn detect(&self, buffer: &WorkingBuffer) -> Vec<SectionSpan> {
        spans(&self.classify_lines(buffer))
    }
}

/// Collapse per-line sections into half-open spans
pub(crate) fn spans(sections: &[SectionType]) -> Vec<SectionSpan> {
    let mut spans: Vec<SectionSpan> = Vec::new();
    for (index, &section) in sections.iter().enumerate() {
        match spans.last_mut() {
            Some(span) if span.section == section => span.end = index + 1,
            _ => spans.push(SectionSpan {
                section,
                start: index,
                end: index + 1,
            }),
        }
    }
    spans
}
