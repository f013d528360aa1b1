//! Stage 4: section-specific block expansion
//!
//! Dispatch is by block style, which every [`SectionType`] maps to through an
//! exhaustive match. A line no rule applies to passes through unchanged.

use crate::api::FormatterConfig;
use crate::catalog::{HeaderLayout, PatternCatalog};
use crate::domain::buffer::{Lines, WorkingBuffer};
use crate::domain::guard::guarded;
use crate::domain::section::{BlockStyle, SectionType};

/// Expands blocks line by line
pub(crate) struct BlockExpander<'a> {
    catalog: &'a PatternCatalog,
    config: &'a FormatterConfig,
}

impl<'a> BlockExpander<'a> {
    pub(crate) fn new(catalog: &'a PatternCatalog, config: &'a FormatterConfig) -> Self {
        Self { catalog, config }
    }

    /// Expand every line; each output line keeps its source line's section
    pub(crate) fn expand_blocks(
        &self,
        buffer: WorkingBuffer,
        sections: &[SectionType],
        skipped: &mut Vec<String>,
    ) -> (WorkingBuffer, Vec<SectionType>) {
        let mut lines = Vec::with_capacity(buffer.len());
        let mut out_sections = Vec::with_capacity(buffer.len());

        for (line, &section) in buffer.lines().iter().zip(sections) {
            let expanded = self
                .expand_line(line, section, skipped)
                .unwrap_or_else(|| single(line));
            out_sections.extend(std::iter::repeat(section).take(expanded.len()));
            lines.extend(expanded);
        }

        (WorkingBuffer::from_lines(lines), out_sections)
    }

    /// Rewrite one line, or `None` to leave it as is
    fn expand_line(
        &self,
        line: &str,
        section: SectionType,
        skipped: &mut Vec<String>,
    ) -> Option<Lines> {
        let expanded = match section.block_style() {
            BlockStyle::List => self.expand_list(line, skipped),
            BlockStyle::Measurements => self.expand_measurements(line, section, skipped),
            BlockStyle::Examination => self.expand_examination(line, section, skipped),
            BlockStyle::Prose | BlockStyle::Plain => None,
        };
        match (expanded, section.block_style()) {
            (Some(lines), _) => Some(lines),
            (None, BlockStyle::Plain) => None,
            (None, _) => self.detach_long_header(line, skipped),
        }
    }

    fn expand_list(&self, line: &str, skipped: &mut Vec<String>) -> Option<Lines> {
        let lists = self.catalog.lists();
        let rule = lists.rule();
        if !rule.matcher().is_match(line) {
            return None;
        }
        let lines = guarded(rule.id(), line, skipped, |text| {
            lists.bulletize(text).unwrap_or_else(|| single(text))
        });
        changed(line, lines)
    }

    fn expand_measurements(
        &self,
        line: &str,
        section: SectionType,
        skipped: &mut Vec<String>,
    ) -> Option<Lines> {
        if line.chars().count() <= self.config.short_block_threshold {
            return None;
        }
        let measurements = self.catalog.measurements();
        let rule = measurements.rule_for(section)?;
        let lines = guarded(rule.id(), line, skipped, |text| {
            measurements
                .split_runs(text)
                .unwrap_or_else(|| single(text))
        });
        changed(line, lines)
    }

    /// Long examination content is broken at sub-labels, short content may wrap
    fn expand_examination(
        &self,
        line: &str,
        section: SectionType,
        skipped: &mut Vec<String>,
    ) -> Option<Lines> {
        let header_end = self
            .catalog
            .headers()
            .leading(line)
            .map_or(0, |header| header.end);
        let content = line[header_end..].trim();

        if content.chars().count() > self.config.subsection_threshold {
            let sub_labels = self.catalog.sub_labels();
            let rule_id = match sub_labels.for_section(section) {
                Some((id, _)) => id.to_string(),
                None => format!("sections.{section}"),
            };
            let lines = guarded(&rule_id, line, skipped, |text| {
                let mut lines = Lines::new();
                let head = text[..header_end].trim_end();
                if !head.trim_start().is_empty() {
                    lines.push(head.to_string());
                }
                let body = &text[header_end..];
                let mut cursor = 0;
                let points = sub_labels.split_points(section, body);
                for offset in points.into_iter().chain(std::iter::once(body.len())) {
                    let piece = body[cursor..offset].trim();
                    if !piece.is_empty() {
                        lines.push(piece.to_string());
                    }
                    cursor = offset;
                }
                lines
            });
            return changed(line, lines);
        }

        let width = self.config.wrap_width?;
        if line.chars().count() <= width {
            return None;
        }
        let lines = guarded("wrap", line, skipped, |text| wrap(text, width));
        changed(line, lines)
    }

    /// Put a detached header on its own line when its content is long
    fn detach_long_header(&self, line: &str, skipped: &mut Vec<String>) -> Option<Lines> {
        let header = self.catalog.headers().leading(line)?;
        if header.entry.layout != HeaderLayout::Detached {
            return None;
        }
        let content = line[header.end..].trim();
        if content.chars().count() <= self.config.subsection_threshold {
            return None;
        }
        let rule_id = format!("header.{}", header.entry.id);
        let lines = guarded(&rule_id, line, skipped, |text| {
            let mut lines = Lines::new();
            lines.push(text[..header.end].trim_end().to_string());
            lines.push(text[header.end..].trim().to_string());
            lines
        });
        changed(line, lines)
    }
}

/// Greedy word wrap; continuation lines start flush left
fn wrap(text: &str, width: usize) -> Lines {
    let indent_len = text.len() - text.trim_start().len();
    let mut lines = Lines::new();
    let mut current = text[..indent_len].to_string();
    let mut current_len = current.chars().count();
    let mut has_word = false;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if has_word && current_len + 1 + word_len > width {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
            has_word = false;
        }
        if has_word {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
        has_word = true;
    }
    if has_word {
        lines.push(current);
    }
    lines
}

fn single(line: &str) -> Lines {
    let mut lines = Lines::new();
    lines.push(line.to_string());
    lines
}

fn changed(line: &str, lines: Lines) -> Option<Lines> {
    if lines.len() == 1 && lines[0] == line {
        None
    } else {
        Some(lines)
    }
}
