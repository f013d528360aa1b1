//! Dense-line splitting ahead of section-aware formatting
//!
//! Exported notes often arrive as one long line with headers run together.
//! Such lines are broken before every header; everything else passes through.
//! A note that already has line breaks keeps them as they are.

use super::buffer::{Lines, WorkingBuffer};
use crate::api::FormatterConfig;
use crate::catalog::tables::headers::content_start;
use crate::catalog::{HeaderLayout, HeaderMatch, PatternCatalog};
use log::trace;

/// Breaks dense lines at header vocabulary
#[derive(Debug, Clone, Copy)]
pub struct Tokenizer<'a> {
    catalog: &'a PatternCatalog,
    config: &'a FormatterConfig,
}

impl<'a> Tokenizer<'a> {
    pub fn new(catalog: &'a PatternCatalog, config: &'a FormatterConfig) -> Self {
        Self { catalog, config }
    }

    /// Split the dense line of a single-line note
    ///
    /// Buffers with more than one non-blank line come back unchanged.
    pub fn split_dense_lines(&self, buffer: WorkingBuffer) -> WorkingBuffer {
        if is_multi_line(&buffer) {
            trace!("note already has line breaks; skipping dense splitting");
            return buffer;
        }
        buffer.flat_map_lines(|line| {
            if self.is_dense(line) {
                self.split_line(line)
            } else {
                let mut lines = Lines::new();
                lines.push(line.to_string());
                lines
            }
        })
    }

    /// Long enough and carrying a header or a field-separator gap
    pub fn is_dense(&self, line: &str) -> bool {
        line.chars().count() > self.config.dense_line_threshold
            && (self.catalog.headers().is_match(line)
                || has_gap(line.trim(), self.config.min_gap_spaces))
    }

    /// Break one line before each header not already at its start
    ///
    /// Detached headers are put on a line of their own with their content
    /// on the next line; inline headers keep their content.
    pub fn split_line(&self, line: &str) -> Lines {
        let matches = self.catalog.headers().find_all(line);
        let mut lines = Lines::new();
        let Some(first) = matches.first() else {
            lines.push(line.to_string());
            return lines;
        };

        let prefix = &line[..first.start];
        if first.start > content_start(line) && !prefix.trim().is_empty() {
            lines.push(prefix.trim_end().to_string());
        }

        for (i, found) in matches.iter().enumerate() {
            let end = matches.get(i + 1).map_or(line.len(), |next| next.start);
            // a bullet before a leading header stays with it
            let start = if i == 0 && found.start <= content_start(line) {
                0
            } else {
                found.start
            };
            push_segment(&mut lines, line, start, found, end);
        }

        trace!("split dense line into {} lines", lines.len());
        lines
    }
}

fn push_segment(
    lines: &mut Lines,
    line: &str,
    start: usize,
    found: &HeaderMatch<'_>,
    end: usize,
) {
    match found.entry.layout {
        HeaderLayout::Inline => lines.push(line[start..end].trim_end().to_string()),
        HeaderLayout::Detached => {
            lines.push(line[start..found.end].trim_end().to_string());
            let content = line[found.end..end].trim();
            if !content.is_empty() {
                lines.push(content.to_string());
            }
        }
    }
}

fn is_multi_line(buffer: &WorkingBuffer) -> bool {
    buffer
        .lines()
        .iter()
        .filter(|line| !line.trim().is_empty())
        .nth(1)
        .is_some()
}

/// Whether `text` holds a run of at least `min` spaces or tabs
fn has_gap(text: &str, min: usize) -> bool {
    let mut run = 0;
    for ch in text.chars() {
        if ch == ' ' || ch == '\t' {
            run += 1;
            if run >= min {
                return true;
            }
        } else {
            run = 0;
        }
    }
    false
}
