//! Markdown output formatter

use super::{NoteRecord, OutputFormatter};
use anyhow::Result;
use std::io::Write;

/// Markdown formatter - one heading and fenced block per note
pub struct MarkdownFormatter<W: Write> {
    writer: W,
    note_count: usize,
    line_count: usize,
}

impl<W: Write> MarkdownFormatter<W> {
    /// Create a new markdown formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            note_count: 0,
            line_count: 0,
        }
    }
}

impl<W: Write + Send + Sync> OutputFormatter for MarkdownFormatter<W> {
    fn format_note(&mut self, note: &NoteRecord) -> Result<()> {
        self.note_count += 1;
        self.line_count += note.metadata.output_lines;

        writeln!(self.writer, "## {}", note.path)?;
        writeln!(self.writer)?;

        let sections = note.metadata.recognized_sections();
        if !sections.is_empty() {
            let names: Vec<&str> = sections.iter().map(|s| s.as_str()).collect();
            writeln!(self.writer, "*Sections: {}*", names.join(", "))?;
            writeln!(self.writer)?;
        }

        writeln!(self.writer, "```text")?;
        if !note.formatted.is_empty() {
            writeln!(self.writer, "{}", note.formatted)?;
        }
        writeln!(self.writer, "```")?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        writeln!(self.writer, "---")?;
        writeln!(
            self.writer,
            "*Total notes: {}, lines: {}*",
            self.note_count, self.line_count
        )?;
        self.writer.flush()?;
        Ok(())
    }
}
