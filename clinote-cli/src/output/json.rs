//! JSON output formatter

use super::{NoteRecord, OutputFormatter};
use anyhow::Result;
use std::io::Write;

/// JSON formatter - outputs notes as a JSON array
///
/// Each entry keeps the original text beside the formatted text for
/// before/after comparison.
pub struct JsonFormatter<W: Write> {
    writer: W,
    pretty: bool,
    notes: Vec<NoteRecord>,
}

impl<W: Write> JsonFormatter<W> {
    /// Create a new JSON formatter
    pub fn new(writer: W, pretty: bool) -> Self {
        Self {
            writer,
            pretty,
            notes: Vec::new(),
        }
    }
}

impl<W: Write + Send + Sync> OutputFormatter for JsonFormatter<W> {
    fn format_note(&mut self, note: &NoteRecord) -> Result<()> {
        self.notes.push(note.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, &self.notes)?;
        } else {
            serde_json::to_writer(&mut self.writer, &self.notes)?;
        }
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
