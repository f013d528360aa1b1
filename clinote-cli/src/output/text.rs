//! Plain text output formatter

use super::{NoteRecord, OutputFormatter};
use anyhow::Result;
use std::io::{self, Write};

/// Plain text formatter - writes the formatted notes
///
/// With `headers` set, each note is preceded by a `==> path <==` line, the
/// way `head` separates several files.
pub struct TextFormatter<W: Write> {
    writer: W,
    headers: bool,
    written: usize,
}

impl<W: Write> TextFormatter<W> {
    /// Create a new text formatter
    pub fn new(writer: W, headers: bool) -> Self {
        Self {
            writer,
            headers,
            written: 0,
        }
    }
}

impl TextFormatter<io::Stdout> {
    /// Create a formatter that writes to stdout
    pub fn stdout(headers: bool) -> Self {
        Self::new(io::stdout(), headers)
    }
}

impl<W: Write + Send + Sync> OutputFormatter for TextFormatter<W> {
    fn format_note(&mut self, note: &NoteRecord) -> Result<()> {
        if self.headers {
            if self.written > 0 {
                writeln!(self.writer)?;
            }
            writeln!(self.writer, "==> {} <==", note.path)?;
        }
        if !note.formatted.is_empty() {
            writeln!(self.writer, "{}", note.formatted)?;
        }
        self.written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
