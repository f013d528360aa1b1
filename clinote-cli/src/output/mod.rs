//! Output formatting module

use anyhow::Result;
use clinote_core::{BackendUsed, FormatMetadata};
use serde::Serialize;

/// One formatted note, as written by the output formatters
#[derive(Debug, Clone, Serialize)]
pub struct NoteRecord {
    /// Source path as given on the command line
    pub path: String,
    /// Decoded input text
    pub original: String,
    /// Formatter output
    pub formatted: String,
    /// Which backend produced `formatted`, when an alternate backend ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<BackendUsed>,
    /// Formatter metadata
    pub metadata: FormatMetadata,
}

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Format and output a single note
    fn format_note(&mut self, note: &NoteRecord) -> Result<()>;

    /// Finalize output (e.g., close JSON array)
    fn finish(&mut self) -> Result<()>;
}

pub mod json;
pub mod markdown;
pub mod text;

pub use json::JsonFormatter;
pub use markdown::MarkdownFormatter;
pub use text::TextFormatter;

#[cfg(test)]
pub(crate) fn sample_record(path: &str, formatted: &str) -> NoteRecord {
    NoteRecord {
        path: path.to_string(),
        original: formatted.replace('\n', " "),
        formatted: formatted.to_string(),
        backend: None,
        metadata: FormatMetadata {
            input_lines: 1,
            output_lines: formatted.lines().count(),
            ..FormatMetadata::default()
        },
    }
}
