//! Rule-based note formatter

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use log::debug;

use crate::api::{FormatMetadata, FormatOutput, FormatterConfig};
use crate::catalog::PatternCatalog;
use crate::domain::{RewriteEngine, RewriteReport, Tokenizer, WorkingBuffer};
use crate::error::Result;

/// Formatter built from the embedded catalog and default configuration
static DEFAULT_FORMATTER: OnceLock<NoteFormatter> = OnceLock::new();

/// Format a raw clinical note with the built-in catalog
///
/// Only a catalog configuration error can make this fail; any string input
/// is formatted on a best-effort basis.
///
/// ```rust
/// let formatted = clinote_core::format_note_text(
///     "Diagnoses: Axis I: MDD, Bereavement Axis II: Deferred Axis III: Diabetes",
/// )
/// .unwrap();
/// assert!(formatted.contains("\nAxis II: Deferred"));
/// ```
pub fn format_note_text(raw: &str) -> Result<String> {
    Ok(default_formatter()?.format(raw))
}

fn default_formatter() -> Result<&'static NoteFormatter> {
    if let Some(formatter) = DEFAULT_FORMATTER.get() {
        return Ok(formatter);
    }
    let formatter = NoteFormatter::new()?;
    Ok(DEFAULT_FORMATTER.get_or_init(|| formatter))
}

/// Deterministic `raw -> formatted` transform over an explicit catalog
///
/// Cheap to clone; clones share the compiled catalog.
#[derive(Debug, Clone)]
pub struct NoteFormatter {
    engine: RewriteEngine,
}

impl NoteFormatter {
    /// Formatter with the built-in catalog and default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(FormatterConfig::default())
    }

    /// Formatter with the built-in catalog
    pub fn with_config(config: FormatterConfig) -> Result<Self> {
        Self::with_catalog(PatternCatalog::builtin()?, config)
    }

    /// Formatter with a specific catalog
    pub fn with_catalog(catalog: Arc<PatternCatalog>, config: FormatterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            engine: RewriteEngine::new(catalog, config),
        })
    }

    pub fn builder() -> NoteFormatterBuilder {
        NoteFormatterBuilder::default()
    }

    pub fn catalog(&self) -> &PatternCatalog {
        self.engine.catalog()
    }

    pub fn config(&self) -> &FormatterConfig {
        self.engine.config()
    }

    /// Format a note
    pub fn format(&self, raw: &str) -> String {
        self.format_with_report(raw).text
    }

    /// Format a note and describe what was done
    pub fn format_with_report(&self, raw: &str) -> FormatOutput {
        let started = Instant::now();
        let normalized = normalize_input(raw);

        if normalized.trim().is_empty() {
            return FormatOutput {
                text: String::new(),
                metadata: FormatMetadata::new(
                    raw,
                    "",
                    RewriteReport::default(),
                    elapsed_ms(started),
                ),
            };
        }

        let tokenizer = Tokenizer::new(self.engine.catalog(), self.engine.config());
        let buffer = tokenizer.split_dense_lines(WorkingBuffer::from_text(&normalized));
        let (buffer, report) = self.engine.run(buffer);
        let text = assemble(&buffer.to_text());

        let metadata = FormatMetadata::new(raw, &text, report, elapsed_ms(started));
        debug!(
            "formatted {} lines into {} lines in {:.2}ms",
            metadata.input_lines, metadata.output_lines, metadata.elapsed_ms
        );
        FormatOutput { text, metadata }
    }
}

/// Fluent builder for [`NoteFormatter`]
#[derive(Debug, Default)]
pub struct NoteFormatterBuilder {
    catalog: Option<Arc<PatternCatalog>>,
    catalog_path: Option<PathBuf>,
    config: Option<FormatterConfig>,
}

impl NoteFormatterBuilder {
    /// Use an already compiled catalog
    pub fn catalog(mut self, catalog: Arc<PatternCatalog>) -> Self {
        self.catalog = Some(catalog);
        self.catalog_path = None;
        self
    }

    /// Load the catalog from a TOML file at build time
    pub fn catalog_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog_path = Some(path.into());
        self.catalog = None;
        self
    }

    pub fn config(mut self, config: FormatterConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the formatter
    pub fn build(self) -> Result<NoteFormatter> {
        let catalog = match (self.catalog, self.catalog_path) {
            (Some(catalog), _) => catalog,
            (None, Some(path)) => Arc::new(PatternCatalog::from_file(path)?),
            (None, None) => PatternCatalog::builtin()?,
        };
        NoteFormatter::with_catalog(catalog, self.config.unwrap_or_default())
    }
}

/// Unify line endings and turn non-breaking spaces into spaces
fn normalize_input(raw: &str) -> String {
    raw.replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\u{a0}', " ")
}

/// Drop leading blank lines and trailing whitespace
fn assemble(text: &str) -> String {
    let mut start = 0;
    for line in text.split_inclusive('\n') {
        if !line.trim().is_empty() {
            break;
        }
        start += line.len();
    }
    text[start..].trim_end().to_string()
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_input() {
        assert_eq!(normalize_input("a\r\nb\rc\u{a0}d"), "a\nb\nc d");
    }

    #[test]
    fn test_assemble_keeps_first_line_indent() {
        assert_eq!(assemble("\n  \n  Plan:\nrest  \n\n"), "  Plan:\nrest");
        assert_eq!(assemble(""), "");
    }

    #[test]
    fn test_builder_rejects_missing_catalog_file() {
        let err = NoteFormatter::builder()
            .catalog_file("/nonexistent/catalog.toml")
            .build()
            .unwrap_err();
        assert!(matches!(err, crate::Error::Io { .. }));
    }

    #[test]
    fn test_default_formatter_is_reused() {
        let first = default_formatter().unwrap() as *const NoteFormatter;
        let second = default_formatter().unwrap() as *const NoteFormatter;
        assert_eq!(first, second);
    }
}
