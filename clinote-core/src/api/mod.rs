//! Formatter facade
//!
//! [`NoteFormatter`] composes the tokenizer and the rewrite engine behind a
//! single `raw -> formatted` call. [`format_note_text`] is the entry point the
//! rest of a system calls; [`FallbackFormatter`] lets an alternate backend
//! sit in front of the rule-based formatter.

mod backend;
mod config;
mod formatter;
mod output;


pub use backend::{BackendError, BackendUsed, FallbackFormatter, FormatBackend};
pub use config::{defaults, FormatterConfig, FormatterConfigBuilder};
pub use formatter::{format_note_text, NoteFormatter, NoteFormatterBuilder};
pub use output::{FormatMetadata, FormatOutput};
