//! Deterministic rule-based formatter for dense clinical notes
//!
//! Clinical notes exported from EHR systems often arrive as a single long line
//! that mixes section headers, medication lists, lab values and exam findings.
//! This crate reflows such text into a readable multi-line layout without
//! dropping or altering any clinically meaningful token.
//!
//! # Architecture
//!
//! - **Catalog layer**: the pattern catalog, an ordered table of rewrite rules
//!   loaded from TOML and compiled once into immutable lookup tables
//! - **Domain layer**: tokenizer, section detector and the staged rewrite engine
//! - **API layer**: the [`NoteFormatter`] facade, configuration and the
//!   alternate-backend boundary
//!
//! # Example
//!
//! ```rust
//! use clinote_core::NoteFormatter;
//!
//! let formatter = NoteFormatter::new().unwrap();
//! let formatted = formatter.format("Medications:  ~  baclofen 5 mg BID  ~  carBAMazepine 200 mg BID");
//!
//! assert!(formatted.contains("\n- baclofen 5 mg BID"));
//! assert!(formatted.contains("\n- carBAMazepine 200 mg BID"));
//! ```

pub mod api;
pub mod catalog;
pub mod domain;
pub mod error;

pub use api::{
    format_note_text, BackendError, BackendUsed, FallbackFormatter, FormatBackend,
    FormatMetadata, FormatOutput, FormatterConfig, FormatterConfigBuilder, NoteFormatter,
    NoteFormatterBuilder,
};
pub use catalog::{PatternCatalog, Rule, RuleAction, RuleCategory, SplitKind};
pub use domain::{BlockStyle, SectionSpan, SectionType, WorkingBuffer};
pub use error::{Error, Result};
