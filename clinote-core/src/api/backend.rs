//! Alternate formatter backends
//!
//! Another implementation of the `raw -> formatted` contract (a model-based
//! formatter, an external process) can run in front of the rule-based
//! formatter. Its failures never reach the caller: the rule-based formatter
//! always takes over.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use log::warn;
use serde::Serialize;
use thiserror::Error;

use crate::api::NoteFormatter;

/// Failure reported by an alternate backend
#[derive(Debug, Error)]
pub enum BackendError {
    /// Backend could not be reached or started
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// Backend ran but did not produce usable output
    #[error("backend failed: {0}")]
    Failed(String),
}

/// Anything that turns a raw note into formatted text
pub trait FormatBackend: Send + Sync {
    /// Short name used in logs and reports
    fn name(&self) -> &str;

    /// Format one note
    fn format(&self, raw: &str) -> Result<String, BackendError>;
}

impl FormatBackend for NoteFormatter {
    fn name(&self) -> &str {
        "rules"
    }

    fn format(&self, raw: &str) -> Result<String, BackendError> {
        Ok(NoteFormatter::format(self, raw))
    }
}

/// Which backend produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendUsed {
    Primary,
    Fallback,
}

/// Runs an alternate backend and degrades to the rule-based formatter
///
/// The rule-based formatter takes over when the primary backend returns an
/// error, panics, or returns nothing for a non-blank note.
pub struct FallbackFormatter {
    primary: Box<dyn FormatBackend>,
    rules: NoteFormatter,
}

impl FallbackFormatter {
    pub fn new(primary: Box<dyn FormatBackend>, rules: NoteFormatter) -> Self {
        Self { primary, rules }
    }

    /// Name of the primary backend
    pub fn primary_name(&self) -> &str {
        self.primary.name()
    }

    /// Rule-based formatter used as fallback
    pub fn rules(&self) -> &NoteFormatter {
        &self.rules
    }

    /// Format with the primary backend, falling back on failure
    pub fn format_with_backend(&self, raw: &str) -> (String, BackendUsed) {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.primary.format(raw)));
        let reason = match outcome {
            Ok(Ok(text)) if !text.trim().is_empty() || raw.trim().is_empty() => {
                return (text, BackendUsed::Primary);
            }
            Ok(Ok(_)) => "empty output".to_string(),
            Ok(Err(err)) => err.to_string(),
            Err(_) => "panicked".to_string(),
        };
        warn!(
            "backend '{}' failed ({reason}); using rule-based formatter",
            self.primary.name()
        );
        (self.rules.format(raw), BackendUsed::Fallback)
    }
}

impl FormatBackend for FallbackFormatter {
    fn name(&self) -> &str {
        "fallback"
    }

    fn format(&self, raw: &str) -> Result<String, BackendError> {
        Ok(self.format_with_backend(raw).0)
    }
}

impl fmt::Debug for FallbackFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FallbackFormatter")
            .field("primary", &self.primary.name())
            .field("rules", &self.rules)
            .finish()
    }
}
