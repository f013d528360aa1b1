//! Runtime tables compiled from the catalog schema
//!
//! Every pattern is compiled once at load; lookups never allocate regexes.

pub mod headers;
pub mod lists;
pub mod measurements;
pub mod sub_labels;
pub mod whitespace;
pub mod word_split;

pub use headers::{
    ColonPolicy, HeaderConflict, HeaderEntry, HeaderLayout, HeaderMatch, HeaderTable,
    SplitPolicy,
};
pub use lists::ListTable;
pub use measurements::MeasurementTable;
pub use sub_labels::SubLabelTable;
pub use whitespace::WhitespaceTable;
pub use word_split::WordSplitTable;

use crate::error::{Error, Result};
use regex::Regex;

/// Compile a pattern, attributing failures to `rule_id`
pub(crate) fn compile(rule_id: &str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| Error::InvalidPattern {
        rule_id: rule_id.to_string(),
        source,
    })
}

/// Escape a literal phrase so any run of spaces or tabs matches between words
pub(crate) fn phrase_pattern(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"[ \t]+")
}
