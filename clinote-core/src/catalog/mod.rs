//! Pattern catalog: rewrite rules as data
//!
//! The catalog is a TOML document compiled once into an immutable
//! [`PatternCatalog`]. The engine receives it explicitly and never consults
//! global state, so a reduced catalog can be swapped in for tests.

pub mod config;
pub(crate) mod loader;
pub mod rule;
pub mod runtime;
pub mod tables;

pub use config::CatalogConfig;
pub use rule::{Rule, RuleAction, RuleCategory, SplitKind};
pub use runtime::PatternCatalog;
pub use tables::{
    ColonPolicy, HeaderConflict, HeaderEntry, HeaderLayout, HeaderMatch, HeaderTable,
    ListTable, MeasurementTable, SplitPolicy, SubLabelTable, WhitespaceTable, WordSplitTable,
};

/// Built-in catalog source, embedded at compile time
pub const BUILTIN_CATALOG: &str = include_str!("../../configs/catalog/clinical.toml");
