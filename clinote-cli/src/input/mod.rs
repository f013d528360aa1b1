//! Input handling module

pub mod file_reader;
pub mod glob_resolver;

pub use file_reader::{DecodedNote, FileReader, TextEncoding};
pub use glob_resolver::{collect_tree, resolve_patterns};
