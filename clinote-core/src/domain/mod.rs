//! Formatting pipeline: tokenizer, section detector and rewrite engine

pub mod buffer;
pub mod detector;
pub mod engine;
pub(crate) mod guard;
pub mod section;
pub mod tokenizer;

pub use buffer::WorkingBuffer;
pub use detector::{LineContext, SectionDetector};
pub use engine::{RewriteEngine, RewriteReport};
pub use section::{BlockStyle, SectionSpan, SectionType};
pub use tokenizer::Tokenizer;
