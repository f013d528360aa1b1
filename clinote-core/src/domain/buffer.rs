//! Line buffer threaded through the pipeline stages

use smallvec::SmallVec;

/// Lines produced by rewriting a single input line
pub type Lines = SmallVec<[String; 4]>;

/// Mutable line-array state passed from stage to stage
///
/// Each stage consumes a buffer and returns a new one; no stage edits another
/// stage's output in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkingBuffer {
    lines: Vec<String>,
}

impl WorkingBuffer {
    /// Split text on `\n` into a buffer
    pub fn from_text(text: &str) -> Self {
        if text.is_empty() {
            return Self::default();
        }
        Self {
            lines: text.split('\n').map(str::to_string).collect(),
        }
    }

    /// Wrap existing lines
    pub fn from_lines(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// Borrow the lines
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Take the lines
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    /// Number of lines
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the buffer holds no lines
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Join lines with `\n`
    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }

    /// Replace every line with the lines returned by `f`
    pub fn flat_map_lines<F>(self, mut f: F) -> Self
    where
        F: FnMut(&str) -> Lines,
    {
        let mut lines = Vec::with_capacity(self.lines.len());
        for line in &self.lines {
            lines.extend(f(line));
        }
        Self { lines }
    }
}
