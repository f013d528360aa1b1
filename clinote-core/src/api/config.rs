//! Formatter configuration
//!
//! The thresholds below were tuned against real note exports and shape the
//! output materially; they are kept as named, overridable values.

use crate::error::Error;
use std::time::Duration;

/// Default configuration constants
pub mod defaults {
    /// Lines longer than this (in characters) are candidates for splitting
    pub const DENSE_LINE_THRESHOLD: usize = 100;

    /// Examination content longer than this is broken at its sub-labels
    pub const SUBSECTION_THRESHOLD: usize = 100;

    /// Measurement lines at or under this length stay on one line
    pub const SHORT_BLOCK_THRESHOLD: usize = 60;

    /// Whitespace run that marks a field separator in dense lines
    pub const MIN_GAP_SPACES: usize = 2;

    /// Interior whitespace runs this long collapse to one space
    pub const COLLAPSE_RUN: usize = 3;

    /// Narrowest accepted wrap width
    pub const MIN_WRAP_WIDTH: usize = 20;
}

/// Thresholds and limits for one formatter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatterConfig {
    pub(crate) dense_line_threshold: usize,
    pub(crate) subsection_threshold: usize,
    pub(crate) short_block_threshold: usize,
    pub(crate) min_gap_spaces: usize,
    pub(crate) collapse_run: usize,
    pub(crate) wrap_width: Option<usize>,   // None = no wrapping
    pub(crate) time_budget: Option<Duration>, // None = unbounded
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            dense_line_threshold: defaults::DENSE_LINE_THRESHOLD,
            subsection_threshold: defaults::SUBSECTION_THRESHOLD,
            short_block_threshold: defaults::SHORT_BLOCK_THRESHOLD,
            min_gap_spaces: defaults::MIN_GAP_SPACES,
            collapse_run: defaults::COLLAPSE_RUN,
            wrap_width: None,
            time_budget: None,
        }
    }
}

impl FormatterConfig {
    /// Create a configuration builder
    pub fn builder() -> FormatterConfigBuilder {
        FormatterConfigBuilder::default()
    }

    pub fn dense_line_threshold(&self) -> usize {
        self.dense_line_threshold
    }

    pub fn subsection_threshold(&self) -> usize {
        self.subsection_threshold
    }

    pub fn short_block_threshold(&self) -> usize {
        self.short_block_threshold
    }

    pub fn min_gap_spaces(&self) -> usize {
        self.min_gap_spaces
    }

    pub fn collapse_run(&self) -> usize {
        self.collapse_run
    }

    pub fn wrap_width(&self) -> Option<usize> {
        self.wrap_width
    }

    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget
    }

    /// Validate the configuration
    pub(crate) fn validate(&self) -> Result<(), Error> {
        let positive = [
            ("dense_line_threshold", self.dense_line_threshold),
            ("subsection_threshold", self.subsection_threshold),
            ("short_block_threshold", self.short_block_threshold),
            ("min_gap_spaces", self.min_gap_spaces),
        ];
        for (name, value) in positive {
            if value == 0 {
                return Err(Error::Configuration(format!(
                    "{name} must be greater than 0"
                )));
            }
        }

        if self.collapse_run < 2 {
            return Err(Error::Configuration(
                "collapse_run must be at least 2".into(),
            ));
        }

        if let Some(width) = self.wrap_width {
            if width < defaults::MIN_WRAP_WIDTH {
                return Err(Error::Configuration(format!(
                    "wrap_width must be at least {}",
                    defaults::MIN_WRAP_WIDTH
                )));
            }
        }

        if self.time_budget.is_some_and(|budget| budget.is_zero()) {
            return Err(Error::Configuration(
                "time_budget must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}

/// Fluent builder for [`FormatterConfig`]
#[derive(Debug, Default)]
pub struct FormatterConfigBuilder {
    dense_line_threshold: Option<usize>,
    subsection_threshold: Option<usize>,
    short_block_threshold: Option<usize>,
    min_gap_spaces: Option<usize>,
    collapse_run: Option<usize>,
    wrap_width: Option<usize>,
    time_budget: Option<Duration>,
}

impl FormatterConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Length above which a line may be split at headers
    pub fn dense_line_threshold(mut self, chars: usize) -> Self {
        self.dense_line_threshold = Some(chars);
        self
    }

    /// Content length above which exam sub-labels start new lines
    pub fn subsection_threshold(mut self, chars: usize) -> Self {
        self.subsection_threshold = Some(chars);
        self
    }

    /// Length at or under which measurement runs stay on one line
    pub fn short_block_threshold(mut self, chars: usize) -> Self {
        self.short_block_threshold = Some(chars);
        self
    }

    pub fn min_gap_spaces(mut self, spaces: usize) -> Self {
        self.min_gap_spaces = Some(spaces);
        self
    }

    pub fn collapse_run(mut self, spaces: usize) -> Self {
        self.collapse_run = Some(spaces);
        self
    }

    /// Wrap short examination content at this width (None = no wrapping)
    pub fn wrap_width(mut self, width: Option<usize>) -> Self {
        self.wrap_width = width;
        self
    }

    /// Wall-clock budget per note (None = unbounded)
    pub fn time_budget(mut self, budget: Option<Duration>) -> Self {
        self.time_budget = budget;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<FormatterConfig, Error> {
        let defaults = FormatterConfig::default();
        let config = FormatterConfig {
            dense_line_threshold: self
                .dense_line_threshold
                .unwrap_or(defaults.dense_line_threshold),
            subsection_threshold: self
                .subsection_threshold
                .unwrap_or(defaults.subsection_threshold),
            short_block_threshold: self
                .short_block_threshold
                .unwrap_or(defaults.short_block_threshold),
            min_gap_spaces: self.min_gap_spaces.unwrap_or(defaults.min_gap_spaces),
            collapse_run: self.collapse_run.unwrap_or(defaults.collapse_run),
            wrap_width: self.wrap_width,
            time_budget: self.time_budget,
        };
        config.validate()?;
        Ok(config)
    }
}
