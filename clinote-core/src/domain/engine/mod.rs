//! Rewrite engine
//!
//! A linear pipeline. Stages run strictly in this order, each consuming the
//! previous stage's buffer:
//!
//! 1. word-split repair
//! 2. line breaks before always-split headers
//! 3. section detection
//! 4. block expansion by section
//! 5. whitespace normalization
//!
//! Every rule application is checked by the content guard; a rule whose
//! output would change the note's alphanumeric content is skipped for that
//! line and reported.

mod blocks;
mod headers;
mod whitespace;
mod word_split;

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, warn};
use serde::Serialize;

use super::buffer::WorkingBuffer;
use super::detector::{spans, SectionDetector};
use super::section::SectionSpan;
use crate::api::FormatterConfig;
use crate::catalog::PatternCatalog;
use blocks::BlockExpander;

/// What happened during one engine run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RewriteReport {
    /// Sections of the output buffer
    pub sections: Vec<SectionSpan>,
    /// Rules rejected by the content guard, first rejection order
    pub skipped_rules: Vec<String>,
    /// Whether the time budget cut the pipeline short
    pub budget_exceeded: bool,
}

/// Applies the ordered rewrite stages with an explicit catalog
#[derive(Debug, Clone)]
pub struct RewriteEngine {
    catalog: Arc<PatternCatalog>,
    config: FormatterConfig,
}

impl RewriteEngine {
    pub fn new(catalog: Arc<PatternCatalog>, config: FormatterConfig) -> Self {
        Self { catalog, config }
    }

    pub fn catalog(&self) -> &PatternCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &FormatterConfig {
        &self.config
    }

    /// Run every stage over `buffer`
    pub fn run(&self, buffer: WorkingBuffer) -> (WorkingBuffer, RewriteReport) {
        let started = Instant::now();
        let mut report = RewriteReport::default();
        let mut skipped = Vec::new();
        let catalog = self.catalog.as_ref();
        let detector = SectionDetector::new(catalog);

        let buffer = word_split::repair_split_words(catalog, buffer, &mut skipped);
        if self.over_budget(started, "word-split repair") {
            return self.finish(buffer, report, skipped, true);
        }

        let buffer = headers::split_on_headers(catalog, buffer, &mut skipped);
        if self.over_budget(started, "header splitting") {
            return self.finish(buffer, report, skipped, true);
        }

        let sections = detector.classify_lines(&buffer);
        debug!(
            "detected {} section spans over {} lines",
            spans(&sections).len(),
            buffer.len()
        );

        let (buffer, sections) =
            BlockExpander::new(catalog, &self.config).expand_blocks(buffer, &sections, &mut skipped);
        report.sections = spans(&sections);
        if self.over_budget(started, "block expansion") {
            return self.finish(buffer, report, skipped, true);
        }

        let buffer = whitespace::normalize_whitespace(
            catalog,
            &self.config,
            buffer,
            &sections,
            &mut skipped,
        );
        // blank-line collapsing shifts line indices
        report.sections = detector.detect(&buffer);

        self.finish(buffer, report, skipped, false)
    }

    fn over_budget(&self, started: Instant, stage: &str) -> bool {
        let Some(budget) = self.config.time_budget else {
            return false;
        };
        let elapsed = started.elapsed();
        if elapsed > budget {
            warn!(
                "formatting exceeded its {} budget after {stage} ({}); remaining stages skipped",
                millis(budget),
                millis(elapsed)
            );
            return true;
        }
        false
    }

    fn finish(
        &self,
        buffer: WorkingBuffer,
        mut report: RewriteReport,
        skipped: Vec<String>,
        budget_exceeded: bool,
    ) -> (WorkingBuffer, RewriteReport) {
        if report.sections.is_empty() && !buffer.is_empty() {
            report.sections = SectionDetector::new(&self.catalog).detect(&buffer);
        }
        report.skipped_rules = skipped;
        report.budget_exceeded = budget_exceeded;
        (buffer, report)
    }
}

fn millis(duration: Duration) -> String {
    format!("{:.1}ms", duration.as_secs_f64() * 1000.0)
}
