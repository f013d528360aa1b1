//! Batch command implementation
//!
//! Formats every note under an input directory and writes the results to the
//! same relative paths under an output directory. A file that cannot be read
//! or written is logged and counted; the rest of the batch carries on.

use super::{FormatterArgs, Pipeline};
use crate::error::CliError;
use crate::input::{collect_tree, FileReader, TextEncoding};
use crate::progress::ProgressReporter;
use anyhow::{Context, Result};
use clap::Args;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Arguments for the batch command
#[derive(Debug, Args)]
pub struct BatchArgs {
    /// Directory of raw notes
    #[arg(value_name = "INPUT_DIR")]
    pub input_dir: PathBuf,

    /// Directory receiving the formatted tree
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Extension of note files (default: from config, else txt)
    #[arg(short, long, value_name = "EXT")]
    pub extension: Option<String>,

    /// Worker threads (default: from config, else one per CPU)
    #[arg(short = 'j', long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Exit with an error if any file fails
    #[arg(long)]
    pub strict: bool,

    #[command(flatten)]
    pub formatter: FormatterArgs,
}

/// Outcome of a batch run
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// Files found under the input directory
    pub total: usize,
    /// Files formatted and written
    pub formatted: usize,
    /// Files that failed, in path order
    pub failed: Vec<PathBuf>,
}

impl BatchArgs {
    /// Execute the batch command
    pub fn execute(&self, quiet: bool) -> Result<BatchSummary> {
        let summary = self.run(quiet)?;

        if !quiet {
            println!(
                "Formatted {} of {} notes into {}",
                summary.formatted,
                summary.total,
                self.output_dir.display()
            );
            for path in &summary.failed {
                println!("  failed: {}", path.display());
            }
        }

        if self.strict && !summary.failed.is_empty() {
            return Err(CliError::BatchFailed {
                failed: summary.failed.len(),
                total: summary.total,
            }
            .into());
        }
        Ok(summary)
    }

    /// Format the tree and collect the outcome
    pub fn run(&self, quiet: bool) -> Result<BatchSummary> {
        let config = self.formatter.load_config()?;
        let pipeline = self.formatter.build_pipeline(&config)?;
        let extension = self
            .extension
            .clone()
            .unwrap_or_else(|| config.output.extension.clone());

        let mut files = collect_tree(&self.input_dir, &extension)?;
        // The output tree may live inside the input tree
        if let Ok(output_dir) = self.output_dir.canonicalize() {
            files.retain(|path| {
                path.canonicalize()
                    .map_or(true, |path| !path.starts_with(&output_dir))
            });
        }
        if files.is_empty() {
            log::warn!(
                "No .{} files under {}",
                extension.trim_start_matches('.'),
                self.input_dir.display()
            );
            return Ok(BatchSummary::default());
        }

        let threads = config.performance.resolve_threads(self.jobs);
        log::info!("Formatting {} notes on {} threads", files.len(), threads);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .context("Failed to start worker pool")?;

        let mut reporter = ProgressReporter::new(quiet);
        reporter.init_files(files.len() as u64);

        let encoding = self.formatter.encoding;
        let results: Vec<(PathBuf, bool)> = pool.install(|| {
            files
                .par_iter()
                .map(|path| {
                    let name = path.display().to_string();
                    match self.format_file(&pipeline, path, encoding) {
                        Ok(()) => {
                            reporter.file_completed(&name);
                            (path.clone(), true)
                        }
                        Err(e) => {
                            log::warn!("{name}: {e:#}");
                            reporter.file_failed(&name);
                            (path.clone(), false)
                        }
                    }
                })
                .collect()
        });
        reporter.finish();

        let total = results.len();
        let failed: Vec<PathBuf> = results
            .into_iter()
            .filter_map(|(path, ok)| (!ok).then_some(path))
            .collect();
        Ok(BatchSummary {
            total,
            formatted: total - failed.len(),
            failed,
        })
    }

    fn format_file(&self, pipeline: &Pipeline, path: &Path, encoding: TextEncoding) -> Result<()> {
        let relative = relative_path(&self.input_dir, path)
            .with_context(|| format!("{} is outside the input tree", path.display()))?;
        let target = self.output_dir.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let note = FileReader::read_note_as(path, encoding)?;
        let record = pipeline.format(path, note.text);
        let mut text = record.formatted;
        if !text.is_empty() {
            text.push('\n');
        }
        fs::write(&target, text)
            .with_context(|| format!("Failed to write {}", target.display()))?;
        Ok(())
    }
}

/// Path of `path` relative to `root`, tolerating spelling differences such
/// as a leading `./`
fn relative_path(root: &Path, path: &Path) -> Option<PathBuf> {
    if let Ok(relative) = path.strip_prefix(root) {
        return Some(relative.to_path_buf());
    }
    let root = root.canonicalize().ok()?;
    let path = path.canonicalize().ok()?;
    path.strip_prefix(&root).ok().map(Path::to_path_buf)
}
