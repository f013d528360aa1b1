//! Process command implementation

use super::FormatterArgs;
use crate::error::CliError;
use crate::input::{resolve_patterns, FileReader};
use crate::output::{JsonFormatter, MarkdownFormatter, OutputFormatter, TextFormatter};
use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

/// Arguments for the process command
#[derive(Debug, Args)]
pub struct ProcessArgs {
    /// Input files or patterns (supports glob)
    #[arg(short, long, value_name = "FILE/PATTERN", required = true)]
    pub input: Vec<String>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (default: from config, else text)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    #[command(flatten)]
    pub formatter: FormatterArgs,
}

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Formatted notes only
    Text,
    /// Original and formatted text with metadata
    Json,
    /// One fenced block per note
    Markdown,
}

impl OutputFormat {
    /// Parse the `default_format` value of a config file
    pub fn from_config(name: &str) -> Result<Self> {
        <Self as ValueEnum>::from_str(name, true)
            .map_err(|_| CliError::ConfigError(format!("unknown output format '{name}'")).into())
    }
}

impl ProcessArgs {
    /// Execute the process command
    pub fn execute(&self) -> Result<()> {
        log::info!("Starting note formatting");
        log::debug!("Arguments: {:?}", self);

        let config = self.formatter.load_config()?;
        let format = match self.format {
            Some(format) => format,
            None => OutputFormat::from_config(&config.output.default_format)?,
        };
        let pipeline = self.formatter.build_pipeline(&config)?;
        let files = resolve_patterns(&self.input)?;

        let writer: Box<dyn Write + Send + Sync> = match &self.output {
            Some(path) => Box::new(BufWriter::new(File::create(path).with_context(|| {
                format!("Failed to create output file: {}", path.display())
            })?)),
            None => Box::new(io::stdout()),
        };
        let mut output: Box<dyn OutputFormatter> = match format {
            OutputFormat::Text => Box::new(TextFormatter::new(writer, files.len() > 1)),
            OutputFormat::Json => Box::new(JsonFormatter::new(writer, config.output.pretty_json)),
            OutputFormat::Markdown => Box::new(MarkdownFormatter::new(writer)),
        };

        for path in &files {
            let note = FileReader::read_note_as(path, self.formatter.encoding)?;
            let record = pipeline.format(path, note.text);
            log::info!(
                "{}: {} -> {} lines in {:.2} ms",
                record.path,
                record.metadata.input_lines,
                record.metadata.output_lines,
                record.metadata.elapsed_ms
            );
            if record.metadata.budget_exceeded {
                log::warn!("{}: time budget exceeded, output partially formatted", record.path);
            }
            output.format_note(&record)?;
        }

        output.finish()
    }
}
