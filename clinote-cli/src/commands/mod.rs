//! CLI command implementations

use crate::backend::CommandBackend;
use crate::config::CliConfig;
use crate::error::CliError;
use crate::input::TextEncoding;
use crate::output::NoteRecord;
use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use clinote_core::{FallbackFormatter, FormatMetadata, NoteFormatter, RuleCategory};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

pub mod batch;
pub mod export_catalog;
pub mod list;
pub mod process;
pub mod validate;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Format note files or glob patterns
    Process(process::ProcessArgs),

    /// Format a directory tree of notes into a mirrored output tree
    Batch(batch::BatchArgs),

    /// Load and compile a catalog file, reporting its rules and conflicts
    Validate(validate::ValidateArgs),

    /// Write the built-in catalog for customization
    ExportCatalog(export_catalog::ExportCatalogArgs),

    /// List catalog contents
    List {
        #[command(subcommand)]
        subcommand: ListCommands,

        /// Catalog file to list instead of the built-in one
        #[arg(long, value_name = "FILE", global = true)]
        catalog: Option<PathBuf>,
    },
}

/// List subcommands
#[derive(Debug, Subcommand)]
pub enum ListCommands {
    /// Sections the catalog recognizes, with their header patterns
    Sections,

    /// Rules in application order
    Rules {
        /// Only rules of this category (e.g. section-header, vitals)
        #[arg(long)]
        category: Option<RuleCategory>,
    },
}

impl Commands {
    /// Run the selected command
    pub fn execute(&self, quiet: bool) -> Result<()> {
        match self {
            Commands::Process(args) => args.execute(),
            Commands::Batch(args) => args.execute(quiet).map(|_| ()),
            Commands::Validate(args) => args.execute(),
            Commands::ExportCatalog(args) => args.execute(),
            Commands::List {
                subcommand,
                catalog,
            } => list::execute(subcommand, catalog.as_deref()),
        }
    }
}

/// Initialize logging based on verbosity level
pub fn init_logging(verbose: u8, quiet: bool) {
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    if !quiet {
        let result =
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
                .try_init();
        if result.is_err() {
            log::debug!("logger already initialized");
        }
    }
}

/// Formatter options shared by `process` and `batch`
#[derive(Debug, Args)]
pub struct FormatterArgs {
    /// Catalog file replacing the built-in catalog
    #[arg(long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// External formatter command (reads stdin, writes stdout); the
    /// rule-based formatter takes over whenever it fails
    #[arg(long, value_name = "COMMAND")]
    pub backend_command: Option<String>,

    /// Milliseconds the external formatter may run before it is killed
    #[arg(long, value_name = "MS", default_value_t = 30_000)]
    pub backend_timeout: u64,

    /// Input encoding label, or "auto" for UTF-8 with a Windows-1252 fallback
    #[arg(long, value_name = "LABEL", default_value = "auto")]
    pub encoding: TextEncoding,
}

impl FormatterArgs {
    /// Load the configuration file, if any
    pub fn load_config(&self) -> Result<CliConfig> {
        CliConfig::load(self.config.as_deref())
    }

    /// Build the formatting pipeline from flags and configuration
    pub fn build_pipeline(&self, config: &CliConfig) -> Result<Pipeline> {
        let formatter_config = config.formatting.to_formatter_config()?;
        let mut builder = NoteFormatter::builder().config(formatter_config);

        let catalog = self.catalog.as_ref().or(config.formatting.catalog.as_ref());
        if let Some(path) = catalog {
            log::info!("Using catalog {}", path.display());
            builder = builder.catalog_file(path);
        }
        let rules = builder.build().context("Failed to build formatter")?;

        match &self.backend_command {
            None => Ok(Pipeline::Rules(rules)),
            Some(command_line) => {
                let backend = CommandBackend::parse(command_line).ok_or_else(|| {
                    CliError::ConfigError("--backend-command must not be empty".into())
                })?
                .with_timeout(Duration::from_millis(self.backend_timeout));
                log::info!(
                    "Using backend '{}' with a {}ms timeout",
                    backend.program(),
                    self.backend_timeout
                );
                Ok(Pipeline::Backend(FallbackFormatter::new(
                    Box::new(backend),
                    rules,
                )))
            }
        }
    }
}

/// Formatter stack used by the commands
#[derive(Debug)]
pub enum Pipeline {
    /// Rule-based formatter only
    Rules(NoteFormatter),
    /// Alternate backend with rule-based fallback
    Backend(FallbackFormatter),
}

impl Pipeline {
    /// Format one note into an output record
    pub fn format(&self, path: &Path, original: String) -> NoteRecord {
        let path = path.display().to_string();
        match self {
            Pipeline::Rules(formatter) => {
                let output = formatter.format_with_report(&original);
                NoteRecord {
                    path,
                    original,
                    formatted: output.text,
                    backend: None,
                    metadata: output.metadata,
                }
            }
            Pipeline::Backend(fallback) => {
                let started = Instant::now();
                let (formatted, used) = fallback.format_with_backend(&original);
                let metadata = FormatMetadata {
                    input_chars: original.chars().count(),
                    output_chars: formatted.chars().count(),
                    input_lines: original.lines().count(),
                    output_lines: formatted.lines().count(),
                    elapsed_ms: started.elapsed().as_secs_f64() * 1000.0,
                    ..FormatMetadata::default()
                };
                NoteRecord {
                    path,
                    original,
                    formatted,
                    backend: Some(used),
                    metadata,
                }
            }
        }
    }
}
