//! Export-catalog command implementation

use anyhow::{Context, Result};
use clap::Args;
use clinote_core::catalog::BUILTIN_CATALOG;
use std::fs;
use std::path::PathBuf;

/// Arguments for the export-catalog command
#[derive(Debug, Args)]
pub struct ExportCatalogArgs {
    /// Output file path
    #[arg(short, long, value_name = "FILE", required = true)]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

impl ExportCatalogArgs {
    /// Execute the export-catalog command
    pub fn execute(&self) -> Result<()> {
        if self.output.exists() && !self.force {
            anyhow::bail!(
                "{} already exists (use --force to overwrite)",
                self.output.display()
            );
        }

        fs::write(&self.output, BUILTIN_CATALOG)
            .with_context(|| format!("Failed to write to {}", self.output.display()))?;

        println!("✓ Built-in catalog written to {}", self.output.display());
        println!();
        println!("Next steps:");
        println!("1. Edit the catalog to add headers, word splits or sub-labels");
        println!("2. Validate your catalog:");
        println!("   clinote validate --catalog {}", self.output.display());
        println!("3. Use it for formatting:");
        println!(
            "   clinote process -i note.txt --catalog {}",
            self.output.display()
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinote_core::PatternCatalog;
    use tempfile::TempDir;

    #[test]
    fn test_export_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("catalog.toml");

        let args = ExportCatalogArgs {
            output: output.clone(),
            force: false,
        };
        args.execute().unwrap();

        let exported = PatternCatalog::from_file(&output).unwrap();
        let builtin = PatternCatalog::builtin().unwrap();
        assert_eq!(exported.len(), builtin.len());
    }

    #[test]
    fn test_refuses_to_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("catalog.toml");
        fs::write(&output, "keep me").unwrap();

        let args = ExportCatalogArgs {
            output: output.clone(),
            force: false,
        };
        assert!(args.execute().is_err());
        assert_eq!(fs::read_to_string(&output).unwrap(), "keep me");

        let forced = ExportCatalogArgs {
            output: output.clone(),
            force: true,
        };
        forced.execute().unwrap();
        assert_ne!(fs::read_to_string(&output).unwrap(), "keep me");
    }
}
