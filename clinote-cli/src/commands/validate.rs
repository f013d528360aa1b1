//! Validate command implementation

use anyhow::Result;
use clap::Args;
use clinote_core::{PatternCatalog, RuleCategory};
use std::path::PathBuf;

/// Arguments for the validate command
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Path to the catalog file to validate
    #[arg(long, value_name = "FILE", required = true)]
    pub catalog: PathBuf,
}

impl ValidateArgs {
    /// Execute the validate command
    pub fn execute(&self) -> Result<()> {
        println!("Validating catalog: {}", self.catalog.display());

        match PatternCatalog::from_file(&self.catalog) {
            Ok(catalog) => {
                println!("✓ Catalog is valid!");
                print!("{}", describe(&catalog));
                Ok(())
            }
            Err(e) => {
                println!("✗ Catalog is invalid!");
                println!("  Error: {e}");
                Err(anyhow::anyhow!("Validation failed: {}", e))
            }
        }
    }
}

/// Human-readable summary of a compiled catalog
pub fn describe(catalog: &PatternCatalog) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "  Name: {} (version {})\n",
        catalog.name(),
        catalog.version()
    ));
    out.push_str(&format!(
        "  Rules: {}, header patterns: {}, sections: {}\n",
        catalog.len(),
        catalog.headers().pattern_count(),
        catalog.sections().len()
    ));
    for category in RuleCategory::ALL {
        let count = catalog.rules(Some(category)).len();
        if count > 0 {
            out.push_str(&format!("    {:<22} {count}\n", category.as_str()));
        }
    }

    let conflicts = catalog.header_conflicts();
    if !conflicts.is_empty() {
        out.push_str(&format!(
            "  Header conflicts (longest match wins): {}\n",
            conflicts.len()
        ));
        for conflict in conflicts {
            out.push_str(&format!("    {conflict}\n"));
        }
    }
    out
}
