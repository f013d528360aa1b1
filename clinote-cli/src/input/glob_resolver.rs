//! File pattern resolution using glob

use crate::error::CliError;
use anyhow::{Context, Result};
use glob::{glob, Pattern};
use std::path::{Path, PathBuf};

/// Resolve file patterns to actual file paths
pub fn resolve_patterns(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for pattern in patterns {
        let paths = glob(pattern).map_err(|_| CliError::InvalidPattern(pattern.clone()))?;

        for path_result in paths {
            let path =
                path_result.with_context(|| format!("Error resolving pattern: {}", pattern))?;

            if path.is_file() {
                files.push(path);
            }
        }
    }

    if files.is_empty() {
        anyhow::bail!("No files found matching the provided patterns");
    }

    // Remove duplicates and sort
    files.sort();
    files.dedup();

    Ok(files)
}

/// Every file under `root` with the given extension, at any depth
///
/// An empty tree is not an error; the batch command reports it.
pub fn collect_tree(root: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(CliError::FileNotFound(root.display().to_string()).into());
    }

    let extension = extension.trim_start_matches('.');
    let pattern = format!(
        "{}/**/*.{}",
        Pattern::escape(&root.to_string_lossy()),
        Pattern::escape(extension)
    );

    let mut files = Vec::new();
    for path_result in glob(&pattern).map_err(|_| CliError::InvalidPattern(pattern.clone()))? {
        let path = path_result.with_context(|| format!("Error walking {}", root.display()))?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    Ok(files)
}
