//! Configuration module
//!
//! `clinote.toml` carries formatter thresholds, output defaults and worker
//! settings. Every table is optional.

use anyhow::{Context, Result};
use clinote_core::api::defaults;
use clinote_core::FormatterConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// CLI configuration structure
#[derive(Debug, Deserialize, Serialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    /// Formatter thresholds
    #[serde(default)]
    pub formatting: FormattingConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,

    /// Performance configuration
    #[serde(default)]
    pub performance: PerformanceConfig,
}

impl CliConfig {
    /// Read a configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&source)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Read the file when given, defaults otherwise
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }
}

/// Formatter thresholds, mirrored onto [`FormatterConfig`]
#[derive(Debug, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FormattingConfig {
    /// Custom catalog file, overridden by --catalog
    pub catalog: Option<PathBuf>,
    pub dense_line_threshold: usize,
    pub subsection_threshold: usize,
    pub short_block_threshold: usize,
    pub min_gap_spaces: usize,
    pub collapse_run: usize,
    /// Wrap long examination lines (unset = no wrapping)
    pub wrap_width: Option<usize>,
    /// Per-note time budget in milliseconds (unset = unbounded)
    pub time_budget_ms: Option<u64>,
}

impl Default for FormattingConfig {
    fn default() -> Self {
        Self {
            catalog: None,
            dense_line_threshold: defaults::DENSE_LINE_THRESHOLD,
            subsection_threshold: defaults::SUBSECTION_THRESHOLD,
            short_block_threshold: defaults::SHORT_BLOCK_THRESHOLD,
            min_gap_spaces: defaults::MIN_GAP_SPACES,
            collapse_run: defaults::COLLAPSE_RUN,
            wrap_width: None,
            time_budget_ms: None,
        }
    }
}

impl FormattingConfig {
    /// Build and validate the formatter configuration
    pub fn to_formatter_config(&self) -> Result<FormatterConfig> {
        let config = FormatterConfig::builder()
            .dense_line_threshold(self.dense_line_threshold)
            .subsection_threshold(self.subsection_threshold)
            .short_block_threshold(self.short_block_threshold)
            .min_gap_spaces(self.min_gap_spaces)
            .collapse_run(self.collapse_run)
            .wrap_width(self.wrap_width)
            .time_budget(self.time_budget_ms.map(Duration::from_millis))
            .build()?;
        Ok(config)
    }
}

/// Output-related configuration
#[derive(Debug, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Format used when -f is not given
    pub default_format: String,

    /// Pretty print JSON output
    pub pretty_json: bool,

    /// Extension written by batch mode
    pub extension: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_format: "text".to_string(),
            pretty_json: true,
            extension: "txt".to_string(),
        }
    }
}

/// Performance-related configuration
#[derive(Debug, Deserialize, Serialize, PartialEq, Default)]
#[serde(default, deny_unknown_fields)]
pub struct PerformanceConfig {
    /// Number of worker threads (0 = auto)
    pub worker_threads: usize,
}

impl PerformanceConfig {
    /// Worker count, resolving 0 to the number of CPUs
    pub fn resolve_threads(&self, override_threads: Option<usize>) -> usize {
        match override_threads.unwrap_or(self.worker_threads) {
            0 => num_cpus::get(),
            n => n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_match_core() {
        let config = CliConfig::default();
        let formatter = config.formatting.to_formatter_config().unwrap();
        assert_eq!(formatter, FormatterConfig::default());
        assert_eq!(config.output.default_format, "text");
    }

    #[test]
    fn test_partial_tables() {
        let config: CliConfig = toml::from_str(
            r#"
[formatting]
dense_line_threshold = 80
wrap_width = 72

[performance]
worker_threads = 3
"#,
        )
        .unwrap();

        assert_eq!(config.formatting.dense_line_threshold, 80);
        assert_eq!(
            config.formatting.subsection_threshold,
            defaults::SUBSECTION_THRESHOLD
        );
        let formatter = config.formatting.to_formatter_config().unwrap();
        assert_eq!(formatter.wrap_width(), Some(72));
        assert_eq!(config.performance.resolve_threads(None), 3);
        assert_eq!(config.performance.resolve_threads(Some(1)), 1);
    }

    #[test]
    fn test_time_budget_in_millis() {
        let config: CliConfig = toml::from_str("[formatting]\ntime_budget_ms = 250\n").unwrap();
        let formatter = config.formatting.to_formatter_config().unwrap();
        assert_eq!(formatter.time_budget(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_invalid_thresholds_rejected() {
        let config: CliConfig = toml::from_str("[formatting]\ncollapse_run = 1\n").unwrap();
        let err = config.formatting.to_formatter_config().unwrap_err();
        assert!(err.to_string().contains("collapse_run"));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let result: Result<CliConfig, _> = toml::from_str("[formatting]\nlanguage = \"en\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_auto_threads() {
        let config = PerformanceConfig::default();
        assert!(config.resolve_threads(None) >= 1);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[output]\ndefault_format = \"json\"").unwrap();

        let config = CliConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.output.default_format, "json");
        assert!(config.output.pretty_json);

        assert_eq!(CliConfig::load(None).unwrap(), CliConfig::default());
    }

    #[test]
    fn test_missing_file_has_context() {
        let err = CliConfig::from_file(Path::new("/nonexistent/clinote.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
