//! Error types
//!
//! Only configuration problems are errors. Formatting itself never fails for
//! string input: unmatched text passes through unchanged.

use std::path::PathBuf;
use thiserror::Error;

/// Error type for catalog loading and formatter construction
#[derive(Debug, Error)]
pub enum Error {
    /// Formatter configuration rejected by validation
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Catalog TOML could not be parsed
    #[error("Failed to parse catalog: {0}")]
    CatalogParse(#[from] toml::de::Error),

    /// Catalog parsed but is structurally invalid
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    /// A rule's pattern failed to compile
    #[error("Invalid pattern in rule '{rule_id}': {source}")]
    InvalidPattern {
        /// Identifier of the offending rule
        rule_id: String,
        /// Underlying regex error
        #[source]
        source: regex::Error,
    },

    /// Catalog file could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// Path that was being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Result type for catalog and formatter construction
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_pattern_display_names_rule() {
        let source = regex::Regex::new("(unclosed").unwrap_err();
        let error = Error::InvalidPattern {
            rule_id: "headers.broken".to_string(),
            source,
        };
        assert!(error
            .to_string()
            .starts_with("Invalid pattern in rule 'headers.broken'"));
    }

    #[test]
    fn test_io_error_display_includes_path() {
        let error = Error::Io {
            path: PathBuf::from("/missing/catalog.toml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(error.to_string().contains("/missing/catalog.toml"));
    }
}
