//! Error handling for the CLI application

use std::fmt;

/// CLI-specific error conditions
#[derive(Debug)]
pub enum CliError {
    /// File not found or inaccessible
    FileNotFound(String),
    /// Invalid file pattern
    InvalidPattern(String),
    /// Configuration error
    ConfigError(String),
    /// Unknown text encoding label
    UnknownEncoding(String),
    /// Batch finished with failed files under --strict
    BatchFailed { failed: usize, total: usize },
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::FileNotFound(path) => write!(f, "File not found: {path}"),
            CliError::InvalidPattern(pattern) => write!(f, "Invalid file pattern: {pattern}"),
            CliError::ConfigError(msg) => write!(f, "Configuration error: {msg}"),
            CliError::UnknownEncoding(label) => write!(f, "Unknown encoding: {label}"),
            CliError::BatchFailed { failed, total } => {
                write!(f, "{failed} of {total} files failed to format")
            }
        }
    }
}

impl std::error::Error for CliError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_not_found_error_display() {
        let error = CliError::FileNotFound("note.txt".to_string());
        assert_eq!(error.to_string(), "File not found: note.txt");
    }

    #[test]
    fn test_invalid_pattern_error_display() {
        let error = CliError::InvalidPattern("[invalid".to_string());
        assert_eq!(error.to_string(), "Invalid file pattern: [invalid");
    }

    #[test]
    fn test_config_error_display() {
        let error = CliError::ConfigError("unknown output format".to_string());
        assert_eq!(
            error.to_string(),
            "Configuration error: unknown output format"
        );
    }

    #[test]
    fn test_batch_failed_display() {
        let error = CliError::BatchFailed {
            failed: 2,
            total: 10,
        };
        assert_eq!(error.to_string(), "2 of 10 files failed to format");
    }

    #[test]
    fn test_wraps_into_anyhow() {
        let failure: anyhow::Result<()> = Err(CliError::UnknownEncoding("klingon".into()).into());
        let err = failure.unwrap_err();
        assert!(err.to_string().contains("klingon"));
        assert!(err.downcast_ref::<CliError>().is_some());
    }
}
