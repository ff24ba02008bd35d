//! Error handling module for domsub
//!
//! Provides centralized error handling with proper error types using thiserror.
//! Every precondition failure maps to its own variant so callers can match on it.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for script generation
#[derive(Error, Debug)]
pub enum DomsubError {
    /// An input list does not exist
    #[error("Input not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The output script already exists and will not be overwritten
    #[error("Output already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    /// A rule line could not be split into pattern and replacement
    #[error("Malformed rule on line {line}: {reason}")]
    MalformedRule { line: usize, reason: String },

    /// A file list entry cannot be embedded in the generated script
    #[error("Malformed file entry on line {line}: {reason}")]
    MalformedFileEntry { line: usize, reason: String },

    /// IO errors while reading inputs or writing the script
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Structured rule lists that fail to parse
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for domsub operations
pub type Result<T> = std::result::Result<T, DomsubError>;

impl DomsubError {
    /// Create a malformed rule error
    pub fn malformed_rule(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRule {
            line,
            reason: reason.into(),
        }
    }

    /// Create a malformed file entry error
    pub fn malformed_file_entry(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedFileEntry {
            line,
            reason: reason.into(),
        }
    }

    /// Wrap an IO error with the path it occurred on
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DomsubError::NotFound(PathBuf::from("domain_regex.list"));
        assert_eq!(err.to_string(), "Input not found: domain_regex.list");

        let err = DomsubError::AlreadyExists(PathBuf::from("gen.sh"));
        assert_eq!(err.to_string(), "Output already exists: gen.sh");

        let err = DomsubError::malformed_rule(3, "missing '#' separator");
        assert_eq!(
            err.to_string(),
            "Malformed rule on line 3: missing '#' separator"
        );
    }

    #[test]
    fn test_io_error_keeps_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = DomsubError::io("out/gen.sh", io_err);
        assert!(matches!(err, DomsubError::Io { .. }));
        assert!(err.to_string().contains("out/gen.sh"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<Vec<u8>>("not json").unwrap_err();
        let err: DomsubError = json_err.into();
        assert!(matches!(err, DomsubError::Json(_)));
    }
}
