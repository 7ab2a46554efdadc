//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A numeric setting could not be parsed.
    #[error("failed to parse {name}='{value}': {source}")]
    NumberParseError {
        name: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// The match threshold must stay within the 0-100 score range.
    #[error("invalid match threshold '{value}': must be between 0 and 100")]
    InvalidThreshold { value: String },

    /// The diversity weight must stay within 0.0-1.0.
    #[error("invalid diversity weight '{value}': must be between 0.0 and 1.0")]
    InvalidDiversityWeight { value: String },

    /// Specified path does not exist on the filesystem.
    #[error("path does not exist: {}", .path.display())]
    PathNotFound { path: PathBuf },

    /// Path exists but is not a file (when a file was expected).
    #[error("path is not a file: {}", .path.display())]
    NotAFile { path: PathBuf },
}
