use std::path::PathBuf;

use thiserror::Error;

/// Errors that mean a rule or its configuration is broken, as opposed to
/// repository content violating a convention.
#[derive(Debug, Error)]
pub enum ConformError {
    #[error("No files found matching '{glob}'.")]
    NoFilesFound { glob: String },

    #[error("invalid file glob '{glob}': {reason}")]
    InvalidFileGlob { glob: String, reason: String },

    #[error("invalid ignore path glob '{pattern}': {reason}")]
    InvalidGlob { pattern: String, reason: String },

    #[error("invalid exclusion pattern '{pattern}': {reason}")]
    InvalidRegex { pattern: String, reason: String },

    #[error("failed to parse {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{}: {reason}", path.display())]
    InvalidConfig { path: PathBuf, reason: String },

    #[error("{}: ignore entry {index} is missing required field '{field}'", path.display())]
    MissingField {
        path: PathBuf,
        index: usize,
        field: &'static str,
    },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConformError>;
