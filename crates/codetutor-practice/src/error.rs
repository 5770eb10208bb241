//! Error types for the practice repository

use std::path::PathBuf;

/// Result type alias using the practice repository's error type
pub type Result<T> = std::result::Result<T, PracticeError>;

/// Failure to open a fixture directory
#[derive(Debug, thiserror::Error)]
pub enum PracticeError {
    /// Fixture directory missing or not a directory
    #[error("practice data directory not found: {0}")]
    MissingDataDir(PathBuf),

    /// Fixture file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Fixture file is not valid JSON of the expected shape
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
