//! Error types for Regscout.

use std::path::PathBuf;
use thiserror::Error;

/// Library-level error type for Regscout operations.
#[derive(Error, Debug)]
pub enum RegscoutError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid chunking configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to read document {}: {source}", path.display())]
    DocumentRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Embedding service error: {0}")]
    EmbeddingService(String),

    #[error("No index found at {}", .0.display())]
    IndexNotFound(PathBuf),

    #[error("Index at {} is corrupt: {reason}", path.display())]
    IndexCorrupt { path: PathBuf, reason: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Generation service error: {0}")]
    GenerationService(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl RegscoutError {
    pub(crate) fn corrupt(path: &std::path::Path, reason: impl Into<String>) -> Self {
        RegscoutError::IndexCorrupt {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for Regscout operations.
pub type Result<T> = std::result::Result<T, RegscoutError>;
