//! Error types for the semtree integrity system.

use std::path::PathBuf;
use thiserror::Error;

/// Storage-related errors: filesystem reads and persisted state files.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Storage I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to (de)serialize {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },
}

/// Failure reported by an embedding oracle for a single input.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct EmbeddingError(pub String);

/// Operation-level errors surfaced by build and verify.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Embedding oracle unavailable: {0}")]
    EmbeddingUnavailable(String),

    #[error("Embedding failed for {path}: {reason}")]
    Embedding { path: String, reason: String },

    #[error("No baseline found at {0}. Run `semtree build` first.")]
    MissingBaseline(PathBuf),

    #[error("Folder does not exist: {0}")]
    FolderNotFound(PathBuf),

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
