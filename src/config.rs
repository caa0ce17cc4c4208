//! Configuration System
//!
//! Layered configuration for the integrity engine: built-in defaults, a global
//! file, a workspace file and `SEMTREE__*` environment overrides. The
//! similarity threshold and digest algorithm are explicit fields here rather
//! than constants so callers and tests can exercise boundary behavior.

use crate::logging::LoggingConfig;
use crate::tree::hasher::HashAlgorithm;
use crate::tree::walker::WalkerConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod facade;
mod sources;

pub use facade::ConfigLoader;

/// Reference similarity threshold: below this, content has drifted in meaning.
pub const DEFAULT_THRESHOLD: f64 = 0.70;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SemtreeConfig {
    #[serde(default)]
    pub semantic: SemanticConfig,

    #[serde(default)]
    pub hashing: HashingConfig,

    #[serde(default)]
    pub embedding: EmbeddingConfig,

    #[serde(default)]
    pub walker: WalkerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticConfig {
    /// Minimum cosine similarity for two versions of a file to count as equivalent
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

impl Default for SemanticConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HashingConfig {
    #[serde(default)]
    pub algorithm: HashAlgorithm,
}

/// Embedding oracle selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// hashed, local, or disabled
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model name for the local provider
    #[serde(default = "default_model")]
    pub model: String,

    /// Vector dimensionality for the hashed provider
    #[serde(default = "default_dims")]
    pub dims: usize,
}

fn default_provider() -> String {
    "hashed".to_string()
}

fn default_model() -> String {
    "all-minilm-l6-v2".to_string()
}

fn default_dims() -> usize {
    384
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            dims: default_dims(),
        }
    }
}

/// Locations of the persisted state files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,

    /// Flat leaf-record index (semantic mode)
    #[serde(default = "default_index_file")]
    pub index_file: String,

    /// Hierarchical snapshot (exact mode)
    #[serde(default = "default_tree_file")]
    pub tree_file: String,
}

fn default_state_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_index_file() -> String {
    "index.json".to_string()
}

fn default_tree_file() -> String {
    "merkle_tree.json".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            state_dir: default_state_dir(),
            index_file: default_index_file(),
            tree_file: default_tree_file(),
        }
    }
}

impl StorageConfig {
    pub fn index_path(&self) -> PathBuf {
        self.state_dir.join(&self.index_file)
    }

    pub fn tree_path(&self) -> PathBuf {
        self.state_dir.join(&self.tree_file)
    }
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Semantic(String),
    Embedding(String),
    Storage(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Semantic(msg) => write!(f, "semantic: {}", msg),
            ValidationError::Embedding(msg) => write!(f, "embedding: {}", msg),
            ValidationError::Storage(msg) => write!(f, "storage: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl SemtreeConfig {
    /// Validate the entire configuration, collecting every problem.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        let threshold = self.semantic.threshold;
        if !threshold.is_finite() || !(-1.0..=1.0).contains(&threshold) {
            errors.push(ValidationError::Semantic(format!(
                "threshold must be within [-1, 1], got {}",
                threshold
            )));
        }

        if !matches!(
            self.embedding.provider.as_str(),
            "hashed" | "local" | "disabled"
        ) {
            errors.push(ValidationError::Embedding(format!(
                "unknown provider '{}' (expected hashed, local or disabled)",
                self.embedding.provider
            )));
        }
        if self.embedding.dims == 0 {
            errors.push(ValidationError::Embedding(
                "dims must be greater than zero".to_string(),
            ));
        }

        if self.storage.index_file.is_empty() {
            errors.push(ValidationError::Storage(
                "index_file cannot be empty".to_string(),
            ));
        }
        if self.storage.tree_file.is_empty() {
            errors.push(ValidationError::Storage(
                "tree_file cannot be empty".to_string(),
            ));
        }
        if !self.storage.index_file.is_empty() && self.storage.index_file == self.storage.tree_file
        {
            errors.push(ValidationError::Storage(
                "index_file and tree_file must differ".to_string(),
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
