//! Semantic classification of leaf changes
//!
//! A file counts as changed only when its meaning drifts: the cosine
//! similarity between the stored embedding and the fresh one falls below the
//! threshold. Byte-level changes that keep the meaning leave the stored record
//! untouched, so its digest can go stale until a later drift replaces it.

use crate::config::DEFAULT_THRESHOLD;
use crate::embedding::{cosine_similarity, Embedder};
use crate::error::ApiError;
use crate::store::{FlatIndex, LeafRecord};
use crate::tree::hasher::HashAlgorithm;
use crate::types::Digest;
use serde::Serialize;
use tracing::debug;

/// Outcome of comparing a file against its stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Unchanged,
    NewFile,
    SemanticChange,
}

impl Classification {
    /// Whether the record store was updated for this file.
    pub fn is_changed(self) -> bool {
        !matches!(self, Classification::Unchanged)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Classification::Unchanged => "unchanged",
            Classification::NewFile => "new",
            Classification::SemanticChange => "semantic change",
        }
    }
}

/// Threshold rule: similarity strictly below the threshold is drift.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SemanticPolicy {
    threshold: f64,
}

impl SemanticPolicy {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn is_drift(&self, similarity: f64) -> bool {
        similarity < self.threshold
    }
}

impl Default for SemanticPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassifyOutcome {
    pub classification: Classification,
    /// Digest of the bytes just read, whether or not it was stored.
    pub digest: Digest,
    /// Similarity to the stored embedding; `None` for new files.
    pub similarity: Option<f64>,
}

/// Classifies files against a [`FlatIndex`] and updates it in place.
pub struct Classifier<'a> {
    embedder: &'a dyn Embedder,
    policy: SemanticPolicy,
    algorithm: HashAlgorithm,
}

impl<'a> Classifier<'a> {
    pub fn new(embedder: &'a dyn Embedder, policy: SemanticPolicy, algorithm: HashAlgorithm) -> Self {
        Self {
            embedder,
            policy,
            algorithm,
        }
    }

    /// Classify one file and update its record unless it is unchanged.
    ///
    /// `text` is the decoded form of `raw`; the digest is always taken over
    /// `raw`.
    pub fn classify(
        &self,
        index: &mut FlatIndex,
        path: &str,
        raw: &[u8],
        text: &str,
    ) -> Result<ClassifyOutcome, ApiError> {
        let digest = self.algorithm.digest_bytes(raw);
        let embedding = self.embedder.embed(text).map_err(|e| ApiError::Embedding {
            path: path.to_string(),
            reason: e.to_string(),
        })?;

        let Some(previous) = index.get(path) else {
            index.replace(path, LeafRecord::new(digest.clone(), embedding));
            return Ok(ClassifyOutcome {
                classification: Classification::NewFile,
                digest,
                similarity: None,
            });
        };

        let similarity = cosine_similarity(&previous.embedding, &embedding);
        debug!(path, similarity, "Cosine similarity");

        let classification = if self.policy.is_drift(similarity) {
            index.replace(path, LeafRecord::new(digest.clone(), embedding));
            Classification::SemanticChange
        } else {
            Classification::Unchanged
        };

        Ok(ClassifyOutcome {
            classification,
            digest,
            similarity: Some(similarity),
        })
    }
}
