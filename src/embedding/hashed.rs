//! Deterministic feature-hashing embedder.

use super::{l2_normalize, Embedder};
use crate::error::{ApiError, EmbeddingError};
use crate::types::Embedding;

/// Bag-of-words embedder: each lowercase alphanumeric token is hashed with
/// BLAKE3 into one signed bucket, and the bucket counts are L2-normalized.
///
/// Texts sharing most of their words land close together, texts with
/// disjoint vocabularies land near orthogonal. Whitespace and punctuation
/// edits do not move the vector at all.
#[derive(Debug, Clone)]
pub struct HashedEmbedder {
    dims: usize,
}

impl HashedEmbedder {
    pub fn new(dims: usize) -> Result<Self, ApiError> {
        if dims == 0 {
            return Err(ApiError::ConfigError(
                "embedding.dims must be greater than zero".to_string(),
            ));
        }
        Ok(Self { dims })
    }

    fn bucket(&self, token: &str) -> (usize, f32) {
        let hash = blake3::hash(token.as_bytes());
        let bytes = hash.as_bytes();
        let mut index_bytes = [0u8; 8];
        index_bytes.copy_from_slice(&bytes[..8]);
        let index = (u64::from_le_bytes(index_bytes) % self.dims as u64) as usize;
        let sign = if bytes[8] & 1 == 0 { 1.0 } else { -1.0 };
        (index, sign)
    }
}

impl Embedder for HashedEmbedder {
    fn model_name(&self) -> &str {
        "hashed-bow"
    }

    fn dims(&self) -> usize {
        self.dims
    }

    fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        let mut vector = vec![0.0f32; self.dims];
        let mut seen_token = false;

        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let (index, sign) = self.bucket(&token.to_lowercase());
            vector[index] += sign;
            seen_token = true;
        }

        // Text without tokens still needs a unit vector.
        if !seen_token {
            let (index, sign) = self.bucket("");
            vector[index] = sign;
        }

        Ok(l2_normalize(vector))
    }
}
