//! Embedding oracle seam.
//!
//! The integrity core never talks to a model directly. It receives a
//! [`Embedder`] at construction time and only asks it for vectors:
//! - **[`HashedEmbedder`]** is deterministic and model-free (feature hashing
//!   over word tokens); it is the default provider and the test oracle.
//! - **`LocalEmbedder`** runs all-MiniLM-L6-v2 through fastembed when the
//!   `local-embeddings` feature is enabled.
//!
//! Also provides the vector helpers the classifier needs:
//! [`cosine_similarity`], [`l2_normalize`] and [`decode_text`].

mod hashed;
#[cfg(feature = "local-embeddings")]
mod local;

pub use hashed::HashedEmbedder;
#[cfg(feature = "local-embeddings")]
pub use local::LocalEmbedder;

use crate::config::EmbeddingConfig;
use crate::error::{ApiError, EmbeddingError};
use crate::types::Embedding;
use std::borrow::Cow;
use tracing::info;

/// Maps decoded text to a fixed-length, L2-normalized vector.
///
/// Implementations must be deterministic for identical input and always
/// return vectors of length [`Embedder::dims`].
pub trait Embedder: Send + Sync {
    /// Model identifier (e.g. `"all-minilm-l6-v2"`).
    fn model_name(&self) -> &str;
    /// Vector dimensionality (e.g. `384`).
    fn dims(&self) -> usize;
    fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError>;
}

/// Instantiate the embedder named by `config.provider`.
///
/// Any failure here is a startup configuration error: no scan has begun and
/// nothing has been written.
pub fn create_embedder(config: &EmbeddingConfig) -> Result<Box<dyn Embedder>, ApiError> {
    let embedder: Box<dyn Embedder> = match config.provider.as_str() {
        "hashed" => Box::new(HashedEmbedder::new(config.dims)?),
        #[cfg(feature = "local-embeddings")]
        "local" => Box::new(LocalEmbedder::new(&config.model)?),
        #[cfg(not(feature = "local-embeddings"))]
        "local" => {
            return Err(ApiError::EmbeddingUnavailable(
                "the local provider requires building with --features local-embeddings"
                    .to_string(),
            ))
        }
        "disabled" => {
            return Err(ApiError::EmbeddingUnavailable(
                "embedding provider is disabled".to_string(),
            ))
        }
        other => {
            return Err(ApiError::ConfigError(format!(
                "Unknown embedding provider: {}",
                other
            )))
        }
    };

    info!(
        provider = %config.provider,
        model = embedder.model_name(),
        dims = embedder.dims(),
        "Embedding oracle ready"
    );
    Ok(embedder)
}

/// Cosine similarity of two vectors, in `[-1.0, 1.0]`.
///
/// Computed in `f64`. Returns `0.0` for empty vectors, vectors of different
/// lengths, or a zero vector, so a changed model always reads as drift.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b.iter()) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < f64::EPSILON {
        return 0.0;
    }
    (dot / denom).clamp(-1.0, 1.0)
}

/// Scale a vector to unit length. Zero vectors are returned unchanged.
pub fn l2_normalize(mut v: Embedding) -> Embedding {
    let norm = v.iter().map(|x| f64::from(*x) * f64::from(*x)).sum::<f64>().sqrt();
    if norm > f64::EPSILON {
        for x in v.iter_mut() {
            *x = (f64::from(*x) / norm) as f32;
        }
    }
    v
}

/// Decode file bytes as text for embedding.
///
/// UTF-8 first; otherwise every byte maps to the Latin-1 code point of the
/// same value, which cannot fail.
pub fn decode_text(raw: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(raw) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => Cow::Owned(raw.iter().map(|&b| char::from(b)).collect()),
    }
}
