//! Local sentence-embedding model via fastembed.

use super::{l2_normalize, Embedder};
use crate::error::{ApiError, EmbeddingError};
use crate::types::Embedding;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use parking_lot::Mutex;

/// Runs a sentence-transformer model in-process. The model is downloaded on
/// first use and loaded once per process.
pub struct LocalEmbedder {
    model_name: String,
    dims: usize,
    model: Mutex<TextEmbedding>,
}

impl LocalEmbedder {
    pub fn new(model_name: &str) -> Result<Self, ApiError> {
        let (model, dims) = resolve_model(model_name)?;
        let text_embedding =
            TextEmbedding::try_new(InitOptions::new(model).with_show_download_progress(false))
                .map_err(|e| {
                    ApiError::EmbeddingUnavailable(format!(
                        "Failed to initialize local embedding model {}: {}",
                        model_name, e
                    ))
                })?;

        Ok(Self {
            model_name: model_name.to_string(),
            dims,
            model: Mutex::new(text_embedding),
        })
    }
}

fn resolve_model(name: &str) -> Result<(EmbeddingModel, usize), ApiError> {
    match name.to_lowercase().as_str() {
        "all-minilm-l6-v2" => Ok((EmbeddingModel::AllMiniLML6V2, 384)),
        "bge-small-en-v1.5" => Ok((EmbeddingModel::BGESmallENV15, 384)),
        "bge-base-en-v1.5" => Ok((EmbeddingModel::BGEBaseENV15, 768)),
        "multilingual-e5-small" => Ok((EmbeddingModel::MultilingualE5Small, 384)),
        other => Err(ApiError::ConfigError(format!(
            "Unknown local embedding model: {}",
            other
        ))),
    }
}

impl Embedder for LocalEmbedder {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn dims(&self) -> usize {
        self.dims
    }

    fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        let mut model = self.model.lock();
        let mut vectors = model
            .embed(vec![text], None)
            .map_err(|e| EmbeddingError(format!("Local embedding failed: {}", e)))?;
        let vector = vectors
            .pop()
            .ok_or_else(|| EmbeddingError("Empty embedding response".to_string()))?;
        Ok(l2_normalize(vector))
    }
}
