//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::ApiError;

/// Map domain/service errors to a single line for CLI output.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::MissingBaseline(_) | ApiError::FolderNotFound(_) => e.to_string(),
        ApiError::EmbeddingUnavailable(_) | ApiError::ConfigError(_) => {
            format!("{}\nCheck the [embedding] and [semantic] sections of semtree.toml.", e)
        }
        _ => format!("Error: {}", e),
    }
}
