//! ConfigLoader facade: builds the layered source stack and deserializes it.

use super::sources;
use super::SemtreeConfig;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File};
use std::path::Path;
use tracing::debug;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a working directory.
    ///
    /// Precedence (lowest to highest): defaults, global file, workspace file,
    /// `SEMTREE__*` environment variables.
    pub fn load(workspace_root: &Path) -> Result<SemtreeConfig, ConfigError> {
        let builder = builder_with_defaults()?;
        let builder = sources::add_global_file(builder)?;
        let builder = sources::add_workspace_file(builder, workspace_root)?;
        let builder = sources::add_environment(builder)?;
        let config: SemtreeConfig = builder.build()?.try_deserialize()?;
        debug!(?config, "Configuration loaded");
        Ok(config)
    }

    /// Load configuration from a specific file; environment still overrides.
    pub fn load_from_file(path: &Path) -> Result<SemtreeConfig, ConfigError> {
        let builder = builder_with_defaults()?.add_source(File::from(path).required(true));
        let builder = sources::add_environment(builder)?;
        builder.build()?.try_deserialize()
    }
}

/// Create a Config builder with defaults applied.
fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("semantic.threshold", super::DEFAULT_THRESHOLD)?
        .set_default("hashing.algorithm", "sha256")?
        .set_default("embedding.provider", "hashed")?
        .set_default("storage.state_dir", ".")
}
