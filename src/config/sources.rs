//! Configuration sources: global file, workspace file, environment.

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment, File};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Workspace-local config file name.
pub const WORKSPACE_CONFIG_FILE: &str = "semtree.toml";

/// Path to the global config file (`$XDG_CONFIG_HOME/semtree/config.toml` on Linux).
pub fn global_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "semtree").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Add the global config file if it exists.
pub fn add_global_file(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    match global_config_path() {
        Some(path) if path.exists() => {
            debug!(config_path = %path.display(), "Using global configuration");
            Ok(builder.add_source(File::from(path).required(false)))
        }
        _ => Ok(builder),
    }
}

/// Add `<workspace>/semtree.toml` if it exists.
pub fn add_workspace_file(
    builder: ConfigBuilder<DefaultState>,
    workspace_root: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let path = workspace_root.join(WORKSPACE_CONFIG_FILE);
    if path.exists() {
        debug!(config_path = %path.display(), "Using workspace configuration");
        return Ok(builder.add_source(File::from(path).required(false)));
    }
    Ok(builder)
}

/// Environment overlay: `SEMTREE__SECTION__KEY`, e.g. `SEMTREE__SEMANTIC__THRESHOLD=0.8`.
pub fn add_environment(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(builder.add_source(
        Environment::with_prefix("SEMTREE")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    ))
}
