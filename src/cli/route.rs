//! CLI route: single route table and run context. Dispatches to the integrity engine and presentation.

use crate::cli::parse::{Commands, Mode, OutputFormat};
use crate::cli::presentation::{
    format_flat_build, format_semantic_report, format_structural_report, format_tree_build,
};
use crate::config::{ConfigLoader, SemtreeConfig};
use crate::error::ApiError;
use crate::verify::IntegrityEngine;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// Runtime context for CLI execution: loaded config and the engine built from it.
pub struct RunContext {
    engine: IntegrityEngine,
}

impl RunContext {
    /// Create run context from the working directory and optional config path.
    ///
    /// Configuration and embedder problems surface here, before any scan.
    pub fn new(workspace_root: &Path, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = load_config(workspace_root, config_path.as_deref())?;
        let engine = IntegrityEngine::from_config(config)?;
        Ok(Self { engine })
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        let started = Instant::now();
        let result = match command {
            Commands::Build {
                folder,
                mode,
                format,
            } => self.handle_build(folder, *mode, *format),
            Commands::Verify {
                folder,
                mode,
                format,
            } => self.handle_verify(folder, *mode, *format),
        };
        info!(
            ok = result.is_ok(),
            duration_ms = started.elapsed().as_millis(),
            "Command finished"
        );
        result
    }

    fn handle_build(
        &self,
        folder: &Path,
        mode: Mode,
        format: OutputFormat,
    ) -> Result<String, ApiError> {
        match mode {
            Mode::Semantic => format_flat_build(&self.engine.build_flat(folder)?, format),
            Mode::Exact => format_tree_build(&self.engine.build_tree(folder)?, format),
        }
    }

    fn handle_verify(
        &self,
        folder: &Path,
        mode: Mode,
        format: OutputFormat,
    ) -> Result<String, ApiError> {
        match mode {
            Mode::Semantic => format_semantic_report(&self.engine.verify_flat(folder)?, format),
            Mode::Exact => format_structural_report(&self.engine.verify_tree(folder)?, format),
        }
    }
}

/// Load and validate configuration. An explicit file replaces the file layers.
pub(crate) fn load_config(
    workspace_root: &Path,
    config_path: Option<&Path>,
) -> Result<SemtreeConfig, ApiError> {
    let config = match config_path {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load(workspace_root)?,
    };

    config.validate().map_err(|errors| {
        let details: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        ApiError::ConfigError(details.join("; "))
    })?;

    Ok(config)
}
