//! Semtree CLI Binary
//!
//! Command-line interface for building and verifying semantic Merkle trees.

use clap::Parser;
use semtree::cli::{map_error, Cli, RunContext};
use semtree::config::ConfigLoader;
use semtree::logging::{init_logging, LoggingConfig};
use std::path::Path;
use std::process;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    let logging_config = build_logging_config(&cli);
    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("semtree starting");

    let context = match RunContext::new(Path::new("."), cli.config.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Error initializing: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    };

    match context.execute(&cli.command) {
        Ok(output) => {
            info!("Command completed successfully");
            print!("{}", output);
        }
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    }
}

/// Build logging configuration from CLI args and config file
fn build_logging_config(cli: &Cli) -> LoggingConfig {
    let file_config = match cli.config {
        Some(ref config_path) => ConfigLoader::load_from_file(config_path)
            .map(|c| c.logging)
            .unwrap_or_default(),
        None => ConfigLoader::load(Path::new("."))
            .map(|c| c.logging)
            .unwrap_or_default(),
    };
    apply_cli_overrides(cli, file_config)
}

/// Layer CLI logging flags over the file's `[logging]` table.
///
/// Logging stays off unless the file enables it or `--verbose`/`--log-level`
/// asks for it.
fn apply_cli_overrides(cli: &Cli, mut config: LoggingConfig) -> LoggingConfig {
    if cli.verbose || cli.log_level.is_some() {
        config.enabled = true;
    }

    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    } else if cli.verbose && config.level == "info" {
        config.level = "debug".to_string();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        config.output = output.clone();
    }
    if let Some(ref file) = cli.log_file {
        config.file = file.clone();
    }

    config
}
