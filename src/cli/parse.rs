//! CLI parse: clap types for semtree. No behavior; definitions only.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Semtree CLI - Merkle integrity trees with semantic change detection
#[derive(Parser)]
#[command(name = "semtree")]
#[command(about = "Detect byte-level and meaning-level changes to a directory using Merkle trees")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (overrides default config loading)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, global = true, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a folder and write a fresh baseline
    Build {
        /// Folder to fingerprint
        folder: PathBuf,
        /// Composition strategy
        #[arg(long, value_enum, default_value_t = Mode::Semantic)]
        mode: Mode,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Compare a folder against its baseline, then re-baseline
    Verify {
        /// Folder to check
        folder: PathBuf,
        /// Composition strategy
        #[arg(long, value_enum, default_value_t = Mode::Semantic)]
        mode: Mode,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

/// Which tree the command operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Flat fold with embedding-based change classification
    Semantic,
    /// Hierarchical directory tree, any byte change counts
    Exact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
