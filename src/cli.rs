//! CLI domain: parse, route, output, and presentation only.
//! No domain orchestration; a single route table dispatches to the integrity engine.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands, Mode, OutputFormat};
pub use presentation::{
    format_flat_build, format_semantic_report, format_structural_report, format_tree_build,
};
pub use route::RunContext;
