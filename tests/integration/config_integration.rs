//! Configuration loading and the CLI route table end to end

use super::test_utils::{Fixture, FOX, REVENUE};
use semtree::cli::{Commands, Mode, OutputFormat, RunContext};
use semtree::config::ConfigLoader;
use semtree::error::ApiError;
use std::fs;
use std::path::{Path, PathBuf};

fn write_config(fixture: &Fixture, extra: &str) -> PathBuf {
    let path = fixture.state.path().join("semtree.toml");
    fs::write(
        &path,
        format!(
            "[storage]\nstate_dir = {:?}\n{}",
            fixture.state.path().display().to_string(),
            extra
        ),
    )
    .unwrap();
    path
}

#[test]
fn test_workspace_file_is_picked_up() {
    let fixture = Fixture::new();
    write_config(&fixture, "[semantic]\nthreshold = 0.9\n");

    let config = ConfigLoader::load(fixture.state.path()).unwrap();
    assert_eq!(config.semantic.threshold, 0.9);
    assert_eq!(config.storage.state_dir, fixture.state.path());
}

#[test]
fn test_run_context_rejects_invalid_config() {
    let fixture = Fixture::new();
    let config = write_config(&fixture, "[semantic]\nthreshold = 2.0\n");

    let result = RunContext::new(Path::new("."), Some(config));
    assert!(matches!(result, Err(ApiError::ConfigError(_))));
}

#[test]
fn test_disabled_embedder_fails_before_scan() {
    let fixture = Fixture::new();
    let config = write_config(&fixture, "[embedding]\nprovider = \"disabled\"\n");

    let result = RunContext::new(Path::new("."), Some(config));
    assert!(matches!(result, Err(ApiError::EmbeddingUnavailable(_))));
}

#[test]
fn test_cli_build_then_verify_semantic_json() {
    let fixture = Fixture::new();
    fixture.write("doc.txt", FOX);
    let config = write_config(&fixture, "");
    let context = RunContext::new(Path::new("."), Some(config)).unwrap();

    let built = context
        .execute(&Commands::Build {
            folder: fixture.root().to_path_buf(),
            mode: Mode::Semantic,
            format: OutputFormat::Json,
        })
        .unwrap();
    let built: serde_json::Value = serde_json::from_str(&built).unwrap();
    assert_eq!(built["file_count"], 1);

    fixture.write("doc.txt", REVENUE);
    let verified = context
        .execute(&Commands::Verify {
            folder: fixture.root().to_path_buf(),
            mode: Mode::Semantic,
            format: OutputFormat::Json,
        })
        .unwrap();
    let verified: serde_json::Value = serde_json::from_str(&verified).unwrap();
    assert_eq!(verified["files"][0]["classification"], "semantic_change");
    assert_eq!(verified["previous_root_hash"], built["root_hash"]);
}

#[test]
fn test_cli_verify_exact_text_reports_mismatch() {
    let fixture = Fixture::new();
    fixture.write("doc.txt", FOX);
    let config = write_config(&fixture, "");
    let context = RunContext::new(Path::new("."), Some(config)).unwrap();

    context
        .execute(&Commands::Build {
            folder: fixture.root().to_path_buf(),
            mode: Mode::Exact,
            format: OutputFormat::Text,
        })
        .unwrap();
    fixture.write("doc.txt", REVENUE);

    let out = context
        .execute(&Commands::Verify {
            folder: fixture.root().to_path_buf(),
            mode: Mode::Exact,
            format: OutputFormat::Text,
        })
        .unwrap();
    assert!(out.contains("Root hash mismatch"));
    assert!(out.contains("Hierarchy mismatch"));
}
