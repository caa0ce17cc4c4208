//! CLI presentation: text and json formatters for build and verify results.

use crate::cli::parse::OutputFormat;
use crate::error::{ApiError, StorageError};
use crate::semantic::Classification;
use crate::tree::walker::SkippedEntry;
use crate::verify::{FlatBuildReport, SemanticReport, StructuralReport, TreeBuildReport};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde::Serialize;

fn to_json<T: Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value).map_err(|e| {
        ApiError::StorageError(StorageError::Serialization {
            context: "report",
            details: e.to_string(),
        })
    })
}

/// Format a section heading with bold/underline.
fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

fn format_skipped(out: &mut String, skipped: &[SkippedEntry]) {
    if skipped.is_empty() {
        return;
    }
    out.push_str(&format!("\n{}\n", format_section_heading("Skipped")));
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Path", "Reason"]);
    for entry in skipped {
        table.add_row(vec![entry.path.display().to_string(), entry.reason.clone()]);
    }
    out.push_str(&format!("{}\n", table));
}

fn status_word(classification: Classification) -> String {
    match classification {
        Classification::Unchanged => format!("{}", classification.as_str().green()),
        Classification::NewFile => format!("{}", classification.as_str().yellow()),
        Classification::SemanticChange => format!("{}", classification.as_str().red()),
    }
}

pub fn format_flat_build(report: &FlatBuildReport, format: OutputFormat) -> Result<String, ApiError> {
    if format == OutputFormat::Json {
        return to_json(report);
    }
    let mut out = format!(
        "Flat index built for {}\n  Files: {}\n  Root hash: {}\n",
        report.root.display(),
        report.file_count,
        report.root_hash
    );
    format_skipped(&mut out, &report.skipped);
    Ok(out)
}

pub fn format_tree_build(report: &TreeBuildReport, format: OutputFormat) -> Result<String, ApiError> {
    if format == OutputFormat::Json {
        return to_json(report);
    }
    let mut out = format!(
        "Merkle tree built for {}\n  Nodes: {}\n  Leaves: {}\n  Root hash: {}\n",
        report.root.display(),
        report.node_count,
        report.leaf_count,
        report.root_hash
    );
    format_skipped(&mut out, &report.skipped);
    Ok(out)
}

pub fn format_semantic_report(
    report: &SemanticReport,
    format: OutputFormat,
) -> Result<String, ApiError> {
    if format == OutputFormat::Json {
        return to_json(report);
    }

    let mut out = format!("{}\n", format_section_heading("Semantic verify"));
    out.push_str(&format!("  Folder: {}\n", report.root.display()));
    out.push_str(&format!("  Previous root: {}\n", report.previous_root_hash));
    out.push_str(&format!("  Current root:  {}\n\n", report.root_hash));

    if report.files.is_empty() {
        out.push_str("No files scanned.\n");
    } else {
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        table.set_header(vec!["Path", "Status", "Similarity"]);
        for verdict in &report.files {
            let similarity = verdict
                .similarity
                .map(|s| format!("{:.4}", s))
                .unwrap_or_else(|| "-".to_string());
            table.add_row(vec![
                verdict.path.clone(),
                status_word(verdict.classification),
                similarity,
            ]);
        }
        out.push_str(&format!("{}\n", table));
    }

    if !report.missing.is_empty() {
        out.push_str(&format!("\n{}\n", format_section_heading("Missing")));
        for path in &report.missing {
            out.push_str(&format!("  - {}\n", path));
        }
    }

    format_skipped(&mut out, &report.skipped);

    let changed = report.changed_paths();
    if changed.is_empty() {
        out.push_str(&format!("\n{}\n", "No semantic changes detected".green()));
    } else {
        out.push_str(&format!(
            "\n{}\n",
            format!("{} file(s) changed in meaning or new", changed.len()).red()
        ));
    }
    Ok(out)
}

pub fn format_structural_report(
    report: &StructuralReport,
    format: OutputFormat,
) -> Result<String, ApiError> {
    if format == OutputFormat::Json {
        return to_json(report);
    }

    let mut out = format!("{}\n", format_section_heading("Exact verify"));
    out.push_str(&format!("  Folder: {}\n", report.root.display()));
    out.push_str(&format!("  Previous root: {}\n", report.previous_root_hash));
    out.push_str(&format!("  Current root:  {}\n", report.root_hash));

    if report.is_intact() {
        out.push_str(&format!(
            "\n{}\n",
            "Merkle tree integrity verified - no changes detected".green()
        ));
        format_skipped(&mut out, &report.skipped);
        return Ok(out);
    }

    out.push('\n');
    for field in &report.mismatches {
        out.push_str(&format!("  {}\n", field.message().red()));
    }

    if !report.appeared.is_empty() || !report.disappeared.is_empty() {
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        table.set_header(vec!["Path", "Change"]);
        for path in &report.disappeared {
            table.add_row(vec![path.clone(), "removed or modified".to_string()]);
        }
        for path in &report.appeared {
            table.add_row(vec![path.clone(), "added or modified".to_string()]);
        }
        out.push_str(&format!("\n{}\n", table));
    }

    format_skipped(&mut out, &report.skipped);
    out.push_str(&format!("\n{}\n", "Integrity check failed".red()));
    Ok(out)
}
