//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Projects are shown by their display label and title first; URLs and
//! layout numbers are secondary context on indented lines. The output reads
//! as a content inventory while still pointing back at the files behind it.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Projects
//! 001 (01) Harbour Lights → project/harbour-lights/
//!     Cover: /projects/harbour/cover.jpg
//!     Description: Night photography along the working harbour.
//!     Sheet: 4 assets in 3 rows
//!         Row 1 (1 column, gap 0px): 100
//!         Row 2 (2 columns, gap 10px): 60 / 40
//!         Row 3 (1 column, gap 0px): 100
//!     Details: 3 sections, 2 facts
//!
//! About
//!     About (about.md)
//!
//! Site
//!     Fixture Studio <https://studio.example.com>
//! ```
//!
//! ## Rows
//!
//! ```text
//! (01) Harbour Lights
//! Row 1 (1 column, gap 0px)
//!     100% /projects/harbour/hero.jpg
//! Row 2 (2 columns, gap 10px)
//!     60% /projects/harbour/3_60_A.jpg
//!     40% /projects/harbour/3_40_B.jpg
//! ```
//!
//! ## Enrich
//!
//! ```text
//! Enriched 3 projects: 5 updated, 2 skipped, 1 failed
//!     Failed: /projects/reel/missing.mp4 (IO error: ...)
//! ```
//!
//! ## Build
//!
//! ```text
//! → index.html
//! → project/harbour-lights/index.html
//! → sitemap.xml
//!
//! Generated 1 project page, copied 12 files
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure.

use crate::content::Site;
use crate::generate::GenerateSummary;
use crate::probe::EnrichReport;
use crate::sheet::{SheetRow, build_sheet_rows};
use crate::types::{Asset, Project};

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 column`, `3 rows`, `2 facts`.
fn plural(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{n} {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// The URL an asset is known by: `src`, else its first source.
fn asset_url(asset: &Asset) -> &str {
    asset
        .src
        .as_deref()
        .filter(|s| !s.is_empty())
        .or_else(|| asset.first_source())
        .unwrap_or("(no source)")
}

fn project_header(project: &Project) -> String {
    format!("{} {}", project.label, project.title)
}

// ============================================================================
// Check
// ============================================================================

pub fn format_check_output(site: &Site) -> Vec<String> {
    let mut lines = vec!["Projects".to_string()];

    if site.projects.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }
    for (i, project) in site.projects.iter().enumerate() {
        lines.push(format!(
            "{} {} → project/{}/",
            format_index(i + 1),
            project_header(project),
            project.id
        ));
        if !project.cover.is_empty() {
            lines.push(format!("{}Cover: {}", indent(1), project.cover));
        }
        if !project.description.is_empty() {
            lines.push(format!(
                "{}Description: {}",
                indent(1),
                truncate_desc(&project.description, 60)
            ));
        }
        let assets = project.decorated_sheet_assets();
        let rows = build_sheet_rows(&assets);
        lines.push(format!(
            "{}Sheet: {} in {}",
            indent(1),
            plural(assets.len(), "asset"),
            plural(rows.len(), "row")
        ));
        for (r, row) in rows.iter().enumerate() {
            let widths: Vec<String> = row
                .widths
                .iter()
                .map(|w| round_width(*w).to_string())
                .collect();
            lines.push(format!(
                "{}{}: {}",
                indent(2),
                row_summary(r + 1, row),
                widths.join(" / ")
            ));
        }
        if !project.detail_sections.is_empty() || !project.facts.is_empty() {
            lines.push(format!(
                "{}Details: {}, {}",
                indent(1),
                plural(project.detail_sections.len(), "section"),
                plural(project.facts.len(), "fact")
            ));
        }
    }

    if let Some(about) = &site.about {
        lines.push(String::new());
        lines.push("About".to_string());
        lines.push(format!("{}{} (about.md)", indent(1), about.title));
    }

    let meta = &site.config.site;
    lines.push(String::new());
    lines.push("Site".to_string());
    lines.push(format!("{}{} <{}>", indent(1), meta.title, meta.base_url));

    lines
}

pub fn print_check_output(site: &Site) {
    for line in format_check_output(site) {
        println!("{}", line);
    }
}

// ============================================================================
// Rows
// ============================================================================

pub fn format_rows_output(project: &Project, rows: &[SheetRow<'_>]) -> Vec<String> {
    let mut lines = vec![project_header(project)];
    if rows.is_empty() {
        lines.push(format!("{}(no sheet assets)", indent(1)));
    }
    for (i, row) in rows.iter().enumerate() {
        lines.push(row_summary(i + 1, row));
        for (asset, width) in row.assets.iter().zip(&row.widths) {
            lines.push(format!("{}{}% {}", indent(1), round_width(*width), asset_url(asset)));
        }
    }
    lines
}

/// `Row 2 (2 columns, gap 10px)`
fn row_summary(position: usize, row: &SheetRow<'_>) -> String {
    format!(
        "Row {} ({}, gap {}px)",
        position,
        plural(row.columns, "column"),
        row.gap
    )
}

/// Widths print with at most two decimals.
fn round_width(width: f64) -> f64 {
    (width * 100.0).round() / 100.0
}

pub fn print_rows_output(project: &Project, rows: &[SheetRow<'_>]) {
    for line in format_rows_output(project, rows) {
        println!("{}", line);
    }
}

// ============================================================================
// Enrich
// ============================================================================

pub fn format_enrich_output(report: &EnrichReport) -> Vec<String> {
    let mut lines = vec![format!(
        "Enriched {}: {} updated, {} skipped, {} failed",
        plural(report.projects, "project"),
        report.updated,
        report.skipped,
        report.failures.len()
    )];
    for (url, error) in &report.failures {
        lines.push(format!("{}Failed: {} ({})", indent(1), url, error));
    }
    lines
}

pub fn print_enrich_output(report: &EnrichReport) {
    for line in format_enrich_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

pub fn format_generate_output(summary: &GenerateSummary) -> Vec<String> {
    let mut lines: Vec<String> = summary.pages.iter().map(|p| format!("→ {p}")).collect();
    let project_pages = summary
        .pages
        .iter()
        .filter(|p| p.starts_with("project/"))
        .count();
    lines.push(String::new());
    lines.push(format!(
        "Generated {}, copied {}",
        plural(project_pages, "project page"),
        plural(summary.copied_files, "file")
    ));
    lines
}

pub fn print_generate_output(summary: &GenerateSummary) {
    for line in format_generate_output(summary) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
