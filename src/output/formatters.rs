//! Report rendering for text, JSON and CSV

use ansi_term::Colour::{Blue, Cyan, Green, Red, Yellow};
use ansi_term::Style;

use crate::error::{OrphanError, Result};
use crate::models::analysis::AnalysisReport;
use crate::models::config::ReachabilityPolicy;

/// Paint `text` with `style` when colours are on
fn paint(use_colors: bool, style: Style, text: &str) -> String {
    if use_colors {
        style.paint(text).to_string()
    } else {
        text.to_string()
    }
}

/// Human-readable report
pub fn format_report_text(report: &AnalysisReport, use_colors: bool, verbose: bool) -> String {
    let mut output = String::new();
    let summary = &report.summary;

    output.push_str(&paint(use_colors, Blue.bold(), "Unused File Analysis"));
    output.push_str("\n\n");

    output.push_str(&format!("Root: {}\n", report.root.display()));
    output.push_str(&format!("Policy: {}\n", report.policy));
    if !report.entries.is_empty() {
        let entries: Vec<String> = report.entries.iter().map(|e| report.display_path(e)).collect();
        output.push_str(&format!("Entries: {}\n", entries.join(", ")));
    }
    output.push_str(&format!("Files analysed: {}\n", summary.inventory_files));
    output.push_str(&format!("Used: {}\n", summary.used_files));
    output.push_str(&format!(
        "Unused: {} ({:.1}%)\n",
        summary.unused_files,
        summary.unused_percentage()
    ));
    output.push_str(&format!("Scan duration: {}\n", summary.format_duration()));

    if report.unused.is_empty() {
        output.push_str(&format!("\n{}\n", paint(use_colors, Green.bold(), "No unused files found")));
    } else {
        let heading = if report.dry_run {
            "[Dry Run] Unused files:"
        } else {
            "Unused files:"
        };
        output.push_str(&format!("\n{}\n", paint(use_colors, Yellow.bold(), heading)));
        for path in &report.unused {
            output.push_str(&format!("  {}\n", report.display_path(path)));
        }
    }

    if !report.unresolved.is_empty() {
        output.push_str(&format!(
            "\n{}\n",
            paint(
                use_colors,
                Red.bold(),
                "Unresolved references (the target may already have been deleted):"
            )
        ));
        for reference in &report.unresolved {
            output.push_str(&format!(
                "  {} in {}",
                paint(use_colors, Style::new().bold(), &reference.specifier),
                report.display_path(&reference.from)
            ));
            if verbose {
                output.push_str(&format!(" ({})", reference.reason));
            }
            output.push('\n');
        }
    }

    if !report.deleted.is_empty() {
        output.push_str(&format!("\n{}\n", paint(use_colors, Green.bold(), "Deleted:")));
        for path in &report.deleted {
            output.push_str(&format!("  {}\n", report.display_path(path)));
        }
    }

    if !report.deletion_failures.is_empty() {
        output.push_str(&format!("\n{}\n", paint(use_colors, Red.bold(), "Could not delete:")));
        for failure in &report.deletion_failures {
            output.push_str(&format!("  {}: {}\n", report.display_path(&failure.path), failure.error));
        }
    }

    if !report.warnings.is_empty() {
        output.push_str(&format!(
            "\n{}\n",
            paint(use_colors, Yellow.normal(), &format!("Warnings: {}", report.warnings.len()))
        ));
        if verbose {
            for warning in &report.warnings {
                output.push_str(&format!(
                    "  [{}] {}: {}\n",
                    warning.kind,
                    report.display_path(&warning.path),
                    warning.message
                ));
            }
        }
    }

    if verbose {
        let graph = &summary.graph;
        output.push_str(&format!("\n{}\n", paint(use_colors, Cyan.bold(), "Graph:")));
        output.push_str(&format!("  Nodes: {}\n", graph.total_nodes));
        output.push_str(&format!("  Edges: {}\n", graph.total_edges));
        output.push_str(&format!("  Files read: {}\n", graph.visited_files));
        if let Some(file) = &graph.max_fan_in_file {
            output.push_str(&format!(
                "  Most referenced: {} ({})\n",
                report.display_path(file),
                graph.max_fan_in
            ));
        }
        if let Some(file) = &graph.max_fan_out_file {
            output.push_str(&format!(
                "  Most references: {} ({})\n",
                report.display_path(file),
                graph.max_fan_out
            ));
        }

        if !report.cycles.is_empty() {
            output.push_str(&format!("\n{}\n", paint(use_colors, Cyan.bold(), "Import cycles:")));
            for cycle in &report.cycles {
                let files: Vec<String> = cycle.iter().map(|p| report.display_path(p)).collect();
                output.push_str(&format!("  {}\n", files.join(" <-> ")));
            }
        }
    }

    if report.policy == ReachabilityPolicy::EdgeTarget {
        output.push_str(&format!(
            "\n{}\n",
            paint(
                use_colors,
                Style::new().dimmed(),
                "Note: edge-target policy counts any referenced file as used, so files that only \
                 reference each other are not reported. Use --policy entry-rooted with --entry for \
                 true reachability."
            )
        ));
    }

    output
}

/// One-line summary for quiet mode
pub fn format_report_quiet(report: &AnalysisReport) -> String {
    let mut output = format!(
        "Unused: {}, Unresolved: {}\n",
        report.summary.unused_files, report.summary.unresolved_references
    );
    for path in &report.unused {
        output.push_str(&format!("{}\n", report.display_path(path)));
    }
    output
}

/// The whole report as pretty JSON
pub fn format_report_json(report: &AnalysisReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(|source| OrphanError::JsonSerialize { source })
}

/// `kind,path,detail` rows, paths relative to the root
pub fn format_report_csv(report: &AnalysisReport) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["kind", "path", "detail"])?;

    for path in &report.unused {
        write_row(&mut writer, "unused", &report.display_path(path), "")?;
    }
    for reference in &report.unresolved {
        write_row(&mut writer, "unresolved", &report.display_path(&reference.from), &reference.specifier)?;
    }
    for warning in &report.warnings {
        let detail = format!("{}: {}", warning.kind, warning.message);
        write_row(&mut writer, "warning", &report.display_path(&warning.path), &detail)?;
    }
    for cycle in &report.cycles {
        let files: Vec<String> = cycle.iter().map(|p| report.display_path(p)).collect();
        let first = files.first().cloned().unwrap_or_default();
        write_row(&mut writer, "cycle", &first, &files.join(" <-> "))?;
    }
    for path in &report.deleted {
        write_row(&mut writer, "deleted", &report.display_path(path), "")?;
    }
    for failure in &report.deletion_failures {
        write_row(&mut writer, "deletion_failed", &report.display_path(&failure.path), &failure.error)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| OrphanError::Csv { source: e.into_error().into() })?;
    String::from_utf8(bytes).map_err(|source| OrphanError::CsvSerialize { source })
}

fn write_row(writer: &mut csv::Writer<Vec<u8>>, kind: &str, path: &str, detail: &str) -> Result<()> {
    writer.write_record([kind, path, detail])?;
    Ok(())
}
