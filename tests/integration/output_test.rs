//! Rendering real reports in every format

use std::fs;
use std::path::PathBuf;

use super::support::Project;
use orphans::models::config::OutputFormat;
use orphans::output::{create_formatter, create_writer};
use orphans::AnalysisReport;

fn report() -> (Project, AnalysisReport) {
    let project = Project::new(&[
        ("src/main.ts", "import './used';\nimport './missing';\n"),
        ("src/used.ts", ""),
        ("src/orphan.ts", ""),
    ]);
    let mut settings = project.settings();
    settings.entries = vec![PathBuf::from("src/main.ts")];
    let report = project.analyze(settings);
    (project, report)
}

#[test]
fn test_text_report() {
    let (_project, report) = report();
    let text = create_formatter(OutputFormat::Text, false, false, false).format(&report).unwrap();

    assert!(text.contains("Unused: 1 (33.3%)"));
    assert!(text.contains("[Dry Run] Unused files:\n  src/orphan.ts\n"));
    assert!(text.contains("./missing in src/main.ts"));
    assert!(text.contains("Note: edge-target policy"));
}

#[test]
fn test_quiet_report() {
    let (_project, report) = report();
    let text = create_formatter(OutputFormat::Text, true, false, true).format(&report).unwrap();
    assert_eq!(text, "Unused: 1, Unresolved: 1\nsrc/orphan.ts\n");
}

#[test]
fn test_json_report() {
    let (project, report) = report();
    let json = create_formatter(OutputFormat::Json, false, false, false).format(&report).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["policy"], "edge-target");
    assert_eq!(value["dry_run"], true);
    assert_eq!(
        value["unused"][0].as_str().map(PathBuf::from),
        Some(project.path("src/orphan.ts"))
    );
    assert_eq!(value["unresolved"][0]["specifier"], "./missing");
    assert_eq!(value["summary"]["inventory_files"], 3);
}

#[test]
fn test_csv_report_written_to_file() {
    let (project, report) = report();
    let csv = create_formatter(OutputFormat::Csv, false, false, false).format(&report).unwrap();

    let out = project.path("report.csv");
    create_writer(Some(&out)).write(&csv).unwrap();

    let written = fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines, vec!["kind,path,detail", "unused,src/orphan.ts,", "unresolved,src/main.ts,./missing"]);
}
