//! Deletion and fail-on-unused

use std::path::PathBuf;

use super::support::{unused, Project};
use orphans::cli::commands::{analyze, exit_code};
use orphans::core::actions::{apply_deletions, enforce_fail_on_unused};
use orphans::OrphanError;

fn project() -> Project {
    Project::new(&[
        ("src/main.ts", "import './used';\n"),
        ("src/used.ts", ""),
        ("src/orphan.ts", ""),
        ("src/old/legacy.vue", "<template><div /></template>\n"),
    ])
}

#[test]
fn test_dry_run_keeps_files() {
    let project = project();
    let mut settings = project.settings();
    settings.entries = vec![PathBuf::from("src/main.ts")];

    let mut report = project.analyze(settings);
    apply_deletions(&mut report);

    assert_eq!(unused(&report), vec!["src/old/legacy.vue", "src/orphan.ts"]);
    assert!(report.deleted.is_empty());
    assert!(project.path("src/orphan.ts").exists());
}

#[test]
fn test_delete_removes_only_unused_files() {
    let project = project();
    let mut settings = project.settings();
    settings.entries = vec![PathBuf::from("src/main.ts")];
    settings.dry_run = false;
    settings.output_file = Some(project.path("report.txt"));

    let report = analyze(&settings).unwrap();

    assert_eq!(report.deleted.len(), 2);
    assert!(report.deletion_failures.is_empty());
    assert!(!project.path("src/orphan.ts").exists());
    assert!(!project.path("src/old/legacy.vue").exists());
    assert!(project.path("src/main.ts").exists());
    assert!(project.path("src/used.ts").exists());

    // a second run finds nothing left to remove
    let again = analyze(&settings).unwrap();
    assert!(again.unused.is_empty());
}

#[test]
fn test_fail_on_unused_exits_with_error() {
    let project = project();
    let mut settings = project.settings();
    settings.entries = vec![PathBuf::from("src/main.ts")];

    let report = project.analyze(settings);
    let err = enforce_fail_on_unused(&report, true).unwrap_err();
    assert!(matches!(err, OrphanError::UnusedFilesFound { count: 2 }));
    assert_eq!(exit_code(err.severity()), 1);

    assert!(enforce_fail_on_unused(&report, false).is_ok());
}
