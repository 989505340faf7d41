//! What happens after the analysis: deleting unused files and failing the run

use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::error::{OrphanError, Result};
use crate::models::analysis::{AnalysisReport, DeletionFailure};

/// Remove every file in `files`. A failure is recorded for that file and the
/// remaining deletions still run.
pub fn delete_files(files: &[PathBuf]) -> (Vec<PathBuf>, Vec<DeletionFailure>) {
    let mut deleted = Vec::new();
    let mut failures = Vec::new();

    for path in files {
        match fs::remove_file(path) {
            Ok(()) => {
                info!(path = %path.display(), "deleted");
                deleted.push(path.clone());
            }
            Err(source) => {
                let err = OrphanError::Deletion {
                    path: path.clone(),
                    source,
                };
                warn!(error = %err, "deletion failed");
                failures.push(DeletionFailure {
                    path: path.clone(),
                    error: err.to_string(),
                });
            }
        }
    }

    (deleted, failures)
}

/// Delete the report's unused files unless it is a dry run
pub fn apply_deletions(report: &mut AnalysisReport) {
    if report.dry_run || report.unused.is_empty() {
        return;
    }
    let (deleted, failures) = delete_files(&report.unused);
    report.record_deletions(deleted, failures);
}

/// The single run-terminating outcome: unused files found while
/// `fail_on_unused` is set
pub fn enforce_fail_on_unused(report: &AnalysisReport, fail_on_unused: bool) -> Result<()> {
    if fail_on_unused && report.has_unused() {
        return Err(OrphanError::UnusedFilesFound {
            count: report.unused.len(),
        });
    }
    Ok(())
}
