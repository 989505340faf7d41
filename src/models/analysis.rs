//! Analysis result structures

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use super::config::ReachabilityPolicy;
use super::dependency_graph::GraphStatistics;

/// A specifier that looked local but matched no file on disk
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnresolvedReference {
    /// File containing the specifier
    pub from: PathBuf,
    /// The specifier as written (query and fragment stripped)
    pub specifier: String,
    /// Human-readable reason
    pub reason: String,
}

impl fmt::Display for UnresolvedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Could not resolve: {} in {} ({})", self.specifier, self.from.display(), self.reason)
    }
}

/// What went wrong with a single file during traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningKind {
    /// The file vanished or could not be read
    Read,
    /// The file was read but only partially parsed
    Extraction,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningKind::Read => write!(f, "read"),
            WarningKind::Extraction => write!(f, "extraction"),
        }
    }
}

/// Non-fatal per-file problem recorded during traversal
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FileWarning {
    pub path: PathBuf,
    pub kind: WarningKind,
    pub message: String,
}

/// A file that could not be removed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Summary statistics from analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub inventory_files: usize,
    pub used_files: usize,
    pub unused_files: usize,
    pub unresolved_references: usize,
    pub warnings: usize,
    pub cycles: usize,
    pub deleted_files: usize,
    pub deletion_failures: usize,
    pub graph: GraphStatistics,
    pub scan_duration: Duration,
}

impl AnalysisSummary {
    /// Share of the inventory that is unused, in percent
    pub fn unused_percentage(&self) -> f64 {
        if self.inventory_files == 0 {
            return 0.0;
        }
        (self.unused_files as f64 / self.inventory_files as f64) * 100.0
    }

    /// Format the scan duration as a human-readable string
    pub fn format_duration(&self) -> String {
        let secs = self.scan_duration.as_secs();
        let millis = self.scan_duration.subsec_millis();

        if secs == 0 {
            format!("{}ms", millis)
        } else if secs < 60 {
            format!("{}.{:03}s", secs, millis)
        } else {
            format!("{}m {}s", secs / 60, secs % 60)
        }
    }
}

/// Everything one run found, ready for formatting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub root: PathBuf,
    pub policy: ReachabilityPolicy,
    pub entries: Vec<PathBuf>,
    pub dry_run: bool,
    /// Unused files, sorted
    pub unused: Vec<PathBuf>,
    /// Unresolved local references, sorted by file then specifier
    pub unresolved: Vec<UnresolvedReference>,
    /// Read and extraction problems, sorted by file
    pub warnings: Vec<FileWarning>,
    /// Import cycles, each sorted
    pub cycles: Vec<Vec<PathBuf>>,
    /// Files removed when not in dry-run mode
    pub deleted: Vec<PathBuf>,
    pub deletion_failures: Vec<DeletionFailure>,
    pub summary: AnalysisSummary,
    pub analysis_date: chrono::DateTime<chrono::Utc>,
}

impl AnalysisReport {
    pub fn has_unused(&self) -> bool {
        !self.unused.is_empty()
    }

    /// Record deletion outcomes and keep the summary in step
    pub fn record_deletions(&mut self, deleted: Vec<PathBuf>, failures: Vec<DeletionFailure>) {
        self.summary.deleted_files = deleted.len();
        self.summary.deletion_failures = failures.len();
        self.deleted = deleted;
        self.deletion_failures = failures;
    }

    /// Path relative to the project root for display; falls back to the full path
    pub fn display_path(&self, path: &std::path::Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/")
    }
}
