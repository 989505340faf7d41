//! Temporary project trees for the integration tests

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use orphans::{AnalysisReport, Analyzer, Settings};

pub struct Project {
    _dir: TempDir,
    root: PathBuf,
}

impl Project {
    /// Write `(relative path, contents)` pairs under a fresh directory
    pub fn new(files: &[(&str, &str)]) -> Self {
        let dir = TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        for (rel, text) in files {
            let path = root.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, text).unwrap();
        }
        Self { _dir: dir, root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    /// Defaults rooted at this project, without the progress spinner
    pub fn settings(&self) -> Settings {
        Settings {
            root: self.root.clone(),
            show_progress: false,
            ..Default::default()
        }
    }

    pub fn analyze(&self, settings: Settings) -> AnalysisReport {
        Analyzer::new(settings).run().unwrap()
    }
}

/// The report's unused files relative to its root
pub fn unused(report: &AnalysisReport) -> Vec<String> {
    report.unused.iter().map(|path| report.display_path(path)).collect()
}
