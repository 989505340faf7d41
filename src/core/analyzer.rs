//! Run orchestration
//!
//! An `Analyzer` owns one run: it enumerates the inventory, builds the graph
//! with a fresh resolver and content cache, applies the reachability policy
//! and assembles the report. Nothing is shared between runs.

use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

use super::graph_builder::GraphBuilder;
use super::inventory::Inventory;
use super::reachability;
use crate::error::{OptionExt, OrphanError, Result};
use crate::models::analysis::{AnalysisReport, AnalysisSummary};
use crate::models::config::Settings;
use crate::models::file_category::ExtensionPriority;
use crate::output::progress::ProgressReporter;
use crate::parsers::ExtractorSet;
use crate::utils::path_resolver::{AliasTable, PathResolver};

/// Analyses one project tree
pub struct Analyzer {
    settings: Settings,
}

impl Analyzer {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Enumerate the inventory from the configured globs and analyse it
    pub fn run(&self) -> Result<AnalysisReport> {
        let root = self.root()?;
        let inventory = Inventory::discover(
            &root,
            &self.settings.include,
            &self.settings.exclude,
            self.settings.follow_links,
        )?;
        info!(root = %root.display(), files = inventory.len(), "inventory ready");
        self.analyze(&root, &inventory)
    }

    /// Analyse an inventory enumerated by someone else
    pub fn analyze(&self, root: &Path, inventory: &Inventory) -> Result<AnalysisReport> {
        let started = Instant::now();
        let entries = self.entries(root);

        let resolver = PathResolver::new(
            AliasTable::new(root, &self.settings.alias),
            ExtensionPriority::from_include_patterns(&self.settings.include),
        );
        debug!(extensions = ?resolver.extensions().iter().collect::<Vec<_>>(), "extension priority");

        let show_progress = self.settings.show_progress && !self.settings.quiet;
        let mut builder =
            GraphBuilder::new(resolver, ExtractorSet::new()).with_progress(ProgressReporter::new(show_progress));
        if self.settings.parallel {
            builder = builder.with_threads(self.settings.effective_threads())?;
        }

        let mut build = builder.build(inventory, &entries);
        let unused = reachability::unused_files(inventory, &build.graph, self.settings.policy, &entries);

        build.unresolved.sort();
        build.unresolved.dedup();
        build.warnings.sort();
        let cycles = build.graph.cycles();

        let summary = AnalysisSummary {
            inventory_files: inventory.len(),
            used_files: inventory.len() - unused.len(),
            unused_files: unused.len(),
            unresolved_references: build.unresolved.len(),
            warnings: build.warnings.len(),
            cycles: cycles.len(),
            deleted_files: 0,
            deletion_failures: 0,
            graph: build.graph.statistics(),
            scan_duration: started.elapsed(),
        };

        info!(
            unused = summary.unused_files,
            unresolved = summary.unresolved_references,
            policy = %self.settings.policy,
            duration = %summary.format_duration(),
            "analysis complete"
        );

        Ok(AnalysisReport {
            root: root.to_path_buf(),
            policy: self.settings.policy,
            entries,
            dry_run: self.settings.dry_run,
            unused: unused.into_iter().collect(),
            unresolved: build.unresolved,
            warnings: build.warnings,
            cycles,
            deleted: Vec::new(),
            deletion_failures: Vec::new(),
            summary,
            analysis_date: chrono::Utc::now(),
        })
    }

    /// The configured root as an absolute, canonical directory
    fn root(&self) -> Result<PathBuf> {
        let root = &self.settings.root;
        root.canonicalize()
            .ok()
            .filter(|canonical| canonical.is_dir())
            .ok_or_error(|| OrphanError::InvalidPath { path: root.clone() })
    }

    /// Declared entries as absolute paths; relative ones are taken from the root
    fn entries(&self, root: &Path) -> Vec<PathBuf> {
        self.settings
            .entries
            .iter()
            .map(|entry| path_clean::clean(root.join(entry)))
            .collect()
    }
}
