//! Dependency graph construction
//!
//! Traversal runs on an explicit work queue in rounds. Each round claims its
//! files in the graph (mark visited, insert-if-absent) before any file is
//! read, then visits the claimed files in parallel, then merges the results
//! in frontier order. Every file is therefore read and extracted at most
//! once, cycles terminate, and the output does not depend on thread timing.

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::content_cache::ContentCache;
use super::inventory::Inventory;
use crate::error::{OrphanError, Result};
use crate::models::analysis::{FileWarning, UnresolvedReference, WarningKind};
use crate::models::dependency_graph::DependencyGraph;
use crate::models::file_category::FileCategory;
use crate::output::progress::ProgressReporter;
use crate::parsers::ExtractorSet;
use crate::utils::path_resolver::{PathResolver, Resolution};

/// Everything the traversal produced
#[derive(Debug, Default)]
pub struct GraphBuild {
    pub graph: DependencyGraph,
    /// In traversal order
    pub unresolved: Vec<UnresolvedReference>,
    pub warnings: Vec<FileWarning>,
}

/// What visiting one file produced
#[derive(Debug, Default)]
struct Visit {
    targets: Vec<PathBuf>,
    unresolved: Vec<UnresolvedReference>,
    warnings: Vec<FileWarning>,
}

/// Builds the dependency graph for one run. Owns the run's resolver and
/// content cache, so nothing outlives the run.
pub struct GraphBuilder {
    resolver: PathResolver,
    extractors: ExtractorSet,
    cache: ContentCache,
    pool: Option<ThreadPool>,
    progress: ProgressReporter,
}

impl GraphBuilder {
    /// A sequential builder with no progress output
    pub fn new(resolver: PathResolver, extractors: ExtractorSet) -> Self {
        Self {
            resolver,
            extractors,
            cache: ContentCache::new(),
            pool: None,
            progress: ProgressReporter::hidden(),
        }
    }

    /// Visit files on a dedicated pool of `threads` workers
    pub fn with_threads(mut self, threads: usize) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("orphans-worker-{}", i))
            .build()
            .map_err(|e| OrphanError::ParallelExecution {
                message: format!("could not start {} worker threads: {}", threads, e),
            })?;
        self.pool = Some(pool);
        Ok(self)
    }

    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = progress;
        self
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    /// Traverse from every inventory file and every entry
    pub fn build(&self, inventory: &Inventory, entries: &[PathBuf]) -> GraphBuild {
        let mut build = GraphBuild::default();

        let mut frontier: Vec<PathBuf> = entries.iter().map(|entry| path_clean::clean(entry)).collect();
        frontier.extend(inventory.iter().cloned());

        self.progress.start("Building dependency graph");

        while !frontier.is_empty() {
            let claimed: Vec<PathBuf> = frontier
                .drain(..)
                .filter(|path| build.graph.mark_visited(path, FileCategory::from_path(path)))
                .collect();

            let visits: Vec<Visit> = match &self.pool {
                Some(pool) => pool.install(|| claimed.par_iter().map(|path| self.visit(path)).collect()),
                None => claimed.iter().map(|path| self.visit(path)).collect(),
            };

            for (path, visit) in claimed.iter().zip(visits) {
                for target in visit.targets {
                    build.graph.add_edge(path, &target);
                    if !build.graph.is_visited(&target) {
                        frontier.push(target);
                    }
                }
                build.unresolved.extend(visit.unresolved);
                build.warnings.extend(visit.warnings);
            }

            self.progress.update(build.graph.visited_count(), frontier.len());
        }

        self.progress.finish(&format!(
            "Visited {} files, {} edges",
            build.graph.visited_count(),
            build.graph.edge_count()
        ));
        debug!(
            visited = build.graph.visited_count(),
            edges = build.graph.edge_count(),
            cached = self.cache.len(),
            "dependency graph built"
        );

        build
    }

    /// Read, extract and resolve one file
    fn visit(&self, path: &Path) -> Visit {
        let mut visit = Visit::default();
        let category = FileCategory::from_path(path);
        if !category.is_extractable() {
            return visit;
        }

        let text = match self.cache.load(path) {
            Ok(text) => text,
            Err(source) => {
                let err = OrphanError::file_read(path, source);
                warn!("{}", err.user_message());
                visit.warnings.push(FileWarning {
                    path: path.to_path_buf(),
                    kind: WarningKind::Read,
                    message: err.to_string(),
                });
                return visit;
            }
        };

        let extraction = self.extractors.extract(category, &text);
        if extraction.has_diagnostics() {
            let message = extraction.diagnostics.join("; ");
            warn!("{}", OrphanError::extraction(path, message.as_str()));
            visit.warnings.push(FileWarning {
                path: path.to_path_buf(),
                kind: WarningKind::Extraction,
                message,
            });
        }

        for specifier in extraction.specifiers {
            match self.resolver.resolve(&specifier, path) {
                Resolution::Resolved(target) => {
                    if !visit.targets.contains(&target) {
                        visit.targets.push(target);
                    }
                }
                Resolution::External => {}
                Resolution::Unresolved { reason } => {
                    debug!(path = %path.display(), %specifier, "unresolved reference");
                    visit.unresolved.push(UnresolvedReference {
                        from: path.to_path_buf(),
                        specifier,
                        reason,
                    });
                }
            }
        }

        debug!(path = %path.display(), %category, edges = visit.targets.len(), "visited");
        visit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::AliasEntry;
    use crate::models::file_category::ExtensionPriority;
    use crate::utils::path_resolver::AliasTable;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, text: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, text).unwrap();
        path
    }

    fn builder(root: &Path) -> GraphBuilder {
        let resolver = PathResolver::new(
            AliasTable::new(root, &[AliasEntry::new("@", "src")]),
            ExtensionPriority::default(),
        );
        GraphBuilder::new(resolver, ExtractorSet::new())
    }

    #[test]
    fn test_cycle_terminates_with_both_edges() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        let a = write(root, "a.ts", "import './b';");
        let b = write(root, "b.ts", "import './a';");

        let build = builder(root).build(&Inventory::from_paths([&a, &b]), &[]);
        assert_eq!(build.graph.targets(&a), vec![b.as_path()]);
        assert_eq!(build.graph.targets(&b), vec![a.as_path()]);
        assert_eq!(build.graph.visited_count(), 2);
        assert!(build.unresolved.is_empty());
    }

    #[test]
    fn test_follows_edges_outside_inventory() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        let main = write(root, "src/main.ts", "import { x } from '@/lib/x';");
        let x = write(root, "src/lib/x.ts", "import './y';");
        let y = write(root, "src/lib/y.ts", "");

        let build = builder(root).build(&Inventory::from_paths([&main]), &[]);
        assert!(build.graph.is_visited(&x));
        assert!(build.graph.is_visited(&y));
        // edges come back ordered by source path
        assert_eq!(build.graph.edges(), vec![(x.as_path(), y.as_path()), (main.as_path(), x.as_path())]);
    }

    #[test]
    fn test_unresolved_reference_is_recorded() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        let x = write(root, "x.ts", "import './missing';\nimport 'react';\nimport 'https://cdn.example.com/x.js';");

        let build = builder(root).build(&Inventory::from_paths([&x]), &[]);
        assert_eq!(build.unresolved.len(), 1);
        assert_eq!(build.unresolved[0].from, x);
        assert_eq!(build.unresolved[0].specifier, "./missing");
        assert_eq!(build.graph.edge_count(), 0);
        assert!(build.graph.is_visited(&x));
        assert!(build.warnings.is_empty());
    }

    #[test]
    fn test_component_style_import_is_an_edge() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        let app = write(
            root,
            "src/App.vue",
            "<template><div/></template>\n<style lang=\"scss\">@import \"./theme.scss\";</style>\n",
        );
        let theme = write(root, "src/theme.scss", "$c: red;");

        let build = builder(root).build(&Inventory::from_paths([&app, &theme]), &[]);
        assert_eq!(build.graph.targets(&app), vec![theme.as_path()]);
    }

    #[test]
    fn test_read_failure_is_a_warning() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        let ghost = root.join("ghost.ts");

        let build = builder(root).build(&Inventory::from_paths([&ghost]), &[]);
        assert!(build.graph.is_visited(&ghost));
        assert_eq!(build.warnings.len(), 1);
        assert_eq!(build.warnings[0].kind, WarningKind::Read);
    }

    #[test]
    fn test_opaque_files_are_not_read() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        // would be a read warning if it were opened
        let logo = root.join("logo.png");

        let build = builder(root).build(&Inventory::from_paths([&logo]), &[]);
        assert!(build.graph.is_visited(&logo));
        assert!(build.warnings.is_empty());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        let mut files = Vec::new();
        for i in 0..40 {
            let next = (i + 1) % 40;
            files.push(write(
                root,
                &format!("src/m{}.ts", i),
                &format!("import './m{}';\nimport './gone{}';", next, i),
            ));
        }
        let inventory = Inventory::from_paths(&files);

        let sequential = builder(root).build(&inventory, &[]);
        let parallel = builder(root).with_threads(4).unwrap().build(&inventory, &[]);

        assert_eq!(sequential.graph.edges(), parallel.graph.edges());
        assert_eq!(sequential.unresolved, parallel.unresolved);
    }

    #[test]
    fn test_entries_are_seeded() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        let entry = write(root, "index.ts", "import './src/app';");
        let app = write(root, "src/app.ts", "");

        let build = builder(root).build(&Inventory::from_paths([&app]), std::slice::from_ref(&entry));
        assert_eq!(build.graph.targets(&entry), vec![app.as_path()]);
    }
}
