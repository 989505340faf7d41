//! File-level dependency graph
//!
//! Nodes are absolute file paths, edges mean "the source file contains a
//! resolvable reference to the target file". A node is *visited* once its
//! specifiers have been extracted; an edge target may exist as a node before
//! it is visited. Duplicate edges collapse.

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};

use super::file_category::FileCategory;

/// Directed graph of file-to-file references
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    graph: DiGraph<PathBuf, ()>,
    node_map: HashMap<PathBuf, NodeIndex>,
    /// Visited nodes and the category they were read as
    visited: HashMap<NodeIndex, FileCategory>,
}

impl DependencyGraph {
    /// Create a new empty dependency graph
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_node(&mut self, path: &Path) -> NodeIndex {
        if let Some(&index) = self.node_map.get(path) {
            return index;
        }
        let index = self.graph.add_node(path.to_path_buf());
        self.node_map.insert(path.to_path_buf(), index);
        index
    }

    /// Record `path` as visited. Returns false if it already was.
    pub fn mark_visited(&mut self, path: &Path, category: FileCategory) -> bool {
        let index = self.ensure_node(path);
        if self.visited.contains_key(&index) {
            return false;
        }
        self.visited.insert(index, category);
        true
    }

    pub fn is_visited(&self, path: &Path) -> bool {
        self.node_map
            .get(path)
            .is_some_and(|index| self.visited.contains_key(index))
    }

    /// Category a visited file was read as
    pub fn category(&self, path: &Path) -> Option<FileCategory> {
        self.node_map
            .get(path)
            .and_then(|index| self.visited.get(index))
            .copied()
    }

    /// Add `from -> to`. Returns false if the edge already existed.
    pub fn add_edge(&mut self, from: &Path, to: &Path) -> bool {
        let from_idx = self.ensure_node(from);
        let to_idx = self.ensure_node(to);
        if self.graph.find_edge(from_idx, to_idx).is_some() {
            return false;
        }
        self.graph.add_edge(from_idx, to_idx, ());
        true
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.node_map.contains_key(path)
    }

    /// Direct targets of `path`, sorted
    pub fn targets(&self, path: &Path) -> Vec<&Path> {
        self.neighbours(path, Direction::Outgoing)
    }

    /// Files that reference `path`, sorted
    pub fn referrers(&self, path: &Path) -> Vec<&Path> {
        self.neighbours(path, Direction::Incoming)
    }

    fn neighbours(&self, path: &Path, direction: Direction) -> Vec<&Path> {
        let Some(&index) = self.node_map.get(path) else {
            return Vec::new();
        };
        let mut found: Vec<&Path> = self
            .graph
            .neighbors_directed(index, direction)
            .map(|n| self.graph[n].as_path())
            .collect();
        found.sort();
        found
    }

    /// All edges as `(from, to)`, sorted
    pub fn edges(&self) -> Vec<(&Path, &Path)> {
        let mut edges: Vec<(&Path, &Path)> = self
            .graph
            .raw_edges()
            .iter()
            .map(|e| (self.graph[e.source()].as_path(), self.graph[e.target()].as_path()))
            .collect();
        edges.sort();
        edges
    }

    /// Every file that is the target of at least one edge
    pub fn edge_targets(&self) -> HashSet<&Path> {
        self.graph
            .raw_edges()
            .iter()
            .map(|e| self.graph[e.target()].as_path())
            .collect()
    }

    /// Files reachable from `roots` by following outgoing edges, roots included
    pub fn reachable_from<'a, I>(&self, roots: I) -> HashSet<&Path>
    where
        I: IntoIterator<Item = &'a Path>,
    {
        let mut dfs = Dfs::empty(&self.graph);
        for root in roots {
            if let Some(&index) = self.node_map.get(root) {
                dfs.stack.push(index);
            }
        }

        let mut reached = HashSet::new();
        while let Some(index) = dfs.next(&self.graph) {
            reached.insert(self.graph[index].as_path());
        }
        reached
    }

    /// Import cycles: strongly connected components with more than one file,
    /// plus files that reference themselves. Each cycle and the list are sorted.
    pub fn cycles(&self) -> Vec<Vec<PathBuf>> {
        let mut cycles: Vec<Vec<PathBuf>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| {
                component.len() > 1
                    || component
                        .first()
                        .is_some_and(|&n| self.graph.find_edge(n, n).is_some())
            })
            .map(|component| {
                let mut files: Vec<PathBuf> = component.into_iter().map(|n| self.graph[n].clone()).collect();
                files.sort();
                files
            })
            .collect();
        cycles.sort();
        cycles
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Visited files, sorted
    pub fn visited_files(&self) -> BTreeSet<&Path> {
        self.visited.keys().map(|&n| self.graph[n].as_path()).collect()
    }

    /// Get statistics about the dependency graph
    pub fn statistics(&self) -> GraphStatistics {
        let mut max_fan_in = (0usize, None::<&Path>);
        let mut max_fan_out = (0usize, None::<&Path>);

        for index in self.graph.node_indices() {
            let path = self.graph[index].as_path();
            let fan_in = self.graph.neighbors_directed(index, Direction::Incoming).count();
            let fan_out = self.graph.neighbors_directed(index, Direction::Outgoing).count();

            // ties go to the lexically smallest path so the report is stable
            if fan_in > 0 && (fan_in > max_fan_in.0 || (fan_in == max_fan_in.0 && Some(path) < max_fan_in.1)) {
                max_fan_in = (fan_in, Some(path));
            }
            if fan_out > 0 && (fan_out > max_fan_out.0 || (fan_out == max_fan_out.0 && Some(path) < max_fan_out.1)) {
                max_fan_out = (fan_out, Some(path));
            }
        }

        GraphStatistics {
            total_nodes: self.node_count(),
            total_edges: self.edge_count(),
            visited_files: self.visited_count(),
            cycle_count: self.cycles().len(),
            max_fan_in: max_fan_in.0,
            max_fan_in_file: max_fan_in.1.map(Path::to_path_buf),
            max_fan_out: max_fan_out.0,
            max_fan_out_file: max_fan_out.1.map(Path::to_path_buf),
        }
    }
}

/// Statistics about the dependency graph
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphStatistics {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub visited_files: usize,
    pub cycle_count: usize,
    pub max_fan_in: usize,
    pub max_fan_in_file: Option<PathBuf>,
    pub max_fan_out: usize,
    pub max_fan_out_file: Option<PathBuf>,
}
