//! Used/unused partition of the inventory

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use super::inventory::Inventory;
use crate::models::config::ReachabilityPolicy;
use crate::models::dependency_graph::DependencyGraph;

/// Files the policy counts as used, whether or not they are in the inventory.
///
/// Edge-target: every file some edge points at, regardless of whether the
/// referencing file is itself used, plus the declared entries. Entry-rooted:
/// every file reachable from `entries`, the entries included.
pub fn used_files(graph: &DependencyGraph, policy: ReachabilityPolicy, entries: &[PathBuf]) -> BTreeSet<PathBuf> {
    let roots: Vec<PathBuf> = entries.iter().map(|entry| path_clean::clean(entry)).collect();
    let reached: HashSet<&Path> = match policy {
        ReachabilityPolicy::EdgeTarget => graph.edge_targets(),
        ReachabilityPolicy::EntryRooted => graph.reachable_from(roots.iter().map(PathBuf::as_path)),
    };

    reached
        .into_iter()
        .map(Path::to_path_buf)
        .chain(roots.iter().cloned())
        .collect()
}

/// Inventory files the policy does not count as used, sorted
pub fn unused_files(
    inventory: &Inventory,
    graph: &DependencyGraph,
    policy: ReachabilityPolicy,
    entries: &[PathBuf],
) -> BTreeSet<PathBuf> {
    let used = used_files(graph, policy, entries);
    inventory
        .iter()
        .filter(|file| !used.contains(*file))
        .cloned()
        .collect()
}
