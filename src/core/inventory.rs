//! Candidate file enumeration
//!
//! The inventory is the set of files that may be reported as unused. It is
//! built once per run from include/exclude globs matched against paths
//! relative to the project root, and never changes afterwards.

use glob::{MatchOptions, Pattern};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{handle_error, OrphanError, Result};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Absolute, normalised candidate files in sorted order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    files: BTreeSet<PathBuf>,
}

impl Inventory {
    /// Build an inventory from already-enumerated paths
    pub fn from_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        Self {
            files: paths.into_iter().map(|p| path_clean::clean(p.as_ref())).collect(),
        }
    }

    /// Walk `root` and keep regular files matching any `include` glob and no
    /// `exclude` glob. Globs support `*`, `**`, `?`, `[...]` and `{a,b}`.
    pub fn discover(root: &Path, include: &[String], exclude: &[String], follow_links: bool) -> Result<Self> {
        if !root.is_dir() {
            return Err(OrphanError::InvalidPath {
                path: root.to_path_buf(),
            });
        }

        let include_patterns = compile_patterns(include)?;
        let exclude_patterns = compile_patterns(exclude)?;
        let prefixes: Vec<String> = include
            .iter()
            .flat_map(|p| expand_braces(p))
            .map(|p| literal_prefix(&p))
            .collect();

        let mut files = BTreeSet::new();
        let walker = WalkDir::new(root)
            .follow_links(follow_links)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                if !entry.file_type().is_dir() || entry.depth() == 0 {
                    return true;
                }
                relative_slashed(root, entry.path()).is_some_and(|rel| may_contain_matches(&rel, &prefixes))
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    if let Some(critical) = handle_error(walk_error(root, err)) {
                        return Err(critical);
                    }
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let Some(rel) = relative_slashed(root, entry.path()) else {
                continue;
            };

            let included = include_patterns.iter().any(|p| p.matches_with(&rel, MATCH_OPTIONS));
            let excluded = exclude_patterns.iter().any(|p| p.matches_with(&rel, MATCH_OPTIONS));
            if included && !excluded {
                files.insert(path_clean::clean(entry.path()));
            }
        }

        debug!(root = %root.display(), files = files.len(), "inventory discovered");
        Ok(Self { files })
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.files.contains(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        self.files.iter()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// An entry the walk could not read; the walk carries on past it
fn walk_error(root: &Path, err: walkdir::Error) -> OrphanError {
    let path = err.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
    let message = err.to_string();
    match err.into_io_error() {
        Some(io_err) if io_err.kind() == std::io::ErrorKind::PermissionDenied => OrphanError::permission_denied(path),
        _ => OrphanError::directory_traversal_error(path, message),
    }
}

/// Compile globs after brace expansion
pub fn compile_patterns(patterns: &[String]) -> Result<Vec<Pattern>> {
    let mut compiled = Vec::new();
    for pattern in patterns {
        for expanded in expand_braces(pattern) {
            compiled.push(Pattern::new(&expanded)?);
        }
    }
    Ok(compiled)
}

/// `src/**/*.{ts,tsx}` -> `src/**/*.ts`, `src/**/*.tsx`. Nested groups are
/// expanded; an unbalanced `{` is left as is.
pub fn expand_braces(pattern: &str) -> Vec<String> {
    let Some(open) = pattern.find('{') else {
        return vec![pattern.to_string()];
    };

    let mut depth = 0usize;
    let mut close = None;
    let mut splits = Vec::new();
    for (i, c) in pattern[open..].char_indices() {
        let i = open + i;
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(i);
                    break;
                }
            }
            ',' if depth == 1 => splits.push(i),
            _ => {}
        }
    }

    let Some(close) = close else {
        return vec![pattern.to_string()];
    };

    let prefix = &pattern[..open];
    let suffix = &pattern[close + 1..];
    let mut bounds = vec![open];
    bounds.extend(splits);
    bounds.push(close);

    bounds
        .windows(2)
        .flat_map(|w| expand_braces(&format!("{}{}{}", prefix, &pattern[w[0] + 1..w[1]], suffix)))
        .collect()
}

/// Directory part of a glob before its first wildcard, e.g. `src/` for `src/**/*`
fn literal_prefix(pattern: &str) -> String {
    let wildcard = pattern.find(['*', '?', '[']).unwrap_or(pattern.len());
    match pattern[..wildcard].rfind('/') {
        Some(slash) => pattern[..=slash].to_string(),
        None => String::new(),
    }
}

/// Whether a directory at `rel` can hold files under any of the prefixes
fn may_contain_matches(rel: &str, prefixes: &[String]) -> bool {
    let dir = format!("{}/", rel);
    prefixes
        .iter()
        .any(|prefix| prefix.starts_with(&dir) || dir.starts_with(prefix.as_str()))
}

/// `path` relative to `root` with `/` separators
fn relative_slashed(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<&str> = rel.components().map(|c| c.as_os_str().to_str()).collect::<Option<_>>()?;
    Some(parts.join("/"))
}
