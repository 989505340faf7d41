//! Specifier resolution
//!
//! Turns a raw specifier plus the file that referenced it into a file on
//! disk. Aliases are substituted first, then absolute and relative paths are
//! handled; anything else is a bare (package) specifier and is never
//! resolved. A candidate path is accepted verbatim when it already ends in a
//! known extension, otherwise with an inferred extension, as a directory
//! index, or as a stylesheet partial.

use dashmap::DashMap;
use lru::LruCache;
use parking_lot::Mutex;
use std::ffi::OsString;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use tracing::trace;

use crate::models::config::AliasEntry;
use crate::models::file_category::{ExtensionPriority, FileCategory};

const RESOLUTION_CACHE_SIZE: usize = 4096;

/// Outcome of resolving one specifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// An existing file
    Resolved(PathBuf),
    /// A package name, URI scheme or other non-local reference: not an edge
    External,
    /// A local reference with no matching file
    Unresolved { reason: String },
}

impl Resolution {
    pub fn resolved(&self) -> Option<&Path> {
        match self {
            Resolution::Resolved(path) => Some(path),
            _ => None,
        }
    }
}

/// Prefix substitutions such as `@ -> <root>/src`
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    entries: Vec<(String, PathBuf)>,
}

impl AliasTable {
    /// Replacement paths are taken relative to `root` unless absolute
    pub fn new(root: &Path, aliases: &[AliasEntry]) -> Self {
        let entries = aliases
            .iter()
            .filter(|alias| !alias.find.is_empty())
            .map(|alias| {
                let replacement = if alias.replacement.is_absolute() {
                    alias.replacement.clone()
                } else {
                    root.join(&alias.replacement)
                };
                (alias.find.clone(), path_clean::clean(replacement))
            })
            .collect();
        Self { entries }
    }

    /// Substituted path for `specifier`, if an alias key matches.
    ///
    /// A key matches the whole specifier or a prefix followed by `/`, so `@`
    /// does not claim `@scope/pkg`. The longest key wins and the first
    /// declared wins among keys of equal length.
    pub fn substitute(&self, specifier: &str) -> Option<PathBuf> {
        let mut best: Option<(&str, &Path)> = None;

        for (key, replacement) in &self.entries {
            let Some(rest) = specifier.strip_prefix(key.as_str()) else {
                continue;
            };
            let boundary = rest.is_empty() || rest.starts_with('/') || key.ends_with('/');
            if !boundary {
                continue;
            }
            if best.is_none_or(|(current, _)| key.len() > current.len()) {
                best = Some((key.as_str(), replacement.as_path()));
            }
        }

        best.map(|(key, replacement)| {
            let rest = specifier[key.len()..].trim_start_matches('/');
            if rest.is_empty() {
                replacement.to_path_buf()
            } else {
                path_clean::clean(replacement.join(rest))
            }
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Cache key: referencing directory, specifier, and whether the referencer
/// follows stylesheet conventions
type CacheKey = (PathBuf, String, bool);

/// Per-run resolver with memoised existence checks
pub struct PathResolver {
    aliases: AliasTable,
    extensions: ExtensionPriority,
    file_exists_cache: DashMap<PathBuf, bool>,
    resolution_cache: Mutex<LruCache<CacheKey, Resolution>>,
}

impl PathResolver {
    pub fn new(aliases: AliasTable, extensions: ExtensionPriority) -> Self {
        let capacity = NonZeroUsize::new(RESOLUTION_CACHE_SIZE).unwrap_or(NonZeroUsize::MIN);
        Self {
            aliases,
            extensions,
            file_exists_cache: DashMap::new(),
            resolution_cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn extensions(&self) -> &ExtensionPriority {
        &self.extensions
    }

    /// Resolve `specifier` as written in `from`
    pub fn resolve(&self, specifier: &str, from: &Path) -> Resolution {
        let dir = from.parent().unwrap_or(Path::new("")).to_path_buf();
        let style_context = FileCategory::from_path(from).uses_partials();
        let key: CacheKey = (dir, specifier.to_string(), style_context);

        if let Some(cached) = self.resolution_cache.lock().get(&key) {
            return cached.clone();
        }

        let resolution = self.resolve_uncached(specifier, &key.0, style_context);
        trace!(specifier, from = %from.display(), ?resolution, "resolved specifier");
        self.resolution_cache.lock().put(key, resolution.clone());
        resolution
    }

    fn resolve_uncached(&self, specifier: &str, dir: &Path, style_context: bool) -> Resolution {
        let candidate = if let Some(aliased) = self.aliases.substitute(specifier) {
            aliased
        } else if Path::new(specifier).is_absolute() {
            // root-absolute links such as `href="/about"` are usually routes
            return match self.find_file(&path_clean::clean(specifier), style_context) {
                Some(path) => Resolution::Resolved(path),
                None => Resolution::External,
            };
        } else if is_relative(specifier) {
            path_clean::clean(dir.join(specifier))
        } else if style_context && is_plain_path(specifier) {
            // stylesheets resolve `@import "variables"` and `url(img/a.png)`
            // against their own directory; a miss is still not an error
            let candidate = path_clean::clean(dir.join(specifier));
            return match self.find_file(&candidate, true) {
                Some(path) => Resolution::Resolved(path),
                None => Resolution::External,
            };
        } else {
            return Resolution::External;
        };

        match self.find_file(&candidate, style_context) {
            Some(path) => Resolution::Resolved(path),
            None => Resolution::Unresolved {
                reason: format!(
                    "no file matches {} with any known extension or index file",
                    candidate.display()
                ),
            },
        }
    }

    /// Verbatim (known extensions only), then extension inference, then
    /// directory index, then the `_partial` convention when enabled
    fn find_file(&self, candidate: &Path, partials: bool) -> Option<PathBuf> {
        if let Some(found) = self.with_extensions(candidate) {
            return Some(found);
        }

        for ext in self.extensions.iter() {
            let index = candidate.join(format!("index.{}", ext));
            if self.is_file(&index) {
                return Some(index);
            }
        }

        if partials {
            let name = candidate.file_name()?.to_str()?;
            if !name.starts_with('_') {
                let partial = candidate.with_file_name(format!("_{}", name));
                if let Some(found) = self.with_extensions(&partial) {
                    return Some(found);
                }
            }
            for ext in self.extensions.iter() {
                let index = candidate.join(format!("_index.{}", ext));
                if self.is_file(&index) {
                    return Some(index);
                }
            }
        }

        None
    }

    fn with_extensions(&self, candidate: &Path) -> Option<PathBuf> {
        let recognised = candidate
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.is_recognised(ext));
        if recognised && self.is_file(candidate) {
            return Some(candidate.to_path_buf());
        }

        self.extensions
            .iter()
            .map(|ext| append_extension(candidate, ext))
            .find(|path| self.is_file(path))
    }

    fn is_file(&self, path: &Path) -> bool {
        if let Some(cached) = self.file_exists_cache.get(path) {
            return *cached;
        }

        let exists = path.is_file();
        self.file_exists_cache.insert(path.to_path_buf(), exists);
        exists
    }
}

fn is_relative(specifier: &str) -> bool {
    specifier == "." || specifier == ".." || specifier.starts_with("./") || specifier.starts_with("../")
}

/// Looks like a path rather than a scheme (`sass:math`) or a loader prefix (`~pkg`)
fn is_plain_path(specifier: &str) -> bool {
    !specifier.contains(':') && !specifier.starts_with('~') && !specifier.starts_with('@')
}

/// `foo.module` + `css` -> `foo.module.css`
fn append_extension(path: &Path, ext: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}
