//! File categories and extension ordering
//!
//! A file's category is decided purely by its extension and selects the
//! specifier extractor that reads it. `ExtensionPriority` orders the known
//! extensions for extension inference during resolution.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Script flavours the parser needs to distinguish
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptDialect {
    Js,
    Jsx,
    Ts,
    Tsx,
}

/// Stylesheet dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleDialect {
    Css,
    Scss,
    /// Indented syntax
    Sass,
    Less,
}

impl StyleDialect {
    /// Dialect named by a `lang` attribute on a `<style>` block
    pub fn from_lang(lang: &str) -> Self {
        match lang.trim().to_ascii_lowercase().as_str() {
            "scss" => StyleDialect::Scss,
            "sass" => StyleDialect::Sass,
            "less" => StyleDialect::Less,
            _ => StyleDialect::Css,
        }
    }

    /// Whether `//` starts a line comment
    pub fn has_line_comments(self) -> bool {
        !matches!(self, StyleDialect::Css)
    }
}

/// Which extractor strategy applies to a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "dialect")]
pub enum FileCategory {
    /// js, jsx, mjs, cjs, ts, tsx, mts, cts
    Script(ScriptDialect),
    /// Single-file components (vue, svelte)
    Component,
    /// css, scss, sass, less
    Stylesheet(StyleDialect),
    /// Anything else: never read, may still be an edge target
    Opaque,
}

impl FileCategory {
    /// Categorise a file by its extension (case-insensitive)
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        Self::from_extension(&ext)
    }

    pub fn from_extension(ext: &str) -> Self {
        match ext {
            "js" | "mjs" | "cjs" => FileCategory::Script(ScriptDialect::Js),
            "jsx" => FileCategory::Script(ScriptDialect::Jsx),
            "ts" | "mts" | "cts" => FileCategory::Script(ScriptDialect::Ts),
            "tsx" => FileCategory::Script(ScriptDialect::Tsx),
            "vue" | "svelte" => FileCategory::Component,
            "css" => FileCategory::Stylesheet(StyleDialect::Css),
            "scss" => FileCategory::Stylesheet(StyleDialect::Scss),
            "sass" => FileCategory::Stylesheet(StyleDialect::Sass),
            "less" => FileCategory::Stylesheet(StyleDialect::Less),
            _ => FileCategory::Opaque,
        }
    }

    /// Whether files of this category are read and scanned for specifiers
    pub fn is_extractable(self) -> bool {
        !matches!(self, FileCategory::Opaque)
    }

    /// Stylesheets and components honour the `_partial` naming convention
    pub fn uses_partials(self) -> bool {
        matches!(self, FileCategory::Stylesheet(_) | FileCategory::Component)
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileCategory::Script(_) => write!(f, "script"),
            FileCategory::Component => write!(f, "component"),
            FileCategory::Stylesheet(_) => write!(f, "stylesheet"),
            FileCategory::Opaque => write!(f, "opaque"),
        }
    }
}

/// Default inference order: components, JSX scripts, plain scripts, stylesheets, then assets
const DEFAULT_EXTENSIONS: &[&str] = &[
    "vue", "svelte", "tsx", "jsx", "ts", "mts", "cts", "js", "mjs", "cjs", "css", "scss", "sass", "less",
    "json", "png", "jpg", "jpeg", "gif", "svg", "webp", "avif", "ico", "woff", "woff2", "ttf", "otf",
];

/// Matches `.ext` or `.{a,b,c}` in a glob segment
static PATTERN_EXTENSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.\{(\w+(?:\s*,\s*\w+)*)\}|\.(\w+)").unwrap());

/// Ordered list of extensions tried when a specifier has none.
///
/// Earlier entries win when several files could satisfy the same specifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtensionPriority {
    extensions: Vec<String>,
}

impl Default for ExtensionPriority {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

impl ExtensionPriority {
    /// Use `extensions` verbatim as the priority order (leading dots are dropped)
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ordered: Vec<String> = Vec::new();
        for ext in extensions {
            let ext = ext.as_ref().trim().trim_start_matches('.').to_ascii_lowercase();
            if !ext.is_empty() && !ordered.contains(&ext) {
                ordered.push(ext);
            }
        }
        Self { extensions: ordered }
    }

    /// Derive the known extensions from include globs such as `src/**/*.{ts,tsx}`.
    ///
    /// Discovered extensions are ordered by their default rank; extensions the
    /// default order does not know sort last in discovery order. When the
    /// patterns name no extension at all, the default list applies.
    pub fn from_include_patterns<S: AsRef<str>>(patterns: &[S]) -> Self {
        let mut discovered: Vec<String> = Vec::new();

        for pattern in patterns {
            let pattern = pattern.as_ref();
            let last_segment = pattern.rsplit('/').next().unwrap_or(pattern);
            let Some(caps) = PATTERN_EXTENSION.captures_iter(last_segment).last() else {
                continue;
            };

            let names: Vec<&str> = match (caps.get(1), caps.get(2)) {
                (Some(list), _) => list.as_str().split(',').map(str::trim).collect(),
                (None, Some(single)) => vec![single.as_str()],
                _ => Vec::new(),
            };

            for name in names {
                let name = name.to_ascii_lowercase();
                if !discovered.contains(&name) {
                    discovered.push(name);
                }
            }
        }

        if discovered.is_empty() {
            return Self::default();
        }

        // sort_by_key is stable, so unranked extensions keep discovery order
        discovered.sort_by_key(|ext| default_rank(ext).unwrap_or(usize::MAX));
        Self { extensions: discovered }
    }

    /// Position of `ext` in this order; lower wins
    pub fn rank(&self, ext: &str) -> Option<usize> {
        let ext = ext.trim_start_matches('.');
        self.extensions.iter().position(|known| known.eq_ignore_ascii_case(ext))
    }

    pub fn is_known(&self, ext: &str) -> bool {
        self.rank(ext).is_some()
    }

    /// Known to this order or to the default one; such a suffix is taken as
    /// written instead of having another extension appended
    pub fn is_recognised(&self, ext: &str) -> bool {
        self.is_known(ext) || default_rank(&ext.trim_start_matches('.').to_ascii_lowercase()).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }
}

fn default_rank(ext: &str) -> Option<usize> {
    DEFAULT_EXTENSIONS.iter().position(|known| *known == ext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_category_from_path() {
        assert_eq!(
            FileCategory::from_path(&PathBuf::from("src/App.TSX")),
            FileCategory::Script(ScriptDialect::Tsx)
        );
        assert_eq!(
            FileCategory::from_path(&PathBuf::from("src/index.mjs")),
            FileCategory::Script(ScriptDialect::Js)
        );
        assert_eq!(FileCategory::from_path(&PathBuf::from("src/App.vue")), FileCategory::Component);
        assert_eq!(
            FileCategory::from_path(&PathBuf::from("src/theme.sass")),
            FileCategory::Stylesheet(StyleDialect::Sass)
        );
        assert_eq!(FileCategory::from_path(&PathBuf::from("src/logo.png")), FileCategory::Opaque);
        assert_eq!(FileCategory::from_path(&PathBuf::from("src/Makefile")), FileCategory::Opaque);
        assert!(!FileCategory::Opaque.is_extractable());
    }

    #[test]
    fn test_default_priority_prefers_jsx_variants() {
        let priority = ExtensionPriority::default();
        assert!(priority.rank("vue") < priority.rank("tsx"));
        assert!(priority.rank("tsx") < priority.rank("ts"));
        assert!(priority.rank(".ts") < priority.rank("css"));
        assert!(priority.rank("css") < priority.rank("png"));
        assert_eq!(priority.rank("exe"), None);
    }

    #[test]
    fn test_from_include_patterns_brace_list() {
        let priority = ExtensionPriority::from_include_patterns(&["src/**/*.{ts,tsx}", "src/**/*.scss"]);
        assert_eq!(priority.iter().collect::<Vec<_>>(), vec!["tsx", "ts", "scss"]);
    }

    #[test]
    fn test_from_include_patterns_unknown_sorts_last() {
        let priority = ExtensionPriority::from_include_patterns(&["src/**/*.md", "src/**/*.html", "src/**/*.js"]);
        assert_eq!(priority.iter().collect::<Vec<_>>(), vec!["js", "md", "html"]);
    }

    #[test]
    fn test_from_include_patterns_falls_back_to_default() {
        let priority = ExtensionPriority::from_include_patterns(&["src/**/*"]);
        assert_eq!(priority, ExtensionPriority::default());
    }

    #[test]
    fn test_compound_suffix_uses_last_extension() {
        let priority = ExtensionPriority::from_include_patterns(&["src/**/*.module.css"]);
        assert_eq!(priority.iter().collect::<Vec<_>>(), vec!["css"]);
    }

    #[test]
    fn test_recognised_covers_default_table() {
        let priority = ExtensionPriority::from_include_patterns(&["src/**/*.ts"]);
        assert!(priority.is_recognised("ts"));
        assert!(priority.is_recognised("PNG"));
        assert!(!priority.is_known("png"));
        assert!(!priority.is_recognised("module"));
        assert!(!priority.is_recognised("md"));
    }
}
