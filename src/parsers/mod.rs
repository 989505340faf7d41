//! Specifier extraction
//!
//! Each file category has one extractor strategy. Extractors are pure: they
//! take file text and return the raw specifiers it references, never touching
//! the file system. A malformed file yields whatever could be salvaged plus a
//! diagnostic, never an error.

pub mod component;
pub mod fallback;
pub mod markup;
pub mod script;
pub mod stylesheet;

use std::sync::Arc;

use crate::models::file_category::FileCategory;

pub use component::ComponentExtractor;
pub use script::{AllocatorPool, ScriptExtractor};
pub use stylesheet::StylesheetExtractor;

/// Specifiers found in one file, in first-seen order, plus any parse diagnostics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub specifiers: Vec<String>,
    pub diagnostics: Vec<String>,
}

impl Extraction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalise and record a raw specifier. Non-local and duplicate
    /// specifiers are dropped.
    pub fn push(&mut self, raw: &str) {
        if let Some(specifier) = normalize_specifier(raw) {
            if !self.specifiers.contains(&specifier) {
                self.specifiers.push(specifier);
            }
        }
    }

    pub fn push_diagnostic(&mut self, message: impl Into<String>) {
        self.diagnostics.push(message.into());
    }

    /// Append another extraction, keeping first-seen order
    pub fn merge(&mut self, other: Extraction) {
        for specifier in other.specifiers {
            if !self.specifiers.contains(&specifier) {
                self.specifiers.push(specifier);
            }
        }
        self.diagnostics.extend(other.diagnostics);
    }

    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// One extraction strategy
pub trait SpecifierExtractor: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Whether this strategy reads files of `category`
    fn handles(&self, category: FileCategory) -> bool;

    /// Collect the specifiers referenced by `text`
    fn extract(&self, category: FileCategory, text: &str) -> Extraction;
}

/// Dispatches a file category to the extractor that handles it
pub struct ExtractorSet {
    extractors: Vec<Arc<dyn SpecifierExtractor>>,
}

impl ExtractorSet {
    /// The built-in strategies; components delegate to the script and stylesheet ones
    pub fn new() -> Self {
        let script = Arc::new(ScriptExtractor::new());
        let stylesheet = Arc::new(StylesheetExtractor::new());
        let component = Arc::new(ComponentExtractor::new(script.clone(), stylesheet.clone()));

        Self {
            extractors: vec![script as Arc<dyn SpecifierExtractor>, component, stylesheet],
        }
    }

    pub fn extractor_for(&self, category: FileCategory) -> Option<&dyn SpecifierExtractor> {
        self.extractors
            .iter()
            .find(|e| e.handles(category))
            .map(|e| e.as_ref())
    }

    /// Extract with whichever strategy handles `category`; opaque files yield nothing
    pub fn extract(&self, category: FileCategory, text: &str) -> Extraction {
        match self.extractor_for(category) {
            Some(extractor) => extractor.extract(category, text),
            None => Extraction::new(),
        }
    }
}

impl Default for ExtractorSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Trim, drop `?query`/`#fragment`, and reject anything that can never be a
/// local file.
pub fn normalize_specifier(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let end = trimmed.find(['?', '#']).unwrap_or(trimmed.len());
    let specifier = trimmed[..end].trim();

    if specifier.is_empty() || is_non_local(specifier) {
        return None;
    }
    Some(specifier.to_string())
}

/// Network URLs, data URIs, other URI schemes and template placeholders
pub fn is_non_local(specifier: &str) -> bool {
    const SCHEMES: &[&str] = &["http://", "https://", "//", "data:", "mailto:", "tel:", "javascript:"];

    let lower = specifier.to_ascii_lowercase();
    SCHEMES.iter().any(|scheme| lower.starts_with(scheme)) || specifier.contains("{{") || specifier.contains("${")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::file_category::{ScriptDialect, StyleDialect};

    #[test]
    fn test_normalize_strips_query_and_fragment() {
        assert_eq!(normalize_specifier(" ./icon.svg?raw "), Some("./icon.svg".to_string()));
        assert_eq!(normalize_specifier("./font.woff#iefix"), Some("./font.woff".to_string()));
        assert_eq!(normalize_specifier("?inline"), None);
        assert_eq!(normalize_specifier("   "), None);
    }

    #[test]
    fn test_non_local_specifiers_are_dropped() {
        for raw in [
            "https://cdn.example.com/x.js",
            "HTTP://example.com/a.png",
            "//cdn.example.com/y.css",
            "data:image/png;base64,AAAA",
            "mailto:someone@example.com",
            "./{{ asset }}.png",
            "./img/${name}.png",
        ] {
            assert_eq!(normalize_specifier(raw), None, "{raw} should be non-local");
        }
    }

    #[test]
    fn test_extraction_dedupes_in_order() {
        let mut extraction = Extraction::new();
        extraction.push("./b");
        extraction.push("./a");
        extraction.push("./b?x");
        assert_eq!(extraction.specifiers, vec!["./b", "./a"]);
    }

    #[test]
    fn test_set_dispatches_by_category() {
        let set = ExtractorSet::new();
        assert_eq!(
            set.extractor_for(FileCategory::Script(ScriptDialect::Ts)).map(|e| e.name()),
            Some("script")
        );
        assert_eq!(set.extractor_for(FileCategory::Component).map(|e| e.name()), Some("component"));
        assert_eq!(
            set.extractor_for(FileCategory::Stylesheet(StyleDialect::Less)).map(|e| e.name()),
            Some("stylesheet")
        );
        assert!(set.extractor_for(FileCategory::Opaque).is_none());
        assert_eq!(set.extract(FileCategory::Opaque, "import './x'"), Extraction::new());
    }
}
