//! Stylesheet specifier extraction for CSS, SCSS, Sass and Less

use once_cell::sync::Lazy;
use regex::Regex;

use super::{Extraction, SpecifierExtractor};
use crate::models::file_category::{FileCategory, StyleDialect};

/// `@import <params>` up to the end of the statement or line
static IMPORT_RULE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)@import\s+([^;\n]+)").unwrap());

/// `@use "x"` / `@forward "x"`
static USE_RULE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)@(?:use|forward)\s+(?:"([^"]+)"|'([^']+)')"#).unwrap());

/// `url(x)`, `url('x')`, `url("x")`
static URL_FUNCTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\burl\(\s*(?:"([^"]*)"|'([^']*)'|([^)'"\s]+))\s*\)"#).unwrap());

/// Less import options such as `(reference)` or `(css, optional)`
static LESS_OPTIONS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\(\s*[\w\s,-]*\)\s*").unwrap());

/// Leading quoted string of an import item
static QUOTED: Lazy<Regex> = Lazy::new(|| Regex::new(r#"^(?:"([^"]*)"|'([^']*)')"#).unwrap());

/// Extracts `@import`, `@use`, `@forward` and `url()` targets
#[derive(Debug, Clone, Copy, Default)]
pub struct StylesheetExtractor;

impl StylesheetExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Collect the specifiers of a stylesheet written in `dialect`
    pub fn extract_dialect(&self, dialect: StyleDialect, text: &str) -> Extraction {
        let source = strip_comments(text, dialect.has_line_comments());
        let mut found: Vec<(usize, String)> = Vec::new();

        for caps in IMPORT_RULE.captures_iter(&source) {
            if let Some(params) = caps.get(1) {
                for (offset, target) in import_targets(params.as_str(), dialect) {
                    found.push((params.start() + offset, target));
                }
            }
        }

        for caps in USE_RULE.captures_iter(&source) {
            if let Some(m) = caps.get(1).or_else(|| caps.get(2)) {
                found.push((m.start(), m.as_str().to_string()));
            }
        }

        for caps in URL_FUNCTION.captures_iter(&source) {
            if let Some(m) = caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)) {
                found.push((m.start(), m.as_str().to_string()));
            }
        }

        found.sort_by_key(|(pos, _)| *pos);

        let mut extraction = Extraction::new();
        for (_, specifier) in &found {
            extraction.push(specifier);
        }
        extraction
    }
}

impl SpecifierExtractor for StylesheetExtractor {
    fn name(&self) -> &'static str {
        "stylesheet"
    }

    fn handles(&self, category: FileCategory) -> bool {
        matches!(category, FileCategory::Stylesheet(_))
    }

    fn extract(&self, category: FileCategory, text: &str) -> Extraction {
        let dialect = match category {
            FileCategory::Stylesheet(dialect) => dialect,
            _ => StyleDialect::Css,
        };
        self.extract_dialect(dialect, text)
    }
}

/// Targets named by the parameters of one `@import`, with their byte offsets
/// into `params`. `url()` items are left to the `url()` scan.
fn import_targets(params: &str, dialect: StyleDialect) -> Vec<(usize, String)> {
    let mut targets = Vec::new();

    let skipped = LESS_OPTIONS.find(params).map_or(0, |m| m.end());
    let mut offset = skipped;

    for item in split_top_level(&params[skipped..]) {
        let leading = item.len() - item.trim_start().len();
        let trimmed = item.trim();
        let start = offset + leading;
        offset += item.len() + 1;

        if let Some(caps) = QUOTED.captures(trimmed) {
            if let Some(m) = caps.get(1).or_else(|| caps.get(2)) {
                targets.push((start + m.start(), m.as_str().to_string()));
            }
        } else if dialect == StyleDialect::Sass && !trimmed.to_ascii_lowercase().starts_with("url(") {
            // the indented syntax allows bare `@import foo/bar`
            if let Some(token) = trimmed.split_whitespace().next() {
                targets.push((start, token.to_string()));
            }
        }
    }

    targets
}

/// Split on commas outside quotes and parentheses
fn split_top_level(params: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in params.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                items.push(&params[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    items.push(&params[start..]);
    items
}

/// Blank out `/* */` comments and, when enabled, `//` line comments, keeping
/// byte offsets stable. `//` only starts a comment outside strings and when
/// it does not follow a URL scheme or another non-space character.
fn strip_comments(text: &str, line_comments: bool) -> String {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut quote: Option<u8> = None;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];

        if let Some(q) = quote {
            out.push(b);
            if b == b'\\' && i + 1 < bytes.len() {
                out.push(bytes[i + 1]);
                i += 2;
                continue;
            }
            if b == q || b == b'\n' {
                quote = None;
            }
            i += 1;
            continue;
        }

        match b {
            b'"' | b'\'' => {
                quote = Some(b);
                out.push(b);
                i += 1;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let end = memchr::memmem::find(&bytes[i + 2..], b"*/").map_or(bytes.len(), |p| i + 2 + p + 2);
                blank(&bytes[i..end], &mut out);
                i = end;
            }
            b'/' if line_comments
                && bytes.get(i + 1) == Some(&b'/')
                && (i == 0 || bytes[i - 1].is_ascii_whitespace() || matches!(bytes[i - 1], b';' | b'{' | b'}')) =>
            {
                let end = memchr::memchr(b'\n', &bytes[i..]).map_or(bytes.len(), |p| i + p);
                blank(&bytes[i..end], &mut out);
                i = end;
            }
            _ => {
                out.push(b);
                i += 1;
            }
        }
    }

    // only ASCII bytes were replaced, and only with spaces or newlines
    String::from_utf8(out).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

/// Replace a comment with spaces, keeping its newlines
fn blank(comment: &[u8], out: &mut Vec<u8>) {
    out.extend(comment.iter().map(|&b| if b == b'\n' { b'\n' } else { b' ' }));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(dialect: StyleDialect, text: &str) -> Vec<String> {
        StylesheetExtractor::new().extract_dialect(dialect, text).specifiers
    }

    #[test]
    fn test_css_imports_and_urls() {
        let specifiers = extract(
            StyleDialect::Css,
            r#"
            @import "./reset.css";
            @import url('./print.css') print;
            .hero { background: url(./img/hero.png) no-repeat; }
            .icon { background-image: url("data:image/svg+xml;utf8,<svg/>"); }
            .remote { background: url(https://cdn.example.com/bg.png); }
            "#,
        );
        assert_eq!(specifiers, vec!["./reset.css", "./print.css", "./img/hero.png"]);
    }

    #[test]
    fn test_scss_lists_use_forward_and_comments() {
        let specifiers = extract(
            StyleDialect::Scss,
            r#"
            // @import "./commented-out";
            /* @import "./also-commented"; */
            @use "sass:math";
            @use './tokens' as t;
            @forward "./mixins";
            @import "variables", "./theme.scss";
            .logo { background: url("../assets/logo.svg"); } // trailing
            "#,
        );
        assert_eq!(
            specifiers,
            vec!["sass:math", "./tokens", "./mixins", "variables", "./theme.scss", "../assets/logo.svg"]
        );
    }

    #[test]
    fn test_less_import_options() {
        let specifiers = extract(
            StyleDialect::Less,
            r#"@import (reference) "./bootstrap.less";
               @import (css, optional) './extra.css';"#,
        );
        assert_eq!(specifiers, vec!["./bootstrap.less", "./extra.css"]);
    }

    #[test]
    fn test_sass_indented_unquoted_import() {
        let specifiers = extract(StyleDialect::Sass, "@import partials/buttons\n.a\n  color: red\n");
        assert_eq!(specifiers, vec!["partials/buttons"]);
    }

    #[test]
    fn test_line_comment_does_not_eat_urls() {
        let specifiers = extract(
            StyleDialect::Scss,
            ".a { background: url(//cdn.example.com/x.png); b: url(./keep.png); }",
        );
        assert_eq!(specifiers, vec!["./keep.png"]);
    }
}
