//! Pattern-based specifier scanner
//!
//! Used when a script does not parse cleanly, and for script-like snippets in
//! markup. It knows nothing about syntax, so it can report specifiers from
//! comments or strings; that is accepted for files the parser gave up on.

use once_cell::sync::Lazy;
use regex::Regex;

/// `import "./x"` (side-effect import)
static SIDE_EFFECT_IMPORT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\bimport\s+["']([^"'\n]+)["']"#).unwrap());

/// `... from "./x"` (static import and re-export)
static FROM_CLAUSE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"\bfrom\s+["']([^"'\n]+)["']"#).unwrap());

/// `import("./x")`, which also covers `lazy(() => import("./x"))`
static DYNAMIC_IMPORT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\bimport\s*\(\s*["'`]([^"'`\n$]+)["'`]\s*[,)]"#).unwrap());

/// `require("./x")` and `require.resolve("./x")`
static REQUIRE_CALL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\brequire(?:\.resolve)?\s*\(\s*["'`]([^"'`\n$]+)["'`]\s*\)"#).unwrap());

/// `new URL("./x", import.meta.url)`
static URL_CONSTRUCTOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\bnew\s+URL\s*\(\s*["'`]([^"'`\n$]+)["'`]\s*,\s*import\.meta\.url"#).unwrap());

fn patterns() -> [&'static Regex; 5] {
    [
        &SIDE_EFFECT_IMPORT,
        &FROM_CLAUSE,
        &DYNAMIC_IMPORT,
        &REQUIRE_CALL,
        &URL_CONSTRUCTOR,
    ]
}

/// Raw specifiers in source order, duplicates kept
pub fn scan(text: &str) -> Vec<&str> {
    let mut found: Vec<(usize, &str)> = Vec::new();

    for pattern in patterns() {
        for caps in pattern.captures_iter(text) {
            if let Some(m) = caps.get(1) {
                found.push((m.start(), m.as_str()));
            }
        }
    }

    found.sort_by_key(|(pos, _)| *pos);
    found.dedup_by_key(|(pos, _)| *pos);
    found.into_iter().map(|(_, specifier)| specifier).collect()
}

/// Only the `import(...)` pattern, for template expressions
pub fn scan_dynamic_imports(text: &str) -> Vec<&str> {
    DYNAMIC_IMPORT
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}
