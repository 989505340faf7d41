//! Resource references in component templates

use once_cell::sync::Lazy;
use regex::Regex;

use super::{fallback, Extraction};

/// `<!-- ... -->`
static HTML_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());

/// Literal `src="..."`, `href='...'`, `poster`, `srcset`. The leading
/// whitespace keeps `data-src` and bound `:src` out.
static LITERAL_ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\s(src|href|poster|srcset)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
});

/// Vue-bound `:src="..."` or `v-bind:src="..."`
static BOUND_ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\s(?::|v-bind:)(src|href|poster)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
});

/// A bound expression that is one quoted string
static QUOTED_EXPRESSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^\s*(?:'([^']*)'|"([^"]*)"|`([^`$]*)`)\s*$"#).unwrap());

/// A bound expression that is `require("...")`
static REQUIRE_EXPRESSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^\s*require\(\s*['"`]([^'"`$]+)['"`]\s*\)\s*$"#).unwrap());

fn first_group<'t>(caps: &regex::Captures<'t>, groups: &[usize]) -> Option<&'t str> {
    groups.iter().find_map(|&i| caps.get(i)).map(|m| m.as_str())
}

/// Collect resource references from template markup into `extraction`
pub fn extract_markup(markup: &str, extraction: &mut Extraction) {
    let markup = HTML_COMMENT.replace_all(markup, "");

    for caps in LITERAL_ATTRIBUTE.captures_iter(&markup) {
        let Some(value) = first_group(&caps, &[2, 3]) else {
            continue;
        };
        let is_srcset = caps
            .get(1)
            .is_some_and(|name| name.as_str().eq_ignore_ascii_case("srcset"));

        if is_srcset {
            // "a.png 1x, b.png 2x": each candidate's URL is the first token
            for candidate in value.split(',') {
                if let Some(url) = candidate.split_whitespace().next() {
                    extraction.push(url);
                }
            }
        } else {
            extraction.push(value);
        }
    }

    for caps in BOUND_ATTRIBUTE.captures_iter(&markup) {
        let Some(expression) = first_group(&caps, &[2, 3]) else {
            continue;
        };
        if let Some(inner) = QUOTED_EXPRESSION.captures(expression) {
            if let Some(value) = first_group(&inner, &[1, 2, 3]) {
                extraction.push(value);
            }
        } else if let Some(inner) = REQUIRE_EXPRESSION.captures(expression) {
            if let Some(value) = first_group(&inner, &[1]) {
                extraction.push(value);
            }
        }
    }

    for specifier in fallback::scan_dynamic_imports(&markup) {
        extraction.push(specifier);
    }
}
