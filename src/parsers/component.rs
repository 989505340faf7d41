//! Single-file component extraction (Vue, Svelte)
//!
//! A component is split into `<script>` blocks, `<style>` blocks and the
//! markup around them. Script and style blocks are handed to the script and
//! stylesheet extractors according to their `lang` attribute; the markup is
//! scanned for resource attributes.

use memchr::memmem;
use std::sync::Arc;

use super::{markup, Extraction, ScriptExtractor, SpecifierExtractor, StylesheetExtractor};
use crate::models::file_category::{FileCategory, ScriptDialect, StyleDialect};

/// One `<script>` or `<style>` block
#[derive(Debug, Clone, PartialEq, Eq)]
struct Block<'a> {
    lang: Option<&'a str>,
    content: &'a str,
    /// Byte range of `content` in the component source
    content_start: usize,
    content_end: usize,
}

/// Extracts specifiers from `.vue` and `.svelte` files
pub struct ComponentExtractor {
    script: Arc<ScriptExtractor>,
    stylesheet: Arc<StylesheetExtractor>,
}

impl ComponentExtractor {
    pub fn new(script: Arc<ScriptExtractor>, stylesheet: Arc<StylesheetExtractor>) -> Self {
        Self { script, stylesheet }
    }

    pub fn extract_component(&self, source: &str) -> Extraction {
        let mut extraction = Extraction::new();

        let (scripts, script_error) = find_blocks(source, "script");
        let (styles, style_error) = find_blocks(source, "style");
        extraction.diagnostics.extend(script_error);
        extraction.diagnostics.extend(style_error);

        for block in &scripts {
            let dialect = script_dialect(block.lang);
            let mut part = self.script.extract_dialect(dialect, block.content);
            part.diagnostics = part
                .diagnostics
                .into_iter()
                .map(|d| format!("<script> block: {}", d))
                .collect();
            extraction.merge(part);
        }

        let markup_text = blank_blocks(source, scripts.iter().chain(styles.iter()));
        markup::extract_markup(&markup_text, &mut extraction);

        for block in &styles {
            let dialect = StyleDialect::from_lang(block.lang.unwrap_or("css"));
            extraction.merge(self.stylesheet.extract_dialect(dialect, block.content));
        }

        extraction
    }
}

impl SpecifierExtractor for ComponentExtractor {
    fn name(&self) -> &'static str {
        "component"
    }

    fn handles(&self, category: FileCategory) -> bool {
        matches!(category, FileCategory::Component)
    }

    fn extract(&self, _category: FileCategory, text: &str) -> Extraction {
        self.extract_component(text)
    }
}

fn script_dialect(lang: Option<&str>) -> ScriptDialect {
    match lang.map(|l| l.trim().to_ascii_lowercase()).as_deref() {
        Some("ts" | "typescript") => ScriptDialect::Ts,
        Some("tsx") => ScriptDialect::Tsx,
        Some("jsx") => ScriptDialect::Jsx,
        _ => ScriptDialect::Js,
    }
}

/// All `<tag ...>...</tag>` blocks in `source`. An unclosed block ends the
/// scan and is reported as a diagnostic.
fn find_blocks<'a>(source: &'a str, tag: &str) -> (Vec<Block<'a>>, Option<String>) {
    let bytes = source.as_bytes();
    let open = format!("<{}", tag);
    let close = format!("</{}", tag);
    let mut blocks = Vec::new();
    let mut pointer = 0;

    while let Some(found) = memmem::find(&bytes[pointer..], open.as_bytes()) {
        let tag_start = pointer + found;
        let attrs_start = tag_start + open.len();
        pointer = attrs_start;

        // `<scripts>` or `<style-guide>` are different elements
        match bytes.get(attrs_start) {
            Some(b' ' | b'\t' | b'\n' | b'\r' | b'>' | b'/') => {}
            _ => continue,
        }

        let Some(tag_end) = find_closing_angle(bytes, attrs_start) else {
            return (blocks, Some(format!("unclosed <{}> tag at byte {}", tag, tag_start)));
        };
        let attributes = &source[attrs_start..tag_end];
        let lang = attribute_value(attributes, "lang");

        if tag_end > attrs_start && bytes[tag_end - 1] == b'/' {
            pointer = tag_end + 1;
            continue;
        }

        let content_start = tag_end + 1;
        let Some(end) = memmem::find(&bytes[content_start..], close.as_bytes()) else {
            return (blocks, Some(format!("missing </{}> for block at byte {}", tag, tag_start)));
        };
        let content_end = content_start + end;

        blocks.push(Block {
            lang,
            content: &source[content_start..content_end],
            content_start,
            content_end,
        });
        pointer = content_end + close.len();
    }

    (blocks, None)
}

/// Position of the `>` ending a start tag, skipping quoted attribute values
fn find_closing_angle(bytes: &[u8], start: usize) -> Option<usize> {
    let mut quote: Option<u8> = None;

    for (i, &byte) in bytes[start..].iter().enumerate() {
        match (quote, byte) {
            (Some(q), b) if b == q => quote = None,
            (Some(_), _) => {}
            (None, b'"' | b'\'') => quote = Some(byte),
            (None, b'>') => return Some(start + i),
            _ => {}
        }
    }

    None
}

/// Value of `name="..."`, `name='...'` or `name=value` in a start tag
fn attribute_value<'a>(attributes: &'a str, name: &str) -> Option<&'a str> {
    let mut search_from = 0;

    while let Some(found) = attributes[search_from..].find(name) {
        let name_start = search_from + found;
        let name_end = name_start + name.len();
        search_from = name_end;

        let preceded_ok = name_start == 0
            || attributes[..name_start]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_whitespace());
        if !preceded_ok {
            continue;
        }

        let rest = attributes[name_end..].trim_start();
        let Some(value) = rest.strip_prefix('=') else {
            continue;
        };
        let value = value.trim_start();

        return match value.chars().next() {
            Some(q @ ('"' | '\'')) => value[1..].find(q).map(|end| &value[1..1 + end]),
            Some(_) => value
                .split(|c: char| c.is_whitespace() || c == '>' || c == '/')
                .next(),
            None => None,
        };
    }

    None
}

/// Copy of `source` with block contents replaced by spaces, so markup
/// scanning never sees script or style text
fn blank_blocks<'a, I>(source: &str, blocks: I) -> String
where
    I: Iterator<Item = &'a Block<'a>>,
{
    let mut ranges: Vec<(usize, usize)> = blocks.map(|b| (b.content_start, b.content_end)).collect();
    ranges.sort_unstable();

    let mut out = String::with_capacity(source.len());
    let mut cursor = 0;
    for (start, end) in ranges {
        if start < cursor {
            continue;
        }
        out.push_str(&source[cursor..start]);
        out.extend(source[start..end].chars().map(|c| if c == '\n' { '\n' } else { ' ' }));
        cursor = end;
    }
    out.push_str(&source[cursor..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> ComponentExtractor {
        ComponentExtractor::new(Arc::new(ScriptExtractor::new()), Arc::new(StylesheetExtractor::new()))
    }

    #[test]
    fn test_vue_component_regions() {
        let source = r#"<template>
  <div class="app">
    <img src="./assets/logo.png" />
    <img :src="require('@/assets/banner.jpg')" />
    <Chart v-if="show" />
  </div>
</template>

<script setup lang="ts">
import Chart from "./Chart.vue";
import { useStore } from "@/stores/main";
const Modal = defineAsyncComponent(() => import("./Modal.vue"));
</script>

<style lang="scss" scoped>
@import "./theme.scss";
.app { background: url("./assets/bg.png"); }
</style>
"#;

        let result = extractor().extract_component(source);
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
        assert_eq!(
            result.specifiers,
            vec![
                "./Chart.vue",
                "@/stores/main",
                "./Modal.vue",
                "./assets/logo.png",
                "@/assets/banner.jpg",
                "./theme.scss",
                "./assets/bg.png"
            ]
        );
    }

    #[test]
    fn test_svelte_component() {
        let source = r#"<script>
  import Button from './Button.svelte';
</script>

<img src="./favicon.svg" alt="" />
<Button />

<style>
  @import './global.css';
</style>
"#;
        let result = extractor().extract_component(source);
        assert_eq!(
            result.specifiers,
            vec!["./Button.svelte", "./favicon.svg", "./global.css"]
        );
    }

    #[test]
    fn test_style_src_attribute_and_multiple_styles() {
        let source = r#"<template><div /></template>
<style src="./external.css"></style>
<style lang="less">@import (reference) "./vars.less";</style>
"#;
        let result = extractor().extract_component(source);
        assert_eq!(result.specifiers, vec!["./external.css", "./vars.less"]);
    }

    #[test]
    fn test_script_text_is_not_scanned_as_markup() {
        let source = "<script>\nconst html = '<img src=\"./not-markup.png\">';\n</script>\n";
        let result = extractor().extract_component(source);
        assert!(result.specifiers.is_empty());
    }

    #[test]
    fn test_unclosed_script_block_is_a_diagnostic() {
        let source = "<template><img src=\"./a.png\"></template>\n<script>\nimport x from './x'\n";
        let result = extractor().extract_component(source);
        assert!(result.has_diagnostics());
        assert!(result.specifiers.contains(&"./a.png".to_string()));
    }

    #[test]
    fn test_attribute_value() {
        assert_eq!(attribute_value(r#" setup lang="ts""#, "lang"), Some("ts"));
        assert_eq!(attribute_value(" lang='scss' scoped", "lang"), Some("scss"));
        assert_eq!(attribute_value(" lang=tsx", "lang"), Some("tsx"));
        assert_eq!(attribute_value(r#" xml:lang="en""#, "lang"), None);
        assert_eq!(attribute_value(" scoped", "lang"), None);
    }

    #[test]
    fn test_scripts_tag_is_not_a_script_block() {
        let (blocks, error) = find_blocks("<scripts>nope</scripts>", "script");
        assert!(blocks.is_empty());
        assert!(error.is_none());
    }
}
