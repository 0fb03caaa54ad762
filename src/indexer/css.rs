use crate::error::Result;
use crate::indexer::comments::{blank_block_comments, scan_block_comments};
use crate::indexer::extract::{Language, LanguageExtractor, RelationRecord, Selector, StyleRecord};
use crate::util::split_top_level;
use indexmap::{IndexMap, IndexSet};
use regex::Regex;
use std::sync::LazyLock;

static RULE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([^{}]+)\{([^{}]*)\}").unwrap());
static CLASS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.([A-Za-z_][\w-]*)").unwrap());
static ID_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#([A-Za-z_][\w-]*)").unwrap());

/// Regex-based stylesheet scanner.
///
/// Only innermost `prelude { body }` blocks match, so at-rule wrappers such as
/// `@media` are skipped while the rules inside them are kept.
#[derive(Debug, Default)]
pub struct CssExtractor;

impl CssExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract_record(&self, path: &str, source: &str) -> StyleRecord {
        let mut record = StyleRecord {
            path: path.to_string(),
            comments: scan_block_comments(source),
            ..Default::default()
        };
        let text = blank_block_comments(source);
        for caps in RULE_RE.captures_iter(&text) {
            let prelude = caps[1].rsplit(';').next().unwrap_or("").trim();
            if prelude.is_empty() {
                continue;
            }
            let parts: Vec<String> = split_top_level(prelude, ',')
                .into_iter()
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(str::to_string)
                .collect();
            for part in &parts {
                collect_tokens(part, &mut record.class_tokens, &mut record.id_tokens);
            }
            record.selectors.push(Selector {
                selector: prelude.to_string(),
                parts,
                properties: parse_properties(&caps[2]),
            });
        }
        record
    }
}

impl LanguageExtractor for CssExtractor {
    fn language(&self) -> Language {
        Language::Css
    }

    fn extract(&mut self, path: &str, source: &str) -> Result<RelationRecord> {
        Ok(RelationRecord::Css(self.extract_record(path, source)))
    }
}

fn collect_tokens(selector: &str, classes: &mut IndexSet<String>, ids: &mut IndexSet<String>) {
    for caps in CLASS_RE.captures_iter(selector) {
        classes.insert(format!(".{}", &caps[1]));
    }
    for caps in ID_RE.captures_iter(selector) {
        ids.insert(format!("#{}", &caps[1]));
    }
}

/// `name: value` declarations; a repeated name keeps its first position and last value.
fn parse_properties(body: &str) -> IndexMap<String, String> {
    let mut properties = IndexMap::new();
    for declaration in body.split(';') {
        let Some((name, value)) = declaration.split_once(':') else {
            continue;
        };
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        properties.insert(name.to_string(), value.trim().to_string());
    }
    properties
}
