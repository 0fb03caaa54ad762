use crate::error::Result;
use crate::indexer::extract::{
    Comment, Language, LanguageExtractor, MarkupRecord, RelationRecord, Tag,
};
use crate::util::LineIndex;
use indexmap::IndexMap;
use regex::Regex;
use std::sync::LazyLock;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<([A-Za-z][A-Za-z0-9-]*)([^>]*)>").unwrap());
static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([a-zA-Z0-9_\-:]+)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
});
static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--(.*?)-->").unwrap());
static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b[^>]*>(.*?)</script>").unwrap());
static STYLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style\b[^>]*>(.*?)</style>").unwrap());

#[derive(Debug, Default)]
pub struct HtmlExtractor;

impl HtmlExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract_record(&self, path: &str, source: &str) -> MarkupRecord {
        let lines = LineIndex::new(source);
        let mut record = MarkupRecord {
            path: path.to_string(),
            ..Default::default()
        };
        for caps in TAG_RE.captures_iter(source) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            record.tags.push(Tag {
                tag: caps[1].to_string(),
                attributes: parse_attributes(&caps[2]),
                line: lines.line(whole.start()),
            });
        }
        for caps in COMMENT_RE.captures_iter(source) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            record.comments.push(Comment {
                line: lines.line(whole.start()),
                text: caps[1].trim().to_string(),
            });
        }
        record.scripts = SCRIPT_RE
            .captures_iter(source)
            .map(|caps| caps[1].to_string())
            .collect();
        record.styles = STYLE_RE
            .captures_iter(source)
            .map(|caps| caps[1].to_string())
            .collect();
        record
    }
}

impl LanguageExtractor for HtmlExtractor {
    fn language(&self) -> Language {
        Language::Html
    }

    fn extract(&mut self, path: &str, source: &str) -> Result<RelationRecord> {
        Ok(RelationRecord::Html(self.extract_record(path, source)))
    }
}

/// Quoted `name="v"` / `name='v'` pairs. Unquoted and bare attributes are ignored.
fn parse_attributes(text: &str) -> IndexMap<String, String> {
    let mut attributes = IndexMap::new();
    for caps in ATTR_RE.captures_iter(text) {
        let value = caps
            .get(2)
            .or_else(|| caps.get(3))
            .map(|m| m.as_str())
            .unwrap_or("");
        attributes.insert(caps[1].to_string(), value.to_string());
    }
    attributes
}
