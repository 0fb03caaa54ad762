use crate::error::Result;
use crate::indexer::comments::scan_c_style_comments;
use crate::indexer::extract::{
    AnonymousFunction, CallKind, CallSite, Definition, Language, LanguageExtractor,
    RelationRecord, ScriptRecord, index_calls,
};
use regex::Regex;
use std::sync::LazyLock;

static FUNCTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bfunction\s+([A-Za-z_]\w*)\s*\(").unwrap());
static ARROW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-Za-z_]\w*)\s*=\s*\([^)]*\)\s*=>").unwrap());
static CALL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b([A-Za-z_]\w*)\s*\(").unwrap());

/// Line-oriented heuristics for JavaScript. Keywords such as `if (` and the
/// `function name(` header itself show up as calls.
#[derive(Debug, Default)]
pub struct JavascriptExtractor;

impl JavascriptExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract_record(&self, path: &str, source: &str) -> ScriptRecord {
        let mut record = ScriptRecord {
            path: path.to_string(),
            ..Default::default()
        };
        for (idx, line) in source.lines().enumerate() {
            let line_no = idx + 1;
            for caps in FUNCTION_RE.captures_iter(line) {
                record
                    .definitions
                    .push(Definition::at_line(&caps[1], line_no));
            }
            for caps in ARROW_RE.captures_iter(line) {
                record.anonymous_functions.push(AnonymousFunction {
                    kind_label: "arrow".to_string(),
                    line: line_no,
                    binding: Some(caps[1].to_string()),
                });
            }
            for caps in CALL_RE.captures_iter(line) {
                record.calls.push(CallSite {
                    caller: None,
                    callee: Some(caps[1].to_string()),
                    line: line_no,
                    call_kind: CallKind::Name,
                    source_text: None,
                });
            }
        }
        record.calls_by_name = index_calls(path, &record.calls);
        record.comments = scan_c_style_comments(source);
        record
    }
}

impl LanguageExtractor for JavascriptExtractor {
    fn language(&self) -> Language {
        Language::Javascript
    }

    fn extract(&mut self, path: &str, source: &str) -> Result<RelationRecord> {
        Ok(RelationRecord::Javascript(self.extract_record(path, source)))
    }
}
