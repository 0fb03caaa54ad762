use crate::error::Result;
use crate::indexer::comments::scan_c_style_comments;
use crate::indexer::extract::{
    CRecord, CallKind, CallSite, Definition, FunctionPointerRef, Language, LanguageExtractor,
    RelationRecord, index_calls,
};
use crate::util::LineIndex;
use regex::Regex;
use std::sync::LazyLock;

static DEFINITION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-Za-z_]\w*)\s*\([^)]*\)\s*\{").unwrap());
static CALL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b([A-Za-z_]\w*)\s*\(").unwrap());
static POINTER_ASSIGN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(\*\s*(\w+)\s*\)\s*\(\)\s*=\s*(\w+)\s*;").unwrap());
static POINTER_CALL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-Za-z_]\w*)\s*\(\)\s*;").unwrap());

/// Words that look like `name(...) {` but open a control block.
const CONTROL_KEYWORDS: &[&str] = &["if", "while", "for", "switch", "return", "sizeof"];

/// Line-oriented heuristics for C sources. Never fails.
#[derive(Debug, Default)]
pub struct CExtractor;

impl CExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract_record(&self, path: &str, source: &str) -> CRecord {
        let mut record = CRecord {
            path: path.to_string(),
            ..Default::default()
        };

        for (idx, line) in source.lines().enumerate() {
            let line_no = idx + 1;
            let definition = DEFINITION_RE
                .captures_iter(line)
                .map(|caps| caps[1].to_string())
                .find(|name| !CONTROL_KEYWORDS.contains(&name.as_str()));
            if let Some(name) = definition {
                record.definitions.push(Definition::at_line(&name, line_no));
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

        record.function_pointer_refs = function_pointer_refs(source);
        record.calls_by_name = index_calls(path, &record.calls);
        record.comments = scan_c_style_comments(source);
        record
    }
}

impl LanguageExtractor for CExtractor {
    fn language(&self) -> Language {
        Language::C
    }

    fn extract(&mut self, path: &str, source: &str) -> Result<RelationRecord> {
        Ok(RelationRecord::C(self.extract_record(path, source)))
    }
}

/// Pointer assignments over the whole text first, then every `name();` per line.
fn function_pointer_refs(source: &str) -> Vec<FunctionPointerRef> {
    let lines = LineIndex::new(source);
    let mut refs: Vec<FunctionPointerRef> = POINTER_ASSIGN_RE
        .captures_iter(source)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(FunctionPointerRef {
                pointer: caps[1].to_string(),
                bound_function: Some(caps[2].to_string()),
                line: lines.line(whole.start()),
            })
        })
        .collect();
    for (idx, line) in source.lines().enumerate() {
        for caps in POINTER_CALL_RE.captures_iter(line) {
            refs.push(FunctionPointerRef {
                pointer: caps[1].to_string(),
                bound_function: None,
                line: idx + 1,
            });
        }
    }
    refs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_blocks_are_not_definitions() {
        let source = "int main(void) {\n    if (x) {\n    }\n}\n";
        let record = CExtractor::new().extract_record("main.c", source);
        let names: Vec<&str> = record
            .definitions
            .iter()
            .map(|def| def.name.as_str())
            .collect();
        assert_eq!(names, vec!["main"]);
    }

    #[test]
    fn pointer_assignment_binds_target() {
        let source = "void f(void) {}\nvoid (*handler)() = f;\nhandler();\n";
        let refs = function_pointer_refs(source);
        assert_eq!(refs[0].pointer, "handler");
        assert_eq!(refs[0].bound_function.as_deref(), Some("f"));
        assert_eq!(refs[0].line, 2);
        assert_eq!(refs[1].pointer, "handler");
        assert_eq!(refs[1].bound_function, None);
        assert_eq!(refs[1].line, 3);
    }
}
