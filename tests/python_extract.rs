use relgraph::error::EngineError;
use relgraph::indexer::extract::{CallKind, ImportForm, LanguageExtractor, RelationRecord};
use relgraph::indexer::python::PythonExtractor;

const SOURCE: &str = r#"import os, sys as system
from ..pkg import x as y, z
from . import *


def outer(a):
    """Outer doc.

    More detail.
    """
    def inner():
        return helper(a)
    items = [1, 2]
    items.append(3)
    return inner()


async def fetch():
    import json
    return json.loads("{}")


square = lambda n: n * n
handlers[0]()
print(square(2))  # trailing note
"#;

#[test]
fn extract_definitions_with_spans_and_docs() {
    let mut extractor = PythonExtractor::new().unwrap();
    let record = extractor.extract_record("pkg/mod.py", SOURCE).unwrap();

    let defs: Vec<_> = record
        .definitions
        .iter()
        .map(|def| (def.name.as_str(), def.start_line, def.end_line))
        .collect();
    assert_eq!(
        defs,
        vec![
            ("outer", 6, Some(15)),
            ("inner", 11, Some(12)),
            ("fetch", 18, Some(20)),
        ]
    );
    assert_eq!(
        record.definitions[0].doc_text.as_deref(),
        Some("Outer doc.\n\nMore detail.")
    );
    assert_eq!(record.definitions[1].doc_text, None);
    assert!(record.definitions.iter().all(|def| def.size_metric.unwrap_or(0) > 0));

    assert_eq!(record.anonymous_functions.len(), 1);
    assert_eq!(record.anonymous_functions[0].kind_label, "lambda");
    assert_eq!(record.anonymous_functions[0].line, 23);
}

#[test]
fn extract_calls_with_callers_and_kinds() {
    let mut extractor = PythonExtractor::new().unwrap();
    let record = extractor.extract_record("pkg/mod.py", SOURCE).unwrap();

    let calls: Vec<_> = record
        .calls
        .iter()
        .map(|call| {
            (
                call.caller.as_deref(),
                call.callee.as_deref(),
                call.line,
                call.call_kind.label(),
            )
        })
        .collect();
    assert_eq!(
        calls,
        vec![
            (Some("inner"), Some("helper"), 12, "name".to_string()),
            (Some("outer"), Some("append"), 14, "attribute".to_string()),
            (Some("outer"), Some("inner"), 15, "name".to_string()),
            (Some("fetch"), Some("loads"), 20, "attribute".to_string()),
            (None, None, 24, "other:subscript".to_string()),
            (None, Some("print"), 25, "name".to_string()),
            (None, Some("square"), 25, "name".to_string()),
        ]
    );
    assert_eq!(record.calls[1].call_kind, CallKind::Attribute);
    assert_eq!(record.calls[1].source_text.as_deref(), Some("items.append(3)"));
}

#[test]
fn calls_by_name_mirrors_calls() {
    let mut extractor = PythonExtractor::new().unwrap();
    let record = extractor.extract_record("pkg/mod.py", SOURCE).unwrap();

    let indexed: usize = record.calls_by_name.values().map(Vec::len).sum();
    let named = record.calls.iter().filter(|call| call.callee.is_some()).count();
    assert_eq!(indexed, named);

    for (name, refs) in &record.calls_by_name {
        let expected: Vec<_> = record
            .calls
            .iter()
            .filter(|call| call.callee.as_deref() == Some(name.as_str()))
            .map(|call| (call.line, call.caller.clone()))
            .collect();
        let actual: Vec<_> = refs
            .iter()
            .map(|r| (r.line, r.caller.clone()))
            .collect();
        assert_eq!(actual, expected, "entries for {name}");
        assert!(refs.iter().all(|r| r.file == "pkg/mod.py"));
    }
}

#[test]
fn extract_imports_and_comments() {
    let mut extractor = PythonExtractor::new().unwrap();
    let record = extractor.extract_record("pkg/mod.py", SOURCE).unwrap();

    assert_eq!(record.imports.len(), 4);
    let direct = &record.imports[0];
    assert_eq!(direct.form, ImportForm::Direct);
    assert_eq!(direct.names, vec!["os", "sys"]);
    assert_eq!(direct.level, 0);

    let relative = &record.imports[1];
    assert_eq!(relative.form, ImportForm::From);
    assert_eq!(relative.module.as_deref(), Some("pkg"));
    assert_eq!(relative.names, vec!["x", "z"]);
    assert_eq!(relative.level, 2);

    let star = &record.imports[2];
    assert_eq!(star.module, None);
    assert_eq!(star.names, vec!["*"]);
    assert_eq!(star.level, 1);

    let nested = &record.imports[3];
    assert_eq!(nested.names, vec!["json"]);
    assert_eq!(nested.line, 19);

    assert_eq!(record.comments.len(), 1);
    assert_eq!(record.comments[0].line, 25);
    assert_eq!(record.comments[0].text, "trailing note");
}

#[test]
fn hash_inside_string_is_reported_as_comment() {
    let mut extractor = PythonExtractor::new().unwrap();
    let record = extractor
        .extract_record("s.py", "label = \"#tag\"\n")
        .unwrap();
    assert_eq!(record.comments.len(), 1);
    assert_eq!(record.comments[0].text, "tag\"");
}

#[test]
fn invalid_source_is_a_syntax_fault() {
    let mut extractor = PythonExtractor::new().unwrap();
    let err = extractor
        .extract_record("bad.py", "def ok():\n    pass\n\ndef broken(:\n    pass\n")
        .unwrap_err();
    match err {
        EngineError::Syntax(fault) => {
            assert_eq!(fault.path, "bad.py");
            assert!(fault.line >= 4 && fault.line <= 5, "line {}", fault.line);
            assert!(fault.column >= 1);
            assert!(!fault.message.is_empty());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn trait_extract_wraps_python_record() {
    let mut extractor = PythonExtractor::new().unwrap();
    let record = extractor.extract("a.py", "def f():\n    pass\n").unwrap();
    assert!(matches!(record, RelationRecord::Python(_)));
    assert_eq!(record.path(), "a.py");
    assert_eq!(record.definitions().len(), 1);
}

fn fault_of(source: &str) -> relgraph::error::SyntaxFault {
    let mut extractor = PythonExtractor::new().unwrap();
    match extractor.extract_record("bad.py", source) {
        Err(EngineError::Syntax(fault)) => fault,
        Err(other) => panic!("unexpected error: {other}"),
        Ok(record) => panic!("accepted invalid source: {record:?}"),
    }
}

#[test]
fn body_without_indentation_is_a_syntax_fault() {
    let fault = fault_of("def f():\nreturn 1\n");
    assert!(fault.line <= 2, "line {}", fault.line);
    assert!(fault.message.contains("indented block"), "{}", fault.message);
}

#[test]
fn unexpected_indent_is_a_syntax_fault() {
    let fault = fault_of("x = 1\n  y = 2\n");
    assert_eq!(fault.line, 2);
    assert_eq!(fault.column, 3);
}

#[test]
fn mismatched_dedent_is_a_syntax_fault() {
    let fault = fault_of("class A:\n    pass\n  def g(self): pass\n");
    assert_eq!(fault.line, 3);
}

#[test]
fn python2_statements_are_syntax_faults() {
    let fault = fault_of("print \"hi\"\n");
    assert_eq!(fault.line, 1);
    assert!(fault.message.contains("print"), "{}", fault.message);
    let fault = fault_of("x = 1\nexec \"x = 1\"\n");
    assert_eq!(fault.line, 2);
    assert!(fault.message.contains("exec"), "{}", fault.message);
}

#[test]
fn leading_zero_integer_is_a_syntax_fault() {
    let fault = fault_of("x = 08\n");
    assert_eq!((fault.line, fault.column), (1, 5));
}

#[test]
fn consistent_nesting_and_inline_bodies_are_accepted() {
    let source = "class A:\n    def f(self): return 1; pass\n\n    # note\n    def g(self):\n        if self:\n            x = (1, [2, {3: 0}])\n        else:\n            x = 00\n        return x\n\n\ny = 0x1F + 1_000 + 2j\n";
    let mut extractor = PythonExtractor::new().unwrap();
    let record = extractor.extract_record("ok.py", source).unwrap();
    let names: Vec<&str> = record.definitions.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["f", "g"]);
}

#[test]
fn deep_bracket_nesting_is_a_syntax_fault() {
    let depth = 5000;
    let source = format!("x = {}1{}\n", "(".repeat(depth), ")".repeat(depth));
    let fault = fault_of(&source);
    assert_eq!(fault.line, 1);
}
