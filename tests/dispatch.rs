use indexmap::IndexMap;
use relgraph::dispatch::{Parsed, route};
use relgraph::error::EngineError;
use relgraph::indexer::extract::{Language, RelationRecord};

fn siblings(entries: &[(&str, &str)]) -> IndexMap<String, String> {
    entries
        .iter()
        .map(|(path, text)| (path.to_string(), text.to_string()))
        .collect()
}

#[test]
fn tags_are_trimmed_and_lowercased() {
    let parsed = route("  PyThOn ", "a.py", "def f():\n    pass\n", &IndexMap::new()).unwrap();
    let record = parsed.as_file().unwrap();
    assert_eq!(record.language(), Language::Python);

    for tag in ["js", "javascript", "JS"] {
        let parsed = route(tag, "a.js", "function f() {}", &IndexMap::new()).unwrap();
        assert!(matches!(parsed, Parsed::File(RelationRecord::Javascript(_))));
    }
    let parsed = route("c", "a.c", "int main() {}", &IndexMap::new()).unwrap();
    assert!(matches!(parsed, Parsed::File(RelationRecord::C(_))));
}

#[test]
fn unknown_tag_is_rejected() {
    let err = route("cobol", "a.cbl", "", &IndexMap::new()).unwrap_err();
    assert!(matches!(err, EngineError::UnsupportedLanguage(ref tag) if tag == "cobol"));
    assert!(err.is_client_error());
}

#[test]
fn python_syntax_fault_is_returned() {
    let err = route("python", "bad.py", "def (:\n", &IndexMap::new()).unwrap_err();
    match err {
        EngineError::Syntax(fault) => assert_eq!(fault.path, "bad.py"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn css_links_forward_against_sibling_markup() {
    let files = siblings(&[
        ("index.html", r#"<div class="card"></div>"#),
        ("old.htm", r#"<p class="card"></p>"#),
        ("other.css", ".card {}"),
        ("main.py", "card()\n"),
    ]);
    let parsed = route("css", "site.css", ".card { color: red }", &files).unwrap();
    let Some(RelationRecord::Css(style)) = parsed.as_file() else {
        panic!("expected a style record");
    };
    let pages: Vec<_> = style.matched_html[".card"]
        .iter()
        .map(|m| m.file.as_str())
        .collect();
    assert_eq!(pages, vec!["index.html", "old.htm"]);
}

#[test]
fn html_links_reverse_against_sibling_styles() {
    let files = siblings(&[
        ("a.css", ".card {}"),
        ("b.css", "#hero {}"),
        ("other.html", r#"<div class="card"></div>"#),
    ]);
    let parsed = route(
        "html",
        "index.html",
        r#"<div class="card" id="hero"></div>"#,
        &files,
    )
    .unwrap();
    let Some(RelationRecord::Html(markup)) = parsed.as_file() else {
        panic!("expected a markup record");
    };
    let keys: Vec<_> = markup.matched_css.keys().map(String::as_str).collect();
    assert_eq!(keys, vec![".card", "#hero"]);
    assert_eq!(markup.matched_css[".card"][0].file, "a.css");
    assert_eq!(markup.matched_css["#hero"][0].file, "b.css");
}

#[test]
fn project_mode_inserts_primary_over_sibling() {
    let files = siblings(&[
        ("lib.py", "def old():\n    pass\n"),
        ("util.py", "def helper():\n    pass\n"),
    ]);
    for tag in ["project", "multi", "all"] {
        let parsed = route(tag, "lib.py", "def hello():\n    helper()\n", &files).unwrap();
        let result = parsed.as_project().unwrap();
        let paths: Vec<_> = result.files.keys().map(String::as_str).collect();
        assert_eq!(paths, vec!["lib.py", "util.py"]);
        let python = &result.graph.symbols["python"];
        assert!(python.contains_key("hello"));
        assert!(!python.contains_key("old"));
    }
}
