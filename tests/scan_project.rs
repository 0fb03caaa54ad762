use relgraph::indexer::ProjectIndexer;
use relgraph::indexer::scan::{ScanOptions, load_project};
use std::fs;

#[test]
fn load_project_reads_sorted_utf8_files() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("pkg")).unwrap();
    fs::create_dir_all(root.join(".git")).unwrap();
    fs::write(root.join("pkg/b.py"), "def b():\n    pass\n").unwrap();
    fs::write(root.join("a.css"), ".x {}").unwrap();
    fs::write(root.join("notes.txt"), "plain").unwrap();
    fs::write(root.join("blob.bin"), [0xff, 0xfe, 0x00, 0x80]).unwrap();
    fs::write(root.join(".git/config"), "[core]").unwrap();

    let files = load_project(root, ScanOptions::default()).unwrap();
    let paths: Vec<_> = files.keys().map(String::as_str).collect();
    assert_eq!(paths, vec!["a.css", "notes.txt", "pkg/b.py"]);
    assert_eq!(files["pkg/b.py"], "def b():\n    pass\n");
}

#[test]
fn gitignore_is_respected_unless_disabled() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join(".gitignore"), "build/\n").unwrap();
    fs::create_dir_all(root.join("build")).unwrap();
    fs::write(root.join("build/out.js"), "function gen() {}").unwrap();
    fs::write(root.join("main.js"), "gen();").unwrap();

    let files = load_project(root, ScanOptions::default()).unwrap();
    assert!(files.contains_key("main.js"));
    assert!(!files.contains_key("build/out.js"));

    let files = load_project(root, ScanOptions::new(true)).unwrap();
    assert!(files.contains_key("build/out.js"));
}

#[test]
fn scanned_directory_builds_a_graph() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join("util.py"), "def hello():\n    pass\n").unwrap();
    fs::write(root.join("main.py"), "from util import hello\n\nhello()\n").unwrap();

    let files = load_project(root, ScanOptions::default()).unwrap();
    let result = ProjectIndexer::new().unwrap().build(&files);
    let imports = &result.graph.imports_resolved["main.py"];
    assert_eq!(imports[0].resolved_file.as_deref(), Some("util.py"));
    assert!(
        result
            .graph
            .edges
            .iter()
            .any(|edge| edge.from == "file:main.py" && edge.to == "py.def:hello")
    );
}
