use criterion::{Criterion, black_box, criterion_group, criterion_main};
use indexmap::IndexMap;
use relgraph::indexer::ProjectIndexer;

/// A synthetic project with `modules` Python files calling into each other,
/// plus matching script, style and markup files.
fn synthetic_project(modules: usize) -> IndexMap<String, String> {
    let mut files = IndexMap::new();
    for idx in 0..modules {
        let next = (idx + 1) % modules;
        files.insert(
            format!("pkg/mod_{idx}.py"),
            format!(
                "from pkg.mod_{next} import func_{next}\n\n\ndef func_{idx}(value):\n    \"\"\"Step {idx}.\"\"\"\n    return func_{next}(value) + len([value])\n"
            ),
        );
        files.insert(
            format!("web/part_{idx}.js"),
            format!("function render_{idx}() {{\n  render_{next}();\n}}\nconst hook_{idx} = () => render_{idx}();\n"),
        );
        files.insert(
            format!("web/part_{idx}.css"),
            format!(".card-{idx}, #slot-{idx} {{ color: red; }}\n"),
        );
        files.insert(
            format!("web/part_{idx}.html"),
            format!("<div class=\"card-{idx}\" id=\"slot-{next}\"></div>\n"),
        );
    }
    files
}

fn bench_build_project(c: &mut Criterion) {
    let mut group = c.benchmark_group("project_build");
    for modules in [10, 50, 200] {
        let files = synthetic_project(modules);
        let mut indexer = ProjectIndexer::new().unwrap();
        group.bench_with_input(format!("modules_{modules}"), &files, |b, files| {
            b.iter(|| black_box(indexer.build(black_box(files))))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build_project);
criterion_main!(benches);
