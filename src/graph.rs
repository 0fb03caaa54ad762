//! Index pass of the project build: turns per-file records into the project graph.

use crate::indexer::extract::{CallIndex, Language, RelationRecord};
use crate::indexer::scan::language_for_path;
use crate::metrics;
use crate::model::{
    DefinitionSite, EdgeKind, GraphEdge, GraphNode, NodeKind, ProjectGraph, ResolvedImport,
};
use indexmap::IndexMap;
use std::collections::HashSet;

pub fn file_node_id(path: &str) -> String {
    format!("file:{path}")
}

pub fn definition_node_id(language: Language, name: &str) -> Option<String> {
    language
        .symbol_prefix()
        .map(|prefix| format!("{prefix}.def:{name}"))
}

/// `css.class:<name>` for `.name`, `css.id:<name>` for `#name`.
pub fn style_node_id(token: &str) -> Option<String> {
    if let Some(name) = token.strip_prefix('.') {
        return Some(format!("css.class:{name}"));
    }
    token.strip_prefix('#').map(|name| format!("css.id:{name}"))
}

/// Build the graph from extracted (and cross-linked) records.
///
/// `sources` supplies the raw text for word counts; a record without a
/// source entry counts zero words.
pub fn build_graph(
    records: &IndexMap<String, RelationRecord>,
    sources: &IndexMap<String, String>,
) -> ProjectGraph {
    let mut builder = GraphBuilder::default();
    for (path, record) in records {
        builder.add_node(GraphNode {
            id: file_node_id(path),
            kind: NodeKind::File,
            label: path.clone(),
            language: Some(record.language()),
        });
    }
    for (path, record) in records {
        builder.index_definitions(path, record);
        if let RelationRecord::Css(style) = record {
            for token in style.class_tokens.iter().chain(style.id_tokens.iter()) {
                builder.index_style_token(path, token);
            }
        }
    }
    for (path, record) in records {
        builder.link_calls(path, record);
        if let RelationRecord::Html(markup) = record {
            for token in markup.matched_css.keys() {
                builder.link_style_use(path, token);
            }
        }
    }

    let mut graph = builder.finish();
    graph.called_by = invert_calls(records);
    graph.imports_resolved = resolve_imports(records);
    graph.metrics = records
        .iter()
        .map(|(path, record)| {
            let source = sources.get(path).map(String::as_str).unwrap_or("");
            (path.clone(), metrics::compute_file_metrics(source, record))
        })
        .collect();
    graph
}

#[derive(Default)]
struct GraphBuilder {
    graph: ProjectGraph,
    node_ids: HashSet<String>,
}

impl GraphBuilder {
    fn add_node(&mut self, node: GraphNode) {
        if self.node_ids.insert(node.id.clone()) {
            self.graph.nodes.push(node);
        }
    }

    fn index_definitions(&mut self, path: &str, record: &RelationRecord) {
        let language = record.language();
        let mut sites: Vec<(String, DefinitionSite)> = record
            .definitions()
            .iter()
            .map(|def| {
                let site = DefinitionSite {
                    file: path.to_string(),
                    line: def.start_line,
                    end_line: def.end_line,
                };
                (def.name.clone(), site)
            })
            .collect();
        if let RelationRecord::Javascript(script) = record {
            for arrow in &script.anonymous_functions {
                if let Some(binding) = &arrow.binding {
                    sites.push((
                        binding.clone(),
                        DefinitionSite {
                            file: path.to_string(),
                            line: arrow.line,
                            end_line: None,
                        },
                    ));
                }
            }
        }

        for (name, site) in sites {
            let Some(def_id) = definition_node_id(language, &name) else {
                continue;
            };
            self.add_node(GraphNode {
                id: def_id.clone(),
                kind: NodeKind::Definition,
                label: name.clone(),
                language: Some(language),
            });
            let mut edge = GraphEdge::new(file_node_id(path), def_id, EdgeKind::Defines);
            edge.file = Some(path.to_string());
            edge.line = Some(site.line);
            self.graph.edges.push(edge);
            self.graph
                .symbols
                .entry(language.as_str().to_string())
                .or_default()
                .entry(name)
                .or_default()
                .push(site);
        }
    }

    fn index_style_token(&mut self, path: &str, token: &str) {
        let Some(id) = style_node_id(token) else {
            return;
        };
        let kind = if token.starts_with('.') {
            NodeKind::StyleClass
        } else {
            NodeKind::StyleId
        };
        self.add_node(GraphNode {
            id: id.clone(),
            kind,
            label: token.to_string(),
            language: Some(Language::Css),
        });
        let mut edge = GraphEdge::new(file_node_id(path), id, EdgeKind::Defines);
        edge.file = Some(path.to_string());
        self.graph.edges.push(edge);
    }

    /// `calls` edges for callees defined in the caller's language.
    fn link_calls(&mut self, path: &str, record: &RelationRecord) {
        let language = record.language();
        let Some(defined) = self.graph.symbols.get(language.as_str()) else {
            return;
        };
        let mut edges = Vec::new();
        for call in record.calls() {
            let Some(callee) = call.callee.as_deref() else {
                continue;
            };
            let Some(target_sites) = defined.get(callee) else {
                continue;
            };
            let Some(to) = definition_node_id(language, callee) else {
                continue;
            };
            let from = call
                .caller
                .as_deref()
                .filter(|caller| defined.contains_key(*caller))
                .and_then(|caller| definition_node_id(language, caller))
                .unwrap_or_else(|| file_node_id(path));
            let mut edge = GraphEdge::new(from, to, EdgeKind::Calls);
            edge.file = Some(path.to_string());
            edge.caller = call.caller.clone();
            edge.line = Some(call.line);
            edge.target_file = target_sites.first().map(|site| site.file.clone());
            edge.call_kind = Some(call.call_kind.label());
            edges.push(edge);
        }
        self.graph.edges.extend(edges);
    }

    fn link_style_use(&mut self, path: &str, token: &str) {
        let Some(id) = style_node_id(token) else {
            return;
        };
        if !self.node_ids.contains(&id) {
            return;
        }
        let mut edge = GraphEdge::new(file_node_id(path), id, EdgeKind::UsesStyle);
        edge.file = Some(path.to_string());
        self.graph.edges.push(edge);
    }

    fn finish(self) -> ProjectGraph {
        self.graph
    }
}

/// callee name -> every call reference, over all call-producing files in order.
fn invert_calls(records: &IndexMap<String, RelationRecord>) -> CallIndex {
    let mut called_by = CallIndex::new();
    for record in records.values() {
        let Some(index) = record.calls_by_name() else {
            continue;
        };
        for (name, refs) in index {
            called_by
                .entry(name.clone())
                .or_default()
                .extend(refs.iter().cloned());
        }
    }
    called_by
}

fn resolve_imports(
    records: &IndexMap<String, RelationRecord>,
) -> IndexMap<String, Vec<ResolvedImport>> {
    let mut resolved = IndexMap::new();
    for (path, record) in records {
        match record {
            RelationRecord::Python(python) => {
                let imports = python
                    .imports
                    .iter()
                    .map(|import| {
                        let target = import.module.as_ref().or_else(|| import.names.first());
                        let resolved_file = target
                            .map(|module| format!("{}.py", module.replace('.', "/")))
                            .filter(|candidate| records.contains_key(candidate));
                        ResolvedImport {
                            import: import.clone(),
                            resolved_file,
                        }
                    })
                    .collect();
                resolved.insert(path.clone(), imports);
            }
            RelationRecord::Unparsed(_) if language_for_path(path) == Language::Python => {
                resolved.insert(path.clone(), Vec::new());
            }
            _ => {}
        }
    }
    resolved
}
