use crate::indexer::extract::{CallIndex, Import, Language, RelationRecord};
use crate::metrics::FileMetrics;
use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    File,
    Definition,
    StyleClass,
    StyleId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeKind {
    Defines,
    Calls,
    UsesStyle,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct GraphNode {
    pub id: String,
    pub kind: NodeKind,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    pub kind: EdgeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caller: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_kind: Option<String>,
}

impl GraphEdge {
    pub fn new(from: String, to: String, kind: EdgeKind) -> Self {
        Self {
            from,
            to,
            kind,
            file: None,
            caller: None,
            line: None,
            target_file: None,
            call_kind: None,
        }
    }
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct DefinitionSite {
    pub file: String,
    pub line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_line: Option<usize>,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ResolvedImport {
    #[serde(flatten)]
    pub import: Import,
    pub resolved_file: Option<String>,
}

/// language -> name -> definition sites in file-iteration order.
pub type SymbolIndex = IndexMap<String, IndexMap<String, Vec<DefinitionSite>>>;

#[derive(Debug, Serialize, Clone, Default, PartialEq, Eq)]
pub struct ProjectGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub symbols: SymbolIndex,
    pub called_by: CallIndex,
    pub imports_resolved: IndexMap<String, Vec<ResolvedImport>>,
    pub metrics: IndexMap<String, FileMetrics>,
}

impl ProjectGraph {
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn edges_of_kind(&self, kind: EdgeKind) -> impl Iterator<Item = &GraphEdge> {
        self.edges.iter().filter(move |edge| edge.kind == kind)
    }

    pub fn digest(&self) -> String {
        digest_json(self)
    }
}

#[derive(Debug, Serialize, Clone, Default, PartialEq, Eq)]
pub struct ProjectResult {
    pub graph: ProjectGraph,
    pub files: IndexMap<String, RelationRecord>,
}

impl ProjectResult {
    pub fn digest(&self) -> String {
        digest_json(self)
    }
}

fn digest_json<T: Serialize>(value: &T) -> String {
    let json = serde_json::to_vec(value).unwrap_or_default();
    blake3::hash(&json).to_hex().to_string()
}
