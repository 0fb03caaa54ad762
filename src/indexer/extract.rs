use crate::error::Result;
use indexmap::{IndexMap, IndexSet};
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Language {
    Python,
    C,
    Javascript,
    Css,
    Html,
    Other,
}

impl Language {
    pub fn as_str(self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::C => "c",
            Language::Javascript => "javascript",
            Language::Css => "css",
            Language::Html => "html",
            Language::Other => "other",
        }
    }

    /// Prefix used for definition node ids; `None` for languages without definitions.
    pub fn symbol_prefix(self) -> Option<&'static str> {
        match self {
            Language::Python => Some("py"),
            Language::C => Some("c"),
            Language::Javascript => Some("js"),
            _ => None,
        }
    }
}

impl Serialize for Language {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

pub trait LanguageExtractor {
    fn language(&self) -> Language;

    fn extract(&mut self, path: &str, source: &str) -> Result<RelationRecord>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Definition {
    pub name: String,
    pub start_line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_metric: Option<usize>,
}

impl Definition {
    pub fn at_line(name: &str, line: usize) -> Self {
        Self {
            name: name.to_string(),
            start_line: line,
            end_line: None,
            doc_text: None,
            size_metric: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnonymousFunction {
    pub kind_label: String,
    pub line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binding: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallKind {
    Name,
    Attribute,
    /// Syntactic category of a callee that is neither a bare name nor an attribute.
    Other(String),
}

impl CallKind {
    /// `name`, `attribute`, or `other:<category>`.
    pub fn label(&self) -> String {
        match self {
            CallKind::Name => "name".to_string(),
            CallKind::Attribute => "attribute".to_string(),
            CallKind::Other(kind) => format!("other:{kind}"),
        }
    }
}

impl Serialize for CallKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallSite {
    pub caller: Option<String>,
    pub callee: Option<String>,
    pub line: usize,
    pub call_kind: CallKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallRef {
    pub file: String,
    pub line: usize,
    pub caller: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub line: usize,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportForm {
    Direct,
    From,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Import {
    pub form: ImportForm,
    pub module: Option<String>,
    pub names: Vec<String>,
    pub level: usize,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionPointerRef {
    pub pointer: String,
    pub bound_function: Option<String>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selector {
    pub selector: String,
    pub parts: Vec<String>,
    pub properties: IndexMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub tag: String,
    pub attributes: IndexMap<String, String>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleMatch {
    pub file: String,
    pub tag: String,
    pub attributes: IndexMap<String, String>,
}

pub type CallIndex = IndexMap<String, Vec<CallRef>>;
pub type MatchIndex = IndexMap<String, Vec<StyleMatch>>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PythonRecord {
    pub path: String,
    pub definitions: Vec<Definition>,
    pub anonymous_functions: Vec<AnonymousFunction>,
    pub calls: Vec<CallSite>,
    pub calls_by_name: CallIndex,
    pub imports: Vec<Import>,
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CRecord {
    pub path: String,
    pub definitions: Vec<Definition>,
    pub calls: Vec<CallSite>,
    pub calls_by_name: CallIndex,
    pub function_pointer_refs: Vec<FunctionPointerRef>,
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScriptRecord {
    pub path: String,
    pub definitions: Vec<Definition>,
    pub anonymous_functions: Vec<AnonymousFunction>,
    pub calls: Vec<CallSite>,
    pub calls_by_name: CallIndex,
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StyleRecord {
    pub path: String,
    pub selectors: Vec<Selector>,
    pub class_tokens: IndexSet<String>,
    pub id_tokens: IndexSet<String>,
    pub comments: Vec<Comment>,
    pub matched_html: MatchIndex,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MarkupRecord {
    pub path: String,
    pub tags: Vec<Tag>,
    pub comments: Vec<Comment>,
    pub scripts: Vec<String>,
    pub styles: Vec<String>,
    pub matched_css: MatchIndex,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlaceholderRecord {
    pub path: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fault: Option<String>,
}

/// Extraction result for one file, shaped by the file's language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "language", rename_all = "snake_case")]
pub enum RelationRecord {
    Python(PythonRecord),
    C(CRecord),
    Javascript(ScriptRecord),
    Css(StyleRecord),
    Html(MarkupRecord),
    Unparsed(PlaceholderRecord),
}

impl RelationRecord {
    pub fn path(&self) -> &str {
        match self {
            RelationRecord::Python(record) => &record.path,
            RelationRecord::C(record) => &record.path,
            RelationRecord::Javascript(record) => &record.path,
            RelationRecord::Css(record) => &record.path,
            RelationRecord::Html(record) => &record.path,
            RelationRecord::Unparsed(record) => &record.path,
        }
    }

    pub fn language(&self) -> Language {
        match self {
            RelationRecord::Python(_) => Language::Python,
            RelationRecord::C(_) => Language::C,
            RelationRecord::Javascript(_) => Language::Javascript,
            RelationRecord::Css(_) => Language::Css,
            RelationRecord::Html(_) => Language::Html,
            RelationRecord::Unparsed(_) => Language::Other,
        }
    }

    pub fn definitions(&self) -> &[Definition] {
        match self {
            RelationRecord::Python(record) => &record.definitions,
            RelationRecord::C(record) => &record.definitions,
            RelationRecord::Javascript(record) => &record.definitions,
            _ => &[],
        }
    }

    pub fn calls(&self) -> &[CallSite] {
        match self {
            RelationRecord::Python(record) => &record.calls,
            RelationRecord::C(record) => &record.calls,
            RelationRecord::Javascript(record) => &record.calls,
            _ => &[],
        }
    }

    pub fn calls_by_name(&self) -> Option<&CallIndex> {
        match self {
            RelationRecord::Python(record) => Some(&record.calls_by_name),
            RelationRecord::C(record) => Some(&record.calls_by_name),
            RelationRecord::Javascript(record) => Some(&record.calls_by_name),
            _ => None,
        }
    }

    pub fn digest(&self) -> String {
        let json = serde_json::to_vec(self).unwrap_or_default();
        blake3::hash(&json).to_hex().to_string()
    }
}

/// Build `calls_by_name` from an ordered call list. Calls without a callee are not indexed.
pub fn index_calls(file: &str, calls: &[CallSite]) -> CallIndex {
    let mut index = CallIndex::new();
    for call in calls {
        let Some(callee) = call.callee.as_ref() else {
            continue;
        };
        index.entry(callee.clone()).or_default().push(CallRef {
            file: file.to_string(),
            line: call.line,
            caller: call.caller.clone(),
        });
    }
    index
}
