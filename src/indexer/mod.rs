use crate::error::{EngineError, Result};
use crate::graph;
use crate::indexer::extract::{
    Language, LanguageExtractor, MarkupRecord, PlaceholderRecord, RelationRecord, StyleRecord,
};
use crate::model::ProjectResult;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, warn};

pub mod c;
pub mod comments;
pub mod css;
pub mod extract;
pub mod html;
pub mod javascript;
pub mod python;
pub mod scan;
pub mod xref;

/// Builds a project graph from an in-memory set of files.
pub struct ProjectIndexer {
    extractors: HashMap<Language, Box<dyn LanguageExtractor>>,
}

impl ProjectIndexer {
    pub fn new() -> Result<Self> {
        let mut extractors: HashMap<Language, Box<dyn LanguageExtractor>> = HashMap::new();
        extractors.insert(Language::Python, Box::new(python::PythonExtractor::new()?));
        extractors.insert(Language::C, Box::new(c::CExtractor::new()));
        extractors.insert(Language::Javascript, Box::new(javascript::JavascriptExtractor::new()));
        extractors.insert(Language::Css, Box::new(css::CssExtractor::new()));
        extractors.insert(Language::Html, Box::new(html::HtmlExtractor::new()));
        Ok(Self { extractors })
    }

    /// Extract one file by its extension. Unknown extensions yield a placeholder.
    pub fn extract_file(&mut self, path: &str, source: &str) -> Result<RelationRecord> {
        let language = scan::language_for_path(path);
        match self.extractors.get_mut(&language) {
            Some(extractor) => extractor.extract(path, source),
            None => Ok(RelationRecord::Unparsed(PlaceholderRecord {
                path: path.to_string(),
                content: source.to_string(),
                fault: None,
            })),
        }
    }

    /// Run extraction, cross-link and index passes over `files` in map order.
    pub fn build(&mut self, files: &IndexMap<String, String>) -> ProjectResult {
        let started = Instant::now();
        let mut records = IndexMap::with_capacity(files.len());
        let mut faults = 0;
        for (path, source) in files {
            let record = match self.extract_file(path, source) {
                Ok(record) => record,
                Err(EngineError::Syntax(fault)) => {
                    warn!("{fault}; keeping raw text");
                    faults += 1;
                    RelationRecord::Unparsed(PlaceholderRecord {
                        path: path.clone(),
                        content: source.clone(),
                        fault: Some(fault.to_string()),
                    })
                }
                Err(err) => {
                    warn!("extract error {path}: {err}");
                    faults += 1;
                    RelationRecord::Unparsed(PlaceholderRecord {
                        path: path.clone(),
                        content: source.clone(),
                        fault: Some(err.to_string()),
                    })
                }
            };
            records.insert(path.clone(), record);
        }
        debug!(
            "extraction: {} files, {} faults in {:?}",
            records.len(),
            faults,
            started.elapsed()
        );

        let started = Instant::now();
        let linked = cross_link(&mut records);
        debug!("cross-link: {linked} matches in {:?}", started.elapsed());

        let started = Instant::now();
        let graph = graph::build_graph(&records, files);
        debug!(
            "index: {} nodes, {} edges in {:?}",
            graph.nodes.len(),
            graph.edges.len(),
            started.elapsed()
        );
        ProjectResult {
            graph,
            files: records,
        }
    }
}

/// Link every style record against every markup record, both directions.
pub fn cross_link(records: &mut IndexMap<String, RelationRecord>) -> usize {
    let mut styles: Vec<&mut StyleRecord> = Vec::new();
    let mut markup: Vec<&mut MarkupRecord> = Vec::new();
    for record in records.values_mut() {
        match record {
            RelationRecord::Css(style) => styles.push(style),
            RelationRecord::Html(page) => markup.push(page),
            _ => {}
        }
    }
    xref::link_styles(&mut styles, &mut markup, xref::LinkDirection::Both)
}
