use crate::error::{EngineError, Result};
use crate::indexer::css::CssExtractor;
use crate::indexer::extract::{Language, MarkupRecord, RelationRecord, StyleRecord};
use crate::indexer::html::HtmlExtractor;
use crate::indexer::javascript::JavascriptExtractor;
use crate::indexer::python::PythonExtractor;
use crate::indexer::scan::language_for_path;
use crate::indexer::xref::{LinkDirection, link_styles};
use crate::indexer::{ProjectIndexer, c::CExtractor};
use crate::model::ProjectResult;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

/// Result of a routed request: one file's record, or a whole project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Parsed {
    File(RelationRecord),
    Project(ProjectResult),
}

impl Parsed {
    pub fn as_file(&self) -> Option<&RelationRecord> {
        match self {
            Parsed::File(record) => Some(record),
            Parsed::Project(_) => None,
        }
    }

    pub fn as_project(&self) -> Option<&ProjectResult> {
        match self {
            Parsed::Project(result) => Some(result),
            Parsed::File(_) => None,
        }
    }
}

/// Route one request by language tag.
///
/// `project`, `multi` and `all` build the whole project from `siblings` plus
/// the primary file. A style file is linked forward against sibling markup,
/// a markup file in reverse against sibling stylesheets.
pub fn route(
    language: &str,
    path: &str,
    text: &str,
    siblings: &IndexMap<String, String>,
) -> Result<Parsed> {
    let tag = language.trim().to_ascii_lowercase();
    debug!("route {tag} for {path} with {} siblings", siblings.len());
    match tag.as_str() {
        "project" | "multi" | "all" => {
            let mut files = siblings.clone();
            files.insert(path.to_string(), text.to_string());
            let mut indexer = ProjectIndexer::new()?;
            Ok(Parsed::Project(indexer.build(&files)))
        }
        "python" => {
            let record = PythonExtractor::new()?.extract_record(path, text)?;
            Ok(Parsed::File(RelationRecord::Python(record)))
        }
        "c" => Ok(Parsed::File(RelationRecord::C(
            CExtractor::new().extract_record(path, text),
        ))),
        "js" | "javascript" => Ok(Parsed::File(RelationRecord::Javascript(
            JavascriptExtractor::new().extract_record(path, text),
        ))),
        "css" => {
            let mut style = CssExtractor::new().extract_record(path, text);
            let mut pages = sibling_records(siblings, path, Language::Html, |p, s| {
                HtmlExtractor::new().extract_record(p, s)
            });
            let mut markup: Vec<&mut MarkupRecord> = pages.iter_mut().collect();
            link_styles(&mut [&mut style], &mut markup, LinkDirection::Forward);
            Ok(Parsed::File(RelationRecord::Css(style)))
        }
        "html" => {
            let mut page = HtmlExtractor::new().extract_record(path, text);
            let mut sheets = sibling_records(siblings, path, Language::Css, |p, s| {
                CssExtractor::new().extract_record(p, s)
            });
            let mut styles: Vec<&mut StyleRecord> = sheets.iter_mut().collect();
            link_styles(&mut styles, &mut [&mut page], LinkDirection::Reverse);
            Ok(Parsed::File(RelationRecord::Html(page)))
        }
        _ => Err(EngineError::UnsupportedLanguage(language.trim().to_string())),
    }
}

fn sibling_records<T>(
    siblings: &IndexMap<String, String>,
    primary: &str,
    language: Language,
    extract: impl Fn(&str, &str) -> T,
) -> Vec<T> {
    siblings
        .iter()
        .filter(|(path, _)| {
            path.as_str() != primary && language_for_path(path.as_str()) == language
        })
        .map(|(path, source)| extract(path.as_str(), source.as_str()))
        .collect()
}
