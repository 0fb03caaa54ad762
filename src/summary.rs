use crate::indexer::extract::{Language, RelationRecord};
use crate::model::ProjectResult;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolSummary {
    pub language: Language,
    pub name: String,
    pub defined_in: Vec<String>,
    pub called_from: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleTokenSummary {
    pub name: String,
    pub defined_in_css: Vec<String>,
    pub used_by_html: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StyleSummary {
    pub classes: Vec<StyleTokenSummary>,
    pub ids: Vec<StyleTokenSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HtmlUsage {
    pub file: String,
    pub classes: Vec<String>,
    pub ids: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SummaryTotals {
    pub files: usize,
    pub symbols: usize,
    pub css_classes: usize,
    pub css_ids: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectSummary {
    pub files: Vec<String>,
    pub symbols: Vec<SymbolSummary>,
    pub styles: StyleSummary,
    pub html_usage: Vec<HtmlUsage>,
    pub totals: SummaryTotals,
}

type FileSets = BTreeMap<String, BTreeSet<String>>;

#[derive(Default)]
struct SymbolSides {
    defined: FileSets,
    called: FileSets,
}

/// Per-symbol and per-style-token digest of a built project, sorted by name.
pub fn summarize(result: &ProjectResult) -> ProjectSummary {
    let mut python = SymbolSides::default();
    let mut javascript = SymbolSides::default();
    let mut c = SymbolSides::default();
    let mut class_defs = FileSets::new();
    let mut id_defs = FileSets::new();
    let mut class_uses = FileSets::new();
    let mut id_uses = FileSets::new();
    let mut html_usage = Vec::new();

    for (path, record) in &result.files {
        match record {
            RelationRecord::Python(rec) => {
                let names = rec.definitions.iter().map(|def| def.name.as_str());
                python.record(path, names, rec.calls_by_name.keys());
            }
            RelationRecord::Javascript(rec) => {
                let names = rec
                    .definitions
                    .iter()
                    .map(|def| def.name.as_str())
                    .chain(
                        rec.anonymous_functions
                            .iter()
                            .filter_map(|arrow| arrow.binding.as_deref()),
                    );
                javascript.record(path, names, rec.calls_by_name.keys());
            }
            RelationRecord::C(rec) => {
                let names = rec.definitions.iter().map(|def| def.name.as_str());
                c.record(path, names, rec.calls_by_name.keys());
            }
            RelationRecord::Css(rec) => {
                for token in &rec.class_tokens {
                    if let Some(name) = token.strip_prefix('.') {
                        add(&mut class_defs, name, path);
                    }
                }
                for token in &rec.id_tokens {
                    if let Some(name) = token.strip_prefix('#') {
                        add(&mut id_defs, name, path);
                    }
                }
            }
            RelationRecord::Html(rec) => {
                let mut classes = BTreeSet::new();
                let mut ids = BTreeSet::new();
                for token in rec.matched_css.keys() {
                    if let Some(name) = token.strip_prefix('.') {
                        add(&mut class_uses, name, path);
                        classes.insert(name.to_string());
                    } else if let Some(name) = token.strip_prefix('#') {
                        add(&mut id_uses, name, path);
                        ids.insert(name.to_string());
                    }
                }
                html_usage.push(HtmlUsage {
                    file: path.clone(),
                    classes: classes.into_iter().collect(),
                    ids: ids.into_iter().collect(),
                });
            }
            RelationRecord::Unparsed(_) => {}
        }
    }
    html_usage.sort_by(|a, b| a.file.cmp(&b.file));

    let mut symbols = python.into_summaries(Language::Python);
    symbols.extend(javascript.into_summaries(Language::Javascript));
    symbols.extend(c.into_summaries(Language::C));
    let styles = StyleSummary {
        classes: token_summaries(class_defs, class_uses),
        ids: token_summaries(id_defs, id_uses),
    };

    let mut files: Vec<String> = result.files.keys().cloned().collect();
    files.sort();
    let totals = SummaryTotals {
        files: files.len(),
        symbols: symbols.len(),
        css_classes: styles.classes.len(),
        css_ids: styles.ids.len(),
    };
    ProjectSummary {
        files,
        symbols,
        styles,
        html_usage,
        totals,
    }
}

impl SymbolSides {
    fn record<'a>(
        &mut self,
        path: &str,
        defined: impl Iterator<Item = &'a str>,
        called: impl Iterator<Item = &'a String>,
    ) {
        for name in defined {
            add(&mut self.defined, name, path);
        }
        for name in called {
            add(&mut self.called, name, path);
        }
    }

    fn into_summaries(mut self, language: Language) -> Vec<SymbolSummary> {
        let names: BTreeSet<String> = self
            .defined
            .keys()
            .chain(self.called.keys())
            .cloned()
            .collect();
        names
            .into_iter()
            .map(|name| SymbolSummary {
                language,
                defined_in: take_sorted(&mut self.defined, &name),
                called_from: take_sorted(&mut self.called, &name),
                name,
            })
            .collect()
    }
}

fn token_summaries(mut defs: FileSets, mut uses: FileSets) -> Vec<StyleTokenSummary> {
    let names: BTreeSet<String> = defs.keys().chain(uses.keys()).cloned().collect();
    names
        .into_iter()
        .map(|name| StyleTokenSummary {
            defined_in_css: take_sorted(&mut defs, &name),
            used_by_html: take_sorted(&mut uses, &name),
            name,
        })
        .collect()
}

fn add(sets: &mut FileSets, name: &str, path: &str) {
    sets.entry(name.to_string())
        .or_default()
        .insert(path.to_string());
}

fn take_sorted(sets: &mut FileSets, name: &str) -> Vec<String> {
    sets.remove(name)
        .map(|files| files.into_iter().collect())
        .unwrap_or_default()
}
