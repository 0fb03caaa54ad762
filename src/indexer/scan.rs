use crate::config::Config;
use crate::indexer::extract::Language;
use anyhow::{Context, Result};
use ignore::WalkBuilder;
use indexmap::IndexMap;
use std::ffi::OsStr;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct LanguageSpec {
    pub language: Language,
    pub extensions: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOptions {
    pub no_ignore: bool,
}

impl ScanOptions {
    pub fn new(no_ignore: bool) -> Self {
        Self { no_ignore }
    }
}

static LANGUAGE_SPECS: &[LanguageSpec] = &[
    LanguageSpec {
        language: Language::Python,
        extensions: &["py"],
    },
    LanguageSpec {
        language: Language::C,
        extensions: &["c", "h"],
    },
    LanguageSpec {
        language: Language::Javascript,
        extensions: &["js"],
    },
    LanguageSpec {
        language: Language::Css,
        extensions: &["css"],
    },
    LanguageSpec {
        language: Language::Html,
        extensions: &["html", "htm"],
    },
];

/// Language of a project path, from its lowercased extension.
pub fn language_for_path(path: &str) -> Language {
    let Some(ext) = crate::util::extension(path) else {
        return Language::Other;
    };
    LANGUAGE_SPECS
        .iter()
        .find(|spec| spec.extensions.contains(&ext.as_str()))
        .map(|spec| spec.language)
        .unwrap_or(Language::Other)
}

/// Read every UTF-8 file under `repo_root` into a path-sorted project map.
///
/// Files of any extension are loaded; unknown ones become placeholders later.
pub fn load_project(repo_root: &Path, options: ScanOptions) -> Result<IndexMap<String, String>> {
    let max_bytes = Config::get().max_file_bytes;
    let mut builder = WalkBuilder::new(repo_root);
    if options.no_ignore {
        builder
            .ignore(false)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .parents(false);
    } else {
        builder
            .ignore(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .parents(true)
            .require_git(false);
    }
    let walker = builder
        .hidden(false)
        .filter_entry(|entry| !is_ignored_entry(entry))
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(value) => value,
            Err(err) => {
                warn!("walk error: {err}");
                continue;
            }
        };
        if !entry.file_type().map(|ft| ft.is_file()).unwrap_or(false) {
            continue;
        }
        let path = entry.path();
        let metadata = fs::metadata(path).with_context(|| format!("stat {}", path.display()))?;
        let rel_path = crate::util::normalize_rel_path(repo_root, path)?;
        if metadata.len() > max_bytes {
            warn!(
                "skipping large file ({} bytes): {}",
                metadata.len(),
                rel_path
            );
            continue;
        }
        let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
        match String::from_utf8(bytes) {
            Ok(text) => files.push((rel_path, text)),
            Err(_) => debug!("skipping non-UTF-8 file: {rel_path}"),
        }
    }
    files.sort_by(|a, b| a.0.cmp(&b.0));
    debug!("loaded {} files from {}", files.len(), repo_root.display());
    Ok(files.into_iter().collect())
}

fn is_ignored_entry(entry: &ignore::DirEntry) -> bool {
    entry.file_name() == OsStr::new(".git")
}
