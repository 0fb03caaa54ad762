use anyhow::{Context, Result};
use clap::Parser;
use indexmap::IndexMap;
use relgraph::indexer::scan::{self, ScanOptions};
use relgraph::{cli, dispatch, indexer, logging, summary, util};
use serde_json::json;
use std::path::Path;

fn load(repo: &Path, no_ignore: bool) -> Result<IndexMap<String, String>> {
    scan::load_project(repo, ScanOptions::new(no_ignore))
        .with_context(|| format!("load project {}", repo.display()))
}

fn main() -> Result<()> {
    logging::init_logging();
    let args = cli::Args::parse();

    match args.command {
        cli::Command::Parse {
            language,
            file,
            repo,
            no_ignore,
        } => {
            let text = util::read_to_string(&file)?;
            let (path, siblings) = match repo {
                Some(repo) => {
                    let rel = util::normalize_rel_path(&repo, &file)
                        .unwrap_or_else(|_| util::normalize_path(&file));
                    (rel, load(&repo, no_ignore)?)
                }
                None => (util::normalize_path(&file), IndexMap::new()),
            };
            let parsed = dispatch::route(&language, &path, &text, &siblings)?;
            println!("{}", serde_json::to_string_pretty(&parsed)?);
            Ok(())
        }
        cli::Command::Project {
            repo,
            no_ignore,
            digest,
        } => {
            let files = load(&repo, no_ignore)?;
            let mut indexer = indexer::ProjectIndexer::new()?;
            let result = indexer.build(&files);
            if digest {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({
                        "files": result.files.len(),
                        "digest": result.digest(),
                    }))?
                );
            } else {
                println!("{}", serde_json::to_string_pretty(&result)?);
            }
            Ok(())
        }
        cli::Command::Summary { repo, no_ignore } => {
            let files = load(&repo, no_ignore)?;
            let mut indexer = indexer::ProjectIndexer::new()?;
            let result = indexer.build(&files);
            let summary = summary::summarize(&result);
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(())
        }
    }
}
