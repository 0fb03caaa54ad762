use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "relgraph",
    version,
    about = "Cross-language relation extractor and project graph builder",
    after_help = r#"Examples:
  relgraph parse --language python --file app/main.py
  relgraph parse --language css --file web/site.css --repo web
  relgraph project --repo . --digest
  relgraph summary --repo .
"#
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Extract one file with the extractor named by --language.
    Parse {
        /// python | c | js | javascript | css | html | project
        #[arg(long)]
        language: String,
        #[arg(long)]
        file: PathBuf,
        /// Load sibling files from this directory for style linking and project mode.
        #[arg(long)]
        repo: Option<PathBuf>,
        /// Include files ignored by .gitignore.
        #[arg(long)]
        no_ignore: bool,
    },
    /// Build the project graph for a directory.
    Project {
        #[arg(long, default_value = ".")]
        repo: PathBuf,
        /// Include files ignored by .gitignore.
        #[arg(long)]
        no_ignore: bool,
        /// Print only the content digest of the result.
        #[arg(long)]
        digest: bool,
    },
    /// Print a per-symbol and per-style summary of a directory.
    Summary {
        #[arg(long, default_value = ".")]
        repo: PathBuf,
        /// Include files ignored by .gitignore.
        #[arg(long)]
        no_ignore: bool,
    },
}
