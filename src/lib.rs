pub mod cli;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod graph;
pub mod indexer;
pub mod logging;
pub mod metrics;
pub mod model;
pub mod summary;
pub mod util;

pub use dispatch::{Parsed, route};
pub use error::{EngineError, SyntaxFault};
pub use indexer::ProjectIndexer;
pub use model::{ProjectGraph, ProjectResult};
