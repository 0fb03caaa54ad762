use serde::Serialize;
use thiserror::Error;

/// Position of the first unparseable node in a Python source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyntaxFault {
    pub path: String,
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl std::fmt::Display for SyntaxFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}",
            self.path, self.line, self.column, self.message
        )
    }
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("unsupported language '{0}'; use one of: python | c | js | css | html | project")]
    UnsupportedLanguage(String),
    #[error("syntax error at {0}")]
    Syntax(SyntaxFault),
    #[error("grammar error: {0}")]
    Grammar(String),
}

impl EngineError {
    /// Client-side faults are the ones a caller can fix by changing the request.
    pub fn is_client_error(&self) -> bool {
        matches!(self, EngineError::UnsupportedLanguage(_))
    }
}

impl From<tree_sitter::LanguageError> for EngineError {
    fn from(err: tree_sitter::LanguageError) -> Self {
        EngineError::Grammar(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
