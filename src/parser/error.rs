use serde::Serialize;
use thiserror::Error;

/// The first point at which the token stream stops being derivable.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SyntaxError {
    #[error("Syntax error at line {line}: expected '{expected}' but found '{found}'")]
    Mismatch {
        line: usize,
        expected: String,
        found: String,
    },
    #[error("Syntax error at line {line}: unexpected token '{found}'")]
    UnexpectedToken { line: usize, found: String },
}

impl SyntaxError {
    pub fn line(&self) -> usize {
        match self {
            SyntaxError::Mismatch { line, .. } | SyntaxError::UnexpectedToken { line, .. } => *line,
        }
    }
}
