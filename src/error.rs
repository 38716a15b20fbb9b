use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("token stream line {line}: {reason}")]
    TokenStream { line: usize, reason: String },
    #[error("grammar has no productions")]
    EmptyGrammar,
    #[error("grammar is not LL(1): {}", .conflicts.join("; "))]
    NotLl1 { conflicts: Vec<String> },
    #[error("invalid options: {0}")]
    Options(#[from] serde_json::Error),
}
