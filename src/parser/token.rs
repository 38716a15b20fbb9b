use serde::{Deserialize, Serialize};

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub line: usize,
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

impl Token {
    pub fn new(line: usize, kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            line,
            kind: kind.into(),
            value: value.into(),
        }
    }

    /// Reads `<line> <type> <value>` records, one per line. Blank lines are ignored.
    pub fn parse_stream(input: &str) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        for (i, record) in input.lines().enumerate() {
            let fields: Vec<&str> = record.split_whitespace().collect();
            if fields.is_empty() {
                continue;
            }
            if fields.len() < 3 {
                return Err(Error::TokenStream {
                    line: i + 1,
                    reason: format!("expected 3 fields, found {}", fields.len()),
                });
            }
            let line = fields[0].parse().map_err(|_| Error::TokenStream {
                line: i + 1,
                reason: format!("\"{}\" is not a line number", fields[0]),
            })?;
            tokens.push(Token::new(line, fields[1], fields[2]));
        }
        Ok(tokens)
    }
}
