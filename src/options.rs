use serde::{Deserialize, Serialize};

use crate::grammar::{ConflictPolicy, EpsilonMode};
use crate::Result;

/// Knobs for building the predictive table. The defaults reproduce the classic
/// behaviour: epsilon merged whole into FIRST sets and conflicts silently overwritten.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    pub epsilon: EpsilonMode,
    pub conflicts: ConflictPolicy,
}

impl Options {
    pub fn from_json(json: &str) -> Result<Self> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let options = Options::from_json(r#"{"epsilon":"exact"}"#).unwrap();

        assert_eq!(options.epsilon, EpsilonMode::Exact);
        assert_eq!(options.conflicts, ConflictPolicy::Overwrite);
        assert_eq!(Options::from_json("").unwrap(), Options::default());
        assert!(Options::from_json(r#"{"conflicts":"ignore"}"#).is_err());
    }
}
