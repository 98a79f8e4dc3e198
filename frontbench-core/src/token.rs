//! Tokens and token patterns
//!
//! A [`Token`] is a classified lexeme produced by one of the tokenizers. A
//! [`TokenPattern`] pairs a token type with a pattern in the regex dialect of
//! [`crate::automata::regex`]. Token patterns are the shared input of the NFA
//! builder and the rule-based tokenizer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A classified lexeme: `(type, value)`
///
/// Tokens are immutable once created; fields are only reachable through getters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    #[serde(rename = "type")]
    kind: String,
    value: String,
}

impl Token {
    pub fn new(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Token {
            kind: kind.into(),
            value: value.into(),
        }
    }

    /// The token type tag, e.g. `IDENTIFIER`
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The literal text
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {:?})", self.kind, self.value)
    }
}

/// One `type → pattern` entry, kept in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPattern {
    #[serde(rename = "type")]
    pub token_type: String,
    pub pattern: String,
}

impl TokenPattern {
    pub fn new(token_type: impl Into<String>, pattern: impl Into<String>) -> Self {
        TokenPattern {
            token_type: token_type.into(),
            pattern: pattern.into(),
        }
    }
}

/// Token-pattern documents come either as a list of `{type, pattern}` objects
/// or as an object mapping type → pattern. Object key order is kept.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum TokenPatternDocument {
    List(Vec<TokenPattern>),
    Map(serde_json::Map<String, serde_json::Value>),
}

impl TokenPatternDocument {
    pub(crate) fn into_patterns(self) -> Result<Vec<TokenPattern>, String> {
        match self {
            TokenPatternDocument::List(list) => Ok(list),
            TokenPatternDocument::Map(map) => map
                .into_iter()
                .map(|(token_type, value)| match value {
                    serde_json::Value::String(pattern) => Ok(TokenPattern {
                        token_type,
                        pattern,
                    }),
                    other => Err(format!(
                        "pattern for '{}' must be a string, found {}",
                        token_type, other
                    )),
                })
                .collect(),
        }
    }
}
