//! Tokenizers
//!
//!     Two maximal-munch tokenizers turn source text into [`Token`]s plus a list of
//!     unidentified spans:
//!
//!         1. Rule based. See [rules](rules). An ordered list of `{type, pattern}` rules is
//!            tried directly against the text, with no automaton. Runs of word characters
//!            (letters, digits, underscore) are matched whole; every other character is
//!            matched on its own.
//!
//!         2. Automaton based. See [scanner](scanner). A DFA is advanced character by
//!            character, remembering the last accepting state, and a token is emitted
//!            when it gets stuck.
//!
//!     Both skip whitespace between tokens and never fail on unrecognized text. Characters
//!     that match nothing are collected as unidentified spans; with
//!     [`ScanOptions::merge_unidentified`] adjacent unidentified characters form one span,
//!     so the original spacing groups survive.
//!
//!     Both take every input as an argument and keep nothing between calls: identical
//!     input always gives identical output.

pub mod rules;
pub mod scanner;

pub use rules::tokenize_with_rules;
pub use scanner::tokenize_with_automaton;

use crate::token::Token;
use serde::{Deserialize, Serialize};

/// Tokenizer settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanOptions {
    /// Join adjacent unidentified characters into one span
    pub merge_unidentified: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        ScanOptions {
            merge_unidentified: true,
        }
    }
}

/// Tokens in source order, plus the spans no rule or automaton recognized
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexerOutput {
    pub tokens: Vec<Token>,
    pub unidentified: Vec<String>,
}

/// Collects unidentified text, honouring [`ScanOptions::merge_unidentified`]
pub(crate) struct Unidentified {
    merge: bool,
    pending: String,
    spans: Vec<String>,
}

impl Unidentified {
    pub(crate) fn new(options: &ScanOptions) -> Self {
        Unidentified {
            merge: options.merge_unidentified,
            pending: String::new(),
            spans: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, text: &str) {
        self.pending.push_str(text);
        if !self.merge {
            self.flush();
        }
    }

    /// End the current span; called at whitespace and before every token
    pub(crate) fn flush(&mut self) {
        if !self.pending.is_empty() {
            self.spans.push(std::mem::take(&mut self.pending));
        }
    }

    pub(crate) fn finish(mut self) -> Vec<String> {
        self.flush();
        self.spans
    }
}

pub(crate) fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
