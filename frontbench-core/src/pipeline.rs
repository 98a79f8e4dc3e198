//! One end-to-end run
//!
//!     A [`PipelineRequest`] carries everything a run needs: the source text, how to
//!     tokenize it, the grammar and optionally translation rules. [`run_pipeline`] takes
//!     the request by value and returns every intermediate artifact in a
//!     [`PipelineOutput`]. There is no state outside the request, so any number of runs
//!     can proceed in parallel.

use crate::automata::Automaton;
use crate::formats::to_treeviz_str;
use crate::grammar::Grammar;
use crate::lexing::ScanOptions;
use crate::parsing::{ParseOptions, SyntaxTree};
use crate::token::{Token, TokenPattern};
use crate::transforms::stages::{Parsing, Tokenization, Translation};
use crate::transforms::{Runnable, TransformError};
use crate::translation::TranslationRules;
use log::info;
use serde::{Deserialize, Serialize};

/// How source text is tokenized
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LexerSpec {
    /// Ordered `{type, pattern}` rules, matched directly
    Rules(Vec<TokenPattern>),
    /// A deterministic automaton
    Automaton(Automaton),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineOptions {
    #[serde(default)]
    pub scan: ScanOptions,
    #[serde(default)]
    pub parse: ParseOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineRequest {
    pub source: String,
    pub lexer: LexerSpec,
    pub grammar: Grammar,
    #[serde(default)]
    pub translation: Option<TranslationRules>,
    #[serde(default)]
    pub options: PipelineOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub tokens: Vec<Token>,
    pub unidentified: Vec<String>,
    pub tree: SyntaxTree,
    pub rendered_tree: String,
    /// Present when the request had translation rules
    pub translation: Option<Vec<String>>,
}

/// Tokenize, parse and (when rules are given) translate
pub fn run_pipeline(request: PipelineRequest) -> Result<PipelineOutput, TransformError> {
    let PipelineRequest {
        source,
        lexer,
        grammar,
        translation,
        options,
    } = request;
    info!("pipeline run over {} bytes", source.len());

    let lexed = Tokenization::new(lexer, options.scan).run(source)?;
    let tree = Parsing::new(grammar, options.parse).run(lexed.tokens.clone())?;
    let rendered_tree = to_treeviz_str(&tree);
    let translation = match translation {
        Some(rules) => Some(Translation::new(rules).run(tree.clone())?),
        None => None,
    };

    Ok(PipelineOutput {
        tokens: lexed.tokens,
        unidentified: lexed.unidentified,
        tree,
        rendered_tree,
        translation,
    })
}
