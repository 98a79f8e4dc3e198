//! Individual transformation stages
//!
//! Each stage owns its configuration and implements [`Runnable`].

use super::{Runnable, TransformError};
use crate::grammar::Grammar;
use crate::lexing::{tokenize_with_automaton, tokenize_with_rules, LexerOutput, ScanOptions};
use crate::parsing::{create_syntax_tree_with, ParseOptions, SyntaxTree};
use crate::pipeline::LexerSpec;
use crate::token::Token;
use crate::translation::{translate, TranslationRules};

/// Tokenization stage: source text → tokens and unidentified spans
pub struct Tokenization {
    lexer: LexerSpec,
    options: ScanOptions,
}

impl Tokenization {
    pub const NAME: &'static str = "tokenization";

    pub fn new(lexer: LexerSpec, options: ScanOptions) -> Self {
        Tokenization { lexer, options }
    }
}

impl Runnable<String, LexerOutput> for Tokenization {
    fn run(&self, input: String) -> Result<LexerOutput, TransformError> {
        let result = match &self.lexer {
            LexerSpec::Rules(patterns) => tokenize_with_rules(&input, patterns, &self.options),
            LexerSpec::Automaton(dfa) => tokenize_with_automaton(&input, dfa, &self.options),
        };
        result.map_err(|e| TransformError::stage(Self::NAME, e))
    }
}

/// Parsing stage: tokens → syntax tree
pub struct Parsing {
    grammar: Grammar,
    options: ParseOptions,
}

impl Parsing {
    pub const NAME: &'static str = "parsing";

    pub fn new(grammar: Grammar, options: ParseOptions) -> Self {
        Parsing { grammar, options }
    }
}

impl Runnable<Vec<Token>, SyntaxTree> for Parsing {
    fn run(&self, input: Vec<Token>) -> Result<SyntaxTree, TransformError> {
        create_syntax_tree_with(&input, &self.grammar, &self.options)
            .map_err(|e| TransformError::stage(Self::NAME, e))
    }
}

/// Translation stage: syntax tree → output lines
pub struct Translation {
    rules: TranslationRules,
}

impl Translation {
    pub const NAME: &'static str = "translation";

    pub fn new(rules: TranslationRules) -> Self {
        Translation { rules }
    }
}

impl Runnable<SyntaxTree, Vec<String>> for Translation {
    fn run(&self, input: SyntaxTree) -> Result<Vec<String>, TransformError> {
        translate(&input, &self.rules).map_err(|e| TransformError::stage(Self::NAME, e))
    }
}
