//! # frontbench
//!
//! The algorithmic core of a compiler-frontend workbench.
//!
//! File Layout
//!
//! The core is a chain of small, pure stages. Each stage takes everything it needs as
//! arguments and returns its result as a value; nothing is kept between calls, so
//! independent runs can happen in parallel.
//!
//! src/
//!   ├── automata      regex → NFA → DFA → regex, minimization, DOT export
//!   ├── lexing        rule-based and DFA-based maximal-munch tokenizers
//!   ├── grammar       context-free grammar model with load-time validation
//!   ├── parsing       backtracking recursive-descent parser and syntax trees
//!   ├── translation   leaf-sequence → template translation
//!   ├── formats       tree renderers (treeviz, json)
//!   ├── transforms    composable Runnable stages
//!   ├── loader        JSON/YAML document loading
//!   └── pipeline      one explicit request → tokens, tree, translation
//!
//! Errors from every stage are [`error::WorkbenchError`], tagged with an [`error::ErrorKind`].
//! The core logs through the `log` facade and never installs a logger itself.

pub mod automata;
pub mod error;
pub mod formats;
pub mod grammar;
pub mod lexing;
pub mod loader;
pub mod parsing;
pub mod pipeline;
pub mod testing;
pub mod token;
pub mod transforms;
pub mod translation;

pub use automata::{
    build_dfa, build_nfa, extract_regexes, minimize_dfa, to_dot, AcceptingState, Automaton,
    Label, Transition, TypePatterns,
};
pub use error::{ErrorKind, Result, WorkbenchError};
pub use formats::{FormatRegistry, Formatter};
pub use grammar::{Grammar, ProductionRule};
pub use lexing::{tokenize_with_automaton, tokenize_with_rules, LexerOutput, ScanOptions};
pub use loader::{DocumentFormat, DocumentLoader, LoaderError};
pub use parsing::{
    create_syntax_tree, create_syntax_tree_with, ParseOptions, SyntaxTree, TreeNode,
};
pub use pipeline::{run_pipeline, LexerSpec, PipelineOptions, PipelineOutput, PipelineRequest};
pub use token::{Token, TokenPattern};
pub use transforms::{Runnable, Transform, TransformError};
pub use translation::{translate, TranslationRule, TranslationRules};
