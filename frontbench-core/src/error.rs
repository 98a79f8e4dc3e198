//! Error types for every stage of the workbench.
//!
//!     All failures are reported as a [`WorkbenchError`]. Each variant belongs to one
//!     [`ErrorKind`], which is the tag callers use to decide how to surface the problem:
//!
//!         Input:                  malformed patterns or documents, empty required fields.
//!         StructuralPrecondition: an automaton or grammar is missing a start, states,
//!                                 transitions or accepting states. Checked before traversal.
//!         Semantic:               a grammar or rule set is well formed but inconsistent
//!                                 (undeclared symbols, left recursion, bad placeholders).
//!                                 The whole grammar or rule set is rejected.
//!         RuntimeMismatch:        the input does not fit the grammar or the rules.
//!
//!     Nothing here is retried and no error is turned into an empty result.

use std::fmt;

/// Coarse classification of a [`WorkbenchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Input,
    StructuralPrecondition,
    Semantic,
    RuntimeMismatch,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Input => "input",
            ErrorKind::StructuralPrecondition => "structural-precondition",
            ErrorKind::Semantic => "semantic",
            ErrorKind::RuntimeMismatch => "runtime-mismatch",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors produced by the automata, lexing, parsing and translation stages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkbenchError {
    /// A pattern could not be broken into primitive operators
    InvalidPattern {
        token_type: String,
        pattern: String,
        position: usize,
        message: String,
    },
    /// The token-type → pattern mapping was empty
    NoPatterns,
    /// A structured document could not be decoded
    MalformedDocument { document: String, message: String },
    /// An automaton refers to a state it does not declare
    UnknownState { state: String, context: String },
    /// An automaton declares the same state twice
    DuplicateState(String),
    /// An automaton that must be deterministic has two transitions for one symbol
    NotDeterministic { state: String, symbol: String },
    /// A token in an input stream has an empty type or value
    InvalidToken { index: usize, message: String },
    /// A translation rule has an empty sequence
    EmptySequence { rule: usize },
    /// Nothing to tokenize
    EmptySource,
    /// No tokenizer or translation rules were given
    NoRules,
    /// The parser was given an empty token stream
    NoTokens,

    /// Missing start state (automaton) or start symbol (grammar)
    NoStart(&'static str),
    NoStates,
    NoTransitions,
    NoAccepting,
    /// A grammar without production rules
    NoProductions,

    /// The grammar's start symbol is not one of its variables
    StartNotVariable(String),
    /// A production rule uses a symbol that is neither a variable nor a terminal
    UndeclaredSymbol { rule: String, symbol: String },
    /// The grammar can recurse on a variable without consuming input
    LeftRecursion { cycle: Vec<String> },
    /// A template references a placeholder that its own sequence lacks
    UnknownPlaceholder { rule: usize, placeholder: String },
    /// A template uses a placeholder more often than its sequence provides values
    PlaceholderOveruse {
        rule: usize,
        placeholder: String,
        used: usize,
        available: usize,
    },

    /// The token stream does not match any derivation of the grammar
    SyntaxError {
        position: usize,
        found: Option<(String, String)>,
        expected: Vec<String>,
    },
    /// A leaf token was not covered by any translation rule
    UntranslatedToken {
        index: usize,
        token_type: String,
        value: String,
    },
}

impl WorkbenchError {
    /// Tag used by callers to classify the failure
    pub fn kind(&self) -> ErrorKind {
        use WorkbenchError::*;
        match self {
            InvalidPattern { .. }
            | NoPatterns
            | MalformedDocument { .. }
            | UnknownState { .. }
            | DuplicateState(_)
            | NotDeterministic { .. }
            | InvalidToken { .. }
            | EmptySequence { .. }
            | EmptySource
            | NoRules
            | NoTokens => ErrorKind::Input,
            NoStart(_) | NoStates | NoTransitions | NoAccepting | NoProductions => {
                ErrorKind::StructuralPrecondition
            }
            StartNotVariable(_)
            | UndeclaredSymbol { .. }
            | LeftRecursion { .. }
            | UnknownPlaceholder { .. }
            | PlaceholderOveruse { .. } => ErrorKind::Semantic,
            SyntaxError { .. } | UntranslatedToken { .. } => ErrorKind::RuntimeMismatch,
        }
    }

    pub(crate) fn malformed(document: &str, message: impl fmt::Display) -> Self {
        WorkbenchError::MalformedDocument {
            document: document.to_string(),
            message: message.to_string(),
        }
    }
}

impl fmt::Display for WorkbenchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use WorkbenchError::*;
        match self {
            InvalidPattern {
                token_type,
                pattern,
                position,
                message,
            } => write!(
                f,
                "Invalid pattern for {}: {} (at byte {} of \"{}\")",
                token_type, message, position, pattern
            ),
            NoPatterns => write!(f, "No token patterns were given"),
            MalformedDocument { document, message } => {
                write!(f, "Malformed {} document: {}", document, message)
            }
            UnknownState { state, context } => {
                write!(f, "Unknown state '{}' referenced by {}", state, context)
            }
            DuplicateState(state) => write!(f, "State '{}' is declared more than once", state),
            NotDeterministic { state, symbol } => write!(
                f,
                "Automaton is not deterministic: state '{}' has several transitions on {}",
                state, symbol
            ),
            InvalidToken { index, message } => write!(f, "Invalid token #{}: {}", index, message),
            EmptySequence { rule } => {
                write!(f, "Translation rule #{} has an empty sequence", rule)
            }
            EmptySource => write!(f, "Source text is empty"),
            NoRules => write!(f, "No rules were given"),
            NoTokens => write!(f, "No tokens to parse"),
            NoStart(subject) => write!(f, "The {} has no start", subject),
            NoStates => write!(f, "The automaton has no states"),
            NoTransitions => write!(f, "The automaton has no transitions"),
            NoAccepting => write!(f, "The automaton has no accepting states"),
            NoProductions => write!(f, "The grammar has no production rules"),
            StartNotVariable(start) => write!(
                f,
                "Start symbol '{}' is not one of the grammar's variables",
                start
            ),
            UndeclaredSymbol { rule, symbol } => {
                write!(f, "Rule '{}' uses undeclared symbol '{}'", rule, symbol)
            }
            LeftRecursion { cycle } => {
                write!(f, "Left recursion is not supported: {}", cycle.join(" -> "))
            }
            UnknownPlaceholder { rule, placeholder } => write!(
                f,
                "Translation rule #{} references {{{}}} which is not in its sequence",
                rule, placeholder
            ),
            PlaceholderOveruse {
                rule,
                placeholder,
                used,
                available,
            } => write!(
                f,
                "Translation rule #{} uses {{{}}} {} times but its sequence has {}",
                rule, placeholder, used, available
            ),
            SyntaxError {
                position,
                found,
                expected,
            } => {
                match found {
                    Some((kind, value)) => write!(
                        f,
                        "Syntax error at token {}: unexpected {} '{}'",
                        position, kind, value
                    )?,
                    None => write!(f, "Syntax error at token {}: unexpected end of input", position)?,
                }
                if expected.is_empty() {
                    write!(f, ", expected end of input")
                } else {
                    write!(f, ", expected one of: {}", expected.join(", "))
                }
            }
            UntranslatedToken {
                index,
                token_type,
                value,
            } => write!(
                f,
                "Untranslated token #{}: no rule covers ({}, \"{}\")",
                index, token_type, value
            ),
        }
    }
}

impl std::error::Error for WorkbenchError {}

/// Result alias used throughout the core
pub type Result<T> = std::result::Result<T, WorkbenchError>;
