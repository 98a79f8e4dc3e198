//! Regex → NFA (Thompson construction)
//!
//! Each token pattern is parsed into a [`Regex`] and compiled into a fragment with
//! one entry and one exit state:
//!
//!     set        s --c--> e
//!     concat     a.exit --ε--> b.entry
//!     alt        s --ε--> each entry,  each exit --ε--> e
//!     star       s --ε--> x.entry, x.exit --ε--> x.entry, x.exit --ε--> e, s --ε--> e
//!     optional   s --ε--> x.entry, x.exit --ε--> e, s --ε--> e
//!
//! The fragments are joined under a fresh `START` state with one epsilon edge per
//! pattern, in declaration order. Each fragment's exit is accepting, tagged with its
//! pattern's token type; the accepting list keeps declaration order, which is the
//! priority used by the DFA builder.

use super::model::{AcceptingState, Automaton, Label, Transition};
use super::regex::{self, Regex};
use crate::error::{Result, WorkbenchError};
use crate::token::TokenPattern;
use log::{debug, info};

/// Build one NFA recognizing every pattern
pub fn build_nfa(patterns: &[TokenPattern]) -> Result<Automaton> {
    if patterns.is_empty() {
        return Err(WorkbenchError::NoPatterns);
    }
    info!("building NFA for {} token patterns", patterns.len());

    let mut builder = NfaBuilder::new();
    let start = builder.state_named("START".to_string());
    for pattern in patterns {
        let regex = parse_pattern(pattern)?;
        let fragment = builder.compile(&regex);
        builder.epsilon(&start, &fragment.entry);
        builder
            .accepting
            .push(AcceptingState::new(fragment.exit.clone(), pattern.token_type.clone()));
        debug!(
            "{}: {} → fragment {}..{}",
            pattern.token_type, pattern.pattern, fragment.entry, fragment.exit
        );
    }

    let nfa = Automaton {
        states: builder.states,
        transitions: builder.transitions,
        start,
        accepting: builder.accepting,
    };
    info!(
        "NFA has {} states and {} transitions",
        nfa.states.len(),
        nfa.transitions.len()
    );
    Ok(nfa)
}

/// Parse a token pattern, naming the token type in any error
pub(crate) fn parse_pattern(pattern: &TokenPattern) -> Result<Regex> {
    if pattern.token_type.trim().is_empty() {
        return Err(WorkbenchError::InvalidPattern {
            token_type: pattern.token_type.clone(),
            pattern: pattern.pattern.clone(),
            position: 0,
            message: "empty token type".to_string(),
        });
    }
    regex::parse(&pattern.pattern).map_err(|e| WorkbenchError::InvalidPattern {
        token_type: pattern.token_type.clone(),
        pattern: pattern.pattern.clone(),
        position: e.position,
        message: e.message,
    })
}

struct Fragment {
    entry: String,
    exit: String,
}

struct NfaBuilder {
    states: Vec<String>,
    transitions: Vec<Transition>,
    accepting: Vec<AcceptingState>,
}

impl NfaBuilder {
    fn new() -> Self {
        NfaBuilder {
            states: Vec::new(),
            transitions: Vec::new(),
            accepting: Vec::new(),
        }
    }

    fn state_named(&mut self, name: String) -> String {
        self.states.push(name.clone());
        name
    }

    fn state(&mut self) -> String {
        let name = format!("N{}", self.states.len());
        self.state_named(name)
    }

    fn epsilon(&mut self, from: &str, to: &str) {
        self.transitions
            .push(Transition::new(from, to, Label::Epsilon));
    }

    fn compile(&mut self, regex: &Regex) -> Fragment {
        match regex {
            Regex::Empty => {
                let entry = self.state();
                let exit = self.state();
                Fragment { entry, exit }
            }
            Regex::Epsilon => {
                let entry = self.state();
                let exit = self.state();
                self.epsilon(&entry, &exit);
                Fragment { entry, exit }
            }
            Regex::Set(set) => {
                let entry = self.state();
                let exit = self.state();
                self.transitions
                    .push(Transition::new(&entry, &exit, Label::Symbols(set.clone())));
                Fragment { entry, exit }
            }
            Regex::Concat(items) => {
                let parts: Vec<Fragment> = items.iter().map(|item| self.compile(item)).collect();
                let mut parts = parts.into_iter();
                let Some(first) = parts.next() else {
                    return self.compile(&Regex::Epsilon);
                };
                let mut exit = first.exit;
                for part in parts {
                    self.epsilon(&exit, &part.entry);
                    exit = part.exit;
                }
                Fragment {
                    entry: first.entry,
                    exit,
                }
            }
            Regex::Alt(items) => {
                let entry = self.state();
                let branches: Vec<Fragment> =
                    items.iter().map(|item| self.compile(item)).collect();
                let exit = self.state();
                for branch in branches {
                    self.epsilon(&entry, &branch.entry);
                    self.epsilon(&branch.exit, &exit);
                }
                Fragment { entry, exit }
            }
            Regex::Star(inner) => {
                let entry = self.state();
                let body = self.compile(inner);
                let exit = self.state();
                self.epsilon(&entry, &body.entry);
                self.epsilon(&body.exit, &body.entry);
                self.epsilon(&body.exit, &exit);
                self.epsilon(&entry, &exit);
                Fragment { entry, exit }
            }
            Regex::Optional(inner) => {
                let entry = self.state();
                let body = self.compile(inner);
                let exit = self.state();
                self.epsilon(&entry, &body.entry);
                self.epsilon(&body.exit, &exit);
                self.epsilon(&entry, &exit);
                Fragment { entry, exit }
            }
        }
    }
}
