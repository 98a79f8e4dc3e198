//! Automaton model shared by NFAs and DFAs
//!
//! An [`Automaton`] is a plain document: ordered state names, labelled transitions, a
//! start state and `(state, token type)` accepting pairs. The same type holds NFAs
//! (labels may be [`Label::Epsilon`] and may overlap) and DFAs (at most one transition
//! per state and input character). Construction does not validate; every operation
//! calls [`Automaton::validate`] and [`Automaton::check_structure`] before traversal.

use super::charset::CharSet;
use super::regex;
use crate::error::{Result, WorkbenchError};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// The rendering of the epsilon marker in documents
pub const EPSILON: &str = "ε";

/// A transition label: a set of input characters, or epsilon
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Label {
    Epsilon,
    Symbols(CharSet),
}

impl Label {
    pub fn symbol(c: char) -> Self {
        Label::Symbols(CharSet::single(c))
    }

    pub fn is_epsilon(&self) -> bool {
        matches!(self, Label::Epsilon)
    }

    pub fn symbols(&self) -> Option<&CharSet> {
        match self {
            Label::Epsilon => None,
            Label::Symbols(set) => Some(set),
        }
    }

    pub fn accepts(&self, c: char) -> bool {
        match self {
            Label::Epsilon => false,
            Label::Symbols(set) => set.contains(c),
        }
    }

    /// Parse `"ε"`, a single character or a bracket set
    pub fn parse(text: &str) -> std::result::Result<Label, regex::PatternError> {
        if text == EPSILON {
            return Ok(Label::Epsilon);
        }
        regex::parse_set(text).map(Label::Symbols)
    }

    pub fn render(&self) -> String {
        match self {
            Label::Epsilon => EPSILON.to_string(),
            Label::Symbols(set) if set.as_single() == Some('ε') => "\\ε".to_string(),
            Label::Symbols(set) => set.render(),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl TryFrom<String> for Label {
    type Error = String;

    fn try_from(text: String) -> std::result::Result<Self, Self::Error> {
        Label::parse(&text).map_err(|e| format!("invalid label {:?}: {}", text, e))
    }
}

impl From<Label> for String {
    fn from(label: Label) -> Self {
        label.render()
    }
}

/// One edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub from: String,
    pub to: String,
    pub label: Label,
}

impl Transition {
    pub fn new(from: impl Into<String>, to: impl Into<String>, label: Label) -> Self {
        Transition {
            from: from.into(),
            to: to.into(),
            label,
        }
    }
}

/// An accepting state tagged with the token type it produces
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptingState {
    pub state: String,
    pub token_type: String,
}

impl AcceptingState {
    pub fn new(state: impl Into<String>, token_type: impl Into<String>) -> Self {
        AcceptingState {
            state: state.into(),
            token_type: token_type.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Automaton {
    pub states: Vec<String>,
    pub transitions: Vec<Transition>,
    pub start: String,
    pub accepting: Vec<AcceptingState>,
}

impl Automaton {
    /// Every referenced state is declared, no state is declared twice, and every
    /// accepting pair names a token type
    pub fn validate(&self) -> Result<()> {
        let mut declared = HashSet::new();
        for state in &self.states {
            if !declared.insert(state.as_str()) {
                return Err(WorkbenchError::DuplicateState(state.clone()));
            }
        }
        let unknown = |state: &str, context: String| WorkbenchError::UnknownState {
            state: state.to_string(),
            context,
        };
        if !self.start.is_empty() && !declared.contains(self.start.as_str()) {
            return Err(unknown(&self.start, "the start state".to_string()));
        }
        for (i, t) in self.transitions.iter().enumerate() {
            for end in [&t.from, &t.to] {
                if !declared.contains(end.as_str()) {
                    return Err(unknown(end, format!("transition #{}", i)));
                }
            }
        }
        for accept in &self.accepting {
            if !declared.contains(accept.state.as_str()) {
                return Err(unknown(&accept.state, "the accepting states".to_string()));
            }
            if accept.token_type.is_empty() {
                return Err(WorkbenchError::malformed(
                    "automaton",
                    format!("accepting state '{}' has an empty token type", accept.state),
                ));
            }
        }
        Ok(())
    }

    /// Structural preconditions, checked in the order start, states, transitions,
    /// accepting states
    pub fn check_structure(&self) -> Result<()> {
        if self.start.is_empty() {
            return Err(WorkbenchError::NoStart("automaton"));
        }
        if self.states.is_empty() {
            return Err(WorkbenchError::NoStates);
        }
        if self.transitions.is_empty() {
            return Err(WorkbenchError::NoTransitions);
        }
        if self.accepting.is_empty() {
            return Err(WorkbenchError::NoAccepting);
        }
        Ok(())
    }

    /// Both [`validate`](Self::validate) and [`check_structure`](Self::check_structure)
    pub fn check(&self) -> Result<()> {
        self.check_structure()?;
        self.validate()
    }

    /// First state with an epsilon edge or two edges sharing a character
    pub fn determinism_violation(&self) -> Option<(String, String)> {
        let mut seen: HashMap<&str, CharSet> = HashMap::new();
        for t in &self.transitions {
            match &t.label {
                Label::Epsilon => return Some((t.from.clone(), EPSILON.to_string())),
                Label::Symbols(set) => {
                    let covered = seen.entry(t.from.as_str()).or_default();
                    if let Some(c) = covered.intersection(set).iter().next() {
                        return Some((t.from.clone(), super::charset::escape_literal(c)));
                    }
                    covered.extend(set);
                }
            }
        }
        None
    }

    pub fn is_deterministic(&self) -> bool {
        self.determinism_violation().is_none()
    }

    /// Fails with `NotDeterministic` unless [`is_deterministic`](Self::is_deterministic)
    pub fn require_deterministic(&self) -> Result<()> {
        match self.determinism_violation() {
            Some((state, symbol)) => Err(WorkbenchError::NotDeterministic { state, symbol }),
            None => Ok(()),
        }
    }

    /// Token type of an accepting state; the first listed pair wins
    pub fn accepting_type(&self, state: &str) -> Option<&str> {
        self.accepting
            .iter()
            .find(|a| a.state == state)
            .map(|a| a.token_type.as_str())
    }

    pub fn is_accepting(&self, state: &str) -> bool {
        self.accepting_type(state).is_some()
    }

    pub fn outgoing<'a, 's>(&'a self, state: &'s str) -> impl Iterator<Item = &'a Transition> + 's
    where
        'a: 's,
    {
        self.transitions.iter().filter(move |t| t.from == state)
    }

    /// Target of the first transition out of `state` that accepts `c`
    pub fn step(&self, state: &str, c: char) -> Option<&str> {
        self.transitions
            .iter()
            .find(|t| t.from == state && t.label.accepts(c))
            .map(|t| t.to.as_str())
    }

    /// Follow `input` from the start state; the token type accepted at the end, if any
    pub fn run(&self, input: &str) -> Option<&str> {
        let mut state = self.start.as_str();
        for c in input.chars() {
            state = self.step(state, c)?;
        }
        self.accepting_type(state)
    }

    /// Outgoing symbol transitions per state, in declaration order
    pub(crate) fn table(&self) -> HashMap<&str, Vec<(&CharSet, &str)>> {
        let mut table: HashMap<&str, Vec<(&CharSet, &str)>> = HashMap::new();
        for t in &self.transitions {
            if let Label::Symbols(set) = &t.label {
                table
                    .entry(t.from.as_str())
                    .or_default()
                    .push((set, t.to.as_str()));
            }
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digits() -> Automaton {
        Automaton {
            states: vec!["START".into(), "S1".into()],
            transitions: vec![
                Transition::new("START", "S1", Label::Symbols(CharSet::digits())),
                Transition::new("S1", "S1", Label::Symbols(CharSet::digits())),
            ],
            start: "START".into(),
            accepting: vec![AcceptingState::new("S1", "NUMBER")],
        }
    }

    #[test]
    fn test_run_accepts_digits() {
        let dfa = digits();
        assert_eq!(dfa.run("42"), Some("NUMBER"));
        assert_eq!(dfa.run(""), None);
        assert_eq!(dfa.run("4a"), None);
    }

    #[test]
    fn test_step_target_outlives_state_name() {
        let dfa = digits();
        let target = {
            let from = String::from("START");
            dfa.step(&from, '7')
        };
        assert_eq!(target, Some("S1"));
        assert_eq!(dfa.step("S1", 'x'), None);
        let from = String::from("S1");
        assert_eq!(dfa.outgoing(&from).count(), 1);
    }

    #[test]
    fn test_structure_checked_in_order() {
        let empty = Automaton::default();
        assert_eq!(empty.check_structure(), Err(WorkbenchError::NoStart("automaton")));

        let mut no_transitions = digits();
        no_transitions.transitions.clear();
        assert_eq!(no_transitions.check_structure(), Err(WorkbenchError::NoTransitions));

        let mut no_accepting = digits();
        no_accepting.accepting.clear();
        assert_eq!(no_accepting.check_structure(), Err(WorkbenchError::NoAccepting));
    }

    #[test]
    fn test_validate_unknown_and_duplicate_states() {
        let mut dfa = digits();
        dfa.transitions.push(Transition::new("S1", "S9", Label::symbol('x')));
        assert!(matches!(
            dfa.validate(),
            Err(WorkbenchError::UnknownState { state, .. }) if state == "S9"
        ));

        let mut dfa = digits();
        dfa.states.push("S1".into());
        assert_eq!(dfa.validate(), Err(WorkbenchError::DuplicateState("S1".into())));
    }

    #[test]
    fn test_determinism() {
        let mut dfa = digits();
        assert!(dfa.is_deterministic());
        dfa.transitions.push(Transition::new("S1", "START", Label::symbol('7')));
        assert_eq!(
            dfa.determinism_violation(),
            Some(("S1".to_string(), "7".to_string()))
        );
        dfa.transitions.pop();
        dfa.transitions.push(Transition::new("START", "S1", Label::Epsilon));
        assert!(!dfa.is_deterministic());
    }

    #[test]
    fn test_label_strings() {
        assert_eq!(Label::parse("ε").unwrap(), Label::Epsilon);
        assert_eq!(Label::parse("[0-9]").unwrap().render(), "[0-9]");
        assert_eq!(Label::symbol('ε').render(), "\\ε");
        assert_eq!(Label::parse("\\ε").unwrap(), Label::symbol('ε'));
        assert!(Label::parse("ab").is_err());
    }

    #[test]
    fn test_automaton_json_round_trip() {
        let dfa = digits();
        let json = serde_json::to_string(&dfa).unwrap();
        assert!(json.contains(r#""label":"[0-9]""#));
        assert!(json.contains(r#""token_type":"NUMBER""#));
        let back: Automaton = serde_json::from_str(&json).unwrap();
        assert_eq!(back, dfa);
    }
}
