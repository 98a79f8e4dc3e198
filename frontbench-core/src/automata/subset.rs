//! NFA → DFA (subset construction)
//!
//! 1. The epsilon-closure of the NFA start state is the DFA start state.
//! 2. For each DFA state, the characters on outgoing edges of its members are grouped by
//!    the epsilon-closure they lead to; each group becomes one transition whose label is
//!    the set of those characters.
//! 3. New closures are interned and queued until none are left (breadth first).
//!
//! A DFA state accepts when any member does. When members accept different token types,
//! the type listed first in the NFA's accepting list wins; for NFAs built from a pattern
//! mapping that is declaration order.
//!
//! DFA states are named `START`, `S1`, `S2`, ... in discovery order.

use super::charset::CharSet;
use super::model::{AcceptingState, Automaton, Label, Transition};
use crate::error::Result;
use log::{debug, info, trace};
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

type StateSet = BTreeSet<usize>;

/// Convert an automaton (normally an NFA) into an equivalent DFA
pub fn build_dfa(nfa: &Automaton) -> Result<Automaton> {
    nfa.check()?;
    info!(
        "determinizing automaton with {} states, {} transitions",
        nfa.states.len(),
        nfa.transitions.len()
    );

    let graph = IndexedAutomaton::new(nfa);
    let mut closures: HashMap<StateSet, StateSet> = HashMap::new();
    let start_set = graph.closure(StateSet::from([graph.start]));

    let mut names: HashMap<StateSet, String> = HashMap::new();
    let mut order: Vec<StateSet> = Vec::new();
    let mut queue: VecDeque<StateSet> = VecDeque::new();
    let mut transitions: Vec<Transition> = Vec::new();

    names.insert(start_set.clone(), "START".to_string());
    order.push(start_set.clone());
    queue.push_back(start_set);

    while let Some(current) = queue.pop_front() {
        let from = names[&current].clone();

        let mut moves: BTreeMap<char, StateSet> = BTreeMap::new();
        for &state in &current {
            for (set, to) in &graph.symbol_edges[state] {
                for c in set.iter() {
                    moves.entry(c).or_default().insert(*to);
                }
            }
        }

        // target closure → characters leading there, in order of first character
        let mut grouped: Vec<(StateSet, CharSet)> = Vec::new();
        for (c, targets) in moves {
            let target = closures
                .entry(targets)
                .or_insert_with_key(|targets| graph.closure(targets.clone()))
                .clone();
            match grouped.iter_mut().find(|(existing, _)| *existing == target) {
                Some((_, chars)) => chars.insert(c),
                None => grouped.push((target, CharSet::single(c))),
            }
        }

        for (target, chars) in grouped {
            let to = match names.get(&target) {
                Some(name) => name.clone(),
                None => {
                    let name = format!("S{}", order.len());
                    trace!("interned {} = {:?}", name, graph.describe(&target));
                    names.insert(target.clone(), name.clone());
                    order.push(target.clone());
                    queue.push_back(target);
                    name
                }
            };
            transitions.push(Transition::new(from.clone(), to, Label::Symbols(chars)));
        }
    }

    let mut accepting = Vec::new();
    for set in &order {
        if let Some(token_type) = graph.resolve_accept(set) {
            accepting.push(AcceptingState::new(names[set].clone(), token_type));
        }
    }

    let dfa = Automaton {
        states: order.iter().map(|set| names[set].clone()).collect(),
        transitions,
        start: "START".to_string(),
        accepting,
    };
    debug!(
        "DFA has {} states, {} transitions, {} accepting",
        dfa.states.len(),
        dfa.transitions.len(),
        dfa.accepting.len()
    );
    Ok(dfa)
}

/// Index-based view of an automaton for closure and move computations
pub(crate) struct IndexedAutomaton<'a> {
    names: Vec<&'a str>,
    pub(crate) start: usize,
    epsilon_edges: Vec<Vec<usize>>,
    pub(crate) symbol_edges: Vec<Vec<(&'a CharSet, usize)>>,
    /// Position of the first accepting entry for each state, with its type
    accept: Vec<Option<(usize, &'a str)>>,
}

impl<'a> IndexedAutomaton<'a> {
    /// Requires a validated automaton
    pub(crate) fn new(automaton: &'a Automaton) -> Self {
        let index: HashMap<&str, usize> = automaton
            .states
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), i))
            .collect();
        let n = automaton.states.len();
        let mut epsilon_edges = vec![Vec::new(); n];
        let mut symbol_edges = vec![Vec::new(); n];
        for t in &automaton.transitions {
            let (from, to) = (index[t.from.as_str()], index[t.to.as_str()]);
            match &t.label {
                Label::Epsilon => epsilon_edges[from].push(to),
                Label::Symbols(set) => symbol_edges[from].push((set, to)),
            }
        }
        let mut accept = vec![None; n];
        for (position, a) in automaton.accepting.iter().enumerate() {
            let state = index[a.state.as_str()];
            if accept[state].is_none() {
                accept[state] = Some((position, a.token_type.as_str()));
            }
        }
        IndexedAutomaton {
            names: automaton.states.iter().map(String::as_str).collect(),
            start: index[automaton.start.as_str()],
            epsilon_edges,
            symbol_edges,
            accept,
        }
    }

    /// All states reachable from `set` through epsilon edges alone
    pub(crate) fn closure(&self, mut set: StateSet) -> StateSet {
        let mut stack: Vec<usize> = set.iter().copied().collect();
        while let Some(state) = stack.pop() {
            for &next in &self.epsilon_edges[state] {
                if set.insert(next) {
                    stack.push(next);
                }
            }
        }
        set
    }

    /// Token type of the earliest-listed accepting member
    pub(crate) fn resolve_accept(&self, set: &StateSet) -> Option<String> {
        set.iter()
            .filter_map(|&s| self.accept[s])
            .min_by_key(|(position, _)| *position)
            .map(|(_, token_type)| token_type.to_string())
    }

    fn describe(&self, set: &StateSet) -> Vec<&'a str> {
        set.iter().map(|&s| self.names[s]).collect()
    }
}
