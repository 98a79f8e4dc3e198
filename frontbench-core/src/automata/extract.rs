//! Automaton → regex (state elimination)
//!
//! For each accepting token type a generalized automaton is built whose edges carry
//! regexes: a fresh initial node with an epsilon edge to the start state, and a fresh
//! final node reached by epsilon from every state accepting that type. Original
//! states are then eliminated one by one (fewest in × out edges first). Removing `s`
//! rewrites every path `p → s → q` as
//!
//!     R(p, q) | R(p, s) R(s, s)* R(s, q)
//!
//! When only the two fresh nodes remain, the edge between them describes every path
//! from the start to a state of that type. Consecutive characters come out as literal
//! runs, parallel single-character edges fold into bracket sets, and loops become `*`
//! or `+`.
//!
//! Token types are listed in order of first appearance among the accepting states. A
//! state listed under several types belongs to the first. Types whose states are all
//! unreachable produce no entry.

use super::model::{Automaton, Label};
use super::regex::Regex;
use crate::error::Result;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// The patterns recovered for one token type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypePatterns {
    #[serde(rename = "type")]
    pub token_type: String,
    pub patterns: Vec<String>,
}

/// Recover a regex for every accepting token type
pub fn extract_regexes(automaton: &Automaton) -> Result<Vec<TypePatterns>> {
    automaton.check()?;
    info!(
        "extracting regexes from automaton with {} accepting states",
        automaton.accepting.len()
    );

    let index: HashMap<&str, usize> = automaton
        .states
        .iter()
        .enumerate()
        .map(|(i, s)| (s.as_str(), i))
        .collect();
    let start = index[automaton.start.as_str()];

    // token type → accepting states, in first-appearance order
    let mut finals: Vec<(&str, BTreeSet<usize>)> = Vec::new();
    for accept in &automaton.accepting {
        let Some(token_type) = automaton.accepting_type(&accept.state) else {
            continue;
        };
        let state = index[accept.state.as_str()];
        match finals.iter_mut().find(|(t, _)| *t == token_type) {
            Some((_, states)) => {
                states.insert(state);
            }
            None => finals.push((token_type, BTreeSet::from([state]))),
        }
    }

    let mut grouped = Vec::new();
    for (token_type, states) in finals {
        let regex = eliminate(automaton, &index, start, &states);
        if regex == Regex::Empty {
            debug!("{} is not reachable from the start state", token_type);
            continue;
        }
        let pattern = regex.render();
        debug!("{} = {}", token_type, pattern);
        grouped.push(TypePatterns {
            token_type: token_type.to_string(),
            patterns: vec![pattern],
        });
    }
    Ok(grouped)
}

/// Generalized automaton: edges between node indices carry regexes
struct Gnfa {
    edges: BTreeMap<(usize, usize), Regex>,
}

impl Gnfa {
    fn add(&mut self, from: usize, to: usize, regex: Regex) {
        let merged = match self.edges.remove(&(from, to)) {
            Some(existing) => Regex::alt(vec![existing, regex]),
            None => regex,
        };
        if merged != Regex::Empty {
            self.edges.insert((from, to), merged);
        }
    }

    fn predecessors(&self, s: usize) -> Vec<usize> {
        self.edges
            .keys()
            .filter(|(from, to)| *to == s && *from != s)
            .map(|(from, _)| *from)
            .collect()
    }

    fn successors(&self, s: usize) -> Vec<usize> {
        self.edges
            .keys()
            .filter(|(from, to)| *from == s && *to != s)
            .map(|(_, to)| *to)
            .collect()
    }

    fn remove(&mut self, s: usize) {
        let preds = self.predecessors(s);
        let succs = self.successors(s);
        let looped = self
            .edges
            .get(&(s, s))
            .cloned()
            .map_or(Regex::Epsilon, Regex::star);
        for &p in &preds {
            for &q in &succs {
                let path = Regex::concat(vec![
                    self.edges[&(p, s)].clone(),
                    looped.clone(),
                    self.edges[&(s, q)].clone(),
                ]);
                self.add(p, q, path);
            }
        }
        self.edges.retain(|(from, to), _| *from != s && *to != s);
    }
}

fn eliminate(
    automaton: &Automaton,
    index: &HashMap<&str, usize>,
    start: usize,
    accepting: &BTreeSet<usize>,
) -> Regex {
    let n = automaton.states.len();
    let (initial, last) = (n, n + 1);
    let mut gnfa = Gnfa {
        edges: BTreeMap::new(),
    };
    gnfa.add(initial, start, Regex::Epsilon);
    for &state in accepting {
        gnfa.add(state, last, Regex::Epsilon);
    }
    for t in &automaton.transitions {
        let regex = match &t.label {
            Label::Epsilon => Regex::Epsilon,
            Label::Symbols(set) => Regex::Set(set.clone()),
        };
        gnfa.add(index[t.from.as_str()], index[t.to.as_str()], regex);
    }

    let mut remaining: BTreeSet<usize> = (0..n).collect();
    while !remaining.is_empty() {
        let Some(&next) = remaining.iter().min_by_key(|&&s| {
            gnfa.predecessors(s).len() * gnfa.successors(s).len()
        }) else {
            break;
        };
        gnfa.remove(next);
        remaining.remove(&next);
    }

    gnfa.edges.remove(&(initial, last)).unwrap_or(Regex::Empty)
}
