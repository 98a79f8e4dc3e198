//! DFA minimization
//!
//! States that cannot be reached from the start, or that cannot reach an accepting
//! state, are dropped first. The rest are split into groups, one per accepting token
//! type plus one for non-accepting states, and groups are refined until every member
//! of a group moves to the same groups on every character. Each final group becomes one
//! state. The result accepts the same strings with the same token types.

use super::charset::CharSet;
use super::model::{AcceptingState, Automaton, Label, Transition};
use crate::error::Result;
use log::{debug, info};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

/// Merge equivalent states of a deterministic automaton
pub fn minimize_dfa(dfa: &Automaton) -> Result<Automaton> {
    dfa.check()?;
    dfa.require_deterministic()?;
    info!("minimizing DFA with {} states", dfa.states.len());

    let index: HashMap<&str, usize> = dfa
        .states
        .iter()
        .enumerate()
        .map(|(i, s)| (s.as_str(), i))
        .collect();
    let n = dfa.states.len();
    let start = index[dfa.start.as_str()];

    let mut delta: Vec<BTreeMap<char, usize>> = vec![BTreeMap::new(); n];
    for t in &dfa.transitions {
        if let Label::Symbols(set) = &t.label {
            let (from, to) = (index[t.from.as_str()], index[t.to.as_str()]);
            for c in set.iter() {
                delta[from].insert(c, to);
            }
        }
    }
    let accept: Vec<Option<&str>> = dfa.states.iter().map(|s| dfa.accepting_type(s)).collect();

    let keep = useful_states(start, &delta, &accept);
    for moves in delta.iter_mut() {
        moves.retain(|_, to| keep.contains(to));
    }
    let alphabet: Vec<char> = {
        let mut chars: Vec<char> = (0..n)
            .filter(|s| keep.contains(s))
            .flat_map(|s| delta[s].keys().copied())
            .collect();
        chars.sort_unstable();
        chars.dedup();
        chars
    };

    // Initial partition: by accepting type
    let mut block: Vec<usize> = vec![usize::MAX; n];
    {
        let mut seeds: HashMap<Option<&str>, usize> = HashMap::new();
        for s in (0..n).filter(|s| keep.contains(s)) {
            let next = seeds.len();
            block[s] = *seeds.entry(accept[s]).or_insert(next);
        }
    }
    let mut count = block.iter().filter(|b| **b != usize::MAX).collect::<HashSet<_>>().len();

    loop {
        let mut signatures: HashMap<(usize, Vec<Option<usize>>), usize> = HashMap::new();
        let mut refined = vec![usize::MAX; n];
        for s in (0..n).filter(|s| keep.contains(s)) {
            let moves = alphabet
                .iter()
                .map(|c| delta[s].get(c).map(|t| block[*t]))
                .collect();
            let next = signatures.len();
            refined[s] = *signatures.entry((block[s], moves)).or_insert(next);
        }
        let refined_count = signatures.len();
        block = refined;
        if refined_count == count {
            break;
        }
        count = refined_count;
    }
    debug!("{} states merged into {} groups", keep.len(), count);

    // Rebuild breadth first from the start group so names are stable
    let mut names: HashMap<usize, String> = HashMap::new();
    let mut states = Vec::new();
    let mut accepting = Vec::new();
    let mut transitions = Vec::new();
    let mut queue = VecDeque::new();
    let representative = |group: usize| (0..n).find(|s| block[*s] == group);

    names.insert(block[start], "START".to_string());
    queue.push_back(block[start]);
    while let Some(group) = queue.pop_front() {
        let Some(rep) = representative(group) else {
            continue;
        };
        let name = names[&group].clone();
        states.push(name.clone());
        if let Some(token_type) = accept[rep] {
            accepting.push(AcceptingState::new(name.clone(), token_type));
        }

        let mut grouped: Vec<(usize, CharSet)> = Vec::new();
        for (c, to) in &delta[rep] {
            let target = block[*to];
            match grouped.iter_mut().find(|(g, _)| *g == target) {
                Some((_, chars)) => chars.insert(*c),
                None => grouped.push((target, CharSet::single(*c))),
            }
        }
        for (target, chars) in grouped {
            let to = match names.get(&target) {
                Some(existing) => existing.clone(),
                None => {
                    let fresh = format!("S{}", names.len());
                    names.insert(target, fresh.clone());
                    queue.push_back(target);
                    fresh
                }
            };
            transitions.push(Transition::new(name.clone(), to, Label::Symbols(chars)));
        }
    }

    info!("minimized DFA has {} states", states.len());
    Ok(Automaton {
        states,
        transitions,
        start: "START".to_string(),
        accepting,
    })
}

/// Reachable from the start and able to reach acceptance; the start is always kept
fn useful_states(
    start: usize,
    delta: &[BTreeMap<char, usize>],
    accept: &[Option<&str>],
) -> HashSet<usize> {
    let n = delta.len();
    let mut reachable = HashSet::from([start]);
    let mut stack = vec![start];
    while let Some(s) = stack.pop() {
        for &to in delta[s].values() {
            if reachable.insert(to) {
                stack.push(to);
            }
        }
    }

    let mut reverse: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (from, moves) in delta.iter().enumerate() {
        for &to in moves.values() {
            reverse[to].push(from);
        }
    }
    let mut live: HashSet<usize> = (0..n).filter(|s| accept[*s].is_some()).collect();
    let mut stack: Vec<usize> = live.iter().copied().collect();
    while let Some(s) = stack.pop() {
        for &from in &reverse[s] {
            if live.insert(from) {
                stack.push(from);
            }
        }
    }

    let mut keep: HashSet<usize> = reachable.intersection(&live).copied().collect();
    keep.insert(start);
    keep
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automata::subset::build_dfa;
    use crate::automata::thompson::build_nfa;
    use crate::error::WorkbenchError;
    use crate::token::TokenPattern;

    #[test]
    fn test_minimize_merges_equivalent_states() {
        // (a|b)c has two equivalent states after the first character
        let dfa = Automaton {
            states: vec!["START".into(), "A".into(), "B".into(), "C".into()],
            transitions: vec![
                Transition::new("START", "A", Label::symbol('a')),
                Transition::new("START", "B", Label::symbol('b')),
                Transition::new("A", "C", Label::symbol('c')),
                Transition::new("B", "C", Label::symbol('c')),
            ],
            start: "START".into(),
            accepting: vec![AcceptingState::new("C", "T")],
        };
        let min = minimize_dfa(&dfa).unwrap();
        assert_eq!(min.states, vec!["START", "S1", "S2"]);
        assert_eq!(min.transitions[0].label.render(), "[ab]");
        assert_eq!(min.run("ac"), Some("T"));
        assert_eq!(min.run("bc"), Some("T"));
        assert_eq!(min.run("cc"), None);
    }

    #[test]
    fn test_minimize_keeps_token_types_apart() {
        let nfa = build_nfa(&[
            TokenPattern::new("KEYWORD", "if"),
            TokenPattern::new("IDENTIFIER", "[a-z]+"),
        ])
        .unwrap();
        let dfa = build_dfa(&nfa).unwrap();
        let min = minimize_dfa(&dfa).unwrap();
        assert!(min.states.len() <= dfa.states.len());
        for word in ["if", "i", "iff", "x", "zz"] {
            assert_eq!(min.run(word), dfa.run(word), "word {:?}", word);
        }
    }

    #[test]
    fn test_minimize_drops_dead_states() {
        let dfa = Automaton {
            states: vec!["START".into(), "OK".into(), "DEAD".into()],
            transitions: vec![
                Transition::new("START", "OK", Label::symbol('a')),
                Transition::new("START", "DEAD", Label::symbol('b')),
            ],
            start: "START".into(),
            accepting: vec![AcceptingState::new("OK", "A")],
        };
        let min = minimize_dfa(&dfa).unwrap();
        assert_eq!(min.states.len(), 2);
        assert_eq!(min.run("b"), None);
    }

    #[test]
    fn test_minimize_requires_determinism() {
        let nfa = build_nfa(&[TokenPattern::new("A", "a")]).unwrap();
        assert!(matches!(
            minimize_dfa(&nfa),
            Err(WorkbenchError::NotDeterministic { .. })
        ));
    }
}
