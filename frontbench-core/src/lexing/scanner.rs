//! DFA-driven tokenizer
//!
//! From the start state the scanner follows transitions one character at a time,
//! remembering the last accepting state it passed. When no transition applies (or the
//! input ends) it emits a token of that state's type for the text up to it, and scanning
//! resumes right after the token. If no accepting state was passed, the consumed text
//! (at least one character) is unidentified. Whitespace between tokens is skipped.

use super::{LexerOutput, ScanOptions, Unidentified};
use crate::automata::charset::CharSet;
use crate::automata::model::Automaton;
use crate::error::{Result, WorkbenchError};
use crate::token::Token;
use log::{debug, info, trace};
use std::collections::HashMap;

/// Tokenize `source` with a deterministic automaton
pub fn tokenize_with_automaton(
    source: &str,
    dfa: &Automaton,
    options: &ScanOptions,
) -> Result<LexerOutput> {
    if source.trim().is_empty() {
        return Err(WorkbenchError::EmptySource);
    }
    dfa.check()?;
    dfa.require_deterministic()?;
    info!(
        "scanning {} bytes with a {}-state DFA",
        source.len(),
        dfa.states.len()
    );

    let table = dfa.table();
    let accepting: HashMap<&str, &str> = dfa
        .states
        .iter()
        .filter_map(|s| dfa.accepting_type(s).map(|t| (s.as_str(), t)))
        .collect();

    let chars: Vec<(usize, char)> = source.char_indices().collect();
    let offset = |i: usize| chars.get(i).map_or(source.len(), |(at, _)| *at);
    let mut tokens = Vec::new();
    let mut unidentified = Unidentified::new(options);

    let mut i = 0;
    while i < chars.len() {
        if chars[i].1.is_whitespace() {
            unidentified.flush();
            i += 1;
            continue;
        }

        let mut state = dfa.start.as_str();
        let mut j = i;
        let mut last: Option<(usize, &str)> = None;
        while j < chars.len() {
            let Some(next) = step(&table, state, chars[j].1) else {
                break;
            };
            state = next;
            j += 1;
            if let Some(token_type) = accepting.get(state) {
                last = Some((j, *token_type));
            }
        }

        match last {
            Some((end, token_type)) => {
                unidentified.flush();
                let text = &source[offset(i)..offset(end)];
                trace!("{} {:?}", token_type, text);
                tokens.push(Token::new(token_type, text));
                i = end;
            }
            None => {
                let end = j.max(i + 1);
                unidentified.push(&source[offset(i)..offset(end)]);
                i = end;
            }
        }
    }

    let output = LexerOutput {
        tokens,
        unidentified: unidentified.finish(),
    };
    debug!(
        "{} tokens, {} unidentified spans",
        output.tokens.len(),
        output.unidentified.len()
    );
    Ok(output)
}

fn step<'a>(
    table: &HashMap<&'a str, Vec<(&'a CharSet, &'a str)>>,
    state: &str,
    c: char,
) -> Option<&'a str> {
    table
        .get(state)?
        .iter()
        .find(|(set, _)| set.contains(c))
        .map(|(_, to)| *to)
}
