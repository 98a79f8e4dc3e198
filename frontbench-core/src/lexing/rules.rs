//! Rule-based tokenizer
//!
//! At each position, whitespace is skipped. A run of word characters is matched as a
//! whole: the first rule (in declared order) whose pattern matches the entire run
//! claims it, otherwise the run is unidentified. Any other character is matched on its
//! own: `==` is two one-character tokens, never one two-character token.

use super::{is_word_char, LexerOutput, ScanOptions, Unidentified};
use crate::automata::thompson::parse_pattern;
use crate::error::{Result, WorkbenchError};
use crate::token::{Token, TokenPattern};
use log::{debug, info, trace};

struct CompiledRule<'a> {
    token_type: &'a str,
    matcher: regex::Regex,
}

/// Tokenize `source` against an ordered list of rules
pub fn tokenize_with_rules(
    source: &str,
    rules: &[TokenPattern],
    options: &ScanOptions,
) -> Result<LexerOutput> {
    if source.trim().is_empty() {
        return Err(WorkbenchError::EmptySource);
    }
    if rules.is_empty() {
        return Err(WorkbenchError::NoRules);
    }
    let compiled = compile(rules)?;
    info!(
        "tokenizing {} bytes with {} rules",
        source.len(),
        compiled.len()
    );

    let mut tokens = Vec::new();
    let mut unidentified = Unidentified::new(options);
    let chars: Vec<(usize, char)> = source.char_indices().collect();
    let offset = |i: usize| chars.get(i).map_or(source.len(), |(at, _)| *at);

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i].1;
        if c.is_whitespace() {
            unidentified.flush();
            i += 1;
            continue;
        }

        if !is_word_char(c) {
            let text = &source[offset(i)..offset(i + 1)];
            match first_match(&compiled, text) {
                Some(token_type) => {
                    unidentified.flush();
                    tokens.push(Token::new(token_type, text));
                }
                None => unidentified.push(text),
            }
            i += 1;
            continue;
        }

        let mut end = i;
        while end < chars.len() && is_word_char(chars[end].1) {
            end += 1;
        }
        let text = &source[offset(i)..offset(end)];
        match first_match(&compiled, text) {
            Some(token_type) => {
                unidentified.flush();
                tokens.push(Token::new(token_type, text));
            }
            None => {
                trace!("no rule matches word {:?}", text);
                unidentified.push(text);
            }
        }
        i = end;
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

/// Validate every pattern in the dialect and compile it as an anchored `regex`
fn compile(rules: &[TokenPattern]) -> Result<Vec<CompiledRule<'_>>> {
    rules
        .iter()
        .map(|rule| {
            let parsed = parse_pattern(rule)?;
            let anchored = format!("^(?:{})$", parsed.render());
            let matcher =
                regex::Regex::new(&anchored).map_err(|e| WorkbenchError::InvalidPattern {
                    token_type: rule.token_type.clone(),
                    pattern: rule.pattern.clone(),
                    position: 0,
                    message: e.to_string(),
                })?;
            Ok(CompiledRule {
                token_type: &rule.token_type,
                matcher,
            })
        })
        .collect()
}

fn first_match<'a>(rules: &[CompiledRule<'a>], text: &str) -> Option<&'a str> {
    rules
        .iter()
        .find(|rule| rule.matcher.is_match(text))
        .map(|rule| rule.token_type)
}
