//! Tree-to-text translation
//!
//!     A [`TranslationRule`] pairs a sequence of terminal types with template lines. The
//!     engine walks the leaves of a syntax tree left to right; at each position the first
//!     rule whose sequence matches the leaf types there is applied and the walk skips past
//!     the matched leaves. Where no rule matches, the walk moves on by one leaf.
//!
//!     Applying a rule fills each `{TYPE}` placeholder with the value of the next unused
//!     matched leaf of that type. A rule `[IDENTIFIER, ASSIGNMENT, IDENTIFIER]` with
//!     template `mov {IDENTIFIER}, {IDENTIFIER}` applied to `a = b` gives `mov a, b`.
//!
//!     Either every leaf ends up inside a matched span or translation fails on the first
//!     leaf that is not; partial output is never returned.
//!
//!     Rules are validated once, by [`TranslationRules::new`]: each must have a non-empty
//!     sequence, and every placeholder must name a type from its own sequence, used no
//!     more often than the type occurs there.

use crate::error::{Result, WorkbenchError};
use crate::parsing::{SyntaxTree, TreeNode};
use log::{debug, info, trace};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{([\p{L}_][\p{L}\p{N}_]*)\}").expect("placeholder pattern is valid")
});

/// One sequence → template mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRule {
    pub sequence: Vec<String>,
    pub translation: Vec<String>,
}

impl TranslationRule {
    pub fn new<S: Into<String>, T: Into<String>>(sequence: Vec<S>, translation: Vec<T>) -> Self {
        TranslationRule {
            sequence: sequence.into_iter().map(Into::into).collect(),
            translation: translation.into_iter().map(Into::into).collect(),
        }
    }
}

/// An ordered, validated rule list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TranslationRule>", into = "Vec<TranslationRule>")]
pub struct TranslationRules {
    rules: Vec<TranslationRule>,
}

impl TranslationRules {
    pub fn new(rules: Vec<TranslationRule>) -> Result<Self> {
        if rules.is_empty() {
            return Err(WorkbenchError::NoRules);
        }
        let mut validated = Vec::with_capacity(rules.len());
        for (index, rule) in rules.into_iter().enumerate() {
            validated.push(validate_rule(index, rule)?);
        }
        Ok(TranslationRules { rules: validated })
    }

    pub fn rules(&self) -> &[TranslationRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn validate_rule(index: usize, rule: TranslationRule) -> Result<TranslationRule> {
    if rule.sequence.is_empty() {
        return Err(WorkbenchError::EmptySequence { rule: index });
    }
    let mut sequence = Vec::with_capacity(rule.sequence.len());
    for entry in &rule.sequence {
        let entry = entry.trim().to_uppercase();
        if entry.is_empty() {
            return Err(WorkbenchError::malformed(
                "translation rules",
                &format!("rule #{} has an empty sequence entry", index),
            ));
        }
        sequence.push(entry);
    }

    let mut available: HashMap<&str, usize> = HashMap::new();
    for entry in &sequence {
        *available.entry(entry.as_str()).or_default() += 1;
    }
    // Placeholders in first-use order, so errors name the first offender
    let mut used: Vec<(String, usize)> = Vec::new();
    for line in &rule.translation {
        for caps in PLACEHOLDER.captures_iter(line) {
            let name = caps[1].to_uppercase();
            match used.iter_mut().find(|(n, _)| *n == name) {
                Some((_, count)) => *count += 1,
                None => used.push((name, 1)),
            }
        }
    }
    for (placeholder, count) in used {
        match available.get(placeholder.as_str()) {
            None => {
                return Err(WorkbenchError::UnknownPlaceholder {
                    rule: index,
                    placeholder,
                })
            }
            Some(&occurs) if count > occurs => {
                return Err(WorkbenchError::PlaceholderOveruse {
                    rule: index,
                    placeholder,
                    used: count,
                    available: occurs,
                })
            }
            Some(_) => {}
        }
    }

    Ok(TranslationRule {
        sequence,
        translation: rule.translation,
    })
}

impl TryFrom<Vec<TranslationRule>> for TranslationRules {
    type Error = WorkbenchError;

    fn try_from(rules: Vec<TranslationRule>) -> Result<Self> {
        TranslationRules::new(rules)
    }
}

impl From<TranslationRules> for Vec<TranslationRule> {
    fn from(rules: TranslationRules) -> Self {
        rules.rules
    }
}

/// A matched leaf's value, waiting to fill a placeholder
#[derive(Debug)]
struct TokenTracker<'a> {
    value: &'a str,
    consumed: bool,
}

/// Translate the leaves of `tree` into output lines
pub fn translate(tree: &SyntaxTree, rules: &TranslationRules) -> Result<Vec<String>> {
    let leaves: Vec<&TreeNode> = tree.leaves().collect();
    info!(
        "translating {} leaves with {} rules",
        leaves.len(),
        rules.len()
    );

    let mut covered = vec![false; leaves.len()];
    let mut output = Vec::new();
    let mut i = 0;
    while i < leaves.len() {
        let window = &leaves[i..];
        match rules.rules().iter().position(|rule| matches_at(rule, window)) {
            Some(r) => {
                let rule = &rules.rules()[r];
                let span = rule.sequence.len();
                trace!("rule #{} covers leaves {}..{}", r, i, i + span);
                output.extend(use_rule(rule, &window[..span]));
                covered[i..i + span].iter_mut().for_each(|c| *c = true);
                i += span;
            }
            None => {
                trace!("no rule at leaf {}", i);
                i += 1;
            }
        }
    }

    if let Some(index) = covered.iter().position(|c| !c) {
        let leaf = leaves[index];
        return Err(WorkbenchError::UntranslatedToken {
            index,
            token_type: leaf.symbol.clone(),
            value: leaf.value.clone(),
        });
    }
    debug!("{} output lines", output.len());
    Ok(output)
}

fn matches_at(rule: &TranslationRule, leaves: &[&TreeNode]) -> bool {
    rule.sequence.len() <= leaves.len()
        && rule
            .sequence
            .iter()
            .zip(leaves)
            .all(|(ty, leaf)| leaf.symbol.to_uppercase() == *ty)
}

fn use_rule(rule: &TranslationRule, matched: &[&TreeNode]) -> Vec<String> {
    let mut trackers: HashMap<String, Vec<TokenTracker<'_>>> = HashMap::new();
    for leaf in matched {
        trackers
            .entry(leaf.symbol.to_uppercase())
            .or_default()
            .push(TokenTracker {
                value: &leaf.value,
                consumed: false,
            });
    }

    rule.translation
        .iter()
        .map(|line| {
            PLACEHOLDER
                .replace_all(line, |caps: &Captures| {
                    let next = trackers
                        .get_mut(&caps[1].to_uppercase())
                        .and_then(|list| list.iter_mut().find(|t| !t.consumed));
                    match next {
                        Some(tracker) => {
                            tracker.consumed = true;
                            tracker.value.to_string()
                        }
                        None => caps[0].to_string(),
                    }
                })
                .into_owned()
        })
        .collect()
}
