//! Context-free grammars
//!
//!     A [`Grammar`] holds variables (non-terminals), terminals, a start variable and an
//!     ordered list of [`ProductionRule`]s. It can only be built through [`Grammar::new`]
//!     (or deserialized, which calls it), so a `Grammar` value is always valid:
//!
//!         - the start symbol is set and names a variable
//!         - there is at least one production rule
//!         - every rule's left side is a variable
//!         - every symbol on a right side is a variable or a declared terminal
//!         - no variable can derive itself at its left edge (left recursion)
//!
//!     Terminal names are case-normalized to upper case, both in the declaration and in
//!     rules. The epsilon marker (`ε`, `epsilon` in any case, or an empty entry) denotes
//!     "produces nothing" and is removed from right sides, so a rule whose right side is
//!     only epsilon has an empty output and matches zero tokens.
//!
//!     Left recursion is rejected at load time rather than left to the parser, since a
//!     recursive-descent parser would recurse on it without consuming input.

use crate::error::{Result, WorkbenchError};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// One `input → output` production
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionRule {
    pub input: String,
    pub output: Vec<String>,
}

impl ProductionRule {
    pub fn new<S: Into<String>>(input: impl Into<String>, output: Vec<S>) -> Self {
        ProductionRule {
            input: input.into(),
            output: output.into_iter().map(Into::into).collect(),
        }
    }
}

/// The serialized form of a grammar, before validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammarDocument {
    pub variables: Vec<String>,
    pub terminals: Vec<String>,
    pub start: String,
    pub rules: Vec<ProductionRule>,
}

/// A validated context-free grammar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GrammarDocument", into = "GrammarDocument")]
pub struct Grammar {
    variables: Vec<String>,
    terminals: Vec<String>,
    start: String,
    rules: Vec<ProductionRule>,
}

/// Whether a right-side entry is the epsilon marker
pub fn is_epsilon(symbol: &str) -> bool {
    let symbol = symbol.trim();
    symbol.is_empty() || symbol == "ε" || symbol.eq_ignore_ascii_case("epsilon")
}

impl Grammar {
    pub fn new<S: Into<String>>(
        variables: Vec<S>,
        terminals: Vec<S>,
        start: impl Into<String>,
        rules: Vec<ProductionRule>,
    ) -> Result<Self> {
        let variables: Vec<String> = variables
            .into_iter()
            .map(|v| v.into().trim().to_string())
            .collect();
        let mut terminal_names: Vec<String> = Vec::new();
        for terminal in terminals {
            let terminal = terminal.into();
            if is_epsilon(&terminal) {
                continue;
            }
            let upper = terminal.trim().to_uppercase();
            if !terminal_names.contains(&upper) {
                terminal_names.push(upper);
            }
        }
        let start = start.into().trim().to_string();

        if start.is_empty() {
            return Err(WorkbenchError::NoStart("grammar"));
        }
        if rules.is_empty() {
            return Err(WorkbenchError::NoProductions);
        }
        if !variables.contains(&start) {
            return Err(WorkbenchError::StartNotVariable(start));
        }

        let declared_variables: HashSet<&str> = variables.iter().map(String::as_str).collect();
        let declared_terminals: HashSet<&str> =
            terminal_names.iter().map(String::as_str).collect();
        let mut normalized = Vec::with_capacity(rules.len());
        for rule in rules {
            let input = rule.input.trim().to_string();
            if !declared_variables.contains(input.as_str()) {
                return Err(WorkbenchError::UndeclaredSymbol {
                    rule: input.clone(),
                    symbol: input,
                });
            }
            let mut output = Vec::with_capacity(rule.output.len());
            for symbol in rule.output {
                if is_epsilon(&symbol) {
                    continue;
                }
                let symbol = symbol.trim();
                if declared_variables.contains(symbol) {
                    output.push(symbol.to_string());
                    continue;
                }
                let upper = symbol.to_uppercase();
                if declared_terminals.contains(upper.as_str()) {
                    output.push(upper);
                } else {
                    return Err(WorkbenchError::UndeclaredSymbol {
                        rule: input,
                        symbol: symbol.to_string(),
                    });
                }
            }
            normalized.push(ProductionRule { input, output });
        }

        let grammar = Grammar {
            variables,
            terminals: terminal_names,
            start,
            rules: normalized,
        };
        if let Some(cycle) = grammar.left_recursion() {
            return Err(WorkbenchError::LeftRecursion { cycle });
        }
        debug!(
            "grammar with {} variables, {} terminals, {} rules",
            grammar.variables.len(),
            grammar.terminals.len(),
            grammar.rules.len()
        );
        Ok(grammar)
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn terminals(&self) -> &[String] {
        &self.terminals
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn rules(&self) -> &[ProductionRule] {
        &self.rules
    }

    pub fn is_variable(&self, symbol: &str) -> bool {
        self.variables.iter().any(|v| v == symbol)
    }

    pub fn is_terminal(&self, symbol: &str) -> bool {
        let upper = symbol.to_uppercase();
        self.terminals.iter().any(|t| *t == upper)
    }

    /// Rules for `variable`, in declared order
    pub fn rules_for<'a>(&'a self, variable: &'a str) -> impl Iterator<Item = &'a ProductionRule> {
        self.rules.iter().filter(move |r| r.input == variable)
    }

    /// Variables that can derive the empty string
    pub fn nullable(&self) -> HashSet<&str> {
        let mut nullable: HashSet<&str> = HashSet::new();
        loop {
            let before = nullable.len();
            for rule in &self.rules {
                if !nullable.contains(rule.input.as_str())
                    && rule.output.iter().all(|s| nullable.contains(s.as_str()))
                {
                    nullable.insert(rule.input.as_str());
                }
            }
            if nullable.len() == before {
                return nullable;
            }
        }
    }

    /// A cycle `A → ... → A` in the left-corner graph, where `A → B` when some rule for
    /// `A` can start with `B` after a nullable prefix
    fn left_recursion(&self) -> Option<Vec<String>> {
        let nullable = self.nullable();
        let mut edges: HashMap<&str, Vec<&str>> = HashMap::new();
        for rule in &self.rules {
            for symbol in &rule.output {
                if self.is_variable(symbol) {
                    let targets = edges.entry(rule.input.as_str()).or_default();
                    if !targets.contains(&symbol.as_str()) {
                        targets.push(symbol.as_str());
                    }
                }
                if !nullable.contains(symbol.as_str()) {
                    break;
                }
            }
        }

        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Open,
            Done,
        }
        fn visit<'a>(
            node: &'a str,
            edges: &HashMap<&'a str, Vec<&'a str>>,
            marks: &mut HashMap<&'a str, Mark>,
            path: &mut Vec<&'a str>,
        ) -> Option<Vec<String>> {
            marks.insert(node, Mark::Open);
            path.push(node);
            for &next in edges.get(node).into_iter().flatten() {
                match marks.get(next) {
                    Some(Mark::Open) => {
                        let from = path.iter().position(|n| *n == next).unwrap_or(0);
                        let mut cycle: Vec<String> =
                            path[from..].iter().map(|n| n.to_string()).collect();
                        cycle.push(next.to_string());
                        return Some(cycle);
                    }
                    Some(Mark::Done) => {}
                    None => {
                        if let Some(cycle) = visit(next, edges, marks, path) {
                            return Some(cycle);
                        }
                    }
                }
            }
            path.pop();
            marks.insert(node, Mark::Done);
            None
        }

        let mut marks: HashMap<&str, Mark> = HashMap::new();
        for variable in &self.variables {
            if !marks.contains_key(variable.as_str()) {
                let mut path = Vec::new();
                if let Some(cycle) = visit(variable, &edges, &mut marks, &mut path) {
                    return Some(cycle);
                }
            }
        }
        None
    }
}

impl TryFrom<GrammarDocument> for Grammar {
    type Error = WorkbenchError;

    fn try_from(doc: GrammarDocument) -> Result<Self> {
        Grammar::new(doc.variables, doc.terminals, doc.start, doc.rules)
    }
}

impl From<Grammar> for GrammarDocument {
    fn from(grammar: Grammar) -> Self {
        GrammarDocument {
            variables: grammar.variables,
            terminals: grammar.terminals,
            start: grammar.start,
            rules: grammar.rules,
        }
    }
}
