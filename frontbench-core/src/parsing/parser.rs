//! Backtracking recursive-descent parser
//!
//! A terminal consumes one token when the token's type equals it (case-insensitively).
//! A variable tries its rules in declared order; a rule parses each output symbol in
//! turn from the current position, and any failing symbol abandons the rule, so the
//! next rule starts again from the same position. The first rule that parses its whole
//! output wins. Parsing succeeds only if the start variable covers every token.
//!
//! The descent runs on an explicit stack of [`Frame`]s rather than the call stack, and
//! nodes are built into an arena that is turned into a [`TreeNode`] once the parse has
//! succeeded. Input length is therefore bounded by memory, not by thread stack size.

use super::tree::{SyntaxTree, TreeNode};
use crate::error::{Result, WorkbenchError};
use crate::grammar::Grammar;
use crate::token::Token;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Parser settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOptions {
    /// Remember the result of each `(symbol, position)` pair
    pub memoize: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions { memoize: true }
    }
}

/// Index into the parser's node arena
type NodeId = usize;

/// Outcome of parsing one symbol at one position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseResult {
    /// The node built and the position right after it
    Success(NodeId, usize),
    Failure,
}

/// Parse `tokens` under `grammar` with default options
pub fn create_syntax_tree(tokens: &[Token], grammar: &Grammar) -> Result<SyntaxTree> {
    create_syntax_tree_with(tokens, grammar, &ParseOptions::default())
}

pub fn create_syntax_tree_with(
    tokens: &[Token],
    grammar: &Grammar,
    options: &ParseOptions,
) -> Result<SyntaxTree> {
    if tokens.is_empty() {
        return Err(WorkbenchError::NoTokens);
    }
    if grammar.start().is_empty() {
        return Err(WorkbenchError::NoStart("grammar"));
    }
    for (index, token) in tokens.iter().enumerate() {
        if token.kind().trim().is_empty() {
            return Err(WorkbenchError::InvalidToken {
                index,
                message: "empty token type".to_string(),
            });
        }
        if token.value().is_empty() {
            return Err(WorkbenchError::InvalidToken {
                index,
                message: "empty token value".to_string(),
            });
        }
    }
    info!(
        "parsing {} tokens from '{}' (memoize: {})",
        tokens.len(),
        grammar.start(),
        options.memoize
    );

    let kinds: Vec<String> = tokens.iter().map(|t| t.kind().to_uppercase()).collect();
    let mut alternatives: HashMap<&str, Vec<&[String]>> = HashMap::new();
    for rule in grammar.rules() {
        alternatives
            .entry(rule.input.as_str())
            .or_default()
            .push(rule.output.as_slice());
    }
    let mut parser = Parser {
        grammar,
        alternatives,
        tokens,
        kinds: &kinds,
        nodes: Vec::new(),
        memo: options.memoize.then(HashMap::new),
        furthest: 0,
        expected: BTreeSet::new(),
    };

    let end = match parser.parse(grammar.start()) {
        ParseResult::Success(root, end) if end == tokens.len() => {
            debug!(
                "parse consumed all {} tokens ({} nodes built)",
                tokens.len(),
                parser.nodes.len()
            );
            return Ok(SyntaxTree::new(parser.materialize(root)));
        }
        ParseResult::Success(_, end) => Some(end),
        ParseResult::Failure => None,
    };
    Err(parser.syntax_error(end))
}

/// An arena node; children are ids of nodes built before it
struct Node<'g, 't> {
    symbol: &'g str,
    value: Option<&'t str>,
    children: Vec<NodeId>,
}

/// A variable being parsed: the alternative being tried and its children so far
struct Frame<'g> {
    symbol: &'g str,
    position: usize,
    alternative: usize,
    cursor: usize,
    children: Vec<NodeId>,
}

impl<'g> Frame<'g> {
    fn new(symbol: &'g str, position: usize) -> Self {
        Frame {
            symbol,
            position,
            alternative: 0,
            cursor: position,
            children: Vec::new(),
        }
    }

    fn accept(&mut self, result: ParseResult) {
        match result {
            ParseResult::Success(node, next) => {
                self.children.push(node);
                self.cursor = next;
            }
            ParseResult::Failure => {
                trace!(
                    "backtrack {} #{} to {}",
                    self.symbol,
                    self.alternative,
                    self.position
                );
                self.alternative += 1;
                self.cursor = self.position;
                self.children.clear();
            }
        }
    }
}

struct Parser<'g, 't> {
    grammar: &'g Grammar,
    alternatives: HashMap<&'g str, Vec<&'g [String]>>,
    tokens: &'t [Token],
    kinds: &'t [String],
    nodes: Vec<Node<'g, 't>>,
    memo: Option<HashMap<(&'g str, usize), ParseResult>>,
    furthest: usize,
    expected: BTreeSet<&'g str>,
}

impl<'g, 't> Parser<'g, 't> {
    fn parse(&mut self, start: &'g str) -> ParseResult {
        if !self.grammar.is_variable(start) {
            return self.parse_terminal(start, 0);
        }

        let mut frames = vec![Frame::new(start, 0)];
        let mut returned: Option<ParseResult> = None;
        while let Some(frame) = frames.last_mut() {
            if let Some(result) = returned.take() {
                frame.accept(result);
            }

            let output = self
                .alternatives
                .get(frame.symbol)
                .and_then(|alts| alts.get(frame.alternative))
                .copied();
            let Some(output) = output else {
                let (symbol, position) = (frame.symbol, frame.position);
                frames.pop();
                returned = Some(self.finish(symbol, position, ParseResult::Failure));
                continue;
            };

            if frame.children.len() == output.len() {
                let (symbol, position, end) = (frame.symbol, frame.position, frame.cursor);
                let children = std::mem::take(&mut frame.children);
                frames.pop();
                let id = self.push_node(symbol, None, children);
                returned = Some(self.finish(symbol, position, ParseResult::Success(id, end)));
                continue;
            }

            if frame.children.is_empty() && frame.cursor == frame.position {
                trace!("try {} #{} @ {}", frame.symbol, frame.alternative, frame.position);
            }
            let next = output[frame.children.len()].as_str();
            let cursor = frame.cursor;
            if !self.grammar.is_variable(next) {
                returned = Some(self.parse_terminal(next, cursor));
                continue;
            }
            match self.memo.as_ref().and_then(|m| m.get(&(next, cursor))) {
                Some(hit) => {
                    trace!("memo hit {} @ {}", next, cursor);
                    returned = Some(*hit);
                }
                None => frames.push(Frame::new(next, cursor)),
            }
        }
        returned.unwrap_or(ParseResult::Failure)
    }

    fn parse_terminal(&mut self, symbol: &'g str, position: usize) -> ParseResult {
        match self.kinds.get(position) {
            Some(kind) if kind == symbol => {
                let tokens = self.tokens;
                let id = self.push_node(symbol, Some(tokens[position].value()), Vec::new());
                ParseResult::Success(id, position + 1)
            }
            _ => {
                self.record_failure(symbol, position);
                ParseResult::Failure
            }
        }
    }

    fn push_node(
        &mut self,
        symbol: &'g str,
        value: Option<&'t str>,
        children: Vec<NodeId>,
    ) -> NodeId {
        self.nodes.push(Node {
            symbol,
            value,
            children,
        });
        self.nodes.len() - 1
    }

    fn finish(&mut self, symbol: &'g str, position: usize, result: ParseResult) -> ParseResult {
        if let Some(memo) = self.memo.as_mut() {
            memo.insert((symbol, position), result);
        }
        result
    }

    fn record_failure(&mut self, terminal: &'g str, position: usize) {
        if position > self.furthest {
            self.furthest = position;
            self.expected.clear();
        }
        if position == self.furthest {
            self.expected.insert(terminal);
        }
    }

    /// Build the tree below `root`, depth first, without recursion
    fn materialize(&self, root: NodeId) -> TreeNode {
        let mut pending: Vec<(NodeId, Vec<TreeNode>)> = Vec::new();
        let mut current = (root, Vec::new());
        loop {
            let node = &self.nodes[current.0];
            if let Some(&child) = node.children.get(current.1.len()) {
                pending.push(std::mem::replace(&mut current, (child, Vec::new())));
                continue;
            }
            let built = match node.value {
                Some(value) => TreeNode::leaf(node.symbol, value),
                None => TreeNode::branch(node.symbol, std::mem::take(&mut current.1)),
            };
            match pending.pop() {
                Some(mut parent) => {
                    parent.1.push(built);
                    current = parent;
                }
                None => return built,
            }
        }
    }

    /// Report the furthest point reached; `parsed_to` is where a successful but partial
    /// parse of the start symbol stopped
    fn syntax_error(&self, parsed_to: Option<usize>) -> WorkbenchError {
        let (position, expected) = match parsed_to {
            Some(end) if end > self.furthest => (end, Vec::new()),
            _ => (
                self.furthest,
                self.expected.iter().map(|s| s.to_string()).collect(),
            ),
        };
        let found = self
            .tokens
            .get(position)
            .map(|t| (t.kind().to_string(), t.value().to_string()));
        debug!("syntax error at token {}", position);
        WorkbenchError::SyntaxError {
            position,
            found,
            expected,
        }
    }
}
